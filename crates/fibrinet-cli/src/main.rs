use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use fibrinet_core::{Command as SessionCommand, NetworkSession, SessionConfig};
use fibrinet_degradation::StrategyKind;
use fibrinet_network::{NetworkFactory, RawNetworkData};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("fibrinet")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Degrade spring networks with undo/redo history")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level (RUST_LOG takes precedence)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("run")
                .about("Load a network and apply commands to it")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Network input as JSON (meta_data, nodes, edges)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Session configuration TOML"),
                )
                .arg(
                    Arg::new("strategy")
                        .long("strategy")
                        .value_parser(value_parser!(StrategyKind))
                        .help("Initial strategy (overrides the configuration)"),
                )
                .arg(
                    Arg::new("op")
                        .long("op")
                        .action(ArgAction::Append)
                        .help("Command to apply, e.g. \"degrade_edge 3\" (repeatable)"),
                )
                .arg(
                    Arg::new("script")
                        .long("script")
                        .value_parser(value_parser!(PathBuf))
                        .help("File with one command per line, applied after --op"),
                )
                .arg(
                    Arg::new("new-network-mode")
                        .long("new-network-mode")
                        .action(ArgAction::SetTrue)
                        .help("Require at least two nodes and one edge before export"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the exported history as JSON"),
                ),
        )
        .subcommand(
            Command::new("variants")
                .about("List registered network, node and edge variants")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_input(path: &Path) -> Result<RawNetworkData> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading input {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing input {}", path.display()))
}

/// Parse command lines, skipping blanks and `#` comments
fn parse_commands<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Vec<SessionCommand>> {
    lines
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.parse::<SessionCommand>().map_err(anyhow::Error::from))
        .collect()
}

fn session_config(args: &ArgMatches) -> Result<SessionConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => SessionConfig::from_file(path)?,
        None => SessionConfig::new(),
    };
    if let Some(kind) = args.get_one::<StrategyKind>("strategy") {
        config = config.with_strategy(*kind);
    }
    if args.get_flag("new-network-mode") {
        config = config.with_new_network_mode(true);
    }
    Ok(config)
}

fn run(args: &ArgMatches) -> Result<()> {
    let Some(input) = args.get_one::<PathBuf>("input") else {
        bail!("missing input path");
    };
    let config = session_config(args)?;
    debug!(?config, "session configuration");

    let mut commands = parse_commands(
        args.get_many::<String>("op")
            .into_iter()
            .flatten()
            .map(String::as_str),
    )?;
    if let Some(path) = args.get_one::<PathBuf>("script") {
        let script = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        commands.extend(parse_commands(script.lines())?);
    }

    let mut session = NetworkSession::new(config);
    session.load(&read_input(input)?)?;

    for (step, command) in commands.iter().enumerate() {
        let flags = session
            .apply(command)
            .with_context(|| format!("step {}: `{command}` failed", step + 1))?;
        info!(step = step + 1, %command, ?flags, "applied");
    }

    if args.get_flag("json") {
        let export = session.export()?;
        println!("{}", serde_json::to_string_pretty(&export)?);
        return Ok(());
    }

    let manager = session.manager();
    let flags = session.flags();
    println!("Strategy: {}", session.strategy_kind());
    println!(
        "Snapshot: {} of {}",
        manager.current_index() + 1,
        manager.history().len()
    );
    if let Some(current) = session.current() {
        println!("Nodes: {}", current.node_count());
        println!("Edges: {}", current.edge_count());
    }
    println!("Undo disabled: {}", flags.undo_disabled);
    println!("Redo disabled: {}", flags.redo_disabled);
    println!("Export disabled: {}", flags.export_disabled);
    Ok(())
}

fn variants(args: &ArgMatches) -> Result<()> {
    let registered = NetworkFactory::with_defaults().registered_components();
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&registered)?);
    } else {
        println!("Networks: {}", registered.networks.join(", "));
        println!("Nodes: {}", registered.nodes.join(", "));
        println!("Edges: {}", registered.edges.join(", "));
    }
    Ok(())
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"), matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("run", args)) => run(args),
        Some(("variants", args)) => variants(args),
        _ => Ok(()),
    }
}
