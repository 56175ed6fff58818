use fibrinet_core::{CoreError, NetworkSession, SessionConfig};
use fibrinet_degradation::{
    DegradationError, RelaxationParams, SpringForceStrategy, StrategyKind,
};
use fibrinet_network::{EdgeId, Network, Node, NodeId};
use fibrinet_test_utils::{anchored_chain, anchored_chain_raw, loaded_session, square_raw};

fn x_of(network: Option<&Network>, id: i64) -> f64 {
    network
        .and_then(|net| net.get_node(NodeId(id)))
        .and_then(Node::position)
        .map_or(f64::NAN, |p| p.x)
}

fn spring_config() -> SessionConfig {
    SessionConfig::new().with_strategy(StrategyKind::SpringForce2d)
}

#[test]
fn test_relax_records_equilibrium_snapshot() {
    let mut session = loaded_session(spring_config(), &anchored_chain_raw(2.0));
    let report = session.relax().unwrap();

    assert!(report.converged);
    assert!(report.max_force < 1e-5);
    assert!((x_of(session.current(), 2) - 1.5).abs() < 1e-4);
    assert!(x_of(session.current(), 1).abs() < f64::EPSILON);
    assert!((x_of(session.current(), 3) - 3.0).abs() < f64::EPSILON);

    session.undo().unwrap();
    assert!((x_of(session.current(), 2) - 2.0).abs() < f64::EPSILON);
}

#[test]
fn test_no_physics_relax_records_unchanged_copy() {
    let mut session = loaded_session(SessionConfig::new(), &anchored_chain_raw(2.0));
    let report = session.relax().unwrap();

    assert_eq!(report.iterations, 0);
    assert_eq!(session.manager().history().len(), 2);
    assert_eq!(session.manager().history()[0], session.manager().history()[1]);
}

#[test]
fn test_spring_degrade_keeps_nodes_and_relaxes() {
    let mut session = loaded_session(spring_config(), &square_raw());
    session.degrade_edge(EdgeId(2)).unwrap();

    let current = session.current().unwrap();
    assert_eq!(current.node_count(), 4);
    assert_eq!(current.edge_count(), 3);
    // rest lengths freeze at the current lengths, so the square stays put
    assert!((x_of(Some(current), 3) - 1.0).abs() < 1e-9);
}

#[test]
fn test_configured_iteration_cap_reaches_session() {
    let config = SessionConfig::from_toml_str(
        r#"
        strategy = "spring_force_2d"

        [relaxation]
        max_iterations = 3
        "#,
    )
    .unwrap();
    let mut session = NetworkSession::new(config);
    session.load(&anchored_chain_raw(2.5)).unwrap();

    let report = session.relax().unwrap();
    assert_eq!(report.iterations, 3);
    assert!(!report.converged);
}

#[test]
fn test_swapped_strategy_uses_session_parameters() {
    let config =
        SessionConfig::new().with_relaxation(RelaxationParams::default().with_max_iterations(2));
    let mut session = loaded_session(config, &anchored_chain_raw(2.5));
    session.set_strategy("spring_force_2d").unwrap();

    assert_eq!(session.relax().unwrap().iterations, 2);
}

#[test]
fn test_max_force_never_increases_on_chain() {
    for free_x in [0.5, 1.0, 2.0, 2.9] {
        let (_, report) = SpringForceStrategy::new()
            .relax_with_report(&anchored_chain(free_x))
            .unwrap();
        assert!(report.converged, "x = {free_x}");
        assert!(
            report.force_history.windows(2).all(|w| w[1] <= w[0] + 1e-12),
            "x = {free_x}: {:?}",
            report.force_history.iter().take(5).collect::<Vec<_>>()
        );
    }
}

#[test]
fn test_diverging_relaxation_is_not_recorded() {
    let config = spring_config().with_relaxation(RelaxationParams::default().with_step_size(10.0));
    let mut session = loaded_session(config, &anchored_chain_raw(1.2));

    let err = session.relax().unwrap_err();
    assert!(matches!(
        err,
        CoreError::Degradation(DegradationError::Diverged { .. })
    ));
    assert_eq!(session.manager().history().len(), 1);
    assert!((x_of(session.current(), 2) - 1.2).abs() < f64::EPSILON);

    let err = session.degrade_edge(EdgeId(1)).unwrap_err();
    assert!(matches!(err, CoreError::Degradation(_)));
    assert_eq!(session.manager().history().len(), 1);
}
