//! Textual session commands
//!
//! One command per line:
//!
//! | Text | Command |
//! |------|---------|
//! | `degrade_edge <id>` | [`Command::DegradeEdge`] |
//! | `degrade_node <id>` | [`Command::DegradeNode`] |
//! | `relax` | [`Command::Relax`] |
//! | `undo` / `redo` | [`Command::Undo`] / [`Command::Redo`] |
//! | `set_strategy <name>` | [`Command::SetStrategy`] |
//! | `reset` | [`Command::Reset`] |

use crate::error::CoreError;
use fibrinet_network::{EdgeId, NodeId};
use std::fmt;
use std::str::FromStr;

/// Session command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Degrade an edge with the active strategy
    DegradeEdge(EdgeId),
    /// Degrade a node with the active strategy
    DegradeNode(NodeId),
    /// Relax the current network
    Relax,
    /// Step back in history
    Undo,
    /// Step forward in history
    Redo,
    /// Swap the active strategy
    SetStrategy(String),
    /// Drop the loaded network and its history
    Reset,
}

impl FromStr for Command {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let Some(verb) = parts.next() else {
            return Err(CoreError::invalid_command(s, "empty command"));
        };
        let argument = parts.next();
        if parts.next().is_some() {
            return Err(CoreError::invalid_command(s, "too many arguments"));
        }

        let id = |argument: Option<&str>| -> Result<i64, CoreError> {
            let text = argument.ok_or_else(|| CoreError::invalid_command(s, "missing id"))?;
            text.parse()
                .map_err(|_| CoreError::invalid_command(s, format!("'{text}' is not an integer id")))
        };
        let bare = |command: Command| match argument {
            None => Ok(command),
            Some(_) => Err(CoreError::invalid_command(s, "takes no argument")),
        };

        match verb.to_ascii_lowercase().as_str() {
            "degrade_edge" => Ok(Self::DegradeEdge(EdgeId(id(argument)?))),
            "degrade_node" => Ok(Self::DegradeNode(NodeId(id(argument)?))),
            "set_strategy" => argument
                .map(|name| Self::SetStrategy(name.to_string()))
                .ok_or_else(|| CoreError::invalid_command(s, "missing strategy name")),
            "relax" => bare(Self::Relax),
            "undo" => bare(Self::Undo),
            "redo" => bare(Self::Redo),
            "reset" => bare(Self::Reset),
            other => Err(CoreError::invalid_command(s, format!("unknown verb '{other}'"))),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegradeEdge(id) => write!(f, "degrade_edge {id}"),
            Self::DegradeNode(id) => write!(f, "degrade_node {id}"),
            Self::Relax => f.write_str("relax"),
            Self::Undo => f.write_str("undo"),
            Self::Redo => f.write_str("redo"),
            Self::SetStrategy(name) => write!(f, "set_strategy {name}"),
            Self::Reset => f.write_str("reset"),
        }
    }
}
