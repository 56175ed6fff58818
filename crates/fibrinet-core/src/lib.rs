//! FibriNet core
//!
//! Reversible degradation sessions over spring networks:
//! - Records every edit as an independent snapshot
//! - Walks the history with undo/redo, truncating the redo branch on edit
//! - Derives undo/redo/export readiness flags for front-ends
//! - Exposes a textual command surface
//!
//! # Example
//!
//! ```rust,ignore
//! use fibrinet_core::prelude::*;
//!
//! let mut session = NetworkSession::new(SessionConfig::new());
//! session.load(&raw)?;
//! session.apply(&"degrade_edge 3".parse()?)?;
//! session.undo()?;
//! assert!(!session.flags().redo_disabled);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod command;
mod config;
mod error;
mod session;
mod state;

// Re-exports
pub use command::Command;
pub use config::SessionConfig;
pub use error::{CoreError, CoreResult};
pub use session::NetworkSession;
pub use state::{
    HistoryExport, ManagerState, NetworkStateManager, ReadinessFlags, MIN_EXPORT_EDGES,
    MIN_EXPORT_NODES,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a session
    pub use crate::{
        Command, CoreError, CoreResult, NetworkSession, NetworkStateManager, ReadinessFlags,
        SessionConfig,
    };
    pub use fibrinet_degradation::{RelaxationParams, RelaxationReport, StrategyKind};
    pub use fibrinet_network::{EdgeId, Network, NodeId, RawNetworkData};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
