//! Error types for degradation strategies

use fibrinet_network::{EdgeId, NetworkError, NodeId};

/// Errors raised by a degradation strategy
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DegradationError {
    /// Edge to degrade is not in the network
    #[error("edge {0} not found in network")]
    EdgeNotFound(EdgeId),

    /// Node to degrade is not in the network
    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    /// Relaxation needs a planar position on every node
    #[error("node {0} has no position")]
    MissingPosition(NodeId),

    /// Relaxation produced a non-finite force or position
    #[error("relaxation diverged at iteration {iteration}")]
    Diverged {
        /// One-based iteration that went non-finite
        iteration: usize,
    },

    /// Strategy name is not one of the known strategies
    #[error("unknown strategy '{name}' (expected one of: {expected})")]
    UnknownStrategy {
        /// Requested name
        name: String,
        /// Comma-separated known names
        expected: String,
    },

    /// Network model rejected an edit
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Result alias for degradation operations
pub type DegradationResult<T> = Result<T, DegradationError>;
