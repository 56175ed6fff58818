//! Error types for the session layer
//!
//! Provides [`CoreError`], wrapping the network and degradation errors and
//! adding the state-transition, command and configuration failures.

use fibrinet_degradation::DegradationError;
use fibrinet_network::NetworkError;
use std::path::PathBuf;

/// Errors surfaced by the state manager and session
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Operation not allowed in the current state
    #[error("invalid state transition: {0}")]
    StateTransition(String),

    /// Command text could not be parsed
    #[error("invalid command '{input}': {reason}")]
    InvalidCommand {
        /// Offending text
        input: String,
        /// What was wrong with it
        reason: String,
    },

    /// Network construction or edit failed
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Strategy failed
    #[error(transparent)]
    Degradation(#[from] DegradationError),

    /// Configuration could not be parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error while reading configuration
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    /// Create state transition error
    #[inline]
    #[must_use]
    pub fn state_transition(message: impl Into<String>) -> Self {
        Self::StateTransition(message.into())
    }

    /// Create command parse error
    #[inline]
    #[must_use]
    pub fn invalid_command(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCommand {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Check if error is a state transition refusal
    #[inline]
    #[must_use]
    pub fn is_state_transition(&self) -> bool {
        matches!(self, Self::StateTransition(_))
    }
}

/// Result alias for session operations
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use fibrinet_network::EdgeId;

    #[test]
    fn wraps_lower_layers_transparently() {
        let err: CoreError = DegradationError::EdgeNotFound(EdgeId(4)).into();
        assert_eq!(err.to_string(), "edge 4 not found in network");
        assert!(!err.is_state_transition());

        let err: CoreError = NetworkError::NoMatchingSchema.into();
        assert!(matches!(err, CoreError::Network(NetworkError::NoMatchingSchema)));
    }

    #[test]
    fn state_transition_display() {
        let err = CoreError::state_transition("no network loaded");
        assert!(err.is_state_transition());
        assert_eq!(err.to_string(), "invalid state transition: no network loaded");
    }
}
