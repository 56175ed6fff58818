//! Error types for the network model
//!
//! Covers:
//! - Schema violations on nodes, edges and metadata
//! - Scalar coercion failures
//! - Structural invariants (duplicate ids, dangling endpoints, self loops)
//! - Lookups of absent nodes and edges
//! - Factory classification failures

use crate::value::{Scalar, ScalarType};

/// Errors raised while building or mutating a network
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    /// Attribute is not declared by the schema, or a required one is absent
    #[error("schema violation on {component}: {message}")]
    SchemaViolation {
        /// Component kind that rejected the attribute (`node`, `edge`, `meta_data`)
        component: &'static str,
        /// Human-readable description
        message: String,
    },

    /// Value cannot be cast to the declared type
    #[error("cannot coerce {value} to {expected} for '{attribute}'")]
    TypeCoercion {
        /// Attribute being written
        attribute: String,
        /// Declared type
        expected: ScalarType,
        /// Offending value
        value: Scalar,
    },

    /// Id already present in the network
    #[error("duplicate {component} id {id}")]
    DuplicateId {
        /// `node` or `edge`
        component: &'static str,
        /// Colliding id
        id: i64,
    },

    /// Node or edge addressed by id is not in the network
    #[error("{component} {id} not found")]
    NotFound {
        /// `node` or `edge`
        component: &'static str,
        /// Requested id
        id: i64,
    },

    /// Edge references a node that is not in the network
    #[error("edge {edge} references missing node {node}")]
    MissingEndpoint {
        /// Offending edge id
        edge: i64,
        /// Missing node id
        node: i64,
    },

    /// Edge connects a node to itself
    #[error("edge {edge} connects node {node} to itself")]
    SelfLoop {
        /// Offending edge id
        edge: i64,
        /// Node referenced twice
        node: i64,
    },

    /// No registered network variant accepts the input
    #[error("no matching network schema for input")]
    NoMatchingSchema,

    /// A row of input matched no registered node or edge variant
    #[error("no matching {component} variant for row {row} of network '{network}'")]
    NoMatchingComponent {
        /// `node` or `edge`
        component: &'static str,
        /// Network variant being built
        network: String,
        /// Zero-based row index in the input table
        row: usize,
    },

    /// Input tables are not rectangular
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

impl NetworkError {
    /// Create schema violation
    #[inline]
    #[must_use]
    pub fn schema_violation(component: &'static str, message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            component,
            message: message.into(),
        }
    }

    /// Whether the factory may try the next candidate after this error
    #[inline]
    #[must_use]
    pub fn is_candidate_rejection(&self) -> bool {
        matches!(self, Self::SchemaViolation { .. } | Self::TypeCoercion { .. })
    }
}

/// Result alias for network operations
pub type NetworkResult<T> = Result<T, NetworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_violation_display() {
        let err = NetworkError::schema_violation("node", "unknown attribute 'color'");
        assert_eq!(
            err.to_string(),
            "schema violation on node: unknown attribute 'color'"
        );
    }

    #[test]
    fn coercion_display() {
        let err = NetworkError::TypeCoercion {
            attribute: "n_x".to_string(),
            expected: ScalarType::Float,
            value: Scalar::Text("abc".to_string()),
        };
        assert_eq!(err.to_string(), "cannot coerce 'abc' to float for 'n_x'");
    }

    #[test]
    fn candidate_rejection_classification() {
        assert!(NetworkError::schema_violation("edge", "x").is_candidate_rejection());
        assert!(!NetworkError::NoMatchingSchema.is_candidate_rejection());
        assert!(!NetworkError::DuplicateId { component: "node", id: 1 }.is_candidate_rejection());
        assert!(!NetworkError::NotFound { component: "edge", id: 1 }.is_candidate_rejection());
    }
}
