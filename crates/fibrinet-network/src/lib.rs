//! FibriNet network model
//!
//! Typed, schema-validated spring networks.
//!
//! # Core Concepts
//!
//! - [`Scalar`]: attribute value with safe coercion to a [`ScalarType`]
//! - [`ComponentVariant`] / [`NetworkVariant`]: named schemas nodes, edges
//!   and networks are validated against
//! - [`Node`], [`Edge`], [`Network`]: the data model, with uniqueness and
//!   referential integrity enforced on insertion
//! - [`NetworkFactory`]: picks the first registered variant matching a
//!   [`RawNetworkData`] input and builds the network from it
//!
//! # Example
//!
//! ```rust,ignore
//! use fibrinet_network::{NetworkFactory, RawNetworkData};
//!
//! let raw: RawNetworkData = serde_json::from_str(input)?;
//! let network = NetworkFactory::with_defaults().create_network(&raw)?;
//! println!("{} nodes, {} edges", network.node_count(), network.edge_count());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod edge;
mod error;
mod factory;
mod network;
mod node;
mod raw;
mod schema;
mod value;

// Re-exports
pub use edge::{Edge, EdgeId};
pub use error::{NetworkError, NetworkResult};
pub use factory::{NetworkFactory, RegisteredComponents};
pub use network::{Network, DEFAULT_STIFFNESS};
pub use node::{Node, NodeId, Position};
pub use raw::{ColumnTable, RawNetworkData, Row};
pub use schema::{
    builtin, AttributeSchema, AttributeSpec, ComponentVariant, NetworkSchema, NetworkVariant,
    EDGE_FROM, EDGE_ID, EDGE_REST_LENGTH, EDGE_TO, META_STIFFNESS, NODE_FIXED, NODE_ID, NODE_X,
    NODE_Y,
};
pub use value::{Scalar, ScalarType};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
