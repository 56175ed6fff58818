//! Network factory
//!
//! Registration-based construction of [`Network`] values from
//! [`RawNetworkData`]. Network variants are tried in registration order and
//! the first whose schema matches the input wins. Each input row is then
//! offered to the variant's node (or edge) candidates followed by the
//! [`BASE_NETWORK`] fallback candidates; the first candidate that accepts
//! the row builds it.

use crate::edge::Edge;
use crate::error::{NetworkError, NetworkResult};
use crate::network::Network;
use crate::node::Node;
use crate::raw::{RawNetworkData, Row};
use crate::schema::builtin::{self, BASE_NETWORK};
use crate::schema::{AttributeSchema, ComponentVariant, NetworkSchema, NetworkVariant};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Names of every registered variant, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegisteredComponents {
    /// Network variants
    pub networks: Vec<String>,
    /// Node variants across all networks (deduplicated)
    pub nodes: Vec<String>,
    /// Edge variants across all networks (deduplicated)
    pub edges: Vec<String>,
}

/// Registry of network, node and edge variants
#[derive(Debug, Clone, Default)]
pub struct NetworkFactory {
    networks: IndexMap<String, Arc<NetworkVariant>>,
    node_variants: IndexMap<String, Vec<Arc<ComponentVariant>>>,
    edge_variants: IndexMap<String, Vec<Arc<ComponentVariant>>>,
}

impl NetworkFactory {
    /// Create empty factory
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory with the built-in planar network and its components
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        let network = builtin::network_2d();
        let name = network.name().to_string();
        factory.register_network_variant(network);
        factory.register_node_variant(&name, builtin::node_2d());
        factory.register_node_variant(&name, builtin::fixable_node_2d());
        factory.register_edge_variant(&name, builtin::edge());
        factory.register_edge_variant(&name, builtin::edge_with_rest_length());
        factory
    }

    /// Register a network variant. Re-registering a name replaces the
    /// variant but keeps its original position.
    pub fn register_network_variant(&mut self, variant: Arc<NetworkVariant>) {
        debug!(network = variant.name(), "registering network variant");
        self.networks.insert(variant.name().to_string(), variant);
    }

    /// Register a node candidate for `network` (use [`BASE_NETWORK`] for a
    /// fallback shared by every network)
    pub fn register_node_variant(&mut self, network: &str, variant: Arc<ComponentVariant>) {
        debug!(network, node = variant.name(), "registering node variant");
        self.node_variants
            .entry(network.to_string())
            .or_default()
            .push(variant);
    }

    /// Register an edge candidate for `network` (use [`BASE_NETWORK`] for a
    /// fallback shared by every network)
    pub fn register_edge_variant(&mut self, network: &str, variant: Arc<ComponentVariant>) {
        debug!(network, edge = variant.name(), "registering edge variant");
        self.edge_variants
            .entry(network.to_string())
            .or_default()
            .push(variant);
    }

    /// Names of every registered variant
    #[must_use]
    pub fn registered_components(&self) -> RegisteredComponents {
        fn names(map: &IndexMap<String, Vec<Arc<ComponentVariant>>>) -> Vec<String> {
            map.values()
                .flatten()
                .map(|v| v.name().to_string())
                .collect::<IndexSet<_>>()
                .into_iter()
                .collect()
        }

        RegisteredComponents {
            networks: self.networks.keys().cloned().collect(),
            nodes: names(&self.node_variants),
            edges: names(&self.edge_variants),
        }
    }

    /// Whether `raw` satisfies `schema`: every required metadata key is
    /// present and every row carries every required node/edge attribute.
    ///
    /// # Errors
    /// [`NetworkError::MalformedInput`] for ragged tables
    pub fn matches_schema(raw: &RawNetworkData, schema: &NetworkSchema) -> NetworkResult<bool> {
        if let Some(key) = schema.required_meta().find(|k| !raw.meta_data.contains_key(*k)) {
            debug!(key, "metadata key missing");
            return Ok(false);
        }

        let rows_match = |rows: &[Row], required: &AttributeSchema, table: &str| {
            for (index, row) in rows.iter().enumerate() {
                if let Some(attr) = required.required_names().find(|a| !row.contains_key(*a)) {
                    debug!(table, row = index, attr, "attribute missing");
                    return false;
                }
            }
            true
        };

        Ok(rows_match(&raw.node_rows()?, &schema.node_attributes, "nodes")
            && rows_match(&raw.edge_rows()?, &schema.edge_attributes, "edges"))
    }

    /// Build a network from raw input.
    ///
    /// # Errors
    /// - [`NetworkError::NoMatchingSchema`] if no network variant matches
    /// - [`NetworkError::NoMatchingComponent`] if a row fits no candidate
    /// - [`NetworkError::MalformedInput`] for ragged tables
    /// - structural errors ([`NetworkError::DuplicateId`],
    ///   [`NetworkError::MissingEndpoint`], [`NetworkError::SelfLoop`]) and
    ///   metadata schema errors from assembling the network
    pub fn create_network(&self, raw: &RawNetworkData) -> NetworkResult<Network> {
        for variant in self.networks.values() {
            if !Self::matches_schema(raw, variant.schema())? {
                debug!(network = variant.name(), "schema mismatch");
                continue;
            }
            info!(network = variant.name(), "matched network variant");
            return self.build(Arc::clone(variant), raw);
        }
        Err(NetworkError::NoMatchingSchema)
    }

    fn build(&self, variant: Arc<NetworkVariant>, raw: &RawNetworkData) -> NetworkResult<Network> {
        let node_candidates = candidates(&self.node_variants, variant.name());
        let edge_candidates = candidates(&self.edge_variants, variant.name());
        let name = variant.name().to_string();
        let mut network = Network::new(variant);

        for (key, value) in &raw.meta_data {
            network.update_meta(key, value.clone())?;
        }

        for (index, row) in raw.node_rows()?.iter().enumerate() {
            let node = first_match(&node_candidates, row, Node::from_attributes)?.ok_or_else(
                || NetworkError::NoMatchingComponent {
                    component: "node",
                    network: name.clone(),
                    row: index,
                },
            )?;
            network.add_node(node)?;
        }

        for (index, row) in raw.edge_rows()?.iter().enumerate() {
            let edge = first_match(&edge_candidates, row, Edge::from_attributes)?.ok_or_else(
                || NetworkError::NoMatchingComponent {
                    component: "edge",
                    network: name.clone(),
                    row: index,
                },
            )?;
            network.add_edge(edge)?;
        }

        info!(
            network = %name,
            nodes = network.node_count(),
            edges = network.edge_count(),
            "network created"
        );
        Ok(network)
    }
}

/// Network-specific candidates followed by the base fallback
fn candidates(
    map: &IndexMap<String, Vec<Arc<ComponentVariant>>>,
    network: &str,
) -> Vec<Arc<ComponentVariant>> {
    let own = map.get(network).into_iter().flatten();
    let fallback = if network == BASE_NETWORK {
        None
    } else {
        map.get(BASE_NETWORK)
    };
    own.chain(fallback.into_iter().flatten()).cloned().collect()
}

/// Offer `row` to each candidate in order. Rejections move on to the next
/// candidate; any other error aborts.
fn first_match<T>(
    candidates: &[Arc<ComponentVariant>],
    row: &Row,
    build: impl Fn(Arc<ComponentVariant>, &Row) -> NetworkResult<T>,
) -> NetworkResult<Option<T>> {
    for candidate in candidates {
        match build(Arc::clone(candidate), row) {
            Ok(value) => return Ok(Some(value)),
            Err(err) if err.is_candidate_rejection() => {
                debug!(candidate = candidate.name(), error = %err, "candidate rejected row");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeId;
    use crate::value::{Scalar, ScalarType};
    use pretty_assertions::assert_eq;

    fn planar_input() -> RawNetworkData {
        RawNetworkData::new()
            .with_meta("network_size", "3x1")
            .with_meta("total_tension", 0.1)
            .with_meta("type", "fibrin")
            .with_node_column("n_id", [1, 2, 3])
            .with_node_column("n_x", [0.0, 1.0, 2.0])
            .with_node_column("n_y", [0.0, 0.0, 0.0])
            .with_edge_column("e_id", [1, 2])
            .with_edge_column("n_from", [1, 2])
            .with_edge_column("n_to", [2, 3])
    }

    #[test]
    fn builds_planar_network() {
        let net = NetworkFactory::with_defaults()
            .create_network(&planar_input())
            .unwrap();
        assert_eq!(net.variant().name(), "network_2d");
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.edge_count(), 2);
        assert_eq!(net.get_meta("total_tension"), Some(&Scalar::Float(0.1)));
        assert!(net.nodes().all(|n| n.variant().name() == "node_2d"));
    }

    #[test]
    fn second_candidate_accepts_extra_columns() {
        let raw = planar_input()
            .with_node_column("is_fixed", ["true", "false", "yes"])
            .with_edge_column("rest_length", [1.0, 0.5]);
        let net = NetworkFactory::with_defaults().create_network(&raw).unwrap();

        assert!(net.nodes().all(|n| n.variant().name() == "fixable_node_2d"));
        assert!(net.get_node(NodeId(3)).is_some_and(Node::is_fixed));
        assert!(net.edges().all(|e| e.rest_length().is_some()));
    }

    #[test]
    fn missing_metadata_has_no_matching_schema() {
        let mut raw = planar_input();
        raw.meta_data.shift_remove("type");
        let err = NetworkFactory::with_defaults().create_network(&raw).unwrap_err();
        assert_eq!(err, NetworkError::NoMatchingSchema);
    }

    #[test]
    fn unknown_column_has_no_matching_component() {
        let raw = planar_input().with_node_column("colour", ["r", "g", "b"]);
        let err = NetworkFactory::with_defaults().create_network(&raw).unwrap_err();
        assert_eq!(
            err,
            NetworkError::NoMatchingComponent {
                component: "node",
                network: "network_2d".into(),
                row: 0,
            }
        );
    }

    #[test]
    fn structural_errors_propagate() {
        let mut raw = planar_input();
        raw.edges.insert("n_to".into(), vec![Scalar::Int(2), Scalar::Int(9)]);
        let err = NetworkFactory::with_defaults().create_network(&raw).unwrap_err();
        assert_eq!(err, NetworkError::MissingEndpoint { edge: 2, node: 9 });
    }

    #[test]
    fn base_fallback_is_tried_last() {
        let mut factory = NetworkFactory::with_defaults();
        let tagged = Arc::new(ComponentVariant::new(
            "tagged_node",
            builtin::node_2d()
                .schema()
                .clone()
                .required("tag", ScalarType::Text),
        ));
        factory.register_node_variant(BASE_NETWORK, tagged);

        let raw = planar_input().with_node_column("tag", ["a", "b", "c"]);
        let net = factory.create_network(&raw).unwrap();
        assert!(net.nodes().all(|n| n.variant().name() == "tagged_node"));
        assert_eq!(
            factory.registered_components().nodes,
            vec!["node_2d", "fixable_node_2d", "tagged_node"]
        );
    }

    #[test]
    fn first_registered_matching_network_wins() {
        let strict = Arc::new(NetworkVariant::new(
            "strict",
            NetworkSchema::new(
                AttributeSchema::new().required("k1", ScalarType::Text),
                AttributeSchema::new(),
                AttributeSchema::new(),
            ),
        ));
        let loose = Arc::new(NetworkVariant::new(
            "loose",
            NetworkSchema::new(
                AttributeSchema::new().optional("k1", ScalarType::Text),
                AttributeSchema::new(),
                AttributeSchema::new(),
            ),
        ));
        let mut factory = NetworkFactory::new();
        factory.register_network_variant(strict);
        factory.register_network_variant(loose);

        let with_key = RawNetworkData::new().with_meta("k1", "v");
        let without_key = RawNetworkData::new();
        assert_eq!(
            factory.create_network(&with_key).unwrap().variant().name(),
            "strict"
        );
        assert_eq!(
            factory.create_network(&without_key).unwrap().variant().name(),
            "loose"
        );
        assert_eq!(factory.registered_components().networks, vec!["strict", "loose"]);
    }

    #[test]
    fn ragged_input_is_malformed() {
        let raw = planar_input().with_edge_column("rest_length", [1.0]);
        let err = NetworkFactory::with_defaults().create_network(&raw).unwrap_err();
        assert!(matches!(err, NetworkError::MalformedInput(_)));
    }
}
