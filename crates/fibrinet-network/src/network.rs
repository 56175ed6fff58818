//! Network container
//!
//! Insertion-ordered node and edge maps plus schema-checked metadata. All
//! structural invariants (unique ids, endpoints present, no self loops) are
//! enforced on insertion.

use crate::edge::{Edge, EdgeId};
use crate::error::{NetworkError, NetworkResult};
use crate::node::{Node, NodeId, Position};
use crate::schema::{NetworkVariant, META_STIFFNESS};
use crate::value::Scalar;
use indexmap::{IndexMap, IndexSet};
use petgraph::graphmap::UnGraphMap;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::sync::Arc;

const META: &str = "meta_data";

/// Stiffness used when the metadata carries none
pub const DEFAULT_STIFFNESS: f64 = 1.0;

/// Graph of nodes, edges and metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    variant: Arc<NetworkVariant>,
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<EdgeId, Edge>,
    meta: IndexMap<String, Scalar>,
}

impl Network {
    /// Create an empty network of the given variant
    #[must_use]
    pub fn new(variant: Arc<NetworkVariant>) -> Self {
        Self {
            variant,
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            meta: IndexMap::new(),
        }
    }

    /// Network variant
    #[inline]
    #[must_use]
    pub fn variant(&self) -> &NetworkVariant {
        &self.variant
    }

    // ========================================================================
    // Nodes & edges
    // ========================================================================

    /// Insert a node.
    ///
    /// # Errors
    /// [`NetworkError::DuplicateId`] if the id is taken
    pub fn add_node(&mut self, node: Node) -> NetworkResult<()> {
        if self.nodes.contains_key(&node.id()) {
            return Err(NetworkError::DuplicateId {
                component: "node",
                id: node.id().0,
            });
        }
        self.nodes.insert(node.id(), node);
        Ok(())
    }

    /// Insert an edge.
    ///
    /// # Errors
    /// Checked in order: [`NetworkError::SelfLoop`],
    /// [`NetworkError::MissingEndpoint`], [`NetworkError::DuplicateId`]
    pub fn add_edge(&mut self, edge: Edge) -> NetworkResult<()> {
        if edge.from() == edge.to() {
            return Err(NetworkError::SelfLoop {
                edge: edge.id().0,
                node: edge.from().0,
            });
        }
        if let Some(missing) = [edge.from(), edge.to()]
            .into_iter()
            .find(|id| !self.nodes.contains_key(id))
        {
            return Err(NetworkError::MissingEndpoint {
                edge: edge.id().0,
                node: missing.0,
            });
        }
        if self.edges.contains_key(&edge.id()) {
            return Err(NetworkError::DuplicateId {
                component: "edge",
                id: edge.id().0,
            });
        }
        self.edges.insert(edge.id(), edge);
        Ok(())
    }

    /// Remove a node, keeping incident edges. Absent ids are a no-op.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.shift_remove(&id)
    }

    /// Remove an edge. Absent ids are a no-op.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        self.edges.shift_remove(&id)
    }

    /// Look up a node
    #[inline]
    #[must_use]
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Look up an edge
    #[inline]
    #[must_use]
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Move a node.
    ///
    /// # Errors
    /// - [`NetworkError::NotFound`] if the node does not exist
    /// - [`NetworkError::SchemaViolation`] if its variant has no coordinates
    /// - [`NetworkError::TypeCoercion`] for a non-finite coordinate
    pub fn set_node_position(&mut self, id: NodeId, position: Position) -> NetworkResult<()> {
        self.nodes
            .get_mut(&id)
            .ok_or(NetworkError::NotFound {
                component: "node",
                id: id.0,
            })?
            .set_position(position)
    }

    /// Checked overwrite of a stored node attribute. The identity is fixed.
    ///
    /// # Errors
    /// [`NetworkError::NotFound`] for an unknown node,
    /// [`NetworkError::SchemaViolation`] for the identity attribute or an
    /// undeclared name, [`NetworkError::TypeCoercion`] if the value cannot
    /// be cast
    pub fn update_node_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<Scalar>,
    ) -> NetworkResult<()> {
        if name == crate::schema::NODE_ID {
            return Err(NetworkError::schema_violation(
                "node",
                format!("identity of stored node {id} cannot be rewritten"),
            ));
        }
        self.nodes
            .get_mut(&id)
            .ok_or(NetworkError::NotFound {
                component: "node",
                id: id.0,
            })?
            .set_attribute(name, value)
    }

    /// Checked overwrite of a stored edge attribute. Identity and endpoints
    /// are fixed.
    ///
    /// # Errors
    /// As [`Network::update_node_attribute`]
    pub fn update_edge_attribute(
        &mut self,
        id: EdgeId,
        name: &str,
        value: impl Into<Scalar>,
    ) -> NetworkResult<()> {
        use crate::schema::{EDGE_FROM, EDGE_ID, EDGE_TO};
        if [EDGE_ID, EDGE_FROM, EDGE_TO].contains(&name) {
            return Err(NetworkError::schema_violation(
                "edge",
                format!("'{name}' of stored edge {id} cannot be rewritten"),
            ));
        }
        self.edges
            .get_mut(&id)
            .ok_or(NetworkError::NotFound {
                component: "edge",
                id: id.0,
            })?
            .set_attribute(name, value)
    }

    // ========================================================================
    // Topology
    // ========================================================================

    /// Edges touching `node`, in insertion order
    #[must_use]
    pub fn incident_edge_ids(&self, node: NodeId) -> Vec<EdgeId> {
        self.edges
            .values()
            .filter(|edge| edge.touches(node))
            .map(Edge::id)
            .collect()
    }

    /// Every node referenced by at least one edge
    #[must_use]
    pub fn connected_node_ids(&self) -> IndexSet<NodeId> {
        self.edges
            .values()
            .flat_map(|edge| [edge.from(), edge.to()])
            .collect()
    }

    /// Drop every node no edge touches. Returns the removed ids.
    pub fn prune_isolated_nodes(&mut self) -> Vec<NodeId> {
        let connected = self.connected_node_ids();
        let isolated: Vec<NodeId> = self
            .nodes
            .keys()
            .filter(|id| !connected.contains(*id))
            .copied()
            .collect();
        for id in &isolated {
            self.nodes.shift_remove(id);
        }
        isolated
    }

    /// Undirected graph view over present nodes. Parallel edges collapse.
    #[must_use]
    pub fn graph(&self) -> UnGraphMap<NodeId, EdgeId> {
        let mut graph = UnGraphMap::with_capacity(self.nodes.len(), self.edges.len());
        for id in self.nodes.keys() {
            graph.add_node(*id);
        }
        for edge in self.edges.values() {
            if graph.contains_node(edge.from()) && graph.contains_node(edge.to()) {
                graph.add_edge(edge.from(), edge.to(), edge.id());
            }
        }
        graph
    }

    /// Nodes adjacent to `node`
    #[must_use]
    pub fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        let graph = self.graph();
        if !graph.contains_node(node) {
            return Vec::new();
        }
        graph.neighbors(node).collect()
    }

    /// Fewest-hop path between two nodes, endpoints included
    #[must_use]
    pub fn shortest_path(&self, start: NodeId, goal: NodeId) -> Option<Vec<NodeId>> {
        let graph = self.graph();
        if !graph.contains_node(start) || !graph.contains_node(goal) {
            return None;
        }
        petgraph::algo::astar(&graph, start, |n| n == goal, |_| 1_usize, |_| 0)
            .map(|(_, path)| path)
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Metadata in insertion order
    #[inline]
    #[must_use]
    pub fn meta_data(&self) -> &IndexMap<String, Scalar> {
        &self.meta
    }

    /// Read a metadata value
    #[inline]
    #[must_use]
    pub fn get_meta(&self, key: &str) -> Option<&Scalar> {
        self.meta.get(key)
    }

    /// Insert a new metadata key.
    ///
    /// # Errors
    /// [`NetworkError::SchemaViolation`] if undeclared or already present;
    /// [`NetworkError::TypeCoercion`] if the value cannot be cast
    pub fn add_meta(&mut self, key: &str, value: impl Into<Scalar>) -> NetworkResult<()> {
        if self.meta.contains_key(key) {
            return Err(NetworkError::schema_violation(
                META,
                format!("'{key}' already present"),
            ));
        }
        let coerced = self.coerce_meta(key, &value.into())?;
        self.meta.insert(key.to_string(), coerced);
        Ok(())
    }

    /// Insert or overwrite a metadata key.
    ///
    /// # Errors
    /// [`NetworkError::SchemaViolation`] if undeclared;
    /// [`NetworkError::TypeCoercion`] if the value cannot be cast
    pub fn update_meta(&mut self, key: &str, value: impl Into<Scalar>) -> NetworkResult<()> {
        let coerced = self.coerce_meta(key, &value.into())?;
        self.meta.insert(key.to_string(), coerced);
        Ok(())
    }

    /// Remove a metadata key. Absent keys are a no-op.
    pub fn remove_meta(&mut self, key: &str) -> Option<Scalar> {
        self.meta.shift_remove(key)
    }

    /// Required metadata keys that are absent or null
    #[must_use]
    pub fn missing_required_meta(&self) -> Vec<String> {
        self.variant
            .schema()
            .required_meta()
            .filter(|key| self.meta.get(*key).map_or(true, Scalar::is_null))
            .map(str::to_string)
            .collect()
    }

    /// Spring stiffness `k` from metadata
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.meta
            .get(META_STIFFNESS)
            .and_then(Scalar::as_f64)
            .unwrap_or(DEFAULT_STIFFNESS)
    }

    fn coerce_meta(&self, key: &str, value: &Scalar) -> NetworkResult<Scalar> {
        let ty = self
            .variant
            .schema()
            .meta_data
            .type_of(key)
            .ok_or_else(|| {
                NetworkError::schema_violation(
                    META,
                    format!("'{key}' is not declared by '{}'", self.variant.name()),
                )
            })?;
        value.coerce(ty, key)
    }
}

impl Serialize for Network {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nodes: Vec<&Node> = self.nodes.values().collect();
        let edges: Vec<&Edge> = self.edges.values().collect();
        let mut state = serializer.serialize_struct("Network", 4)?;
        state.serialize_field("variant", self.variant.name())?;
        state.serialize_field("meta_data", &self.meta)?;
        state.serialize_field("nodes", &nodes)?;
        state.serialize_field("edges", &edges)?;
        state.end()
    }
}
