//! Testing utilities for the FibriNet workspace
//!
//! Shared raw inputs, networks and sessions.

#![allow(missing_docs)]

use fibrinet_core::{NetworkSession, SessionConfig};
use fibrinet_network::{builtin, Edge, Network, Node, RawNetworkData};

/// Raw input with every required metadata key populated and no nodes
pub fn raw_with_meta() -> RawNetworkData {
    RawNetworkData::new()
        .with_meta("network_size", "test")
        .with_meta("total_tension", 0.0)
        .with_meta("type", "fixture")
}

/// Unit square 1-2-3-4 with its four sides as edges 1..=4
pub fn square_raw() -> RawNetworkData {
    raw_with_meta()
        .with_node_column("n_id", [1, 2, 3, 4])
        .with_node_column("n_x", [0.0, 1.0, 1.0, 0.0])
        .with_node_column("n_y", [0.0, 0.0, 1.0, 1.0])
        .with_edge_column("e_id", [1, 2, 3, 4])
        .with_edge_column("n_from", [1, 2, 3, 4])
        .with_edge_column("n_to", [2, 3, 4, 1])
}

/// Path 1 - 2 - ... - len along the x axis, unit spacing. Edge `i` joins
/// nodes `i` and `i + 1`.
pub fn chain_raw(len: i64) -> RawNetworkData {
    let ids: Vec<i64> = (1..=len).collect();
    let xs: Vec<f64> = std::iter::successors(Some(0.0), |x| Some(x + 1.0))
        .take(ids.len())
        .collect();
    let edges: Vec<i64> = (1..len).collect();
    raw_with_meta()
        .with_node_column("n_id", ids.clone())
        .with_node_column("n_x", xs)
        .with_node_column("n_y", vec![0.0; ids.len()])
        .with_edge_column("e_id", edges.clone())
        .with_edge_column("n_from", edges.clone())
        .with_edge_column("n_to", edges.iter().map(|i| i + 1).collect::<Vec<_>>())
}

/// Three nodes on the x axis, outer two fixed at 0 and 3, middle free at
/// `free_x`. Rest lengths of 1 put equilibrium at x = 1.5.
pub fn anchored_chain(free_x: f64) -> Network {
    let mut net = Network::new(builtin::network_2d());
    net.add_meta("spring_stiffness_constant", 1.0).unwrap();
    net.add_node(Node::fixable(1, 0.0, 0.0, true)).unwrap();
    net.add_node(Node::fixable(2, free_x, 0.0, false)).unwrap();
    net.add_node(Node::fixable(3, 3.0, 0.0, true)).unwrap();
    net.add_edge(Edge::with_rest_length(1, 1, 2, 1.0)).unwrap();
    net.add_edge(Edge::with_rest_length(2, 2, 3, 1.0)).unwrap();
    net
}

/// Raw form of [`anchored_chain`]
pub fn anchored_chain_raw(free_x: f64) -> RawNetworkData {
    raw_with_meta()
        .with_meta("spring_stiffness_constant", 1.0)
        .with_node_column("n_id", [1, 2, 3])
        .with_node_column("n_x", [0.0, free_x, 3.0])
        .with_node_column("n_y", [0.0, 0.0, 0.0])
        .with_node_column("is_fixed", [true, false, true])
        .with_edge_column("e_id", [1, 2])
        .with_edge_column("n_from", [1, 2])
        .with_edge_column("n_to", [2, 3])
        .with_edge_column("rest_length", [1.0, 1.0])
}

/// Session with `raw` already loaded
pub fn loaded_session(config: SessionConfig, raw: &RawNetworkData) -> NetworkSession {
    let mut session = NetworkSession::new(config);
    session.load(raw).unwrap();
    session
}
