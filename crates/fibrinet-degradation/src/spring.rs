//! Planar spring-force degradation
//!
//! After every edit the network is relaxed by explicit gradient steps:
//! each edge pulls its endpoints with Hooke force `k * (length - rest)`
//! along the edge, and every non-fixed node moves by `step_size * force`
//! until the largest force on a movable node falls below `tolerance` or
//! the iteration cap is reached.

use crate::error::{DegradationError, DegradationResult};
use crate::strategy::{DegradationStrategy, StrategyKind};
use fibrinet_network::{EdgeId, Network, NetworkError, NodeId, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Solver parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaxationParams {
    /// Iteration cap
    pub max_iterations: usize,
    /// Displacement per unit force
    pub step_size: f64,
    /// Convergence threshold on the largest movable-node force
    pub tolerance: f64,
}

impl Default for RelaxationParams {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            step_size: 0.01,
            tolerance: 1e-5,
        }
    }
}

impl RelaxationParams {
    /// Set iteration cap
    #[inline]
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set step size
    #[inline]
    #[must_use]
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    /// Set tolerance
    #[inline]
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Solver statistics for one relaxation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelaxationReport {
    /// Iterations executed
    pub iterations: usize,
    /// Largest movable-node force in the last iteration
    pub max_force: f64,
    /// Whether the tolerance was reached before the cap
    pub converged: bool,
    /// Largest movable-node force per iteration
    pub force_history: Vec<f64>,
}

impl Default for RelaxationReport {
    fn default() -> Self {
        Self {
            iterations: 0,
            max_force: 0.0,
            converged: true,
            force_history: Vec::new(),
        }
    }
}

/// Edge reduced to node indices and a frozen rest length
#[derive(Debug, Clone, Copy)]
struct Spring {
    a: usize,
    b: usize,
    rest: f64,
}

/// Spring-force degradation strategy
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpringForceStrategy {
    params: RelaxationParams,
}

impl SpringForceStrategy {
    /// Create strategy with default parameters
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strategy with explicit parameters
    #[inline]
    #[must_use]
    pub fn with_params(params: RelaxationParams) -> Self {
        Self { params }
    }

    /// Solver parameters
    #[inline]
    #[must_use]
    pub fn params(&self) -> &RelaxationParams {
        &self.params
    }

    /// Relax a copy of `network` and return it with solver statistics.
    ///
    /// # Errors
    /// - [`DegradationError::MissingPosition`] if a node has no position
    /// - [`DegradationError::Diverged`] if a force or position goes
    ///   non-finite
    /// - [`DegradationError::Network`] if an edge references an absent node
    pub fn relax_with_report(
        &self,
        network: &Network,
    ) -> DegradationResult<(Network, RelaxationReport)> {
        let mut relaxed = network.clone();
        let report = self.relax_in_place(&mut relaxed)?;
        Ok((relaxed, report))
    }

    fn relax_in_place(&self, network: &mut Network) -> DegradationResult<RelaxationReport> {
        let RelaxationParams {
            max_iterations,
            step_size,
            tolerance,
        } = self.params;
        let k = network.stiffness();

        let mut ids = Vec::with_capacity(network.node_count());
        let mut positions = Vec::with_capacity(network.node_count());
        let mut fixed = Vec::with_capacity(network.node_count());
        for node in network.nodes() {
            let position = node
                .position()
                .ok_or(DegradationError::MissingPosition(node.id()))?;
            ids.push(node.id());
            positions.push([position.x, position.y]);
            fixed.push(node.is_fixed());
        }
        let index: HashMap<NodeId, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let mut springs = Vec::with_capacity(network.edge_count());
        for edge in network.edges() {
            let endpoint = |id: NodeId| {
                index.get(&id).copied().ok_or(NetworkError::MissingEndpoint {
                    edge: edge.id().0,
                    node: id.0,
                })
            };
            let (a, b) = (endpoint(edge.from())?, endpoint(edge.to())?);
            let rest = edge
                .rest_length()
                .unwrap_or_else(|| distance(positions[a], positions[b]));
            springs.push(Spring { a, b, rest });
        }

        let mut report = RelaxationReport {
            converged: false,
            ..RelaxationReport::default()
        };
        let mut forces = vec![[0.0_f64; 2]; positions.len()];

        for iteration in 1..=max_iterations {
            forces.iter_mut().for_each(|f| *f = [0.0, 0.0]);
            for spring in &springs {
                let [xa, ya] = positions[spring.a];
                let [xb, yb] = positions[spring.b];
                let (dx, dy) = (xb - xa, yb - ya);
                let length = dx.hypot(dy);
                if length <= 0.0 {
                    continue;
                }
                let magnitude = k * (length - spring.rest);
                let (fx, fy) = (magnitude * dx / length, magnitude * dy / length);
                forces[spring.a][0] += fx;
                forces[spring.a][1] += fy;
                forces[spring.b][0] -= fx;
                forces[spring.b][1] -= fy;
            }

            let mut max_force = 0.0_f64;
            for (i, force) in forces.iter().enumerate() {
                if fixed[i] {
                    continue;
                }
                let magnitude = force[0].hypot(force[1]);
                positions[i][0] += step_size * force[0];
                positions[i][1] += step_size * force[1];
                if !magnitude.is_finite() || !positions[i].iter().all(|p| p.is_finite()) {
                    warn!(iteration, node = %ids[i], "relaxation diverged");
                    return Err(DegradationError::Diverged { iteration });
                }
                max_force = max_force.max(magnitude);
            }

            report.iterations += 1;
            report.max_force = max_force;
            report.force_history.push(max_force);
            if max_force < tolerance {
                report.converged = true;
                break;
            }
        }

        for (i, id) in ids.iter().enumerate() {
            if !fixed[i] {
                network.set_node_position(*id, Position::new(positions[i][0], positions[i][1]))?;
            }
        }

        if report.converged {
            debug!(
                iterations = report.iterations,
                max_force = report.max_force,
                "relaxation converged"
            );
        } else {
            warn!(
                iterations = report.iterations,
                max_force = report.max_force,
                "relaxation hit iteration cap"
            );
        }
        Ok(report)
    }
}

fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    (b[0] - a[0]).hypot(b[1] - a[1])
}

impl DegradationStrategy for SpringForceStrategy {
    fn degrade_edge(&self, network: &Network, edge: EdgeId) -> DegradationResult<Network> {
        let mut degraded = network.clone();
        degraded
            .remove_edge(edge)
            .ok_or(DegradationError::EdgeNotFound(edge))?;
        self.relax_in_place(&mut degraded)?;
        debug!(%edge, "edge degraded and relaxed");
        Ok(degraded)
    }

    fn degrade_node(&self, network: &Network, node: NodeId) -> DegradationResult<Network> {
        let mut degraded = network.clone();
        degraded
            .remove_node(node)
            .ok_or(DegradationError::NodeNotFound(node))?;
        for edge in degraded.incident_edge_ids(node) {
            degraded.remove_edge(edge);
        }
        self.relax_in_place(&mut degraded)?;
        debug!(%node, "node degraded and relaxed");
        Ok(degraded)
    }

    fn relax(&self, network: &Network) -> DegradationResult<Network> {
        self.relax_with_report(network).map(|(relaxed, _)| relaxed)
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::SpringForce2d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibrinet_network::{builtin, Edge, Node, Row, Scalar, META_STIFFNESS};

    const EPS: f64 = 1e-4;

    /// fixed(0,0) - free(x,0) - fixed(3,0), rest lengths 1
    fn anchored_chain(x: f64) -> Network {
        let mut net = Network::new(builtin::network_2d());
        net.add_node(Node::fixable(1, 0.0, 0.0, true)).unwrap();
        net.add_node(Node::fixable(2, x, 0.0, false)).unwrap();
        net.add_node(Node::fixable(3, 3.0, 0.0, true)).unwrap();
        net.add_edge(Edge::with_rest_length(1, 1, 2, 1.0)).unwrap();
        net.add_edge(Edge::with_rest_length(2, 2, 3, 1.0)).unwrap();
        net
    }

    fn x_of(net: &Network, id: i64) -> f64 {
        net.get_node(NodeId(id))
            .and_then(Node::position)
            .map_or(f64::NAN, |p| p.x)
    }

    #[test]
    fn chain_converges_to_midpoint() {
        let (relaxed, report) = SpringForceStrategy::new()
            .relax_with_report(&anchored_chain(1.2))
            .unwrap();

        assert!(report.converged);
        assert!(report.iterations < 1000);
        assert!((x_of(&relaxed, 2) - 1.5).abs() < EPS);
        assert!(report
            .force_history
            .windows(2)
            .all(|w| w[1] <= w[0] + 1e-12));
    }

    #[test]
    fn nan_position_is_not_reported_converged() {
        let mut net = Network::new(builtin::network_2d());
        net.add_node(Node::planar(1, f64::NAN, 0.0)).unwrap();
        net.add_node(Node::planar(2, 1.0, 0.0)).unwrap();
        net.add_node(Node::planar(3, 2.0, 0.0)).unwrap();
        net.add_edge(Edge::with_rest_length(1, 1, 2, 0.5)).unwrap();
        net.add_edge(Edge::with_rest_length(2, 2, 3, 0.5)).unwrap();

        let err = SpringForceStrategy::new().relax_with_report(&net).unwrap_err();
        assert_eq!(err, DegradationError::Diverged { iteration: 1 });
    }

    #[test]
    fn oversized_step_diverges_instead_of_overflowing() {
        let params = RelaxationParams::default().with_step_size(10.0);
        let err = SpringForceStrategy::with_params(params)
            .relax(&anchored_chain(1.2))
            .unwrap_err();
        assert!(matches!(err, DegradationError::Diverged { iteration } if iteration > 1));
    }

    #[test]
    fn fixed_nodes_never_move() {
        let relaxed = SpringForceStrategy::new().relax(&anchored_chain(2.5)).unwrap();
        assert!((x_of(&relaxed, 1) - 0.0).abs() < f64::EPSILON);
        assert!((x_of(&relaxed, 3) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn input_is_not_modified() {
        let net = anchored_chain(1.2);
        let _ = SpringForceStrategy::new().relax(&net).unwrap();
        assert!((x_of(&net, 2) - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_rest_length_freezes_current_length() {
        let mut net = Network::new(builtin::network_2d());
        net.add_node(Node::planar(1, 0.0, 0.0)).unwrap();
        net.add_node(Node::planar(2, 2.0, 0.0)).unwrap();
        net.add_edge(Edge::new(1, 1, 2)).unwrap();

        let (relaxed, report) = SpringForceStrategy::new().relax_with_report(&net).unwrap();
        assert!(report.converged);
        assert_eq!(report.iterations, 1);
        assert_eq!(relaxed, net);
    }

    #[test]
    fn stiffness_scales_force() {
        let mut net = anchored_chain(1.2);
        net.add_meta(META_STIFFNESS, 2.0).unwrap();
        let params = RelaxationParams::default().with_max_iterations(1);
        let (_, report) = SpringForceStrategy::with_params(params)
            .relax_with_report(&net)
            .unwrap();
        // net force on the free node: 2 * ((1.8 - 1) - (1.2 - 1))
        assert!((report.max_force - 1.2).abs() < 1e-9);
        assert!(!report.converged);
    }

    #[test]
    fn zero_length_edge_contributes_nothing() {
        let mut net = Network::new(builtin::network_2d());
        net.add_node(Node::planar(1, 1.0, 1.0)).unwrap();
        net.add_node(Node::planar(2, 1.0, 1.0)).unwrap();
        net.add_edge(Edge::with_rest_length(1, 1, 2, 5.0)).unwrap();

        let (relaxed, report) = SpringForceStrategy::new().relax_with_report(&net).unwrap();
        assert!(report.converged);
        assert_eq!(relaxed, net);
    }

    #[test]
    fn node_without_position_is_an_error() {
        let mut net = Network::new(builtin::network_2d());
        let mut attrs = Row::new();
        attrs.insert("n_id".to_string(), Scalar::Int(7));
        net.add_node(Node::from_attributes(builtin::node(), &attrs).unwrap())
            .unwrap();

        let err = SpringForceStrategy::new().relax(&net).unwrap_err();
        assert_eq!(err, DegradationError::MissingPosition(NodeId(7)));
    }

    #[test]
    fn degrade_edge_relaxes_remaining_springs() {
        let net = anchored_chain(1.2);
        let out = SpringForceStrategy::new().degrade_edge(&net, EdgeId(2)).unwrap();
        // only the left spring remains and pulls the free node to rest length
        assert!((x_of(&out, 2) - 1.0).abs() < EPS);
        assert_eq!(out.node_count(), 3);
    }

    #[test]
    fn degrade_node_keeps_isolated_nodes() {
        let out = SpringForceStrategy::new()
            .degrade_node(&anchored_chain(1.2), NodeId(2))
            .unwrap();
        assert_eq!(out.node_count(), 2);
        assert_eq!(out.edge_count(), 0);
    }

    #[test]
    fn missing_targets_are_errors() {
        let net = anchored_chain(1.2);
        let strategy = SpringForceStrategy::new();
        assert_eq!(
            strategy.degrade_edge(&net, EdgeId(9)).unwrap_err(),
            DegradationError::EdgeNotFound(EdgeId(9))
        );
        assert_eq!(
            strategy.degrade_node(&net, NodeId(9)).unwrap_err(),
            DegradationError::NodeNotFound(NodeId(9))
        );
    }
}
