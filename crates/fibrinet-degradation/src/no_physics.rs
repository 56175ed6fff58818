//! Graph-only degradation
//!
//! Removes the target, then prunes every node left without an incident
//! edge. Positions are never touched.

use crate::error::{DegradationError, DegradationResult};
use crate::strategy::{DegradationStrategy, StrategyKind};
use fibrinet_network::{EdgeId, Network, NodeId};
use tracing::debug;

/// Graph-only degradation strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPhysicsStrategy;

impl NoPhysicsStrategy {
    /// Create strategy
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DegradationStrategy for NoPhysicsStrategy {
    fn degrade_edge(&self, network: &Network, edge: EdgeId) -> DegradationResult<Network> {
        let mut degraded = network.clone();
        degraded
            .remove_edge(edge)
            .ok_or(DegradationError::EdgeNotFound(edge))?;
        let pruned = degraded.prune_isolated_nodes();
        debug!(%edge, pruned = pruned.len(), "edge degraded");
        Ok(degraded)
    }

    fn degrade_node(&self, network: &Network, node: NodeId) -> DegradationResult<Network> {
        let mut degraded = network.clone();
        degraded
            .remove_node(node)
            .ok_or(DegradationError::NodeNotFound(node))?;
        let incident = degraded.incident_edge_ids(node);
        for edge in &incident {
            degraded.remove_edge(*edge);
        }
        let pruned = degraded.prune_isolated_nodes();
        debug!(%node, edges = incident.len(), pruned = pruned.len(), "node degraded");
        Ok(degraded)
    }

    fn relax(&self, network: &Network) -> DegradationResult<Network> {
        Ok(network.clone())
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::NoPhysics
    }
}
