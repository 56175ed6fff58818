//! Degradation strategy trait and selection
//!
//! Provides the [`DegradationStrategy`] trait, the closed set of
//! [`StrategyKind`] names and the [`Strategy`] enum used to swap engines at
//! runtime.

use crate::error::{DegradationError, DegradationResult};
use crate::no_physics::NoPhysicsStrategy;
use crate::spring::{RelaxationParams, RelaxationReport, SpringForceStrategy};
use fibrinet_network::{EdgeId, Network, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Algorithm that turns a network into its degraded successor
///
/// Every operation is pure with respect to its input: the given network is
/// never modified and a fresh network is returned.
pub trait DegradationStrategy: Send + Sync + fmt::Debug {
    /// Remove an edge and apply the strategy's follow-up
    ///
    /// # Errors
    /// [`DegradationError::EdgeNotFound`] if `edge` is absent
    fn degrade_edge(&self, network: &Network, edge: EdgeId) -> DegradationResult<Network>;

    /// Remove a node with its incident edges and apply the strategy's
    /// follow-up
    ///
    /// # Errors
    /// [`DegradationError::NodeNotFound`] if `node` is absent
    fn degrade_node(&self, network: &Network, node: NodeId) -> DegradationResult<Network>;

    /// Re-equilibrate node positions
    ///
    /// # Errors
    /// Strategy specific
    fn relax(&self, network: &Network) -> DegradationResult<Network>;

    /// Strategy kind
    fn kind(&self) -> StrategyKind;

    /// Strategy name (for logging/serialization)
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Known strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Graph-only edits with isolated-node pruning
    #[default]
    NoPhysics,
    /// Edits followed by planar spring relaxation
    #[serde(rename = "spring_force_2d")]
    SpringForce2d,
}

impl StrategyKind {
    /// Every known kind
    pub const ALL: [StrategyKind; 2] = [Self::NoPhysics, Self::SpringForce2d];

    /// Canonical name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoPhysics => "no_physics",
            Self::SpringForce2d => "spring_force_2d",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = DegradationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| DegradationError::UnknownStrategy {
                name: s.to_string(),
                expected: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}

/// Runtime-selected strategy
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// See [`NoPhysicsStrategy`]
    NoPhysics(NoPhysicsStrategy),
    /// See [`SpringForceStrategy`]
    SpringForce(SpringForceStrategy),
}

impl Strategy {
    /// Build the engine for `kind`
    #[must_use]
    pub fn from_kind(kind: StrategyKind, params: RelaxationParams) -> Self {
        match kind {
            StrategyKind::NoPhysics => Self::NoPhysics(NoPhysicsStrategy::new()),
            StrategyKind::SpringForce2d => {
                Self::SpringForce(SpringForceStrategy::with_params(params))
            }
        }
    }

    /// Resolve a name to an engine.
    ///
    /// # Errors
    /// [`DegradationError::UnknownStrategy`] for unknown names
    pub fn from_name(name: &str, params: RelaxationParams) -> DegradationResult<Self> {
        Ok(Self::from_kind(name.parse()?, params))
    }

    /// Relax and report solver statistics. Engines without a solver
    /// return a copy and an empty converged report.
    ///
    /// # Errors
    /// As [`DegradationStrategy::relax`]
    pub fn relax_with_report(
        &self,
        network: &Network,
    ) -> DegradationResult<(Network, RelaxationReport)> {
        match self {
            Self::NoPhysics(engine) => Ok((engine.relax(network)?, RelaxationReport::default())),
            Self::SpringForce(engine) => engine.relax_with_report(network),
        }
    }

    fn engine(&self) -> &dyn DegradationStrategy {
        match self {
            Self::NoPhysics(engine) => engine,
            Self::SpringForce(engine) => engine,
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::NoPhysics(NoPhysicsStrategy::new())
    }
}

impl DegradationStrategy for Strategy {
    fn degrade_edge(&self, network: &Network, edge: EdgeId) -> DegradationResult<Network> {
        self.engine().degrade_edge(network, edge)
    }

    fn degrade_node(&self, network: &Network, node: NodeId) -> DegradationResult<Network> {
        self.engine().degrade_node(network, node)
    }

    fn relax(&self, network: &Network) -> DegradationResult<Network> {
        self.engine().relax(network)
    }

    fn kind(&self) -> StrategyKind {
        self.engine().kind()
    }
}
