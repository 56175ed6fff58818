//! Command surface over the factory, strategy and history
//!
//! A [`NetworkSession`] is what a front-end drives: it builds the initial
//! network from raw input, hands the current snapshot to the active
//! strategy for every edit and records each result in the history.
//! Commands other than [`NetworkSession::load`] are refused with
//! [`CoreError::StateTransition`] until a network has been loaded.

use crate::command::Command;
use crate::config::SessionConfig;
use crate::error::{CoreError, CoreResult};
use crate::state::{HistoryExport, NetworkStateManager, ReadinessFlags};
use fibrinet_degradation::{DegradationStrategy, RelaxationReport, Strategy, StrategyKind};
use fibrinet_network::{EdgeId, Network, NetworkFactory, NodeId, RawNetworkData};
use tracing::{debug, info};

/// Interactive degradation session
#[derive(Debug, Clone)]
pub struct NetworkSession {
    factory: NetworkFactory,
    manager: NetworkStateManager,
    strategy: Strategy,
    config: SessionConfig,
}

impl NetworkSession {
    /// Create a session with the built-in variants registered
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_factory(NetworkFactory::with_defaults(), config)
    }

    /// Create a session over a caller-populated factory
    #[must_use]
    pub fn with_factory(factory: NetworkFactory, config: SessionConfig) -> Self {
        Self {
            factory,
            manager: NetworkStateManager::with_new_network_mode(config.new_network_mode),
            strategy: Strategy::from_kind(config.strategy, config.relaxation),
            config,
        }
    }

    /// Build a network from `raw` and make it the only snapshot.
    ///
    /// On failure the previous history is left as it was.
    ///
    /// # Errors
    /// Any [`fibrinet_network::NetworkError`] raised by the factory
    pub fn load(&mut self, raw: &RawNetworkData) -> CoreResult<ReadinessFlags> {
        let network = self.factory.create_network(raw)?;
        info!(
            variant = network.variant().name(),
            nodes = network.node_count(),
            edges = network.edge_count(),
            "network loaded"
        );
        self.manager.reset();
        self.manager.push_state(network);
        Ok(self.manager.flags())
    }

    /// Degrade an edge of the current snapshot and record the result.
    ///
    /// # Errors
    /// [`CoreError::StateTransition`] before load, or the strategy's
    /// failure (the history is unchanged in both cases)
    pub fn degrade_edge(&mut self, edge: EdgeId) -> CoreResult<ReadinessFlags> {
        let next = self.strategy.degrade_edge(self.loaded()?, edge)?;
        info!(%edge, strategy = self.strategy.name(), "edge degraded");
        Ok(self.record(next))
    }

    /// Degrade a node of the current snapshot and record the result.
    ///
    /// # Errors
    /// As [`NetworkSession::degrade_edge`]
    pub fn degrade_node(&mut self, node: NodeId) -> CoreResult<ReadinessFlags> {
        let next = self.strategy.degrade_node(self.loaded()?, node)?;
        info!(%node, strategy = self.strategy.name(), "node degraded");
        Ok(self.record(next))
    }

    /// Relax the current snapshot and record the result.
    ///
    /// # Errors
    /// As [`NetworkSession::degrade_edge`]
    pub fn relax(&mut self) -> CoreResult<RelaxationReport> {
        let (next, report) = self.strategy.relax_with_report(self.loaded()?)?;
        info!(
            strategy = self.strategy.name(),
            iterations = report.iterations,
            converged = report.converged,
            "network relaxed"
        );
        self.record(next);
        Ok(report)
    }

    /// Step back one snapshot. Returns whether the cursor moved.
    ///
    /// # Errors
    /// [`CoreError::StateTransition`] before load
    pub fn undo(&mut self) -> CoreResult<bool> {
        self.loaded()?;
        let moved = self.manager.undo();
        debug!(moved, "undo requested");
        Ok(moved)
    }

    /// Step forward one snapshot. Returns whether the cursor moved.
    ///
    /// # Errors
    /// [`CoreError::StateTransition`] before load
    pub fn redo(&mut self) -> CoreResult<bool> {
        self.loaded()?;
        let moved = self.manager.redo();
        debug!(moved, "redo requested");
        Ok(moved)
    }

    /// Swap the active strategy. The history is untouched.
    ///
    /// # Errors
    /// [`CoreError::StateTransition`] before load,
    /// [`fibrinet_degradation::DegradationError::UnknownStrategy`] for an
    /// unknown name
    pub fn set_strategy(&mut self, name: &str) -> CoreResult<StrategyKind> {
        self.loaded()?;
        self.strategy = Strategy::from_name(name, self.config.relaxation)?;
        info!(strategy = self.strategy.name(), "strategy selected");
        Ok(self.strategy.kind())
    }

    /// Drop the loaded network and its history
    pub fn reset(&mut self) {
        self.manager.reset();
        info!("session reset");
    }

    /// Full history for export.
    ///
    /// # Errors
    /// [`CoreError::StateTransition`] while export is disabled
    pub fn export(&self) -> CoreResult<HistoryExport<'_>> {
        self.manager.export_history()
    }

    /// Run a parsed command
    ///
    /// # Errors
    /// Whatever the underlying operation returns
    pub fn apply(&mut self, command: &Command) -> CoreResult<ReadinessFlags> {
        debug!(%command, "applying command");
        match command {
            Command::DegradeEdge(edge) => return self.degrade_edge(*edge),
            Command::DegradeNode(node) => return self.degrade_node(*node),
            Command::Relax => {
                self.relax()?;
            }
            Command::Undo => {
                self.undo()?;
            }
            Command::Redo => {
                self.redo()?;
            }
            Command::SetStrategy(name) => {
                self.set_strategy(name)?;
            }
            Command::Reset => self.reset(),
        }
        Ok(self.manager.flags())
    }

    /// Current readiness flags
    #[inline]
    #[must_use]
    pub fn flags(&self) -> ReadinessFlags {
        self.manager.flags()
    }

    /// Snapshot under the cursor
    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<&Network> {
        self.manager.current_state()
    }

    /// Underlying history
    #[inline]
    #[must_use]
    pub fn manager(&self) -> &NetworkStateManager {
        &self.manager
    }

    /// Factory used by [`NetworkSession::load`]
    #[inline]
    #[must_use]
    pub fn factory(&self) -> &NetworkFactory {
        &self.factory
    }

    /// Active strategy kind
    #[inline]
    #[must_use]
    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Configuration the session was built with
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn loaded(&self) -> CoreResult<&Network> {
        self.manager
            .current_state()
            .ok_or_else(|| CoreError::state_transition("no network loaded"))
    }

    fn record(&mut self, next: Network) -> ReadinessFlags {
        self.manager.push_state(next);
        self.manager.flags()
    }
}

impl Default for NetworkSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
