//! Network snapshot history
//!
//! [`NetworkStateManager`] owns an ordered sequence of independent network
//! snapshots and a cursor into it. Recording a snapshot truncates anything
//! after the cursor, so redo history is a single branch. The three
//! [`ReadinessFlags`] are recomputed after every transition.
//!
//! # State Transitions
//!
//! ```text
//! Empty ──add_new_state──► HasCurrent { index }
//!   ▲                          │  ▲
//!   └──────── reset ───────────┘  └── add_new_state / undo / redo
//! ```

use crate::error::{CoreError, CoreResult};
use fibrinet_network::Network;
use serde::Serialize;
use tracing::debug;

/// Minimum node count for export in new-network mode
pub const MIN_EXPORT_NODES: usize = 2;
/// Minimum edge count for export in new-network mode
pub const MIN_EXPORT_EDGES: usize = 1;

/// UI affordance flags derived from the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadinessFlags {
    /// No earlier snapshot to return to
    pub undo_disabled: bool,
    /// No later snapshot to move to
    pub redo_disabled: bool,
    /// Current snapshot is not fit for export
    pub export_disabled: bool,
}

impl ReadinessFlags {
    /// Everything disabled
    #[must_use]
    pub const fn all_disabled() -> Self {
        Self {
            undo_disabled: true,
            redo_disabled: true,
            export_disabled: true,
        }
    }
}

impl Default for ReadinessFlags {
    fn default() -> Self {
        Self::all_disabled()
    }
}

/// Lifecycle state of the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    /// No snapshot recorded
    Empty,
    /// Cursor points at a recorded snapshot
    HasCurrent {
        /// Cursor position
        index: usize,
    },
}

/// Exportable view of the history
#[derive(Debug, Clone, Serialize)]
pub struct HistoryExport<'a> {
    /// Cursor position
    pub current_index: usize,
    /// Readiness at export time
    pub flags: ReadinessFlags,
    /// Every recorded snapshot, oldest first
    pub snapshots: &'a [Network],
}

/// Undo/redo-capable history of network snapshots
#[derive(Debug, Clone, Default)]
pub struct NetworkStateManager {
    history: Vec<Network>,
    current_index: usize,
    flags: ReadinessFlags,
    new_network_mode: bool,
}

impl NetworkStateManager {
    /// Create empty manager
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty manager in new-network mode
    #[must_use]
    pub fn with_new_network_mode(new_network_mode: bool) -> Self {
        Self {
            new_network_mode,
            ..Self::default()
        }
    }

    /// Record a copy of `network` as the new current snapshot
    pub fn add_new_state(&mut self, network: &Network) {
        self.push_state(network.clone());
    }

    /// Record `network` as the new current snapshot, discarding redo history
    pub fn push_state(&mut self, network: Network) {
        if !self.history.is_empty() {
            let discarded = self.history.len() - (self.current_index + 1);
            self.history.truncate(self.current_index + 1);
            if discarded > 0 {
                debug!(discarded, "redo branch discarded");
            }
        }
        self.history.push(network);
        self.current_index = self.history.len() - 1;
        self.flags.undo_disabled = self.history.len() <= 1;
        self.flags.redo_disabled = true;
        self.refresh_export();
        debug!(index = self.current_index, len = self.history.len(), "state recorded");
    }

    /// Step back one snapshot. Returns whether the cursor moved.
    pub fn undo(&mut self) -> bool {
        if self.flags.undo_disabled || self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        self.flags.redo_disabled = false;
        self.flags.undo_disabled = self.current_index == 0;
        self.refresh_export();
        debug!(index = self.current_index, "undo");
        true
    }

    /// Step forward one snapshot. Returns whether the cursor moved.
    pub fn redo(&mut self) -> bool {
        let Some(last) = self.history.len().checked_sub(1) else {
            return false;
        };
        if self.flags.redo_disabled || self.current_index >= last {
            return false;
        }
        self.current_index += 1;
        self.flags.undo_disabled = false;
        self.flags.redo_disabled = self.current_index == last;
        self.refresh_export();
        debug!(index = self.current_index, "redo");
        true
    }

    /// Drop every snapshot
    pub fn reset(&mut self) {
        self.history.clear();
        self.current_index = 0;
        self.flags = ReadinessFlags::all_disabled();
        debug!("history reset");
    }

    /// Lifecycle state
    #[must_use]
    pub fn state(&self) -> ManagerState {
        if self.history.is_empty() {
            ManagerState::Empty
        } else {
            ManagerState::HasCurrent {
                index: self.current_index,
            }
        }
    }

    /// First recorded snapshot
    #[inline]
    #[must_use]
    pub fn base_state(&self) -> Option<&Network> {
        self.history.first()
    }

    /// Snapshot under the cursor
    #[inline]
    #[must_use]
    pub fn current_state(&self) -> Option<&Network> {
        self.history.get(self.current_index)
    }

    /// All snapshots, oldest first
    #[inline]
    #[must_use]
    pub fn history(&self) -> &[Network] {
        &self.history
    }

    /// Cursor position
    #[inline]
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Readiness flags
    #[inline]
    #[must_use]
    pub fn flags(&self) -> ReadinessFlags {
        self.flags
    }

    /// Whether export requires a minimum network size
    #[inline]
    #[must_use]
    pub fn new_network_mode(&self) -> bool {
        self.new_network_mode
    }

    /// Switch new-network mode and recompute export readiness
    pub fn set_new_network_mode(&mut self, enabled: bool) {
        self.new_network_mode = enabled;
        self.refresh_export();
    }

    /// Full history for export.
    ///
    /// # Errors
    /// [`CoreError::StateTransition`] while export is disabled
    pub fn export_history(&self) -> CoreResult<HistoryExport<'_>> {
        if self.flags.export_disabled {
            return Err(CoreError::state_transition(
                "export is disabled for the current network",
            ));
        }
        Ok(HistoryExport {
            current_index: self.current_index,
            flags: self.flags,
            snapshots: &self.history,
        })
    }

    fn refresh_export(&mut self) {
        self.flags.export_disabled = match self.current_state() {
            None => true,
            Some(current)
                if self.new_network_mode
                    && (current.node_count() < MIN_EXPORT_NODES
                        || current.edge_count() < MIN_EXPORT_EDGES) =>
            {
                true
            }
            Some(current) => !current.missing_required_meta().is_empty(),
        };
    }
}
