//! FibriNet degradation strategies
//!
//! Pluggable algorithms that turn a network into its degraded successor.
//!
//! # Core Concepts
//!
//! - [`DegradationStrategy`]: core trait; every operation returns a fresh
//!   network and leaves its input untouched
//! - [`NoPhysicsStrategy`]: graph-only edits with isolated-node pruning
//! - [`SpringForceStrategy`]: edits followed by planar spring relaxation
//! - [`StrategyKind`] / [`Strategy`]: selection by name and runtime dispatch
//!
//! # Example
//!
//! ```rust,ignore
//! use fibrinet_degradation::{DegradationStrategy, RelaxationParams, Strategy};
//!
//! let strategy = Strategy::from_name("spring_force_2d", RelaxationParams::default())?;
//! let degraded = strategy.degrade_edge(&network, EdgeId(3))?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod no_physics;
mod spring;
mod strategy;

// Re-exports
pub use error::{DegradationError, DegradationResult};
pub use no_physics::NoPhysicsStrategy;
pub use spring::{RelaxationParams, RelaxationReport, SpringForceStrategy};
pub use strategy::{DegradationStrategy, Strategy, StrategyKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
