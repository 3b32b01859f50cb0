//! antpath - ant-colony learning path optimizer
//!
//! Recommends a sequence of learning modules for a learner by running an
//! ACO-style search over a directed module graph. Pheromone trails are
//! reinforced by successful learner outcomes and decay over time; the
//! probabilistic walk balances that accumulated evidence against a
//! learner-specific attractiveness score.
//!
//! The engine is a plain owned value with no global state: construct a
//! [`Colony`] over a [`graph::ModuleGraph`], feed it progress events, and
//! ask it to optimize a route toward a target module. All operations are
//! single-threaded and synchronous; callers needing concurrent runs must
//! clone the colony or serialize access themselves.

pub mod colony;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod learner;
pub mod session;
pub mod trail;

pub use colony::{Colony, ColonyStats, OptimizationResult, ProgressOutcome};
pub use config::ColonyConfig;
pub use error::ColonyError;
pub use graph::{Module, ModuleGraph};
pub use learner::{LearnerProfile, LearningStyle};
pub use trail::{PheromoneTrail, TrailStore};
