//! Core error type for the colony engine
//!
//! Only precondition violations are errors. Degenerate search outcomes
//! (no candidates, empty path) are ordinary empty results.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ColonyError {
    /// A module id was referenced that does not exist in the graph.
    #[error("unknown module: {0}")]
    UnknownModule(String),

    /// A learner id was referenced that has never been registered.
    #[error("unknown learner: {0}")]
    UnknownLearner(String),

    /// The colony was constructed over a graph with no modules.
    #[error("module graph is empty")]
    EmptyGraph,
}
