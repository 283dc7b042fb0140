//! Navigation-graph error type.

use thiserror::Error;

use tour_core::NodeId;

/// Errors produced by `tour-graph`.
///
/// `UnknownNode` and `NoPath` are configuration errors: a destination that
/// does not exist or cannot be reached is never a normal dispatch outcome.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    UnknownNode(NodeId),

    #[error("node {0} declared more than once")]
    DuplicateNode(NodeId),

    #[error("edge from {0} to itself")]
    SelfLoop(NodeId),

    #[error("topology parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
