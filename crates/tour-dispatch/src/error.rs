use thiserror::Error;

use tour_avail::AvailError;
use tour_core::NodeId;
use tour_graph::GraphError;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("assign_next called with an empty visitor queue")]
    EmptyQueue,

    #[error("routing agent is still moving along {remaining} hop(s)")]
    RoutingAgentBusy { remaining: usize },

    #[error("no secondary agent is responsible for destination {0}")]
    UnmappedDestination(NodeId),

    #[error("dispatch configuration error: {0}")]
    Config(String),

    #[error("routing failed: {0}")]
    Graph(#[from] GraphError),

    #[error("availability error: {0}")]
    Availability(#[from] AvailError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
