use thiserror::Error;

use tour_avail::AvailError;
use tour_core::CoreError;
use tour_dispatch::DispatchError;
use tour_graph::GraphError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("invalid configuration: {0}")]
    Core(#[from] CoreError),

    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("availability error: {0}")]
    Availability(#[from] AvailError),
}

pub type SimResult<T> = Result<T, SimError>;
