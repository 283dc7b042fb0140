use std::time::Duration;

use thiserror::Error;

use tour_core::{AgentId, Timestamp};

#[derive(Debug, Error)]
pub enum AvailError {
    #[error("agent {agent} is already out of service until {available_at}")]
    InvalidState {
        agent:        AgentId,
        available_at: Timestamp,
    },

    #[error("out-of-service duration {duration:?} must be positive and at most {max:?}")]
    InvalidDuration {
        duration: Duration,
        max:      Duration,
    },

    #[error("agent {0} is not registered")]
    UnknownAgent(AgentId),

    #[error("agent name {0:?} is already registered")]
    DuplicateAgent(String),
}

pub type AvailResult<T> = Result<T, AvailError>;
