//! Per-agent status and transition events.

use std::fmt;

use tour_core::{AgentId, Timestamp};

/// Availability of one secondary agent.
///
/// The recovery time lives inside the `OutOfService` variant, so an agent
/// has an `available_at` exactly when it is out of service.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum AgentStatus {
    #[default]
    Available,
    OutOfService { available_at: Timestamp },
}

impl AgentStatus {
    #[inline]
    pub fn is_available(self) -> bool {
        matches!(self, AgentStatus::Available)
    }

    #[inline]
    pub fn available_at(self) -> Option<Timestamp> {
        match self {
            AgentStatus::Available => None,
            AgentStatus::OutOfService { available_at } => Some(available_at),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Available           => "available",
            AgentStatus::OutOfService { .. } => "out_of_service",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentStatus::Available => f.write_str("Available"),
            AgentStatus::OutOfService { available_at } => {
                write!(f, "OutOfService(until {available_at})")
            }
        }
    }
}

/// A registered secondary agent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecondaryAgent {
    pub id:     AgentId,
    pub name:   String,
    pub status: AgentStatus,
}

/// What happened in a [`StatusChange`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StatusChangeKind {
    WentOutOfService { available_at: Timestamp },
    Recovered,
}

/// Observable record of one availability transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusChange {
    pub agent: AgentId,
    pub name:  String,
    pub at:    Timestamp,
    pub kind:  StatusChangeKind,
}

impl fmt::Display for StatusChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StatusChangeKind::WentOutOfService { available_at } => write!(
                f,
                "{} is out of service until {available_at}",
                self.name
            ),
            StatusChangeKind::Recovered => write!(f, "{} is available again", self.name),
        }
    }
}
