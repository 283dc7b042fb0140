//! The `AvailabilityTracker`: owns every secondary agent's status.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::info;

use tour_core::{AgentId, Timestamp};

use crate::{
    AgentStatus, AvailError, AvailResult, RecoveryQueue, SecondaryAgent, StatusChange,
    StatusChangeKind,
};

// ── OosPolicy ─────────────────────────────────────────────────────────────────

/// Bounds on out-of-service episodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OosPolicy {
    /// Longest permitted episode (the "OOS threshold").  Default: 5 s.
    pub max_duration: Duration,
}

impl OosPolicy {
    pub fn new(max_duration: Duration) -> Self {
        Self { max_duration }
    }

    /// Check `duration` against the policy: positive and at most
    /// `max_duration`.
    pub fn validate(&self, duration: Duration) -> AvailResult<()> {
        if duration.is_zero() || duration > self.max_duration {
            return Err(AvailError::InvalidDuration { duration, max: self.max_duration });
        }
        Ok(())
    }
}

impl Default for OosPolicy {
    fn default() -> Self {
        Self { max_duration: Duration::from_secs(5) }
    }
}

// ── AvailabilityTracker ───────────────────────────────────────────────────────

/// Status store and state machine for all secondary agents.
///
/// Agents are registered once at startup and never removed.  The step loop
/// must call [`reconcile`](Self::reconcile) at the start of every tick, before
/// any availability query that feeds a dispatch decision.
#[derive(Debug, Default)]
pub struct AvailabilityTracker {
    /// Registered agents, indexed by `AgentId`.
    agents: Vec<SecondaryAgent>,

    /// Name → id, for configuration lookups.
    by_name: BTreeMap<String, AgentId>,

    /// Pending recoveries.
    recovery: RecoveryQueue,

    policy: OosPolicy,
}

impl AvailabilityTracker {
    pub fn new(policy: OosPolicy) -> Self {
        Self { policy, ..Self::default() }
    }

    /// Register a new agent in the `Available` state.
    pub fn register(&mut self, name: impl Into<String>) -> AvailResult<AgentId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(AvailError::DuplicateAgent(name));
        }
        let id = AgentId(self.agents.len() as u32);
        self.by_name.insert(name.clone(), id);
        self.agents.push(SecondaryAgent { id, name, status: AgentStatus::Available });
        Ok(id)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn policy(&self) -> OosPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.agents.len()
    }

    /// Look up an agent id by its registered name.
    pub fn find(&self, name: &str) -> Option<AgentId> {
        self.by_name.get(name).copied()
    }

    pub fn agent(&self, agent: AgentId) -> AvailResult<&SecondaryAgent> {
        self.agents.get(agent.index()).ok_or(AvailError::UnknownAgent(agent))
    }

    /// All registered agents in id order.
    pub fn agents(&self) -> &[SecondaryAgent] {
        &self.agents
    }

    /// Stored status, as of the last reconciliation.
    pub fn status(&self, agent: AgentId) -> AvailResult<AgentStatus> {
        self.agent(agent).map(|a| a.status)
    }

    /// `true` if `agent` is registered and `Available`.  Pure read: an
    /// expired episode still reads as unavailable until
    /// [`reconcile`](Self::reconcile) runs.
    pub fn is_available(&self, agent: AgentId) -> bool {
        self.agents
            .get(agent.index())
            .is_some_and(|a| a.status.is_available())
    }

    /// Status evaluated against `now` without mutating anything: an agent
    /// whose recovery time has passed reads as `Available`.
    pub fn status_at(&self, agent: AgentId, now: Timestamp) -> AvailResult<AgentStatus> {
        Ok(match self.status(agent)? {
            AgentStatus::OutOfService { available_at } if available_at <= now => {
                AgentStatus::Available
            }
            status => status,
        })
    }

    /// Earliest pending recovery, if any agent is out of service.
    pub fn next_recovery(&self) -> Option<Timestamp> {
        self.recovery.next_due()
    }

    /// Number of agents currently out of service.
    pub fn out_of_service_count(&self) -> usize {
        self.agents.iter().filter(|a| !a.status.is_available()).count()
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Take `agent` out of service for `duration` starting at `now`.
    ///
    /// Timestamps have millisecond resolution, so a fractional millisecond
    /// is rounded up: the episode never ends before `now + duration`.
    ///
    /// # Errors
    ///
    /// - [`AvailError::InvalidState`] if the agent is already out of service.
    /// - [`AvailError::InvalidDuration`] if `duration` is zero or exceeds the
    ///   policy's `max_duration`.
    pub fn go_out_of_service(
        &mut self,
        agent:    AgentId,
        duration: Duration,
        now:      Timestamp,
    ) -> AvailResult<StatusChange> {
        let policy = self.policy;
        let entry = self
            .agents
            .get_mut(agent.index())
            .ok_or(AvailError::UnknownAgent(agent))?;

        if let AgentStatus::OutOfService { available_at } = entry.status {
            return Err(AvailError::InvalidState { agent, available_at });
        }
        policy.validate(duration)?;

        let available_at = now + ceil_millis(duration);
        entry.status = AgentStatus::OutOfService { available_at };
        self.recovery.push(available_at, agent);

        info!(
            agent = %entry.name,
            duration_ms = available_at.as_millis() - now.as_millis(),
            %available_at,
            "secondary agent out of service"
        );

        Ok(StatusChange {
            agent,
            name: entry.name.clone(),
            at:   now,
            kind: StatusChangeKind::WentOutOfService { available_at },
        })
    }

    /// Return every out-of-service agent whose recovery time is at or before
    /// `now` to `Available`.
    ///
    /// Idempotent: a second call with the same `now` changes nothing and
    /// returns an empty list.
    pub fn reconcile(&mut self, now: Timestamp) -> Vec<StatusChange> {
        let mut changes = Vec::new();
        for (due, agent) in self.recovery.drain_due(now) {
            let Some(entry) = self.agents.get_mut(agent.index()) else {
                continue;
            };
            // Only act on the episode this entry was scheduled for.
            if entry.status != (AgentStatus::OutOfService { available_at: due }) {
                continue;
            }
            entry.status = AgentStatus::Available;
            info!(agent = %entry.name, %now, "secondary agent available again");
            changes.push(StatusChange {
                agent,
                name: entry.name.clone(),
                at:   now,
                kind: StatusChangeKind::Recovered,
            });
        }
        changes
    }
}

/// `duration` rounded up to a whole number of milliseconds.
fn ceil_millis(duration: Duration) -> Duration {
    let extra = u128::from(duration.subsec_nanos() % 1_000_000 != 0);
    let ms = duration.as_millis().saturating_add(extra);
    Duration::from_millis(u64::try_from(ms).unwrap_or(u64::MAX))
}
