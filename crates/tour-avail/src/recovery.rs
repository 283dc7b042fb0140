//! `RecoveryQueue`: sparse schedule of pending recoveries.
//!
//! Most agents are available most of the time, so scanning every agent on
//! every tick is wasted work.  Instead, going out of service registers the
//! recovery timestamp here and reconciliation drains only the entries that
//! are due: O(due) work per tick rather than O(agents).

use std::collections::BTreeMap;

use tour_core::{AgentId, Timestamp};

/// Ordered mapping of recovery times → agents that recover at that time.
#[derive(Default, Debug)]
pub struct RecoveryQueue {
    inner: BTreeMap<Timestamp, Vec<AgentId>>,
    /// Cached total entry count for O(1) `len()`.
    total: usize,
}

impl RecoveryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `agent` to recover at `at`.
    pub fn push(&mut self, at: Timestamp, agent: AgentId) {
        self.inner.entry(at).or_default().push(agent);
        self.total += 1;
    }

    /// Remove and return every agent scheduled at or before `now`, in
    /// ascending recovery-time order.
    pub fn drain_due(&mut self, now: Timestamp) -> Vec<(Timestamp, AgentId)> {
        let later = match now.0.checked_add(1) {
            Some(next) => self.inner.split_off(&Timestamp(next)),
            None => BTreeMap::new(),
        };
        let due = std::mem::replace(&mut self.inner, later);

        let drained: Vec<(Timestamp, AgentId)> = due
            .into_iter()
            .flat_map(|(at, agents)| agents.into_iter().map(move |a| (at, a)))
            .collect();
        self.total -= drained.len();
        drained
    }

    /// The earliest scheduled recovery, or `None` if empty.
    pub fn next_due(&self) -> Option<Timestamp> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
