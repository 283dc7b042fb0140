//! Visitors and the FIFO dispatch queue.

use std::collections::VecDeque;
use std::fmt;

use tour_core::{NodeId, SimRng, VisitorId};

use crate::{DispatchError, DispatchResult};

/// A visitor waiting to be escorted.  Immutable once generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Visitor {
    pub id:          VisitorId,
    pub destination: NodeId,
}

impl fmt::Display for Visitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Visitors are numbered from 1 for display.
        write!(f, "Visitor {}", self.id.0 + 1)
    }
}

/// How the visitor sequence is produced at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VisitorPolicy {
    /// `count` visitors, each with a destination drawn uniformly from the
    /// candidate nodes.
    Random { count: usize },
    /// Exactly these destinations, in this order.
    Fixed(Vec<NodeId>),
}

impl Default for VisitorPolicy {
    fn default() -> Self {
        VisitorPolicy::Random { count: 5 }
    }
}

/// Ordered queue of visitors still to be dispatched.
///
/// Visitors leave the queue exactly once, front to back.  There is no
/// priority and no retry: a visitor whose dispatch fails is not re-queued.
#[derive(Clone, Debug, Default)]
pub struct VisitorQueue {
    pending: VecDeque<Visitor>,
    total:   usize,
}

impl VisitorQueue {
    /// Build a queue from destinations in order, numbering visitors from 0.
    pub fn from_destinations<I: IntoIterator<Item = NodeId>>(destinations: I) -> Self {
        let pending: VecDeque<Visitor> = destinations
            .into_iter()
            .enumerate()
            .map(|(i, destination)| Visitor { id: VisitorId(i as u32), destination })
            .collect();
        let total = pending.len();
        Self { pending, total }
    }

    /// Generate the visitor sequence for `policy`.
    ///
    /// `candidates` is the set random destinations are drawn from (normally
    /// every graph node).
    ///
    /// # Errors
    ///
    /// [`DispatchError::Config`] if a random policy asks for visitors but
    /// there are no candidate destinations.
    pub fn generate(
        policy:     &VisitorPolicy,
        candidates: &[NodeId],
        rng:        &mut SimRng,
    ) -> DispatchResult<Self> {
        match policy {
            VisitorPolicy::Fixed(destinations) => Ok(Self::from_destinations(destinations.iter().copied())),
            VisitorPolicy::Random { count } => {
                if *count > 0 && candidates.is_empty() {
                    return Err(DispatchError::Config(
                        "random visitor policy needs at least one candidate destination".into(),
                    ));
                }
                let destinations: Vec<NodeId> = (0..*count)
                    .filter_map(|_| rng.choose(candidates).copied())
                    .collect();
                Ok(Self::from_destinations(destinations))
            }
        }
    }

    /// Remove and return the next visitor.
    pub fn pop_next(&mut self) -> Option<Visitor> {
        self.pending.pop_front()
    }

    /// Put a visitor back at the front after a fatal error so the queue is
    /// left as it was before the failed call.
    pub(crate) fn restore_front(&mut self, visitor: Visitor) {
        self.pending.push_front(visitor);
    }

    pub fn peek(&self) -> Option<&Visitor> {
        self.pending.front()
    }

    /// Visitors still waiting, front first.
    pub fn iter(&self) -> impl Iterator<Item = &Visitor> + '_ {
        self.pending.iter()
    }

    /// Visitors still waiting.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Visitors generated at startup.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Visitors already taken from the queue.
    pub fn dispatched(&self) -> usize {
        self.total - self.pending.len()
    }
}
