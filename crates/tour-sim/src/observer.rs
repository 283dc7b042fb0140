//! Observer hooks and the read-only view handed to presentation code.

use tracing::{debug, info, warn};

use tour_avail::{AvailabilityTracker, StatusChange};
use tour_core::{MetricsCounter, NodeId, Tick, Timestamp};
use tour_dispatch::{Arrival, Assignment, AssignmentOutcome, RoutingAgent, VisitorQueue, ZoneMap};
use tour_graph::NavGraph;

// ── SimView ───────────────────────────────────────────────────────────────────

/// Borrowed snapshot of the simulation at the end of a step.
///
/// Everything here is shared-reference only; an observer cannot mutate core
/// state through it.
#[derive(Clone, Copy)]
pub struct SimView<'a> {
    pub tick:    Tick,
    pub now:     Timestamp,
    pub graph:   &'a NavGraph,
    pub routing: &'a RoutingAgent,
    pub tracker: &'a AvailabilityTracker,
    pub metrics: &'a MetricsCounter,
    pub queue:   &'a VisitorQueue,
    pub zones:   &'a ZoneMap,
}

impl SimView<'_> {
    /// Graph nodes whose responsible secondary agent is out of service.
    pub fn out_of_service_zones(&self) -> Vec<NodeId> {
        self.graph
            .nodes()
            .iter()
            .copied()
            .filter(|&node| {
                self.zones
                    .agent_for(node)
                    .is_some_and(|agent| !self.tracker.is_available(agent))
            })
            .collect()
    }

    /// Visitors still waiting for an escort.
    pub fn waiting(&self) -> usize {
        self.queue.len()
    }
}

// ── SimObserver ───────────────────────────────────────────────────────────────

/// Callbacks invoked by [`Sim::step`][crate::Sim::step].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// Within one step the order is: `on_tick_start`, recoveries via
/// `on_status_change`, `on_arrival`, the assignment (preceded by
/// `on_status_change` if it took an agent out of service), `on_complete` if
/// the run just finished, then `on_tick_end`.
pub trait SimObserver {
    fn on_tick_start(&mut self, _tick: Tick, _now: Timestamp) {}

    /// A secondary agent changed status.
    fn on_status_change(&mut self, _change: &StatusChange) {}

    /// A visitor was taken from the queue and resolved.
    fn on_assignment(&mut self, _assignment: &Assignment) {}

    /// The routing agent delivered a visitor.
    fn on_arrival(&mut self, _arrival: &Arrival) {}

    fn on_tick_end(&mut self, _tick: Tick, _view: &SimView<'_>) {}

    /// Called exactly once, on the step where the queue is empty and the
    /// routing agent is idle.
    fn on_complete(&mut self, _tick: Tick, _metrics: &MetricsCounter) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Reports every event through `tracing`.
#[derive(Default)]
pub struct TracingObserver;

impl SimObserver for TracingObserver {
    fn on_status_change(&mut self, change: &StatusChange) {
        info!(at = %change.at, "{change}");
    }

    fn on_assignment(&mut self, assignment: &Assignment) {
        let visitor = assignment.visitor;
        match &assignment.outcome {
            AssignmentOutcome::Dispatched { route } => info!(
                %visitor,
                destination = visitor.destination.0,
                hops = route.hop_count(),
                "escort started"
            ),
            AssignmentOutcome::AgentUnavailable { available_at } => warn!(
                %visitor,
                available_at = ?available_at.map(|t| t.to_string()),
                "no escort: agent out of service"
            ),
            AssignmentOutcome::GuidanceDeclined { .. } => {
                warn!(%visitor, "no escort: guidance declined")
            }
        }
        if let Some(text) = &assignment.text {
            info!("{text}");
        }
    }

    fn on_arrival(&mut self, arrival: &Arrival) {
        info!(visitor = %arrival.visitor, node = arrival.node.0, "visitor delivered");
    }

    fn on_tick_end(&mut self, tick: Tick, view: &SimView<'_>) {
        debug!(
            %tick,
            now = %view.now,
            position = view.routing.position().0,
            waiting = view.waiting(),
            "tick end"
        );
    }

    fn on_complete(&mut self, tick: Tick, metrics: &MetricsCounter) {
        info!(%tick, %metrics, "all visitors processed");
    }
}
