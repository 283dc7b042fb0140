//! `DispatchState`: the mutable core state of one run.

use tracing::debug;

use tour_avail::AvailabilityTracker;
use tour_core::{Metric, MetricsCounter};

use crate::RoutingAgent;

/// Everything the step loop mutates, owned in one place.
///
/// A fresh value per run (or per test) replaces any process-wide state.
#[derive(Debug)]
pub struct DispatchState {
    pub tracker: AvailabilityTracker,
    pub routing: RoutingAgent,
    pub metrics: MetricsCounter,
}

impl DispatchState {
    pub fn new(tracker: AvailabilityTracker, routing: RoutingAgent) -> Self {
        Self { tracker, routing, metrics: MetricsCounter::new() }
    }

    /// Increment `metric`, logging the new value.
    pub fn record(&mut self, metric: Metric) -> u64 {
        let count = self.metrics.record(metric);
        debug!(%metric, count, "performance update");
        count
    }
}
