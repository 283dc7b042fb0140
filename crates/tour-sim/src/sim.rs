//! The `Sim` struct and its step loop.

use tracing::info;

use tour_core::{Clock, MetricsCounter, MetricsSnapshot, SimConfig, Tick, Timestamp};
use tour_dispatch::{AssignmentEngine, AssignmentOutcome, DispatchState, GuidanceResponder};
use tour_graph::{NavGraph, Router};

use crate::{SimObserver, SimResult, SimView};

/// What a single [`Sim::step`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Work remains.
    Running,
    /// This step finished the run; `on_complete` fired.
    Completed,
    /// The run had already finished; nothing happened.
    Finished,
}

/// Result of [`Sim::run`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimSummary {
    /// Steps executed so far.
    pub ticks:     u64,
    /// `false` if the tick cap was reached first.
    pub completed: bool,
    pub metrics:   MetricsSnapshot,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// Each [`step`](Self::step) reads the clock once and then:
///
/// 1. **Reconcile**: expired out-of-service episodes end.
/// 2. **Motion**: the routing agent consumes up to `hops_per_tick` hops.
/// 3. **Assign**: if the routing agent is idle and visitors remain, the next
///    visitor is resolved.
/// 4. **Complete**: once the queue is empty and the routing agent is idle the
///    run is marked complete, exactly once.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<G: GuidanceResponder, R: Router, C: Clock> {
    pub config: SimConfig,
    pub(crate) clock:     C,
    pub(crate) tick:      Tick,
    pub(crate) graph:     NavGraph,
    pub(crate) state:     DispatchState,
    pub(crate) engine:    AssignmentEngine<G, R>,
    pub(crate) completed: bool,
}

impl<G: GuidanceResponder, R: Router, C: Clock> Sim<G, R, C> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until the run completes or `config.max_ticks` steps have executed.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<SimSummary> {
        while !self.completed && self.tick.0 < self.config.max_ticks {
            self.step(observer)?;
        }
        Ok(self.summary())
    }

    /// Execute one step.
    ///
    /// A fatal dispatch error aborts the step before the clock advances; the
    /// visitor involved stays at the front of the queue.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<StepOutcome> {
        if self.completed {
            return Ok(StepOutcome::Finished);
        }
        let tick = self.tick;
        let now = self.clock.now();
        observer.on_tick_start(tick, now);

        // ── Reconcile before any availability read ────────────────────────
        for change in self.state.tracker.reconcile(now) {
            observer.on_status_change(&change);
        }

        // ── Motion ────────────────────────────────────────────────────────
        if let Some(arrival) = self.state.routing.advance(self.config.hops_per_tick) {
            info!(visitor = %arrival.visitor, node = arrival.node.0, %now, "destination reached");
            observer.on_arrival(&arrival);
        }

        // ── Assignment ────────────────────────────────────────────────────
        if self.state.routing.is_idle() && self.engine.has_pending() {
            let assignment = self.engine.assign_next(now, &self.graph, &mut self.state)?;
            if let AssignmentOutcome::GuidanceDeclined { out_of_service: Some(change) } =
                &assignment.outcome
            {
                observer.on_status_change(change);
            }
            observer.on_assignment(&assignment);
        }

        // ── Completion ────────────────────────────────────────────────────
        let outcome = if !self.engine.has_pending() && self.state.routing.is_idle() {
            self.completed = true;
            info!(%tick, metrics = %self.state.metrics, "simulation complete");
            observer.on_complete(tick, &self.state.metrics);
            StepOutcome::Completed
        } else {
            StepOutcome::Running
        };

        observer.on_tick_end(tick, &self.view_at(tick, now));

        self.clock.advance_tick();
        self.tick = tick + 1;
        Ok(outcome)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Read-only view of the current state.
    pub fn view(&self) -> SimView<'_> {
        self.view_at(self.tick, self.clock.now())
    }

    pub fn summary(&self) -> SimSummary {
        SimSummary {
            ticks:     self.tick.0,
            completed: self.completed,
            metrics:   self.state.metrics.snapshot(),
        }
    }

    /// Steps executed so far.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    pub fn metrics(&self) -> &MetricsCounter {
        &self.state.metrics
    }

    pub fn engine(&self) -> &AssignmentEngine<G, R> {
        &self.engine
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn view_at(&self, tick: Tick, now: Timestamp) -> SimView<'_> {
        SimView {
            tick,
            now,
            graph:   &self.graph,
            routing: &self.state.routing,
            tracker: &self.state.tracker,
            metrics: &self.state.metrics,
            queue:   self.engine.queue(),
            zones:   self.engine.zones(),
        }
    }
}
