//! Integration tests for tour-sim.

use std::time::Duration;

use tour_avail::{OosPolicy, StatusChange, StatusChangeKind};
use tour_core::{
    ManualClock, Metric, MetricsCounter, NodeId, Position, SimConfig, Tick, Timestamp,
};
use tour_dispatch::{
    AlwaysGuide, Arrival, Assignment, AssignmentOutcome, GuidanceResponse, RandomResponder,
    ScriptedResponder, VisitorPolicy,
};
use tour_graph::{DijkstraRouter, NavGraph, NavGraphBuilder};

use crate::{
    NoopObserver, SimBuilder, SimError, SimObserver, SimView, StepOutcome, run_replications,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config() -> SimConfig {
    SimConfig { tick_duration_ms: 100, max_ticks: 1_000, seed: 42, hops_per_tick: 1 }
}

/// 1 - 2 - 3, and optionally an island 9.
fn line_graph(with_island: bool) -> NavGraph {
    let mut b = NavGraphBuilder::new();
    for (id, x) in [(1, 0.0), (2, 1.0), (3, 2.0)] {
        b.add_node(NodeId(id), Position::new(x, 0.0)).unwrap();
    }
    if with_island {
        b.add_node(NodeId(9), Position::new(9.0, 9.0)).unwrap();
    }
    b.add_edge(NodeId(1), NodeId(2)).unwrap();
    b.add_edge(NodeId(2), NodeId(3)).unwrap();
    b.build()
}

fn fixed(ids: &[u32]) -> VisitorPolicy {
    VisitorPolicy::Fixed(ids.iter().copied().map(NodeId).collect())
}

#[derive(Debug, PartialEq)]
enum Event {
    Recovered(String),
    WentOutOfService(String),
    Assigned(bool),
    Arrived(NodeId),
    Complete(Tick),
}

/// Records events in order plus tick bookkeeping.
#[derive(Default)]
struct Recorder {
    events:     Vec<Event>,
    tick_ends:  u64,
    oos_zones:  Vec<Vec<NodeId>>,
    final_seen: Option<MetricsCounter>,
}

impl SimObserver for Recorder {
    fn on_status_change(&mut self, change: &StatusChange) {
        self.events.push(match change.kind {
            StatusChangeKind::Recovered => Event::Recovered(change.name.clone()),
            StatusChangeKind::WentOutOfService { .. } => Event::WentOutOfService(change.name.clone()),
        });
    }

    fn on_assignment(&mut self, assignment: &Assignment) {
        self.events.push(Event::Assigned(assignment.is_success()));
    }

    fn on_arrival(&mut self, arrival: &Arrival) {
        self.events.push(Event::Arrived(arrival.node));
    }

    fn on_tick_end(&mut self, _tick: Tick, view: &SimView<'_>) {
        self.tick_ends += 1;
        self.oos_zones.push(view.out_of_service_zones());
    }

    fn on_complete(&mut self, tick: Tick, metrics: &MetricsCounter) {
        self.events.push(Event::Complete(tick));
        self.final_seen = Some(metrics.clone());
    }
}

impl Recorder {
    fn completions(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, Event::Complete(_))).count()
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let sim = SimBuilder::new(test_config(), line_graph(false), AlwaysGuide, DijkstraRouter)
            .secondary_agent("BI_Agent_A")
            .build()
            .unwrap();
        assert_eq!(sim.state().routing.position(), NodeId(1));
        assert_eq!(sim.engine().queue().total(), 5);
        assert_eq!(sim.tick(), Tick::ZERO);
        assert!(!sim.is_complete());
    }

    #[test]
    fn requires_a_secondary_agent() {
        let result = SimBuilder::new(test_config(), line_graph(false), AlwaysGuide, DijkstraRouter).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn zero_tick_duration_rejected() {
        let config = SimConfig { tick_duration_ms: 0, ..test_config() };
        let result = SimBuilder::new(config, line_graph(false), AlwaysGuide, DijkstraRouter)
            .secondary_agent("a")
            .build();
        assert!(matches!(result, Err(SimError::Core(_))));
    }

    #[test]
    fn oos_threshold_below_one_second_rejected() {
        for max in [Duration::ZERO, Duration::from_millis(999)] {
            let policy = OosPolicy::new(max);
            let result = SimBuilder::new(
                test_config(),
                line_graph(false),
                RandomResponder::new(1.0, policy),
                DijkstraRouter,
            )
            .secondary_agent("a")
            .oos_policy(policy)
            .build();
            assert!(matches!(result, Err(SimError::Config(_))), "threshold {max:?} accepted");
        }

        let policy = OosPolicy::new(Duration::from_secs(1));
        let mut sim = SimBuilder::new(
            test_config(),
            line_graph(false),
            RandomResponder::new(1.0, policy),
            DijkstraRouter,
        )
        .secondary_agent("a")
        .oos_policy(policy)
        .build()
        .unwrap();
        // Every consultation takes the agent out for exactly the threshold.
        sim.step(&mut NoopObserver).unwrap();
        assert_eq!(sim.metrics().get(Metric::OosViolation), 1);
    }

    #[test]
    fn empty_graph_rejected() {
        let result = SimBuilder::new(test_config(), NavGraph::empty(), AlwaysGuide, DijkstraRouter)
            .secondary_agent("a")
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn unknown_start_node() {
        let result = SimBuilder::new(test_config(), line_graph(false), AlwaysGuide, DijkstraRouter)
            .secondary_agent("a")
            .start(NodeId(42))
            .build();
        assert!(matches!(
            result,
            Err(SimError::Graph(tour_graph::GraphError::UnknownNode(NodeId(42))))
        ));
    }

    #[test]
    fn unreachable_destination_fails_at_startup() {
        let result = SimBuilder::new(test_config(), line_graph(true), AlwaysGuide, DijkstraRouter)
            .secondary_agent("a")
            .visitors(fixed(&[2, 9]))
            .build();
        assert!(matches!(
            result,
            Err(SimError::Graph(tour_graph::GraphError::NoPath { from: NodeId(1), to: NodeId(9) }))
        ));
    }

    #[test]
    fn unknown_destination_fails_at_startup() {
        let result = SimBuilder::new(test_config(), line_graph(false), AlwaysGuide, DijkstraRouter)
            .secondary_agent("a")
            .visitors(fixed(&[7]))
            .build();
        assert!(matches!(result, Err(SimError::Graph(tour_graph::GraphError::UnknownNode(NodeId(7))))));
    }

    #[test]
    fn zone_referencing_unknown_agent() {
        let result = SimBuilder::new(test_config(), line_graph(false), AlwaysGuide, DijkstraRouter)
            .secondary_agent("a")
            .assign_zone(NodeId(3), "ghost")
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn zone_referencing_unknown_node() {
        let result = SimBuilder::new(test_config(), line_graph(false), AlwaysGuide, DijkstraRouter)
            .secondary_agent("a")
            .assign_zone(NodeId(30), "a")
            .build();
        assert!(matches!(result, Err(SimError::Dispatch(_))));
    }

    #[test]
    fn duplicate_agent_name() {
        let result = SimBuilder::new(test_config(), line_graph(false), AlwaysGuide, DijkstraRouter)
            .secondary_agent("a")
            .secondary_agent("a")
            .build();
        assert!(matches!(result, Err(SimError::Availability(_))));
    }

    #[test]
    fn same_seed_same_visitors() {
        let build = || {
            SimBuilder::new(test_config(), line_graph(false), AlwaysGuide, DijkstraRouter)
                .secondary_agent("a")
                .visitors(VisitorPolicy::Random { count: 12 })
                .build()
                .unwrap()
        };
        let (a, b) = (build(), build());
        let da: Vec<NodeId> = a.engine().queue().iter().map(|v| v.destination).collect();
        let db: Vec<NodeId> = b.engine().queue().iter().map(|v| v.destination).collect();
        assert_eq!(da, db);
        assert_eq!(da.len(), 12);
    }
}

// ── Step loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod step_tests {
    use super::*;

    #[test]
    fn five_visitors_complete_exactly_once() {
        let mut sim = SimBuilder::new(test_config(), line_graph(false), AlwaysGuide, DijkstraRouter)
            .secondary_agent("BI_Agent_A")
            .visitors(fixed(&[3, 1, 2, 2, 3]))
            .build()
            .unwrap();
        let mut rec = Recorder::default();

        let summary = sim.run(&mut rec).unwrap();
        assert!(summary.completed);
        assert_eq!(summary.metrics.dispatch_success, 5);
        assert_eq!(summary.metrics.dispatch_failure, 0);
        assert_eq!(summary.metrics.guidance_provided, 5);
        assert_eq!(rec.completions(), 1);
        assert_eq!(rec.tick_ends, summary.ticks);
        assert_eq!(rec.final_seen.as_ref().map(|m| m.dispatched()), Some(5));
        assert_eq!(rec.events.iter().filter(|e| matches!(e, Event::Arrived(_))).count(), 5);

        // Further steps do nothing and never re-emit completion.
        for _ in 0..3 {
            assert_eq!(sim.step(&mut rec).unwrap(), StepOutcome::Finished);
        }
        assert_eq!(rec.completions(), 1);
        assert_eq!(sim.tick().0, summary.ticks);
        assert_eq!(sim.metrics().dispatched(), 5);
    }

    #[test]
    fn arrivals_follow_path_length() {
        // Path [1, 2, 3] with one hop per step: assigned on step 0, the
        // three hops land on steps 1..=3.
        let mut sim = SimBuilder::new(test_config(), line_graph(false), AlwaysGuide, DijkstraRouter)
            .secondary_agent("a")
            .visitors(fixed(&[3]))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        assert_eq!(sim.step(&mut rec).unwrap(), StepOutcome::Running);
        assert_eq!(sim.step(&mut rec).unwrap(), StepOutcome::Running);
        assert_eq!(sim.step(&mut rec).unwrap(), StepOutcome::Running);
        assert_eq!(sim.state().routing.position(), NodeId(2));
        assert_eq!(sim.step(&mut rec).unwrap(), StepOutcome::Completed);
        assert_eq!(sim.state().routing.position(), NodeId(3));
        assert_eq!(
            rec.events,
            vec![Event::Assigned(true), Event::Arrived(NodeId(3)), Event::Complete(Tick(3))]
        );
    }

    #[test]
    fn no_visitors_completes_on_first_step() {
        let mut sim = SimBuilder::new(test_config(), line_graph(false), AlwaysGuide, DijkstraRouter)
            .secondary_agent("a")
            .visitors(fixed(&[]))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        assert_eq!(sim.step(&mut rec).unwrap(), StepOutcome::Completed);
        assert_eq!(rec.events, vec![Event::Complete(Tick::ZERO)]);
    }

    #[test]
    fn recovery_precedes_assignment_in_the_same_step() {
        let clock = ManualClock::new();
        let responder = ScriptedResponder::new([GuidanceResponse::out_of_service(Duration::from_secs(2))]);
        let mut sim = SimBuilder::new(test_config(), line_graph(false), responder, DijkstraRouter)
            .clock(clock.clone())
            .secondary_agent("BI_Agent_A")
            .visitors(fixed(&[3, 3]))
            .build()
            .unwrap();
        let mut rec = Recorder::default();

        sim.step(&mut rec).unwrap();
        assert_eq!(
            rec.events,
            vec![Event::WentOutOfService("BI_Agent_A".into()), Event::Assigned(false)]
        );
        assert_eq!(rec.oos_zones.last().map(Vec::len), Some(3));
        assert_eq!(sim.metrics().get(Metric::OosViolation), 1);

        // Exactly at T + D the agent is available again and is consulted.
        clock.set(Timestamp::from_secs(2));
        rec.events.clear();
        sim.step(&mut rec).unwrap();
        assert_eq!(
            rec.events,
            vec![Event::Recovered("BI_Agent_A".into()), Event::Assigned(true)]
        );
        assert_eq!(sim.metrics().get(Metric::DispatchSuccess), 1);
        assert!(rec.oos_zones.last().is_some_and(Vec::is_empty));
    }

    #[test]
    fn recovery_depends_on_time_not_steps() {
        let clock = ManualClock::new();
        let responder = ScriptedResponder::new([GuidanceResponse::out_of_service(Duration::from_secs(2))]);
        let config = SimConfig { hops_per_tick: 0, ..test_config() };
        let mut sim = SimBuilder::new(config, line_graph(false), responder, DijkstraRouter)
            .clock(clock.clone())
            .secondary_agent("A")
            .secondary_agent("B")
            .assign_zone(NodeId(3), "B")
            .visitors(fixed(&[2, 3, 2]))
            .build()
            .unwrap();
        let a = sim.state().tracker.find("A").unwrap();
        let mut rec = Recorder::default();

        // A goes out of service on visitor 1; visitor 2 parks the routing
        // agent on a path it never walks.
        sim.step(&mut rec).unwrap();
        clock.set(Timestamp::from_millis(1_500));
        sim.step(&mut rec).unwrap();
        assert!(sim.state().routing.is_moving());

        for _ in 0..50 {
            assert_eq!(sim.step(&mut rec).unwrap(), StepOutcome::Running);
        }
        assert!(!sim.state().tracker.is_available(a));
        assert_eq!(sim.view().out_of_service_zones(), vec![NodeId(1), NodeId(2)]);

        clock.set(Timestamp::from_secs(2));
        sim.step(&mut rec).unwrap();
        assert!(sim.state().tracker.is_available(a));
        assert_eq!(rec.events.last(), Some(&Event::Recovered("A".into())));
    }

    #[test]
    fn unavailable_agent_drops_visitor() {
        let clock = ManualClock::new();
        let responder = ScriptedResponder::new([GuidanceResponse::out_of_service(Duration::from_secs(5))]);
        let mut sim = SimBuilder::new(test_config(), line_graph(false), responder, DijkstraRouter)
            .clock(clock.clone())
            .secondary_agent("a")
            .visitors(fixed(&[2, 3]))
            .build()
            .unwrap();
        let mut rec = Recorder::default();

        sim.step(&mut rec).unwrap();
        clock.set(Timestamp::from_secs(1));
        assert_eq!(sim.step(&mut rec).unwrap(), StepOutcome::Completed);

        let m = sim.summary().metrics;
        assert_eq!(m.dispatch_failure, 2);
        assert_eq!(m.oos_violation, 1);
        assert_eq!(m.dispatch_success, 0);
        assert!(sim.state().routing.path().is_empty());
    }

    #[test]
    fn tick_cap_stops_run() {
        let config = SimConfig { hops_per_tick: 0, max_ticks: 10, ..test_config() };
        let mut sim = SimBuilder::new(config, line_graph(false), AlwaysGuide, DijkstraRouter)
            .secondary_agent("a")
            .visitors(fixed(&[3]))
            .build()
            .unwrap();
        let summary = sim.run(&mut NoopObserver).unwrap();
        assert!(!summary.completed);
        assert_eq!(summary.ticks, 10);
    }

    #[test]
    fn tick_clock_time_advances_per_step() {
        let mut sim = SimBuilder::new(test_config(), line_graph(false), AlwaysGuide, DijkstraRouter)
            .secondary_agent("a")
            .visitors(fixed(&[3]))
            .build()
            .unwrap();
        assert_eq!(sim.now(), Timestamp::ZERO);
        sim.step(&mut NoopObserver).unwrap();
        sim.step(&mut NoopObserver).unwrap();
        assert_eq!(sim.now(), Timestamp::from_millis(200));
    }

    #[test]
    fn random_runs_are_reproducible() {
        let run = |seed: u64| {
            let config = SimConfig { seed, ..test_config() };
            SimBuilder::new(config, line_graph(false), RandomResponder::default(), DijkstraRouter)
                .secondary_agent("BI_Agent_A")
                .secondary_agent("BI_Agent_B")
                .assign_zone(NodeId(3), "BI_Agent_B")
                .visitors(VisitorPolicy::Random { count: 20 })
                .build()
                .unwrap()
                .run(&mut NoopObserver)
                .unwrap()
        };
        let a = run(7);
        assert_eq!(a, run(7));
        assert!(a.completed);
        assert_eq!(a.metrics.dispatch_success + a.metrics.dispatch_failure, 20);
        assert_eq!(a.metrics.guidance_provided, a.metrics.dispatch_success);
    }
}

// ── Replications ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod replication_tests {
    use super::*;

    #[test]
    fn results_in_seed_order() {
        let seeds = [3, 1, 2];
        let results = run_replications(&seeds, |seed| {
            SimBuilder::new(
                SimConfig { seed, ..test_config() },
                line_graph(false),
                RandomResponder::default(),
                DijkstraRouter,
            )
            .secondary_agent("a")
            .build()
        })
        .unwrap();

        assert_eq!(results.iter().map(|r| r.seed).collect::<Vec<_>>(), seeds);
        for r in &results {
            assert!(r.summary.completed);
            let m = r.summary.metrics;
            assert_eq!(m.dispatch_success + m.dispatch_failure, 5);
        }
    }

    #[test]
    fn factory_error_aborts() {
        let result = run_replications(&[1, 2], |seed| {
            SimBuilder::new(SimConfig { seed, ..test_config() }, line_graph(false), AlwaysGuide, DijkstraRouter)
                .build()
        });
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn dispatched_outcomes_are_tagged() {
        let mut sim = SimBuilder::new(test_config(), line_graph(false), AlwaysGuide, DijkstraRouter)
            .secondary_agent("a")
            .visitors(fixed(&[1]))
            .build()
            .unwrap();

        struct Capture(Vec<AssignmentOutcome>);
        impl SimObserver for Capture {
            fn on_assignment(&mut self, a: &Assignment) {
                self.0.push(a.outcome.clone());
            }
        }
        let mut cap = Capture(Vec::new());
        sim.run(&mut cap).unwrap();
        // Destination equals the start node: a single-node route.
        match &cap.0[..] {
            [AssignmentOutcome::Dispatched { route }] => assert!(route.is_trivial()),
            other => panic!("unexpected outcomes {other:?}"),
        }
    }
}
