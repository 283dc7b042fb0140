//! Fluent builder for constructing a [`Sim`].

use std::time::Duration;

use tracing::info;

use tour_avail::{AvailabilityTracker, OosPolicy};
use tour_core::{AgentId, Clock, NodeId, SimConfig, SimRng, Tick, TickClock};
use tour_dispatch::{
    AssignmentEngine, DispatchState, GuidanceResponder, RoutingAgent, VisitorPolicy,
    VisitorQueue, ZoneMap,
};
use tour_graph::{GraphError, NavGraph, Router};

use crate::{Sim, SimError, SimResult};

/// RNG stream offsets derived from the master seed.
const VISITOR_STREAM:   u64 = 1;
const RESPONDER_STREAM: u64 = 2;

/// Shortest usable out-of-service threshold.  Responders draw whole seconds.
const MIN_OOS_THRESHOLD: Duration = Duration::from_secs(1);

/// Fluent builder for [`Sim<G, R, C>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: seed, tick duration, hops per tick, tick cap
/// - [`NavGraph`]: the campus topology
/// - `G: GuidanceResponder`: the secondary-agent strategy
/// - `R: Router`: the routing algorithm (e.g. [`tour_graph::DijkstraRouter`])
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                                   |
/// |--------------------------|-------------------------------------------|
/// | `.clock(c)`              | `config.make_clock()` (a `TickClock`)     |
/// | `.start(node)`           | lowest node label in the graph            |
/// | `.secondary_agent(name)` | none; at least one is required            |
/// | `.default_agent(name)`   | first registered agent                    |
/// | `.assign_zone(node, a)`  | no overrides                              |
/// | `.oos_policy(p)`         | `OosPolicy::default()` (5 s threshold)    |
/// | `.visitors(policy)`      | `VisitorPolicy::default()` (5 random)     |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, graph, RandomResponder::default(), DijkstraRouter)
///     .secondary_agent("BI_Agent_A")
///     .secondary_agent("BI_Agent_B")
///     .assign_zone(NodeId(19), "BI_Agent_B")
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<G: GuidanceResponder, R: Router, C: Clock = TickClock> {
    config:        SimConfig,
    graph:         NavGraph,
    responder:     G,
    router:        R,
    clock:         C,
    start:         Option<NodeId>,
    agents:        Vec<String>,
    default_agent: Option<String>,
    zones:         Vec<(NodeId, String)>,
    oos_policy:    OosPolicy,
    visitors:      VisitorPolicy,
}

impl<G: GuidanceResponder, R: Router> SimBuilder<G, R, TickClock> {
    /// Create a builder with all required inputs, driven by a [`TickClock`].
    pub fn new(config: SimConfig, graph: NavGraph, responder: G, router: R) -> Self {
        Self {
            clock: config.make_clock(),
            config,
            graph,
            responder,
            router,
            start:         None,
            agents:        Vec::new(),
            default_agent: None,
            zones:         Vec::new(),
            oos_policy:    OosPolicy::default(),
            visitors:      VisitorPolicy::default(),
        }
    }
}

impl<G: GuidanceResponder, R: Router, C: Clock> SimBuilder<G, R, C> {
    /// Replace the time source.
    pub fn clock<C2: Clock>(self, clock: C2) -> SimBuilder<G, R, C2> {
        SimBuilder {
            config:        self.config,
            graph:         self.graph,
            responder:     self.responder,
            router:        self.router,
            clock,
            start:         self.start,
            agents:        self.agents,
            default_agent: self.default_agent,
            zones:         self.zones,
            oos_policy:    self.oos_policy,
            visitors:      self.visitors,
        }
    }

    /// Where the routing agent starts.
    pub fn start(mut self, node: NodeId) -> Self {
        self.start = Some(node);
        self
    }

    /// Register a secondary agent.  Registration order fixes `AgentId`s.
    pub fn secondary_agent(mut self, name: impl Into<String>) -> Self {
        self.agents.push(name.into());
        self
    }

    /// The agent consulted for destinations without an explicit zone.
    pub fn default_agent(mut self, name: impl Into<String>) -> Self {
        self.default_agent = Some(name.into());
        self
    }

    /// Make the named agent responsible for `destination`.
    pub fn assign_zone(mut self, destination: NodeId, agent: impl Into<String>) -> Self {
        self.zones.push((destination, agent.into()));
        self
    }

    pub fn oos_policy(mut self, policy: OosPolicy) -> Self {
        self.oos_policy = policy;
        self
    }

    pub fn visitors(mut self, policy: VisitorPolicy) -> Self {
        self.visitors = policy;
        self
    }

    /// Validate inputs, generate visitors, and return a ready-to-run [`Sim`].
    ///
    /// # Errors
    ///
    /// - [`SimError::Core`] if the [`SimConfig`] is unusable.
    /// - [`SimError::Config`] for an out-of-service threshold under one
    ///   second, an empty graph, no secondary agents, or an agent name that
    ///   was never registered.
    /// - [`SimError::Graph`] if the start node or a zone node is not in the
    ///   graph, or a visitor destination is unknown or unreachable from the
    ///   start node.
    /// - [`SimError::Availability`] for a duplicate agent name.
    /// - [`SimError::Dispatch`] if a destination has no responsible agent.
    pub fn build(self) -> SimResult<Sim<G, R, C>> {
        self.config.validate()?;
        if self.oos_policy.max_duration < MIN_OOS_THRESHOLD {
            return Err(SimError::Config(format!(
                "out-of-service threshold {:?} is below the {:?} minimum",
                self.oos_policy.max_duration, MIN_OOS_THRESHOLD
            )));
        }
        let graph = self.graph;

        // ── Graph and start node ──────────────────────────────────────────
        let start = match self.start {
            Some(node) => node,
            None => *graph
                .nodes()
                .first()
                .ok_or_else(|| SimError::Config("navigation graph has no nodes".into()))?,
        };
        if !graph.contains(start) {
            return Err(GraphError::UnknownNode(start).into());
        }

        // ── Secondary agents ──────────────────────────────────────────────
        let mut tracker = AvailabilityTracker::new(self.oos_policy);
        for name in &self.agents {
            tracker.register(name.as_str())?;
        }
        if tracker.is_empty() {
            return Err(SimError::Config("at least one secondary agent is required".into()));
        }

        // ── Zone map ──────────────────────────────────────────────────────
        let default = match &self.default_agent {
            Some(name) => resolve(&tracker, name)?,
            None => AgentId(0),
        };
        let mut zones = ZoneMap::with_default(default);
        for (node, name) in &self.zones {
            zones.assign(*node, resolve(&tracker, name)?);
        }
        zones.validate(&graph, &tracker)?;

        // ── Visitors ──────────────────────────────────────────────────────
        let mut root = SimRng::new(self.config.seed);
        let mut visitor_rng = root.child(VISITOR_STREAM);
        let responder_rng = root.child(RESPONDER_STREAM);

        let queue = VisitorQueue::generate(&self.visitors, graph.nodes(), &mut visitor_rng)?;
        let reachable = graph.reachable_from(start)?;
        for visitor in queue.iter() {
            if !graph.contains(visitor.destination) {
                return Err(GraphError::UnknownNode(visitor.destination).into());
            }
            if !reachable.contains(&visitor.destination) {
                return Err(GraphError::NoPath { from: start, to: visitor.destination }.into());
            }
        }
        zones.covers(queue.iter().map(|v| &v.destination))?;

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            agents = tracker.len(),
            visitors = queue.len(),
            start = start.0,
            seed = self.config.seed,
            "simulation built"
        );

        let state = DispatchState::new(tracker, RoutingAgent::new(start));
        let engine = AssignmentEngine::new(queue, zones, self.responder, self.router, responder_rng);

        Ok(Sim {
            config:    self.config,
            clock:     self.clock,
            tick:      Tick::ZERO,
            graph,
            state,
            engine,
            completed: false,
        })
    }
}

fn resolve(tracker: &AvailabilityTracker, name: &str) -> SimResult<AgentId> {
    tracker
        .find(name)
        .ok_or_else(|| SimError::Config(format!("unknown secondary agent {name:?}")))
}
