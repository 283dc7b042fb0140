//! The assignment engine: takes one visitor and decides their outcome.

use tracing::{info, warn};

use tour_avail::StatusChange;
use tour_core::{AgentId, Metric, SimRng, Timestamp};
use tour_graph::{NavGraph, Route, Router};

use crate::{
    DispatchError, DispatchResult, DispatchState, GuidanceRequest, GuidanceResponder, Visitor,
    VisitorQueue, ZoneMap,
};

// ── Results ───────────────────────────────────────────────────────────────────

/// How a single visitor's dispatch ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssignmentOutcome {
    /// The secondary agent furnished guidance and the routing agent now has
    /// `route`.
    Dispatched { route: Route },

    /// The responsible agent was out of service; the graph was not consulted.
    AgentUnavailable { available_at: Option<Timestamp> },

    /// The agent was consulted but could not guide.  `out_of_service` holds
    /// the episode the refusal started, if any.
    GuidanceDeclined { out_of_service: Option<StatusChange> },
}

/// The record of one [`AssignmentEngine::assign_next`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub visitor: Visitor,
    pub agent:   AgentId,
    pub at:      Timestamp,
    pub outcome: AssignmentOutcome,
    /// Flavour text from the responder, if any.
    pub text:    Option<String>,
}

impl Assignment {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, AssignmentOutcome::Dispatched { .. })
    }
}

// ── AssignmentEngine ──────────────────────────────────────────────────────────

/// Pulls visitors in order and commits the routing agent when guidance is
/// available.
///
/// # Type parameters
///
/// - `G`: the secondary-agent strategy ([`GuidanceResponder`]).
/// - `R`: the routing algorithm (e.g. [`tour_graph::DijkstraRouter`]).
pub struct AssignmentEngine<G: GuidanceResponder, R: Router> {
    queue:     VisitorQueue,
    zones:     ZoneMap,
    responder: G,
    router:    R,
    rng:       SimRng,
}

impl<G: GuidanceResponder, R: Router> AssignmentEngine<G, R> {
    pub fn new(queue: VisitorQueue, zones: ZoneMap, responder: G, router: R, rng: SimRng) -> Self {
        Self { queue, zones, responder, router, rng }
    }

    pub fn queue(&self) -> &VisitorQueue {
        &self.queue
    }

    pub fn zones(&self) -> &ZoneMap {
        &self.zones
    }

    pub fn responder(&self) -> &G {
        &self.responder
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Dispatch the next visitor.
    ///
    /// The caller must only invoke this while the routing agent is idle and
    /// the queue is non-empty.  Unavailability and refused guidance are
    /// reported as [`AssignmentOutcome`]s; the visitor is dropped in both
    /// cases.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::EmptyQueue`] if no visitors remain.
    /// - [`DispatchError::RoutingAgentBusy`] if the routing agent is moving.
    /// - [`DispatchError::UnmappedDestination`] if no agent covers the
    ///   destination.
    /// - [`DispatchError::Graph`] if the destination is unknown or
    ///   unreachable.
    /// - [`DispatchError::Availability`] if the responder asks for an
    ///   out-of-service episode the tracker rejects.
    ///
    /// On any error state is left untouched and the visitor stays at the
    /// front of the queue.  An error raised after the responder
    /// was consulted does not undo that consultation: its RNG draw or
    /// scripted answer is spent, so a retry may get a different response.
    pub fn assign_next(
        &mut self,
        now:   Timestamp,
        graph: &NavGraph,
        state: &mut DispatchState,
    ) -> DispatchResult<Assignment> {
        if state.routing.is_moving() {
            return Err(DispatchError::RoutingAgentBusy { remaining: state.routing.path().len() });
        }
        let visitor = self.queue.pop_next().ok_or(DispatchError::EmptyQueue)?;

        match self.decide(visitor, now, graph, state) {
            Ok(assignment) => Ok(assignment),
            Err(e) => {
                self.queue.restore_front(visitor);
                Err(e)
            }
        }
    }

    fn decide(
        &mut self,
        visitor: Visitor,
        now:     Timestamp,
        graph:   &NavGraph,
        state:   &mut DispatchState,
    ) -> DispatchResult<Assignment> {
        let agent = self
            .zones
            .agent_for(visitor.destination)
            .ok_or(DispatchError::UnmappedDestination(visitor.destination))?;
        let agent_name = state.tracker.agent(agent)?.name.clone();

        info!(
            %visitor,
            destination = visitor.destination.0,
            agent = %agent_name,
            "visitor needs an escort"
        );

        // ── Unavailable: do not touch the graph ───────────────────────────
        if !state.tracker.is_available(agent) {
            let available_at = state.tracker.status(agent)?.available_at();
            state.record(Metric::DispatchFailure);
            warn!(%visitor, agent = %agent_name, "secondary agent out of service; visitor dropped");
            return Ok(Assignment {
                visitor,
                agent,
                at: now,
                outcome: AssignmentOutcome::AgentUnavailable { available_at },
                text: None,
            });
        }

        let request = GuidanceRequest { agent, agent_name: &agent_name, visitor, now };
        let response = self.responder.respond(&request, &mut self.rng);

        // ── Guided: route and commit ──────────────────────────────────────
        if response.provided {
            let route = self
                .router
                .route(graph, state.routing.position(), visitor.destination)?;
            state.routing.assign(route.clone(), visitor)?;
            state.record(Metric::GuidanceProvided);
            state.record(Metric::DispatchSuccess);
            info!(%visitor, hops = route.hop_count(), "routing agent dispatched");
            return Ok(Assignment {
                visitor,
                agent,
                at: now,
                outcome: AssignmentOutcome::Dispatched { route },
                text: response.text,
            });
        }

        // ── Declined: optional OOS episode, visitor dropped ───────────────
        let out_of_service = match response.out_of_service_for {
            Some(duration) => {
                let change = state.tracker.go_out_of_service(agent, duration, now)?;
                state.record(Metric::OosViolation);
                Some(change)
            }
            None => None,
        };
        state.record(Metric::DispatchFailure);
        warn!(%visitor, agent = %agent_name, "guidance unavailable; visitor dropped");

        Ok(Assignment {
            visitor,
            agent,
            at: now,
            outcome: AssignmentOutcome::GuidanceDeclined { out_of_service },
            text: response.text,
        })
    }
}
