//! The routing agent: the single escort moving through the graph.

use std::collections::VecDeque;

use tracing::debug;

use tour_core::NodeId;
use tour_graph::Route;

use crate::{DispatchError, DispatchResult, Visitor};

/// A visitor delivered to their destination.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Arrival {
    pub visitor: Visitor,
    pub node:    NodeId,
}

/// Position, remaining path, and escort state of the routing agent.
///
/// The agent is *moving* exactly when its path is non-empty.  A path is set
/// all at once by [`assign`](Self::assign) and consumed front-to-back by
/// [`advance`](Self::advance); each consumed hop becomes the new position.
#[derive(Clone, Debug)]
pub struct RoutingAgent {
    position:  NodeId,
    path:      VecDeque<NodeId>,
    escorting: Option<Visitor>,
}

impl RoutingAgent {
    /// An idle agent parked at `start`.
    pub fn new(start: NodeId) -> Self {
        Self { position: start, path: VecDeque::new(), escorting: None }
    }

    #[inline]
    pub fn position(&self) -> NodeId {
        self.position
    }

    /// Remaining hops, front = next.
    pub fn path(&self) -> &VecDeque<NodeId> {
        &self.path
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        !self.path.is_empty()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.path.is_empty()
    }

    /// The visitor currently being escorted.
    pub fn escorting(&self) -> Option<Visitor> {
        self.escorting
    }

    /// Where the current path ends, if moving.
    pub fn target(&self) -> Option<NodeId> {
        self.path.back().copied()
    }

    /// Set a full route for `visitor`.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::RoutingAgentBusy`] if a path is already set.
    /// - [`DispatchError::Config`] if the route is empty.
    pub fn assign(&mut self, route: Route, visitor: Visitor) -> DispatchResult<()> {
        if self.is_moving() {
            return Err(DispatchError::RoutingAgentBusy { remaining: self.path.len() });
        }
        if route.nodes.is_empty() {
            return Err(DispatchError::Config(format!("empty route for {visitor}")));
        }
        self.path = route.nodes.into();
        self.escorting = Some(visitor);
        Ok(())
    }

    /// Consume up to `hops` nodes from the front of the path.
    ///
    /// Returns the [`Arrival`] if the path was emptied by this call.
    pub fn advance(&mut self, hops: u32) -> Option<Arrival> {
        if self.path.is_empty() {
            return None;
        }
        for _ in 0..hops {
            let Some(next) = self.path.pop_front() else {
                break;
            };
            self.position = next;
            debug!(node = next.0, remaining = self.path.len(), "routing agent hop");
        }
        if self.path.is_empty() {
            let visitor = self.escorting.take()?;
            return Some(Arrival { visitor, node: self.position });
        }
        None
    }
}
