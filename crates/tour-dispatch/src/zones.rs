//! Destination → secondary agent mapping.

use std::collections::BTreeMap;

use tour_avail::AvailabilityTracker;
use tour_core::{AgentId, NodeId};
use tour_graph::NavGraph;

use crate::{DispatchError, DispatchResult};

/// Which secondary agent is consulted for each destination.
///
/// A destination listed in `overrides` uses that agent; every other
/// destination falls back to `default`.  A map with no default only covers
/// its overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZoneMap {
    default:   Option<AgentId>,
    overrides: BTreeMap<NodeId, AgentId>,
}

impl ZoneMap {
    /// Every destination is handled by `agent` unless overridden.
    pub fn with_default(agent: AgentId) -> Self {
        Self { default: Some(agent), overrides: BTreeMap::new() }
    }

    /// A map covering only explicitly assigned destinations.
    pub fn unassigned() -> Self {
        Self::default()
    }

    /// Make `agent` responsible for `destination`.
    pub fn assign(&mut self, destination: NodeId, agent: AgentId) -> &mut Self {
        self.overrides.insert(destination, agent);
        self
    }

    pub fn default_agent(&self) -> Option<AgentId> {
        self.default
    }

    /// The agent responsible for `destination`.
    pub fn agent_for(&self, destination: NodeId) -> Option<AgentId> {
        self.overrides.get(&destination).copied().or(self.default)
    }

    /// Destinations explicitly assigned to `agent`.
    pub fn zones_of(&self, agent: AgentId) -> impl Iterator<Item = NodeId> + '_ {
        self.overrides
            .iter()
            .filter(move |&(_, &a)| a == agent)
            .map(|(&node, _)| node)
    }

    /// Check that every referenced agent is registered and every assigned
    /// destination exists in `graph`.
    pub fn validate(&self, graph: &NavGraph, tracker: &AvailabilityTracker) -> DispatchResult<()> {
        if let Some(agent) = self.default {
            tracker.agent(agent)?;
        }
        for (&node, &agent) in &self.overrides {
            if !graph.contains(node) {
                return Err(tour_graph::GraphError::UnknownNode(node).into());
            }
            tracker.agent(agent)?;
        }
        Ok(())
    }

    /// Check that every destination in `destinations` has a responsible agent.
    pub fn covers<'a, I>(&self, destinations: I) -> DispatchResult<()>
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        for &node in destinations {
            if self.agent_for(node).is_none() {
                return Err(DispatchError::UnmappedDestination(node));
            }
        }
        Ok(())
    }
}
