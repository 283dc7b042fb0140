//! The `GuidanceResponder` trait: the secondary agent's side of a dispatch.
//!
//! When the assignment engine consults an available secondary agent, the
//! responder decides whether that agent furnishes path information and, if
//! not, whether the refusal takes it out of service.  The engine treats the
//! response as pure input, so tests plug in deterministic stubs while the
//! demo uses the seeded [`RandomResponder`].

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tour_avail::OosPolicy;
use tour_core::{AgentId, SimRng, Timestamp};

use crate::Visitor;

// ── Request / response ────────────────────────────────────────────────────────

/// What the engine asks a secondary agent.
#[derive(Debug, Clone, Copy)]
pub struct GuidanceRequest<'a> {
    pub agent:      AgentId,
    pub agent_name: &'a str,
    pub visitor:    Visitor,
    pub now:        Timestamp,
}

/// A secondary agent's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidanceResponse {
    /// `true` if the agent furnishes path information.
    pub provided: bool,

    /// If set (only meaningful when `provided` is false), the agent goes out
    /// of service for this long as a side effect of the same response.
    pub out_of_service_for: Option<Duration>,

    /// Optional flavour text for the presentation layer.
    pub text: Option<String>,
}

impl GuidanceResponse {
    /// The agent furnishes guidance.
    pub fn guided() -> Self {
        Self { provided: true, out_of_service_for: None, text: None }
    }

    /// The agent cannot help but stays in service.
    pub fn declined() -> Self {
        Self { provided: false, out_of_service_for: None, text: None }
    }

    /// The agent cannot help and goes out of service for `duration`.
    pub fn out_of_service(duration: Duration) -> Self {
        Self { provided: false, out_of_service_for: Some(duration), text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Pluggable secondary-agent behaviour.
///
/// Implementations receive the engine's seeded [`SimRng`] so randomised
/// strategies stay reproducible.  `Send + Sync` lets a whole simulation move
/// onto a worker thread for replication batches.
pub trait GuidanceResponder: Send + Sync + 'static {
    fn respond(&self, request: &GuidanceRequest<'_>, rng: &mut SimRng) -> GuidanceResponse;
}

// ── Deterministic stubs ───────────────────────────────────────────────────────

/// Always furnishes guidance.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysGuide;

impl GuidanceResponder for AlwaysGuide {
    fn respond(&self, _request: &GuidanceRequest<'_>, _rng: &mut SimRng) -> GuidanceResponse {
        GuidanceResponse::guided()
    }
}

/// Never furnishes guidance and never goes out of service.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverGuide;

impl GuidanceResponder for NeverGuide {
    fn respond(&self, _request: &GuidanceRequest<'_>, _rng: &mut SimRng) -> GuidanceResponse {
        GuidanceResponse::declined()
    }
}

/// Replays a fixed list of responses in order, then repeats `fallback`.
pub struct ScriptedResponder {
    script:   Mutex<VecDeque<GuidanceResponse>>,
    fallback: GuidanceResponse,
}

impl ScriptedResponder {
    /// Replay `responses`, then answer [`GuidanceResponse::guided`].
    pub fn new<I: IntoIterator<Item = GuidanceResponse>>(responses: I) -> Self {
        Self {
            script:   Mutex::new(responses.into_iter().collect()),
            fallback: GuidanceResponse::guided(),
        }
    }

    pub fn with_fallback(mut self, fallback: GuidanceResponse) -> Self {
        self.fallback = fallback;
        self
    }

    /// Scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl GuidanceResponder for ScriptedResponder {
    fn respond(&self, _request: &GuidanceRequest<'_>, _rng: &mut SimRng) -> GuidanceResponse {
        let next = match self.script.lock() {
            Ok(mut script) => script.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

// ── RandomResponder ───────────────────────────────────────────────────────────

/// Randomised secondary agent.
///
/// With probability `oos_probability` the agent refuses and goes out of
/// service for a whole number of seconds drawn uniformly from
/// `1..=max_oos_secs`; otherwise it furnishes guidance.  With
/// `max_oos_secs == 0` no duration fits, so a refusal keeps the agent in
/// service.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomResponder {
    pub oos_probability: f64,
    pub max_oos_secs:    u64,
}

impl RandomResponder {
    /// Draw durations within `policy`'s threshold, truncated to whole
    /// seconds.
    pub fn new(oos_probability: f64, policy: OosPolicy) -> Self {
        Self { oos_probability, max_oos_secs: policy.max_duration.as_secs() }
    }
}

impl Default for RandomResponder {
    fn default() -> Self {
        Self::new(0.3, OosPolicy::default())
    }
}

impl GuidanceResponder for RandomResponder {
    fn respond(&self, request: &GuidanceRequest<'_>, rng: &mut SimRng) -> GuidanceResponse {
        if rng.gen_bool(self.oos_probability) {
            if self.max_oos_secs == 0 {
                return GuidanceResponse::declined();
            }
            let secs = rng.gen_range(1..=self.max_oos_secs);
            GuidanceResponse::out_of_service(Duration::from_secs(secs)).with_text(format!(
                "{} is out of service for {secs} seconds.",
                request.agent_name
            ))
        } else {
            GuidanceResponse::guided().with_text(format!(
                "{} provides the path for building {}.",
                request.agent_name, request.visitor.destination.0
            ))
        }
    }
}
