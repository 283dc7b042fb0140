//! `tour-dispatch`: visitor queue and the assignment engine.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`visitor`]   | `Visitor`, `VisitorPolicy`, `VisitorQueue` (FIFO)            |
//! | [`zones`]     | `ZoneMap`: destination → responsible secondary agent        |
//! | [`responder`] | `GuidanceResponder` trait + random and scripted strategies   |
//! | [`routing`]   | `RoutingAgent`: position, path, escort state                |
//! | [`state`]     | `DispatchState`: all mutable core state in one place        |
//! | [`engine`]    | `AssignmentEngine`, `Assignment`, `AssignmentOutcome`        |
//! | [`error`]     | `DispatchError`, `DispatchResult<T>`                         |
//!
//! # Decision flow
//!
//! ```text
//! assign_next(now):
//!   visitor   ← queue.pop_next()                      (FIFO)
//!   agent     ← zones.agent_for(visitor.destination)
//!   agent OOS?         → DispatchFailure, visitor dropped
//!   responder: guided? → shortest path, RoutingAgent::assign, DispatchSuccess
//!   responder: no      → DispatchFailure (+ OOS episode, OosViolation)
//! ```
//!
//! Failures caused by unavailability are outcomes, not errors; only
//! configuration and scheduling mistakes surface as [`DispatchError`].

pub mod engine;
pub mod error;
pub mod responder;
pub mod routing;
pub mod state;
pub mod visitor;
pub mod zones;


pub use engine::{AssignmentEngine, Assignment, AssignmentOutcome};
pub use error::{DispatchError, DispatchResult};
pub use responder::{
    AlwaysGuide, GuidanceRequest, GuidanceResponder, GuidanceResponse, NeverGuide,
    RandomResponder, ScriptedResponder,
};
pub use routing::{Arrival, RoutingAgent};
pub use state::DispatchState;
pub use visitor::{Visitor, VisitorPolicy, VisitorQueue};
pub use zones::ZoneMap;
