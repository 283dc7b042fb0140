//! `tour-core`: foundational types for the campus escort simulation.
//!
//! This crate is a dependency of every other `tour-*` crate.  It has no
//! `tour-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`ids`]       | `NodeId`, `AgentId`, `VisitorId`                           |
//! | [`geo`]       | `Position` (presentation-only node coordinates)            |
//! | [`time`]      | `Tick`, `Timestamp`, `Clock` + impls, `SimConfig`          |
//! | [`rng`]       | `SimRng`                                                   |
//! | [`metrics`]   | `Metric`, `MetricsCounter`, `MetricsSnapshot`              |
//! | [`error`]     | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, time and metrics.   |

pub mod error;
pub mod geo;
pub mod ids;
pub mod metrics;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Position;
pub use ids::{AgentId, NodeId, VisitorId};
pub use metrics::{Metric, MetricsCounter, MetricsSnapshot};
pub use rng::SimRng;
pub use time::{Clock, ManualClock, SimConfig, Tick, TickClock, Timestamp, WallClock};
