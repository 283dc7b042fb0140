//! `tour-avail`: availability tracking for secondary (building information)
//! agents.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`status`]   | `AgentStatus`, `SecondaryAgent`, `StatusChange`             |
//! | [`recovery`] | `RecoveryQueue`: sparse `Timestamp → agents` schedule      |
//! | [`tracker`]  | `AvailabilityTracker`, `OosPolicy`                          |
//! | [`error`]    | `AvailError`, `AvailResult<T>`                              |
//!
//! # State machine
//!
//! ```text
//!              go_out_of_service(d)
//!   Available ───────────────────────▶ OutOfService { available_at = now + d }
//!       ▲                                      │
//!       └──────── reconcile(now >= available_at)
//! ```
//!
//! Every transition returns a [`StatusChange`] and is logged with `tracing`.

pub mod error;
pub mod recovery;
pub mod status;
pub mod tracker;


pub use error::{AvailError, AvailResult};
pub use recovery::RecoveryQueue;
pub use status::{AgentStatus, SecondaryAgent, StatusChange, StatusChangeKind};
pub use tracker::{AvailabilityTracker, OosPolicy};
