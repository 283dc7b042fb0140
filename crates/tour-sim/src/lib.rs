//! `tour-sim`: step loop orchestrator for the campus escort simulation.
//!
//! # Step loop
//!
//! ```text
//! step():
//!   now ← clock.now()
//!   ① Reconcile: out-of-service agents whose window has ended recover.
//!   ② Motion   : routing agent consumes up to `hops_per_tick` path hops;
//!                 an emptied path is an arrival.
//!   ③ Assign   : routing agent idle and visitors waiting → resolve the
//!                 next visitor (dispatch, unavailable, or declined).
//!   ④ Complete : queue empty and routing agent idle → on_complete, once.
//!   clock.advance_tick()
//! ```
//!
//! Reconciliation always precedes assignment within a step, so an agent whose
//! window ends at `now` is consulted as available in that same step.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | [`run_replications`] runs seeds on Rayon's thread pool.  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tour_core::SimConfig;
//! use tour_dispatch::RandomResponder;
//! use tour_graph::DijkstraRouter;
//! use tour_sim::{SimBuilder, TracingObserver};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), graph, RandomResponder::default(), DijkstraRouter)
//!     .secondary_agent("BI_Agent_A")
//!     .build()?;
//! let summary = sim.run(&mut TracingObserver)?;
//! ```

pub mod batch;
pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use batch::{Replication, run_replications};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, SimView, TracingObserver};
pub use sim::{Sim, SimSummary, StepOutcome};
