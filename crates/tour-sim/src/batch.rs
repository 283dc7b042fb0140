//! Independent replications of one scenario over many seeds.

use tour_core::Clock;
use tour_dispatch::GuidanceResponder;
use tour_graph::Router;

use crate::{NoopObserver, Sim, SimResult, SimSummary};

/// Outcome of one replication.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Replication {
    pub seed:    u64,
    pub summary: SimSummary,
}

/// Build a fresh [`Sim`] per seed with `factory` and run each to completion
/// (or its tick cap).
///
/// Results come back in `seeds` order.  With the `parallel` feature the runs
/// execute on Rayon's thread pool; every run owns its own state, so the
/// results are identical either way.
///
/// The first error aborts the batch.
pub fn run_replications<F, G, R, C>(seeds: &[u64], factory: F) -> SimResult<Vec<Replication>>
where
    F: Fn(u64) -> SimResult<Sim<G, R, C>> + Sync,
    G: GuidanceResponder,
    R: Router,
    C: Clock,
{
    let run_one = |seed: u64| -> SimResult<Replication> {
        let mut sim = factory(seed)?;
        let summary = sim.run(&mut NoopObserver)?;
        Ok(Replication { seed, summary })
    };

    #[cfg(not(feature = "parallel"))]
    {
        seeds.iter().map(|&seed| run_one(seed)).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        seeds.par_iter().map(|&seed| run_one(seed)).collect()
    }
}
