//! Dispatch outcome counters.
//!
//! `MetricsCounter` is a fixed mapping from [`Metric`] to a count.  Counts
//! only ever go up, and [`MetricsCounter::record`] is the single mutation
//! point.

use std::fmt;

/// The outcomes the simulation counts.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Metric {
    /// The routing agent was given a path for a visitor.
    DispatchSuccess,
    /// A visitor was dropped without a path.
    DispatchFailure,
    /// A secondary agent furnished guidance.
    GuidanceProvided,
    /// A secondary agent went out of service while being consulted.
    OosViolation,
}

impl Metric {
    pub const COUNT: usize = 4;

    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::DispatchSuccess,
        Metric::DispatchFailure,
        Metric::GuidanceProvided,
        Metric::OosViolation,
    ];

    #[inline]
    fn slot(self) -> usize {
        match self {
            Metric::DispatchSuccess  => 0,
            Metric::DispatchFailure  => 1,
            Metric::GuidanceProvided => 2,
            Metric::OosViolation     => 3,
        }
    }

    /// Stable metric name, used in logs and summaries.
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::DispatchSuccess  => "dispatch_success",
            Metric::DispatchFailure  => "dispatch_failure",
            Metric::GuidanceProvided => "guidance_provided",
            Metric::OosViolation     => "oos_violation",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monotonic outcome counters for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsCounter {
    counts: [u64; Metric::COUNT],
}

impl MetricsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment `metric` by one and return the new count.
    #[inline]
    pub fn record(&mut self, metric: Metric) -> u64 {
        let slot = &mut self.counts[metric.slot()];
        *slot = slot.saturating_add(1);
        *slot
    }

    #[inline]
    pub fn get(&self, metric: Metric) -> u64 {
        self.counts[metric.slot()]
    }

    /// `(metric, count)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, u64)> + '_ {
        Metric::ALL.iter().map(|&m| (m, self.get(m)))
    }

    /// Total visitors that reached a terminal dispatch outcome.
    pub fn dispatched(&self) -> u64 {
        self.get(Metric::DispatchSuccess) + self.get(Metric::DispatchFailure)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            dispatch_success:  self.get(Metric::DispatchSuccess),
            dispatch_failure:  self.get(Metric::DispatchFailure),
            guidance_provided: self.get(Metric::GuidanceProvided),
            oos_violation:     self.get(Metric::OosViolation),
        }
    }
}

impl fmt::Display for MetricsCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (metric, count) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{metric}={count}")?;
            first = false;
        }
        Ok(())
    }
}

/// Plain-data copy of the counters at one point in time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsSnapshot {
    pub dispatch_success:  u64,
    pub dispatch_failure:  u64,
    pub guidance_provided: u64,
    pub oos_violation:     u64,
}

impl MetricsSnapshot {
    /// Fraction of dispatched visitors that got a path; `0.0` when none were
    /// dispatched.
    pub fn success_rate(&self) -> f64 {
        let total = self.dispatch_success + self.dispatch_failure;
        if total == 0 {
            return 0.0;
        }
        self.dispatch_success as f64 / total as f64
    }
}
