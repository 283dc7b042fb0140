//! Simulation time model.
//!
//! # Design
//!
//! Two notions of time coexist:
//!
//! - [`Tick`] counts iterations of the step loop.  It exists for observers
//!   and for the tick cap; no state transition depends on it.
//! - [`Timestamp`] is elapsed milliseconds since simulation start, read from
//!   an injectable [`Clock`].  Availability recovery is scheduled and
//!   reconciled against timestamps only, so behaviour is invariant to the
//!   tick rate.
//!
//! Three clocks are provided:
//!
//! | Clock          | `now()`                                | Used by                |
//! |----------------|----------------------------------------|------------------------|
//! | [`TickClock`]  | `tick * tick_duration_ms`              | headless runs          |
//! | [`ManualClock`]| whatever the test last set             | tests                  |
//! | [`WallClock`]  | real elapsed time since construction   | paced interactive runs |

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute step-loop iteration counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── Timestamp ─────────────────────────────────────────────────────────────────

/// Milliseconds elapsed since simulation start.
///
/// Millisecond resolution keeps all arithmetic in integers: an OOS window of
/// `D` seconds recovers at exactly `t + D * 1000`, with no float drift at the
/// boundary.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    #[inline]
    pub fn from_millis(ms: u64) -> Self {
        Timestamp(ms)
    }

    #[inline]
    pub fn from_secs(secs: u64) -> Self {
        Timestamp(secs.saturating_mul(1_000))
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Time elapsed from `earlier` to `self`; zero if `earlier` is later.
    #[inline]
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl std::ops::Add<Duration> for Timestamp {
    type Output = Timestamp;
    #[inline]
    fn add(self, rhs: Duration) -> Timestamp {
        let ms = u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX);
        Timestamp(self.0.saturating_add(ms))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}s", self.0 / 1_000, self.0 % 1_000)
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Source of the current simulation time.
///
/// The step loop reads [`now`](Self::now) once at the start of every step and
/// calls [`advance_tick`](Self::advance_tick) once at the end.
pub trait Clock {
    /// The current time.
    fn now(&self) -> Timestamp;

    /// Hook called after each completed step.  Tick-driven clocks move time
    /// forward here; real-time and manual clocks ignore it.
    fn advance_tick(&mut self) {}
}

/// Deterministic clock where each tick represents a fixed slice of time.
///
/// `TickClock` is cheap to copy and holds no heap data.
#[derive(Clone, Debug)]
pub struct TickClock {
    /// How many simulated milliseconds one tick represents.
    pub tick_duration_ms: u64,
    /// Number of ticks completed so far.
    pub current_tick: Tick,
}

impl TickClock {
    pub fn new(tick_duration_ms: u64) -> Self {
        Self { tick_duration_ms, current_tick: Tick::ZERO }
    }
}

impl Clock for TickClock {
    #[inline]
    fn now(&self) -> Timestamp {
        Timestamp(self.current_tick.0.saturating_mul(self.tick_duration_ms))
    }

    #[inline]
    fn advance_tick(&mut self) {
        self.current_tick = self.current_tick + 1;
    }
}

/// Clock controlled entirely by the caller.
///
/// Clones share the same underlying time, so a test can hand one clone to the
/// simulation and keep another to move time forward between steps.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the absolute time.
    pub fn set(&self, at: Timestamp) {
        self.now_ms.store(at.0, Ordering::SeqCst);
    }

    /// Move time forward by `by`.
    pub fn advance(&self, by: Duration) {
        let ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.now_ms.load(Ordering::SeqCst))
    }
}

/// Real elapsed time since the clock was created.
#[derive(Clone, Debug)]
pub struct WallClock {
    started: Instant,
}

impl WallClock {
    pub fn start() -> Self {
        Self { started: Instant::now() }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for WallClock {
    fn now(&self) -> Timestamp {
        let ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        Timestamp(ms)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level step-loop configuration.
///
/// Typically loaded from a TOML scenario by the application crate and passed
/// to the simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Simulated milliseconds per tick when driven by a [`TickClock`].
    /// Default 33 ms (≈30 ticks per second).
    pub tick_duration_ms: u64,

    /// Hard cap on the number of steps `Sim::run` will execute.  Guards
    /// against a misconfigured run that can never complete.
    pub max_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// How many path hops the routing agent consumes per tick.  Zero leaves
    /// the routing agent parked once a path is set.
    pub hops_per_tick: u32,
}

impl SimConfig {
    /// Ticks per second implied by `tick_duration_ms` (used to pace
    /// wall-clock runs).
    pub fn tick_rate_hz(&self) -> f64 {
        if self.tick_duration_ms == 0 {
            return 0.0;
        }
        1_000.0 / self.tick_duration_ms as f64
    }

    /// Construct a [`TickClock`] pre-configured for this run.
    pub fn make_clock(&self) -> TickClock {
        TickClock::new(self.tick_duration_ms)
    }

    /// Reject settings under which simulated time or the run cannot advance.
    pub fn validate(&self) -> CoreResult<()> {
        if self.tick_duration_ms == 0 {
            return Err(CoreError::Config("tick_duration_ms must be positive".into()));
        }
        if self.max_ticks == 0 {
            return Err(CoreError::Config("max_ticks must be positive".into()));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_duration_ms: 33,
            max_ticks:        100_000,
            seed:             42,
            hops_per_tick:    1,
        }
    }
}
