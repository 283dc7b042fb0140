//! Unit tests for tour-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, NodeId, VisitorId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(3);
        assert_eq!(id.index(), 3);
        assert_eq!(AgentId::try_from(3usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(NodeId(1) < NodeId(2));
        assert!(VisitorId(10) > VisitorId(9));
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(19).to_string(), "NodeId(19)");
    }
}

#[cfg(test)]
mod time {
    use std::time::Duration;

    use crate::{Clock, ManualClock, SimConfig, Tick, TickClock, Timestamp};

    #[test]
    fn timestamp_arithmetic() {
        let t = Timestamp::from_secs(2);
        assert_eq!(t.as_millis(), 2_000);
        assert_eq!(t + Duration::from_millis(500), Timestamp(2_500));
        assert_eq!(Timestamp(2_500).saturating_since(t), Duration::from_millis(500));
        assert_eq!(t.saturating_since(Timestamp(2_500)), Duration::ZERO);
    }

    #[test]
    fn timestamp_display() {
        assert_eq!(Timestamp(5_042).to_string(), "5.042s");
    }

    #[test]
    fn tick_clock_advances_by_duration() {
        let mut clock = TickClock::new(250);
        assert_eq!(clock.now(), Timestamp::ZERO);
        clock.advance_tick();
        clock.advance_tick();
        assert_eq!(clock.current_tick, Tick(2));
        assert_eq!(clock.now(), Timestamp(500));
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(Duration::from_secs(3));
        assert_eq!(clock.now(), Timestamp::from_secs(3));
        handle.set(Timestamp(10));
        assert_eq!(clock.now(), Timestamp(10));
    }

    #[test]
    fn manual_clock_ignores_ticks() {
        let mut clock = ManualClock::new();
        clock.advance_tick();
        assert_eq!(clock.now(), Timestamp::ZERO);
    }

    #[test]
    fn config_defaults_and_rate() {
        let config = SimConfig::default();
        assert_eq!(config.hops_per_tick, 1);
        let rate = SimConfig { tick_duration_ms: 100, ..config }.tick_rate_hz();
        assert!((rate - 10.0).abs() < 1e-9);
        assert_eq!(SimConfig { tick_duration_ms: 0, ..SimConfig::default() }.tick_rate_hz(), 0.0);
    }

    #[test]
    fn config_validation() {
        assert!(SimConfig::default().validate().is_ok());
        assert!(SimConfig { hops_per_tick: 0, ..SimConfig::default() }.validate().is_ok());
        assert!(matches!(
            SimConfig { tick_duration_ms: 0, ..SimConfig::default() }.validate(),
            Err(crate::CoreError::Config(_))
        ));
        assert!(SimConfig { max_ticks: 0, ..SimConfig::default() }.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        for _ in 0..16 {
            assert_eq!(a.gen_range(0..1_000u32), b.gen_range(0..1_000u32));
        }
    }

    #[test]
    fn children_are_reproducible() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        let mut ca = a.child(1);
        let mut cb = b.child(1);
        assert_eq!(ca.random::<u64>(), cb.random::<u64>());
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SimRng::new(0);
        let empty: [u32; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[5]), Some(&5));
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(1);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
        assert!(rng.gen_bool(7.5)); // clamped to 1.0
    }
}

#[cfg(test)]
mod metrics {
    use crate::{Metric, MetricsCounter};

    #[test]
    fn record_is_monotonic() {
        let mut m = MetricsCounter::new();
        assert_eq!(m.record(Metric::DispatchFailure), 1);
        assert_eq!(m.record(Metric::DispatchFailure), 2);
        assert_eq!(m.get(Metric::DispatchFailure), 2);
        assert_eq!(m.get(Metric::DispatchSuccess), 0);
    }

    #[test]
    fn snapshot_and_rate() {
        let mut m = MetricsCounter::new();
        m.record(Metric::DispatchSuccess);
        m.record(Metric::DispatchSuccess);
        m.record(Metric::DispatchSuccess);
        m.record(Metric::DispatchFailure);
        let snap = m.snapshot();
        assert_eq!(snap.dispatch_success, 3);
        assert_eq!(m.dispatched(), 4);
        assert!((snap.success_rate() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn empty_rate_is_zero() {
        assert_eq!(MetricsCounter::new().snapshot().success_rate(), 0.0);
    }

    #[test]
    fn display_lists_all_metrics() {
        let mut m = MetricsCounter::new();
        m.record(Metric::OosViolation);
        assert_eq!(
            m.to_string(),
            "dispatch_success=0, dispatch_failure=0, guidance_provided=0, oos_violation=1"
        );
    }
}
