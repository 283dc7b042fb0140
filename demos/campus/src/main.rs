//! campus: visitor escort dispatch on a 21-building campus.
//!
//! A single routing agent waits at the entrance.  Visitors arrive with a
//! destination building; the secondary agent responsible for that building
//! either supplies the path (the routing agent walks the visitor there), or
//! is out of service and the visitor leaves unescorted.
//!
//! ```text
//! campus                         # headless, simulated time
//! campus --realtime              # paced at the tick rate on the wall clock
//! campus --replications 32       # many seeds, summary per seed
//! campus --scenario scenario.toml --seed 7 --visitors 20
//! ```
//!
//! Set `RUST_LOG=debug` to see every hop and metric update.

mod network;
mod scenario;

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tour_avail::StatusChange;
use tour_core::{MetricsCounter, MetricsSnapshot, NodeId, Tick, TickClock, WallClock};
use tour_dispatch::{Arrival, Assignment, RandomResponder};
use tour_graph::{DijkstraRouter, NavGraph, load_graph_csv};
use tour_sim::{
    Replication, SimBuilder, SimObserver, SimSummary, SimView, StepOutcome, TracingObserver,
    run_replications,
};

use network::build_campus;
use scenario::Scenario;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "campus", about = "Campus escort dispatch simulation")]
struct Args {
    /// TOML scenario file; built-in campus defaults when omitted.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Override the scenario seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of random visitors.
    #[arg(long)]
    visitors: Option<usize>,

    /// Pace steps at the tick rate using the wall clock.
    #[arg(long, conflicts_with = "replications")]
    realtime: bool,

    /// Run this many seeds (seed, seed+1, ...) and print one row per seed.
    #[arg(long)]
    replications: Option<usize>,
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs every event and reports when the set of out-of-service zones
/// changes, which is what a map view would highlight.
#[derive(Default)]
struct CampusObserver {
    inner:       TracingObserver,
    highlighted: Vec<NodeId>,
}

impl SimObserver for CampusObserver {
    fn on_status_change(&mut self, change: &StatusChange) {
        self.inner.on_status_change(change);
    }

    fn on_assignment(&mut self, assignment: &Assignment) {
        self.inner.on_assignment(assignment);
    }

    fn on_arrival(&mut self, arrival: &Arrival) {
        self.inner.on_arrival(arrival);
    }

    fn on_tick_end(&mut self, tick: Tick, view: &SimView<'_>) {
        self.inner.on_tick_end(tick, view);
        let zones = view.out_of_service_zones();
        if zones != self.highlighted {
            let labels: Vec<u32> = zones.iter().map(|n| n.0).collect();
            info!(%tick, now = %view.now, zones = ?labels, "out-of-service zones");
            self.highlighted = zones;
        }
    }

    fn on_complete(&mut self, tick: Tick, metrics: &MetricsCounter) {
        self.inner.on_complete(tick, metrics);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();

    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    if let Some(seed) = args.seed {
        scenario.sim.seed = seed;
    }
    if let Some(count) = args.visitors {
        scenario.visitors.count = count;
        scenario.visitors.destinations = None;
    }

    let graph = load_graph(&scenario)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        seed = scenario.sim.seed,
        tick_rate_hz = scenario.sim.tick_rate_hz(),
        "campus loaded"
    );

    if let Some(n) = args.replications {
        let first = scenario.sim.seed;
        let seeds: Vec<u64> = (0..n as u64).map(|i| first + i).collect();
        let t0 = Instant::now();
        let results = run_replications(&seeds, |seed| {
            let mut s = scenario.clone();
            s.sim.seed = seed;
            builder(&s, graph.clone()).build()
        })?;
        print_replications(&results);
        println!("{} replications in {:.3} s", results.len(), t0.elapsed().as_secs_f64());
        return Ok(());
    }

    let summary = if args.realtime {
        run_paced(&scenario, graph)?
    } else {
        builder(&scenario, graph).build()?.run(&mut CampusObserver::default())?
    };
    print_summary(&summary);
    Ok(())
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_graph(scenario: &Scenario) -> Result<NavGraph> {
    match (&scenario.campus.nodes_csv, &scenario.campus.edges_csv) {
        (None, None) => Ok(build_campus()?),
        (Some(nodes), Some(edges)) => load_graph_csv(nodes, edges)
            .with_context(|| format!("loading {} / {}", nodes.display(), edges.display())),
        _ => bail!("campus.nodes_csv and campus.edges_csv must be given together"),
    }
}

fn builder(scenario: &Scenario, graph: NavGraph) -> SimBuilder<RandomResponder, DijkstraRouter, TickClock> {
    let policy = scenario.oos_policy();
    let responder = RandomResponder::new(scenario.oos.probability, policy);

    let mut b = SimBuilder::new(scenario.sim.clone(), graph, responder, DijkstraRouter)
        .start(NodeId(scenario.campus.start))
        .oos_policy(policy)
        .visitors(scenario.visitor_policy())
        .default_agent(scenario.agents.default.as_str());
    for name in &scenario.agents.names {
        b = b.secondary_agent(name.as_str());
    }
    for zone in &scenario.agents.zones {
        b = b.assign_zone(NodeId(zone.node), zone.agent.as_str());
    }
    b
}

/// Step on the wall clock, sleeping to hold the configured tick rate.
fn run_paced(scenario: &Scenario, graph: NavGraph) -> Result<SimSummary> {
    let mut sim = builder(scenario, graph).clock(WallClock::start()).build()?;
    let tick = Duration::from_millis(scenario.sim.tick_duration_ms);
    let mut observer = CampusObserver::default();
    let mut next = Instant::now();

    while sim.tick().0 < scenario.sim.max_ticks {
        if sim.step(&mut observer)? != StepOutcome::Running {
            break;
        }
        next += tick;
        let now = Instant::now();
        if next > now {
            thread::sleep(next - now);
        }
    }
    Ok(sim.summary())
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_summary(summary: &SimSummary) {
    let m = summary.metrics;
    println!();
    println!(
        "Run {} after {} ticks",
        if summary.completed { "complete" } else { "stopped at tick cap" },
        summary.ticks
    );
    println!("{:<20} {:>8}", "Metric", "Count");
    println!("{}", "-".repeat(29));
    println!("{:<20} {:>8}", "dispatch_success", m.dispatch_success);
    println!("{:<20} {:>8}", "dispatch_failure", m.dispatch_failure);
    println!("{:<20} {:>8}", "guidance_provided", m.guidance_provided);
    println!("{:<20} {:>8}", "oos_violation", m.oos_violation);
    println!("{:<20} {:>7.1}%", "success rate", m.success_rate() * 100.0);
}

fn print_replications(results: &[Replication]) {
    println!("{:<8} {:>7} {:>8} {:>8} {:>8} {:>5}", "Seed", "Ticks", "Success", "Failure", "OOS", "Done");
    println!("{}", "-".repeat(50));
    let mut total = MetricsSnapshot::default();
    for r in results {
        let m = r.summary.metrics;
        println!(
            "{:<8} {:>7} {:>8} {:>8} {:>8} {:>5}",
            r.seed,
            r.summary.ticks,
            m.dispatch_success,
            m.dispatch_failure,
            m.oos_violation,
            if r.summary.completed { "yes" } else { "no" },
        );
        total.dispatch_success += m.dispatch_success;
        total.dispatch_failure += m.dispatch_failure;
        total.guidance_provided += m.guidance_provided;
        total.oos_violation += m.oos_violation;
    }
    println!("{}", "-".repeat(50));
    println!("Overall success rate: {:.1}%", total.success_rate() * 100.0);
}
