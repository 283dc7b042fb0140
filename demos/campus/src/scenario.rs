//! TOML scenario file.
//!
//! Every section is optional; omitted values fall back to the built-in campus
//! defaults.  See `scenario.toml` next to `Cargo.toml` for a full example.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use tour_avail::OosPolicy;
use tour_core::{NodeId, SimConfig};
use tour_dispatch::VisitorPolicy;

use crate::network::ENTRANCE;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub sim:      SimConfig,
    pub campus:   CampusSection,
    pub agents:   AgentsSection,
    pub oos:      OosSection,
    pub visitors: VisitorsSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CampusSection {
    /// Routing agent start node.
    pub start: u32,
    /// Optional `id,x,y` node table; the built-in map is used when absent.
    pub nodes_csv: Option<PathBuf>,
    /// Optional `a,b` edge table; required together with `nodes_csv`.
    pub edges_csv: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentsSection {
    pub names:   Vec<String>,
    pub default: String,
    pub zones:   Vec<ZoneEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoneEntry {
    pub node:  u32,
    pub agent: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OosSection {
    pub threshold_secs: u64,
    pub probability:    f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisitorsSection {
    /// Number of random visitors; ignored when `destinations` is set.
    pub count:        usize,
    pub destinations: Option<Vec<u32>>,
}

impl Default for CampusSection {
    fn default() -> Self {
        Self { start: ENTRANCE.0, nodes_csv: None, edges_csv: None }
    }
}

impl Default for AgentsSection {
    fn default() -> Self {
        Self {
            names:   vec!["BI_Agent_A".into(), "BI_Agent_B".into()],
            default: "BI_Agent_A".into(),
            zones:   Vec::new(),
        }
    }
}

impl Default for OosSection {
    fn default() -> Self {
        Self { threshold_secs: 5, probability: 0.3 }
    }
}

impl Default for VisitorsSection {
    fn default() -> Self {
        Self { count: 5, destinations: None }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn oos_policy(&self) -> OosPolicy {
        OosPolicy::new(Duration::from_secs(self.oos.threshold_secs))
    }

    pub fn visitor_policy(&self) -> VisitorPolicy {
        match &self.visitors.destinations {
            Some(ids) => VisitorPolicy::Fixed(ids.iter().copied().map(NodeId).collect()),
            None => VisitorPolicy::Random { count: self.visitors.count },
        }
    }
}
