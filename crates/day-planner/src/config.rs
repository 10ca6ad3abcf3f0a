//! Planner run configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use reward_kernel::{CurveParams, GridConfig};

/// Top-level planner configuration, loaded from TOML. Every field defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Slot width and sampling mode.
    #[serde(flatten)]
    pub grid: GridConfig,

    /// Reward-curve shape constants.
    pub curve: CurveParams,

    /// Wall-clock budget (milliseconds) for redrawing a zero-reward task
    /// before the last draw is accepted.
    pub retry_budget_ms: u64,

    /// PRNG seed; drawn from entropy when absent.
    pub seed: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            curve: CurveParams::default(),
            retry_budget_ms: 3_000,
            seed: None,
        }
    }
}

impl PlannerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
    }
}
