//! Task sets: the `today` meta record, the sleep singleton and the
//! candidate tasks, as read from a TOML or JSON file.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use reward_kernel::{ConfigurationError, Sleeping, Task, TaskRecord, Validator};

use crate::config::PlannerConfig;

/// The `today` meta record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Today {
    /// Current clock hour, in `[0, 24)`.
    pub curr_time: f64,
    /// Day counter; informational.
    #[serde(default)]
    pub day: u32,
    /// Weight of productivity against enjoyment, in `[0, 1]`.
    pub strictness: f64,
}

/// File shape: one map from entry name to record, with `today` and
/// `sleeping` reserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTaskSet {
    pub today: Today,
    pub sleeping: Sleeping,
    #[serde(flatten)]
    pub tasks: BTreeMap<String, TaskRecord>,
}

/// A loaded task set. Candidate tasks are kept sorted by name so that a
/// seeded run does not depend on file order.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSet {
    pub today: Today,
    pub sleeping: Sleeping,
    pub tasks: Vec<Task>,
}

impl From<RawTaskSet> for TaskSet {
    fn from(raw: RawTaskSet) -> Self {
        Self {
            today: raw.today,
            sleeping: raw.sleeping,
            tasks: raw
                .tasks
                .into_iter()
                .map(|(name, record)| record.into_task(name))
                .collect(),
        }
    }
}

impl TaskSet {
    pub fn new(today: Today, sleeping: Sleeping, mut tasks: Vec<Task>) -> Self {
        tasks.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            today,
            sleeping,
            tasks,
        }
    }

    /// Load a task set; `.json` files are parsed as JSON, anything else as
    /// TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read task set {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        };
        parsed.with_context(|| format!("failed to parse task set {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw: RawTaskSet = toml::from_str(text)?;
        Ok(raw.into())
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: RawTaskSet = serde_json::from_str(text)?;
        Ok(raw.into())
    }

    pub fn to_raw(&self) -> RawTaskSet {
        RawTaskSet {
            today: self.today.clone(),
            sleeping: self.sleeping.clone(),
            tasks: self
                .tasks
                .iter()
                .map(|task| (task.name.clone(), TaskRecord::from(task)))
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_raw())?)
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.name == name)
    }

    /// Check every value range and curve shape against `config`, reporting
    /// all offending entries together.
    pub fn validate(&self, config: &PlannerConfig) -> Result<(), ConfigurationError> {
        let strictness = self.today.strictness;
        let mut validator = Validator::new();
        validator
            .grid(&config.grid)
            .params(&config.curve)
            .today(self.today.curr_time, strictness)
            .sleeping(&self.sleeping);
        for task in &self.tasks {
            validator.task(task, strictness, &config.curve);
        }
        validator.finish()
    }
}
