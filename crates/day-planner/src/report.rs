//! Run reports, multi-seed trial summaries and curve samples, written as
//! JSON.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use reward_kernel::{Category, Task, TaskKind};

use crate::config::PlannerConfig;
use crate::plan::Plan;
use crate::scheduler::{ScheduleOutcome, Scheduler, SchedulerStats, SleepPlacement};
use crate::task_set::TaskSet;

fn write_json(path: &Path, json: String) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Summary of one planning run, with the plan in its external shape.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub generated_at: DateTime<Utc>,
    pub seed: u64,
    /// Task file the plan was built from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub config: PlannerConfig,
    pub total_reward: f64,
    pub sleep: SleepPlacement,
    pub stats: SchedulerStats,
    pub plan: Plan,
}

impl PlanReport {
    pub fn new(outcome: ScheduleOutcome, config: PlannerConfig, source: Option<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            seed: outcome.seed,
            source,
            config,
            total_reward: outcome.plan.total_reward(),
            sleep: outcome.sleep,
            stats: outcome.stats,
            plan: outcome.plan,
        }
    }

    /// Save the report to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json(path.as_ref(), serde_json::to_string_pretty(self)?)
    }
}

/// One seeded run of a trial batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialResult {
    pub seed: u64,
    pub total_reward: f64,
    pub blocks: usize,
    pub bedtime: f64,
    pub sleep_duration: f64,
    pub stats: SchedulerStats,
}

/// Summary statistics over a trial batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub trials: usize,
    pub mean_reward: f64,
    /// Standard error of the mean reward: std_dev / sqrt(n)
    pub reward_se: f64,
    /// 95% confidence interval for the mean reward: (lower, upper)
    pub reward_ci: (f64, f64),
    pub min_reward: f64,
    pub max_reward: f64,
    /// Fraction of trials with at least one starved slot.
    pub starvation_rate: f64,
    pub avg_blocks: f64,
}

/// Rewards of the same task set planned under many seeds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrialResults {
    pub started_at: Option<DateTime<Utc>>,
    pub results: Vec<TrialResult>,
    pub summary: Option<TrialSummary>,
}

impl TrialResults {
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Plan `tasks` once per seed in `first_seed..first_seed + count`.
    pub fn collect(
        tasks: &TaskSet,
        config: &PlannerConfig,
        first_seed: u64,
        count: usize,
    ) -> Result<Self> {
        let mut trials = Self::new();
        for seed in (first_seed..).take(count) {
            let outcome = Scheduler::new(tasks.clone(), config.clone())?
                .with_seed(seed)
                .run()
                .with_context(|| format!("trial with seed {seed} failed"))?;
            info!(
                seed,
                total_reward = outcome.plan.total_reward(),
                starved_slots = outcome.stats.starved_slots,
                "Trial complete"
            );
            trials.add(&outcome);
        }
        trials.compute_summary();
        Ok(trials)
    }

    pub fn add(&mut self, outcome: &ScheduleOutcome) {
        self.results.push(TrialResult {
            seed: outcome.seed,
            total_reward: outcome.plan.total_reward(),
            blocks: outcome.plan.blocks().len(),
            bedtime: outcome.sleep.bedtime,
            sleep_duration: outcome.sleep.duration,
            stats: outcome.stats.clone(),
        });
    }

    /// Compute summary statistics; `None` when there are no results.
    pub fn compute_summary(&mut self) {
        let trials = self.results.len();
        if trials == 0 {
            self.summary = None;
            return;
        }
        let n = trials as f64;
        let rewards: Vec<f64> = self.results.iter().map(|r| r.total_reward).collect();
        let mean_reward = rewards.iter().sum::<f64>() / n;

        // Standard error for continuous: SE = std_dev / sqrt(n)
        let reward_se = if trials > 1 {
            let variance =
                rewards.iter().map(|r| (r - mean_reward).powi(2)).sum::<f64>() / (n - 1.0);
            variance.sqrt() / n.sqrt()
        } else {
            0.0
        };

        let z = 1.96;
        let reward_ci = (mean_reward - z * reward_se, mean_reward + z * reward_se);

        let starved = self
            .results
            .iter()
            .filter(|r| r.stats.starved_slots > 0)
            .count();

        self.summary = Some(TrialSummary {
            trials,
            mean_reward,
            reward_se,
            reward_ci,
            min_reward: rewards.iter().copied().fold(f64::INFINITY, f64::min),
            max_reward: rewards.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            starvation_rate: starved as f64 / n,
            avg_blocks: self.results.iter().map(|r| r.blocks as f64).sum::<f64>() / n,
        });
    }

    /// Save results to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json(path.as_ref(), serde_json::to_string_pretty(self)?)
    }

    /// Load results from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Sampled reward curve of one task, for an external chart renderer.
#[derive(Debug, Clone, Serialize)]
pub struct CurveSeries {
    pub category: Category,
    /// What the x coordinate means for this category.
    pub x_axis: &'static str,
    /// `[x, reward]` pairs.
    pub points: Vec<[f64; 2]>,
}

/// Range of x worth charting for `task`.
fn curve_domain(task: &Task, params: &reward_kernel::CurveParams) -> (f64, f64, &'static str) {
    match &task.kind {
        TaskKind::FixedDdl(t) => (0.0, t.deadline, "hours since now"),
        TaskKind::AsSoonAsPossible(t) => (
            0.0,
            3.0 * t.approx_time * params.procrastination_factor,
            "hours since now",
        ),
        TaskKind::LongTerm(t) => (0.0, 1.5 * t.duration_max, "hours spent today"),
        TaskKind::FixedTime(_) | TaskKind::Fun(_) | TaskKind::Necessity(_) | TaskKind::Meal(_) => {
            (0.0, 24.0, "clock hour")
        }
    }
}

/// Sample every task's continuous curve (or only `only`) every `step`
/// hours. The sleep curve is sampled over duration at `bedtime_min`.
pub fn sample_curves(
    tasks: &TaskSet,
    config: &PlannerConfig,
    step: f64,
    only: Option<&str>,
) -> Result<BTreeMap<String, CurveSeries>> {
    anyhow::ensure!(step > 0.0, "sampling step must be positive (got {step})");
    let strictness = tasks.today.strictness;
    let grid = |lo: f64, hi: f64| {
        let count = ((hi - lo) / step).floor() as usize;
        (0..=count).map(move |i| lo + i as f64 * step)
    };

    let mut series = BTreeMap::new();
    for task in &tasks.tasks {
        if only.is_some_and(|name| name != task.name) {
            continue;
        }
        let (lo, hi, x_axis) = curve_domain(task, &config.curve);
        let points = grid(lo, hi)
            .map(|x| -> Result<[f64; 2]> { Ok([x, task.reward(x, strictness, &config.curve)?]) })
            .collect::<Result<Vec<_>>>()?;
        series.insert(
            task.name.clone(),
            CurveSeries {
                category: task.category(),
                x_axis,
                points,
            },
        );
    }

    if only.is_none_or(|name| name == Category::Sleeping.name()) {
        let sleeping = &tasks.sleeping;
        let points = grid(0.0, sleeping.duration_max + 1.0)
            .map(|d| -> Result<[f64; 2]> {
                Ok([d, sleeping.reward(sleeping.bedtime_min, d, strictness)?])
            })
            .collect::<Result<Vec<_>>>()?;
        series.insert(
            Category::Sleeping.name().to_string(),
            CurveSeries {
                category: Category::Sleeping,
                x_axis: "hours of sleep",
                points,
            },
        );
    }

    if let Some(name) = only
        && series.is_empty()
    {
        anyhow::bail!("no task named '{name}'");
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(seed: u64, total_reward: f64, starved_slots: usize) -> TrialResult {
        TrialResult {
            seed,
            total_reward,
            blocks: 3,
            bedtime: 23.0,
            sleep_duration: 7.0,
            stats: SchedulerStats {
                starved_slots,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_trial_summary() {
        let mut trials = TrialResults::new();
        trials.results = vec![result(0, 10.0, 0), result(1, 12.0, 2), result(2, 14.0, 0)];
        trials.compute_summary();

        let summary = trials.summary.clone().unwrap();
        assert_eq!(summary.trials, 3);
        assert!((summary.mean_reward - 12.0).abs() < 1e-12);
        // sample std dev 2, so SE = 2 / sqrt(3)
        assert!((summary.reward_se - 2.0 / 3.0_f64.sqrt()).abs() < 1e-12);
        assert!(summary.reward_ci.0 < 12.0 && summary.reward_ci.1 > 12.0);
        assert_eq!(summary.min_reward, 10.0);
        assert_eq!(summary.max_reward, 14.0);
        assert!((summary.starvation_rate - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_trial_has_zero_se() {
        let mut trials = TrialResults::new();
        trials.results = vec![result(9, 40.0, 0)];
        trials.compute_summary();
        let summary = trials.summary.unwrap();
        assert_eq!(summary.reward_se, 0.0);
        assert_eq!(summary.reward_ci, (40.0, 40.0));
    }

    #[test]
    fn test_empty_batch_has_no_summary() {
        let mut trials = TrialResults::new();
        trials.compute_summary();
        assert!(trials.summary.is_none());
    }

    fn small_set() -> TaskSet {
        TaskSet::from_toml_str(
            r#"
[today]
curr_time = 22
strictness = 0.5

[sleeping]
duration_min = 5
duration_max = 9
bedtime_min = 23
bedtime_max = 2
enjoyment = 6
productivity = 2

[games]
type = "fun"
enjoyment = 8
productivity = 3

[lab]
type = "as_soon_as_possible"
approx_time = 2
enjoyment = 6
productivity = 6
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_sample_curves() {
        let set = small_set();
        let curves = sample_curves(&set, &PlannerConfig::default(), 0.5, None).unwrap();
        assert_eq!(curves.len(), 3);

        let games = &curves["games"];
        assert_eq!(games.points.len(), 49);
        assert!(games.points.iter().all(|[_, y]| *y == 5.5));

        let lab = &curves["lab"];
        assert_eq!(lab.points[0], [0.0, 6.0]);
        assert!(lab.points.windows(2).all(|w| w[1][1] < w[0][1]));

        let sleeping = &curves["sleeping"];
        assert_eq!(sleeping.points[0][1], 0.0);
    }

    #[test]
    fn test_sample_single_curve() {
        let set = small_set();
        let config = PlannerConfig::default();
        let only = sample_curves(&set, &config, 1.0, Some("lab")).unwrap();
        assert_eq!(only.keys().collect::<Vec<_>>(), vec!["lab"]);
        assert!(sample_curves(&set, &config, 1.0, Some("nothing")).is_err());
        assert!(sample_curves(&set, &config, 0.0, None).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("trials.json");

        let mut trials = TrialResults::new();
        trials.results = vec![result(0, 10.0, 0), result(1, 20.0, 1)];
        trials.compute_summary();
        trials.save(&path).unwrap();

        let loaded = TrialResults::load(&path).unwrap();
        assert_eq!(loaded.results.len(), 2);
        assert_eq!(loaded.summary, trials.summary);
    }
}
