//! Randomized constructive scheduler.
//!
//! One greedy pass over the circular day:
//!
//! 1. draw a bedtime and a sleep duration and block out the sleep slots;
//! 2. queue every other slot in ascending order;
//! 3. for each queued slot, draw tasks from the candidate pool until one
//!    has a positive discretized reward (or the retry budget runs out),
//!    assign it, and retire it from the pool once it is exhausted.
//!
//! There is no backtracking: a slot's assignment is final.

use std::ops::Range;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use reward_kernel::{Category, ConfigurationError, Discretizer, GridConfig, Task};

use crate::clock::{Clock, SystemClock};
use crate::config::PlannerConfig;
use crate::plan::{IDLE, Plan};
use crate::task_set::TaskSet;

/// Where the sleep block landed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepPlacement {
    /// Drawn bedtime; may exceed 24 for a past-midnight bedtime.
    pub bedtime: f64,
    /// Bedtime relative to midnight: negative before midnight.
    pub relative_bedtime: f64,
    pub duration: f64,
    /// Reward of every sleep slot.
    pub reward: f64,
    /// Sleep slot ranges in assignment order (tail of the day first).
    pub chunks: Vec<Range<usize>>,
    /// Zero-reward gap before a past-midnight bedtime. Not part of the
    /// plan; those slots are scheduled like any other.
    pub filler: Option<Range<usize>>,
}

/// Counters for one scheduling run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStats {
    /// Slots filled by the work queue (sleep excluded).
    pub slots: usize,
    /// Tasks drawn from the pool, accepted or not.
    pub draws: usize,
    /// Draws rejected for a zero reward.
    pub rejections: usize,
    /// Slots where the retry budget ran out and the last draw was kept.
    pub starved_slots: usize,
    /// Times the emptied pool was refilled.
    pub pool_refills: usize,
    /// Slots left to the idle block because there were no candidates.
    pub idle_slots: usize,
}

/// Result of [`Scheduler::run`].
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    /// Normalized plan tiling the whole day.
    pub plan: Plan,
    pub sleep: SleepPlacement,
    pub stats: SchedulerStats,
    pub seed: u64,
}

/// Indices of the tasks still eligible for selection.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    active: Vec<usize>,
}

impl CandidatePool {
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            active: indices.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.active.contains(&index)
    }

    /// Uniform draw; `None` when empty.
    pub fn draw(&self, rng: &mut impl Rng) -> Option<usize> {
        self.active.choose(rng).copied()
    }

    pub fn retire(&mut self, index: usize) {
        self.active.retain(|&i| i != index);
    }

    pub fn refill(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.active = indices.into_iter().collect();
    }
}

/// Whether `task` leaves the pool after `slots_used` slots.
fn is_exhausted(task: &Task, slots_used: usize, slot_hours: f64, pf: f64) -> bool {
    match task.category() {
        Category::FixedTime => false,
        Category::Fun | Category::Necessity | Category::Meal | Category::LongTerm => {
            slots_used >= 1
        }
        Category::FixedDdl | Category::AsSoonAsPossible | Category::Sleeping => {
            match task.effort_budget(pf) {
                Some(budget) => slots_used as f64 * slot_hours >= budget - 1e-9,
                None => slots_used >= 1,
            }
        }
    }
}

/// Category-specific curve coordinate for `slot`.
pub fn slot_coordinate(category: Category, slot: usize, slot_hours: f64, curr_time: f64) -> f64 {
    match category {
        Category::FixedDdl | Category::AsSoonAsPossible => {
            let until_midnight = ((24.0 - curr_time) / slot_hours).ceil();
            (slot as f64 - until_midnight) * slot_hours
        }
        Category::LongTerm => slot_hours,
        Category::FixedTime
        | Category::Fun
        | Category::Necessity
        | Category::Meal
        | Category::Sleeping => slot as f64 * slot_hours,
    }
}

/// Bedtime relative to midnight: clock hours from noon onward count as
/// negative (the tail of the current day).
pub fn relative_bedtime(bedtime: f64) -> f64 {
    let hour = bedtime.rem_euclid(24.0);
    if hour >= 12.0 { hour - 24.0 } else { hour }
}

/// Whole-slot multiples of `slot_hours` within `[lo, hi]`.
fn grid_steps(lo: f64, hi: f64, slot_hours: f64) -> Vec<i64> {
    let first = (lo / slot_hours - 1e-9).ceil() as i64;
    let last = (hi / slot_hours + 1e-9).floor() as i64;
    if first <= last {
        (first..=last).collect()
    } else {
        vec![first]
    }
}

/// Builds one plan. Consumed by [`Scheduler::run`].
pub struct Scheduler<C: Clock = SystemClock> {
    tasks: TaskSet,
    config: PlannerConfig,
    clock: C,
    seed: u64,
}

impl Scheduler<SystemClock> {
    /// Validates the task set against `config`; a set that cannot be
    /// scheduled is rejected here with every offending entry listed.
    pub fn new(tasks: TaskSet, config: PlannerConfig) -> Result<Self, ConfigurationError> {
        tasks.validate(&config)?;
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self {
            tasks,
            config,
            clock: SystemClock::new(),
            seed,
        })
    }
}

impl<C: Clock> Scheduler<C> {
    pub fn with_clock<D: Clock>(self, clock: D) -> Scheduler<D> {
        Scheduler {
            tasks: self.tasks,
            config: self.config,
            clock,
            seed: self.seed,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn grid(&self) -> &GridConfig {
        &self.config.grid
    }

    /// Draw and block out the sleep slots.
    fn place_sleep(&self, plan: &mut Plan, rng: &mut ChaCha8Rng) -> Result<SleepPlacement> {
        let sleeping = &self.tasks.sleeping;
        let t = self.grid().slot_hours;
        let n = self.grid().slots_per_day() as i64;

        let bedtimes = grid_steps(sleeping.bedtime_min, sleeping.bedtime_max_unwrapped(), t);
        let max_slots = n.max(1);
        let durations: Vec<i64> = grid_steps(sleeping.duration_min, sleeping.duration_max, t)
            .into_iter()
            .map(|d| d.clamp(1, max_slots))
            .collect();

        let bed_step = bedtimes[rng.random_range(0..bedtimes.len())];
        let duration_slots = durations[rng.random_range(0..durations.len())];
        let bedtime = bed_step as f64 * t;
        let duration = duration_slots as f64 * t;

        let relative = relative_bedtime(bedtime);
        let relative_slot = (relative / t).round() as i64;
        let start = relative_slot.rem_euclid(n);
        let end = start + duration_slots;

        let chunks: Vec<Range<usize>> = if end <= n {
            vec![start as usize..end as usize]
        } else {
            vec![start as usize..n as usize, 0..(end - n) as usize]
        };
        let filler = (relative_slot > 0).then(|| 0..relative_slot as usize);

        let reward = sleeping
            .reward(bedtime.rem_euclid(24.0), duration, self.tasks.today.strictness)
            .context("failed to evaluate the sleep reward")?;

        for chunk in &chunks {
            plan.push_block(
                Category::Sleeping.name(),
                Some(Category::Sleeping),
                chunk.start,
                vec![reward; chunk.len()],
            );
        }

        info!(
            bedtime,
            relative_bedtime = relative,
            duration,
            reward,
            chunks = chunks.len(),
            "Placed sleep block"
        );

        Ok(SleepPlacement {
            bedtime,
            relative_bedtime: relative,
            duration,
            reward,
            chunks,
            filler,
        })
    }

    /// Build a plan. The scheduler is consumed; each run owns its pool,
    /// plan and PRNG.
    pub fn run(self) -> Result<ScheduleOutcome> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let grid = self.grid().clone();
        let t = grid.slot_hours;
        let n = grid.slots_per_day();
        let pf = self.config.curve.procrastination_factor;
        let strictness = self.tasks.today.strictness;
        let curr_time = self.tasks.today.curr_time;
        let budget = Duration::from_millis(self.config.retry_budget_ms);
        let discretizer = Discretizer::new(&grid);
        let tasks = &self.tasks.tasks;

        info!(
            seed = self.seed,
            tasks = tasks.len(),
            slot_hours = t,
            strictness,
            "Starting schedule run"
        );

        let mut plan = Plan::new(&grid);
        let sleep = self.place_sleep(&mut plan, &mut rng)?;

        let queue: Vec<usize> = (0..n).filter(|&slot| plan.owner(slot).is_none()).collect();

        let mut pool = CandidatePool::new(0..tasks.len());
        let mut used = vec![0usize; tasks.len()];
        let mut stats = SchedulerStats::default();

        for slot in queue {
            stats.slots += 1;

            if pool.is_empty() {
                // every task is retired at this point; start another round
                pool.refill(0..tasks.len());
                if !pool.is_empty() {
                    stats.pool_refills += 1;
                    debug!(slot, candidates = pool.len(), "Refilled candidate pool");
                }
            }

            let started = self.clock.now();
            let mut accepted = None;
            while let Some(index) = pool.draw(&mut rng) {
                stats.draws += 1;
                let task = &tasks[index];
                let coordinate = slot_coordinate(task.category(), slot, t, curr_time);
                let reward = discretizer
                    .slot_reward(task, coordinate, strictness, &self.config.curve)
                    .with_context(|| format!("failed to evaluate slot {slot}"))?;
                accepted = Some((index, reward));
                if reward > 0.0 {
                    break;
                }
                stats.rejections += 1;
                if self.clock.now().saturating_sub(started) >= budget {
                    stats.starved_slots += 1;
                    warn!(
                        slot,
                        task = %task.name,
                        budget_ms = self.config.retry_budget_ms,
                        "Retry budget exhausted, keeping zero-reward draw"
                    );
                    break;
                }
            }

            let Some((index, reward)) = accepted else {
                stats.idle_slots += 1;
                plan.assign(slot, IDLE, None, 0.0);
                continue;
            };

            let task = &tasks[index];
            let key = plan.assign(slot, &task.name, Some(task.category()), reward);
            used[index] += 1;
            debug!(slot, task = %task.name, block = %key, reward, "Assigned slot");

            if is_exhausted(task, used[index], t, pf) {
                pool.retire(index);
                debug!(task = %task.name, slots = used[index], "Task exhausted");
            }
        }

        let plan = plan.normalize();
        plan.check_tiling().context("scheduler produced a plan that does not tile the day")?;

        info!(
            blocks = plan.blocks().len(),
            total_reward = plan.total_reward(),
            draws = stats.draws,
            starved_slots = stats.starved_slots,
            "Schedule complete"
        );

        Ok(ScheduleOutcome {
            plan,
            sleep,
            stats,
            seed: self.seed,
        })
    }
}
