//! Task set generator.
//!
//! Generates random but schedulable task sets for tests, demos and
//! multi-seed trials.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use reward_kernel::task::{
    AsSoonAsPossible, FixedDdl, FixedTime, Fun, LongTerm, Meal, Necessity, Sleeping,
};
use reward_kernel::{Task, TaskKind};

use crate::task_set::{TaskSet, Today};

/// Configuration for generating task sets.
#[derive(Debug, Clone)]
pub struct TaskSetGeneratorConfig {
    /// Number of `fun` tasks.
    pub fun_tasks: usize,
    /// Number of meals (at most 3: breakfast, lunch, dinner).
    pub meals: usize,
    /// Number of `necessity` tasks.
    pub necessities: usize,
    /// Number of `fixed_time` appointments.
    pub fixed_time_tasks: usize,
    /// Number of `fixed_ddl` tasks.
    pub deadline_tasks: usize,
    /// Number of `as_soon_as_possible` tasks.
    pub asap_tasks: usize,
    /// Number of `long_term` habits.
    pub long_term_tasks: usize,
    /// Enjoyment/productivity range (min, max).
    pub score_range: (f64, f64),
    /// Effort estimate range in hours (min, max).
    pub effort_range: (f64, f64),
    /// Deadline slack in hours beyond the effort estimate (min, max).
    pub deadline_slack: (f64, f64),
}

impl Default for TaskSetGeneratorConfig {
    fn default() -> Self {
        Self::easy()
    }
}

impl TaskSetGeneratorConfig {
    /// Easy: a handful of flexible tasks, generous deadlines.
    pub fn easy() -> Self {
        Self {
            fun_tasks: 2,
            meals: 3,
            necessities: 1,
            fixed_time_tasks: 1,
            deadline_tasks: 1,
            asap_tasks: 1,
            long_term_tasks: 1,
            score_range: (3.0, 9.0),
            effort_range: (1.0, 2.0),
            deadline_slack: (12.0, 36.0),
        }
    }

    /// Medium: more commitments competing for the same hours.
    pub fn medium() -> Self {
        Self {
            fun_tasks: 3,
            meals: 3,
            necessities: 2,
            fixed_time_tasks: 2,
            deadline_tasks: 2,
            asap_tasks: 2,
            long_term_tasks: 2,
            score_range: (2.0, 9.0),
            effort_range: (1.0, 3.0),
            deadline_slack: (4.0, 24.0),
        }
    }

    /// Hard: many tasks, large efforts and deadlines that may fall before
    /// the procrastinated effort fits.
    pub fn hard() -> Self {
        Self {
            fun_tasks: 3,
            meals: 3,
            necessities: 3,
            fixed_time_tasks: 3,
            deadline_tasks: 4,
            asap_tasks: 3,
            long_term_tasks: 3,
            score_range: (1.0, 10.0),
            effort_range: (2.0, 5.0),
            deadline_slack: (-1.0, 12.0),
        }
    }

    pub fn total_tasks(&self) -> usize {
        self.fun_tasks
            + self.meals.min(MEALS.len())
            + self.necessities
            + self.fixed_time_tasks
            + self.deadline_tasks
            + self.asap_tasks
            + self.long_term_tasks
    }
}

const FUN_NAMES: &[&str] = &["games", "reading", "music", "movie", "walk"];
const NECESSITY_NAMES: &[&str] = &["shower", "laundry", "groceries", "pills", "cleaning"];
const FIXED_NAMES: &[&str] = &["lecture", "meeting", "dentist", "seminar", "lab_session"];
const DEADLINE_NAMES: &[&str] = &["essay", "report", "slides", "review", "tax_return"];
const ASAP_NAMES: &[&str] = &["email", "bug_fix", "lab_writeup", "forms", "refund"];
const LONG_TERM_NAMES: &[&str] = &["piano", "running", "language", "drawing", "meditation"];
/// Nominal windows: (name, start, end).
const MEALS: &[(&str, f64, f64)] = &[
    ("breakfast", 7.0, 10.0),
    ("lunch", 11.0, 14.0),
    ("dinner", 17.0, 20.0),
];

fn name_for(names: &[&str], index: usize) -> String {
    match names.get(index) {
        Some(name) => name.to_string(),
        None => format!("{}_{}", names[index % names.len()], index / names.len()),
    }
}

/// Round to the nearest half.
fn half(x: f64) -> f64 {
    (x * 2.0).round() / 2.0
}

/// Generator for task sets.
pub struct TaskSetGenerator {
    config: TaskSetGeneratorConfig,
    rng: ChaCha8Rng,
}

impl TaskSetGenerator {
    /// Create a new generator with the given config and seed.
    pub fn new(config: TaskSetGeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generate a task set.
    pub fn generate(&mut self) -> TaskSet {
        let today = Today {
            curr_time: self.rng.random_range(6..=22) as f64,
            day: self.rng.random_range(0..7),
            strictness: (self.rng.random_range(0..=10) as f64) / 10.0,
        };
        let sleeping = self.generate_sleeping();
        let tasks = self.generate_tasks();
        TaskSet::new(today, sleeping, tasks)
    }

    fn score(&mut self) -> f64 {
        let (lo, hi) = self.config.score_range;
        half(self.rng.random_range(lo..=hi))
    }

    fn effort(&mut self) -> f64 {
        let (lo, hi) = self.config.effort_range;
        half(self.rng.random_range(lo..=hi)).max(0.5)
    }

    fn generate_sleeping(&mut self) -> Sleeping {
        let duration_min = self.rng.random_range(5..=7) as f64;
        Sleeping {
            duration_min,
            duration_max: duration_min + self.rng.random_range(2..=4) as f64,
            bedtime_min: self.rng.random_range(21..=23) as f64,
            bedtime_max: self.rng.random_range(0..=3) as f64,
            enjoyment: self.score(),
            productivity: self.score(),
        }
    }

    fn task(&mut self, name: String, kind: TaskKind) -> Task {
        let enjoyment = self.score();
        let productivity = self.score();
        Task::new(name, enjoyment, productivity, kind)
    }

    fn generate_tasks(&mut self) -> Vec<Task> {
        let mut tasks = Vec::with_capacity(self.config.total_tasks());

        for i in 0..self.config.fun_tasks {
            tasks.push(self.task(name_for(FUN_NAMES, i), TaskKind::Fun(Fun {})));
        }

        for &(name, start, end) in MEALS.iter().take(self.config.meals) {
            let shift = self.rng.random_range(-1..=1) as f64;
            let kind = TaskKind::Meal(Meal {
                time: [start + shift, end + shift],
            });
            tasks.push(self.task(name.to_string(), kind));
        }

        for i in 0..self.config.necessities {
            let time = match self.rng.random_range(0..3) {
                0 => Vec::new(),
                1 => vec![self.rng.random_range(6..=22) as f64],
                _ => {
                    let start = self.rng.random_range(6..=20);
                    vec![start as f64, (start + self.rng.random_range(1..=3)) as f64]
                }
            };
            let kind = TaskKind::Necessity(Necessity { time });
            tasks.push(self.task(name_for(NECESSITY_NAMES, i), kind));
        }

        for i in 0..self.config.fixed_time_tasks {
            let kind = TaskKind::FixedTime(FixedTime {
                start: self.rng.random_range(8..=18) as f64,
                duration: self.rng.random_range(1..=3) as f64,
            });
            tasks.push(self.task(name_for(FIXED_NAMES, i), kind));
        }

        for i in 0..self.config.deadline_tasks {
            let approx_time = self.effort();
            let (lo, hi) = self.config.deadline_slack;
            let deadline = half(approx_time + self.rng.random_range(lo..=hi)).max(1.0);
            let kind = TaskKind::FixedDdl(FixedDdl {
                approx_time,
                deadline,
            });
            tasks.push(self.task(name_for(DEADLINE_NAMES, i), kind));
        }

        for i in 0..self.config.asap_tasks {
            let kind = TaskKind::AsSoonAsPossible(AsSoonAsPossible {
                approx_time: self.effort(),
            });
            tasks.push(self.task(name_for(ASAP_NAMES, i), kind));
        }

        for i in 0..self.config.long_term_tasks {
            let kind = TaskKind::LongTerm(LongTerm {
                insist_day: self.rng.random_range(0..=30),
                duration_max: self.rng.random_range(1..=3) as f64,
            });
            tasks.push(self.task(name_for(LONG_TERM_NAMES, i), kind));
        }

        tasks
    }
}
