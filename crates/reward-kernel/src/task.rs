//! Task types: the closed set of activity categories a day plan is built from.
//!
//! Every candidate task carries a name and two raw reward inputs
//! (`enjoyment`, `productivity`); the category decides which reward curve
//! applies and what its time coordinate means.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category tag of a task. The snake_case name doubles as the `type` tag in
/// task files and as the stem of plan block keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FixedTime,
    FixedDdl,
    AsSoonAsPossible,
    Fun,
    LongTerm,
    Necessity,
    Meal,
    Sleeping,
}

impl Category {
    /// All categories, in declaration order.
    pub fn all() -> [Self; 8] {
        [
            Self::FixedTime,
            Self::FixedDdl,
            Self::AsSoonAsPossible,
            Self::Fun,
            Self::LongTerm,
            Self::Necessity,
            Self::Meal,
            Self::Sleeping,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::FixedTime => "fixed_time",
            Self::FixedDdl => "fixed_ddl",
            Self::AsSoonAsPossible => "as_soon_as_possible",
            Self::Fun => "fun",
            Self::LongTerm => "long_term",
            Self::Necessity => "necessity",
            Self::Meal => "meal",
            Self::Sleeping => "sleeping",
        }
    }

    /// Whether the curve's coordinate is a wall-clock hour (wraps modulo 24).
    pub fn is_clock_referenced(&self) -> bool {
        matches!(
            self,
            Self::FixedTime | Self::Necessity | Self::Meal | Self::Fun
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed wall-clock window, e.g. a lecture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedTime {
    /// Clock hour the window opens.
    pub start: f64,
    /// Window length in hours.
    pub duration: f64,
}

/// Work with an effort estimate and a deadline (hours from now).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedDdl {
    pub approx_time: f64,
    pub deadline: f64,
}

/// Work that loses value the longer it is put off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsSoonAsPossible {
    pub approx_time: f64,
}

/// Always available, constant reward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fun {}

/// Habit whose value grows with consistency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongTerm {
    /// Consecutive days already invested.
    #[serde(default)]
    pub insist_day: u32,
    /// Duration (hours) at which the daily benefit saturates.
    pub duration_max: f64,
}

/// Daily necessity with an optional preferred hour or window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Necessity {
    /// 0 anchors: no preference; 1: preferred instant; 2: preferred window.
    #[serde(default)]
    pub time: Vec<f64>,
}

/// Meal with a preferred `[start, end]` window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub time: [f64; 2],
}

/// Category-specific part of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskKind {
    FixedTime(FixedTime),
    FixedDdl(FixedDdl),
    AsSoonAsPossible(AsSoonAsPossible),
    Fun(Fun),
    LongTerm(LongTerm),
    Necessity(Necessity),
    Meal(Meal),
}

impl TaskKind {
    pub fn category(&self) -> Category {
        match self {
            Self::FixedTime(_) => Category::FixedTime,
            Self::FixedDdl(_) => Category::FixedDdl,
            Self::AsSoonAsPossible(_) => Category::AsSoonAsPossible,
            Self::Fun(_) => Category::Fun,
            Self::LongTerm(_) => Category::LongTerm,
            Self::Necessity(_) => Category::Necessity,
            Self::Meal(_) => Category::Meal,
        }
    }
}

/// A schedulable candidate task.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub name: String,
    pub enjoyment: f64,
    pub productivity: f64,
    pub kind: TaskKind,
}

impl Task {
    pub fn new(name: impl Into<String>, enjoyment: f64, productivity: f64, kind: TaskKind) -> Self {
        Self {
            name: name.into(),
            enjoyment,
            productivity,
            kind,
        }
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Effort (hours) after which the task leaves the candidate pool, for
    /// categories that accumulate work. `None` for everything else.
    pub fn effort_budget(&self, procrastination_factor: f64) -> Option<f64> {
        match &self.kind {
            TaskKind::FixedDdl(t) => Some(t.approx_time * procrastination_factor),
            TaskKind::AsSoonAsPossible(t) => Some(t.approx_time * procrastination_factor),
            _ => None,
        }
    }
}

/// On-disk shape of a task: the name is the enclosing map key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub enjoyment: f64,
    pub productivity: f64,
    #[serde(flatten)]
    pub kind: TaskKind,
}

impl TaskRecord {
    pub fn into_task(self, name: impl Into<String>) -> Task {
        Task::new(name, self.enjoyment, self.productivity, self.kind)
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            enjoyment: task.enjoyment,
            productivity: task.productivity,
            kind: task.kind.clone(),
        }
    }
}

/// The sleep singleton. Not part of the candidate pool; placed first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sleeping {
    pub duration_min: f64,
    pub duration_max: f64,
    /// Earliest acceptable bedtime (clock hour, usually 21-24).
    pub bedtime_min: f64,
    /// Latest acceptable bedtime (clock hour, usually 0-4).
    pub bedtime_max: f64,
    pub enjoyment: f64,
    pub productivity: f64,
}

impl Sleeping {
    /// Latest bedtime unwrapped past midnight so that it is not below
    /// `bedtime_min` (e.g. 23 -> 2 becomes 23 -> 26).
    pub fn bedtime_max_unwrapped(&self) -> f64 {
        if self.bedtime_max < self.bedtime_min {
            self.bedtime_max + 24.0
        } else {
            self.bedtime_max
        }
    }
}
