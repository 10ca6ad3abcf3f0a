//! Value-range and degeneracy checks run before any scheduling attempt.
//!
//! Field presence is enforced when a task set is deserialized; this module
//! catches values that would make a curve meaningless (empty ranges,
//! anchors that need `ln(x <= 0)`, out-of-range strictness, ...). Every
//! problem is collected, so one run reports all offending tasks at once.

use crate::config::{CurveParams, GridConfig};
use crate::error::{ConfigIssue, ConfigurationError, CurveError};
use crate::task::{Sleeping, Task, TaskKind};

/// Collects configuration issues across a whole task set.
#[derive(Debug, Default)]
pub struct Validator {
    issues: Vec<ConfigIssue>,
}

fn in_day(hour: f64) -> bool {
    (0.0..24.0).contains(&hour)
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, subject: &str, problem: impl ToString) {
        self.issues.push(ConfigIssue::new(subject, problem));
    }

    pub fn grid(&mut self, grid: &GridConfig) -> &mut Self {
        self.issues.extend(grid.check());
        self
    }

    pub fn params(&mut self, params: &CurveParams) -> &mut Self {
        self.issues.extend(params.check());
        self
    }

    /// Checks the `today` meta record.
    pub fn today(&mut self, curr_time: f64, strictness: f64) -> &mut Self {
        if !(0.0..=1.0).contains(&strictness) {
            self.push("today", format!("strictness {strictness:.2} outside [0, 1]"));
        }
        if !in_day(curr_time) {
            self.push("today", format!("curr_time {curr_time:.2} outside [0, 24)"));
        }
        self
    }

    pub fn sleeping(&mut self, sleeping: &Sleeping) -> &mut Self {
        if !(sleeping.duration_min > 0.0) {
            self.push(
                "sleeping",
                CurveError::NonPositive {
                    field: "duration_min",
                    value: sleeping.duration_min,
                },
            );
        }
        if let Err(err) = sleeping.duration_factor(sleeping.duration_max) {
            self.push("sleeping", err);
        }
        if !(sleeping.duration_max < 24.0) {
            self.push(
                "sleeping",
                format!(
                    "duration_max {:.2} leaves no waking time in the day",
                    sleeping.duration_max
                ),
            );
        }
        for (field, hour) in [
            ("bedtime_min", sleeping.bedtime_min),
            ("bedtime_max", sleeping.bedtime_max),
        ] {
            if !in_day(hour) {
                self.push("sleeping", format!("{field} {hour:.2} outside [0, 24)"));
            }
        }
        self
    }

    /// Checks one candidate task, building its curve where the shape has
    /// to be solved so the same code path that evaluates it vets it.
    pub fn task(&mut self, task: &Task, strictness: f64, params: &CurveParams) -> &mut Self {
        let reward = task.combined_reward(strictness);
        let result: Result<(), CurveError> = match &task.kind {
            TaskKind::FixedTime(t) => {
                if !in_day(t.start) {
                    Err(CurveError::OutOfRange {
                        field: "start",
                        value: t.start,
                        bounds: "[0, 24)",
                    })
                } else if !(t.duration > 0.0 && t.duration < 24.0) {
                    Err(CurveError::OutOfRange {
                        field: "duration",
                        value: t.duration,
                        bounds: "(0, 24)",
                    })
                } else {
                    Ok(())
                }
            }
            TaskKind::FixedDdl(t) => t.curve(reward, params).map(|_| ()),
            TaskKind::AsSoonAsPossible(t) => t.curve(reward, params).map(|_| ()),
            TaskKind::Fun(_) => Ok(()),
            TaskKind::LongTerm(t) => t.duration_factor(0.0).map(|_| ()),
            TaskKind::Necessity(t) => {
                if let Some(hour) = t.time.iter().find(|h| !in_day(**h)) {
                    Err(CurveError::OutOfRange {
                        field: "time",
                        value: *hour,
                        bounds: "[0, 24)",
                    })
                } else {
                    t.window(params).map(|_| ())
                }
            }
            TaskKind::Meal(t) => t.window(params).map(|_| ()),
        };
        if let Err(err) = result {
            self.push(&task.name, err);
        }
        self
    }

    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }

    pub fn finish(self) -> Result<(), ConfigurationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigurationError {
                issues: self.issues,
            })
        }
    }
}
