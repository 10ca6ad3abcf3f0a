//! Error types for curve construction, dispatch, and configuration checks.

use std::fmt;

use thiserror::Error;

use crate::task::Category;

/// A curve could not be built from its parameters.
///
/// These are raised while solving a curve's shape (decay rates, window
/// peaks), so that a degenerate configuration never produces NaN or Inf.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CurveError {
    #[error("anchor points out of order: x1 = {x1:.3} must be below x2 = {x2:.3}")]
    AnchorOrder { x1: f64, x2: f64 },

    #[error("decay rate undefined: log argument {argument:.3} is not positive")]
    LogDomain { argument: f64 },

    #[error("{field} range is empty ({min:.2} ..= {max:.2})")]
    EmptyRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} must be positive (got {value:.3})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} {value:.3} outside {bounds}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        bounds: &'static str,
    },

    #[error("necessity expects 0, 1 or 2 anchor hours, got {count}")]
    AnchorCount { count: usize },

    #[error("preference window is flat (peak {peak:.4}); widen it or raise the sigmoid steepness")]
    FlatWindow { peak: f64 },
}

/// Failure while evaluating a task's reward.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RewardError {
    /// A category-specific curve was invoked on a task of another category.
    #[error("{expected} reward curve invoked on task '{task}' of category {actual}")]
    CategoryMismatch {
        expected: Category,
        actual: Category,
        task: String,
    },

    #[error("task '{task}': {source}")]
    Curve {
        task: String,
        #[source]
        source: CurveError,
    },
}

/// One offending entry found while checking a task set.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    /// Task name, reserved record name (`today`, `sleeping`) or config section.
    pub subject: String,
    pub problem: String,
}

impl ConfigIssue {
    pub fn new(subject: impl Into<String>, problem: impl ToString) -> Self {
        Self {
            subject: subject.into(),
            problem: problem.to_string(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.problem)
    }
}

/// A task set or run configuration that cannot be scheduled.
///
/// Carries every offending entry, not just the first one found.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid configuration ({} issue(s)): {}", .issues.len(), join_issues(.issues))]
pub struct ConfigurationError {
    pub issues: Vec<ConfigIssue>,
}

impl ConfigurationError {
    /// Names of all subjects with at least one issue, in report order.
    pub fn subjects(&self) -> Vec<&str> {
        let mut subjects: Vec<&str> = Vec::new();
        for issue in &self.issues {
            if !subjects.contains(&issue.subject.as_str()) {
                subjects.push(&issue.subject);
            }
        }
        subjects
    }
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
