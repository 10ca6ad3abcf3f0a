//! Reward Kernel: reward-over-time curves for daily activity planning
//!
//! This crate models how much value an activity yields depending on when,
//! and for how long, it is done. Each task category has its own continuous
//! curve; the discretizer turns those curves into per-slot rewards on a
//! circular 24-hour grid.

pub mod config;
pub mod curve;
pub mod discretize;
pub mod error;
pub mod task;
pub mod validate;

pub use config::{CurveParams, GridConfig, SampleMode};
pub use curve::{RewardCurve, combine, reward_as};
pub use discretize::Discretizer;
pub use error::{ConfigIssue, ConfigurationError, CurveError, RewardError};
pub use task::{Category, Sleeping, Task, TaskKind, TaskRecord};
pub use validate::Validator;
