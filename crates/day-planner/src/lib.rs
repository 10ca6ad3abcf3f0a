//! Day Planner - builds a 24-hour activity plan from reward curves.
//!
//! A task set (today's meta record, the sleep singleton and any number of
//! candidate tasks) is turned into a plan in one randomized greedy pass:
//!
//! - the sleep block is placed first, possibly straddling midnight;
//! - every other slot is given to a task drawn from a candidate pool,
//!   redrawing while the drawn task would earn nothing in that slot;
//! - the result is normalized into time-ordered, merged blocks.
//!
//! The plan is *a* feasible schedule, not an optimal one.

pub mod clock;
pub mod config;
pub mod generator;
pub mod plan;
pub mod report;
pub mod scheduler;
pub mod task_set;

pub use clock::{Clock, SteppingClock, SystemClock};
pub use config::PlannerConfig;
pub use generator::{TaskSetGenerator, TaskSetGeneratorConfig};
pub use plan::{Plan, PlanBlock};
pub use report::{PlanReport, TrialResults};
pub use scheduler::{CandidatePool, ScheduleOutcome, Scheduler, SchedulerStats, SleepPlacement};
pub use task_set::{TaskSet, Today};
