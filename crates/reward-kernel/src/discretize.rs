//! Slot discretization: the average of a reward curve over one grid slot.

use crate::config::{CurveParams, GridConfig, SampleMode};
use crate::curve::reward_as;
use crate::error::RewardError;
use crate::task::{Category, Task};

/// Averages a continuous curve over the half-open slot `[start, start + T)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Discretizer {
    slot_hours: f64,
    mode: SampleMode,
}

impl Discretizer {
    pub fn new(grid: &GridConfig) -> Self {
        Self {
            slot_hours: grid.slot_hours,
            mode: grid.sample_mode,
        }
    }

    pub fn slot_hours(&self) -> f64 {
        self.slot_hours
    }

    /// Sample coordinates for a slot starting at `start`.
    ///
    /// Detailed mode takes `round(60 T)` points, one at the middle of each
    /// minute; coarse mode takes the middles of the first and last minute.
    /// Every point lies strictly inside `[start, start + T)`, so a window
    /// edge at `start + T` belongs to the next slot.
    pub fn sample_points(&self, start: f64) -> Vec<f64> {
        let minutes = ((self.slot_hours * 60.0).round() as usize).max(1);
        let minute = |i: usize| start + (i as f64 + 0.5) / 60.0;
        match self.mode {
            SampleMode::Detailed => (0..minutes).map(minute).collect(),
            SampleMode::Coarse => vec![minute(0), minute(minutes - 1)],
        }
    }

    /// Mean of `curve` over the sample points of the slot at `start`.
    pub fn average<F, E>(&self, start: f64, mut curve: F) -> Result<f64, E>
    where
        F: FnMut(f64) -> Result<f64, E>,
    {
        let points = self.sample_points(start);
        let mut total = 0.0;
        for &x in &points {
            total += curve(x)?;
        }
        Ok(total / points.len() as f64)
    }

    /// Reward of `task` for the slot whose category-specific coordinate
    /// starts at `coordinate`. Clock-referenced categories wrap each sample
    /// modulo 24.
    pub fn slot_reward(
        &self,
        task: &Task,
        coordinate: f64,
        strictness: f64,
        params: &CurveParams,
    ) -> Result<f64, RewardError> {
        self.slot_reward_as(task.category(), task, coordinate, strictness, params)
    }

    /// Like [`Discretizer::slot_reward`], but the coordinate was derived for
    /// `expected`; a task of another category is rejected.
    pub fn slot_reward_as(
        &self,
        expected: Category,
        task: &Task,
        coordinate: f64,
        strictness: f64,
        params: &CurveParams,
    ) -> Result<f64, RewardError> {
        let wrap = expected.is_clock_referenced();
        self.average(coordinate, |x| {
            let x = if wrap { x.rem_euclid(24.0) } else { x };
            reward_as(expected, task, x, strictness, params)
        })
    }
}
