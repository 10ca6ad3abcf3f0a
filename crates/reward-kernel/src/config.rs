//! Run parameters for the reward curves and the time grid.

use serde::{Deserialize, Serialize};

use crate::error::ConfigIssue;

/// Shape constants for the reward curves.
///
/// These were picked empirically; they are parameters, not protocol fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveParams {
    /// Multiplier on a task's effort estimate before its reward halves.
    pub procrastination_factor: f64,

    /// Weight of past consecutive days for long-term tasks (0.0 to 1.0).
    pub insist_decay: f64,

    /// Half-width (hours) of the preferred window around necessity anchors.
    pub relaxation_hours: f64,

    /// Steepness of the logistic edges of preference windows.
    pub sigmoid_steepness: f64,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            procrastination_factor: 1.4,
            insist_decay: 0.7,
            relaxation_hours: 1.0,
            sigmoid_steepness: 3.0,
        }
    }
}

impl CurveParams {
    pub fn check(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if !(self.procrastination_factor > 0.0) {
            issues.push(ConfigIssue::new(
                "curve",
                format!(
                    "procrastination_factor must be positive (got {:.3})",
                    self.procrastination_factor
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.insist_decay) {
            issues.push(ConfigIssue::new(
                "curve",
                format!("insist_decay {:.3} outside [0, 1]", self.insist_decay),
            ));
        }
        if !(self.relaxation_hours >= 0.0) {
            issues.push(ConfigIssue::new(
                "curve",
                format!(
                    "relaxation_hours must not be negative (got {:.3})",
                    self.relaxation_hours
                ),
            ));
        }
        if !(self.sigmoid_steepness > 0.0) {
            issues.push(ConfigIssue::new(
                "curve",
                format!(
                    "sigmoid_steepness must be positive (got {:.3})",
                    self.sigmoid_steepness
                ),
            ));
        }
        issues
    }
}

/// How many points the discretizer samples per slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleMode {
    /// One sample per minute, both slot endpoints included.
    #[default]
    Detailed,
    /// Slot endpoints only.
    Coarse,
}

/// The day grid: slot width `T` (hours) and sampling mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Slot width in hours; `60 * slot_hours` must be a whole number of
    /// minutes that divides the day.
    pub slot_hours: f64,

    pub sample_mode: SampleMode,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            slot_hours: 1.0,
            sample_mode: SampleMode::Detailed,
        }
    }
}

const MINUTES_PER_DAY: u32 = 24 * 60;

impl GridConfig {
    pub fn new(slot_hours: f64, sample_mode: SampleMode) -> Self {
        Self {
            slot_hours,
            sample_mode,
        }
    }

    /// Slot width in whole minutes (0 when the width is not a whole minute).
    pub fn minutes_per_slot(&self) -> u32 {
        let minutes = self.slot_hours * 60.0;
        if minutes >= 1.0 && (minutes - minutes.round()).abs() < 1e-9 {
            minutes.round() as u32
        } else {
            0
        }
    }

    /// Number of slots `N` in the circular day.
    pub fn slots_per_day(&self) -> usize {
        match self.minutes_per_slot() {
            0 => 0,
            m => (MINUTES_PER_DAY / m) as usize,
        }
    }

    pub fn check(&self) -> Vec<ConfigIssue> {
        let minutes = self.minutes_per_slot();
        if minutes == 0 {
            return vec![ConfigIssue::new(
                "grid",
                format!(
                    "slot_hours {:.4} is not a whole number of minutes",
                    self.slot_hours
                ),
            )];
        }
        if !MINUTES_PER_DAY.is_multiple_of(minutes) {
            return vec![ConfigIssue::new(
                "grid",
                format!("a {minutes}-minute slot does not divide the 24-hour day"),
            )];
        }
        Vec::new()
    }
}
