//! Reward curves: one continuous reward-over-time shape per task category.
//!
//! Every curve is scaled by the task's *combined reward*, the strictness
//! weighted mix of enjoyment and productivity produced by [`combine`], so
//! all categories are comparable on one scale. Curves never return a
//! negative value.
//!
//! | Category | coordinate `x` |
//! |---|---|
//! | fixed_time, necessity, meal, fun | clock hour |
//! | fixed_ddl, as_soon_as_possible | hours elapsed since assignment |
//! | long_term | hours accumulated today |
//! | sleeping | `(bedtime, duration)` pair, see [`Sleeping::reward`] |

use crate::config::CurveParams;
use crate::error::{CurveError, RewardError};
use crate::task::{
    AsSoonAsPossible, Category, FixedDdl, FixedTime, Fun, LongTerm, Meal, Necessity, Sleeping,
    Task, TaskKind,
};

/// Strictness-weighted reward: `s * productivity + (1 - s) * enjoyment`.
pub fn combine(strictness: f64, enjoyment: f64, productivity: f64) -> f64 {
    strictness * productivity + (1.0 - strictness) * enjoyment
}

/// Logistic sigmoid.
pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Signed offset of clock hour `x` from `center`, wrapped into `[-12, 12)`.
pub fn circular_offset(x: f64, center: f64) -> f64 {
    (x - center + 12.0).rem_euclid(24.0) - 12.0
}

/// A continuous reward shape for one task category.
pub trait RewardCurve {
    /// Reward at coordinate `x` for a task whose combined reward is `reward`.
    fn sample(&self, x: f64, reward: f64, params: &CurveParams) -> Result<f64, CurveError>;
}

/// Shape of an exponential piece fitted through two anchor points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceShape {
    /// `y = y1 + 1 - exp(k (x - x1))`: holds up early, drops off late.
    Accelerating,
    /// `y = y1 * exp(-k (x - x1))`: plain exponential decay.
    Decay,
}

/// Exponential piece through `(x1, y1)` and `(x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpPiece {
    shape: PieceShape,
    x1: f64,
    y1: f64,
    rate: f64,
}

impl ExpPiece {
    /// Solve the decay rate from two anchors.
    ///
    /// Fails when the anchors are out of order or when the rate would need
    /// the logarithm of a non-positive number (e.g. equal or zero rewards).
    pub fn through(shape: PieceShape, p1: (f64, f64), p2: (f64, f64)) -> Result<Self, CurveError> {
        let ((x1, y1), (x2, y2)) = (p1, p2);
        if !(x2 > x1) {
            return Err(CurveError::AnchorOrder { x1, x2 });
        }
        let argument = match shape {
            PieceShape::Accelerating => y1 + 1.0 - y2,
            PieceShape::Decay => y1 / y2,
        };
        if !(argument > 0.0) || !argument.is_finite() {
            return Err(CurveError::LogDomain { argument });
        }
        let rate = argument.ln() / (x2 - x1);
        if !rate.is_finite() {
            return Err(CurveError::LogDomain { argument });
        }
        Ok(Self {
            shape,
            x1,
            y1,
            rate,
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn eval(&self, x: f64) -> f64 {
        match self.shape {
            PieceShape::Accelerating => self.y1 + 1.0 - (self.rate * (x - self.x1)).exp(),
            PieceShape::Decay => self.y1 * (-self.rate * (x - self.x1)).exp(),
        }
    }
}

impl RewardCurve for FixedTime {
    fn sample(&self, x: f64, reward: f64, _params: &CurveParams) -> Result<f64, CurveError> {
        if !(self.duration > 0.0) {
            return Err(CurveError::NonPositive {
                field: "duration",
                value: self.duration,
            });
        }
        let offset = (x - self.start).rem_euclid(24.0);
        Ok(if offset <= self.duration {
            reward.max(0.0)
        } else {
            0.0
        })
    }
}

/// Piecewise curve of a deadline task: right edge of each segment plus the
/// piece that applies up to it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadlineCurve {
    segments: Vec<(f64, ExpPiece)>,
}

impl DeadlineCurve {
    pub fn eval(&self, x: f64) -> f64 {
        if x < 0.0 {
            return 0.0;
        }
        self.segments
            .iter()
            .find(|(edge, _)| x <= *edge)
            .map(|(_, piece)| piece.eval(x).max(0.0))
            .unwrap_or(0.0)
    }
}

impl FixedDdl {
    /// Fit the curve through `(0, R)`, `(approx_time * pf, R/2)` and
    /// `(deadline, R/5)`. When the procrastinated effort does not fit before
    /// the deadline, the middle anchor is dropped.
    pub fn curve(&self, reward: f64, params: &CurveParams) -> Result<DeadlineCurve, CurveError> {
        if !(self.approx_time > 0.0) {
            return Err(CurveError::NonPositive {
                field: "approx_time",
                value: self.approx_time,
            });
        }
        if !(self.deadline > 0.0) {
            return Err(CurveError::NonPositive {
                field: "deadline",
                value: self.deadline,
            });
        }

        let start = (0.0, reward);
        let knee = (self.approx_time * params.procrastination_factor, reward / 2.0);
        let end = (self.deadline, reward / 5.0);

        let segments = if knee.0 < end.0 {
            vec![
                (knee.0, ExpPiece::through(PieceShape::Accelerating, start, knee)?),
                (end.0, ExpPiece::through(PieceShape::Accelerating, knee, end)?),
            ]
        } else {
            vec![(end.0, ExpPiece::through(PieceShape::Accelerating, start, end)?)]
        };
        Ok(DeadlineCurve { segments })
    }
}

impl RewardCurve for FixedDdl {
    fn sample(&self, x: f64, reward: f64, params: &CurveParams) -> Result<f64, CurveError> {
        Ok(self.curve(reward, params)?.eval(x))
    }
}

impl AsSoonAsPossible {
    /// Decay through `(0, R)` and `(approx_time * pf, R/2)`.
    pub fn curve(&self, reward: f64, params: &CurveParams) -> Result<ExpPiece, CurveError> {
        if !(self.approx_time > 0.0) {
            return Err(CurveError::NonPositive {
                field: "approx_time",
                value: self.approx_time,
            });
        }
        ExpPiece::through(
            PieceShape::Decay,
            (0.0, reward),
            (self.approx_time * params.procrastination_factor, reward / 2.0),
        )
    }
}

impl RewardCurve for AsSoonAsPossible {
    fn sample(&self, x: f64, reward: f64, params: &CurveParams) -> Result<f64, CurveError> {
        let piece = self.curve(reward, params)?;
        Ok(if x >= 0.0 { piece.eval(x).max(0.0) } else { 0.0 })
    }
}

impl RewardCurve for Fun {
    fn sample(&self, x: f64, reward: f64, _params: &CurveParams) -> Result<f64, CurveError> {
        Ok(if x >= 0.0 { reward.max(0.0) } else { 0.0 })
    }
}

impl LongTerm {
    /// Consistency bonus: `sqrt(insist_day * lambda + 1)`.
    pub fn days_factor(&self, params: &CurveParams) -> f64 {
        (self.insist_day as f64 * params.insist_decay + 1.0).sqrt()
    }

    /// Saturation over time spent today: `1 - exp(-5x / duration_max)`,
    /// kept saturated beyond `duration_max`.
    pub fn duration_factor(&self, x: f64) -> Result<f64, CurveError> {
        if !(self.duration_max > 0.0) {
            return Err(CurveError::NonPositive {
                field: "duration_max",
                value: self.duration_max,
            });
        }
        Ok(1.0 - (-5.0 * x / self.duration_max).exp())
    }
}

impl RewardCurve for LongTerm {
    fn sample(&self, x: f64, reward: f64, params: &CurveParams) -> Result<f64, CurveError> {
        let duration = self.duration_factor(x)?;
        if x < 0.0 {
            return Ok(0.0);
        }
        Ok((reward * self.days_factor(params) * duration).max(0.0))
    }
}

/// Double-sigmoid preference window on the circular day, normalized so its
/// center scores exactly 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreferenceWindow {
    center: f64,
    half_width: f64,
    steepness: f64,
    cubed: bool,
    peak: f64,
}

impl PreferenceWindow {
    /// Window with logistic edges at `lo` and `hi`. `cubed` sharpens both
    /// edges by cubing the sigmoids.
    pub fn new(lo: f64, hi: f64, steepness: f64, cubed: bool) -> Result<Self, CurveError> {
        if hi < lo {
            return Err(CurveError::EmptyRange {
                field: "window",
                min: lo,
                max: hi,
            });
        }
        let mut window = Self {
            center: (lo + hi) / 2.0,
            half_width: (hi - lo) / 2.0,
            steepness,
            cubed,
            peak: 1.0,
        };
        let peak = window.raw(0.0);
        if !(peak > 0.0) || !peak.is_finite() {
            return Err(CurveError::FlatWindow { peak });
        }
        window.peak = peak;
        Ok(window)
    }

    pub fn center(&self) -> f64 {
        self.center
    }

    fn raw(&self, offset: f64) -> f64 {
        let left = logistic(self.steepness * (offset + self.half_width));
        let right = logistic(self.steepness * (self.half_width - offset));
        if self.cubed {
            left.powi(3) + right.powi(3) - 1.0
        } else {
            left + right - 1.0
        }
    }

    /// Preference in `[0, 1]` at clock hour `x`.
    pub fn value(&self, x: f64) -> f64 {
        let offset = circular_offset(x, self.center);
        (self.raw(offset) / self.peak).clamp(0.0, 1.0)
    }
}

impl Necessity {
    /// Preference window around the anchors, `None` when there is no
    /// preferred time.
    pub fn window(&self, params: &CurveParams) -> Result<Option<PreferenceWindow>, CurveError> {
        let relax = params.relaxation_hours;
        let (lo, hi) = match self.time.as_slice() {
            [] => return Ok(None),
            [hour] => (hour - relax, hour + relax),
            [start, end] => {
                if end < start {
                    return Err(CurveError::EmptyRange {
                        field: "necessity time",
                        min: *start,
                        max: *end,
                    });
                }
                (start - relax, end + relax)
            }
            anchors => {
                return Err(CurveError::AnchorCount {
                    count: anchors.len(),
                });
            }
        };
        PreferenceWindow::new(lo, hi, params.sigmoid_steepness, false).map(Some)
    }

    /// Normalized preference in `[0, 1]`; exactly 1 at a single anchor.
    pub fn shape(&self, x: f64, params: &CurveParams) -> Result<f64, CurveError> {
        Ok(self.window(params)?.map_or(1.0, |w| w.value(x)))
    }
}

impl RewardCurve for Necessity {
    fn sample(&self, x: f64, reward: f64, params: &CurveParams) -> Result<f64, CurveError> {
        Ok((reward * self.shape(x, params)?).max(0.0))
    }
}

impl Meal {
    /// The left edge sits one hour before `start`, so eating a little early
    /// is tolerated more than eating late.
    pub fn window(&self, params: &CurveParams) -> Result<PreferenceWindow, CurveError> {
        let [start, end] = self.time;
        if !(end > start) {
            return Err(CurveError::EmptyRange {
                field: "meal time",
                min: start,
                max: end,
            });
        }
        PreferenceWindow::new(start - 1.0, end, params.sigmoid_steepness, true)
    }
}

impl RewardCurve for Meal {
    fn sample(&self, x: f64, reward: f64, params: &CurveParams) -> Result<f64, CurveError> {
        Ok((reward * self.window(params)?.value(x)).max(0.0))
    }
}

impl Sleeping {
    pub fn combined_reward(&self, strictness: f64) -> f64 {
        combine(strictness, self.enjoyment, self.productivity)
    }

    /// `1 - exp(-5 (d - d_min) / (d_max - d_min))` past `d_min`, else 0.
    pub fn duration_factor(&self, duration: f64) -> Result<f64, CurveError> {
        let span = self.duration_max - self.duration_min;
        if !(span > 0.0) {
            return Err(CurveError::EmptyRange {
                field: "sleep duration",
                min: self.duration_min,
                max: self.duration_max,
            });
        }
        if duration < self.duration_min {
            return Ok(0.0);
        }
        Ok(1.0 - (-5.0 / span * (duration - self.duration_min)).exp())
    }

    /// Exponential decay away from `bedtime_min`, wrapping across midnight.
    /// Inside the acceptable window the decay runs forward; earlier bedtimes
    /// decay backward.
    pub fn bedtime_factor(&self, bedtime: f64) -> f64 {
        let delta = (bedtime - self.bedtime_min).rem_euclid(24.0);
        let window = (self.bedtime_max - self.bedtime_min).rem_euclid(24.0);
        if delta <= window {
            (-delta).exp()
        } else {
            (-(24.0 - delta)).exp()
        }
    }

    /// `R * sqrt(f_duration(duration) * f_bedtime(bedtime))`.
    pub fn reward(&self, bedtime: f64, duration: f64, strictness: f64) -> Result<f64, CurveError> {
        let reward = self.combined_reward(strictness);
        let factor = self.duration_factor(duration)? * self.bedtime_factor(bedtime);
        Ok((reward * factor.sqrt()).max(0.0))
    }
}

impl Task {
    pub fn combined_reward(&self, strictness: f64) -> f64 {
        combine(strictness, self.enjoyment, self.productivity)
    }

    /// Continuous reward at coordinate `x` (see the module table for what
    /// `x` means per category).
    pub fn reward(&self, x: f64, strictness: f64, params: &CurveParams) -> Result<f64, RewardError> {
        let reward = self.combined_reward(strictness);
        let value = match &self.kind {
            TaskKind::FixedTime(curve) => curve.sample(x, reward, params),
            TaskKind::FixedDdl(curve) => curve.sample(x, reward, params),
            TaskKind::AsSoonAsPossible(curve) => curve.sample(x, reward, params),
            TaskKind::Fun(curve) => curve.sample(x, reward, params),
            TaskKind::LongTerm(curve) => curve.sample(x, reward, params),
            TaskKind::Necessity(curve) => curve.sample(x, reward, params),
            TaskKind::Meal(curve) => curve.sample(x, reward, params),
        };
        value.map_err(|source| RewardError::Curve {
            task: self.name.clone(),
            source,
        })
    }
}

/// Evaluate `task` through the curve of `expected`.
///
/// A task of any other category is a dispatch bug and is reported as
/// [`RewardError::CategoryMismatch`] instead of being evaluated.
pub fn reward_as(
    expected: Category,
    task: &Task,
    x: f64,
    strictness: f64,
    params: &CurveParams,
) -> Result<f64, RewardError> {
    let actual = task.category();
    if actual != expected {
        return Err(RewardError::CategoryMismatch {
            expected,
            actual,
            task: task.name.clone(),
        });
    }
    task.reward(x, strictness, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn params() -> CurveParams {
        CurveParams::default()
    }

    fn task(kind: TaskKind) -> Task {
        // combined reward at strictness 0.5 is 6.0
        Task::new("t", 4.0, 8.0, kind)
    }

    fn sleeping() -> Sleeping {
        Sleeping {
            duration_min: 5.0,
            duration_max: 12.0,
            bedtime_min: 22.0,
            bedtime_max: 4.0,
            enjoyment: 6.0,
            productivity: 2.0,
        }
    }

    #[test]
    fn test_combine_is_affine_and_monotone() {
        let (enjoyment, productivity) = (8.0, 3.0);
        assert_eq!(combine(0.0, enjoyment, productivity), enjoyment);
        assert_eq!(combine(1.0, enjoyment, productivity), productivity);
        assert!((combine(0.5, enjoyment, productivity) - 5.5).abs() < EPS);

        let mut previous = combine(0.0, enjoyment, productivity);
        for step in 1..=10 {
            let current = combine(step as f64 / 10.0, enjoyment, productivity);
            // moves toward productivity, the smaller input here
            assert!(current <= previous + EPS);
            previous = current;
        }

        let mut previous = combine(0.0, 2.0, 9.0);
        for step in 1..=10 {
            let current = combine(step as f64 / 10.0, 2.0, 9.0);
            assert!(current >= previous - EPS);
            previous = current;
        }
    }

    #[test]
    fn test_fixed_time_is_rectangular() {
        let lecture = task(TaskKind::FixedTime(FixedTime {
            start: 9.0,
            duration: 2.0,
        }));
        for x in [9.0, 9.5, 10.0, 11.0] {
            assert_eq!(lecture.reward(x, 0.5, &params()).unwrap(), 6.0);
        }
        for x in [8.999, 11.001, 0.0, 23.5] {
            assert_eq!(lecture.reward(x, 0.5, &params()).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_fixed_time_window_across_midnight() {
        let shift = task(TaskKind::FixedTime(FixedTime {
            start: 23.0,
            duration: 2.0,
        }));
        assert_eq!(shift.reward(23.5, 0.5, &params()).unwrap(), 6.0);
        assert_eq!(shift.reward(0.5, 0.5, &params()).unwrap(), 6.0);
        assert_eq!(shift.reward(1.5, 0.5, &params()).unwrap(), 0.0);
    }

    #[test]
    fn test_asap_passes_through_anchors() {
        let lab = task(TaskKind::AsSoonAsPossible(AsSoonAsPossible { approx_time: 2.0 }));
        let half_point = 2.0 * params().procrastination_factor;

        assert!((lab.reward(0.0, 0.5, &params()).unwrap() - 6.0).abs() < EPS);
        assert!((lab.reward(half_point, 0.5, &params()).unwrap() - 3.0).abs() < EPS);
        assert_eq!(lab.reward(-0.5, 0.5, &params()).unwrap(), 0.0);
        // keeps decaying past the half point
        assert!(lab.reward(2.0 * half_point, 0.5, &params()).unwrap() < 3.0);
    }

    #[test]
    fn test_fixed_ddl_passes_through_three_anchors() {
        let essay = task(TaskKind::FixedDdl(FixedDdl {
            approx_time: 2.0,
            deadline: 10.0,
        }));
        let knee = 2.0 * params().procrastination_factor;

        assert!((essay.reward(0.0, 0.5, &params()).unwrap() - 6.0).abs() < EPS);
        assert!((essay.reward(knee, 0.5, &params()).unwrap() - 3.0).abs() < EPS);
        assert!((essay.reward(10.0, 0.5, &params()).unwrap() - 1.2).abs() < EPS);
        assert_eq!(essay.reward(10.5, 0.5, &params()).unwrap(), 0.0);
        assert_eq!(essay.reward(-1.0, 0.5, &params()).unwrap(), 0.0);

        let early = essay.reward(1.0, 0.5, &params()).unwrap();
        let late = essay.reward(6.0, 0.5, &params()).unwrap();
        assert!(early > 3.0 && early < 6.0);
        assert!(late > 1.2 && late < 3.0);
    }

    #[test]
    fn test_fixed_ddl_single_piece_when_deadline_is_tight() {
        let rush = task(TaskKind::FixedDdl(FixedDdl {
            approx_time: 5.0,
            deadline: 4.0,
        }));
        assert!((rush.reward(0.0, 0.5, &params()).unwrap() - 6.0).abs() < EPS);
        assert!((rush.reward(4.0, 0.5, &params()).unwrap() - 1.2).abs() < EPS);
    }

    #[test]
    fn test_fun_is_constant() {
        let games = task(TaskKind::Fun(Fun {}));
        assert_eq!(games.reward(0.0, 0.5, &params()).unwrap(), 6.0);
        assert_eq!(games.reward(17.25, 0.5, &params()).unwrap(), 6.0);
        assert_eq!(games.reward(-0.1, 0.5, &params()).unwrap(), 0.0);
    }

    #[test]
    fn test_long_term_rewards_consistency_and_saturates() {
        let fresh = LongTerm {
            insist_day: 0,
            duration_max: 2.0,
        };
        let streak = LongTerm {
            insist_day: 10,
            duration_max: 2.0,
        };

        let a = fresh.sample(1.0, 6.0, &params()).unwrap();
        let b = streak.sample(1.0, 6.0, &params()).unwrap();
        assert!((b / a - 8.0_f64.sqrt()).abs() < EPS);

        let near_max = fresh.sample(2.0, 6.0, &params()).unwrap();
        assert!((near_max - 6.0 * (1.0 - (-5.0_f64).exp())).abs() < EPS);
        assert_eq!(fresh.sample(0.0, 6.0, &params()).unwrap(), 0.0);
        assert_eq!(fresh.sample(-1.0, 6.0, &params()).unwrap(), 0.0);

        // past duration_max the curve stays saturated instead of dropping
        let past_max = fresh.sample(3.0, 6.0, &params()).unwrap();
        assert!(past_max > near_max);
        assert!(past_max < 6.0);
    }

    #[test]
    fn test_necessity_single_anchor_peaks_at_one() {
        let shower = Necessity { time: vec![7.0] };
        assert_eq!(shower.shape(7.0, &params()).unwrap(), 1.0);
        assert!(shower.shape(6.0, &params()).unwrap() < 1.0);
        assert!(shower.shape(19.0, &params()).unwrap() < 1e-6);

        let left = shower.shape(6.5, &params()).unwrap();
        let right = shower.shape(7.5, &params()).unwrap();
        assert!((left - right).abs() < EPS);
    }

    #[test]
    fn test_necessity_anchor_wraps_midnight() {
        let pills = Necessity { time: vec![23.5] };
        let before = pills.shape(23.0, &params()).unwrap();
        let after = pills.shape(0.0, &params()).unwrap();
        assert!((before - after).abs() < EPS);
        assert!(after > 0.5);
    }

    #[test]
    fn test_necessity_without_anchor_is_flat() {
        let chores = Necessity::default();
        for x in [0.0, 6.0, 12.0, 23.9] {
            assert_eq!(chores.shape(x, &params()).unwrap(), 1.0);
        }
    }

    #[test]
    fn test_necessity_window_two_anchors() {
        let gym = Necessity {
            time: vec![17.0, 19.0],
        };
        assert_eq!(gym.shape(18.0, &params()).unwrap(), 1.0);
        assert!(gym.shape(17.0, &params()).unwrap() > 0.9);
        assert!(gym.shape(12.0, &params()).unwrap() < 1e-3);
        assert_eq!(
            gym.shape(18.0, &params()).unwrap() * 6.0,
            task(TaskKind::Necessity(gym.clone()))
                .reward(18.0, 0.5, &params())
                .unwrap()
        );
    }

    #[test]
    fn test_necessity_rejects_three_anchors() {
        let odd = Necessity {
            time: vec![1.0, 2.0, 3.0],
        };
        assert_eq!(
            odd.shape(1.0, &params()),
            Err(CurveError::AnchorCount { count: 3 })
        );
    }

    #[test]
    fn test_meal_window() {
        let lunch = task(TaskKind::Meal(Meal {
            time: [11.0, 14.0],
        }));
        let window = Meal {
            time: [11.0, 14.0],
        }
        .window(&params())
        .unwrap();

        let center = lunch.reward(window.center(), 0.5, &params()).unwrap();
        assert!((center - 6.0).abs() < EPS);
        assert!(lunch.reward(12.0, 0.5, &params()).unwrap() > 5.0);
        assert!(lunch.reward(20.0, 0.5, &params()).unwrap() < 1e-6);
        assert!(lunch.reward(3.0, 0.5, &params()).unwrap() >= 0.0);
    }

    #[test]
    fn test_meal_empty_window_is_rejected() {
        let broken = Meal {
            time: [14.0, 11.0],
        };
        assert!(matches!(
            broken.window(&params()),
            Err(CurveError::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_sleeping_duration_factor() {
        let sleep = sleeping();
        assert_eq!(sleep.duration_factor(4.0).unwrap(), 0.0);
        assert_eq!(sleep.duration_factor(5.0).unwrap(), 0.0);
        let saturated = sleep.duration_factor(12.0).unwrap();
        assert!(saturated > 0.99 && saturated < 1.0);
    }

    #[test]
    fn test_sleeping_bedtime_factor_wraps_midnight() {
        let sleep = sleeping();
        assert_eq!(sleep.bedtime_factor(22.0), 1.0);
        assert!((sleep.bedtime_factor(23.0) - (-1.0_f64).exp()).abs() < EPS);
        assert!((sleep.bedtime_factor(1.0) - (-3.0_f64).exp()).abs() < EPS);
        // an hour too early decays like an hour too late
        assert!((sleep.bedtime_factor(21.0) - (-1.0_f64).exp()).abs() < EPS);
    }

    #[test]
    fn test_sleeping_reward() {
        let sleep = sleeping();
        let reward = sleep.reward(22.0, 12.0, 0.5).unwrap();
        let expected = 4.0 * sleep.duration_factor(12.0).unwrap().sqrt();
        assert!((reward - expected).abs() < EPS);

        let degenerate = Sleeping {
            duration_max: 5.0,
            ..sleeping()
        };
        assert!(degenerate.reward(22.0, 8.0, 0.5).is_err());
    }

    #[test]
    fn test_reward_as_rejects_other_categories() {
        let games = task(TaskKind::Fun(Fun {}));
        assert_eq!(
            reward_as(Category::Fun, &games, 3.0, 0.5, &params()).unwrap(),
            6.0
        );
        assert_eq!(
            reward_as(Category::Meal, &games, 3.0, 0.5, &params()),
            Err(RewardError::CategoryMismatch {
                expected: Category::Meal,
                actual: Category::Fun,
                task: "t".to_string(),
            })
        );
    }

    #[test]
    fn test_degenerate_anchors_are_errors_not_nan() {
        // zero combined reward: log(0 / 0)
        let idle = Task::new(
            "idle",
            0.0,
            0.0,
            TaskKind::AsSoonAsPossible(AsSoonAsPossible { approx_time: 1.0 }),
        );
        assert!(matches!(
            idle.reward(0.5, 0.5, &params()),
            Err(RewardError::Curve {
                source: CurveError::LogDomain { .. },
                ..
            })
        ));

        assert!(matches!(
            ExpPiece::through(PieceShape::Decay, (1.0, 2.0), (1.0, 1.0)),
            Err(CurveError::AnchorOrder { .. })
        ));
        assert!(matches!(
            ExpPiece::through(PieceShape::Accelerating, (0.0, 1.0), (1.0, 2.0)),
            Err(CurveError::LogDomain { .. })
        ));
    }

    #[test]
    fn test_curves_never_negative() {
        let grumpy = Task::new(
            "grumpy",
            -1.0,
            -0.5,
            TaskKind::FixedDdl(FixedDdl {
                approx_time: 1.0,
                deadline: 5.0,
            }),
        );
        for step in 0..=10 {
            let value = grumpy.reward(step as f64 * 0.5, 0.5, &params()).unwrap();
            assert!(value >= 0.0);
        }
    }
}
