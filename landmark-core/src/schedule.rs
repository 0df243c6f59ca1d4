//! Scheduling hyper-parameters through training.
use serde::{Deserialize, Serialize};

/// Piecewise schedule of a hyper-parameter.
///
/// `points` are `(position, value)` pairs sorted by position. The position is
/// counted in optimization steps if `step_based` is `true` and in epochs
/// otherwise. Before the first point and after the last one the schedule is
/// constant.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct HyperParamSchedule {
    /// Scheduled values.
    pub points: Vec<(usize, f64)>,

    /// Interpolates linearly between points if `true`, holds the value of the last
    /// passed point otherwise.
    pub interpolate: bool,

    /// Positions are optimization steps if `true`, epochs otherwise.
    pub step_based: bool,
}

impl HyperParamSchedule {
    /// Creates a schedule. Points are sorted by position.
    pub fn new(mut points: Vec<(usize, f64)>, interpolate: bool, step_based: bool) -> Self {
        points.sort_by_key(|p| p.0);
        Self {
            points,
            interpolate,
            step_based,
        }
    }

    /// Exploration rate used for training agents:
    /// 1.0 at epoch 0, 0.1 at epoch 10, 0.01 at epoch 320, linear in between.
    pub fn exploration() -> Self {
        Self::new(vec![(0, 1.0), (10, 0.1), (320, 0.01)], true, false)
    }

    /// Number of simulator steps per optimization step:
    /// 0 (pretraining on demonstrations) for the first 100000 steps, 4 afterwards.
    pub fn update_frequency() -> Self {
        Self::new(vec![(0, 0.0), (100_000, 4.0)], false, true)
    }

    /// Returns the value at the given position.
    pub fn value_at(&self, position: usize) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if position <= first.0 {
            return first.1;
        }
        if position >= last.0 {
            return last.1;
        }

        // position lies strictly inside the covered range
        let k = self.points.iter().rposition(|p| p.0 <= position).unwrap_or(0);
        let (p0, v0) = self.points[k];
        let (p1, v1) = self.points[k + 1];
        if self.interpolate {
            let t = (position - p0) as f64 / (p1 - p0) as f64;
            v0 + (v1 - v0) * t
        } else {
            v0
        }
    }

    /// Returns the value at the given number of optimization steps.
    pub fn value_at_opt_steps(&self, opt_steps: usize, steps_per_epoch: usize) -> f64 {
        if self.step_based {
            self.value_at(opt_steps)
        } else {
            self.value_at(opt_steps / steps_per_epoch.max(1))
        }
    }
}
