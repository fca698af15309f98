//! Bouncing scalar that drives the quad's color channel each frame.

use serde::{Deserialize, Serialize};

/// Default per-frame increment.
pub const DEFAULT_STEP: f32 = 0.05;

/// Fraction of the step tolerated past a bound before it counts as crossed.
const BOUND_SLACK: f32 = 1e-3;

/// A scalar that moves by `step` every frame and reverses direction when it
/// leaves `[lower, upper]`.
///
/// The value is reflected, never clamped: it may overshoot a bound by at
/// most one step before heading back. Both bounds are inclusive, so landing
/// on a bound does not reverse direction. "On a bound" allows a sliver of
/// one thousandth of the step for accumulated `f32` rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    value: f32,
    step: f32,
    lower: f32,
    upper: f32,
}

impl AnimationState {
    /// Creates a state starting at `value`, moving by `step` per frame.
    pub fn new(value: f32, step: f32, lower: f32, upper: f32) -> Self {
        Self {
            value,
            step,
            lower,
            upper,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// The signed increment applied by the next [`advance`](Self::advance).
    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.lower, self.upper)
    }

    /// Applies one step and returns the new value.
    ///
    /// When the new value is above `upper` the step becomes negative; when
    /// it is below `lower` the step becomes positive.
    pub fn advance(&mut self) -> f32 {
        self.value += self.step;
        let slack = self.step.abs() * BOUND_SLACK;
        if self.value > self.upper + slack {
            self.step = -self.step.abs();
        } else if self.value < self.lower - slack {
            self.step = self.step.abs();
        }
        self.value
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_STEP, 0.0, 1.0)
    }
}
