//! Newton-Raphson solver holding the utility constant across a trade
//!
//! Given reserves (x, y) and an input dx added to x, find dy removed from y
//! such that U(x + dx, y - dy) ≈ U(x, y):
//!
//! - dy₀ = 0, target = U(x, y)
//! - (u, m) = curve(x + dx, |y - dyₙ|)
//! - dyₙ₊₁ = dyₙ + |(u - target) / m|
//!
//! The default runs exactly `NEWTON_STEPS` steps, so quotes match historical
//! ones bit for bit.

use log::trace;

use crate::curve::evaluate;
use crate::NEWTON_STEPS;

/// Newton solver configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonSolver {
    /// Hard cap on steps (exact count when `tolerance` is `None`)
    max_steps: u32,
    /// Stop early once a step moves dy by no more than this
    tolerance: Option<f64>,
}

impl Default for NewtonSolver {
    fn default() -> Self {
        Self::fixed(NEWTON_STEPS)
    }
}

impl NewtonSolver {
    /// Run exactly `steps` Newton steps.
    pub const fn fixed(steps: u32) -> Self {
        Self {
            max_steps: steps,
            tolerance: None,
        }
    }

    /// Stop once a step is `<= tolerance`, or after `max_steps`.
    pub const fn with_tolerance(max_steps: u32, tolerance: f64) -> Self {
        Self {
            max_steps,
            tolerance: Some(tolerance),
        }
    }

    pub const fn max_steps(&self) -> u32 {
        self.max_steps
    }

    pub const fn tolerance(&self) -> Option<f64> {
        self.tolerance
    }

    /// Estimate dy for input `dx` against reserves `(x, y)`.
    ///
    /// Total for positive reserves and non-negative `dx`; the caller rejects
    /// anything else before getting here.
    pub fn solve(&self, x: f64, y: f64, dx: f64) -> f64 {
        let target = evaluate(x, y).utility;
        let mut dy = 0.0;

        for step in 0..self.max_steps {
            let point = evaluate(x + dx, (y - dy).abs());
            let delta = ((point.utility - target) / point.marginal).abs();
            dy += delta;
            trace!("newton step {}: dy={} delta={}", step, dy, delta);

            if let Some(tolerance) = self.tolerance {
                if delta <= tolerance {
                    break;
                }
            }
        }

        dy
    }
}
