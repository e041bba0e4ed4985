//! Objective functions scored by both engines.
//!
//! [`Objective`] is the seam between the engines and the benchmark: an
//! engine only needs the dimension, the symmetric search bound, and a way
//! to score a vector. [`Rastrigin`] is the benchmark used by the harness.

use crate::error::ConfigError;
use std::f64::consts::PI;

/// A real-valued function to minimize over the box `[-R, R]^N`.
///
/// Lower values are better. Implementations must be pure: the engines
/// may evaluate in parallel and in any order.
pub trait Objective: Send + Sync {
    /// Number of components in a candidate vector.
    fn dimension(&self) -> usize;

    /// Half-width `R` of the symmetric search box.
    fn bound(&self) -> f64;

    /// Scores a candidate vector of length [`dimension`](Self::dimension).
    fn evaluate(&self, x: &[f64]) -> f64;

    /// Checks that the search space is usable.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.dimension() == 0 {
            return Err(ConfigError::TooSmall {
                field: "dimension",
                min: 1,
                value: 0,
            });
        }
        let r = self.bound();
        if !r.is_finite() || r <= 0.0 {
            return Err(ConfigError::InvalidBound(r));
        }
        Ok(())
    }
}

/// Rastrigin function: `f(x) = A·N + Σ(xᵢ² - A·cos(2π·xᵢ))`.
///
/// Highly multimodal, global minimum `f(0) = 0`.
///
/// ```
/// use rastrigin_bench::fitness::{Objective, Rastrigin};
///
/// let f = Rastrigin::default();
/// assert_eq!(f.evaluate(&[0.0; 10]), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rastrigin {
    /// Number of dimensions `N`.
    pub dimension: usize,
    /// Amplitude `A` of the cosine modulation.
    pub amplitude: f64,
    /// Half-width `R` of the search box.
    pub bound: f64,
}

impl Default for Rastrigin {
    fn default() -> Self {
        Self {
            dimension: 10,
            amplitude: 10.0,
            bound: 5.12,
        }
    }
}

impl Rastrigin {
    /// Rastrigin with the standard constants in `dimension` dimensions.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ..Self::default()
        }
    }
}

impl Objective for Rastrigin {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bound(&self) -> f64 {
        self.bound
    }

    fn evaluate(&self, x: &[f64]) -> f64 {
        let a = self.amplitude;
        a * x.len() as f64
            + x.iter()
                .map(|&xi| xi * xi - a * (2.0 * PI * xi).cos())
                .sum::<f64>()
    }
}
