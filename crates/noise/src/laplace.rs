//! Laplace mechanism for integer counts.

use private_count_core::{DpError, Result};
use rand::Rng;
use rand_distr::{Distribution, Exp};

use crate::sensitivity::Sensitivity;

/// Laplace count mechanism calibrated to (epsilon, L1 sensitivity).
///
/// Pure epsilon-DP: the aggregation delta must be exactly zero.
#[derive(Clone, Copy, Debug)]
pub struct LaplaceCountMechanism {
    scale: f64,
    exp: Exp<f64>,
}

impl LaplaceCountMechanism {
    /// Calibrate the mechanism. Fails on a non-positive or non-finite
    /// epsilon, a nonzero delta, or invalid sensitivity bounds.
    pub fn new(epsilon: f64, delta: f64, sensitivity: Sensitivity) -> Result<Self> {
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(DpError::invalid(format!(
                "epsilon must be positive and finite, got {epsilon}"
            )));
        }
        if delta != 0.0 {
            return Err(DpError::invalid(format!(
                "Laplace noise requires delta = 0, got {delta}"
            )));
        }
        sensitivity.validate()?;

        let scale = sensitivity.l1() / epsilon;
        let exp = Exp::new(1.0 / scale)
            .map_err(|_| DpError::invalid(format!("invalid Laplace scale {scale}")))?;
        Ok(Self { scale, exp })
    }

    /// Noise scale parameter (`l1 / epsilon`).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Add one rounded Laplace draw to `value`.
    pub fn add_noise<R: Rng>(&self, value: i64, rng: &mut R) -> i64 {
        // Laplace noise sampled as the difference of two exponentials.
        let noise = self.exp.sample(rng) - self.exp.sample(rng);
        value + noise.round() as i64
    }

    /// Quantile of the noise distribution at probability `p`.
    pub fn quantile(&self, p: f64) -> f64 {
        if p < 0.5 {
            self.scale * (2.0 * p).ln()
        } else {
            -self.scale * (2.0 * (1.0 - p)).ln()
        }
    }
}
