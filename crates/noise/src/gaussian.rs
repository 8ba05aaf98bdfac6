//! Gaussian mechanism for integer counts.

use private_count_core::{DpError, Result};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use statrs::distribution::{ContinuousCDF, Normal as NormalCdf};

use crate::sensitivity::Sensitivity;

/// Gaussian count mechanism calibrated to (epsilon, delta, L2 sensitivity).
#[derive(Clone, Copy, Debug)]
pub struct GaussianCountMechanism {
    sigma: f64,
    noise: Normal<f64>,
    standard: NormalCdf,
}

impl GaussianCountMechanism {
    /// Calibrate the mechanism with the classic analytic bound
    /// `sigma = l2 * sqrt(2 ln(1.25 / delta)) / epsilon`.
    pub fn new(epsilon: f64, delta: f64, sensitivity: Sensitivity) -> Result<Self> {
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(DpError::invalid(format!(
                "epsilon must be positive and finite, got {epsilon}"
            )));
        }
        if !delta.is_finite() || delta <= 0.0 || delta >= 1.0 {
            return Err(DpError::invalid(format!(
                "Gaussian noise requires delta in (0, 1), got {delta}"
            )));
        }
        sensitivity.validate()?;

        let sigma = sensitivity.l2() * (2.0 * (1.25 / delta).ln()).sqrt() / epsilon;
        let noise = Normal::new(0.0, sigma)
            .map_err(|_| DpError::invalid(format!("invalid Gaussian sigma {sigma}")))?;
        let standard = NormalCdf::new(0.0, 1.0)
            .map_err(|_| DpError::invalid("could not build standard normal"))?;
        Ok(Self {
            sigma,
            noise,
            standard,
        })
    }

    /// Noise standard deviation.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Add one rounded Gaussian draw to `value`.
    pub fn add_noise<R: Rng>(&self, value: i64, rng: &mut R) -> i64 {
        value + self.noise.sample(rng).round() as i64
    }

    /// Quantile of the noise distribution at probability `p`.
    pub fn quantile(&self, p: f64) -> f64 {
        self.sigma * self.standard.inverse_cdf(p)
    }
}
