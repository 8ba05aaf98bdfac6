//! Noise kind dispatch.

use private_count_core::Result;
use rand::Rng;

use crate::gaussian::GaussianCountMechanism;
use crate::laplace::LaplaceCountMechanism;
use crate::sensitivity::Sensitivity;

/// Supported noise distributions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoiseKind {
    /// Laplace noise (pure epsilon-DP, delta must be 0).
    #[default]
    Laplace,
    /// Gaussian noise (requires delta in (0, 1)).
    Gaussian,
}

/// A calibrated count mechanism of either kind.
#[derive(Clone, Copy, Debug)]
pub enum CountMechanism {
    /// Calibrated Laplace mechanism.
    Laplace(LaplaceCountMechanism),
    /// Calibrated Gaussian mechanism.
    Gaussian(GaussianCountMechanism),
}

impl CountMechanism {
    /// Calibrate a mechanism of the requested kind.
    pub fn new(kind: NoiseKind, epsilon: f64, delta: f64, sensitivity: Sensitivity) -> Result<Self> {
        match kind {
            NoiseKind::Laplace => {
                LaplaceCountMechanism::new(epsilon, delta, sensitivity).map(Self::Laplace)
            }
            NoiseKind::Gaussian => {
                GaussianCountMechanism::new(epsilon, delta, sensitivity).map(Self::Gaussian)
            }
        }
    }

    /// Add one rounded noise draw to `value`.
    pub fn add_noise<R: Rng>(&self, value: i64, rng: &mut R) -> i64 {
        match self {
            Self::Laplace(m) => m.add_noise(value, rng),
            Self::Gaussian(m) => m.add_noise(value, rng),
        }
    }

    /// Quantile of the noise distribution at probability `p`.
    pub fn quantile(&self, p: f64) -> f64 {
        match self {
            Self::Laplace(m) => m.quantile(p),
            Self::Gaussian(m) => m.quantile(p),
        }
    }
}
