//! Sensitivity model derived from the contribution bounds.

use private_count_core::{DpError, Result};

/// Sensitivity bounds of a count aggregation.
///
/// `l0` is the maximum number of partitions one unit can influence and
/// `l_inf` the maximum change it can cause within one partition; the L1
/// and L2 sensitivities used for noise calibration follow from those.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sensitivity {
    /// Maximum number of partitions a single unit may influence.
    pub l0: i64,
    /// Maximum per-partition change a single unit may cause.
    pub l_inf: i64,
}

impl Sensitivity {
    /// Create sensitivity bounds from the two contribution caps.
    pub fn new(l0: i64, l_inf: i64) -> Self {
        Self { l0, l_inf }
    }

    /// L1 sensitivity (`l0 * l_inf`), used by the Laplace mechanism.
    pub fn l1(&self) -> f64 {
        self.l0 as f64 * self.l_inf as f64
    }

    /// L2 sensitivity (`sqrt(l0) * l_inf`), used by the Gaussian mechanism.
    pub fn l2(&self) -> f64 {
        (self.l0 as f64).sqrt() * self.l_inf as f64
    }

    /// Validate that both bounds are strictly positive.
    pub fn validate(&self) -> Result<()> {
        if self.l0 <= 0 {
            return Err(DpError::invalid(format!(
                "l0 sensitivity must be positive, got {}",
                self.l0
            )));
        }
        if self.l_inf <= 0 {
            return Err(DpError::invalid(format!(
                "l_inf sensitivity must be positive, got {}",
                self.l_inf
            )));
        }
        Ok(())
    }
}
