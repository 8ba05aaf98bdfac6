//! Partition selection via noisy thresholding.
//!
//! A partition discovered from private data may only be published if its
//! noisy count clears a threshold calibrated so that the existence of any
//! single unit's partitions leaks with probability at most the selection
//! delta. The draw that feeds the published value and the keep decision is
//! the same one: redrawing would either double the privacy charge or
//! decorrelate the decision from the output.

use private_count_core::{DpError, Result};
use rand::Rng;

use crate::mechanism::CountMechanism;
use crate::sensitivity::Sensitivity;

/// Combined noise-and-threshold operator for private partitions.
#[derive(Clone, Copy, Debug)]
pub struct PartitionSelector {
    mechanism: CountMechanism,
    threshold: f64,
}

impl PartitionSelector {
    /// Build a selector around an already calibrated mechanism.
    ///
    /// The keep threshold is `l_inf + Q(1 - delta_p)` where `Q` is the
    /// mechanism's noise quantile and `delta_p = 1 - (1 - delta)^(1/l0)`
    /// splits the selection delta across the up-to-`l0` partitions a
    /// single unit can influence.
    pub fn new(
        mechanism: CountMechanism,
        selection_epsilon: f64,
        selection_delta: f64,
        sensitivity: Sensitivity,
    ) -> Result<Self> {
        if !selection_epsilon.is_finite() || selection_epsilon <= 0.0 {
            return Err(DpError::invalid(format!(
                "partition selection epsilon must be positive and finite, got {selection_epsilon}"
            )));
        }
        if !selection_delta.is_finite() || selection_delta <= 0.0 || selection_delta >= 1.0 {
            return Err(DpError::invalid(format!(
                "partition selection delta must be in (0, 1), got {selection_delta}"
            )));
        }
        sensitivity.validate()?;

        let delta_p = 1.0 - (1.0 - selection_delta).powf(1.0 / sensitivity.l0 as f64);
        let threshold = sensitivity.l_inf as f64 + mechanism.quantile(1.0 - delta_p);
        Ok(Self {
            mechanism,
            threshold,
        })
    }

    /// The keep threshold on the noisy count.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// One noise draw and one threshold decision for a partition.
    ///
    /// Returns whether the partition may be published together with the
    /// noisy value that decision was made on.
    pub fn select_and_noise<R: Rng>(&self, raw_count: i64, rng: &mut R) -> (bool, i64) {
        let noisy = self.mechanism.add_noise(raw_count, rng);
        (noisy as f64 >= self.threshold, noisy)
    }
}
