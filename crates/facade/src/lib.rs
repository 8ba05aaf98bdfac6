//! Differentially private per-partition counts.
//!
//! For each partition key in a keyed dataset, estimates how many records
//! belong to it while bounding the influence of any single privacy unit:
//! contributions are capped per unit, the per-partition sums are noised
//! with a calibrated mechanism, and partitions discovered from private
//! data are published only if their noisy count clears a threshold.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod count;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use private_count_accounting as accounting;
pub use private_count_core as core;
pub use private_count_noise as noise;

pub use count::{count, count_with_rng, CountParams, PartitionSelectionParams};
pub use private_count_accounting::{BudgetAccountant, PrivacySpec, PrivacySpecParams};
pub use private_count_core::{
    bound_contributions, clamp_negative_counts, count_per_unit_key, sum_across_units,
    ContributionBounds, DpError, Result,
};
pub use private_count_noise::{
    CountMechanism, GaussianCountMechanism, LaplaceCountMechanism, NoiseKind, PartitionSelector,
    Sensitivity,
};

/// Convenience prelude covering the common building blocks.
pub mod prelude {
    pub use crate::count::{count, count_with_rng, CountParams, PartitionSelectionParams};
    pub use private_count_accounting::prelude::*;
    pub use private_count_core::prelude::*;
    pub use private_count_noise::prelude::*;
}
