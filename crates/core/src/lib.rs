//! Core stages of a differentially private count pipeline.
//!
//! This crate provides the pure, order-independent transforms the pipeline
//! is assembled from: per-unit contribution bounding, keyed counting,
//! cross-unit aggregation, and negative-output clamping. Noise mechanisms
//! and budget accounting live in sibling crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregation;
pub mod bounding;
pub mod clamp;
pub mod error;

pub use aggregation::{count_per_unit_key, sum_across_units};
pub use bounding::{bound_contributions, ContributionBounds};
pub use clamp::clamp_negative_counts;
pub use error::{DpError, Result};

/// Common imports for downstream users.
pub mod prelude {
    pub use crate::{
        bound_contributions, clamp_negative_counts, count_per_unit_key, sum_across_units,
        ContributionBounds, DpError, Result,
    };
}
