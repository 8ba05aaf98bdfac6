//! Calibrated noise mechanisms for differentially private counts.
//!
//! Provides the two supported count mechanisms (Laplace and Gaussian), the
//! sensitivity model they are calibrated against, and the thresholding
//! selector used to decide whether a privately discovered partition may be
//! published at all.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod gaussian;
pub mod laplace;
pub mod mechanism;
pub mod selection;
pub mod sensitivity;

pub use gaussian::GaussianCountMechanism;
pub use laplace::LaplaceCountMechanism;
pub use mechanism::{CountMechanism, NoiseKind};
pub use selection::PartitionSelector;
pub use sensitivity::Sensitivity;

/// Common imports for downstream users.
pub mod prelude {
    pub use crate::{
        CountMechanism, GaussianCountMechanism, LaplaceCountMechanism, NoiseKind,
        PartitionSelector, Sensitivity,
    };
}
