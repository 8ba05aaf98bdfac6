//! Privacy-budget accounting for count aggregations.
//!
//! Each aggregation consumes a slice of an externally owned budget exactly
//! once. The ledgers here are the only shared mutable state in the
//! pipeline, so they are safe under concurrent `consume` calls and fail
//! atomically when a request cannot be satisfied.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod budget;
pub mod privacy_spec;

pub use budget::BudgetAccountant;
pub use privacy_spec::{PrivacySpec, PrivacySpecParams};

/// Common imports for downstream users.
pub mod prelude {
    pub use crate::{BudgetAccountant, PrivacySpec, PrivacySpecParams};
}
