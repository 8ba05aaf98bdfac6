//! Process-wide privacy budgets for one set of aggregations.

use private_count_core::Result;

use crate::budget::BudgetAccountant;

/// Total budgets a `PrivacySpec` is created with.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PrivacySpecParams {
    /// Total epsilon available for aggregation noise.
    pub aggregation_epsilon: f64,
    /// Total delta available for aggregation noise.
    pub aggregation_delta: f64,
    /// Total epsilon available for partition selection.
    pub partition_selection_epsilon: f64,
    /// Total delta available for partition selection.
    pub partition_selection_delta: f64,
}

/// Externally owned privacy configuration: one ledger for aggregation
/// noise and one for partition selection.
///
/// The spec is the only cross-invocation mutable state in the pipeline;
/// everything else is created fresh per aggregation.
#[derive(Debug)]
pub struct PrivacySpec {
    aggregation: BudgetAccountant,
    partition_selection: BudgetAccountant,
}

impl PrivacySpec {
    /// Create a spec holding the given total budgets.
    pub fn new(params: PrivacySpecParams) -> Result<Self> {
        Ok(Self {
            aggregation: BudgetAccountant::new(
                params.aggregation_epsilon,
                params.aggregation_delta,
            )?,
            partition_selection: BudgetAccountant::new(
                params.partition_selection_epsilon,
                params.partition_selection_delta,
            )?,
        })
    }

    /// The aggregation-noise ledger.
    pub fn aggregation(&self) -> &BudgetAccountant {
        &self.aggregation
    }

    /// The partition-selection ledger.
    pub fn partition_selection(&self) -> &BudgetAccountant {
        &self.partition_selection
    }
}
