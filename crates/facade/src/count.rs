//! The differentially private count aggregation.

use std::collections::HashSet;
use std::hash::Hash;

use rand::Rng;

use private_count_accounting::PrivacySpec;
use private_count_core::{
    bound_contributions, clamp_negative_counts, count_per_unit_key, sum_across_units,
    ContributionBounds, DpError, Result,
};
use private_count_noise::{CountMechanism, NoiseKind, PartitionSelector, Sensitivity};

/// Budget requested for partition selection when partitions are private.
///
/// A request of `(0, 0)` consumes whatever the selection ledger has left.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PartitionSelectionParams {
    /// Epsilon requested for partition selection.
    pub epsilon: f64,
    /// Delta requested for partition selection.
    pub delta: f64,
}

/// Parameters of one count aggregation.
///
/// Both contribution caps are mandatory; there are no semantic defaults
/// for them. Noise defaults to Laplace and negative noisy counts are
/// clamped to zero unless `allow_negative_outputs` is set.
#[derive(Clone, Debug)]
pub struct CountParams<K> {
    /// Maximum number of distinct partitions one unit may contribute to.
    pub max_partitions_contributed: i64,
    /// Maximum count credited to any one (unit, partition) pair.
    pub max_contributions_per_partition: i64,
    /// Epsilon requested from the aggregation ledger (0 = all remaining).
    pub aggregation_epsilon: f64,
    /// Delta requested from the aggregation ledger.
    pub aggregation_delta: f64,
    /// Budget requested for partition selection; must stay unset when
    /// `public_partitions` is supplied.
    pub partition_selection: PartitionSelectionParams,
    /// Declared output partitions. When present, every declared key is
    /// published and all other keys are dropped before bounding; when
    /// absent, partitions are discovered from the data and thresholded.
    pub public_partitions: Option<Vec<K>>,
    /// Noise distribution.
    pub noise_kind: NoiseKind,
    /// Keep negative noisy counts instead of clamping them to zero.
    pub allow_negative_outputs: bool,
    /// Seed for the per-unit contribution sampling streams.
    pub sampling_seed: u64,
}

impl<K: Eq + Hash + Clone> CountParams<K> {
    /// Create count parameters with the mandatory caps and epsilon.
    pub fn new(
        max_partitions_contributed: i64,
        max_contributions_per_partition: i64,
        aggregation_epsilon: f64,
    ) -> Self {
        Self {
            max_partitions_contributed,
            max_contributions_per_partition,
            aggregation_epsilon,
            aggregation_delta: 0.0,
            partition_selection: PartitionSelectionParams::default(),
            public_partitions: None,
            noise_kind: NoiseKind::default(),
            allow_negative_outputs: false,
            sampling_seed: 0,
        }
    }

    /// Set the aggregation delta (required for Gaussian noise).
    pub fn with_aggregation_delta(mut self, delta: f64) -> Self {
        self.aggregation_delta = delta;
        self
    }

    /// Set the partition-selection budget request.
    pub fn with_partition_selection(mut self, epsilon: f64, delta: f64) -> Self {
        self.partition_selection = PartitionSelectionParams { epsilon, delta };
        self
    }

    /// Declare the output partitions up front.
    pub fn with_public_partitions(mut self, partitions: Vec<K>) -> Self {
        self.public_partitions = Some(partitions);
        self
    }

    /// Choose the noise distribution.
    pub fn with_noise_kind(mut self, kind: NoiseKind) -> Self {
        self.noise_kind = kind;
        self
    }

    /// Keep negative noisy counts in the output.
    pub fn with_allow_negative_outputs(mut self, allow: bool) -> Self {
        self.allow_negative_outputs = allow;
        self
    }

    /// Set the seed for per-unit contribution sampling.
    pub fn with_sampling_seed(mut self, seed: u64) -> Self {
        self.sampling_seed = seed;
        self
    }

    /// Validate the parameter combination.
    ///
    /// Runs before any budget is consumed; a failure here leaves the
    /// ledgers untouched.
    pub fn validate(&self) -> Result<()> {
        ContributionBounds::new(
            self.max_partitions_contributed,
            self.max_contributions_per_partition,
        )
        .validate()?;

        if !self.aggregation_epsilon.is_finite() || self.aggregation_epsilon < 0.0 {
            return Err(DpError::invalid(format!(
                "aggregation epsilon must be finite and non-negative, got {}",
                self.aggregation_epsilon
            )));
        }
        match self.noise_kind {
            NoiseKind::Laplace => {
                if self.aggregation_delta != 0.0 {
                    return Err(DpError::invalid(format!(
                        "Laplace noise requires aggregation delta = 0, got {}",
                        self.aggregation_delta
                    )));
                }
            }
            NoiseKind::Gaussian => {
                // Only the (0, 0) use-remaining request may leave the
                // delta unset; any explicit request needs both a positive
                // epsilon and a delta in (0, 1), or the budget would be
                // debited before the mechanism rejects the calibration.
                let use_remaining = self.aggregation_epsilon == 0.0 && self.aggregation_delta == 0.0;
                if !use_remaining {
                    if self.aggregation_epsilon == 0.0 {
                        return Err(DpError::invalid(
                            "Gaussian noise requires a positive aggregation epsilon unless \
                             the whole request is (0, 0)",
                        ));
                    }
                    if !self.aggregation_delta.is_finite()
                        || self.aggregation_delta <= 0.0
                        || self.aggregation_delta >= 1.0
                    {
                        return Err(DpError::invalid(format!(
                            "Gaussian noise requires aggregation delta in (0, 1), got {}",
                            self.aggregation_delta
                        )));
                    }
                }
            }
        }

        let selection = self.partition_selection;
        if self.public_partitions.is_some() {
            if selection != PartitionSelectionParams::default() {
                return Err(DpError::invalid(
                    "partition selection budget must not be set when public partitions \
                     are supplied",
                ));
            }
        } else {
            // Same rule as the aggregation request: (0, 0) consumes the
            // remaining selection budget, anything else must be a fully
            // formed (epsilon > 0, delta in (0, 1)) request so the error
            // surfaces before either ledger is touched.
            let use_remaining = selection.epsilon == 0.0 && selection.delta == 0.0;
            if !use_remaining {
                if !selection.epsilon.is_finite() || selection.epsilon <= 0.0 {
                    return Err(DpError::invalid(format!(
                        "partition selection epsilon must be positive and finite, got {}",
                        selection.epsilon
                    )));
                }
                if !selection.delta.is_finite()
                    || selection.delta <= 0.0
                    || selection.delta >= 1.0
                {
                    return Err(DpError::invalid(format!(
                        "partition selection delta must be in (0, 1), got {}",
                        selection.delta
                    )));
                }
            }
        }
        Ok(())
    }
}

/// The two ways partitions reach the output.
enum PartitionPath<K> {
    /// Declared partitions, published unconditionally.
    Public(Vec<K>),
    /// Data-discovered partitions, thresholded under the granted budget.
    Private { epsilon: f64, delta: f64 },
}

/// Compute a differentially private per-partition count.
///
/// Convenience wrapper over [`count_with_rng`] using the thread RNG for
/// noise.
pub fn count<U, K, I>(
    input: I,
    params: CountParams<K>,
    spec: &PrivacySpec,
) -> Result<Vec<(K, i64)>>
where
    U: Eq + Hash + Clone,
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = (U, K)>,
{
    count_with_rng(input, params, spec, &mut rand::thread_rng())
}

/// Compute a differentially private per-partition count with an explicit
/// noise RNG.
///
/// Pipeline: validate, consume budgets, pre-filter to public partitions
/// if declared, bound contributions per unit, count per (unit, key), sum
/// across units, then either publish every declared partition with noise
/// or threshold the discovered ones, clamping negatives last. Validation
/// and budget failures abort before any output is produced.
pub fn count_with_rng<U, K, I, R>(
    input: I,
    params: CountParams<K>,
    spec: &PrivacySpec,
    rng: &mut R,
) -> Result<Vec<(K, i64)>>
where
    U: Eq + Hash + Clone,
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = (U, K)>,
    R: Rng,
{
    params.validate()?;

    let (epsilon, delta) = spec
        .aggregation()
        .consume(params.aggregation_epsilon, params.aggregation_delta)?;
    let path = match params.public_partitions {
        Some(declared) => PartitionPath::Public(declared),
        None => {
            let (sel_epsilon, sel_delta) = spec
                .partition_selection()
                .consume(params.partition_selection.epsilon, params.partition_selection.delta)?;
            PartitionPath::Private {
                epsilon: sel_epsilon,
                delta: sel_delta,
            }
        }
    };

    let bounds = ContributionBounds::new(
        params.max_partitions_contributed,
        params.max_contributions_per_partition,
    );
    let sensitivity = Sensitivity::new(
        params.max_partitions_contributed,
        params.max_contributions_per_partition,
    );
    let mechanism = CountMechanism::new(params.noise_kind, epsilon, delta, sensitivity)?;

    // With declared partitions, undeclared keys are dropped before
    // bounding so a unit's partition slots are not wasted on keys that
    // can never be published. No budget cost: nothing private about
    // absent keys is revealed.
    let records: Vec<(U, K)> = match &path {
        PartitionPath::Public(declared) => {
            let declared_set: HashSet<K> = declared.iter().cloned().collect();
            input
                .into_iter()
                .filter(|(_, key)| declared_set.contains(key))
                .collect()
        }
        PartitionPath::Private { .. } => input.into_iter().collect(),
    };

    let bounded = bound_contributions(records, &bounds, params.sampling_seed);
    let sums = sum_across_units(count_per_unit_key(bounded));

    let mut results: Vec<(K, i64)> = match path {
        PartitionPath::Public(declared) => {
            let mut seen: HashSet<K> = HashSet::with_capacity(declared.len());
            let mut out = Vec::with_capacity(declared.len());
            for key in declared {
                if !seen.insert(key.clone()) {
                    continue;
                }
                let raw = sums.get(&key).copied().unwrap_or(0);
                out.push((key, mechanism.add_noise(raw, rng)));
            }
            out
        }
        PartitionPath::Private { epsilon, delta } => {
            let selector = PartitionSelector::new(mechanism, epsilon, delta, sensitivity)?;
            sums.into_iter()
                .filter_map(|(key, raw)| {
                    let (keep, noisy) = selector.select_and_noise(raw, rng);
                    keep.then_some((key, noisy))
                })
                .collect()
        }
    };

    if !params.allow_negative_outputs {
        clamp_negative_counts(&mut results);
    }
    Ok(results)
}
