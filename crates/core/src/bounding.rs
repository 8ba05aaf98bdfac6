//! Per-unit contribution bounding.
//!
//! Caps how much any single privacy unit can influence the aggregate, both
//! in breadth (distinct partitions touched) and depth (count credited per
//! partition). Bounding is local: the decision for one unit is a pure
//! function of that unit's own contributions and the sampling seed, never
//! of what other units contributed.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{DpError, Result};

/// Caps on a single privacy unit's influence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContributionBounds {
    /// Maximum number of distinct partitions one unit may contribute to.
    pub max_partitions_contributed: i64,
    /// Maximum count credited to any one (unit, partition) pair.
    pub max_contributions_per_partition: i64,
}

impl ContributionBounds {
    /// Create contribution bounds.
    pub fn new(max_partitions_contributed: i64, max_contributions_per_partition: i64) -> Self {
        Self {
            max_partitions_contributed,
            max_contributions_per_partition,
        }
    }

    /// Validate that both caps are strictly positive.
    pub fn validate(&self) -> Result<()> {
        if self.max_partitions_contributed <= 0 {
            return Err(DpError::invalid(format!(
                "max_partitions_contributed must be positive, got {}",
                self.max_partitions_contributed
            )));
        }
        if self.max_contributions_per_partition <= 0 {
            return Err(DpError::invalid(format!(
                "max_contributions_per_partition must be positive, got {}",
                self.max_contributions_per_partition
            )));
        }
        Ok(())
    }
}

/// Bound an unbounded multiset of (unit, partition key) contributions.
///
/// Per unit: uniformly sample at most `max_partitions_contributed` of its
/// distinct partition keys, then cap each kept key's multiplicity at
/// `max_contributions_per_partition`. Units under both caps pass through
/// unchanged. Total over arbitrary input; returns the surviving pairs.
pub fn bound_contributions<U, K, I>(
    records: I,
    bounds: &ContributionBounds,
    seed: u64,
) -> Vec<(U, K)>
where
    U: Eq + Hash + Clone,
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = (U, K)>,
{
    // Group each unit's contributions by key, keeping multiplicity. Key
    // order is tracked per unit only so the shuffle below has a list to
    // permute; the kept set is uniform over the unit's own keys.
    let mut per_unit: HashMap<U, (Vec<K>, HashMap<K, i64>)> = HashMap::new();
    for (unit, key) in records {
        let (order, counts) = per_unit.entry(unit).or_default();
        let count = counts.entry(key.clone()).or_insert(0);
        if *count == 0 {
            order.push(key);
        }
        *count += 1;
    }

    let max_partitions = bounds.max_partitions_contributed.max(0) as usize;
    let max_per_partition = bounds.max_contributions_per_partition.max(0);

    let mut bounded = Vec::new();
    for (unit, (mut keys, counts)) in per_unit {
        if keys.len() > max_partitions {
            keys.shuffle(&mut unit_rng(seed, &unit));
            keys.truncate(max_partitions);
        }
        for key in keys {
            let credited = counts[&key].min(max_per_partition);
            for _ in 0..credited {
                bounded.push((unit.clone(), key.clone()));
            }
        }
    }
    bounded
}

/// RNG stream for one unit's sampling decision, derived from the caller's
/// seed and the unit identity alone.
fn unit_rng<U: Hash>(seed: u64, unit: &U) -> ChaCha8Rng {
    let mut hasher = DefaultHasher::new();
    hasher.write_u64(seed);
    unit.hash(&mut hasher);
    ChaCha8Rng::seed_from_u64(hasher.finish())
}
