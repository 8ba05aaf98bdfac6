//! Keyed counting and cross-unit aggregation.
//!
//! Both reductions are exact, associative, and commutative: the order in
//! which pairs or units are processed never affects the result. They must
//! run strictly after contribution bounding.

use std::collections::HashMap;
use std::hash::Hash;

/// Count occurrences per (privacy unit, partition key) pair.
///
/// Every entry in the result is strictly positive; duplicate occurrences
/// of the same pair collapse into one counted entry.
pub fn count_per_unit_key<U, K, I>(pairs: I) -> HashMap<(U, K), i64>
where
    U: Eq + Hash,
    K: Eq + Hash,
    I: IntoIterator<Item = (U, K)>,
{
    let mut counts: HashMap<(U, K), i64> = HashMap::new();
    for pair in pairs {
        *counts.entry(pair).or_insert(0) += 1;
    }
    counts
}

/// Drop the privacy-unit dimension and sum counts per partition key.
pub fn sum_across_units<U, K>(counts: HashMap<(U, K), i64>) -> HashMap<K, i64>
where
    U: Eq + Hash,
    K: Eq + Hash,
{
    let mut sums: HashMap<K, i64> = HashMap::new();
    for ((_, key), count) in counts {
        *sums.entry(key).or_insert(0) += count;
    }
    sums
}
