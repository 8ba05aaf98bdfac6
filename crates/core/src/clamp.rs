//! Negative-output clamping.

/// Replace every negative noisy count with 0, in place.
///
/// Pure and total. Applied as the last pipeline step so that partition
/// selection always sees the true noisy sign.
pub fn clamp_negative_counts<K>(results: &mut [(K, i64)]) {
    for (_, count) in results.iter_mut() {
        if *count < 0 {
            *count = 0;
        }
    }
}
