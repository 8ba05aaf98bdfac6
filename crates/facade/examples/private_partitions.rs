//! Discover and count search terms without leaking rare ones.

use private_count::{count, CountParams, PrivacySpec, PrivacySpecParams, Result};

fn main() -> Result<()> {
    // 120 users searched "weather", 80 searched "news", one user searched
    // something unique. The unique term should almost never be published.
    let mut searches: Vec<(u32, &str)> = Vec::new();
    for user in 0..120 {
        searches.push((user, "weather"));
    }
    for user in 120..200 {
        searches.push((user, "news"));
    }
    searches.push((200, "rare secret term"));

    let spec = PrivacySpec::new(PrivacySpecParams {
        aggregation_epsilon: 1.0,
        aggregation_delta: 0.0,
        partition_selection_epsilon: 1.0,
        partition_selection_delta: 1e-5,
    })?;

    let params = CountParams::new(1, 1, 1.0).with_partition_selection(1.0, 1e-5);

    let mut results = count(searches, params, &spec)?;
    results.sort();
    for (term, noisy_count) in results {
        println!("{term}: {noisy_count}");
    }
    Ok(())
}
