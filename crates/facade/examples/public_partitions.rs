//! Count page visits per declared page with differential privacy.

use private_count::{count, CountParams, PrivacySpec, PrivacySpecParams, Result};

fn main() -> Result<()> {
    // Visits as (visitor id, page) pairs; one visitor may repeat a page.
    let visits = vec![
        (1u32, "home"),
        (1, "home"),
        (1, "pricing"),
        (2, "home"),
        (2, "docs"),
        (3, "pricing"),
        (3, "internal"), // not declared, dropped before bounding
    ];

    let spec = PrivacySpec::new(PrivacySpecParams {
        aggregation_epsilon: 1.0,
        ..Default::default()
    })?;

    let params = CountParams::new(2, 1, 1.0)
        .with_public_partitions(vec!["home", "pricing", "docs", "checkout"]);

    let mut results = count(visits, params, &spec)?;
    results.sort();
    for (page, noisy_count) in results {
        println!("{page}: {noisy_count}");
    }
    Ok(())
}
