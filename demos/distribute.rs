//! The two pipeline paths on small synthetic datasets, printed as JSON.

use condense::{distribute, Dimension, DistributeParams, Distributor, Observation, Value};
use rand::prelude::*;

fn main() {
    // --- Outlier-only path: a handful of categorical groups ---
    let rows = vec![
        Observation::new(42, vec![Value::from("east")]),
        Observation::new(17, vec![Value::from("north")]),
        Observation::new(55, vec![Value::from("south")]),
        Observation::new(9, vec![Value::from("west")]),
    ];
    let result = distribute(
        rows,
        &[Dimension::enumerable()],
        &DistributeParams::default(),
    )
    .unwrap();
    println!("=== categorical, value order ===");
    println!("{}", serde_json::to_string_pretty(&result).unwrap());

    // --- Clustering path: three numeric blobs, thresholds lowered so a
    //     small demo dataset qualifies ---
    let mut rng = StdRng::seed_from_u64(42);
    let mut rows = Vec::new();
    for center in [0.0, 500.0, 2000.0] {
        for _ in 0..40 {
            let x = center + rng.random::<f64>() * 50.0;
            rows.push(Observation::new(rng.random_range(1..20), vec![Value::from(x)]));
        }
    }

    let engine = Distributor::new()
        .with_min_observations(100)
        .with_default_clusters(3);
    let result = engine
        .distribute(rows, &[Dimension::numeric()], &DistributeParams::default())
        .unwrap();
    println!("\n=== numeric, clustered into 3 centroids ===");
    println!("{}", serde_json::to_string_pretty(&result).unwrap());
}
