use condense::cluster::{Clusterer, Kmeans};
use condense::{distribute, Dimension, DistributeParams, Observation, Value};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");

    // Generate synthetic data
    let mut rng = StdRng::seed_from_u64(42);
    let n = 1000;
    let d = 16;
    let k = 10;

    let points: Vec<Vec<f64>> = (0..n)
        .map(|_| (0..d).map(|_| rng.random::<f64>()).collect())
        .collect();

    group.bench_function("fit_n1000_d16_k10", |b| {
        b.iter(|| {
            let model = Kmeans::new().with_max_iter(10).with_seed(42);
            model.fit(black_box(&points), k).unwrap();
        })
    });

    group.finish();
}

fn bench_distribute(c: &mut Criterion) {
    let mut group = c.benchmark_group("distribute");

    let mut rng = StdRng::seed_from_u64(42);
    let observations: Vec<Observation> = (0..1000)
        .map(|_| {
            Observation::new(
                rng.random_range(1..500),
                vec![
                    Value::from(rng.random::<f64>() * 10_000.0),
                    Value::from(rng.random::<f64>() * 100.0),
                ],
            )
        })
        .collect();
    let dimensions = vec![Dimension::numeric(), Dimension::numeric()];

    group.bench_function("pipeline_n1000_d2", |b| {
        b.iter(|| {
            distribute(
                black_box(observations.clone()),
                &dimensions,
                &DistributeParams::default(),
            )
            .unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_kmeans, bench_distribute);
criterion_main!(benches);
