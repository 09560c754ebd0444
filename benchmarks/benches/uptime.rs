use benchmarks::{features_of, mixed_samples};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use netadvisor::{TrainingConfig, UptimeModel};

fn bench_train(c: &mut Criterion) {
    let config = TrainingConfig {
        max_epochs: 50,
        ..TrainingConfig::default()
    };
    let mut group = c.benchmark_group("train");
    for copies in [1, 10, 50] {
        let samples = mixed_samples(copies, 42);
        group.bench_with_input(BenchmarkId::from_parameter(samples.len()), &samples, |b, s| {
            b.iter(|| UptimeModel::fit(black_box(s), &config).expect("training failed"));
        });
    }
    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let model = UptimeModel::fit(&mixed_samples(1, 42), &TrainingConfig::default())
        .expect("training failed");

    let mut group = c.benchmark_group("predict");
    for copies in [1, 10, 100] {
        let features = features_of(&mixed_samples(copies, 7));
        group.bench_with_input(
            BenchmarkId::from_parameter(features.len()),
            &features,
            |b, f| {
                b.iter(|| model.predict(black_box(f)).expect("prediction failed"));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_train, bench_predict);
criterion_main!(benches);
