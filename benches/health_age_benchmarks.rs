use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use healthage::{compute_health_age, evaluate_batch, BatchConfig, Gender, HealthAgeInput, MeasurementRecord};

/// Benchmarks for single and batch health-age evaluation

fn create_input(i: usize) -> HealthAgeInput {
    let gender = if i % 2 == 0 { Gender::Male } else { Gender::Female };
    let age = 18.0 + (i % 70) as f64;

    let mut input = HealthAgeInput::new(age, gender, 10.0 + (i % 35) as f64, 1.0 + (i % 18) as f64)
        .with_height(150.0 + (i % 45) as f64);

    match i % 4 {
        0 => input = input.with_weight(50.0 + (i % 60) as f64),
        1 => input = input.with_ffm(35.0 + (i % 40) as f64).with_smi(5.5 + (i % 5) as f64 * 0.5),
        2 => input = input.with_weight(60.0).with_smm(20.0 + (i % 25) as f64),
        _ => {}
    }

    input
}

fn bench_single_computation(c: &mut Criterion) {
    let input = create_input(1);

    c.bench_function("compute_health_age", |b| {
        b.iter(|| compute_health_age(black_box(&input)))
    });
}

fn bench_batch_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Batch Evaluation");

    for &size in &[10, 1_000, 100_000] {
        let records: Vec<MeasurementRecord> =
            (0..size).map(|i| MeasurementRecord::new(create_input(i))).collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("evaluate_batch", size), &records, |b, records| {
            b.iter(|| evaluate_batch(records, &BatchConfig::default()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_computation, bench_batch_evaluation);
criterion_main!(benches);
