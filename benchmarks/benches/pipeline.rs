use ames_preprocessing::payload::Payload;
use ames_preprocessing::preprocessing::{
    clean, feature_engineer, FittedTransformer, Preprocessor, Transformer,
};
use benchmarks::synthetic_ames;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const SIZES: [usize; 3] = [100, 1_000, 10_000];

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");
    for &n in SIZES.iter() {
        let table = synthetic_ames(n, 42).unwrap();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &table, |b, table| {
            b.iter(|| {
                let fitted = Preprocessor::default().fit(black_box(table)).unwrap();
                black_box(fitted);
            });
        });
    }
    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");
    for &n in SIZES.iter() {
        let reference = synthetic_ames(n, 42).unwrap();
        let fitted = Preprocessor::default().fit(&reference).unwrap();
        let batch = synthetic_ames(n, 7).unwrap();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &batch, |b, batch| {
            b.iter(|| {
                let out = fitted.transform(black_box(batch)).unwrap();
                black_box(out);
            });
        });
    }
    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let table = synthetic_ames(10_000, 42).unwrap();
    let cleaned = clean(&table).unwrap();

    c.bench_function("clean_10000", |b| {
        b.iter(|| black_box(clean(black_box(&table)).unwrap()));
    });
    c.bench_function("engineer_10000", |b| {
        b.iter(|| black_box(feature_engineer(black_box(&cleaned)).unwrap()));
    });
}

fn bench_payload(c: &mut Criterion) {
    let (processed, fitted) = Preprocessor::default()
        .fit_with_output(&synthetic_ames(1_000, 42).unwrap())
        .unwrap();
    let rows: Vec<usize> = (0..100).collect();
    let features = fitted.feature_names();

    c.bench_function("payload_100_rows", |b| {
        b.iter(|| {
            let payload = Payload::from_table(black_box(&processed), &rows).unwrap();
            black_box(payload.feature_matrix(&features).unwrap());
        });
    });
}

criterion_group!(benches, bench_fit, bench_apply, bench_stages, bench_payload);
criterion_main!(benches);
