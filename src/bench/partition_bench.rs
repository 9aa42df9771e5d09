use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rowsplit::{Matrix, Strategy};
use std::hint::black_box;

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_partition");
    group.sample_size(10);

    for dim in [128, 256] {
        let a = Matrix::from_fn(dim, |i, j| ((i * dim + j) % 100) as f64);
        let b = Matrix::from_fn(dim, |i, j| ((i * dim + j) % 100) as f64);

        for strategy in Strategy::ALL {
            group.bench_with_input(BenchmarkId::new(strategy.name(), dim), &dim, |bench, _| {
                let mut out = Matrix::zeros(dim);
                bench.iter(|| {
                    strategy
                        .run(black_box(&a), black_box(&b), &mut out, 4)
                        .unwrap()
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
