use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use qv_math::isqrt;

fn bench_isqrt(c: &mut Criterion) {
    let mut group = c.benchmark_group("isqrt");

    let inputs: [(&str, u128); 4] = [
        ("small", 1_000_000),
        ("u64_max", u64::MAX as u128),
        ("u64_max_squared", (u64::MAX as u128) * (u64::MAX as u128)),
        ("u128_max", u128::MAX),
    ];

    for (name, n) in inputs {
        group.bench_with_input(BenchmarkId::new("digit_by_digit", name), &n, |b, &n| {
            b.iter(|| black_box(isqrt(black_box(n))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_isqrt);
criterion_main!(benches);
