//! Row-major vs swapped column-major SGEMM through the default kernel.
//!
//! # Usage:
//! ```bash
//! # Run all layout benchmarks
//! cargo bench --bench layouts
//!
//! # Only the default benchmark shape
//! cargo bench --bench layouts -- sgemm_1x1221x1221
//!
//! # Against a linked CBLAS
//! cargo bench --features cblas --bench layouts
//! ```

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use sgemm_layout_bench::bench::{Shape, Workspace};
use sgemm_layout_bench::blas::DefaultKernel;
use sgemm_layout_bench::rng::DEFAULT_SEED;

fn bench_layouts_by_shape(c: &mut Criterion) {
    let shapes = [
        (1, 1221, 1221),
        (16, 256, 256),
        (128, 128, 128),
        (256, 256, 256),
    ];
    let kernel = DefaultKernel::new();

    for (m, n, k) in shapes {
        let shape = Shape::new(m, n, k);
        let mut ws = Workspace::allocate(shape).expect("allocate operands");
        ws.populate(DEFAULT_SEED).expect("populate operands");

        let mut group = c.benchmark_group(format!("sgemm_{m}x{n}x{k}"));
        group.throughput(Throughput::Elements((2 * m * n * k) as u64));
        if m * n * k > 1 << 22 {
            group.sample_size(20);
        }

        group.bench_function("row_major", |bench| {
            bench.iter(|| {
                ws.row_sgemm(black_box(&kernel)).expect("row-major sgemm");
                black_box(ws.c_row());
            });
        });

        group.bench_function("col_major", |bench| {
            bench.iter(|| {
                ws.col_sgemm(black_box(&kernel)).expect("col-major sgemm");
                black_box(ws.c_col());
            });
        });

        group.finish();
    }
}

criterion_group!(benches, bench_layouts_by_shape);
criterion_main!(benches);
