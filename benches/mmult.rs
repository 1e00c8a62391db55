//! Kernel throughput benchmark.
//!
//! # Usage:
//! ```bash
//! # Run all kernel benchmarks
//! cargo bench --bench mmult
//!
//! # Run a single size
//! cargo bench --bench mmult -- mmult0_128
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;

use matbench::kernel::mmult0;

/// Create a test matrix in column-major format.
fn create_matrix(rows: usize, cols: usize, rng: &mut StdRng) -> Vec<f64> {
    let mut matrix = vec![0.0; rows * cols];
    for col in 0..cols {
        for row in 0..rows {
            let idx = col * rows + row; // column-major indexing
            matrix[idx] = rng.random_range(0.0..1.0);
        }
    }
    matrix
}

fn bench_mmult0_by_size(c: &mut Criterion) {
    let sizes = [64, 128, 256];

    for size in sizes {
        let group_name = format!("mmult0_{}", size);
        let mut group = c.benchmark_group(&group_name);
        group.sample_size(20); // Reduce sample size for large matrices

        let (m, n, k) = (size, size, size);
        let mut rng = StdRng::seed_from_u64(42);

        let a = create_matrix(m, k, &mut rng);
        let b = create_matrix(k, n, &mut rng);
        let mut c_buf = vec![0.0; m * n];

        group.bench_function("naive_triple_loop", |bench| {
            bench.iter(|| {
                mmult0(
                    black_box(m),
                    black_box(n),
                    black_box(k),
                    black_box(&a),
                    black_box(&b),
                    black_box(&mut c_buf),
                );
                black_box(&c_buf);
            });
        });

        group.finish();
    }
}

criterion_group!(benches, bench_mmult0_by_size);
criterion_main!(benches);
