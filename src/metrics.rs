//! Derived throughput metrics and report formatting.
//!
//! Given a problem size, a repeat count and a measured wall-clock time, this
//! module computes the achieved flop-rate and memory bandwidth and formats
//! the fixed-width report lines.
//!
//! The memory-operation accounting is deliberately naive: 4 mops per
//! inner-loop step (loads of A, B, C plus the store of C), even though an
//! optimizing compiler keeps the C accumulator in a register. The point of
//! the exercise is to contrast this naive-loop accounting against what the
//! compiler actually emits, so the overcount is preserved exactly.

/// Flops per inner-loop step: one multiply, one add.
const FLOPS_PER_STEP: f64 = 2.0;

/// Memory operations per inner-loop step: 3 loads + 1 store.
const MOPS_PER_STEP: f64 = 4.0;

/// The column header matching [`report_row`].
pub const HEADER: &str = " Dimension       Time    Gflop/s       GB/s";

/// Achieved flop-rate in GFLOP/s: `(2·m·n·k·repeats) / 1e9 / seconds`.
pub fn gflop_rate(m: usize, n: usize, k: usize, repeats: usize, seconds: f64) -> f64 {
    let steps = (m as f64) * (n as f64) * (k as f64) * (repeats as f64);
    FLOPS_PER_STEP * steps / 1e9 / seconds
}

/// Achieved memory bandwidth in GB/s:
/// `(4·m·n·k·repeats·sizeof(f64)) / 1e9 / seconds`.
pub fn bandwidth(m: usize, n: usize, k: usize, repeats: usize, seconds: f64) -> f64 {
    let steps = (m as f64) * (n as f64) * (k as f64) * (repeats as f64);
    MOPS_PER_STEP * steps * (std::mem::size_of::<f64>() as f64) / 1e9 / seconds
}

/// Formats one report row: dimension, elapsed seconds, GFLOP/s and GB/s,
/// each right-aligned to width 10, the floats with 6 fixed decimals.
pub fn report_row(dim: usize, seconds: f64, gflops: f64, gbs: f64) -> String {
    format!("{:10} {:10.6} {:10.6} {:10.6}", dim, seconds, gflops, gbs)
}
