//! # matbench
//!
//! Serial matrix-multiplication microbenchmarks for measuring achieved
//! double-precision floating-point throughput (GFLOP/s) and memory bandwidth
//! (GB/s) on a given machine, optionally augmented with a statistical
//! sampling profile of the measured code region.
//!
//! The kernel under measurement is deliberately the naive triple-loop
//! multiply with no blocking, vectorization or threading: the exercise is to
//! observe what compiler optimization levels do to the flop-rate and the
//! bandwidth of a known-trivial loop nest, not to compete with a tuned BLAS.
//!
//! A run is a straight-line pipeline: allocate and fill the column-major
//! operand buffers, bracket the repeated kernel invocations with a counter
//! region and a wall-clock stopwatch, derive the metrics, and optionally dump
//! the sparse sampling histogram.

pub mod bench;
pub mod counters;
pub mod error;
pub mod kernel;
pub mod matrix;
pub mod metrics;
pub mod profile;
pub mod timer;

pub use error::{BenchError, Result};
