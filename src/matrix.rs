//! Column-major matrix buffers.
//!
//! The benchmark operates on flat `Vec<f64>` buffers in **column-major**
//! order (Fortran-style), where element (i,j) of a matrix with leading
//! dimension `ld` is at index `j * ld + i`. Matrices A (m×k), B (k×n) and
//! C (m×n) are allocated independently and owned by the benchmark driver for
//! the duration of one run.

use rand::Rng;

use crate::error::{allocation_error, Result};

/// Calculates the 1D index for a 2D element in a column-major matrix.
///
/// # Arguments
/// * `i` - Row index.
/// * `j` - Column index.
/// * `ld` - Leading dimension (number of rows in the matrix).
#[inline(always)]
pub fn at(i: usize, j: usize, ld: usize) -> usize {
    (j * ld) + i
}

/// Allocates a zero-initialized `rows × cols` column-major matrix.
///
/// The element count is computed with checked arithmetic so that a
/// nonsensical geometry surfaces as an [`crate::BenchError::AllocationError`]
/// instead of a panic.
pub fn alloc(rows: usize, cols: usize) -> Result<Vec<f64>> {
    let len = rows
        .checked_mul(cols)
        .ok_or_else(|| allocation_error(usize::MAX, "matrix length overflows usize"))?;
    Ok(vec![0.0f64; len])
}

/// Fills a buffer with pseudo-random values drawn uniformly from [0, 1).
///
/// The generator is supplied by the caller so that runs are reproducible
/// from a fixed seed.
pub fn fill_random<R: Rng>(buf: &mut [f64], rng: &mut R) {
    for x in buf.iter_mut() {
        *x = rng.random_range(0.0..1.0);
    }
}

/// Allocates a `rows × cols` column-major matrix filled with pseudo-random
/// values in [0, 1).
pub fn random<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Result<Vec<f64>> {
    let mut m = alloc(rows, cols)?;
    fill_random(&mut m, rng);
    Ok(m)
}

/// Utility function to print a matrix stored in column-major format.
pub fn display_column_major(m: usize, n: usize, ld: usize, a: &[f64]) {
    for i in 0..m {
        for j in 0..n {
            print!("{} \t", a[at(i, j, ld)]);
        }
        println!();
    }
    println!();
}
