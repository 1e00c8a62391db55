//! The naive triple-loop matrix multiplication kernel.
//!
//! This is deliberately the *reference* baseline: one O(m·n·k) loop nest with
//! no blocking, packing, vectorization or threading. It exists so that the
//! effect of compiler optimization levels on flop-rate and bandwidth can be
//! observed against a known, trivially-correct kernel.

use crate::matrix::at;

/// Computes `C := C + A * B` with the elementary triple loop.
///
/// All matrices are column-major: A is m×k, B is k×n, C is m×n. The result
/// accumulates onto the existing contents of `c`; it is *not* zeroed first.
/// The inner summation runs over `p` in ascending order, so the floating-point
/// result is bit-for-bit reproducible against a sequential reference.
///
/// Per inner-loop step the accounting used by the bandwidth metric is
/// 2 flops (one multiply, one add) and 4 memory operations (loads of
/// `a`, `b`, `c` plus the store of `c`).
///
/// # Panics
///
/// Panics on out-of-range slice access if the buffers are smaller than the
/// dimensions imply; conformability is the caller's responsibility.
pub fn mmult0(m: usize, n: usize, k: usize, a: &[f64], b: &[f64], c: &mut [f64]) {
    debug_assert!(a.len() >= m * k);
    debug_assert!(b.len() >= k * n);
    debug_assert!(c.len() >= m * n);

    for i in 0..m {
        for j in 0..n {
            for p in 0..k {
                // mop: 3 (load a, b, c)
                let a_ip = a[at(i, p, m)];
                let b_pj = b[at(p, j, k)];
                let c_ij = c[at(i, j, m)];

                // flop: 2
                let c_ij = c_ij + a_ip * b_pj;

                // mop: 1 (store c)
                c[at(i, j, m)] = c_ij;
            }
        }
    }
}
