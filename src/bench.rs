//! The parameterized benchmark driver.
//!
//! One `run` entry point replaces the near-identical program variants the
//! exercise otherwise accumulates: allocate and fill the operand matrices,
//! bracket the repeated kernel calls with the counter region and the
//! stopwatch, derive the throughput metrics, and optionally hand back the
//! sampled histogram for dumping and checking.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::counters::{Counters, SamplingConfig};
use crate::error::{validation_error, Result};
use crate::kernel::mmult0;
use crate::matrix;
use crate::metrics;
use crate::profile::{prof_size, BucketKind, SampleBuffers};
use crate::timer::Timer;

/// Name of the counter region bracketing the timed loop.
pub const REGION_NAME: &str = "computation";

/// Sampling configuration for one profiled run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileConfig {
    /// Name of the sampled hardware event.
    pub event: String,
    /// Start of the profiled address range.
    pub start: u64,
    /// Length of the profiled address range.
    pub range_length: u64,
    /// Fixed-point scale factor ([`crate::profile::FULL_SCALE`] = 1.0).
    pub scale: u32,
    /// Sampling interval in event counts.
    pub interval: u64,
    /// Number of per-sample histogram buffers.
    pub num_buffers: usize,
    /// Counter width of one histogram bucket.
    pub bucket: BucketKind,
}

/// Configuration for one benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Problem dimension: the run multiplies square dim×dim matrices.
    pub dim: usize,
    /// Number of back-to-back kernel invocations inside the timed window.
    pub repeats: usize,
    /// Seed for the pseudo-random matrix fill.
    pub seed: u64,
    /// Sampling configuration; `None` for a plain timing run.
    pub profile: Option<ProfileConfig>,
}

/// Result of one benchmark run.
#[derive(Debug)]
pub struct BenchResult {
    /// Problem dimension.
    pub dim: usize,
    /// Elapsed wall-clock time of the repeated loop, in seconds.
    pub seconds: f64,
    /// Achieved flop-rate in GFLOP/s.
    pub gflops: f64,
    /// Achieved memory bandwidth in GB/s.
    pub gbs: f64,
    /// The sampled histogram, when profiling was configured.
    pub profile: Option<SampleBuffers>,
}

/// Runs the kernel `repeats` times back-to-back inside one `tic`/`toc`
/// bracket and returns the elapsed seconds.
///
/// A repeat count of zero is legal: the matrices are left untouched and the
/// returned time is a non-negative measurement of the empty loop.
pub fn run_timed(
    m: usize,
    n: usize,
    k: usize,
    repeats: usize,
    a: &[f64],
    b: &[f64],
    c: &mut [f64],
) -> f64 {
    let mut t = Timer::new();
    t.tic();
    for _ in 0..repeats {
        mmult0(m, n, k, a, b, c);
    }
    t.toc()
}

/// Runs one benchmark: allocate, fill, measure, derive metrics, and
/// optionally sample a profile histogram.
///
/// Allocation and initialization happen strictly before the counter region
/// and the timed window; metric computation and the profile read-back happen
/// strictly after. Any counter failure is propagated as fatal.
pub fn run<C: Counters>(config: &BenchConfig, counters: &mut C) -> Result<BenchResult> {
    if config.dim == 0 {
        return Err(validation_error("dimension must be at least 1"));
    }
    if config.repeats == 0 {
        return Err(validation_error(
            "repeat count must be at least 1 for a meaningful measurement",
        ));
    }

    let (m, n, k) = (config.dim, config.dim, config.dim);

    let mut rng = StdRng::seed_from_u64(config.seed);
    let a = matrix::random(m, k, &mut rng)?;
    let b = matrix::random(k, n, &mut rng)?;
    let mut c = matrix::random(m, n, &mut rng)?;

    let mut buffers = match &config.profile {
        Some(profile) => {
            let (_, num_buckets) = prof_size(profile.range_length, profile.scale, profile.bucket);
            if num_buckets == 0 {
                return Err(validation_error(
                    "profile geometry yields zero buckets; widen the range or raise the scale",
                ));
            }
            if profile.num_buffers == 0 {
                return Err(validation_error("at least one sample buffer is required"));
            }
            Some(SampleBuffers::new(
                profile.bucket,
                profile.num_buffers,
                num_buckets,
            ))
        }
        None => None,
    };

    counters.region_begin(REGION_NAME)?;
    if let Some(profile) = &config.profile {
        counters.start_sampling(&SamplingConfig {
            event: profile.event.clone(),
            start: profile.start,
            range_length: profile.range_length,
            scale: profile.scale,
            interval: profile.interval,
        })?;
    }

    let seconds = run_timed(m, n, k, config.repeats, &a, &b, &mut c);

    if let Some(buffers) = buffers.as_mut() {
        counters.stop_sampling(buffers)?;
    }
    counters.region_end(REGION_NAME)?;

    Ok(BenchResult {
        dim: config.dim,
        seconds,
        gflops: metrics::gflop_rate(m, n, k, config.repeats, seconds),
        gbs: metrics::bandwidth(m, n, k, config.repeats, seconds),
        profile: buffers,
    })
}
