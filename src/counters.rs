//! Hardware performance-counter collaborator seam.
//!
//! The benchmark driver does not talk to a counter library directly; it
//! depends on the small [`Counters`] contract: bracket a named measurement
//! region around the timed loop, and optionally run statistical sampling of
//! a named event over an address range, depositing hits into a
//! [`SampleBuffers`] histogram. Any method failure is unrecoverable for the
//! run: the driver propagates the error and the binary prints it and exits
//! with status 1.
//!
//! Two implementations are provided: [`NullCounters`] for plain timing runs,
//! and [`SoftwareSampler`], a deterministic in-process stand-in that makes
//! the profiling path exercisable on machines without a hardware-counter
//! library.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{counter_error, Result};
use crate::profile::SampleBuffers;

/// Configuration for one statistical sampling session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingConfig {
    /// Name of the hardware event to sample (e.g. floating-point
    /// instructions retired).
    pub event: String,
    /// Start of the profiled address range.
    pub start: u64,
    /// Length of the profiled address range.
    pub range_length: u64,
    /// Fixed-point scale factor ([`crate::profile::FULL_SCALE`] = 1.0).
    pub scale: u32,
    /// Sampling interval in event counts.
    pub interval: u64,
}

/// Begin/end measurement regions and start/stop sampling.
///
/// The sampling mechanism conceptually runs asynchronously with respect to
/// the measured code; the driver only coordinates by bracketing
/// (start before the timed loop, stop after it) and reads the histogram
/// buffers strictly after [`Counters::stop_sampling`] returns.
pub trait Counters {
    /// Begins a named measurement region.
    fn region_begin(&mut self, name: &str) -> Result<()>;

    /// Ends a named measurement region.
    fn region_end(&mut self, name: &str) -> Result<()>;

    /// Arms statistical sampling with the given configuration.
    fn start_sampling(&mut self, config: &SamplingConfig) -> Result<()>;

    /// Disarms sampling and finalizes the histogram buffers.
    fn stop_sampling(&mut self, buffers: &mut SampleBuffers) -> Result<()>;
}

/// A counter implementation that does nothing.
///
/// Used for plain timing runs where no counter library is involved; every
/// operation succeeds and the histogram buffers are left untouched.
#[derive(Debug, Default)]
pub struct NullCounters;

impl Counters for NullCounters {
    fn region_begin(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn region_end(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn start_sampling(&mut self, _config: &SamplingConfig) -> Result<()> {
        Ok(())
    }

    fn stop_sampling(&mut self, _buffers: &mut SampleBuffers) -> Result<()> {
        Ok(())
    }
}

/// A deterministic software stand-in for an interrupt-driven sampler.
///
/// On [`Counters::stop_sampling`] it scatters a fixed number of synthetic
/// hits per sample buffer across the bucket range, driven by a seeded
/// generator, so the dump and check paths see realistic sparse histograms
/// and runs are reproducible.
#[derive(Debug)]
pub struct SoftwareSampler {
    seed: u64,
    hits_per_buffer: usize,
    active: Option<SamplingConfig>,
}

impl SoftwareSampler {
    /// Creates a sampler that deposits `hits_per_buffer` synthetic hits into
    /// each sample buffer, deterministically from `seed`.
    pub fn new(seed: u64, hits_per_buffer: usize) -> Self {
        SoftwareSampler {
            seed,
            hits_per_buffer,
            active: None,
        }
    }
}

impl Counters for SoftwareSampler {
    fn region_begin(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn region_end(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn start_sampling(&mut self, config: &SamplingConfig) -> Result<()> {
        if self.active.is_some() {
            return Err(counter_error("start_sampling", "sampling already active"));
        }
        if config.range_length == 0 {
            return Err(counter_error("start_sampling", "empty address range"));
        }
        if config.scale == 0 {
            return Err(counter_error("start_sampling", "scale must be non-zero"));
        }
        self.active = Some(config.clone());
        Ok(())
    }

    fn stop_sampling(&mut self, buffers: &mut SampleBuffers) -> Result<()> {
        let _config = self
            .active
            .take()
            .ok_or_else(|| counter_error("stop_sampling", "sampling was never started"))?;

        let num_buckets = buffers.num_buckets();
        if num_buckets == 0 {
            return Err(counter_error("stop_sampling", "histogram has no buckets"));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        for buffer in 0..buffers.num_buffers() {
            for _ in 0..self.hits_per_buffer {
                let bucket = rng.random_range(0..num_buckets);
                buffers.record(buffer, bucket);
            }
        }
        Ok(())
    }
}
