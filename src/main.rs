//! Benchmark runner.
//!
//! Runs the naive triple-loop multiply on fixed problem sizes, prints one
//! fixed-width report row per run, and dumps the sampled instruction
//! histogram for the profiled run. Exits with status 1 on any fatal
//! allocation, validation or counter failure; an empty profile is surfaced
//! as a warning only.

use std::io::{self, Write};
use std::process;

use matbench::bench::{run, BenchConfig, ProfileConfig};
use matbench::counters::{NullCounters, SoftwareSampler};
use matbench::error::Result;
use matbench::metrics;
use matbench::profile::{self, BucketKind, FULL_SCALE};

/// Problem dimension for the plain timing run.
const DIM: usize = 400;

/// Problem dimension for the profiled run.
const DIM_PROFILED: usize = 100;

/// Kernel invocations per timed window.
const NREPEATS: usize = 50;

/// Seed for the pseudo-random matrix fills and the software sampler.
const SEED: u64 = 42;

/// Address range stood in for the profiled code region.
const TEXT_START: u64 = 0x400000;
const TEXT_LENGTH: u64 = 0x10000;

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err}");
        process::exit(1);
    }
}

fn try_main() -> Result<()> {
    println!("{}", metrics::HEADER);

    // Plain timing run.
    let config = BenchConfig {
        dim: DIM,
        repeats: NREPEATS,
        seed: SEED,
        profile: None,
    };
    let mut counters = NullCounters;
    let result = run(&config, &mut counters)?;
    println!(
        "{}",
        metrics::report_row(result.dim, result.seconds, result.gflops, result.gbs)
    );

    // Profiled run: smaller problem, sampling enabled.
    let profile_config = ProfileConfig {
        event: "fp-instructions".to_string(),
        start: TEXT_START,
        range_length: TEXT_LENGTH,
        scale: FULL_SCALE,
        interval: 1_000_000,
        num_buffers: 1,
        bucket: BucketKind::Bits16,
    };
    let config = BenchConfig {
        dim: DIM_PROFILED,
        repeats: NREPEATS,
        seed: SEED,
        profile: Some(profile_config.clone()),
    };
    let mut counters = SoftwareSampler::new(SEED, 256);
    let result = run(&config, &mut counters)?;
    println!(
        "{}",
        metrics::report_row(result.dim, result.seconds, result.gflops, result.gbs)
    );

    if let Some(buffers) = &result.profile {
        let (byte_length, num_buckets) = profile::prof_size(
            profile_config.range_length,
            profile_config.scale,
            profile_config.bucket,
        );

        let stdout = io::stdout();
        let mut out = stdout.lock();
        profile::prof_head(
            &mut out,
            byte_length,
            profile_config.bucket,
            num_buckets,
            "address\t\tcount",
        )?;
        buffers.dump(profile_config.start, profile_config.scale, &mut out)?;
        out.flush()?;

        if let Err(err) = profile::check(buffers) {
            eprintln!("warning: {err}");
        }
    }

    Ok(())
}
