//! Bucketed profile-buffer arithmetic.
//!
//! A statistical sampling profiler maps a linear address range onto a smaller
//! histogram of fixed-width counters ("buckets"). The mapping is controlled
//! by a 16-bit fixed-point scale factor where [`FULL_SCALE`] (65536)
//! represents 1.0; by convention there is one bucket per *two* addressable
//! units at full scale. Bucket counters come in 16-, 32- and 64-bit widths.
//!
//! All routines here take the buffers and their geometry as explicit
//! parameters; nothing is shared through globals. The three counter widths
//! share one generic implementation parameterized over the unsigned integer
//! type.

use std::fmt;
use std::io::{self, Write};

use num::PrimInt;

use crate::error::{empty_profile, validation_error, Result};

/// Value for the scale parameter that sets the scale to 1.
pub const FULL_SCALE: u32 = 65536;

/// Counter width of one histogram bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketKind {
    /// 16-bit counters.
    Bits16,
    /// 32-bit counters.
    Bits32,
    /// 64-bit counters.
    Bits64,
}

impl BucketKind {
    /// Returns the size of one bucket in bytes.
    pub fn width_bytes(self) -> usize {
        match self {
            BucketKind::Bits16 => std::mem::size_of::<u16>(),
            BucketKind::Bits32 => std::mem::size_of::<u32>(),
            BucketKind::Bits64 => std::mem::size_of::<u64>(),
        }
    }

    /// Returns the size of one bucket in bits.
    pub fn width_bits(self) -> usize {
        self.width_bytes() * 8
    }

    /// Maps a bit-width selector to a bucket kind.
    ///
    /// Anything other than 16, 32 or 64 is a caller error and surfaces as a
    /// [`crate::BenchError::ValidationError`].
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            16 => Ok(BucketKind::Bits16),
            32 => Ok(BucketKind::Bits32),
            64 => Ok(BucketKind::Bits64),
            _ => Err(validation_error(format!(
                "unrecognized bucket width: {} bits",
                bits
            ))),
        }
    }
}

/// Computes the profile-buffer geometry for an address range.
///
/// `range_length` is the length of the address range to be profiled and
/// `scale` the fixed-point fraction (`0xffff` ≈ 1, `0x8000` = 1/2,
/// `0x4000` = 1/4, ...). The number of buckets is
/// `range_length * scale / 65536 / 2` (floor), and the buffer length in
/// bytes is `buckets * bucket size`.
///
/// Returns `(byte_length, bucket_count)`.
pub fn prof_size(range_length: u64, scale: u32, kind: BucketKind) -> (u64, usize) {
    let scaled = (range_length as u128) * (scale as u128);
    let num_buckets = (scaled / FULL_SCALE as u128 / 2) as usize;
    let byte_length = (num_buckets as u64) * (kind.width_bytes() as u64);
    (byte_length, num_buckets)
}

/// Reconstructs the address covered by bucket `i` under a given scale.
#[inline]
pub fn bucket_address(start: u64, i: usize, scale: u32) -> u64 {
    start.wrapping_add(((i as u64) * (scale as u64)) >> 15)
}

/// A set of per-sample histogram buffers with a common geometry.
///
/// Each of the `n` sample buffers holds one counter per bucket; the counter
/// width is fixed at construction. The sampling mechanism writes the
/// counters during the timed region; the dump and check routines read them
/// only after sampling has stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleBuffers {
    /// Buffers of 16-bit counters.
    Bits16(Vec<Vec<u16>>),
    /// Buffers of 32-bit counters.
    Bits32(Vec<Vec<u32>>),
    /// Buffers of 64-bit counters.
    Bits64(Vec<Vec<u64>>),
}

impl SampleBuffers {
    /// Allocates `num_buffers` zeroed buffers of `num_buckets` counters each.
    pub fn new(kind: BucketKind, num_buffers: usize, num_buckets: usize) -> Self {
        match kind {
            BucketKind::Bits16 => SampleBuffers::Bits16(vec![vec![0u16; num_buckets]; num_buffers]),
            BucketKind::Bits32 => SampleBuffers::Bits32(vec![vec![0u32; num_buckets]; num_buffers]),
            BucketKind::Bits64 => SampleBuffers::Bits64(vec![vec![0u64; num_buckets]; num_buffers]),
        }
    }

    /// Returns the counter width of these buffers.
    pub fn kind(&self) -> BucketKind {
        match self {
            SampleBuffers::Bits16(_) => BucketKind::Bits16,
            SampleBuffers::Bits32(_) => BucketKind::Bits32,
            SampleBuffers::Bits64(_) => BucketKind::Bits64,
        }
    }

    /// Returns the number of sample buffers.
    pub fn num_buffers(&self) -> usize {
        match self {
            SampleBuffers::Bits16(b) => b.len(),
            SampleBuffers::Bits32(b) => b.len(),
            SampleBuffers::Bits64(b) => b.len(),
        }
    }

    /// Returns the number of buckets per buffer.
    pub fn num_buckets(&self) -> usize {
        match self {
            SampleBuffers::Bits16(b) => b.first().map_or(0, Vec::len),
            SampleBuffers::Bits32(b) => b.first().map_or(0, Vec::len),
            SampleBuffers::Bits64(b) => b.first().map_or(0, Vec::len),
        }
    }

    /// Increments the counter at `bucket` in sample buffer `buffer`,
    /// saturating at the counter width.
    pub fn record(&mut self, buffer: usize, bucket: usize) {
        match self {
            SampleBuffers::Bits16(b) => b[buffer][bucket] = b[buffer][bucket].saturating_add(1),
            SampleBuffers::Bits32(b) => b[buffer][bucket] = b[buffer][bucket].saturating_add(1),
            SampleBuffers::Bits64(b) => b[buffer][bucket] = b[buffer][bucket].saturating_add(1),
        }
    }

    /// Returns the counter at `bucket` in sample buffer `buffer`, widened
    /// to `u64`.
    pub fn count(&self, buffer: usize, bucket: usize) -> u64 {
        match self {
            SampleBuffers::Bits16(b) => b[buffer][bucket] as u64,
            SampleBuffers::Bits32(b) => b[buffer][bucket] as u64,
            SampleBuffers::Bits64(b) => b[buffer][bucket],
        }
    }

    /// Returns true iff at least one counter across all buffers and all
    /// bucket indices is non-zero. An all-zero profile after a sampling run
    /// usually indicates a profiling failure.
    pub fn any_nonzero(&self) -> bool {
        match self {
            SampleBuffers::Bits16(b) => any_nonzero_buffers(b),
            SampleBuffers::Bits32(b) => any_nonzero_buffers(b),
            SampleBuffers::Bits64(b) => any_nonzero_buffers(b),
        }
    }

    /// Writes the sparse histogram dump.
    ///
    /// For each bucket index the counter values of all sample buffers are
    /// OR-ed together; if the combined value is non-zero, one row is written
    /// with the reconstructed address `start + (i*scale)>>15` followed by
    /// each buffer's raw count, tab-separated. All-zero buckets produce no
    /// output, so the dump scales with the number of *hit* buckets rather
    /// than the total bucket count.
    pub fn dump<W: Write>(&self, start: u64, scale: u32, out: &mut W) -> io::Result<()> {
        match self {
            SampleBuffers::Bits16(b) => dump_buffers(b, start, scale, out)?,
            SampleBuffers::Bits32(b) => dump_buffers(b, start, scale, out)?,
            SampleBuffers::Bits64(b) => dump_buffers(b, start, scale, out)?,
        }
        writeln!(out, "{}\n", RULE)
    }
}

const RULE: &str = "------------------------------------------------------------";

/// Writes the standardized header block that precedes a histogram dump.
pub fn prof_head<W: Write>(
    out: &mut W,
    byte_length: u64,
    kind: BucketKind,
    num_buckets: usize,
    header: &str,
) -> io::Result<()> {
    writeln!(out, "\n{}", RULE)?;
    writeln!(out, "Sampling histogram, bucket size: {} bits.", kind.width_bits())?;
    writeln!(out, "Number of buckets: {}.", num_buckets)?;
    writeln!(out, "Length of buffer: {} bytes.", byte_length)?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "{}", header)
}

/// Returns an [`crate::BenchError::EmptyProfile`] if every counter in every
/// buffer is zero, i.e. the sampling configuration never fired.
pub fn check(buffers: &SampleBuffers) -> Result<()> {
    if buffers.any_nonzero() {
        Ok(())
    } else {
        Err(empty_profile(buffers.num_buffers(), buffers.num_buckets()))
    }
}

fn any_nonzero_buffers<T: PrimInt>(buffers: &[Vec<T>]) -> bool {
    buffers
        .iter()
        .any(|buf| buf.iter().any(|&v| v != T::zero()))
}

fn dump_buffers<T, W>(buffers: &[Vec<T>], start: u64, scale: u32, out: &mut W) -> io::Result<()>
where
    T: PrimInt + fmt::Display,
    W: Write,
{
    let num_buckets = buffers.first().map_or(0, Vec::len);
    for i in 0..num_buckets {
        let mut combined = T::zero();
        for buf in buffers {
            combined = combined | buf[i];
        }
        if combined != T::zero() {
            write!(out, "{:<#16x}", bucket_address(start, i, scale))?;
            for buf in buffers {
                write!(out, "\t{}", buf[i])?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_bytes() {
        assert_eq!(BucketKind::Bits16.width_bytes(), 2);
        assert_eq!(BucketKind::Bits32.width_bytes(), 4);
        assert_eq!(BucketKind::Bits64.width_bytes(), 8);
    }

    #[test]
    fn test_from_bits_rejects_unknown_widths() {
        assert!(BucketKind::from_bits(16).is_ok());
        assert!(BucketKind::from_bits(32).is_ok());
        assert!(BucketKind::from_bits(64).is_ok());
        assert!(BucketKind::from_bits(8).is_err());
        assert!(BucketKind::from_bits(0).is_err());
    }

    #[test]
    fn test_prof_size_full_scale() {
        // At full scale: one bucket per two addressable units.
        let (bytes, buckets) = prof_size(1000, FULL_SCALE, BucketKind::Bits16);
        assert_eq!(buckets, 500);
        assert_eq!(bytes, 1000);

        let (bytes, buckets) = prof_size(1000, FULL_SCALE, BucketKind::Bits32);
        assert_eq!(buckets, 500);
        assert_eq!(bytes, 2000);

        let (bytes, buckets) = prof_size(1000, FULL_SCALE, BucketKind::Bits64);
        assert_eq!(buckets, 500);
        assert_eq!(bytes, 4000);
    }

    #[test]
    fn test_prof_size_half_scale_and_floor() {
        let (_, buckets) = prof_size(1000, 0x8000, BucketKind::Bits16);
        assert_eq!(buckets, 250);

        // Odd range length floors.
        let (_, buckets) = prof_size(1001, FULL_SCALE, BucketKind::Bits16);
        assert_eq!(buckets, 500);
    }

    #[test]
    fn test_bucket_address_reconstruction() {
        // At full scale each bucket covers two addresses.
        assert_eq!(bucket_address(0x1000, 0, FULL_SCALE), 0x1000);
        assert_eq!(bucket_address(0x1000, 1, FULL_SCALE), 0x1002);
        assert_eq!(bucket_address(0x1000, 7, FULL_SCALE), 0x100e);

        // At half scale each bucket covers four.
        assert_eq!(bucket_address(0x1000, 1, 0x8000), 0x1001);
    }

    #[test]
    fn test_any_nonzero_on_all_zero_buffers() {
        for kind in [BucketKind::Bits16, BucketKind::Bits32, BucketKind::Bits64] {
            let buffers = SampleBuffers::new(kind, 3, 64);
            assert!(!buffers.any_nonzero());
            assert!(check(&buffers).is_err());
        }
    }

    #[test]
    fn test_any_nonzero_on_single_hit() {
        let mut buffers = SampleBuffers::new(BucketKind::Bits32, 2, 64);
        buffers.record(1, 63);
        assert!(buffers.any_nonzero());
        assert!(check(&buffers).is_ok());
        assert_eq!(buffers.count(1, 63), 1);
        assert_eq!(buffers.count(0, 63), 0);
    }

    #[test]
    fn test_record_saturates_at_counter_width() {
        let mut buffers = SampleBuffers::new(BucketKind::Bits16, 1, 1);
        for _ in 0..=u16::MAX as u32 + 10 {
            buffers.record(0, 0);
        }
        assert_eq!(buffers.count(0, 0), u16::MAX as u64);
    }

    #[test]
    fn test_dump_of_all_zero_histogram_has_no_rows() {
        let buffers = SampleBuffers::new(BucketKind::Bits16, 2, 128);
        let mut out = Vec::new();
        buffers.dump(0x400000, FULL_SCALE, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        // Only the trailing rule, no address rows.
        assert!(!text.contains('\t'));
        assert!(text.contains(RULE));
    }

    #[test]
    fn test_dump_single_hit_row() {
        let mut buffers = SampleBuffers::new(BucketKind::Bits16, 2, 128);
        buffers.record(0, 5);
        let mut out = Vec::new();
        buffers.dump(0x400000, FULL_SCALE, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let rows: Vec<&str> = text.lines().filter(|l| l.contains('\t')).collect();
        assert_eq!(rows.len(), 1);

        // Address is base + (5 * 65536) >> 15 = base + 10, with one raw
        // count per sample buffer.
        let expected_addr = 0x400000u64 + 10;
        assert!(rows[0].starts_with(&format!("{:<#16x}", expected_addr)));
        assert!(rows[0].ends_with("\t1\t0"));
    }

    #[test]
    fn test_dump_ors_across_sample_buffers() {
        // A bucket hit only in the second buffer must still produce a row.
        let mut buffers = SampleBuffers::new(BucketKind::Bits64, 3, 16);
        buffers.record(2, 4);
        let mut out = Vec::new();
        buffers.dump(0, FULL_SCALE, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let rows: Vec<&str> = text.lines().filter(|l| l.contains('\t')).collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].ends_with("\t0\t0\t1"));
    }

    #[test]
    fn test_prof_head_contents() {
        let mut out = Vec::new();
        prof_head(&mut out, 1024, BucketKind::Bits16, 512, "address\t\tcount").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("bucket size: 16 bits"));
        assert!(text.contains("Number of buckets: 512."));
        assert!(text.contains("Length of buffer: 1024 bytes."));
        assert!(text.contains("address\t\tcount"));
    }
}
