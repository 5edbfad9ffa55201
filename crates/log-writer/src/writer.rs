//! Size-bounded stream writer.
//!
//! Drives a [`RecordSink`] until an estimate of the written size reaches a
//! target picked at random per file. The estimate is `entries *
//! approx_entry_size`; actual serialized bytes are never measured, so the
//! final file size only approximates the target.

use crate::error::{LimitsError, WriteError};
use crate::sink::RecordSink;
use cflog_generator::RecordSynthesizer;
use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use tracing::debug;

/// Smallest target size (10 KiB).
pub const MIN_FILE_SIZE: u64 = 10 * 1024;

/// Largest target size (2 MiB).
pub const MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;

/// Assumed serialized size of one entry.
pub const APPROX_ENTRY_SIZE: u64 = 250;

/// Target size range and the per-entry estimate used to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimits {
    pub min: u64,
    pub max: u64,
    pub approx_entry_size: u64,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min: MIN_FILE_SIZE,
            max: MAX_FILE_SIZE,
            approx_entry_size: APPROX_ENTRY_SIZE,
        }
    }
}

impl SizeLimits {
    pub fn validate(&self) -> Result<(), LimitsError> {
        if self.min == 0 {
            return Err(LimitsError::ZeroMinimum);
        }
        if self.min > self.max {
            return Err(LimitsError::InvertedRange {
                min: self.min,
                max: self.max,
            });
        }
        if self.approx_entry_size == 0 {
            return Err(LimitsError::ZeroEntrySize);
        }
        Ok(())
    }

    /// Pick a target size uniformly from `[min, max)` (or `min` when the
    /// range is empty).
    pub fn pick_target<R: Rng>(&self, rng: &mut R) -> u64 {
        if self.min >= self.max {
            self.min
        } else {
            rng.random_range(self.min..self.max)
        }
    }
}

/// Outcome of a completed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    /// Records written (always at least one).
    pub entries: u64,
    /// `entries * approx_entry_size`.
    pub estimated_size: u64,
    /// The randomly chosen target that ended the loop.
    pub target_size: u64,
}

/// Writes synthesized records until the size estimate reaches a target.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeBoundedWriter {
    limits: SizeLimits,
}

impl SizeBoundedWriter {
    pub fn new(limits: SizeLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &SizeLimits {
        &self.limits
    }

    /// Write records timestamped `start`, `start + 1s`, ... into `sink`, then
    /// finish it.
    ///
    /// The size check runs after each write, so at least one record is
    /// written and the estimate overshoots the target by less than one entry.
    /// On failure the error carries the entries already written; the sink is
    /// dropped, which closes its layers, and any partial file stays on disk.
    pub fn write<R: Rng>(
        &self,
        mut sink: Box<dyn RecordSink>,
        synthesizer: &mut RecordSynthesizer<R>,
        start: DateTime<Utc>,
    ) -> Result<WriteSummary, WriteError> {
        let target_size = self.limits.pick_target(synthesizer.rng_mut());
        let mut estimated_size = 0u64;
        let mut entries = 0u64;

        loop {
            let timestamp = start + TimeDelta::seconds(entries as i64);
            let record = synthesizer.synthesize(timestamp);
            sink.append(&record)
                .map_err(|source| WriteError { entries, source })?;

            estimated_size += self.limits.approx_entry_size;
            entries += 1;

            if entries % 10000 == 0 {
                debug!("Written {} entries", entries);
            }

            if estimated_size >= target_size {
                break;
            }
        }

        sink.finish()
            .map_err(|source| WriteError { entries, source })?;

        Ok(WriteSummary {
            entries,
            estimated_size,
            target_size,
        })
    }
}
