//! Validated run configuration.

use crate::args::GenerateArgs;
use cflog_writer::{FormatError, LimitsError, OutputFormat, SizeLimits};
use chrono::{DateTime, TimeDelta, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors. All of them are fatal and raised before any file is
/// created.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Limits(#[from] LimitsError),

    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("distribution ID must not be empty")]
    EmptyDistribution,

    #[error("file count {0} spans more hours than a timestamp can hold")]
    FileCountOutOfRange(u64),
}

/// Where completed files are uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Destination {
    pub bucket: String,
    pub prefix: String,
}

/// Plain-value configuration consumed by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub file_count: u64,
    pub output_dir: PathBuf,
    pub distribution_id: String,
    pub format: OutputFormat,
    /// `None` when no bucket is configured; nothing is uploaded.
    pub destination: Option<S3Destination>,
    pub worker_count: usize,
    pub limits: SizeLimits,
    /// Per-job seeds are derived from this when set.
    pub seed: Option<u64>,
}

impl Settings {
    /// Validate CLI arguments.
    pub fn from_args(args: &GenerateArgs) -> Result<Self, SettingsError> {
        let format: OutputFormat = args.format.parse()?;

        let limits = SizeLimits {
            min: args.min_size,
            max: args.max_size,
            approx_entry_size: args.entry_size,
        };
        limits.validate()?;

        if args.workers == 0 {
            return Err(SettingsError::NoWorkers);
        }
        if args.dist.trim().is_empty() {
            return Err(SettingsError::EmptyDistribution);
        }
        file_count_span(args.files)?;

        let destination = if args.s3_bucket.is_empty() {
            None
        } else {
            Some(S3Destination {
                bucket: args.s3_bucket.clone(),
                prefix: args.s3_path.clone(),
            })
        };

        Ok(Self {
            file_count: args.files,
            output_dir: args.output.clone(),
            distribution_id: args.dist.clone(),
            format,
            destination,
            worker_count: args.workers,
            limits,
            seed: args.seed,
        })
    }

    /// Start of the generated time range: `now` minus one hour per file, so
    /// the last file falls in the current hour.
    pub fn start_time(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, SettingsError> {
        let now = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);
        now.checked_sub_signed(file_count_span(self.file_count)?)
            .ok_or(SettingsError::FileCountOutOfRange(self.file_count))
    }

    /// Seed for job `ordinal`, if the run is seeded.
    pub fn job_seed(&self, ordinal: u64) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(ordinal))
    }
}

/// One hour per file.
fn file_count_span(file_count: u64) -> Result<TimeDelta, SettingsError> {
    i64::try_from(file_count)
        .ok()
        .and_then(TimeDelta::try_hours)
        .ok_or(SettingsError::FileCountOutOfRange(file_count))
}
