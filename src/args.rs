//! CLI argument definitions.

use crate::logging::LogFormat;
use cflog_writer::{APPROX_ENTRY_SIZE, MAX_FILE_SIZE, MIN_FILE_SIZE};
use clap::Parser;
use std::path::PathBuf;

/// Generate synthetic CloudFront access-log files.
#[derive(Parser, Clone, Debug)]
#[command(name = "cloudfront-log-generator")]
#[command(
    about = "Generate synthetic CloudFront access-log files, optionally uploading them to S3"
)]
#[command(long_about = None)]
pub struct GenerateArgs {
    /// Number of log files to generate
    #[arg(long, default_value = "10", env = "CFLOG_FILES")]
    pub files: u64,

    /// Output directory for log files (created if absent)
    #[arg(long, default_value = "logs", env = "CFLOG_OUTPUT")]
    pub output: PathBuf,

    /// CloudFront distribution ID, used in file and archive entry names
    #[arg(long, default_value = "E2KJXWL1EXAMPLE", env = "CFLOG_DIST")]
    pub dist: String,

    /// Log file format: json.gz or csv.tar.gz
    #[arg(long, default_value = "json.gz", env = "CFLOG_FORMAT")]
    pub format: String,

    /// S3 bucket name to upload logs (empty = no upload)
    #[arg(long, default_value = "", env = "CFLOG_S3_BUCKET")]
    pub s3_bucket: String,

    /// S3 path (key prefix) where logs will be uploaded
    #[arg(long, default_value = "cflog/20241212", env = "CFLOG_S3_PATH")]
    pub s3_path: String,

    /// Number of concurrent generator workers
    #[arg(long, default_value = "4", env = "CFLOG_WORKERS")]
    pub workers: usize,

    /// Smallest target file size in bytes
    #[arg(long, default_value_t = MIN_FILE_SIZE)]
    pub min_size: u64,

    /// Largest target file size in bytes
    #[arg(long, default_value_t = MAX_FILE_SIZE)]
    pub max_size: u64,

    /// Assumed size of one log entry in bytes, used for size accounting
    #[arg(long, default_value_t = APPROX_ENTRY_SIZE)]
    pub entry_size: u64,

    /// Random seed for reproducible output (same seed = same files)
    #[arg(long, env = "CFLOG_SEED")]
    pub seed: Option<u64>,

    /// Process log output format
    #[arg(long, value_enum, default_value = "json", env = "CFLOG_LOG_FORMAT")]
    pub log_format: LogFormat,
}
