//! Remote object store for generated log files.
//!
//! Generated files are shipped with a single blocking call:
//! `store(bucket, prefix, local_path)`. The call resolves the bucket's region,
//! then puts the file under `prefix/<file name>`. There is no retry and no
//! multipart upload; the local file is never touched.
//!
//! # Example
//!
//! ```ignore
//! use cflog_file::{ObjectStore, S3Uploader};
//!
//! // Inside a tokio runtime: capture the config and runtime handle
//! let uploader = S3Uploader::new().await?;
//!
//! // From a plain worker thread (not a runtime thread):
//! let key = uploader.store("my-bucket", "cflog/20241212", Path::new("logs/a.json.gz"))?;
//! ```

mod s3;

use anyhow::Result;
use std::path::Path;

pub use s3::{region_from_constraint, S3Uploader, DEFAULT_REGION};

/// A destination that accepts local files.
///
/// Implementations must be safe for concurrent independent calls.
pub trait ObjectStore: Send + Sync {
    /// Store `local_path` in `bucket` under `prefix`, returning the object key.
    fn store(&self, bucket: &str, prefix: &str, local_path: &Path) -> Result<String>;
}

/// Build the object key for `local_path` under `prefix`.
///
/// The prefix and the file name are joined by exactly one `/`; an empty prefix
/// yields the bare file name.
pub fn object_key(prefix: &str, local_path: &Path) -> Result<String> {
    let file_name = local_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Path has no file name: {}", local_path.display()))?;

    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        Ok(file_name.to_string())
    } else {
        Ok(format!("{prefix}/{file_name}"))
    }
}
