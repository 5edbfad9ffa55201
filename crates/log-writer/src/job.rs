//! Per-file generation.

use crate::error::GenerateError;
use crate::format::{output_file_name, OutputFormat};
use crate::writer::{SizeBoundedWriter, SizeLimits};
use cflog_generator::RecordSynthesizer;
use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::info;

/// One unit of work: the ordinal of a file in the generated sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GenerationJob {
    pub ordinal: u64,
}

impl GenerationJob {
    pub fn new(ordinal: u64) -> Self {
        Self { ordinal }
    }

    /// Base timestamp of this job's file: `start` plus `ordinal` hours.
    pub fn timestamp(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        start + TimeDelta::hours(self.ordinal as i64)
    }
}

/// Everything needed to produce one log file.
#[derive(Debug, Clone, Copy)]
pub struct FileRequest<'a> {
    pub distribution_id: &'a str,
    pub output_dir: &'a Path,
    pub format: OutputFormat,
    /// Timestamp of the first record.
    pub start: DateTime<Utc>,
    pub limits: SizeLimits,
}

/// A completed log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    /// Records in the file.
    pub entries: u64,
    /// `entries * approx_entry_size`; not a measured byte count.
    pub estimated_size: u64,
    pub format: OutputFormat,
}

impl OutputFile {
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// Size of the compressed file on disk.
    pub fn actual_size(&self) -> std::io::Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }
}

/// Generate one log file under `request.output_dir`.
///
/// The file name and every record draw from `synthesizer`'s random source.
/// On error the partial file is left in place for the caller to handle.
pub fn generate_log_file<R: Rng>(
    request: &FileRequest<'_>,
    synthesizer: &mut RecordSynthesizer<R>,
) -> Result<OutputFile, GenerateError> {
    let file_name = output_file_name(
        request.distribution_id,
        request.start,
        request.format,
        synthesizer.rng_mut(),
    );
    let path = request.output_dir.join(&file_name);

    let sink = request
        .format
        .open_sink(&path, request.distribution_id, request.start)
        .map_err(|source| GenerateError::Create {
            path: path.clone(),
            source,
        })?;

    let summary = SizeBoundedWriter::new(request.limits)
        .write(sink, synthesizer, request.start)
        .map_err(|e| GenerateError::Write {
            path: path.clone(),
            entries: e.entries,
            source: e.source,
        })?;

    let output = OutputFile {
        path,
        entries: summary.entries,
        estimated_size: summary.estimated_size,
        format: request.format,
    };

    info!(
        file_name = %file_name,
        entries = output.entries,
        size = output.estimated_size,
        actual_size = output.actual_size().unwrap_or_default(),
        format = %request.format,
        "Generated log file"
    );

    Ok(output)
}
