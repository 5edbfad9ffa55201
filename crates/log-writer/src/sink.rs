//! Container codecs.
//!
//! A [`RecordSink`] frames records into one on-disk encoding. The two
//! variants share nothing but the trait:
//!
//! - [`JsonGzSink`]: `File -> BufWriter -> GzEncoder`, one JSON object per
//!   line, streamed as records arrive.
//! - [`CsvTarGzSink`]: records buffered as one in-memory CSV document, which
//!   `finish` stores as the single entry of a tar archive inside
//!   `GzEncoder -> BufWriter -> File`.
//!
//! `finish` closes layers in reverse order of opening. If a sink is dropped
//! without `finish` (an error path), the owned layers still close on drop,
//! which writes the tar and gzip trailers and flushes the buffered bytes.

use crate::error::SinkError;
use cflog_generator::{LogRecord, FIELD_NAMES};
use chrono::{DateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Default buffer size for file writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Permission bits of the CSV entry inside the tar archive.
const ENTRY_MODE: u32 = 0o600;

/// Serialization strategy driven by the size-bounded writer.
pub trait RecordSink {
    /// Frame and write one record.
    fn append(&mut self, record: &LogRecord) -> Result<(), SinkError>;

    /// Finalize the container and close every layer.
    fn finish(self: Box<Self>) -> Result<(), SinkError>;
}

/// Newline-delimited JSON inside a gzip stream.
pub struct JsonGzSink {
    encoder: GzEncoder<BufWriter<File>>,
}

impl JsonGzSink {
    /// Create the destination file and open the gzip stream over it.
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path)?;
        let buffered = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let encoder = GzEncoder::new(buffered, Compression::default());
        Ok(Self { encoder })
    }
}

impl RecordSink for JsonGzSink {
    fn append(&mut self, record: &LogRecord) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.encoder, record)?;
        self.encoder.write_all(b"\n")?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<(), SinkError> {
        let buffered = self.encoder.finish()?;
        let file = buffered.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        Ok(())
    }
}

/// One CSV document stored as the single entry of a gzipped tar archive.
///
/// Rows are buffered in memory until `finish`. A sink dropped before
/// `finish` discards the buffered document and leaves a valid but empty
/// archive (tar trailer only) on disk.
pub struct CsvTarGzSink {
    csv: csv::Writer<Vec<u8>>,
    archive: tar::Builder<GzEncoder<BufWriter<File>>>,
    entry_name: String,
    mtime: u64,
}

impl CsvTarGzSink {
    /// Create the destination file, open the gzip and tar layers, and write
    /// the CSV header row into the in-memory document.
    ///
    /// The archive entry is named `<distribution_id>.csv` and stamped with
    /// `start` as its modification time.
    pub fn create(
        path: &Path,
        distribution_id: &str,
        start: DateTime<Utc>,
    ) -> Result<Self, SinkError> {
        let file = File::create(path)?;
        let buffered = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let encoder = GzEncoder::new(buffered, Compression::default());
        let archive = tar::Builder::new(encoder);

        let mut csv = csv::Writer::from_writer(Vec::new());
        csv.write_record(FIELD_NAMES)?;

        Ok(Self {
            csv,
            archive,
            entry_name: entry_name(distribution_id),
            mtime: u64::try_from(start.timestamp()).unwrap_or(0),
        })
    }
}

impl RecordSink for CsvTarGzSink {
    fn append(&mut self, record: &LogRecord) -> Result<(), SinkError> {
        self.csv.write_record(record.to_row())?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<(), SinkError> {
        let CsvTarGzSink {
            mut csv,
            mut archive,
            entry_name,
            mtime,
        } = *self;

        csv.flush()?;
        let document = csv
            .into_inner()
            .map_err(|e| SinkError::Io(std::io::Error::other(e.to_string())))?;

        let mut header = tar::Header::new_ustar();
        header.set_size(document.len() as u64);
        header.set_mode(ENTRY_MODE);
        header.set_mtime(mtime);
        header.set_entry_type(tar::EntryType::Regular);
        archive.append_data(&mut header, &entry_name, document.as_slice())?;

        let encoder = archive.into_inner()?;
        let buffered = encoder.finish()?;
        let file = buffered.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        Ok(())
    }
}

/// Name of the CSV entry inside the archive.
pub fn entry_name(distribution_id: &str) -> String {
    format!("{distribution_id}.csv")
}
