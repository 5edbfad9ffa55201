//! Size-bounded CloudFront log file writer.
//!
//! This crate turns a stream of synthesized [`cflog_generator::LogRecord`]s
//! into compressed log files of a randomized approximate size.
//!
//! One writer loop (size accounting, timestamp advancement, record synthesis)
//! drives a pluggable [`RecordSink`]:
//!
//! - `json.gz`: newline-delimited JSON in a gzip stream
//! - `csv.tar.gz`: one CSV document, archived with tar, then gzipped
//!
//! # Example
//!
//! ```ignore
//! use cflog_generator::RecordSynthesizer;
//! use cflog_writer::{generate_log_file, FileRequest, OutputFormat, SizeLimits};
//!
//! let request = FileRequest {
//!     distribution_id: "E2KJXWL1EXAMPLE",
//!     output_dir: Path::new("logs"),
//!     format: OutputFormat::JsonGz,
//!     start: Utc::now(),
//!     limits: SizeLimits::default(),
//! };
//! let output = generate_log_file(&request, &mut RecordSynthesizer::from_entropy())?;
//! println!("{} entries in {}", output.entries, output.path.display());
//! ```

pub mod error;
pub mod format;
pub mod job;
pub mod sink;
pub mod writer;

pub use error::{FormatError, GenerateError, LimitsError, SinkError, WriteError};
pub use format::{output_file_name, OutputFormat};
pub use job::{generate_log_file, FileRequest, GenerationJob, OutputFile};
pub use sink::{CsvTarGzSink, JsonGzSink, RecordSink};
pub use writer::{
    SizeBoundedWriter, SizeLimits, WriteSummary, APPROX_ENTRY_SIZE, MAX_FILE_SIZE, MIN_FILE_SIZE,
};
