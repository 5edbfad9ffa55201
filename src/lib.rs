//! Synthetic CloudFront access-log generator.
//!
//! Produces a configurable number of compressed log files, one per simulated
//! hour, each filled with randomized CloudFront access-log records until an
//! approximate target size is reached. Files can optionally be uploaded to S3.
//!
//! ```text
//! GenerateArgs ──> Settings ──> Dispatcher ──> worker 0..N
//!                                   │              │
//!                              job queue     generate_log_file ──> ObjectStore
//! ```
//!
//! The record shape lives in `cflog-generator`, file writing in
//! `cflog-writer`, and the S3 uploader in `cflog-file`. This crate wires them
//! together behind the CLI.

pub mod args;
pub mod dispatch;
pub mod logging;
pub mod settings;

pub use args::GenerateArgs;
pub use dispatch::{DispatchReport, Dispatcher, WorkerTotals};
pub use logging::{LogFormat, LogHandle};
pub use settings::{S3Destination, Settings, SettingsError};
