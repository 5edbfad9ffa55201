//! Synthetic CloudFront access-log records.
//!
//! This crate provides the `RecordSynthesizer` which produces one
//! [`LogRecord`] per call. Every field is either a fixed value or drawn from a
//! small bounded domain, so the output looks like real edge traffic without
//! needing a live source.
//!
//! # Architecture
//!
//! ```text
//!   timestamp
//!       │
//!       ▼
//! ┌───────────────────┐
//! │ RecordSynthesizer │
//! │                   │
//! │  - rng (StdRng)   │
//! └─────────┬─────────┘
//!           │
//!           ▼
//!     LogRecord { date, time, edge_location, ... }
//! ```
//!
//! # Example
//!
//! ```rust
//! use cflog_generator::RecordSynthesizer;
//! use chrono::{TimeZone, Utc};
//!
//! let mut synthesizer = RecordSynthesizer::seeded(42);
//! let timestamp = Utc.with_ymd_and_hms(2024, 12, 12, 8, 30, 0).unwrap();
//! let record = synthesizer.synthesize(timestamp);
//!
//! assert_eq!(record.date, "2024-12-12");
//! assert_eq!(record.time, "08:30:00");
//! ```

pub mod record;
pub mod synthesizer;

// Re-exports for convenience
pub use record::{LogRecord, FIELD_COUNT, FIELD_NAMES};
pub use synthesizer::{random_alphanumeric, random_ip, RecordSynthesizer};
