//! Output formats and file naming.

use crate::error::{FormatError, SinkError};
use crate::sink::{CsvTarGzSink, JsonGzSink, RecordSink};
use cflog_generator::random_alphanumeric;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Length of the random component of an output file name.
const NAME_SUFFIX_LEN: usize = 8;

/// On-disk encoding of a generated log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Newline-delimited JSON, gzip-compressed.
    JsonGz,
    /// One CSV document in a tar archive, gzip-compressed.
    CsvTarGz,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::JsonGz, OutputFormat::CsvTarGz];

    /// The double extension appended to file names, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::JsonGz => "json.gz",
            OutputFormat::CsvTarGz => "csv.tar.gz",
        }
    }

    /// Open the container codec for this format at `path`.
    pub fn open_sink(
        &self,
        path: &Path,
        distribution_id: &str,
        start: DateTime<Utc>,
    ) -> Result<Box<dyn RecordSink>, SinkError> {
        Ok(match self {
            OutputFormat::JsonGz => Box::new(JsonGzSink::create(path)?),
            OutputFormat::CsvTarGz => Box::new(CsvTarGzSink::create(path, distribution_id, start)?),
        })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json.gz" | "structured-stream" => Ok(OutputFormat::JsonGz),
            "csv.tar.gz" | "tabular-archive" => Ok(OutputFormat::CsvTarGz),
            _ => Err(FormatError(s.to_string())),
        }
    }
}

/// Build `<distribution_id>.<YYYY-MM-DD-HH>.<8 random chars>.<ext>`.
pub fn output_file_name<R: Rng>(
    distribution_id: &str,
    timestamp: DateTime<Utc>,
    format: OutputFormat,
    rng: &mut R,
) -> String {
    format!(
        "{}.{}.{}.{}",
        distribution_id,
        timestamp.format("%Y-%m-%d-%H"),
        random_alphanumeric(rng, NAME_SUFFIX_LEN),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_canonical_names() {
        assert_eq!("json.gz".parse::<OutputFormat>(), Ok(OutputFormat::JsonGz));
        assert_eq!(
            "csv.tar.gz".parse::<OutputFormat>(),
            Ok(OutputFormat::CsvTarGz)
        );
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(
            "structured-stream".parse::<OutputFormat>(),
            Ok(OutputFormat::JsonGz)
        );
        assert_eq!(
            "tabular-archive".parse::<OutputFormat>(),
            Ok(OutputFormat::CsvTarGz)
        );
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        for name in ["JSON.GZ", "Csv.Tar.Gz", "Tabular-Archive", " json.gz"] {
            assert_eq!(
                name.parse::<OutputFormat>(),
                Err(FormatError(name.to_string()))
            );
        }
    }

    #[test]
    fn test_parse_unknown() {
        let err = "not-a-real-format".parse::<OutputFormat>().unwrap_err();
        assert_eq!(err, FormatError("not-a-real-format".to_string()));
        assert!(err.to_string().contains("not-a-real-format"));
    }

    #[test]
    fn test_display_round_trip() {
        for format in OutputFormat::ALL {
            assert_eq!(format.to_string().parse::<OutputFormat>(), Ok(format));
        }
    }

    #[test]
    fn test_output_file_name() {
        let mut rng = StdRng::seed_from_u64(42);
        let timestamp = Utc.with_ymd_and_hms(2024, 12, 12, 7, 45, 0).unwrap();

        let name = output_file_name(
            "E2KJXWL1EXAMPLE",
            timestamp,
            OutputFormat::CsvTarGz,
            &mut rng,
        );

        let rest = name
            .strip_prefix("E2KJXWL1EXAMPLE.2024-12-12-07.")
            .expect("name should start with distribution and hour");
        let random = rest
            .strip_suffix(".csv.tar.gz")
            .expect("name should end with the format extension");
        assert_eq!(random.len(), NAME_SUFFIX_LEN);
        assert!(random.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
