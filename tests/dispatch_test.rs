//! Worker pool tests against real files in a temporary directory.

use cflog_file::ObjectStore;
use cflog_generator::{LogRecord, FIELD_NAMES};
use cflog_writer::{OutputFile, OutputFormat, SizeLimits};
use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use cloudfront_log_generator::{Dispatcher, LogHandle, S3Destination, Settings};
use flate2::read::GzDecoder;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 12, 0, 0, 0).unwrap()
}

fn settings(dir: &Path, file_count: u64, worker_count: usize, format: OutputFormat) -> Settings {
    Settings {
        file_count,
        output_dir: dir.to_path_buf(),
        distribution_id: "E2KJXWL1EXAMPLE".to_string(),
        format,
        destination: None,
        worker_count,
        limits: SizeLimits {
            min: 2_000,
            max: 10_000,
            approx_entry_size: 250,
        },
        seed: Some(20241212),
    }
}

fn read_json_records(path: &Path) -> Vec<LogRecord> {
    BufReader::new(GzDecoder::new(File::open(path).unwrap()))
        .lines()
        .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
        .collect()
}

fn record_time(record: &LogRecord) -> DateTime<Utc> {
    let naive = NaiveDateTime::parse_from_str(
        &format!("{} {}", record.date, record.time),
        "%Y-%m-%d %H:%M:%S",
    )
    .unwrap();
    naive.and_utc()
}

fn file_contents(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            (
                entry.file_name().to_string_lossy().into_owned(),
                std::fs::read(entry.path()).unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_exact_file_count_for_pool_sizes() {
    for workers in [1, 4, 16] {
        let temp_dir = TempDir::new().unwrap();
        let report = Dispatcher::new(
            settings(temp_dir.path(), 10, workers, OutputFormat::JsonGz),
            LogHandle::none(),
        )
        .run(start());

        assert_eq!(report.totals.files, 10, "workers = {workers}");
        assert_eq!(report.totals.failed, 0);
        assert_eq!(report.files.len(), 10);
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 10);

        let entries: u64 = report.files.iter().map(|f| f.entries).sum();
        assert_eq!(report.totals.entries, entries);
    }
}

#[test]
fn test_seeded_output_is_independent_of_pool_size() {
    let single = TempDir::new().unwrap();
    let pooled = TempDir::new().unwrap();

    for format in OutputFormat::ALL {
        let single_dir = single.path().join(format.extension());
        let pooled_dir = pooled.path().join(format.extension());
        std::fs::create_dir_all(&single_dir).unwrap();
        std::fs::create_dir_all(&pooled_dir).unwrap();

        Dispatcher::new(settings(&single_dir, 6, 1, format), LogHandle::none()).run(start());
        Dispatcher::new(settings(&pooled_dir, 6, 4, format), LogHandle::none()).run(start());

        let expected = file_contents(&single_dir);
        assert_eq!(expected.len(), 6);
        assert_eq!(expected, file_contents(&pooled_dir));
    }
}

#[test]
fn test_records_follow_job_hours() {
    let temp_dir = TempDir::new().unwrap();
    let report = Dispatcher::new(
        settings(temp_dir.path(), 4, 4, OutputFormat::JsonGz),
        LogHandle::none(),
    )
    .run(start());

    // Names start with <dist>.<YYYY-MM-DD-HH>, so path order is job order
    for (ordinal, file) in report.files.iter().enumerate() {
        let job_start = start() + TimeDelta::hours(ordinal as i64);
        let name = file.file_name().unwrap();
        assert!(
            name.starts_with(&format!(
                "E2KJXWL1EXAMPLE.{}.",
                job_start.format("%Y-%m-%d-%H")
            )),
            "{name}"
        );

        let records = read_json_records(&file.path);
        assert!(!records.is_empty());
        assert_eq!(records.len() as u64, file.entries);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(
                record_time(record),
                job_start + TimeDelta::seconds(i as i64)
            );
        }
    }
}

#[test]
fn test_size_estimate_is_bounded() {
    let temp_dir = TempDir::new().unwrap();
    let settings = settings(temp_dir.path(), 8, 4, OutputFormat::JsonGz);
    let limits = settings.limits;
    let report = Dispatcher::new(settings, LogHandle::none()).run(start());

    for file in &report.files {
        assert!(file.entries >= 1);
        assert_eq!(file.estimated_size, file.entries * limits.approx_entry_size);
        assert!(file.estimated_size >= limits.min);
        assert!(file.estimated_size < limits.max + limits.approx_entry_size);
    }
}

#[test]
fn test_csv_tar_gz_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let report = Dispatcher::new(
        settings(temp_dir.path(), 2, 2, OutputFormat::CsvTarGz),
        LogHandle::none(),
    )
    .run(start());

    for file in &report.files {
        let mut archive = tar::Archive::new(GzDecoder::new(File::open(&file.path).unwrap()));
        let mut names = Vec::new();
        let mut document = String::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            names.push(entry.path().unwrap().to_string_lossy().into_owned());
            entry.read_to_string(&mut document).unwrap();
        }
        assert_eq!(names, vec!["E2KJXWL1EXAMPLE.csv".to_string()]);

        let mut reader = csv::Reader::from_reader(document.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), FIELD_NAMES.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len() as u64, file.entries);
        for row in &rows {
            assert_eq!(row.len(), FIELD_NAMES.len());
            assert!(row[3].parse::<i64>().is_ok());
            assert!(row[8].parse::<u16>().is_ok());
            assert!(row[18].parse::<f64>().is_ok());
        }
    }
}

#[derive(Default)]
struct RecordingStore {
    keys: Mutex<Vec<String>>,
}

impl ObjectStore for RecordingStore {
    fn store(&self, bucket: &str, prefix: &str, local_path: &Path) -> anyhow::Result<String> {
        assert_eq!(bucket, "my-log-bucket");
        assert!(local_path.exists());
        let key = cflog_file::object_key(prefix, local_path)?;
        self.keys.lock().unwrap().push(key.clone());
        Ok(key)
    }
}

struct FailingStore;

impl ObjectStore for FailingStore {
    fn store(&self, bucket: &str, _prefix: &str, _local_path: &Path) -> anyhow::Result<String> {
        anyhow::bail!("access denied: s3://{bucket}")
    }
}

fn with_destination(mut settings: Settings) -> Settings {
    settings.destination = Some(S3Destination {
        bucket: "my-log-bucket".to_string(),
        prefix: "cflog/20241212/".to_string(),
    });
    settings
}

fn file_names(files: &[OutputFile]) -> Vec<String> {
    files
        .iter()
        .map(|f| f.file_name().unwrap().to_string())
        .collect()
}

#[test]
fn test_every_file_is_uploaded_once() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(RecordingStore::default());
    let report = Dispatcher::new(
        with_destination(settings(temp_dir.path(), 5, 3, OutputFormat::CsvTarGz)),
        LogHandle::none(),
    )
    .with_store(store.clone())
    .run(start());

    assert_eq!(report.totals.uploaded, 5);
    assert_eq!(report.totals.upload_failed, 0);

    let mut keys = store.keys.lock().unwrap().clone();
    keys.sort();
    let expected: Vec<String> = file_names(&report.files)
        .into_iter()
        .map(|name| format!("cflog/20241212/{name}"))
        .collect();
    assert_eq!(keys, expected);
}

#[test]
fn test_upload_failure_keeps_local_files() {
    let temp_dir = TempDir::new().unwrap();
    let report = Dispatcher::new(
        with_destination(settings(temp_dir.path(), 3, 2, OutputFormat::JsonGz)),
        LogHandle::none(),
    )
    .with_store(Arc::new(FailingStore))
    .run(start());

    assert_eq!(report.totals.files, 3);
    assert_eq!(report.totals.uploaded, 0);
    assert_eq!(report.totals.upload_failed, 3);
    for file in &report.files {
        assert!(file.path.exists());
        assert!(!read_json_records(&file.path).is_empty());
    }
}

#[test]
fn test_unseeded_runs_produce_distinct_names() {
    let temp_dir = TempDir::new().unwrap();
    let mut settings = settings(temp_dir.path(), 3, 3, OutputFormat::JsonGz);
    settings.seed = None;

    let report = Dispatcher::new(settings, LogHandle::none()).run(start());

    let names: Vec<PathBuf> = report.files.iter().map(|f| f.path.clone()).collect();
    let mut unique = names.clone();
    unique.dedup();
    assert_eq!(names.len(), 3);
    assert_eq!(unique, names);
}
