//! Concurrent job dispatch.
//!
//! Jobs `0..file_count` are pushed in order onto a bounded queue and pulled by
//! a fixed pool of worker threads. Each worker owns its own record synthesizer
//! and its own [`WorkerTotals`]; totals are summed after every worker has
//! joined. A failed job is logged and counted, never retried, and never stops
//! the other workers.

use crate::logging::LogHandle;
use crate::settings::Settings;
use cflog_file::ObjectStore;
use cflog_generator::RecordSynthesizer;
use cflog_writer::{generate_log_file, FileRequest, GenerationJob, OutputFile};
use chrono::{DateTime, Utc};
use crossbeam_channel::Receiver;
use std::ops::AddAssign;
use std::sync::Arc;
use tracing::{debug, error};

/// Counters kept by one worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerTotals {
    /// Files written successfully.
    pub files: u64,
    /// Records across successful files.
    pub entries: u64,
    /// Jobs that failed to produce a complete file.
    pub failed: u64,
    pub uploaded: u64,
    pub upload_failed: u64,
}

impl AddAssign for WorkerTotals {
    fn add_assign(&mut self, other: Self) {
        self.files += other.files;
        self.entries += other.entries;
        self.failed += other.failed;
        self.uploaded += other.uploaded;
        self.upload_failed += other.upload_failed;
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub totals: WorkerTotals,
    /// Successful files, sorted by path.
    pub files: Vec<OutputFile>,
}

/// Runs generation jobs on a worker pool.
pub struct Dispatcher {
    settings: Settings,
    log: LogHandle,
    store: Option<Arc<dyn ObjectStore>>,
}

impl Dispatcher {
    pub fn new(settings: Settings, log: LogHandle) -> Self {
        Self {
            settings,
            log,
            store: None,
        }
    }

    /// Upload every completed file through `store`. Uploads only happen when
    /// the settings also name a destination.
    pub fn with_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Generate every file, blocking until all workers finish.
    ///
    /// `start` is the timestamp of job 0; job `n` starts `n` hours later.
    pub fn run(&self, start: DateTime<Utc>) -> DispatchReport {
        self.log.in_scope(|| self.run_pool(start))
    }

    fn run_pool(&self, start: DateTime<Utc>) -> DispatchReport {
        let file_count = self.settings.file_count;
        let capacity = usize::try_from(file_count).unwrap_or(usize::MAX).max(1);
        let (sender, receiver) = crossbeam_channel::bounded::<GenerationJob>(capacity);

        debug!(
            file_count,
            workers = self.settings.worker_count,
            "Starting worker pool"
        );

        let mut report = DispatchReport::default();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..self.settings.worker_count)
                .map(|worker_id| {
                    let receiver = receiver.clone();
                    scope.spawn(move || self.log.in_scope(|| self.work(worker_id, receiver, start)))
                })
                .collect();
            drop(receiver);

            for ordinal in 0..file_count {
                if sender.send(GenerationJob::new(ordinal)).is_err() {
                    error!(ordinal, "All workers exited before the queue was drained");
                    break;
                }
            }
            drop(sender);

            for (worker_id, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok((totals, files)) => {
                        report.totals += totals;
                        report.files.extend(files);
                    }
                    Err(_) => error!(worker_id, "Worker panicked"),
                }
            }
        });

        report.files.sort_by(|a, b| a.path.cmp(&b.path));
        report
    }

    fn work(
        &self,
        worker_id: usize,
        jobs: Receiver<GenerationJob>,
        start: DateTime<Utc>,
    ) -> (WorkerTotals, Vec<OutputFile>) {
        let mut totals = WorkerTotals::default();
        let mut files = Vec::new();

        for job in jobs.iter() {
            debug!(worker_id, ordinal = job.ordinal, "Picked up job");

            let mut synthesizer = match self.settings.job_seed(job.ordinal) {
                Some(seed) => RecordSynthesizer::seeded(seed),
                None => RecordSynthesizer::from_entropy(),
            };
            let request = FileRequest {
                distribution_id: &self.settings.distribution_id,
                output_dir: &self.settings.output_dir,
                format: self.settings.format,
                start: job.timestamp(start),
                limits: self.settings.limits,
            };

            let output = match generate_log_file(&request, &mut synthesizer) {
                Ok(output) => output,
                Err(e) => {
                    error!(
                        ordinal = job.ordinal,
                        entries = e.entries(),
                        path = %e.path().display(),
                        error = %e,
                        "Error generating log file"
                    );
                    totals.failed += 1;
                    continue;
                }
            };

            totals.files += 1;
            totals.entries += output.entries;

            if let (Some(store), Some(destination)) = (&self.store, &self.settings.destination) {
                match store.store(&destination.bucket, &destination.prefix, &output.path) {
                    Ok(_) => totals.uploaded += 1,
                    Err(e) => {
                        let message = format!("{e:#}");
                        error!(
                            path = %output.path.display(),
                            bucket = %destination.bucket,
                            error = %message,
                            "Error uploading file to S3"
                        );
                        totals.upload_failed += 1;
                    }
                }
            }

            files.push(output);
        }

        debug!(worker_id, files = totals.files, "Worker finished");
        (totals, files)
    }
}
