//! Command-line interface for cloudfront-log-generator
//!
//! # Usage Examples
//!
//! ```bash
//! # Ten hourly json.gz files under ./logs
//! cloudfront-log-generator
//!
//! # 24 csv.tar.gz files for a specific distribution, uploaded to S3
//! cloudfront-log-generator --files 24 --format csv.tar.gz \
//!   --dist E1ABCDEF123456 \
//!   --s3-bucket my-log-bucket --s3-path cflog/20241212
//!
//! # Reproducible output
//! cloudfront-log-generator --files 3 --seed 42 --output /tmp/cflog
//! ```

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use cloudfront_log_generator::{Dispatcher, GenerateArgs, LogHandle, Settings};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = GenerateArgs::parse();
    let log = LogHandle::init(args.log_format);

    let result = {
        let _default = tracing::dispatcher::set_default(log.dispatch());
        run(args, log.clone()).await
    };

    if let Err(e) = result {
        log.in_scope(|| tracing::error!(error = %format!("{e:#}"), "Run failed"));
        // Flush buffered log lines before exiting
        drop(log);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(args: GenerateArgs, log: LogHandle) -> anyhow::Result<()> {
    let settings = Settings::from_args(&args).context("Invalid configuration")?;

    let start = settings
        .start_time(Utc::now())
        .context("Invalid configuration")?;

    std::fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            settings.output_dir.display()
        )
    })?;

    tracing::info!(
        files = settings.file_count,
        workers = settings.worker_count,
        format = %settings.format,
        output = %settings.output_dir.display(),
        start = %start.to_rfc3339(),
        "Starting log generation"
    );

    let mut dispatcher = Dispatcher::new(settings.clone(), log);
    if let Some(destination) = &settings.destination {
        let uploader = cflog_file::S3Uploader::new()
            .await
            .context("Failed to load AWS configuration")?;
        tracing::info!(
            bucket = %destination.bucket,
            prefix = %destination.prefix,
            "Uploading generated files to S3"
        );
        dispatcher = dispatcher.with_store(Arc::new(uploader));
    }

    let report = tokio::task::spawn_blocking(move || dispatcher.run(start))
        .await
        .context("Worker pool terminated unexpectedly")?;

    tracing::info!(
        total_files = report.totals.files,
        total_entries = report.totals.entries,
        failed = report.totals.failed,
        uploaded = report.totals.uploaded,
        upload_failed = report.totals.upload_failed,
        location = %settings.output_dir.display(),
        format = %settings.format,
        "Generation complete"
    );

    Ok(())
}
