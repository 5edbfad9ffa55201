//! S3 uploader with bucket-region discovery

use crate::{object_key, ObjectStore};
use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use tokio::runtime::Handle;

/// Region used for bucket-location lookups and for buckets without a
/// location constraint.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Uploads files to S3 from plain (non-async) worker threads.
///
/// Holds the shared AWS configuration and a handle to the runtime that drives
/// the SDK futures. `store` blocks the calling thread, so it must be called
/// from outside the runtime (e.g. a `std::thread` worker).
pub struct S3Uploader {
    sdk_config: SdkConfig,
    handle: Handle,
}

impl S3Uploader {
    /// Load AWS configuration from the environment and capture the current
    /// runtime handle.
    pub async fn new() -> Result<Self> {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Ok(Self {
            sdk_config,
            handle: Handle::current(),
        })
    }

    fn client_for(&self, region: &str) -> aws_sdk_s3::Client {
        let config = aws_sdk_s3::config::Builder::from(&self.sdk_config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_s3::Client::from_conf(config)
    }

    /// Resolve the region a bucket lives in.
    pub async fn bucket_region(&self, bucket: &str) -> Result<String> {
        let response = self
            .client_for(DEFAULT_REGION)
            .get_bucket_location()
            .bucket(bucket)
            .send()
            .await
            .with_context(|| format!("Failed to get bucket location: s3://{bucket}"))?;

        Ok(region_from_constraint(
            response.location_constraint().map(|c| c.as_str()),
        ))
    }

    /// Upload one file to `s3://{bucket}/{key}` in `region`.
    pub async fn upload(&self, region: &str, bucket: &str, key: &str, path: &Path) -> Result<()> {
        let body = ByteStream::from_path(path)
            .await
            .with_context(|| format!("Failed to open file: {}", path.display()))?;

        self.client_for(region)
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .with_context(|| format!("Failed to upload file to S3: s3://{bucket}/{key}"))?;

        Ok(())
    }
}

impl ObjectStore for S3Uploader {
    fn store(&self, bucket: &str, prefix: &str, local_path: &Path) -> Result<String> {
        let key = object_key(prefix, local_path)?;

        self.handle.block_on(async {
            let region = self
                .bucket_region(bucket)
                .await
                .context("Failed to determine bucket region")?;

            self.upload(&region, bucket, &key, local_path).await?;

            tracing::info!(
                bucket = %bucket,
                region = %region,
                key = %key,
                "Successfully uploaded file to S3"
            );
            Ok::<_, anyhow::Error>(())
        })?;

        Ok(key)
    }
}

/// Map a `GetBucketLocation` constraint to a region name.
///
/// Buckets in `us-east-1` report no constraint (or an empty one); very old
/// buckets in Ireland report the legacy `EU` value.
pub fn region_from_constraint(constraint: Option<&str>) -> String {
    match constraint {
        None | Some("") => DEFAULT_REGION.to_string(),
        Some("EU") => "eu-west-1".to_string(),
        Some(region) => region.to_string(),
    }
}
