use std::io::Read;

use anyhow::{Context, Result, bail};
use s3::creds::Credentials;
use s3::{Bucket, Region};

use super::batch::push_batch;
use super::store::ObjectStore;
use super::{BatchReport, Remote, RemoteTask};
use crate::error::TransferError;

/// S3 transport: one bucket, keys addressed directly. Credentials and
/// region come from the standard AWS environment; the client's own retry
/// and timeout behavior is the only retry policy in play.
pub struct S3Remote {
    bucket: Box<Bucket>,
}

impl S3Remote {
    pub fn new(bucket_name: &str) -> Result<Self> {
        if bucket_name.is_empty() {
            bail!("s3 destination is missing a bucket name");
        }
        let creds = Credentials::default()
            .with_context(|| "loading AWS credentials from the environment")?;
        // OPUSH_S3_ENDPOINT switches to a custom endpoint (minio etc.) with
        // path-style addressing.
        let (region, path_style) = match std::env::var("OPUSH_S3_ENDPOINT") {
            Ok(endpoint) => {
                let name = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());
                (Region::Custom { region: name, endpoint }, true)
            }
            Err(_) => {
                let region = std::env::var("AWS_REGION")
                    .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(Region::UsEast1);
                (region, false)
            }
        };
        let bucket = Bucket::new(bucket_name, region, creds)
            .with_context(|| format!("creating s3 client for bucket '{}'", bucket_name))?;
        let bucket = if path_style { bucket.with_path_style() } else { bucket };
        Ok(Self { bucket })
    }
}

impl ObjectStore for S3Remote {
    fn put(
        &self,
        key: &str,
        mut body: &mut dyn Read,
        content_type: &str,
    ) -> Result<(), TransferError> {
        // stream straight from the reader; workers must not hold whole
        // files in memory
        let resp = self
            .bucket
            .put_object_stream_with_content_type(&mut body, key, content_type)
            .map_err(|e| TransferError::Upload(key.to_string(), e.to_string()))?;
        let code = resp;
        if !(200..300).contains(&code) {
            return Err(TransferError::Upload(
                key.to_string(),
                format!("unexpected status {}", code),
            ));
        }
        Ok(())
    }
}

impl Remote for S3Remote {
    fn push(&self, task: RemoteTask) -> Result<BatchReport> {
        Ok(push_batch(self, &task.pairs, task.concurrency))
    }
}
