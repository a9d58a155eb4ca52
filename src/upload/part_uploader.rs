use anyhow::{Context, Result, anyhow};
use tracing::{debug, warn};

use crate::config::ForceRetryConfig;
use crate::storage::Store;
use crate::types::error::{S3uploadError, is_force_retryable_error};
use crate::types::token::UploadCancellationToken;
use crate::types::{Chunk, PartResult, UploadTarget};

/// Uploads single parts of one multipart session: presign, then PUT.
#[derive(Clone)]
pub struct PartUploader {
    store: Store,
    bucket: String,
    key: String,
    upload_id: String,
    force_retry_config: ForceRetryConfig,
    cancellation_token: UploadCancellationToken,
}

impl PartUploader {
    pub fn new(
        store: Store,
        target: &UploadTarget,
        upload_id: &str,
        force_retry_config: ForceRetryConfig,
        cancellation_token: UploadCancellationToken,
    ) -> Self {
        PartUploader {
            store,
            bucket: target.bucket.clone(),
            key: target.key.clone(),
            upload_id: upload_id.to_string(),
            force_retry_config,
            cancellation_token,
        }
    }

    pub async fn upload_part_with_force_retry(&self, chunk: Chunk) -> Result<PartResult> {
        let mut retry_count = 0;

        loop {
            if self.cancellation_token.is_cancelled() {
                return Err(anyhow!(S3uploadError::Cancelled));
            }

            let e = match self.upload_part(&chunk).await {
                Ok(part_result) => return Ok(part_result),
                Err(e) => e,
            };

            if !is_force_retryable_error(&e)
                || self.force_retry_config.force_retry_count <= retry_count
            {
                return Err(e);
            }
            retry_count += 1;

            warn!(
                key = self.key.as_str(),
                part_number = chunk.part_number,
                retry_count = retry_count,
                error = format!("{e:#}"),
                "force retryable error has occurred."
            );

            tokio::select! {
                _ = tokio::time::sleep(std::time::Duration::from_millis(
                    self.force_retry_config.force_retry_interval_milliseconds,
                )) => {},
                _ = self.cancellation_token.cancelled() => {
                    return Err(anyhow!(S3uploadError::Cancelled));
                }
            }
        }
    }

    async fn upload_part(&self, chunk: &Chunk) -> Result<PartResult> {
        let url = self
            .store
            .presign_upload_part(&self.bucket, &self.key, &self.upload_id, chunk.part_number)
            .await
            .context("presign_upload_part() failed.")?;

        let e_tag = self
            .store
            .put_presigned_part(&url, chunk.part_number, chunk.data.clone())
            .await
            .context("put_presigned_part() failed.")?;

        debug!(
            key = self.key.as_str(),
            part_number = chunk.part_number,
            size = chunk.len(),
            e_tag = e_tag.as_str(),
            "part uploaded."
        );

        Ok(PartResult {
            part_number: chunk.part_number,
            e_tag,
        })
    }
}
