use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use tokio::sync::Semaphore;
use tracing::{error, info, trace, warn};

use crate::Config;
use crate::storage::Store;
use crate::storage::e_tag_verify::{ETagHasher, verify_e_tag};
use crate::storage::local::{ChunkReader, guess_content_type};
use crate::types::error::{S3uploadError, is_cancelled_error};
use crate::types::token::UploadCancellationToken;
use crate::types::{
    MultipartSession, PartResult, UploadReport, is_valid_part_list, sort_and_validate_parts,
};
use crate::upload::part_uploader::PartUploader;

#[cfg(test)]
mod fake_store;
mod part_uploader;

/// Drives one file through initiate, part upload and completion.
///
/// Any failure after initiation leaves a multipart session on the store. It
/// is aborted unless `keep_incomplete_upload` is set.
pub struct UploadManager {
    config: Config,
    store: Store,
    cancellation_token: UploadCancellationToken,
}

impl UploadManager {
    pub fn new(config: Config, store: Store, cancellation_token: UploadCancellationToken) -> Self {
        UploadManager {
            config,
            store,
            cancellation_token,
        }
    }

    pub async fn upload(&self) -> Result<UploadReport> {
        let start_time = Instant::now();

        let mut reader = ChunkReader::open(
            &self.config.path,
            self.config.transfer_config.multipart_chunksize,
        )
        .await
        .context("ChunkReader::open() failed.")?;

        let content_type = guess_content_type(
            &self.config.path,
            self.config.content_type.clone(),
            self.config.no_guess_mime_type,
        );

        let content_length = reader.content_length();
        info!(
            path = %self.config.path.display(),
            bucket = self.config.target.bucket.as_str(),
            key = self.config.target.key.as_str(),
            content_length = content_length,
            parts_count = reader.parts_count(),
            "upload started."
        );

        if content_length == 0 {
            drop(reader);
            return self.upload_empty_object(content_type, start_time).await;
        }

        let upload_id = self
            .begin_upload(content_type)
            .await
            .context("begin_upload() failed.")?;
        let mut session = MultipartSession::new(&upload_id, &self.config.target);

        let result = self
            .upload_parts_and_complete(&mut reader, &mut session)
            .await;
        drop(reader);

        match result {
            Ok((e_tag, expected_e_tag)) => {
                let report = self.build_report(
                    Some(session.upload_id.clone()),
                    session.completed_parts.len() as i64,
                    content_length,
                    e_tag,
                    expected_e_tag,
                );

                info!(
                    bucket = report.bucket.as_str(),
                    key = report.key.as_str(),
                    upload_id = session.upload_id.as_str(),
                    parts_count = report.parts_count,
                    e_tag = report.e_tag.as_deref(),
                    duration_sec = start_time.elapsed().as_secs_f32(),
                    "upload completed."
                );

                Ok(report)
            }
            Err(e) => {
                self.release_session(&session, &e).await;
                Err(e)
            }
        }
    }

    pub async fn begin_upload(&self, content_type: Option<String>) -> Result<String> {
        let upload_id = self
            .store
            .create_multipart_upload(
                &self.config.target.bucket,
                &self.config.target.key,
                content_type,
            )
            .await
            .context("create_multipart_upload() failed.")?;

        info!(
            bucket = self.config.target.bucket.as_str(),
            key = self.config.target.key.as_str(),
            upload_id = upload_id.as_str(),
            "multipart upload created."
        );

        Ok(upload_id)
    }

    /// Reads chunks sequentially and uploads up to `max_parallel_uploads` of
    /// them concurrently. The returned list is sorted and gap-free.
    pub async fn upload_parts(
        &self,
        reader: &mut ChunkReader,
        upload_id: &str,
        e_tag_hasher: &mut ETagHasher,
    ) -> Result<Vec<PartResult>> {
        let semaphore = Arc::new(Semaphore::new(
            self.config.transfer_config.max_parallel_uploads as usize,
        ));
        let part_cancellation_token = self.cancellation_token.child_token();
        let part_uploader = PartUploader::new(
            self.store.clone(),
            &self.config.target,
            upload_id,
            self.config.force_retry_config,
            part_cancellation_token.clone(),
        );

        let mut upload_handles = Vec::with_capacity(reader.parts_count() as usize);
        let mut read_error = None;
        loop {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .context("tokio::sync::Semaphore acquire_owned() failed.")?;
            if part_cancellation_token.is_cancelled() {
                break;
            }

            let chunk = match reader.next_chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => {
                    part_cancellation_token.cancel();
                    read_error = Some(e.context("ChunkReader::next_chunk() failed."));
                    break;
                }
            };

            if !self.config.disable_etag_verify {
                e_tag_hasher.update(&chunk.data);
            }

            let part_uploader = part_uploader.clone();
            let part_cancellation_token = part_cancellation_token.clone();
            upload_handles.push(tokio::spawn(async move {
                let result = part_uploader.upload_part_with_force_retry(chunk).await;
                if result.is_err() {
                    part_cancellation_token.cancel();
                }
                drop(permit);
                result
            }));
        }

        let mut part_results = Vec::with_capacity(upload_handles.len());
        let mut first_error: Option<anyhow::Error> = None;
        for upload_handle in upload_handles {
            let result = upload_handle
                .await
                .context("tokio::task::JoinHandle await failed.")
                .and_then(|result| result);

            match result {
                Ok(part_result) => part_results.push(part_result),
                Err(e) => {
                    let is_more_relevant = first_error.as_ref().is_none_or(|current| {
                        is_cancelled_error(current) && !is_cancelled_error(&e)
                    });
                    if is_more_relevant {
                        first_error = Some(e);
                    }
                }
            }
        }

        if self.cancellation_token.is_cancelled() {
            return Err(anyhow!(S3uploadError::Cancelled));
        }
        if let Some(e) = read_error.or(first_error) {
            return Err(e);
        }

        if !sort_and_validate_parts(&mut part_results) {
            return Err(anyhow!(S3uploadError::InvalidPartList));
        }

        trace!(upload_id = upload_id, "{part_results:?}");

        Ok(part_results)
    }

    /// Commits `session.completed_parts`, which must be exactly `1..=N` in order.
    pub async fn complete_upload(&self, session: &MultipartSession) -> Result<Option<String>> {
        if !is_valid_part_list(&session.completed_parts) {
            return Err(anyhow!(S3uploadError::InvalidPartList));
        }

        self.store
            .complete_multipart_upload(
                &session.target.bucket,
                &session.target.key,
                &session.upload_id,
                &session.completed_parts,
            )
            .await
            .context("complete_multipart_upload() failed.")
    }

    async fn upload_parts_and_complete(
        &self,
        reader: &mut ChunkReader,
        session: &mut MultipartSession,
    ) -> Result<(Option<String>, String)> {
        let mut e_tag_hasher = ETagHasher::new();
        session.completed_parts = self
            .upload_parts(reader, &session.upload_id, &mut e_tag_hasher)
            .await
            .context("upload_parts() failed.")?;

        if self.cancellation_token.is_cancelled() {
            return Err(anyhow!(S3uploadError::Cancelled));
        }

        let e_tag = self
            .complete_upload(session)
            .await
            .context("complete_upload() failed.")?;

        Ok((e_tag, e_tag_hasher.finish()))
    }

    async fn upload_empty_object(
        &self,
        content_type: Option<String>,
        start_time: Instant,
    ) -> Result<UploadReport> {
        let e_tag = self
            .store
            .put_empty_object(
                &self.config.target.bucket,
                &self.config.target.key,
                content_type,
            )
            .await
            .context("put_empty_object() failed.")?;

        let report = self.build_report(None, 0, 0, e_tag, ETagHasher::new().finish());

        info!(
            bucket = report.bucket.as_str(),
            key = report.key.as_str(),
            e_tag = report.e_tag.as_deref(),
            duration_sec = start_time.elapsed().as_secs_f32(),
            "empty object uploaded."
        );

        Ok(report)
    }

    async fn release_session(&self, session: &MultipartSession, e: &anyhow::Error) {
        if self.config.keep_incomplete_upload {
            warn!(
                bucket = session.target.bucket.as_str(),
                key = session.target.key.as_str(),
                upload_id = session.upload_id.as_str(),
                completed_parts = session.completed_parts.len(),
                "upload failed. the incomplete multipart upload is kept."
            );
            return;
        }

        if !is_cancelled_error(e) {
            error!(
                upload_id = session.upload_id.as_str(),
                error = format!("{e:#}"),
                "upload failed. aborting multipart upload."
            );
        }

        match self
            .store
            .abort_multipart_upload(
                &session.target.bucket,
                &session.target.key,
                &session.upload_id,
            )
            .await
        {
            Ok(()) => warn!(
                bucket = session.target.bucket.as_str(),
                key = session.target.key.as_str(),
                upload_id = session.upload_id.as_str(),
                "multipart upload has been aborted."
            ),
            Err(abort_error) => error!(
                upload_id = session.upload_id.as_str(),
                error = format!("{abort_error:#}"),
                "abort_multipart_upload() failed. the incomplete multipart upload remains."
            ),
        }
    }

    fn build_report(
        &self,
        upload_id: Option<String>,
        parts_count: i64,
        content_length: u64,
        e_tag: Option<String>,
        expected_e_tag: String,
    ) -> UploadReport {
        let e_tag_verified = if self.config.disable_etag_verify {
            None
        } else {
            verify_e_tag(&expected_e_tag, &e_tag)
        };

        if e_tag_verified == Some(false) {
            warn!(
                key = self.config.target.key.as_str(),
                source_e_tag = expected_e_tag.as_str(),
                target_e_tag = e_tag.as_deref(),
                "e_tag mismatch. object in the target storage may be corrupted."
            );
        }

        UploadReport {
            bucket: self.config.target.bucket.clone(),
            key: self.config.target.key.clone(),
            upload_id,
            parts_count,
            content_length,
            e_tag,
            e_tag_verified,
        }
    }
}
