use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use bytes::Bytes;
use reqwest::header::{CONTENT_LENGTH, ETAG};
use tracing::trace;

use crate::config::{ClientConfig, TransferConfig};
use crate::storage::MultipartStore;
use crate::types::PartResult;
use crate::types::error::S3uploadError;

mod client_builder;

/// S3 (or S3-compatible) backed store. Management calls go through the SDK
/// client, part bodies through a plain HTTP client against presigned URLs.
pub struct S3Store {
    client: Client,
    http_client: reqwest::Client,
    presign_expires_in: Duration,
}

impl S3Store {
    pub async fn create(
        client_config: &ClientConfig,
        transfer_config: &TransferConfig,
    ) -> Result<Self> {
        let http_client = client_config.create_http_client(transfer_config.part_upload_timeout())?;

        Ok(S3Store {
            client: client_config.create_client().await,
            http_client,
            presign_expires_in: transfer_config.presign_expires_in(),
        })
    }
}

#[async_trait]
impl MultipartStore for S3Store {
    async fn create_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        content_type: Option<String>,
    ) -> Result<String> {
        let create_multipart_upload_output = self
            .client
            .create_multipart_upload()
            .bucket(bucket)
            .key(key)
            .set_content_type(content_type)
            .send()
            .await
            .context("aws_sdk_s3::client::Client create_multipart_upload() failed.")?;

        trace!(key = key, "{create_multipart_upload_output:?}");

        create_multipart_upload_output
            .upload_id()
            .map(|upload_id| upload_id.to_string())
            .ok_or_else(|| anyhow!(S3uploadError::MissingUploadId))
    }

    async fn presign_upload_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: i32,
    ) -> Result<String> {
        let presigning_config = PresigningConfig::builder()
            .expires_in(self.presign_expires_in)
            .build()
            .context("PresigningConfig build() failed.")?;

        let presigned_request = self
            .client
            .upload_part()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .part_number(part_number)
            .presigned(presigning_config)
            .await
            .context("aws_sdk_s3::client::Client upload_part() presigned() failed.")?;

        Ok(presigned_request.uri().to_string())
    }

    async fn put_presigned_part(
        &self,
        url: &str,
        part_number: i32,
        body: Bytes,
    ) -> Result<String> {
        let response = self
            .http_client
            .put(url)
            .header(CONTENT_LENGTH, body.len())
            .body(body)
            .send()
            .await
            .context("reqwest::Client put() failed.")?;

        let status = response.status();
        if !status.is_success() {
            trace!(
                part_number = part_number,
                status = status.as_u16(),
                "{:?}",
                response.text().await.unwrap_or_default()
            );
            return Err(anyhow!(S3uploadError::PartTransferFailed {
                part_number,
                status: status.as_u16(),
            }));
        }

        response
            .headers()
            .get(ETAG)
            .and_then(|e_tag| e_tag.to_str().ok())
            .map(|e_tag| e_tag.to_string())
            .ok_or_else(|| anyhow!(S3uploadError::MissingEntityTag { part_number }))
    }

    async fn complete_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: &[PartResult],
    ) -> Result<Option<String>> {
        let completed_parts = parts
            .iter()
            .map(|part| {
                CompletedPart::builder()
                    .e_tag(&part.e_tag)
                    .part_number(part.part_number)
                    .build()
            })
            .collect();
        let completed_multipart_upload = CompletedMultipartUpload::builder()
            .set_parts(Some(completed_parts))
            .build();

        let complete_multipart_upload_output = self
            .client
            .complete_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(completed_multipart_upload)
            .send()
            .await
            .context("aws_sdk_s3::client::Client complete_multipart_upload() failed.")?;

        trace!(
            key = key,
            upload_id = upload_id,
            "{complete_multipart_upload_output:?}"
        );

        Ok(complete_multipart_upload_output
            .e_tag()
            .map(|e_tag| e_tag.to_string()))
    }

    async fn abort_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
    ) -> Result<()> {
        self.client
            .abort_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await
            .context("aws_sdk_s3::client::Client abort_multipart_upload() failed.")?;

        Ok(())
    }

    async fn put_empty_object(
        &self,
        bucket: &str,
        key: &str,
        content_type: Option<String>,
    ) -> Result<Option<String>> {
        let put_object_output = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .set_content_type(content_type)
            .content_length(0)
            .body(ByteStream::from_static(b""))
            .send()
            .await
            .context("aws_sdk_s3::client::Client put_object() failed.")?;

        trace!(key = key, "{put_object_output:?}");

        Ok(put_object_output.e_tag().map(|e_tag| e_tag.to_string()))
    }
}
