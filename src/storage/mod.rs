use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use crate::types::PartResult;

pub mod e_tag_verify;
pub mod local;
pub mod s3;

pub type Store = Arc<dyn MultipartStore + Send + Sync>;

/// The subset of the S3 API that a presigned multipart upload needs.
///
/// Management calls (`create`, `complete`, `abort`, `put_empty_object`) are
/// signed requests. Part bodies are sent with a plain HTTP PUT to a presigned
/// URL, so no secret material travels with them.
#[async_trait]
pub trait MultipartStore: Send + Sync {
    async fn create_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        content_type: Option<String>,
    ) -> Result<String>;

    async fn presign_upload_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: i32,
    ) -> Result<String>;

    /// Returns the entity tag of the stored part.
    async fn put_presigned_part(&self, url: &str, part_number: i32, body: Bytes)
    -> Result<String>;

    async fn complete_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: &[PartResult],
    ) -> Result<Option<String>>;

    async fn abort_multipart_upload(&self, bucket: &str, key: &str, upload_id: &str)
    -> Result<()>;

    async fn put_empty_object(
        &self,
        bucket: &str,
        key: &str,
        content_type: Option<String>,
    ) -> Result<Option<String>>;
}
