use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum S3uploadError {
    #[error("cancelled")]
    Cancelled,
    #[error("the source file could not be read: {0}")]
    SourceUnreadable(String),
    #[error("create_multipart_upload() did not return an upload id.")]
    MissingUploadId,
    #[error("part {part_number} upload failed with HTTP status {status}.")]
    PartTransferFailed { part_number: i32, status: u16 },
    #[error("part {part_number} upload response has no ETag header.")]
    MissingEntityTag { part_number: i32 },
    #[error("part list must be non-empty and numbered 1..=N in ascending order.")]
    InvalidPartList,
}

pub fn is_cancelled_error(e: &anyhow::Error) -> bool {
    if let Some(err) = e.downcast_ref::<S3uploadError>() {
        return *err == S3uploadError::Cancelled;
    }

    false
}

/// Errors worth another attempt of the same part. Missing ETags and invalid
/// part lists are protocol violations that a retry does not fix.
pub fn is_force_retryable_error(e: &anyhow::Error) -> bool {
    match e.downcast_ref::<S3uploadError>() {
        Some(S3uploadError::PartTransferFailed { status, .. }) => {
            *status == 408 || *status == 429 || 500 <= *status
        }
        Some(_) => false,
        None => true,
    }
}
