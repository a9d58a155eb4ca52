use std::fmt;
use std::fmt::{Debug, Formatter};

use bytes::Bytes;
use zeroize_derive::{Zeroize, ZeroizeOnDrop};

pub mod error;
pub mod token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub endpoint_url: String,
    pub region: String,
    pub bucket: String,
    pub key: String,
}

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AccessKeys {
    pub access_key: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Debug for AccessKeys {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut keys = f.debug_struct("AccessKeys");
        let session_token = self
            .session_token
            .as_ref()
            .map_or("None", |_| "** redacted **");
        keys.field("access_key", &self.access_key)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &session_token);
        keys.finish()
    }
}

/// A contiguous byte range of the source file. `part_number` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub part_number: i32,
    pub data: Bytes,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartResult {
    pub part_number: i32,
    pub e_tag: String,
}

/// Server-side multipart upload state owned by this process between
/// initiation and completion (or abort).
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartSession {
    pub upload_id: String,
    pub target: UploadTarget,
    pub completed_parts: Vec<PartResult>,
}

impl MultipartSession {
    pub fn new(upload_id: &str, target: &UploadTarget) -> Self {
        MultipartSession {
            upload_id: upload_id.to_string(),
            target: target.clone(),
            completed_parts: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadReport {
    pub bucket: String,
    pub key: String,
    pub upload_id: Option<String>,
    pub parts_count: i64,
    pub content_length: u64,
    pub e_tag: Option<String>,
    pub e_tag_verified: Option<bool>,
}

impl UploadReport {
    pub fn has_warning(&self) -> bool {
        self.e_tag_verified == Some(false)
    }
}

pub fn calculate_parts_count(content_length: u64, chunksize: u64) -> i64 {
    if content_length == 0 {
        return 0;
    }

    if content_length % chunksize == 0 {
        return (content_length / chunksize) as i64;
    }

    ((content_length / chunksize) + 1) as i64
}

/// A completable part list is non-empty and numbered exactly `1..=N` in order.
pub fn is_valid_part_list(parts: &[PartResult]) -> bool {
    !parts.is_empty()
        && parts
            .iter()
            .enumerate()
            .all(|(index, part)| part.part_number == (index as i32) + 1)
}

pub fn sort_and_validate_parts(parts: &mut [PartResult]) -> bool {
    parts.sort_by_key(|part| part.part_number);

    is_valid_part_list(parts)
}
