use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use bytes::Bytes;

use crate::storage::MultipartStore;
use crate::storage::e_tag_verify::ETagHasher;
use crate::types::PartResult;
use crate::types::error::S3uploadError;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Create,
    Presign(i32),
    Put(i32),
    Complete,
    Abort,
    PutEmptyObject,
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub e_tag: String,
    pub content_type: Option<String>,
}

/// Rejects PUTs of one part number with `status` for the first `times` attempts.
#[derive(Debug, Clone, Copy)]
pub struct PartFailure {
    pub part_number: i32,
    pub status: u16,
    pub times: u32,
}

#[derive(Default)]
struct FakeState {
    next_upload_id: u32,
    uploads: HashMap<String, (String, String, Option<String>, HashMap<i32, (String, Bytes)>)>,
    objects: HashMap<(String, String), StoredObject>,
    calls: Vec<StoreCall>,
    put_attempts: HashMap<i32, u32>,
}

/// In-memory multipart store with the validation rules of the S3 API.
#[derive(Default)]
pub struct FakeStore {
    state: Mutex<FakeState>,
    part_failure: Option<PartFailure>,
    missing_e_tag_part_number: Option<i32>,
    corrupt_e_tag: bool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_part_failure(mut self, part_failure: PartFailure) -> Self {
        self.part_failure = Some(part_failure);
        self
    }

    /// Accepts the body of `part_number` but answers without an ETag.
    pub fn with_missing_e_tag(mut self, part_number: i32) -> Self {
        self.missing_e_tag_part_number = Some(part_number);
        self
    }

    pub fn with_corrupt_e_tag(mut self) -> Self {
        self.corrupt_e_tag = true;
        self
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.state
            .lock()
            .unwrap()
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn open_upload_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().uploads.keys().cloned().collect()
    }

    pub fn put_attempts(&self, part_number: i32) -> u32 {
        *self
            .state
            .lock()
            .unwrap()
            .put_attempts
            .get(&part_number)
            .unwrap_or(&0)
    }
}

#[async_trait]
impl MultipartStore for FakeStore {
    async fn create_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        content_type: Option<String>,
    ) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Create);

        state.next_upload_id += 1;
        let upload_id = format!("upload-{}", state.next_upload_id);
        state.uploads.insert(
            upload_id.clone(),
            (
                bucket.to_string(),
                key.to_string(),
                content_type,
                HashMap::new(),
            ),
        );

        Ok(upload_id)
    }

    async fn presign_upload_part(
        &self,
        _bucket: &str,
        _key: &str,
        upload_id: &str,
        part_number: i32,
    ) -> Result<String> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(StoreCall::Presign(part_number));

        Ok(format!("fake://{upload_id}/{part_number}"))
    }

    async fn put_presigned_part(&self, url: &str, part_number: i32, body: Bytes) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Put(part_number));

        let attempts = state.put_attempts.entry(part_number).or_insert(0);
        *attempts += 1;
        let attempts = *attempts;

        if let Some(part_failure) = self.part_failure {
            if part_failure.part_number == part_number && attempts <= part_failure.times {
                return Err(anyhow!(S3uploadError::PartTransferFailed {
                    part_number,
                    status: part_failure.status,
                }));
            }
        }

        let (upload_id, url_part_number) = url
            .strip_prefix("fake://")
            .and_then(|rest| rest.split_once('/'))
            .ok_or_else(|| anyhow!("invalid presigned url: {url}"))?;
        if url_part_number != part_number.to_string() {
            return Err(anyhow!(S3uploadError::PartTransferFailed {
                part_number,
                status: 403,
            }));
        }

        if self.missing_e_tag_part_number == Some(part_number) {
            return Err(anyhow!(S3uploadError::MissingEntityTag { part_number }));
        }

        let e_tag = format!("\"{:x}\"", md5::compute(&body));
        let upload = state.uploads.get_mut(upload_id).ok_or_else(|| {
            anyhow!(S3uploadError::PartTransferFailed {
                part_number,
                status: 404,
            })
        })?;
        upload.3.insert(part_number, (e_tag.clone(), body));

        Ok(e_tag)
    }

    async fn complete_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: &[PartResult],
    ) -> Result<Option<String>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Complete);

        let Some((_, _, content_type, stored_parts)) = state.uploads.get(upload_id) else {
            return Err(anyhow!("NoSuchUpload"));
        };

        if parts.is_empty() {
            return Err(anyhow!("MalformedXML"));
        }
        let mut previous_part_number = 0;
        let mut data = Vec::new();
        let mut e_tag_hasher = ETagHasher::new();
        for part in parts {
            if part.part_number <= previous_part_number {
                return Err(anyhow!("InvalidPartOrder"));
            }
            previous_part_number = part.part_number;

            match stored_parts.get(&part.part_number) {
                Some((e_tag, body)) if *e_tag == part.e_tag => {
                    data.extend_from_slice(body);
                    e_tag_hasher.update(body);
                }
                _ => return Err(anyhow!("InvalidPart")),
            }
        }

        let e_tag = if self.corrupt_e_tag {
            "\"00000000000000000000000000000000-1\"".to_string()
        } else {
            e_tag_hasher.finish()
        };
        let stored_object = StoredObject {
            data: Bytes::from(data),
            e_tag: e_tag.clone(),
            content_type: content_type.clone(),
        };
        state.uploads.remove(upload_id);
        state
            .objects
            .insert((bucket.to_string(), key.to_string()), stored_object);

        Ok(Some(e_tag))
    }

    async fn abort_multipart_upload(&self, _bucket: &str, _key: &str, upload_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Abort);

        state
            .uploads
            .remove(upload_id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("NoSuchUpload"))
    }

    async fn put_empty_object(
        &self,
        bucket: &str,
        key: &str,
        content_type: Option<String>,
    ) -> Result<Option<String>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::PutEmptyObject);

        let e_tag = ETagHasher::new().finish();
        state.objects.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data: Bytes::new(),
                e_tag: e_tag.clone(),
                content_type,
            },
        );

        Ok(Some(e_tag))
    }
}
