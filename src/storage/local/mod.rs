use std::path::Path;

use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::trace;

use crate::types::Chunk;
use crate::types::calculate_parts_count;
use crate::types::error::S3uploadError;

/// Reads a local file as consecutive, non-overlapping chunks of at most
/// `chunk_size` bytes. Every chunk but the last one is exactly `chunk_size`.
pub struct ChunkReader {
    file: Option<File>,
    content_length: u64,
    chunk_size: u64,
    next_part_number: i32,
}

impl ChunkReader {
    pub async fn open(path: &Path, chunk_size: u64) -> Result<Self> {
        let file = File::open(path).await.map_err(|e| {
            anyhow!(S3uploadError::SourceUnreadable(format!(
                "{}: {e}",
                path.display()
            )))
        })?;

        let metadata = file.metadata().await.map_err(|e| {
            anyhow!(S3uploadError::SourceUnreadable(format!(
                "{}: {e}",
                path.display()
            )))
        })?;
        if !metadata.is_file() {
            return Err(anyhow!(S3uploadError::SourceUnreadable(format!(
                "{}: not a regular file",
                path.display()
            ))));
        }

        Ok(ChunkReader {
            file: Some(file),
            content_length: metadata.len(),
            chunk_size,
            next_part_number: 1,
        })
    }

    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    pub fn parts_count(&self) -> i64 {
        calculate_parts_count(self.content_length, self.chunk_size)
    }

    /// Returns `None` once the end of the file is reached. The file handle is
    /// released at that point.
    pub async fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        let Some(mut file) = self.file.take() else {
            return Ok(None);
        };

        let mut buffer = vec![0u8; self.chunk_size as usize];
        let mut filled = 0;
        while filled < buffer.len() {
            let read_bytes = file
                .read(&mut buffer[filled..])
                .await
                .context("async_read_ext::AsyncReadExt read() failed.")?;
            if read_bytes == 0 {
                break;
            }
            filled += read_bytes;
        }

        // A short read means EOF, so the handle is kept only after a full chunk.
        if filled == buffer.len() {
            self.file = Some(file);
        }
        if filled == 0 {
            return Ok(None);
        }

        buffer.truncate(filled);
        let chunk = Chunk {
            part_number: self.next_part_number,
            data: Bytes::from(buffer),
        };
        self.next_part_number += 1;

        trace!(
            part_number = chunk.part_number,
            size = chunk.len(),
            "chunk read."
        );

        Ok(Some(chunk))
    }
}

pub fn guess_content_type(
    path: &Path,
    content_type: Option<String>,
    no_guess_mime_type: bool,
) -> Option<String> {
    if content_type.is_some() || no_guess_mime_type {
        return content_type;
    }

    Some(
        mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string(),
    )
}
