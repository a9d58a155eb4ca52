use std::path::PathBuf;
use std::time::Duration;

use crate::types::{AccessKeys, UploadTarget};

pub mod args;

#[derive(Debug, Clone)]
pub struct Config {
    pub path: PathBuf,
    pub target: UploadTarget,
    pub client_config: ClientConfig,
    pub transfer_config: TransferConfig,
    pub force_retry_config: ForceRetryConfig,
    pub tracing_config: Option<TracingConfig>,
    pub keep_incomplete_upload: bool,
    pub content_type: Option<String>,
    pub no_guess_mime_type: bool,
    pub disable_etag_verify: bool,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub access_keys: AccessKeys,
    pub region: String,
    pub endpoint_url: String,
    pub force_path_style: bool,
    pub retry_config: RetryConfig,
    pub cli_timeout_config: CLITimeoutConfig,
    pub disable_stalled_stream_protection: bool,
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub aws_max_attempts: u32,
    pub initial_backoff_milliseconds: u64,
}

#[derive(Debug, Clone)]
pub struct CLITimeoutConfig {
    pub operation_timeout_milliseconds: Option<u64>,
    pub operation_attempt_timeout_milliseconds: Option<u64>,
    pub connect_timeout_milliseconds: Option<u64>,
    pub read_timeout_milliseconds: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
pub struct TracingConfig {
    pub tracing_level: log::Level,
    pub json_tracing: bool,
    pub aws_sdk_tracing: bool,
    pub span_events_tracing: bool,
    pub disable_color_tracing: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ForceRetryConfig {
    pub force_retry_count: u32,
    pub force_retry_interval_milliseconds: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct TransferConfig {
    pub multipart_chunksize: u64,
    pub max_parallel_uploads: u16,
    pub presign_expires_in_seconds: u64,
    pub part_upload_timeout_milliseconds: u64,
}

impl TransferConfig {
    pub fn presign_expires_in(&self) -> Duration {
        Duration::from_secs(self.presign_expires_in_seconds)
    }

    pub fn part_upload_timeout(&self) -> Duration {
        Duration::from_millis(self.part_upload_timeout_milliseconds)
    }
}
