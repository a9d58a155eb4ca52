use std::sync::Arc;

use anyhow::Result;
use tokio::time::Instant;
use tracing::{error, info, trace, warn};

use s3upload::Config;
use s3upload::storage::s3::S3Store;
use s3upload::types::UploadReport;
use s3upload::types::error::is_cancelled_error;
use s3upload::types::token::{UploadCancellationToken, create_upload_cancellation_token};
use s3upload::upload::UploadManager;

mod ctrl_c_handler;

pub const EXIT_CODE_SUCCESS: i32 = 0;
pub const EXIT_CODE_ERROR: i32 = 1;
pub const EXIT_CODE_WARNING: i32 = 3;

/// Runs the upload and returns the process exit code. Invalid arguments never
/// get here, clap exits with 2 for them.
pub async fn run(config: Config) -> i32 {
    let cancellation_token = create_upload_cancellation_token();
    ctrl_c_handler::spawn_ctrl_c_handler(cancellation_token.clone());

    let start_time = Instant::now();
    trace!("upload start.");

    let result = upload(config, cancellation_token).await;

    let duration_sec = format!("{:.3}", start_time.elapsed().as_secs_f32());
    match &result {
        Ok(report) => show_upload_report(report, &duration_sec),
        Err(e) if is_cancelled_error(e) => {
            warn!(duration_sec = duration_sec, "s3upload has been cancelled.");
        }
        Err(e) => {
            error!(
                duration_sec = duration_sec,
                error = format!("{e:#}"),
                "s3upload failed."
            );
        }
    }

    exit_code(&result)
}

async fn upload(
    config: Config,
    cancellation_token: UploadCancellationToken,
) -> Result<UploadReport> {
    let store = S3Store::create(&config.client_config, &config.transfer_config).await?;

    UploadManager::new(config, Arc::new(store), cancellation_token)
        .upload()
        .await
}

fn exit_code(result: &Result<UploadReport>) -> i32 {
    match result {
        Ok(report) if report.has_warning() => EXIT_CODE_WARNING,
        Ok(_) => EXIT_CODE_SUCCESS,
        Err(_) => EXIT_CODE_ERROR,
    }
}

fn show_upload_report(report: &UploadReport, duration_sec: &str) {
    info!(
        bucket = report.bucket.as_str(),
        key = report.key.as_str(),
        upload_id = report.upload_id.as_deref(),
        parts_count = report.parts_count,
        content_length = report.content_length,
        e_tag = report.e_tag.as_deref(),
        e_tag_verified = report.e_tag_verified,
        duration_sec = duration_sec,
        "s3upload has been completed."
    );
}
