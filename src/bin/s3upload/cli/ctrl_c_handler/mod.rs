use tokio::task::JoinHandle;
use tokio::{select, signal};
use tracing::{debug, error, warn};

use s3upload::types::token::UploadCancellationToken;

/// Cancels the upload on the first Ctrl-C. The task resolves to `true` if it
/// was a signal that cancelled the upload.
pub fn spawn_ctrl_c_handler(cancellation_token: UploadCancellationToken) -> JoinHandle<bool> {
    tokio::spawn(async move {
        select! {
            _ = cancellation_token.cancelled() => {
                debug!("upload cancellation token has been cancelled.");
                false
            }
            result = signal::ctrl_c() => {
                if let Err(e) = result {
                    error!(error = e.to_string(), "unable to listen for ctrl-c.");
                    return false;
                }

                warn!("ctrl-c received. the multipart upload will be released.");
                cancellation_token.cancel();
                true
            }
        }
    })
}
