/*!
# Overview
s3upload uploads a single local file to Amazon S3 or S3-compatible storage with multipart upload.

The file is split into fixed-size parts (50MiB by default). For each part, s3upload requests a
presigned `UploadPart` URL and sends the part with a plain HTTP PUT, so long-lived credentials never
travel with the part bodies. When all parts are acknowledged, the part list is committed and the
object becomes visible as a single object.

## Features
- Bounded parallel part upload
  Parts are read sequentially and uploaded by up to `--max-parallel-uploads` concurrent requests.
  The part list is always committed in ascending part-number order.

- Failure policy
  A failed part is retried (`--force-retry-count`). If the upload still fails, the multipart upload
  is aborted so that no incomplete parts keep consuming storage.
  With `--keep-incomplete-upload`, the multipart upload is left open and its upload id is logged.

- Integrity check
  s3upload calculates the ETag(MD5 of the part MD5s) while reading the file, and compares it with
  the ETag returned by the storage.

- Empty file
  A zero-byte file is uploaded with a single `PutObject` request.

## As a library
s3upload CLI is a very thin wrapper of the s3upload library.

Example usage
=============

```Toml
[dependencies]
s3upload = "0.1"
tokio = { version = "1", features = ["full"] }
```

```no_run
use std::sync::Arc;

use s3upload::config::Config;
use s3upload::config::args::parse_from_args;
use s3upload::storage::s3::S3Store;
use s3upload::types::token::create_upload_cancellation_token;
use s3upload::upload::UploadManager;

#[tokio::main]
async fn main() {
    // You can use all the arguments for s3upload CLI.
    let args = vec![
        "program_name",
        "--endpoint-url",
        "https://s3.us-east-1.amazonaws.com",
        "--region",
        "us-east-1",
        "--bucket",
        "test-bucket",
        "--access-key",
        "my_access_key",
        "--secret-access-key",
        "my_secret_access_key",
        "./Cargo.toml",
    ];

    let config = Config::try_from(parse_from_args(args).unwrap()).unwrap();

    let store = S3Store::create(&config.client_config, &config.transfer_config)
        .await
        .unwrap();

    // You can use this token to cancel the upload.
    let cancellation_token = create_upload_cancellation_token();
    let upload_manager = UploadManager::new(config, Arc::new(store), cancellation_token);

    match upload_manager.upload().await {
        Ok(report) => {
            println!("Upload complete: {report:?}");
            if report.has_warning() {
                println!("ETag mismatch. The object may be corrupted.");
            }
        }
        Err(e) => println!("Upload failed: {e:?}"),
    }
}
```
*/

pub use config::Config;
pub use config::args::CLIArgs;

pub mod config;
pub mod storage;
pub mod types;
pub mod upload;
