use crate::Config;
use crate::config::args::value_parser::{file_exist, human_bytes, url};
use crate::config::{
    CLITimeoutConfig, ClientConfig, ForceRetryConfig, RetryConfig, TracingConfig, TransferConfig,
};
use crate::types::{AccessKeys, UploadTarget};
use clap::Parser;
use clap::builder::NonEmptyStringValueParser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
#[cfg(feature = "version")]
use shadow_rs::shadow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::str::FromStr;

mod tests;
mod value_parser;

const DEFAULT_AWS_MAX_ATTEMPTS: u32 = 10;
const DEFAULT_INITIAL_BACKOFF_MILLISECONDS: u64 = 100;
const DEFAULT_FORCE_RETRY_COUNT: u32 = 5;
const DEFAULT_FORCE_RETRY_INTERVAL_MILLISECONDS: u64 = 1000;
const DEFAULT_JSON_TRACING: bool = false;
const DEFAULT_AWS_SDK_TRACING: bool = false;
const DEFAULT_SPAN_EVENTS_TRACING: bool = false;
const DEFAULT_DISABLE_COLOR_TRACING: bool = false;
const DEFAULT_MULTIPART_CHUNKSIZE: &str = "50MiB";
const DEFAULT_MAX_PARALLEL_UPLOADS: u16 = 4;
const DEFAULT_PRESIGN_EXPIRES_IN_SECONDS: u64 = 3600;
const DEFAULT_PART_UPLOAD_TIMEOUT_MILLISECONDS: u64 = 600_000;
const DEFAULT_FORCE_PATH_STYLE: bool = false;
const DEFAULT_KEEP_INCOMPLETE_UPLOAD: bool = false;
const DEFAULT_NO_GUESS_MIME_TYPE: bool = false;
const DEFAULT_DISABLE_ETAG_VERIFY: bool = false;
const DEFAULT_DISABLE_STALLED_STREAM_PROTECTION: bool = false;

const MISSING_CREDENTIALS: &str = "Please set the S3_KEY and S3_SECRET environment variables.\n";
const NO_PATH_SPECIFIED: &str = "PATH must be specified\n";
const NO_ENDPOINT_URL_SPECIFIED: &str = "--endpoint-url must be specified\n";
const NO_REGION_SPECIFIED: &str = "--region must be specified\n";
const NO_BUCKET_SPECIFIED: &str = "--bucket must be specified\n";
const NO_FILE_NAME_IN_PATH: &str = "PATH has no file name. specify --object-key\n";
const NON_UTF8_FILE_NAME: &str = "file name of PATH is not valid UTF-8. specify --object-key\n";

#[cfg(feature = "version")]
shadow!(build);

#[derive(Parser, Clone, Debug)]
#[cfg_attr(feature = "version", command(version=format!("{} ({} {}), {}", build::PKG_VERSION, build::SHORT_COMMIT, build::BUILD_TARGET, build::RUST_VERSION)))]
pub struct CLIArgs {
    #[arg(help = "path to the local file to upload", value_parser = file_exist::is_file_exist, required_unless_present = "auto_complete_shell")]
    path: Option<String>,

    /// access key
    #[arg(long, env = "S3_KEY", help_heading = "AWS Configuration")]
    access_key: Option<String>,

    /// secret access key
    #[arg(long, env = "S3_SECRET", hide_env_values = true, help_heading = "AWS Configuration")]
    secret_access_key: Option<String>,

    /// session token
    #[arg(long, env = "S3_SESSION_TOKEN", hide_env_values = true, help_heading = "AWS Configuration")]
    session_token: Option<String>,

    /// endpoint to connect to. e.g. https://s3.us-east-1.example.com
    #[arg(long, env, value_parser = url::check_scheme, required_unless_present = "auto_complete_shell", help_heading = "Target Options")]
    endpoint_url: Option<String>,

    /// region of the bucket. e.g. us-east-1
    #[arg(long, env, value_parser = NonEmptyStringValueParser::new(), required_unless_present = "auto_complete_shell", help_heading = "Target Options")]
    region: Option<String>,

    /// target bucket name
    #[arg(long, env, value_parser = NonEmptyStringValueParser::new(), required_unless_present = "auto_complete_shell", help_heading = "Target Options")]
    bucket: Option<String>,

    /// object key of the uploaded object. the file name of PATH is used if not given
    #[arg(long, env, value_parser = NonEmptyStringValueParser::new(), help_heading = "Target Options")]
    object_key: Option<String>,

    /// force path-style addressing for the endpoint
    #[arg(long, env, default_value_t = DEFAULT_FORCE_PATH_STYLE, help_heading = "Target Options")]
    force_path_style: bool,

    /// part size that s3upload uses for multipart upload, Allow suffixes: MB, MiB, GB, GiB.
    /// the larger the size, the larger the memory usage.
    #[arg(long, env, default_value = DEFAULT_MULTIPART_CHUNKSIZE, value_parser = human_bytes::check_human_bytes, help_heading = "Multipart Settings")]
    multipart_chunksize: String,

    /// maximum number of parts uploaded in parallel.
    /// memory usage is up to multipart_chunksize * max_parallel_uploads.
    #[arg(long, env, default_value_t = DEFAULT_MAX_PARALLEL_UPLOADS, value_parser = clap::value_parser!(u16).range(1..=64), help_heading = "Multipart Settings")]
    max_parallel_uploads: u16,

    /// lifetime (seconds) of the presigned URL issued for each part
    #[arg(long, env, default_value_t = DEFAULT_PRESIGN_EXPIRES_IN_SECONDS, value_parser = clap::value_parser!(u64).range(1..=604800), help_heading = "Multipart Settings")]
    presign_expires_in_seconds: u64,

    /// do not abort the multipart upload on failure. the upload id is logged for inspection.
    /// incomplete multipart uploads consume storage until they are aborted.
    #[arg(long, env, default_value_t = DEFAULT_KEEP_INCOMPLETE_UPLOAD, help_heading = "Multipart Settings")]
    keep_incomplete_upload: bool,

    /// Content-Type HTTP header to set on the target object
    #[arg(long, env, help_heading = "Metadata/Headers")]
    content_type: Option<String>,

    /// do not try to guess the mime type of the file
    #[arg(long, env, conflicts_with_all = ["content_type"], default_value_t = DEFAULT_NO_GUESS_MIME_TYPE, help_heading = "Metadata/Headers")]
    no_guess_mime_type: bool,

    /// trace verbosity(-v: show info, -vv: show debug, -vvv show trace)
    #[clap(flatten)]
    verbosity: Verbosity<WarnLevel>,

    /// show trace as json format
    #[arg(long, env, default_value_t = DEFAULT_JSON_TRACING, help_heading = "Tracing/Logging")]
    json_tracing: bool,

    /// enable aws sdk tracing
    #[arg(long, env, default_value_t = DEFAULT_AWS_SDK_TRACING, help_heading = "Tracing/Logging")]
    aws_sdk_tracing: bool,

    /// show span event tracing
    #[arg(long, env, default_value_t = DEFAULT_SPAN_EVENTS_TRACING, help_heading = "Tracing/Logging")]
    span_events_tracing: bool,

    /// disable ANSI terminal colors
    #[arg(long, env, default_value_t = DEFAULT_DISABLE_COLOR_TRACING, help_heading = "Tracing/Logging")]
    disable_color_tracing: bool,

    /// maximum retry attempts that the aws sdk retry handler use
    #[arg(long, env, default_value_t = DEFAULT_AWS_MAX_ATTEMPTS, value_name = "max_attempts", help_heading = "Retry Options")]
    aws_max_attempts: u32,

    /// a multiplier value used when calculating backoff times as part of an exponential backoff with jitter strategy.
    #[arg(long, env, default_value_t = DEFAULT_INITIAL_BACKOFF_MILLISECONDS, value_name = "initial_backoff", help_heading = "Retry Options")]
    initial_backoff_milliseconds: u64,

    /// maximum force retry attempts of a part upload(presign and PUT)
    #[arg(long, env, default_value_t = DEFAULT_FORCE_RETRY_COUNT, help_heading = "Retry Options")]
    force_retry_count: u32,

    /// sleep interval (milliseconds) between part upload force retries on error
    #[arg(long, env, default_value_t = DEFAULT_FORCE_RETRY_INTERVAL_MILLISECONDS, value_name = "force_retry_interval", help_heading = "Retry Options")]
    force_retry_interval_milliseconds: u64,

    /// operation timeout (milliseconds). For details, see the AWS SDK for Rust TimeoutConfig documentation.
    /// The default has no timeout.
    #[arg(
        long,
        env,
        value_name = "operation_timeout",
        help_heading = "Timeout Options"
    )]
    operation_timeout_milliseconds: Option<u64>,

    /// operation attempt timeout (milliseconds). For details, see the AWS SDK for Rust TimeoutConfig documentation.
    /// The default has no timeout.
    #[arg(
        long,
        env,
        value_name = "operation_attempt_timeout",
        help_heading = "Timeout Options"
    )]
    operation_attempt_timeout_milliseconds: Option<u64>,

    /// connect timeout (milliseconds). also applied to part uploads.
    /// The default has AWS SDK default timeout (Currently 3100 milliseconds).
    #[arg(
        long,
        env,
        value_name = "connect_timeout",
        help_heading = "Timeout Options"
    )]
    connect_timeout_milliseconds: Option<u64>,

    /// read timeout (milliseconds). also applied to part uploads.
    /// The default has no timeout.
    #[arg(
        long,
        env,
        value_name = "read_timeout",
        help_heading = "Timeout Options"
    )]
    read_timeout_milliseconds: Option<u64>,

    /// timeout (milliseconds) of a whole part upload request to the presigned URL
    #[arg(long, env, default_value_t = DEFAULT_PART_UPLOAD_TIMEOUT_MILLISECONDS, value_parser = clap::value_parser!(u64).range(1..), value_name = "part_upload_timeout", help_heading = "Timeout Options")]
    part_upload_timeout_milliseconds: u64,

    /// disable ETag verification of the uploaded object
    #[arg(long, env, default_value_t = DEFAULT_DISABLE_ETAG_VERIFY, help_heading = "Advanced")]
    disable_etag_verify: bool,

    /// disable stalled stream protection
    #[arg(long, env, default_value_t = DEFAULT_DISABLE_STALLED_STREAM_PROTECTION, help_heading = "Advanced")]
    disable_stalled_stream_protection: bool,

    /// generate a auto completions script. Valid values: bash, fish, zsh, powershell, elvish.
    #[arg(long, env, value_name = "SHELL", value_parser = clap_complete::shells::Shell::from_str, help_heading = "Advanced")]
    auto_complete_shell: Option<clap_complete::shells::Shell>,
}

pub fn parse_from_args<I, T>(args: I) -> Result<CLIArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CLIArgs::try_parse_from(args)
}

pub fn build_config_from_args<I, T>(args: I) -> Result<Config, String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let config_args = CLIArgs::try_parse_from(args).map_err(|e| e.to_string())?;
    crate::Config::try_from(config_args)
}

impl CLIArgs {
    pub fn auto_complete_shell(&self) -> Option<clap_complete::shells::Shell> {
        self.auto_complete_shell
    }

    fn build_access_keys(&self) -> Result<AccessKeys, String> {
        match (&self.access_key, &self.secret_access_key) {
            (Some(access_key), Some(secret_access_key))
                if !access_key.is_empty() && !secret_access_key.is_empty() =>
            {
                Ok(AccessKeys {
                    access_key: access_key.to_string(),
                    secret_access_key: secret_access_key.to_string(),
                    session_token: self.session_token.clone(),
                })
            }
            _ => Err(MISSING_CREDENTIALS.to_string()),
        }
    }

    fn build_tracing_config(&self) -> Option<TracingConfig> {
        self.verbosity
            .log_level()
            .map(|log_level| TracingConfig {
                tracing_level: log_level,
                json_tracing: self.json_tracing,
                aws_sdk_tracing: self.aws_sdk_tracing,
                span_events_tracing: self.span_events_tracing,
                disable_color_tracing: self.disable_color_tracing,
            })
    }

    fn build_client_config(
        &self,
        access_keys: AccessKeys,
        region: String,
        endpoint_url: String,
    ) -> ClientConfig {
        ClientConfig {
            access_keys,
            region,
            endpoint_url,
            force_path_style: self.force_path_style,
            retry_config: RetryConfig {
                aws_max_attempts: self.aws_max_attempts,
                initial_backoff_milliseconds: self.initial_backoff_milliseconds,
            },
            cli_timeout_config: CLITimeoutConfig {
                operation_timeout_milliseconds: self.operation_timeout_milliseconds,
                operation_attempt_timeout_milliseconds: self.operation_attempt_timeout_milliseconds,
                connect_timeout_milliseconds: self.connect_timeout_milliseconds,
                read_timeout_milliseconds: self.read_timeout_milliseconds,
            },
            disable_stalled_stream_protection: self.disable_stalled_stream_protection,
        }
    }
}

impl TryFrom<CLIArgs> for Config {
    type Error = String;

    fn try_from(value: CLIArgs) -> Result<Self, Self::Error> {
        // Credentials are checked first so that nothing else happens without them.
        let access_keys = value.build_access_keys()?;

        let path = PathBuf::from(
            value
                .path
                .clone()
                .ok_or_else(|| NO_PATH_SPECIFIED.to_string())?,
        );
        let endpoint_url = value
            .endpoint_url
            .clone()
            .ok_or_else(|| NO_ENDPOINT_URL_SPECIFIED.to_string())?;
        let region = value
            .region
            .clone()
            .ok_or_else(|| NO_REGION_SPECIFIED.to_string())?;
        let bucket = value
            .bucket
            .clone()
            .ok_or_else(|| NO_BUCKET_SPECIFIED.to_string())?;

        let key = match value.object_key.clone() {
            Some(object_key) => object_key,
            None => default_object_key(&path)?,
        };

        let tracing_config = value.build_tracing_config();
        let client_config =
            value.build_client_config(access_keys, region.clone(), endpoint_url.clone());

        Ok(Config {
            path,
            target: UploadTarget {
                endpoint_url,
                region,
                bucket,
                key,
            },
            client_config,
            transfer_config: TransferConfig {
                multipart_chunksize: human_bytes::parse_human_bytes(&value.multipart_chunksize)?,
                max_parallel_uploads: value.max_parallel_uploads,
                presign_expires_in_seconds: value.presign_expires_in_seconds,
                part_upload_timeout_milliseconds: value.part_upload_timeout_milliseconds,
            },
            force_retry_config: ForceRetryConfig {
                force_retry_count: value.force_retry_count,
                force_retry_interval_milliseconds: value.force_retry_interval_milliseconds,
            },
            tracing_config,
            keep_incomplete_upload: value.keep_incomplete_upload,
            content_type: value.content_type,
            no_guess_mime_type: value.no_guess_mime_type,
            disable_etag_verify: value.disable_etag_verify,
        })
    }
}

/// The file name of `path` as given. Symbolic links are not resolved, so a link
/// is uploaded under its own name.
fn default_object_key(path: &Path) -> Result<String, String> {
    let file_name = path
        .file_name()
        .ok_or_else(|| NO_FILE_NAME_IN_PATH.to_string())?;

    file_name
        .to_str()
        .map(|file_name| file_name.to_string())
        .ok_or_else(|| NON_UTF8_FILE_NAME.to_string())
}
