use anyhow::{Context, Result};
use aws_config::meta::region::{ProvideRegion, RegionProviderChain};
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, ConfigLoader};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Builder;
use std::time::Duration;

use crate::config::ClientConfig;
use aws_smithy_runtime_api::client::stalled_stream_protection::StalledStreamProtectionConfig;
use aws_smithy_types::timeout::TimeoutConfig;
use aws_types::SdkConfig;
use aws_types::region::Region;

impl ClientConfig {
    pub async fn create_client(&self) -> Client {
        let sdk_config = self.load_sdk_config().await;
        let mut config_builder = Builder::from(&sdk_config).force_path_style(self.force_path_style);

        if let Some(mut timeout_config) = self.build_timeout_config() {
            // The override replaces the loaded config as a whole.
            if let Some(sdk_timeout_config) = sdk_config.timeout_config() {
                timeout_config.take_defaults_from(sdk_timeout_config);
            }
            config_builder = config_builder.timeout_config(timeout_config);
        }

        Client::from_conf(config_builder.build())
    }

    /// HTTP client for the PUT requests against presigned part URLs. The SDK
    /// connect/read timeouts are shared, `part_upload_timeout` bounds a whole request.
    pub fn create_http_client(&self, part_upload_timeout: Duration) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().timeout(part_upload_timeout);

        if let Some(connect_timeout) = self.cli_timeout_config.connect_timeout_milliseconds {
            builder = builder.connect_timeout(Duration::from_millis(connect_timeout));
        }
        if let Some(read_timeout) = self.cli_timeout_config.read_timeout_milliseconds {
            builder = builder.read_timeout(Duration::from_millis(read_timeout));
        }

        builder
            .build()
            .context("reqwest::ClientBuilder build() failed.")
    }

    async fn load_sdk_config(&self) -> SdkConfig {
        let config_loader = if self.disable_stalled_stream_protection {
            aws_config::defaults(BehaviorVersion::latest())
                .stalled_stream_protection(StalledStreamProtectionConfig::disabled())
        } else {
            aws_config::defaults(BehaviorVersion::latest())
                .stalled_stream_protection(StalledStreamProtectionConfig::enabled().build())
        };

        self.load_config_credential(config_loader)
            .region(self.build_region_provider())
            .retry_config(self.build_retry_config())
            .endpoint_url(&self.endpoint_url)
            .load()
            .await
    }

    fn load_config_credential(&self, config_loader: ConfigLoader) -> ConfigLoader {
        let credentials = aws_sdk_s3::config::Credentials::new(
            self.access_keys.access_key.to_string(),
            self.access_keys.secret_access_key.to_string(),
            self.access_keys.session_token.clone(),
            None,
            "s3upload",
        );
        config_loader.credentials_provider(credentials)
    }

    fn build_region_provider(&self) -> Box<dyn ProvideRegion> {
        Box::new(RegionProviderChain::first_try(Region::new(
            self.region.clone(),
        )))
    }

    fn build_retry_config(&self) -> RetryConfig {
        RetryConfig::standard()
            .with_max_attempts(self.retry_config.aws_max_attempts)
            .with_initial_backoff(std::time::Duration::from_millis(
                self.retry_config.initial_backoff_milliseconds,
            ))
    }

    fn build_timeout_config(&self) -> Option<TimeoutConfig> {
        let timeouts = &self.cli_timeout_config;
        let to_duration = |milliseconds: Option<u64>| milliseconds.map(Duration::from_millis);

        let operation_timeout = to_duration(timeouts.operation_timeout_milliseconds);
        let operation_attempt_timeout =
            to_duration(timeouts.operation_attempt_timeout_milliseconds);
        let connect_timeout = to_duration(timeouts.connect_timeout_milliseconds);
        let read_timeout = to_duration(timeouts.read_timeout_milliseconds);

        if [
            operation_timeout,
            operation_attempt_timeout,
            connect_timeout,
            read_timeout,
        ]
        .iter()
        .all(Option::is_none)
        {
            return None;
        }

        let mut builder = TimeoutConfig::builder();
        builder
            .set_operation_timeout(operation_timeout)
            .set_operation_attempt_timeout(operation_attempt_timeout)
            .set_connect_timeout(connect_timeout)
            .set_read_timeout(read_timeout);

        Some(builder.build())
    }
}
