#[cfg(test)]
mod tests {
    use crate::config::args::*;

    #[test]
    fn with_default_value() {
        init_dummy_tracing_subscriber();

        let args = vec![
            "s3upload",
            "--access-key",
            "my_access_key",
            "--secret-access-key",
            "my_secret_access_key",
            "--endpoint-url",
            "https://s3.us-east-1.example.com",
            "--region",
            "us-east-1",
            "--bucket",
            "my-bucket",
            "./Cargo.toml",
        ];

        let config = build_config_from_args(args).unwrap();

        assert_eq!(config.client_config.retry_config.aws_max_attempts, 10);
        assert_eq!(
            config.client_config.retry_config.initial_backoff_milliseconds,
            100
        );
        assert_eq!(config.force_retry_config.force_retry_count, 5);
        assert_eq!(
            config.force_retry_config.force_retry_interval_milliseconds,
            1000
        );
    }

    #[test]
    fn with_custom_value() {
        init_dummy_tracing_subscriber();

        let args = vec![
            "s3upload",
            "--access-key",
            "my_access_key",
            "--secret-access-key",
            "my_secret_access_key",
            "--endpoint-url",
            "https://s3.us-east-1.example.com",
            "--region",
            "us-east-1",
            "--bucket",
            "my-bucket",
            "--aws-max-attempts",
            "3",
            "--initial-backoff-milliseconds",
            "500",
            "--force-retry-count",
            "0",
            "--force-retry-interval-milliseconds",
            "10",
            "./Cargo.toml",
        ];

        let config = build_config_from_args(args).unwrap();

        assert_eq!(config.client_config.retry_config.aws_max_attempts, 3);
        assert_eq!(
            config.client_config.retry_config.initial_backoff_milliseconds,
            500
        );
        assert_eq!(config.force_retry_config.force_retry_count, 0);
        assert_eq!(
            config.force_retry_config.force_retry_interval_milliseconds,
            10
        );
    }

    fn init_dummy_tracing_subscriber() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("dummy=trace")
            .try_init();
    }
}
