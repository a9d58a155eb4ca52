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

        assert_eq!(config.transfer_config.multipart_chunksize, 50 * 1024 * 1024);
        assert_eq!(config.transfer_config.max_parallel_uploads, 4);
        assert_eq!(config.transfer_config.presign_expires_in_seconds, 3600);
        assert_eq!(
            config.transfer_config.part_upload_timeout_milliseconds,
            600_000
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
            "--multipart-chunksize",
            "8MiB",
            "--max-parallel-uploads",
            "1",
            "--presign-expires-in-seconds",
            "900",
            "--part-upload-timeout-milliseconds",
            "120000",
            "./Cargo.toml",
        ];

        let config = build_config_from_args(args).unwrap();

        assert_eq!(config.transfer_config.multipart_chunksize, 8 * 1024 * 1024);
        assert_eq!(config.transfer_config.max_parallel_uploads, 1);
        assert_eq!(config.transfer_config.presign_expires_in_seconds, 900);
        assert_eq!(
            config.transfer_config.part_upload_timeout_milliseconds,
            120_000
        );
    }

    #[test]
    fn with_invalid_chunksize() {
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
            "--multipart-chunksize",
            "4MiB",
            "./Cargo.toml",
        ];

        assert!(build_config_from_args(args).is_err());
    }

    #[test]
    fn with_out_of_range_parallel_uploads() {
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
            "--max-parallel-uploads",
            "0",
            "./Cargo.toml",
        ];

        assert!(build_config_from_args(args).is_err());
    }

    #[test]
    fn with_out_of_range_presign_expires() {
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
            "--presign-expires-in-seconds",
            "604801",
            "./Cargo.toml",
        ];

        assert!(build_config_from_args(args).is_err());
    }

    fn init_dummy_tracing_subscriber() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("dummy=trace")
            .try_init();
    }
}
