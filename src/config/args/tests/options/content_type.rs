#[cfg(test)]
mod tests {
    use crate::config::args::*;

    #[test]
    fn with_content_type() {
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
            "--content-type",
            "application/x-tar",
            "./Cargo.toml",
        ];

        let config = build_config_from_args(args).unwrap();

        assert_eq!(config.content_type, Some("application/x-tar".to_string()));
        assert!(!config.no_guess_mime_type);
    }

    #[test]
    fn with_no_guess_mime_type() {
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
            "--no-guess-mime-type",
            "./Cargo.toml",
        ];

        let config = build_config_from_args(args).unwrap();

        assert!(config.content_type.is_none());
        assert!(config.no_guess_mime_type);
    }

    #[test]
    fn content_type_conflicts_with_no_guess_mime_type() {
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
            "--content-type",
            "application/x-tar",
            "--no-guess-mime-type",
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
