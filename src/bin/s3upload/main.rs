use ::tracing::trace;
use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use rusty_fork::rusty_fork_test;

use s3upload::CLIArgs;
use s3upload::Config;

mod cli;
mod tracing;

#[cfg(not(tarpaulin_include))]
#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CLIArgs::parse();

    if let Some(shell) = cli_args.auto_complete_shell() {
        generate(
            shell,
            &mut CLIArgs::command(),
            "s3upload",
            &mut std::io::stdout(),
        );

        return Ok(());
    }

    let config = load_config_exit_if_err(cli_args);

    start_tracing_if_necessary(&config);

    trace!("config = {:?}", config);

    let exit_code = cli::run(config).await;
    if exit_code != cli::EXIT_CODE_SUCCESS {
        std::process::exit(exit_code);
    }

    Ok(())
}

#[cfg(not(tarpaulin_include))]
fn load_config_exit_if_err(cli_args: CLIArgs) -> Config {
    match Config::try_from(cli_args) {
        Ok(config) => config,
        Err(error_message) => {
            clap::Error::raw(clap::error::ErrorKind::ValueValidation, error_message).exit()
        }
    }
}

fn start_tracing_if_necessary(config: &Config) -> bool {
    let Some(tracing_config) = config.tracing_config.as_ref() else {
        return false;
    };

    tracing::init_tracing(tracing_config);
    true
}

rusty_fork_test! {
    #[test]
    fn with_tracing() {
        let args = vec![
            "unittest",
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

        let config = s3upload::Config::try_from(CLIArgs::try_parse_from(args).unwrap()).unwrap();
        assert!(start_tracing_if_necessary(&config));
    }

    #[test]
    fn without_tracing() {
        let args = vec![
            "unittest",
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
            "-qq",
            "./Cargo.toml",
        ];

        let config = s3upload::Config::try_from(CLIArgs::try_parse_from(args).unwrap()).unwrap();
        assert!(!start_tracing_if_necessary(&config));
    }
}
