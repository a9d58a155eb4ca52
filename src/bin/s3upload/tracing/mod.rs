use std::env;

use rusty_fork::rusty_fork_test;
use tracing_subscriber::fmt::format::FmtSpan;

use s3upload::config::TracingConfig;

const EVENT_FILTER_ENV_VAR: &str = "RUST_LOG";

// Crates that log the SDK requests and the presigned part PUTs.
const AWS_SDK_TRACING_TARGETS: [&str; 4] = ["aws_smithy_runtime", "aws_config", "aws_sigv4", "reqwest"];

pub fn init_tracing(config: &TracingConfig) {
    let fmt_span = if config.span_events_tracing {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let (event_filter, show_target) =
        build_event_filter(config, env::var(EVENT_FILTER_ENV_VAR).ok());

    let subscriber_builder = tracing_subscriber::fmt()
        .compact()
        .with_ansi(!config.disable_color_tracing)
        .with_span_events(fmt_span)
        .with_env_filter(event_filter)
        .with_target(show_target);

    if config.json_tracing {
        subscriber_builder.json().init();
    } else {
        subscriber_builder.init();
    }
}

/// Returns the filter directive and whether event targets are worth printing.
fn build_event_filter(config: &TracingConfig, env_filter: Option<String>) -> (String, bool) {
    let tracing_level = config.tracing_level;

    if config.aws_sdk_tracing {
        let filter = std::iter::once("s3upload")
            .chain(AWS_SDK_TRACING_TARGETS)
            .map(|target| format!("{target}={tracing_level}"))
            .collect::<Vec<_>>()
            .join(",");
        return (filter, true);
    }

    match env_filter {
        Some(env_filter) => (env_filter, true),
        None => (format!("s3upload={tracing_level}"), false),
    }
}


rusty_fork_test! {
    #[test]
    fn init_json_tracing() {
        init_tracing(&TracingConfig {
            tracing_level: log::Level::Info,
            json_tracing: true,
            aws_sdk_tracing: false,
            span_events_tracing: false,
            disable_color_tracing: false});
    }

    #[test]
    fn init_span_events_tracing() {
        // This code is used to test purpose only and run separated processes.
        unsafe { env::remove_var(EVENT_FILTER_ENV_VAR) };

        init_tracing(&TracingConfig {
            tracing_level: log::Level::Trace,
            json_tracing: false,
            aws_sdk_tracing: false,
            span_events_tracing: true,
            disable_color_tracing: true,
        });
    }
}
