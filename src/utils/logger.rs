use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("service_orchestrator={},warn", level)))
}

/// Compact human-readable logs for terminals.
pub fn init_cli_logger(verbose: bool, level: &str) {
    let filter = if verbose {
        default_filter("debug")
    } else {
        default_filter(level)
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

/// One JSON object per line, for log shippers.
pub fn init_json_logger(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(default_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .try_init();
}
