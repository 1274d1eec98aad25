use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` wins over the configured level. Logs go to stderr so stdout
/// stays free for the run summary.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
