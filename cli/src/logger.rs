use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install the global subscriber. Logs go to stderr; stdout carries the
/// scenario output.
pub fn init_logging(verbose: bool) {
    let fanout_log = std::env::var("FANOUT_LOG").ok();
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = select_filter(fanout_log.as_deref(), rust_log.as_deref(), verbose);

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

/// `FANOUT_LOG` wins over `RUST_LOG`; with neither set, `-v` picks `debug`.
/// An unparsable directive falls back to `warn`.
fn select_filter(fanout_log: Option<&str>, rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    match fanout_log.or(rust_log) {
        Some(value) => EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new("warn")),
        None if verbose => EnvFilter::new("debug"),
        None => EnvFilter::new("warn"),
    }
}
