use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `log` records are bridged through
/// tracing-subscriber, so the `log::` macros used across the crate land here.
///
/// `RUST_LOG` overrides the default `info` level. Calling twice is harmless.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_err()
    {
        log::debug!("Logger already initialized");
    }
}
