//! Tracing setup for the command-line binary.

use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber.
///
/// Without `verbose` the level is fixed at `warn` so stray `RUST_LOG`
/// settings cannot flood the terminal. With it, `RUST_LOG` wins and the
/// fallback is `debug`. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("warn")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
