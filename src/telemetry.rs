use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "saheli_lib=info";

/// Logs go to stderr so they never interleave with the transcript on stdout.
/// `RUST_LOG` overrides the default filter.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A subscriber may already be installed by an embedding application.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
