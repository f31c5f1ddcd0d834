use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "warn,visa=info";
const VERBOSE_FILTER: &str = "info,visa_interaction=debug,visa_application=debug";

/// Initialize tracing with a compact stderr layer.
///
/// `RUST_LOG` takes precedence over both defaults. Logs go to stderr so they
/// do not interleave with the conversation on stdout.
pub fn init(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();

    tracing::debug!("Tracing initialized");
}
