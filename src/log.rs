// src/log.rs
// Diagnostics go to stderr through `tracing`; the coloured run report goes to stdout
// through `progress::ConsoleProgress`. Events the console already reports are logged at
// debug, so the default filter shows only what the console does not. `RUST_LOG` overrides it.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
