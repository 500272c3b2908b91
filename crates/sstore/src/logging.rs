//! Logging bootstrap for the exported library.

use anyhow::{Context, Result};
use settings::constants::logging::{DEBUG_ENV_VAR, DEBUG_FILTER, DEFAULT_FILTER};
use settings::Config;
use std::sync::Once;
use tracing::info;
use util::ResultExt;

static INIT: Once = Once::new();

/// Check if debug mode is enabled via environment variable.
fn is_debug_mode() -> bool {
    std::env::var(DEBUG_ENV_VAR).is_ok()
}

/// Install the subscriber once. A host that already installed one keeps it.
pub(crate) fn init(config: &Config) {
    INIT.call_once(|| {
        try_init(config).warn_on_err();
    });
}

fn try_init(config: &Config) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_filter = if is_debug_mode() {
        DEBUG_FILTER
    } else {
        config.log_filter.as_deref().unwrap_or(DEFAULT_FILTER)
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init()
        .context("Host already installed a tracing subscriber")?;

    if is_debug_mode() {
        info!(
            "SStore v{} bridge loaded (DEBUG MODE ENABLED)",
            env!("CARGO_PKG_VERSION")
        );
    } else {
        info!("SStore v{} bridge loaded", env!("CARGO_PKG_VERSION"));
    }
    Ok(())
}
