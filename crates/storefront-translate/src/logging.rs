//! Logging setup for the command line tool.

use anyhow::{anyhow, Result};
use storefront_config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Directive raising the translation crate to debug output.
const I18N_DEBUG_DIRECTIVE: &str = "storefront_i18n=debug";

/// Builds the log filter: `RUST_LOG` when set, otherwise the configured
/// level. `i18n_debug` adds debug output for the translation crate.
pub fn log_filter(logging: &LoggingConfig, i18n_debug: bool) -> Result<EnvFilter> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if i18n_debug {
        return Ok(filter.add_directive(I18N_DEBUG_DIRECTIVE.parse()?));
    }
    Ok(filter)
}

/// Installs the global subscriber. Logs go to stderr so stdout only carries
/// resolved values.
pub fn init_logging(logging: &LoggingConfig, i18n_debug: bool) -> Result<()> {
    let filter = log_filter(logging, i18n_debug)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
