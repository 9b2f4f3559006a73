//! Subscriber setup for embedding applications

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Result, TierError};

/// Install a global subscriber: JSON lines when `format == "json"`,
/// human-readable otherwise. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| TierError::Config(format!("log filter {:?}: {e}", config.level)))?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.format.eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json().with_target(true).with_current_span(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true).with_line_number(true)).try_init()
    };
    installed.map_err(|e| TierError::Config(format!("logging already initialised: {e}")))
}
