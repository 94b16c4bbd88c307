//! Logging setup for dbcheck.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the `verbose` flag.
pub fn init(
    verbose: bool,
    format: LogFormat,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}
