use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

use crate::error::AppError;

/// Installs the global subscriber: bunyan-style JSON records on stdout.
///
/// The level comes from `RUST_LOG` and defaults to `info`.
pub fn init_tracing(name: &str) -> Result<(), AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let formatting_layer = BunyanFormattingLayer::new(name.to_string(), std::io::stdout);

    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer);

    set_global_default(subscriber)
        .map_err(|e| AppError::Internal(format!("Failed to install tracing subscriber: {}", e)))
}
