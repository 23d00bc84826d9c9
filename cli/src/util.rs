use serde_json::Value;

use crate::error::CliError;

/// Render a JSON value for stdout, compact unless `pretty`.
pub fn render_json(value: &Value, pretty: bool) -> Result<String, CliError> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}

/// Build the tracing filter: RUST_LOG if set, else the configured level.
pub fn env_filter(log_level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level))
}
