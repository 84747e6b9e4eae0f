use crate::error::{AppError, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG`, the verbosity flags, nor the config
/// pick one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

pub fn level_for(verbose: u8, quiet: bool, configured: Option<&str>) -> String {
    if quiet {
        return "error".to_string();
    }
    match verbose {
        0 => configured.unwrap_or(DEFAULT_LOG_LEVEL).to_string(),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Installs the stderr subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init(level: &str) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|e| {
            AppError::Telemetry(format!("invalid log level/filter '{level}': {e}"))
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(|e| AppError::Telemetry(e.to_string()))
}
