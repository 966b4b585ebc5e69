use color_eyre::eyre::Result;
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Log filename used by hubnotes.
pub const LOG_FILENAME: &str = "hubnotes.log";

/// Configuration for the logging system.
pub struct LogConfig {
    /// Directory where log files will be written.
    pub log_dir: PathBuf,
    /// Default log level when `RUST_LOG` is not set.
    pub log_level: Level,
    /// Whether to use JSON format for logs.
    pub json_format: bool,
    /// Log rotation period.
    pub rotation: Rotation,
}

impl Default for LogConfig {
    fn default() -> Self {
        let log_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".hubnotes")
            .join("logs");

        Self {
            log_dir,
            log_level: Level::INFO,
            json_format: false,
            rotation: Rotation::DAILY,
        }
    }
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("hubnotes={level}")))
}

/// Initialize the logging system with the given configuration.
///
/// Logs go to a rotating file and to stderr; stdout is left for command
/// output. The level is runtime configurable via `RUST_LOG`.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created.
pub fn init_logging(config: LogConfig) -> Result<()> {
    std::fs::create_dir_all(&config.log_dir)?;

    let file_appender = RollingFileAppender::new(config.rotation, &config.log_dir, LOG_FILENAME);

    if config.json_format {
        let json_file_layer = fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_current_span(true)
            .with_target(true)
            .with_filter(env_filter(config.log_level));

        let json_stderr_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_target(true)
            .with_filter(env_filter(config.log_level));

        tracing_subscriber::registry()
            .with(json_file_layer)
            .with(json_stderr_layer)
            .with(ErrorLayer::default())
            .init();
    } else {
        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_target(true)
            .with_ansi(false)
            .with_filter(env_filter(config.log_level));

        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(env_filter(config.log_level));

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer)
            .with(ErrorLayer::default())
            .init();
    }

    Ok(())
}

/// Parse rotation period from string.
///
/// Unknown values fall back to daily rotation.
#[must_use]
pub fn parse_rotation(s: &str) -> Rotation {
    match s.to_lowercase().as_str() {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
