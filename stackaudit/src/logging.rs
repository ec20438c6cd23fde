//! Tracing subscriber setup.
//!
//! The library itself only emits `tracing` events and spans. Binaries and
//! tests that want to see them call one of the `init_*` functions once:
//!
//! ```no_run
//! use stackaudit::logging;
//!
//! logging::init_from_env();
//! tracing::info!("Audit starting");
//! ```
//!
//! `RUST_LOG` is honoured on top of the configured level. Only the first call
//! installs a subscriber; later calls are ignored.

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable selecting the level for `stackaudit` events.
pub const LEVEL_ENV: &str = "STACKAUDIT_LOG_LEVEL";

/// Environment variable switching to JSON output when set to `1` or `true`.
pub const JSON_ENV: &str = "STACKAUDIT_LOG_JSON";

/// Crates whose chatter is capped at `warn` unless `RUST_LOG` says otherwise.
const NOISY_TARGETS: [&str; 4] = ["aws_config", "aws_smithy_runtime", "hyper", "h2"];

/// Subscriber configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for `stackaudit` events.
    pub level: Level,
    /// Emit JSON lines instead of human-readable output.
    pub use_json: bool,
    /// Include the event target.
    pub include_target: bool,
    /// Include file and line.
    pub include_location: bool,
    /// Include thread IDs and names.
    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    /// Default configuration at `level`.
    #[must_use]
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON output with full metadata.
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
            include_location: true,
            include_thread_ids: true,
        }
    }

    /// Debug-level console output.
    #[must_use]
    pub fn development() -> Self {
        Self::with_level(Level::DEBUG)
    }

    /// Reads [`LEVEL_ENV`] and [`JSON_ENV`], falling back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var(LEVEL_ENV).map_or(Level::INFO, |raw| parse_level(&raw));
        let use_json = env::var(JSON_ENV).is_ok_and(|raw| parse_flag(&raw));
        Self {
            level,
            use_json,
            ..Default::default()
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = format!("stackaudit={}", self.level).parse() {
            filter = filter.add_directive(directive);
        }

        if env::var("RUST_LOG").is_err() {
            for target in NOISY_TARGETS {
                if let Ok(directive) = format!("{target}=warn").parse() {
                    filter = filter.add_directive(directive);
                }
            }
        }
        filter
    }
}

/// Parses a level name case-insensitively, defaulting to `INFO`.
#[must_use]
pub fn parse_level(raw: &str) -> Level {
    match raw.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Installs a global subscriber for `config`.
pub fn init_logging(config: &LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.env_filter();
        let installed = if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_thread_ids(config.include_thread_ids)
                        .with_thread_names(config.include_thread_ids),
                )
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_thread_ids(config.include_thread_ids)
                        .with_thread_names(config.include_thread_ids),
                )
                .try_init()
        };

        if installed.is_err() {
            tracing::debug!("A global subscriber was already installed");
        }
    });
}

/// Installs a subscriber with the default configuration.
pub fn init_default() {
    init_logging(&LoggingConfig::default());
}

/// Installs a subscriber configured from the environment.
pub fn init_from_env() {
    init_logging(&LoggingConfig::from_env());
}
