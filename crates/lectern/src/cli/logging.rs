//! Logging setup using `tracing-subscriber`.
//!
//! Everything goes to stderr so that rendered output on stdout stays clean.
//!
//! # Log Levels
//!
//! - (default): warn
//! - `-v`: info (publishes)
//! - `-vv`: debug (state transitions, dropped fetches)
//! - `-vvv`: trace
//!
//! `RUST_LOG` wins over the verbosity flags when set.

use std::io::{self, IsTerminal};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub with_timestamps: bool,
    pub with_target: bool,
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_timestamps: false,
            with_target: false,
            with_ansi: io::stderr().is_terminal(),
        }
    }
}

impl LogConfig {
    /// Create a `LogConfig` from the CLI `-v` count.
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            with_target: verbosity >= 2,
            ..Default::default()
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let level = self.level.as_str().to_lowercase();
            EnvFilter::new(format!("warn,lecternapp={level},lectern={level}"))
        })
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let layer = fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_target(config.with_target)
        .with_ansi(config.with_ansi);

    let registry = tracing_subscriber::registry().with(config.filter());
    if config.with_timestamps {
        registry.with(layer).try_init()?;
    } else {
        registry.with(layer.without_time()).try_init()?;
    }
    Ok(())
}
