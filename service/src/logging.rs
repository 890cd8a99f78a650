use crate::config::Config;
use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// HTTP plumbing crates. Their per-request chatter is only shown at Trace.
const HTTP_STACK: &[&str] = &["tower", "tower_http", "hyper", "axum", "tracing"];

pub struct Logger;

impl Logger {
    /// Installs the global terminal logger at the configured level.
    ///
    /// Fails if a global logger is already installed.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        let level = config.log_level_filter;
        TermLogger::init(
            level,
            Self::log_config(level),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )
    }

    fn log_config(level: LevelFilter) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if Self::hides_http_stack(level) {
            for &module in HTTP_STACK {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }

    fn hides_http_stack(level: LevelFilter) -> bool {
        level < LevelFilter::Trace
    }
}
