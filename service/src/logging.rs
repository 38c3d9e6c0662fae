use crate::config::Config;
use log::LevelFilter;
use simplelog::{self, ConfigBuilder, TerminalMode};

/// Modules to filter out from logging when not in Trace mode.
/// These are typically verbose dependencies that clutter normal log output.
const FILTERED_MODULES: &[&str] = &["redis", "tokio", "tower", "hyper", "axum"];

pub struct Logger {}

impl Logger {
    /// Initializes the global logger for the HTTP server: errors go to stderr, everything
    /// else to stdout.
    ///
    /// When the log level is set to Trace, all logs including dependency logs are shown.
    /// For all other log levels, verbose dependency logs are filtered out.
    pub fn init_logger(config: &Config) {
        Self::init(config, TerminalMode::Mixed);
    }

    /// Initializes the global logger for command line tools whose stdout carries data
    /// (e.g. the frames printed by `subscribe`): all log output goes to stderr.
    pub fn init_stderr_logger(config: &Config) {
        Self::init(config, TerminalMode::Stderr);
    }

    fn init(config: &Config, mode: TerminalMode) {
        let apply_filters = Self::should_filter_dependencies(config.log_level_filter);
        let log_config = Self::build_log_config(apply_filters);

        if let Err(e) = simplelog::TermLogger::init(
            config.log_level_filter,
            log_config,
            mode,
            simplelog::ColorChoice::Auto,
        ) {
            eprintln!("Failed to start simplelog: {e}");
        }
    }

    /// Determines whether dependency logging should be filtered.
    ///
    /// Returns `false` for Trace level (show all logs), `true` for all other levels.
    fn should_filter_dependencies(level: LevelFilter) -> bool {
        level != LevelFilter::Trace
    }

    /// Builds a simplelog Config with optional module filtering.
    fn build_log_config(apply_filters: bool) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if apply_filters {
            for module in FILTERED_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filtered_modules_cover_transport_and_http_stack() {
        for module in ["redis", "tokio", "hyper", "axum"] {
            assert!(
                FILTERED_MODULES.contains(&module),
                "{module} should be filtered"
            );
        }
        assert!(
            !FILTERED_MODULES.contains(&"sse"),
            "our own crates must never be filtered"
        );
    }

    #[test]
    fn test_only_trace_level_disables_filtering() {
        assert!(!Logger::should_filter_dependencies(LevelFilter::Trace));
        for level in [
            LevelFilter::Off,
            LevelFilter::Error,
            LevelFilter::Warn,
            LevelFilter::Info,
            LevelFilter::Debug,
        ] {
            assert!(
                Logger::should_filter_dependencies(level),
                "{level} should enable filtering"
            );
        }
    }

    #[test]
    fn test_build_log_config_does_not_panic() {
        let _filtered = Logger::build_log_config(true);
        let _unfiltered = Logger::build_log_config(false);
    }
}
