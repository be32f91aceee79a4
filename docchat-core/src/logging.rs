//! File logging for docchat
//!
//! Logs go to `$XDG_STATE_HOME/docchat/docchat.log.<date>` with daily rotation.
//! The terminal belongs to the UI, so nothing is ever written to stdout.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};

/// HTTP internals that drown the backend traffic at debug level.
const QUIET_TARGETS: [&str; 3] = ["hyper_util=warn", "reqwest=info", "h2=warn"];

/// Build the event filter.
///
/// `RUST_LOG` wins when set. Otherwise the configured level is used, and a
/// level that does not parse is a configuration error.
pub fn filter_for(config: &LoggingConfig) -> Result<EnvFilter> {
    let mut filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            Error::Config(format!("invalid log level '{}': {}", config.level, e))
        })?,
    };

    for target in QUIET_TARGETS {
        let directive: Directive = target
            .parse()
            .map_err(|e| Error::Config(format!("invalid log directive '{}': {}", target, e)))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

/// Start file logging.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes pending writes.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_dir = Config::state_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("docchat.log")
        .max_log_files(config.max_files.max(1))
        .build(&log_dir)
        .map_err(|e| Error::Config(format!("failed to open log file: {}", e)))?;
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter_for(config)?)
        .with(file_layer)
        .init();

    tracing::info!(
        log_dir = %log_dir.display(),
        level = %config.level,
        max_files = config.max_files,
        "Logging initialized"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Route events to the test harness output. Safe to call from every test.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Flushes the background log writer when dropped.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logging(level: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
            ..LoggingConfig::default()
        }
    }

    #[test]
    fn test_filter_accepts_levels_and_directives() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(filter_for(&logging("debug")).is_ok());
        assert!(filter_for(&logging("info,docchat_core=trace")).is_ok());
    }

    #[test]
    fn test_filter_rejects_garbage_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = filter_for(&logging("docchat_core=loudest")).unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }
}
