//! Process logging: progress on stdout, warnings and errors on stderr.
//!
//! Both streams are `env_logger` loggers sharing one filter, so `RUST_LOG`
//! behaves as usual.

use env_logger::{Builder, Env, Logger, Target};
use log::{Level, Log, Metadata, Record, SetLoggerError};

/// Stream a record of the given level is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

pub fn stream_for(level: Level) -> Stream {
    match level {
        Level::Error | Level::Warn => Stream::Stderr,
        Level::Info | Level::Debug | Level::Trace => Stream::Stdout,
    }
}

/// Routes each record to the stdout or stderr logger by level
pub struct SplitLogger {
    stdout: Logger,
    stderr: Logger,
}

impl SplitLogger {
    /// Builds both loggers from `RUST_LOG`, falling back to `default_filter`
    pub fn from_env(default_filter: &str) -> Self {
        let build = |target: Target| {
            Builder::from_env(Env::default().default_filter_or(default_filter))
                .target(target)
                .build()
        };

        Self {
            stdout: build(Target::Stdout),
            stderr: build(Target::Stderr),
        }
    }

    fn logger_for(&self, level: Level) -> &Logger {
        match stream_for(level) {
            Stream::Stdout => &self.stdout,
            Stream::Stderr => &self.stderr,
        }
    }
}

impl Log for SplitLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.logger_for(metadata.level()).enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        self.logger_for(record.level()).log(record);
    }

    fn flush(&self) {
        self.stdout.flush();
        self.stderr.flush();
    }
}

/// Installs a [`SplitLogger`] as the global logger
pub fn init(default_filter: &str) -> Result<(), SetLoggerError> {
    let logger = SplitLogger::from_env(default_filter);
    log::set_max_level(logger.stdout.filter());
    log::set_boxed_logger(Box::new(logger))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_goes_to_stdout() {
        assert_eq!(stream_for(Level::Info), Stream::Stdout);
        assert_eq!(stream_for(Level::Debug), Stream::Stdout);
        assert_eq!(stream_for(Level::Trace), Stream::Stdout);
    }

    #[test]
    fn test_failures_go_to_stderr() {
        assert_eq!(stream_for(Level::Error), Stream::Stderr);
        assert_eq!(stream_for(Level::Warn), Stream::Stderr);
    }

    #[test]
    fn test_split_logger_uses_default_filter() {
        let logger = SplitLogger::from_env("warn");
        let info = Metadata::builder().level(Level::Info).target("docs_scraper").build();
        let error = Metadata::builder().level(Level::Error).target("docs_scraper").build();

        // RUST_LOG may be set in the environment running the tests
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(!logger.enabled(&info));
            assert!(logger.enabled(&error));
        }
        assert!(std::ptr::eq(logger.logger_for(Level::Error), &logger.stderr));
        assert!(std::ptr::eq(logger.logger_for(Level::Info), &logger.stdout));
    }
}
