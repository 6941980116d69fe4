//! Logging setup for tutorbook.
//!
//! Everything in the crate logs through `tracing`; this module installs the
//! subscriber for the binary. Storage failures are only ever reported here,
//! so the default level keeps warnings and errors visible.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Target shared by every log line the crate emits.
const LOG_TARGET: &str = "tutorbook";

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Suppress all output except errors.
    Quiet,
    /// Warnings and errors only.
    #[default]
    Normal,
    /// Mutations and storage activity (info and debug).
    Verbose,
    /// Very verbose output (trace level).
    Trace,
}

impl Verbosity {
    /// The most detailed level shown.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directive limited to the crate's own target, e.g.
    /// `tutorbook=warn`. Events from other crates stay hidden.
    #[must_use]
    pub fn filter_directive(self) -> String {
        format!("{LOG_TARGET}={}", self.level().to_string().to_ascii_lowercase())
    }

    fn env_filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.filter_directive()))
    }
}

/// Initialize the logging system.
///
/// Call once at startup. `RUST_LOG` takes precedence over `verbosity`.
/// Log lines go to stderr so command output on stdout stays parseable.
///
/// # Examples
///
/// ```no_run
/// use tutorbook::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let subscriber = tracing_subscriber::registry().with(verbosity.env_filter()).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    );

    // Ignore the error if a subscriber is already installed.
    let _ = subscriber.try_init();
}

/// Initialize logging for tests, showing store and storage activity.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(Verbosity::Verbose.filter_directive())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_level() {
        assert_eq!(Verbosity::Quiet.level(), Level::ERROR);
        assert_eq!(Verbosity::Normal.level(), Level::WARN);
        assert_eq!(Verbosity::Verbose.level(), Level::DEBUG);
        assert_eq!(Verbosity::Trace.level(), Level::TRACE);
    }

    #[test]
    fn test_verbosity_default() {
        assert_eq!(Verbosity::default(), Verbosity::Normal);
    }

    #[test]
    fn test_default_filter_keeps_storage_warnings() {
        assert_eq!(Verbosity::default().filter_directive(), "tutorbook=warn");
    }

    #[test]
    fn test_filter_directives() {
        assert_eq!(Verbosity::Quiet.filter_directive(), "tutorbook=error");
        assert_eq!(Verbosity::Verbose.filter_directive(), "tutorbook=debug");
        assert_eq!(Verbosity::Trace.filter_directive(), "tutorbook=trace");
        for verbosity in [Verbosity::Quiet, Verbosity::Normal, Verbosity::Verbose, Verbosity::Trace] {
            assert!(EnvFilter::try_new(verbosity.filter_directive()).is_ok());
        }
    }

    #[test]
    fn test_init_logging_with_all_verbosity_levels() {
        // Only the first call installs a subscriber; the rest must not panic.
        init_logging(Verbosity::Quiet);
        init_logging(Verbosity::Normal);
        init_logging(Verbosity::Verbose);
        init_logging(Verbosity::Trace);
    }

    #[test]
    fn test_init_test_logging_does_not_panic() {
        init_test_logging();
    }
}
