//! Reporting exceptions from inline handlers.
//! Spec: <https://html.spec.whatwg.org/multipage/webappapis.html#report-an-exception>
//!
//! Compilation failures and exceptions thrown by handlers are never returned
//! to the code that read the handler or dispatched the event; they go to an
//! [`ErrorReporter`]. The process-wide reporter is installed once at startup.

use js::{Console, HostLogger, JSError, LogLevel};
use once_cell::sync::OnceCell;

/// Sink for exceptions that must not propagate to the caller.
pub trait ErrorReporter {
    /// Report one exception.
    fn report_error(&self, error: &JSError);
}

static GLOBAL_REPORTER: OnceCell<Box<dyn ErrorReporter + Send + Sync>> = OnceCell::new();

/// Install the process-wide reporter. Only the first installation wins.
///
/// # Errors
/// Returns the rejected reporter when one is already installed.
pub fn install_global_reporter(
    reporter: Box<dyn ErrorReporter + Send + Sync>,
) -> Result<(), Box<dyn ErrorReporter + Send + Sync>> {
    GLOBAL_REPORTER.set(reporter)
}

/// Report through the process-wide reporter, or the console when none is installed.
pub fn report_error(error: &JSError) {
    match GLOBAL_REPORTER.get() {
        Some(reporter) => reporter.report_error(error),
        None => ConsoleReporter.report_error(error),
    }
}

/// Forwards to whatever [`report_error`] currently targets.
#[derive(Copy, Clone, Debug, Default)]
pub struct GlobalReporter;

impl ErrorReporter for GlobalReporter {
    #[inline]
    fn report_error(&self, error: &JSError) {
        report_error(error);
    }
}

/// Prints reports as uncaught exceptions on the script console.
#[derive(Copy, Clone, Debug, Default)]
pub struct ConsoleReporter;

impl ErrorReporter for ConsoleReporter {
    fn report_error(&self, error: &JSError) {
        Console::exception(format!("Uncaught {error}"), None);
    }
}

/// Routes reports to a host logger at error level.
pub struct LoggerReporter<L: HostLogger> {
    logger: L,
}

impl<L: HostLogger> LoggerReporter<L> {
    /// Wrap a host logger.
    pub const fn new(logger: L) -> Self {
        Self { logger }
    }
}

impl<L: HostLogger> ErrorReporter for LoggerReporter<L> {
    fn report_error(&self, error: &JSError) {
        self.logger.log(LogLevel::Error, &format!("Uncaught {error}"));
    }
}
