//! Log-backed console for the JS facade.
//!
//! This module centralizes output from script-visible logging and from the
//! error-reporting hook used for inline event handlers. Everything is routed
//! through the `log` crate; embedders pick the backend.

use log::{debug, error, info, trace, warn};

/// Log severity levels understood by the host logger.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Cross-runtime logger used by host bindings.
pub trait HostLogger: Send + Sync {
    /// Log a message with a given level.
    fn log(&self, level: LogLevel, message: &str);
}

/// Console provides helper functions to print messages emitted by script
/// and by the bindings themselves. This keeps output routing in one place so it
/// can later be swapped to a different backend.
pub struct Console;

impl Console {
    /// Print a diagnostic line that is only interesting while debugging.
    #[inline]
    pub fn debug<M: AsRef<str>>(message: M) {
        debug!("[JS]: {}", message.as_ref());
    }

    /// Print an informational line.
    #[inline]
    pub fn info<M: AsRef<str>>(message: M) {
        info!("[JS]: {}", message.as_ref());
    }

    /// Print a warning line.
    #[inline]
    pub fn warn<M: AsRef<str>>(message: M) {
        warn!("[JS]: {}", message.as_ref());
    }

    /// Print an error line.
    #[inline]
    pub fn error<M: AsRef<str>>(message: M) {
        error!("[JS]: {}", message.as_ref());
    }

    /// Print an exception with optional stack trace.
    #[inline]
    pub fn exception<M: AsRef<str>>(message: M, stack: Option<&str>) {
        match stack {
            Some(stack_trace) if !stack_trace.is_empty() => {
                error!("[JS]: {}\n{}", message.as_ref(), stack_trace);
            }
            _ => {
                error!("[JS]: {}", message.as_ref());
            }
        }
    }
}

/// A `HostLogger` implementation that routes to the `Console` helpers.
pub struct ConsoleLogger;

impl HostLogger for ConsoleLogger {
    #[inline]
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Trace => trace!("[JS]: {message}"),
            LogLevel::Debug => Console::debug(message),
            LogLevel::Info => Console::info(message),
            LogLevel::Warn => Console::warn(message),
            LogLevel::Error => Console::error(message),
        }
    }
}
