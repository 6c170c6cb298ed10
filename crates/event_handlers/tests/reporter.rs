//! Tests for the error-reporting sinks.

use std::sync::{Arc, Mutex};

use event_handlers::{ErrorReporter, GlobalReporter, LoggerReporter, install_global_reporter, report_error};
use js::{ConsoleLogger, HostLogger, JSError, JSValue, LogLevel};

#[derive(Clone, Default)]
struct SharedLog(Arc<Mutex<Vec<String>>>);

impl SharedLog {
    fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl HostLogger for SharedLog {
    fn log(&self, level: LogLevel, message: &str) {
        self.0.lock().unwrap().push(format!("{level:?} {message}"));
    }
}

impl ErrorReporter for SharedLog {
    fn report_error(&self, error: &JSError) {
        self.0.lock().unwrap().push(error.to_string());
    }
}

#[test]
fn logger_reporter_logs_uncaught_errors_at_error_level() {
    let _ = env_logger::builder().is_test(true).try_init();
    let log = SharedLog::default();
    let reporter = LoggerReporter::new(log.clone());
    reporter.report_error(&JSError::SyntaxError(String::from("Unexpected end of input")));
    reporter.report_error(&JSError::Exception(JSValue::Number(3.0)));
    assert_eq!(
        log.lines(),
        ["Error Uncaught SyntaxError: Unexpected end of input", "Error Uncaught 3"]
    );

    LoggerReporter::new(ConsoleLogger).report_error(&JSError::type_error("not callable"));
}

#[test]
fn the_first_installed_global_reporter_wins() {
    let _ = env_logger::builder().is_test(true).try_init();
    let installed = SharedLog::default();
    install_global_reporter(Box::new(installed.clone())).unwrap_or_else(|_| panic!("already installed"));
    let Err(_rejected) = install_global_reporter(Box::new(SharedLog::default())) else {
        panic!("second installation should be rejected");
    };

    report_error(&JSError::type_error("first"));
    GlobalReporter.report_error(&JSError::type_error("second"));
    assert_eq!(installed.lines(), ["TypeError: first", "TypeError: second"]);
}
