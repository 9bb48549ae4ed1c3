use std::error::Error;

/// Sink for failures the controller recovers from.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, context: &str, error: &dyn Error);
}

/// Short-lived message shown to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Writes each reported error, with its source chain, to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrorReporter;

impl ErrorReporter for LogErrorReporter {
    fn report(&self, context: &str, error: &dyn Error) {
        let mut chain = String::new();
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push_str(": ");
            chain.push_str(&cause.to_string());
            source = cause.source();
        }
        log::error!(target: "quiz", "{context}: {error}{chain}");
    }
}

/// Notifier for hosts without a toast widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        log::info!(target: "quiz", "{message}");
    }
}
