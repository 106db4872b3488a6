//! Host message channel
//!
//! Fatal conditions are returned as [`TableIoError`](crate::TableIoError);
//! the reporter only carries the messages the host shows to the user.

use std::sync::Mutex;

/// Severity of a reported message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Receiver of informational, warning and error messages
pub trait Reporter {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn info(&self, message: &str) {
        (**self).info(message)
    }

    fn warning(&self, message: &str) {
        (**self).warning(message)
    }

    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

/// Forwards messages to `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warning(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Keeps every message in memory
#[derive(Debug, Default)]
pub struct CollectingReporter {
    messages: Mutex<Vec<(Severity, String)>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, severity: Severity, message: &str) {
        // A poisoned lock still holds the messages recorded so far
        let mut messages = self.messages.lock().unwrap_or_else(|e| e.into_inner());
        messages.push((severity, message.to_string()));
    }

    /// Snapshot of all recorded messages
    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Recorded messages of one severity
    pub fn with_severity(&self, severity: Severity) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.messages().is_empty()
    }
}

impl Reporter for CollectingReporter {
    fn info(&self, message: &str) {
        self.push(Severity::Info, message);
    }

    fn warning(&self, message: &str) {
        self.push(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.push(Severity::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_reporter() {
        let reporter = CollectingReporter::new();
        assert!(reporter.is_empty());
        reporter.info("a");
        reporter.warning("b");
        (&reporter).error("c");
        assert_eq!(
            reporter.messages(),
            vec![
                (Severity::Info, "a".to_string()),
                (Severity::Warning, "b".to_string()),
                (Severity::Error, "c".to_string()),
            ]
        );
        assert_eq!(reporter.with_severity(Severity::Warning), vec!["b"]);
    }
}
