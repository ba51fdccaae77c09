//! Per-call diagnostics sink.
//!
//! Non-fatal conditions observed during translation and streaming (lossy
//! role mappings, dropped content parts, prompt feedback) are recorded here
//! and returned alongside results, instead of being written to process-wide
//! logging from inside the translation core. The provider layer decides
//! what to forward to `tracing`.

use chrono::{DateTime, Utc};

/// Severity of a recorded diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

/// One non-fatal condition observed during a call.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Ordered collection of diagnostics for a single call.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message);
    }

    fn push(&mut self, severity: Severity, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity,
            message: message.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_ordering() {
        let mut diags = Diagnostics::new();
        diags.warn("first");
        diags.info("second");

        let messages: Vec<_> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(diags.len(), 2);
        assert!(!diags.is_empty());
    }
}
