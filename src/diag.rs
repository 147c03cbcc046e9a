//! Structured diagnostic channel for recoverable conditions.
//!
//! None of these abort the build: the registry and the build loop record
//! warnings here and keep going, and `main` prints them to stderr.

use crate::model::SourceLocation;
use std::fmt;

/// One recoverable warning, with the source location where available.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} ({})", self.message, location),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Accumulator for warnings emitted during one build pass.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn warn(&mut self, message: impl Into<String>, location: Option<&SourceLocation>) {
        self.warnings.push(Diagnostic {
            message: message.into(),
            location: location.cloned(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.warnings.iter()
    }

    /// Drain everything collected so far, for printing.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.warnings)
    }
}
