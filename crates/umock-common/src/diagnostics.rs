//! Diagnostics and the generation-error taxonomy.
//!
//! Resolution ambiguities (duplicate same-type constraints, unresolved
//! aliases, double annotations, malformed directives) are resolved
//! deterministically and silently so generation stays total over any
//! syntactically valid annotated input; they surface only as non-fatal
//! [`Diagnostic`] values and `tracing` events. The one fatal class is
//! [`GenError::Precondition`]: a member admitted to the mockable set without
//! the shape a builder assumes. That aborts the whole run — no partial output
//! is ever produced for one type while others succeed.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning,
    Message,
}

/// A non-fatal observation made during resolution or synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    /// Name of the declaration the observation applies to, when known.
    pub type_name: Option<String>,
    pub message_text: String,
}

impl Diagnostic {
    pub fn warning(type_name: impl Into<Option<String>>, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            type_name: type_name.into(),
            message_text: message.into(),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Message,
            type_name: None,
            message_text: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_name {
            Some(name) => write!(f, "{name}: {}", self.message_text),
            None => f.write_str(&self.message_text),
        }
    }
}

/// Fatal generation failure. Any of these aborts the entire run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    /// A member admitted to the mockable set lacks the shape a builder
    /// assumes (programmer-error class, e.g. a property without an accessor
    /// block). Not recoverable per-type.
    Precondition {
        type_name: String,
        message: String,
    },
}

impl GenError {
    pub fn precondition(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Precondition {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Precondition { type_name, message } => {
                write!(f, "generation precondition violated for `{type_name}`: {message}")
            }
        }
    }
}

impl std::error::Error for GenError {}

pub type GenResult<T> = Result<T, GenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::warning(
            Some("Store".to_string()),
            "duplicate same-type constraint on `Item`",
        );
        assert_eq!(
            diag.to_string(),
            "Store: duplicate same-type constraint on `Item`"
        );

        let diag = Diagnostic::message("3 units collected");
        assert_eq!(diag.to_string(), "3 units collected");
    }

    #[test]
    fn test_gen_error_display() {
        let err = GenError::precondition("Greeter", "property has no accessor block");
        assert_eq!(
            err.to_string(),
            "generation precondition violated for `Greeter`: property has no accessor block"
        );
    }
}
