//! Diagnostics produced by structural validation.

use std::fmt;

use brickrules_foundation::Term;

/// One constraint violation reported by the validation engine.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValidationDiagnostic {
    /// The instance the violation is reported against.
    pub focus_node: Term,
    /// The shape whose constraint failed; often generated and nested.
    pub failed_shape: Term,
    /// Human-readable explanation.
    pub reason: String,
}

impl ValidationDiagnostic {
    /// Creates a diagnostic.
    #[must_use]
    pub fn new(focus_node: Term, failed_shape: Term, reason: impl Into<String>) -> Self {
        Self {
            focus_node,
            failed_shape,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed {}: {}", self.focus_node, self.failed_shape, self.reason)
    }
}
