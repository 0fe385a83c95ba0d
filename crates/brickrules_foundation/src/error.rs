//! Error types for the brickrules system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// The main error type for brickrules operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Returns the category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Creates a malformed rule document error.
    #[must_use]
    pub fn malformed_rule_set(
        rule: Option<&str>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::MalformedRuleSet {
            rule: rule.map(String::from),
            field: field.into(),
            message: message.into(),
        })
    }

    /// Creates an unknown relationship error.
    #[must_use]
    pub fn unknown_relationship(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownRelationship {
            name: name.into(),
            path: path.into(),
        })
    }

    /// Creates a malformed identifier error.
    #[must_use]
    pub fn malformed_identifier(identifier: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedIdentifier {
            identifier: identifier.into(),
            path: path.into(),
        })
    }

    /// Creates a reserved variable error.
    #[must_use]
    pub fn reserved_variable(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReservedVariable(name.into()))
    }

    /// Creates an invalid pattern error.
    #[must_use]
    pub fn invalid_pattern(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPattern {
            path: path.into(),
            message: message.into(),
        })
    }

    /// Creates an I/O error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io(message.into()))
    }

    /// Creates a graph syntax error.
    #[must_use]
    pub fn graph_syntax(line: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::GraphSyntax {
            line,
            message: message.into(),
        })
    }

    /// Creates a rejected query error.
    #[must_use]
    pub fn query_rejected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::QueryRejected(message.into()))
    }

    /// Creates a query timeout error.
    #[must_use]
    pub fn query_timeout(limit: Duration) -> Self {
        Self::new(ErrorKind::QueryTimeout { limit })
    }

    /// Creates a shape resolution loop error.
    #[must_use]
    pub fn resolution_loop(shape: impl Into<String>, steps: usize) -> Self {
        Self::new(ErrorKind::ResolutionLoop {
            shape: shape.into(),
            steps,
        })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The rule document does not follow the rule grammar.
    #[error(
        "malformed rule document at rule `{}` field `{field}`: {message}",
        .rule.as_deref().unwrap_or("<document>")
    )]
    MalformedRuleSet {
        /// The rule being read, if the failure is inside one.
        rule: Option<String>,
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// A pattern key looks like a relationship but is not a known one.
    #[error("unknown relationship `{name}` at {path}")]
    UnknownRelationship {
        /// The key as written.
        name: String,
        /// Location of the pattern node.
        path: String,
    },

    /// A class or variable identifier is not valid in the query language.
    #[error("malformed identifier `{identifier}` at {path}")]
    MalformedIdentifier {
        /// The identifier as written.
        identifier: String,
        /// Location of the pattern node.
        path: String,
    },

    /// A rule declares a variable with a reserved name.
    #[error("variable name `{0}` is reserved")]
    ReservedVariable(String),

    /// A pattern node is structurally invalid.
    #[error("invalid pattern at {path}: {message}")]
    InvalidPattern {
        /// Location of the pattern node.
        path: String,
        /// Description of the problem.
        message: String,
    },

    /// The graph store rejected a query.
    #[error("query rejected: {0}")]
    QueryRejected(String),

    /// The graph store did not answer within the configured limit.
    #[error("query timed out after {limit:?}")]
    QueryTimeout {
        /// The configured limit.
        limit: Duration,
    },

    /// Shape resolution did not reach a fixed point.
    #[error("shape resolution did not terminate after {steps} steps (stopped at {shape})")]
    ResolutionLoop {
        /// The last shape reached.
        shape: String,
        /// Steps taken before giving up.
        steps: usize,
    },

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// A graph file could not be parsed.
    #[error("graph syntax error at line {line}: {message}")]
    GraphSyntax {
        /// One-based line number.
        line: usize,
        /// Description of the problem.
        message: String,
    },
}

impl ErrorKind {
    /// Returns the category of this error kind.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedRuleSet { .. } | Self::Io(_) | Self::GraphSyntax { .. } => {
                ErrorCategory::Input
            }
            Self::UnknownRelationship { .. }
            | Self::MalformedIdentifier { .. }
            | Self::ReservedVariable(_)
            | Self::InvalidPattern { .. } => ErrorCategory::Compile,
            Self::QueryRejected(_) | Self::QueryTimeout { .. } => ErrorCategory::Execution,
            Self::ResolutionLoop { .. } => ErrorCategory::Resolution,
        }
    }
}

/// Broad error classes, used to decide how far a failure propagates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorCategory {
    /// Malformed top-level input; fatal to the run.
    Input,
    /// A rule pattern could not be compiled.
    Compile,
    /// The graph store failed to answer a query.
    Execution,
    /// A failed shape could not be resolved to its authoring shape.
    Resolution,
}

impl ErrorCategory {
    /// Whether errors of this category abort the whole run.
    #[must_use]
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::Input)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Input => "input",
            Self::Compile => "compile",
            Self::Execution => "execution",
            Self::Resolution => "resolution",
        };
        f.write_str(name)
    }
}

/// Context about where an error occurred.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Rule being evaluated.
    pub rule: Option<String>,
    /// Applicable class being queried.
    pub class: Option<String>,
    /// Variable being defined.
    pub variable: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rule name.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Sets the applicable class.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Sets the variable name.
    #[must_use]
    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = Some(variable.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(rule) = &self.rule {
            parts.push(format!("rule {rule}"));
        }
        if let Some(class) = &self.class {
            parts.push(format!("class {class}"));
        }
        if let Some(variable) = &self.variable {
            parts.push(format!("variable {variable}"));
        }
        if parts.is_empty() {
            return Ok(());
        }
        write!(f, "in {}", parts.join(", "))
    }
}

/// Result type alias using the brickrules error.
pub type Result<T> = std::result::Result<T, Error>;
