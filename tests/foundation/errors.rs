//! Integration tests for Error types
//!
//! Tests error construction, display, context, and categories.

use std::time::Duration;

use brickrules_foundation::{Error, ErrorCategory, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_unknown_relationship() {
    let err = Error::unknown_relationship("hasPont", "definitions.x");
    assert!(matches!(err.kind, ErrorKind::UnknownRelationship { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("hasPont"));
    assert!(msg.contains("definitions.x"));
}

#[test]
fn error_malformed_identifier() {
    let err = Error::malformed_identifier("not a class", "applicability");
    assert!(matches!(err.kind, ErrorKind::MalformedIdentifier { .. }));
    assert!(format!("{err}").contains("not a class"));
}

#[test]
fn error_graph_syntax_names_line() {
    let err = Error::graph_syntax(7, "unterminated IRI");
    assert!(matches!(err.kind, ErrorKind::GraphSyntax { line: 7, .. }));
    let msg = format!("{err}");
    assert!(msg.contains('7'));
    assert!(msg.contains("unterminated IRI"));
}

#[test]
fn error_resolution_loop() {
    let err = Error::resolution_loop("urn:shapes#A", 3);
    assert!(matches!(err.kind, ErrorKind::ResolutionLoop { steps: 3, .. }));
    assert!(format!("{err}").contains("urn:shapes#A"));
}

// =============================================================================
// Error Categories
// =============================================================================

#[test]
fn categories_follow_kinds() {
    let cases = [
        (Error::malformed_rule_set(None, "<document>", "bad"), ErrorCategory::Input),
        (Error::io("gone"), ErrorCategory::Input),
        (Error::graph_syntax(1, "bad"), ErrorCategory::Input),
        (Error::unknown_relationship("x", "p"), ErrorCategory::Compile),
        (Error::reserved_variable("root"), ErrorCategory::Compile),
        (Error::invalid_pattern("p", "empty"), ErrorCategory::Compile),
        (Error::query_rejected("no"), ErrorCategory::Execution),
        (Error::query_timeout(Duration::from_millis(5)), ErrorCategory::Execution),
        (Error::resolution_loop("s", 1), ErrorCategory::Resolution),
    ];
    for (err, category) in cases {
        assert_eq!(err.category(), category, "{err}");
    }
}

#[test]
fn only_input_is_fatal() {
    assert!(ErrorCategory::Input.is_fatal());
    assert!(!ErrorCategory::Compile.is_fatal());
    assert!(!ErrorCategory::Execution.is_fatal());
    assert!(!ErrorCategory::Resolution.is_fatal());
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_is_attached() {
    let err = Error::invalid_pattern("definitions.x.choice", "choice has no branches")
        .with_context(ErrorContext::new().with_rule("R").with_variable("x"));
    let context = err.context.unwrap();
    assert_eq!(context.rule.as_deref(), Some("R"));
    assert_eq!(context.class, None);
    assert_eq!(context.variable.as_deref(), Some("x"));
}

#[test]
fn context_display_lists_parts() {
    let context = ErrorContext::new()
        .with_rule("CHWValveRule")
        .with_class("VAV")
        .with_variable("chw");
    assert_eq!(
        context.to_string(),
        "in rule CHWValveRule, class VAV, variable chw"
    );
    assert_eq!(ErrorContext::new().to_string(), "");
}
