//! Integration tests for rule documents

use brickrules_foundation::{ErrorCategory, ErrorKind};
use brickrules_language::{PatternNode, RuleDefinition, RuleSet};

const DOCUMENT: &str = r#"{
    "CHWValveRule": {
        "applicability": ["VAV", "FCU"],
        "definitions": {
            "chw": {"choice": [
                {"hasPoint": "Chilled_Water_Valve_Command"},
                {"hasPart": {"Chilled_Water_Valve": {"hasPoint": "Valve_Command"}}}
            ]}
        }
    },
    "AirFlowRule": {
        "applicability": ["VAV"],
        "definitions": {
            "flow": "Air_Flow_Sensor",
            "setpoint": "Air_Flow_Setpoint"
        }
    },
    "Typo": {
        "applicability": ["VAV"],
        "definitions": {"x": {"hasPont": "Point"}}
    }
}"#;

// =============================================================================
// Loading
// =============================================================================

#[test]
fn accepted_rules_keep_document_order() {
    let loaded = RuleSet::from_json_str(DOCUMENT).unwrap();
    let names: Vec<_> = loaded.rules.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["CHWValveRule", "AirFlowRule"]);
}

#[test]
fn bad_patterns_reject_only_their_rule() {
    let loaded = RuleSet::from_json_str(DOCUMENT).unwrap();

    assert_eq!(loaded.rejected.len(), 1);
    let rejection = &loaded.rejected[0];
    assert_eq!(rejection.rule, "Typo");
    assert!(matches!(rejection.error.kind, ErrorKind::UnknownRelationship { .. }));
    let context = rejection.error.context.as_ref().unwrap();
    assert_eq!(context.rule.as_deref(), Some("Typo"));
    assert_eq!(context.variable.as_deref(), Some("x"));
}

#[test]
fn definitions_keep_document_order() {
    let loaded = RuleSet::from_json_str(DOCUMENT).unwrap();
    let rule = loaded.rules.get("AirFlowRule").unwrap();

    let variables: Vec<_> = rule.definitions.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(variables, vec!["flow", "setpoint"]);
    assert_eq!(rule.expected_binding_len(), 3);
    assert_eq!(rule.definition("flow"), Some(&PatternNode::leaf("Air_Flow_Sensor")));
}

#[test]
fn applicability_is_kept() {
    let loaded = RuleSet::from_json_str(DOCUMENT).unwrap();
    let rule = loaded.rules.get("CHWValveRule").unwrap();
    assert_eq!(rule.applicability, vec!["VAV", "FCU"]);
}

// =============================================================================
// Fatal Document Errors
// =============================================================================

#[test]
fn invalid_json_is_fatal() {
    let err = RuleSet::from_json_str("{not json").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedRuleSet { .. }));
    assert_eq!(err.category(), ErrorCategory::Input);
}

#[test]
fn document_must_be_object() {
    let err = RuleSet::from_json_str("[]").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedRuleSet { rule: None, .. }));
}

#[test]
fn missing_fields_are_fatal() {
    let err = RuleSet::from_json_str(r#"{"R": {"definitions": {}}}"#).unwrap_err();
    let ErrorKind::MalformedRuleSet { rule, field, .. } = err.kind else {
        panic!("expected MalformedRuleSet");
    };
    assert_eq!(rule.as_deref(), Some("R"));
    assert_eq!(field, "applicability");

    let err = RuleSet::from_json_str(r#"{"R": {"applicability": []}}"#).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::MalformedRuleSet { ref field, .. } if field == "definitions"
    ));
}

#[test]
fn applicability_entries_must_be_strings() {
    let err =
        RuleSet::from_json_str(r#"{"R": {"applicability": ["VAV", 3], "definitions": {}}}"#)
            .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::MalformedRuleSet { ref field, .. } if field == "applicability[1]"
    ));
}

// =============================================================================
// Building Rules
// =============================================================================

#[test]
fn duplicate_rule_names_are_rejected() {
    let mut rules = RuleSet::new();
    rules.insert(RuleDefinition::new("R")).unwrap();
    assert!(rules.insert(RuleDefinition::new("R")).is_err());
    assert_eq!(rules.len(), 1);
}

#[test]
fn builders_dedupe() {
    let rule = RuleDefinition::new("R")
        .applies_to("VAV")
        .applies_to("VAV")
        .define("x", PatternNode::leaf("A"))
        .define("x", PatternNode::leaf("B"));

    assert_eq!(rule.applicability, vec!["VAV"]);
    assert_eq!(rule.definitions.len(), 1);
    assert_eq!(rule.definition("x"), Some(&PatternNode::leaf("B")));

    let rules = RuleSet::new()
        .with_rule(RuleDefinition::new("R"))
        .with_rule(rule.clone());
    assert_eq!(rules.len(), 1);
    assert_eq!(rules.get("R"), Some(&rule));
}
