//! Integration tests for rule evaluation

use std::time::Duration;

use brickrules_engine::{Binding, EvaluatorConfig, MemoryStore, RuleEvaluator};
use brickrules_foundation::{ErrorCategory, ErrorKind, Namespace, Term};
use brickrules_language::{PatternNode, Relation, RuleDefinition, RuleSet};
use brickrules_storage::Graph;

// =============================================================================
// Helpers
// =============================================================================

fn node(name: &str) -> Term {
    Term::iri(format!("urn:bldg#{name}"))
}

/// Two AHUs: ahu1 has both a supply fan and a discharge temperature sensor,
/// ahu2 only the fan.
fn ahu_store() -> MemoryStore {
    let brick = Namespace::brick();
    let mut graph = Graph::new();
    for ahu in ["ahu1", "ahu2"] {
        graph.add_type(node(ahu), brick.iri("AHU")).unwrap();
        let fan = format!("{ahu}_fan");
        graph.add_type(node(&fan), brick.iri("Supply_Fan")).unwrap();
        graph.insert(node(ahu), brick.iri("hasPart"), node(&fan)).unwrap();
    }
    graph
        .add_type(node("dat1"), brick.iri("Discharge_Air_Temperature_Sensor"))
        .unwrap();
    graph.insert(node("ahu1"), brick.iri("hasPoint"), node("dat1")).unwrap();
    MemoryStore::new(graph)
}

fn ahu_rule() -> RuleDefinition {
    RuleDefinition::new("AHUBasics")
        .applies_to("AHU")
        .define(
            "fan",
            PatternNode::related(Relation::HasPart, PatternNode::leaf("Supply_Fan")),
        )
        .define("dat", PatternNode::leaf("Discharge_Air_Temperature_Sensor"))
}

// =============================================================================
// Outcomes
// =============================================================================

#[test]
fn complete_bindings_hold_every_variable() {
    let report = RuleEvaluator::default().evaluate(&RuleSet::new().with_rule(ahu_rule()), &ahu_store());
    let outcome = report.outcome("AHUBasics").unwrap();

    assert_eq!(outcome.len(), 1);
    assert_eq!(outcome.discarded, 1);

    let binding = outcome.binding(&node("ahu1")).unwrap();
    let expected: Binding = [
        ("root", node("ahu1")),
        ("fan", node("ahu1_fan")),
        ("dat", node("dat1")),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_owned(), value))
    .collect();
    assert_eq!(binding, &expected);
    assert_eq!(binding.root(), Some(&node("ahu1")));
}

#[test]
fn rules_without_definitions_never_succeed() {
    let rule = RuleDefinition::new("Empty").applies_to("AHU");
    let report = RuleEvaluator::default().evaluate(&RuleSet::new().with_rule(rule), &ahu_store());

    let outcome = report.outcome("Empty").unwrap();
    assert!(outcome.is_empty());
    assert_eq!(outcome.discarded, 0);
    assert!(report.is_clean());
}

#[test]
fn rules_without_applicability_never_succeed() {
    let rule = RuleDefinition::new("Nowhere").define("dat", PatternNode::leaf("Point"));
    let report = RuleEvaluator::default().evaluate(&RuleSet::new().with_rule(rule), &ahu_store());
    assert!(report.outcome("Nowhere").unwrap().is_empty());
}

#[test]
fn outcomes_follow_rule_order() {
    let rules = RuleSet::new()
        .with_rule(RuleDefinition::new("B").applies_to("AHU"))
        .with_rule(ahu_rule())
        .with_rule(RuleDefinition::new("A").applies_to("AHU"));
    let report = RuleEvaluator::default().evaluate(&rules, &ahu_store());

    let names: Vec<_> = report.outcomes.iter().map(|o| o.rule.as_str()).collect();
    assert_eq!(names, vec!["B", "AHUBasics", "A"]);
    assert_eq!(report.success_count(), 1);
}

#[test]
fn compile_rule_covers_every_class_and_variable() {
    let rule = ahu_rule().applies_to("RTU");
    let steps = RuleEvaluator::default().compile_rule(&rule);

    let keys: Vec<_> = steps
        .iter()
        .map(|s| (s.class.as_str(), s.variable.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![("AHU", "fan"), ("AHU", "dat"), ("RTU", "fan"), ("RTU", "dat")]
    );
    assert!(steps.iter().all(|s| s.query.is_ok()));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn bad_class_fails_each_variable_step() {
    let rule = ahu_rule().applies_to("bad class");
    let report = RuleEvaluator::default().evaluate(&RuleSet::new().with_rule(rule), &ahu_store());

    let failures: Vec<_> = report.failures_for("AHUBasics").collect();
    assert_eq!(failures.len(), 2);
    assert!(failures.iter().all(|f| f.class.as_deref() == Some("bad class")));
    assert!(failures.iter().all(|f| f.error.category() == ErrorCategory::Compile));

    // The valid class still produced its instance.
    assert!(report.outcome("AHUBasics").unwrap().succeeded(&node("ahu1")));
}

#[test]
fn failures_carry_context() {
    let rule = RuleDefinition::new("Bad")
        .applies_to("AHU")
        .define("x", PatternNode::Choice(Vec::new()));
    let report = RuleEvaluator::default().evaluate(&RuleSet::new().with_rule(rule), &ahu_store());

    let failure = &report.failures[0];
    let context = failure.error.context.as_ref().unwrap();
    assert_eq!(context.rule.as_deref(), Some("Bad"));
    assert_eq!(context.class.as_deref(), Some("AHU"));
    assert_eq!(context.variable.as_deref(), Some("x"));
    let message = failure.to_string();
    assert!(message.contains("choice has no branches"));
    assert!(message.contains("in rule Bad, class AHU, variable x"));
}

#[test]
fn exhausted_time_limit_fails_steps() {
    let evaluator = RuleEvaluator::new(EvaluatorConfig::bounded(Duration::ZERO));
    let report = evaluator.evaluate(&RuleSet::new().with_rule(ahu_rule()), &ahu_store());

    assert_eq!(report.failures.len(), 2);
    assert!(report
        .failures
        .iter()
        .all(|f| matches!(f.error.kind, ErrorKind::QueryTimeout { .. })));
    assert!(report.outcome("AHUBasics").unwrap().is_empty());
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn custom_namespace_drives_compilation() {
    let ns = Namespace::new("urn:custom#");
    let mut graph = Graph::new();
    graph.add_type(node("pump1"), ns.iri("Pump")).unwrap();
    graph.add_type(node("s1"), ns.iri("Sensor")).unwrap();
    graph.insert(node("pump1"), ns.iri("hasPoint"), node("s1")).unwrap();

    let rule = RuleDefinition::new("Pumps")
        .applies_to("Pump")
        .define("s", PatternNode::leaf("Sensor"));
    let evaluator = RuleEvaluator::new(EvaluatorConfig::default().with_namespace(ns));
    let report = evaluator.evaluate(&RuleSet::new().with_rule(rule), &MemoryStore::new(graph));

    assert!(report.outcome("Pumps").unwrap().succeeded(&node("pump1")));
}

#[test]
fn rule_iris_use_the_prefix() {
    let config = EvaluatorConfig::default();
    assert_eq!(config.rule_iri("R1"), "urn:rules_manifest/R1");
    assert_eq!(
        config.with_rule_prefix("urn:x/").rule_iri("R1"),
        "urn:x/R1"
    );
}
