//! The chilled water valve rule against small buildings

use brickrules_engine::{MemoryStore, RuleEvaluator};
use brickrules_language::RuleSet;
use brickrules_storage::Graph;

use crate::{CHW_RULES, link, node, typed};

fn evaluate(graph: Graph) -> brickrules_engine::EvaluationReport {
    let loaded = RuleSet::from_json_str(CHW_RULES).unwrap();
    RuleEvaluator::default().evaluate_document(loaded, &MemoryStore::new(graph))
}

// =============================================================================
// Success
// =============================================================================

#[test]
fn valve_part_with_command_satisfies_rule() {
    let mut graph = Graph::new();
    typed(&mut graph, "vav1", "VAV");
    typed(&mut graph, "valve1", "Chilled_Water_Valve");
    typed(&mut graph, "cmd1", "Valve_Command");
    link(&mut graph, "vav1", "hasPart", "valve1");
    link(&mut graph, "valve1", "hasPoint", "cmd1");

    let report = evaluate(graph);
    let outcome = report.outcome("CHWValveRule").unwrap();

    assert!(report.is_clean());
    assert_eq!(outcome.len(), 1);
    let binding = outcome.binding(&node("vav1")).unwrap();
    assert_eq!(binding.len(), 2);
    assert_eq!(binding.root(), Some(&node("vav1")));
    assert_eq!(binding.get("chw"), Some(&node("cmd1")));
    assert_eq!(outcome.rule_iri, "urn:rules_manifest/CHWValveRule");
}

#[test]
fn direct_command_satisfies_rule() {
    let mut graph = Graph::new();
    typed(&mut graph, "vav1", "VAV");
    typed(&mut graph, "cmd1", "Chilled_Water_Valve_Command");
    link(&mut graph, "vav1", "hasPoint", "cmd1");

    let report = evaluate(graph);
    let binding = report
        .outcome("CHWValveRule")
        .unwrap()
        .binding(&node("vav1"))
        .cloned()
        .unwrap();
    assert_eq!(binding.get("chw"), Some(&node("cmd1")));
}

// =============================================================================
// Failure
// =============================================================================

#[test]
fn valve_without_command_fails_rule() {
    let mut graph = Graph::new();
    typed(&mut graph, "vav1", "VAV");
    typed(&mut graph, "valve1", "Chilled_Water_Valve");
    typed(&mut graph, "sensor1", "Valve_Position_Sensor");
    link(&mut graph, "vav1", "hasPart", "valve1");
    link(&mut graph, "valve1", "hasPoint", "sensor1");

    let report = evaluate(graph);
    let outcome = report.outcome("CHWValveRule").unwrap();

    assert!(report.is_clean());
    assert!(outcome.is_empty());
    assert!(!outcome.succeeded(&node("vav1")));
    assert_eq!(report.success_count(), 0);
}

#[test]
fn command_on_wrong_equipment_fails_rule() {
    let mut graph = Graph::new();
    typed(&mut graph, "vav1", "VAV");
    typed(&mut graph, "ahu1", "AHU");
    typed(&mut graph, "cmd1", "Chilled_Water_Valve_Command");
    link(&mut graph, "ahu1", "hasPoint", "cmd1");

    let report = evaluate(graph);
    assert!(report.outcome("CHWValveRule").unwrap().is_empty());
}

#[test]
fn each_vav_is_judged_separately() {
    let mut graph = Graph::new();
    for vav in ["vav1", "vav2", "vav3"] {
        typed(&mut graph, vav, "VAV");
    }
    typed(&mut graph, "cmd1", "Chilled_Water_Valve_Command");
    typed(&mut graph, "valve3", "Chilled_Water_Valve");
    typed(&mut graph, "cmd3", "Valve_Command");
    link(&mut graph, "vav1", "hasPoint", "cmd1");
    link(&mut graph, "vav3", "hasPart", "valve3");
    link(&mut graph, "valve3", "hasPoint", "cmd3");

    let report = evaluate(graph);
    let outcome = report.outcome("CHWValveRule").unwrap();

    let instances: Vec<_> = outcome.instances.keys().cloned().collect();
    assert_eq!(instances, vec![node("vav1"), node("vav3")]);
}
