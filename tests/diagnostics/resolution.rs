//! Integration tests for shape resolution

use brickrules_diagnostics::{ResolutionSession, ResolverConfig, ShapeGraph};
use brickrules_foundation::vocab::sh;
use brickrules_foundation::{ErrorCategory, ErrorKind};
use brickrules_storage::Graph;

use crate::{link, list, rule_shapes, shape};

// =============================================================================
// Enclosing Shapes
// =============================================================================

#[test]
fn list_members_are_enclosed_by_the_composing_shape() {
    let graph = rule_shapes();
    assert_eq!(graph.enclosing_shapes(&shape("BranchA")), vec![shape("Prop")]);
    assert_eq!(graph.enclosing_shapes(&shape("BranchB")), vec![shape("Prop")]);
    assert_eq!(graph.enclosing_shapes(&shape("Prop")), vec![shape("Rule")]);
    assert!(graph.enclosing_shapes(&shape("Rule")).is_empty());
}

#[test]
fn operators_over_property_holders_enclose() {
    let mut graph = Graph::new();
    // Outer sh:and Holder, Holder sh:property X
    link(&mut graph, &shape("Holder"), sh::PROPERTY, &shape("X"));
    link(&mut graph, &shape("Outer"), sh::AND, &shape("Holder"));

    assert_eq!(
        graph.enclosing_shapes(&shape("X")),
        vec![shape("Holder"), shape("Outer")]
    );
    assert_eq!(graph.enclosing_shapes(&shape("Holder")), vec![shape("Outer")]);
}

#[test]
fn xone_lists_enclose() {
    let mut graph = Graph::new();
    let head = list(&mut graph, "x", &[shape("One"), shape("Two"), shape("Three")]);
    link(&mut graph, &shape("Either"), sh::XONE, &head);

    assert_eq!(graph.enclosing_shapes(&shape("Three")), vec![shape("Either")]);
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn nested_shapes_resolve_to_the_rule() {
    let graph = rule_shapes();
    let mut session = ResolutionSession::new(&graph);

    for failed in ["Inner", "BranchA", "BranchB", "Prop", "Rule"] {
        assert_eq!(session.resolve(&shape(failed)).unwrap(), shape("Rule"), "{failed}");
    }
}

#[test]
fn operator_over_property_holder_resolves_to_the_operator() {
    let mut graph = Graph::new();
    // S sh:or M, M sh:property X
    link(&mut graph, &shape("M"), sh::PROPERTY, &shape("X"));
    link(&mut graph, &shape("S"), sh::OR, &shape("M"));

    let mut session = ResolutionSession::new(&graph);
    assert_eq!(session.resolve(&shape("X")).unwrap(), shape("S"));
    assert_eq!(session.resolve(&shape("M")).unwrap(), shape("S"));
}

#[test]
fn chain_is_cached_after_one_walk() {
    let graph = rule_shapes();
    let mut session = ResolutionSession::new(&graph);

    session.resolve(&shape("Inner")).unwrap();
    assert_eq!(session.misses(), 1);
    for step in ["Inner", "BranchB", "Prop", "Rule"] {
        assert!(session.is_cached(&shape(step)), "{step}");
    }
    assert!(!session.is_cached(&shape("BranchA")));

    session.resolve(&shape("Prop")).unwrap();
    assert_eq!(session.hits(), 1);
    assert_eq!(session.cache_len(), 4);
}

#[test]
fn smallest_enclosing_shape_wins() {
    let mut graph = Graph::new();
    link(&mut graph, &shape("Zeta"), sh::PROPERTY, &shape("X"));
    link(&mut graph, &shape("Alpha"), sh::NODE, &shape("X"));

    let mut session = ResolutionSession::new(&graph);
    assert_eq!(session.resolve(&shape("X")).unwrap(), shape("Alpha"));
}

#[test]
fn loops_report_last_known_shape() {
    let mut graph = Graph::new();
    link(&mut graph, &shape("A"), sh::PROPERTY, &shape("B"));
    link(&mut graph, &shape("B"), sh::PROPERTY, &shape("C"));
    link(&mut graph, &shape("C"), sh::PROPERTY, &shape("A"));

    let mut session = ResolutionSession::new(&graph);
    let unresolved = session.resolve(&shape("A")).unwrap_err();

    assert_eq!(unresolved.last_known, shape("B"));
    assert!(matches!(unresolved.error.kind, ErrorKind::ResolutionLoop { steps: 2, .. }));
    assert_eq!(unresolved.error.category(), ErrorCategory::Resolution);
    assert!(!session.is_cached(&shape("A")));
}

#[test]
fn depth_limit_stops_long_chains() {
    let mut graph = Graph::new();
    for i in 0..20 {
        link(
            &mut graph,
            &shape(&format!("S{}", i + 1)),
            sh::NODE,
            &shape(&format!("S{i}")),
        );
    }

    let mut shallow = ResolutionSession::with_config(&graph, ResolverConfig::shallow());
    let unresolved = shallow.resolve(&shape("S0")).unwrap_err();
    assert_eq!(unresolved.last_known, shape("S8"));

    let mut deep = ResolutionSession::new(&graph);
    assert_eq!(deep.resolve(&shape("S0")).unwrap(), shape("S20"));
    assert_eq!(deep.config().max_depth, 64);
}
