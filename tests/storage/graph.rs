//! Integration tests for the triple graph

use brickrules_foundation::vocab::rdf;
use brickrules_foundation::{ErrorKind, Iri, Namespace, Term};
use brickrules_storage::Graph;
use proptest::prelude::*;

fn node(name: &str) -> Term {
    Term::iri(format!("urn:bldg#{name}"))
}

fn has_point() -> Iri {
    Namespace::brick().iri("hasPoint")
}

// =============================================================================
// Insertion
// =============================================================================

#[test]
fn insert_is_idempotent() {
    let mut graph = Graph::new();
    assert!(graph.insert(node("vav1"), has_point(), node("p1")).unwrap());
    assert!(!graph.insert(node("vav1"), has_point(), node("p1")).unwrap());
    assert_eq!(graph.len(), 1);
}

#[test]
fn literal_subjects_are_rejected() {
    let mut graph = Graph::new();
    let err = graph
        .insert(Term::literal("x"), has_point(), node("p1"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedIdentifier { .. }));
    assert!(graph.is_empty());
}

// =============================================================================
// Lookups
// =============================================================================

#[test]
fn forward_and_reverse_lookups() {
    let mut graph = Graph::new();
    graph.insert(node("vav1"), has_point(), node("p1")).unwrap();
    graph.insert(node("vav2"), has_point(), node("p1")).unwrap();

    let objects: Vec<_> = graph.objects(&node("vav1"), &has_point()).collect();
    assert_eq!(objects, vec![&node("p1")]);

    let subjects: Vec<_> = graph.subjects(&has_point(), &node("p1")).collect();
    assert_eq!(subjects, vec![&node("vav1"), &node("vav2")]);

    let predicate = has_point();
    assert_eq!(graph.pairs(&predicate).count(), 2);
}

#[test]
fn type_assertions() {
    let vav = Namespace::brick().iri("VAV");
    let mut graph = Graph::new();
    graph.add_type(node("vav1"), vav.clone()).unwrap();

    assert!(graph.has_type(&node("vav1"), &vav));
    assert!(graph.contains(&node("vav1"), &Iri::new(rdf::TYPE), &Term::Iri(vav.clone())));
    let instances: Vec<_> = graph.instances_of(&vav).collect();
    assert_eq!(instances, vec![&node("vav1")]);
}

#[test]
fn nodes_cover_subjects_and_objects_in_order() {
    let mut graph = Graph::new();
    graph.insert(node("b"), has_point(), node("p")).unwrap();
    graph.insert(node("a"), has_point(), node("p")).unwrap();

    let nodes: Vec<_> = graph.nodes().into_iter().cloned().collect();
    assert_eq!(nodes, vec![node("a"), node("b"), node("p")]);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn len_counts_distinct_triples(edges in prop::collection::vec((0u8..6, 0u8..6), 0..40)) {
        let mut graph = Graph::new();
        let mut distinct = std::collections::BTreeSet::new();
        for (from, to) in &edges {
            graph
                .insert(node(&from.to_string()), has_point(), node(&to.to_string()))
                .unwrap();
            distinct.insert((from, to));
        }
        prop_assert_eq!(graph.len(), distinct.len());
        prop_assert_eq!(graph.pairs(&has_point()).count(), distinct.len());
    }
}
