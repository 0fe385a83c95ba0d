//! Integration tests for terms and namespaces

use brickrules_foundation::vocab::{BRICK, rdf};
use brickrules_foundation::{Iri, Namespace, Term};

// =============================================================================
// IRIs
// =============================================================================

#[test]
fn iri_local_name() {
    assert_eq!(Iri::new(rdf::TYPE).local_name(), "type");
    assert_eq!(Iri::new("urn:bldg/vav1").local_name(), "vav1");
    assert_eq!(Iri::new("opaque").local_name(), "opaque");
}

#[test]
fn iri_n3_form() {
    assert_eq!(Iri::new("urn:a").to_n3(), "<urn:a>");
}

#[test]
fn namespace_resolves_local_names() {
    let brick = Namespace::brick();
    assert_eq!(brick.as_str(), BRICK);
    assert_eq!(
        brick.iri("VAV").as_str(),
        "https://brickschema.org/schema/Brick#VAV"
    );
    assert!(brick.contains(&brick.iri("hasPoint")));
    assert!(!brick.contains(&Iri::new(rdf::TYPE)));
}

// =============================================================================
// Terms
// =============================================================================

#[test]
fn term_display_forms() {
    assert_eq!(Term::iri("urn:a").to_string(), "urn:a");
    assert_eq!(Term::blank("b0").to_string(), "_:b0");
    assert_eq!(Term::literal("42").to_string(), "\"42\"");
}

#[test]
fn term_parses_its_display_form() {
    for term in [Term::iri("urn:a"), Term::blank("b0"), Term::literal("x y")] {
        let parsed: Term = term.to_string().parse().unwrap();
        assert_eq!(parsed, term);
    }
    assert!("".parse::<Term>().is_err());
    assert!("_:".parse::<Term>().is_err());
    assert!("has space".parse::<Term>().is_err());
}

#[test]
fn terms_order_iris_before_blanks_before_literals() {
    let mut terms = vec![Term::literal("a"), Term::blank("a"), Term::iri("urn:z")];
    terms.sort();
    assert_eq!(
        terms,
        vec![Term::iri("urn:z"), Term::blank("a"), Term::literal("a")]
    );
}

#[test]
fn only_literals_are_not_resources() {
    assert!(Term::iri("urn:a").is_resource());
    assert!(Term::blank("b").is_resource());
    assert!(!Term::literal("x").is_resource());
    assert_eq!(Term::iri("urn:a").as_iri(), Some(&Iri::new("urn:a")));
    assert_eq!(Term::blank("b").as_iri(), None);
}
