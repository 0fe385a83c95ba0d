//! Shape containment.
//!
//! A shape `S` encloses a shape `X` when `S` reaches `X` through
//! `sh:property` or `sh:node`, optionally via one of the composition
//! operators `sh:or`, `sh:and`, `sh:xone`. Composition operators point at RDF
//! lists, so membership is found by walking `rdf:first`/`rdf:rest` back to
//! the list head.

use std::collections::BTreeSet;

use brickrules_foundation::vocab::{rdf, sh};
use brickrules_foundation::{Iri, Term};
use brickrules_storage::Graph;

/// A graph of shape definitions.
pub trait ShapeGraph {
    /// Shapes that directly enclose `shape`, in ascending term order.
    fn enclosing_shapes(&self, shape: &Term) -> Vec<Term>;
}

impl<G: ShapeGraph + ?Sized> ShapeGraph for &G {
    fn enclosing_shapes(&self, shape: &Term) -> Vec<Term> {
        (**self).enclosing_shapes(shape)
    }
}

fn composition_operators() -> [Iri; 3] {
    [Iri::new(sh::OR), Iri::new(sh::AND), Iri::new(sh::XONE)]
}

impl ShapeGraph for Graph {
    fn enclosing_shapes(&self, shape: &Term) -> Vec<Term> {
        let property = Iri::new(sh::PROPERTY);
        let node = Iri::new(sh::NODE);
        let operators = composition_operators();

        let mut found: BTreeSet<&Term> = BTreeSet::new();

        // S sh:property X, S sh:node X
        let holders: Vec<&Term> = self.subjects(&property, shape).collect();
        found.extend(holders.iter().copied());
        found.extend(self.subjects(&node, shape));

        // S op X
        for op in &operators {
            found.extend(self.subjects(op, shape));
        }

        // S op M, M sh:property X
        for holder in &holders {
            for op in &operators {
                found.extend(self.subjects(op, holder));
            }
        }

        // X is a member of a list that S composes
        for head in list_heads(self, shape) {
            for op in &operators {
                found.extend(self.subjects(op, head));
            }
        }

        found.into_iter().cloned().collect()
    }
}

/// Every list cell from which `member` is reachable through `rdf:rest*/rdf:first`.
fn list_heads<'g>(graph: &'g Graph, member: &Term) -> BTreeSet<&'g Term> {
    let first = Iri::new(rdf::FIRST);
    let rest = Iri::new(rdf::REST);

    let mut cells = BTreeSet::new();
    let mut pending: Vec<&Term> = graph.subjects(&first, member).collect();
    while let Some(cell) = pending.pop() {
        if cells.insert(cell) {
            pending.extend(graph.subjects(&rest, cell));
        }
    }
    cells
}
