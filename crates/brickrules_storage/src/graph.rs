//! Triple storage with bidirectional indices.
//!
//! Triples connect resources with typed edges. Bidirectional indices allow
//! traversal in both directions:
//! - Forward: subject -> predicate -> objects
//! - Reverse: object -> predicate -> subjects
//!
//! Indices are ordered so every traversal is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use brickrules_foundation::vocab::rdf;
use brickrules_foundation::{Error, Iri, Result, Term};

type Index = BTreeMap<Term, BTreeMap<Iri, BTreeSet<Term>>>;

/// An in-memory set of triples.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    /// Forward index: subject -> predicate -> set of objects.
    forward: Index,
    /// Reverse index: object -> predicate -> set of subjects.
    reverse: Index,
    /// Number of distinct triples.
    len: usize,
}

impl Graph {
    /// Creates a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple. Returns `false` if it was already present.
    ///
    /// # Errors
    ///
    /// Returns an error if the subject is a literal.
    pub fn insert(&mut self, subject: Term, predicate: Iri, object: Term) -> Result<bool> {
        if !subject.is_resource() {
            return Err(Error::malformed_identifier(
                subject.to_string(),
                "triple subject",
            ));
        }

        let added = self
            .forward
            .entry(subject.clone())
            .or_default()
            .entry(predicate.clone())
            .or_default()
            .insert(object.clone());
        if !added {
            return Ok(false);
        }

        self.reverse
            .entry(object)
            .or_default()
            .entry(predicate)
            .or_default()
            .insert(subject);
        self.len += 1;
        Ok(true)
    }

    /// Adds an `rdf:type` assertion.
    ///
    /// # Errors
    ///
    /// Returns an error if the subject is a literal.
    pub fn add_type(&mut self, subject: Term, class: Iri) -> Result<bool> {
        self.insert(subject, Iri::new(rdf::TYPE), Term::Iri(class))
    }

    /// Checks whether a triple is present.
    #[must_use]
    pub fn contains(&self, subject: &Term, predicate: &Iri, object: &Term) -> bool {
        self.forward
            .get(subject)
            .and_then(|m| m.get(predicate))
            .is_some_and(|objects| objects.contains(object))
    }

    /// Objects reachable from `subject` over one `predicate` edge.
    pub fn objects<'a>(
        &'a self,
        subject: &Term,
        predicate: &Iri,
    ) -> impl Iterator<Item = &'a Term> + use<'a> {
        self.forward
            .get(subject)
            .and_then(|m| m.get(predicate))
            .into_iter()
            .flatten()
    }

    /// Subjects pointing at `object` over one `predicate` edge.
    pub fn subjects<'a>(
        &'a self,
        predicate: &Iri,
        object: &Term,
    ) -> impl Iterator<Item = &'a Term> + use<'a> {
        self.reverse
            .get(object)
            .and_then(|m| m.get(predicate))
            .into_iter()
            .flatten()
    }

    /// All `(subject, object)` pairs linked by `predicate`.
    pub fn pairs<'a>(
        &'a self,
        predicate: &'a Iri,
    ) -> impl Iterator<Item = (&'a Term, &'a Term)> + use<'a> {
        self.forward.iter().flat_map(move |(subject, by_predicate)| {
            by_predicate
                .get(predicate)
                .into_iter()
                .flatten()
                .map(move |object| (subject, object))
        })
    }

    /// Resources asserted to have the given type.
    pub fn instances_of<'a>(&'a self, class: &Iri) -> impl Iterator<Item = &'a Term> + use<'a> {
        self.subjects(&Iri::new(rdf::TYPE), &Term::Iri(class.clone()))
    }

    /// Whether `subject` is asserted to have the given type.
    #[must_use]
    pub fn has_type(&self, subject: &Term, class: &Iri) -> bool {
        self.contains(subject, &Iri::new(rdf::TYPE), &Term::Iri(class.clone()))
    }

    /// Every term appearing as a subject or object, in order.
    #[must_use]
    pub fn nodes(&self) -> BTreeSet<&Term> {
        self.forward.keys().chain(self.reverse.keys()).collect()
    }

    /// Number of triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the graph holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
