//! Vocabulary constants and namespaces.

use std::fmt;
use std::sync::Arc;

use crate::term::Iri;

/// The Brick schema namespace.
pub const BRICK: &str = "https://brickschema.org/schema/Brick#";

/// RDF vocabulary.
pub mod rdf {
    /// The RDF namespace.
    pub const NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// `rdf:type`
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdf:first`
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    /// `rdf:rest`
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    /// `rdf:nil`
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
}

/// SHACL vocabulary used by shape composition.
pub mod sh {
    /// The SHACL namespace.
    pub const NAMESPACE: &str = "http://www.w3.org/ns/shacl#";
    /// `sh:property`
    pub const PROPERTY: &str = "http://www.w3.org/ns/shacl#property";
    /// `sh:node`
    pub const NODE: &str = "http://www.w3.org/ns/shacl#node";
    /// `sh:or`
    pub const OR: &str = "http://www.w3.org/ns/shacl#or";
    /// `sh:and`
    pub const AND: &str = "http://www.w3.org/ns/shacl#and";
    /// `sh:xone`
    pub const XONE: &str = "http://www.w3.org/ns/shacl#xone";
}

/// A namespace IRI that local names are appended to.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Namespace(Arc<str>);

impl Namespace {
    /// Creates a namespace from its base IRI.
    #[must_use]
    pub fn new(base: impl Into<Arc<str>>) -> Self {
        Self(base.into())
    }

    /// The Brick schema namespace.
    #[must_use]
    pub fn brick() -> Self {
        Self::new(BRICK)
    }

    /// Returns the base IRI.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves a local name to a full IRI.
    #[must_use]
    pub fn iri(&self, local: &str) -> Iri {
        Iri::new(format!("{}{local}", self.0))
    }

    /// Whether the IRI lives in this namespace.
    #[must_use]
    pub fn contains(&self, iri: &Iri) -> bool {
        iri.as_str().starts_with(&*self.0)
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::brick()
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Namespace(<{}>)", self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Namespace {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Namespace {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::new(<String as serde::Deserialize>::deserialize(deserializer)?))
    }
}
