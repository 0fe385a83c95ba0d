//! RDF terms: IRIs, blank nodes, and literals.
//!
//! Terms are cheap to clone (shared `Arc<str>` storage) and totally ordered,
//! so every map keyed by a term iterates deterministically.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};

/// An absolute IRI.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(Arc<str>);

impl Iri {
    /// Creates an IRI from its full text.
    #[must_use]
    pub fn new(iri: impl Into<Arc<str>>) -> Self {
        Self(iri.into())
    }

    /// Returns the IRI text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the part after the last `#` or `/`.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.0
            .rfind(['#', '/'])
            .map_or(&*self.0, |idx| &self.0[idx + 1..])
    }

    /// Renders the IRI in N3/SPARQL form: `<iri>`.
    #[must_use]
    pub fn to_n3(&self) -> String {
        format!("<{}>", self.0)
    }
}

impl fmt::Debug for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A node or value in a graph.
///
/// Ordering is IRIs first, then blank nodes, then literals; lexical within
/// each variant.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// A named node.
    Iri(Iri),
    /// A blank node, by label.
    Blank(Arc<str>),
    /// A plain literal, by lexical form.
    Literal(Arc<str>),
}

impl Term {
    /// Creates an IRI term.
    #[must_use]
    pub fn iri(iri: impl Into<Arc<str>>) -> Self {
        Self::Iri(Iri::new(iri))
    }

    /// Creates a blank node term.
    #[must_use]
    pub fn blank(label: impl Into<Arc<str>>) -> Self {
        Self::Blank(label.into())
    }

    /// Creates a literal term.
    #[must_use]
    pub fn literal(value: impl Into<Arc<str>>) -> Self {
        Self::Literal(value.into())
    }

    /// Returns the IRI if this term is one.
    #[must_use]
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Whether this term may appear in subject position.
    #[must_use]
    pub fn is_resource(&self) -> bool {
        !matches!(self, Self::Literal(_))
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "{iri:?}"),
            Self::Blank(label) => write!(f, "_:{label}"),
            Self::Literal(value) => write!(f, "{value:?}"),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "{iri}"),
            Self::Blank(label) => write!(f, "_:{label}"),
            Self::Literal(value) => write!(f, "\"{value}\""),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

impl FromStr for Term {
    type Err = Error;

    /// Parses the `Display` form back into a term.
    fn from_str(s: &str) -> Result<Self> {
        if let Some(label) = s.strip_prefix("_:") {
            if label.is_empty() {
                return Err(Error::malformed_identifier(s, "term"));
            }
            return Ok(Self::blank(label));
        }
        if let Some(inner) = s.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
            return Ok(Self::literal(inner));
        }
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(Error::malformed_identifier(s, "term"));
        }
        Ok(Self::iri(s))
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Iri, Term};

    // Terms serialize as their display string so they can key JSON maps.
    impl Serialize for Term {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Term {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(D::Error::custom)
        }
    }

    impl Serialize for Iri {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.as_str())
        }
    }

    impl<'de> Deserialize<'de> for Iri {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Ok(Iri::new(String::deserialize(deserializer)?))
        }
    }
}
