//! Pattern grammar for variable definitions.
//!
//! A rule defines each of its variables with a pattern tree rooted at an
//! instance of the rule's applicable class. The JSON encoding is:
//!
//! ```text
//! "Chilled_Water_Valve_Command"                      ;; TypeLeaf
//! {"hasPoint": <pattern>}                            ;; Relationship
//! {"hasPart+": <pattern>}                            ;; Relationship with quantifier
//! {"Chilled_Water_Valve": <pattern>}                 ;; TypeConstraint
//! {"choice": [<pattern>, ...]}                       ;; Choice
//! {"hasPoint": <pattern>, "hasPart": <pattern>}      ;; All (one node per key)
//! ```

use std::fmt;

use brickrules_foundation::{Error, Result};
use serde_json::Value as Json;

use crate::ident;

// =============================================================================
// Relations and Quantifiers
// =============================================================================

/// The relationships a pattern may traverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    /// `hasPoint`
    HasPoint,
    /// `hasPart`
    HasPart,
    /// `isPointOf`
    IsPointOf,
    /// `isPartOf`
    IsPartOf,
    /// `feeds`
    Feeds,
}

impl Relation {
    /// Every relation, in declaration order.
    pub const ALL: [Relation; 5] = [
        Relation::HasPoint,
        Relation::HasPart,
        Relation::IsPointOf,
        Relation::IsPartOf,
        Relation::Feeds,
    ];

    /// The local name of the relation's predicate.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::HasPoint => "hasPoint",
            Self::HasPart => "hasPart",
            Self::IsPointOf => "isPointOf",
            Self::IsPartOf => "isPartOf",
            Self::Feeds => "feeds",
        }
    }

    /// Looks up a relation by its exact local name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Path modifier applied to a relationship traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Quantifier {
    /// Exactly one hop.
    #[default]
    One,
    /// `?` - zero or one hop.
    ZeroOrOne,
    /// `*` - zero or more hops.
    ZeroOrMore,
    /// `+` - one or more hops.
    OneOrMore,
}

impl Quantifier {
    /// The suffix written after the predicate.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::One => "",
            Self::ZeroOrOne => "?",
            Self::ZeroOrMore => "*",
            Self::OneOrMore => "+",
        }
    }

    /// Parses a suffix character.
    #[must_use]
    pub fn from_suffix(c: char) -> Option<Self> {
        match c {
            '?' => Some(Self::ZeroOrOne),
            '*' => Some(Self::ZeroOrMore),
            '+' => Some(Self::OneOrMore),
            _ => None,
        }
    }

    /// Whether a zero-length path satisfies this quantifier.
    #[must_use]
    pub fn allows_zero(self) -> bool {
        matches!(self, Self::ZeroOrOne | Self::ZeroOrMore)
    }

    /// Whether more than one hop satisfies this quantifier.
    #[must_use]
    pub fn allows_many(self) -> bool {
        matches!(self, Self::ZeroOrMore | Self::OneOrMore)
    }
}

// =============================================================================
// Pattern Nodes
// =============================================================================

/// A node of a variable-definition pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternNode {
    /// The current node has this type; terminal.
    TypeLeaf(String),
    /// The current node has this type, then `child` matches at the same node.
    TypeConstraint {
        /// Class identifier.
        class: String,
        /// Pattern continuing at the same node.
        child: Box<PatternNode>,
    },
    /// An edge from the current node, then `child` matches at the far end.
    Relationship {
        /// The relationship traversed.
        relation: Relation,
        /// Path modifier.
        quantifier: Quantifier,
        /// Pattern matched at the far end.
        child: Box<PatternNode>,
    },
    /// Any one branch matches.
    Choice(Vec<PatternNode>),
    /// Every child matches at the same node.
    All(Vec<PatternNode>),
}

impl PatternNode {
    /// Creates a type leaf.
    #[must_use]
    pub fn leaf(class: impl Into<String>) -> Self {
        Self::TypeLeaf(class.into())
    }

    /// Creates a type constraint.
    #[must_use]
    pub fn constrained(class: impl Into<String>, child: PatternNode) -> Self {
        Self::TypeConstraint {
            class: class.into(),
            child: Box::new(child),
        }
    }

    /// Creates a single-hop relationship.
    #[must_use]
    pub fn related(relation: Relation, child: PatternNode) -> Self {
        Self::related_with(relation, Quantifier::One, child)
    }

    /// Creates a relationship with a path modifier.
    #[must_use]
    pub fn related_with(relation: Relation, quantifier: Quantifier, child: PatternNode) -> Self {
        Self::Relationship {
            relation,
            quantifier,
            child: Box::new(child),
        }
    }

    /// Whether this node is a bare type leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::TypeLeaf(_))
    }

    /// Number of relationship nodes in the tree.
    #[must_use]
    pub fn relationship_count(&self) -> usize {
        match self {
            Self::TypeLeaf(_) => 0,
            Self::TypeConstraint { child, .. } => child.relationship_count(),
            Self::Relationship { child, .. } => 1 + child.relationship_count(),
            Self::Choice(nodes) | Self::All(nodes) => {
                nodes.iter().map(Self::relationship_count).sum()
            }
        }
    }

    /// Every class identifier named in the tree, in pre-order.
    #[must_use]
    pub fn class_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_class_names(&mut names);
        names
    }

    fn collect_class_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::TypeLeaf(class) => out.push(class),
            Self::TypeConstraint { class, child } => {
                out.push(class);
                child.collect_class_names(out);
            }
            Self::Relationship { child, .. } => child.collect_class_names(out),
            Self::Choice(nodes) | Self::All(nodes) => {
                for node in nodes {
                    node.collect_class_names(out);
                }
            }
        }
    }

    /// Parses a JSON pattern.
    ///
    /// `path` names the location of `json` in the document and is carried in
    /// error messages.
    ///
    /// # Errors
    ///
    /// Returns an error if a key looks like a relationship but is not one, if
    /// a `choice` is not a non-empty list, or if a value is neither a class
    /// name nor an object.
    pub fn from_json(json: &Json, path: &str) -> Result<Self> {
        match json {
            Json::String(class) => Ok(Self::TypeLeaf(class.clone())),
            Json::Object(entries) => {
                if entries.is_empty() {
                    return Err(Error::invalid_pattern(path, "empty pattern object"));
                }
                let mut nodes = entries
                    .iter()
                    .map(|(key, value)| Self::from_entry(key, value, path))
                    .collect::<Result<Vec<_>>>()?;
                if nodes.len() == 1 {
                    Ok(nodes.remove(0))
                } else {
                    Ok(Self::All(nodes))
                }
            }
            other => Err(Error::invalid_pattern(
                path,
                format!(
                    "expected a class name or pattern object, found {}",
                    json_kind(other)
                ),
            )),
        }
    }

    fn from_entry(key: &str, value: &Json, path: &str) -> Result<Self> {
        let here = format!("{path}.{key}");

        if key == "choice" {
            let Json::Array(branches) = value else {
                return Err(Error::invalid_pattern(here, "choice must be a list"));
            };
            if branches.is_empty() {
                return Err(Error::invalid_pattern(here, "choice has no branches"));
            }
            let branches = branches
                .iter()
                .enumerate()
                .map(|(i, branch)| Self::from_json(branch, &format!("{here}[{i}]")))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Self::Choice(branches));
        }

        if let Some((relation, quantifier)) = parse_relationship_key(key) {
            let child = Self::from_json(value, &here)?;
            return Ok(Self::related_with(relation, quantifier, child));
        }

        if looks_like_relationship(key) {
            return Err(Error::unknown_relationship(key, path));
        }

        let child = Self::from_json(value, &here)?;
        Ok(Self::constrained(key, child))
    }
}

/// Splits a key such as `hasPart+` into its relation and quantifier.
#[must_use]
pub fn parse_relationship_key(key: &str) -> Option<(Relation, Quantifier)> {
    let (base, quantifier) = match key.chars().last().and_then(Quantifier::from_suffix) {
        Some(q) => (&key[..key.len() - 1], q),
        None => (key, Quantifier::One),
    };
    Relation::from_name(base).map(|r| (r, quantifier))
}

/// Keys that must name a relationship rather than a class.
///
/// Class names in the building vocabulary are capitalized; relationship names
/// are lower camel case. Quantifier suffixes only apply to relationships.
/// Absolute IRIs always name a class.
fn looks_like_relationship(key: &str) -> bool {
    if ident::is_absolute_iri(key) {
        return false;
    }
    key.starts_with(|c: char| c.is_ascii_lowercase())
        || key.ends_with(|c: char| Quantifier::from_suffix(c).is_some())
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "a list",
        Json::Object(_) => "an object",
    }
}
