//! Compiled queries.
//!
//! A [`CompiledQuery`] keeps both the rendered query text handed to external
//! stores and the [`GraphPattern`] algebra it was rendered from, so in-process
//! stores can execute it without re-parsing.

use std::collections::BTreeSet;
use std::fmt::{self, Write as _};
use std::sync::Arc;

use brickrules_foundation::Iri;
use brickrules_foundation::vocab::rdf;
use brickrules_language::Quantifier;

// =============================================================================
// Variables
// =============================================================================

/// A query variable, stored without its `?` sigil.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(Arc<str>);

impl Variable {
    /// Name of the variable bound to the rule's applicable instance.
    pub const ROOT: &'static str = "root";

    /// Creates a variable.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// The `root` variable.
    #[must_use]
    pub fn root() -> Self {
        Self::new(Self::ROOT)
    }

    /// Returns the name without sigil.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the `root` variable.
    #[must_use]
    pub fn is_root(&self) -> bool {
        &*self.0 == Self::ROOT
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

// =============================================================================
// Graph Patterns
// =============================================================================

/// One element of a query's WHERE clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphPattern {
    /// `?subject rdf:type <class>`
    Type {
        /// The typed node.
        subject: Variable,
        /// The asserted class.
        class: Iri,
    },
    /// `?subject <predicate><quantifier> ?object`
    Edge {
        /// Start of the traversal.
        subject: Variable,
        /// Relationship predicate.
        predicate: Iri,
        /// Path modifier.
        quantifier: Quantifier,
        /// End of the traversal.
        object: Variable,
    },
    /// Disjunction of groups; each group is a conjunction.
    Union(Vec<Vec<GraphPattern>>),
}

impl GraphPattern {
    /// Whether this is a type assertion.
    #[must_use]
    pub fn is_type(&self) -> bool {
        matches!(self, Self::Type { .. })
    }

    /// Whether this is a relationship edge.
    #[must_use]
    pub fn is_edge(&self) -> bool {
        matches!(self, Self::Edge { .. })
    }

    /// Variables mentioned by this pattern, including inside unions.
    pub fn collect_variables<'a>(&'a self, out: &mut BTreeSet<&'a Variable>) {
        match self {
            Self::Type { subject, .. } => {
                out.insert(subject);
            }
            Self::Edge {
                subject, object, ..
            } => {
                out.insert(subject);
                out.insert(object);
            }
            Self::Union(groups) => {
                for pattern in groups.iter().flatten() {
                    pattern.collect_variables(out);
                }
            }
        }
    }

    fn render(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        match self {
            Self::Type { subject, class } => {
                let _ = writeln!(out, "{indent}{subject} <{}> {} .", rdf::TYPE, class.to_n3());
            }
            Self::Edge {
                subject,
                predicate,
                quantifier,
                object,
            } => {
                let _ = writeln!(
                    out,
                    "{indent}{subject} {}{} {object} .",
                    predicate.to_n3(),
                    quantifier.suffix()
                );
            }
            Self::Union(groups) => {
                let _ = writeln!(out, "{indent}{{");
                for (i, group) in groups.iter().enumerate() {
                    if i > 0 {
                        let _ = writeln!(out, "{indent}  UNION");
                    }
                    let _ = writeln!(out, "{indent}  {{");
                    for pattern in group {
                        pattern.render(out, depth + 2);
                    }
                    let _ = writeln!(out, "{indent}  }}");
                }
                let _ = writeln!(out, "{indent}}}");
            }
        }
    }
}

// =============================================================================
// Compiled Query
// =============================================================================

/// A compiled query ready for execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledQuery {
    /// Rendered query text
    text: String,
    /// Selected variables: `root` then the target
    projection: Vec<Variable>,
    /// WHERE clause algebra
    patterns: Vec<GraphPattern>,
    /// The applicable class
    class: Iri,
    /// The variable being defined
    target: Variable,
}

impl CompiledQuery {
    /// Assembles a query and renders its text.
    #[must_use]
    pub fn new(class: Iri, target: Variable, patterns: Vec<GraphPattern>) -> Self {
        let projection = vec![Variable::root(), target.clone()];
        let text = render(&projection, &patterns);
        Self {
            text,
            projection,
            patterns,
            class,
            target,
        }
    }

    /// The rendered query text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The selected variables.
    #[must_use]
    pub fn projection(&self) -> &[Variable] {
        &self.projection
    }

    /// The WHERE clause.
    #[must_use]
    pub fn patterns(&self) -> &[GraphPattern] {
        &self.patterns
    }

    /// The class whose instances bind `root`.
    #[must_use]
    pub fn class(&self) -> &Iri {
        &self.class
    }

    /// The variable being defined.
    #[must_use]
    pub fn target(&self) -> &Variable {
        &self.target
    }

    /// Every type assertion and edge, flattened out of unions.
    #[must_use]
    pub fn triples(&self) -> Vec<&GraphPattern> {
        fn walk<'a>(patterns: &'a [GraphPattern], out: &mut Vec<&'a GraphPattern>) {
            for pattern in patterns {
                match pattern {
                    GraphPattern::Union(groups) => {
                        for group in groups {
                            walk(group, out);
                        }
                    }
                    other => out.push(other),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.patterns, &mut out);
        out
    }

    /// Variables the compiler generated, excluding `root` and the target.
    #[must_use]
    pub fn fresh_variables(&self) -> BTreeSet<&Variable> {
        let mut vars = BTreeSet::new();
        for pattern in &self.patterns {
            pattern.collect_variables(&mut vars);
        }
        vars.retain(|v| !v.is_root() && *v != &self.target);
        vars
    }
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn render(projection: &[Variable], patterns: &[GraphPattern]) -> String {
    let mut out = String::from("SELECT");
    for var in projection {
        let _ = write!(out, " {var}");
    }
    out.push_str(" WHERE {\n");
    for pattern in patterns {
        pattern.render(&mut out, 1);
    }
    out.push('}');
    out
}
