//! Pattern compilation.
//!
//! Turns one [`PatternNode`] tree into a [`CompiledQuery`] selecting
//! `(root, target)` pairs for instances of one class. Every relationship into
//! a non-leaf child introduces a fresh variable drawn from a per-query
//! [`GensymGenerator`], so intermediate nodes never capture `root` or the
//! target.

use brickrules_foundation::{Error, Iri, Namespace, Result};
use brickrules_language::ident::{check_variable, resolve_class};
use brickrules_language::{GensymGenerator, PatternNode, Quantifier, Relation};

use crate::query::{CompiledQuery, GraphPattern, Variable};

/// Base name for generated intermediate variables.
const FRESH_BASE: &str = "node";

// =============================================================================
// Query Compiler
// =============================================================================

/// Compiles variable-definition patterns into queries.
#[derive(Clone, Debug, Default)]
pub struct QueryCompiler {
    namespace: Namespace,
}

impl QueryCompiler {
    /// Creates a compiler resolving local names against `namespace`.
    #[must_use]
    pub fn new(namespace: Namespace) -> Self {
        Self { namespace }
    }

    /// The namespace local names resolve against.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Compiles `pattern` as the definition of `target` for instances of
    /// `class`.
    ///
    /// # Errors
    ///
    /// Returns an error if `class` or any class in the pattern is not a valid
    /// identifier, if `target` is not a valid variable name or is `root`, or
    /// if a choice or conjunction is empty.
    pub fn compile(&self, class: &str, pattern: &PatternNode, target: &str) -> Result<CompiledQuery> {
        if target == Variable::ROOT {
            return Err(Error::reserved_variable(target));
        }
        check_variable(target, "definitions")?;
        let class_iri = resolve_class(class, &self.namespace, "applicability")?;

        let mut gensym = GensymGenerator::new();
        gensym.reserve(Variable::ROOT);
        gensym.reserve(target);

        let mut compilation = Compilation {
            namespace: &self.namespace,
            target: Variable::new(target),
            gensym,
        };

        let root = Variable::root();
        let mut patterns = vec![GraphPattern::Type {
            subject: root.clone(),
            class: class_iri.clone(),
        }];
        compilation.node(pattern, &root, &format!("definitions.{target}"), &mut patterns)?;

        Ok(CompiledQuery::new(class_iri, compilation.target, patterns))
    }
}

// =============================================================================
// Compilation State
// =============================================================================

/// State for compiling one query.
struct Compilation<'a> {
    namespace: &'a Namespace,
    target: Variable,
    gensym: GensymGenerator,
}

impl Compilation<'_> {
    /// Appends the patterns for `node` anchored at `hook`.
    fn node(
        &mut self,
        node: &PatternNode,
        hook: &Variable,
        path: &str,
        out: &mut Vec<GraphPattern>,
    ) -> Result<()> {
        match node {
            PatternNode::TypeLeaf(class) => {
                let class = self.class(class, path)?;
                // A bare class away from the target means "a point of this
                // type on the hook".
                if *hook != self.target {
                    out.push(GraphPattern::Edge {
                        subject: hook.clone(),
                        predicate: self.relation(Relation::HasPoint),
                        quantifier: Quantifier::One,
                        object: self.target.clone(),
                    });
                }
                out.push(GraphPattern::Type {
                    subject: self.target.clone(),
                    class,
                });
            }
            PatternNode::TypeConstraint { class, child } => {
                let iri = self.class(class, path)?;
                out.push(GraphPattern::Type {
                    subject: hook.clone(),
                    class: iri,
                });
                self.node(child, hook, &format!("{path}.{class}"), out)?;
            }
            PatternNode::Relationship {
                relation,
                quantifier,
                child,
            } => {
                let object = if child.is_leaf() {
                    self.target.clone()
                } else {
                    Variable::new(self.gensym.gensym(FRESH_BASE))
                };
                out.push(GraphPattern::Edge {
                    subject: hook.clone(),
                    predicate: self.relation(*relation),
                    quantifier: *quantifier,
                    object: object.clone(),
                });
                let child_path = format!("{path}.{relation}{}", quantifier.suffix());
                self.node(child, &object, &child_path, out)?;
            }
            PatternNode::Choice(branches) => {
                if branches.is_empty() {
                    return Err(Error::invalid_pattern(path, "choice has no branches"));
                }
                let mut groups = Vec::with_capacity(branches.len());
                for (i, branch) in branches.iter().enumerate() {
                    let mut group = Vec::new();
                    self.node(branch, hook, &format!("{path}.choice[{i}]"), &mut group)?;
                    groups.push(group);
                }
                out.push(GraphPattern::Union(groups));
            }
            PatternNode::All(children) => {
                if children.is_empty() {
                    return Err(Error::invalid_pattern(path, "pattern object has no keys"));
                }
                for child in children {
                    self.node(child, hook, path, out)?;
                }
            }
        }
        Ok(())
    }

    fn class(&self, id: &str, path: &str) -> Result<Iri> {
        resolve_class(id, self.namespace, path)
    }

    fn relation(&self, relation: Relation) -> Iri {
        self.namespace.iri(relation.name())
    }
}
