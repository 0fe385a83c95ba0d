//! Graph store seam.
//!
//! The evaluator only needs something that can answer a [`CompiledQuery`]
//! with rows of bindings. [`MemoryStore`] answers queries over an in-process
//! [`Graph`] by evaluating the query's [`GraphPattern`] algebra directly;
//! external triple stores implement [`GraphStore`] by sending
//! [`CompiledQuery::text`] instead.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::time::{Duration, Instant};

use brickrules_foundation::{Error, Iri, Result, Term};
use brickrules_language::Quantifier;
use brickrules_storage::Graph;

use crate::query::{CompiledQuery, GraphPattern, Variable};

/// One solution row: values for the variables a query bound.
pub type Row = BTreeMap<Variable, Term>;

/// Per-query execution options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Abandon the query after this long.
    pub timeout: Option<Duration>,
}

impl QueryOptions {
    /// Options with a timeout.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Something that can answer compiled queries.
pub trait GraphStore {
    /// Executes `query`, returning one row per solution restricted to the
    /// query's projection.
    ///
    /// # Errors
    ///
    /// Returns an execution error if the store rejects the query or does not
    /// answer within `options.timeout`.
    fn execute(&self, query: &CompiledQuery, options: &QueryOptions) -> Result<Vec<Row>>;
}

impl<S: GraphStore + ?Sized> GraphStore for &S {
    fn execute(&self, query: &CompiledQuery, options: &QueryOptions) -> Result<Vec<Row>> {
        (**self).execute(query, options)
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// A [`GraphStore`] over an in-memory [`Graph`].
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    graph: Graph,
}

impl MemoryStore {
    /// Wraps a graph.
    #[must_use]
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    /// The underlying graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mutable access to the underlying graph.
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }
}

impl From<Graph> for MemoryStore {
    fn from(graph: Graph) -> Self {
        Self::new(graph)
    }
}

impl GraphStore for MemoryStore {
    fn execute(&self, query: &CompiledQuery, options: &QueryOptions) -> Result<Vec<Row>> {
        let execution = Execution {
            graph: &self.graph,
            deadline: options.timeout.map(|limit| (Instant::now() + limit, limit)),
        };
        let rows = execution.group(query.patterns(), vec![Row::new()])?;

        Ok(rows
            .into_iter()
            .map(|mut row| {
                row.retain(|var, _| query.projection().contains(var));
                row
            })
            .collect())
    }
}

// =============================================================================
// Pattern Evaluation
// =============================================================================

struct Execution<'g> {
    graph: &'g Graph,
    deadline: Option<(Instant, Duration)>,
}

impl Execution<'_> {
    fn check_deadline(&self) -> Result<()> {
        match self.deadline {
            Some((at, limit)) if Instant::now() >= at => Err(Error::query_timeout(limit)),
            _ => Ok(()),
        }
    }

    /// Joins each pattern of a conjunctive group into `rows` in order.
    fn group(&self, patterns: &[GraphPattern], mut rows: Vec<Row>) -> Result<Vec<Row>> {
        for pattern in patterns {
            if rows.is_empty() {
                break;
            }
            rows = self.pattern(pattern, rows)?;
        }
        Ok(rows)
    }

    fn pattern(&self, pattern: &GraphPattern, rows: Vec<Row>) -> Result<Vec<Row>> {
        self.check_deadline()?;
        let mut out = Vec::new();
        match pattern {
            GraphPattern::Type { subject, class } => {
                for row in rows {
                    if let Some(node) = row.get(subject) {
                        if self.graph.has_type(node, class) {
                            out.push(row);
                        }
                    } else {
                        for node in self.graph.instances_of(class) {
                            out.push(extend(&row, subject, node));
                        }
                    }
                }
            }
            GraphPattern::Edge {
                subject,
                predicate,
                quantifier,
                object,
            } => {
                for row in rows {
                    self.edge(&row, subject, predicate, *quantifier, object, &mut out)?;
                }
            }
            GraphPattern::Union(groups) => {
                for row in rows {
                    for group in groups {
                        out.extend(self.group(group, vec![row.clone()])?);
                    }
                }
            }
        }
        Ok(out)
    }

    fn edge(
        &self,
        row: &Row,
        subject: &Variable,
        predicate: &Iri,
        quantifier: Quantifier,
        object: &Variable,
        out: &mut Vec<Row>,
    ) -> Result<()> {
        match (row.get(subject), row.get(object)) {
            (Some(s), Some(o)) => {
                if self.reach(s, predicate, quantifier, Direction::Forward)?.contains(o) {
                    out.push(row.clone());
                }
            }
            (Some(s), None) => {
                for node in self.reach(s, predicate, quantifier, Direction::Forward)? {
                    out.push(extend(row, object, node));
                }
            }
            (None, Some(o)) => {
                for node in self.reach(o, predicate, quantifier, Direction::Backward)? {
                    out.push(extend(row, subject, node));
                }
            }
            (None, None) => {
                // Zero-length paths match every node in the graph.
                let starts: BTreeSet<&Term> = if quantifier.allows_zero() {
                    self.graph.nodes()
                } else {
                    self.graph.pairs(predicate).map(|(s, _)| s).collect()
                };
                for start in starts {
                    let bound = extend(row, subject, start);
                    for node in self.reach(start, predicate, quantifier, Direction::Forward)? {
                        if subject == object && node != start {
                            continue;
                        }
                        out.push(extend(&bound, object, node));
                    }
                }
            }
        }
        Ok(())
    }

    /// Nodes reachable from `start` over `predicate` under `quantifier`.
    fn reach<'a>(
        &'a self,
        start: &'a Term,
        predicate: &Iri,
        quantifier: Quantifier,
        direction: Direction,
    ) -> Result<BTreeSet<&'a Term>> {
        let step = |node: &Term| -> Vec<&'a Term> {
            match direction {
                Direction::Forward => self.graph.objects(node, predicate).collect(),
                Direction::Backward => self.graph.subjects(predicate, node).collect(),
            }
        };

        let mut reached = BTreeSet::new();
        if quantifier.allows_zero() {
            reached.insert(start);
        }
        if !quantifier.allows_many() {
            reached.extend(step(start));
            return Ok(reached);
        }

        let mut visited = BTreeSet::new();
        let mut queue: VecDeque<&Term> = step(start).into();
        while let Some(node) = queue.pop_front() {
            if !visited.insert(node) {
                continue;
            }
            self.check_deadline()?;
            reached.insert(node);
            queue.extend(step(node));
        }
        Ok(reached)
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

fn extend(row: &Row, var: &Variable, value: &Term) -> Row {
    let mut row = row.clone();
    row.insert(var.clone(), value.clone());
    row
}
