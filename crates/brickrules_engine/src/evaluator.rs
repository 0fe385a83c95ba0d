//! Rule evaluation.
//!
//! For each rule, each applicable class, and each declared variable, one query
//! is compiled and executed. Rows are merged into a [`Binding`] per instance
//! (the row's `root`); an instance satisfies the rule only once every
//! variable is bound. A failure in any one step is recorded against that
//! (rule, class, variable) and evaluation carries on.

use brickrules_foundation::{Error, ErrorContext, Result, Term};
use brickrules_language::{LoadedRules, RuleDefinition, RuleSet};
use im::OrdMap;
use tracing::{debug, info, instrument, warn};

use crate::binding::Binding;
use crate::compiler::QueryCompiler;
use crate::config::EvaluatorConfig;
use crate::query::{CompiledQuery, Variable};
use crate::store::{GraphStore, QueryOptions};

// =============================================================================
// Report Types
// =============================================================================

/// One compiled (class, variable) step of a rule.
#[derive(Debug)]
pub struct RuleQuery {
    /// Applicable class identifier as written.
    pub class: String,
    /// Variable being defined.
    pub variable: String,
    /// The compiled query, or why it could not be compiled.
    pub query: Result<CompiledQuery>,
}

/// Instances that satisfied one rule.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RuleOutcome {
    /// Rule name.
    pub rule: String,
    /// Rule IRI (`rule_prefix + name`).
    pub rule_iri: String,
    /// Complete bindings keyed by instance.
    pub instances: OrdMap<Term, Binding>,
    /// Instances seen with an incomplete binding.
    pub discarded: usize,
}

impl RuleOutcome {
    /// Whether `instance` satisfied the rule.
    #[must_use]
    pub fn succeeded(&self, instance: &Term) -> bool {
        self.instances.contains_key(instance)
    }

    /// The binding for a satisfying instance.
    #[must_use]
    pub fn binding(&self, instance: &Term) -> Option<&Binding> {
        self.instances.get(instance)
    }

    /// Number of satisfying instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no instance satisfied the rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// A step that failed during evaluation.
#[derive(Debug)]
pub struct RuleFailure {
    /// Rule name.
    pub rule: String,
    /// Applicable class, if the failure is specific to one.
    pub class: Option<String>,
    /// Variable, if the failure is specific to one.
    pub variable: Option<String>,
    /// What went wrong.
    pub error: Error,
}

impl RuleFailure {
    fn new(rule: &str, class: Option<&str>, variable: Option<&str>, error: Error) -> Self {
        let mut context = ErrorContext::new().with_rule(rule);
        if let Some(class) = class {
            context = context.with_class(class);
        }
        if let Some(variable) = variable {
            context = context.with_variable(variable);
        }
        Self {
            rule: rule.to_owned(),
            class: class.map(String::from),
            variable: variable.map(String::from),
            error: error.with_context(context),
        }
    }
}

impl std::fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error.context {
            Some(context) => write!(f, "{} ({context})", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Everything one evaluation produced.
#[derive(Debug, Default)]
pub struct EvaluationReport {
    /// One outcome per evaluated rule, in rule-set order.
    pub outcomes: Vec<RuleOutcome>,
    /// Steps that failed, in the order they occurred.
    pub failures: Vec<RuleFailure>,
}

impl EvaluationReport {
    /// Looks up a rule's outcome.
    #[must_use]
    pub fn outcome(&self, rule: &str) -> Option<&RuleOutcome> {
        self.outcomes.iter().find(|o| o.rule == rule)
    }

    /// Failures recorded against one rule.
    pub fn failures_for<'a>(&'a self, rule: &'a str) -> impl Iterator<Item = &'a RuleFailure> {
        self.failures.iter().filter(move |f| f.rule == rule)
    }

    /// Whether every step succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total satisfying (rule, instance) pairs.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().map(RuleOutcome::len).sum()
    }
}

// =============================================================================
// Rule Evaluator
// =============================================================================

/// Evaluates rule sets against a graph store.
#[derive(Clone, Debug, Default)]
pub struct RuleEvaluator {
    config: EvaluatorConfig,
    compiler: QueryCompiler,
}

impl RuleEvaluator {
    /// Creates an evaluator.
    #[must_use]
    pub fn new(config: EvaluatorConfig) -> Self {
        let compiler = QueryCompiler::new(config.namespace.clone());
        Self { config, compiler }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Compiles every (class, variable) step of a rule without executing.
    #[must_use]
    pub fn compile_rule(&self, rule: &RuleDefinition) -> Vec<RuleQuery> {
        let mut queries = Vec::with_capacity(rule.applicability.len() * rule.definitions.len());
        for class in &rule.applicability {
            for definition in &rule.definitions {
                queries.push(RuleQuery {
                    class: class.clone(),
                    variable: definition.name.clone(),
                    query: self
                        .compiler
                        .compile(class, &definition.pattern, &definition.name),
                });
            }
        }
        queries
    }

    /// Evaluates every rule in `rules`.
    pub fn evaluate<S: GraphStore + ?Sized>(&self, rules: &RuleSet, store: &S) -> EvaluationReport {
        let mut report = EvaluationReport::default();
        for rule in rules {
            let outcome = self.evaluate_rule(rule, store, &mut report.failures);
            report.outcomes.push(outcome);
        }
        info!(
            rules = report.outcomes.len(),
            successes = report.success_count(),
            failures = report.failures.len(),
            "evaluation finished"
        );
        report
    }

    /// Evaluates a loaded document, reporting its rejected rules as failures
    /// ahead of any evaluation failures.
    pub fn evaluate_document<S: GraphStore + ?Sized>(
        &self,
        loaded: LoadedRules,
        store: &S,
    ) -> EvaluationReport {
        let rejected: Vec<RuleFailure> = loaded
            .rejected
            .into_iter()
            .map(|rejection| {
                warn!(rule = %rejection.rule, error = %rejection.error, "rule rejected");
                let variable = rejection
                    .error
                    .context
                    .as_ref()
                    .and_then(|c| c.variable.clone());
                RuleFailure::new(&rejection.rule, None, variable.as_deref(), rejection.error)
            })
            .collect();

        let mut report = self.evaluate(&loaded.rules, store);
        let failures = std::mem::take(&mut report.failures);
        report.failures = rejected;
        report.failures.extend(failures);
        report
    }

    /// Evaluates one rule, appending step failures to `failures`.
    #[instrument(skip_all, fields(rule = %rule.name))]
    pub fn evaluate_rule<S: GraphStore + ?Sized>(
        &self,
        rule: &RuleDefinition,
        store: &S,
        failures: &mut Vec<RuleFailure>,
    ) -> RuleOutcome {
        let options = QueryOptions {
            timeout: self.config.query_timeout,
        };
        let mut instances: OrdMap<Term, Binding> = OrdMap::new();

        for step in self.compile_rule(rule) {
            let rows = step
                .query
                .and_then(|query| {
                    debug!(class = %step.class, variable = %step.variable, query = %query, "executing query");
                    store.execute(&query, &options)
                });
            let rows = match rows {
                Ok(rows) => rows,
                Err(error) => {
                    warn!(class = %step.class, variable = %step.variable, %error, "rule step failed");
                    failures.push(RuleFailure::new(
                        &rule.name,
                        Some(&step.class),
                        Some(&step.variable),
                        error,
                    ));
                    continue;
                }
            };

            debug!(variable = %step.variable, rows = rows.len(), "query answered");
            for row in &rows {
                let Some(root) = row.get(&Variable::root()) else {
                    continue;
                };
                instances
                    .entry(root.clone())
                    .or_insert_with(Binding::new)
                    .merge_row(row);
            }
        }

        let expected = rule.expected_binding_len();
        let complete: OrdMap<Term, Binding> = instances
            .iter()
            .filter(|(_, binding)| binding.len() == expected)
            .map(|(instance, binding)| (instance.clone(), binding.clone()))
            .collect();
        let outcome = RuleOutcome {
            rule: rule.name.clone(),
            rule_iri: self.config.rule_iri(&rule.name),
            discarded: instances.len() - complete.len(),
            instances: complete,
        };
        info!(successes = outcome.len(), discarded = outcome.discarded, "rule evaluated");
        outcome
    }
}
