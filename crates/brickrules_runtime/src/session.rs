//! Command session.
//!
//! A [`Session`] owns the evaluator configuration and runs the CLI commands
//! against rule documents and models read from disk.

use std::fs;
use std::path::Path;

use brickrules_engine::{EvaluationReport, EvaluatorConfig, MemoryStore, RuleEvaluator, RuleQuery};
use brickrules_foundation::{Error, Result};
use brickrules_language::{LoadedRules, RuleSet};
use tracing::{debug, info};

use crate::ntriples::load_graph;

/// Result of checking one rule document.
#[derive(Debug, Default)]
pub struct CheckSummary {
    /// Rules in the document, accepted or not.
    pub rules: usize,
    /// Queries that compiled.
    pub compiled: usize,
    /// Per-rule problems, as `(rule, message)`.
    pub problems: Vec<(String, String)>,
}

impl CheckSummary {
    /// Whether every rule compiled.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// One compiled step, tagged with its rule.
#[derive(Debug)]
pub struct CompiledStep {
    /// Rule name.
    pub rule: String,
    /// The compiled step.
    pub query: RuleQuery,
}

/// Holds configuration across commands.
#[derive(Debug, Default)]
pub struct Session {
    evaluator: RuleEvaluator,
}

impl Session {
    /// Creates a session.
    #[must_use]
    pub fn new(config: EvaluatorConfig) -> Self {
        Self {
            evaluator: RuleEvaluator::new(config),
        }
    }

    /// The evaluator configuration.
    #[must_use]
    pub fn config(&self) -> &EvaluatorConfig {
        self.evaluator.config()
    }

    /// Reads and parses a rule document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the document is
    /// malformed. Rules with bad patterns are returned as rejections.
    pub fn load_rules(&self, path: &Path) -> Result<LoadedRules> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("failed to read {}: {e}", path.display())))?;
        let loaded = RuleSet::from_json_str(&text)?;
        info!(
            path = %path.display(),
            rules = loaded.rules.len(),
            rejected = loaded.rejected.len(),
            "loaded rule document"
        );
        Ok(loaded)
    }

    /// Compiles every step of every accepted rule.
    #[must_use]
    pub fn compile(&self, loaded: &LoadedRules) -> Vec<CompiledStep> {
        loaded
            .rules
            .iter()
            .flat_map(|rule| {
                self.evaluator
                    .compile_rule(rule)
                    .into_iter()
                    .map(|query| CompiledStep {
                        rule: rule.name.clone(),
                        query,
                    })
            })
            .collect()
    }

    /// Checks that every rule in a document compiles.
    #[must_use]
    pub fn check(&self, loaded: &LoadedRules) -> CheckSummary {
        let mut summary = CheckSummary {
            rules: loaded.rules.len() + loaded.rejected.len(),
            ..CheckSummary::default()
        };
        for rejection in &loaded.rejected {
            summary
                .problems
                .push((rejection.rule.clone(), rejection.error.to_string()));
        }
        for step in self.compile(loaded) {
            match step.query.query {
                Ok(query) => {
                    debug!(rule = %step.rule, variable = %step.query.variable, query = %query, "compiled");
                    summary.compiled += 1;
                }
                Err(error) => summary.problems.push((
                    step.rule,
                    format!(
                        "class {}, variable {}: {error}",
                        step.query.class, step.query.variable
                    ),
                )),
            }
        }
        summary
    }

    /// Evaluates a rule document against an N-Triples model.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or parsed.
    pub fn evaluate(&self, rules: &Path, model: &Path) -> Result<EvaluationReport> {
        let loaded = self.load_rules(rules)?;
        let graph = load_graph(model)?;
        info!(path = %model.display(), triples = graph.len(), "loaded model");
        let store = MemoryStore::new(graph);
        Ok(self.evaluator.evaluate_document(loaded, &store))
    }
}
