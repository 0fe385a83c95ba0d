//! Flat result records for one model.
//!
//! Successful (rule, instance) pairs come first, keyed by rule IRI, then one
//! failure record per (authoring shape, focus node). Rule IRIs and authoring
//! shapes share a naming scheme when the shapes were generated from the same
//! rules, so a consumer can line the two halves up.

use std::fmt::{self, Write as _};

use brickrules_engine::{Binding, EvaluationReport};
use brickrules_foundation::Term;

use crate::aggregate::GroupedDiagnostics;

/// What a result record carries.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ResultDetails {
    /// Bound variables of a satisfying instance.
    Binding(Binding),
    /// Distinct reasons a focus node failed a shape.
    Reasons(Vec<String>),
}

/// One success or failure record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RuleResult {
    /// Rule IRI or authoring shape.
    pub rule: String,
    /// The instance concerned.
    pub focus_node: Term,
    /// Binding or reasons.
    pub details: ResultDetails,
    /// Whether the instance satisfied the rule.
    pub success: bool,
}

/// Every result record for one model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResultReport {
    /// Successes first, then failures.
    pub results: Vec<RuleResult>,
}

impl ResultReport {
    /// Builds records from an evaluation and grouped diagnostics.
    #[must_use]
    pub fn build(evaluation: &EvaluationReport, grouped: &GroupedDiagnostics) -> Self {
        let successes = evaluation.outcomes.iter().flat_map(|outcome| {
            outcome.instances.iter().map(|(instance, binding)| RuleResult {
                rule: outcome.rule_iri.clone(),
                focus_node: instance.clone(),
                details: ResultDetails::Binding(binding.clone()),
                success: true,
            })
        });
        let failures = grouped.iter().map(|(shape, focus, reasons)| RuleResult {
            rule: shape.to_string(),
            focus_node: focus.clone(),
            details: ResultDetails::Reasons(reasons.iter().cloned().collect()),
            success: false,
        });

        Self {
            results: successes.chain(failures).collect(),
        }
    }

    /// Successful records.
    pub fn successes(&self) -> impl Iterator<Item = &RuleResult> {
        self.results.iter().filter(|r| r.success)
    }

    /// Failure records.
    pub fn failures(&self) -> impl Iterator<Item = &RuleResult> {
        self.results.iter().filter(|r| !r.success)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Renders the report as a markdown summary, grouped by rule.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Rule Application Report\n");
        let sections = [("Satisfied rules", true), ("Validation failures", false)];

        for (title, success) in sections {
            let _ = write!(out, "\n## {title}\n");
            let mut current: Option<&str> = None;
            let mut any = false;
            for result in self.results.iter().filter(|r| r.success == success) {
                any = true;
                if current != Some(result.rule.as_str()) {
                    let _ = write!(out, "\n### {}\n\n", result.rule);
                    current = Some(result.rule.as_str());
                }
                match &result.details {
                    ResultDetails::Binding(binding) => {
                        let _ = writeln!(out, "- `{}`: {binding}", result.focus_node);
                    }
                    ResultDetails::Reasons(reasons) => {
                        let _ = writeln!(out, "- `{}`", result.focus_node);
                        for reason in reasons {
                            let _ = writeln!(out, "  - {reason}");
                        }
                    }
                }
            }
            if !any {
                out.push_str("\nNone.\n");
            }
        }
        out
    }
}

impl fmt::Display for ResultReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markdown())
    }
}
