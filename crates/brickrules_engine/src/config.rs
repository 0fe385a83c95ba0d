//! Evaluator configuration.

use std::time::Duration;

use brickrules_foundation::Namespace;

/// Prefix prepended to rule names to form rule IRIs.
pub const DEFAULT_RULE_PREFIX: &str = "urn:rules_manifest/";

/// Configuration for a [`RuleEvaluator`](crate::RuleEvaluator).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvaluatorConfig {
    /// Namespace class local names and relationships resolve against.
    pub namespace: Namespace,
    /// Prefix for rule IRIs.
    pub rule_prefix: String,
    /// Per-query time limit; `None` waits indefinitely.
    pub query_timeout: Option<Duration>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            namespace: Namespace::brick(),
            rule_prefix: DEFAULT_RULE_PREFIX.to_owned(),
            query_timeout: None,
        }
    }
}

impl EvaluatorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds every query to `timeout`. Suitable for shared remote stores.
    #[must_use]
    pub fn bounded(timeout: Duration) -> Self {
        Self::default().with_query_timeout(timeout)
    }

    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    /// Sets the rule IRI prefix.
    #[must_use]
    pub fn with_rule_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.rule_prefix = prefix.into();
        self
    }

    /// Sets the per-query time limit.
    #[must_use]
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Forms the IRI for a rule name.
    #[must_use]
    pub fn rule_iri(&self, rule: &str) -> String {
        format!("{}{rule}", self.rule_prefix)
    }
}
