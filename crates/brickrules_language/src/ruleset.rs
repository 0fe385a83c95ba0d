//! Rule documents.
//!
//! A rule document is a JSON object mapping rule names to rules:
//!
//! ```json
//! {
//!   "CHWValveRule": {
//!     "applicability": ["VAV"],
//!     "definitions": {
//!       "chw": {"choice": [
//!         {"hasPoint": "Chilled_Water_Valve_Command"},
//!         {"hasPart": {"Chilled_Water_Valve": {"hasPoint": "Valve_Command"}}}
//!       ]}
//!     }
//!   }
//! }
//! ```
//!
//! Structural problems with the document (wrong JSON types, missing fields)
//! are fatal. Problems inside one rule's patterns only reject that rule.

use brickrules_foundation::{Error, ErrorContext, Result};
use serde_json::{Map, Value as Json};

use crate::pattern::PatternNode;

// =============================================================================
// Rule Types
// =============================================================================

/// One declared variable and its defining pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableDefinition {
    /// Variable name, bound in query results.
    pub name: String,
    /// Pattern selecting the variable's values.
    pub pattern: PatternNode,
}

/// A rule: the classes it applies to and the variables it must bind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleDefinition {
    /// Rule name, unique within its set.
    pub name: String,
    /// Class identifiers the rule applies to, without duplicates.
    pub applicability: Vec<String>,
    /// Variable definitions in document order, unique by name.
    pub definitions: Vec<VariableDefinition>,
}

impl RuleDefinition {
    /// Creates a rule with no classes or variables.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            applicability: Vec::new(),
            definitions: Vec::new(),
        }
    }

    /// Builder method to add an applicable class.
    #[must_use]
    pub fn applies_to(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.applicability.contains(&class) {
            self.applicability.push(class);
        }
        self
    }

    /// Builder method to define a variable. Redefining a name replaces it.
    #[must_use]
    pub fn define(mut self, name: impl Into<String>, pattern: PatternNode) -> Self {
        let name = name.into();
        if let Some(existing) = self.definitions.iter_mut().find(|d| d.name == name) {
            existing.pattern = pattern;
        } else {
            self.definitions.push(VariableDefinition { name, pattern });
        }
        self
    }

    /// Looks up a variable's pattern.
    #[must_use]
    pub fn definition(&self, name: &str) -> Option<&PatternNode> {
        self.definitions
            .iter()
            .find(|d| d.name == name)
            .map(|d| &d.pattern)
    }

    /// Number of entries a complete binding has: every variable plus `root`.
    #[must_use]
    pub fn expected_binding_len(&self) -> usize {
        self.definitions.len() + 1
    }
}

/// An ordered set of uniquely named rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<RuleDefinition>,
}

/// A rule whose patterns could not be parsed.
#[derive(Debug)]
pub struct RuleRejection {
    /// Rule name.
    pub rule: String,
    /// Why the rule was rejected.
    pub error: Error,
}

/// The result of reading a rule document.
#[derive(Debug, Default)]
pub struct LoadedRules {
    /// Rules that parsed cleanly.
    pub rules: RuleSet,
    /// Rules rejected because of pattern errors.
    pub rejected: Vec<RuleRejection>,
}

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule with the same name is already present.
    pub fn insert(&mut self, rule: RuleDefinition) -> Result<()> {
        if self.get(&rule.name).is_some() {
            return Err(Error::malformed_rule_set(
                Some(&rule.name),
                "<rule>",
                "duplicate rule name",
            ));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Builder method to add a rule, replacing any rule with the same name.
    #[must_use]
    pub fn with_rule(mut self, rule: RuleDefinition) -> Self {
        self.rules.retain(|r| r.name != rule.name);
        self.rules.push(rule);
        self
    }

    /// Looks up a rule by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RuleDefinition> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Iterates rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RuleDefinition> {
        self.rules.iter()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Parses a rule document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or the document does not
    /// follow the rule grammar. Pattern errors inside a rule do not fail the
    /// document; they are reported in [`LoadedRules::rejected`].
    pub fn from_json_str(text: &str) -> Result<LoadedRules> {
        let json: Json = serde_json::from_str(text)
            .map_err(|e| Error::malformed_rule_set(None, "<document>", e.to_string()))?;
        Self::from_json(&json)
    }

    /// Parses a rule document.
    ///
    /// # Errors
    ///
    /// See [`RuleSet::from_json_str`].
    pub fn from_json(json: &Json) -> Result<LoadedRules> {
        let Json::Object(document) = json else {
            return Err(Error::malformed_rule_set(
                None,
                "<document>",
                "expected an object mapping rule names to rules",
            ));
        };

        let mut loaded = LoadedRules::default();
        for (name, body) in document {
            match Self::analyze_rule(name, body)? {
                Ok(rule) => loaded.rules.insert(rule)?,
                Err(error) => loaded.rejected.push(RuleRejection {
                    rule: name.clone(),
                    error,
                }),
            }
        }
        Ok(loaded)
    }

    /// Reads one rule. The outer result is fatal, the inner one rejects only
    /// this rule.
    fn analyze_rule(name: &str, body: &Json) -> Result<std::result::Result<RuleDefinition, Error>> {
        let Json::Object(fields) = body else {
            return Err(Error::malformed_rule_set(
                Some(name),
                "<rule>",
                "expected an object with `applicability` and `definitions`",
            ));
        };

        let applicability = Self::analyze_applicability(name, fields)?;
        let definitions = Self::required(name, fields, "definitions")?;
        let Json::Object(definitions) = definitions else {
            return Err(Error::malformed_rule_set(
                Some(name),
                "definitions",
                "expected an object mapping variable names to patterns",
            ));
        };

        let mut rule = RuleDefinition::new(name);
        for class in applicability {
            rule = rule.applies_to(class);
        }
        for (variable, json) in definitions {
            let path = format!("definitions.{variable}");
            match PatternNode::from_json(json, &path) {
                Ok(pattern) => rule = rule.define(variable.clone(), pattern),
                Err(error) => {
                    return Ok(Err(error.with_context(
                        ErrorContext::new().with_rule(name).with_variable(variable.clone()),
                    )));
                }
            }
        }
        Ok(Ok(rule))
    }

    fn analyze_applicability(name: &str, fields: &Map<String, Json>) -> Result<Vec<String>> {
        let Json::Array(classes) = Self::required(name, fields, "applicability")? else {
            return Err(Error::malformed_rule_set(
                Some(name),
                "applicability",
                "expected a list of class names",
            ));
        };
        classes
            .iter()
            .enumerate()
            .map(|(i, class)| match class {
                Json::String(class) => Ok(class.clone()),
                _ => Err(Error::malformed_rule_set(
                    Some(name),
                    format!("applicability[{i}]"),
                    "expected a class name",
                )),
            })
            .collect()
    }

    fn required<'a>(name: &str, fields: &'a Map<String, Json>, field: &str) -> Result<&'a Json> {
        fields
            .get(field)
            .ok_or_else(|| Error::malformed_rule_set(Some(name), field, "missing required field"))
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a RuleDefinition;
    type IntoIter = std::slice::Iter<'a, RuleDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
