//! Per-instance variable bindings.
//!
//! Bindings are persistent maps so partial results for one instance can be
//! cloned and merged cheaply while a rule's queries run.

use std::fmt;

use brickrules_foundation::Term;
use im::OrdMap;

use crate::query::Variable;
use crate::store::Row;

/// Values bound for one applicable instance, keyed by variable name.
///
/// Always contains `root` once any query has produced a row for the instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Binding {
    values: OrdMap<String, Term>,
}

impl Binding {
    /// Creates an empty binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a binding from one result row.
    #[must_use]
    pub fn from_row(row: &Row) -> Self {
        let mut binding = Self::new();
        binding.merge_row(row);
        binding
    }

    /// Gets the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.values.get(name)
    }

    /// The bound root instance.
    #[must_use]
    pub fn root(&self) -> Option<&Term> {
        self.get(Variable::ROOT)
    }

    /// Binds `name`, replacing any earlier value.
    pub fn set(&mut self, name: impl Into<String>, value: Term) {
        self.values.insert(name.into(), value);
    }

    /// Whether `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of bound variables, `root` included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates bindings in variable-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Folds every value of `row` into this binding. Later rows win on
    /// conflicting variables.
    pub fn merge_row(&mut self, row: &Row) {
        for (var, value) in row {
            self.values.insert(var.as_str().to_owned(), value.clone());
        }
    }

    /// Folds another binding into this one. Values in `other` win.
    pub fn merge(&mut self, other: &Binding) {
        self.values = other.values.clone().union(self.values.clone());
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "?{name}: {value}")?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<(String, Term)> for Binding {
    fn from_iter<I: IntoIterator<Item = (String, Term)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Binding {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.values.iter())
    }
}
