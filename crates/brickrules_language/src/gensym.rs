//! Gensym generator for query variable hygiene.
//!
//! Generates fresh variable names that cannot capture the caller-visible
//! variables of a compiled query.
//!
//! # Example
//!
//! ```
//! use brickrules_language::gensym::GensymGenerator;
//!
//! let mut generator = GensymGenerator::new();
//! generator.reserve("root");
//! let sym1 = generator.gensym("node"); // "node__G__0"
//! let sym2 = generator.gensym("node"); // "node__G__1"
//! assert_ne!(sym1, sym2);
//! ```

use std::collections::HashSet;

/// Generator for unique symbols within one compiled query.
///
/// Each query owns its own generator, so output is deterministic for a given
/// input. Names handed out or reserved are never produced again.
#[derive(Clone, Debug)]
pub struct GensymGenerator {
    /// Infix between the base name and the counter (default: "__G__").
    prefix: String,
    /// Next counter value.
    next: u64,
    /// Names that must not be produced.
    taken: HashSet<String>,
}

impl Default for GensymGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl GensymGenerator {
    /// Creates a new gensym generator with the default prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix("__G__")
    }

    /// Creates a new gensym generator with a custom prefix.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
            taken: HashSet::new(),
        }
    }

    /// Marks a name as in use by the caller.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.taken.insert(name.into());
    }

    /// Generates a unique symbol based on the given base name.
    ///
    /// The generated symbol has the form `{base}{prefix}{id}`; ids that would
    /// collide with a reserved name are skipped.
    pub fn gensym(&mut self, base: &str) -> String {
        loop {
            let id = self.next;
            self.next += 1;
            let candidate = format!("{base}{}{id}", self.prefix);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Checks if a name was produced by a generator with this prefix.
    #[must_use]
    pub fn is_gensym(&self, name: &str) -> bool {
        name.rsplit_once(self.prefix.as_str())
            .is_some_and(|(_, id)| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
    }

    /// Number of symbols generated or skipped so far.
    #[must_use]
    pub fn counter(&self) -> u64 {
        self.next
    }
}

// =============================================================================
// Tests
// =============================================================================
