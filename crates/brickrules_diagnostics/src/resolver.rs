//! Resolution of failed shapes to the shapes that authored them.
//!
//! Validation reports failures against the innermost shape that failed,
//! which is frequently a generated property or list-member shape. Resolution
//! walks outward through enclosing shapes until none remain. When several
//! shapes enclose the current one, the smallest term wins so resolution is
//! deterministic.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use brickrules_foundation::{Error, Term};
use tracing::{debug, warn};

use crate::config::ResolverConfig;
use crate::shape::ShapeGraph;

/// A shape that could not be resolved.
#[derive(Debug)]
pub struct Unresolved {
    /// The last shape reached before resolution stopped.
    pub last_known: Term,
    /// Why resolution stopped.
    pub error: Error,
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl From<Unresolved> for Error {
    fn from(unresolved: Unresolved) -> Self {
        unresolved.error
    }
}

/// Resolves failed shapes against one shape graph, memoizing results.
///
/// A session is meant to live for one model. Dropping it discards the cache.
pub struct ResolutionSession<'g, G: ShapeGraph + ?Sized> {
    graph: &'g G,
    config: ResolverConfig,
    cache: BTreeMap<Term, Term>,
    hits: usize,
    misses: usize,
}

impl<'g, G: ShapeGraph + ?Sized> ResolutionSession<'g, G> {
    /// Creates a session with the default configuration.
    #[must_use]
    pub fn new(graph: &'g G) -> Self {
        Self::with_config(graph, ResolverConfig::default())
    }

    /// Creates a session with an explicit configuration.
    #[must_use]
    pub fn with_config(graph: &'g G, config: ResolverConfig) -> Self {
        Self {
            graph,
            config,
            cache: BTreeMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves `shape` to its outermost enclosing shape.
    ///
    /// A shape nothing encloses resolves to itself.
    ///
    /// # Errors
    ///
    /// Returns [`Unresolved`] carrying the last shape reached if the walk
    /// revisits a shape or exceeds the configured depth.
    pub fn resolve(&mut self, shape: &Term) -> Result<Term, Unresolved> {
        if let Some(original) = self.cache.get(shape) {
            self.hits += 1;
            return Ok(original.clone());
        }
        self.misses += 1;

        let mut chain = vec![shape.clone()];
        let mut visited = BTreeSet::from([shape.clone()]);
        let mut current = shape.clone();

        let original = loop {
            if let Some(original) = self.cache.get(&current) {
                break original.clone();
            }
            let Some(next) = self.graph.enclosing_shapes(&current).into_iter().min() else {
                break current;
            };

            let steps = chain.len() - 1;
            if steps >= self.config.max_depth || !visited.insert(next.clone()) {
                warn!(shape = %shape, last_known = %current, steps, "shape resolution did not terminate");
                return Err(Unresolved {
                    error: Error::resolution_loop(current.to_string(), steps),
                    last_known: current,
                });
            }

            debug!(from = %current, to = %next, "enclosing shape");
            chain.push(next.clone());
            current = next;
        };

        for step in chain {
            self.cache.insert(step, original.clone());
        }
        Ok(original)
    }

    /// Whether `shape` has a cached resolution.
    #[must_use]
    pub fn is_cached(&self, shape: &Term) -> bool {
        self.cache.contains_key(shape)
    }

    /// Number of cached shapes.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Resolutions answered straight from the cache.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Resolutions that walked the shape graph.
    #[must_use]
    pub fn misses(&self) -> usize {
        self.misses
    }
}

impl<G: ShapeGraph + ?Sized> fmt::Debug for ResolutionSession<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionSession")
            .field("config", &self.config)
            .field("cached", &self.cache.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish_non_exhaustive()
    }
}
