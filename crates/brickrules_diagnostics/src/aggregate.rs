//! Grouping of validation diagnostics.
//!
//! Diagnostics are grouped under the authoring shape their failed shape
//! resolves to, then by focus node. Reasons are kept as a set, so the same
//! reason reported twice for one (shape, focus) pair appears once.

use brickrules_foundation::{Error, Term};
use im::{OrdMap, OrdSet};
use tracing::{info, warn};

use crate::config::ResolverConfig;
use crate::diagnostic::ValidationDiagnostic;
use crate::resolver::ResolutionSession;
use crate::shape::ShapeGraph;

// =============================================================================
// Grouped Diagnostics
// =============================================================================

/// Reasons keyed by authoring shape, then focus node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GroupedDiagnostics {
    groups: OrdMap<Term, OrdMap<Term, OrdSet<String>>>,
}

impl GroupedDiagnostics {
    /// Creates an empty grouping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `reason` for `focus` under `shape`. Returns false if it was
    /// already present.
    pub fn insert(&mut self, shape: Term, focus: Term, reason: impl Into<String>) -> bool {
        self.groups
            .entry(shape)
            .or_insert_with(OrdMap::new)
            .entry(focus)
            .or_insert_with(OrdSet::new)
            .insert(reason.into())
            .is_none()
    }

    /// Focus nodes and their reasons for one shape.
    #[must_use]
    pub fn get(&self, shape: &Term) -> Option<&OrdMap<Term, OrdSet<String>>> {
        self.groups.get(shape)
    }

    /// Reasons recorded for one (shape, focus) pair.
    #[must_use]
    pub fn reasons(&self, shape: &Term, focus: &Term) -> Option<&OrdSet<String>> {
        self.groups.get(shape).and_then(|foci| foci.get(focus))
    }

    /// Authoring shapes with at least one diagnostic, in term order.
    pub fn shapes(&self) -> impl Iterator<Item = &Term> {
        self.groups.keys()
    }

    /// Every (shape, focus, reasons) entry in term order.
    pub fn iter(&self) -> impl Iterator<Item = (&Term, &Term, &OrdSet<String>)> {
        self.groups.iter().flat_map(|(shape, foci)| {
            foci.iter().map(move |(focus, reasons)| (shape, focus, reasons))
        })
    }

    /// Number of shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of distinct reasons across all groups.
    #[must_use]
    pub fn reason_count(&self) -> usize {
        self.iter().map(|(_, _, reasons)| reasons.len()).sum()
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// A diagnostic whose failed shape could not be resolved.
#[derive(Debug)]
pub struct ResolutionFailure {
    /// The diagnostic as reported.
    pub diagnostic: ValidationDiagnostic,
    /// The shape it was grouped under instead.
    pub last_known: Term,
    /// Why resolution stopped.
    pub error: Error,
}

/// The output of aggregating one model's diagnostics.
#[derive(Debug, Default)]
pub struct Aggregation {
    /// Diagnostics grouped by authoring shape and focus node.
    pub grouped: GroupedDiagnostics,
    /// Diagnostics grouped under a last-known shape because resolution failed.
    pub failures: Vec<ResolutionFailure>,
}

/// Groups diagnostics for one model.
pub struct DiffAggregator<'g, G: ShapeGraph + ?Sized> {
    session: ResolutionSession<'g, G>,
}

impl<'g, G: ShapeGraph + ?Sized> DiffAggregator<'g, G> {
    /// Creates an aggregator with a fresh resolution session over `shapes`.
    #[must_use]
    pub fn new(shapes: &'g G) -> Self {
        Self::with_config(shapes, ResolverConfig::default())
    }

    /// Creates an aggregator with an explicit resolver configuration.
    #[must_use]
    pub fn with_config(shapes: &'g G, config: ResolverConfig) -> Self {
        Self {
            session: ResolutionSession::with_config(shapes, config),
        }
    }

    /// The underlying resolution session.
    #[must_use]
    pub fn session(&self) -> &ResolutionSession<'g, G> {
        &self.session
    }

    /// Resolves and groups `diagnostics`.
    pub fn aggregate(
        &mut self,
        diagnostics: impl IntoIterator<Item = ValidationDiagnostic>,
    ) -> Aggregation {
        let mut aggregation = Aggregation::default();
        let mut seen = 0usize;

        for diagnostic in diagnostics {
            seen += 1;
            match self.session.resolve(&diagnostic.failed_shape) {
                Ok(original) => {
                    aggregation.grouped.insert(
                        original,
                        diagnostic.focus_node,
                        diagnostic.reason,
                    );
                }
                Err(unresolved) => {
                    warn!(
                        focus = %diagnostic.focus_node,
                        shape = %diagnostic.failed_shape,
                        last_known = %unresolved.last_known,
                        "grouping diagnostic under last known shape"
                    );
                    aggregation.grouped.insert(
                        unresolved.last_known.clone(),
                        diagnostic.focus_node.clone(),
                        diagnostic.reason.clone(),
                    );
                    aggregation.failures.push(ResolutionFailure {
                        diagnostic,
                        last_known: unresolved.last_known,
                        error: unresolved.error,
                    });
                }
            }
        }

        info!(
            diagnostics = seen,
            shapes = aggregation.grouped.len(),
            reasons = aggregation.grouped.reason_count(),
            unresolved = aggregation.failures.len(),
            "diagnostics aggregated"
        );
        aggregation
    }
}

/// Groups `diagnostics` against `shapes` in a one-off session.
pub fn aggregate<G: ShapeGraph + ?Sized>(
    shapes: &G,
    diagnostics: impl IntoIterator<Item = ValidationDiagnostic>,
) -> Aggregation {
    DiffAggregator::new(shapes).aggregate(diagnostics)
}
