//! Validation diagnostics for brickrules.
//!
//! This crate provides:
//! - [`ShapeGraph`] - How shapes enclose one another in a shape graph
//! - [`ResolutionSession`] - Per-model memoized resolution of failed shapes
//! - [`DiffAggregator`] - Groups diagnostics by authoring shape and focus node
//! - [`ResultReport`] - Flat success/failure records for one model
//!
//! The flow is: validation engine → `ValidationDiagnostic`s → `DiffAggregator`
//! → `GroupedDiagnostics` → `ResultReport` together with an evaluation report.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod aggregate;
pub mod config;
pub mod diagnostic;
pub mod report;
pub mod resolver;
pub mod shape;

pub use aggregate::{Aggregation, DiffAggregator, GroupedDiagnostics, ResolutionFailure};
pub use config::ResolverConfig;
pub use diagnostic::ValidationDiagnostic;
pub use report::{ResultDetails, ResultReport, RuleResult};
pub use resolver::{ResolutionSession, Unresolved};
pub use shape::ShapeGraph;
