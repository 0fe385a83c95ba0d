//! Query compilation and rule evaluation for brickrules.
//!
//! This crate provides:
//! - [`QueryCompiler`] - Pattern trees to graph queries with hygienic variables
//! - [`GraphStore`] - The seam to whatever answers queries, with [`MemoryStore`]
//! - [`RuleEvaluator`] - Per-rule, per-instance evaluation with isolated failures
//! - [`Binding`] - Accumulated variable values for one instance

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod binding;
pub mod compiler;
pub mod config;
pub mod evaluator;
pub mod query;
pub mod store;

pub use binding::Binding;
pub use compiler::QueryCompiler;
pub use config::EvaluatorConfig;
pub use evaluator::{EvaluationReport, RuleEvaluator, RuleFailure, RuleOutcome, RuleQuery};
pub use query::{CompiledQuery, GraphPattern, Variable};
pub use store::{GraphStore, MemoryStore, QueryOptions, Row};
