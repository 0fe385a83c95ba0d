//! Rule language for brickrules.
//!
//! This crate provides:
//! - [`PatternNode`] - The closed pattern grammar for variable definitions
//! - [`RuleSet`] - Validated rules parsed from a JSON rule document
//! - [`GensymGenerator`] - Collision-free fresh variable names
//! - [`ident`] - Identifier rules for classes and variables
//!
//! The flow is: JSON document → `RuleSet::from_json_str` → `RuleDefinition`s
//! holding `PatternNode` trees → query compiler.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod gensym;
pub mod ident;
pub mod pattern;
pub mod ruleset;

pub use gensym::GensymGenerator;
pub use pattern::{PatternNode, Quantifier, Relation};
pub use ruleset::{LoadedRules, RuleDefinition, RuleRejection, RuleSet, VariableDefinition};
