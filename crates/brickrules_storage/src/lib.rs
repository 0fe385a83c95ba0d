//! In-memory triple graph for brickrules.
//!
//! This crate provides:
//! - [`Graph`] - Triple storage with forward and reverse indices

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod graph;

pub use graph::Graph;
