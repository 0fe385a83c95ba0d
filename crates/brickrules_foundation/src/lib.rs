//! Core terms, vocabulary, and error types for brickrules.
//!
//! This crate provides:
//! - [`Term`] and [`Iri`] - Graph values
//! - [`Namespace`] and the [`vocab`] constants (Brick, RDF, SHACL)
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod term;
pub mod vocab;

pub use error::{Error, ErrorCategory, ErrorContext, ErrorKind, Result};
pub use term::{Iri, Term};
pub use vocab::Namespace;
