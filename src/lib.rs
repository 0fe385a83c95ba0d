//! brickrules - Building-model point rules
//!
//! This crate re-exports all layers of the brickrules system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: brickrules_runtime     - CLI, N-Triples loading, logging setup
//! Layer 3: brickrules_diagnostics - Shape resolution, diagnostic grouping, reports
//!          brickrules_engine      - Query compiler, graph store seam, rule evaluator
//! Layer 2: brickrules_language    - Pattern AST, rule documents, gensym
//! Layer 1: brickrules_storage     - In-memory triple graph
//! Layer 0: brickrules_foundation  - Core types (Term, Iri, Error)
//! ```

pub use brickrules_diagnostics as diagnostics;
pub use brickrules_engine as engine;
pub use brickrules_foundation as foundation;
pub use brickrules_language as language;
pub use brickrules_runtime as runtime;
pub use brickrules_storage as storage;
