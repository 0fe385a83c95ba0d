//! CLI support for brickrules.
//!
//! This crate provides:
//! - [`Session`] - Runs check, compile, and evaluate commands
//! - [`ntriples`] - Loading models from N-Triples files
//! - [`init_logging`] - Installs the `tracing` subscriber used by the binary

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ntriples;
pub mod session;

pub use ntriples::{load_graph, parse_ntriples};
pub use session::{CheckSummary, CompiledStep, Session};

use tracing_subscriber::EnvFilter;

/// Installs a stderr `fmt` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` selects `debug` over
/// `warn`. Calling this twice is harmless.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
