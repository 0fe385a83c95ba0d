//! Identifier rules for classes and variables.
//!
//! Variable names follow SPARQL `VARNAME` restricted to ASCII:
//! `[A-Za-z_][A-Za-z0-9_]*`. Class identifiers are either absolute IRIs or
//! local names resolved against a namespace.

use brickrules_foundation::{Error, Iri, Namespace, Result};

/// Characters that may never appear inside an IRI reference.
const IRI_FORBIDDEN: &[char] = &['<', '>', '"', '{', '}', '|', '^', '`', '\\'];

/// Whether `name` is a valid query variable name.
#[must_use]
pub fn is_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether `name` is a valid local name for a class.
#[must_use]
pub fn is_local_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !name.ends_with('.')
}

/// Whether `id` is written as an absolute IRI.
#[must_use]
pub fn is_absolute_iri(id: &str) -> bool {
    match id.split_once("://") {
        Some((scheme, rest)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
                && !rest.is_empty()
                && !id
                    .chars()
                    .any(|c| c.is_whitespace() || IRI_FORBIDDEN.contains(&c))
        }
        None => false,
    }
}

/// Resolves a class identifier to an IRI.
///
/// # Errors
///
/// Returns a malformed identifier error naming `path` if `id` is neither an
/// absolute IRI nor a valid local name.
pub fn resolve_class(id: &str, namespace: &Namespace, path: &str) -> Result<Iri> {
    if is_local_name(id) {
        Ok(namespace.iri(id))
    } else if is_absolute_iri(id) {
        Ok(Iri::new(id))
    } else {
        Err(Error::malformed_identifier(id, path))
    }
}

/// Checks a variable name.
///
/// # Errors
///
/// Returns a malformed identifier error naming `path` if `name` is invalid.
pub fn check_variable(name: &str, path: &str) -> Result<()> {
    if is_variable_name(name) {
        Ok(())
    } else {
        Err(Error::malformed_identifier(name, path))
    }
}
