//! N-Triples model loading.
//!
//! Reads the line-based N-Triples format into a [`Graph`]. Literal language
//! tags and datatypes are accepted and dropped; terms keep only their lexical
//! form.

use std::fs;
use std::path::Path;
use std::str::CharIndices;

use brickrules_foundation::{Error, Iri, Result, Term};
use brickrules_storage::Graph;

/// Parses N-Triples text.
///
/// # Errors
///
/// Returns a graph syntax error naming the first malformed line.
pub fn parse_ntriples(text: &str) -> Result<Graph> {
    let mut graph = Graph::new();
    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut cursor = Cursor::new(trimmed, line_no);
        let subject = cursor.term()?;
        let Term::Iri(predicate) = cursor.term()? else {
            return Err(Error::graph_syntax(line_no, "predicate must be an IRI"));
        };
        let object = cursor.term()?;
        cursor.finish()?;

        graph
            .insert(subject, predicate, object)
            .map_err(|e| Error::graph_syntax(line_no, e.to_string()))?;
    }
    Ok(graph)
}

/// Reads and parses an N-Triples file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is malformed.
pub fn load_graph(path: &Path) -> Result<Graph> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::io(format!("failed to read {}: {e}", path.display())))?;
    parse_ntriples(&text)
}

struct Cursor<'a> {
    rest: &'a str,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, line: usize) -> Self {
        Self { rest: text, line }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::graph_syntax(self.line, message)
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn term(&mut self) -> Result<Term> {
        self.skip_ws();
        match self.rest.chars().next() {
            Some('<') => Ok(Term::Iri(self.iri()?)),
            Some('_') => self.blank(),
            Some('"') => self.literal(),
            Some(c) => Err(self.error(format!("unexpected character `{c}`"))),
            None => Err(self.error("unexpected end of line")),
        }
    }

    fn iri(&mut self) -> Result<Iri> {
        let rest = self.rest;
        let body = &rest[1..];
        let Some(end) = body.find('>') else {
            return Err(self.error("unterminated IRI"));
        };
        let iri = &body[..end];
        if iri.is_empty() || iri.chars().any(char::is_whitespace) {
            return Err(self.error(format!("invalid IRI `<{iri}>`")));
        }
        self.rest = &body[end + 1..];
        Ok(Iri::new(iri))
    }

    fn blank(&mut self) -> Result<Term> {
        let rest = self.rest;
        let Some(body) = rest.strip_prefix("_:") else {
            return Err(self.error("expected blank node label"));
        };
        let end = body
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
            .unwrap_or(body.len());
        // A label may contain dots but never ends in one.
        let label = body[..end].trim_end_matches('.');
        if label.is_empty() {
            return Err(self.error("empty blank node label"));
        }
        self.rest = &body[label.len()..];
        Ok(Term::blank(label))
    }

    fn literal(&mut self) -> Result<Term> {
        let rest = self.rest;
        let mut value = String::new();
        let mut chars = rest[1..].char_indices();
        let end = loop {
            match chars.next() {
                Some((i, '"')) => break i + 2,
                Some((_, '\\')) => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, c @ ('"' | '\\'))) => value.push(c),
                    Some((_, 'u')) => value.push(self.unicode_escape(&mut chars, 4)?),
                    Some((_, 'U')) => value.push(self.unicode_escape(&mut chars, 8)?),
                    Some((_, c)) => return Err(self.error(format!("unsupported escape `\\{c}`"))),
                    None => return Err(self.error("unterminated literal")),
                },
                Some((_, c)) => value.push(c),
                None => return Err(self.error("unterminated literal")),
            }
        };
        self.rest = &rest[end..];

        let rest = self.rest;
        if let Some(tagged) = rest.strip_prefix('@') {
            let len = tagged
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
                .unwrap_or(tagged.len());
            self.rest = &tagged[len..];
        } else if let Some(typed) = rest.strip_prefix("^^") {
            self.rest = typed;
            if !self.rest.starts_with('<') {
                return Err(self.error("expected datatype IRI"));
            }
            self.iri()?;
        }
        Ok(Term::literal(value))
    }

    /// Decodes the hex digits of a `\u` or `\U` escape.
    fn unicode_escape(&self, chars: &mut CharIndices<'_>, digits: usize) -> Result<char> {
        let mut code = 0u32;
        for _ in 0..digits {
            let Some(digit) = chars.next().and_then(|(_, c)| c.to_digit(16)) else {
                return Err(self.error(format!("expected {digits} hex digits in unicode escape")));
            };
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| self.error(format!("invalid code point U+{code:X}")))
    }

    fn finish(&mut self) -> Result<()> {
        self.skip_ws();
        let Some(rest) = self.rest.strip_prefix('.') else {
            return Err(self.error("expected `.` at end of triple"));
        };
        let rest = rest.trim();
        if rest.is_empty() || rest.starts_with('#') {
            Ok(())
        } else {
            Err(self.error(format!("unexpected trailing content `{rest}`")))
        }
    }
}
