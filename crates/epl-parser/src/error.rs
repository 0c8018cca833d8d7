//! Parser error types

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseErrorKind {
    /// Unrecognized character or unterminated literal
    Lexical,
    /// No viable alternative or unexpected token
    Syntax,
    /// A grammar loop that stopped making progress
    InternalAmbiguity,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseErrorKind::Lexical => "lexical error",
            ParseErrorKind::Syntax => "syntax error",
            ParseErrorKind::InternalAmbiguity => "internal ambiguity",
        })
    }
}

/// A failed parse: what went wrong, where, and which clauses were open.
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
#[error("{kind} at line {line}, column {column}: {message}{}", BreadcrumbSuffix(.breadcrumbs))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    /// Byte offset into the statement text
    pub position: usize,
    pub line: usize,
    pub column: usize,
    /// Clause names active at the failure, outermost first
    pub breadcrumbs: Vec<String>,
}

struct BreadcrumbSuffix<'a>(&'a [String]);

impl fmt::Display for BreadcrumbSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, " (while parsing {})", self.0.join(" > "))
    }
}

impl ParseError {
    pub fn new(
        kind: ParseErrorKind,
        message: impl Into<String>,
        position: usize,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            position,
            line,
            column,
            breadcrumbs: Vec::new(),
        }
    }

    pub fn lexical(message: impl Into<String>, position: usize, line: usize, column: usize) -> Self {
        Self::new(ParseErrorKind::Lexical, message, position, line, column)
    }

    pub fn syntax(message: impl Into<String>, position: usize, line: usize, column: usize) -> Self {
        Self::new(ParseErrorKind::Syntax, message, position, line, column)
    }

    pub fn with_breadcrumbs(mut self, breadcrumbs: Vec<String>) -> Self {
        self.breadcrumbs = breadcrumbs;
        self
    }

    pub fn is_lexical(&self) -> bool {
        self.kind == ParseErrorKind::Lexical
    }

    pub fn is_syntax(&self) -> bool {
        self.kind == ParseErrorKind::Syntax
    }

    /// Whether `clause` was being parsed when the error occurred.
    pub fn in_clause(&self, clause: &str) -> bool {
        self.breadcrumbs.iter().any(|b| b == clause)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_breadcrumbs() {
        let err = ParseError::syntax("expected expression, found 'from' keyword", 7, 1, 8)
            .with_breadcrumbs(vec!["select statement".into(), "select clause".into()]);
        assert_eq!(
            err.to_string(),
            "syntax error at line 1, column 8: expected expression, found 'from' keyword \
             (while parsing select statement > select clause)"
        );
        assert!(err.in_clause("select clause"));
        assert!(err.is_syntax());
    }

    #[test]
    fn test_display_without_breadcrumbs() {
        let err = ParseError::lexical("unrecognized character '§'", 3, 2, 1);
        assert_eq!(err.to_string(), "lexical error at line 2, column 1: unrecognized character '§'");
    }
}
