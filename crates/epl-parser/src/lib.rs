//! EPL Parser
//!
//! Lexing and recursive-descent parsing of EPL statements into the
//! [`epl_core::ast`] tree. The main entry point is [`parse_statement`]:
//!
//! ```
//! let stmt = epl_parser::parse_statement("select sym, avg(price) from Trade#length(100) group by sym")?;
//! assert_eq!(stmt.body.node.label(), "select");
//! # Ok::<(), epl_parser::ParseError>(())
//! ```
//!
//! Every statement re-serializes through `Display`, and parsing that text
//! again gives back the same tree apart from spans.

pub mod config;
pub mod error;
pub mod helpers;
pub mod keywords;
pub mod lexer;
pub mod parser;

use epl_core::ast::{Chain, JsonValue, Statement};
use epl_core::span::Spanned;

pub use config::ParserConfig;
pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::{tokenize, Token};
pub use parser::Parser;

/// Parse one statement with the default configuration.
pub fn parse_statement(source: &str) -> ParseResult<Statement> {
    parse_statement_with(source, &ParserConfig::default())
}

#[tracing::instrument(level = "trace", skip_all, fields(len = source.len()))]
pub fn parse_statement_with(source: &str, config: &ParserConfig) -> ParseResult<Statement> {
    let mut parser = Parser::new(source, config)?;
    match parser.parse_statement() {
        Ok(stmt) => {
            tracing::debug!(
                kind = stmt.body.node.label(),
                tokens = parser.token_count(),
                "parsed statement"
            );
            Ok(stmt)
        }
        Err(err) => {
            tracing::debug!(
                line = err.line,
                column = err.column,
                clause = err.breadcrumbs.last().map(String::as_str),
                "statement rejected: {}",
                err.message
            );
            Err(err)
        }
    }
}

/// Parse an event property path such as `order.lines[0].price?`.
#[tracing::instrument(level = "trace", skip_all, fields(len = source.len()))]
pub fn parse_property_path(source: &str) -> ParseResult<Spanned<Chain>> {
    let config = ParserConfig::default();
    Parser::new(source, &config)?.parse_property_path()
}

/// Parse a JSON value in EPL literal syntax; keys may be quoted either way.
#[tracing::instrument(level = "trace", skip_all, fields(len = source.len()))]
pub fn parse_json_value(source: &str) -> ParseResult<JsonValue> {
    let config = ParserConfig::default();
    Parser::new(source, &config)?.parse_json_document()
}
