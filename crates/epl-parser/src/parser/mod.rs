//! Recursive descent parser for EPL
//!
//! The whole statement is tokenized up front so any rule can look ahead with
//! [`Parser::peek_nth`] or run a trial parse between [`Parser::save`] and
//! [`Parser::restore`]. Each sub-language lives in its own file as another
//! `impl Parser` block.

mod clause;
mod context;
mod create;
mod expr;
mod match_recognize;
mod on_action;
mod pattern;
mod statement;

use std::cell::RefCell;
use std::rc::Rc;

use epl_core::span::Span;
use epl_core::types::{ArrayDimension, TypeName};

use crate::config::ParserConfig;
use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::keywords::keyword_table;
use crate::lexer::{tokenize, SpannedToken, Token};

/// Parser state for one statement
pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<SpannedToken>,
    pos: usize,
    config: &'a ParserConfig,
    depth: usize,
    breadcrumbs: Rc<RefCell<Vec<&'static str>>>,
}

/// Pops its clause name off the breadcrumb stack when dropped, whichever way
/// the clause rule returns.
pub(crate) struct ClauseGuard {
    stack: Rc<RefCell<Vec<&'static str>>>,
}

impl Drop for ClauseGuard {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, config: &'a ParserConfig) -> ParseResult<Self> {
        let tokens = tokenize(source)?;
        Ok(Self {
            source,
            tokens,
            pos: 0,
            config,
            depth: 0,
            breadcrumbs: Rc::new(RefCell::new(Vec::new())),
        })
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    // ========================================================================
    // Cursor
    // ========================================================================

    /// Token `n` places ahead; past the end this is always the final `Eof`.
    fn nth(&self, n: usize) -> &SpannedToken {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.pos + n).min(last)]
    }

    fn current(&self) -> &SpannedToken {
        self.nth(0)
    }

    fn peek(&self) -> &Token {
        &self.nth(0).token
    }

    fn peek_nth(&self, n: usize) -> &Token {
        &self.nth(n).token
    }

    fn span(&self) -> Span {
        self.current().span
    }

    fn prev_span(&self) -> Span {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(tok) => tok.span,
            None => self.span(),
        }
    }

    fn advance(&mut self) -> SpannedToken {
        let tok = self.current().clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        tok
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof)
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn check_nth(&self, n: usize, token: &Token) -> bool {
        std::mem::discriminant(self.peek_nth(n)) == std::mem::discriminant(token)
    }

    fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, expected: &Token, what: &str) -> ParseResult<Span> {
        if self.check(expected) {
            Ok(self.advance().span)
        } else {
            Err(self.expected(what))
        }
    }

    // ========================================================================
    // Trial parsing
    // ========================================================================

    fn save(&self) -> usize {
        self.pos
    }

    fn restore(&mut self, saved: usize, rule: &'static str) {
        if self.config.trace_backtracking {
            tracing::trace!(rule, position = self.current().span.start, "rewinding trial parse");
        }
        self.pos = saved;
    }

    /// Runs `f` and rewinds when it fails, returning `None` instead of the error.
    fn attempt<T>(
        &mut self,
        rule: &'static str,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> Option<T> {
        let saved = self.save();
        match f(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.restore(saved, rule);
                None
            }
        }
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Pushes a clause name that stays on the breadcrumb stack until the guard drops.
    fn enter(&self, clause: &'static str) -> ClauseGuard {
        self.breadcrumbs.borrow_mut().push(clause);
        ClauseGuard {
            stack: Rc::clone(&self.breadcrumbs),
        }
    }

    fn error_at(&self, kind: ParseErrorKind, tok: &SpannedToken, message: String) -> ParseError {
        let breadcrumbs = self
            .breadcrumbs
            .borrow()
            .iter()
            .map(|b| b.to_string())
            .collect();
        ParseError::new(kind, message, tok.span.start, tok.line, tok.column)
            .with_breadcrumbs(breadcrumbs)
    }

    fn error_here(&self, message: impl Into<String>) -> ParseError {
        self.error_at(ParseErrorKind::Syntax, self.current(), message.into())
    }

    fn expected(&self, what: &str) -> ParseError {
        let found = keyword_table().paraphrase(self.peek());
        self.error_here(format!("expected {what}, found {found}"))
    }

    /// Fails with an internal ambiguity when a repetition made no progress.
    fn ensure_progress(&self, before: usize, rule: &str) -> ParseResult<()> {
        if self.pos == before {
            return Err(self.error_at(
                ParseErrorKind::InternalAmbiguity,
                self.current(),
                format!("{rule} repetition consumed no input"),
            ));
        }
        Ok(())
    }

    /// Runs a rule one nesting level deeper.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= self.config.max_nesting_depth {
            return Err(self.error_here(format!(
                "nesting too deep (limit {})",
                self.config.max_nesting_depth
            )));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ========================================================================
    // Contextual words
    // ========================================================================

    /// Whether the token `n` ahead is the plain identifier `word`.
    fn nth_is_word(&self, n: usize, word: &str) -> bool {
        matches!(self.peek_nth(n), Token::Ident(s) if s.eq_ignore_ascii_case(word))
    }

    fn is_word(&self, word: &str) -> bool {
        self.nth_is_word(0, word)
    }

    fn match_word(&mut self, word: &str) -> bool {
        if self.is_word(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    fn is_strict_ident(token: &Token) -> bool {
        matches!(token, Token::Ident(_) | Token::EscapedIdent(_))
    }

    /// Identifier, or a keyword the resolver accepts in identifier position.
    fn is_name(&self, token: &Token) -> bool {
        Self::is_strict_ident(token)
            || (self.config.allow_keywords_as_identifiers
                && keyword_table().is_ident_allowed(token))
    }

    fn check_name(&self) -> bool {
        self.is_name(self.peek())
    }

    fn check_name_nth(&self, n: usize) -> bool {
        self.is_name(self.peek_nth(n))
    }

    /// Text of a name token; keywords keep their source spelling.
    fn token_name(&self, tok: &SpannedToken) -> String {
        match &tok.token {
            Token::Ident(name) | Token::EscapedIdent(name) => name.clone(),
            _ => tok
                .span
                .slice(self.source)
                .map(str::to_string)
                .unwrap_or_else(|| tok.token.to_string()),
        }
    }

    /// A keyword spelled in CamelCase, as event type names are: `Order`, `Window`.
    fn camel_case_keyword(&self) -> bool {
        let tok = self.current();
        if !tok.token.is_keyword() {
            return false;
        }
        tok.span.slice(self.source).is_some_and(|text| {
            text.starts_with(|c: char| c.is_ascii_uppercase())
                && text.chars().any(|c| c.is_ascii_lowercase())
        })
    }

    /// A plain or backtick-escaped identifier; keywords are rejected.
    fn parse_ident(&mut self, what: &str) -> ParseResult<String> {
        if Self::is_strict_ident(self.peek()) {
            let tok = self.advance();
            Ok(self.token_name(&tok))
        } else {
            Err(self.expected(what))
        }
    }

    /// An identifier in a position where context-free keywords are accepted.
    fn parse_name(&mut self, what: &str) -> ParseResult<String> {
        if self.check_name() {
            let tok = self.advance();
            Ok(self.token_name(&tok))
        } else {
            Err(self.expected(what))
        }
    }

    /// `a.b.c`; stops before a `.ns:` view and before `.*`.
    fn parse_dotted_ident(&mut self, what: &str) -> ParseResult<String> {
        let mut name = self.parse_ident(what)?;
        while self.check(&Token::Dot)
            && Self::is_strict_ident(self.peek_nth(1))
            && !self.check_nth(2, &Token::Colon)
        {
            self.advance();
            let part = self.parse_ident(what)?;
            name.push('.');
            name.push_str(&part);
        }
        Ok(name)
    }

    /// `[alias]` after `as`, or a bare strict identifier.
    fn parse_optional_alias(&mut self) -> ParseResult<Option<String>> {
        if self.match_token(&Token::As) {
            return Ok(Some(self.parse_name("alias")?));
        }
        if Self::is_strict_ident(self.peek()) {
            return Ok(Some(self.parse_ident("alias")?));
        }
        Ok(None)
    }

    // ========================================================================
    // Type names
    // ========================================================================

    /// `com.acme.Type<Arg, ...>[][qualifier]`
    fn parse_type_name(&mut self) -> ParseResult<TypeName> {
        let mut ty = self.parse_class_name()?;
        self.parse_type_dimensions(&mut ty)?;
        Ok(ty)
    }

    /// Dotted name with generic arguments, without array dimensions.
    fn parse_class_name(&mut self) -> ParseResult<TypeName> {
        let name = self.parse_dotted_ident("type name")?;
        let mut ty = TypeName::simple(name);
        if self.match_token(&Token::Lt) {
            loop {
                ty.type_args.push(self.nested(|p| p.parse_type_name())?);
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
            self.consume(&Token::Gt, "'>'")?;
        }
        Ok(ty)
    }

    fn parse_type_dimensions(&mut self, ty: &mut TypeName) -> ParseResult<()> {
        loop {
            if self.check(&Token::LBracket) && self.check_nth(1, &Token::RBracket) {
                self.advance();
                self.advance();
                ty.dimensions.push(ArrayDimension { qualifier: None });
            } else if self.check(&Token::LBracket)
                && Self::is_strict_ident(self.peek_nth(1))
                && self.check_nth(2, &Token::RBracket)
            {
                self.advance();
                let qualifier = self.parse_ident("array qualifier")?;
                self.advance();
                ty.dimensions.push(ArrayDimension {
                    qualifier: Some(qualifier),
                });
            } else {
                return Ok(());
            }
        }
    }

    // ========================================================================
    // Utilities
    // ========================================================================

    /// One or more items separated by commas.
    fn comma_separated<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Vec<T>> {
        let mut items = vec![item(self)?];
        while self.match_token(&Token::Comma) {
            items.push(item(self)?);
        }
        Ok(items)
    }

    /// `( item, ... )`, possibly empty.
    fn paren_list<T>(
        &mut self,
        item: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Vec<T>> {
        self.consume(&Token::LParen, "'('")?;
        if self.match_token(&Token::RParen) {
            return Ok(Vec::new());
        }
        let items = self.comma_separated(item)?;
        self.consume(&Token::RParen, "')'")?;
        Ok(items)
    }

    /// Expects the end of the statement, allowing one trailing `;`.
    fn finish(&mut self) -> ParseResult<()> {
        self.match_token(&Token::Semicolon);
        if !self.is_at_end() {
            return Err(self.expected("end of input"));
        }
        Ok(())
    }
}
