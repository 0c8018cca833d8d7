//! Row-pattern recognition clause

use epl_core::ast::*;
use epl_core::span::Spanned;

use super::Parser;
use crate::error::ParseResult;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    /// `match_recognize ( [partition by ...] measures ... [all matches] [after ...]
    /// pattern (...) [interval ... [or terminated]] [define ...] )`
    pub(crate) fn parse_match_recognize(&mut self) -> ParseResult<MatchRecognize> {
        let _clause = self.enter("match_recognize clause");
        let start = self.consume(&Token::MatchRecognize, "'match_recognize'")?;
        self.consume(&Token::LParen, "'('")?;

        let partition_by = if self.match_token(&Token::Partition) {
            self.consume(&Token::By, "'by'")?;
            self.parse_expr_list()?
        } else {
            Vec::new()
        };

        self.consume(&Token::Measures, "'measures'")?;
        let measures = self.comma_separated(|p| {
            let expr = p.parse_expr()?;
            let alias = p.parse_optional_alias()?;
            Ok(MeasureItem { expr, alias })
        })?;

        let all_matches = if self.match_token(&Token::All) {
            self.consume(&Token::Matches, "'matches'")?;
            true
        } else {
            false
        };

        let after_skip = if self.match_token(&Token::After) {
            Some(self.parse_after_skip()?)
        } else {
            None
        };

        self.consume(&Token::Pattern, "'pattern'")?;
        self.consume(&Token::LParen, "'('")?;
        let pattern = self.parse_row_alternation()?;
        self.consume(&Token::RParen, "')'")?;

        let interval = if self.match_word("interval") {
            let period = self.parse_time_period()?;
            let or_terminated = self.check(&Token::Or) && self.check_nth(1, &Token::Terminated);
            if or_terminated {
                self.advance();
                self.advance();
            }
            Some(MatchInterval {
                period,
                or_terminated,
            })
        } else {
            None
        };

        let define = if self.match_token(&Token::Define) {
            self.comma_separated(|p| {
                let variable = p.parse_name("pattern variable")?;
                p.consume(&Token::As, "'as'")?;
                let condition = p.parse_expr()?;
                Ok(DefineItem {
                    variable,
                    condition,
                })
            })?
        } else {
            Vec::new()
        };

        let end = self.consume(&Token::RParen, "')'")?;
        Ok(MatchRecognize {
            partition_by,
            measures,
            all_matches,
            after_skip,
            pattern,
            interval,
            define,
            span: start.merge(end),
        })
    }

    /// Five words such as `match skip to current row`, kept as written.
    fn parse_after_skip(&mut self) -> ParseResult<AfterSkip> {
        let mut words = Vec::with_capacity(5);
        for _ in 0..5 {
            let is_word = matches!(self.peek(), Token::Ident(_)) || self.peek().is_keyword();
            if !is_word {
                return Err(self.expected("skip clause word"));
            }
            let tok = self.advance();
            words.push(self.token_name(&tok));
        }
        Ok(AfterSkip { words })
    }

    // ========================================================================
    // Row patterns
    // ========================================================================

    fn parse_row_alternation(&mut self) -> ParseResult<RowPattern> {
        self.nested(|p| {
            let first = p.parse_row_concat()?;
            if !p.check(&Token::Pipe) {
                return Ok(first);
            }
            let start = first.span;
            let mut items = vec![first];
            while p.match_token(&Token::Pipe) {
                items.push(p.parse_row_concat()?);
            }
            Ok(Spanned::new(
                RowPatternKind::Alternation(items),
                start.merge(p.prev_span()),
            ))
        })
    }

    fn parse_row_concat(&mut self) -> ParseResult<RowPattern> {
        let start = self.span();
        let mut items = Vec::new();
        while !matches!(
            self.peek(),
            Token::Pipe | Token::RParen | Token::Comma | Token::Eof
        ) {
            let before = self.save();
            items.push(self.parse_row_item()?);
            self.ensure_progress(before, "row pattern")?;
        }
        match items.len() {
            0 => Err(self.expected("pattern variable")),
            1 => Ok(items.remove(0)),
            _ => Ok(Spanned::new(
                RowPatternKind::Concat(items),
                start.merge(self.prev_span()),
            )),
        }
    }

    fn parse_row_item(&mut self) -> ParseResult<RowPattern> {
        let start = self.span();
        let permute = self.check(&Token::MatchRecognizePermute)
            || (self.is_word("permute") && self.check_nth(1, &Token::LParen));
        let kind = if permute {
            self.advance();
            RowPatternKind::Permute(self.paren_list(|p| p.parse_row_alternation())?)
        } else if self.match_token(&Token::LParen) {
            let inner = Box::new(self.parse_row_alternation()?);
            self.consume(&Token::RParen, "')'")?;
            let (quantifier, repeat) = self.parse_row_suffix()?;
            RowPatternKind::Nested {
                inner,
                quantifier,
                repeat,
            }
        } else {
            let variable = self.parse_name("pattern variable")?;
            let (quantifier, repeat) = self.parse_row_suffix()?;
            RowPatternKind::Atom {
                variable,
                quantifier,
                repeat,
            }
        };
        Ok(Spanned::new(kind, start.merge(self.prev_span())))
    }

    /// `*`, `+`, `?` with an optional reluctant `?`, then `{m,n}` bounds.
    fn parse_row_suffix(&mut self) -> ParseResult<(Option<RowQuantifier>, Option<RepeatBounds>)> {
        let kind = match self.peek() {
            Token::Star => Some(QuantifierKind::ZeroOrMore),
            Token::Plus => Some(QuantifierKind::OneOrMore),
            Token::Question => Some(QuantifierKind::ZeroOrOne),
            _ => None,
        };
        let quantifier = kind.map(|kind| {
            self.advance();
            let reluctant = self.match_token(&Token::Question);
            RowQuantifier { kind, reluctant }
        });
        let repeat = if self.match_token(&Token::LBrace) {
            let min = if matches!(self.peek(), Token::Comma | Token::RBrace) {
                None
            } else {
                Some(self.parse_expr()?)
            };
            let has_comma = self.match_token(&Token::Comma);
            let max = if has_comma && !self.check(&Token::RBrace) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            self.consume(&Token::RBrace, "'}'")?;
            Some(RepeatBounds {
                min,
                max,
                has_comma,
            })
        } else {
            None
        };
        Ok((quantifier, repeat))
    }
}
