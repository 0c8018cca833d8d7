//! Temporal patterns: `pattern [every a=A -> (B or timer:interval(5 sec))]`
//!
//! Precedence from loosest to tightest: followed-by, `or`, `and`, match-until,
//! the `every`/`not`/`every-distinct` qualifiers, guards, atoms.

use epl_core::ast::*;
use epl_core::span::Spanned;

use super::Parser;
use crate::error::ParseResult;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    /// `pattern [@anno ...] [ ... ]`
    pub(crate) fn parse_pattern_inclusion(&mut self) -> ParseResult<PatternInclusion> {
        self.consume(&Token::Pattern, "'pattern'")?;
        let mut annotations = Vec::new();
        while self.check(&Token::AtSign) {
            annotations.push(self.parse_annotation()?);
        }
        self.consume(&Token::LBracket, "'['")?;
        let pattern = self.parse_pattern()?;
        self.consume(&Token::RBracket, "']'")?;
        Ok(PatternInclusion {
            annotations,
            pattern,
        })
    }

    pub(crate) fn parse_pattern(&mut self) -> ParseResult<Pattern> {
        self.nested(|p| p.parse_followed_by())
    }

    // ========================================================================
    // Binary levels
    // ========================================================================

    fn parse_followed_by(&mut self) -> ParseResult<Pattern> {
        let first = self.parse_pattern_or()?;
        let start = first.span;
        let mut links = vec![FollowedByLink {
            max: None,
            pattern: first,
        }];
        loop {
            let max = if self.match_token(&Token::Arrow) {
                None
            } else if self.check(&Token::Minus) && self.check_nth(1, &Token::LBracket) {
                self.advance();
                self.advance();
                let max = self.parse_expr()?;
                self.consume(&Token::RBracket, "']'")?;
                // both `-[n]>` and `-[n]->` close the bound
                if !self.match_token(&Token::Gt) {
                    self.consume(&Token::Arrow, "'>' or '->'")?;
                }
                Some(max)
            } else {
                break;
            };
            let pattern = self.parse_pattern_or()?;
            links.push(FollowedByLink { max, pattern });
        }
        if links.len() == 1 {
            if let Some(link) = links.pop() {
                return Ok(link.pattern);
            }
        }
        Ok(Spanned::new(
            PatternKind::FollowedBy(links),
            start.merge(self.prev_span()),
        ))
    }

    fn parse_pattern_or(&mut self) -> ParseResult<Pattern> {
        let first = self.parse_pattern_and()?;
        if !self.check(&Token::Or) {
            return Ok(first);
        }
        let start = first.span;
        let mut items = vec![first];
        while self.match_token(&Token::Or) {
            items.push(self.parse_pattern_and()?);
        }
        Ok(Spanned::new(
            PatternKind::Or(items),
            start.merge(self.prev_span()),
        ))
    }

    fn parse_pattern_and(&mut self) -> ParseResult<Pattern> {
        let first = self.parse_match_until()?;
        if !self.check(&Token::And) {
            return Ok(first);
        }
        let start = first.span;
        let mut items = vec![first];
        while self.match_token(&Token::And) {
            items.push(self.parse_match_until()?);
        }
        Ok(Spanned::new(
            PatternKind::And(items),
            start.merge(self.prev_span()),
        ))
    }

    /// `[range] A [until B]`
    fn parse_match_until(&mut self) -> ParseResult<Pattern> {
        let start = self.span();
        let range = if self.check(&Token::LBracket) {
            Some(self.parse_repeat_range()?)
        } else {
            None
        };
        let inner = self.parse_qualified()?;
        let until = if self.match_token(&Token::Until) {
            Some(Box::new(self.parse_qualified()?))
        } else {
            None
        };
        if range.is_none() && until.is_none() {
            return Ok(inner);
        }
        Ok(Spanned::new(
            PatternKind::MatchUntil {
                range,
                inner: Box::new(inner),
                until,
            },
            start.merge(self.prev_span()),
        ))
    }

    // ========================================================================
    // Qualifiers, guards, atoms
    // ========================================================================

    fn parse_qualified(&mut self) -> ParseResult<Pattern> {
        let start = self.span();
        let kind = match self.peek() {
            Token::Every => {
                self.advance();
                PatternKind::Every(Box::new(self.parse_qualified_operand()?))
            }
            Token::Not => {
                self.advance();
                PatternKind::Not(Box::new(self.parse_qualified_operand()?))
            }
            Token::EveryDistinct => {
                self.advance();
                let keys = self.paren_list(|p| p.parse_time_arg())?;
                let inner = Box::new(self.parse_qualified_operand()?);
                PatternKind::EveryDistinct { keys, inner }
            }
            _ => return self.parse_guarded(),
        };
        Ok(Spanned::new(kind, start.merge(self.prev_span())))
    }

    /// Operand of a qualifier; a nested qualifier needs parentheses.
    fn parse_qualified_operand(&mut self) -> ParseResult<Pattern> {
        if !self.check(&Token::LBracket) {
            return self.parse_guarded();
        }
        let start = self.span();
        let range = self.parse_repeat_range()?;
        let inner = Box::new(self.parse_guarded()?);
        Ok(Spanned::new(
            PatternKind::Repeat { range, inner },
            start.merge(self.prev_span()),
        ))
    }

    fn parse_guarded(&mut self) -> ParseResult<Pattern> {
        let atom = self.parse_pattern_atom()?;
        let guard = if self.match_token(&Token::Where) {
            PatternGuard::Where(self.parse_pattern_call()?)
        } else if self.match_token(&Token::While) {
            self.consume(&Token::LParen, "'('")?;
            let expr = self.parse_expr()?;
            self.consume(&Token::RParen, "')'")?;
            PatternGuard::While(expr)
        } else {
            return Ok(atom);
        };
        let span = atom.span.merge(self.prev_span());
        Ok(Spanned::new(
            PatternKind::Guard {
                inner: Box::new(atom),
                guard,
            },
            span,
        ))
    }

    fn parse_pattern_atom(&mut self) -> ParseResult<Pattern> {
        let start = self.span();
        if self.match_token(&Token::LParen) {
            let inner = self.parse_pattern()?;
            let end = self.consume(&Token::RParen, "')'")?;
            return Ok(Spanned::new(inner.node, start.merge(end)));
        }
        if self.check_name() && self.check_nth(1, &Token::Colon) {
            let call = self.parse_pattern_call()?;
            return Ok(Spanned::new(
                PatternKind::Observer(call),
                start.merge(self.prev_span()),
            ));
        }
        let filter = self.parse_event_filter()?;
        let consume = if self.check(&Token::AtSign) && Self::is_strict_ident(self.peek_nth(1)) {
            self.advance();
            let name = self.parse_ident("filter annotation")?;
            let level = if self.match_token(&Token::LParen) {
                let level = self.parse_integer("consume level")?;
                self.consume(&Token::RParen, "')'")?;
                Some(level)
            } else {
                None
            };
            Some(ConsumeLevel { name, level })
        } else {
            None
        };
        Ok(Spanned::new(
            PatternKind::Filter { filter, consume },
            start.merge(self.prev_span()),
        ))
    }

    /// `ns:name(args)` for observers and `where` guards
    fn parse_pattern_call(&mut self) -> ParseResult<PatternCall> {
        let namespace = self.parse_name("observer namespace")?;
        self.consume(&Token::Colon, "':'")?;
        let name = self.parse_name("observer name")?;
        let args = self.paren_list(|p| p.parse_function_arg())?;
        Ok(PatternCall {
            namespace,
            name,
            args,
        })
    }

    /// `[n]`, `[lo:hi]`, `[lo:]`, `[:hi]`
    fn parse_repeat_range(&mut self) -> ParseResult<RepeatRange> {
        self.consume(&Token::LBracket, "'['")?;
        let range = if self.match_token(&Token::Colon) {
            RepeatRange {
                low: None,
                high: Some(self.parse_expr()?),
                bounded_by_colon: true,
            }
        } else {
            let low = self.parse_expr()?;
            if self.match_token(&Token::Colon) {
                let high = if self.check(&Token::RBracket) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                RepeatRange {
                    low: Some(low),
                    high,
                    bounded_by_colon: true,
                }
            } else {
                RepeatRange::exact(low)
            }
        };
        self.consume(&Token::RBracket, "']'")?;
        Ok(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;

    fn pattern(source: &str) -> Pattern {
        let config = ParserConfig::default();
        let mut parser = Parser::new(source, &config).unwrap();
        let pattern = parser.parse_pattern().unwrap();
        assert!(parser.is_at_end(), "trailing input in {source}");
        pattern
    }

    #[test]
    fn test_followed_by_binds_loosest() {
        let p = pattern("every a=A -> B or C and not D");
        let PatternKind::FollowedBy(links) = &p.node else {
            panic!("expected followed-by, got {:?}", p.node);
        };
        assert_eq!(links.len(), 2);
        assert!(matches!(links[0].pattern.node, PatternKind::Every(_)));
        let PatternKind::Or(items) = &links[1].pattern.node else {
            panic!("expected or");
        };
        assert!(matches!(items[1].node, PatternKind::And(_)));
    }

    #[test]
    fn test_bounded_followed_by_spellings() {
        for source in ["A -[10]> B", "A -[10]-> B"] {
            let p = pattern(source);
            let PatternKind::FollowedBy(links) = &p.node else {
                panic!("expected followed-by");
            };
            assert!(links[0].max.is_none());
            assert!(links[1].max.is_some());
        }
    }

    #[test]
    fn test_every_with_repeat_and_guard() {
        let p = pattern("every [3] A where timer:within(10 sec)");
        let PatternKind::Every(inner) = &p.node else {
            panic!("expected every");
        };
        let PatternKind::Repeat { range, inner } = &inner.node else {
            panic!("expected repeat");
        };
        assert!(range.is_exact());
        assert!(matches!(inner.node, PatternKind::Guard { .. }));
    }

    #[test]
    fn test_match_until_ranges() {
        let p = pattern("[2:] A until B");
        let PatternKind::MatchUntil { range, until, .. } = &p.node else {
            panic!("expected match-until");
        };
        let range = range.as_ref().unwrap();
        assert!(range.bounded_by_colon && range.high.is_none());
        assert!(until.is_some());

        let p = pattern("[:5] A");
        assert!(matches!(p.node, PatternKind::MatchUntil { until: None, .. }));
    }

    #[test]
    fn test_observer_and_consume() {
        let p = pattern("timer:interval(5 sec) or A(x > 1) @consume(2)");
        let PatternKind::Or(items) = &p.node else {
            panic!("expected or");
        };
        assert!(matches!(items[0].node, PatternKind::Observer(_)));
        let PatternKind::Filter { consume, .. } = &items[1].node else {
            panic!("expected filter");
        };
        assert_eq!(consume.as_ref().and_then(|c| c.level), Some(2));
    }

    #[test]
    fn test_nested_qualifier_needs_parens() {
        assert!(matches!(
            pattern("every (every A)").node,
            PatternKind::Every(_)
        ));
        let config = ParserConfig::default();
        let mut parser = Parser::new("every every A", &config).unwrap();
        assert!(parser.parse_pattern().is_err());
    }
}
