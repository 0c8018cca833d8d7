//! Context declarations: the detail after `create context Name as`

use epl_core::ast::*;
use epl_core::span::Spanned;

use super::Parser;
use crate::error::ParseResult;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    pub(crate) fn parse_context_detail(&mut self) -> ParseResult<ContextDetail> {
        self.nested(|p| {
            let start = p.span();
            let kind = match p.peek() {
                Token::Context => p.parse_nested_contexts()?,
                Token::Start => p.parse_range_context()?,
                Token::Initiated => p.parse_initiated_context()?,
                Token::Partition => p.parse_partition_context()?,
                Token::Group => p.parse_grouped_context()?,
                Token::Coalesce => p.parse_coalesce_context()?,
                _ => return Err(p.expected("context detail")),
            };
            Ok(Spanned::new(kind, start.merge(p.prev_span())))
        })
    }

    /// A comma that continues the current list rather than starting a nested context.
    fn comma_continues(&self) -> bool {
        self.check(&Token::Comma) && !self.check_nth(1, &Token::Context)
    }

    fn at_now(&self) -> bool {
        self.check(&Token::AtSign) && self.nth_is_word(1, "now")
    }

    fn parse_nested_contexts(&mut self) -> ParseResult<ContextDetailKind> {
        let mut contexts = Vec::new();
        loop {
            self.consume(&Token::Context, "'context'")?;
            let name = self.parse_ident("context name")?;
            self.consume(&Token::As, "'as'")?;
            let detail = self.parse_context_detail()?;
            contexts.push(NestedContext { name, detail });
            if !(self.check(&Token::Comma) && self.check_nth(1, &Token::Context)) {
                break;
            }
            self.advance();
        }
        Ok(ContextDetailKind::Nested(contexts))
    }

    fn parse_range_context(&mut self) -> ParseResult<ContextDetailKind> {
        self.consume(&Token::Start, "'start'")?;
        let start = if self.at_now() {
            self.advance();
            self.advance();
            ContextStart::Now
        } else {
            ContextStart::Point(self.parse_range_point()?)
        };
        let end = if self.match_token(&Token::End) {
            Some(self.parse_range_point()?)
        } else {
            None
        };
        Ok(ContextDetailKind::RangeBased { start, end })
    }

    fn parse_initiated_context(&mut self) -> ParseResult<ContextDetailKind> {
        self.consume(&Token::Initiated, "'initiated'")?;
        self.match_token(&Token::By);
        let distinct = if self.match_token(&Token::Distinct) {
            Some(self.paren_list(|p| p.parse_expr())?)
        } else {
            None
        };
        let now = self.at_now();
        if now {
            self.advance();
            self.advance();
            self.consume(&Token::And, "'and'")?;
        }
        let label = if Self::is_strict_ident(self.peek()) && self.check_nth(1, &Token::Colon) {
            let label = self.parse_ident("label")?;
            self.advance();
            Some(label)
        } else {
            None
        };
        let start = self.parse_range_point()?;
        let terminated = self.parse_terminated_point()?;
        Ok(ContextDetailKind::Initiated {
            distinct,
            now,
            label,
            start,
            terminated,
        })
    }

    fn parse_terminated_point(&mut self) -> ParseResult<Option<RangePoint>> {
        if !self.match_token(&Token::Terminated) {
            return Ok(None);
        }
        self.match_token(&Token::By);
        Ok(Some(self.parse_range_point()?))
    }

    fn parse_partition_context(&mut self) -> ParseResult<ContextDetailKind> {
        self.consume(&Token::Partition, "'partition'")?;
        self.match_token(&Token::By);
        let mut items = Vec::new();
        loop {
            let mut properties = vec![self.parse_chain()?];
            while self.match_token(&Token::And) {
                properties.push(self.parse_chain()?);
            }
            self.consume(&Token::From, "'from'")?;
            let filter = self.parse_event_filter()?;
            let alias = self.parse_optional_alias()?;
            items.push(PartitionItem {
                properties,
                filter,
                alias,
            });
            if !self.comma_continues() {
                break;
            }
            self.advance();
        }
        let initiated = if self.match_token(&Token::Initiated) {
            self.match_token(&Token::By);
            let mut filters = vec![self.parse_context_filter()?];
            while self.comma_continues() {
                self.advance();
                filters.push(self.parse_context_filter()?);
            }
            Some(filters)
        } else {
            None
        };
        let terminated = self.parse_terminated_point()?;
        Ok(ContextDetailKind::Partition {
            items,
            initiated,
            terminated,
        })
    }

    fn parse_grouped_context(&mut self) -> ParseResult<ContextDetailKind> {
        let mut groups = Vec::new();
        loop {
            self.consume(&Token::Group, "'group'")?;
            self.match_token(&Token::By);
            let expr = self.parse_expr()?;
            self.consume(&Token::As, "'as'")?;
            let label = self.parse_name("group label")?;
            groups.push(GroupItem { expr, label });
            if !(self.check(&Token::Comma) && self.check_nth(1, &Token::Group)) {
                break;
            }
            self.advance();
        }
        self.consume(&Token::From, "'from'")?;
        let filter = self.parse_event_filter()?;
        Ok(ContextDetailKind::Grouped { groups, filter })
    }

    fn parse_coalesce_context(&mut self) -> ParseResult<ContextDetailKind> {
        self.consume(&Token::Coalesce, "'coalesce'")?;
        self.match_token(&Token::By);
        let mut items = Vec::new();
        loop {
            let function = self.parse_chain()?;
            self.consume(&Token::From, "'from'")?;
            let filter = self.parse_event_filter()?;
            items.push(CoalesceItem { function, filter });
            if !self.match_token(&Token::Comma) {
                break;
            }
        }
        let granularity_name = self.parse_name("granularity")?;
        let granularity = self.parse_integer("granularity value")?;
        let preallocate = if self.check_name() && !self.check(&Token::For) {
            Some(self.parse_name("preallocate flag")?)
        } else {
            None
        };
        Ok(ContextDetailKind::Coalesce {
            items,
            granularity_name,
            granularity,
            preallocate,
        })
    }

    // ========================================================================
    // Range points
    // ========================================================================

    /// `after 5 sec`, `(0, 9, *, *, *)`, `pattern [...] [@inclusive]` or a filter
    fn parse_range_point(&mut self) -> ParseResult<RangePoint> {
        if self.match_token(&Token::After) {
            return Ok(RangePoint::After(self.parse_time_period()?));
        }
        if self.check(&Token::LParen) {
            let mut lists = vec![self.paren_list(|p| p.parse_time_arg())?];
            while self.check(&Token::Comma) && self.check_nth(1, &Token::LParen) {
                self.advance();
                lists.push(self.paren_list(|p| p.parse_time_arg())?);
            }
            return Ok(RangePoint::Crontab(lists));
        }
        if self.check(&Token::Pattern) {
            let pattern = self.parse_pattern_inclusion()?;
            let inclusive = self.check(&Token::AtSign) && self.nth_is_word(1, "inclusive");
            if inclusive {
                self.advance();
                self.advance();
            }
            return Ok(RangePoint::Pattern { pattern, inclusive });
        }
        Ok(RangePoint::Filter(self.parse_context_filter()?))
    }

    fn parse_context_filter(&mut self) -> ParseResult<ContextFilter> {
        let filter = self.parse_event_filter()?;
        let alias = self.parse_optional_alias()?;
        Ok(ContextFilter { filter, alias })
    }
}
