//! Clauses shared between statement forms

use epl_core::ast::*;
use epl_core::span::Spanned;

use super::Parser;
use crate::error::ParseResult;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    // ========================================================================
    // Annotations
    // ========================================================================

    /// `@Name`, `@Name('value')`, `@Hint(key = value, ...)`
    pub(crate) fn parse_annotation(&mut self) -> ParseResult<Annotation> {
        self.nested(|p| {
            let start = p.consume(&Token::AtSign, "'@'")?;
            let name = p.parse_dotted_ident("annotation name")?;
            let args = if p.match_token(&Token::LParen) {
                let args = if p.check(&Token::RParen) {
                    AnnotationArgs::None
                } else if p.check_name() && p.check_nth(1, &Token::Eq) {
                    AnnotationArgs::Pairs(p.comma_separated(|p| {
                        let key = p.parse_name("annotation attribute")?;
                        p.consume(&Token::Eq, "'='")?;
                        Ok((key, p.parse_annotation_value()?))
                    })?)
                } else {
                    AnnotationArgs::Value(p.parse_annotation_value()?)
                };
                p.consume(&Token::RParen, "')'")?;
                args
            } else {
                AnnotationArgs::None
            };
            Ok(Annotation {
                name,
                args,
                span: start.merge(p.prev_span()),
            })
        })
    }

    fn parse_annotation_value(&mut self) -> ParseResult<AnnotationValue> {
        match self.peek() {
            Token::AtSign => Ok(AnnotationValue::Annotation(Box::new(
                self.parse_annotation()?,
            ))),
            Token::LBrace => {
                self.advance();
                let items = if self.check(&Token::RBrace) {
                    Vec::new()
                } else {
                    self.comma_separated(|p| p.nested(|p| p.parse_annotation_value()))?
                };
                self.consume(&Token::RBrace, "'}'")?;
                Ok(AnnotationValue::Array(items))
            }
            token if Self::is_strict_ident(token) => {
                Ok(AnnotationValue::Name(self.parse_dotted_ident("annotation value")?))
            }
            _ => Ok(AnnotationValue::Literal(
                self.parse_literal("annotation value")?,
            )),
        }
    }

    // ========================================================================
    // Select list
    // ========================================================================

    /// `select [istream|rstream|irstream] [distinct] items`
    pub(crate) fn parse_select_clause(&mut self) -> ParseResult<SelectClause> {
        let _clause = self.enter("select clause");
        let start = self.consume(&Token::Select, "'select'")?;
        let stream_selector = if self.check_nth(1, &Token::LParen) {
            None
        } else {
            self.parse_stream_selector()
        };
        let distinct = self.match_token(&Token::Distinct);
        let items = self.comma_separated(|p| p.parse_select_item())?;
        Ok(SelectClause {
            stream_selector,
            distinct,
            items,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_stream_selector(&mut self) -> Option<StreamSelector> {
        let selector = match self.peek() {
            Token::Istream => StreamSelector::IStream,
            Token::Rstream => StreamSelector::RStream,
            Token::Irstream => StreamSelector::IRStream,
            _ => return None,
        };
        self.advance();
        Some(selector)
    }

    /// `*`, `s.* [as a]` or `expr [@eventbean] [[as] alias]`
    pub(crate) fn parse_select_item(&mut self) -> ParseResult<SelectItem> {
        let start = self.span();
        if self.match_token(&Token::Star) {
            return Ok(Spanned::new(SelectItemKind::Wildcard, start));
        }
        if self.check_name() && self.check_nth(1, &Token::Dot) && self.check_nth(2, &Token::Star) {
            let tok = self.advance();
            let stream = self.token_name(&tok);
            self.advance();
            self.advance();
            let alias = self.parse_optional_alias()?;
            return Ok(Spanned::new(
                SelectItemKind::StreamWildcard { stream, alias },
                start.merge(self.prev_span()),
            ));
        }
        let expr = self.parse_expr()?;
        let annotation = if self.check(&Token::AtSign) && Self::is_strict_ident(self.peek_nth(1)) {
            self.advance();
            Some(self.parse_ident("select annotation")?)
        } else {
            None
        };
        let alias = self.parse_optional_alias()?;
        Ok(Spanned::new(
            SelectItemKind::Expr {
                expr,
                annotation,
                alias,
            },
            start.merge(self.prev_span()),
        ))
    }

    // ========================================================================
    // Event filters and views
    // ========================================================================

    /// `[tag=]com.acme.Type[(params)][contained selections]`
    pub(crate) fn parse_event_filter(&mut self) -> ParseResult<EventFilter> {
        let start = self.span();
        let tag = if Self::is_strict_ident(self.peek()) && self.check_nth(1, &Token::Eq) {
            let tag = self.parse_ident("tag")?;
            self.advance();
            Some(tag)
        } else {
            None
        };
        let event_type = if self.camel_case_keyword() {
            let tok = self.advance();
            self.token_name(&tok)
        } else {
            self.parse_dotted_ident("event type")?
        };
        let params = if self.check(&Token::LParen) {
            self.paren_list(|p| p.parse_expr())?
        } else {
            Vec::new()
        };
        let mut selections = Vec::new();
        while self.check(&Token::LBracket) {
            selections.push(self.parse_contained_selection()?);
        }
        Ok(EventFilter {
            tag,
            event_type,
            params,
            selections,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_contained_selection(&mut self) -> ParseResult<ContainedSelection> {
        self.consume(&Token::LBracket, "'['")?;
        let select = if self.match_token(&Token::Select) {
            let items = self.comma_separated(|p| p.parse_select_item())?;
            self.consume(&Token::From, "'from'")?;
            Some(items)
        } else {
            None
        };
        let expr = self.parse_expr()?;
        let type_annotation = self.parse_type_annotation()?;
        let alias = self.parse_optional_alias()?;
        let where_clause = if self.match_token(&Token::Where) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.consume(&Token::RBracket, "']'")?;
        Ok(ContainedSelection {
            select,
            expr,
            type_annotation,
            alias,
            where_clause,
        })
    }

    /// `@type(com.acme.Type)`
    pub(crate) fn parse_type_annotation(&mut self) -> ParseResult<Option<String>> {
        if !(self.check(&Token::AtSign)
            && self.nth_is_word(1, "type")
            && self.check_nth(2, &Token::LParen))
        {
            return Ok(None);
        }
        self.advance();
        self.advance();
        self.advance();
        let name = self.parse_dotted_ident("type name")?;
        self.consume(&Token::RParen, "')'")?;
        Ok(Some(name))
    }

    /// Zero or more `#[ns:]name(args)` or `.ns:name(args)` views.
    pub(crate) fn parse_views(&mut self) -> ParseResult<Vec<View>> {
        let mut views = Vec::new();
        loop {
            let start = self.span();
            let (namespace, name, style) = if self.check(&Token::Dot)
                && self.check_name_nth(1)
                && self.check_nth(2, &Token::Colon)
            {
                self.advance();
                let namespace = self.parse_name("view namespace")?;
                self.advance();
                (Some(namespace), self.parse_name("view name")?, ViewStyle::Dot)
            } else if self.match_token(&Token::Hash) {
                let first = self.parse_name("view name")?;
                if self.match_token(&Token::Colon) {
                    (Some(first), self.parse_name("view name")?, ViewStyle::Hash)
                } else {
                    (None, first, ViewStyle::Hash)
                }
            } else {
                return Ok(views);
            };
            let args = if self.check(&Token::LParen) {
                self.paren_list(|p| p.parse_time_arg())?
            } else {
                Vec::new()
            };
            views.push(View {
                namespace,
                name,
                args,
                style,
                span: start.merge(self.prev_span()),
            });
        }
    }

    pub(crate) fn parse_retain(&mut self) -> Option<RetainMode> {
        if self.match_token(&Token::RetainUnion) {
            Some(RetainMode::Union)
        } else if self.match_token(&Token::RetainIntersection) {
            Some(RetainMode::Intersection)
        } else {
            None
        }
    }

    // ========================================================================
    // FROM
    // ========================================================================

    pub(crate) fn parse_from_clause(&mut self) -> ParseResult<FromClause> {
        let _clause = self.enter("from clause");
        let start = self.consume(&Token::From, "'from'")?;
        let mut streams = vec![self.parse_stream_expr()?];
        let mut joins = Vec::new();
        if self.check(&Token::Comma) {
            while self.match_token(&Token::Comma) {
                streams.push(self.parse_stream_expr()?);
            }
        } else {
            while let Some(kind) = self.parse_join_kind()? {
                let stream = self.parse_stream_expr()?;
                let mut on = Vec::new();
                if self.match_token(&Token::On) {
                    loop {
                        let left = self.parse_chain()?;
                        self.consume(&Token::Eq, "'='")?;
                        let right = self.parse_chain()?;
                        on.push(JoinCondition { left, right });
                        if !self.match_token(&Token::And) {
                            break;
                        }
                    }
                }
                joins.push(OuterJoin { kind, stream, on });
            }
        }
        Ok(FromClause {
            streams,
            joins,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_join_kind(&mut self) -> ParseResult<Option<JoinKind>> {
        let kind = match self.peek() {
            Token::Join => {
                self.advance();
                return Ok(Some(JoinKind::Inner));
            }
            Token::Inner => JoinKind::Inner,
            Token::Left => JoinKind::Left,
            Token::Right => JoinKind::Right,
            Token::Full => JoinKind::Full,
            _ => return Ok(None),
        };
        self.advance();
        if kind != JoinKind::Inner {
            self.match_token(&Token::Outer);
        }
        self.consume(&Token::Join, "'join'")?;
        Ok(Some(kind))
    }

    /// One stream of a FROM clause with its views, alias and options.
    pub(crate) fn parse_stream_expr(&mut self) -> ParseResult<StreamExpr> {
        let start = self.span();
        let source = if self.check(&Token::Pattern)
            && matches!(self.peek_nth(1), Token::LBracket | Token::AtSign)
        {
            StreamSource::Pattern(self.parse_pattern_inclusion()?)
        } else if self.check(&Token::Sql) && self.check_nth(1, &Token::Colon) {
            self.advance();
            self.advance();
            let database = self.parse_ident("database name")?;
            self.consume(&Token::LBracket, "'['")?;
            let query = self.parse_string_literal("SQL query")?;
            let metadata_query = if self.match_token(&Token::Metadatasql) {
                Some(self.parse_string_literal("metadata SQL query")?)
            } else {
                None
            };
            self.consume(&Token::RBracket, "']'")?;
            StreamSource::Sql {
                database,
                query,
                metadata_query,
            }
        } else if Self::is_strict_ident(self.peek()) && self.check_nth(1, &Token::Colon) {
            let namespace = self.parse_ident("method namespace")?;
            self.advance();
            let method = self.parse_dotted_ident("method name")?;
            let args = if self.check(&Token::LParen) {
                self.paren_list(|p| p.parse_expr())?
            } else {
                Vec::new()
            };
            let type_annotation = self.parse_type_annotation()?;
            StreamSource::Method {
                namespace,
                method,
                args,
                type_annotation,
            }
        } else {
            StreamSource::Filter(self.parse_event_filter()?)
        };
        let views = self.parse_views()?;
        let alias = self.parse_optional_alias()?;
        let unidirectional = self.match_token(&Token::Unidirectional);
        let retain = self.parse_retain();
        Ok(StreamExpr {
            source,
            views,
            alias,
            unidirectional,
            retain,
            span: start.merge(self.prev_span()),
        })
    }

    // ========================================================================
    // WHERE, GROUP BY, HAVING
    // ========================================================================

    pub(crate) fn parse_where_clause(&mut self) -> ParseResult<Option<Expr>> {
        if !self.check(&Token::Where) {
            return Ok(None);
        }
        let _clause = self.enter("where clause");
        self.advance();
        Ok(Some(self.parse_expr()?))
    }

    pub(crate) fn parse_group_by_clause(&mut self) -> ParseResult<Vec<GroupByItem>> {
        if !(self.check(&Token::Group) && self.check_nth(1, &Token::By)) {
            return Ok(Vec::new());
        }
        let _clause = self.enter("group-by clause");
        self.advance();
        self.advance();
        self.comma_separated(|p| p.parse_group_by_item())
    }

    fn parse_group_by_item(&mut self) -> ParseResult<GroupByItem> {
        match self.peek() {
            Token::Rollup if self.check_nth(1, &Token::LParen) => {
                self.advance();
                Ok(GroupByItem::Rollup(self.parse_grouping_elements()?))
            }
            Token::Cube if self.check_nth(1, &Token::LParen) => {
                self.advance();
                Ok(GroupByItem::Cube(self.parse_grouping_elements()?))
            }
            Token::Grouping if self.check_nth(1, &Token::Sets) => {
                self.advance();
                self.advance();
                self.consume(&Token::LParen, "'('")?;
                let sets = self.comma_separated(|p| p.parse_grouping_set())?;
                self.consume(&Token::RParen, "')'")?;
                Ok(GroupByItem::GroupingSets(sets))
            }
            _ => Ok(GroupByItem::Expr(self.parse_expr()?)),
        }
    }

    fn parse_grouping_set(&mut self) -> ParseResult<GroupingSet> {
        match self.peek() {
            Token::Rollup if self.check_nth(1, &Token::LParen) => {
                self.advance();
                Ok(GroupingSet::Rollup(self.parse_grouping_elements()?))
            }
            Token::Cube if self.check_nth(1, &Token::LParen) => {
                self.advance();
                Ok(GroupingSet::Cube(self.parse_grouping_elements()?))
            }
            _ => Ok(GroupingSet::Element(self.parse_grouping_element()?)),
        }
    }

    fn parse_grouping_elements(&mut self) -> ParseResult<Vec<GroupingElement>> {
        self.nested(|p| {
            p.consume(&Token::LParen, "'('")?;
            let items = p.comma_separated(|p| p.parse_grouping_element())?;
            p.consume(&Token::RParen, "')'")?;
            Ok(items)
        })
    }

    /// `(a, b)` and `()` combine; anything else is a single expression.
    fn parse_grouping_element(&mut self) -> ParseResult<GroupingElement> {
        if self.check(&Token::LParen) && !self.check_nth(1, &Token::Select) {
            let combined = self.attempt("grouping element", |p| {
                let items = p.paren_list(|p| p.parse_expr())?;
                if matches!(p.peek(), Token::Comma | Token::RParen) {
                    Ok(items)
                } else {
                    Err(p.expected("',' or ')'"))
                }
            });
            if let Some(items) = combined {
                return Ok(GroupingElement::Combined(items));
            }
        }
        Ok(GroupingElement::Expr(self.parse_expr()?))
    }

    pub(crate) fn parse_having_clause(&mut self) -> ParseResult<Option<Expr>> {
        if !self.check(&Token::Having) {
            return Ok(None);
        }
        let _clause = self.enter("having clause");
        self.advance();
        Ok(Some(self.parse_expr()?))
    }

    // ========================================================================
    // OUTPUT
    // ========================================================================

    pub(crate) fn parse_output_clause(&mut self) -> ParseResult<Option<OutputLimit>> {
        if !self.check(&Token::Output) {
            return Ok(None);
        }
        let _clause = self.enter("output rate clause");
        let start = self.advance().span;

        let after = if self.match_token(&Token::After) {
            Some(if self.time_period_ahead() {
                OutputAfter::Period(self.parse_time_period()?)
            } else {
                let events = self.parse_expr()?;
                self.consume(&Token::Events, "'events'")?;
                OutputAfter::Events(events)
            })
        } else {
            None
        };

        let selector = match self.peek() {
            Token::All => Some(OutputSelector::All),
            Token::First => Some(OutputSelector::First),
            Token::Last => Some(OutputSelector::Last),
            Token::Snapshot => Some(OutputSelector::Snapshot),
            _ => None,
        };
        if selector.is_some() {
            self.advance();
        }

        let rate = match self.peek() {
            Token::Every => {
                self.advance();
                Some(if self.time_period_ahead() {
                    OutputRate::EveryPeriod(self.parse_time_period()?)
                } else {
                    let events = self.parse_expr()?;
                    self.consume(&Token::Events, "'events'")?;
                    OutputRate::EveryEvents(events)
                })
            }
            Token::At => {
                self.advance();
                Some(OutputRate::At(self.paren_list(|p| p.parse_time_arg())?))
            }
            Token::When if self.check_nth(1, &Token::Terminated) => Some(
                OutputRate::WhenTerminated(self.parse_terminated_condition()?),
            ),
            Token::When => {
                self.advance();
                let condition = self.parse_expr()?;
                let then = self.parse_then_set()?;
                Some(OutputRate::When { condition, then })
            }
            _ => None,
        };

        let and_terminated = if self.check(&Token::And)
            && self.check_nth(1, &Token::When)
            && self.check_nth(2, &Token::Terminated)
        {
            self.advance();
            Some(self.parse_terminated_condition()?)
        } else {
            None
        };

        Ok(Some(OutputLimit {
            after,
            selector,
            rate,
            and_terminated,
            span: start.merge(self.prev_span()),
        }))
    }

    /// `when terminated [and expr] [then set ...]`
    fn parse_terminated_condition(&mut self) -> ParseResult<TerminatedCondition> {
        self.consume(&Token::When, "'when'")?;
        self.consume(&Token::Terminated, "'terminated'")?;
        let condition = if self.match_token(&Token::And) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let then = self.parse_then_set()?;
        Ok(TerminatedCondition { condition, then })
    }

    fn parse_then_set(&mut self) -> ParseResult<Vec<Assignment>> {
        if !(self.check(&Token::Then) && self.check_nth(1, &Token::Set)) {
            return Ok(Vec::new());
        }
        self.advance();
        self.advance();
        self.parse_assignments()
    }

    // ========================================================================
    // ORDER BY, LIMIT
    // ========================================================================

    pub(crate) fn parse_order_by_clause(&mut self) -> ParseResult<Vec<OrderByItem>> {
        if !(self.check(&Token::Order) && self.check_nth(1, &Token::By)) {
            return Ok(Vec::new());
        }
        let _clause = self.enter("order-by clause");
        self.advance();
        self.advance();
        self.comma_separated(|p| {
            let expr = p.parse_expr()?;
            let order = if p.match_token(&Token::Asc) {
                Some(SortOrder::Asc)
            } else if p.match_token(&Token::Desc) {
                Some(SortOrder::Desc)
            } else {
                None
            };
            Ok(OrderByItem { expr, order })
        })
    }

    /// `limit rows [offset n]`, or `limit offset, rows`
    pub(crate) fn parse_limit_clause(&mut self) -> ParseResult<Option<RowLimit>> {
        if !self.check(&Token::Limit) {
            return Ok(None);
        }
        let _clause = self.enter("limit clause");
        self.advance();
        let first = self.parse_expr()?;
        if self.match_token(&Token::Comma) {
            let rows = self.parse_expr()?;
            return Ok(Some(RowLimit {
                rows,
                offset: Some(first),
            }));
        }
        let offset = if self.match_token(&Token::Offset) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(Some(RowLimit {
            rows: first,
            offset,
        }))
    }

    // ========================================================================
    // INSERT INTO, assignments, columns
    // ========================================================================

    /// `insert [istream|rstream|irstream] into Target[(cols)] [event-precedence(expr)]`
    pub(crate) fn parse_insert_into(&mut self) -> ParseResult<InsertInto> {
        let _clause = self.enter("insert-into clause");
        self.consume(&Token::Insert, "'insert'")?;
        let stream_selector = self.parse_stream_selector();
        self.consume(&Token::Into, "'into'")?;
        let target = self.parse_dotted_ident("stream name")?;
        let columns = if self.check(&Token::LParen) {
            self.paren_list(|p| p.parse_name("column name"))?
        } else {
            Vec::new()
        };
        let event_precedence = if self.match_token(&Token::EventPrecedence) {
            self.consume(&Token::LParen, "'('")?;
            let expr = self.parse_expr()?;
            self.consume(&Token::RParen, "')'")?;
            Some(expr)
        } else {
            None
        };
        Ok(InsertInto {
            stream_selector,
            target,
            columns,
            event_precedence,
        })
    }

    pub(crate) fn parse_assignments(&mut self) -> ParseResult<Vec<Assignment>> {
        let mut assignments = Vec::new();
        loop {
            let before = self.save();
            assignments.push(self.parse_assignment()?);
            self.ensure_progress(before, "assignment")?;
            if !self.match_token(&Token::Comma) {
                return Ok(assignments);
            }
        }
    }

    /// `target = value`, falling back to a bare expression.
    fn parse_assignment(&mut self) -> ParseResult<Assignment> {
        if self.check_name() {
            let target = self.attempt("assignment target", |p| {
                let chain = p.parse_chain()?;
                p.consume(&Token::Eq, "'='")?;
                Ok(chain)
            });
            if let Some(target) = target {
                let value = self.parse_expr()?;
                return Ok(Assignment {
                    target: Some(target),
                    value,
                });
            }
        }
        Ok(Assignment {
            target: None,
            value: self.parse_expr()?,
        })
    }

    /// `name type` or `name null`
    pub(crate) fn parse_column_decl(&mut self) -> ParseResult<ColumnDecl> {
        let name = self.parse_name("column name")?;
        let ty = if self.match_token(&Token::Null) {
            None
        } else {
            Some(self.parse_type_name()?)
        };
        Ok(ColumnDecl { name, ty })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;

    fn with_parser<T>(source: &str, f: impl FnOnce(&mut Parser<'_>) -> ParseResult<T>) -> T {
        let config = ParserConfig::default();
        let mut parser = Parser::new(source, &config).unwrap();
        let value = f(&mut parser).unwrap();
        assert!(parser.is_at_end(), "trailing input in {source}");
        value
    }

    #[test]
    fn test_annotation_forms() {
        let a = with_parser("@Name('q1')", |p| p.parse_annotation());
        assert!(matches!(a.args, AnnotationArgs::Value(AnnotationValue::Literal(_))));

        let a = with_parser("@Hint(value = com.acme.Kind, tags = {1, -2}, nested = @Audit)", |p| {
            p.parse_annotation()
        });
        let AnnotationArgs::Pairs(pairs) = &a.args else {
            panic!("expected pairs");
        };
        assert_eq!(pairs.len(), 3);
        assert_eq!(
            a.value(Some("VALUE")),
            Some(&AnnotationValue::Name("com.acme.Kind".into()))
        );
        assert!(matches!(pairs[2].1, AnnotationValue::Annotation(_)));
    }

    #[test]
    fn test_stream_sources() {
        let s = with_parser("pattern [every A] as p unidirectional", |p| p.parse_stream_expr());
        assert!(matches!(s.source, StreamSource::Pattern(_)));
        assert!(s.unidirectional);

        let s = with_parser("sql:db ['select * from t' metadatasql 'select 1'] as t", |p| {
            p.parse_stream_expr()
        });
        assert!(matches!(
            s.source,
            StreamSource::Sql {
                metadata_query: Some(_),
                ..
            }
        ));

        let s = with_parser("method:com.acme.Lookup.find(a) @type(Row) r", |p| {
            p.parse_stream_expr()
        });
        let StreamSource::Method { method, .. } = &s.source else {
            panic!("expected method join");
        };
        assert_eq!(method, "com.acme.Lookup.find");
        assert_eq!(s.alias.as_deref(), Some("r"));
    }

    #[test]
    fn test_views_and_retain() {
        let s = with_parser("Trade(sym = 'X').win:length(5)#ext:sort(3, price desc)#keepall retain-union", |p| {
            p.parse_stream_expr()
        });
        assert_eq!(s.views.len(), 3);
        assert_eq!(s.views[0].style, ViewStyle::Dot);
        assert_eq!(s.views[1].namespace.as_deref(), Some("ext"));
        assert!(s.views[2].args.is_empty());
        assert_eq!(s.retain, Some(RetainMode::Union));
    }

    #[test]
    fn test_contained_selection() {
        let f = with_parser("Order[select a, b from items @type(Item) as i where i.qty > 0]", |p| {
            p.parse_event_filter()
        });
        let selection = &f.selections[0];
        assert_eq!(selection.select.as_ref().map(Vec::len), Some(2));
        assert_eq!(selection.type_annotation.as_deref(), Some("Item"));
        assert_eq!(selection.alias.as_deref(), Some("i"));
        assert!(selection.where_clause.is_some());
    }

    #[test]
    fn test_outer_joins() {
        let from = with_parser("from A as a left outer join B as b on a.id = b.id and a.x = b.x", |p| {
            p.parse_from_clause()
        });
        assert_eq!(from.joins.len(), 1);
        assert_eq!(from.joins[0].kind, JoinKind::Left);
        assert_eq!(from.joins[0].on.len(), 2);
    }

    #[test]
    fn test_grouping_sets() {
        let items = with_parser("group by grouping sets((a, b), (), c, rollup(a, (b, c))), d", |p| {
            p.parse_group_by_clause()
        });
        assert_eq!(items.len(), 2);
        let GroupByItem::GroupingSets(sets) = &items[0] else {
            panic!("expected grouping sets");
        };
        assert_eq!(sets.len(), 4);
        assert_eq!(
            sets[1],
            GroupingSet::Element(GroupingElement::Combined(Vec::new()))
        );
        assert!(matches!(sets[2], GroupingSet::Element(GroupingElement::Expr(_))));
    }

    #[test]
    fn test_output_forms() {
        let out = with_parser("output after 10 sec last every 5 events and when terminated", |p| {
            p.parse_output_clause()
        })
        .unwrap();
        assert!(matches!(out.after, Some(OutputAfter::Period(_))));
        assert_eq!(out.selector, Some(OutputSelector::Last));
        assert!(matches!(out.rate, Some(OutputRate::EveryEvents(_))));
        assert!(out.and_terminated.is_some());

        let out = with_parser("output when count > 10 then set count = 0, flag = true", |p| {
            p.parse_output_clause()
        })
        .unwrap();
        let Some(OutputRate::When { then, .. }) = out.rate else {
            panic!("expected when");
        };
        assert_eq!(then.len(), 2);
    }

    #[test]
    fn test_limit_comma_form_normalizes() {
        let limit = with_parser("limit 5, 10", |p| p.parse_limit_clause()).unwrap();
        assert!(matches!(
            limit.rows.node,
            epl_core::ast::ExprKind::Literal(Literal::Int(10))
        ));
        assert!(limit.offset.is_some());
    }

    #[test]
    fn test_assignment_falls_back_to_expression() {
        let items = with_parser("a.b = 1, update(x)", |p| p.parse_assignments());
        assert!(items[0].target.is_some());
        assert!(items[1].target.is_none());
    }
}
