//! `on Trigger ...` statements acting on named windows and tables

use epl_core::ast::*;

use super::Parser;
use crate::error::ParseResult;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    pub(crate) fn parse_on_statement(&mut self) -> ParseResult<OnStatement> {
        let _clause = self.enter("on-trigger statement");
        self.consume(&Token::On, "'on'")?;
        let source = if self.check(&Token::Pattern)
            && matches!(self.peek_nth(1), Token::LBracket | Token::AtSign)
        {
            OnSource::Pattern(self.parse_pattern_inclusion()?)
        } else {
            OnSource::Filter(self.parse_event_filter()?)
        };
        let alias = self.parse_optional_alias()?;
        let trigger = OnTrigger { source, alias };

        let action = match self.peek() {
            Token::Delete => {
                self.advance();
                self.consume(&Token::From, "'from'")?;
                let window = self.parse_window_ref()?;
                let where_clause = self.parse_where_clause()?;
                OnAction::Delete {
                    window,
                    where_clause,
                }
            }
            Token::Select => OnAction::Select(Box::new(self.parse_on_select(None)?)),
            Token::Insert => self.parse_on_insert()?,
            Token::Update => {
                self.advance();
                let window = self.parse_window_ref()?;
                self.consume(&Token::Set, "'set'")?;
                let assignments = self.parse_assignments()?;
                let where_clause = self.parse_where_clause()?;
                OnAction::Update {
                    window,
                    assignments,
                    where_clause,
                }
            }
            Token::Set => {
                self.advance();
                OnAction::Set(self.parse_assignments()?)
            }
            Token::Merge => OnAction::Merge(self.parse_on_merge()?),
            _ => return Err(self.expected("'delete', 'select', 'insert', 'update', 'set' or 'merge'")),
        };
        Ok(OnStatement { trigger, action })
    }

    fn parse_window_ref(&mut self) -> ParseResult<WindowRef> {
        let name = self.parse_ident("window or table name")?;
        let alias = self.parse_optional_alias()?;
        Ok(WindowRef { name, alias })
    }

    /// `select [and delete] [distinct] items [from Window] [where] [group by]
    /// [having] [order by] [limit]`
    fn parse_on_select(&mut self, insert_into: Option<InsertInto>) -> ParseResult<OnSelect> {
        let _clause = self.enter("select clause");
        self.consume(&Token::Select, "'select'")?;
        let and_delete = self.check(&Token::And) && self.check_nth(1, &Token::Delete);
        if and_delete {
            self.advance();
            self.advance();
        }
        let distinct = self.match_token(&Token::Distinct);
        let items = self.comma_separated(|p| p.parse_select_item())?;
        let from = if self.match_token(&Token::From) {
            Some(self.parse_window_ref()?)
        } else {
            None
        };
        Ok(OnSelect {
            insert_into,
            and_delete,
            distinct,
            items,
            from,
            where_clause: self.parse_where_clause()?,
            group_by: self.parse_group_by_clause()?,
            having: self.parse_having_clause()?,
            order_by: self.parse_order_by_clause()?,
            limit: self.parse_limit_clause()?,
        })
    }

    /// A single `insert into ... select ...`, or a split stream when more
    /// inserts or an `output` modifier follow.
    fn parse_on_insert(&mut self) -> ParseResult<OnAction> {
        let insert_into = self.parse_insert_into()?;
        let first = Box::new(self.parse_on_select(Some(insert_into))?);
        if !matches!(self.peek(), Token::Insert | Token::Output) {
            return Ok(OnAction::Select(first));
        }

        let mut splits = Vec::new();
        while self.check(&Token::Insert) {
            let insert_into = self.parse_insert_into()?;
            self.consume(&Token::Select, "'select'")?;
            let items = self.comma_separated(|p| p.parse_select_item())?;
            let where_clause = self.parse_where_clause()?;
            splits.push(SplitInsert {
                insert_into,
                items,
                where_clause,
            });
        }

        let output_all = if self.match_token(&Token::Output) {
            if self.match_token(&Token::All) {
                Some(true)
            } else if self.match_token(&Token::First) {
                Some(false)
            } else {
                return Err(self.expected("'all' or 'first'"));
            }
        } else {
            None
        };

        Ok(OnAction::Insert {
            first,
            splits,
            output_all,
        })
    }

    // ========================================================================
    // MERGE
    // ========================================================================

    fn parse_on_merge(&mut self) -> ParseResult<OnMerge> {
        let _clause = self.enter("merge clause");
        self.consume(&Token::Merge, "'merge'")?;
        self.match_token(&Token::Into);
        let window = self.parse_window_ref()?;
        let where_clause = self.parse_where_clause()?;

        let mut clauses = Vec::new();
        while self.match_token(&Token::When) {
            let not_matched = self.match_token(&Token::Not);
            self.consume(&Token::Matched, "'matched'")?;
            let condition = if self.match_token(&Token::And) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            if !self.check(&Token::Then) {
                return Err(self.expected("'then'"));
            }
            if not_matched {
                let mut actions = Vec::new();
                while self.match_token(&Token::Then) {
                    let before = self.save();
                    actions.push(self.parse_merge_insert()?);
                    self.ensure_progress(before, "merge insert")?;
                }
                clauses.push(MergeClause::NotMatched { condition, actions });
            } else {
                let mut actions = Vec::new();
                while self.match_token(&Token::Then) {
                    let before = self.save();
                    actions.push(self.parse_merge_action()?);
                    self.ensure_progress(before, "merge action")?;
                }
                clauses.push(MergeClause::Matched { condition, actions });
            }
        }
        Ok(OnMerge {
            window,
            where_clause,
            clauses,
        })
    }

    fn parse_merge_action(&mut self) -> ParseResult<MergeAction> {
        match self.peek() {
            Token::Update => {
                self.advance();
                self.consume(&Token::Set, "'set'")?;
                let assignments = self.parse_assignments()?;
                let where_clause = self.parse_where_clause()?;
                Ok(MergeAction::Update {
                    assignments,
                    where_clause,
                })
            }
            Token::Delete => {
                self.advance();
                Ok(MergeAction::Delete {
                    where_clause: self.parse_where_clause()?,
                })
            }
            Token::Insert => Ok(MergeAction::Insert(self.parse_merge_insert()?)),
            _ => Err(self.expected("'update', 'delete' or 'insert'")),
        }
    }

    /// `insert [into Target][(cols)] select items [where expr]`
    fn parse_merge_insert(&mut self) -> ParseResult<MergeInsert> {
        self.consume(&Token::Insert, "'insert'")?;
        let target = if self.match_token(&Token::Into) {
            Some(self.parse_dotted_ident("stream name")?)
        } else {
            None
        };
        let columns = if self.check(&Token::LParen) {
            self.paren_list(|p| p.parse_name("column name"))?
        } else {
            Vec::new()
        };
        self.consume(&Token::Select, "'select'")?;
        let items = self.comma_separated(|p| p.parse_select_item())?;
        let where_clause = self.parse_where_clause()?;
        Ok(MergeInsert {
            target,
            columns,
            items,
            where_clause,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;

    fn on(source: &str) -> OnStatement {
        let config = ParserConfig::default();
        let mut parser = Parser::new(source, &config).unwrap();
        let on = parser
            .parse_on_statement()
            .unwrap_or_else(|e| panic!("{source}: {e}"));
        assert!(parser.is_at_end(), "trailing input in {source}");
        on
    }

    #[test]
    fn test_on_delete_and_update() {
        let stmt = on("on Cancel as c delete from Orders as o where o.id = c.id");
        assert_eq!(stmt.trigger.alias.as_deref(), Some("c"));
        assert!(matches!(stmt.action, OnAction::Delete { where_clause: Some(_), .. }));

        let stmt = on("on Fill f update Orders o set o.filled = true, qty = qty - f.qty where o.id = f.id");
        let OnAction::Update { window, assignments, .. } = &stmt.action else {
            panic!("expected update");
        };
        assert_eq!(window.alias.as_deref(), Some("o"));
        assert_eq!(assignments.len(), 2);
    }

    #[test]
    fn test_on_select_and_delete() {
        let stmt = on("on pattern [every timer:interval(10 sec)] select and delete distinct * from Orders order by id limit 5");
        assert!(matches!(stmt.trigger.source, OnSource::Pattern(_)));
        let OnAction::Select(select) = &stmt.action else {
            panic!("expected select");
        };
        assert!(select.and_delete && select.distinct);
        assert_eq!(select.order_by.len(), 1);
        assert!(select.limit.is_some());
    }

    #[test]
    fn test_single_insert_is_a_select() {
        let stmt = on("on Tick insert into Out select * from W where W.sym = Tick.sym");
        let OnAction::Select(select) = &stmt.action else {
            panic!("expected select");
        };
        assert!(select.insert_into.is_some());
    }

    #[test]
    fn test_split_stream() {
        let stmt = on(
            "on NewOrder insert into Large select * where qty > 100 \
             insert into Small select * where qty <= 100 \
             insert into Rest select * output all",
        );
        let OnAction::Insert {
            first,
            splits,
            output_all,
        } = &stmt.action
        else {
            panic!("expected split stream");
        };
        assert!(first.where_clause.is_some());
        assert_eq!(splits.len(), 2);
        assert_eq!(*output_all, Some(true));
    }

    #[test]
    fn test_on_set() {
        let stmt = on("on Reset set total = 0, count = 0");
        assert!(matches!(&stmt.action, OnAction::Set(items) if items.len() == 2));
    }

    #[test]
    fn test_merge_clauses() {
        let stmt = on(
            "on Quote q merge Prices p where p.sym = q.sym \
             when matched and q.price > 0 then update set price = q.price then delete where p.stale \
             when not matched then insert select q.sym as sym, q.price as price",
        );
        let OnAction::Merge(merge) = &stmt.action else {
            panic!("expected merge");
        };
        assert_eq!(merge.window.alias.as_deref(), Some("p"));
        assert_eq!(merge.clauses.len(), 2);
        let MergeClause::Matched { condition, actions } = &merge.clauses[0] else {
            panic!("expected matched clause");
        };
        assert!(condition.is_some());
        assert_eq!(actions.len(), 2);
        assert!(matches!(merge.clauses[1], MergeClause::NotMatched { .. }));
    }

    #[test]
    fn test_not_matched_rejects_update() {
        let config = ParserConfig::default();
        let mut parser = Parser::new(
            "on Quote merge Prices when not matched then update set a = 1",
            &config,
        )
        .unwrap();
        let err = parser.parse_on_statement().unwrap_err();
        assert!(err.in_clause("merge clause"));
    }
}
