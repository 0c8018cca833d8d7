//! Statement dispatch and the select, update and fire-and-forget forms

use epl_core::ast::*;
use epl_core::span::Spanned;

use super::Parser;
use crate::error::ParseResult;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    /// Parse one complete statement, allowing a single trailing `;`.
    pub fn parse_statement(&mut self) -> ParseResult<Statement> {
        let start = self.span();

        let mut prelude = Vec::new();
        loop {
            let item_start = self.span();
            let item = match self.peek() {
                Token::AtSign => PreludeItem::Annotation(self.parse_annotation()?),
                Token::Expression => PreludeItem::Expression(self.parse_expression_decl()?),
                Token::InlinedClass => PreludeItem::Class(self.parse_class_decl()?),
                _ => break,
            };
            prelude.push(Spanned::new(item, item_start.merge(self.prev_span())));
        }

        let context = if self.check(&Token::Context) && Self::is_strict_ident(self.peek_nth(1)) {
            self.advance();
            Some(self.parse_ident("context name")?)
        } else {
            None
        };

        let body_start = self.span();
        let body = self.parse_statement_body()?;
        let body = Spanned::new(body, body_start.merge(self.prev_span()));

        let for_clause = if self.match_token(&Token::For) {
            let name = self.parse_ident("for-clause name")?;
            let args = if self.check(&Token::LParen) {
                self.paren_list(|p| p.parse_expr())?
            } else {
                Vec::new()
            };
            Some(ForClause { name, args })
        } else {
            None
        };

        let span = start.merge(self.prev_span());
        self.finish()?;
        Ok(Statement {
            prelude,
            context,
            body,
            for_clause,
            span,
        })
    }

    fn parse_statement_body(&mut self) -> ParseResult<StatementKind> {
        match self.peek() {
            Token::Insert => {
                let insert = self.parse_insert_into()?;
                if self.match_token(&Token::Values) {
                    let rows = self.comma_separated(|p| p.paren_list(|p| p.parse_expr()))?;
                    return Ok(StatementKind::FireAndForget(FireAndForget::Insert {
                        into: insert,
                        rows,
                    }));
                }
                let select = self.parse_select_statement(None, Some(insert))?;
                Ok(StatementKind::Select(Box::new(select)))
            }
            Token::Into => {
                self.advance();
                self.consume(&Token::Table, "'table'")?;
                let table = self.parse_ident("table name")?;
                let insert = if self.check(&Token::Insert) {
                    Some(self.parse_insert_into()?)
                } else {
                    None
                };
                let select = self.parse_select_statement(Some(table), insert)?;
                Ok(StatementKind::Select(Box::new(select)))
            }
            Token::Select => {
                let select = self.parse_select_statement(None, None)?;
                Ok(StatementKind::Select(Box::new(select)))
            }
            Token::Create => self.parse_create(),
            Token::On => Ok(StatementKind::OnAction(self.parse_on_statement()?)),
            Token::Update if self.check_nth(1, &Token::Istream) => {
                let _clause = self.enter("update istream");
                self.advance();
                self.advance();
                Ok(StatementKind::UpdateIStream(self.parse_update_details()?))
            }
            Token::Update => {
                let _clause = self.enter("update statement");
                self.advance();
                Ok(StatementKind::FireAndForget(FireAndForget::Update(
                    self.parse_update_details()?,
                )))
            }
            Token::Delete => {
                let _clause = self.enter("delete statement");
                self.advance();
                self.consume(&Token::From, "'from'")?;
                let target = self.parse_dotted_ident("window or table name")?;
                let alias = self.parse_optional_alias()?;
                let where_clause = self.parse_where_clause()?;
                Ok(StatementKind::FireAndForget(FireAndForget::Delete {
                    target,
                    alias,
                    where_clause,
                }))
            }
            _ => Err(self.expected("statement")),
        }
    }

    // ========================================================================
    // SELECT
    // ========================================================================

    /// Everything from `select` on; the into-table and insert-into prefixes
    /// have already been read by the caller.
    pub(crate) fn parse_select_statement(
        &mut self,
        into_table: Option<String>,
        insert_into: Option<InsertInto>,
    ) -> ParseResult<SelectStatement> {
        let _clause = self.enter("select statement");
        let select = self.parse_select_clause()?;
        let from = if self.check(&Token::From) {
            Some(self.parse_from_clause()?)
        } else {
            None
        };
        let match_recognize = if self.check(&Token::MatchRecognize) {
            Some(self.parse_match_recognize()?)
        } else {
            None
        };
        let where_clause = self.parse_where_clause()?;
        let group_by = self.parse_group_by_clause()?;
        let having = self.parse_having_clause()?;
        let output = self.parse_output_clause()?;
        let order_by = self.parse_order_by_clause()?;
        let limit = self.parse_limit_clause()?;
        Ok(SelectStatement {
            into_table,
            insert_into,
            select,
            from,
            match_recognize,
            where_clause,
            group_by,
            having,
            output,
            order_by,
            limit,
        })
    }

    /// `Target [as alias] set assignments [where expr]`
    fn parse_update_details(&mut self) -> ParseResult<UpdateDetails> {
        let target = self.parse_dotted_ident("update target")?;
        let alias = self.parse_optional_alias()?;
        self.consume(&Token::Set, "'set'")?;
        let assignments = self.parse_assignments()?;
        let where_clause = self.parse_where_clause()?;
        Ok(UpdateDetails {
            target,
            alias,
            assignments,
            where_clause,
        })
    }

    // ========================================================================
    // Declared expressions and inlined classes
    // ========================================================================

    /// `expression [type] [@type(T)] [dialect:]name[(params)] [alias for] { body }`,
    /// with a `[ script ]` body in place of the braces for scripts.
    pub(crate) fn parse_expression_decl(&mut self) -> ParseResult<ExpressionDecl> {
        let _clause = self.enter("expression declaration");
        self.consume(&Token::Expression, "'expression'")?;

        let return_type = self.attempt("expression return type", |p| {
            let ty = p.parse_type_name()?;
            let named_next = Self::is_strict_ident(p.peek())
                && !(p.is_word("alias") && p.check_nth(1, &Token::For));
            if named_next || p.check(&Token::AtSign) {
                Ok(ty)
            } else {
                Err(p.expected("expression name"))
            }
        });
        let type_annotation = self.parse_type_annotation()?;
        let dialect = if Self::is_strict_ident(self.peek()) && self.check_nth(1, &Token::Colon) {
            let dialect = self.parse_ident("script dialect")?;
            self.advance();
            Some(dialect)
        } else {
            None
        };
        let name = self.parse_ident("expression name")?;
        let params = if self.check(&Token::LParen) {
            Some(self.paren_list(|p| p.parse_name("parameter name"))?)
        } else {
            None
        };
        let is_alias = self.is_word("alias") && self.check_nth(1, &Token::For);
        if is_alias {
            self.advance();
            self.advance();
        }

        let body = if self.check(&Token::LBracket) {
            ExpressionBody::Script(self.parse_script_body()?)
        } else {
            self.consume(&Token::LBrace, "'{' or '['")?;
            let lambda_params = match self.lambda_ahead() {
                Some(1) if !self.check(&Token::LParen) => {
                    let param = self.parse_name("lambda parameter")?;
                    self.advance();
                    Some(vec![param])
                }
                Some(_) => {
                    let params = self.paren_list(|p| p.parse_name("lambda parameter"))?;
                    self.consume(&Token::FatArrow, "'=>'")?;
                    Some(params)
                }
                None => None,
            };
            let expr = self.parse_expr()?;
            self.consume(&Token::RBrace, "'}'")?;
            ExpressionBody::Expr {
                lambda_params,
                expr,
            }
        };

        Ok(ExpressionDecl {
            return_type,
            type_annotation,
            dialect,
            name,
            params,
            is_alias,
            body,
        })
    }

    /// Source text between a `[` and its matching `]`, kept verbatim.
    fn parse_script_body(&mut self) -> ParseResult<String> {
        let open = self.consume(&Token::LBracket, "'['")?;
        let mut depth = 1usize;
        loop {
            match self.peek() {
                Token::Eof => return Err(self.expected("']' closing the script")),
                Token::LBracket => depth += 1,
                Token::RBracket => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            self.advance();
        }
        let close = self.advance().span;
        Ok(self
            .source
            .get(open.end..close.start)
            .unwrap_or_default()
            .to_string())
    }

    /// `inlined_class """ ... """`
    pub(crate) fn parse_class_decl(&mut self) -> ParseResult<ClassDecl> {
        self.consume(&Token::InlinedClass, "'inlined_class'")?;
        match self.peek() {
            Token::TripleQuoted(code) => {
                let code = code.clone();
                self.advance();
                Ok(ClassDecl { code })
            }
            _ => Err(self.expected("triple-quoted class text")),
        }
    }

    // ========================================================================
    // Standalone fragments
    // ========================================================================

    /// A property path such as `a.b[0].c?`, consuming the whole input.
    pub fn parse_property_path(&mut self) -> ParseResult<Spanned<Chain>> {
        let start = self.span();
        let chain = self.parse_chain()?;
        let span = start.merge(self.prev_span());
        self.finish()?;
        Ok(Spanned::new(chain, span))
    }

    /// A JSON value, consuming the whole input.
    pub fn parse_json_document(&mut self) -> ParseResult<JsonValue> {
        let value = self.parse_json_value()?;
        self.finish()?;
        Ok(value)
    }
}
