//! `create ...` statements: windows, indexes, variables, tables, schemas,
//! contexts, expressions, classes and dataflows

use epl_core::ast::*;

use super::Parser;
use crate::error::ParseResult;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    pub(crate) fn parse_create(&mut self) -> ParseResult<StatementKind> {
        self.consume(&Token::Create, "'create'")?;
        let kind = match self.peek() {
            Token::Window => StatementKind::CreateWindow(self.parse_create_window()?),
            Token::Index => StatementKind::CreateIndex(self.parse_create_index(false)?),
            _ if self.is_word("unique") && self.check_nth(1, &Token::Index) => {
                self.advance();
                StatementKind::CreateIndex(self.parse_create_index(true)?)
            }
            Token::Variable => StatementKind::CreateVariable(self.parse_create_variable(false)?),
            _ if self.is_word("constant") && self.check_nth(1, &Token::Variable) => {
                self.advance();
                StatementKind::CreateVariable(self.parse_create_variable(true)?)
            }
            Token::Table => StatementKind::CreateTable(self.parse_create_table()?),
            Token::Schema => StatementKind::CreateSchema(self.parse_create_schema()?),
            token if Self::is_strict_ident(token) && self.check_nth(1, &Token::Schema) => {
                StatementKind::CreateSchema(self.parse_create_schema()?)
            }
            Token::Context => {
                let _clause = self.enter("create context");
                self.advance();
                let name = self.parse_ident("context name")?;
                self.match_token(&Token::As);
                let detail = self.parse_context_detail()?;
                StatementKind::CreateContext(CreateContext { name, detail })
            }
            Token::Expression => StatementKind::CreateExpression(self.parse_expression_decl()?),
            Token::InlinedClass => StatementKind::CreateClass(self.parse_class_decl()?),
            Token::Dataflow => StatementKind::CreateDataflow(self.parse_create_dataflow()?),
            _ => return Err(self.expected("object to create")),
        };
        Ok(kind)
    }

    // ========================================================================
    // Windows and indexes
    // ========================================================================

    /// `window Name[views] [retain] [as] model [insert [where expr]]`
    fn parse_create_window(&mut self) -> ParseResult<CreateWindow> {
        let _clause = self.enter("create window");
        self.consume(&Token::Window, "'window'")?;
        let name = self.parse_ident("window name")?;
        let views = self.parse_views()?;
        let retain = self.parse_retain();
        self.match_token(&Token::As);

        let model = if self.check(&Token::LParen) {
            WindowModel::Columns(self.paren_list(|p| p.parse_column_decl())?)
        } else {
            let select = if self.match_token(&Token::Select) {
                let items = self.comma_separated(|p| p.parse_create_select_item())?;
                self.consume(&Token::From, "'from'")?;
                Some(items)
            } else {
                None
            };
            let event_type = self.parse_dotted_ident("event type")?;
            WindowModel::ModelAfter { select, event_type }
        };

        let insert = if self.match_token(&Token::Insert) {
            Some(WindowInsert {
                where_clause: self.parse_where_clause()?,
            })
        } else {
            None
        };

        Ok(CreateWindow {
            name,
            views,
            retain,
            model,
            insert,
        })
    }

    fn parse_create_select_item(&mut self) -> ParseResult<CreateSelectItem> {
        if self.match_token(&Token::Star) {
            return Ok(CreateSelectItem::Wildcard);
        }
        if self.literal_ahead() {
            let value = self.parse_literal("constant")?;
            self.consume(&Token::As, "'as'")?;
            let alias = self.parse_name("column name")?;
            return Ok(CreateSelectItem::Constant { value, alias });
        }
        let chain = self.parse_chain()?;
        let alias = self.parse_optional_alias()?;
        Ok(CreateSelectItem::Property { chain, alias })
    }

    /// `[unique] index Name on Window(col [type [(params)]], ...)`
    fn parse_create_index(&mut self, unique: bool) -> ParseResult<CreateIndex> {
        let _clause = self.enter("create index");
        self.consume(&Token::Index, "'index'")?;
        let name = self.parse_ident("index name")?;
        self.consume(&Token::On, "'on'")?;
        let window = self.parse_ident("window name")?;
        let columns = self.paren_list(|p| p.parse_index_column())?;
        Ok(CreateIndex {
            unique,
            name,
            window,
            columns,
        })
    }

    fn parse_index_column(&mut self) -> ParseResult<IndexColumn> {
        let composite = if self.check(&Token::LParen) {
            self.attempt("composite index column", |p| {
                let exprs = p.paren_list(|p| p.parse_expr())?;
                if exprs.is_empty() {
                    return Err(p.expected("index expression"));
                }
                if matches!(p.peek(), Token::Comma | Token::RParen) || p.check_name() {
                    Ok(exprs)
                } else {
                    Err(p.expected("',' or ')'"))
                }
            })
        } else {
            None
        };
        let exprs = match composite {
            Some(exprs) => exprs,
            None => vec![self.parse_expr()?],
        };
        let (index_type, type_params) = if self.check_name() {
            let index_type = self.parse_name("index type")?;
            let params = if self.check(&Token::LParen) {
                self.paren_list(|p| p.parse_expr())?
            } else {
                Vec::new()
            };
            (Some(index_type), params)
        } else {
            (None, Vec::new())
        };
        Ok(IndexColumn {
            exprs,
            index_type,
            type_params,
        })
    }

    // ========================================================================
    // Variables and tables
    // ========================================================================

    fn parse_create_variable(&mut self, constant: bool) -> ParseResult<CreateVariable> {
        let _clause = self.enter("create variable");
        self.consume(&Token::Variable, "'variable'")?;
        let ty = self.parse_type_name()?;
        let name = self.parse_ident("variable name")?;
        let init = if self.match_token(&Token::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(CreateVariable {
            constant,
            ty,
            name,
            init,
        })
    }

    /// `table Name [as] (col type [primary key] [@anno...], col aggregation(...), ...)`
    fn parse_create_table(&mut self) -> ParseResult<CreateTable> {
        let _clause = self.enter("create table");
        self.consume(&Token::Table, "'table'")?;
        let name = self.parse_ident("table name")?;
        self.match_token(&Token::As);
        let columns = self.paren_list(|p| {
            let name = p.parse_name("column name")?;
            let aggregation = (p.check_name() || p.peek().is_keyword())
                && p.check_nth(1, &Token::LParen);
            let kind = if aggregation {
                TableColumnKind::Aggregation(p.parse_expr()?)
            } else {
                TableColumnKind::Plain(p.parse_type_name()?)
            };
            let primary_key = p.is_word("primary") && p.nth_is_word(1, "key");
            if primary_key {
                p.advance();
                p.advance();
            }
            let mut annotations = Vec::new();
            while p.check(&Token::AtSign) {
                annotations.push(p.parse_annotation()?);
            }
            Ok(TableColumn {
                name,
                kind,
                primary_key,
                annotations,
            })
        })?;
        Ok(CreateTable { name, columns })
    }

    // ========================================================================
    // Schemas
    // ========================================================================

    /// `[repr] schema Name [as] (columns) | Type, *, ... [qualifier names...]`,
    /// starting after `create`.
    pub(crate) fn parse_create_schema(&mut self) -> ParseResult<CreateSchema> {
        let _clause = self.enter("create schema");
        let representation = if Self::is_strict_ident(self.peek()) {
            Some(self.parse_ident("event representation")?)
        } else {
            None
        };
        self.consume(&Token::Schema, "'schema'")?;
        let name = self.parse_ident("schema name")?;
        self.match_token(&Token::As);

        let body = if self.check(&Token::LParen) {
            SchemaBody::Columns(self.paren_list(|p| p.parse_column_decl())?)
        } else {
            let mut types = vec![self.parse_variant_type()?];
            while self.schema_list_continues(|p| {
                p.check_nth(1, &Token::Star) || Self::is_strict_ident(p.peek_nth(1))
            }) {
                self.advance();
                types.push(self.parse_variant_type()?);
            }
            SchemaBody::Variant(types)
        };

        let mut qualifiers = Vec::new();
        while Self::is_strict_ident(self.peek()) {
            let name = self.parse_ident("schema qualifier")?;
            let mut values = vec![self.parse_name("qualifier value")?];
            while self.schema_list_continues(|p| p.check_name_nth(1)) {
                self.advance();
                values.push(self.parse_name("qualifier value")?);
            }
            qualifiers.push(SchemaQualifier { name, values });
        }

        Ok(CreateSchema {
            representation,
            name,
            body,
            qualifiers,
        })
    }

    fn parse_variant_type(&mut self) -> ParseResult<VariantType> {
        if self.match_token(&Token::Star) {
            Ok(VariantType::Any)
        } else {
            Ok(VariantType::Named(self.parse_dotted_ident("type name")?))
        }
    }

    /// A comma continues a schema list unless it starts the next dataflow operator.
    fn schema_list_continues(&self, item_ahead: impl Fn(&Self) -> bool) -> bool {
        self.check(&Token::Comma)
            && item_ahead(self)
            && !matches!(
                self.peek_nth(2),
                Token::LParen | Token::LBrace | Token::Arrow
            )
    }

    // ========================================================================
    // Dataflows
    // ========================================================================

    fn parse_create_dataflow(&mut self) -> ParseResult<CreateDataflow> {
        let _clause = self.enter("create dataflow");
        self.consume(&Token::Dataflow, "'dataflow'")?;
        let name = self.parse_ident("dataflow name")?;
        self.match_token(&Token::As);

        let mut operators = Vec::new();
        while !matches!(self.peek(), Token::Eof | Token::Semicolon | Token::For) {
            let before = self.save();
            if self.match_token(&Token::Create) {
                operators.push(DataflowOperator::Schema(self.parse_create_schema()?));
            } else {
                operators.push(DataflowOperator::Operator(self.parse_graph_operator()?));
            }
            self.match_token(&Token::Comma);
            self.ensure_progress(before, "dataflow operator")?;
        }
        Ok(CreateDataflow { name, operators })
    }

    /// `[@anno...] Name [(inputs)] [-> outputs] { config }`
    fn parse_graph_operator(&mut self) -> ParseResult<GraphOperator> {
        let mut annotations = Vec::new();
        while self.check(&Token::AtSign) {
            annotations.push(self.parse_annotation()?);
        }
        // operator names such as `Select` collide with keywords
        let keyword_name = self.peek().is_keyword()
            && matches!(
                self.peek_nth(1),
                Token::LParen | Token::Arrow | Token::LBrace
            );
        let name = if keyword_name {
            let tok = self.advance();
            self.token_name(&tok)
        } else {
            self.parse_ident("operator name")?
        };

        let inputs = if self.check(&Token::LParen) {
            self.paren_list(|p| {
                let streams = if p.check(&Token::LParen) {
                    p.paren_list(|p| p.parse_dotted_ident("input stream"))?
                } else {
                    vec![p.parse_dotted_ident("input stream")?]
                };
                let alias = p.parse_optional_alias()?;
                Ok(OperatorInput { streams, alias })
            })?
        } else {
            Vec::new()
        };

        let outputs = if self.match_token(&Token::Arrow) {
            self.comma_separated(|p| {
                let stream = p.parse_dotted_ident("output stream")?;
                let types = p.parse_output_types()?;
                Ok(OperatorOutput { stream, types })
            })?
        } else {
            Vec::new()
        };

        self.consume(&Token::LBrace, "'{'")?;
        let config = if self.check(&Token::RBrace) {
            Vec::new()
        } else {
            self.comma_separated(|p| p.parse_operator_config())?
        };
        self.consume(&Token::RBrace, "'}'")?;

        Ok(GraphOperator {
            annotations,
            name,
            inputs,
            outputs,
            config,
        })
    }

    /// `<Type, ?, List<Type>>`, or nothing
    fn parse_output_types(&mut self) -> ParseResult<Vec<OutputType>> {
        if !self.match_token(&Token::Lt) {
            return Ok(Vec::new());
        }
        let types = self.comma_separated(|p| {
            if p.match_token(&Token::Question) {
                return Ok(OutputType::Wildcard);
            }
            let name = p.parse_dotted_ident("output type")?;
            let params = p.nested(|p| p.parse_output_types())?;
            Ok(OutputType::Named { name, params })
        })?;
        self.consume(&Token::Gt, "'>'")?;
        Ok(types)
    }

    fn parse_operator_config(&mut self) -> ParseResult<OperatorConfig> {
        if self.check(&Token::Select) && self.check_nth(1, &Token::Colon) {
            self.advance();
            self.advance();
            self.consume(&Token::LParen, "'('")?;
            let select = self.parse_select_statement(None, None)?;
            self.consume(&Token::RParen, "')'")?;
            return Ok(OperatorConfig::Select(Box::new(select)));
        }
        let name = self.parse_name("operator parameter")?;
        self.consume(&Token::Colon, "':'")?;
        let json = self.check(&Token::LBracket)
            || (self.check(&Token::LBrace) && self.check_nth(1, &Token::RBrace))
            || self.json_object_ahead();
        let value = if json {
            ConfigValue::Json(self.parse_json_value()?)
        } else {
            ConfigValue::Expr(self.parse_expr()?)
        };
        Ok(OperatorConfig::Value { name, value })
    }
}
