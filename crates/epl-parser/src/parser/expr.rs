//! Value expressions, time arguments and JSON literals

use epl_core::ast::*;
use epl_core::span::{Span, Spanned};

use super::Parser;
use crate::error::ParseResult;
use crate::lexer::Token;

fn boxed(expr: Expr) -> Box<Expr> {
    Box::new(expr)
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Spanned::new(
        ExprKind::Binary {
            op,
            left: boxed(left),
            right: boxed(right),
        },
        span,
    )
}

/// `-` applied to a numeric literal folds into the literal.
fn negate(expr: Expr, start: Span) -> Expr {
    let span = start.merge(expr.span);
    let folded = match &expr.node {
        ExprKind::Literal(Literal::Int(n)) => n.checked_neg().map(Literal::Int),
        ExprKind::Literal(Literal::Long(n)) => n.checked_neg().map(Literal::Long),
        ExprKind::Literal(Literal::Double(v)) => Some(Literal::Double(-v)),
        ExprKind::Literal(Literal::Float(v)) => Some(Literal::Float(-v)),
        _ => None,
    };
    match folded {
        Some(lit) => Spanned::new(ExprKind::Literal(lit), span),
        None => Spanned::new(
            ExprKind::Unary {
                op: UnaryOp::Neg,
                expr: boxed(expr),
            },
            span,
        ),
    }
}

pub(crate) fn time_unit(token: &Token) -> Option<TimeUnit> {
    let unit = match token {
        Token::Year | Token::Years => TimeUnit::Year,
        Token::Month | Token::Months => TimeUnit::Month,
        Token::Week | Token::Weeks => TimeUnit::Week,
        Token::Day | Token::Days => TimeUnit::Day,
        Token::Hour | Token::Hours => TimeUnit::Hour,
        Token::Minute | Token::Minutes | Token::Min => TimeUnit::Minute,
        Token::Sec | Token::Second | Token::Seconds => TimeUnit::Second,
        Token::Millisecond | Token::Milliseconds | Token::Msec => TimeUnit::Millisecond,
        Token::Microsecond | Token::Microseconds | Token::Usec => TimeUnit::Microsecond,
        _ => return None,
    };
    Some(unit)
}

fn literal_of(token: &Token) -> Option<Literal> {
    let lit = match token {
        Token::Integer(n) => Literal::Int(*n),
        Token::Long(n) => Literal::Long(*n),
        Token::Double(v) => Literal::Double(*v),
        Token::Float(v) => Literal::Float(*v),
        Token::SingleQuoted(s) | Token::DoubleQuoted(s) => Literal::String(s.clone()),
        Token::True => Literal::Bool(true),
        Token::False => Literal::Bool(false),
        Token::Null => Literal::Null,
        _ => return None,
    };
    Some(lit)
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Boolean and comparison levels
    // ========================================================================

    pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.nested(|p| p.parse_or())
    }

    pub(crate) fn parse_expr_list(&mut self) -> ParseResult<Vec<Expr>> {
        self.comma_separated(|p| p.parse_expr())
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_and()?;
        while self.match_token(&Token::Or) {
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_bitwise()?;
        // `and when terminated` continues an output clause
        while self.check(&Token::And) && !self.check_nth(1, &Token::When) {
            self.advance();
            let right = self.parse_bitwise()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_bitwise(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_not()?;
        loop {
            let op = match self.peek() {
                Token::Amp => BinaryOp::BitAnd,
                Token::Pipe => BinaryOp::BitOr,
                Token::Caret => BinaryOp::BitXor,
                _ => break,
            };
            self.advance();
            let right = self.parse_not()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> ParseResult<Expr> {
        if self.check(&Token::Not) {
            let start = self.advance().span;
            let operand = self.nested(|p| p.parse_not())?;
            let span = start.merge(operand.span);
            return Ok(Spanned::new(
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    expr: boxed(operand),
                },
                span,
            ));
        }
        self.parse_equality()
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek() {
                Token::Eq | Token::EqEq => CompareOp::Eq,
                Token::NotEq => CompareOp::NotEq,
                Token::Is if self.check_nth(1, &Token::Not) => CompareOp::IsNot,
                Token::Is => CompareOp::Is,
                _ => break,
            };
            self.advance();
            if op == CompareOp::IsNot {
                self.advance();
            }
            left = self.parse_compare_rhs(op, left, |p| p.parse_relational())?;
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_concat()?;
        loop {
            let op = match self.peek() {
                Token::Lt => CompareOp::Lt,
                Token::Gt => CompareOp::Gt,
                Token::Le => CompareOp::Le,
                Token::Ge => CompareOp::Ge,
                Token::Not
                    if matches!(
                        self.peek_nth(1),
                        Token::In | Token::Between | Token::Like | Token::Regexp
                    ) =>
                {
                    self.advance();
                    left = self.parse_relational_suffix(left, true)?;
                    continue;
                }
                Token::In | Token::Between | Token::Like | Token::Regexp => {
                    left = self.parse_relational_suffix(left, false)?;
                    continue;
                }
                _ => break,
            };
            self.advance();
            left = self.parse_compare_rhs(op, left, |p| p.parse_concat())?;
        }
        Ok(left)
    }

    /// Right-hand side of a comparison: a plain operand or `any|some|all (...)`.
    fn parse_compare_rhs(
        &mut self,
        op: CompareOp,
        left: Expr,
        operand: impl FnOnce(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        let quantifier = match self.peek() {
            Token::Any => Some(Quantifier::Any),
            Token::Some => Some(Quantifier::Some),
            Token::All => Some(Quantifier::All),
            _ => None,
        };
        if let Some(quantifier) = quantifier.filter(|_| self.check_nth(1, &Token::LParen)) {
            self.advance();
            let source = if self.check_nth(1, &Token::Select) {
                QuantifiedSource::Subquery(Box::new(self.parse_subquery()?))
            } else {
                QuantifiedSource::List(self.paren_list(|p| p.parse_expr())?)
            };
            let span = left.span.merge(self.prev_span());
            return Ok(Spanned::new(
                ExprKind::Quantified {
                    op,
                    quantifier,
                    left: boxed(left),
                    source,
                },
                span,
            ));
        }
        let right = operand(self)?;
        let span = left.span.merge(right.span);
        Ok(Spanned::new(
            ExprKind::Compare {
                op,
                left: boxed(left),
                right: boxed(right),
            },
            span,
        ))
    }

    /// `in`, `between`, `like` or `regexp` after the left operand (and an optional `not`).
    fn parse_relational_suffix(&mut self, left: Expr, negated: bool) -> ParseResult<Expr> {
        let expr = boxed(left);
        let kind = match self.advance().token {
            Token::In => return self.parse_in(expr, negated),
            Token::Between => {
                let low = boxed(self.parse_concat()?);
                self.consume(&Token::And, "'and'")?;
                let high = boxed(self.parse_concat()?);
                ExprKind::Between {
                    expr,
                    negated,
                    low,
                    high,
                }
            }
            Token::Like => {
                let pattern = boxed(self.parse_concat()?);
                let escape = if self.match_token(&Token::Escape) {
                    Some(self.parse_string_literal("escape character")?)
                } else {
                    None
                };
                ExprKind::Like {
                    expr,
                    negated,
                    pattern,
                    escape,
                }
            }
            _ => {
                let pattern = boxed(self.parse_concat()?);
                ExprKind::Regexp {
                    expr,
                    negated,
                    pattern,
                }
            }
        };
        let span = self.span_from_operand(&kind);
        Ok(Spanned::new(kind, span))
    }

    fn span_from_operand(&self, kind: &ExprKind) -> Span {
        let start = match kind {
            ExprKind::Between { expr, .. }
            | ExprKind::Like { expr, .. }
            | ExprKind::Regexp { expr, .. }
            | ExprKind::In { expr, .. }
            | ExprKind::InRange { expr, .. }
            | ExprKind::InSubquery { expr, .. } => expr.span,
            _ => self.prev_span(),
        };
        start.merge(self.prev_span())
    }

    /// `in (list)`, `in [low:high)`, `in (select ...)`; open and close delimiters are
    /// taken independently of each other.
    fn parse_in(&mut self, expr: Box<Expr>, negated: bool) -> ParseResult<Expr> {
        if self.check(&Token::LParen) && self.check_nth(1, &Token::Select) {
            let subquery = Box::new(self.parse_subquery()?);
            let kind = ExprKind::InSubquery {
                expr,
                negated,
                subquery,
            };
            let span = self.span_from_operand(&kind);
            return Ok(Spanned::new(kind, span));
        }
        let open = match self.peek() {
            Token::LParen => Delimiter::Paren,
            Token::LBracket => Delimiter::Bracket,
            _ => return Err(self.expected("'(' or '['")),
        };
        self.advance();
        let first = self.parse_expr()?;
        let kind = if self.match_token(&Token::Colon) {
            let high = self.parse_expr()?;
            let close = self.parse_close_delimiter()?;
            ExprKind::InRange {
                expr,
                negated,
                low: boxed(first),
                high: boxed(high),
                low_closed: open == Delimiter::Bracket,
                high_closed: close == Delimiter::Bracket,
            }
        } else {
            let mut items = vec![first];
            while self.match_token(&Token::Comma) {
                items.push(self.parse_expr()?);
            }
            let close = self.parse_close_delimiter()?;
            ExprKind::In {
                expr,
                negated,
                open,
                close,
                items,
            }
        };
        let span = self.span_from_operand(&kind);
        Ok(Spanned::new(kind, span))
    }

    fn parse_close_delimiter(&mut self) -> ParseResult<Delimiter> {
        let close = match self.peek() {
            Token::RParen => Delimiter::Paren,
            Token::RBracket => Delimiter::Bracket,
            _ => return Err(self.expected("')' or ']'")),
        };
        self.advance();
        Ok(close)
    }

    // ========================================================================
    // Arithmetic levels
    // ========================================================================

    fn parse_concat(&mut self) -> ParseResult<Expr> {
        let first = self.parse_additive()?;
        if !self.check(&Token::Concat) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.match_token(&Token::Concat) {
            items.push(self.parse_additive()?);
        }
        let span = items[0].span.merge(self.prev_span());
        Ok(Spanned::new(ExprKind::Concat(items), span))
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        match self.peek() {
            Token::Minus => {
                let start = self.advance().span;
                let operand = self.nested(|p| p.parse_unary())?;
                Ok(negate(operand, start))
            }
            Token::Plus => {
                self.advance();
                self.nested(|p| p.parse_unary())
            }
            _ => self.parse_postfix(),
        }
    }

    // ========================================================================
    // Primaries and chains
    // ========================================================================

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let root = if self.builtin_ahead() {
            self.parse_builtin()?
        } else if self.check_name() {
            let chain = self.parse_chain()?;
            let span = chain_span(&chain);
            return Ok(Spanned::new(ExprKind::Chain(chain), span));
        } else {
            self.parse_primary()?
        };
        let mut elements = Vec::new();
        self.parse_chain_elements(&mut elements)?;
        if elements.is_empty() {
            return Ok(root);
        }
        let span = root.span.merge(self.prev_span());
        Ok(Spanned::new(
            ExprKind::Chained {
                root: boxed(root),
                elements,
            },
            span,
        ))
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let start = self.span();
        if let Some(lit) = literal_of(self.peek()) {
            self.advance();
            return Ok(Spanned::new(ExprKind::Literal(lit), start));
        }
        match self.peek() {
            Token::Question => self.parse_substitution(),
            Token::LParen if self.check_nth(1, &Token::Select) => {
                let sub = self.parse_subquery()?;
                let span = sub.span;
                Ok(Spanned::new(ExprKind::Subquery(Box::new(sub)), span))
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                let end = self.consume(&Token::RParen, "')'")?;
                Ok(Spanned::new(inner.node, start.merge(end)))
            }
            Token::LBrace if self.json_object_ahead() => {
                let members = self.parse_json_members()?;
                Ok(Spanned::new(
                    ExprKind::JsonObject(members),
                    start.merge(self.prev_span()),
                ))
            }
            Token::LBrace => {
                self.advance();
                let items = if self.check(&Token::RBrace) {
                    Vec::new()
                } else {
                    self.parse_expr_list()?
                };
                let end = self.consume(&Token::RBrace, "'}'")?;
                Ok(Spanned::new(ExprKind::Array(items), start.merge(end)))
            }
            Token::Case => self.parse_case(),
            Token::New => self.parse_new(),
            _ => Err(self.expected("expression")),
        }
    }

    /// `?`, `?:name`, `?:name:type`
    fn parse_substitution(&mut self) -> ParseResult<Expr> {
        let start = self.consume(&Token::Question, "'?'")?;
        let mut name = None;
        let mut type_name = None;
        if self.match_token(&Token::Colon) {
            name = Some(self.parse_name("parameter name")?);
            if self.match_token(&Token::Colon) {
                type_name = Some(self.parse_type_name()?);
            }
        }
        Ok(Spanned::new(
            ExprKind::Substitution { name, type_name },
            start.merge(self.prev_span()),
        ))
    }

    /// Property path or library call rooted at a name: `a.b?.c(x)[0]`.
    pub(crate) fn parse_chain(&mut self) -> ParseResult<Chain> {
        if !self.check_name() {
            return Err(self.expected("property name"));
        }
        let tok = self.advance();
        let name = self.token_name(&tok);
        let link = if self.check(&Token::LParen) {
            ChainLink::Call {
                name,
                args: self.parse_call_args()?,
            }
        } else {
            ChainLink::Property(name)
        };
        let dynamic = self.match_token(&Token::Question);
        let mut elements = vec![ChainElement {
            link,
            dynamic,
            span: tok.span.merge(self.prev_span()),
        }];
        self.parse_chain_elements(&mut elements)?;
        Ok(Chain { elements })
    }

    fn parse_chain_elements(&mut self, elements: &mut Vec<ChainElement>) -> ParseResult<()> {
        loop {
            let start = self.span();
            let link = if self.check(&Token::Dot) && self.check_name_nth(1) {
                self.advance();
                let tok = self.advance();
                let name = self.token_name(&tok);
                if self.check(&Token::LParen) {
                    ChainLink::Call {
                        name,
                        args: self.parse_call_args()?,
                    }
                } else {
                    ChainLink::Property(name)
                }
            } else if self.check(&Token::LBracket) {
                self.advance();
                let indexes = self.parse_expr_list()?;
                self.consume(&Token::RBracket, "']'")?;
                ChainLink::Index(indexes)
            } else {
                return Ok(());
            };
            let dynamic = self.match_token(&Token::Question);
            elements.push(ChainElement {
                link,
                dynamic,
                span: start.merge(self.prev_span()),
            });
        }
    }

    /// `( [all|distinct] arg, ... )`
    fn parse_call_args(&mut self) -> ParseResult<CallArgs> {
        self.consume(&Token::LParen, "'('")?;
        let modifier = self.parse_aggregate_modifier();
        let args = if self.check(&Token::RParen) {
            Vec::new()
        } else {
            self.comma_separated(|p| p.parse_function_arg())?
        };
        self.consume(&Token::RParen, "')'")?;
        Ok(CallArgs { modifier, args })
    }

    fn parse_aggregate_modifier(&mut self) -> Option<AggregateModifier> {
        if self.match_token(&Token::All) {
            Some(AggregateModifier::All)
        } else if self.match_token(&Token::Distinct) {
            Some(AggregateModifier::Distinct)
        } else {
            None
        }
    }

    pub(crate) fn parse_function_arg(&mut self) -> ParseResult<FunctionArg> {
        if Self::is_strict_ident(self.peek()) && self.check_nth(1, &Token::Colon) {
            let name = self.parse_ident("argument name")?;
            self.advance();
            let value = self.parse_named_value()?;
            return Ok(FunctionArg::Named { name, value });
        }
        if let Some(param_count) = self.lambda_ahead() {
            let params = if param_count == 1 && !self.check(&Token::LParen) {
                vec![self.parse_name("lambda parameter")?]
            } else {
                self.paren_list(|p| p.parse_name("lambda parameter"))?
            };
            self.consume(&Token::FatArrow, "'=>'")?;
            let body = self.parse_expr()?;
            return Ok(FunctionArg::Lambda {
                params,
                body: boxed(body),
            });
        }
        Ok(FunctionArg::Value(self.parse_time_arg()?))
    }

    /// Number of lambda parameters when the cursor sits on `x =>` or `(a, b) =>`.
    pub(crate) fn lambda_ahead(&self) -> Option<usize> {
        if self.check_name() && self.check_nth(1, &Token::FatArrow) {
            return Some(1);
        }
        if !self.check(&Token::LParen) {
            return None;
        }
        let mut i = 1;
        let mut count = 0;
        if !self.check_nth(i, &Token::RParen) {
            loop {
                if !self.check_name_nth(i) {
                    return None;
                }
                count += 1;
                i += 1;
                if self.check_nth(i, &Token::Comma) {
                    i += 1;
                } else {
                    break;
                }
            }
        }
        (self.check_nth(i, &Token::RParen) && self.check_nth(i + 1, &Token::FatArrow))
            .then_some(count)
    }

    /// `expr` or a parenthesized list of two or more expressions.
    pub(crate) fn parse_named_value(&mut self) -> ParseResult<NamedValue> {
        if self.check(&Token::LParen) && !self.check_nth(1, &Token::Select) {
            let list = self.attempt("named value list", |p| {
                let items = p.paren_list(|p| p.parse_expr())?;
                if items.len() < 2 || !matches!(p.peek(), Token::Comma | Token::RParen) {
                    return Err(p.expected("expression list"));
                }
                Ok(items)
            });
            if let Some(items) = list {
                return Ok(NamedValue::List(items));
            }
        }
        Ok(NamedValue::Expr(self.parse_expr()?))
    }

    // ========================================================================
    // Time arguments
    // ========================================================================

    /// Argument of a function, view or observer; also takes time periods and
    /// crontab operands.
    pub(crate) fn parse_time_arg(&mut self) -> ParseResult<TimeArg> {
        match self.peek() {
            Token::Star => {
                self.advance();
                if self.match_token(&Token::Slash) {
                    return Ok(TimeArg::Frequency(self.parse_expr()?));
                }
                return Ok(TimeArg::Wildcard);
            }
            Token::Lastweekday => {
                self.advance();
                return Ok(TimeArg::LastWeekday);
            }
            Token::LBracket => {
                self.advance();
                let items = self.comma_separated(|p| p.parse_time_arg())?;
                self.consume(&Token::RBracket, "']'")?;
                return Ok(TimeArg::NumericList(items));
            }
            _ => {}
        }
        if Self::is_strict_ident(self.peek())
            && self.check_nth(1, &Token::Dot)
            && self.check_nth(2, &Token::Star)
        {
            let stream = self.parse_ident("stream name")?;
            self.advance();
            self.advance();
            return Ok(TimeArg::StreamWildcard(stream));
        }
        if self.time_period_ahead() {
            return Ok(TimeArg::TimePeriod(self.parse_time_period()?));
        }
        let expr = self.parse_expr()?;
        let arg = match self.peek() {
            Token::Asc => TimeArg::Ordered {
                expr,
                descending: false,
            },
            Token::Desc => TimeArg::Ordered {
                expr,
                descending: true,
            },
            Token::Colon => {
                self.advance();
                return Ok(TimeArg::Range(expr, self.parse_expr()?));
            }
            Token::Last => TimeArg::Last(expr),
            Token::Weekday => TimeArg::Weekday(expr),
            _ => return Ok(TimeArg::Expr(expr)),
        };
        self.advance();
        Ok(arg)
    }

    /// Whether a time period starts here: a number, variable or parameter followed by a unit.
    pub(crate) fn time_period_ahead(&self) -> bool {
        let value_len = match self.peek() {
            Token::Integer(_)
            | Token::Long(_)
            | Token::Double(_)
            | Token::Float(_)
            | Token::Ident(_)
            | Token::EscapedIdent(_) => 1,
            Token::Question => {
                if self.check_nth(1, &Token::Colon) && self.check_name_nth(2) {
                    if self.check_nth(3, &Token::Colon) && Self::is_strict_ident(self.peek_nth(4)) {
                        5
                    } else {
                        3
                    }
                } else {
                    1
                }
            }
            _ => return false,
        };
        time_unit(self.peek_nth(value_len)).is_some()
    }

    /// `1 hour 30 minutes`; units must strictly descend.
    pub(crate) fn parse_time_period(&mut self) -> ParseResult<TimePeriod> {
        let start = self.span();
        let mut parts: Vec<TimePeriodPart> = Vec::new();
        while self.time_period_ahead() {
            let part_start = self.current().clone();
            let value = self.parse_period_value()?;
            let unit_tok = self.advance();
            let unit = time_unit(&unit_tok.token).ok_or_else(|| self.expected("time unit"))?;
            if parts.last().is_some_and(|last| unit <= last.unit) {
                return Err(self.error_at(
                    crate::error::ParseErrorKind::Syntax,
                    &part_start,
                    "time period parts must appear in descending order".to_string(),
                ));
            }
            parts.push(TimePeriodPart { value, unit });
        }
        if parts.is_empty() {
            return Err(self.expected("time period"));
        }
        Ok(TimePeriod {
            parts,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_period_value(&mut self) -> ParseResult<Expr> {
        let start = self.span();
        if let Some(lit @ (Literal::Int(_) | Literal::Long(_) | Literal::Double(_) | Literal::Float(_))) =
            literal_of(self.peek())
        {
            self.advance();
            return Ok(Spanned::new(ExprKind::Literal(lit), start));
        }
        if self.check(&Token::Question) {
            return self.parse_substitution();
        }
        let name = self.parse_ident("time period value")?;
        Ok(Spanned::new(
            ExprKind::Chain(Chain::property(name, start)),
            start,
        ))
    }

    // ========================================================================
    // Builtin functions
    // ========================================================================

    fn builtin_ahead(&self) -> bool {
        match self.peek() {
            Token::CurrentTimestamp => true,
            Token::Count
            | Token::Sum
            | Token::Avg
            | Token::Median
            | Token::Stddev
            | Token::Avedev
            | Token::First
            | Token::Last
            | Token::Window
            | Token::Coalesce
            | Token::Prev
            | Token::Prevtail
            | Token::Prevcount
            | Token::Prevwindow
            | Token::Prior
            | Token::Grouping
            | Token::GroupingId
            | Token::Instanceof
            | Token::Typeof
            | Token::Cast
            | Token::Exists
            | Token::Istream => self.check_nth(1, &Token::LParen),
            _ => false,
        }
    }

    fn parse_builtin(&mut self) -> ParseResult<Expr> {
        let start = self.span();
        if self.check(&Token::Exists) && self.check_nth(2, &Token::Select) {
            self.advance();
            let sub = self.parse_subquery()?;
            return Ok(Spanned::new(
                ExprKind::Exists(Box::new(sub)),
                start.merge(self.prev_span()),
            ));
        }
        let tok = self.advance();
        let call = match tok.token {
            Token::Count => self.parse_aggregate(AggregateFunc::Count)?,
            Token::Sum => self.parse_aggregate(AggregateFunc::Sum)?,
            Token::Avg => self.parse_aggregate(AggregateFunc::Avg)?,
            Token::Median => self.parse_aggregate(AggregateFunc::Median)?,
            Token::Stddev => self.parse_aggregate(AggregateFunc::Stddev)?,
            Token::Avedev => self.parse_aggregate(AggregateFunc::Avedev)?,
            Token::First => self.parse_access(AccessFunc::First)?,
            Token::Last => self.parse_access(AccessFunc::Last)?,
            Token::Window => self.parse_access(AccessFunc::Window)?,
            Token::Coalesce => BuiltinCall::Coalesce(self.parse_required_args()?),
            Token::Prev => BuiltinCall::Prev {
                tail: false,
                args: self.parse_required_args()?,
            },
            Token::Prevtail => BuiltinCall::Prev {
                tail: true,
                args: self.parse_required_args()?,
            },
            Token::Prevcount => BuiltinCall::PrevCount(self.parse_single_arg()?),
            Token::Prevwindow => BuiltinCall::PrevWindow(self.parse_single_arg()?),
            Token::Grouping => BuiltinCall::Grouping(self.parse_single_arg()?),
            Token::Typeof => BuiltinCall::TypeOf(self.parse_single_arg()?),
            Token::GroupingId => BuiltinCall::GroupingId(self.parse_required_args()?),
            Token::Prior => {
                self.consume(&Token::LParen, "'('")?;
                let index = boxed(self.parse_expr()?);
                self.consume(&Token::Comma, "','")?;
                let property = self.parse_chain()?;
                self.consume(&Token::RParen, "')'")?;
                BuiltinCall::Prior { index, property }
            }
            Token::Instanceof => {
                self.consume(&Token::LParen, "'('")?;
                let expr = boxed(self.parse_expr()?);
                self.consume(&Token::Comma, "','")?;
                let types = self.comma_separated(|p| p.parse_type_name())?;
                self.consume(&Token::RParen, "')'")?;
                BuiltinCall::InstanceOf { expr, types }
            }
            Token::Cast => self.parse_cast()?,
            Token::Exists => {
                self.consume(&Token::LParen, "'('")?;
                let chain = self.parse_chain()?;
                self.consume(&Token::RParen, "')'")?;
                BuiltinCall::ExistsProperty(chain)
            }
            Token::CurrentTimestamp => {
                if self.match_token(&Token::LParen) {
                    self.consume(&Token::RParen, "')'")?;
                }
                BuiltinCall::CurrentTimestamp
            }
            _ => {
                self.consume(&Token::LParen, "'('")?;
                self.consume(&Token::RParen, "')'")?;
                BuiltinCall::IStream
            }
        };
        Ok(Spanned::new(
            ExprKind::Builtin(call),
            start.merge(self.prev_span()),
        ))
    }

    fn parse_aggregate(&mut self, func: AggregateFunc) -> ParseResult<BuiltinCall> {
        let CallArgs { modifier, args } = self.parse_call_args()?;
        Ok(BuiltinCall::Aggregate {
            func,
            modifier,
            args,
        })
    }

    /// `first(*)`, `last(s.*)`, `window(price, 2)`
    fn parse_access(&mut self, func: AccessFunc) -> ParseResult<BuiltinCall> {
        self.consume(&Token::LParen, "'('")?;
        let arg = if self.match_token(&Token::Star) {
            AccessArg::Wildcard
        } else if Self::is_strict_ident(self.peek())
            && self.check_nth(1, &Token::Dot)
            && self.check_nth(2, &Token::Star)
        {
            let stream = self.parse_ident("stream name")?;
            self.advance();
            self.advance();
            AccessArg::StreamWildcard(stream)
        } else {
            AccessArg::Expr(boxed(self.parse_expr()?))
        };
        let index = if self.match_token(&Token::Comma) {
            Some(boxed(self.parse_expr()?))
        } else {
            None
        };
        self.consume(&Token::RParen, "')'")?;
        Ok(BuiltinCall::Access { func, arg, index })
    }

    /// `cast(expr, type [, name: value])`; `cast(expr as type)` is also read.
    fn parse_cast(&mut self) -> ParseResult<BuiltinCall> {
        self.consume(&Token::LParen, "'('")?;
        let expr = boxed(self.parse_expr()?);
        if !self.match_token(&Token::As) {
            self.consume(&Token::Comma, "',' or 'as'")?;
        }
        let target = self.parse_type_name()?;
        let option = if self.match_token(&Token::Comma) {
            let name = self.parse_ident("option name")?;
            self.consume(&Token::Colon, "':'")?;
            Some((name, Box::new(self.parse_named_value()?)))
        } else {
            None
        };
        self.consume(&Token::RParen, "')'")?;
        Ok(BuiltinCall::Cast {
            expr,
            target,
            option,
        })
    }

    fn parse_single_arg(&mut self) -> ParseResult<Box<Expr>> {
        self.consume(&Token::LParen, "'('")?;
        let expr = self.parse_expr()?;
        self.consume(&Token::RParen, "')'")?;
        Ok(boxed(expr))
    }

    fn parse_required_args(&mut self) -> ParseResult<Vec<Expr>> {
        self.consume(&Token::LParen, "'('")?;
        let args = self.parse_expr_list()?;
        self.consume(&Token::RParen, "')'")?;
        Ok(args)
    }

    // ========================================================================
    // CASE, NEW, subqueries
    // ========================================================================

    fn parse_case(&mut self) -> ParseResult<Expr> {
        let start = self.consume(&Token::Case, "'case'")?;
        let operand = if self.check(&Token::When) {
            None
        } else {
            Some(boxed(self.parse_expr()?))
        };
        let mut whens = Vec::new();
        while self.match_token(&Token::When) {
            let when = self.parse_expr()?;
            self.consume(&Token::Then, "'then'")?;
            let then = self.parse_expr()?;
            whens.push(WhenThen { when, then });
        }
        if whens.is_empty() {
            return Err(self.expected("'when'"));
        }
        let otherwise = if self.match_token(&Token::Else) {
            Some(boxed(self.parse_expr()?))
        } else {
            None
        };
        let end = self.consume(&Token::End, "'end'")?;
        Ok(Spanned::new(
            ExprKind::Case {
                operand,
                whens,
                otherwise,
            },
            start.merge(end),
        ))
    }

    fn parse_new(&mut self) -> ParseResult<Expr> {
        let start = self.consume(&Token::New, "'new'")?;
        let kind = if self.match_token(&Token::LBrace) {
            let fields = if self.check(&Token::RBrace) {
                Vec::new()
            } else {
                self.comma_separated(|p| {
                    let target = p.parse_chain()?;
                    let value = if p.match_token(&Token::Eq) {
                        Some(p.parse_expr()?)
                    } else {
                        None
                    };
                    Ok(NewField { target, value })
                })?
            };
            self.consume(&Token::RBrace, "'}'")?;
            ExprKind::NewObject(fields)
        } else {
            let class = self.parse_class_name()?;
            if self.check(&Token::LParen) {
                let args = self.paren_list(|p| p.parse_expr())?;
                ExprKind::NewInstance { class, args }
            } else if self.check(&Token::LBracket) && self.check_nth(1, &Token::RBracket) {
                let mut dimensions = 0;
                while self.check(&Token::LBracket) && self.check_nth(1, &Token::RBracket) {
                    self.advance();
                    self.advance();
                    dimensions += 1;
                }
                self.consume(&Token::LBrace, "'{'")?;
                let values = if self.check(&Token::RBrace) {
                    Vec::new()
                } else {
                    self.parse_expr_list()?
                };
                self.consume(&Token::RBrace, "'}'")?;
                ExprKind::NewArrayInit {
                    element: class,
                    dimensions,
                    values,
                }
            } else if self.check(&Token::LBracket) {
                let mut sizes = Vec::new();
                while self.match_token(&Token::LBracket) {
                    sizes.push(self.parse_expr()?);
                    self.consume(&Token::RBracket, "']'")?;
                }
                ExprKind::NewArray {
                    element: class,
                    sizes,
                }
            } else {
                return Err(self.expected("'(' or '['"));
            }
        };
        Ok(Spanned::new(kind, start.merge(self.prev_span())))
    }

    /// `(select [distinct] items from Filter[views] [as a] [retain] [where] [group by] [having])`
    pub(crate) fn parse_subquery(&mut self) -> ParseResult<Subquery> {
        self.nested(|p| {
            let _clause = p.enter("subquery");
            let start = p.consume(&Token::LParen, "'('")?;
            p.consume(&Token::Select, "'select'")?;
            let distinct = p.match_token(&Token::Distinct);
            let select = p.comma_separated(|p| p.parse_select_item())?;
            p.consume(&Token::From, "'from'")?;
            let filter = p.parse_event_filter()?;
            let views = p.parse_views()?;
            let alias = p.parse_optional_alias()?;
            let retain = p.parse_retain();
            let from = SubqueryStream {
                filter,
                views,
                alias,
                retain,
            };
            let where_clause = p.parse_where_clause()?;
            let group_by = p.parse_group_by_clause()?;
            let having = p.parse_having_clause()?;
            let end = p.consume(&Token::RParen, "')'")?;
            Ok(Subquery {
                distinct,
                select,
                from,
                where_clause,
                group_by,
                having,
                span: start.merge(end),
            })
        })
    }

    // ========================================================================
    // Literals
    // ========================================================================

    pub(crate) fn parse_string_literal(&mut self, what: &str) -> ParseResult<String> {
        match self.peek() {
            Token::SingleQuoted(s) | Token::DoubleQuoted(s) => {
                let s = s.clone();
                self.advance();
                Ok(s)
            }
            _ => Err(self.expected(what)),
        }
    }

    /// Integer constant, optionally negative.
    pub(crate) fn parse_integer(&mut self, what: &str) -> ParseResult<i64> {
        let negative = self.check(&Token::Minus)
            && matches!(self.peek_nth(1), Token::Integer(_) | Token::Long(_));
        if negative {
            self.advance();
        }
        match *self.peek() {
            Token::Integer(n) | Token::Long(n) => {
                self.advance();
                Ok(if negative { -n } else { n })
            }
            _ => Err(self.expected(what)),
        }
    }

    /// A literal constant. A single leading `-` is folded into a number.
    pub(crate) fn parse_literal(&mut self, what: &str) -> ParseResult<Literal> {
        if self.check(&Token::Minus) {
            let start = self.advance().span;
            let number = match literal_of(self.peek()) {
                Some(
                    lit @ (Literal::Int(_)
                    | Literal::Long(_)
                    | Literal::Double(_)
                    | Literal::Float(_)),
                ) => lit,
                _ => return Err(self.expected("number")),
            };
            let span = self.advance().span;
            let folded = negate(Spanned::new(ExprKind::Literal(number), span), start);
            return match folded.node {
                ExprKind::Literal(lit) => Ok(lit),
                _ => Err(self.expected("number")),
            };
        }
        match literal_of(self.peek()) {
            Some(lit) => {
                self.advance();
                Ok(lit)
            }
            None => Err(self.expected(what)),
        }
    }

    /// Whether a literal constant starts here, counting a `-` before a number.
    pub(crate) fn literal_ahead(&self) -> bool {
        literal_of(self.peek()).is_some()
            || (self.check(&Token::Minus)
                && matches!(
                    self.peek_nth(1),
                    Token::Integer(_) | Token::Long(_) | Token::Double(_) | Token::Float(_)
                ))
    }

    pub(crate) fn json_object_ahead(&self) -> bool {
        self.check(&Token::LBrace)
            && matches!(
                self.peek_nth(1),
                Token::SingleQuoted(_) | Token::DoubleQuoted(_) | Token::Ident(_)
            )
            && self.check_nth(2, &Token::Colon)
    }

    /// `{"key": value, ...}`
    fn parse_json_members(&mut self) -> ParseResult<Vec<(String, JsonValue)>> {
        self.consume(&Token::LBrace, "'{'")?;
        let mut members = Vec::new();
        if !self.check(&Token::RBrace) {
            loop {
                let key = match self.peek() {
                    Token::SingleQuoted(_) | Token::DoubleQuoted(_) => {
                        self.parse_string_literal("JSON key")?
                    }
                    _ => self.parse_name("JSON key")?,
                };
                self.consume(&Token::Colon, "':'")?;
                members.push((key, self.parse_json_value()?));
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.consume(&Token::RBrace, "'}'")?;
        Ok(members)
    }

    pub(crate) fn parse_json_value(&mut self) -> ParseResult<JsonValue> {
        self.nested(|p| {
            let value = match p.peek() {
                Token::LBrace => return Ok(JsonValue::Object(p.parse_json_members()?)),
                Token::LBracket => {
                    p.advance();
                    let items = if p.check(&Token::RBracket) {
                        Vec::new()
                    } else {
                        p.comma_separated(|p| p.parse_json_value())?
                    };
                    p.consume(&Token::RBracket, "']'")?;
                    return Ok(JsonValue::Array(items));
                }
                _ => p.parse_literal("JSON value")?,
            };
            Ok(match value {
                Literal::Null => JsonValue::Null,
                Literal::Bool(b) => JsonValue::Bool(b),
                Literal::Int(n) | Literal::Long(n) => JsonValue::Int(n),
                Literal::Double(v) | Literal::Float(v) => JsonValue::Double(v),
                Literal::String(s) => JsonValue::String(s),
            })
        })
    }
}

fn chain_span(chain: &Chain) -> Span {
    match (chain.elements.first(), chain.elements.last()) {
        (Some(first), Some(last)) => first.span.merge(last.span),
        _ => Span::dummy(),
    }
}
