use std::fmt;

use super::{comma_list, comma_list_fn, write_alias, write_ident, write_json_string, write_name, write_string};
use crate::ast::*;
use crate::types::write_dotted;

// Binding strength of each expression form; operands that bind no tighter than
// their parent are parenthesized.
const CASE: u8 = 0;
const OR: u8 = 1;
const AND: u8 = 2;
const BITWISE: u8 = 3;
const NOT: u8 = 4;
const EQUALITY: u8 = 5;
const RELATIONAL: u8 = 6;
const CONCAT: u8 = 7;
const ADDITIVE: u8 = 8;
const MULTIPLICATIVE: u8 = 9;
const NEGATE: u8 = 10;
const ATOM: u8 = 11;

fn level(kind: &ExprKind) -> u8 {
    match kind {
        ExprKind::Case { .. } => CASE,
        ExprKind::Binary { op, .. } => match op {
            BinaryOp::Or => OR,
            BinaryOp::And => AND,
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => BITWISE,
            BinaryOp::Add | BinaryOp::Sub => ADDITIVE,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => MULTIPLICATIVE,
        },
        ExprKind::Unary { op: UnaryOp::Not, .. } => NOT,
        ExprKind::Unary { op: UnaryOp::Neg, .. } => NEGATE,
        ExprKind::Compare { op, .. } | ExprKind::Quantified { op, .. } => {
            if op.is_equality() {
                EQUALITY
            } else {
                RELATIONAL
            }
        }
        ExprKind::In { .. }
        | ExprKind::InRange { .. }
        | ExprKind::InSubquery { .. }
        | ExprKind::Between { .. }
        | ExprKind::Like { .. }
        | ExprKind::Regexp { .. } => RELATIONAL,
        ExprKind::Concat(_) => CONCAT,
        _ => ATOM,
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parent: u8) -> fmt::Result {
    if level(&expr.node) <= parent {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

/// Left operand of a left-associative operator: an equal level needs no parentheses.
fn write_left(f: &mut fmt::Formatter<'_>, expr: &Expr, parent: u8) -> fmt::Result {
    if level(&expr.node) < parent {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

fn write_not(f: &mut fmt::Formatter<'_>, negated: bool) -> fmt::Result {
    if negated {
        f.write_str(" not")?;
    }
    Ok(())
}

pub(crate) fn write_double(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    let text = v.to_string();
    if text.contains(['.', 'e', 'E']) || !v.is_finite() {
        f.write_str(&text)
    } else {
        write!(f, "{text}.0")
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Long(n) => write!(f, "{n}L"),
            Literal::Double(v) => write_double(f, *v),
            Literal::Float(v) => {
                write_double(f, *v)?;
                f.write_str("f")
            }
            Literal::String(s) => write_string(f, s),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Null => f.write_str("null"),
        }
    }
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprKind::Literal(lit) => write!(f, "{lit}"),
            ExprKind::Substitution { name, type_name } => {
                f.write_str("?")?;
                if let Some(name) = name {
                    f.write_str(":")?;
                    write_ident(f, name)?;
                    if let Some(ty) = type_name {
                        write!(f, ":{ty}")?;
                    }
                }
                Ok(())
            }
            ExprKind::Chain(chain) => write!(f, "{chain}"),
            ExprKind::Chained { root, elements } => {
                match root.node {
                    ExprKind::Builtin(_)
                    | ExprKind::Array(_)
                    | ExprKind::Subquery(_)
                    | ExprKind::NewInstance { .. }
                    | ExprKind::Substitution { .. } => write!(f, "{root}")?,
                    _ => write!(f, "({root})")?,
                }
                write_elements(f, elements, false)
            }
            ExprKind::Unary { op, expr } => match op {
                UnaryOp::Neg => {
                    f.write_str("-")?;
                    write_operand(f, expr, NEGATE)
                }
                UnaryOp::Not => {
                    f.write_str("not ")?;
                    write_operand(f, expr, NOT)
                }
            },
            ExprKind::Binary { op, left, right } => {
                let lvl = level(self);
                write_left(f, left, lvl)?;
                write!(f, " {} ", op.as_str())?;
                write_operand(f, right, lvl)
            }
            ExprKind::Compare { op, left, right } => {
                let lvl = level(self);
                write_left(f, left, lvl)?;
                write!(f, " {} ", op.as_str())?;
                write_operand(f, right, lvl)
            }
            ExprKind::Quantified {
                op,
                quantifier,
                left,
                source,
            } => {
                write_left(f, left, level(self))?;
                let q = match quantifier {
                    Quantifier::Any => "any",
                    Quantifier::Some => "some",
                    Quantifier::All => "all",
                };
                write!(f, " {} {q} ", op.as_str())?;
                match source {
                    QuantifiedSource::List(items) => {
                        f.write_str("(")?;
                        comma_list(f, items)?;
                        f.write_str(")")
                    }
                    QuantifiedSource::Subquery(sub) => write!(f, "{sub}"),
                }
            }
            ExprKind::Concat(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" || ")?;
                    }
                    write_operand(f, item, CONCAT)?;
                }
                Ok(())
            }
            ExprKind::In {
                expr,
                negated,
                open,
                close,
                items,
            } => {
                write_operand(f, expr, RELATIONAL)?;
                write_not(f, *negated)?;
                f.write_str(match open {
                    Delimiter::Paren => " in (",
                    Delimiter::Bracket => " in [",
                })?;
                comma_list(f, items)?;
                f.write_str(match close {
                    Delimiter::Paren => ")",
                    Delimiter::Bracket => "]",
                })
            }
            ExprKind::InRange {
                expr,
                negated,
                low,
                high,
                low_closed,
                high_closed,
            } => {
                write_operand(f, expr, RELATIONAL)?;
                write_not(f, *negated)?;
                f.write_str(if *low_closed { " in [" } else { " in (" })?;
                write!(f, "{low}:{high}")?;
                f.write_str(if *high_closed { "]" } else { ")" })
            }
            ExprKind::InSubquery {
                expr,
                negated,
                subquery,
            } => {
                write_operand(f, expr, RELATIONAL)?;
                write_not(f, *negated)?;
                write!(f, " in {subquery}")
            }
            ExprKind::Between {
                expr,
                negated,
                low,
                high,
            } => {
                write_operand(f, expr, RELATIONAL)?;
                write_not(f, *negated)?;
                f.write_str(" between ")?;
                write_operand(f, low, RELATIONAL)?;
                f.write_str(" and ")?;
                write_operand(f, high, RELATIONAL)
            }
            ExprKind::Like {
                expr,
                negated,
                pattern,
                escape,
            } => {
                write_operand(f, expr, RELATIONAL)?;
                write_not(f, *negated)?;
                f.write_str(" like ")?;
                write_operand(f, pattern, RELATIONAL)?;
                if let Some(escape) = escape {
                    f.write_str(" escape ")?;
                    write_string(f, escape)?;
                }
                Ok(())
            }
            ExprKind::Regexp {
                expr,
                negated,
                pattern,
            } => {
                write_operand(f, expr, RELATIONAL)?;
                write_not(f, *negated)?;
                f.write_str(" regexp ")?;
                write_operand(f, pattern, RELATIONAL)
            }
            ExprKind::Case {
                operand,
                whens,
                otherwise,
            } => {
                f.write_str("case")?;
                if let Some(operand) = operand {
                    write!(f, " {operand}")?;
                }
                for wt in whens {
                    write!(f, " when {} then {}", wt.when, wt.then)?;
                }
                if let Some(e) = otherwise {
                    write!(f, " else {e}")?;
                }
                f.write_str(" end")
            }
            ExprKind::Builtin(call) => write!(f, "{call}"),
            ExprKind::Subquery(sub) => write!(f, "{sub}"),
            ExprKind::Exists(sub) => write!(f, "exists {sub}"),
            ExprKind::Array(items) => {
                f.write_str("{")?;
                comma_list(f, items)?;
                f.write_str("}")
            }
            ExprKind::JsonObject(members) => write_json_members(f, members),
            ExprKind::NewObject(fields) => {
                f.write_str("new {")?;
                comma_list_fn(f, fields, |field, f| {
                    write!(f, "{}", field.target)?;
                    if let Some(value) = &field.value {
                        write!(f, " = {value}")?;
                    }
                    Ok(())
                })?;
                f.write_str("}")
            }
            ExprKind::NewInstance { class, args } => {
                write!(f, "new {class}(")?;
                comma_list(f, args)?;
                f.write_str(")")
            }
            ExprKind::NewArray { element, sizes } => {
                write!(f, "new {element}")?;
                for size in sizes {
                    write!(f, "[{size}]")?;
                }
                Ok(())
            }
            ExprKind::NewArrayInit {
                element,
                dimensions,
                values,
            } => {
                write!(f, "new {element}")?;
                for _ in 0..*dimensions {
                    f.write_str("[]")?;
                }
                f.write_str(" {")?;
                comma_list(f, values)?;
                f.write_str("}")
            }
        }
    }
}

pub(crate) fn write_elements(
    f: &mut fmt::Formatter<'_>,
    elements: &[ChainElement],
    first_is_root: bool,
) -> fmt::Result {
    for (i, element) in elements.iter().enumerate() {
        let is_root = first_is_root && i == 0;
        match &element.link {
            ChainLink::Property(name) => {
                if !is_root {
                    f.write_str(".")?;
                }
                write_name(f, name, false)?;
            }
            ChainLink::Call { name, args } => {
                if !is_root {
                    f.write_str(".")?;
                }
                write_name(f, name, is_root)?;
                write!(f, "({args})")?;
            }
            ChainLink::Index(indexes) => {
                f.write_str("[")?;
                comma_list(f, indexes)?;
                f.write_str("]")?;
            }
        }
        if element.dynamic {
            f.write_str("?")?;
        }
    }
    Ok(())
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_elements(f, &self.elements, true)
    }
}

impl fmt::Display for CallArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_modifier(f, self.modifier)?;
        comma_list(f, &self.args)
    }
}

fn write_modifier(f: &mut fmt::Formatter<'_>, modifier: Option<AggregateModifier>) -> fmt::Result {
    match modifier {
        Some(AggregateModifier::All) => f.write_str("all "),
        Some(AggregateModifier::Distinct) => f.write_str("distinct "),
        None => Ok(()),
    }
}

impl fmt::Display for FunctionArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionArg::Value(arg) => write!(f, "{arg}"),
            FunctionArg::Named { name, value } => {
                write_ident(f, name)?;
                write!(f, ": {value}")
            }
            FunctionArg::Lambda { params, body } => {
                if params.len() == 1 {
                    write_name(f, &params[0], false)?;
                } else {
                    f.write_str("(")?;
                    comma_list_fn(f, params, |p, f| write_name(f, p, false))?;
                    f.write_str(")")?;
                }
                write!(f, " => {body}")
            }
        }
    }
}

impl fmt::Display for NamedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamedValue::Expr(e) => write!(f, "{e}"),
            NamedValue::List(items) => {
                f.write_str("(")?;
                comma_list(f, items)?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for TimeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeArg::Expr(e) => write!(f, "{e}"),
            TimeArg::Ordered { expr, descending } => {
                write!(f, "{expr} {}", if *descending { "desc" } else { "asc" })
            }
            TimeArg::TimePeriod(tp) => write!(f, "{tp}"),
            TimeArg::Wildcard => f.write_str("*"),
            TimeArg::StreamWildcard(stream) => {
                write_ident(f, stream)?;
                f.write_str(".*")
            }
            TimeArg::Frequency(e) => write!(f, "*/{e}"),
            TimeArg::Range(a, b) => write!(f, "{a}:{b}"),
            TimeArg::Last(e) => write!(f, "{e} last"),
            TimeArg::Weekday(e) => write!(f, "{e} weekday"),
            TimeArg::LastWeekday => f.write_str("lastweekday"),
            TimeArg::NumericList(items) => {
                f.write_str("[")?;
                comma_list(f, items)?;
                f.write_str("]")
            }
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{} {}", part.value, part.unit.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Display for BuiltinCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuiltinCall::Aggregate {
                func,
                modifier,
                args,
            } => {
                write!(f, "{}(", func.as_str())?;
                write_modifier(f, *modifier)?;
                comma_list(f, args)?;
                f.write_str(")")
            }
            BuiltinCall::Access { func, arg, index } => {
                write!(f, "{}(", func.as_str())?;
                match arg {
                    AccessArg::Wildcard => f.write_str("*")?,
                    AccessArg::StreamWildcard(stream) => {
                        write_ident(f, stream)?;
                        f.write_str(".*")?;
                    }
                    AccessArg::Expr(e) => write!(f, "{e}")?,
                }
                if let Some(index) = index {
                    write!(f, ", {index}")?;
                }
                f.write_str(")")
            }
            BuiltinCall::Coalesce(args) => {
                f.write_str("coalesce(")?;
                comma_list(f, args)?;
                f.write_str(")")
            }
            BuiltinCall::Prev { tail, args } => {
                f.write_str(if *tail { "prevtail(" } else { "prev(" })?;
                comma_list(f, args)?;
                f.write_str(")")
            }
            BuiltinCall::PrevCount(e) => write!(f, "prevcount({e})"),
            BuiltinCall::PrevWindow(e) => write!(f, "prevwindow({e})"),
            BuiltinCall::Prior { index, property } => write!(f, "prior({index}, {property})"),
            BuiltinCall::Grouping(e) => write!(f, "grouping({e})"),
            BuiltinCall::GroupingId(args) => {
                f.write_str("grouping_id(")?;
                comma_list(f, args)?;
                f.write_str(")")
            }
            BuiltinCall::InstanceOf { expr, types } => {
                write!(f, "instanceof({expr}, ")?;
                comma_list(f, types)?;
                f.write_str(")")
            }
            BuiltinCall::TypeOf(e) => write!(f, "typeof({e})"),
            BuiltinCall::Cast {
                expr,
                target,
                option,
            } => {
                write!(f, "cast({expr}, {target}")?;
                if let Some((name, value)) = option {
                    f.write_str(", ")?;
                    write_ident(f, name)?;
                    write!(f, ": {value}")?;
                }
                f.write_str(")")
            }
            BuiltinCall::ExistsProperty(chain) => write!(f, "exists({chain})"),
            BuiltinCall::CurrentTimestamp => f.write_str("current_timestamp()"),
            BuiltinCall::IStream => f.write_str("istream()"),
        }
    }
}

impl fmt::Display for Subquery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(select ")?;
        if self.distinct {
            f.write_str("distinct ")?;
        }
        comma_list(f, &self.select)?;
        write!(f, " from {}", self.from.filter)?;
        for view in &self.from.views {
            write!(f, "{view}")?;
        }
        write_alias(f, &self.from.alias)?;
        if let Some(retain) = self.from.retain {
            write!(f, " {}", retain.as_str())?;
        }
        if let Some(w) = &self.where_clause {
            write!(f, " where {w}")?;
        }
        if !self.group_by.is_empty() {
            f.write_str(" group by ")?;
            comma_list(f, &self.group_by)?;
        }
        if let Some(h) = &self.having {
            write!(f, " having {h}")?;
        }
        f.write_str(")")
    }
}

fn write_json_members(f: &mut fmt::Formatter<'_>, members: &[(String, JsonValue)]) -> fmt::Result {
    f.write_str("{")?;
    comma_list_fn(f, members, |(key, value), f| {
        write_json_string(f, key)?;
        write!(f, ": {value}")
    })?;
    f.write_str("}")
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonValue::Null => f.write_str("null"),
            JsonValue::Bool(b) => write!(f, "{b}"),
            JsonValue::Int(n) => write!(f, "{n}"),
            JsonValue::Double(v) => write_double(f, *v),
            JsonValue::String(s) => write_json_string(f, s),
            JsonValue::Array(items) => {
                f.write_str("[")?;
                comma_list(f, items)?;
                f.write_str("]")
            }
            JsonValue::Object(members) => write_json_members(f, members),
        }
    }
}

impl fmt::Display for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            write_ident(f, tag)?;
            f.write_str("=")?;
        }
        write_dotted(f, &self.event_type)?;
        if !self.params.is_empty() {
            f.write_str("(")?;
            comma_list(f, &self.params)?;
            f.write_str(")")?;
        }
        for selection in &self.selections {
            write!(f, "{selection}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ContainedSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if let Some(items) = &self.select {
            f.write_str("select ")?;
            comma_list(f, items)?;
            f.write_str(" from ")?;
        }
        write!(f, "{}", self.expr)?;
        if let Some(ty) = &self.type_annotation {
            f.write_str(" @type(")?;
            write_dotted(f, ty)?;
            f.write_str(")")?;
        }
        write_alias(f, &self.alias)?;
        if let Some(w) = &self.where_clause {
            write!(f, " where {w}")?;
        }
        f.write_str("]")
    }
}
