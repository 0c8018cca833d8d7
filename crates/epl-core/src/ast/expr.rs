//! Value expressions

use serde::{Deserialize, Serialize};

use super::clause::{EventFilter, GroupByItem, RetainMode, SelectItem, View};
use crate::span::{Span, Spanned};
use crate::types::TypeName;

/// A value expression with its source span
pub type Expr = Spanned<ExprKind>;

/// Constant values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    /// `L`-suffixed integer
    Long(i64),
    Double(f64),
    /// `f`-suffixed floating point
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Literal(Literal),
    /// Substitution parameter: `?`, `?:name`, `?:name:type`
    Substitution {
        name: Option<String>,
        type_name: Option<TypeName>,
    },
    /// Property path or library function call rooted at a name: `a.b.c(x)[0]`
    Chain(Chain),
    /// Chain elements applied to a non-name root: `(a + b).abs()`, `prev(1, s).price`
    Chained {
        root: Box<Expr>,
        elements: Vec<ChainElement>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `a > any (1, 2)`, `a = all (select x from B)`
    Quantified {
        op: CompareOp,
        quantifier: Quantifier,
        left: Box<Expr>,
        source: QuantifiedSource,
    },
    /// `a || b || c`
    Concat(Vec<Expr>),
    /// `a [not] in (1, 2, 3)`; the delimiters are kept as written, mismatched pairs included
    In {
        expr: Box<Expr>,
        negated: bool,
        open: Delimiter,
        close: Delimiter,
        items: Vec<Expr>,
    },
    /// `a [not] in [1:10)`
    InRange {
        expr: Box<Expr>,
        negated: bool,
        low: Box<Expr>,
        high: Box<Expr>,
        low_closed: bool,
        high_closed: bool,
    },
    InSubquery {
        expr: Box<Expr>,
        negated: bool,
        subquery: Box<Subquery>,
    },
    Between {
        expr: Box<Expr>,
        negated: bool,
        low: Box<Expr>,
        high: Box<Expr>,
    },
    Like {
        expr: Box<Expr>,
        negated: bool,
        pattern: Box<Expr>,
        escape: Option<String>,
    },
    Regexp {
        expr: Box<Expr>,
        negated: bool,
        pattern: Box<Expr>,
    },
    Case {
        operand: Option<Box<Expr>>,
        whens: Vec<WhenThen>,
        otherwise: Option<Box<Expr>>,
    },
    Builtin(BuiltinCall),
    /// Row subquery `(select ...)`
    Subquery(Box<Subquery>),
    /// `exists (select ...)`
    Exists(Box<Subquery>),
    /// `{1, 2, 3}`
    Array(Vec<Expr>),
    /// `{"a": 1, "b": [2, 3]}`
    JsonObject(Vec<(String, JsonValue)>),
    /// `new { a, b = c }`
    NewObject(Vec<NewField>),
    /// `new com.acme.Point(1, 2)`
    NewInstance { class: TypeName, args: Vec<Expr> },
    /// `new int[5]`, `new int[2][3]`
    NewArray { element: TypeName, sizes: Vec<Expr> },
    /// `new int[] {1, 2}`
    NewArrayInit {
        element: TypeName,
        dimensions: usize,
        values: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Or,
    And,
    BitAnd,
    BitOr,
    BitXor,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Or => "or",
            BinaryOp::And => "and",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

/// Equality and relational operators. `==` reads as `=`, `<>` as `!=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    NotEq,
    Is,
    IsNot,
    Lt,
    Gt,
    Le,
    Ge,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Is => "is",
            CompareOp::IsNot => "is not",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
        }
    }

    pub fn is_equality(&self) -> bool {
        matches!(
            self,
            CompareOp::Eq | CompareOp::NotEq | CompareOp::Is | CompareOp::IsNot
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quantifier {
    Any,
    Some,
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuantifiedSource {
    List(Vec<Expr>),
    Subquery(Box<Subquery>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delimiter {
    Paren,
    Bracket,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhenThen {
    pub when: Expr,
    pub then: Expr,
}

/// A property/method path. The first element is the root name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    pub elements: Vec<ChainElement>,
}

impl Chain {
    pub fn property(name: impl Into<String>, span: Span) -> Self {
        Chain {
            elements: vec![ChainElement {
                link: ChainLink::Property(name.into()),
                dynamic: false,
                span,
            }],
        }
    }

    /// The root name, when the chain starts with a property or call.
    pub fn root_name(&self) -> Option<&str> {
        match self.elements.first().map(|e| &e.link) {
            Some(ChainLink::Property(name)) | Some(ChainLink::Call { name, .. }) => Some(name),
            _ => None,
        }
    }

    /// The dotted path when every element is a plain property: `a.b.c`.
    pub fn as_property_path(&self) -> Option<String> {
        let mut parts = Vec::with_capacity(self.elements.len());
        for element in &self.elements {
            match &element.link {
                ChainLink::Property(name) if !element.dynamic => parts.push(name.as_str()),
                _ => return None,
            }
        }
        Some(parts.join("."))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainElement {
    pub link: ChainLink,
    /// Trailing `?` marking a dynamic property
    pub dynamic: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChainLink {
    Property(String),
    Call { name: String, args: CallArgs },
    /// `[i]` or `[i, j]`
    Index(Vec<Expr>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallArgs {
    pub modifier: Option<AggregateModifier>,
    pub args: Vec<FunctionArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateModifier {
    All,
    Distinct,
}

/// One argument of a function, method, view or observer call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FunctionArg {
    Value(TimeArg),
    /// `name: expr` or `name: (e1, e2)`
    Named { name: String, value: NamedValue },
    /// `x => x.price` or `(a, b) => a + b`
    Lambda { params: Vec<String>, body: Box<Expr> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NamedValue {
    Expr(Expr),
    List(Vec<Expr>),
}

/// An expression position that also takes time periods and schedule operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimeArg {
    Expr(Expr),
    /// `expr asc` / `expr desc`
    Ordered { expr: Expr, descending: bool },
    TimePeriod(TimePeriod),
    /// `*`
    Wildcard,
    /// `s.*`
    StreamWildcard(String),
    /// `*/5`
    Frequency(Expr),
    /// `1:5`
    Range(Expr, Expr),
    /// `5 last`
    Last(Expr),
    /// `15 weekday`
    Weekday(Expr),
    /// `lastweekday`
    LastWeekday,
    /// `[1, 3, 5:7]`
    NumericList(Vec<TimeArg>),
}

/// `1 hour 30 minutes`; parts are strictly descending by unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub parts: Vec<TimePeriodPart>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePeriodPart {
    /// A number, a variable name or a substitution parameter
    pub value: Expr,
    pub unit: TimeUnit,
}

/// Ordered from largest to smallest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Year => "years",
            TimeUnit::Month => "months",
            TimeUnit::Week => "weeks",
            TimeUnit::Day => "days",
            TimeUnit::Hour => "hours",
            TimeUnit::Minute => "minutes",
            TimeUnit::Second => "seconds",
            TimeUnit::Millisecond => "milliseconds",
            TimeUnit::Microsecond => "microseconds",
        }
    }

    /// Length in microseconds; months and years use 30 and 365 days.
    pub fn micros(&self) -> u64 {
        const SEC: u64 = 1_000_000;
        match self {
            TimeUnit::Year => 365 * 86_400 * SEC,
            TimeUnit::Month => 30 * 86_400 * SEC,
            TimeUnit::Week => 7 * 86_400 * SEC,
            TimeUnit::Day => 86_400 * SEC,
            TimeUnit::Hour => 3_600 * SEC,
            TimeUnit::Minute => 60 * SEC,
            TimeUnit::Second => SEC,
            TimeUnit::Millisecond => 1_000,
            TimeUnit::Microsecond => 1,
        }
    }
}

impl TimePeriod {
    /// Total length in microseconds when every part is a numeric constant.
    pub fn constant_micros(&self) -> Option<f64> {
        let mut total = 0.0;
        for part in &self.parts {
            let n = match &part.value.node {
                ExprKind::Literal(Literal::Int(n)) | ExprKind::Literal(Literal::Long(n)) => {
                    *n as f64
                }
                ExprKind::Literal(Literal::Double(d)) | ExprKind::Literal(Literal::Float(d)) => *d,
                _ => return None,
            };
            total += n * part.unit.micros() as f64;
        }
        Some(total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BuiltinCall {
    /// count/sum/avg/median/stddev/avedev
    Aggregate {
        func: AggregateFunc,
        modifier: Option<AggregateModifier>,
        args: Vec<FunctionArg>,
    },
    /// first/last/window access aggregations
    Access {
        func: AccessFunc,
        arg: AccessArg,
        index: Option<Box<Expr>>,
    },
    Coalesce(Vec<Expr>),
    /// `prev(expr)`, `prev(index, expr)` and the `prevtail` forms
    Prev {
        tail: bool,
        args: Vec<Expr>,
    },
    PrevCount(Box<Expr>),
    PrevWindow(Box<Expr>),
    Prior {
        index: Box<Expr>,
        property: Chain,
    },
    Grouping(Box<Expr>),
    GroupingId(Vec<Expr>),
    InstanceOf {
        expr: Box<Expr>,
        types: Vec<TypeName>,
    },
    TypeOf(Box<Expr>),
    Cast {
        expr: Box<Expr>,
        target: TypeName,
        option: Option<(String, Box<NamedValue>)>,
    },
    /// `exists(a.b?)`
    ExistsProperty(Chain),
    CurrentTimestamp,
    /// `istream()`
    IStream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Median,
    Stddev,
    Avedev,
}

impl AggregateFunc {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFunc::Count => "count",
            AggregateFunc::Sum => "sum",
            AggregateFunc::Avg => "avg",
            AggregateFunc::Median => "median",
            AggregateFunc::Stddev => "stddev",
            AggregateFunc::Avedev => "avedev",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessFunc {
    First,
    Last,
    Window,
}

impl AccessFunc {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessFunc::First => "first",
            AccessFunc::Last => "last",
            AccessFunc::Window => "window",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AccessArg {
    Wildcard,
    StreamWildcard(String),
    Expr(Box<Expr>),
}

/// `(select ...)` as an expression operand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subquery {
    pub distinct: bool,
    pub select: Vec<SelectItem>,
    pub from: SubqueryStream,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<GroupByItem>,
    pub having: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubqueryStream {
    pub filter: EventFilter,
    pub views: Vec<View>,
    pub alias: Option<String>,
    pub retain: Option<RetainMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewField {
    pub target: Chain,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(Vec<(String, JsonValue)>),
}

impl JsonValue {
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(members) => members.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl ExprKind {
    /// Chain elements when this expression is a property path or chained call.
    pub fn chain_elements(&self) -> Option<&[ChainElement]> {
        match self {
            ExprKind::Chain(chain) => Some(&chain.elements),
            ExprKind::Chained { elements, .. } => Some(elements),
            _ => None,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            ExprKind::Builtin(BuiltinCall::Aggregate { .. })
                | ExprKind::Builtin(BuiltinCall::Access { .. })
        )
    }
}
