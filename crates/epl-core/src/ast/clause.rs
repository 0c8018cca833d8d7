//! Clauses shared between statement forms: select lists, streams, grouping, output rate

use serde::{Deserialize, Serialize};

use super::expr::{Chain, Expr, Literal, TimeArg, TimePeriod};
use super::pattern::Pattern;
use crate::span::{Span, Spanned};
use crate::types::TypeName;

/// `[tag=]Type(params)[contained selection]...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFilter {
    pub tag: Option<String>,
    /// Dotted event type name
    pub event_type: String,
    pub params: Vec<Expr>,
    pub selections: Vec<ContainedSelection>,
    pub span: Span,
}

/// `[select a, b from items @type(Item) as i where i.qty > 0]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainedSelection {
    pub select: Option<Vec<SelectItem>>,
    pub expr: Expr,
    pub type_annotation: Option<String>,
    pub alias: Option<String>,
    pub where_clause: Option<Expr>,
}

pub type SelectItem = Spanned<SelectItemKind>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectItemKind {
    /// `*`
    Wildcard,
    /// `s.* [as name]`
    StreamWildcard {
        stream: String,
        alias: Option<String>,
    },
    /// `expr [@eventbean] [[as] alias]`
    Expr {
        expr: Expr,
        annotation: Option<String>,
        alias: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamSelector {
    IStream,
    RStream,
    IRStream,
}

impl StreamSelector {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamSelector::IStream => "istream",
            StreamSelector::RStream => "rstream",
            StreamSelector::IRStream => "irstream",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectClause {
    pub stream_selector: Option<StreamSelector>,
    pub distinct: bool,
    pub items: Vec<SelectItem>,
    pub span: Span,
}

impl SelectClause {
    pub fn is_wildcard(&self) -> bool {
        self.items.len() == 1 && matches!(self.items[0].node, SelectItemKind::Wildcard)
    }
}

/// `[istream|rstream|irstream] into Target[(a, b)] [event-precedence(expr)]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertInto {
    pub stream_selector: Option<StreamSelector>,
    pub target: String,
    pub columns: Vec<String>,
    pub event_precedence: Option<Expr>,
}

/// Comma joins (`streams`) or outer joins (`joins`) after a single first stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromClause {
    pub streams: Vec<StreamExpr>,
    pub joins: Vec<OuterJoin>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamExpr {
    pub source: StreamSource,
    pub views: Vec<View>,
    pub alias: Option<String>,
    pub unidirectional: bool,
    pub retain: Option<RetainMode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StreamSource {
    Filter(EventFilter),
    Pattern(PatternInclusion),
    /// `sql:db ['select ...' [metadatasql 'select ...']]`
    Sql {
        database: String,
        query: String,
        metadata_query: Option<String>,
    },
    /// `ns:com.acme.Lookup.find(a, b) [@type(T)]`
    Method {
        namespace: String,
        method: String,
        args: Vec<Expr>,
        type_annotation: Option<String>,
    },
}

/// `pattern [@anno] [ ... ]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternInclusion {
    pub annotations: Vec<Annotation>,
    pub pattern: Pattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetainMode {
    Union,
    Intersection,
}

impl RetainMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetainMode::Union => "retain-union",
            RetainMode::Intersection => "retain-intersection",
        }
    }
}

/// Data window or view: `#time(10 sec)`, `#ext:sort(3, price desc)`, `.win:length(5)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub namespace: Option<String>,
    pub name: String,
    pub args: Vec<TimeArg>,
    pub style: ViewStyle,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewStyle {
    /// `.ns:name(...)`, namespace required
    Dot,
    /// `#[ns:]name(...)`
    Hash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OuterJoin {
    pub kind: JoinKind,
    pub stream: StreamExpr,
    pub on: Vec<JoinCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinCondition {
    pub left: Chain,
    pub right: Chain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroupByItem {
    Expr(Expr),
    Rollup(Vec<GroupingElement>),
    Cube(Vec<GroupingElement>),
    GroupingSets(Vec<GroupingSet>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroupingElement {
    Expr(Expr),
    /// `(a, b)` or `()`
    Combined(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroupingSet {
    Rollup(Vec<GroupingElement>),
    Cube(Vec<GroupingElement>),
    Element(GroupingElement),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByItem {
    pub expr: Expr,
    pub order: Option<SortOrder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// `limit rows [offset n]`; the `limit offset, rows` spelling is normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowLimit {
    pub rows: Expr,
    pub offset: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputLimit {
    pub after: Option<OutputAfter>,
    pub selector: Option<OutputSelector>,
    pub rate: Option<OutputRate>,
    /// `and when terminated ...`
    pub and_terminated: Option<TerminatedCondition>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputAfter {
    Period(TimePeriod),
    Events(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputSelector {
    All,
    First,
    Last,
    Snapshot,
}

impl OutputSelector {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputSelector::All => "all",
            OutputSelector::First => "first",
            OutputSelector::Last => "last",
            OutputSelector::Snapshot => "snapshot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputRate {
    EveryPeriod(TimePeriod),
    EveryEvents(Expr),
    /// Crontab schedule `at (*/5, *, *, *, *)`
    At(Vec<TimeArg>),
    When {
        condition: Expr,
        then: Vec<Assignment>,
    },
    WhenTerminated(TerminatedCondition),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminatedCondition {
    pub condition: Option<Expr>,
    pub then: Vec<Assignment>,
}

/// `target = value`, or a bare expression evaluated for its side effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub target: Option<Chain>,
    pub value: Expr,
}

/// `@Name`, `@Name(value)`, `@Name(key = value, ...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    pub args: AnnotationArgs,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationArgs {
    None,
    Value(AnnotationValue),
    Pairs(Vec<(String, AnnotationValue)>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationValue {
    Annotation(Box<Annotation>),
    Array(Vec<AnnotationValue>),
    Literal(Literal),
    /// Identifier or dotted class name
    Name(String),
}

impl Annotation {
    /// The single value or the value paired with `key`.
    pub fn value(&self, key: Option<&str>) -> Option<&AnnotationValue> {
        match (&self.args, key) {
            (AnnotationArgs::Value(v), None) => Some(v),
            (AnnotationArgs::Pairs(pairs), Some(key)) => pairs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }
}

/// `name type` in a column list; `type` is absent for `null` columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDecl {
    pub name: String,
    pub ty: Option<TypeName>,
}
