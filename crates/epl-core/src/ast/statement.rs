//! Statement root and the statement forms

use serde::{Deserialize, Serialize};

use super::clause::{
    Annotation, Assignment, ColumnDecl, EventFilter, FromClause, GroupByItem, InsertInto,
    OrderByItem, OutputLimit, PatternInclusion, RetainMode, RowLimit, SelectClause, SelectItem,
    View,
};
use super::context::ContextDetail;
use super::expr::{Chain, Expr, JsonValue, Literal};
use super::match_recognize::MatchRecognize;
use crate::span::{Span, Spanned};
use crate::types::TypeName;

/// One parsed EPL statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Leading annotations and declarations, in source order
    pub prelude: Vec<Spanned<PreludeItem>>,
    /// `context Name` association
    pub context: Option<String>,
    pub body: Spanned<StatementKind>,
    pub for_clause: Option<ForClause>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PreludeItem {
    Annotation(Annotation),
    Expression(ExpressionDecl),
    Class(ClassDecl),
}

impl Statement {
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.prelude.iter().filter_map(|item| match &item.node {
            PreludeItem::Annotation(a) => Some(a),
            _ => None,
        })
    }

    /// Value of `@Name('...')`, the conventional statement name.
    pub fn name(&self) -> Option<&str> {
        use super::clause::AnnotationValue;
        self.annotations()
            .find(|a| a.name.eq_ignore_ascii_case("name"))
            .and_then(|a| match a.value(None) {
                Some(AnnotationValue::Literal(Literal::String(s))) => Some(s.as_str()),
                _ => None,
            })
    }

    pub fn as_select(&self) -> Option<&SelectStatement> {
        match &self.body.node {
            StatementKind::Select(select) => Some(select),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    Select(Box<SelectStatement>),
    CreateWindow(CreateWindow),
    CreateIndex(CreateIndex),
    CreateVariable(CreateVariable),
    CreateTable(CreateTable),
    CreateSchema(CreateSchema),
    CreateContext(CreateContext),
    CreateExpression(ExpressionDecl),
    CreateClass(ClassDecl),
    OnAction(OnStatement),
    UpdateIStream(UpdateDetails),
    CreateDataflow(CreateDataflow),
    FireAndForget(FireAndForget),
}

impl StatementKind {
    /// Short name of the statement form, used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            StatementKind::Select(_) => "select",
            StatementKind::CreateWindow(_) => "create window",
            StatementKind::CreateIndex(_) => "create index",
            StatementKind::CreateVariable(_) => "create variable",
            StatementKind::CreateTable(_) => "create table",
            StatementKind::CreateSchema(_) => "create schema",
            StatementKind::CreateContext(_) => "create context",
            StatementKind::CreateExpression(_) => "create expression",
            StatementKind::CreateClass(_) => "create inlined_class",
            StatementKind::OnAction(on) => match on.action {
                OnAction::Select(_) => "on-select",
                OnAction::Insert { .. } => "on-insert",
                OnAction::Update { .. } => "on-update",
                OnAction::Delete { .. } => "on-delete",
                OnAction::Set(_) => "on-set",
                OnAction::Merge(_) => "on-merge",
            },
            StatementKind::UpdateIStream(_) => "update istream",
            StatementKind::CreateDataflow(_) => "create dataflow",
            StatementKind::FireAndForget(FireAndForget::Delete { .. }) => "delete",
            StatementKind::FireAndForget(FireAndForget::Update(_)) => "update",
            StatementKind::FireAndForget(FireAndForget::Insert { .. }) => "insert",
        }
    }
}

/// Trailing `for name[(args)]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForClause {
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    /// `into table Name`
    pub into_table: Option<String>,
    pub insert_into: Option<InsertInto>,
    pub select: SelectClause,
    pub from: Option<FromClause>,
    pub match_recognize: Option<MatchRecognize>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<GroupByItem>,
    pub having: Option<Expr>,
    pub output: Option<OutputLimit>,
    pub order_by: Vec<OrderByItem>,
    pub limit: Option<RowLimit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWindow {
    pub name: String,
    pub views: Vec<View>,
    pub retain: Option<RetainMode>,
    pub model: WindowModel,
    pub insert: Option<WindowInsert>,
}

/// `insert [where expr]`: populate the new window from the one it is modeled after
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowInsert {
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WindowModel {
    /// `[select items from] Type`
    ModelAfter {
        select: Option<Vec<CreateSelectItem>>,
        event_type: String,
    },
    Columns(Vec<ColumnDecl>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CreateSelectItem {
    Wildcard,
    Property { chain: Chain, alias: Option<String> },
    Constant { value: Literal, alias: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIndex {
    pub unique: bool,
    pub name: String,
    pub window: String,
    pub columns: Vec<IndexColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexColumn {
    /// One expression, or several for a parenthesized composite column
    pub exprs: Vec<Expr>,
    pub index_type: Option<String>,
    pub type_params: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateVariable {
    pub constant: bool,
    pub ty: TypeName,
    pub name: String,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<TableColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub name: String,
    pub kind: TableColumnKind,
    pub primary_key: bool,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableColumnKind {
    Plain(TypeName),
    /// Aggregation state, e.g. `sum(double)` or `sorted(price)`
    Aggregation(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSchema {
    /// `map`, `objectarray`, `json`, `avro`, `xml`, ...
    pub representation: Option<String>,
    pub name: String,
    pub body: SchemaBody,
    pub qualifiers: Vec<SchemaQualifier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SchemaBody {
    Columns(Vec<ColumnDecl>),
    /// `as A, B, *`; a single type names the class or type to model after
    Variant(Vec<VariantType>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VariantType {
    Any,
    Named(String),
}

/// `inherits A, B`, `starttimestamp ts`, `copyfrom X`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaQualifier {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateContext {
    pub name: String,
    pub detail: ContextDetail,
}

/// `expression [type] [dialect:] name [(params)] { body }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionDecl {
    pub return_type: Option<TypeName>,
    pub type_annotation: Option<String>,
    pub dialect: Option<String>,
    pub name: String,
    pub params: Option<Vec<String>>,
    /// `name alias for { ... }`
    pub is_alias: bool,
    pub body: ExpressionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionBody {
    Expr {
        lambda_params: Option<Vec<String>>,
        expr: Expr,
    },
    /// Script text between `[` and `]`, verbatim
    Script(String),
}

/// `inlined_class """ ... """`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnStatement {
    pub trigger: OnTrigger,
    pub action: OnAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnTrigger {
    pub source: OnSource,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OnSource {
    Filter(EventFilter),
    Pattern(PatternInclusion),
}

/// A named window or table with an optional alias
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRef {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OnAction {
    Delete {
        window: WindowRef,
        where_clause: Option<Expr>,
    },
    Select(Box<OnSelect>),
    /// Split stream: `insert into A select ... insert into B select ... [output first|all]`
    Insert {
        first: Box<OnSelect>,
        splits: Vec<SplitInsert>,
        output_all: Option<bool>,
    },
    Update {
        window: WindowRef,
        assignments: Vec<Assignment>,
        where_clause: Option<Expr>,
    },
    Set(Vec<Assignment>),
    Merge(OnMerge),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnSelect {
    pub insert_into: Option<InsertInto>,
    pub and_delete: bool,
    pub distinct: bool,
    pub items: Vec<SelectItem>,
    pub from: Option<WindowRef>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<GroupByItem>,
    pub having: Option<Expr>,
    pub order_by: Vec<OrderByItem>,
    pub limit: Option<RowLimit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitInsert {
    pub insert_into: InsertInto,
    pub items: Vec<SelectItem>,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnMerge {
    pub window: WindowRef,
    pub where_clause: Option<Expr>,
    pub clauses: Vec<MergeClause>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MergeClause {
    Matched {
        condition: Option<Expr>,
        actions: Vec<MergeAction>,
    },
    NotMatched {
        condition: Option<Expr>,
        actions: Vec<MergeInsert>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MergeAction {
    Update {
        assignments: Vec<Assignment>,
        where_clause: Option<Expr>,
    },
    Delete {
        where_clause: Option<Expr>,
    },
    Insert(MergeInsert),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeInsert {
    pub target: Option<String>,
    pub columns: Vec<String>,
    pub items: Vec<SelectItem>,
    pub where_clause: Option<Expr>,
}

/// Body shared by `update istream` and fire-and-forget `update`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDetails {
    pub target: String,
    pub alias: Option<String>,
    pub assignments: Vec<Assignment>,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDataflow {
    pub name: String,
    pub operators: Vec<DataflowOperator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataflowOperator {
    Operator(GraphOperator),
    Schema(CreateSchema),
}

/// `[@anno] Name [(inputs)] [-> outputs] { config }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphOperator {
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub inputs: Vec<OperatorInput>,
    pub outputs: Vec<OperatorOutput>,
    pub config: Vec<OperatorConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorInput {
    /// One stream, or several combined in parentheses
    pub streams: Vec<String>,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorOutput {
    pub stream: String,
    pub types: Vec<OutputType>,
}

/// Type parameter of an operator output: `<Order>`, `<?>`, `<List<Order>>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputType {
    Wildcard,
    Named { name: String, params: Vec<OutputType> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OperatorConfig {
    /// `select: (select ...)`
    Select(Box<SelectStatement>),
    Value { name: String, value: ConfigValue },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigValue {
    Expr(Expr),
    Json(JsonValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FireAndForget {
    Delete {
        target: String,
        alias: Option<String>,
        where_clause: Option<Expr>,
    },
    Update(UpdateDetails),
    Insert {
        into: InsertInto,
        rows: Vec<Vec<Expr>>,
    },
}
