use std::fmt;

use super::{comma_list, comma_list_fn, write_alias, write_ident, write_ident_list, write_name, write_string};
use crate::ast::*;
use crate::types::write_dotted;

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.prelude {
            write!(f, "{item} ")?;
        }
        if let Some(context) = &self.context {
            f.write_str("context ")?;
            write_ident(f, context)?;
            f.write_str(" ")?;
        }
        write!(f, "{}", self.body)?;
        if let Some(clause) = &self.for_clause {
            f.write_str(" for ")?;
            write_ident(f, &clause.name)?;
            if !clause.args.is_empty() {
                f.write_str("(")?;
                comma_list(f, &clause.args)?;
                f.write_str(")")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for PreludeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreludeItem::Annotation(a) => write!(f, "{a}"),
            PreludeItem::Expression(decl) => write!(f, "{decl}"),
            PreludeItem::Class(class) => write!(f, "{class}"),
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::Select(select) => write!(f, "{select}"),
            StatementKind::CreateWindow(w) => write!(f, "{w}"),
            StatementKind::CreateIndex(i) => write!(f, "{i}"),
            StatementKind::CreateVariable(v) => write!(f, "{v}"),
            StatementKind::CreateTable(t) => write!(f, "{t}"),
            StatementKind::CreateSchema(s) => write!(f, "{s}"),
            StatementKind::CreateContext(c) => {
                f.write_str("create context ")?;
                write_ident(f, &c.name)?;
                write!(f, " as {}", c.detail)
            }
            StatementKind::CreateExpression(decl) => write!(f, "create {decl}"),
            StatementKind::CreateClass(class) => write!(f, "create {class}"),
            StatementKind::OnAction(on) => write!(f, "{on}"),
            StatementKind::UpdateIStream(details) => write!(f, "update istream {details}"),
            StatementKind::CreateDataflow(df) => write!(f, "{df}"),
            StatementKind::FireAndForget(faf) => write!(f, "{faf}"),
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("@")?;
        write_dotted(f, &self.name)?;
        match &self.args {
            AnnotationArgs::None => Ok(()),
            AnnotationArgs::Value(v) => write!(f, "({v})"),
            AnnotationArgs::Pairs(pairs) => {
                f.write_str("(")?;
                comma_list_fn(f, pairs, |(key, value), f| {
                    write_name(f, key, false)?;
                    write!(f, " = {value}")
                })?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Annotation(a) => write!(f, "{a}"),
            AnnotationValue::Array(items) => {
                f.write_str("{")?;
                comma_list(f, items)?;
                f.write_str("}")
            }
            AnnotationValue::Literal(lit) => write!(f, "{lit}"),
            AnnotationValue::Name(name) => write_dotted(f, name),
        }
    }
}

impl fmt::Display for ExpressionDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expression ")?;
        if let Some(ty) = &self.return_type {
            write!(f, "{ty} ")?;
        }
        if let Some(ty) = &self.type_annotation {
            f.write_str("@type(")?;
            write_dotted(f, ty)?;
            f.write_str(") ")?;
        }
        if let Some(dialect) = &self.dialect {
            write_ident(f, dialect)?;
            f.write_str(":")?;
        }
        write_ident(f, &self.name)?;
        if let Some(params) = &self.params {
            f.write_str("(")?;
            write_ident_list(f, params)?;
            f.write_str(")")?;
        }
        if self.is_alias {
            f.write_str(" alias for")?;
        }
        match &self.body {
            ExpressionBody::Expr {
                lambda_params,
                expr,
            } => {
                f.write_str(" { ")?;
                match lambda_params.as_deref() {
                    Some([single]) => {
                        write_ident(f, single)?;
                        f.write_str(" => ")?;
                    }
                    Some(params) => {
                        f.write_str("(")?;
                        write_ident_list(f, params)?;
                        f.write_str(") => ")?;
                    }
                    None => {}
                }
                write!(f, "{expr} }}")
            }
            ExpressionBody::Script(script) => write!(f, " [{script}]"),
        }
    }
}

impl fmt::Display for ClassDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inlined_class \"\"\"{}\"\"\"", self.code)
    }
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(table) = &self.into_table {
            f.write_str("into table ")?;
            write_ident(f, table)?;
            f.write_str(" ")?;
        }
        if let Some(insert) = &self.insert_into {
            write!(f, "{insert} ")?;
        }
        write!(f, "{}", self.select)?;
        if let Some(from) = &self.from {
            write!(f, " from {from}")?;
        }
        if let Some(mr) = &self.match_recognize {
            write!(f, " {mr}")?;
        }
        write_tail(
            f,
            &self.where_clause,
            &self.group_by,
            &self.having,
            self.output.as_ref(),
            &self.order_by,
            &self.limit,
        )
    }
}

fn write_tail(
    f: &mut fmt::Formatter<'_>,
    where_clause: &Option<Expr>,
    group_by: &[GroupByItem],
    having: &Option<Expr>,
    output: Option<&OutputLimit>,
    order_by: &[OrderByItem],
    limit: &Option<RowLimit>,
) -> fmt::Result {
    write_where(f, where_clause)?;
    if !group_by.is_empty() {
        f.write_str(" group by ")?;
        comma_list(f, group_by)?;
    }
    if let Some(having) = having {
        write!(f, " having {having}")?;
    }
    if let Some(output) = output {
        write!(f, " {output}")?;
    }
    if !order_by.is_empty() {
        f.write_str(" order by ")?;
        comma_list(f, order_by)?;
    }
    if let Some(limit) = limit {
        write!(f, " limit {}", limit.rows)?;
        if let Some(offset) = &limit.offset {
            write!(f, " offset {offset}")?;
        }
    }
    Ok(())
}

fn write_where(f: &mut fmt::Formatter<'_>, where_clause: &Option<Expr>) -> fmt::Result {
    if let Some(w) = where_clause {
        write!(f, " where {w}")?;
    }
    Ok(())
}

impl fmt::Display for InsertInto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("insert ")?;
        if let Some(selector) = self.stream_selector {
            write!(f, "{} ", selector.as_str())?;
        }
        f.write_str("into ")?;
        write_dotted(f, &self.target)?;
        if !self.columns.is_empty() {
            f.write_str("(")?;
            comma_list_fn(f, &self.columns, |c, f| write_name(f, c, false))?;
            f.write_str(")")?;
        }
        if let Some(precedence) = &self.event_precedence {
            write!(f, " event-precedence({precedence})")?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("select ")?;
        if let Some(selector) = self.stream_selector {
            write!(f, "{} ", selector.as_str())?;
        }
        if self.distinct {
            f.write_str("distinct ")?;
        }
        comma_list(f, &self.items)
    }
}

impl fmt::Display for SelectItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectItemKind::Wildcard => f.write_str("*"),
            SelectItemKind::StreamWildcard { stream, alias } => {
                write_name(f, stream, false)?;
                f.write_str(".*")?;
                write_alias(f, alias)
            }
            SelectItemKind::Expr {
                expr,
                annotation,
                alias,
            } => {
                write!(f, "{expr}")?;
                if let Some(annotation) = annotation {
                    f.write_str(" @")?;
                    write_ident(f, annotation)?;
                }
                write_alias(f, alias)
            }
        }
    }
}

impl fmt::Display for FromClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        comma_list(f, &self.streams)?;
        for join in &self.joins {
            let kind = match join.kind {
                JoinKind::Inner => "inner join",
                JoinKind::Left => "left outer join",
                JoinKind::Right => "right outer join",
                JoinKind::Full => "full outer join",
            };
            write!(f, " {kind} {}", join.stream)?;
            for (i, cond) in join.on.iter().enumerate() {
                f.write_str(if i == 0 { " on " } else { " and " })?;
                write!(f, "{} = {}", cond.left, cond.right)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for StreamExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            StreamSource::Filter(filter) => write!(f, "{filter}")?,
            StreamSource::Pattern(pattern) => write!(f, "{pattern}")?,
            StreamSource::Sql {
                database,
                query,
                metadata_query,
            } => {
                f.write_str("sql:")?;
                write_ident(f, database)?;
                f.write_str(" [")?;
                write_string(f, query)?;
                if let Some(meta) = metadata_query {
                    f.write_str(" metadatasql ")?;
                    write_string(f, meta)?;
                }
                f.write_str("]")?;
            }
            StreamSource::Method {
                namespace,
                method,
                args,
                type_annotation,
            } => {
                write_ident(f, namespace)?;
                f.write_str(":")?;
                write_dotted(f, method)?;
                f.write_str("(")?;
                comma_list(f, args)?;
                f.write_str(")")?;
                if let Some(ty) = type_annotation {
                    f.write_str(" @type(")?;
                    write_dotted(f, ty)?;
                    f.write_str(")")?;
                }
            }
        }
        for view in &self.views {
            write!(f, "{view}")?;
        }
        write_alias(f, &self.alias)?;
        if self.unidirectional {
            f.write_str(" unidirectional")?;
        }
        if let Some(retain) = self.retain {
            write!(f, " {}", retain.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.style {
            ViewStyle::Dot => ".",
            ViewStyle::Hash => "#",
        })?;
        if let Some(ns) = &self.namespace {
            write_name(f, ns, false)?;
            f.write_str(":")?;
        }
        write_name(f, &self.name, false)?;
        if !self.args.is_empty() {
            f.write_str("(")?;
            comma_list(f, &self.args)?;
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl fmt::Display for GroupByItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupByItem::Expr(e) => write!(f, "{e}"),
            GroupByItem::Rollup(items) => write_grouping_call(f, "rollup", items),
            GroupByItem::Cube(items) => write_grouping_call(f, "cube", items),
            GroupByItem::GroupingSets(sets) => {
                f.write_str("grouping sets(")?;
                comma_list(f, sets)?;
                f.write_str(")")
            }
        }
    }
}

fn write_grouping_call(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    items: &[GroupingElement],
) -> fmt::Result {
    write!(f, "{name}(")?;
    comma_list(f, items)?;
    f.write_str(")")
}

impl fmt::Display for GroupingElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupingElement::Expr(e) => write!(f, "{e}"),
            GroupingElement::Combined(items) => {
                f.write_str("(")?;
                comma_list(f, items)?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for GroupingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupingSet::Rollup(items) => write_grouping_call(f, "rollup", items),
            GroupingSet::Cube(items) => write_grouping_call(f, "cube", items),
            GroupingSet::Element(element) => write!(f, "{element}"),
        }
    }
}

impl fmt::Display for OrderByItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        match self.order {
            Some(SortOrder::Asc) => f.write_str(" asc"),
            Some(SortOrder::Desc) => f.write_str(" desc"),
            None => Ok(()),
        }
    }
}

fn write_assignments(f: &mut fmt::Formatter<'_>, assignments: &[Assignment]) -> fmt::Result {
    comma_list(f, assignments)
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(target) = &self.target {
            write!(f, "{target} = ")?;
        }
        write!(f, "{}", self.value)
    }
}

impl fmt::Display for TerminatedCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("when terminated")?;
        if let Some(cond) = &self.condition {
            write!(f, " and {cond}")?;
        }
        if !self.then.is_empty() {
            f.write_str(" then set ")?;
            write_assignments(f, &self.then)?;
        }
        Ok(())
    }
}

impl fmt::Display for OutputLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("output")?;
        match &self.after {
            Some(OutputAfter::Period(period)) => write!(f, " after {period}")?,
            Some(OutputAfter::Events(n)) => write!(f, " after {n} events")?,
            None => {}
        }
        if let Some(selector) = self.selector {
            write!(f, " {}", selector.as_str())?;
        }
        match &self.rate {
            Some(OutputRate::EveryPeriod(period)) => write!(f, " every {period}")?,
            Some(OutputRate::EveryEvents(n)) => write!(f, " every {n} events")?,
            Some(OutputRate::At(params)) => {
                f.write_str(" at (")?;
                comma_list(f, params)?;
                f.write_str(")")?;
            }
            Some(OutputRate::When { condition, then }) => {
                write!(f, " when {condition}")?;
                if !then.is_empty() {
                    f.write_str(" then set ")?;
                    write_assignments(f, then)?;
                }
            }
            Some(OutputRate::WhenTerminated(term)) => write!(f, " {term}")?,
            None => {}
        }
        if let Some(term) = &self.and_terminated {
            write!(f, " and {term}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ColumnDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_name(f, &self.name, false)?;
        match &self.ty {
            Some(ty) => write!(f, " {ty}"),
            None => f.write_str(" null"),
        }
    }
}

impl fmt::Display for CreateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("create window ")?;
        write_ident(f, &self.name)?;
        for view in &self.views {
            write!(f, "{view}")?;
        }
        if let Some(retain) = self.retain {
            write!(f, " {}", retain.as_str())?;
        }
        f.write_str(" as ")?;
        match &self.model {
            WindowModel::ModelAfter { select, event_type } => {
                if let Some(items) = select {
                    f.write_str("select ")?;
                    comma_list(f, items)?;
                    f.write_str(" from ")?;
                }
                write_dotted(f, event_type)?;
            }
            WindowModel::Columns(columns) => {
                f.write_str("(")?;
                comma_list(f, columns)?;
                f.write_str(")")?;
            }
        }
        if let Some(insert) = &self.insert {
            f.write_str(" insert")?;
            write_where(f, &insert.where_clause)?;
        }
        Ok(())
    }
}

impl fmt::Display for CreateSelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreateSelectItem::Wildcard => f.write_str("*"),
            CreateSelectItem::Property { chain, alias } => {
                write!(f, "{chain}")?;
                write_alias(f, alias)
            }
            CreateSelectItem::Constant { value, alias } => {
                write!(f, "{value} as ")?;
                write_name(f, alias, false)
            }
        }
    }
}

impl fmt::Display for CreateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("create ")?;
        if self.unique {
            f.write_str("unique ")?;
        }
        f.write_str("index ")?;
        write_ident(f, &self.name)?;
        f.write_str(" on ")?;
        write_ident(f, &self.window)?;
        f.write_str("(")?;
        comma_list_fn(f, &self.columns, |col, f| {
            match col.exprs.as_slice() {
                [single] => write!(f, "{single}")?,
                exprs => {
                    f.write_str("(")?;
                    comma_list(f, exprs)?;
                    f.write_str(")")?;
                }
            }
            if let Some(ty) = &col.index_type {
                f.write_str(" ")?;
                write_name(f, ty, false)?;
                if !col.type_params.is_empty() {
                    f.write_str("(")?;
                    comma_list(f, &col.type_params)?;
                    f.write_str(")")?;
                }
            }
            Ok(())
        })?;
        f.write_str(")")
    }
}

impl fmt::Display for CreateVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("create ")?;
        if self.constant {
            f.write_str("constant ")?;
        }
        write!(f, "variable {} ", self.ty)?;
        write_ident(f, &self.name)?;
        if let Some(init) = &self.init {
            write!(f, " = {init}")?;
        }
        Ok(())
    }
}

impl fmt::Display for CreateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("create table ")?;
        write_ident(f, &self.name)?;
        f.write_str(" as (")?;
        comma_list_fn(f, &self.columns, |col, f| {
            write_name(f, &col.name, false)?;
            match &col.kind {
                TableColumnKind::Plain(ty) => write!(f, " {ty}")?,
                TableColumnKind::Aggregation(expr) => write!(f, " {expr}")?,
            }
            if col.primary_key {
                f.write_str(" primary key")?;
            }
            for annotation in &col.annotations {
                write!(f, " {annotation}")?;
            }
            Ok(())
        })?;
        f.write_str(")")
    }
}

impl fmt::Display for CreateSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("create ")?;
        if let Some(repr) = &self.representation {
            write_ident(f, repr)?;
            f.write_str(" ")?;
        }
        f.write_str("schema ")?;
        write_ident(f, &self.name)?;
        f.write_str(" as ")?;
        match &self.body {
            SchemaBody::Columns(columns) => {
                f.write_str("(")?;
                comma_list(f, columns)?;
                f.write_str(")")?;
            }
            SchemaBody::Variant(types) => comma_list_fn(f, types, |t, f| match t {
                VariantType::Any => f.write_str("*"),
                VariantType::Named(name) => write_dotted(f, name),
            })?,
        }
        for qualifier in &self.qualifiers {
            f.write_str(" ")?;
            write_ident(f, &qualifier.name)?;
            f.write_str(" ")?;
            comma_list_fn(f, &qualifier.values, |v, f| write_name(f, v, false))?;
        }
        Ok(())
    }
}

fn write_window_ref(f: &mut fmt::Formatter<'_>, window: &WindowRef) -> fmt::Result {
    write_ident(f, &window.name)?;
    write_alias(f, &window.alias)
}

impl fmt::Display for OnStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("on ")?;
        match &self.trigger.source {
            OnSource::Filter(filter) => write!(f, "{filter}")?,
            OnSource::Pattern(pattern) => write!(f, "{pattern}")?,
        }
        write_alias(f, &self.trigger.alias)?;
        f.write_str(" ")?;
        match &self.action {
            OnAction::Delete {
                window,
                where_clause,
            } => {
                f.write_str("delete from ")?;
                write_window_ref(f, window)?;
                write_where(f, where_clause)
            }
            OnAction::Select(select) => write!(f, "{select}"),
            OnAction::Insert {
                first,
                splits,
                output_all,
            } => {
                write!(f, "{first}")?;
                for split in splits {
                    write!(f, " {} select ", split.insert_into)?;
                    comma_list(f, &split.items)?;
                    write_where(f, &split.where_clause)?;
                }
                match output_all {
                    Some(true) => f.write_str(" output all"),
                    Some(false) => f.write_str(" output first"),
                    None => Ok(()),
                }
            }
            OnAction::Update {
                window,
                assignments,
                where_clause,
            } => {
                f.write_str("update ")?;
                write_window_ref(f, window)?;
                f.write_str(" set ")?;
                write_assignments(f, assignments)?;
                write_where(f, where_clause)
            }
            OnAction::Set(assignments) => {
                f.write_str("set ")?;
                write_assignments(f, assignments)
            }
            OnAction::Merge(merge) => write!(f, "{merge}"),
        }
    }
}

impl fmt::Display for OnSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(insert) = &self.insert_into {
            write!(f, "{insert} ")?;
        }
        f.write_str("select ")?;
        if self.and_delete {
            f.write_str("and delete ")?;
        }
        if self.distinct {
            f.write_str("distinct ")?;
        }
        comma_list(f, &self.items)?;
        if let Some(from) = &self.from {
            f.write_str(" from ")?;
            write_window_ref(f, from)?;
        }
        write_tail(
            f,
            &self.where_clause,
            &self.group_by,
            &self.having,
            None,
            &self.order_by,
            &self.limit,
        )
    }
}

impl fmt::Display for OnMerge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("merge into ")?;
        write_window_ref(f, &self.window)?;
        write_where(f, &self.where_clause)?;
        for clause in &self.clauses {
            let (negated, condition) = match clause {
                MergeClause::Matched { condition, .. } => (false, condition),
                MergeClause::NotMatched { condition, .. } => (true, condition),
            };
            f.write_str(if negated {
                " when not matched"
            } else {
                " when matched"
            })?;
            if let Some(cond) = condition {
                write!(f, " and {cond}")?;
            }
            match clause {
                MergeClause::Matched { actions, .. } => {
                    for action in actions {
                        write!(f, " then {action}")?;
                    }
                }
                MergeClause::NotMatched { actions, .. } => {
                    for action in actions {
                        write!(f, " then {action}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for MergeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeAction::Update {
                assignments,
                where_clause,
            } => {
                f.write_str("update set ")?;
                write_assignments(f, assignments)?;
                write_where(f, where_clause)
            }
            MergeAction::Delete { where_clause } => {
                f.write_str("delete")?;
                write_where(f, where_clause)
            }
            MergeAction::Insert(insert) => write!(f, "{insert}"),
        }
    }
}

impl fmt::Display for MergeInsert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("insert")?;
        if let Some(target) = &self.target {
            f.write_str(" into ")?;
            write_dotted(f, target)?;
        }
        if !self.columns.is_empty() {
            f.write_str("(")?;
            comma_list_fn(f, &self.columns, |c, f| write_name(f, c, false))?;
            f.write_str(")")?;
        }
        f.write_str(" select ")?;
        comma_list(f, &self.items)?;
        write_where(f, &self.where_clause)
    }
}

impl fmt::Display for UpdateDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_dotted(f, &self.target)?;
        write_alias(f, &self.alias)?;
        f.write_str(" set ")?;
        write_assignments(f, &self.assignments)?;
        write_where(f, &self.where_clause)
    }
}

impl fmt::Display for CreateDataflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("create dataflow ")?;
        write_ident(f, &self.name)?;
        f.write_str(" as")?;
        for op in &self.operators {
            match op {
                DataflowOperator::Operator(op) => write!(f, " {op}")?,
                DataflowOperator::Schema(schema) => write!(f, " {schema},")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for GraphOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            write!(f, "{annotation} ")?;
        }
        write_ident(f, &self.name)?;
        if !self.inputs.is_empty() {
            f.write_str("(")?;
            comma_list_fn(f, &self.inputs, |input, f| {
                match input.streams.as_slice() {
                    [single] => write_dotted(f, single)?,
                    streams => {
                        f.write_str("(")?;
                        comma_list_fn(f, streams, |s, f| write_dotted(f, s))?;
                        f.write_str(")")?;
                    }
                }
                write_alias(f, &input.alias)
            })?;
            f.write_str(")")?;
        }
        if !self.outputs.is_empty() {
            f.write_str(" -> ")?;
            comma_list_fn(f, &self.outputs, |out, f| {
                write_dotted(f, &out.stream)?;
                write_output_types(f, &out.types)
            })?;
        }
        f.write_str(" {")?;
        if !self.config.is_empty() {
            f.write_str(" ")?;
            comma_list_fn(f, &self.config, |cfg, f| match cfg {
                OperatorConfig::Select(select) => write!(f, "select: ({select})"),
                OperatorConfig::Value { name, value } => {
                    write_name(f, name, false)?;
                    match value {
                        ConfigValue::Expr(e) => write!(f, ": {e}"),
                        ConfigValue::Json(json) => write!(f, ": {json}"),
                    }
                }
            })?;
            f.write_str(" ")?;
        }
        f.write_str("}")
    }
}

fn write_output_types(f: &mut fmt::Formatter<'_>, types: &[OutputType]) -> fmt::Result {
    if types.is_empty() {
        return Ok(());
    }
    f.write_str("<")?;
    comma_list_fn(f, types, |t, f| match t {
        OutputType::Wildcard => f.write_str("?"),
        OutputType::Named { name, params } => {
            write_dotted(f, name)?;
            write_output_types(f, params)
        }
    })?;
    f.write_str(">")
}

impl fmt::Display for FireAndForget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FireAndForget::Delete {
                target,
                alias,
                where_clause,
            } => {
                f.write_str("delete from ")?;
                write_dotted(f, target)?;
                write_alias(f, alias)?;
                write_where(f, where_clause)
            }
            FireAndForget::Update(details) => write!(f, "update {details}"),
            FireAndForget::Insert { into, rows } => {
                write!(f, "{into} values ")?;
                comma_list_fn(f, rows, |row, f| {
                    f.write_str("(")?;
                    comma_list(f, row)?;
                    f.write_str(")")
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{Span, Spanned};

    fn stream(name: &str) -> StreamExpr {
        StreamExpr {
            source: StreamSource::Filter(EventFilter {
                tag: None,
                event_type: name.into(),
                params: vec![],
                selections: vec![],
                span: Span::dummy(),
            }),
            views: vec![],
            alias: None,
            unidirectional: false,
            retain: None,
            span: Span::dummy(),
        }
    }

    #[test]
    fn test_select_wildcard() {
        let select = SelectStatement {
            into_table: None,
            insert_into: None,
            select: SelectClause {
                stream_selector: None,
                distinct: false,
                items: vec![Spanned::dummy(SelectItemKind::Wildcard)],
                span: Span::dummy(),
            },
            from: Some(FromClause {
                streams: vec![stream("A")],
                joins: vec![],
                span: Span::dummy(),
            }),
            match_recognize: None,
            where_clause: None,
            group_by: vec![],
            having: None,
            output: None,
            order_by: vec![],
            limit: None,
        };
        assert_eq!(select.to_string(), "select * from A");
    }

    #[test]
    fn test_annotation() {
        let a = Annotation {
            name: "Name".into(),
            args: AnnotationArgs::Value(AnnotationValue::Literal(Literal::String("q1".into()))),
            span: Span::dummy(),
        };
        assert_eq!(a.to_string(), "@Name('q1')");

        let pairs = Annotation {
            name: "Hint".into(),
            args: AnnotationArgs::Pairs(vec![
                ("value".into(), AnnotationValue::Name("com.acme.Kind".into())),
                (
                    "tags".into(),
                    AnnotationValue::Array(vec![
                        AnnotationValue::Literal(Literal::Int(1)),
                        AnnotationValue::Literal(Literal::Int(2)),
                    ]),
                ),
            ]),
            span: Span::dummy(),
        };
        assert_eq!(pairs.to_string(), "@Hint(value = com.acme.Kind, tags = {1, 2})");
    }

    #[test]
    fn test_fire_and_forget_insert() {
        let faf = FireAndForget::Insert {
            into: InsertInto {
                stream_selector: None,
                target: "W".into(),
                columns: vec!["a".into(), "b".into()],
                event_precedence: None,
            },
            rows: vec![vec![
                Spanned::dummy(ExprKind::Literal(Literal::Int(1))),
                Spanned::dummy(ExprKind::Literal(Literal::String("x".into()))),
            ]],
        };
        assert_eq!(faf.to_string(), "insert into W(a, b) values (1, 'x')");
    }
}
