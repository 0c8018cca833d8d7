//! Parser coverage tests for every statement form through the public entry points
//!
//! These tests focus on less-common EPL constructs and the branches where the
//! grammar has to look ahead to pick an alternative.

use epl_core::ast::*;
use epl_parser::{parse_json_value, parse_property_path, parse_statement};

// ============================================================================
// Helpers
// ============================================================================

fn parse(source: &str) -> Statement {
    parse_statement(source).unwrap_or_else(|e| panic!("Parse failed for {source:?}: {e}"))
}

fn select(source: &str) -> SelectStatement {
    match parse(source).body.node {
        StatementKind::Select(select) => *select,
        other => panic!("Expected select, got {}", other.label()),
    }
}

fn where_expr(source: &str) -> ExprKind {
    select(source)
        .where_clause
        .unwrap_or_else(|| panic!("no where clause in {source}"))
        .node
}

// ============================================================================
// 1. Statement labels
// ============================================================================

#[test]
fn test_statement_labels() {
    let cases = [
        ("select * from A", "select"),
        ("insert into B select * from A", "select"),
        ("create window W#keepall as A", "create window"),
        ("create index I on W(a)", "create index"),
        ("create variable int v", "create variable"),
        ("create table T (k string primary key)", "create table"),
        ("create schema S (a int)", "create schema"),
        ("create avro schema S (a int)", "create schema"),
        ("create context C partition by a from A", "create context"),
        ("create expression e { 1 }", "create expression"),
        ("create inlined_class \"\"\"class X {}\"\"\"", "create inlined_class"),
        ("create dataflow D Op {}", "create dataflow"),
        ("on A delete from W", "on-delete"),
        ("on A select * from W", "on-select"),
        ("on A insert into X select * insert into Y select *", "on-insert"),
        ("on A update W set x = 1", "on-update"),
        ("on A set v = 1", "on-set"),
        ("on A merge W when matched then delete", "on-merge"),
        ("update istream A set x = 1", "update istream"),
        ("update W set x = 1", "update"),
        ("delete from W", "delete"),
        ("insert into W values (1)", "insert"),
    ];
    for (source, label) in cases {
        assert_eq!(parse(source).body.node.label(), label, "{source}");
    }
}

#[test]
fn test_simple_select_shape() {
    let s = select("select * from A");
    assert!(s.select.is_wildcard());
    let from = s.from.unwrap();
    assert_eq!(from.streams.len(), 1);
    assert!(from.streams[0].alias.is_none());
    assert!(matches!(&from.streams[0].source, StreamSource::Filter(f) if f.event_type == "A"));
}

#[test]
fn test_every_clause_lands_in_its_field() {
    let s = select(
        "select a, b from A(x=5) where a > b group by a having count(*) > 1 \
         output every 10 seconds order by a",
    );
    assert_eq!(s.select.items.len(), 2);
    let from = s.from.unwrap();
    let StreamSource::Filter(filter) = &from.streams[0].source else {
        panic!("expected filter");
    };
    assert_eq!(filter.params.len(), 1);
    assert!(matches!(s.where_clause.unwrap().node, ExprKind::Compare { op: CompareOp::Gt, .. }));
    assert_eq!(s.group_by.len(), 1);
    assert!(s.having.is_some());
    assert!(matches!(s.output.unwrap().rate, Some(OutputRate::EveryPeriod(_))));
    assert_eq!(s.order_by.len(), 1);
    assert!(s.limit.is_none());
}

#[test]
fn test_guarded_pattern_shape() {
    let p = pattern_of("select * from pattern [every A -> (B and not C) where timer:within(10 sec)]");
    let PatternKind::FollowedBy(links) = &p.node else {
        panic!("expected followed-by");
    };
    assert!(matches!(links[0].pattern.node, PatternKind::Every(_)));
    let PatternKind::Guard { inner, guard } = &links[1].pattern.node else {
        panic!("expected guard");
    };
    let PatternKind::And(items) = &inner.node else {
        panic!("expected and");
    };
    assert!(matches!(items[1].node, PatternKind::Not(_)));
    let PatternGuard::Where(call) = guard else {
        panic!("expected where guard");
    };
    assert_eq!((call.namespace.as_str(), call.name.as_str()), ("timer", "within"));
    assert!(matches!(call.args[0], FunctionArg::Value(TimeArg::TimePeriod(_))));
}

#[test]
fn test_partition_context_on_camel_case_type() {
    let StatementKind::CreateContext(ctx) = parse("create context Ctx as partition by custId from Order").body.node
    else {
        panic!("expected context");
    };
    let ContextDetailKind::Partition { items, initiated, terminated } = ctx.detail.node else {
        panic!("expected partition");
    };
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].filter.event_type, "Order");
    assert_eq!(items[0].properties[0].root_name(), Some("custId"));
    assert!(initiated.is_none() && terminated.is_none());
}

#[test]
fn test_row_pattern_shape() {
    let mr = select("select * from T match_recognize (measures A.x as x pattern (A B+ C*) define B as B.x > 0)")
        .match_recognize
        .unwrap();
    let RowPatternKind::Concat(items) = &mr.pattern.node else {
        panic!("expected concatenation");
    };
    let quantifiers: Vec<Option<QuantifierKind>> = items
        .iter()
        .map(|item| match &item.node {
            RowPatternKind::Atom { quantifier, .. } => quantifier.map(|q| q.kind),
            _ => panic!("expected atom"),
        })
        .collect();
    assert_eq!(
        quantifiers,
        vec![None, Some(QuantifierKind::OneOrMore), Some(QuantifierKind::ZeroOrMore)]
    );
}

#[test]
fn test_keywords_are_case_insensitive() {
    let stmt = parse("SeLeCt DISTINCT a FROM A WHERE a > 1 ORDER BY a DESC");
    let select = stmt.as_select().unwrap();
    assert!(select.select.distinct);
    assert_eq!(select.order_by[0].order, Some(SortOrder::Desc));
}

// ============================================================================
// 2. Prelude, context and for clause
// ============================================================================

#[test]
fn test_statement_name_annotation() {
    let stmt = parse("@Name('big-trades') @Priority(5) select * from Trade");
    assert_eq!(stmt.name(), Some("big-trades"));
    assert_eq!(stmt.annotations().count(), 2);
}

#[test]
fn test_nested_annotation_values() {
    let stmt = parse("@Hint(sub = @Tag(name = 'x'), list = {1, 'two'}, kind = com.acme.Kind) select * from A");
    let hint = stmt.annotations().next().unwrap();
    assert!(matches!(hint.value(Some("sub")), Some(AnnotationValue::Annotation(_))));
    assert!(matches!(hint.value(Some("list")), Some(AnnotationValue::Array(items)) if items.len() == 2));
    assert_eq!(
        hint.value(Some("kind")),
        Some(&AnnotationValue::Name("com.acme.Kind".into()))
    );
}

#[test]
fn test_prelude_expression_and_class() {
    let stmt = parse(
        "expression twice { x => x * 2 } inlined_class \"\"\"public class H {}\"\"\" select twice(a) from A",
    );
    assert_eq!(stmt.prelude.len(), 2);
    assert!(matches!(stmt.prelude[0].node, PreludeItem::Expression(_)));
    let PreludeItem::Class(class) = &stmt.prelude[1].node else {
        panic!("expected inlined class");
    };
    assert_eq!(class.code, "public class H {}");
}

#[test]
fn test_context_and_for_clause() {
    let stmt = parse("context PerSym select * from A for discrete_delivery");
    assert_eq!(stmt.context.as_deref(), Some("PerSym"));
    let for_clause = stmt.for_clause.unwrap();
    assert_eq!(for_clause.name, "discrete_delivery");
    assert!(for_clause.args.is_empty());
}

// ============================================================================
// 3. Select and from
// ============================================================================

#[test]
fn test_istream_as_function_is_not_a_selector() {
    let s = select("select istream() as fresh from A");
    assert_eq!(s.select.stream_selector, None);
    let s = select("select rstream * from A");
    assert_eq!(s.select.stream_selector, Some(StreamSelector::RStream));
    assert!(s.select.is_wildcard());
}

#[test]
fn test_stream_wildcard_and_select_annotation() {
    let s = select("select a.* as x, b @eventbean as bb from A as a, B as b");
    assert!(matches!(
        &s.select.items[0].node,
        SelectItemKind::StreamWildcard { stream, alias } if stream == "a" && alias.as_deref() == Some("x")
    ));
    assert!(matches!(
        &s.select.items[1].node,
        SelectItemKind::Expr { annotation: Some(a), .. } if a == "eventbean"
    ));
}

#[test]
fn test_tagged_filter_with_contained_selection() {
    let s = select("select * from o=Order[select id from lines as l where l.qty > 0]");
    let from = s.from.unwrap();
    let StreamSource::Filter(filter) = &from.streams[0].source else {
        panic!("expected filter");
    };
    assert_eq!(filter.tag.as_deref(), Some("o"));
    let selection = &filter.selections[0];
    assert_eq!(selection.select.as_ref().map(Vec::len), Some(1));
    assert_eq!(selection.alias.as_deref(), Some("l"));
    assert!(selection.where_clause.is_some());
}

#[test]
fn test_view_styles_and_namespaces() {
    let s = select("select * from A.win:time(30 sec)#ext:sort(5, price desc)#lastevent retain-union");
    let stream = &s.from.unwrap().streams[0];
    assert_eq!(stream.views.len(), 3);
    assert_eq!(stream.views[0].style, ViewStyle::Dot);
    assert_eq!(stream.views[1].namespace.as_deref(), Some("ext"));
    assert!(matches!(
        stream.views[1].args[1],
        TimeArg::Ordered { descending: true, .. }
    ));
    assert!(stream.views[2].args.is_empty());
    assert_eq!(stream.retain, Some(RetainMode::Union));
}

#[test]
fn test_join_kinds() {
    let s = select("select * from A left join B on A.id = B.id right outer join C on A.id = C.id join D");
    let kinds: Vec<JoinKind> = s.from.unwrap().joins.iter().map(|j| j.kind).collect();
    assert_eq!(kinds, vec![JoinKind::Left, JoinKind::Right, JoinKind::Inner]);
}

#[test]
fn test_sql_and_method_sources() {
    let s = select("select * from A, sql:db ['select 1'], svc:lookup(A.id)");
    let streams = s.from.unwrap().streams;
    assert!(matches!(
        &streams[1].source,
        StreamSource::Sql { database, metadata_query: None, .. } if database == "db"
    ));
    assert!(matches!(
        &streams[2].source,
        StreamSource::Method { namespace, method, args, .. } if namespace == "svc" && method == "lookup" && args.len() == 1
    ));
}

// ============================================================================
// 4. Expressions
// ============================================================================

#[test]
fn test_precedence_or_over_and() {
    let ExprKind::Binary { op, right, .. } = where_expr("select * from A where a or b and c") else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOp::Or);
    assert!(matches!(right.node, ExprKind::Binary { op: BinaryOp::And, .. }));
}

#[test]
fn test_not_binds_looser_than_comparison() {
    let ExprKind::Unary { op, expr } = where_expr("select * from A where not a = 1") else {
        panic!("expected unary");
    };
    assert_eq!(op, UnaryOp::Not);
    assert!(matches!(expr.node, ExprKind::Compare { op: CompareOp::Eq, .. }));
}

#[test]
fn test_negative_literal_folds() {
    let ExprKind::Compare { right, .. } = where_expr("select * from A where a > -5") else {
        panic!("expected compare");
    };
    assert_eq!(right.node, ExprKind::Literal(Literal::Int(-5)));
}

#[test]
fn test_is_not_null() {
    let ExprKind::Compare { op, right, .. } = where_expr("select * from A where a is not null") else {
        panic!("expected compare");
    };
    assert_eq!(op, CompareOp::IsNot);
    assert_eq!(right.node, ExprKind::Literal(Literal::Null));
}

#[test]
fn test_in_with_mixed_delimiters() {
    let ExprKind::In { open, close, items, .. } = where_expr("select * from A where a in (1, 2]") else {
        panic!("expected in");
    };
    assert_eq!((open, close), (Delimiter::Paren, Delimiter::Bracket));
    assert_eq!(items.len(), 2);
}

#[test]
fn test_like_with_escape() {
    let ExprKind::Like { negated, escape, .. } = where_expr("select * from A where s not like 'a!%' escape '!'") else {
        panic!("expected like");
    };
    assert!(negated);
    assert_eq!(escape.as_deref(), Some("!"));
}

#[test]
fn test_quantified_list() {
    let ExprKind::Quantified { quantifier, source, .. } = where_expr("select * from A where a = any (1, 2, 3)") else {
        panic!("expected quantified");
    };
    assert_eq!(quantifier, Quantifier::Any);
    assert!(matches!(source, QuantifiedSource::List(items) if items.len() == 3));
}

#[test]
fn test_cast_option_nests_another_cast() {
    let s = select("select cast(a, double, fmt: cast(b, int, fmt: 'x')) from A");
    let SelectItemKind::Expr { expr, .. } = &s.select.items[0].node else {
        panic!("expected expression item");
    };
    let ExprKind::Builtin(BuiltinCall::Cast { option: Some((name, value)), .. }) = &expr.node else {
        panic!("expected cast with option, got {:?}", expr.node);
    };
    assert_eq!(name, "fmt");
    let NamedValue::Expr(inner) = value.as_ref() else {
        panic!("expected single-expression option value");
    };
    assert!(matches!(
        &inner.node,
        ExprKind::Builtin(BuiltinCall::Cast { option: Some(_), .. })
    ));
}

#[test]
fn test_builtin_functions() {
    let s = select(
        "select count(distinct id), prev(1, price), prior(2, price), instanceof(x, int, long), \
         cast(a, double), cast(b as int), exists(c.d), current_timestamp, window(*), first(s.*, 1), \
         grouping_id(a, b), typeof(a) from A as s",
    );
    let builtins: Vec<&BuiltinCall> = s
        .select
        .items
        .iter()
        .filter_map(|item| match &item.node {
            SelectItemKind::Expr { expr, .. } => match &expr.node {
                ExprKind::Builtin(call) => Some(call),
                _ => None,
            },
            _ => None,
        })
        .collect();
    assert_eq!(builtins.len(), 12);
    assert!(matches!(
        builtins[0],
        BuiltinCall::Aggregate { func: AggregateFunc::Count, modifier: Some(AggregateModifier::Distinct), .. }
    ));
    assert!(matches!(builtins[3], BuiltinCall::InstanceOf { types, .. } if types.len() == 2));
    assert!(matches!(builtins[7], BuiltinCall::CurrentTimestamp));
    assert!(matches!(
        builtins[9],
        BuiltinCall::Access { func: AccessFunc::First, arg: AccessArg::StreamWildcard(_), index: Some(_) }
    ));
}

#[test]
fn test_keyword_named_properties() {
    let s = select("select window.size, last, count from A");
    assert_eq!(s.select.items.len(), 3);
    for item in &s.select.items {
        let SelectItemKind::Expr { expr, .. } = &item.node else {
            panic!("expected expression item");
        };
        assert!(matches!(expr.node, ExprKind::Chain(_)), "{expr}");
    }
}

#[test]
fn test_named_and_lambda_arguments() {
    let s = select("select f(a, depth: 10, keys: (a, b), (x, y) => x + y) from A");
    let SelectItemKind::Expr { expr, .. } = &s.select.items[0].node else {
        panic!("expected expression item");
    };
    let ExprKind::Chain(chain) = &expr.node else {
        panic!("expected chain");
    };
    let ChainLink::Call { args, .. } = &chain.elements[0].link else {
        panic!("expected call");
    };
    assert_eq!(args.args.len(), 4);
    assert!(matches!(&args.args[1], FunctionArg::Named { name, .. } if name == "depth"));
    assert!(matches!(&args.args[2], FunctionArg::Named { value: NamedValue::List(items), .. } if items.len() == 2));
    assert!(matches!(&args.args[3], FunctionArg::Lambda { params, .. } if params.len() == 2));
}

#[test]
fn test_new_object_and_case_with_operand() {
    let s = select("select new { a, b = c + 1 }, case x when 1 then 'one' end from A");
    let SelectItemKind::Expr { expr, .. } = &s.select.items[0].node else {
        panic!("expected expression item");
    };
    assert!(matches!(&expr.node, ExprKind::NewObject(fields) if fields.len() == 2));
    let SelectItemKind::Expr { expr, .. } = &s.select.items[1].node else {
        panic!("expected expression item");
    };
    assert!(matches!(&expr.node, ExprKind::Case { operand: Some(_), .. }));
}

// ============================================================================
// 5. Output, order, limit
// ============================================================================

#[test]
fn test_output_every_events_and_terminated() {
    let s = select("select * from A output first every 5 events and when terminated then set done = true");
    let output = s.output.unwrap();
    assert_eq!(output.selector, Some(OutputSelector::First));
    assert!(matches!(output.rate, Some(OutputRate::EveryEvents(_))));
    let terminated = output.and_terminated.unwrap();
    assert_eq!(terminated.then.len(), 1);
}

#[test]
fn test_output_after_period() {
    let s = select("select * from A output after 1 minute 30 seconds snapshot");
    let output = s.output.unwrap();
    let Some(OutputAfter::Period(period)) = output.after else {
        panic!("expected after period");
    };
    assert_eq!(period.constant_micros(), Some(90_000_000.0));
    assert_eq!(output.selector, Some(OutputSelector::Snapshot));
    assert!(output.rate.is_none());
}

#[test]
fn test_limit_with_comma_is_offset_first() {
    let s = select("select * from A limit 5, 10");
    let limit = s.limit.unwrap();
    assert_eq!(limit.rows.node, ExprKind::Literal(Literal::Int(10)));
    assert_eq!(limit.offset.unwrap().node, ExprKind::Literal(Literal::Int(5)));
}

// ============================================================================
// 6. Patterns
// ============================================================================

fn pattern_of(source: &str) -> Pattern {
    let s = select(source);
    match s.from.unwrap().streams.remove(0).source {
        StreamSource::Pattern(inclusion) => inclusion.pattern,
        _ => panic!("expected pattern source"),
    }
}

#[test]
fn test_followed_by_chain_and_bound() {
    let p = pattern_of("select * from pattern [A -> B -[5]-> C]");
    let PatternKind::FollowedBy(links) = &p.node else {
        panic!("expected followed-by");
    };
    assert_eq!(links.len(), 3);
    assert!(links[1].max.is_none());
    assert!(links[2].max.is_some());
}

#[test]
fn test_every_binds_tighter_than_and() {
    let p = pattern_of("select * from pattern [every A and B]");
    let PatternKind::And(items) = &p.node else {
        panic!("expected and");
    };
    assert!(matches!(items[0].node, PatternKind::Every(_)));
}

#[test]
fn test_repeat_forms() {
    let p = pattern_of("select * from pattern [[:3] A until timer:interval(10 sec)]");
    let PatternKind::MatchUntil { range: Some(range), until: Some(until), .. } = &p.node else {
        panic!("expected match-until");
    };
    assert!(range.low.is_none() && range.high.is_some());
    assert!(matches!(until.node, PatternKind::Observer(_)));

    let p = pattern_of("select * from pattern [every [2] A]");
    let PatternKind::Every(inner) = &p.node else {
        panic!("expected every");
    };
    assert!(matches!(&inner.node, PatternKind::Repeat { range, .. } if range.is_exact()));
}

#[test]
fn test_pattern_filters_collected() {
    let p = pattern_of("select * from pattern [every (a=A -> not B) or C(x > 1)]");
    let names: Vec<&str> = p.node.filters().iter().map(|f| f.event_type.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

// ============================================================================
// 7. Match recognize
// ============================================================================

#[test]
fn test_match_recognize_details() {
    let s = select(
        "select * from T match_recognize (measures A.x as ax after match skip past last row \
         pattern (match_recognize_permute(A, B) C{2,}) define C as C.x > 0)",
    );
    let mr = s.match_recognize.unwrap();
    assert_eq!(mr.after_skip.unwrap().strategy(), Some(SkipStrategy::PastLastRow));
    assert_eq!(mr.pattern.node.variables(), vec!["A", "B", "C"]);
    let RowPatternKind::Concat(items) = &mr.pattern.node else {
        panic!("expected concatenation");
    };
    assert!(matches!(items[0].node, RowPatternKind::Permute(_)));
    assert!(matches!(
        &items[1].node,
        RowPatternKind::Atom { repeat: Some(RepeatBounds { has_comma: true, max: None, .. }), .. }
    ));
    assert_eq!(mr.define.len(), 1);
}

// ============================================================================
// 8. Create statements
// ============================================================================

#[test]
fn test_create_variable_array_type() {
    let StatementKind::CreateVariable(v) = parse("create variable long[] ids = {1L, 2L}").body.node else {
        panic!("expected variable");
    };
    assert!(v.ty.is_array());
    assert!(matches!(v.init.unwrap().node, ExprKind::Array(items) if items.len() == 2));
}

#[test]
fn test_create_table_column_kinds() {
    let StatementKind::CreateTable(t) =
        parse("create table T (k string primary key, n count(*), w window(*) @type(Tick))").body.node
    else {
        panic!("expected table");
    };
    assert!(t.columns[0].primary_key);
    assert!(matches!(t.columns[1].kind, TableColumnKind::Aggregation(_)));
    assert!(matches!(t.columns[2].kind, TableColumnKind::Aggregation(_)));
    assert_eq!(t.columns[2].annotations.len(), 1);
}

#[test]
fn test_create_schema_qualifiers() {
    let StatementKind::CreateSchema(s) =
        parse("create schema Tick (sym string, px double) inherits Base starttimestamp ts endtimestamp te").body.node
    else {
        panic!("expected schema");
    };
    let names: Vec<&str> = s.qualifiers.iter().map(|q| q.name.as_str()).collect();
    assert_eq!(names, vec!["inherits", "starttimestamp", "endtimestamp"]);
}

#[test]
fn test_create_context_forms() {
    let detail = |source: &str| match parse(source).body.node {
        StatementKind::CreateContext(c) => c.detail.node,
        other => panic!("expected context, got {}", other.label()),
    };
    assert!(matches!(
        detail("create context C coalesce by consistent_hash_crc32(sym) from Tick granularity 16 preallocate"),
        ContextDetailKind::Coalesce { granularity: 16, preallocate: Some(_), .. }
    ));
    assert!(matches!(
        detail("create context C start pattern [A] @inclusive end after 10 sec"),
        ContextDetailKind::RangeBased { start: ContextStart::Point(RangePoint::Pattern { inclusive: true, .. }), end: Some(RangePoint::After(_)) }
    ));
    assert!(matches!(
        detail("create context C partition by a and b from A, c from B initiated by A terminated by B"),
        ContextDetailKind::Partition { items, initiated: Some(_), terminated: Some(_) } if items.len() == 2 && items[0].properties.len() == 2
    ));
}

#[test]
fn test_dataflow_operator_config() {
    let StatementKind::CreateDataflow(df) = parse(
        "create dataflow F \
         @Audit Src -> out<?> { json: {\"a\": [1, 2]}, rate: 10 * 2 } \
         Sink(out as o, (x, y)) { select: (select * from out) }",
    )
    .body
    .node
    else {
        panic!("expected dataflow");
    };
    assert_eq!(df.operators.len(), 2);
    let DataflowOperator::Operator(src) = &df.operators[0] else {
        panic!("expected operator");
    };
    assert_eq!(src.annotations.len(), 1);
    assert_eq!(src.outputs[0].types, vec![OutputType::Wildcard]);
    assert!(matches!(&src.config[0], OperatorConfig::Value { value: ConfigValue::Json(_), .. }));
    assert!(matches!(&src.config[1], OperatorConfig::Value { value: ConfigValue::Expr(_), .. }));
    let DataflowOperator::Operator(sink) = &df.operators[1] else {
        panic!("expected operator");
    };
    assert_eq!(sink.inputs[0].alias.as_deref(), Some("o"));
    assert_eq!(sink.inputs[1].streams.len(), 2);
    assert!(matches!(sink.config[0], OperatorConfig::Select(_)));
}

// ============================================================================
// 9. Fire-and-forget
// ============================================================================

#[test]
fn test_fire_and_forget_update_with_alias() {
    let StatementKind::FireAndForget(FireAndForget::Update(details)) =
        parse("update Orders as o set o.qty = 0, touched(o) where o.id = 5").body.node
    else {
        panic!("expected update");
    };
    assert_eq!(details.alias.as_deref(), Some("o"));
    assert!(details.assignments[0].target.is_some());
    assert!(details.assignments[1].target.is_none());
}

// ============================================================================
// 10. Property paths and JSON
// ============================================================================

#[test]
fn test_property_path_entry_point() {
    let path = parse_property_path("item.`select`.price?").unwrap();
    assert_eq!(path.node.elements.len(), 3);
    assert!(path.node.elements[2].dynamic);
    assert!(parse_property_path("a b").is_err());
}

#[test]
fn test_json_entry_point() {
    let json = parse_json_value("{'name': \"x\", list: [1, 2.5, true, null], nested: {}}").unwrap();
    assert_eq!(json.get("name"), Some(&JsonValue::String("x".into())));
    assert!(matches!(json.get("list"), Some(JsonValue::Array(items)) if items.len() == 4));
    assert_eq!(json.get("nested"), Some(&JsonValue::Object(vec![])));
}
