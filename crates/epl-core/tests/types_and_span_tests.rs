//! Coverage tests for epl_core type names, spans and AST Display impls.

use epl_core::ast::*;
use epl_core::keywords::{needs_escape, needs_escape_in_chain};
use epl_core::span::{line_col, Span, Spanned};
use epl_core::types::TypeName;

fn int(n: i64) -> Expr {
    Spanned::dummy(ExprKind::Literal(Literal::Int(n)))
}

fn prop(name: &str) -> Expr {
    Spanned::dummy(ExprKind::Chain(Chain::property(name, Span::dummy())))
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Spanned::dummy(ExprKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn filter(event_type: &str) -> Pattern {
    Spanned::dummy(PatternKind::Filter {
        filter: EventFilter {
            tag: None,
            event_type: event_type.into(),
            params: vec![],
            selections: vec![],
            span: Span::dummy(),
        },
        consume: None,
    })
}

fn period(parts: &[(i64, TimeUnit)]) -> TimePeriod {
    TimePeriod {
        parts: parts
            .iter()
            .map(|(n, unit)| TimePeriodPart {
                value: int(*n),
                unit: *unit,
            })
            .collect(),
        span: Span::dummy(),
    }
}

// =============================================================================
// Span Tests
// =============================================================================

#[test]
fn span_len_and_empty() {
    assert_eq!(Span::new(3, 9).len(), 6);
    assert!(Span::dummy().is_empty());
    assert!(Span::new(5, 2).is_empty());
    assert_eq!(Span::default(), Span::dummy());
}

#[test]
fn line_col_counts_characters() {
    let src = "select é\nfrom A";
    assert_eq!(line_col(src, 0), (1, 1));
    assert_eq!(line_col(src, "select é".len()), (1, 9));
    assert_eq!(line_col(src, "select é\n".len()), (2, 1));
}

#[test]
fn spanned_serializes_span() {
    let json = serde_json::to_value(Spanned::new(7, Span::new(1, 3))).unwrap();
    assert_eq!(json, serde_json::json!({"node": 7, "span": {"start": 1, "end": 3}}));
}

// =============================================================================
// Type Name Tests
// =============================================================================

#[test]
fn type_name_nested_generics_and_dimensions() {
    let ty = TypeName {
        name: "java.util.Map".into(),
        type_args: vec![
            TypeName::simple("String"),
            TypeName::simple("long").with_dimension(None),
        ],
        dimensions: vec![],
    }
    .with_dimension(None);
    assert_eq!(ty.to_string(), "java.util.Map<String, long[]>[]");
    let element = ty.element_type().unwrap();
    assert!(!element.is_array());
    assert_eq!(TypeName::simple("int").element_type(), None);
}

// =============================================================================
// Keyword Escaping
// =============================================================================

#[test]
fn escape_rules_for_names() {
    assert!(needs_escape("window"));
    assert!(!needs_escape_in_chain("window", false));
    assert!(needs_escape_in_chain("where", false));
    assert!(needs_escape_in_chain("sum", true));
    assert!(!needs_escape_in_chain("size", true));
    assert!(needs_escape("a-b"));
}

#[test]
fn chain_display_escapes_per_position() {
    let chain = Chain {
        elements: vec![
            ChainElement {
                link: ChainLink::Property("order".into()),
                dynamic: false,
                span: Span::dummy(),
            },
            ChainElement {
                link: ChainLink::Property("window".into()),
                dynamic: true,
                span: Span::dummy(),
            },
            ChainElement {
                link: ChainLink::Index(vec![int(0)]),
                dynamic: false,
                span: Span::dummy(),
            },
        ],
    };
    assert_eq!(chain.to_string(), "`order`.window?[0]");
    assert_eq!(chain.root_name(), Some("order"));
    assert_eq!(chain.as_property_path(), None);
    assert_eq!(
        Chain::property("price", Span::dummy()).as_property_path(),
        Some("price".to_string())
    );
}

// =============================================================================
// Expression Display
// =============================================================================

#[test]
fn binary_operands_parenthesized_by_precedence() {
    let sum = binary(BinaryOp::Add, prop("a"), prop("b"));
    let product = binary(BinaryOp::Mul, sum.clone(), int(2));
    assert_eq!(product.to_string(), "(a + b) * 2");

    let left_assoc = binary(BinaryOp::Sub, sum.clone(), int(1));
    assert_eq!(left_assoc.to_string(), "a + b - 1");

    let right_nested = binary(BinaryOp::Sub, int(1), sum);
    assert_eq!(right_nested.to_string(), "1 - (a + b)");
}

#[test]
fn negation_and_not_display() {
    let neg = Spanned::dummy(ExprKind::Unary {
        op: UnaryOp::Neg,
        expr: Box::new(binary(BinaryOp::Add, prop("a"), int(1))),
    });
    assert_eq!(neg.to_string(), "-(a + 1)");

    let not = Spanned::dummy(ExprKind::Unary {
        op: UnaryOp::Not,
        expr: Box::new(binary(BinaryOp::Or, prop("x"), prop("y"))),
    });
    assert_eq!(not.to_string(), "not (x or y)");
}

#[test]
fn literal_display() {
    assert_eq!(Literal::Double(2.0).to_string(), "2.0");
    assert_eq!(Literal::Double(1.5).to_string(), "1.5");
    assert_eq!(Literal::Float(3.0).to_string(), "3.0f");
    assert_eq!(Literal::Long(9).to_string(), "9L");
    assert_eq!(Literal::String("it's".into()).to_string(), "'it\\'s'");
    assert_eq!(Literal::Null.to_string(), "null");
}

#[test]
fn in_range_display_keeps_bounds() {
    let range = ExprKind::InRange {
        expr: Box::new(prop("x")),
        negated: true,
        low: Box::new(int(1)),
        high: Box::new(int(5)),
        low_closed: false,
        high_closed: true,
    };
    assert_eq!(range.to_string(), "x not in (1:5]");
}

#[test]
fn time_period_display_and_length() {
    let tp = period(&[(1, TimeUnit::Hour), (30, TimeUnit::Minute)]);
    assert_eq!(tp.to_string(), "1 hours 30 minutes");
    assert_eq!(tp.constant_micros(), Some(5_400_000_000.0));

    let variable = TimePeriod {
        parts: vec![TimePeriodPart {
            value: prop("n"),
            unit: TimeUnit::Second,
        }],
        span: Span::dummy(),
    };
    assert_eq!(variable.constant_micros(), None);
    assert!(TimeUnit::Year < TimeUnit::Microsecond);
}

#[test]
fn aggregate_is_aggregate() {
    let count = ExprKind::Builtin(BuiltinCall::Aggregate {
        func: AggregateFunc::Count,
        modifier: Some(AggregateModifier::Distinct),
        args: vec![FunctionArg::Value(TimeArg::Expr(prop("id")))],
    });
    assert!(count.is_aggregate());
    assert_eq!(count.to_string(), "count(distinct id)");
    assert!(!prop("id").node.is_aggregate());
}

// =============================================================================
// Pattern Display
// =============================================================================

#[test]
fn pattern_precedence_display() {
    let or = Spanned::dummy(PatternKind::Or(vec![filter("A"), filter("B")]));
    let every = Spanned::dummy(PatternKind::Every(Box::new(or)));
    let followed = Spanned::dummy(PatternKind::FollowedBy(vec![
        FollowedByLink {
            max: None,
            pattern: every,
        },
        FollowedByLink {
            max: Some(int(10)),
            pattern: filter("C"),
        },
    ]));
    assert_eq!(followed.to_string(), "every (A or B) -[10]> C");
    let names: Vec<&str> = followed
        .node
        .filters()
        .iter()
        .map(|f| f.event_type.as_str())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn repeat_range_forms() {
    assert!(RepeatRange::exact(int(3)).is_exact());
    let open = RepeatRange {
        low: Some(int(2)),
        high: None,
        bounded_by_colon: true,
    };
    assert_eq!(open.to_string(), "[2:]");
    assert!(!open.is_exact());
}

// =============================================================================
// Row Patterns
// =============================================================================

#[test]
fn row_pattern_variables_and_skip() {
    let atom = |name: &str| {
        Spanned::dummy(RowPatternKind::Atom {
            variable: name.into(),
            quantifier: None,
            repeat: None,
        })
    };
    let pattern = RowPatternKind::Concat(vec![
        atom("A"),
        Spanned::dummy(RowPatternKind::Nested {
            inner: Box::new(Spanned::dummy(RowPatternKind::Alternation(vec![
                atom("B"),
                atom("C"),
            ]))),
            quantifier: Some(RowQuantifier {
                kind: QuantifierKind::OneOrMore,
                reluctant: true,
            }),
            repeat: None,
        }),
    ]);
    assert_eq!(pattern.to_string(), "A (B | C)+?");
    assert_eq!(pattern.variables(), vec!["A", "B", "C"]);
    assert_eq!(QuantifierKind::ZeroOrOne.bounds(), (0, Some(1)));

    let skip = AfterSkip {
        words: ["MATCH", "skip", "to", "current", "row"]
            .iter()
            .map(|w| w.to_string())
            .collect(),
    };
    assert_eq!(skip.strategy(), Some(SkipStrategy::ToCurrentRow));
    let odd = AfterSkip {
        words: vec!["match".into(), "skip".into(), "to".into(), "last".into(), "row".into()],
    };
    assert_eq!(odd.strategy(), None);
}

// =============================================================================
// Annotations and JSON
// =============================================================================

#[test]
fn annotation_value_lookup() {
    let hint = Annotation {
        name: "Hint".into(),
        args: AnnotationArgs::Pairs(vec![(
            "reclaim_group_aged".into(),
            AnnotationValue::Literal(Literal::Int(30)),
        )]),
        span: Span::dummy(),
    };
    assert_eq!(
        hint.value(Some("RECLAIM_GROUP_AGED")),
        Some(&AnnotationValue::Literal(Literal::Int(30)))
    );
    assert_eq!(hint.value(None), None);
}

#[test]
fn json_value_get() {
    let json = JsonValue::Object(vec![
        ("a".into(), JsonValue::Int(1)),
        ("b".into(), JsonValue::Array(vec![JsonValue::Bool(true)])),
    ]);
    assert_eq!(json.get("a"), Some(&JsonValue::Int(1)));
    assert_eq!(json.get("z"), None);
    assert_eq!(JsonValue::Int(1).get("a"), None);
}
