//! Tests for parser error handling

use epl_parser::{
    parse_json_value, parse_statement, parse_statement_with, ParseErrorKind, ParserConfig,
};

#[test]
fn test_invalid_syntax_returns_error_not_panic() {
    let invalid_inputs = [
        "",
        "select",
        "select * from",
        "select * from A#time(",
        "select a from A where a =",
        "select * from pattern [every]",
        "create window W",
        "on A merge W when matched",
        "insert into X values (1",
        "select * from A match_recognize (measures a pattern () define)",
    ];

    for input in &invalid_inputs {
        let result = parse_statement(input);
        assert!(
            result.is_err(),
            "Should return error for invalid input: {:?}",
            input
        );
    }
}

#[test]
fn test_unrecognized_character_is_lexical() {
    let err = parse_statement("select a \u{00a7} b from A").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Lexical);
    assert_eq!((err.line, err.column), (1, 10));
    assert!(err.breadcrumbs.is_empty());
}

#[test]
fn test_unterminated_string_is_lexical() {
    let err = parse_statement("select * from A where s = 'abc").unwrap_err();
    assert!(err.is_lexical());
    assert!(err.message.contains("unterminated"), "{}", err.message);
}

#[test]
fn test_missing_select_item_names_clause() {
    let err = parse_statement("select from A").unwrap_err();
    assert!(err.is_syntax());
    assert!(err.in_clause("select statement"));
    assert!(err.in_clause("select clause"));
    assert!(
        err.message.contains("'from' keyword"),
        "Error should name the offending token: {}",
        err.message
    );
}

#[test]
fn test_error_location_on_later_line() {
    let input = "select a\nfrom A\nwhere a >";
    let err = parse_statement(input).unwrap_err();
    assert_eq!(err.line, 3);
    assert!(err.in_clause("where clause"));
    assert_eq!(err.position, input.len());
}

#[test]
fn test_time_period_units_must_descend() {
    let err = parse_statement("select * from A#time(5 sec 2 hour)").unwrap_err();
    assert!(
        err.message.contains("descending order"),
        "unexpected message: {}",
        err.message
    );

    let err = parse_statement("select * from A#time(1 minute 1 minute)").unwrap_err();
    assert!(err.message.contains("descending order"));
}

#[test]
fn test_trailing_input_rejected() {
    let err = parse_statement("select * from A; select * from B").unwrap_err();
    assert!(err.message.contains("expected end of input"), "{}", err.message);
}

#[test]
fn test_unknown_statement() {
    let err = parse_statement("drop window W").unwrap_err();
    assert!(err.message.starts_with("expected statement"), "{}", err.message);
    assert_eq!(err.position, 0);
}

#[test]
fn test_merge_requires_then() {
    let err = parse_statement("on A merge W when matched delete").unwrap_err();
    assert!(err.in_clause("merge clause"));
    assert!(err.message.contains("'then'"));
}

#[test]
fn test_nesting_limit_is_an_error() {
    let config = ParserConfig {
        max_nesting_depth: 16,
        ..ParserConfig::default()
    };
    let deep = format!("select {}1{} from A", "(".repeat(40), ")".repeat(40));
    let err = parse_statement_with(&deep, &config).unwrap_err();
    assert!(err.message.contains("nesting too deep"), "{}", err.message);

    let shallow = format!("select {}1{} from A", "(".repeat(3), ")".repeat(3));
    assert!(parse_statement_with(&shallow, &config).is_ok());
}

/// Runs `f` on a thread with a 2 MiB stack, the default for spawned threads.
fn on_small_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    std::thread::Builder::new()
        .stack_size(2 << 20)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap()
}

#[test]
fn test_default_nesting_limit_fits_small_stack() {
    let limit = ParserConfig::default().max_nesting_depth;
    let (within, beyond) = on_small_stack(move || {
        let within = format!("select {}1{} from A", "(".repeat(limit - 2), ")".repeat(limit - 2));
        let beyond = format!("select {}1{} from A", "(".repeat(1000), ")".repeat(1000));
        (parse_statement(&within), parse_statement(&beyond))
    });
    assert!(within.is_ok(), "{:?}", within.err());
    let err = beyond.unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Syntax);
    assert!(err.message.contains("nesting too deep"), "{}", err.message);
}

#[test]
fn test_default_nesting_limit_covers_patterns() {
    let result = on_small_stack(|| {
        let source = format!(
            "select * from pattern [{}A{}]",
            "(".repeat(1000),
            ")".repeat(1000)
        );
        parse_statement(&source)
    });
    assert!(result.unwrap_err().message.contains("nesting too deep"));
}

#[test]
fn test_json_value_takes_one_minus_sign() {
    assert!(parse_json_value("-1").is_ok());
    assert!(parse_json_value("[-2.5, -3]").is_ok());

    let err = parse_json_value("- -1").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Syntax);
    assert!(err.message.contains("expected number"), "{}", err.message);
    assert!(parse_json_value("-'x'").is_err());
}

#[test]
fn test_long_minus_run_is_an_error_not_a_crash() {
    let result = on_small_stack(|| {
        let source = format!("{}1", "- ".repeat(200_000));
        parse_json_value(&source).map(|_| ())
    });
    assert!(result.is_err());
}

#[test]
fn test_keywords_as_identifiers_can_be_disabled() {
    let source = "select count from A";
    assert!(parse_statement(source).is_ok());

    let strict = ParserConfig {
        allow_keywords_as_identifiers: false,
        ..ParserConfig::default()
    };
    assert!(parse_statement_with(source, &strict).is_err());
    assert!(parse_statement_with("select `count` from A", &strict).is_ok());
}

#[test]
fn test_error_display_includes_breadcrumbs() {
    let err = parse_statement("select a from A group by").unwrap_err();
    let text = err.to_string();
    assert!(text.starts_with("syntax error at line 1, column 25"), "{text}");
    assert!(text.contains("while parsing select statement > group-by clause"), "{text}");
}

#[test]
fn test_garbage_input_no_panic() {
    let garbage = [
        "))))((((",
        "select select select",
        "@@@@",
        "pattern [[[[",
        "-[",
        "create dataflow F ,,,,",
        "match_recognize (",
        "\u{0}\u{1}\u{2}",
        "select * from A#",
        "on pattern [every A] insert into B select * insert",
    ];
    for input in &garbage {
        let _ = parse_statement(input);
    }
}
