//! Reserved words of EPL
//!
//! The lexer turns every word in [`RESERVED_WORDS`] into a keyword token, whatever its case.
//! A subset ([`IDENT_ALLOWED_WORDS`]) may still appear where the grammar expects an identifier;
//! the remaining words have to be written with backticks to be used as names.

/// Every keyword, lower case.
pub const RESERVED_WORDS: &[&str] = &[
    "after",
    "all",
    "and",
    "any",
    "as",
    "asc",
    "at",
    "avedev",
    "avg",
    "between",
    "by",
    "case",
    "cast",
    "coalesce",
    "context",
    "count",
    "create",
    "cube",
    "current_timestamp",
    "dataflow",
    "day",
    "days",
    "define",
    "delete",
    "desc",
    "distinct",
    "else",
    "end",
    "escape",
    "event-precedence",
    "events",
    "every",
    "every-distinct",
    "exists",
    "expression",
    "false",
    "first",
    "for",
    "from",
    "full",
    "group",
    "grouping",
    "grouping_id",
    "having",
    "hour",
    "hours",
    "in",
    "index",
    "initiated",
    "inlined_class",
    "inner",
    "insert",
    "instanceof",
    "into",
    "irstream",
    "is",
    "istream",
    "join",
    "last",
    "lastweekday",
    "left",
    "like",
    "limit",
    "match_recognize",
    "match_recognize_permute",
    "matched",
    "matches",
    "max",
    "measures",
    "median",
    "merge",
    "metadatasql",
    "microsecond",
    "microseconds",
    "millisecond",
    "milliseconds",
    "min",
    "minute",
    "minutes",
    "month",
    "months",
    "msec",
    "new",
    "not",
    "null",
    "offset",
    "on",
    "or",
    "order",
    "outer",
    "output",
    "partition",
    "pattern",
    "prev",
    "prevcount",
    "prevtail",
    "prevwindow",
    "prior",
    "regexp",
    "retain-intersection",
    "retain-union",
    "right",
    "rollup",
    "rstream",
    "schema",
    "sec",
    "second",
    "seconds",
    "select",
    "set",
    "sets",
    "snapshot",
    "some",
    "sql",
    "start",
    "stddev",
    "sum",
    "table",
    "terminated",
    "then",
    "true",
    "typeof",
    "unidirectional",
    "until",
    "update",
    "usec",
    "using",
    "values",
    "variable",
    "week",
    "weekday",
    "weeks",
    "when",
    "where",
    "while",
    "window",
    "year",
    "years",
];

/// Keywords that are also accepted as plain identifiers (property names, aliases, function names).
pub const IDENT_ALLOWED_WORDS: &[&str] = &[
    "at",
    "avedev",
    "avg",
    "cast",
    "coalesce",
    "context",
    "count",
    "cube",
    "dataflow",
    "day",
    "days",
    "define",
    "escape",
    "events",
    "every",
    "first",
    "for",
    "full",
    "grouping",
    "grouping_id",
    "hour",
    "hours",
    "index",
    "initiated",
    "instanceof",
    "join",
    "last",
    "lastweekday",
    "left",
    "matched",
    "matches",
    "max",
    "measures",
    "median",
    "merge",
    "metadatasql",
    "microsecond",
    "microseconds",
    "millisecond",
    "milliseconds",
    "min",
    "minute",
    "minutes",
    "month",
    "months",
    "msec",
    "outer",
    "partition",
    "pattern",
    "prev",
    "prevcount",
    "prevtail",
    "prevwindow",
    "prior",
    "retain-intersection",
    "retain-union",
    "right",
    "rollup",
    "schema",
    "sec",
    "second",
    "seconds",
    "sets",
    "snapshot",
    "sql",
    "start",
    "stddev",
    "sum",
    "table",
    "terminated",
    "typeof",
    "unidirectional",
    "until",
    "usec",
    "using",
    "variable",
    "week",
    "weekday",
    "weeks",
    "while",
    "window",
    "year",
    "years",
];

/// Keywords that start a builtin function call when followed by `(`.
///
/// A library function or method with one of these names has to be escaped, otherwise it
/// re-parses as the builtin.
pub const BUILTIN_FUNCTION_WORDS: &[&str] = &[
    "avedev",
    "avg",
    "cast",
    "coalesce",
    "count",
    "current_timestamp",
    "exists",
    "first",
    "grouping",
    "grouping_id",
    "instanceof",
    "istream",
    "last",
    "median",
    "prev",
    "prevcount",
    "prevtail",
    "prevwindow",
    "prior",
    "stddev",
    "sum",
    "typeof",
    "window",
];

pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

pub fn is_ident_allowed(word: &str) -> bool {
    IDENT_ALLOWED_WORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

pub fn is_builtin_function(word: &str) -> bool {
    BUILTIN_FUNCTION_WORDS
        .iter()
        .any(|k| k.eq_ignore_ascii_case(word))
}

/// True when `text` lexes as a single plain identifier token.
pub fn is_plain_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Whether a name must be backtick-escaped wherever the grammar wants a strict identifier.
pub fn needs_escape(name: &str) -> bool {
    !is_plain_identifier(name) || is_reserved(name)
}

/// Whether a name must be escaped in a property or method position, where the context-free
/// keywords are accepted unescaped.
pub fn needs_escape_in_chain(name: &str, is_call: bool) -> bool {
    if !is_plain_identifier(name) {
        return true;
    }
    if !is_reserved(name) {
        return false;
    }
    !is_ident_allowed(name) || (is_call && is_builtin_function(name))
}
