//! Lexer for EPL using Logos

use epl_core::span::Span;
use logos::Logos;
use std::fmt;

use crate::error::{ParseError, ParseResult};
use crate::helpers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    Unrecognized,
    InvalidLiteral,
}

/// Token type for EPL
///
/// Keywords match case-insensitively. Identifiers keep their case.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token {
    // === Keywords ===
    #[token("after", ignore(ascii_case))]
    After,
    #[token("all", ignore(ascii_case))]
    All,
    #[token("and", ignore(ascii_case))]
    And,
    #[token("any", ignore(ascii_case))]
    Any,
    #[token("as", ignore(ascii_case))]
    As,
    #[token("asc", ignore(ascii_case))]
    Asc,
    #[token("at", ignore(ascii_case))]
    At,
    #[token("avedev", ignore(ascii_case))]
    Avedev,
    #[token("avg", ignore(ascii_case))]
    Avg,
    #[token("between", ignore(ascii_case))]
    Between,
    #[token("by", ignore(ascii_case))]
    By,
    #[token("case", ignore(ascii_case))]
    Case,
    #[token("cast", ignore(ascii_case))]
    Cast,
    #[token("coalesce", ignore(ascii_case))]
    Coalesce,
    #[token("context", ignore(ascii_case))]
    Context,
    #[token("count", ignore(ascii_case))]
    Count,
    #[token("create", ignore(ascii_case))]
    Create,
    #[token("cube", ignore(ascii_case))]
    Cube,
    #[token("current_timestamp", ignore(ascii_case))]
    CurrentTimestamp,
    #[token("dataflow", ignore(ascii_case))]
    Dataflow,
    #[token("day", ignore(ascii_case))]
    Day,
    #[token("days", ignore(ascii_case))]
    Days,
    #[token("define", ignore(ascii_case))]
    Define,
    #[token("delete", ignore(ascii_case))]
    Delete,
    #[token("desc", ignore(ascii_case))]
    Desc,
    #[token("distinct", ignore(ascii_case))]
    Distinct,
    #[token("else", ignore(ascii_case))]
    Else,
    #[token("end", ignore(ascii_case))]
    End,
    #[token("escape", ignore(ascii_case))]
    Escape,
    #[token("event-precedence", ignore(ascii_case))]
    EventPrecedence,
    #[token("events", ignore(ascii_case))]
    Events,
    #[token("every", ignore(ascii_case))]
    Every,
    #[token("every-distinct", ignore(ascii_case))]
    EveryDistinct,
    #[token("exists", ignore(ascii_case))]
    Exists,
    #[token("expression", ignore(ascii_case))]
    Expression,
    #[token("false", ignore(ascii_case))]
    False,
    #[token("first", ignore(ascii_case))]
    First,
    #[token("for", ignore(ascii_case))]
    For,
    #[token("from", ignore(ascii_case))]
    From,
    #[token("full", ignore(ascii_case))]
    Full,
    #[token("group", ignore(ascii_case))]
    Group,
    #[token("grouping", ignore(ascii_case))]
    Grouping,
    #[token("grouping_id", ignore(ascii_case))]
    GroupingId,
    #[token("having", ignore(ascii_case))]
    Having,
    #[token("hour", ignore(ascii_case))]
    Hour,
    #[token("hours", ignore(ascii_case))]
    Hours,
    #[token("in", ignore(ascii_case))]
    In,
    #[token("index", ignore(ascii_case))]
    Index,
    #[token("initiated", ignore(ascii_case))]
    Initiated,
    #[token("inlined_class", ignore(ascii_case))]
    InlinedClass,
    #[token("inner", ignore(ascii_case))]
    Inner,
    #[token("insert", ignore(ascii_case))]
    Insert,
    #[token("instanceof", ignore(ascii_case))]
    Instanceof,
    #[token("into", ignore(ascii_case))]
    Into,
    #[token("irstream", ignore(ascii_case))]
    Irstream,
    #[token("is", ignore(ascii_case))]
    Is,
    #[token("istream", ignore(ascii_case))]
    Istream,
    #[token("join", ignore(ascii_case))]
    Join,
    #[token("last", ignore(ascii_case))]
    Last,
    #[token("lastweekday", ignore(ascii_case))]
    Lastweekday,
    #[token("left", ignore(ascii_case))]
    Left,
    #[token("like", ignore(ascii_case))]
    Like,
    #[token("limit", ignore(ascii_case))]
    Limit,
    #[token("match_recognize", ignore(ascii_case))]
    MatchRecognize,
    #[token("match_recognize_permute", ignore(ascii_case))]
    MatchRecognizePermute,
    #[token("matched", ignore(ascii_case))]
    Matched,
    #[token("matches", ignore(ascii_case))]
    Matches,
    #[token("max", ignore(ascii_case))]
    Max,
    #[token("measures", ignore(ascii_case))]
    Measures,
    #[token("median", ignore(ascii_case))]
    Median,
    #[token("merge", ignore(ascii_case))]
    Merge,
    #[token("metadatasql", ignore(ascii_case))]
    Metadatasql,
    #[token("microsecond", ignore(ascii_case))]
    Microsecond,
    #[token("microseconds", ignore(ascii_case))]
    Microseconds,
    #[token("millisecond", ignore(ascii_case))]
    Millisecond,
    #[token("milliseconds", ignore(ascii_case))]
    Milliseconds,
    #[token("min", ignore(ascii_case))]
    Min,
    #[token("minute", ignore(ascii_case))]
    Minute,
    #[token("minutes", ignore(ascii_case))]
    Minutes,
    #[token("month", ignore(ascii_case))]
    Month,
    #[token("months", ignore(ascii_case))]
    Months,
    #[token("msec", ignore(ascii_case))]
    Msec,
    #[token("new", ignore(ascii_case))]
    New,
    #[token("not", ignore(ascii_case))]
    Not,
    #[token("null", ignore(ascii_case))]
    Null,
    #[token("offset", ignore(ascii_case))]
    Offset,
    #[token("on", ignore(ascii_case))]
    On,
    #[token("or", ignore(ascii_case))]
    Or,
    #[token("order", ignore(ascii_case))]
    Order,
    #[token("outer", ignore(ascii_case))]
    Outer,
    #[token("output", ignore(ascii_case))]
    Output,
    #[token("partition", ignore(ascii_case))]
    Partition,
    #[token("pattern", ignore(ascii_case))]
    Pattern,
    #[token("prev", ignore(ascii_case))]
    Prev,
    #[token("prevcount", ignore(ascii_case))]
    Prevcount,
    #[token("prevtail", ignore(ascii_case))]
    Prevtail,
    #[token("prevwindow", ignore(ascii_case))]
    Prevwindow,
    #[token("prior", ignore(ascii_case))]
    Prior,
    #[token("regexp", ignore(ascii_case))]
    Regexp,
    #[token("retain-intersection", ignore(ascii_case))]
    RetainIntersection,
    #[token("retain-union", ignore(ascii_case))]
    RetainUnion,
    #[token("right", ignore(ascii_case))]
    Right,
    #[token("rollup", ignore(ascii_case))]
    Rollup,
    #[token("rstream", ignore(ascii_case))]
    Rstream,
    #[token("schema", ignore(ascii_case))]
    Schema,
    #[token("sec", ignore(ascii_case))]
    Sec,
    #[token("second", ignore(ascii_case))]
    Second,
    #[token("seconds", ignore(ascii_case))]
    Seconds,
    #[token("select", ignore(ascii_case))]
    Select,
    #[token("set", ignore(ascii_case))]
    Set,
    #[token("sets", ignore(ascii_case))]
    Sets,
    #[token("snapshot", ignore(ascii_case))]
    Snapshot,
    #[token("some", ignore(ascii_case))]
    Some,
    #[token("sql", ignore(ascii_case))]
    Sql,
    #[token("start", ignore(ascii_case))]
    Start,
    #[token("stddev", ignore(ascii_case))]
    Stddev,
    #[token("sum", ignore(ascii_case))]
    Sum,
    #[token("table", ignore(ascii_case))]
    Table,
    #[token("terminated", ignore(ascii_case))]
    Terminated,
    #[token("then", ignore(ascii_case))]
    Then,
    #[token("true", ignore(ascii_case))]
    True,
    #[token("typeof", ignore(ascii_case))]
    Typeof,
    #[token("unidirectional", ignore(ascii_case))]
    Unidirectional,
    #[token("until", ignore(ascii_case))]
    Until,
    #[token("update", ignore(ascii_case))]
    Update,
    #[token("usec", ignore(ascii_case))]
    Usec,
    #[token("using", ignore(ascii_case))]
    Using,
    #[token("values", ignore(ascii_case))]
    Values,
    #[token("variable", ignore(ascii_case))]
    Variable,
    #[token("week", ignore(ascii_case))]
    Week,
    #[token("weekday", ignore(ascii_case))]
    Weekday,
    #[token("weeks", ignore(ascii_case))]
    Weeks,
    #[token("when", ignore(ascii_case))]
    When,
    #[token("where", ignore(ascii_case))]
    Where,
    #[token("while", ignore(ascii_case))]
    While,
    #[token("window", ignore(ascii_case))]
    Window,
    #[token("year", ignore(ascii_case))]
    Year,
    #[token("years", ignore(ascii_case))]
    Years,

    // === Operators ===
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    #[token("<>")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("||")]
    Concat,
    #[token("|")]
    Pipe,
    #[token("&")]
    Amp,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("->")]
    Arrow,
    #[token("=>")]
    FatArrow,
    #[token(".")]
    Dot,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("@")]
    AtSign,
    #[token("#")]
    Hash,

    // === Literals ===
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().map_err(|_| LexErrorKind::InvalidLiteral))]
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| helpers::parse_hex(lex.slice()).ok_or(LexErrorKind::InvalidLiteral))]
    Integer(i64),

    #[regex(r"[0-9]+[lL]", |lex| helpers::parse_long(lex.slice()).ok_or(LexErrorKind::InvalidLiteral))]
    #[regex(r"0[xX][0-9a-fA-F]+[lL]", |lex| helpers::parse_hex(lex.slice()).ok_or(LexErrorKind::InvalidLiteral))]
    Long(i64),

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?[dD]?", |lex| helpers::parse_floating(lex.slice()).ok_or(LexErrorKind::InvalidLiteral))]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[dD]?", |lex| helpers::parse_floating(lex.slice()).ok_or(LexErrorKind::InvalidLiteral))]
    Double(f64),

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?[fF]", |lex| helpers::parse_floating(lex.slice()).ok_or(LexErrorKind::InvalidLiteral))]
    Float(f64),

    #[regex(r"'([^'\\]|\\.)*'", |lex| helpers::unescape(lex.slice()).ok_or(LexErrorKind::InvalidLiteral))]
    SingleQuoted(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| helpers::unescape(lex.slice()).ok_or(LexErrorKind::InvalidLiteral))]
    DoubleQuoted(String),

    /// `"""..."""` text block; the content is kept verbatim
    #[regex(r#""""("?"?[^"])*""""#, |lex| {
        let s = lex.slice();
        s[3..s.len() - 3].to_string()
    })]
    TripleQuoted(String),

    // === Identifiers ===
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice().to_string())]
    Ident(String),

    /// Backtick-escaped identifier, never a keyword
    #[regex(r"`([^`\\]|\\.)*`", |lex| helpers::unescape(lex.slice()).ok_or(LexErrorKind::InvalidLiteral))]
    EscapedIdent(String),

    // === Special ===
    Eof,
}

impl Token {
    /// Lower-case spelling of a keyword token, `None` for every other token.
    pub fn keyword_text(&self) -> Option<&'static str> {
        let text = match self {
            Token::After => "after",
            Token::All => "all",
            Token::And => "and",
            Token::Any => "any",
            Token::As => "as",
            Token::Asc => "asc",
            Token::At => "at",
            Token::Avedev => "avedev",
            Token::Avg => "avg",
            Token::Between => "between",
            Token::By => "by",
            Token::Case => "case",
            Token::Cast => "cast",
            Token::Coalesce => "coalesce",
            Token::Context => "context",
            Token::Count => "count",
            Token::Create => "create",
            Token::Cube => "cube",
            Token::CurrentTimestamp => "current_timestamp",
            Token::Dataflow => "dataflow",
            Token::Day => "day",
            Token::Days => "days",
            Token::Define => "define",
            Token::Delete => "delete",
            Token::Desc => "desc",
            Token::Distinct => "distinct",
            Token::Else => "else",
            Token::End => "end",
            Token::Escape => "escape",
            Token::EventPrecedence => "event-precedence",
            Token::Events => "events",
            Token::Every => "every",
            Token::EveryDistinct => "every-distinct",
            Token::Exists => "exists",
            Token::Expression => "expression",
            Token::False => "false",
            Token::First => "first",
            Token::For => "for",
            Token::From => "from",
            Token::Full => "full",
            Token::Group => "group",
            Token::Grouping => "grouping",
            Token::GroupingId => "grouping_id",
            Token::Having => "having",
            Token::Hour => "hour",
            Token::Hours => "hours",
            Token::In => "in",
            Token::Index => "index",
            Token::Initiated => "initiated",
            Token::InlinedClass => "inlined_class",
            Token::Inner => "inner",
            Token::Insert => "insert",
            Token::Instanceof => "instanceof",
            Token::Into => "into",
            Token::Irstream => "irstream",
            Token::Is => "is",
            Token::Istream => "istream",
            Token::Join => "join",
            Token::Last => "last",
            Token::Lastweekday => "lastweekday",
            Token::Left => "left",
            Token::Like => "like",
            Token::Limit => "limit",
            Token::MatchRecognize => "match_recognize",
            Token::MatchRecognizePermute => "match_recognize_permute",
            Token::Matched => "matched",
            Token::Matches => "matches",
            Token::Max => "max",
            Token::Measures => "measures",
            Token::Median => "median",
            Token::Merge => "merge",
            Token::Metadatasql => "metadatasql",
            Token::Microsecond => "microsecond",
            Token::Microseconds => "microseconds",
            Token::Millisecond => "millisecond",
            Token::Milliseconds => "milliseconds",
            Token::Min => "min",
            Token::Minute => "minute",
            Token::Minutes => "minutes",
            Token::Month => "month",
            Token::Months => "months",
            Token::Msec => "msec",
            Token::New => "new",
            Token::Not => "not",
            Token::Null => "null",
            Token::Offset => "offset",
            Token::On => "on",
            Token::Or => "or",
            Token::Order => "order",
            Token::Outer => "outer",
            Token::Output => "output",
            Token::Partition => "partition",
            Token::Pattern => "pattern",
            Token::Prev => "prev",
            Token::Prevcount => "prevcount",
            Token::Prevtail => "prevtail",
            Token::Prevwindow => "prevwindow",
            Token::Prior => "prior",
            Token::Regexp => "regexp",
            Token::RetainIntersection => "retain-intersection",
            Token::RetainUnion => "retain-union",
            Token::Right => "right",
            Token::Rollup => "rollup",
            Token::Rstream => "rstream",
            Token::Schema => "schema",
            Token::Sec => "sec",
            Token::Second => "second",
            Token::Seconds => "seconds",
            Token::Select => "select",
            Token::Set => "set",
            Token::Sets => "sets",
            Token::Snapshot => "snapshot",
            Token::Some => "some",
            Token::Sql => "sql",
            Token::Start => "start",
            Token::Stddev => "stddev",
            Token::Sum => "sum",
            Token::Table => "table",
            Token::Terminated => "terminated",
            Token::Then => "then",
            Token::True => "true",
            Token::Typeof => "typeof",
            Token::Unidirectional => "unidirectional",
            Token::Until => "until",
            Token::Update => "update",
            Token::Usec => "usec",
            Token::Using => "using",
            Token::Values => "values",
            Token::Variable => "variable",
            Token::Week => "week",
            Token::Weekday => "weekday",
            Token::Weeks => "weeks",
            Token::When => "when",
            Token::Where => "where",
            Token::While => "while",
            Token::Window => "window",
            Token::Year => "year",
            Token::Years => "years",
            _ => return None,
        };
        Some(text)
    }

    pub fn is_keyword(&self) -> bool {
        self.keyword_text().is_some()
    }

    /// Source spelling of a punctuation or operator token.
    pub fn symbol(&self) -> Option<&'static str> {
        let text = match self {
            Token::Eq => "=",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::Lt => "<",
            Token::Le => "<=",
            Token::Gt => ">",
            Token::Ge => ">=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Concat => "||",
            Token::Pipe => "|",
            Token::Amp => "&",
            Token::Caret => "^",
            Token::Tilde => "~",
            Token::Bang => "!",
            Token::Arrow => "->",
            Token::FatArrow => "=>",
            Token::Dot => ".",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::Colon => ":",
            Token::Question => "?",
            Token::AtSign => "@",
            Token::Hash => "#",
            _ => return None,
        };
        Some(text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = self.keyword_text().or_else(|| self.symbol()) {
            return f.write_str(text);
        }
        match self {
            Token::Integer(n) => write!(f, "{n}"),
            Token::Long(n) => write!(f, "{n}L"),
            Token::Double(n) => write!(f, "{n}"),
            Token::Float(n) => write!(f, "{n}f"),
            Token::SingleQuoted(s) => write!(f, "'{s}'"),
            Token::DoubleQuoted(s) => write!(f, "\"{s}\""),
            Token::TripleQuoted(_) => f.write_str("\"\"\"...\"\"\""),
            Token::Ident(s) => f.write_str(s),
            Token::EscapedIdent(s) => write!(f, "`{s}`"),
            Token::Eof => f.write_str("end of input"),
            _ => Ok(()),
        }
    }
}

/// Token with its byte span and 1-based line/column
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
    pub line: usize,
    pub column: usize,
}

/// Tracks line and column while the lexer moves forward through the source.
struct Cursor<'a> {
    source: &'a str,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn advance_to(&mut self, offset: usize) -> (usize, usize) {
        if let Some(skipped) = self.source.get(self.offset..offset) {
            for ch in skipped.chars() {
                if ch == '\n' {
                    self.line += 1;
                    self.column = 1;
                } else {
                    self.column += 1;
                }
            }
            self.offset = offset;
        }
        (self.line, self.column)
    }
}

/// Tokenize a statement into spanned tokens, ending with [`Token::Eof`].
pub fn tokenize(source: &str) -> ParseResult<Vec<SpannedToken>> {
    let mut lexer = Token::lexer(source);
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let (line, column) = cursor.advance_to(range.start);
        match result {
            Ok(token) => tokens.push(SpannedToken {
                token,
                span: Span::new(range.start, range.end),
                line,
                column,
            }),
            Err(kind) => {
                let slice = lexer.slice();
                let message = match (kind, slice.chars().next()) {
                    (_, Some(q @ ('\'' | '"' | '`'))) if !is_closed(slice, q) => {
                        format!("unterminated literal starting with {q}")
                    }
                    (LexErrorKind::InvalidLiteral, _) => format!("invalid literal {slice}"),
                    (LexErrorKind::Unrecognized, Some(c)) => format!("unrecognized character '{c}'"),
                    (LexErrorKind::Unrecognized, None) => "unrecognized input".to_string(),
                };
                return Err(ParseError::lexical(message, range.start, line, column));
            }
        }
    }

    let end = source.len();
    let (line, column) = cursor.advance_to(end);
    tokens.push(SpannedToken {
        token: Token::Eof,
        span: Span::new(end, end),
        line,
        column,
    });
    Ok(tokens)
}

fn is_closed(slice: &str, quote: char) -> bool {
    slice.len() >= 2 && slice.ends_with(quote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use epl_core::keywords::RESERVED_WORDS;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_keywords_ignore_case() {
        assert_eq!(
            kinds("SELECT Select select FROM"),
            vec![
                Token::Select,
                Token::Select,
                Token::Select,
                Token::From,
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_every_reserved_word_is_a_keyword() {
        for word in RESERVED_WORDS {
            let tokens = kinds(word);
            assert_eq!(tokens.len(), 2, "{word} lexed as {tokens:?}");
            assert_eq!(tokens[0].keyword_text(), Some(*word));
        }
    }

    #[test]
    fn test_hyphenated_keywords() {
        assert_eq!(
            kinds("every-distinct retain-union retain-intersection event-precedence"),
            vec![
                Token::EveryDistinct,
                Token::RetainUnion,
                Token::RetainIntersection,
                Token::EventPrecedence,
                Token::Eof
            ]
        );
        assert_eq!(
            kinds("a-b"),
            vec![
                Token::Ident("a".into()),
                Token::Minus,
                Token::Ident("b".into()),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("42 7L 0x1F 1.5 2e3 3.0d 1.5f 9F"),
            vec![
                Token::Integer(42),
                Token::Long(7),
                Token::Integer(31),
                Token::Double(1.5),
                Token::Double(2000.0),
                Token::Double(3.0),
                Token::Float(1.5),
                Token::Float(9.0),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_integer_overflow_is_lexical_error() {
        let err = tokenize("select 99999999999999999999 from A").unwrap_err();
        assert!(err.is_lexical());
        assert_eq!(err.position, 7);
    }

    #[test]
    fn test_floating_overflow_is_lexical_error() {
        let err = tokenize("select 1e400 from A").unwrap_err();
        assert!(err.is_lexical());
        assert_eq!(err.position, 7);
        assert!(err.message.contains("invalid literal"), "{}", err.message);
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(
            kinds(r#"'it\'s' "a\tb" `order id` """x "y" z""""#),
            vec![
                Token::SingleQuoted("it's".into()),
                Token::DoubleQuoted("a\tb".into()),
                Token::EscapedIdent("order id".into()),
                Token::TripleQuoted("x \"y\" z".into()),
                Token::Eof
            ]
        );
        assert_eq!(kinds(r"'A'"), vec![Token::SingleQuoted("A".into()), Token::Eof]);
    }

    #[test]
    fn test_escaped_keyword_is_identifier() {
        assert_eq!(
            kinds("`select`"),
            vec![Token::EscapedIdent("select".into()), Token::Eof]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("= == != <> <= >= || | -> => # @ ?"),
            vec![
                Token::Eq,
                Token::EqEq,
                Token::NotEq,
                Token::NotEq,
                Token::Le,
                Token::Ge,
                Token::Concat,
                Token::Pipe,
                Token::Arrow,
                Token::FatArrow,
                Token::Hash,
                Token::AtSign,
                Token::Question,
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_bounded_followed_by_tokens() {
        assert_eq!(
            kinds("-[5]>"),
            vec![
                Token::Minus,
                Token::LBracket,
                Token::Integer(5),
                Token::RBracket,
                Token::Gt,
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            kinds("select // trailing\n /* block ** */ a"),
            vec![Token::Select, Token::Ident("a".into()), Token::Eof]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("select a\n  from B").unwrap();
        assert_eq!(tokens[0].span, Span::new(0, 6));
        assert_eq!((tokens[1].line, tokens[1].column), (1, 8));
        assert_eq!((tokens[2].line, tokens[2].column), (2, 3));
        assert_eq!(tokens[3].span, Span::new(16, 17));
        assert_eq!(tokens[4].token, Token::Eof);
        assert_eq!(tokens[4].span, Span::new(17, 17));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("select 'abc from A").unwrap_err();
        assert!(err.is_lexical());
        assert!(err.message.contains("unterminated"), "{}", err.message);
        assert_eq!(err.position, 7);
    }

    #[test]
    fn test_unrecognized_character() {
        let err = tokenize("select a \u{00a7} b").unwrap_err();
        assert!(err.is_lexical());
        assert_eq!((err.line, err.column), (1, 10));
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::Select.to_string(), "select");
        assert_eq!(Token::EveryDistinct.to_string(), "every-distinct");
        assert_eq!(Token::Arrow.to_string(), "->");
        assert_eq!(Token::Long(3).to_string(), "3L");
        assert_eq!(Token::Eof.to_string(), "end of input");
    }
}
