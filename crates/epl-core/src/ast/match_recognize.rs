//! Row-pattern recognition (`match_recognize (...)`)

use serde::{Deserialize, Serialize};

use super::expr::{Expr, TimePeriod};
use crate::span::{Span, Spanned};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecognize {
    pub partition_by: Vec<Expr>,
    pub measures: Vec<MeasureItem>,
    /// `all matches`
    pub all_matches: bool,
    pub after_skip: Option<AfterSkip>,
    pub pattern: RowPattern,
    pub interval: Option<MatchInterval>,
    pub define: Vec<DefineItem>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

/// The five words after `after`, e.g. `match skip past last row`.
///
/// Kept as written; [`AfterSkip::strategy`] recognizes the supported spellings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AfterSkip {
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipStrategy {
    PastLastRow,
    ToNextRow,
    ToCurrentRow,
}

impl AfterSkip {
    pub fn strategy(&self) -> Option<SkipStrategy> {
        let words: Vec<String> = self.words.iter().map(|w| w.to_ascii_lowercase()).collect();
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        match words.as_slice() {
            ["match", "skip", "past", "last", "row"] => Some(SkipStrategy::PastLastRow),
            ["match", "skip", "to", "next", "row"] => Some(SkipStrategy::ToNextRow),
            ["match", "skip", "to", "current", "row"] => Some(SkipStrategy::ToCurrentRow),
            _ => None,
        }
    }
}

/// `interval 10 sec [or terminated]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInterval {
    pub period: TimePeriod,
    pub or_terminated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefineItem {
    pub variable: String,
    pub condition: Expr,
}

pub type RowPattern = Spanned<RowPatternKind>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowPatternKind {
    Alternation(Vec<RowPattern>),
    Concat(Vec<RowPattern>),
    /// `match_recognize_permute(A, B)`
    Permute(Vec<RowPattern>),
    Nested {
        inner: Box<RowPattern>,
        quantifier: Option<RowQuantifier>,
        repeat: Option<RepeatBounds>,
    },
    Atom {
        variable: String,
        quantifier: Option<RowQuantifier>,
        repeat: Option<RepeatBounds>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowQuantifier {
    pub kind: QuantifierKind,
    /// Trailing `?`
    pub reluctant: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantifierKind {
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
    /// `?`
    ZeroOrOne,
}

impl QuantifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuantifierKind::ZeroOrMore => "*",
            QuantifierKind::OneOrMore => "+",
            QuantifierKind::ZeroOrOne => "?",
        }
    }

    /// Minimum and maximum occurrences; `None` is unbounded.
    pub fn bounds(&self) -> (u32, Option<u32>) {
        match self {
            QuantifierKind::ZeroOrMore => (0, None),
            QuantifierKind::OneOrMore => (1, None),
            QuantifierKind::ZeroOrOne => (0, Some(1)),
        }
    }
}

/// `{m}`, `{m,}`, `{,n}`, `{m,n}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatBounds {
    pub min: Option<Expr>,
    pub max: Option<Expr>,
    pub has_comma: bool,
}

impl RowPatternKind {
    /// Variable names in the order they appear.
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_variables(self, &mut out);
        out
    }
}

fn collect_variables<'a>(kind: &'a RowPatternKind, out: &mut Vec<&'a str>) {
    match kind {
        RowPatternKind::Atom { variable, .. } => out.push(variable),
        RowPatternKind::Nested { inner, .. } => collect_variables(&inner.node, out),
        RowPatternKind::Alternation(items)
        | RowPatternKind::Concat(items)
        | RowPatternKind::Permute(items) => {
            for item in items {
                collect_variables(&item.node, out);
            }
        }
    }
}
