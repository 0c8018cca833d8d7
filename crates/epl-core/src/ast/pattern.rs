//! Temporal pattern expressions (`pattern [ ... ]`)

use serde::{Deserialize, Serialize};

use super::clause::EventFilter;
use super::expr::{Expr, FunctionArg, TimeArg};
use crate::span::Spanned;

pub type Pattern = Spanned<PatternKind>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatternKind {
    /// `[tag=]Type(params)[selection] [@consume(n)]`
    Filter {
        filter: EventFilter,
        consume: Option<ConsumeLevel>,
    },
    /// `timer:interval(10 sec)`
    Observer(PatternCall),
    /// `a -> b -[5]> c`; the first link never has a bound
    FollowedBy(Vec<FollowedByLink>),
    Or(Vec<Pattern>),
    And(Vec<Pattern>),
    Every(Box<Pattern>),
    /// `every-distinct(a.id, 10 sec) A`
    EveryDistinct {
        keys: Vec<TimeArg>,
        inner: Box<Pattern>,
    },
    Not(Box<Pattern>),
    /// `[2:5] A until B`
    MatchUntil {
        range: Option<RepeatRange>,
        inner: Box<Pattern>,
        until: Option<Box<Pattern>>,
    },
    /// Repetition range attached to `every`, `not` or `every-distinct`: `every [3] A`
    Repeat {
        range: RepeatRange,
        inner: Box<Pattern>,
    },
    Guard {
        inner: Box<Pattern>,
        guard: PatternGuard,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowedByLink {
    /// Bound of `-[max]>`
    pub max: Option<Expr>,
    pub pattern: Pattern,
}

/// `@consume` filter annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumeLevel {
    pub name: String,
    pub level: Option<i64>,
}

/// Namespaced call used by observers and `where` guards: `ns:name(args)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternCall {
    pub namespace: String,
    pub name: String,
    pub args: Vec<FunctionArg>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatternGuard {
    Where(PatternCall),
    While(Expr),
}

/// `[n]`, `[lo:hi]`, `[lo:]`, `[:hi]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatRange {
    pub low: Option<Expr>,
    pub high: Option<Expr>,
    /// False only for the exact-count form `[n]`
    pub bounded_by_colon: bool,
}

impl RepeatRange {
    pub fn exact(count: Expr) -> Self {
        Self {
            low: Some(count),
            high: None,
            bounded_by_colon: false,
        }
    }

    pub fn is_exact(&self) -> bool {
        !self.bounded_by_colon
    }
}

impl PatternKind {
    /// Event filters reachable from this node, left to right.
    pub fn filters(&self) -> Vec<&EventFilter> {
        let mut out = Vec::new();
        collect_filters(self, &mut out);
        out
    }
}

fn collect_filters<'a>(kind: &'a PatternKind, out: &mut Vec<&'a EventFilter>) {
    match kind {
        PatternKind::Filter { filter, .. } => out.push(filter),
        PatternKind::Observer(_) => {}
        PatternKind::FollowedBy(links) => {
            for link in links {
                collect_filters(&link.pattern.node, out);
            }
        }
        PatternKind::Or(items) | PatternKind::And(items) => {
            for item in items {
                collect_filters(&item.node, out);
            }
        }
        PatternKind::Every(inner)
        | PatternKind::Not(inner)
        | PatternKind::EveryDistinct { inner, .. }
        | PatternKind::Repeat { inner, .. }
        | PatternKind::Guard { inner, .. } => collect_filters(&inner.node, out),
        PatternKind::MatchUntil { inner, until, .. } => {
            collect_filters(&inner.node, out);
            if let Some(until) = until {
                collect_filters(&until.node, out);
            }
        }
    }
}
