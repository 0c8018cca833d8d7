//! Context declarations (`create context ... as <detail>`)

use serde::{Deserialize, Serialize};

use super::clause::{EventFilter, PatternInclusion};
use super::expr::{Chain, Expr, TimeArg, TimePeriod};
use crate::span::Spanned;

pub type ContextDetail = Spanned<ContextDetailKind>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContextDetailKind {
    /// `context A as ..., context B as ...`
    Nested(Vec<NestedContext>),
    /// `start <point> [end <point>]`
    RangeBased {
        start: ContextStart,
        end: Option<RangePoint>,
    },
    /// `initiated [by] [distinct(...)] [@now and] [label:] <point> [terminated [by] <point>]`
    Initiated {
        distinct: Option<Vec<Expr>>,
        now: bool,
        label: Option<String>,
        start: RangePoint,
        terminated: Option<RangePoint>,
    },
    /// `partition [by] a, b from A, c from B [initiated ...] [terminated ...]`
    Partition {
        items: Vec<PartitionItem>,
        initiated: Option<Vec<ContextFilter>>,
        terminated: Option<RangePoint>,
    },
    /// `group [by] expr as name, ... from Filter`
    Grouped {
        groups: Vec<GroupItem>,
        filter: EventFilter,
    },
    /// `coalesce [by] fn(a) from A, ... granularity 64 [preallocate]`
    Coalesce {
        items: Vec<CoalesceItem>,
        granularity_name: String,
        granularity: i64,
        preallocate: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedContext {
    pub name: String,
    pub detail: ContextDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContextStart {
    /// `start @now`
    Now,
    Point(RangePoint),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RangePoint {
    Filter(ContextFilter),
    Pattern {
        pattern: PatternInclusion,
        inclusive: bool,
    },
    /// One or more parenthesized crontab parameter lists
    Crontab(Vec<Vec<TimeArg>>),
    After(TimePeriod),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextFilter {
    pub filter: EventFilter,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionItem {
    pub properties: Vec<Chain>,
    pub filter: EventFilter,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupItem {
    pub expr: Expr,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoalesceItem {
    /// Hash function call, e.g. `consistent_hash_crc32(custId)`
    pub function: Chain,
    pub filter: EventFilter,
}
