use std::fmt;

use super::{comma_list, comma_list_fn, write_alias, write_escaped, write_ident, write_name};
use crate::ast::*;

const FOLLOWED_BY: u8 = 0;
const OR: u8 = 1;
const AND: u8 = 2;
const MATCH_UNTIL: u8 = 3;
const QUALIFY: u8 = 4;
const GUARD: u8 = 5;
const ATOM: u8 = 6;

fn level(kind: &PatternKind) -> u8 {
    match kind {
        PatternKind::FollowedBy(_) => FOLLOWED_BY,
        PatternKind::Or(_) => OR,
        PatternKind::And(_) => AND,
        PatternKind::MatchUntil { .. } => MATCH_UNTIL,
        PatternKind::Every(_)
        | PatternKind::Not(_)
        | PatternKind::EveryDistinct { .. }
        | PatternKind::Repeat { .. } => QUALIFY,
        PatternKind::Guard { .. } => GUARD,
        PatternKind::Filter { .. } | PatternKind::Observer(_) => ATOM,
    }
}

fn write_child(f: &mut fmt::Formatter<'_>, pattern: &Pattern, parent: u8) -> fmt::Result {
    if level(&pattern.node) <= parent {
        write!(f, "({pattern})")
    } else {
        write!(f, "{pattern}")
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Pattern], sep: &str, parent: u8) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write_child(f, item, parent)?;
    }
    Ok(())
}

/// Operand of `every`, `not` and `every-distinct`; a repetition range is written
/// between the qualifier and its operand.
fn write_qualified(f: &mut fmt::Formatter<'_>, inner: &Pattern) -> fmt::Result {
    match &inner.node {
        PatternKind::Repeat { range, inner } => {
            write!(f, "{range} ")?;
            write_child(f, inner, QUALIFY)
        }
        _ => write_child(f, inner, QUALIFY),
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternKind::Filter { filter, consume } => {
                write!(f, "{filter}")?;
                if let Some(consume) = consume {
                    f.write_str(" @")?;
                    write_ident(f, &consume.name)?;
                    if let Some(level) = consume.level {
                        write!(f, "({level})")?;
                    }
                }
                Ok(())
            }
            PatternKind::Observer(call) => write!(f, "{call}"),
            PatternKind::FollowedBy(links) => {
                for (i, link) in links.iter().enumerate() {
                    if i > 0 {
                        match &link.max {
                            Some(max) => write!(f, " -[{max}]> ")?,
                            None => f.write_str(" -> ")?,
                        }
                    }
                    write_child(f, &link.pattern, FOLLOWED_BY)?;
                }
                Ok(())
            }
            PatternKind::Or(items) => write_joined(f, items, " or ", OR),
            PatternKind::And(items) => write_joined(f, items, " and ", AND),
            PatternKind::Every(inner) => {
                f.write_str("every ")?;
                write_qualified(f, inner)
            }
            PatternKind::Not(inner) => {
                f.write_str("not ")?;
                write_qualified(f, inner)
            }
            PatternKind::EveryDistinct { keys, inner } => {
                f.write_str("every-distinct(")?;
                comma_list(f, keys)?;
                f.write_str(") ")?;
                write_qualified(f, inner)
            }
            PatternKind::MatchUntil {
                range,
                inner,
                until,
            } => {
                if let Some(range) = range {
                    write!(f, "{range} ")?;
                }
                write_child(f, inner, MATCH_UNTIL)?;
                if let Some(until) = until {
                    f.write_str(" until ")?;
                    write_child(f, until, MATCH_UNTIL)?;
                }
                Ok(())
            }
            PatternKind::Repeat { range, inner } => {
                write!(f, "{range} ")?;
                write_child(f, inner, QUALIFY)
            }
            PatternKind::Guard { inner, guard } => {
                write_child(f, inner, GUARD)?;
                match guard {
                    PatternGuard::Where(call) => write!(f, " where {call}"),
                    PatternGuard::While(expr) => write!(f, " while ({expr})"),
                }
            }
        }
    }
}

impl fmt::Display for PatternCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_name(f, &self.namespace, false)?;
        f.write_str(":")?;
        write_name(f, &self.name, false)?;
        f.write_str("(")?;
        comma_list(f, &self.args)?;
        f.write_str(")")
    }
}

impl fmt::Display for RepeatRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if let Some(low) = &self.low {
            write!(f, "{low}")?;
        }
        if self.bounded_by_colon {
            f.write_str(":")?;
            if let Some(high) = &self.high {
                write!(f, "{high}")?;
            }
        }
        f.write_str("]")
    }
}

impl fmt::Display for PatternInclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("pattern ")?;
        for annotation in &self.annotations {
            write!(f, "{annotation} ")?;
        }
        write!(f, "[{}]", self.pattern)
    }
}

impl fmt::Display for MatchRecognize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("match_recognize (")?;
        if !self.partition_by.is_empty() {
            f.write_str("partition by ")?;
            comma_list(f, &self.partition_by)?;
            f.write_str(" ")?;
        }
        f.write_str("measures ")?;
        comma_list_fn(f, &self.measures, |m, f| {
            write!(f, "{}", m.expr)?;
            write_alias(f, &m.alias)
        })?;
        if self.all_matches {
            f.write_str(" all matches")?;
        }
        if let Some(skip) = &self.after_skip {
            f.write_str(" after")?;
            for word in &skip.words {
                write!(f, " {word}")?;
            }
        }
        write!(f, " pattern ({})", self.pattern)?;
        if let Some(interval) = &self.interval {
            write!(f, " interval {}", interval.period)?;
            if interval.or_terminated {
                f.write_str(" or terminated")?;
            }
        }
        if !self.define.is_empty() {
            f.write_str(" define ")?;
            comma_list_fn(f, &self.define, |d, f| {
                write_name(f, &d.variable, false)?;
                write!(f, " as {}", d.condition)
            })?;
        }
        f.write_str(")")
    }
}

fn write_row_suffix(
    f: &mut fmt::Formatter<'_>,
    quantifier: &Option<RowQuantifier>,
    repeat: &Option<RepeatBounds>,
) -> fmt::Result {
    if let Some(q) = quantifier {
        f.write_str(q.kind.as_str())?;
        if q.reluctant {
            f.write_str("?")?;
        }
    }
    if let Some(bounds) = repeat {
        f.write_str("{")?;
        if let Some(min) = &bounds.min {
            write!(f, "{min}")?;
        }
        if bounds.has_comma {
            f.write_str(",")?;
            if let Some(max) = &bounds.max {
                write!(f, "{max}")?;
            }
        }
        f.write_str("}")?;
    }
    Ok(())
}

impl fmt::Display for RowPatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowPatternKind::Alternation(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            RowPatternKind::Concat(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            RowPatternKind::Permute(items) => {
                f.write_str("match_recognize_permute(")?;
                comma_list(f, items)?;
                f.write_str(")")
            }
            RowPatternKind::Nested {
                inner,
                quantifier,
                repeat,
            } => {
                write!(f, "({inner})")?;
                write_row_suffix(f, quantifier, repeat)
            }
            RowPatternKind::Atom {
                variable,
                quantifier,
                repeat,
            } => {
                // `permute (` would read as a permutation
                if variable.eq_ignore_ascii_case("permute") {
                    write_escaped(f, variable, '`')?;
                } else {
                    write_name(f, variable, false)?;
                }
                write_row_suffix(f, quantifier, repeat)
            }
        }
    }
}

impl fmt::Display for ContextDetailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextDetailKind::Nested(contexts) => comma_list_fn(f, contexts, |c, f| {
                f.write_str("context ")?;
                write_ident(f, &c.name)?;
                write!(f, " as {}", c.detail)
            }),
            ContextDetailKind::RangeBased { start, end } => {
                f.write_str("start ")?;
                match start {
                    ContextStart::Now => f.write_str("@now")?,
                    ContextStart::Point(point) => write!(f, "{point}")?,
                }
                if let Some(end) = end {
                    write!(f, " end {end}")?;
                }
                Ok(())
            }
            ContextDetailKind::Initiated {
                distinct,
                now,
                label,
                start,
                terminated,
            } => {
                f.write_str("initiated by ")?;
                if let Some(keys) = distinct {
                    f.write_str("distinct(")?;
                    comma_list(f, keys)?;
                    f.write_str(") ")?;
                }
                if *now {
                    f.write_str("@now and ")?;
                }
                if let Some(label) = label {
                    write_ident(f, label)?;
                    f.write_str(":")?;
                }
                write!(f, "{start}")?;
                if let Some(end) = terminated {
                    write!(f, " terminated by {end}")?;
                }
                Ok(())
            }
            ContextDetailKind::Partition {
                items,
                initiated,
                terminated,
            } => {
                f.write_str("partition by ")?;
                comma_list_fn(f, items, |item, f| {
                    for (i, property) in item.properties.iter().enumerate() {
                        if i > 0 {
                            f.write_str(" and ")?;
                        }
                        write!(f, "{property}")?;
                    }
                    write!(f, " from {}", item.filter)?;
                    write_alias(f, &item.alias)
                })?;
                if let Some(filters) = initiated {
                    f.write_str(" initiated by ")?;
                    comma_list(f, filters)?;
                }
                if let Some(end) = terminated {
                    write!(f, " terminated by {end}")?;
                }
                Ok(())
            }
            ContextDetailKind::Grouped { groups, filter } => {
                comma_list_fn(f, groups, |g, f| {
                    write!(f, "group by {} as ", g.expr)?;
                    write_name(f, &g.label, false)
                })?;
                write!(f, " from {filter}")
            }
            ContextDetailKind::Coalesce {
                items,
                granularity_name,
                granularity,
                preallocate,
            } => {
                f.write_str("coalesce by ")?;
                comma_list_fn(f, items, |item, f| {
                    write!(f, "{} from {}", item.function, item.filter)
                })?;
                f.write_str(" ")?;
                write_name(f, granularity_name, false)?;
                write!(f, " {granularity}")?;
                if let Some(flag) = preallocate {
                    f.write_str(" ")?;
                    write_name(f, flag, false)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for RangePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangePoint::Filter(filter) => write!(f, "{filter}"),
            RangePoint::Pattern { pattern, inclusive } => {
                write!(f, "{pattern}")?;
                if *inclusive {
                    f.write_str(" @inclusive")?;
                }
                Ok(())
            }
            RangePoint::Crontab(lists) => comma_list_fn(f, lists, |list, f| {
                f.write_str("(")?;
                comma_list(f, list)?;
                f.write_str(")")
            }),
            RangePoint::After(period) => write!(f, "after {period}"),
        }
    }
}

impl fmt::Display for ContextFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.filter)?;
        write_alias(f, &self.alias)
    }
}
