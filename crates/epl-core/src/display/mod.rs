//! EPL text generation via `fmt::Display`
//!
//! Every AST node prints as EPL that parses back to the same tree (spans aside).
//! Compound operands are parenthesized and names that would lex as keywords are
//! backtick-escaped, so the output is not always the shortest spelling.

mod expr;
mod pattern;
mod statement;

use std::fmt;

use crate::keywords::{needs_escape, needs_escape_in_chain};
use crate::span::Spanned;

impl<T: fmt::Display> fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node.fmt(f)
    }
}

pub(crate) fn comma_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

pub(crate) fn comma_list_fn<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    fmt_item: impl Fn(&T, &mut fmt::Formatter<'_>) -> fmt::Result,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        fmt_item(item, f)?;
    }
    Ok(())
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str, quote: char) -> fmt::Result {
    use fmt::Write;
    f.write_char(quote)?;
    for ch in text.chars() {
        match ch {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

/// Single-quoted string literal.
pub(crate) fn write_string(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    write_escaped(f, text, '\'')
}

/// Double-quoted string, used for JSON keys and values.
pub(crate) fn write_json_string(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    write_escaped(f, text, '"')
}

/// A name in a strict identifier position (aliases, stream and type names).
pub fn write_ident(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if needs_escape(name) {
        write_escaped(f, name, '`')
    } else {
        f.write_str(name)
    }
}

/// A name in a property or function position, where most keywords need no escaping.
pub(crate) fn write_name(f: &mut fmt::Formatter<'_>, name: &str, is_call: bool) -> fmt::Result {
    if needs_escape_in_chain(name, is_call) {
        write_escaped(f, name, '`')
    } else {
        f.write_str(name)
    }
}

pub(crate) fn write_alias(f: &mut fmt::Formatter<'_>, alias: &Option<String>) -> fmt::Result {
    if let Some(alias) = alias {
        f.write_str(" as ")?;
        write_name(f, alias, false)?;
    }
    Ok(())
}

pub(crate) fn write_ident_list(f: &mut fmt::Formatter<'_>, names: &[String]) -> fmt::Result {
    comma_list_fn(f, names, |name, f| write_ident(f, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ident<'a>(&'a str);

    impl fmt::Display for Ident<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write_ident(f, self.0)
        }
    }

    struct Str<'a>(&'a str);

    impl fmt::Display for Str<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write_string(f, self.0)
        }
    }

    #[test]
    fn test_ident_escaping() {
        assert_eq!(Ident("price").to_string(), "price");
        assert_eq!(Ident("order").to_string(), "`order`");
        assert_eq!(Ident("my field").to_string(), "`my field`");
        assert_eq!(Ident("a`b").to_string(), "`a\\`b`");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(Str("it's").to_string(), "'it\\'s'");
        assert_eq!(Str("a\\b\n").to_string(), "'a\\\\b\\n'");
        assert_eq!(Str("say \"hi\"").to_string(), "'say \"hi\"'");
    }
}
