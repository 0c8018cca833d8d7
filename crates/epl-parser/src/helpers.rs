//! Helper functions for decoding literal tokens

/// Parse a `0x`-prefixed hex literal, with or without an `L` suffix.
pub fn parse_hex(s: &str) -> Option<i64> {
    let digits = s.get(2..)?.trim_end_matches(['l', 'L']);
    i64::from_str_radix(digits, 16).ok()
}

/// Parse an `L`-suffixed decimal literal.
pub fn parse_long(s: &str) -> Option<i64> {
    s.trim_end_matches(['l', 'L']).parse().ok()
}

/// Parse a floating-point literal, dropping a trailing `d` or `f` type suffix.
/// Values out of `f64` range are rejected.
pub fn parse_floating(s: &str) -> Option<f64> {
    let value: f64 = s.trim_end_matches(['d', 'D', 'f', 'F']).parse().ok()?;
    value.is_finite().then_some(value)
}

/// Strip the surrounding quote characters and decode backslash escapes.
///
/// Recognizes `\n \t \r \b \f \\ \' \" \`` and `\uXXXX`; any other escaped
/// character stands for itself. Returns `None` for a malformed `\u` escape.
pub fn unescape(quoted: &str) -> Option<String> {
    let mut chars = quoted.chars();
    chars.next()?;
    chars.next_back()?;
    let body = chars.as_str();

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000c}'),
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return None;
                }
                let code = u32::from_str_radix(&hex, 16).ok()?;
                out.push(char::from_u32(code)?);
            }
            other => out.push(other),
        }
    }
    Some(out)
}
