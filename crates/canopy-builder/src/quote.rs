//! String literal escaping for generated JavaScript.

/// Quote `text` as a single-quoted JavaScript string literal.
///
/// Backslash is handled first (in a single pass nothing is escaped twice),
/// then backspace, tab, line feed, vertical tab, form feed, carriage return
/// and the quote itself. U+2028 and U+2029 become `\u` escapes, as ES5 does
/// not allow them inside string literals. Every other character is copied
/// as is.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{0B}' => out.push_str("\\v"),
            '\u{0C}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\'' => out.push_str("\\'"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Read back a literal produced by [`quote`]. Returns `None` for anything
/// `quote` could not have produced.
pub fn unquote(literal: &str) -> Option<String> {
    let body = literal.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push(match chars.next()? {
                '\\' => '\\',
                'b' => '\u{08}',
                't' => '\t',
                'n' => '\n',
                'v' => '\u{0B}',
                'f' => '\u{0C}',
                'r' => '\r',
                '\'' => '\'',
                'u' => {
                    let hex: String = chars.by_ref().take(4).collect();
                    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                        return None;
                    }
                    char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?
                }
                _ => return None,
            }),
            // an unescaped quote would have ended the literal early
            '\'' => return None,
            _ => out.push(ch),
        }
    }
    Some(out)
}
