//! Expression helpers.
//!
//! Pure functions producing expression text, used as conditions and values
//! for the statement emitters. None of them write to a buffer.

use crate::quote::quote;

pub const NULL: &str = "null";
pub const TRUE: &str = "true";
pub const EMPTY_LIST: &str = "[]";
pub const EMPTY_STRING: &str = "''";

pub fn null_lit() -> &'static str {
    NULL
}

pub fn true_lit() -> &'static str {
    TRUE
}

pub fn empty_list() -> &'static str {
    EMPTY_LIST
}

pub fn empty_string() -> &'static str {
    EMPTY_STRING
}

/// `expression === '<text>'`
pub fn string_match(expression: &str, text: &str) -> String {
    format!("{expression} === {}", quote(text))
}

/// Case-insensitive comparison against a literal.
pub fn string_match_ci(expression: &str, text: &str) -> String {
    format!(
        "{expression}.toLowerCase() === {}.toLowerCase()",
        quote(text)
    )
}

/// `/<source>/.test(expression)`
///
/// `source` is a regular-expression body as written in the grammar. It is
/// normalized to a valid literal body the way `RegExp.prototype.source`
/// would: see [`regex_source`].
pub fn regex_match(source: &str, expression: &str) -> String {
    format!("/{}/.test({expression})", regex_source(source))
}

/// Escape a regular-expression body for use between `/` delimiters.
///
/// Bare `/` and line terminators are escaped, existing escapes are kept
/// as written, and an empty body becomes `(?:)`.
pub fn regex_source(source: &str) -> String {
    if source.is_empty() {
        return "(?:)".to_string();
    }
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                out.push('\\');
                match chars.next() {
                    Some(next) => push_regex_char(&mut out, next),
                    None => out.push('\\'),
                }
            }
            '/' => out.push_str("\\/"),
            _ => push_regex_char(&mut out, ch),
        }
    }
    out
}

fn push_regex_char(out: &mut String, ch: char) {
    match ch {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\u{2028}' => out.push_str("\\u2028"),
        '\u{2029}' => out.push_str("\\u2029"),
        _ => out.push(ch),
    }
}

pub fn string_length(expression: &str) -> String {
    format!("{expression}.length")
}

pub fn is_null(expression: &str) -> String {
    format!("{expression} === {NULL}")
}

/// Zero-or-negative test, used for remaining repetition counts.
pub fn is_zero(expression: &str) -> String {
    format!("{expression} <= 0")
}

pub fn and(left: &str, right: &str) -> String {
    format!("{left} && {right}")
}

/// Negation. Anything other than a plain property path is parenthesized.
pub fn not(expression: &str) -> String {
    let simple = expression
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '.'));
    if simple {
        format!("!{expression}")
    } else {
        format!("!({expression})")
    }
}

pub fn array_lookup(expression: &str, index: &str) -> String {
    format!("{expression}[{index}]")
}
