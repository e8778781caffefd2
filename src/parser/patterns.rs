// ABOUTME: Shared regular expressions for locating template regions in text
// ABOUTME: Used by the syntax guard, the rewriter, and both render-time checks

use once_cell::sync::Lazy;
use regex::Regex;

/// A `{{ ... }}` expression region. Matches across newlines, shortest first.
pub static EXPRESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{\{.*?\}\}").expect("expression pattern is valid"));

/// Any template region: expression, statement, or comment.
pub static ANY_REGION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)(\{\{.*?\}\}|\{%.*?%\}|\{#.*?#\})").expect("region pattern is valid")
});

/// An expression directly after an assignment sign, capturing the whitespace
/// between them and the expression itself.
pub static ASSIGNED_EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)=(\s*)(\{\{.*?\}\})").expect("assignment pattern is valid")
});

/// Whether `text` contains an expression region anywhere.
pub fn contains_expression(text: &str) -> bool {
    EXPRESSION.is_match(text)
}

/// Whether `region` is, in its entirety, a single expression region.
pub fn is_expression(region: &str) -> bool {
    EXPRESSION
        .find(region)
        .is_some_and(|m| m.start() == 0 && m.end() == region.len())
}

/// Lexical context of a position in TOML text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    Code,
    Comment,
    BasicString,
    LiteralString,
    MultiBasicString,
    MultiLiteralString,
}

/// Whether the end of `prefix` is plain TOML code, outside every string and comment.
///
/// Bare expressions in code are skipped whole. Comments and single-line strings
/// end at a line break.
pub fn ends_in_code(prefix: &str) -> bool {
    let mut state = Lexeme::Code;
    let mut rest = prefix;

    while let Some(c) = rest.chars().next() {
        let mut step = c.len_utf8();
        state = match state {
            Lexeme::Code => {
                if rest.starts_with("{{") {
                    step = rest.find("}}").map_or(rest.len(), |end| end + 2);
                    Lexeme::Code
                } else if rest.starts_with(r#"""""#) {
                    step = 3;
                    Lexeme::MultiBasicString
                } else if rest.starts_with("'''") {
                    step = 3;
                    Lexeme::MultiLiteralString
                } else {
                    match c {
                        '"' => Lexeme::BasicString,
                        '\'' => Lexeme::LiteralString,
                        '#' => Lexeme::Comment,
                        _ => Lexeme::Code,
                    }
                }
            }
            Lexeme::Comment if c == '\n' => Lexeme::Code,
            Lexeme::Comment => Lexeme::Comment,
            Lexeme::BasicString => match c {
                '\\' => {
                    step += escaped_len(&rest[1..]);
                    Lexeme::BasicString
                }
                '"' | '\n' => Lexeme::Code,
                _ => Lexeme::BasicString,
            },
            Lexeme::LiteralString => match c {
                '\'' | '\n' => Lexeme::Code,
                _ => Lexeme::LiteralString,
            },
            Lexeme::MultiBasicString => {
                if c == '\\' {
                    step += escaped_len(&rest[1..]);
                    Lexeme::MultiBasicString
                } else if rest.starts_with(r#"""""#) {
                    step = 3;
                    Lexeme::Code
                } else {
                    Lexeme::MultiBasicString
                }
            }
            Lexeme::MultiLiteralString => {
                if rest.starts_with("'''") {
                    step = 3;
                    Lexeme::Code
                } else {
                    Lexeme::MultiLiteralString
                }
            }
        };
        rest = &rest[step..];
    }

    state == Lexeme::Code
}

/// Byte length of the character following a backslash, if any.
fn escaped_len(rest: &str) -> usize {
    rest.chars().next().map_or(0, char::len_utf8)
}
