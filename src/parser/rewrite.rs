// ABOUTME: Rewrites bare assigned expressions into TOML string literals
// ABOUTME: Lets the TOML parser accept `key = {{ ... }}` without touching the expression text

use regex::Captures;

use super::patterns::{ends_in_code, ASSIGNED_EXPRESSION};

const LITERAL_QUOTE: &str = "'''";
const BASIC_QUOTE: &str = "\"\"\"";

/// Wrap every `= {{ ... }}` in multi-line string quotes.
///
/// Literal quotes are preferred since TOML applies no escape processing to them.
/// The rewrite is purely textual and runs whether or not the block passed the
/// syntax guard. An `=` inside a string or comment is left alone.
pub fn quote_expressions(raw: &str) -> String {
    ASSIGNED_EXPRESSION
        .replace_all(raw, |caps: &Captures| {
            let start = caps.get(0).map_or(0, |m| m.start());
            if !ends_in_code(&raw[..start]) {
                return caps[0].to_string();
            }

            let expression = &caps[2];
            let quote = if expression.contains(LITERAL_QUOTE) {
                BASIC_QUOTE
            } else {
                LITERAL_QUOTE
            };
            format!("={}{quote}{expression}{quote}", &caps[1])
        })
        .into_owned()
}
