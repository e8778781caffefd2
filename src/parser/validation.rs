// ABOUTME: Positional validation of template regions before structural parsing
// ABOUTME: Enforces expression-only regions and expression-after-assignment placement

use tracing::debug;

use super::error::ValidationError;
use super::patterns::{ends_in_code, is_expression, ANY_REGION, EXPRESSION};

/// Opening string quotes that may sit between `=` and an expression.
const OPENING_QUOTES: [&str; 4] = ["\"\"\"", "'''", "\"", "'"];

#[derive(Debug, Clone, Default)]
pub struct SyntaxGuard;

impl SyntaxGuard {
    pub fn new() -> Self {
        Self
    }

    /// Check a block. Regions are matched on its flattened form; both rules run
    /// over every match and nothing short-circuits.
    pub fn check(&self, text: &str) -> Vec<ValidationError> {
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        let flattened = lines.join(" ");
        // Same byte offsets as `flattened`, keeping the line breaks strings and comments end at
        let layout = lines.join("\n");

        let mut errors = self.check_region_kinds(&flattened);
        errors.extend(self.check_positions(&flattened, &layout));

        if !errors.is_empty() {
            debug!("Syntax guard found {} violation(s)", errors.len());
        }
        errors
    }

    /// Every template region must be an expression region.
    fn check_region_kinds(&self, text: &str) -> Vec<ValidationError> {
        ANY_REGION
            .find_iter(text)
            .filter(|m| !is_expression(m.as_str()))
            .map(|m| ValidationError::NonExpressionRegion {
                region: m.as_str().to_string(),
            })
            .collect()
    }

    /// Every expression region must directly follow an assignment sign.
    fn check_positions(&self, flattened: &str, layout: &str) -> Vec<ValidationError> {
        EXPRESSION
            .find_iter(flattened)
            .filter(|m| !follows_assignment(&layout[..m.start()]))
            .map(|m| ValidationError::MisplacedExpression {
                region: m.as_str().to_string(),
            })
            .collect()
    }
}

/// Whether `prefix` ends in a key assignment `=`, allowing trailing whitespace and
/// at most one opening string quote right before the expression. An `=` inside a
/// string or comment is not an assignment.
fn follows_assignment(prefix: &str) -> bool {
    let unquoted = OPENING_QUOTES
        .iter()
        .find_map(|quote| prefix.strip_suffix(quote))
        .unwrap_or(prefix);
    unquoted
        .trim_end()
        .strip_suffix('=')
        .is_some_and(ends_in_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_and_quoted_assignments_pass() {
        let guard = SyntaxGuard::new();
        assert!(guard.check("name = {{ username }}").is_empty());
        assert!(guard.check("name = \"{{ username }}\"").is_empty());
        assert!(guard.check("name='{{ username }}'").is_empty());
        assert!(guard.check("name = \"\"\"{{ username }}\"\"\"").is_empty());
        assert!(guard.check("[user] name =   {{ username | upper }}").is_empty());
    }

    #[test]
    fn test_statement_region_rejected() {
        let guard = SyntaxGuard::new();
        let errors = guard.check("x = \"{% if admin %}yes{% endif %}\"");
        assert_eq!(
            errors,
            vec![
                ValidationError::NonExpressionRegion {
                    region: "{% if admin %}".to_string()
                },
                ValidationError::NonExpressionRegion {
                    region: "{% endif %}".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_comment_region_rejected() {
        let errors = SyntaxGuard::new().check("x = 1 {# note #}");
        assert_eq!(errors.len(), 1);
        assert!(errors[0]
            .to_string()
            .starts_with("Only expression syntax allowed, got: {# note #}"));
    }

    #[test]
    fn test_expression_outside_assignment() {
        let errors = SyntaxGuard::new().check("[{{ table }}] key = 1");
        assert_eq!(
            errors,
            vec![ValidationError::MisplacedExpression {
                region: "{{ table }}".to_string()
            }]
        );
    }

    #[test]
    fn test_embedded_expression_in_text_is_misplaced() {
        let errors = SyntaxGuard::new().check("greeting = \"Hello {{ name }}\"");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "Expression must appear only after '=': {{ name }}"
        );
    }

    #[test]
    fn test_equals_inside_string_is_not_assignment() {
        let guard = SyntaxGuard::new();
        let errors = guard.check("link = \"https://x.io/?user={{ username }}\"");
        assert_eq!(
            errors,
            vec![ValidationError::MisplacedExpression {
                region: "{{ username }}".to_string()
            }]
        );

        assert_eq!(guard.check("a = 1 # b = {{ c }}").len(), 1);
    }

    #[test]
    fn test_strings_and_comments_end_at_line_breaks() {
        let guard = SyntaxGuard::new();
        assert!(guard.check("# don't edit\nname = {{ username }}").is_empty());
        assert!(guard.check("query = \"a=b\"\nname = \"{{ username }}\"").is_empty());
        assert!(guard
            .check("note = \"\"\"\nsee = this\n\"\"\"\nname = {{ username }}\n")
            .is_empty());
    }

    #[test]
    fn test_each_occurrence_checked() {
        // The same expression text placed correctly once does not excuse a second copy
        let errors = SyntaxGuard::new().check("a = {{ x }} {{ x }}");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_both_rules_report_independently() {
        let errors = SyntaxGuard::new().check("{{ a }} {% raw %} b = {{ c }}");
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ValidationError::NonExpressionRegion { .. }));
        assert!(matches!(errors[1], ValidationError::MisplacedExpression { .. }));
    }
}
