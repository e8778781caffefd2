// ABOUTME: Sandboxed template engine built on an empty minijinja environment
// ABOUTME: Renders expression strings and resolves whole value trees with per-value absence

use minijinja::value::Rest;
use minijinja::{
    AutoEscape, Environment, Error, ErrorKind, Output, State, UndefinedBehavior, Value,
};
use serde_json::Value as JsonValue;
use std::fmt::{self, Write as _};
use std::sync::Arc;
use tracing::debug;

use super::context::TemplateContext;
use super::error::Result;
use super::extensions::{Extension, ExtensionRegistry, Role};
use crate::parser::patterns::contains_expression;
use crate::parser::ValidationError;

/// Marker that makes a string scalar a render candidate.
const EXPRESSION_OPEN: &str = "{{";

#[derive(Clone)]
pub struct TemplateEngine {
    env: Environment<'static>,
    registry: ExtensionRegistry,
    context: TemplateContext,
}

impl TemplateEngine {
    /// Create a sandbox with no filters, tests, or globals beyond what gets registered.
    pub fn new(context: TemplateContext) -> Self {
        let mut env = Environment::empty();

        // Referencing anything outside the context is an error, never an empty string
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_name| AutoEscape::Html);
        env.set_formatter(markup_formatter);
        env.set_keep_trailing_newline(false);

        Self {
            env,
            registry: ExtensionRegistry::new(),
            context,
        }
    }

    /// Bound the work a single render may perform. `None` removes the bound.
    pub fn set_fuel(&mut self, fuel: Option<u64>) {
        self.env.set_fuel(fuel);
    }

    pub fn context(&self) -> &TemplateContext {
        &self.context
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// Expose an extension to expressions, replacing any binding with the same name.
    pub fn register(&mut self, role: Role, extension: Arc<dyn Extension>) -> Result<()> {
        let name = extension.name().to_string();
        let previous = self.registry.insert(role, Arc::clone(&extension))?;
        if previous.is_some() {
            debug!("Replacing {} '{}'", role, name);
        }

        match role {
            Role::Filter => self
                .env
                .add_filter(name, move |args: Rest<Value>| extension.call(&args)),
            Role::Global => self
                .env
                .add_function(name, move |args: Rest<Value>| extension.call(&args)),
        }
        Ok(())
    }

    /// Render one template string and enforce what must hold afterwards.
    pub fn render_str(&self, template: &str) -> std::result::Result<String, ValidationError> {
        let rendered = self
            .env
            .render_str(template, &self.context)
            .map_err(|e| ValidationError::Template {
                template: template.to_string(),
                message: e.to_string(),
            })?;

        if rendered.trim().is_empty() {
            return Err(ValidationError::EmptyRender {
                template: template.to_string(),
            });
        }

        if contains_expression(&rendered) {
            return Err(ValidationError::UnrenderedRemains {
                template: template.to_string(),
            });
        }

        Ok(rendered)
    }

    /// Render every expression string in `value`.
    ///
    /// A string that fails to render becomes absent (`None`) and its diagnostic is
    /// pushed onto `errors`. Absent elements are dropped from their parent mapping or
    /// sequence; siblings keep rendering. Keys and order are preserved.
    pub fn resolve_value(
        &self,
        value: &JsonValue,
        errors: &mut Vec<ValidationError>,
    ) -> Option<JsonValue> {
        match value {
            JsonValue::String(s) if s.contains(EXPRESSION_OPEN) => match self.render_str(s) {
                Ok(rendered) => Some(JsonValue::String(rendered)),
                Err(e) => {
                    debug!("Render failed: {}", e);
                    errors.push(e);
                    None
                }
            },
            JsonValue::Array(items) => Some(JsonValue::Array(
                items
                    .iter()
                    .filter_map(|item| self.resolve_value(item, errors))
                    .collect(),
            )),
            JsonValue::Object(map) => Some(JsonValue::Object(
                map.iter()
                    .filter_map(|(key, val)| {
                        self.resolve_value(val, errors)
                            .map(|resolved| (key.clone(), resolved))
                    })
                    .collect(),
            )),
            // Numbers, booleans, and plain strings pass through unchanged
            other => Some(other.clone()),
        }
    }
}

/// Write a value, escaping only `& < > " '` under HTML auto-escaping.
///
/// Paths and URLs pass through untouched; values marked safe are never escaped.
fn markup_formatter(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &Value,
) -> std::result::Result<(), Error> {
    let written = if value.is_safe() || matches!(state.auto_escape(), AutoEscape::None) {
        write!(out, "{value}")
    } else if let Some(text) = value.as_str() {
        write_escaped(out, text)
    } else {
        write_escaped(out, &value.to_string())
    };
    written.map_err(|_| Error::new(ErrorKind::WriteFailure, "could not write rendered value"))
}

fn write_escaped(out: &mut Output<'_>, text: &str) -> fmt::Result {
    let mut rest = text;
    while let Some(at) = rest.find(['&', '<', '>', '"', '\'']) {
        out.write_str(&rest[..at])?;
        out.write_str(match rest.as_bytes()[at] {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&#34;",
            _ => "&#39;",
        })?;
        rest = &rest[at + 1..];
    }
    out.write_str(rest)
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(TemplateContext::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::named;
    use serde_json::json;

    fn double(args: &[Value]) -> std::result::Result<Value, Error> {
        let n = i64::try_from(args[0].clone())?;
        Ok(Value::from(n * 2))
    }

    fn greeting(_args: &[Value]) -> std::result::Result<Value, Error> {
        Ok(Value::from("hello"))
    }

    fn engine() -> TemplateEngine {
        let context =
            TemplateContext::from_pairs([("username", json!("Alice")), ("user_age", json!(17))])
                .unwrap();
        TemplateEngine::new(context)
    }

    #[test]
    fn test_basic_template_rendering() {
        let engine = engine();
        assert_eq!(engine.render_str("{{ username }}").unwrap(), "Alice");
        assert_eq!(engine.render_str("{{ user_age }}").unwrap(), "17");
    }

    #[test]
    fn test_undefined_variable_is_strict() {
        let err = engine().render_str("{{ missing_var }}").unwrap_err();
        match err {
            ValidationError::Template { template, .. } => {
                assert!(template.contains("missing_var"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_render() {
        let err = engine().render_str("{{ '' }}").unwrap_err();
        assert_eq!(
            err,
            ValidationError::EmptyRender {
                template: "{{ '' }}".to_string()
            }
        );

        let err = engine().render_str("{{ '   ' }}").unwrap_err();
        assert!(matches!(err, ValidationError::EmptyRender { .. }));
    }

    #[test]
    fn test_output_is_html_escaped() {
        let engine = engine();
        assert_eq!(
            engine.render_str("{{ '<b>&' }}").unwrap(),
            "&lt;b&gt;&amp;"
        );
    }

    #[test]
    fn test_paths_and_urls_are_not_escaped() {
        let context = TemplateContext::from_pairs([
            ("base", json!("/srv/app")),
            ("url", json!("https://x.io/a?b=1")),
            ("quote", json!("it's \"here\"")),
        ])
        .unwrap();
        let engine = TemplateEngine::new(context);

        assert_eq!(engine.render_str("{{ base }}").unwrap(), "/srv/app");
        assert_eq!(engine.render_str("{{ url }}").unwrap(), "https://x.io/a?b=1");
        assert_eq!(
            engine.render_str("{{ quote }}").unwrap(),
            "it&#39;s &#34;here&#34;"
        );
    }

    #[test]
    fn test_echoed_markers_are_rejected() {
        let err = engine().render_str("{{ '{{ x }}' }}").unwrap_err();
        assert!(matches!(err, ValidationError::UnrenderedRemains { .. }));
    }

    #[test]
    fn test_no_builtin_filters() {
        let err = engine().render_str("{{ username | upper }}").unwrap_err();
        assert!(matches!(err, ValidationError::Template { .. }));
    }

    #[test]
    fn test_registered_filter_and_global() {
        let mut engine = engine();
        engine
            .register(Role::Filter, named!(double).into_extension())
            .unwrap();
        engine
            .register(Role::Global, named!(greeting).into_extension())
            .unwrap();

        assert_eq!(engine.render_str("{{ user_age | double }}").unwrap(), "34");
        assert_eq!(engine.render_str("{{ greeting() }}").unwrap(), "hello");
        // Roles do not leak into each other
        assert!(engine.render_str("{{ double(2) }}").is_err());
    }

    #[test]
    fn test_resolve_value_drops_failed_entries() {
        let engine = engine();
        let mut errors = Vec::new();
        let value = json!({
            "name": "{{ username }}",
            "bad": "{{ nope }}",
            "port": 8080,
            "tags": ["{{ username }}", "{{ '' }}", "plain"],
        });

        let resolved = engine.resolve_value(&value, &mut errors).unwrap();

        assert_eq!(
            resolved,
            json!({"name": "Alice", "port": 8080, "tags": ["Alice", "plain"]})
        );
        assert_eq!(errors.len(), 2);
        let keys: Vec<&String> = resolved.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["name", "port", "tags"]);
    }

    #[test]
    fn test_plain_values_pass_through() {
        let mut errors = Vec::new();
        let value = json!({"a": "text", "b": true, "c": 1.5});
        assert_eq!(engine().resolve_value(&value, &mut errors), Some(value));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_fuel_limit() {
        let mut engine = engine();
        engine.set_fuel(Some(1));
        let result = engine.render_str("{{ username ~ username ~ username ~ username }}");
        assert!(matches!(result, Err(ValidationError::Template { .. })));
    }
}
