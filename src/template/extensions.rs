// ABOUTME: Registry of named filters and globals callable from expressions
// ABOUTME: Extensions carry their own declared name; duplicates overwrite earlier bindings

use indexmap::IndexMap;
use minijinja::{Error, Value};
use std::fmt;
use std::sync::Arc;

use super::error::{Result, TemplateError};

/// A callable exposed to the sandbox.
///
/// As a filter, `args[0]` is the piped value followed by any explicit arguments.
/// As a global, `args` are exactly the call arguments.
pub trait Extension: Send + Sync {
    fn name(&self) -> &str;

    fn call(&self, args: &[Value]) -> std::result::Result<Value, Error>;
}

pub type ExtensionFn = fn(&[Value]) -> std::result::Result<Value, Error>;

/// A plain function paired with its declared name. Build with [`named!`](crate::named).
#[derive(Clone, Copy)]
pub struct NamedFunction {
    name: &'static str,
    func: ExtensionFn,
}

impl NamedFunction {
    #[doc(hidden)]
    pub const fn from_declared(name: &'static str, func: ExtensionFn) -> Self {
        Self { name, func }
    }

    pub const fn declared_name(&self) -> &'static str {
        self.name
    }

    pub fn into_extension(self) -> Arc<dyn Extension> {
        Arc::new(self)
    }
}

impl Extension for NamedFunction {
    fn name(&self) -> &str {
        self.name
    }

    fn call(&self, args: &[Value]) -> std::result::Result<Value, Error> {
        (self.func)(args)
    }
}

impl fmt::Debug for NamedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedFunction")
            .field("name", &self.name)
            .finish()
    }
}

/// Wrap a function as an extension named after the function itself.
///
/// ```
/// use tomlj2::named;
/// use tomlj2::template::Extension;
/// use minijinja::{Error, Value};
///
/// fn shout(args: &[Value]) -> Result<Value, Error> {
///     Ok(Value::from(format!("{}!", args[0])))
/// }
///
/// assert_eq!(named!(shout).name(), "shout");
/// ```
#[macro_export]
macro_rules! named {
    ($func:ident) => {
        $crate::template::NamedFunction::from_declared(stringify!($func), $func)
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Filter,
    Global,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Filter => write!(f, "filter"),
            Role::Global => write!(f, "global"),
        }
    }
}

#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    filters: IndexMap<String, Arc<dyn Extension>>,
    globals: IndexMap<String, Arc<dyn Extension>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that an extension's declared name is usable from an expression.
    pub fn validate_name(extension: &dyn Extension) -> Result<()> {
        let name = extension.name();
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c == '_' || c.is_ascii_alphabetic());
        if valid_start && chars.all(|c| c == '_' || c.is_ascii_alphanumeric()) {
            Ok(())
        } else {
            Err(TemplateError::InvalidExtensionName {
                name: name.to_string(),
            })
        }
    }

    /// Bind an extension under its declared name, replacing any earlier binding.
    /// Returns the replaced extension, if any.
    pub fn insert(
        &mut self,
        role: Role,
        extension: Arc<dyn Extension>,
    ) -> Result<Option<Arc<dyn Extension>>> {
        Self::validate_name(extension.as_ref())?;
        let name = extension.name().to_string();
        let table = match role {
            Role::Filter => &mut self.filters,
            Role::Global => &mut self.globals,
        };
        Ok(table.insert(name, extension))
    }

    pub fn get(&self, role: Role, name: &str) -> Option<&Arc<dyn Extension>> {
        match role {
            Role::Filter => self.filters.get(name),
            Role::Global => self.globals.get(name),
        }
    }

    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.keys().map(String::as_str).collect()
    }

    pub fn global_names(&self) -> Vec<&str> {
        self.globals.keys().map(String::as_str).collect()
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("filters", &self.filter_names())
            .field("globals", &self.global_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(args: &[Value]) -> std::result::Result<Value, Error> {
        Ok(args.first().cloned().unwrap_or_default())
    }

    fn second(args: &[Value]) -> std::result::Result<Value, Error> {
        Ok(args.get(1).cloned().unwrap_or_default())
    }

    struct Anonymous;

    impl Extension for Anonymous {
        fn name(&self) -> &str {
            ""
        }

        fn call(&self, _args: &[Value]) -> std::result::Result<Value, Error> {
            Ok(Value::UNDEFINED)
        }
    }

    #[test]
    fn test_named_macro_uses_function_name() {
        let ext = named!(first);
        assert_eq!(ext.name(), "first");
        assert_eq!(ext.call(&[Value::from(3)]).unwrap(), Value::from(3));
    }

    #[test]
    fn test_duplicate_name_overwrites() {
        let mut registry = ExtensionRegistry::new();
        registry
            .insert(Role::Filter, named!(first).into_extension())
            .unwrap();
        let replaced = registry
            .insert(Role::Filter, named!(first).into_extension())
            .unwrap();
        assert!(replaced.is_some());
        assert_eq!(registry.filter_names(), vec!["first"]);
    }

    #[test]
    fn test_roles_are_separate() {
        let mut registry = ExtensionRegistry::new();
        registry
            .insert(Role::Filter, named!(first).into_extension())
            .unwrap();
        registry
            .insert(Role::Global, named!(second).into_extension())
            .unwrap();

        assert!(registry.get(Role::Filter, "first").is_some());
        assert!(registry.get(Role::Global, "first").is_none());
        assert_eq!(registry.global_names(), vec!["second"]);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = ExtensionRegistry::new();
        let result = registry.insert(Role::Global, Arc::new(Anonymous));
        assert!(matches!(
            result,
            Err(TemplateError::InvalidExtensionName { .. })
        ));
    }
}
