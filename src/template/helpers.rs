// ABOUTME: Built-in extensions that can be opted into by name
// ABOUTME: Implements case, trimming, arithmetic, base64, uuid, and timestamp functions

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use minijinja::value::ValueKind;
use minijinja::{Error, ErrorKind, Value};
use std::fmt::Write as _;
use std::sync::Arc;
use uuid::Uuid;

use super::error::{Result, TemplateError};
use super::extensions::{Extension, NamedFunction, Role};
use crate::named;

const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn piped<'a>(args: &'a [Value], filter: &str) -> std::result::Result<&'a Value, Error> {
    args.first().ok_or_else(|| {
        Error::new(
            ErrorKind::MissingArgument,
            format!("{filter} requires an input value"),
        )
    })
}

/// Uppercase the input
pub fn upper(args: &[Value]) -> std::result::Result<Value, Error> {
    Ok(Value::from(piped(args, "upper")?.to_string().to_uppercase()))
}

/// Lowercase the input
pub fn lower(args: &[Value]) -> std::result::Result<Value, Error> {
    Ok(Value::from(piped(args, "lower")?.to_string().to_lowercase()))
}

pub fn trim(args: &[Value]) -> std::result::Result<Value, Error> {
    Ok(Value::from(piped(args, "trim")?.to_string().trim()))
}

/// Multiply numbers by two, repeat strings twice.
pub fn double(args: &[Value]) -> std::result::Result<Value, Error> {
    let value = piped(args, "double")?;
    match value.kind() {
        ValueKind::Number if value.is_integer() => {
            let n = i64::try_from(value.clone())?;
            n.checked_mul(2).map(Value::from).ok_or_else(|| {
                Error::new(ErrorKind::InvalidOperation, "double overflowed an integer")
            })
        }
        ValueKind::Number => Ok(Value::from(f64::try_from(value.clone())? * 2.0)),
        ValueKind::String => Ok(Value::from(value.to_string().repeat(2))),
        kind => Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("cannot double a value of kind {kind:?}"),
        )),
    }
}

/// Character count of a string, or element count of a sequence or map.
pub fn length(args: &[Value]) -> std::result::Result<Value, Error> {
    let value = piped(args, "length")?;
    value.len().map(Value::from).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("value of kind {:?} has no length", value.kind()),
        )
    })
}

pub fn base64_encode(args: &[Value]) -> std::result::Result<Value, Error> {
    let input = piped(args, "base64_encode")?.to_string();
    Ok(Value::from(BASE64.encode(input.as_bytes())))
}

pub fn base64_decode(args: &[Value]) -> std::result::Result<Value, Error> {
    let input = piped(args, "base64_decode")?.to_string();
    let bytes = BASE64.decode(input.as_bytes()).map_err(|e| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("Base64 decode error: {e}"),
        )
    })?;
    let text = String::from_utf8(bytes).map_err(|e| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("UTF-8 decode error: {e}"),
        )
    })?;
    Ok(Value::from(text))
}

/// A fresh UUID v4
pub fn uuid(_args: &[Value]) -> std::result::Result<Value, Error> {
    Ok(Value::from(Uuid::new_v4().to_string()))
}

/// Current UTC time, formatted with an optional strftime pattern.
pub fn now(args: &[Value]) -> std::result::Result<Value, Error> {
    let format = match args.first() {
        Some(value) => value.to_string(),
        None => DEFAULT_TIME_FORMAT.to_string(),
    };

    // Writing through fmt surfaces a bad pattern as an error instead of a panic
    let mut formatted = String::new();
    write!(formatted, "{}", Utc::now().format(&format)).map_err(|_| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("invalid time format {format:?}"),
        )
    })?;
    Ok(Value::from(formatted))
}

/// Built-ins usable with `|` syntax.
pub const FILTERS: &[NamedFunction] = &[
    named!(upper),
    named!(lower),
    named!(trim),
    named!(double),
    named!(length),
    named!(base64_encode),
    named!(base64_decode),
];

/// Built-ins callable by bare name.
pub const GLOBALS: &[NamedFunction] = &[named!(uuid), named!(now)];

fn table(role: Role) -> &'static [NamedFunction] {
    match role {
        Role::Filter => FILTERS,
        Role::Global => GLOBALS,
    }
}

/// Names of the built-ins available for `role`.
pub fn builtin_names(role: Role) -> Vec<&'static str> {
    table(role).iter().map(|f| f.declared_name()).collect()
}

/// Look up a built-in by name.
pub fn builtin(role: Role, name: &str) -> Result<Arc<dyn Extension>> {
    table(role)
        .iter()
        .find(|f| f.declared_name() == name)
        .map(|f| f.into_extension())
        .ok_or_else(|| TemplateError::UnknownExtension {
            role: role.to_string(),
            name: name.to_string(),
            available: builtin_names(role)
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
}

/// Resolve a list of built-in names, failing on the first unknown one.
pub fn resolve_builtins(role: Role, names: &[String]) -> Result<Vec<Arc<dyn Extension>>> {
    names.iter().map(|name| builtin(role, name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(f: fn(&[Value]) -> std::result::Result<Value, Error>, arg: Value) -> Value {
        f(&[arg]).unwrap()
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(call(upper, Value::from("hello world")), Value::from("HELLO WORLD"));
        assert_eq!(call(lower, Value::from("HELLO WORLD")), Value::from("hello world"));
        assert_eq!(call(trim, Value::from("  padded \n")), Value::from("padded"));
    }

    #[test]
    fn test_double() {
        assert_eq!(call(double, Value::from(17)), Value::from(34));
        assert_eq!(call(double, Value::from(1.5)), Value::from(3.0));
        assert_eq!(call(double, Value::from("ab")), Value::from("abab"));
        assert!(double(&[Value::from(true)]).is_err());
        assert!(double(&[]).is_err());
    }

    #[test]
    fn test_length() {
        assert_eq!(call(length, Value::from("héllo")), Value::from(5));
        assert_eq!(
            call(length, Value::from(vec![1, 2, 3])),
            Value::from(3)
        );
        assert!(length(&[Value::from(4)]).is_err());
    }

    #[test]
    fn test_base64_helpers() {
        let encoded = call(base64_encode, Value::from("hello world"));
        assert_eq!(encoded, Value::from("aGVsbG8gd29ybGQ="));
        assert_eq!(call(base64_decode, encoded), Value::from("hello world"));
        assert!(base64_decode(&[Value::from("not base64!")]).is_err());
    }

    #[test]
    fn test_uuid_global() {
        let id = uuid(&[]).unwrap().to_string();
        assert_eq!(id.len(), 36);
        assert!(id.contains('-'));
    }

    #[test]
    fn test_now_global() {
        assert!(!now(&[]).unwrap().to_string().is_empty());
        assert_eq!(now(&[Value::from("%Y")]).unwrap().to_string().len(), 4);
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(builtin(Role::Filter, "double").unwrap().name(), "double");
        assert_eq!(builtin(Role::Global, "now").unwrap().name(), "now");

        let err = builtin(Role::Global, "double").err().unwrap();
        assert!(matches!(err, TemplateError::UnknownExtension { .. }));
        assert!(err.to_string().contains("uuid"));
    }

    #[test]
    fn test_builtin_names_are_valid() {
        for role in [Role::Filter, Role::Global] {
            for f in table(role) {
                assert!(crate::template::ExtensionRegistry::validate_name(f).is_ok());
            }
        }
    }
}
