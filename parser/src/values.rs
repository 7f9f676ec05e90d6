//! Typed access to decoded argument values.

use std::collections::BTreeMap;

use command_args_core::Value;
use serde::Serialize;

use crate::error::{FailureKind, ParseFailure, Result};

/// Conversion from a decoded [`Value`] into a Rust type.
///
/// `None` means the argument was absent (an optional argument without a
/// default). Shape mismatches report [`FailureKind::InvalidValue`], absent
/// values for non-optional targets [`FailureKind::MissingArgument`].
pub trait FromValue: Sized {
    fn from_value(value: Option<&Value>) -> std::result::Result<Self, FailureKind>;
}

impl FromValue for Value {
    fn from_value(value: Option<&Value>) -> std::result::Result<Self, FailureKind> {
        value.cloned().ok_or(FailureKind::MissingArgument)
    }
}

impl FromValue for String {
    fn from_value(value: Option<&Value>) -> std::result::Result<Self, FailureKind> {
        match value {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(FailureKind::InvalidValue),
            None => Err(FailureKind::MissingArgument),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Option<&Value>) -> std::result::Result<Self, FailureKind> {
        match value {
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(FailureKind::InvalidValue),
            None => Err(FailureKind::MissingArgument),
        }
    }
}

macro_rules! integer_from_value {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Option<&Value>) -> std::result::Result<Self, FailureKind> {
                    match value {
                        Some(Value::Integer(n)) => {
                            <$ty>::try_from(*n).map_err(|_| FailureKind::InvalidValue)
                        }
                        Some(_) => Err(FailureKind::InvalidValue),
                        None => Err(FailureKind::MissingArgument),
                    }
                }
            }
        )*
    };
}

integer_from_value!(i64, i32, u32, u64, usize);

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Option<&Value>) -> std::result::Result<Self, FailureKind> {
        value.map(|v| T::from_value(Some(v))).transpose()
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Option<&Value>) -> std::result::Result<Self, FailureKind> {
        match value {
            Some(Value::Array(items)) => items.iter().map(|v| T::from_value(Some(v))).collect(),
            Some(_) => Err(FailureKind::InvalidValue),
            None => Ok(Vec::new()),
        }
    }
}

/// Decoded values of one command layer or option group, keyed by field name.
///
/// # Examples
///
/// ```
/// use command_args_core::{ArgumentSpec, CommandSpec};
/// use command_args_parser::parse;
///
/// let spec = CommandSpec::new("tool")
///     .with_argument(ArgumentSpec::option("level", &["--level"]).integer().optional())
///     .with_argument(ArgumentSpec::positional("files").array());
/// let parsed = parse(&spec, ["a", "b"]).unwrap();
///
/// let level: Option<i64> = parsed.arguments.get("level").unwrap();
/// let files: Vec<String> = parsed.arguments.get("files").unwrap();
/// assert_eq!(level, None);
/// assert_eq!(files, vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArgumentValues {
    values: BTreeMap<String, Value>,
}

impl ArgumentValues {
    /// Converts the value stored under `name`.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T> {
        T::from_value(self.values.get(name)).map_err(|kind| ParseFailure::new(kind).named(name))
    }

    /// Returns the raw decoded value, if present.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn insert(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ArgumentValues {
        let mut values = ArgumentValues::default();
        values.insert("count", Value::Integer(-2));
        values.insert("name", Value::String("x".into()));
        values.insert(
            "features",
            Value::Array(vec![Value::Integer(1), Value::Integer(2)]),
        );
        values
    }

    #[test]
    fn test_get_converts_shapes() {
        let values = sample();
        assert_eq!(values.get::<i64>("count").unwrap(), -2);
        assert_eq!(values.get::<String>("name").unwrap(), "x");
        assert_eq!(values.get::<Vec<u32>>("features").unwrap(), vec![1, 2]);
        assert_eq!(values.get::<Option<String>>("missing").unwrap(), None);
        assert!(values.get::<Vec<String>>("missing").unwrap().is_empty());
    }

    #[test]
    fn test_get_reports_mismatch() {
        let values = sample();

        let failure = values.get::<u32>("count").unwrap_err();
        assert_eq!(failure.kind, FailureKind::InvalidValue);
        assert_eq!(failure.spec_name.as_deref(), Some("count"));

        let failure = values.get::<String>("absent").unwrap_err();
        assert_eq!(failure.kind, FailureKind::MissingArgument);
    }

    #[test]
    fn test_raw_value_lookup() {
        let values = sample();
        assert_eq!(values.value("count").and_then(Value::as_integer), Some(-2));
        assert!(values.value("absent").is_none());
        assert!(values.contains("features"));
    }
}
