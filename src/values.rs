//! Literal GraphQL values embedded as field arguments.
//!
//! A value is plain data (scalars, lists, input objects) plus two markers
//! that are not data at all: an enum marker, rendered as a bare identifier,
//! and a variable placeholder, rendered as `$name` and tracked so the
//! operation header can be checked against it.
pub mod name;
mod normalize;

use indexmap::IndexMap;

use crate::error::{BuildError, Result};

pub use normalize::{normalize, normalize_parameters, Normalized};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq)]
pub enum GraphqlValue {
    Null,
    Boolean(bool),
    /// Kept as JSON number text so `1` stays `1` and `2.5` stays `2.5`.
    Number(serde_json::Number),
    String(String),
    List(Vec<GraphqlValue>),
    /// Input object; keys are validated when normalized.
    Object(IndexMap<String, GraphqlValue>),
    Enum(EnumValue),
    Variable(VariablePlaceholder),
}

/// Bare enum identifier, e.g. `orderBy: ASC`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue(String);

/// Reference to an operation variable, e.g. `$after`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariablePlaceholder(String);

pub type Parameters = IndexMap<String, GraphqlValue>;

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl EnumValue {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if !name::is_valid_name(&value) {
            return Err(BuildError::InvalidEnumValue(value));
        }
        Ok(Self(value))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl VariablePlaceholder {
    /// `name` includes the leading `$`.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !name::is_valid_variable_name(&name) {
            return Err(BuildError::InvalidVariablePlaceholder(name));
        }
        Ok(Self(name))
    }
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Shorthand for [`EnumValue::new`] lifted into a [`GraphqlValue`].
pub fn enum_value(value: impl Into<String>) -> Result<GraphqlValue> {
    EnumValue::new(value).map(GraphqlValue::Enum)
}

/// Shorthand for [`VariablePlaceholder::new`] lifted into a [`GraphqlValue`].
pub fn variable_placeholder(name: impl Into<String>) -> Result<GraphqlValue> {
    VariablePlaceholder::new(name).map(GraphqlValue::Variable)
}

impl GraphqlValue {
    /// Build an input object from `(key, value)` pairs, keeping their order.
    pub fn object<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<GraphqlValue>,
    {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
    pub fn list<V, I>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<GraphqlValue>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

// -------------------------------- From ------------------------------------ //

impl From<bool> for GraphqlValue {
    fn from(value: bool) -> Self { Self::Boolean(value) }
}
impl From<i32> for GraphqlValue {
    fn from(value: i32) -> Self { Self::Number(value.into()) }
}
impl From<i64> for GraphqlValue {
    fn from(value: i64) -> Self { Self::Number(value.into()) }
}
impl From<u64> for GraphqlValue {
    fn from(value: u64) -> Self { Self::Number(value.into()) }
}
impl From<f64> for GraphqlValue {
    // NaN and infinities have no literal form; JSON encoders emit `null` for them too.
    // Integral values render without a fraction, and `-0.0` as `0`.
    fn from(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
            return Self::Number((value as i64).into());
        }
        serde_json::Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
impl From<&str> for GraphqlValue {
    fn from(value: &str) -> Self { Self::String(value.to_owned()) }
}
impl From<String> for GraphqlValue {
    fn from(value: String) -> Self { Self::String(value) }
}
impl From<EnumValue> for GraphqlValue {
    fn from(value: EnumValue) -> Self { Self::Enum(value) }
}
impl From<VariablePlaceholder> for GraphqlValue {
    fn from(value: VariablePlaceholder) -> Self { Self::Variable(value) }
}
impl<T: Into<GraphqlValue>> From<Option<T>> for GraphqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
impl<T: Into<GraphqlValue>> From<Vec<T>> for GraphqlValue {
    fn from(value: Vec<T>) -> Self {
        Self::list(value)
    }
}

/// Plain JSON maps onto literals only; markers have no JSON spelling here.
impl From<serde_json::Value> for GraphqlValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Boolean(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(xs) => Self::List(xs.into_iter().map(Self::from).collect()),
            Value::Object(m) => Self::Object(m.into_iter().map(|(k, v)| (k, Self::from(v))).collect()),
        }
    }
}
