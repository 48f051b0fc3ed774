use indexmap::{IndexMap, IndexSet};

use super::{name, GraphqlValue};
use crate::error::{BuildError, Result};

/// Rendered GraphQL text plus every variable it mentions, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub referenced_variables: IndexSet<String>,
}

impl Normalized {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), referenced_variables: IndexSet::new() }
    }
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
    /// Union `other`'s variables into ours, returning its text.
    pub(crate) fn absorb(&mut self, other: Normalized) -> String {
        self.referenced_variables.extend(other.referenced_variables);
        other.text
    }
}

pub fn normalize(value: &GraphqlValue) -> Result<Normalized> {
    match value {
        GraphqlValue::Null => Ok(Normalized::text("null")),
        GraphqlValue::Boolean(b) => Ok(Normalized::text(b.to_string())),
        GraphqlValue::Number(n) => Ok(Normalized::text(n.to_string())),
        GraphqlValue::String(s) => Ok(Normalized::text(quote(s))),
        GraphqlValue::Enum(e) => Ok(Normalized::text(e.as_str())),
        GraphqlValue::Variable(v) => {
            let mut out = Normalized::text(v.name());
            out.referenced_variables.insert(v.name().to_owned());
            Ok(out)
        }
        GraphqlValue::List(items) => normalize_list(items),
        GraphqlValue::Object(fields) => normalize_object(fields),
    }
}

/// `(a: 1, b: $b)`, or nothing at all for an empty argument map.
pub fn normalize_parameters(parameters: &IndexMap<String, GraphqlValue>) -> Result<Normalized> {
    let mut out = Normalized::default();
    let mut rendered = Vec::with_capacity(parameters.len());
    for (parameter_name, value) in parameters {
        if !name::is_valid_name(parameter_name) {
            return Err(BuildError::InvalidParameterName(parameter_name.clone()));
        }
        let value = out.absorb(normalize(value)?);
        rendered.push(format!("{parameter_name}: {value}"));
    }
    if !rendered.is_empty() {
        out.text = format!("({})", rendered.join(", "));
    }
    Ok(out)
}

fn normalize_list(items: &[GraphqlValue]) -> Result<Normalized> {
    let mut out = Normalized::default();
    let mut rendered = Vec::with_capacity(items.len());
    for item in items {
        rendered.push(out.absorb(normalize(item)?));
    }
    out.text = format!("[{}]", rendered.join(", "));
    Ok(out)
}

fn normalize_object(fields: &IndexMap<String, GraphqlValue>) -> Result<Normalized> {
    let mut out = Normalized::default();
    let mut rendered = Vec::with_capacity(fields.len());
    for (field_name, value) in fields {
        if !name::is_valid_name(field_name) {
            return Err(BuildError::InvalidFieldName(field_name.clone()));
        }
        let value = out.absorb(normalize(value)?);
        rendered.push(format!("{field_name}: {value}"));
    }
    out.text = format!("{{{}}}", rendered.join(", "));
    Ok(out)
}

// JSON string syntax is a subset of GraphQL's StringValue.
fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_owned()).to_string()
}
