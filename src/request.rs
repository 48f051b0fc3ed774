//! GraphQL-over-HTTP request payload.
//!
//! Sending it is someone else's job; this only pairs a built document with
//! the variable values it declares.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::builder::{OperationOptions, OperationType, QueryBuilder};
use crate::error::Result;
use crate::shape::Node;
use crate::variables::VariableDefinitions;

/// One operation variable: its GraphQL type and the value sent alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(rename = "type")]
    pub ty: String,
    pub value: serde_json::Value,
}

/// Keyed by bare name (`id`, not `$id`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variables(pub IndexMap<String, Variable>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl Variable {
    pub fn new(ty: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self { ty: ty.into(), value: value.into() }
    }
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with(mut self, name: impl Into<String>, variable: Variable) -> Self {
        self.0.insert(name.into(), variable);
        self
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// `$name -> type`, ready for the operation header.
    pub fn definitions(&self) -> VariableDefinitions {
        self.0.iter().map(|(name, v)| (format!("${name}"), v.ty.clone())).collect()
    }
    /// `{ name: value }` as sent in the payload.
    pub fn values(&self) -> serde_json::Value {
        serde_json::Value::Object(self.0.iter().map(|(name, v)| (name.clone(), v.value.clone())).collect())
    }
}

impl QueryBuilder {
    /// Build the document for `root` with `variables` declared, and wrap it
    /// in the request payload.
    pub fn request(
        &self,
        operation_type: OperationType,
        root: &Node,
        operation_name: Option<&str>,
        variables: &Variables,
    ) -> Result<OperationRequest> {
        let options = OperationOptions {
            operation_name: operation_name.map(str::to_owned),
            variable_definitions: variables.definitions(),
        };
        let query = self.build(operation_type, root, &options)?;
        Ok(OperationRequest {
            query,
            variables: Some(variables.values()),
            operation_name: options.operation_name,
        })
    }
}
