//! JSON description of a schema tree, for callers that cannot build
//! [`Node`](crate::shape::Node)s in Rust (the CLI, fixtures).
//!
//! ```json
//! { "kind": "object", "fields": {
//!     "user": { "kind": "object", "arguments": { "id": { "$var": "$id" } },
//!               "fields": { "name": { "kind": "string" } } } } }
//! ```
//!
//! Any node may carry `alias` and `arguments`; they are registered on the
//! node built from it. Arguments are plain JSON, except that
//! `{"$enum": "NAME"}` and `{"$var": "$name"}` produce an enum marker and a
//! variable placeholder.
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::BuildError;
use crate::path_de::{from_str_with_path, PathError};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Deserialize)]
pub struct NodeDescriptor {
    #[serde(flatten)]
    pub shape: ShapeDescriptor,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub arguments: Option<IndexMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeDescriptor {
    Object {
        fields: IndexMap<String, NodeDescriptor>,
    },
    Array {
        element: Box<NodeDescriptor>,
    },
    Tuple {
        items: Vec<NodeDescriptor>,
        #[serde(default)]
        rest: Option<Box<NodeDescriptor>>,
    },
    TaggedUnion {
        #[serde(default = "default_discriminator")]
        discriminator: String,
        variants: Vec<NodeDescriptor>,
    },
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    Literal {
        value: serde_json::Value,
    },
    Union {
        options: Vec<NodeDescriptor>,
    },
    CustomScalar {
        inner: Box<NodeDescriptor>,
    },
    Nullable {
        inner: Box<NodeDescriptor>,
    },
    Lazy {
        inner: Box<NodeDescriptor>,
    },
    Transformed {
        inner: Box<NodeDescriptor>,
    },
    ReadOnly {
        inner: Box<NodeDescriptor>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("invalid shape descriptor {0}")]
    Parse(#[from] PathError),
    #[error("literal at {path} must be a string, number, boolean or null")]
    InvalidLiteral { path: String },
    #[error("argument at {path}: {source}")]
    InvalidArgument { path: String, source: BuildError },
}

fn default_discriminator() -> String {
    "__typename".to_owned()
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

pub fn parse(source: &str) -> Result<NodeDescriptor, DescriptorError> {
    Ok(from_str_with_path(source)?)
}
