//! Build GraphQL operation documents from the schema tree that already
//! describes the response.
//!
//! ```
//! use gql_shape::prelude::*;
//!
//! let mut builder = QueryBuilder::new();
//! let user = builder.register_field_options(
//!     object([("name", string())]),
//!     FieldOptions::default().with_parameter("id", variable_placeholder("$id")?),
//! );
//! let root = object([("user", user.nullable())]);
//!
//! let document = builder.build_query(&root, &OperationOptions::default().with_variable("$id", "ID!"))?;
//! assert_eq!(document, "query ($id: ID!) { user(id: $id) { name } }");
//! # Ok::<(), gql_shape::BuildError>(())
//! ```
pub mod builder;
pub mod cli;
pub mod descriptor;
pub mod error;
pub mod lower;
pub mod path_de;
pub mod registry;
pub mod request;
pub mod shape;
pub mod values;
pub mod variables;

pub use builder::{OperationOptions, OperationType, QueryBuilder};
pub use error::BuildError;
pub use registry::{FieldOptionRegistry, FieldOptions};
pub use request::{OperationRequest, Variable, Variables};
pub use shape::{Node, NodeKind};
pub use values::{enum_value, variable_placeholder, EnumValue, GraphqlValue, VariablePlaceholder};
pub use variables::VariableDefinitions;

/// Everything needed to describe a shape and build a document from it.
pub mod prelude {
    pub use crate::builder::{OperationOptions, OperationType, QueryBuilder};
    pub use crate::registry::FieldOptions;
    pub use crate::shape::{
        array, boolean, custom_scalar, lazy, literal, null, nullable, number, object, read_only, string, tagged_union,
        transformed, tuple, tuple_with_rest, undefined, union, Node,
    };
    pub use crate::values::{enum_value, variable_placeholder, GraphqlValue};
}
