//! Schema tree → GraphQL operation document.
//!
//! Walks the root object's fields in declaration order. Each field becomes a
//! selector (`name`, `name: alias`, plus arguments) followed by a body that
//! depends on what the field unwraps to:
//!
//! | unwrapped field                                   | body                      |
//! |---------------------------------------------------|---------------------------|
//! | opaque scalar                                     | none                      |
//! | always-undefined leaf                             | field dropped             |
//! | object, or array / first tuple item of one        | ` { fields }`             |
//! | tagged union, or array / first tuple item of one  | ` { ... on T { .. }, .. }` |
//! | anything else                                     | none                      |
use std::fmt;

use crate::error::{BuildError, Result};
use crate::registry::{FieldOptionRegistry, FieldOptions};
use crate::shape::unwrap::unwrap;
use crate::shape::{Fields, Node, Shape, TaggedUnion, Wrapper};
use crate::values::{name, normalize_parameters, Normalized};
use crate::variables::{ensure_correlated, serialize_variable_definitions, VariableDefinitions};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Query,
    Mutation,
}

#[derive(Debug, Clone, Default)]
pub struct OperationOptions {
    pub operation_name: Option<String>,
    /// `$name -> type`; every entry must be referenced somewhere in the selection.
    pub variable_definitions: VariableDefinitions,
}

/// Owns the field option registry; register options first, then build as
/// often as needed.
#[derive(Debug, Default)]
pub struct QueryBuilder {
    registry: FieldOptionRegistry,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OperationOptions {
    pub fn named(operation_name: impl Into<String>) -> Self {
        Self { operation_name: Some(operation_name.into()), ..Self::default() }
    }
    pub fn with_variable(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.variable_definitions.insert(name.into(), ty.into());
        self
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach alias/argument options to this node instance; returns it unchanged.
    pub fn register_field_options(&mut self, node: Node, options: FieldOptions) -> Node {
        self.registry.register(node, options)
    }

    pub fn registry(&self) -> &FieldOptionRegistry {
        &self.registry
    }

    pub fn build_query(&self, root: &Node, options: &OperationOptions) -> Result<String> {
        self.build(OperationType::Query, root, options)
    }

    pub fn build_mutation(&self, root: &Node, options: &OperationOptions) -> Result<String> {
        self.build(OperationType::Mutation, root, options)
    }

    pub fn build(&self, operation_type: OperationType, root: &Node, options: &OperationOptions) -> Result<String> {
        let operation_name = options.operation_name.as_deref().filter(|n| !n.is_empty());
        if let Some(operation_name) = operation_name {
            if !name::is_valid_name(operation_name) {
                return Err(BuildError::InvalidOperationName(operation_name.to_owned()));
            }
        }

        let fields = root_fields(root)?;
        tracing::debug!(%operation_type, fields = fields.len(), "building operation");

        let mut selection = Normalized::default();
        let mut entries = Vec::with_capacity(fields.len());
        for (field_name, field) in fields {
            let field = self.serialize_field(field_name, field)?;
            if !field.is_empty() {
                entries.push(selection.absorb(field));
            }
        }

        ensure_correlated(&options.variable_definitions, &selection.referenced_variables)?;
        let header = format!(
            "{}{}",
            operation_name.unwrap_or_default(),
            serialize_variable_definitions(&options.variable_definitions)?
        );

        let document = format!("{operation_type} {}{{ {} }}", with_trailing_space(header), entries.join(", "));
        tracing::trace!(%document, "built operation");
        Ok(document)
    }

    // -------------------------------- fields ---------------------------------- //

    fn serialize_field(&self, field_name: &str, field: &Node) -> Result<Normalized> {
        let mut selector = self.field_selector(field_name, field)?;
        if field.is_opaque_scalar() {
            return Ok(selector);
        }

        let unwrapped = unwrap(field);
        if unwrapped.is_undefined() {
            return Ok(Normalized::default());
        }

        let body = if let Some(object) = selectable(&unwrapped, |n| n.fields().is_some()) {
            object.fields().map(|fields| self.serialize_object(fields)).transpose()?
        } else if let Some(union) = selectable(&unwrapped, |n| matches!(n.shape(), Shape::TaggedUnion(_))) {
            match union.shape() {
                Shape::TaggedUnion(union) => Some(self.serialize_fragments(union)?),
                _ => None,
            }
        } else {
            None
        };

        if let Some(body) = body {
            let body = selector.absorb(body);
            selector.text.push_str(&body);
        }
        Ok(selector)
    }

    fn field_selector(&self, field_name: &str, field: &Node) -> Result<Normalized> {
        let FieldOptions { alias_for, parameters } = self.registry.lookup(field);
        let mut selector = match alias_for {
            Some(alias) if !name::is_valid_name(&alias) => return Err(BuildError::InvalidAlias(alias)),
            Some(alias) => Normalized::text(format!("{field_name}: {alias}")),
            None => Normalized::text(field_name),
        };
        if let Some(parameters) = parameters {
            let arguments = selector.absorb(normalize_parameters(&parameters)?);
            selector.text.push_str(&arguments);
        }
        Ok(selector)
    }

    fn serialize_object(&self, fields: &Fields) -> Result<Normalized> {
        let mut out = Normalized::default();
        let mut entries = Vec::with_capacity(fields.len());
        for (field_name, field) in fields {
            let field = self.serialize_field(field_name, field)?;
            if !field.is_empty() {
                entries.push(out.absorb(field));
            }
        }
        out.text = format!(" {{ {} }}", entries.join(", "));
        Ok(out)
    }

    fn serialize_fragments(&self, union: &TaggedUnion) -> Result<Normalized> {
        let mut out = Normalized::default();
        let mut fragments = Vec::with_capacity(union.variants.len());
        for (index, variant) in union.variants.iter().enumerate() {
            let tag = union.tag(index).ok_or(BuildError::UnresolvableFragment(index))?;
            let variant = unwrap(variant);
            let fields = variant.fields().ok_or(BuildError::UnresolvableFragment(index))?;
            let body = out.absorb(self.serialize_object(fields)?);
            fragments.push(format!("... on {tag}{body}"));
        }
        out.text = format!(" {{ {} }}", fragments.join(", "));
        Ok(out)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// The root is an object, optionally behind one read-only wrapper.
fn root_fields(root: &Node) -> Result<&Fields> {
    let object = match root.shape() {
        Shape::Wrapper(Wrapper::ReadOnly(inner)) => inner,
        _ => root,
    };
    object.fields().ok_or_else(|| BuildError::RootNotObject(object.kind().name()))
}

/// `node` itself, or the unwrapped element of an array / first item of a
/// tuple, when it satisfies `accept`. Only one level of list is looked through.
fn selectable(node: &Node, accept: impl Fn(&Node) -> bool) -> Option<Node> {
    if accept(node) {
        return Some(node.clone());
    }
    let element = match node.shape() {
        Shape::Array(element) => unwrap(element),
        Shape::Tuple { items, .. } => unwrap(items.first()?),
        _ => return None,
    };
    accept(&element).then_some(element)
}

fn with_trailing_space(value: String) -> String {
    if value.is_empty() { value } else { format!("{value} ") }
}
