//! Descriptor → schema nodes, registering per-node options on the way.
use crate::builder::QueryBuilder;
use crate::descriptor::{DescriptorError, NodeDescriptor, ShapeDescriptor};
use crate::registry::FieldOptions;
use crate::shape::{self, Literal, Node};
use crate::values::{enum_value, variable_placeholder, GraphqlValue, Parameters};

/// Build the node tree for `descriptor`, registering its options in `builder`.
pub fn lower_to_node(descriptor: &NodeDescriptor, builder: &mut QueryBuilder) -> Result<Node, DescriptorError> {
    lower_at(descriptor, builder, "$")
}

fn lower_at(descriptor: &NodeDescriptor, builder: &mut QueryBuilder, path: &str) -> Result<Node, DescriptorError> {
    let node = lower_shape(&descriptor.shape, builder, path)?;

    let mut options = FieldOptions { alias_for: descriptor.alias.clone(), parameters: None };
    if let Some(arguments) = &descriptor.arguments {
        let mut parameters = Parameters::with_capacity(arguments.len());
        for (name, value) in arguments {
            let value = argument_value(value).map_err(|source| DescriptorError::InvalidArgument {
                path: format!("{path}.arguments.{name}"),
                source,
            })?;
            parameters.insert(name.clone(), value);
        }
        options.parameters = Some(parameters);
    }

    if options.is_empty() {
        Ok(node)
    } else {
        Ok(builder.register_field_options(node, options))
    }
}

fn lower_shape(shape: &ShapeDescriptor, builder: &mut QueryBuilder, path: &str) -> Result<Node, DescriptorError> {
    let mut child = |d: &NodeDescriptor, segment: &str| lower_at(d, builder, &format!("{path}.{segment}"));

    let node = match shape {
        ShapeDescriptor::Object { fields } => {
            let mut lowered = Vec::with_capacity(fields.len());
            for (name, field) in fields {
                lowered.push((name.clone(), child(field, &format!("fields.{name}"))?));
            }
            shape::object(lowered)
        }
        ShapeDescriptor::Array { element } => shape::array(child(element, "element")?),
        ShapeDescriptor::Tuple { items, rest } => {
            let mut lowered = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                lowered.push(child(item, &format!("items[{i}]"))?);
            }
            match rest {
                Some(rest) => shape::tuple_with_rest(lowered, child(rest, "rest")?),
                None => shape::tuple(lowered),
            }
        }
        ShapeDescriptor::TaggedUnion { discriminator, variants } => {
            let mut lowered = Vec::with_capacity(variants.len());
            for (i, variant) in variants.iter().enumerate() {
                lowered.push(child(variant, &format!("variants[{i}]"))?);
            }
            shape::tagged_union(discriminator.clone(), lowered)
        }
        ShapeDescriptor::String => shape::string(),
        ShapeDescriptor::Number => shape::number(),
        ShapeDescriptor::Boolean => shape::boolean(),
        ShapeDescriptor::Null => shape::null(),
        ShapeDescriptor::Undefined => shape::undefined(),
        ShapeDescriptor::Literal { value } => shape::literal(literal(value, path)?),
        ShapeDescriptor::Union { options } => {
            let mut lowered = Vec::with_capacity(options.len());
            for (i, option) in options.iter().enumerate() {
                lowered.push(child(option, &format!("options[{i}]"))?);
            }
            shape::union(lowered)
        }
        ShapeDescriptor::CustomScalar { inner } => shape::custom_scalar(child(inner, "inner")?),
        ShapeDescriptor::Nullable { inner } => shape::nullable(child(inner, "inner")?),
        ShapeDescriptor::Lazy { inner } => {
            let inner = child(inner, "inner")?;
            shape::lazy(move || inner.clone())
        }
        ShapeDescriptor::Transformed { inner } => shape::transformed(child(inner, "inner")?),
        ShapeDescriptor::ReadOnly { inner } => shape::read_only(child(inner, "inner")?),
    };
    Ok(node)
}

fn literal(value: &serde_json::Value, path: &str) -> Result<Literal, DescriptorError> {
    use serde_json::Value;
    match value {
        Value::Null => Ok(Literal::Null),
        Value::Bool(b) => Ok(Literal::Boolean(*b)),
        Value::Number(n) => Ok(Literal::Number(n.clone())),
        Value::String(s) => Ok(Literal::String(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(DescriptorError::InvalidLiteral { path: path.to_owned() }),
    }
}

/// JSON → argument value, recognizing the `$enum` / `$var` marker objects.
pub fn argument_value(value: &serde_json::Value) -> Result<GraphqlValue, crate::error::BuildError> {
    use serde_json::Value;
    match value {
        Value::Array(items) => Ok(GraphqlValue::List(items.iter().map(argument_value).collect::<Result<_, _>>()?)),
        Value::Object(map) if map.len() == 1 => match map.iter().next() {
            Some((key, Value::String(name))) if key == "$enum" => enum_value(name.as_str()),
            Some((key, Value::String(name))) if key == "$var" => variable_placeholder(name.as_str()),
            _ => argument_object(map),
        },
        Value::Object(map) => argument_object(map),
        scalar => Ok(GraphqlValue::from(scalar.clone())),
    }
}

fn argument_object(map: &serde_json::Map<String, serde_json::Value>) -> Result<GraphqlValue, crate::error::BuildError> {
    let mut fields = indexmap::IndexMap::with_capacity(map.len());
    for (key, value) in map {
        fields.insert(key.clone(), argument_value(value)?);
    }
    Ok(GraphqlValue::Object(fields))
}
