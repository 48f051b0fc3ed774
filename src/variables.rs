//! Operation variable declarations: the `($id: ID!, ...)` part of the header,
//! and the cross-check between what is declared and what the selection set
//! actually references.
use indexmap::{IndexMap, IndexSet};

use crate::error::{BuildError, Result};
use crate::values::name::is_valid_variable_name;

/// `$name -> type`, in declaration order.
pub type VariableDefinitions = IndexMap<String, String>;

/// Accepts anything the GraphQL `Type` production accepts: `Int`, `[ID!]!`, ...
///
/// Surrounding whitespace, commas and comments are ignored tokens, as in any
/// GraphQL document.
pub fn is_valid_graphql_type(ty: &str) -> bool {
    use apollo_parser::cst::CstNode;

    let ty = strip_comments(ty);
    let ty = ty.trim_matches(is_ignored);
    // The type parser only builds a tree when the input opens with a type token.
    if !ty.starts_with(|c: char| c == '[' || c == '_' || c.is_ascii_alphabetic()) {
        return false;
    }
    let tree = apollo_parser::Parser::new(ty).parse_type();
    if tree.errors().next().is_some() {
        return false;
    }
    // The parser stops after one type; anything it left unconsumed is trailing garbage.
    let parsed = tree.ty().syntax().text().to_string();
    significant(&parsed) == significant(ty)
}

fn is_ignored(c: char) -> bool {
    c.is_whitespace() || c == ',' || c == '\u{feff}'
}

// `#` runs to the end of the line; type syntax has no strings to quote one.
fn strip_comments(text: &str) -> String {
    text.lines()
        .map(|line| line.split_once('#').map_or(line, |(code, _)| code))
        .collect::<Vec<_>>()
        .join("\n")
}

fn significant(text: &str) -> String {
    text.chars().filter(|c| !is_ignored(*c)).collect()
}

pub fn serialize_variable_definitions(definitions: &VariableDefinitions) -> Result<String> {
    if definitions.is_empty() {
        return Ok(String::new());
    }
    for (name, ty) in definitions {
        if !is_valid_variable_name(name) {
            return Err(BuildError::InvalidVariableName(name.clone()));
        }
        if !is_valid_graphql_type(ty) {
            return Err(BuildError::InvalidVariableType { name: name.clone(), ty: ty.clone() });
        }
    }
    let entries = definitions
        .iter()
        .map(|(name, ty)| format!("{name}: {ty}"))
        .collect::<Vec<_>>();
    Ok(format!("({})", entries.join(", ")))
}

/// Every reference must be declared and every declaration must be referenced.
///
/// Undeclared references are checked first; only the first offender of
/// either kind is reported.
pub fn ensure_correlated(definitions: &VariableDefinitions, referenced: &IndexSet<String>) -> Result<()> {
    if let Some(missing) = referenced.iter().find(|name| !definitions.contains_key(*name)) {
        return Err(BuildError::UndefinedVariable(missing.clone()));
    }
    if let Some(unused) = definitions.keys().find(|name| !referenced.contains(*name)) {
        return Err(BuildError::UnreferencedVariable(unused.clone()));
    }
    Ok(())
}
