use once_cell::sync::Lazy;
use regex::Regex;

static GRAPHQL_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());
static VARIABLE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\$[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// `Name` production of the GraphQL grammar (fields, arguments, enum values, aliases).
pub fn is_valid_name(value: &str) -> bool {
    GRAPHQL_NAME.is_match(value)
}

/// A `$`-prefixed variable reference such as `$after`.
pub fn is_valid_variable_name(value: &str) -> bool {
    VARIABLE_NAME.is_match(value)
}
