//! Everything that can abort a document build.
//!
//! Messages are part of the contract: callers (and tests) match on them
//! verbatim, so keep the wording stable.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Field name \"{0}\" is not a valid GraphQL field name")]
    InvalidFieldName(String),

    #[error("Parameter name \"{0}\" is not a valid GraphQL parameter name")]
    InvalidParameterName(String),

    #[error("Enum value \"{0}\" is not a valid enum value")]
    InvalidEnumValue(String),

    /// A placeholder was constructed from something that is not `$name`.
    #[error("Variable \"{0}\" is not a valid variable name")]
    InvalidVariablePlaceholder(String),

    #[error("Variable name \"{0}\" is not a valid GraphQL variable name")]
    InvalidVariableName(String),

    #[error("Type \"{ty}\" for variable \"{name}\" is invalid")]
    InvalidVariableType { name: String, ty: String },

    #[error("Alias \"{0}\" is not a valid GraphQL name")]
    InvalidAlias(String),

    #[error("Operation name \"{0}\" is not a valid GraphQL name")]
    InvalidOperationName(String),

    /// A tagged-union variant whose discriminator field holds no usable literal.
    #[error("Fragment name for index {0} is undefined")]
    UnresolvableFragment(usize),

    #[error("The root of an operation must be an object schema, got {0}")]
    RootNotObject(&'static str),

    #[error("Referenced variable \"{0}\" is missing in variableDefinitions")]
    UndefinedVariable(String),

    #[error("Variable definition for \"{0}\" is never referenced")]
    UnreferencedVariable(String),
}

pub type Result<T, E = BuildError> = std::result::Result<T, E>;
