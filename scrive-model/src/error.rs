//! Error types for the entity framework.

use thiserror::Error;

/// Result type for entity operations.
pub type Result<T> = std::result::Result<T, ScriveError>;

/// A value was rejected by an attribute rule.
///
/// Every variant is attributable to exactly one attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The value has the wrong type altogether.
    #[error("{attribute} must be {expected}, not {value}")]
    TypeMismatch {
        attribute: String,
        expected: String,
        value: String,
    },

    /// The value has the right type but lies outside the accepted bounds.
    #[error("{attribute} must be {bounds}, not: {value}")]
    RangeViolation {
        attribute: String,
        bounds: String,
        value: String,
    },

    /// A float was given where a whole number is required.
    #[error("{attribute} must be a round number, not: {value}")]
    NotRound { attribute: String, value: String },

    /// Empty text given where non-empty text is required.
    #[error("{attribute} must be non-empty text")]
    Empty { attribute: String },

    /// Text that names no variant of the enum.
    #[error("{attribute} could be {enum_name}'s variant name, not: {value}")]
    EnumNameMismatch {
        attribute: String,
        enum_name: String,
        value: String,
    },

    /// One element of a collection failed; only the first failure is reported.
    #[error("{attribute} must be {expected}: elem must be {element_type}, not {value}")]
    CompositeElementInvalid {
        attribute: String,
        expected: String,
        element_type: String,
        value: String,
    },
}

impl ValidationError {
    /// The attribute the failure belongs to.
    #[must_use]
    pub fn attribute(&self) -> &str {
        match self {
            Self::TypeMismatch { attribute, .. }
            | Self::RangeViolation { attribute, .. }
            | Self::NotRound { attribute, .. }
            | Self::Empty { attribute }
            | Self::EnumNameMismatch { attribute, .. }
            | Self::CompositeElementInvalid { attribute, .. } => attribute,
        }
    }
}

/// Errors raised by entities and their descriptors.
#[derive(Debug, Error)]
pub enum ScriveError {
    /// A caller-supplied value failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A server payload is missing fields or carries values of the wrong shape.
    #[error("invalid response: {message}")]
    InvalidResponse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The entity was invalidated and no longer reflects server state.
    #[error("entity is invalid and can no longer be used")]
    InvalidEntity,

    /// The entity is a read-only view.
    #[error("entity is read only")]
    EntityIsReadOnly,

    /// The attribute is derived and cannot be assigned by callers.
    #[error("attribute '{0}' is read only")]
    AttributeIsReadOnly(String),

    /// Keyword construction without a required argument.
    #[error("{entity}::new() requires {name} keyword argument")]
    MissingArgument { entity: &'static str, name: String },

    /// Keyword construction with an argument no descriptor consumed.
    #[error("{entity}::new() got an unexpected keyword argument '{name}'")]
    UnexpectedArgument { entity: &'static str, name: String },

    /// Access to an attribute the entity does not declare.
    #[error("{entity} has no attribute '{name}'")]
    UnknownAttribute { entity: &'static str, name: String },

    /// A stored value did not have the type its accessor expected.
    #[error("attribute '{0}' holds a value of an unexpected type")]
    UnexpectedValue(String),

    /// A remote operation was attempted without an API handle attached.
    #[error("API not set")]
    ApiNotSet,
}

impl ScriveError {
    /// Builds an `InvalidResponse` without an underlying cause.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps a lower-level failure as an `InvalidResponse`.
    pub fn invalid_response_from<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::InvalidResponse {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
