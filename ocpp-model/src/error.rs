//! Model error types
//!
//! Constructors and setters fail with [`ModelError::InvalidProperty`]; the
//! recursive [`validate`](crate::Composite::validate) query never errors.

use thiserror::Error;

/// Leading text of every rejected-property message.
///
/// The codec uses it to recognise constraint failures that serde has already
/// flattened into its own error type.
pub const INVALID_PROPERTY: &str = "invalid property";

/// Errors raised while constructing or mutating a composite
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid property {type_name}.{field}: {value}")]
    InvalidProperty {
        type_name: &'static str,
        field: &'static str,
        value: String,
    },
}

impl ModelError {
    pub fn invalid_property(
        type_name: &'static str,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        ModelError::InvalidProperty {
            type_name,
            field,
            value: value.into(),
        }
    }

    /// Wire name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ModelError::InvalidProperty { field, .. } => field,
        }
    }

    /// Rendered value that was rejected
    pub fn value(&self) -> &str {
        match self {
            ModelError::InvalidProperty { value, .. } => value,
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
