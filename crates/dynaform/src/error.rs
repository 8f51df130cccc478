//! Configuration errors
//!
//! Validation failures are never errors; they live in the controller's
//! error map. These variants describe a configuration that cannot be
//! turned into a working form.

use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A field without a name (position is zero-based)
    #[error("field at position {index} has an empty name")]
    EmptyName { index: usize },

    #[error("duplicate field name: {name}")]
    DuplicateFieldName { name: String },

    /// Select and radio fields need something to choose from
    #[error("field '{name}' requires at least one option")]
    MissingOptions { name: String },

    #[error("field '{name}' has an option with an empty value")]
    EmptyOptionValue { name: String },

    #[error("field '{name}' declares option '{value}' more than once")]
    DuplicateOption { name: String, value: String },

    /// Two rendered elements would share an id
    #[error("field '{name}' renders element id '{id}', which is already in use")]
    DuplicateElementId { name: String, id: String },

    /// Authoring builder was given no name
    #[error("field has no name")]
    MissingName,

    /// Authoring builder was given no type token
    #[error("field '{name}' has no type")]
    MissingType { name: String },
}
