//! Application-wide error type.

/// Common result type for the workspace.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Application-wide error type.
#[derive(thiserror::Error, Debug)]
pub enum StorefrontError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration failed validation.
    #[error("Invalid configuration field `{field}`: {reason}")]
    Validation {
        /// Dotted path of the offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StorefrontError {
    /// Shorthand for a validation failure on `field`.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
