//! Error types for internationalization operations

use thiserror::Error;

/// Errors that can occur during internationalization operations
#[derive(Error, Debug)]
pub enum I18nError {
    /// Failed to parse a language identifier
    #[error("Invalid language identifier: {0}")]
    InvalidLanguageId(String),

    /// Failed to load a namespace bundle
    #[error("Failed to load namespace bundle: {path}")]
    ResourceLoadError {
        /// Location that was read
        path: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a Fluent resource
    #[error("Failed to parse Fluent resource for {locale}/{namespace}: {errors:?}")]
    FluentParseError {
        /// Locale of the resource
        locale: String,
        /// Namespace of the resource
        namespace: String,
        /// Parser messages
        errors: Vec<String>,
    },

    /// Adding a resource clashed with messages already in the bundle
    #[error("Conflicting messages in {locale}/{namespace}: {errors:?}")]
    BundleConflict {
        /// Locale of the bundle
        locale: String,
        /// Namespace of the bundle
        namespace: String,
        /// Fluent error messages
        errors: Vec<String>,
    },

    /// The backend cannot serve this load path
    #[error("Unsupported load path: {0}")]
    UnsupportedLoadPath(String),

    /// The engine was created outside a Tokio runtime
    #[error("No Tokio runtime available to drive namespace loading")]
    NoRuntime,
}

/// Result type for i18n operations
pub type I18nResult<T> = Result<T, I18nError>;
