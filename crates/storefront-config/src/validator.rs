//! Runtime validation of loaded configuration.

use crate::schema::{Config, I18nConfig};
use storefront_common::{StorefrontError, NAMESPACE_SEPARATOR};

/// Placeholder for the language in a backend load path.
pub const LANGUAGE_PLACEHOLDER: &str = "{{lng}}";
/// Placeholder for the namespace in a backend load path.
pub const NAMESPACE_PLACEHOLDER: &str = "{{ns}}";

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first offending field.
    pub fn validate(config: &Config) -> Result<(), StorefrontError> {
        Self::validate_i18n(&config.i18n)?;

        if config.logging.level.trim().is_empty() {
            return Err(StorefrontError::validation(
                "logging.level",
                "cannot be empty",
            ));
        }

        Ok(())
    }

    fn validate_i18n(i18n: &I18nConfig) -> Result<(), StorefrontError> {
        check_language_tag("i18n.default_lang", &i18n.default_lang)?;

        if let Some(fallback) = &i18n.fallback_lang {
            check_language_tag("i18n.fallback_lang", fallback)?;
        }

        check_namespace_name("i18n.default_namespace", &i18n.default_namespace)?;

        if let Some(backend) = &i18n.backend {
            let field = "i18n.backend.load_path";
            if backend.load_path.trim().is_empty() {
                return Err(StorefrontError::validation(field, "cannot be empty"));
            }
            for placeholder in [LANGUAGE_PLACEHOLDER, NAMESPACE_PLACEHOLDER] {
                if !backend.load_path.contains(placeholder) {
                    return Err(StorefrontError::validation(
                        field,
                        format!("must contain {placeholder}"),
                    ));
                }
            }
        }

        for (lang, namespaces) in &i18n.resources {
            check_language_tag("i18n.resources", lang)?;
            for namespace in namespaces.keys() {
                check_namespace_name(&format!("i18n.resources.{lang}"), namespace)?;
            }
        }

        Ok(())
    }
}

fn check_language_tag(field: &str, tag: &str) -> Result<(), StorefrontError> {
    if tag.trim().is_empty() {
        return Err(StorefrontError::validation(field, "language tag cannot be empty"));
    }
    if tag.chars().any(char::is_whitespace) {
        return Err(StorefrontError::validation(
            field,
            format!("language tag `{tag}` contains whitespace"),
        ));
    }
    Ok(())
}

fn check_namespace_name(field: &str, namespace: &str) -> Result<(), StorefrontError> {
    if namespace.is_empty() {
        return Err(StorefrontError::validation(field, "namespace cannot be empty"));
    }
    if namespace.contains(NAMESPACE_SEPARATOR) {
        return Err(StorefrontError::validation(
            field,
            format!("namespace `{namespace}` contains `{NAMESPACE_SEPARATOR}`"),
        ));
    }
    Ok(())
}
