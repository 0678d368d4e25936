//! Default values.

use crate::schema::{Config, I18nConfig, LogFormat, LoggingConfig, TranslationResources};

/// Load timeout applied when none is configured.
pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 10_000;

impl Default for Config {
    fn default() -> Self {
        Self {
            production: false,
            i18n: I18nConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_lang: "en".to_string(),
            fallback_lang: Some("en".to_string()),
            default_namespace: "translation".to_string(),
            debug: false,
            backend: None,
            resources: TranslationResources::new(),
            load_timeout_ms: Some(DEFAULT_LOAD_TIMEOUT_MS),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}
