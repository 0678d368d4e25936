//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use storefront_common::{Locale, Namespace, StorefrontError};

/// Static translations shipped with the configuration: language → namespace → Fluent source.
pub type TranslationResources = BTreeMap<String, BTreeMap<String, String>>;

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Production mode hides missing keys from end users.
    pub production: bool,
    /// Translation engine configuration.
    pub i18n: I18nConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Translation engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Locale active at startup, until the locale source says otherwise.
    pub default_lang: String,
    /// Locale consulted when a key is absent from the active locale.
    pub fallback_lang: Option<String>,
    /// Namespace used for keys written without a `namespace:` prefix.
    pub default_namespace: String,
    /// Verbose engine logging.
    pub debug: bool,
    /// Where namespace bundles are loaded from. Without it only static
    /// resources are available.
    pub backend: Option<BackendConfig>,
    /// Translations added at startup.
    pub resources: TranslationResources,
    /// Upper bound on waiting for a namespace load, in milliseconds.
    /// Absent uses the default of 10 000 ms; `0` or `null` waits indefinitely.
    pub load_timeout_ms: Option<u64>,
}

/// Namespace backend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Path template with `{{lng}}` and `{{ns}}` placeholders.
    pub load_path: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), StorefrontError> {
        crate::validator::ConfigValidator::validate(self)
    }
}

impl I18nConfig {
    /// The startup locale.
    pub fn default_locale(&self) -> Locale {
        Locale::new(self.default_lang.as_str())
    }

    /// The fallback locale, if configured.
    pub fn fallback_locale(&self) -> Option<Locale> {
        self.fallback_lang.as_deref().map(Locale::new)
    }

    /// The namespace for unprefixed keys.
    pub fn default_namespace(&self) -> Namespace {
        Namespace::new(self.default_namespace.as_str())
    }

    /// Load timeout, `None` when disabled.
    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}
