//! Configuration loading from YAML, TOML or JSON files plus environment overrides.

use crate::schema::{BackendConfig, Config};
use std::path::{Path, PathBuf};
use storefront_common::{Result, StorefrontError};
use tracing::{debug, info, warn};

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "STOREFRONT_";

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            other => Err(StorefrontError::Config(format!(
                "unsupported configuration file extension {other:?} for {}",
                path.display()
            ))),
        }
    }
}

/// Configuration loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The configuration file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads configuration from file, applies environment overrides and validates it.
    pub async fn load(&self) -> Result<Config> {
        let format = ConfigFormat::from_path(&self.path)?;
        debug!("Loading configuration from {:?} as {:?}", self.path, format);

        let content = tokio::fs::read_to_string(&self.path).await?;
        let mut config = Self::parse(&content, format)?;
        apply_env_overrides(&mut config);
        config.validate()?;

        info!("Configuration loaded from {:?}", self.path);
        Ok(config)
    }

    /// Parses configuration text in the given format.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Config> {
        let parsed = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(StorefrontError::Serialization)
    }
}

/// Builds configuration from defaults and the process environment only.
pub fn config_from_env() -> Result<Config> {
    let mut config = Config::default();
    apply_env_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

/// Applies `STOREFRONT_*` variables from the process environment.
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides(config, |name| std::env::var(name).ok());
}

/// Applies overrides read through `lookup`, which receives the full variable name.
///
/// Recognised variables: `PRODUCTION`, `DEFAULT_LANG`, `FALLBACK_LANG`
/// (empty disables the fallback), `LOAD_PATH`, `LOAD_TIMEOUT_MS`,
/// `I18N_DEBUG` and `LOG_LEVEL`, each prefixed with [`ENV_PREFIX`].
pub fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

    if let Some(value) = var("PRODUCTION") {
        match parse_flag(&value) {
            Some(flag) => config.production = flag,
            None => warn!("Ignoring {ENV_PREFIX}PRODUCTION={value:?}: not a boolean"),
        }
    }

    if let Some(lang) = var("DEFAULT_LANG") {
        config.i18n.default_lang = lang;
    }

    if let Some(lang) = var("FALLBACK_LANG") {
        config.i18n.fallback_lang = if lang.is_empty() { None } else { Some(lang) };
    }

    if let Some(load_path) = var("LOAD_PATH") {
        config.i18n.backend = Some(BackendConfig { load_path });
    }

    if let Some(value) = var("LOAD_TIMEOUT_MS") {
        match value.parse::<u64>() {
            Ok(ms) => config.i18n.load_timeout_ms = Some(ms),
            Err(_) => warn!("Ignoring {ENV_PREFIX}LOAD_TIMEOUT_MS={value:?}: not a number"),
        }
    }

    if let Some(value) = var("I18N_DEBUG") {
        if let Some(flag) = parse_flag(&value) {
            config.i18n.debug = flag;
        }
    }

    if let Some(level) = var("LOG_LEVEL") {
        config.logging.level = level;
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
