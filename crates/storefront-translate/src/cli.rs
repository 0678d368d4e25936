//! Command line arguments.

use clap::Parser;
use std::path::PathBuf;
use storefront_common::{ParamValue, TranslationParams};
use storefront_config::Config;

/// Command line arguments
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path (YAML, TOML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Locale to resolve in, overriding the configured default
    #[arg(long)]
    pub locale: Option<String>,

    /// Directory relative load paths are resolved against
    #[arg(long)]
    pub origin: Option<String>,

    /// Hide missing keys the way production builds do
    #[arg(long)]
    pub production: bool,

    /// Log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Interpolation parameter as `name=value`; may be repeated
    #[arg(short, long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Keys to resolve, as `namespace:key`
    #[arg(required = true)]
    pub keys: Vec<String>,
}

/// Parses a `name=value` parameter.
pub fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected name=value, got '{raw}'")),
    }
}

/// Builds translation parameters. Values that parse as numbers are passed as
/// numbers so plural selection works.
pub fn params_from(pairs: &[(String, String)]) -> TranslationParams {
    pairs
        .iter()
        .map(|(name, value)| match value.parse::<f64>() {
            Ok(number) if number.is_finite() => (name.clone(), ParamValue::Number(number)),
            _ => (name.clone(), ParamValue::from(value.as_str())),
        })
        .collect()
}

/// Applies command line overrides on top of loaded configuration.
pub fn apply_args(config: &mut Config, args: &Args) {
    if args.production {
        config.production = true;
    }
    if let Some(locale) = &args.locale {
        config.i18n.default_lang.clone_from(locale);
    }
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
}
