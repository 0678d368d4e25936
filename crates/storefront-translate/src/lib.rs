//! Storefront translate: resolve translation keys from the command line.
//!
//! Wires configuration, the Fluent engine, the locale source and the lazy
//! resolver together and prints the settled value of every requested key.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod logging;

use anyhow::Result;
use futures::StreamExt;
use std::io::Write;
use std::sync::Arc;
use storefront_common::TranslationParams;
use storefront_config::{config_from_env, Config, ConfigCache, ConfigLoader};
use storefront_i18n::{
    initialize_engine, sync_engine_with_locale_source, I18nEngine, TranslationResolver,
    WatchLocaleSource,
};
use tracing::{debug, info};

pub use cli::{apply_args, params_from, parse_param, Args};
pub use logging::init_logging;

/// Loads configuration from the file given on the command line, or from the
/// environment alone, then applies command line overrides and validates.
pub async fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::new(path).load().await?,
        None => config_from_env()?,
    };
    apply_args(&mut config, args);
    config.validate()?;
    Ok(config)
}

/// Resolves `key` and returns the last value the resolver emits.
pub async fn settled_value(
    resolver: &TranslationResolver,
    key: &str,
    params: TranslationParams,
) -> String {
    let mut values = resolver.translate(key, params);
    let mut settled = String::new();
    while let Some(value) = values.next().await {
        debug!("{} -> {:?}", key, value);
        settled = value;
    }
    settled
}

/// Runs the tool: one output line per key.
pub async fn run(args: Args) -> Result<()> {
    let config = load_config(&args).await?;
    init_logging(&config.logging, config.i18n.debug)?;

    info!(
        "Resolving {} key(s) for locale {}",
        args.keys.len(),
        config.i18n.default_lang
    );

    let engine: Arc<dyn I18nEngine> =
        Arc::new(initialize_engine(&config.i18n, args.origin.as_deref())?);
    let source = WatchLocaleSource::new(config.i18n.default_locale());
    let sync = sync_engine_with_locale_source(Arc::clone(&engine), &source);
    let resolver = TranslationResolver::new(engine, Arc::new(ConfigCache::new(config)));

    let params = params_from(&args.params);
    let mut out = std::io::stdout().lock();
    for key in &args.keys {
        let value = settled_value(&resolver, key, params.clone()).await;
        writeln!(out, "{value}")?;
    }
    out.flush()?;

    drop(source);
    sync.await?;
    Ok(())
}
