//! Translation resolution for storefront frontends
//!
//! This crate turns namespaced translation keys into display strings. It
//! includes:
//!
//! - A lazy resolver that loads a key's namespace on first use
//! - A Fluent-backed engine with per-namespace bundles and a fallback locale
//! - File and in-memory namespace backends
//! - Locale publication and engine synchronisation
//!
//! # Example
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use std::sync::Arc;
//! use storefront_common::TranslationParams;
//! use storefront_config::{Config, ConfigCache};
//! use storefront_i18n::{initialize_engine, TranslationResolver};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let engine = initialize_engine(&config.i18n, None)?;
//! let resolver = TranslationResolver::new(Arc::new(engine), Arc::new(ConfigCache::new(config)));
//!
//! let mut values = resolver.translate("checkout:placeOrder", TranslationParams::new());
//! while let Some(text) = values.next().await {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod bundle;
pub mod engine;
pub mod error;
pub mod fluent_engine;
pub mod init;
pub mod locale;
pub mod resolver;
pub mod sync;

pub use backend::{FileSystemBackend, MemoryBackend, NamespaceBackend};
pub use bundle::{fluent_args, BundleStore, NamespaceBundle, NESTED_PARAM_SEPARATOR};
pub use engine::{I18nEngine, OnLoaded};
pub use error::{I18nError, I18nResult};
pub use fluent_engine::{EngineOptions, FluentEngine};
pub use init::initialize_engine;
pub use locale::{language_identifier, LocaleSource, WatchLocaleSource};
pub use resolver::{Resolution, TranslationResolver, MISSING_KEY_TARGET, NON_BREAKING_SPACE};
pub use sync::sync_engine_with_locale_source;

// Re-export commonly used Fluent types
pub use fluent::{FluentArgs, FluentValue};
