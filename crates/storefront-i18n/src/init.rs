//! Building an engine from configuration.

use crate::backend::{FileSystemBackend, NamespaceBackend};
use crate::error::I18nResult;
use crate::fluent_engine::{EngineOptions, FluentEngine};
use std::sync::Arc;
use storefront_common::{Locale, Namespace};
use storefront_config::{resolve_load_path, I18nConfig};
use tracing::{debug, info};

/// Creates a [`FluentEngine`] for `config`.
///
/// A configured backend load path is resolved against `origin` first.
/// Static resources from the configuration are added with overwrite
/// enabled; no namespace is fetched from the backend up front.
pub fn initialize_engine(config: &I18nConfig, origin: Option<&str>) -> I18nResult<FluentEngine> {
    let backend = match config
        .backend
        .as_ref()
        .and_then(|backend| resolve_load_path(&backend.load_path, origin))
    {
        Some(load_path) => {
            info!("Loading namespaces from {}", load_path);
            Some(Arc::new(FileSystemBackend::new(load_path)?) as Arc<dyn NamespaceBackend>)
        }
        None => None,
    };

    let engine = FluentEngine::new(EngineOptions::from_config(config), backend)?;

    for (lang, namespaces) in &config.resources {
        for (namespace, source) in namespaces {
            debug!("Adding static resource {}:{}", lang, namespace);
            engine.add_resource_bundle(
                &Locale::new(lang.as_str()),
                &Namespace::new(namespace.as_str()),
                source.as_str(),
                true,
            )?;
        }
    }

    Ok(engine)
}
