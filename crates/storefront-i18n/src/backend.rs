//! Namespace bundle sources.

use crate::error::{I18nError, I18nResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::PathBuf;
use storefront_common::{Locale, Namespace};
use storefront_config::{is_remote, LANGUAGE_PLACEHOLDER, NAMESPACE_PLACEHOLDER};
use tracing::debug;

/// Fetches the Fluent source of one namespace for one locale.
#[async_trait]
pub trait NamespaceBackend: Send + Sync + Debug {
    /// Reads the namespace source text.
    async fn read(&self, locale: &Locale, namespace: &Namespace) -> I18nResult<String>;
}

/// Reads namespace files from disk using a `{{lng}}`/`{{ns}}` path template.
#[derive(Debug, Clone)]
pub struct FileSystemBackend {
    load_path: String,
}

impl FileSystemBackend {
    /// Creates a backend for `load_path`. Remote URLs are rejected.
    pub fn new(load_path: impl Into<String>) -> I18nResult<Self> {
        let load_path = load_path.into();
        if is_remote(&load_path) {
            return Err(I18nError::UnsupportedLoadPath(load_path));
        }
        Ok(Self { load_path })
    }

    /// The file that holds `namespace` for `locale`.
    pub fn path_for(&self, locale: &Locale, namespace: &Namespace) -> PathBuf {
        PathBuf::from(
            self.load_path
                .replace(LANGUAGE_PLACEHOLDER, locale.as_str())
                .replace(NAMESPACE_PLACEHOLDER, namespace.as_str()),
        )
    }
}

#[async_trait]
impl NamespaceBackend for FileSystemBackend {
    async fn read(&self, locale: &Locale, namespace: &Namespace) -> I18nResult<String> {
        let path = self.path_for(locale, namespace);
        debug!("Reading namespace file: {:?}", path);

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| I18nError::ResourceLoadError {
                path: path.to_string_lossy().to_string(),
                source,
            })
    }
}

/// Serves namespaces from memory, for embedded translations.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    sources: RwLock<HashMap<(Locale, Namespace), String>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the source for a locale/namespace pair.
    pub fn insert(&self, locale: Locale, namespace: Namespace, source: impl Into<String>) {
        self.sources.write().insert((locale, namespace), source.into());
    }
}

#[async_trait]
impl NamespaceBackend for MemoryBackend {
    async fn read(&self, locale: &Locale, namespace: &Namespace) -> I18nResult<String> {
        self.sources
            .read()
            .get(&(locale.clone(), namespace.clone()))
            .cloned()
            .ok_or_else(|| I18nError::ResourceLoadError {
                path: format!("memory://{locale}/{namespace}"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }
}
