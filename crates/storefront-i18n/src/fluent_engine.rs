//! Fluent-backed translation engine

use crate::backend::NamespaceBackend;
use crate::bundle::BundleStore;
use crate::engine::{I18nEngine, OnLoaded};
use crate::error::{I18nError, I18nResult};
use crate::locale::language_identifier;
use arc_swap::ArcSwap;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use storefront_common::{Locale, Namespace, TranslationKey, TranslationParams};
use storefront_config::I18nConfig;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// Settings the engine is built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Locale active until the first `change_locale`.
    pub initial_locale: Locale,
    /// Locale consulted after the active one.
    pub fallback_locale: Option<Locale>,
    /// Namespace for keys without a `namespace:` prefix.
    pub default_namespace: Namespace,
    /// Log every lookup.
    pub debug: bool,
}

impl EngineOptions {
    /// Options taken from the i18n configuration section.
    pub fn from_config(config: &I18nConfig) -> Self {
        Self {
            initial_locale: config.default_locale(),
            fallback_locale: config.fallback_locale(),
            default_namespace: config.default_namespace(),
            debug: config.debug,
        }
    }
}

type BundleKey = (Locale, Namespace);

/// Load progress of one locale/namespace pair.
enum LoadState {
    /// Fetch in flight, with the batches waiting on it.
    Pending(Vec<Arc<LoadBatch>>),
    Loaded,
    /// The backend could not provide it. Not retried.
    Failed,
}

/// One `load_namespaces` call waiting on a number of pairs.
struct LoadBatch {
    remaining: AtomicUsize,
    on_loaded: Mutex<Option<OnLoaded>>,
}

impl LoadBatch {
    fn new(pairs: usize, on_loaded: OnLoaded) -> Arc<Self> {
        Arc::new(Self {
            remaining: AtomicUsize::new(pairs),
            on_loaded: Mutex::new(Some(on_loaded)),
        })
    }

    fn settle_one(&self) {
        if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            let callback = self.on_loaded.lock().take();
            if let Some(callback) = callback {
                callback();
            }
        }
    }
}

struct EngineInner {
    active: ArcSwap<Locale>,
    fallback: Option<Locale>,
    default_namespace: Namespace,
    debug: bool,
    bundles: RwLock<BundleStore>,
    loads: Mutex<HashMap<BundleKey, LoadState>>,
    backend: Option<Arc<dyn NamespaceBackend>>,
    runtime: Handle,
}

/// Translation engine holding Fluent bundles per locale and namespace.
///
/// Cloning is cheap and yields a handle to the same engine.
#[derive(Clone)]
pub struct FluentEngine {
    inner: Arc<EngineInner>,
}

impl std::fmt::Debug for FluentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FluentEngine")
            .field("active", &self.inner.active.load().as_str())
            .field("fallback", &self.inner.fallback)
            .field("default_namespace", &self.inner.default_namespace)
            .field("backend", &self.inner.backend)
            .finish_non_exhaustive()
    }
}

impl FluentEngine {
    /// Creates an engine. Must be called from within a Tokio runtime.
    pub fn new(
        options: EngineOptions,
        backend: Option<Arc<dyn NamespaceBackend>>,
    ) -> I18nResult<Self> {
        language_identifier(&options.initial_locale)?;
        if let Some(fallback) = &options.fallback_locale {
            language_identifier(fallback)?;
        }
        let runtime = Handle::try_current().map_err(|_| I18nError::NoRuntime)?;

        info!(
            "Translation engine initialized with locale {} (fallback: {:?})",
            options.initial_locale, options.fallback_locale
        );

        Ok(Self {
            inner: Arc::new(EngineInner {
                active: ArcSwap::from_pointee(options.initial_locale),
                fallback: options.fallback_locale,
                default_namespace: options.default_namespace,
                debug: options.debug,
                bundles: RwLock::new(BundleStore::new()),
                loads: Mutex::new(HashMap::new()),
                backend,
                runtime,
            }),
        })
    }

    /// The active locale.
    pub fn active_locale(&self) -> Locale {
        self.inner.active.load().as_ref().clone()
    }

    /// The fallback locale, if any.
    pub fn fallback_locale(&self) -> Option<&Locale> {
        self.inner.fallback.as_ref()
    }

    /// Adds Fluent source for a pair and marks it loaded.
    ///
    /// With `overwrite`, messages already present are replaced.
    pub fn add_resource_bundle(
        &self,
        locale: &Locale,
        namespace: &Namespace,
        source: impl Into<String>,
        overwrite: bool,
    ) -> I18nResult<()> {
        language_identifier(locale)?;
        self.inner
            .bundles
            .write()
            .add_source(locale, namespace, source.into(), overwrite)?;

        let mut loads = self.inner.loads.lock();
        let state = loads
            .entry((locale.clone(), namespace.clone()))
            .or_insert(LoadState::Loaded);
        if matches!(state, LoadState::Failed) {
            *state = LoadState::Loaded;
        }
        Ok(())
    }

    /// Whether the pair has finished loading successfully.
    pub fn is_loaded(&self, locale: &Locale, namespace: &Namespace) -> bool {
        matches!(
            self.inner.loads.lock().get(&(locale.clone(), namespace.clone())),
            Some(LoadState::Loaded)
        )
    }

    /// Namespaces with a bundle for `locale`.
    pub fn loaded_namespaces(&self, locale: &Locale) -> BTreeSet<Namespace> {
        self.inner.bundles.read().namespaces_for(locale)
    }

    /// Locales consulted for a lookup, in order.
    fn lookup_locales(&self) -> Vec<Locale> {
        let active = self.active_locale();
        match &self.inner.fallback {
            Some(fallback) if *fallback != active => vec![active, fallback.clone()],
            _ => vec![active],
        }
    }

    /// Namespace and message path of a key, applying the default namespace.
    fn locate(&self, key: &str) -> (Namespace, String) {
        let key = TranslationKey::new(key);
        match key.explicit_namespace() {
            Some(namespace) => (Namespace::new(namespace), key.local_key().to_string()),
            None => (self.inner.default_namespace.clone(), key.as_str().to_string()),
        }
    }

    /// Every namespace the engine has been asked for or given.
    fn known_namespaces(&self) -> Vec<Namespace> {
        let mut namespaces: BTreeSet<Namespace> = self.inner.bundles.read().namespaces();
        namespaces.extend(self.inner.loads.lock().keys().map(|(_, ns)| ns.clone()));
        namespaces.into_iter().collect()
    }
}

impl I18nEngine for FluentEngine {
    fn t(&self, key: &str, params: &TranslationParams) -> String {
        let (namespace, local_key) = self.locate(key);
        let bundles = self.inner.bundles.read();

        for locale in self.lookup_locales() {
            if let Some(text) = bundles.format(&locale, &namespace, &local_key, params) {
                if self.inner.debug {
                    debug!("Translated {} in {}", key, locale);
                }
                return text;
            }
        }

        debug!("No translation for {}, returning the key", key);
        key.to_string()
    }

    fn exists(&self, key: &str, _params: &TranslationParams) -> bool {
        let (namespace, local_key) = self.locate(key);
        let bundles = self.inner.bundles.read();
        let found = self
            .lookup_locales()
            .iter()
            .any(|locale| bundles.has_message(locale, &namespace, &local_key));

        if self.inner.debug {
            debug!("Key {} exists: {}", key, found);
        }
        found
    }

    fn load_namespaces(&self, namespaces: Vec<Namespace>, on_loaded: OnLoaded) {
        let Some(backend) = self.inner.backend.clone() else {
            debug!("No namespace backend configured, nothing to load for {:?}", namespaces);
            on_loaded();
            return;
        };

        let mut pairs: Vec<BundleKey> = Vec::new();
        for locale in self.lookup_locales() {
            for namespace in &namespaces {
                let pair = (locale.clone(), namespace.clone());
                if !pairs.contains(&pair) {
                    pairs.push(pair);
                }
            }
        }

        let mut loads = self.inner.loads.lock();
        let mut waiting = Vec::new();
        let mut to_fetch = Vec::new();
        for pair in pairs {
            match loads.get(&pair) {
                Some(LoadState::Loaded | LoadState::Failed) => {}
                Some(LoadState::Pending(_)) => waiting.push(pair),
                None => {
                    to_fetch.push(pair.clone());
                    waiting.push(pair);
                }
            }
        }

        if waiting.is_empty() {
            drop(loads);
            debug!("Namespaces {:?} already settled", namespaces);
            on_loaded();
            return;
        }

        let batch = LoadBatch::new(waiting.len(), on_loaded);
        for pair in waiting {
            if let LoadState::Pending(waiters) = loads
                .entry(pair)
                .or_insert_with(|| LoadState::Pending(Vec::new()))
            {
                waiters.push(Arc::clone(&batch));
            }
        }
        drop(loads);

        for (locale, namespace) in to_fetch {
            let inner = Arc::clone(&self.inner);
            let backend = Arc::clone(&backend);
            self.inner
                .runtime
                .spawn(fetch_namespace(inner, backend, locale, namespace));
        }
    }

    fn change_locale(&self, locale: Locale) {
        let previous = self.inner.active.swap(Arc::new(locale.clone()));
        if *previous == locale {
            debug!("Locale {} already active", locale);
            return;
        }
        info!("Active locale changed from {} to {}", previous, locale);

        let namespaces = self.known_namespaces();
        if namespaces.is_empty() {
            return;
        }
        self.load_namespaces(
            namespaces,
            Box::new(move || debug!("Namespaces for locale {} settled", locale)),
        );
    }
}

/// Fetches one pair, stores it and releases whoever waits on it.
async fn fetch_namespace(
    inner: Arc<EngineInner>,
    backend: Arc<dyn NamespaceBackend>,
    locale: Locale,
    namespace: Namespace,
) {
    debug!("Loading namespace {} for locale {}", namespace, locale);

    let read = backend.read(&locale, &namespace).await;
    let stored = read.and_then(|source| {
        inner
            .bundles
            .write()
            .add_source(&locale, &namespace, source, false)
    });

    let state = match stored {
        Ok(()) => {
            info!("Loaded namespace {} for locale {}", namespace, locale);
            LoadState::Loaded
        }
        Err(I18nError::BundleConflict { errors, .. }) => {
            debug!(
                "Namespace {} for locale {} loaded; existing messages kept: {:?}",
                namespace, locale, errors
            );
            LoadState::Loaded
        }
        Err(e) => {
            warn!("Failed to load namespace {} for locale {}: {}", namespace, locale, e);
            LoadState::Failed
        }
    };

    let waiters = {
        let mut loads = inner.loads.lock();
        match loads.insert((locale, namespace), state) {
            Some(LoadState::Pending(waiters)) => waiters,
            _ => Vec::new(),
        }
    };

    for batch in waiters {
        batch.settle_one();
    }
}
