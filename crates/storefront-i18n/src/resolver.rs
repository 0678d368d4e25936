//! Lazy translation resolution.
//!
//! [`TranslationResolver::resolve`] turns a namespaced key into a short
//! stream of display values. A key already present in the loaded bundles
//! resolves to a single value. Otherwise the key's namespace load is started
//! and a non-breaking space is emitted at once so the UI never renders an
//! empty string. A second value follows once the load settles: the
//! translation, or the missing-key placeholder.
//!
//! Per call the stream moves through
//! `CheckingInitial → Resolved | Loading → (ResolvedAfterLoad | MissingAfterLoad)`,
//! with `Loading` as the only suspension point.

use crate::engine::{I18nEngine, OnLoaded};
use futures::stream::{self, BoxStream, StreamExt};
use std::fmt;
use std::sync::Arc;
use storefront_common::{Namespace, TranslationKey, TranslationParams};
use storefront_config::ConfigCache;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Placeholder shown while loading and, in production, for missing keys.
pub const NON_BREAKING_SPACE: &str = "\u{a0}";

/// Log target of missing-key diagnostics.
pub const MISSING_KEY_TARGET: &str = "storefront_i18n::missing_key";

/// One value emitted while resolving a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The interpolated translation.
    Translated(String),
    /// A single non-breaking space.
    Placeholder,
    /// The key in brackets, shown outside production for missing keys.
    MissingKey(String),
}

impl Resolution {
    /// The display text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Translated(text) | Self::MissingKey(text) => text,
            Self::Placeholder => NON_BREAKING_SPACE,
        }
    }

    /// Consumes the value into its display text.
    pub fn into_text(self) -> String {
        match self {
            Self::Translated(text) | Self::MissingKey(text) => text,
            Self::Placeholder => NON_BREAKING_SPACE.to_string(),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves translation keys against an engine, loading namespaces on demand.
///
/// Holds no translation state of its own; the engine owns every bundle.
#[derive(Clone)]
pub struct TranslationResolver {
    engine: Arc<dyn I18nEngine>,
    config: Arc<ConfigCache>,
}

impl fmt::Debug for TranslationResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationResolver")
            .field("engine", &"<dyn I18nEngine>")
            .field("production", &self.config.is_production())
            .finish()
    }
}

impl TranslationResolver {
    /// Creates a resolver over `engine`. The production flag and load
    /// timeout are read from `config` whenever they are needed.
    pub fn new(engine: Arc<dyn I18nEngine>, config: Arc<ConfigCache>) -> Self {
        Self { engine, config }
    }

    /// Resolves `key` into at most two values.
    ///
    /// Nothing happens until the stream is polled. The first poll of an
    /// absent key starts the namespace load; dropping the stream after the
    /// placeholder discards the pending result but not the load.
    pub fn resolve(
        &self,
        key: impl Into<TranslationKey>,
        params: TranslationParams,
    ) -> BoxStream<'static, Resolution> {
        let lookup = Lookup {
            engine: Arc::clone(&self.engine),
            config: Arc::clone(&self.config),
            key: key.into(),
            params,
        };

        stream::unfold((Step::CheckingInitial, lookup), |(step, lookup)| async move {
            match step {
                Step::CheckingInitial => {
                    if lookup.exists() {
                        let text = lookup.translate();
                        Some((Resolution::Translated(text), (Step::Finished, lookup)))
                    } else {
                        let loaded = lookup.request_namespace();
                        Some((Resolution::Placeholder, (Step::Loading(loaded), lookup)))
                    }
                }
                Step::Loading(loaded) => {
                    lookup.wait_for_namespace(loaded).await;
                    let value = if lookup.exists() {
                        Resolution::Translated(lookup.translate())
                    } else {
                        lookup.report_missing()
                    };
                    Some((value, (Step::Finished, lookup)))
                }
                Step::Finished => None,
            }
        })
        .boxed()
    }

    /// Like [`resolve`](Self::resolve), yielding display text.
    pub fn translate(
        &self,
        key: impl Into<TranslationKey>,
        params: TranslationParams,
    ) -> BoxStream<'static, String> {
        self.resolve(key, params).map(Resolution::into_text).boxed()
    }

    /// Whether the engine has `key` loaded. Never triggers a load.
    pub fn exists(&self, key: &str, params: &TranslationParams) -> bool {
        self.engine.exists(key, params)
    }

    /// Asks the engine to load `namespaces`, calling `on_loaded` when done.
    pub fn load_namespaces(&self, namespaces: Vec<Namespace>, on_loaded: OnLoaded) {
        self.engine.load_namespaces(namespaces, on_loaded);
    }
}

enum Step {
    CheckingInitial,
    /// Load requested; the receiver fires when the engine calls back.
    Loading(oneshot::Receiver<()>),
    Finished,
}

/// State carried through a single `resolve` call.
struct Lookup {
    engine: Arc<dyn I18nEngine>,
    config: Arc<ConfigCache>,
    key: TranslationKey,
    params: TranslationParams,
}

impl Lookup {
    fn exists(&self) -> bool {
        self.engine.exists(self.key.as_str(), &self.params)
    }

    fn translate(&self) -> String {
        self.engine.t(self.key.as_str(), &self.params)
    }

    fn namespace(&self) -> Namespace {
        Namespace::new(self.key.namespace())
    }

    /// Starts loading the key's namespace.
    fn request_namespace(&self) -> oneshot::Receiver<()> {
        let namespace = self.namespace();
        let (done, loaded) = oneshot::channel();

        debug!("Loading namespace {} for key {}", namespace, self.key);
        self.engine.load_namespaces(
            vec![namespace],
            Box::new(move || {
                let _ = done.send(());
            }),
        );
        loaded
    }

    /// Waits for the engine to report back on a requested load.
    ///
    /// Gives up after the configured timeout, or when the engine drops the
    /// continuation without calling it.
    async fn wait_for_namespace(&self, loaded: oneshot::Receiver<()>) {
        let namespace = self.namespace();
        let completed = match self.config.get().i18n.load_timeout() {
            Some(limit) => match tokio::time::timeout(limit, loaded).await {
                Ok(outcome) => outcome.is_ok(),
                Err(_) => {
                    debug!("Namespace {} not loaded within {:?}", namespace, limit);
                    return;
                }
            },
            None => loaded.await.is_ok(),
        };

        if !completed {
            warn!(
                "Engine dropped the load continuation for namespace {} without calling it",
                namespace
            );
        }
    }

    fn report_missing(&self) -> Resolution {
        warn!(target: MISSING_KEY_TARGET, key = %self.key, "Missing translation key: {}", self.key);

        if self.config.is_production() {
            Resolution::Placeholder
        } else {
            Resolution::MissingKey(format!("[{}]", self.key))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MockI18nEngine;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storefront_config::Config;
    use tracing::subscriber::DefaultGuard;
    use tracing::{Event, Level, Metadata, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    const TEST_KEY: &str = "testNamespace:testKey";

    /// Counts events on the current thread that satisfy `matches`.
    struct EventCounter {
        count: Arc<AtomicUsize>,
        matches: fn(&Metadata<'_>) -> bool,
    }

    impl<S: Subscriber> Layer<S> for EventCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if (self.matches)(event.metadata()) {
                self.count.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn count_events(matches: fn(&Metadata<'_>) -> bool) -> (Arc<AtomicUsize>, DefaultGuard) {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(EventCounter {
            count: Arc::clone(&count),
            matches,
        });
        (count, tracing::subscriber::set_default(subscriber))
    }

    fn count_missing_key_reports() -> (Arc<AtomicUsize>, DefaultGuard) {
        count_events(|metadata| metadata.target() == MISSING_KEY_TARGET)
    }

    fn test_params() -> TranslationParams {
        TranslationParams::new().with("option", "testOptions")
    }

    fn config(production: bool, load_timeout_ms: Option<u64>) -> Arc<ConfigCache> {
        let mut config = Config::default();
        config.production = production;
        config.i18n.load_timeout_ms = load_timeout_ms;
        Arc::new(ConfigCache::new(config))
    }

    fn resolver(engine: MockI18nEngine, config: Arc<ConfigCache>) -> TranslationResolver {
        TranslationResolver::new(Arc::new(engine), config)
    }

    /// `exists` answers in order, then keeps answering `false`.
    fn exists_answers(
        answers: &[bool],
    ) -> impl FnMut(&str, &TranslationParams) -> bool + Send + 'static {
        let mut answers = answers.to_vec().into_iter();
        move |_: &str, _: &TranslationParams| answers.next().unwrap_or(false)
    }

    fn load_completes_immediately(engine: &mut MockI18nEngine) {
        engine
            .expect_load_namespaces()
            .returning(|_namespaces: Vec<Namespace>, on_loaded: OnLoaded| on_loaded());
    }

    #[tokio::test]
    async fn test_exists_passes_through() {
        let mut engine = MockI18nEngine::new();
        engine
            .expect_exists()
            .withf(|key, params| key == TEST_KEY && *params == test_params())
            .times(1)
            .return_const(true);

        let resolver = resolver(engine, config(false, None));
        assert!(resolver.exists(TEST_KEY, &test_params()));
    }

    #[tokio::test]
    async fn test_load_namespaces_passes_through() {
        let mut engine = MockI18nEngine::new();
        engine
            .expect_load_namespaces()
            .withf(|namespaces, _| {
                namespaces == &vec![Namespace::new("namespace1"), Namespace::new("namespace2")]
            })
            .times(1)
            .returning(|_namespaces: Vec<Namespace>, on_loaded: OnLoaded| on_loaded());

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let resolver = resolver(engine, config(false, None));
        resolver.load_namespaces(
            vec![Namespace::new("namespace1"), Namespace::new("namespace2")],
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_existing_key_emits_translation_only() {
        let mut engine = MockI18nEngine::new();
        engine.expect_exists().return_const(true);
        engine
            .expect_t()
            .withf(|key, params| key == TEST_KEY && *params == test_params())
            .times(1)
            .return_const("value".to_string());
        engine.expect_load_namespaces().times(0);

        let values: Vec<Resolution> = resolver(engine, config(false, None))
            .resolve(TEST_KEY, test_params())
            .collect()
            .await;

        assert_eq!(values, vec![Resolution::Translated("value".to_string())]);
    }

    #[tokio::test]
    async fn test_absent_key_emits_placeholder_first() {
        let (reports, _guard) = count_missing_key_reports();
        let mut engine = MockI18nEngine::new();
        engine.expect_exists().return_const(false);
        engine
            .expect_load_namespaces()
            .times(1)
            .returning(|_namespaces: Vec<Namespace>, on_loaded: OnLoaded| drop(on_loaded));

        let mut values = resolver(engine, config(false, None)).translate(TEST_KEY, test_params());

        assert_eq!(values.next().await.as_deref(), Some(NON_BREAKING_SPACE));
        assert_eq!(reports.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unpolled_stream_does_nothing() {
        let (reports, _guard) = count_missing_key_reports();
        let mut engine = MockI18nEngine::new();
        engine.expect_exists().times(0);
        engine.expect_load_namespaces().times(0);

        let _values = resolver(engine, config(false, None)).resolve(TEST_KEY, test_params());

        assert_eq!(reports.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_first_poll_yields_placeholder_and_starts_load() {
        let mut engine = MockI18nEngine::new();
        engine.expect_exists().times(1).return_const(false);
        engine
            .expect_load_namespaces()
            .withf(|namespaces, _| namespaces == &vec![Namespace::new("testNamespace")])
            .times(1)
            .returning(|_namespaces: Vec<Namespace>, on_loaded: OnLoaded| drop(on_loaded));

        let mut values = tokio_test::task::spawn(
            resolver(engine, config(false, None)).resolve(TEST_KEY, test_params()),
        );

        let first = tokio_test::assert_ready!(values.poll_next());
        assert_eq!(first, Some(Resolution::Placeholder));
    }

    #[tokio::test]
    async fn test_dropping_after_placeholder_keeps_load_started() {
        let (reports, _guard) = count_missing_key_reports();
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let parked: Arc<Mutex<Vec<OnLoaded>>> = Arc::new(Mutex::new(Vec::new()));
        let parking = Arc::clone(&parked);

        let mut engine = MockI18nEngine::new();
        engine.expect_exists().return_const(false);
        engine
            .expect_load_namespaces()
            .returning(move |_namespaces: Vec<Namespace>, on_loaded: OnLoaded| {
                counter.fetch_add(1, Ordering::SeqCst);
                parking.lock().push(on_loaded);
            });

        let mut values = resolver(engine, config(false, None)).resolve(TEST_KEY, test_params());
        assert_eq!(values.next().await, Some(Resolution::Placeholder));
        drop(values);

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        for on_loaded in parked.lock().drain(..) {
            on_loaded();
        }
        assert_eq!(reports.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_absent_key_loads_its_namespace() {
        let mut engine = MockI18nEngine::new();
        engine.expect_exists().return_const(false);
        engine
            .expect_load_namespaces()
            .withf(|namespaces, _| namespaces == &vec![Namespace::new("testNamespace")])
            .times(1)
            .returning(|_namespaces: Vec<Namespace>, on_loaded: OnLoaded| on_loaded());

        let values: Vec<Resolution> = resolver(engine, config(false, None))
            .resolve(TEST_KEY, test_params())
            .collect()
            .await;

        assert_eq!(values.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_after_load_reports_bracketed_key() {
        let (reports, _guard) = count_missing_key_reports();
        let mut engine = MockI18nEngine::new();
        engine.expect_exists().returning(exists_answers(&[false, false]));
        engine.expect_t().times(0);
        load_completes_immediately(&mut engine);

        let values: Vec<String> = resolver(engine, config(false, None))
            .translate(TEST_KEY, test_params())
            .collect()
            .await;

        assert_eq!(
            values,
            vec![NON_BREAKING_SPACE.to_string(), "[testNamespace:testKey]".to_string()]
        );
        assert_eq!(reports.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_after_load_in_production_hides_key() {
        let (reports, _guard) = count_missing_key_reports();
        let mut engine = MockI18nEngine::new();
        engine.expect_exists().returning(exists_answers(&[false, false]));
        load_completes_immediately(&mut engine);

        let values: Vec<String> = resolver(engine, config(true, None))
            .translate(TEST_KEY, test_params())
            .collect()
            .await;

        assert_eq!(values, vec![String::from('\u{a0}'), String::from('\u{a0}')]);
        assert_eq!(reports.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_production_flag_read_at_resolution_time() {
        let mut engine = MockI18nEngine::new();
        engine.expect_exists().return_const(false);
        load_completes_immediately(&mut engine);

        let cache = config(false, None);
        let resolver = resolver(engine, Arc::clone(&cache));

        let mut production = Config::default();
        production.production = true;
        cache.update(production);

        let values: Vec<Resolution> = resolver.resolve(TEST_KEY, test_params()).collect().await;
        assert_eq!(values, vec![Resolution::Placeholder, Resolution::Placeholder]);
    }

    #[tokio::test]
    async fn test_key_arriving_with_namespace_is_translated() {
        let (reports, _guard) = count_missing_key_reports();
        let mut engine = MockI18nEngine::new();
        engine.expect_exists().returning(exists_answers(&[false, true]));
        engine
            .expect_t()
            .withf(|key, params| key == TEST_KEY && *params == test_params())
            .times(1)
            .return_const("value".to_string());
        load_completes_immediately(&mut engine);

        let values: Vec<Resolution> = resolver(engine, config(false, None))
            .resolve(TEST_KEY, test_params())
            .collect()
            .await;

        assert_eq!(
            values,
            vec![Resolution::Placeholder, Resolution::Translated("value".to_string())]
        );
        assert_eq!(reports.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_repeated_resolution_of_loaded_key_is_stable() {
        let (reports, _guard) = count_missing_key_reports();
        let mut engine = MockI18nEngine::new();
        engine.expect_exists().return_const(true);
        engine.expect_t().times(2).return_const("value".to_string());
        engine.expect_load_namespaces().times(0);

        let resolver = resolver(engine, config(false, None));
        let first: Vec<String> = resolver.translate(TEST_KEY, test_params()).collect().await;
        let second: Vec<String> = resolver.translate(TEST_KEY, test_params()).collect().await;

        assert_eq!(first, vec!["value".to_string()]);
        assert_eq!(first, second);
        assert_eq!(reports.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dropped_continuation_falls_into_missing_branch() {
        let (reports, _guard) = count_missing_key_reports();
        let mut engine = MockI18nEngine::new();
        engine.expect_exists().return_const(false);
        engine
            .expect_load_namespaces()
            .returning(|_namespaces: Vec<Namespace>, on_loaded: OnLoaded| drop(on_loaded));

        let values: Vec<Resolution> = resolver(engine, config(false, None))
            .resolve(TEST_KEY, test_params())
            .collect()
            .await;

        assert_eq!(
            values,
            vec![
                Resolution::Placeholder,
                Resolution::MissingKey("[testNamespace:testKey]".to_string())
            ]
        );
        assert_eq!(reports.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_timeout_falls_into_missing_branch() {
        let (warnings, _guard) = count_events(|metadata| *metadata.level() == Level::WARN);
        let parked: Arc<Mutex<Vec<OnLoaded>>> = Arc::new(Mutex::new(Vec::new()));
        let parking = Arc::clone(&parked);

        let mut engine = MockI18nEngine::new();
        engine.expect_exists().return_const(false);
        engine
            .expect_load_namespaces()
            .returning(move |_namespaces: Vec<Namespace>, on_loaded: OnLoaded| {
                parking.lock().push(on_loaded);
            });

        let values: Vec<Resolution> = resolver(engine, config(false, Some(20)))
            .resolve(TEST_KEY, test_params())
            .collect()
            .await;

        assert_eq!(values.last(), Some(&Resolution::MissingKey("[testNamespace:testKey]".to_string())));
        assert_eq!(warnings.load(Ordering::SeqCst), 1);
        assert_eq!(parked.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_key_without_separator_loads_whole_key_as_namespace() {
        let mut engine = MockI18nEngine::new();
        engine.expect_exists().return_const(false);
        engine
            .expect_load_namespaces()
            .withf(|namespaces, _| namespaces == &vec![Namespace::new("orphan")])
            .times(1)
            .returning(|_namespaces: Vec<Namespace>, on_loaded: OnLoaded| on_loaded());

        let values: Vec<String> = resolver(engine, config(false, None))
            .translate("orphan", TranslationParams::new())
            .collect()
            .await;

        assert_eq!(values.last().map(String::as_str), Some("[orphan]"));
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(Resolution::Placeholder.to_string(), "\u{a0}");
        assert_eq!(Resolution::Placeholder.as_str().chars().count(), 1);
        assert_eq!(Resolution::MissingKey("[a:b]".to_string()).as_str(), "[a:b]");
        assert_eq!(Resolution::Translated("Hi".to_string()).into_text(), "Hi");
    }
}
