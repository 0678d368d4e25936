//! The translation engine capability the resolver depends on.

use storefront_common::{Locale, Namespace, TranslationParams};

/// Continuation fired once a `load_namespaces` call has settled.
pub type OnLoaded = Box<dyn FnOnce() + Send + 'static>;

/// Holds translation bundles and performs lookups and interpolation.
///
/// Implementations must invoke `on_loaded` exactly once per
/// [`load_namespaces`](I18nEngine::load_namespaces) call, including when no
/// work was needed and when loading failed. The resolver's missing-key
/// reporting relies on that.
#[cfg_attr(test, mockall::automock)]
pub trait I18nEngine: Send + Sync {
    /// Interpolates `key` for the active locale. Assumes the key exists.
    fn t(&self, key: &str, params: &TranslationParams) -> String;

    /// Whether `key` is present in the bundles loaded for the active locale.
    fn exists(&self, key: &str, params: &TranslationParams) -> bool;

    /// Loads `namespaces` in the background and then calls `on_loaded`.
    fn load_namespaces(&self, namespaces: Vec<Namespace>, on_loaded: OnLoaded);

    /// Switches the active locale. Fire-and-forget.
    fn change_locale(&self, locale: Locale);
}
