//! Active locale publication and language identifier parsing.

use crate::error::{I18nError, I18nResult};
use futures::stream::{self, BoxStream, StreamExt};
use storefront_common::Locale;
use tokio::sync::watch;
use tracing::debug;
use unic_langid::LanguageIdentifier;

/// Converts a locale to a Fluent language identifier.
pub fn language_identifier(locale: &Locale) -> I18nResult<LanguageIdentifier> {
    locale
        .as_str()
        .parse()
        .map_err(|_| I18nError::InvalidLanguageId(locale.to_string()))
}

/// Publishes the active locale over time.
pub trait LocaleSource: Send + Sync {
    /// Stream of active locales: the current one on subscription, then one per change.
    fn active(&self) -> BoxStream<'static, Locale>;
}

/// Locale source backed by a watch channel.
#[derive(Debug)]
pub struct WatchLocaleSource {
    sender: watch::Sender<Locale>,
}

impl WatchLocaleSource {
    /// Creates a source with an initial active locale.
    pub fn new(initial: Locale) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Makes `locale` active. Returns `false` if it already was.
    pub fn set_active(&self, locale: Locale) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == locale {
                false
            } else {
                debug!("Active locale changing from {} to {}", current, locale);
                *current = locale;
                true
            }
        })
    }

    /// The currently active locale.
    pub fn current(&self) -> Locale {
        self.sender.borrow().clone()
    }
}

impl LocaleSource for WatchLocaleSource {
    fn active(&self) -> BoxStream<'static, Locale> {
        let receiver = self.sender.subscribe();
        stream::unfold((receiver, true), |(mut receiver, first)| async move {
            if !first {
                receiver.changed().await.ok()?;
            }
            let locale = receiver.borrow_and_update().clone();
            Some((locale, (receiver, false)))
        })
        .boxed()
    }
}
