//! Keeps an engine's active locale in step with a [`LocaleSource`].

use crate::engine::I18nEngine;
use crate::locale::LocaleSource;
use futures::StreamExt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Spawns a task forwarding every locale `source` emits to
/// [`I18nEngine::change_locale`], the initial value included.
///
/// The task ends when the source stream ends. Must be called from within a
/// Tokio runtime.
pub fn sync_engine_with_locale_source(
    engine: Arc<dyn I18nEngine>,
    source: &dyn LocaleSource,
) -> JoinHandle<()> {
    let mut locales = source.active();

    tokio::spawn(async move {
        while let Some(locale) = locales.next().await {
            info!("Active locale is now {}", locale);
            engine.change_locale(locale);
        }
        debug!("Locale source ended, stopping locale sync");
    })
}
