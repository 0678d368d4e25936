//! Test utilities and shared helpers for the storefront i18n workspace.
//!
//! Provides logging setup, temporary locale trees and sample Fluent sources
//! used by unit and integration tests across the crates.

use std::path::{Path, PathBuf};
use std::sync::Once;

#[cfg(feature = "tracing-subscriber")]
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
#[cfg(feature = "tracing-subscriber")]
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// No-op version when tracing-subscriber is not available
#[cfg(not(feature = "tracing-subscriber"))]
pub fn init_test_logging() {
    INIT.call_once(|| {});
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Writes `<root>/<lang>/<namespace>.ftl` and returns its path.
pub fn write_namespace_file(root: &Path, lang: &str, namespace: &str, source: &str) -> PathBuf {
    let dir = root.join(lang);
    std::fs::create_dir_all(&dir).expect("Failed to create locale directory");
    let path = dir.join(format!("{namespace}.ftl"));
    std::fs::write(&path, source).expect("Failed to write namespace file");
    path
}

/// Sample Fluent sources shared by tests.
pub mod locale_fixtures {
    /// English `common` namespace.
    pub const EN_COMMON: &str = r"
greeting = Hello, { $name }!
cart-items = { $count ->
    [one] { $count } item
   *[other] { $count } items
}
address = Address
    .title = Shipping address
    .street = Street
";

    /// German `common` namespace, deliberately missing `cart-items`.
    pub const DE_COMMON: &str = r"
greeting = Hallo, { $name }!
address = Adresse
    .title = Lieferadresse
";

    /// English `checkout` namespace.
    pub const EN_CHECKOUT: &str = r"
placeOrder = Place order
total = Total: { $amount }
";

    /// German `checkout` namespace.
    pub const DE_CHECKOUT: &str = r"
placeOrder = Bestellung aufgeben
";
}
