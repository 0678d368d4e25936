//! Integration tests for the storefront-translate command line front end.

use clap::Parser;
use std::fs;
use std::sync::Arc;
use storefront_common::test_utils::{create_temp_dir, locale_fixtures, write_namespace_file};
use storefront_common::TranslationParams;
use storefront_config::ConfigCache;
use storefront_i18n::{initialize_engine, TranslationResolver};
use storefront_translate::{load_config, params_from, settled_value, Args};

const CONFIG: &str = r#"
i18n:
  default_lang: en
  backend:
    load_path: "/locales/{{lng}}/{{ns}}.ftl"
  resources:
    en:
      banner: "sale = Summer sale"
logging:
  level: warn
"#;

#[test]
fn test_args_parse() {
    let args = Args::try_parse_from([
        "storefront-translate",
        "--config",
        "storefront.yaml",
        "--locale",
        "de",
        "--production",
        "-p",
        "name=Ada",
        "--param",
        "count=2",
        "common:greeting",
        "common:cart-items",
    ])
    .unwrap();

    assert_eq!(args.locale.as_deref(), Some("de"));
    assert!(args.production);
    assert_eq!(args.params.len(), 2);
    assert_eq!(args.keys, vec!["common:greeting", "common:cart-items"]);
}

#[test]
fn test_args_require_a_key() {
    assert!(Args::try_parse_from(["storefront-translate"]).is_err());
    assert!(Args::try_parse_from(["storefront-translate", "-p", "broken", "a:b"]).is_err());
}

#[tokio::test]
async fn test_load_config_applies_overrides() {
    let dir = create_temp_dir();
    let path = dir.path().join("storefront.yaml");
    fs::write(&path, CONFIG).unwrap();

    let args = Args::try_parse_from([
        "storefront-translate",
        "--config",
        path.to_str().unwrap(),
        "--locale",
        "de",
        "--production",
        "--log-level",
        "debug",
        "banner:sale",
    ])
    .unwrap();

    let config = load_config(&args).await.unwrap();
    assert!(config.production);
    assert_eq!(config.i18n.default_lang, "de");
    assert_eq!(config.logging.level, "debug");
}

#[tokio::test]
async fn test_settled_values() {
    let dir = create_temp_dir();
    write_namespace_file(&dir.path().join("locales"), "en", "common", locale_fixtures::EN_COMMON);
    let path = dir.path().join("storefront.yaml");
    fs::write(&path, CONFIG).unwrap();

    let args = Args::try_parse_from([
        "storefront-translate",
        "--config",
        path.to_str().unwrap(),
        "common:cart-items",
    ])
    .unwrap();
    let config = load_config(&args).await.unwrap();
    let origin = dir.path().display().to_string();
    let engine = initialize_engine(&config.i18n, Some(&origin)).unwrap();
    let resolver = TranslationResolver::new(Arc::new(engine), Arc::new(ConfigCache::new(config)));

    let params = params_from(&[("count".to_string(), "3".to_string())]);
    assert_eq!(settled_value(&resolver, "common:cart-items", params).await, "3 items");
    assert_eq!(
        settled_value(&resolver, "banner:sale", TranslationParams::new()).await,
        "Summer sale"
    );
    assert_eq!(
        settled_value(&resolver, "common:unknown", TranslationParams::new()).await,
        "[common:unknown]"
    );
}
