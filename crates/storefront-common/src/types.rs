//! Translation domain types and newtype wrappers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Separator between the namespace and the local part of a translation key.
pub const NAMESPACE_SEPARATOR: char = ':';

/// A locale identifier such as `en` or `de-CH`.
///
/// The value is opaque here; parsing into a language identifier happens in
/// the engine that needs it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Creates a locale from a language tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The language tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

/// A named, independently loadable group of translation keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    /// Creates a namespace from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The namespace name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Namespace {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Namespace {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A translation key of the form `<namespace>:<localKey>`.
///
/// The key is split on the first separator only, so the local part may
/// itself contain `:`. Keys without a separator are kept as-is; whoever
/// consumes them decides what they mean.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslationKey {
    raw: String,
    separator: Option<usize>,
}

impl TranslationKey {
    /// Wraps a raw key string.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let separator = raw.find(NAMESPACE_SEPARATOR);
        Self { raw, separator }
    }

    /// The full key as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The namespace part, or the whole key when there is no separator.
    pub fn namespace(&self) -> &str {
        self.separator.map_or(self.raw.as_str(), |idx| &self.raw[..idx])
    }

    /// The local part, or an empty string when there is no separator.
    pub fn local_key(&self) -> &str {
        self.separator
            .map_or("", |idx| &self.raw[idx + NAMESPACE_SEPARATOR.len_utf8()..])
    }

    /// The namespace, only if the key actually names one.
    pub fn explicit_namespace(&self) -> Option<&str> {
        self.separator.map(|idx| &self.raw[..idx])
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for TranslationKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for TranslationKey {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

/// A single interpolation parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
    /// Nested group of values.
    Nested(TranslationParams),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<TranslationParams> for ParamValue {
    fn from(value: TranslationParams) -> Self {
        Self::Nested(value)
    }
}

/// Interpolation parameters, keyed by placeholder name.
///
/// The resolver never looks inside; the engine decides how values are
/// substituted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationParams(BTreeMap<String, ParamValue>);

impl TranslationParams {
    /// Empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts or replaces a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Looks up a top-level parameter.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// Whether no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of top-level parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over top-level parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Scalar leaves with nested names joined by `separator`.
    ///
    /// `{ user: { name: "Ada" } }` flattened with `-` yields `("user-name", "Ada")`.
    pub fn flattened(&self, separator: &str) -> Vec<(String, &ParamValue)> {
        let mut leaves = Vec::new();
        self.collect_leaves("", separator, &mut leaves);
        leaves
    }

    fn collect_leaves<'a>(
        &'a self,
        prefix: &str,
        separator: &str,
        leaves: &mut Vec<(String, &'a ParamValue)>,
    ) {
        for (name, value) in &self.0 {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}{separator}{name}")
            };
            match value {
                ParamValue::Nested(inner) => inner.collect_leaves(&path, separator, leaves),
                scalar => leaves.push((path, scalar)),
            }
        }
    }
}

impl<K, V> FromIterator<(K, V)> for TranslationParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}
