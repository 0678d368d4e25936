//! Fluent bundle storage per locale and namespace, and message formatting

use crate::error::{I18nError, I18nResult};
use crate::locale::language_identifier;
use fluent::{FluentArgs, FluentResource, FluentValue};
use fluent_bundle::concurrent::FluentBundle;
use fluent_syntax::ast;
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use storefront_common::{Locale, Namespace, ParamValue, TranslationParams};
use tracing::{debug, error, warn};

/// Joins nested parameter names into Fluent variable names.
pub const NESTED_PARAM_SEPARATOR: &str = "-";

/// Separates a message id from an attribute name in a local key.
const ATTRIBUTE_SEPARATOR: char = '.';

/// One Fluent bundle holding a single namespace for a single locale
pub struct NamespaceBundle {
    bundle: FluentBundle<FluentResource>,
}

impl std::fmt::Debug for NamespaceBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespaceBundle")
            .field("bundle", &"FluentBundle<FluentResource>")
            .finish()
    }
}

impl NamespaceBundle {
    fn new(locale: &Locale) -> I18nResult<Self> {
        let mut bundle = FluentBundle::new_concurrent(vec![language_identifier(locale)?]);
        // Set use_isolating to false for simpler output
        bundle.set_use_isolating(false);
        Ok(Self { bundle })
    }

    fn pattern<'b>(&'b self, local_key: &str) -> Option<&'b ast::Pattern<&'b str>> {
        let (id, attribute) = split_message_path(local_key);
        let message = self.bundle.get_message(id)?;
        match attribute {
            Some(name) => message.get_attribute(name).map(|attr| attr.value()),
            None => message.value(),
        }
    }
}

/// Stores loaded bundles keyed by locale and namespace
#[derive(Debug, Default)]
pub struct BundleStore {
    bundles: HashMap<(Locale, Namespace), NamespaceBundle>,
}

impl BundleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse Fluent source and add it to the bundle for `locale`/`namespace`.
    ///
    /// With `overwrite`, messages already present are replaced; without it a
    /// clash is an error and the existing messages win.
    pub fn add_source(
        &mut self,
        locale: &Locale,
        namespace: &Namespace,
        source: String,
        overwrite: bool,
    ) -> I18nResult<()> {
        let resource = FluentResource::try_new(source).map_err(|(_, errors)| {
            let error_messages: Vec<String> = errors.into_iter().map(|e| format!("{e:?}")).collect();

            error!(
                "Failed to parse Fluent resource for {}/{}: {:?}",
                locale, namespace, error_messages
            );

            I18nError::FluentParseError {
                locale: locale.to_string(),
                namespace: namespace.to_string(),
                errors: error_messages,
            }
        })?;

        let entry = match self.bundles.entry((locale.clone(), namespace.clone())) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => vacant.insert(NamespaceBundle::new(locale)?),
        };

        if overwrite {
            entry.bundle.add_resource_overriding(resource);
        } else {
            entry.bundle.add_resource(resource).map_err(|errors| {
                let error_messages: Vec<String> =
                    errors.into_iter().map(|e| format!("{e:?}")).collect();
                I18nError::BundleConflict {
                    locale: locale.to_string(),
                    namespace: namespace.to_string(),
                    errors: error_messages,
                }
            })?;
        }

        debug!("Added resource to bundle {}/{}", locale, namespace);
        Ok(())
    }

    /// Whether a bundle exists for the pair
    pub fn contains(&self, locale: &Locale, namespace: &Namespace) -> bool {
        self.bundles.contains_key(&(locale.clone(), namespace.clone()))
    }

    /// Whether `local_key` names a message value or attribute in the pair's bundle
    pub fn has_message(&self, locale: &Locale, namespace: &Namespace, local_key: &str) -> bool {
        self.bundle(locale, namespace)
            .and_then(|bundle| bundle.pattern(local_key))
            .is_some()
    }

    /// Format `local_key` with `params`, or `None` if it does not exist.
    ///
    /// Formatting errors such as a missing variable are logged; the
    /// best-effort output is still returned.
    pub fn format(
        &self,
        locale: &Locale,
        namespace: &Namespace,
        local_key: &str,
        params: &TranslationParams,
    ) -> Option<String> {
        let bundle = self.bundle(locale, namespace)?;
        let pattern = bundle.pattern(local_key)?;

        let args = fluent_args(params);
        let mut errors = Vec::new();
        let formatted = bundle
            .bundle
            .format_pattern(pattern, args.as_ref(), &mut errors);

        if !errors.is_empty() {
            let error_messages: Vec<String> = errors.into_iter().map(|e| format!("{e:?}")).collect();
            warn!(
                "Formatting errors for {}:{} in {}: {:?}",
                namespace, local_key, locale, error_messages
            );
        }

        Some(formatted.into_owned())
    }

    /// Every namespace with a bundle in any locale
    pub fn namespaces(&self) -> BTreeSet<Namespace> {
        self.bundles.keys().map(|(_, ns)| ns.clone()).collect()
    }

    /// Namespaces loaded for one locale
    pub fn namespaces_for(&self, locale: &Locale) -> BTreeSet<Namespace> {
        self.bundles
            .keys()
            .filter(|(loc, _)| loc == locale)
            .map(|(_, ns)| ns.clone())
            .collect()
    }

    fn bundle(&self, locale: &Locale, namespace: &Namespace) -> Option<&NamespaceBundle> {
        self.bundles.get(&(locale.clone(), namespace.clone()))
    }
}

/// Converts translation parameters into Fluent arguments.
///
/// Nested groups are flattened, joining names with [`NESTED_PARAM_SEPARATOR`].
pub fn fluent_args(params: &TranslationParams) -> Option<FluentArgs<'static>> {
    if params.is_empty() {
        return None;
    }

    let mut args = FluentArgs::new();
    for (name, value) in params.flattened(NESTED_PARAM_SEPARATOR) {
        match value {
            ParamValue::String(text) => args.set(name, FluentValue::from(text.clone())),
            ParamValue::Number(number) => args.set(name, FluentValue::from(*number)),
            ParamValue::Nested(_) => {}
        }
    }
    Some(args)
}

/// Splits `message.attribute` on the first dot.
fn split_message_path(local_key: &str) -> (&str, Option<&str>) {
    local_key
        .split_once(ATTRIBUTE_SEPARATOR)
        .map_or((local_key, None), |(id, attr)| (id, Some(attr)))
}
