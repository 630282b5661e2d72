//! Internationalization manager

use crate::bundle::BundleManager;
use crate::error::{I18nError, I18nResult};
use crate::resource::load_resource;
use crate::Locale;
use fluent_bundle::FluentArgs;
use tracing::{info, warn};

/// Owns the bundles of every supported locale and resolves messages with fallback
#[derive(Debug)]
pub struct I18nManager {
    /// Locale used when a message is missing in the requested one
    default_locale: Locale,
    bundle_manager: BundleManager,
}

impl I18nManager {
    /// Load every embedded locale
    pub fn new(default_locale: Locale) -> I18nResult<Self> {
        let mut bundle_manager = BundleManager::new();
        for locale in Locale::all() {
            bundle_manager.add_resource(locale, load_resource(locale)?)?;
        }

        info!("I18nManager initialized with default locale: {}", default_locale);

        Ok(Self {
            default_locale,
            bundle_manager,
        })
    }

    /// Get a localized message
    pub fn get_message(
        &self,
        key: &str,
        locale: Locale,
        args: Option<&FluentArgs>,
    ) -> I18nResult<String> {
        if self.bundle_manager.has_message(locale, key) {
            return self.bundle_manager.format_message(locale, key, args);
        }

        if locale != self.default_locale && self.bundle_manager.has_message(self.default_locale, key) {
            warn!(
                "Message '{}' not found in locale {}, falling back to {}",
                key, locale, self.default_locale
            );
            return self.bundle_manager.format_message(self.default_locale, key, args);
        }

        Err(I18nError::MessageNotFound {
            key: key.to_string(),
        })
    }

    /// Get a localized message, or the key itself when it cannot be resolved
    pub fn get_message_or_key(&self, key: &str, locale: Locale, args: Option<&FluentArgs>) -> String {
        self.get_message(key, locale, args).unwrap_or_else(|e| {
            warn!("Could not resolve message '{}': {}", key, e);
            key.to_string()
        })
    }

    /// Check if a message exists for the given locale or the default
    pub fn has_message(&self, key: &str, locale: Locale) -> bool {
        self.bundle_manager.has_message(locale, key)
            || self.bundle_manager.has_message(self.default_locale, key)
    }

    /// Get the default locale
    pub fn default_locale(&self) -> Locale {
        self.default_locale
    }

    /// Get all loaded locales
    pub fn loaded_locales(&self) -> Vec<Locale> {
        self.bundle_manager.available_locales()
    }
}
