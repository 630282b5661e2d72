//! Embedded Fluent resources

use crate::error::{I18nError, I18nResult};
use crate::Locale;
use fluent_bundle::FluentResource;
use tracing::{debug, error};

const EN_US: &str = include_str!("../locales/en-US/main.ftl");
const DE_DE: &str = include_str!("../locales/de-DE/main.ftl");

/// Raw Fluent source compiled into the binary for a locale
pub fn source_for(locale: Locale) -> &'static str {
    match locale {
        Locale::English => EN_US,
        Locale::German => DE_DE,
    }
}

/// Parse the embedded resource of a locale
pub fn load_resource(locale: Locale) -> I18nResult<FluentResource> {
    parse_resource(locale, source_for(locale).to_string())
}

/// Parse Fluent source, reporting every syntax error at once
pub fn parse_resource(locale: Locale, source: String) -> I18nResult<FluentResource> {
    let resource = FluentResource::try_new(source).map_err(|(_, errors)| {
        let error_messages: Vec<String> = errors.into_iter().map(|e| format!("{:?}", e)).collect();

        error!("Failed to parse Fluent resource for {}: {:?}", locale, error_messages);

        I18nError::FluentParseError {
            locale: locale.code().to_string(),
            errors: error_messages,
        }
    })?;

    debug!("Parsed resource for locale {}", locale);
    Ok(resource)
}
