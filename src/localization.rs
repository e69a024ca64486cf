use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use tracing::warn;
use unic_langid::LanguageIdentifier;

/// Fallback used when neither the user's nor the configured language is available
pub const FALLBACK_LANGUAGE: &str = "en";

/// Embedded Fluent resources, keyed by language
const RESOURCES: [(&str, &str); 2] = [
    ("en", include_str!("../locales/en/main.ftl")),
    ("bn", include_str!("../locales/bn/main.ftl")),
];

/// Localization manager for the bot's replies
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
    default_language: String,
}

impl LocalizationManager {
    /// Load every embedded language; `default_language` is used for users
    /// whose Telegram language is not supported
    pub fn new(default_language: &str) -> Result<Self> {
        let mut bundles = HashMap::new();
        for (language, source) in RESOURCES {
            bundles.insert(language.to_string(), Self::create_bundle(language, source)?);
        }

        let default_language = if bundles.contains_key(default_language) {
            default_language.to_string()
        } else {
            warn!(
                language = default_language,
                fallback = FALLBACK_LANGUAGE,
                "Unsupported default language, falling back"
            );
            FALLBACK_LANGUAGE.to_string()
        };

        Ok(Self {
            bundles,
            default_language,
        })
    }

    fn create_bundle(language: &str, source: &str) -> Result<FluentBundle<FluentResource>> {
        let locale: LanguageIdentifier = language.parse()?;
        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        // Plain-text Telegram messages; bidi isolation marks would show up as noise
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("invalid {language} resource: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("failed to add {language} resource: {errors:?}"))?;
        Ok(bundle)
    }

    pub fn supported_languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.bundles.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Resolve a Telegram language code (`bn`, `bn-BD`, `en_US`) to a loaded language
    pub fn resolve_language<'a>(&'a self, language_code: Option<&str>) -> &'a str {
        language_code
            .and_then(|code| code.split(['-', '_']).next())
            .map(str::to_ascii_lowercase)
            .and_then(|primary| self.bundles.get_key_value(primary.as_str()))
            .map(|(language, _)| language.as_str())
            .unwrap_or(self.default_language.as_str())
    }

    /// Get a localized message in the user's language
    pub fn get_message(
        &self,
        key: &str,
        language_code: Option<&str>,
        args: Option<&FluentArgs>,
    ) -> String {
        let language = self.resolve_language(language_code);
        let Some(bundle) = self.bundles.get(language) else {
            return format!("Missing translation: {key}");
        };

        let Some(pattern) = bundle.get_message(key).and_then(|message| message.value()) else {
            return format!("Missing translation: {key}");
        };

        let mut errors = Vec::new();
        let value = bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            warn!(key, language, errors = ?errors, "Errors while formatting message");
        }
        value.into_owned()
    }

    pub fn text(&self, key: &str, language_code: Option<&str>) -> String {
        self.get_message(key, language_code, None)
    }

    /// Get a localized message with simple string arguments
    pub fn text_with_args(
        &self,
        key: &str,
        language_code: Option<&str>,
        args: &[(&str, String)],
    ) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, FluentValue::from(value.clone()));
        }
        self.get_message(key, language_code, Some(&fluent_args))
    }
}
