//! # Localization Tests
//!
//! This module contains unit tests for the localization functionality,
//! testing message retrieval and formatting with various edge cases.

use number_scanner::localization::{LocalizationManager, FALLBACK_LANGUAGE};

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 8] = [
        "start-instructions",
        "start-copy-hint",
        "copy-all-button",
        "copy-confirmed",
        "copy-paste-hint",
        "copy-failed",
        "health-ok",
        "failure-notice",
    ];

    fn setup_localization() -> LocalizationManager {
        LocalizationManager::new("en").expect("Failed to create localization manager")
    }

    #[test]
    fn test_supported_languages() {
        let manager = setup_localization();
        assert_eq!(manager.supported_languages(), vec!["bn", "en"]);
        assert_eq!(manager.default_language(), "en");
    }

    #[test]
    fn test_every_key_exists_in_every_language() {
        let manager = setup_localization();
        for language in manager.supported_languages() {
            for key in KEYS {
                let message = manager.text(key, Some(language));
                assert!(
                    !message.starts_with("Missing translation:"),
                    "{key} missing for {language}"
                );
            }
        }
    }

    #[test]
    fn test_get_message_nonexistent_key() {
        let manager = setup_localization();

        let message = manager.text("nonexistent-key", Some("en"));
        assert!(message.starts_with("Missing translation:"));
    }

    #[test]
    fn test_unsupported_language_uses_default() {
        let manager = setup_localization();

        let message = manager.text("copy-all-button", Some("pl"));
        assert_eq!(message, "📋 Copy all numbers");
    }

    #[test]
    fn test_configured_default_language() {
        let manager = LocalizationManager::new("bn").unwrap();

        assert_eq!(manager.default_language(), "bn");
        assert_eq!(manager.text("health-ok", None), "🤖 বট চলমান...");
        assert_eq!(manager.text("health-ok", Some("en-GB")), "🤖 Bot is running...");
    }

    #[test]
    fn test_unknown_default_language_falls_back() {
        let manager = LocalizationManager::new("fr").unwrap();
        assert_eq!(manager.default_language(), FALLBACK_LANGUAGE);
    }

    #[test]
    fn test_bengali_differs_from_english() {
        let manager = setup_localization();

        let bengali = manager.text("copy-all-button", Some("bn"));
        let english = manager.text("copy-all-button", Some("en"));
        assert_ne!(bengali, english);
        assert_eq!(bengali, "📋 সব নাম্বার কপি করুন");
    }

    #[test]
    fn test_get_message_with_args() {
        let manager = setup_localization();

        let message = manager.text_with_args("copy-confirmed", Some("en"), &[("count", "5".to_string())]);
        assert_eq!(message, "✅ 5 numbers copied!");

        let message = manager.text_with_args("copy-confirmed", Some("bn"), &[("count", "3".to_string())]);
        assert!(message.contains('3'));
    }

    #[test]
    fn test_get_message_missing_args() {
        let manager = setup_localization();

        // Fluent renders the unresolved variable instead of failing
        let message = manager.text("copy-confirmed", Some("en"));
        assert!(!message.is_empty());
        assert!(message.contains("numbers copied"));
    }
}
