//! # Number Patterns Module
//!
//! This module contains the regex patterns used to collect phone number
//! candidates. Order matters: candidates are gathered pattern by pattern in
//! the order declared here, and deduplication keeps the first occurrence.

use lazy_static::lazy_static;
use regex::Regex;

/// `+48 600 111 222`, spaces optional
pub const INTERNATIONAL_SPACED: &str = r"\+48\s?[0-9]{3}\s?[0-9]{3}\s?[0-9]{3}";

/// `48 600 111 222`, spaces optional
pub const COUNTRY_CODE_SPACED: &str = r"48\s?[0-9]{3}\s?[0-9]{3}\s?[0-9]{3}";

/// `600 111 222` or `600-111-222`
pub const GROUPED: &str = r"[0-9]{3}[\s\-]?[0-9]{3}[\s\-]?[0-9]{3}";

/// `(12) 345-67-89`, also accepts a 3-digit middle group
pub const LANDLINE: &str = r"\([0-9]{2}\)\s?[0-9]{3}[\s\-]?[0-9]{2,3}[\s\-]?[0-9]{2}";

/// `+48600111222`
pub const INTERNATIONAL_COMPACT: &str = r"\+48[0-9]{9}";

/// `48600111222`
pub const COUNTRY_CODE_COMPACT: &str = r"48[0-9]{9}";

/// `600111222`
pub const BARE: &str = r"[0-9]{9}";

/// All candidate patterns in priority order, paired with a short name for logging.
pub const CANDIDATE_PATTERNS: [(&str, &str); 7] = [
    ("international_spaced", INTERNATIONAL_SPACED),
    ("country_code_spaced", COUNTRY_CODE_SPACED),
    ("grouped", GROUPED),
    ("landline", LANDLINE),
    ("international_compact", INTERNATIONAL_COMPACT),
    ("country_code_compact", COUNTRY_CODE_COMPACT),
    ("bare", BARE),
];

// Compiled once; the patterns are constants so compilation cannot fail at runtime.
lazy_static! {
    pub static ref CANDIDATE_REGEXES: Vec<(&'static str, Regex)> = CANDIDATE_PATTERNS
        .iter()
        .map(|(name, pattern)| {
            (
                *name,
                Regex::new(pattern).expect("Candidate pattern should be valid"),
            )
        })
        .collect();
}
