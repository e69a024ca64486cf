//! # Text Processing Module
//!
//! This module turns raw text (OCR output or a typed message) into a
//! deduplicated list of normalized Polish phone numbers.
//!
//! ## Pipeline
//!
//! - Every candidate matcher scans the full text independently
//! - Matches are concatenated in matcher order, left to right within a matcher
//! - Each candidate is reduced to its digits and the `48` country code is dropped
//! - Only 9-digit values survive; the first occurrence of each value wins
//! - Survivors are formatted as `+48XXXXXXXXX`

use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, trace};

use crate::number_patterns::CANDIDATE_REGEXES;

/// Country calling code prepended to every normalized number
pub const COUNTRY_PREFIX: &str = "+48";

const COUNTRY_CODE_DIGITS: &str = "48";
const NATIONAL_NUMBER_LEN: usize = 9;
const NORMALIZED_LEN: usize = COUNTRY_PREFIX.len() + NATIONAL_NUMBER_LEN;

/// A single named candidate pattern
#[derive(Debug, Clone)]
pub struct CandidateMatcher {
    name: &'static str,
    pattern: Regex,
}

impl CandidateMatcher {
    pub fn new(name: &'static str, pattern: Regex) -> Self {
        Self { name, pattern }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Extracts normalized phone numbers using an ordered list of matchers
#[derive(Debug, Clone)]
pub struct PhoneNumberExtractor {
    matchers: Vec<CandidateMatcher>,
}

impl Default for PhoneNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PhoneNumberExtractor {
    /// Create an extractor with the default Polish candidate patterns
    ///
    /// # Examples
    ///
    /// ```rust
    /// use number_scanner::text_processing::PhoneNumberExtractor;
    ///
    /// let extractor = PhoneNumberExtractor::new();
    /// assert_eq!(extractor.extract("tel. 600 111 222"), vec!["+48600111222"]);
    /// ```
    pub fn new() -> Self {
        let matchers = CANDIDATE_REGEXES
            .iter()
            .map(|(name, regex)| CandidateMatcher::new(name, regex.clone()))
            .collect();
        Self { matchers }
    }

    /// Create an extractor from custom matchers, applied in the given order
    pub fn with_matchers(matchers: Vec<CandidateMatcher>) -> Self {
        Self { matchers }
    }

    pub fn matcher_names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(CandidateMatcher::name).collect()
    }

    /// Collect raw candidates from every matcher, in matcher order
    pub fn find_candidates<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut candidates = Vec::new();
        for matcher in &self.matchers {
            let before = candidates.len();
            // find_iter yields non-overlapping matches left to right
            candidates.extend(matcher.pattern.find_iter(text).map(|m| m.as_str()));
            trace!(
                matcher = matcher.name,
                found = candidates.len() - before,
                "Candidate matcher pass finished"
            );
        }
        candidates
    }

    /// Extract deduplicated, normalized numbers from `text`
    ///
    /// Returns an empty list for empty input or when nothing qualifies.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use number_scanner::text_processing::PhoneNumberExtractor;
    ///
    /// let extractor = PhoneNumberExtractor::new();
    /// let numbers = extractor.extract("Call me at 600 111 222 or 48 600111222");
    /// assert_eq!(numbers, vec!["+48600111222"]);
    /// assert!(extractor.extract("no numbers here").is_empty());
    /// ```
    pub fn extract(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let candidates = self.find_candidates(text);
        let numbers = normalize_and_dedup(candidates.iter().copied());

        debug!(
            text_length = text.len(),
            candidates = candidates.len(),
            numbers_found = numbers.len(),
            "Phone number extraction completed"
        );
        numbers
    }
}

/// Extract numbers with the default extractor
pub fn extract_polish_numbers(text: &str) -> Vec<String> {
    PhoneNumberExtractor::new().extract(text)
}

/// Reduce a candidate to its 9-digit national number
///
/// Non-digits are stripped and a leading `48` is dropped when more than
/// nine digits remain. Anything that is not exactly nine digits afterwards
/// is rejected.
pub fn normalize_candidate(candidate: &str) -> Option<String> {
    let digits: String = candidate.chars().filter(char::is_ascii_digit).collect();

    let national = if digits.len() > NATIONAL_NUMBER_LEN && digits.starts_with(COUNTRY_CODE_DIGITS) {
        &digits[COUNTRY_CODE_DIGITS.len()..]
    } else {
        digits.as_str()
    };

    (national.len() == NATIONAL_NUMBER_LEN).then(|| national.to_string())
}

/// Normalize candidates, drop duplicates keeping the first, and format them
pub fn normalize_and_dedup<'a, I>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut numbers = Vec::new();

    for candidate in candidates {
        match normalize_candidate(candidate) {
            Some(national) if seen.insert(national.clone()) => {
                numbers.push(format!("{COUNTRY_PREFIX}{national}"));
            }
            Some(_) => trace!(candidate, "Duplicate candidate skipped"),
            None => trace!(candidate, "Candidate rejected after normalization"),
        }
    }

    numbers
}

/// Whether a displayed line has the normalized `+48XXXXXXXXX` shape
pub fn is_normalized_number(line: &str) -> bool {
    line.starts_with(COUNTRY_PREFIX) && line.chars().count() == NORMALIZED_LEN
}

/// Re-read numbers from a previously sent list message
///
/// Lines are trimmed; anything that does not look like a normalized number
/// is ignored, so an unrelated message yields an empty list.
pub fn parse_displayed_numbers(body: &str) -> Vec<String> {
    body.split('\n')
        .map(str::trim)
        .filter(|line| is_normalized_number(line))
        .map(str::to_string)
        .collect()
}
