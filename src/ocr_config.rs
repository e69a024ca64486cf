//! # OCR Configuration Module
//!
//! Settings for Tesseract, preprocessing limits and failure recovery.

pub const DEFAULT_LANGUAGES: &str = "eng";
/// Tesseract page segmentation mode 6: a single uniform block of text
pub const DEFAULT_PAGE_SEG_MODE: &str = "6";
pub const MAX_FILE_SIZE: u64 = 20 * 1024 * 1024; // Telegram bots can download up to 20MB

/// Recovery configuration for error handling
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Timeout for a single OCR call in seconds
    pub operation_timeout_secs: u64,
    /// Consecutive failures before the circuit breaker opens
    pub circuit_breaker_threshold: u32,
    /// Seconds the circuit stays open before OCR is tried again
    pub circuit_breaker_reset_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            operation_timeout_secs: 30,
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// OCR language codes (e.g., "eng", "eng+pol")
    pub languages: String,
    pub page_seg_mode: String,
    /// Images larger than this are rejected without decoding
    pub max_file_size: u64,
    pub recovery: RecoveryConfig,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES.to_string(),
            page_seg_mode: DEFAULT_PAGE_SEG_MODE.to_string(),
            max_file_size: MAX_FILE_SIZE,
            recovery: RecoveryConfig::default(),
        }
    }
}
