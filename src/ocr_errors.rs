//! # OCR Error Types Module
//!
//! Structured errors for the OCR path. The dispatcher turns every one of
//! them into the same short failure notice; the variants exist for logging.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum OcrError {
    /// Input rejected before OCR (size, empty payload)
    #[error("Validation error: {0}")]
    Validation(String),
    /// Tesseract could not be initialized
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// Image bytes could not be decoded or handed to Tesseract
    #[error("Image load error: {0}")]
    ImageLoad(String),
    /// Tesseract failed while recognizing text
    #[error("Extraction error: {0}")]
    Extraction(String),
    /// OCR did not finish within the configured timeout
    #[error("Timeout error: {0}")]
    Timeout(String),
    /// Circuit breaker is open after repeated failures
    #[error("OCR temporarily unavailable: {0}")]
    Unavailable(String),
}

