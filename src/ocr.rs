use async_trait::async_trait;
use leptess::Variable;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::circuit_breaker::CircuitBreaker;
use crate::instance_manager::OcrInstanceManager;
use crate::ocr_config::OcrConfig;
use crate::ocr_errors::OcrError;
use crate::preprocessing::prepare_for_ocr;

/// Opaque text-producing service
///
/// `Ok(None)` means the image was read but contained no text.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: Vec<u8>) -> Result<Option<String>, OcrError>;
}

/// Tesseract-backed recognizer with preprocessing, timeout and circuit breaker
pub struct TesseractRecognizer {
    config: OcrConfig,
    instances: Arc<OcrInstanceManager>,
    circuit_breaker: CircuitBreaker,
}

impl TesseractRecognizer {
    pub fn new(config: OcrConfig) -> Self {
        let circuit_breaker = CircuitBreaker::new(&config.recovery);
        Self {
            config,
            instances: Arc::new(OcrInstanceManager::new()),
            circuit_breaker,
        }
    }

    async fn run_ocr(&self, image: Vec<u8>) -> Result<String, OcrError> {
        validate_image_bytes(&image, &self.config)?;

        let instances = Arc::clone(&self.instances);
        let languages = self.config.languages.clone();
        let page_seg_mode = self.config.page_seg_mode.clone();

        let task = tokio::task::spawn_blocking(move || {
            let prepared = prepare_for_ocr(&image)?;
            let instance = instances.get_or_create(&languages)?;
            let mut tess = instance
                .lock()
                .map_err(|e| OcrError::Extraction(format!("Tesseract lock poisoned: {e}")))?;

            tess.set_variable(Variable::TesseditPagesegMode, &page_seg_mode)
                .map_err(|e| OcrError::Initialization(format!("failed to set page segmentation mode: {e:?}")))?;
            tess.set_image_from_mem(&prepared)
                .map_err(|e| OcrError::ImageLoad(format!("Tesseract rejected image: {e:?}")))?;
            tess.get_utf8_text()
                .map_err(|e| OcrError::Extraction(format!("failed to read recognized text: {e}")))
        });

        let timeout = Duration::from_secs(self.config.recovery.operation_timeout_secs);
        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(OcrError::Extraction(format!("OCR task failed: {join_error}"))),
            Err(_) => Err(OcrError::Timeout(format!(
                "OCR did not finish within {}s",
                timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(&self, image: Vec<u8>) -> Result<Option<String>, OcrError> {
        if self.circuit_breaker.is_open() {
            warn!("OCR circuit breaker is open, skipping recognition");
            return Err(OcrError::Unavailable(format!(
                "{} consecutive failures",
                self.circuit_breaker.failure_count()
            )));
        }

        debug!(image_bytes = image.len(), "Starting OCR text extraction");
        match self.run_ocr(image).await {
            Ok(raw_text) => {
                self.circuit_breaker.record_success();
                let cleaned = clean_ocr_text(&raw_text);
                info!(chars_extracted = cleaned.len(), "OCR extraction completed");
                Ok((!cleaned.is_empty()).then_some(cleaned))
            }
            Err(e) => {
                // Undecodable uploads say nothing about the health of Tesseract
                if !matches!(e, OcrError::Validation(_) | OcrError::ImageLoad(_)) {
                    self.circuit_breaker.record_failure();
                }
                Err(e)
            }
        }
    }
}

/// Reject payloads that are empty or larger than the configured limit
pub fn validate_image_bytes(image: &[u8], config: &OcrConfig) -> Result<(), OcrError> {
    if image.is_empty() {
        return Err(OcrError::Validation("image is empty".to_string()));
    }
    let size = image.len() as u64;
    if size > config.max_file_size {
        return Err(OcrError::Validation(format!(
            "image is {size} bytes, limit is {} bytes",
            config.max_file_size
        )));
    }
    Ok(())
}

/// Trim every line and drop empty ones
pub fn clean_ocr_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_ocr_text() {
        let raw = "  Jan Kowalski \n\n   600 111 222\n \n";
        assert_eq!(clean_ocr_text(raw), "Jan Kowalski\n600 111 222");
        assert_eq!(clean_ocr_text(" \n \n"), "");
    }

    #[test]
    fn test_validate_image_bytes() {
        let config = OcrConfig {
            max_file_size: 4,
            ..Default::default()
        };
        assert!(validate_image_bytes(&[1, 2, 3], &config).is_ok());
        assert!(matches!(
            validate_image_bytes(&[], &config),
            Err(OcrError::Validation(_))
        ));
        assert!(matches!(
            validate_image_bytes(&[0; 5], &config),
            Err(OcrError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_open_breaker_fails_fast() {
        let mut config = OcrConfig::default();
        config.recovery.circuit_breaker_threshold = 1;
        let recognizer = TesseractRecognizer::new(config);
        recognizer.circuit_breaker.record_failure();

        let result = recognizer.recognize(vec![1, 2, 3]).await;
        assert!(matches!(result, Err(OcrError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_garbage_image_does_not_trip_breaker() {
        let recognizer = TesseractRecognizer::new(OcrConfig::default());

        let result = recognizer.recognize(b"not an image".to_vec()).await;
        assert!(matches!(result, Err(OcrError::ImageLoad(_))));
        assert_eq!(recognizer.circuit_breaker.failure_count(), 0);
    }
}
