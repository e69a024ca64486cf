//! # OCR Tests Module
//!
//! Test suite for the OCR path that does not need trained Tesseract data:
//! configuration, validation, preprocessing, error reporting and the
//! circuit breaker.

#[cfg(test)]
mod tests {
    use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
    use number_scanner::circuit_breaker::CircuitBreaker;
    use number_scanner::instance_manager::OcrInstanceManager;
    use number_scanner::ocr::{clean_ocr_text, validate_image_bytes, TesseractRecognizer, TextRecognizer};
    use number_scanner::ocr_config::{OcrConfig, RecoveryConfig, MAX_FILE_SIZE};
    use number_scanner::ocr_errors::OcrError;
    use number_scanner::preprocessing::{binarize, otsu_threshold, prepare_for_ocr};
    use number_scanner::text_processing::extract_polish_numbers;
    use std::io::Cursor;

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        bytes
    }

    /// Light page with a dark text band and a few noisy pixels
    fn screenshot_like() -> RgbImage {
        RgbImage::from_fn(40, 20, |x, y| {
            if (8..12).contains(&y) && (5..35).contains(&x) {
                Rgb([20, 20, 30])
            } else if (x * 7 + y * 3) % 37 == 0 {
                Rgb([90, 90, 90])
            } else {
                Rgb([235, 235, 230])
            }
        })
    }

    /// Test OCR configuration defaults
    #[test]
    fn test_ocr_config_defaults() {
        let config = OcrConfig::default();

        assert_eq!(config.languages, "eng");
        assert_eq!(config.page_seg_mode, "6");
        assert_eq!(config.max_file_size, MAX_FILE_SIZE);
        assert_eq!(config.max_file_size, 20 * 1024 * 1024);
    }

    /// Test recovery configuration defaults
    #[test]
    fn test_recovery_config_defaults() {
        let recovery = RecoveryConfig::default();

        assert_eq!(recovery.operation_timeout_secs, 30);
        assert_eq!(recovery.circuit_breaker_threshold, 5);
        assert_eq!(recovery.circuit_breaker_reset_secs, 60);
    }

    /// Test circuit breaker state transitions
    #[test]
    fn test_circuit_breaker_state_transitions() {
        let config = RecoveryConfig {
            circuit_breaker_threshold: 2,
            ..Default::default()
        };
        let circuit_breaker = CircuitBreaker::new(&config);

        assert!(!circuit_breaker.is_open());

        circuit_breaker.record_failure();
        assert!(!circuit_breaker.is_open());

        circuit_breaker.record_failure();
        assert!(circuit_breaker.is_open());
        assert_eq!(circuit_breaker.failure_count(), 2);

        circuit_breaker.record_success();
        assert!(!circuit_breaker.is_open());
    }

    #[test]
    fn test_instance_manager_starts_empty() {
        let manager = OcrInstanceManager::new();
        assert_eq!(manager.instance_count(), 0);
    }

    #[test]
    fn test_validate_image_bytes_limits() {
        let config = OcrConfig {
            max_file_size: 10,
            ..Default::default()
        };

        assert!(validate_image_bytes(&[0; 10], &config).is_ok());

        let error = validate_image_bytes(&[0; 11], &config).unwrap_err();
        assert!(matches!(error, OcrError::Validation(_)));
        assert!(error.to_string().contains("limit is 10 bytes"));
    }

    #[test]
    fn test_error_display() {
        let cases = [
            (OcrError::Validation("x".into()), "Validation error: x"),
            (OcrError::Initialization("x".into()), "Initialization error: x"),
            (OcrError::ImageLoad("x".into()), "Image load error: x"),
            (OcrError::Extraction("x".into()), "Extraction error: x"),
            (OcrError::Timeout("x".into()), "Timeout error: x"),
            (OcrError::Unavailable("x".into()), "OCR temporarily unavailable: x"),
        ];
        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_preprocessing_produces_black_and_white_png() {
        let png = encode(DynamicImage::ImageRgb8(screenshot_like()), ImageFormat::Png);

        let prepared = prepare_for_ocr(&png).unwrap();
        let decoded = image::load_from_memory(&prepared).unwrap().to_luma8();

        assert_eq!(decoded.dimensions(), (40, 20));
        assert!(decoded.pixels().all(|p| p[0] == 0 || p[0] == 255));
        // Text band stays dark, page stays light, speckle is gone
        assert_eq!(decoded.get_pixel(20, 10)[0], 0);
        assert_eq!(decoded.get_pixel(2, 2)[0], 255);
        assert!(decoded
            .enumerate_pixels()
            .filter(|(_, y, _)| !(7..13).contains(y))
            .all(|(_, _, p)| p[0] == 255));
    }

    #[test]
    fn test_uniform_image_is_all_one_colour() {
        let image = GrayImage::from_pixel(6, 6, Luma([128]));
        let threshold = otsu_threshold(&image);
        let binary = binarize(&image, threshold);

        let first = binary.get_pixel(0, 0)[0];
        assert!(binary.pixels().all(|p| p[0] == first));
    }

    #[tokio::test]
    async fn test_oversized_image_does_not_open_breaker() {
        let mut config = OcrConfig {
            max_file_size: 4,
            ..Default::default()
        };
        config.recovery.circuit_breaker_threshold = 1;
        let recognizer = TesseractRecognizer::new(config);

        for _ in 0..3 {
            let result = recognizer.recognize(vec![0; 8]).await;
            assert!(matches!(result, Err(OcrError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_empty_image_is_rejected() {
        let recognizer = TesseractRecognizer::new(OcrConfig::default());
        let result = recognizer.recognize(Vec::new()).await;
        assert!(matches!(result, Err(OcrError::Validation(_))));
    }

    #[test]
    fn test_cleaned_ocr_text_feeds_extraction() {
        let raw = "  Kontakty  \n\n Anna   600 111 222 \n\n\n Biuro (12) 345-67-89\n";
        let cleaned = clean_ocr_text(raw);

        assert_eq!(cleaned, "Kontakty\nAnna   600 111 222\nBiuro (12) 345-67-89");
        assert_eq!(
            extract_polish_numbers(&cleaned),
            vec!["+48600111222", "+48123456789"]
        );
    }
}
