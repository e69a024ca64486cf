//! Image preprocessing ahead of OCR.
//!
//! Screenshots of contact lists are converted to grayscale, median-blurred
//! with a 3x3 window to remove JPEG speckle, and binarized with Otsu's
//! threshold before Tesseract sees them.

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use std::io::Cursor;
use tracing::debug;

use crate::ocr_errors::OcrError;

/// Decode `bytes`, clean the image up and re-encode it as PNG
pub fn prepare_for_ocr(bytes: &[u8]) -> Result<Vec<u8>, OcrError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| OcrError::ImageLoad(format!("failed to decode image: {e}")))?;

    let gray = decoded.to_luma8();
    let blurred = median_blur_3x3(&gray);
    let threshold = otsu_threshold(&blurred);
    let binary = binarize(&blurred, threshold);

    debug!(
        width = binary.width(),
        height = binary.height(),
        threshold,
        "Image preprocessed for OCR"
    );

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(binary)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| OcrError::ImageLoad(format!("failed to encode preprocessed image: {e}")))?;
    Ok(png)
}

/// 3x3 median filter; border pixels reuse the nearest edge pixel
pub fn median_blur_3x3(image: &GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let clamp = |value: i64, max: u32| value.clamp(0, i64::from(max) - 1) as u32;

    GrayImage::from_fn(width, height, |x, y| {
        let mut window = [0u8; 9];
        let mut i = 0;
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                let sx = clamp(i64::from(x) + dx, width);
                let sy = clamp(i64::from(y) + dy, height);
                window[i] = image.get_pixel(sx, sy)[0];
                i += 1;
            }
        }
        window.sort_unstable();
        Luma([window[4]])
    })
}

/// Otsu's method: the threshold maximizing between-class variance
pub fn otsu_threshold(image: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in image.pixels() {
        histogram[usize::from(pixel[0])] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0;
    }

    let weighted_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut background_weight = 0u64;
    let mut background_sum = 0f64;
    let mut best_threshold = 0u8;
    let mut best_variance = 0f64;

    for (level, &count) in histogram.iter().enumerate() {
        background_weight += count;
        if background_weight == 0 {
            continue;
        }
        let foreground_weight = total - background_weight;
        if foreground_weight == 0 {
            break;
        }

        background_sum += level as f64 * count as f64;
        let background_mean = background_sum / background_weight as f64;
        let foreground_mean = (weighted_total - background_sum) / foreground_weight as f64;

        let variance = background_weight as f64
            * foreground_weight as f64
            * (background_mean - foreground_mean).powi(2);
        if variance > best_variance {
            best_variance = variance;
            best_threshold = level as u8;
        }
    }

    best_threshold
}

/// Pixels above `threshold` become white, the rest black
pub fn binarize(image: &GrayImage, threshold: u8) -> GrayImage {
    let mut output = image.clone();
    for pixel in output.pixels_mut() {
        pixel[0] = if pixel[0] > threshold { 255 } else { 0 };
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bimodal(width: u32, height: u32, dark: u8, light: u8) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Luma([dark])
            } else {
                Luma([light])
            }
        })
    }

    #[test]
    fn test_otsu_splits_bimodal_image() {
        let image = bimodal(10, 4, 40, 200);
        let threshold = otsu_threshold(&image);
        assert!((40..200).contains(&threshold));

        let binary = binarize(&image, threshold);
        assert_eq!(binary.get_pixel(0, 0)[0], 0);
        assert_eq!(binary.get_pixel(9, 0)[0], 255);
    }

    #[test]
    fn test_median_removes_isolated_pixel() {
        let mut image = GrayImage::from_pixel(5, 5, Luma([255]));
        image.put_pixel(2, 2, Luma([0]));

        let blurred = median_blur_3x3(&image);
        assert_eq!(blurred.get_pixel(2, 2)[0], 255);
    }

    #[test]
    fn test_median_keeps_dimensions() {
        let image = bimodal(7, 3, 0, 255);
        assert_eq!(median_blur_3x3(&image).dimensions(), (7, 3));
    }

    #[test]
    fn test_prepare_rejects_garbage() {
        let result = prepare_for_ocr(b"definitely not an image");
        assert!(matches!(result, Err(OcrError::ImageLoad(_))));
    }

    #[test]
    fn test_prepare_outputs_png() {
        let image = DynamicImage::ImageLuma8(bimodal(8, 8, 10, 240));
        let mut encoded = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
            .unwrap();

        let prepared = prepare_for_ocr(&encoded).unwrap();
        assert_eq!(image::guess_format(&prepared).unwrap(), ImageFormat::Png);
    }
}
