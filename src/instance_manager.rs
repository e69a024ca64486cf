//! # OCR Instance Manager Module
//!
//! Keeps one Tesseract handle per language string. Creating a handle loads
//! the trained data from disk, which is far slower than recognizing a
//! screenshot, so handles are built lazily and reused.

use leptess::LepTess;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::ocr_errors::OcrError;

pub type SharedTesseract = Arc<Mutex<LepTess>>;

#[derive(Default)]
pub struct OcrInstanceManager {
    instances: Mutex<HashMap<String, SharedTesseract>>,
}

impl OcrInstanceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the handle for `languages`, creating it on first use
    ///
    /// # Errors
    ///
    /// Returns [`OcrError::Initialization`] if Tesseract cannot load the
    /// requested languages or the pool lock is poisoned.
    pub fn get_or_create(&self, languages: &str) -> Result<SharedTesseract, OcrError> {
        let mut instances = self
            .instances
            .lock()
            .map_err(|e| OcrError::Initialization(format!("instance pool lock poisoned: {e}")))?;

        if let Some(instance) = instances.get(languages) {
            return Ok(Arc::clone(instance));
        }

        info!(languages, "Creating new Tesseract instance");
        let tess = LepTess::new(None, languages)
            .map_err(|e| OcrError::Initialization(format!("failed to initialize Tesseract: {e}")))?;

        let instance = Arc::new(Mutex::new(tess));
        instances.insert(languages.to_string(), Arc::clone(&instance));
        Ok(instance)
    }

    pub fn instance_count(&self) -> usize {
        self.instances.lock().map(|instances| instances.len()).unwrap_or(0)
    }
}
