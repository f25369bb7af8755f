//! OCR collaborator boundary.
//!
//! The engine is external; this crate only defines the seam. Engines
//! are scoped to one request and dropped on every path, so cleanup is
//! structural rather than a finally block.

use super::AcquireError;

/// External OCR engine contract: image bytes in, recognized text out.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &[u8]) -> Result<String, AcquireError>;
}

/// Engine used when no OCR backend is configured. Every call fails,
/// which the acquisition layer degrades to canned narrative text.
pub struct DisabledOcr;

impl OcrEngine for DisabledOcr {
    fn recognize(&self, _image: &[u8]) -> Result<String, AcquireError> {
        Err(AcquireError::OcrUnavailable("no OCR backend configured".into()))
    }
}

/// Test double returning fixed text.
pub struct FixedOcr {
    text: String,
}

impl FixedOcr {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl OcrEngine for FixedOcr {
    fn recognize(&self, _image: &[u8]) -> Result<String, AcquireError> {
        Ok(self.text.clone())
    }
}

/// Test double that always fails recognition.
pub struct FailingOcr;

impl OcrEngine for FailingOcr {
    fn recognize(&self, _image: &[u8]) -> Result<String, AcquireError> {
        Err(AcquireError::OcrFailed("simulated recognition failure".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_engine_always_errors() {
        let result = DisabledOcr.recognize(&[1, 2, 3]);
        assert!(matches!(result, Err(AcquireError::OcrUnavailable(_))));
    }

    #[test]
    fn fixed_engine_returns_text() {
        let ocr = FixedOcr::new("Glucose: 95 mg/dL");
        assert_eq!(ocr.recognize(&[]).unwrap(), "Glucose: 95 mg/dL");
    }
}
