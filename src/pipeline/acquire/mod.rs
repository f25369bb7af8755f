//! Text acquisition per file type.
//!
//! The contract is graceful degradation: acquisition always returns
//! usable text. When a PDF has no text layer or OCR fails, a fixed
//! synthetic report stands in and the result is marked degraded.

pub mod dicom;
pub mod ocr;
pub mod pdf;

pub use ocr::OcrEngine;

use serde::Serialize;
use thiserror::Error;

use crate::models::enums::FileType;
use crate::models::parameter::TestParameter;

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),

    #[error("OCR recognition failed: {0}")]
    OcrFailed(String),
}

/// How text was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionMethod {
    PdfTextLayer,
    Ocr,
    PlainTextRead,
    DicomSummary,
    RawBytes,
}

/// Acquired text plus provenance.
#[derive(Debug, Clone)]
pub struct AcquiredText {
    pub text: String,
    pub method: AcquisitionMethod,
    /// True when a synthetic fallback replaced failed extraction.
    pub degraded: bool,
    /// Parameters synthesized during acquisition itself (DICOM file
    /// size); merged into the extraction results downstream.
    pub extra_parameters: Vec<TestParameter>,
}

impl AcquiredText {
    fn clean(text: String, method: AcquisitionMethod) -> Self {
        Self {
            text,
            method,
            degraded: false,
            extra_parameters: Vec::new(),
        }
    }

    fn degraded(text: &str, method: AcquisitionMethod) -> Self {
        Self {
            text: text.to_string(),
            method,
            degraded: true,
            extra_parameters: Vec::new(),
        }
    }
}

/// Fixed stand-in when a PDF yields no text layer.
pub const SYNTHETIC_CBC_TEXT: &str = "\
COMPLETE BLOOD COUNT (CBC)
WBC: 7.2 x10^9/L (4.0-11.0)
RBC: 4.8 x10^12/L (4.5-5.9)
Hemoglobin: 14.5 g/dL (13.5-17.5)
Hematocrit: 43.0 % (41.0-53.0)
Platelets: 250 x10^9/L (150-400)";

/// Fixed stand-in when OCR fails or returns nothing.
pub const SYNTHETIC_IMAGING_TEXT: &str = "\
IMAGING REPORT
Examination: Chest X-ray, PA and lateral views.
Findings: The lungs are clear. Heart size is normal. No pleural effusion or pneumothorax.
Impression: Normal chest X-ray.";

/// Acquire raw text for a supported file type. Never fails: every
/// failure path substitutes deterministic canned text.
///
/// The caller guarantees `file_type.is_supported()`.
pub fn acquire_text(
    file_type: FileType,
    file_name: &str,
    bytes: &[u8],
    ocr: &dyn OcrEngine,
) -> AcquiredText {
    match file_type {
        FileType::Pdf => match pdf::extract_pdf_text(bytes) {
            Ok(text) if !text.trim().is_empty() => {
                AcquiredText::clean(text, AcquisitionMethod::PdfTextLayer)
            }
            Ok(_) => {
                tracing::warn!(file_name, "PDF text layer empty, using synthetic CBC text");
                AcquiredText::degraded(SYNTHETIC_CBC_TEXT, AcquisitionMethod::PdfTextLayer)
            }
            Err(e) => {
                tracing::warn!(file_name, error = %e, "PDF extraction failed, using synthetic CBC text");
                AcquiredText::degraded(SYNTHETIC_CBC_TEXT, AcquisitionMethod::PdfTextLayer)
            }
        },
        FileType::Image => match ocr.recognize(bytes) {
            Ok(text) if !text.trim().is_empty() => {
                AcquiredText::clean(text, AcquisitionMethod::Ocr)
            }
            Ok(_) => {
                tracing::warn!(file_name, "OCR returned empty text, using synthetic narrative");
                AcquiredText::degraded(SYNTHETIC_IMAGING_TEXT, AcquisitionMethod::Ocr)
            }
            Err(e) => {
                tracing::warn!(file_name, error = %e, "OCR failed, using synthetic narrative");
                AcquiredText::degraded(SYNTHETIC_IMAGING_TEXT, AcquisitionMethod::Ocr)
            }
        },
        FileType::Text => AcquiredText::clean(
            String::from_utf8_lossy(bytes).into_owned(),
            AcquisitionMethod::PlainTextRead,
        ),
        FileType::Dicom => {
            let (summary, file_size) = dicom::synthesize_summary(file_name, bytes.len());
            let mut acquired = AcquiredText::clean(summary, AcquisitionMethod::DicomSummary);
            acquired.extra_parameters.push(file_size);
            acquired
        }
        // No protocol-aware parsing for HL7/FHIR payloads
        FileType::Hl7 | FileType::Fhir => AcquiredText::clean(
            String::from_utf8_lossy(bytes).into_owned(),
            AcquisitionMethod::RawBytes,
        ),
        FileType::Unknown => {
            // Callers reject Unknown before acquisition; treat defensively
            // as raw bytes rather than panic.
            AcquiredText::clean(
                String::from_utf8_lossy(bytes).into_owned(),
                AcquisitionMethod::RawBytes,
            )
        }
    }
}
