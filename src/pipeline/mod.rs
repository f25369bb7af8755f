//! Report processing pipeline: detect → acquire → classify → extract →
//! standardize.

pub mod acquire;
pub mod classify;
pub mod detect;
pub mod extract;
pub mod standardize;
pub mod status;

use thiserror::Error;

use crate::models::enums::{FileType, ReportType};
use crate::models::report::StandardizedReport;

use acquire::{AcquiredText, OcrEngine};
use standardize::{standardize, StandardizeOptions};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unsupported file type for '{file_name}'")]
    UnsupportedFile { file_name: String },
}

/// Output of one full upload run.
#[derive(Debug)]
pub struct ProcessedUpload {
    pub standardized: StandardizedReport,
    pub acquisition: acquire::AcquisitionMethod,
    /// True when a synthetic fallback replaced failed extraction.
    pub degraded: bool,
}

/// Run the full pipeline on one uploaded file.
///
/// Fails only on an unsupported file type; every downstream failure
/// degrades to deterministic text instead.
pub fn process_upload(
    file_name: &str,
    declared_mime: Option<&str>,
    bytes: &[u8],
    ocr: &dyn OcrEngine,
    report_type_override: Option<ReportType>,
) -> Result<ProcessedUpload, PipelineError> {
    let file_type = detect::detect_file_type(file_name, declared_mime);
    if !file_type.is_supported() {
        return Err(PipelineError::UnsupportedFile {
            file_name: file_name.to_string(),
        });
    }
    tracing::info!(file_name, file_type = file_type.as_str(), "processing upload");

    let AcquiredText {
        text,
        method,
        degraded,
        extra_parameters,
    } = acquire::acquire_text(file_type, file_name, bytes, ocr);

    // DICOM pixel data is never interpreted; the study is imaging by
    // construction unless the caller says otherwise.
    let type_override = report_type_override.or(match file_type {
        FileType::Dicom => Some(ReportType::Imaging),
        _ => None,
    });

    let standardized = standardize(
        &text,
        file_name,
        StandardizeOptions {
            report_type_override: type_override,
            caller_parameters: Vec::new(),
            extra_parameters,
        },
    );

    Ok(ProcessedUpload {
        standardized,
        acquisition: method,
        degraded,
    })
}
