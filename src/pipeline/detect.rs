//! File type detection from name + declared MIME type.
//!
//! Extension lists are checked first; the declared (or guessed) MIME
//! type is only a fallback. Unmatched input yields `Unknown`, which the
//! API layer treats as a rejected upload.

use std::path::Path;

use crate::models::enums::FileType;

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp", "heic",
];
const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "csv", "log", "md"];

/// Detect the file type for an upload.
///
/// When the caller declares no MIME type, one is guessed from the file
/// name before the MIME fallback runs.
pub fn detect_file_type(file_name: &str, declared_mime: Option<&str>) -> FileType {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let lower_name = file_name.to_ascii_lowercase();

    if let Some(ext) = extension.as_deref() {
        match ext {
            "pdf" => return FileType::Pdf,
            "dcm" | "dicom" => return FileType::Dicom,
            "hl7" | "h7" => return FileType::Hl7,
            "fhir" => return FileType::Fhir,
            _ if IMAGE_EXTENSIONS.contains(&ext) => return FileType::Image,
            _ if TEXT_EXTENSIONS.contains(&ext) => return FileType::Text,
            // FHIR bundles commonly travel as JSON/XML named accordingly
            "json" | "xml" if lower_name.contains("fhir") => return FileType::Fhir,
            _ => {}
        }
    }

    let guessed;
    let mime = match declared_mime {
        Some(m) if !m.is_empty() => m,
        _ => {
            guessed = mime_guess::from_path(file_name)
                .first_raw()
                .unwrap_or("")
                .to_string();
            &guessed
        }
    };
    let mime = mime.to_ascii_lowercase();

    if mime == "application/pdf" {
        FileType::Pdf
    } else if mime.starts_with("image/") {
        FileType::Image
    } else if mime.starts_with("text/") {
        FileType::Text
    } else if mime.contains("dicom") {
        FileType::Dicom
    } else {
        FileType::Unknown
    }
}
