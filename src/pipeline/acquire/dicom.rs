//! DICOM filename heuristics.
//!
//! No binary DICOM parsing here: the filename is scanned for modality
//! and body-part tokens and a textual summary is synthesized, plus a
//! File Size parameter.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::enums::ParameterStatus;
use crate::models::parameter::{ReferenceRange, TestParameter};

static MODALITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(ct|mri|mr|x[ -]?ray|xray|xr|cr|dx|us|ultrasound|mg|mammo|pet)\b").unwrap()
});

static BODY_PART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(chest|thorax|head|brain|abdomen|pelvis|spine|knee|shoulder|hip|wrist|ankle|neck|sinus)\b",
    )
    .unwrap()
});

fn modality_name(token: &str) -> &'static str {
    match token.to_ascii_lowercase().as_str() {
        "ct" => "CT scan",
        "mri" | "mr" => "MRI",
        "us" | "ultrasound" => "Ultrasound",
        "mg" | "mammo" => "Mammography",
        "pet" => "PET scan",
        // xr / cr / dx / x-ray
        _ => "X-ray",
    }
}

/// Synthesize a textual summary and File Size parameter for a DICOM
/// upload.
pub fn synthesize_summary(file_name: &str, byte_len: usize) -> (String, TestParameter) {
    // Underscores are word characters; separate the filename tokens so
    // the boundary matchers can see them.
    let tokens = file_name.replace(['_', '-', '.'], " ");
    let modality = MODALITY_RE
        .captures(&tokens)
        .map(|c| modality_name(&c[1]))
        .unwrap_or("Radiographic study");
    let body_part = BODY_PART_RE.captures(&tokens).map(|c| {
        let mut part = c[1].to_ascii_lowercase();
        if let Some(first) = part.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        part
    });

    let mut summary = String::from("DICOM IMAGING STUDY\n");
    match &body_part {
        Some(part) => summary.push_str(&format!("Examination: {modality} of the {part}.\n")),
        None => summary.push_str(&format!("Examination: {modality}.\n")),
    }
    summary.push_str("Source: DICOM file; pixel data not interpreted.\n");
    summary.push_str(&format!("File: {file_name}"));

    let kilobytes = (byte_len as f64 / 1024.0 * 10.0).round() / 10.0;
    let file_size = TestParameter {
        name: "File Size".to_string(),
        value: Some(kilobytes),
        value_text: None,
        unit: Some("KB".to_string()),
        status: ParameterStatus::NotAvailable,
        reference_range: ReferenceRange::default(),
    };

    (summary, file_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_modality_and_body_part() {
        let (summary, _) = synthesize_summary("chest_ct_2024.dcm", 1024);
        assert!(summary.contains("CT scan"));
        assert!(summary.contains("Chest"));
    }

    #[test]
    fn unrecognized_name_gets_generic_summary() {
        let (summary, _) = synthesize_summary("img001.dcm", 1024);
        assert!(summary.contains("Radiographic study"));
    }

    #[test]
    fn file_size_parameter_in_kilobytes() {
        let (_, param) = synthesize_summary("mri_brain.dcm", 2048);
        assert_eq!(param.name, "File Size");
        assert_eq!(param.value, Some(2.0));
        assert_eq!(param.unit.as_deref(), Some("KB"));
    }

    #[test]
    fn xray_variants() {
        for name in ["knee_xray.dcm", "KNEE_XR.dcm", "x-ray_knee.dcm"] {
            let (summary, _) = synthesize_summary(name, 10);
            assert!(summary.contains("X-ray"), "{name}: {summary}");
            assert!(summary.contains("Knee"), "{name}");
        }
    }
}
