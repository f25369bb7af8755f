//! Report category classification.
//!
//! Scored keyword classifier: every category accumulates one point per
//! distinct keyword hit, highest score wins, ties break on a fixed
//! priority order. Microbiology keywords score into their own bucket
//! that maps to `Other` — they must not bleed into a wrong category.
//!
//! All-zero scores fall through to a filename heuristic.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::enums::ReportType;

struct CategoryKeywords {
    report_type: ReportType,
    patterns: Vec<Regex>,
}

fn keywords(report_type: ReportType, patterns: &[&str]) -> CategoryKeywords {
    CategoryKeywords {
        report_type,
        patterns: patterns
            .iter()
            .map(|p| Regex::new(&format!(r"(?i)\b(?:{p})\b")).unwrap())
            .collect(),
    }
}

/// Category keyword tables, in tie-break priority order.
static CATEGORIES: LazyLock<Vec<CategoryKeywords>> = LazyLock::new(|| {
    vec![
        keywords(
            ReportType::Cbc,
            &[
                "complete blood count",
                "cbc",
                "hemoglobin|hgb",
                "hematocrit|hct",
                "platelets?",
                "wbc|white blood cells?",
                "rbc|red blood cells?",
                "mcv",
                "mchc?",
                "neutrophils?",
                "lymphocytes?",
                "differential",
            ],
        ),
        keywords(
            ReportType::LipidPanel,
            &[
                "lipid (?:panel|profile)",
                "cholesterol",
                "hdl",
                "ldl",
                "vldl",
                "triglycerides?",
                "non-hdl",
            ],
        ),
        keywords(
            ReportType::MetabolicPanel,
            &[
                "(?:basic|comprehensive) metabolic panel",
                "bmp",
                "cmp",
                "glucose",
                "blood urea nitrogen|bun",
                "creatinine",
                "egfr",
                "sodium",
                "potassium",
                "chloride",
                "bicarbonate|carbon dioxide",
                "calcium",
                "albumin",
                "bilirubin",
                "alkaline phosphatase",
                "alt|sgpt",
                "ast|sgot",
            ],
        ),
        keywords(
            ReportType::Imaging,
            &[
                "x-?rays?",
                "radiographs?",
                "ct scan",
                "computed tomography",
                "mri",
                "magnetic resonance",
                "ultrasound|sonogram",
                "impression",
                "radiolog\\w*",
                "contrast",
                "mammogra\\w*",
            ],
        ),
        keywords(
            ReportType::Pathology,
            &[
                "biops\\w*",
                "patholog\\w*",
                "specimen",
                "histolog\\w*",
                "cytolog\\w*",
                "malignan\\w*",
                "carcinoma",
                "margins?",
            ],
        ),
        keywords(
            ReportType::Urinalysis,
            &[
                "urinalysis",
                "urine",
                "specific gravity",
                "urobilinogen",
                "leukocyte esterase",
                "nitrites?",
                "ketones?",
                "clarity",
            ],
        ),
        keywords(
            ReportType::ThyroidPanel,
            &[
                "thyroid",
                "tsh",
                "thyrotropin",
                "free t4|ft4",
                "free t3|ft3",
                "t4|thyroxine",
                "t3|triiodothyronine",
                "tpo",
                "thyroglobulin",
            ],
        ),
        // Microbiology has no dedicated category; its evidence still has
        // to be counted so culture reports land in Other instead of
        // whichever panel shares a stray keyword.
        keywords(
            ReportType::Other,
            &[
                "cultures?",
                "organisms?",
                "colony count",
                "gram stain",
                "susceptibilit\\w*",
                "sensitivit\\w*",
            ],
        ),
    ]
});

/// Classify report text. Returns `Other` when no category scores.
pub fn classify_text(text: &str) -> ReportType {
    let mut best: Option<(ReportType, usize)> = None;

    for category in CATEGORIES.iter() {
        let score = category
            .patterns
            .iter()
            .filter(|re| re.is_match(text))
            .count();
        if score == 0 {
            continue;
        }
        // Strictly-greater keeps the earlier (higher-priority) category on ties
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((category.report_type, score)),
        }
    }

    best.map(|(report_type, _)| report_type)
        .unwrap_or(ReportType::Other)
}

/// Classify with the secondary filename+content heuristic as fallback.
pub fn classify_with_fallback(text: &str, file_name: &str) -> ReportType {
    let scored = classify_text(text);
    if scored != ReportType::Other {
        return scored;
    }
    infer_from_filename(file_name)
}

/// Secondary heuristic: weak signals from the file name.
fn infer_from_filename(file_name: &str) -> ReportType {
    let name = file_name.to_ascii_lowercase();
    if name.contains("cbc") || name.contains("blood_count") || name.contains("blood count") {
        ReportType::Cbc
    } else if name.contains("lipid") || name.contains("cholesterol") {
        ReportType::LipidPanel
    } else if name.contains("metabolic") || name.contains("chemistry") {
        ReportType::MetabolicPanel
    } else if name.contains("urin") {
        ReportType::Urinalysis
    } else if name.contains("thyroid") {
        ReportType::ThyroidPanel
    } else if name.contains("xray")
        || name.contains("x-ray")
        || name.contains("scan")
        || name.contains("mri")
        || name.contains("imaging")
    {
        ReportType::Imaging
    } else if name.contains("biopsy") || name.contains("path") {
        ReportType::Pathology
    } else {
        ReportType::Other
    }
}
