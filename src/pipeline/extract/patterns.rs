//! Per-category parameter tables and their compiled detector regexes.
//!
//! Each table row names one canonical parameter and the alias
//! alternation that detects it in report text. Regexes compile once
//! per category.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::enums::ReportType;

/// One parameter the extractor knows how to detect.
struct ParamSpec {
    canonical: &'static str,
    /// Case-insensitive regex alternation of name variants.
    aliases: &'static str,
    /// Accepts categorical readings (negative/trace/colors) as values.
    categorical: bool,
    /// Reject a name match when one of these tokens appears just before
    /// it (regex has no lookbehind; "cholesterol" must not hit inside
    /// "HDL Cholesterol").
    exclude_before: &'static [&'static str],
}

const fn spec(canonical: &'static str, aliases: &'static str) -> ParamSpec {
    ParamSpec {
        canonical,
        aliases,
        categorical: false,
        exclude_before: &[],
    }
}

const fn categorical(canonical: &'static str, aliases: &'static str) -> ParamSpec {
    ParamSpec {
        canonical,
        aliases,
        categorical: true,
        exclude_before: &[],
    }
}

const fn guarded(
    canonical: &'static str,
    aliases: &'static str,
    exclude_before: &'static [&'static str],
) -> ParamSpec {
    ParamSpec {
        canonical,
        aliases,
        categorical: false,
        exclude_before,
    }
}

const CBC_SPECS: &[ParamSpec] = &[
    spec("WBC", r"wbc|white blood cells?(?:\s+count)?|leukocytes?"),
    spec("RBC", r"rbc|red blood cells?(?:\s+count)?|erythrocytes?"),
    spec("Hemoglobin", r"hemoglobin|haemoglobin|hgb|hb"),
    spec("Hematocrit", r"hematocrit|haematocrit|hct"),
    spec("Platelets", r"platelets?(?:\s+count)?|plt"),
    spec("MCV", r"mcv|mean corpuscular volume"),
    spec("MCH", r"mch|mean corpuscular hemoglobin"),
    spec("MCHC", r"mchc"),
    spec("Neutrophils", r"neutrophils?|neut"),
    spec("Lymphocytes", r"lymphocytes?|lymphs?"),
    spec("Monocytes", r"monocytes?|mono"),
    spec("Eosinophils", r"eosinophils?|eos"),
    spec("Basophils", r"basophils?|baso"),
];

const LIPID_SPECS: &[ParamSpec] = &[
    spec("HDL Cholesterol", r"hdl(?:-c)?(?:\s+cholesterol)?"),
    spec("LDL Cholesterol", r"ldl(?:-c)?(?:\s+cholesterol)?"),
    spec("VLDL Cholesterol", r"vldl(?:\s+cholesterol)?"),
    guarded(
        "Total Cholesterol",
        r"total cholesterol|cholesterol,?\s*total|cholesterol",
        &["hdl", "ldl", "vldl", "non-"],
    ),
    spec("Triglycerides", r"triglycerides?|trig"),
    spec(
        "Cholesterol/HDL Ratio",
        r"(?:total\s+)?chol(?:esterol)?\s*/\s*hdl(?:\s+ratio)?|tc/hdl",
    ),
];

const METABOLIC_SPECS: &[ParamSpec] = &[
    spec("Glucose", r"glucose|fasting glucose|blood sugar"),
    spec("BUN", r"bun|blood urea nitrogen|urea nitrogen"),
    spec("Creatinine", r"creatinine"),
    spec("eGFR", r"egfr|estimated gfr"),
    spec("Sodium", r"sodium"),
    spec("Potassium", r"potassium"),
    spec("Chloride", r"chloride"),
    spec("CO2", r"co2|carbon dioxide|bicarbonate|hco3"),
    spec("Calcium", r"calcium"),
    spec("Total Protein", r"total protein"),
    spec("Albumin", r"albumin"),
    guarded("Total Bilirubin", r"(?:total\s+)?bilirubin", &["direct"]),
    spec("ALT", r"alt|sgpt|alanine aminotransferase"),
    spec("AST", r"ast|sgot|aspartate aminotransferase"),
    spec("Alkaline Phosphatase", r"alp|alkaline phosphatase"),
];

const URINALYSIS_SPECS: &[ParamSpec] = &[
    categorical("Color", r"colou?r"),
    categorical("Appearance", r"appearance|clarity"),
    spec("Specific Gravity", r"specific gravity|sp\.?\s*gr\.?"),
    spec("pH", r"ph"),
    categorical("Protein", r"protein"),
    categorical("Glucose", r"glucose"),
    categorical("Ketones", r"ketones?"),
    categorical("Blood", r"(?:occult\s+)?blood"),
    categorical("Nitrite", r"nitrites?"),
    categorical("Leukocyte Esterase", r"leukocyte esterase|leukocytes?"),
    categorical("Bilirubin", r"bilirubin"),
    categorical("Urobilinogen", r"urobilinogen"),
];

const THYROID_SPECS: &[ParamSpec] = &[
    spec("TSH", r"tsh|thyroid stimulating hormone|thyrotropin"),
    spec("Free T4", r"free t4|ft4"),
    spec("Free T3", r"free t3|ft3"),
    guarded("Total T4", r"(?:total\s+)?t4|thyroxine", &["free"]),
    guarded("Total T3", r"(?:total\s+)?t3|triiodothyronine", &["free"]),
    spec(
        "TPO Antibodies",
        r"tpo(?:\s+antibod\w*)?|thyroid peroxidase antibod\w*",
    ),
    spec(
        "Thyroglobulin Antibodies",
        r"thyroglobulin antibod\w*|tg ab",
    ),
];

fn specs_for(report_type: ReportType) -> &'static [ParamSpec] {
    match report_type {
        ReportType::Cbc => CBC_SPECS,
        ReportType::LipidPanel => LIPID_SPECS,
        ReportType::MetabolicPanel => METABOLIC_SPECS,
        ReportType::Urinalysis => URINALYSIS_SPECS,
        ReportType::ThyroidPanel => THYROID_SPECS,
        ReportType::Imaging | ReportType::Pathology | ReportType::Other => &[],
    }
}

// ── Regex fragments shared by the strategies ─────────────────────────

pub(crate) const NUM: &str = r"[<>]?\d+(?:[.,]\d+)?";
pub(crate) const UNIT: &str = r"[a-zA-Zµ%][\w%^/.\-]*";
pub(crate) const CATEGORICAL_VALUE: &str = "negative|positive|trace|absent|present|clear|cloudy|turbid|hazy|straw|amber|pale yellow|dark yellow|yellow|red|brown|\\d\\+";
pub(crate) const RANGE: &str = r"\(\s*(?:ref(?:erence)?(?:\s+range)?\s*:?\s*)?(?P<min>\d+(?:[.,]\d+)?)\s*(?:-|–|to)\s*(?P<max>\d+(?:[.,]\d+)?)[^)]*\)";

/// A parameter spec with its detectors compiled.
pub struct CompiledSpec {
    pub canonical: &'static str,
    pub categorical: bool,
    /// `Name: value unit (min-max)` — unit and range optional.
    pub combined: Regex,
    /// Loose form: the name followed by a value within a short window.
    pub loose: Regex,
    /// Bare name detector (for table headers and row names).
    pub name_only: Regex,
    exclude_before: &'static [&'static str],
}

impl CompiledSpec {
    fn new(spec: &ParamSpec) -> Self {
        let value = if spec.categorical {
            format!("(?:{CATEGORICAL_VALUE}|{NUM})")
        } else {
            NUM.to_string()
        };
        let combined = Regex::new(&format!(
            r"(?i)\b(?:{alias})\b\s*[:=\-]?\s*(?P<value>{value})(?:\s*(?P<unit>{UNIT}))?(?:\s*{RANGE})?",
            alias = spec.aliases,
        ))
        .unwrap();
        let loose = Regex::new(&format!(
            r"(?i)\b(?:{alias})\b\W{{0,30}}?(?P<value>{value})",
            alias = spec.aliases,
        ))
        .unwrap();
        let name_only = Regex::new(&format!(r"(?i)\b(?:{})\b", spec.aliases)).unwrap();

        Self {
            canonical: spec.canonical,
            categorical: spec.categorical,
            combined,
            loose,
            name_only,
            exclude_before: spec.exclude_before,
        }
    }

    /// Reject matches preceded by an excluded token (e.g. "cholesterol"
    /// inside "HDL Cholesterol").
    pub fn guard_ok(&self, text: &str, match_start: usize) -> bool {
        if self.exclude_before.is_empty() {
            return true;
        }
        let mut window_start = match_start.saturating_sub(12);
        while !text.is_char_boundary(window_start) {
            window_start -= 1;
        }
        let before = text[window_start..match_start].to_ascii_lowercase();
        !self
            .exclude_before
            .iter()
            .any(|token| before.contains(token))
    }
}

macro_rules! compiled {
    ($name:ident, $specs:expr) => {
        static $name: LazyLock<Vec<CompiledSpec>> =
            LazyLock::new(|| $specs.iter().map(CompiledSpec::new).collect());
    };
}

compiled!(CBC_COMPILED, CBC_SPECS);
compiled!(LIPID_COMPILED, LIPID_SPECS);
compiled!(METABOLIC_COMPILED, METABOLIC_SPECS);
compiled!(URINALYSIS_COMPILED, URINALYSIS_SPECS);
compiled!(THYROID_COMPILED, THYROID_SPECS);
static EMPTY_COMPILED: LazyLock<Vec<CompiledSpec>> = LazyLock::new(Vec::new);

pub fn compiled_specs(report_type: ReportType) -> &'static [CompiledSpec] {
    match report_type {
        ReportType::Cbc => &CBC_COMPILED,
        ReportType::LipidPanel => &LIPID_COMPILED,
        ReportType::MetabolicPanel => &METABOLIC_COMPILED,
        ReportType::Urinalysis => &URINALYSIS_COMPILED,
        ReportType::ThyroidPanel => &THYROID_COMPILED,
        ReportType::Imaging | ReportType::Pathology | ReportType::Other => &EMPTY_COMPILED,
    }
}

/// The type-complete set downstream consumers can rely on.
pub fn expected_names(report_type: ReportType) -> Vec<&'static str> {
    specs_for(report_type)
        .iter()
        .map(|s| s.canonical)
        .collect()
}

/// Abbreviation → canonical name, used by the structured-table strategy
/// where column headers are terse.
pub fn lookup_abbreviation(token: &str) -> Option<&'static str> {
    let upper = token.trim().to_ascii_uppercase();
    let canonical = match upper.as_str() {
        "WBC" => "WBC",
        "RBC" => "RBC",
        "HGB" | "HB" => "Hemoglobin",
        "HCT" => "Hematocrit",
        "PLT" => "Platelets",
        "MCV" => "MCV",
        "MCH" => "MCH",
        "MCHC" => "MCHC",
        "NEUT" | "NEU" => "Neutrophils",
        "LYMPH" | "LYM" => "Lymphocytes",
        "MONO" => "Monocytes",
        "EOS" => "Eosinophils",
        "BASO" => "Basophils",
        "CHOL" | "TC" => "Total Cholesterol",
        "HDL" => "HDL Cholesterol",
        "LDL" => "LDL Cholesterol",
        "TRIG" | "TG" => "Triglycerides",
        "GLU" => "Glucose",
        "CREA" | "CRE" => "Creatinine",
        "NA" => "Sodium",
        "K" => "Potassium",
        "CL" => "Chloride",
        "CA" => "Calcium",
        "ALB" => "Albumin",
        "TBIL" => "Total Bilirubin",
        "TSH" => "TSH",
        "FT4" => "Free T4",
        "FT3" => "Free T3",
        _ => return None,
    };
    Some(canonical)
}
