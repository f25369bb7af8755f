use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(FileType {
    Pdf => "pdf",
    Image => "image",
    Text => "text",
    Dicom => "dicom",
    Hl7 => "hl7",
    Fhir => "fhir",
    Unknown => "unknown",
});

impl FileType {
    /// Unknown is terminal — the upload is rejected before acquisition.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

str_enum!(ReportType {
    Cbc => "cbc",
    LipidPanel => "lipid_panel",
    MetabolicPanel => "metabolic_panel",
    Urinalysis => "urinalysis",
    ThyroidPanel => "thyroid_panel",
    Imaging => "imaging",
    Pathology => "pathology",
    Other => "other",
});

impl ReportType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Cbc => "Complete Blood Count",
            Self::LipidPanel => "Lipid Panel",
            Self::MetabolicPanel => "Metabolic Panel",
            Self::Urinalysis => "Urinalysis",
            Self::ThyroidPanel => "Thyroid Panel",
            Self::Imaging => "Imaging",
            Self::Pathology => "Pathology",
            Self::Other => "General Report",
        }
    }
}

str_enum!(ParameterStatus {
    Normal => "normal",
    Low => "low",
    High => "high",
    CriticalLow => "critical_low",
    CriticalHigh => "critical_high",
    Borderline => "borderline",
    NotAvailable => "not_available",
    Unparseable => "unparseable",
});

impl ParameterStatus {
    pub fn is_abnormal(&self) -> bool {
        matches!(
            self,
            Self::Low | Self::High | Self::CriticalLow | Self::CriticalHigh
        )
    }
}

str_enum!(ReportStatus {
    Processing => "processing",
    Completed => "completed",
    CompletedWithErrors => "completed_with_errors",
});

str_enum!(AnalysisSource {
    Model => "model",
    Fallback => "fallback",
});
