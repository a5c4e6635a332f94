use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Closed set of report category tags
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum ReportType {
    BloodTest,
    XRay,
    Prescription,
    Scan,
    Other,
}

impl ReportType {
    /// Stored token for the tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::BloodTest => "blood-test",
            ReportType::XRay => "x-ray",
            ReportType::Prescription => "prescription",
            ReportType::Scan => "scan",
            ReportType::Other => "other",
        }
    }

    /// Parse a stored token; anything unrecognized is `Other`
    pub fn parse(token: &str) -> Self {
        match token {
            "blood-test" => ReportType::BloodTest,
            "x-ray" => ReportType::XRay,
            "prescription" => ReportType::Prescription,
            "scan" => ReportType::Scan,
            _ => ReportType::Other,
        }
    }
}

/// Risk level attached to an analyzed report
///
/// Exactly these four tokens, stored lowercase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Stored token for the level
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// Parse one of the four exact tokens
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            "critical" => Some(RiskLevel::Critical),
            _ => None,
        }
    }
}

/// The AI-generated bilingual analysis of a report
///
/// Either fully populated from a model response or the fixed fallback value;
/// a partially filled analysis cannot be constructed from the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AiAnalysis {
    /// Summary in English
    pub summary_english: String,

    /// Summary in Roman Urdu
    pub summary_urdu: String,

    /// Abnormal findings, possibly empty
    pub abnormal_values: Vec<String>,

    /// Suggested questions to ask a doctor
    pub doctor_questions: Vec<String>,

    /// Foods to avoid
    pub food_to_avoid: Vec<String>,

    /// Recommended foods
    pub better_foods: Vec<String>,

    /// Lifestyle and home-care suggestions
    pub home_remedies: Vec<String>,

    /// Normalized risk level
    pub risk_level: RiskLevel,
}

/// Domain model for an uploaded medical report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MedicalReport {
    /// Unique identifier for the report
    pub id: String,

    /// Opaque subject id of the owning user
    pub subject_id: String,

    /// Public URL of the uploaded file in external storage
    pub report_file_url: String,

    /// Original file name
    pub report_file_name: String,

    /// MIME type of the uploaded file
    pub report_file_type: Option<String>,

    /// Report category tag
    pub report_type: Option<ReportType>,

    /// Free-text notes supplied at upload time
    pub report_notes: Option<String>,

    /// When the file was uploaded (RFC 3339)
    pub uploaded_at: String,

    /// Whether the analysis has been applied
    pub ai_analyzed: bool,

    /// The analysis, present exactly when `ai_analyzed` is true
    pub analysis: Option<AiAnalysis>,

    /// When the analysis was applied (RFC 3339)
    pub ai_analyzed_at: Option<String>,

    /// When the record was created (RFC 3339)
    pub created_at: String,

    /// When the record was last updated (RFC 3339)
    pub updated_at: String,
}

/// Request payload for registering an uploaded report file
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CreateReportRequest {
    /// Public URL of the uploaded file
    #[validate(length(min = 1, max = 2000, message = "File URL is required"))]
    pub report_file_url: String,

    /// Original file name
    #[validate(length(min = 1, max = 500, message = "File name is required"))]
    pub report_file_name: String,

    /// MIME type of the uploaded file
    pub report_file_type: Option<String>,

    /// Report category tag
    pub report_type: Option<ReportType>,

    /// Free-text notes
    #[validate(length(max = 2000, message = "Notes cannot exceed 2000 characters"))]
    pub report_notes: Option<String>,
}
