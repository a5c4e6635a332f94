use serde::{Deserialize, Serialize};

/// Storage model for an uploaded medical report
///
/// The `ai_*` fields are populated together, exactly once, when the analysis
/// is applied; `ai_analyzed` is true if and only if all of them are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
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

    /// Report category tag (blood-test, x-ray, prescription, scan, other)
    pub report_type: Option<String>,

    /// Free-text notes supplied at upload time
    pub report_notes: Option<String>,

    /// When the file was uploaded (RFC 3339)
    pub uploaded_at: String,

    /// Whether the AI analysis has been applied
    pub ai_analyzed: bool,

    /// English summary of the report
    pub ai_summary_english: Option<String>,

    /// Roman Urdu summary of the report
    pub ai_summary_urdu: Option<String>,

    /// Abnormal findings listed by the model
    pub ai_abnormal_values: Option<Vec<String>>,

    /// Suggested questions to ask a doctor
    pub ai_doctor_questions: Option<Vec<String>>,

    /// Foods to avoid
    pub ai_food_to_avoid: Option<Vec<String>>,

    /// Recommended foods
    pub ai_better_foods: Option<Vec<String>>,

    /// Lifestyle and home-care suggestions
    pub ai_home_remedies: Option<Vec<String>>,

    /// Risk level: low, medium, high or critical (lowercase)
    pub ai_risk_level: Option<String>,

    /// When the analysis was applied (RFC 3339)
    pub ai_analyzed_at: Option<String>,

    /// When the row was created (RFC 3339)
    pub created_at: String,

    /// When the row was last updated (RFC 3339)
    pub updated_at: String,
}

/// Payload for registering an uploaded report file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReportData {
    pub subject_id: String,
    pub report_file_url: String,
    pub report_file_name: String,
    pub report_file_type: Option<String>,
    pub report_type: Option<String>,
    pub report_notes: Option<String>,
}

/// A complete analysis payload, applied to a report in one write
///
/// Every field is required so a partially-analyzed row cannot exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisData {
    pub summary_english: String,
    pub summary_urdu: String,
    pub abnormal_values: Vec<String>,
    pub doctor_questions: Vec<String>,
    pub food_to_avoid: Vec<String>,
    pub better_foods: Vec<String>,
    pub home_remedies: Vec<String>,
    /// Lowercase token: low, medium, high or critical
    pub risk_level: String,
}

/// Aggregate report counts for a user's dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStats {
    /// Total reports on record
    pub total: usize,
    /// Reports with an applied analysis
    pub analyzed: usize,
    /// Reports still awaiting analysis
    pub pending: usize,
    /// Reports with a high or critical risk level
    pub high_risk: usize,
    /// Reports created in the current calendar month
    pub this_month: usize,
}
