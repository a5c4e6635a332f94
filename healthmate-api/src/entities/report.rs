use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use healthmate_data::models::report::ReportStats;

/// Request payload for running the AI analysis of a report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeReportRequest {
    /// Base64-encoded bytes of the uploaded file
    pub file_data: String,
}

/// Aggregate report counts for the dashboard
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportStatsResponse {
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

impl From<ReportStats> for ReportStatsResponse {
    fn from(stats: ReportStats) -> Self {
        Self {
            total: stats.total,
            analyzed: stats.analyzed,
            pending: stats.pending,
            high_risk: stats.high_risk,
            this_month: stats.this_month,
        }
    }
}

/// Bilingual trend narrative over the user's analyzed reports
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthInsightsResponse {
    /// The generated narrative
    pub insights: String,
}
