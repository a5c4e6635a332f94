use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;
use tracing::{debug, warn};
use validator::Validate;

use crate::entities::conversions::{
    convert_to_data_analysis, convert_to_data_create_report, convert_to_domain_report,
};
use crate::entities::report::{CreateReportRequest, MedicalReport};
use crate::services::analysis::{analysis_or_fallback, analysis_prompt, fallback_analysis,
    health_insights_prompt};
use healthmate_data::gemini::{AnalysisModelTrait, GeminiError};
use healthmate_data::models::report::ReportStats;
use healthmate_data::repository::{ReportRepository, ReportRepositoryTrait, RepositoryError};

/// Message returned for insights when no analyzed reports exist yet
const NO_REPORTS_INSIGHT: &str = "No analyzed reports yet. Upload a medical report to receive \
    health insights. Abhi tak koi analyzed report nahi hai — insights ke liye report upload karein.";

/// Message returned for insights when the model key is not configured
const INSIGHTS_UNAVAILABLE: &str = "Health insights unavailable - API key not configured";

/// Report service errors
#[derive(Debug, Error)]
pub enum ReportServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Not found error
    #[error("Report not found: {0}")]
    NotFound(String),

    /// The report has already been analyzed
    #[error("Report already analyzed: {0}")]
    AlreadyAnalyzed(String),

    /// The uploaded file payload is not valid base64
    #[error("Invalid file payload: {0}")]
    InvalidPayload(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// Model collaborator error
    #[error("Model error: {0}")]
    ModelError(String),
}

/// Trait for report service operations
#[async_trait]
pub trait ReportServiceTrait: Send + Sync {
    /// Register a freshly uploaded report file (analysis pending)
    async fn create_report(
        &self,
        subject_id: &str,
        request: CreateReportRequest,
    ) -> Result<MedicalReport, ReportServiceError>;

    /// All reports for a subject, newest first
    async fn list_reports(&self, subject_id: &str)
        -> Result<Vec<MedicalReport>, ReportServiceError>;

    /// Get one of the subject's reports by id
    async fn get_report(
        &self,
        subject_id: &str,
        report_id: &str,
    ) -> Result<MedicalReport, ReportServiceError>;

    /// Delete one of the subject's reports
    async fn delete_report(
        &self,
        subject_id: &str,
        report_id: &str,
    ) -> Result<(), ReportServiceError>;

    /// Run the AI analysis for a pending report
    ///
    /// `file_base64` carries the uploaded file bytes. The analysis is
    /// applied at most once; a repeat call yields `AlreadyAnalyzed`.
    async fn analyze_report(
        &self,
        subject_id: &str,
        report_id: &str,
        file_base64: &str,
    ) -> Result<MedicalReport, ReportServiceError>;

    /// Aggregate dashboard counts for a subject
    async fn report_stats(&self, subject_id: &str) -> Result<ReportStats, ReportServiceError>;

    /// Bilingual trend narrative over the subject's analyzed reports
    async fn health_insights(&self, subject_id: &str) -> Result<String, ReportServiceError>;
}

/// Report service for domain logic
pub struct ReportService<R: ReportRepositoryTrait, M: AnalysisModelTrait> {
    repository: R,
    model: M,
}

impl<R: ReportRepositoryTrait, M: AnalysisModelTrait> ReportService<R, M> {
    /// Create a new report service
    pub fn new(repository: R, model: M) -> Self {
        Self { repository, model }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> ReportServiceError {
        match err {
            RepositoryError::NotFound(msg) => ReportServiceError::NotFound(msg),
            RepositoryError::Conflict(msg) => ReportServiceError::AlreadyAnalyzed(msg),
            RepositoryError::Validation(msg) => ReportServiceError::ValidationError(msg),
            _ => ReportServiceError::RepositoryError(err.to_string()),
        }
    }

    /// Fetch a report and check it belongs to the subject
    async fn owned_report(
        &self,
        subject_id: &str,
        report_id: &str,
    ) -> Result<healthmate_data::models::report::MedicalReport, ReportServiceError> {
        let report = self
            .repository
            .get_by_id(report_id)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| ReportServiceError::NotFound(report_id.to_string()))?;

        // Another user's report is indistinguishable from a missing one
        if report.subject_id != subject_id {
            return Err(ReportServiceError::NotFound(report_id.to_string()));
        }

        Ok(report)
    }
}

#[async_trait]
impl<R, M> ReportServiceTrait for ReportService<R, M>
where
    R: ReportRepositoryTrait + Send + Sync,
    M: AnalysisModelTrait + Send + Sync,
{
    async fn create_report(
        &self,
        subject_id: &str,
        request: CreateReportRequest,
    ) -> Result<MedicalReport, ReportServiceError> {
        if let Err(validation_errors) = request.validate() {
            return Err(ReportServiceError::ValidationError(
                validation_errors.to_string(),
            ));
        }

        let data = convert_to_data_create_report(subject_id, &request);
        let report = self
            .repository
            .create(data)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(convert_to_domain_report(report))
    }

    async fn list_reports(
        &self,
        subject_id: &str,
    ) -> Result<Vec<MedicalReport>, ReportServiceError> {
        let reports = self
            .repository
            .list_for_subject(subject_id)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(reports.into_iter().map(convert_to_domain_report).collect())
    }

    async fn get_report(
        &self,
        subject_id: &str,
        report_id: &str,
    ) -> Result<MedicalReport, ReportServiceError> {
        let report = self.owned_report(subject_id, report_id).await?;
        Ok(convert_to_domain_report(report))
    }

    async fn delete_report(
        &self,
        subject_id: &str,
        report_id: &str,
    ) -> Result<(), ReportServiceError> {
        // Ownership check before the destructive operation
        self.owned_report(subject_id, report_id).await?;

        let deleted = self
            .repository
            .delete(report_id)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        if !deleted {
            return Err(ReportServiceError::NotFound(report_id.to_string()));
        }

        Ok(())
    }

    async fn analyze_report(
        &self,
        subject_id: &str,
        report_id: &str,
        file_base64: &str,
    ) -> Result<MedicalReport, ReportServiceError> {
        let report = self.owned_report(subject_id, report_id).await?;

        if report.ai_analyzed {
            return Err(ReportServiceError::AlreadyAnalyzed(report_id.to_string()));
        }

        // Validate the payload before spending a model call on it
        BASE64
            .decode(file_base64.trim())
            .map_err(|e| ReportServiceError::InvalidPayload(e.to_string()))?;

        let mime_type = report
            .report_file_type
            .as_deref()
            .unwrap_or("image/jpeg");
        let report_type = report.report_type.as_deref().unwrap_or("general");
        let prompt = analysis_prompt(report_type);

        debug!(
            "Requesting analysis for report {} (type: {})",
            report_id, report_type
        );

        // Any model failure degrades to the fixed fallback; the user always
        // gets a complete analysis record.
        let analysis = match self
            .model
            .analyze_file(file_base64.trim(), mime_type, &prompt)
            .await
        {
            Ok(text) => analysis_or_fallback(&text),
            Err(e) => {
                warn!("Model call failed for report {}: {}", report_id, e);
                fallback_analysis()
            }
        };

        let updated = self
            .repository
            .apply_analysis(report_id, convert_to_data_analysis(&analysis))
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(convert_to_domain_report(updated))
    }

    async fn report_stats(&self, subject_id: &str) -> Result<ReportStats, ReportServiceError> {
        self.repository
            .stats(subject_id)
            .await
            .map_err(|e| self.map_repo_error(e))
    }

    async fn health_insights(&self, subject_id: &str) -> Result<String, ReportServiceError> {
        let reports = self.list_reports(subject_id).await?;
        let analyzed: Vec<MedicalReport> =
            reports.into_iter().filter(|r| r.ai_analyzed).collect();

        if analyzed.is_empty() {
            return Ok(NO_REPORTS_INSIGHT.to_string());
        }

        let prompt = health_insights_prompt(&analyzed);

        match self.model.generate_text(&prompt).await {
            Ok(text) => Ok(text),
            Err(GeminiError::MissingApiKey) => Ok(INSIGHTS_UNAVAILABLE.to_string()),
            Err(e) => Err(ReportServiceError::ModelError(e.to_string())),
        }
    }
}

/// Create a report service backed by the default repository and a Gemini
/// client configured from the environment
pub fn create_default_report_service(
) -> ReportService<ReportRepository, healthmate_data::gemini::GeminiClient> {
    ReportService::new(
        ReportRepository::new(),
        healthmate_data::gemini::GeminiClient::from_env(),
    )
}

/// Create a report service over the memory-only mock repository and a mock
/// model that fails every call (analyses land on the fallback)
#[cfg(feature = "mock")]
pub fn create_mock_report_service() -> ReportService<
    healthmate_data::repository::MockReportRepository,
    healthmate_data::gemini::mock::MockAnalysisModel,
> {
    ReportService::new(
        healthmate_data::repository::MockReportRepository::new(),
        healthmate_data::gemini::mock::MockAnalysisModel::new().with_failure(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::report::{ReportType, RiskLevel};
    use crate::services::analysis::fallback_analysis;
    use healthmate_data::gemini::mock::MockAnalysisModel;
    use healthmate_data::repository::MockReportRepository;

    // "ABC" in base64
    const FILE_PAYLOAD: &str = "QUJD";

    fn create_request() -> CreateReportRequest {
        CreateReportRequest {
            report_file_url: "https://files.example/reports/cbc.jpg".to_string(),
            report_file_name: "cbc.jpg".to_string(),
            report_file_type: Some("image/jpeg".to_string()),
            report_type: Some(ReportType::BloodTest),
            report_notes: Some("Fasting sample".to_string()),
        }
    }

    fn model_response() -> String {
        r#"{
            "ai_summary_english": "Hemoglobin slightly low, otherwise normal.",
            "ai_summary_urdu": "Hemoglobin thora kam hai, baqi sab normal hai.",
            "ai_abnormal_values": ["Hemoglobin 11.0 g/dL"],
            "ai_doctor_questions": ["Do I need iron supplements?"],
            "ai_food_to_avoid": ["Tea with meals"],
            "ai_better_foods": ["Spinach"],
            "ai_home_remedies": ["Sleep well"],
            "ai_risk_level": "Elevated"
        }"#
        .to_string()
    }

    #[tokio::test]
    async fn analyze_normalizes_and_applies_the_model_response() {
        let service = ReportService::new(
            MockReportRepository::new(),
            MockAnalysisModel::new().with_response(model_response()),
        );

        let report = service
            .create_report("subj-1", create_request())
            .await
            .unwrap();
        assert!(!report.ai_analyzed);

        let analyzed = service
            .analyze_report("subj-1", &report.id, FILE_PAYLOAD)
            .await
            .unwrap();

        assert!(analyzed.ai_analyzed);
        let analysis = analyzed.analysis.unwrap();
        // "Elevated" is a synonym for high
        assert_eq!(analysis.risk_level, RiskLevel::High);
        assert_eq!(analysis.abnormal_values, vec!["Hemoglobin 11.0 g/dL"]);
    }

    #[tokio::test]
    async fn analyze_twice_is_a_conflict() {
        let service = ReportService::new(
            MockReportRepository::new(),
            MockAnalysisModel::new().with_response(model_response()),
        );

        let report = service
            .create_report("subj-1", create_request())
            .await
            .unwrap();
        service
            .analyze_report("subj-1", &report.id, FILE_PAYLOAD)
            .await
            .unwrap();

        let err = service
            .analyze_report("subj-1", &report.id, FILE_PAYLOAD)
            .await
            .unwrap_err();
        assert!(matches!(err, ReportServiceError::AlreadyAnalyzed(_)));
    }

    #[tokio::test]
    async fn model_failure_applies_the_fallback_analysis() {
        let service = ReportService::new(
            MockReportRepository::new(),
            MockAnalysisModel::new().with_failure(),
        );

        let report = service
            .create_report("subj-1", create_request())
            .await
            .unwrap();
        let analyzed = service
            .analyze_report("subj-1", &report.id, FILE_PAYLOAD)
            .await
            .unwrap();

        assert!(analyzed.ai_analyzed);
        assert_eq!(analyzed.analysis.unwrap(), fallback_analysis());
    }

    #[tokio::test]
    async fn another_users_report_reads_as_missing() {
        let service = ReportService::new(
            MockReportRepository::new(),
            MockAnalysisModel::new().with_failure(),
        );

        let report = service
            .create_report("subj-1", create_request())
            .await
            .unwrap();

        let err = service
            .get_report("subj-2", &report.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ReportServiceError::NotFound(_)));

        let err = service
            .analyze_report("subj-2", &report.id, FILE_PAYLOAD)
            .await
            .unwrap_err();
        assert!(matches!(err, ReportServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn invalid_base64_payload_is_rejected_before_the_model_call() {
        let service = ReportService::new(
            MockReportRepository::new(),
            MockAnalysisModel::new().with_response(model_response()),
        );

        let report = service
            .create_report("subj-1", create_request())
            .await
            .unwrap();

        let err = service
            .analyze_report("subj-1", &report.id, "not base64!!!")
            .await
            .unwrap_err();
        assert!(matches!(err, ReportServiceError::InvalidPayload(_)));

        // The report stays pending
        let report = service.get_report("subj-1", &report.id).await.unwrap();
        assert!(!report.ai_analyzed);
    }

    #[tokio::test]
    async fn insights_without_analyzed_reports_skip_the_model() {
        let service = ReportService::new(
            MockReportRepository::new(),
            // A failing model proves no call is made
            MockAnalysisModel::new().with_failure(),
        );

        let insight = service.health_insights("subj-1").await.unwrap();
        assert!(insight.contains("No analyzed reports yet"));
    }
}
