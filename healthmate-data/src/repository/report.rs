use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use tracing::{debug, error};
use uuid::Uuid;

use crate::database::get_db_pool;
use crate::models::report::{AnalysisData, CreateReportData, MedicalReport, ReportStats};

use super::errors::RepositoryError;
use super::in_memory::InMemoryReports;
use super::storage::ReportStorage;

/// Repository trait for medical reports
#[async_trait]
pub trait ReportRepositoryTrait: Send + Sync {
    /// Register a freshly uploaded report (analysis pending)
    async fn create(&self, data: CreateReportData) -> Result<MedicalReport, RepositoryError>;

    /// Get a report by id
    async fn get_by_id(&self, id: &str) -> Result<Option<MedicalReport>, RepositoryError>;

    /// All reports for a subject, newest first
    async fn list_for_subject(
        &self,
        subject_id: &str,
    ) -> Result<Vec<MedicalReport>, RepositoryError>;

    /// Delete a report by id
    async fn delete(&self, id: &str) -> Result<bool, RepositoryError>;

    /// Apply an analysis to an unanalyzed report
    ///
    /// The transition is conditional: a report that is already analyzed
    /// yields `RepositoryError::Conflict` and is left unchanged.
    async fn apply_analysis(
        &self,
        id: &str,
        analysis: AnalysisData,
    ) -> Result<MedicalReport, RepositoryError>;

    /// Aggregate dashboard counts for a subject
    async fn stats(&self, subject_id: &str) -> Result<ReportStats, RepositoryError>;
}

/// Build a pending report row from a create payload
pub(crate) fn build_report(data: CreateReportData, now: &str) -> MedicalReport {
    MedicalReport {
        id: Uuid::new_v4().to_string(),
        subject_id: data.subject_id,
        report_file_url: data.report_file_url,
        report_file_name: data.report_file_name,
        report_file_type: data.report_file_type,
        report_type: data.report_type,
        report_notes: data.report_notes,
        uploaded_at: now.to_string(),
        ai_analyzed: false,
        ai_summary_english: None,
        ai_summary_urdu: None,
        ai_abnormal_values: None,
        ai_doctor_questions: None,
        ai_food_to_avoid: None,
        ai_better_foods: None,
        ai_home_remedies: None,
        ai_risk_level: None,
        ai_analyzed_at: None,
        created_at: now.to_string(),
        updated_at: now.to_string(),
    }
}

/// Compute dashboard counts from a subject's report rows
pub(crate) fn compute_stats(reports: &[MedicalReport], now: DateTime<Utc>) -> ReportStats {
    let analyzed = reports.iter().filter(|r| r.ai_analyzed).count();

    let high_risk = reports
        .iter()
        .filter(|r| {
            matches!(
                r.ai_risk_level.as_deref(),
                Some("high") | Some("critical")
            )
        })
        .count();

    let this_month = reports
        .iter()
        .filter(|r| {
            DateTime::parse_from_rfc3339(&r.created_at)
                .map(|d| d.year() == now.year() && d.month() == now.month())
                .unwrap_or(false)
        })
        .count();

    ReportStats {
        total: reports.len(),
        analyzed,
        pending: reports.len() - analyzed,
        high_risk,
        this_month,
    }
}

/// Repository for medical reports
///
/// Uses the database when the pool is available and falls back to in-memory
/// storage when it is not.
#[derive(Debug, Clone, Default)]
pub struct ReportRepository {
    /// In-memory storage for when the database is not available
    storage: InMemoryReports,
}

impl ReportRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self {
            storage: InMemoryReports::new(),
        }
    }
}

#[async_trait]
impl ReportRepositoryTrait for ReportRepository {
    async fn create(&self, data: CreateReportData) -> Result<MedicalReport, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let report = build_report(data, &now);

        match get_db_pool() {
            Ok(pool) => {
                debug!("Storing medical report in database: {}", report.id);
                match ReportStorage::store(&pool, &report).await {
                    Ok(_) => Ok(report),
                    Err(e) => {
                        error!("Failed to store report in database: {}", e);
                        self.storage.store(&report).await
                    }
                }
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.store(&report).await
            }
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<MedicalReport>, RepositoryError> {
        match get_db_pool() {
            Ok(pool) => {
                debug!("Getting medical report from database: id={}", id);
                match ReportStorage::get(&pool, id).await {
                    Ok(report) => Ok(report),
                    Err(e) => {
                        error!("Failed to get report from database: {}", e);
                        self.storage.get(id).await
                    }
                }
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.get(id).await
            }
        }
    }

    async fn list_for_subject(
        &self,
        subject_id: &str,
    ) -> Result<Vec<MedicalReport>, RepositoryError> {
        match get_db_pool() {
            Ok(pool) => {
                debug!("Listing medical reports from database: subject={}", subject_id);
                match ReportStorage::list_for_subject(&pool, subject_id).await {
                    Ok(reports) => Ok(reports),
                    Err(e) => {
                        error!("Failed to list reports from database: {}", e);
                        self.storage.list_for_subject(subject_id).await
                    }
                }
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.list_for_subject(subject_id).await
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        match get_db_pool() {
            Ok(pool) => {
                debug!("Deleting medical report from database: id={}", id);
                match ReportStorage::delete(&pool, id).await {
                    Ok(deleted) => Ok(deleted),
                    Err(e) => {
                        error!("Failed to delete report from database: {}", e);
                        self.storage.delete(id).await
                    }
                }
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.delete(id).await
            }
        }
    }

    async fn apply_analysis(
        &self,
        id: &str,
        analysis: AnalysisData,
    ) -> Result<MedicalReport, RepositoryError> {
        let analyzed_at = Utc::now().to_rfc3339();

        match get_db_pool() {
            Ok(pool) => {
                let rows = ReportStorage::apply_analysis(&pool, id, &analysis, &analyzed_at).await?;

                if rows == 0 {
                    // Distinguish "missing" from "already analyzed"
                    return match ReportStorage::get(&pool, id).await? {
                        None => Err(RepositoryError::NotFound(format!("report {}", id))),
                        Some(_) => Err(RepositoryError::Conflict(format!(
                            "report {} is already analyzed",
                            id
                        ))),
                    };
                }

                ReportStorage::get(&pool, id)
                    .await?
                    .ok_or_else(|| RepositoryError::NotFound(format!("report {}", id)))
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.apply_analysis(id, &analysis, &analyzed_at).await
            }
        }
    }

    async fn stats(&self, subject_id: &str) -> Result<ReportStats, RepositoryError> {
        let reports = self.list_for_subject(subject_id).await?;
        Ok(compute_stats(&reports, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn report(created_at: &str, analyzed: bool, risk: Option<&str>) -> MedicalReport {
        let mut r = build_report(
            CreateReportData {
                subject_id: "subj-1".to_string(),
                report_file_url: "https://files.example/reports/1.jpg".to_string(),
                report_file_name: "cbc.jpg".to_string(),
                report_file_type: Some("image/jpeg".to_string()),
                report_type: Some("blood-test".to_string()),
                report_notes: None,
            },
            created_at,
        );
        r.ai_analyzed = analyzed;
        r.ai_risk_level = risk.map(str::to_string);
        r
    }

    #[test]
    fn stats_count_analyzed_pending_and_risk() {
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap();
        let reports = vec![
            report("2026-08-01T10:00:00+00:00", true, Some("high")),
            report("2026-08-03T10:00:00+00:00", true, Some("low")),
            report("2026-07-20T10:00:00+00:00", false, None),
            report("2026-06-15T10:00:00+00:00", true, Some("critical")),
        ];

        let stats = compute_stats(&reports, now);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.analyzed, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.high_risk, 2);
        assert_eq!(stats.this_month, 2);
    }

    #[tokio::test]
    async fn in_memory_analysis_transition_is_at_most_once() {
        let storage = InMemoryReports::new();
        let pending = report("2026-08-01T10:00:00+00:00", false, None);
        storage.store(&pending).await.unwrap();

        let analysis = AnalysisData {
            summary_english: "All values within range.".to_string(),
            summary_urdu: "Tamam values normal hain.".to_string(),
            abnormal_values: vec![],
            doctor_questions: vec!["Any follow-up needed?".to_string()],
            food_to_avoid: vec![],
            better_foods: vec![],
            home_remedies: vec![],
            risk_level: "low".to_string(),
        };

        let updated = storage
            .apply_analysis(&pending.id, &analysis, "2026-08-02T10:00:00+00:00")
            .await
            .unwrap();
        assert!(updated.ai_analyzed);
        assert_eq!(updated.ai_risk_level.as_deref(), Some("low"));

        // A second attempt is rejected and the row stays as analyzed
        let err = storage
            .apply_analysis(&pending.id, &analysis, "2026-08-03T10:00:00+00:00")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let stored = storage.get(&pending.id).await.unwrap().unwrap();
        assert_eq!(stored.ai_analyzed_at.as_deref(), Some("2026-08-02T10:00:00+00:00"));
    }
}
