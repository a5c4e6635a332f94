//! Memory-only repository implementations for tests
//!
//! These never touch the database pool, so tests stay hermetic even when a
//! pool has been initialized elsewhere in the process.

use async_trait::async_trait;
use chrono::Utc;

use crate::models::chat::{ChatMessage, NewChatMessage};
use crate::models::profile::{HealthProfile, UpsertProfileData};
use crate::models::report::{AnalysisData, CreateReportData, MedicalReport, ReportStats};

use super::chat::{build_message, ChatRepositoryTrait};
use super::errors::RepositoryError;
use super::in_memory::{InMemoryChat, InMemoryProfiles, InMemoryReports};
use super::profile::{merge_profile, ProfileRepositoryTrait};
use super::report::{build_report, compute_stats, ReportRepositoryTrait};

/// In-memory profile repository for tests
#[derive(Debug, Clone, Default)]
pub struct MockProfileRepository {
    storage: InMemoryProfiles,
}

impl MockProfileRepository {
    /// Create an empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the repository with a profile
    pub async fn with_profile(self, profile: HealthProfile) -> Self {
        self.storage.store(&profile).await.expect("mock store");
        self
    }
}

#[async_trait]
impl ProfileRepositoryTrait for MockProfileRepository {
    async fn get_by_subject(
        &self,
        subject_id: &str,
    ) -> Result<Option<HealthProfile>, RepositoryError> {
        self.storage.get(subject_id).await
    }

    async fn upsert(
        &self,
        subject_id: &str,
        data: UpsertProfileData,
    ) -> Result<HealthProfile, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let existing = self.storage.get(subject_id).await?;
        let profile = merge_profile(subject_id, existing, data, &now);
        self.storage.store(&profile).await
    }

    async fn delete(&self, subject_id: &str) -> Result<bool, RepositoryError> {
        self.storage.delete(subject_id).await
    }
}

/// In-memory report repository for tests
#[derive(Debug, Clone, Default)]
pub struct MockReportRepository {
    storage: InMemoryReports,
}

impl MockReportRepository {
    /// Create an empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the repository with a report
    pub async fn with_report(self, report: MedicalReport) -> Self {
        self.storage.store(&report).await.expect("mock store");
        self
    }
}

#[async_trait]
impl ReportRepositoryTrait for MockReportRepository {
    async fn create(&self, data: CreateReportData) -> Result<MedicalReport, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let report = build_report(data, &now);
        self.storage.store(&report).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<MedicalReport>, RepositoryError> {
        self.storage.get(id).await
    }

    async fn list_for_subject(
        &self,
        subject_id: &str,
    ) -> Result<Vec<MedicalReport>, RepositoryError> {
        self.storage.list_for_subject(subject_id).await
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        self.storage.delete(id).await
    }

    async fn apply_analysis(
        &self,
        id: &str,
        analysis: AnalysisData,
    ) -> Result<MedicalReport, RepositoryError> {
        let analyzed_at = Utc::now().to_rfc3339();
        self.storage.apply_analysis(id, &analysis, &analyzed_at).await
    }

    async fn stats(&self, subject_id: &str) -> Result<ReportStats, RepositoryError> {
        let reports = self.storage.list_for_subject(subject_id).await?;
        Ok(compute_stats(&reports, Utc::now()))
    }
}

/// In-memory chat repository for tests
#[derive(Debug, Clone, Default)]
pub struct MockChatRepository {
    storage: InMemoryChat,
}

impl MockChatRepository {
    /// Create an empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the repository with a stored exchange
    pub async fn with_message(self, message: ChatMessage) -> Self {
        self.storage.store(&message).await.expect("mock store");
        self
    }
}

#[async_trait]
impl ChatRepositoryTrait for MockChatRepository {
    async fn insert(&self, message: NewChatMessage) -> Result<ChatMessage, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let message = build_message(message, &now);
        self.storage.store(&message).await
    }

    async fn history(
        &self,
        subject_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.storage.history(subject_id, limit).await
    }

    async fn clear(&self, subject_id: &str) -> Result<usize, RepositoryError> {
        self.storage.clear(subject_id).await
    }
}
