use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::chat::ChatMessage;
use crate::models::profile::HealthProfile;
use crate::models::report::{AnalysisData, MedicalReport};

use super::errors::RepositoryError;

/// In-memory storage for health profiles, keyed by subject id
///
/// Used as a fallback when the database is unavailable.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfiles {
    profiles: Arc<Mutex<HashMap<String, HealthProfile>>>,
}

impl InMemoryProfiles {
    /// Create a new in-memory profile store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (insert or replace) a profile
    pub async fn store(&self, profile: &HealthProfile) -> Result<HealthProfile, RepositoryError> {
        let mut store = self.profiles.lock()?;
        store.insert(profile.subject_id.clone(), profile.clone());
        Ok(profile.clone())
    }

    /// Get a profile by subject id
    pub async fn get(&self, subject_id: &str) -> Result<Option<HealthProfile>, RepositoryError> {
        let store = self.profiles.lock()?;
        Ok(store.get(subject_id).cloned())
    }

    /// Delete a profile by subject id, returning whether it existed
    pub async fn delete(&self, subject_id: &str) -> Result<bool, RepositoryError> {
        let mut store = self.profiles.lock()?;
        Ok(store.remove(subject_id).is_some())
    }
}

/// In-memory storage for medical reports
#[derive(Debug, Clone, Default)]
pub struct InMemoryReports {
    reports: Arc<Mutex<HashMap<String, MedicalReport>>>,
}

impl InMemoryReports {
    /// Create a new in-memory report store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a report
    pub async fn store(&self, report: &MedicalReport) -> Result<MedicalReport, RepositoryError> {
        let mut store = self.reports.lock()?;
        store.insert(report.id.clone(), report.clone());
        Ok(report.clone())
    }

    /// Get a report by id
    pub async fn get(&self, id: &str) -> Result<Option<MedicalReport>, RepositoryError> {
        let store = self.reports.lock()?;
        Ok(store.get(id).cloned())
    }

    /// All reports for a subject, newest first
    pub async fn list_for_subject(
        &self,
        subject_id: &str,
    ) -> Result<Vec<MedicalReport>, RepositoryError> {
        let store = self.reports.lock()?;
        let mut reports: Vec<MedicalReport> = store
            .values()
            .filter(|r| r.subject_id == subject_id)
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }

    /// Delete a report by id, returning whether it existed
    pub async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut store = self.reports.lock()?;
        Ok(store.remove(id).is_some())
    }

    /// Apply an analysis to an unanalyzed report
    ///
    /// Check-and-set: the transition happens at most once per record. An
    /// already-analyzed report yields `Conflict` and the stored row is left
    /// untouched.
    pub async fn apply_analysis(
        &self,
        id: &str,
        analysis: &AnalysisData,
        analyzed_at: &str,
    ) -> Result<MedicalReport, RepositoryError> {
        let mut store = self.reports.lock()?;
        let report = store
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(format!("report {}", id)))?;

        if report.ai_analyzed {
            return Err(RepositoryError::Conflict(format!(
                "report {} is already analyzed",
                id
            )));
        }

        report.ai_summary_english = Some(analysis.summary_english.clone());
        report.ai_summary_urdu = Some(analysis.summary_urdu.clone());
        report.ai_abnormal_values = Some(analysis.abnormal_values.clone());
        report.ai_doctor_questions = Some(analysis.doctor_questions.clone());
        report.ai_food_to_avoid = Some(analysis.food_to_avoid.clone());
        report.ai_better_foods = Some(analysis.better_foods.clone());
        report.ai_home_remedies = Some(analysis.home_remedies.clone());
        report.ai_risk_level = Some(analysis.risk_level.clone());
        report.ai_analyzed = true;
        report.ai_analyzed_at = Some(analyzed_at.to_string());
        report.updated_at = analyzed_at.to_string();

        Ok(report.clone())
    }
}

/// In-memory storage for chat history
#[derive(Debug, Clone, Default)]
pub struct InMemoryChat {
    messages: Arc<Mutex<HashMap<String, ChatMessage>>>,
}

impl InMemoryChat {
    /// Create a new in-memory chat store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a chat exchange
    pub async fn store(&self, message: &ChatMessage) -> Result<ChatMessage, RepositoryError> {
        let mut store = self.messages.lock()?;
        store.insert(message.id.clone(), message.clone());
        Ok(message.clone())
    }

    /// Chat history for a subject in chronological order
    pub async fn history(
        &self,
        subject_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let store = self.messages.lock()?;
        let mut messages: Vec<ChatMessage> = store
            .values()
            .filter(|m| m.subject_id == subject_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        if let Some(limit) = limit {
            messages.truncate(limit);
        }

        Ok(messages)
    }

    /// Remove all history for a subject, returning the number removed
    pub async fn clear(&self, subject_id: &str) -> Result<usize, RepositoryError> {
        let mut store = self.messages.lock()?;
        let before = store.len();
        store.retain(|_, m| m.subject_id != subject_id);
        Ok(before - store.len())
    }
}
