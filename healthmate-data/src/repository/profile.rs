use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::database::get_db_pool;
use crate::models::profile::{HealthProfile, UpsertProfileData};

use super::errors::RepositoryError;
use super::in_memory::InMemoryProfiles;
use super::storage::ProfileStorage;

/// Repository trait for health profiles
#[async_trait]
pub trait ProfileRepositoryTrait: Send + Sync {
    /// Get the profile for a subject, if one exists
    async fn get_by_subject(
        &self,
        subject_id: &str,
    ) -> Result<Option<HealthProfile>, RepositoryError>;

    /// Create or update the profile for a subject
    ///
    /// Fields absent from `data` keep their stored values; `created_at` is
    /// preserved across updates.
    async fn upsert(
        &self,
        subject_id: &str,
        data: UpsertProfileData,
    ) -> Result<HealthProfile, RepositoryError>;

    /// Delete the profile for a subject (administrative operation)
    async fn delete(&self, subject_id: &str) -> Result<bool, RepositoryError>;
}

/// Merge an upsert payload over an existing profile row
///
/// Absent payload fields keep the stored values, so a partial edit never
/// wipes the rest of the profile.
pub(crate) fn merge_profile(
    subject_id: &str,
    existing: Option<HealthProfile>,
    data: UpsertProfileData,
    now: &str,
) -> HealthProfile {
    let (id, created_at, base) = match existing {
        Some(profile) => (profile.id.clone(), profile.created_at.clone(), Some(profile)),
        None => (Uuid::new_v4().to_string(), now.to_string(), None),
    };

    let base = base.unwrap_or(HealthProfile {
        id: id.clone(),
        subject_id: subject_id.to_string(),
        full_name: None,
        age: None,
        gender: None,
        blood_group: None,
        height_cm: None,
        weight_kg: None,
        bmi: None,
        chronic_diseases: None,
        allergies: None,
        current_medications: None,
        past_surgeries: None,
        family_history: None,
        blood_pressure_systolic: None,
        blood_pressure_diastolic: None,
        heart_rate: None,
        blood_sugar: None,
        cholesterol: None,
        oxygen_level: None,
        primary_goal: None,
        target_weight: None,
        activity_level: None,
        dietary_preferences: None,
        sleep_hours: None,
        created_at: created_at.clone(),
        updated_at: now.to_string(),
    });

    HealthProfile {
        id,
        subject_id: subject_id.to_string(),
        full_name: data.full_name.or(base.full_name),
        age: data.age.or(base.age),
        gender: data.gender.or(base.gender),
        blood_group: data.blood_group.or(base.blood_group),
        height_cm: data.height_cm.or(base.height_cm),
        weight_kg: data.weight_kg.or(base.weight_kg),
        bmi: data.bmi.or(base.bmi),
        chronic_diseases: data.chronic_diseases.or(base.chronic_diseases),
        allergies: data.allergies.or(base.allergies),
        current_medications: data.current_medications.or(base.current_medications),
        past_surgeries: data.past_surgeries.or(base.past_surgeries),
        family_history: data.family_history.or(base.family_history),
        blood_pressure_systolic: data
            .blood_pressure_systolic
            .or(base.blood_pressure_systolic),
        blood_pressure_diastolic: data
            .blood_pressure_diastolic
            .or(base.blood_pressure_diastolic),
        heart_rate: data.heart_rate.or(base.heart_rate),
        blood_sugar: data.blood_sugar.or(base.blood_sugar),
        cholesterol: data.cholesterol.or(base.cholesterol),
        oxygen_level: data.oxygen_level.or(base.oxygen_level),
        primary_goal: data.primary_goal.or(base.primary_goal),
        target_weight: data.target_weight.or(base.target_weight),
        activity_level: data.activity_level.or(base.activity_level),
        dietary_preferences: data.dietary_preferences.or(base.dietary_preferences),
        sleep_hours: data.sleep_hours.or(base.sleep_hours),
        created_at,
        updated_at: now.to_string(),
    }
}

/// Repository for health profiles
///
/// Uses the database when the pool is available and falls back to in-memory
/// storage when it is not.
#[derive(Debug, Clone, Default)]
pub struct ProfileRepository {
    /// In-memory storage for when the database is not available
    storage: InMemoryProfiles,
}

impl ProfileRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self {
            storage: InMemoryProfiles::new(),
        }
    }
}

#[async_trait]
impl ProfileRepositoryTrait for ProfileRepository {
    async fn get_by_subject(
        &self,
        subject_id: &str,
    ) -> Result<Option<HealthProfile>, RepositoryError> {
        match get_db_pool() {
            Ok(pool) => {
                debug!("Getting health profile from database: subject={}", subject_id);
                match ProfileStorage::get(&pool, subject_id).await {
                    Ok(profile) => Ok(profile),
                    Err(e) => {
                        error!("Failed to get profile from database: {}", e);
                        self.storage.get(subject_id).await
                    }
                }
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.get(subject_id).await
            }
        }
    }

    async fn upsert(
        &self,
        subject_id: &str,
        data: UpsertProfileData,
    ) -> Result<HealthProfile, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let existing = self.get_by_subject(subject_id).await?;
        let profile = merge_profile(subject_id, existing, data, &now);

        match get_db_pool() {
            Ok(pool) => {
                debug!("Storing health profile in database: subject={}", subject_id);
                match ProfileStorage::upsert(&pool, &profile).await {
                    Ok(_) => Ok(profile),
                    Err(e) => {
                        error!("Failed to store profile in database: {}", e);
                        self.storage.store(&profile).await
                    }
                }
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.store(&profile).await
            }
        }
    }

    async fn delete(&self, subject_id: &str) -> Result<bool, RepositoryError> {
        match get_db_pool() {
            Ok(pool) => {
                debug!("Deleting health profile from database: subject={}", subject_id);
                match ProfileStorage::delete(&pool, subject_id).await {
                    Ok(deleted) => Ok(deleted),
                    Err(e) => {
                        error!("Failed to delete profile from database: {}", e);
                        self.storage.delete(subject_id).await
                    }
                }
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.delete(subject_id).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(height: Option<f64>, weight: Option<f64>) -> UpsertProfileData {
        UpsertProfileData {
            full_name: Some("Ayesha Khan".to_string()),
            age: Some(34),
            height_cm: height,
            weight_kg: weight,
            ..Default::default()
        }
    }

    #[test]
    fn merge_creates_fresh_profile() {
        let profile = merge_profile("subj-1", None, payload(Some(165.0), Some(70.0)), "2026-01-01T00:00:00Z");

        assert_eq!(profile.subject_id, "subj-1");
        assert_eq!(profile.full_name.as_deref(), Some("Ayesha Khan"));
        assert_eq!(profile.height_cm, Some(165.0));
        assert_eq!(profile.created_at, "2026-01-01T00:00:00Z");
    }

    #[test]
    fn merge_keeps_stored_fields_absent_from_payload() {
        let first = merge_profile("subj-1", None, payload(Some(165.0), Some(70.0)), "2026-01-01T00:00:00Z");

        let update = UpsertProfileData {
            weight_kg: Some(68.0),
            ..Default::default()
        };
        let second = merge_profile("subj-1", Some(first.clone()), update, "2026-02-01T00:00:00Z");

        // Untouched fields survive, identity and created_at are stable
        assert_eq!(second.id, first.id);
        assert_eq!(second.full_name.as_deref(), Some("Ayesha Khan"));
        assert_eq!(second.height_cm, Some(165.0));
        assert_eq!(second.weight_kg, Some(68.0));
        assert_eq!(second.created_at, "2026-01-01T00:00:00Z");
        assert_eq!(second.updated_at, "2026-02-01T00:00:00Z");
    }
}
