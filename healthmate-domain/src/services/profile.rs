use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;
use validator::Validate;

use crate::entities::conversions::{convert_to_data_profile_upsert, convert_to_domain_profile};
use crate::entities::metrics::HealthMetrics;
use crate::entities::profile::{HealthProfile, HealthSummary, UpsertProfileRequest};
use crate::services::metrics::{compute_bmi, health_metrics};
use healthmate_data::repository::{ProfileRepository, ProfileRepositoryTrait, RepositoryError};

/// Profile service errors
#[derive(Debug, Error)]
pub enum ProfileServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Not found error
    #[error("Profile not found: {0}")]
    NotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Trait for profile service operations
#[async_trait]
pub trait ProfileServiceTrait: Send + Sync {
    /// Validate an upsert request
    fn validate_upsert_request(
        &self,
        request: &UpsertProfileRequest,
    ) -> Result<(), ProfileServiceError>;

    /// Create or update the profile for a subject
    async fn upsert_profile(
        &self,
        subject_id: &str,
        request: UpsertProfileRequest,
    ) -> Result<HealthProfile, ProfileServiceError>;

    /// Get the profile for a subject
    async fn get_profile(&self, subject_id: &str) -> Result<HealthProfile, ProfileServiceError>;

    /// Delete the profile for a subject (administrative operation)
    async fn delete_profile(&self, subject_id: &str) -> Result<(), ProfileServiceError>;

    /// Derived metric categories for a subject's stored vitals
    async fn get_health_metrics(
        &self,
        subject_id: &str,
    ) -> Result<HealthMetrics, ProfileServiceError>;

    /// Grouped profile view for dashboard display
    async fn get_health_summary(
        &self,
        subject_id: &str,
    ) -> Result<HealthSummary, ProfileServiceError>;
}

/// Profile service for domain logic
pub struct ProfileService<R: ProfileRepositoryTrait> {
    repository: R,
}

impl<R: ProfileRepositoryTrait> ProfileService<R> {
    /// Create a new profile service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> ProfileServiceError {
        match err {
            RepositoryError::NotFound(msg) => ProfileServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => ProfileServiceError::ValidationError(msg),
            _ => ProfileServiceError::RepositoryError(err.to_string()),
        }
    }
}

/// Flatten validator errors into a single readable message
fn validation_message(validation_errors: validator::ValidationErrors) -> String {
    validation_errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let error_msgs: Vec<String> = errors
                .iter()
                .map(|err| {
                    if let Some(msg) = &err.message {
                        msg.to_string()
                    } else {
                        format!("Invalid {}", field)
                    }
                })
                .collect();
            format!("{}: {}", field, error_msgs.join(", "))
        })
        .collect::<Vec<String>>()
        .join("; ")
}

#[async_trait]
impl<R: ProfileRepositoryTrait + Send + Sync> ProfileServiceTrait for ProfileService<R> {
    fn validate_upsert_request(
        &self,
        request: &UpsertProfileRequest,
    ) -> Result<(), ProfileServiceError> {
        if let Err(validation_errors) = request.validate() {
            return Err(ProfileServiceError::ValidationError(validation_message(
                validation_errors,
            )));
        }

        // Cross-field check: a paired reading must be internally consistent
        if let (Some(systolic), Some(diastolic)) = (
            request.blood_pressure_systolic,
            request.blood_pressure_diastolic,
        ) {
            if systolic <= diastolic {
                return Err(ProfileServiceError::ValidationError(
                    "Systolic pressure must be greater than diastolic pressure".to_string(),
                ));
            }
        }

        Ok(())
    }

    async fn upsert_profile(
        &self,
        subject_id: &str,
        request: UpsertProfileRequest,
    ) -> Result<HealthProfile, ProfileServiceError> {
        self.validate_upsert_request(&request)?;

        // BMI is always derived from the effective height and weight — the
        // values the profile will hold after this write — never accepted as
        // user input.
        let existing = self
            .repository
            .get_by_subject(subject_id)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        let effective_height = request
            .height_cm
            .or(existing.as_ref().and_then(|p| p.height_cm));
        let effective_weight = request
            .weight_kg
            .or(existing.as_ref().and_then(|p| p.weight_kg));
        let bmi = compute_bmi(effective_height, effective_weight);

        debug!(
            "Upserting profile for subject {} (derived bmi: {:?})",
            subject_id, bmi
        );

        let data = convert_to_data_profile_upsert(&request, bmi);
        let stored = self
            .repository
            .upsert(subject_id, data)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(convert_to_domain_profile(stored))
    }

    async fn get_profile(&self, subject_id: &str) -> Result<HealthProfile, ProfileServiceError> {
        let profile = self
            .repository
            .get_by_subject(subject_id)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| ProfileServiceError::NotFound(subject_id.to_string()))?;

        Ok(convert_to_domain_profile(profile))
    }

    async fn delete_profile(&self, subject_id: &str) -> Result<(), ProfileServiceError> {
        let deleted = self
            .repository
            .delete(subject_id)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        if !deleted {
            return Err(ProfileServiceError::NotFound(subject_id.to_string()));
        }

        Ok(())
    }

    async fn get_health_metrics(
        &self,
        subject_id: &str,
    ) -> Result<HealthMetrics, ProfileServiceError> {
        let profile = self.get_profile(subject_id).await?;
        Ok(health_metrics(&profile))
    }

    async fn get_health_summary(
        &self,
        subject_id: &str,
    ) -> Result<HealthSummary, ProfileServiceError> {
        let profile = self.get_profile(subject_id).await?;
        Ok(HealthSummary::from(&profile))
    }
}

/// Create a profile service backed by the default repository
pub fn create_default_profile_service() -> ProfileService<ProfileRepository> {
    ProfileService::new(ProfileRepository::new())
}

/// Create a profile service over the memory-only mock repository
#[cfg(feature = "mock")]
pub fn create_mock_profile_service(
) -> ProfileService<healthmate_data::repository::MockProfileRepository> {
    ProfileService::new(healthmate_data::repository::MockProfileRepository::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthmate_data::repository::MockProfileRepository;

    fn service() -> ProfileService<MockProfileRepository> {
        ProfileService::new(MockProfileRepository::new())
    }

    fn request(height: Option<f64>, weight: Option<f64>) -> UpsertProfileRequest {
        UpsertProfileRequest {
            full_name: Some("Ayesha Khan".to_string()),
            age: Some(34),
            height_cm: height,
            weight_kg: weight,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn upsert_derives_bmi_from_height_and_weight() {
        let service = service();

        let profile = service
            .upsert_profile("subj-1", request(Some(170.0), Some(65.0)))
            .await
            .unwrap();

        assert_eq!(profile.bmi, Some(22.5));
    }

    #[tokio::test]
    async fn partial_update_recomputes_bmi_from_effective_values() {
        let service = service();
        service
            .upsert_profile("subj-1", request(Some(170.0), Some(65.0)))
            .await
            .unwrap();

        // Only the weight changes; height comes from the stored profile
        let update = UpsertProfileRequest {
            weight_kg: Some(72.25),
            ..Default::default()
        };
        let profile = service.upsert_profile("subj-1", update).await.unwrap();

        assert_eq!(profile.height_cm, Some(170.0));
        assert_eq!(profile.bmi, Some(25.0));
    }

    #[tokio::test]
    async fn bmi_stays_absent_without_both_inputs() {
        let service = service();

        let profile = service
            .upsert_profile("subj-1", request(Some(170.0), None))
            .await
            .unwrap();

        assert_eq!(profile.bmi, None);
    }

    #[tokio::test]
    async fn systolic_must_exceed_diastolic() {
        let service = service();
        let mut bad = request(None, None);
        bad.blood_pressure_systolic = Some(80);
        bad.blood_pressure_diastolic = Some(120);

        let err = service.upsert_profile("subj-1", bad).await.unwrap_err();
        assert!(matches!(err, ProfileServiceError::ValidationError(_)));
    }

    #[tokio::test]
    async fn get_profile_for_unknown_subject_is_not_found() {
        let service = service();
        let err = service.get_profile("missing").await.unwrap_err();
        assert!(matches!(err, ProfileServiceError::NotFound(_)));
    }
}
