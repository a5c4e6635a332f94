use uuid::Uuid;

use crate::entities::chat::{ChatMessage, Topic};
use crate::entities::profile::{HealthProfile, UpsertProfileRequest};
use crate::entities::report::{
    AiAnalysis, CreateReportRequest, MedicalReport, ReportType, RiskLevel,
};

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Helper function to safely parse a string ID to UUID
///
/// Centralizes UUID parsing so identifier validation is consistent across
/// the application.
pub fn parse_string_to_uuid(id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(id).map_err(|_| format!("Invalid UUID format: {}", id))
}

/// Convert from data model to domain entity for health profile
pub fn convert_to_domain_profile(
    data_profile: healthmate_data::models::profile::HealthProfile,
) -> HealthProfile {
    HealthProfile {
        id: data_profile.id,
        subject_id: data_profile.subject_id,
        full_name: data_profile.full_name,
        age: data_profile.age,
        gender: data_profile.gender,
        blood_group: data_profile.blood_group,
        height_cm: data_profile.height_cm,
        weight_kg: data_profile.weight_kg,
        bmi: data_profile.bmi,
        chronic_diseases: data_profile.chronic_diseases,
        allergies: data_profile.allergies,
        current_medications: data_profile.current_medications,
        past_surgeries: data_profile.past_surgeries,
        family_history: data_profile.family_history,
        blood_pressure_systolic: data_profile.blood_pressure_systolic,
        blood_pressure_diastolic: data_profile.blood_pressure_diastolic,
        heart_rate: data_profile.heart_rate,
        blood_sugar: data_profile.blood_sugar,
        cholesterol: data_profile.cholesterol,
        oxygen_level: data_profile.oxygen_level,
        primary_goal: data_profile.primary_goal,
        target_weight: data_profile.target_weight,
        activity_level: data_profile.activity_level,
        dietary_preferences: data_profile.dietary_preferences,
        sleep_hours: data_profile.sleep_hours,
        created_at: data_profile.created_at,
        updated_at: data_profile.updated_at,
    }
}

/// Convert from domain request to data model for profile upsert
///
/// `bmi` is supplied separately because the service derives it; it is never
/// part of the request.
pub fn convert_to_data_profile_upsert(
    domain_request: &UpsertProfileRequest,
    bmi: Option<f64>,
) -> healthmate_data::models::profile::UpsertProfileData {
    healthmate_data::models::profile::UpsertProfileData {
        full_name: domain_request.full_name.clone(),
        age: domain_request.age,
        gender: domain_request.gender.clone(),
        blood_group: domain_request.blood_group.clone(),
        height_cm: domain_request.height_cm,
        weight_kg: domain_request.weight_kg,
        bmi,
        chronic_diseases: domain_request.chronic_diseases.clone(),
        allergies: domain_request.allergies.clone(),
        current_medications: domain_request.current_medications.clone(),
        past_surgeries: domain_request.past_surgeries.clone(),
        family_history: domain_request.family_history.clone(),
        blood_pressure_systolic: domain_request.blood_pressure_systolic,
        blood_pressure_diastolic: domain_request.blood_pressure_diastolic,
        heart_rate: domain_request.heart_rate,
        blood_sugar: domain_request.blood_sugar,
        cholesterol: domain_request.cholesterol,
        oxygen_level: domain_request.oxygen_level,
        primary_goal: domain_request.primary_goal.clone(),
        target_weight: domain_request.target_weight,
        activity_level: domain_request.activity_level.clone(),
        dietary_preferences: domain_request.dietary_preferences.clone(),
        sleep_hours: domain_request.sleep_hours,
    }
}

/// Convert from data model to domain entity for medical report
///
/// The embedded analysis is reconstructed only when the row is marked
/// analyzed and both summaries are present, so a violated storage invariant
/// surfaces as an unanalyzed report rather than a half-filled analysis.
pub fn convert_to_domain_report(
    data_report: healthmate_data::models::report::MedicalReport,
) -> MedicalReport {
    let analysis = if data_report.ai_analyzed {
        match (data_report.ai_summary_english, data_report.ai_summary_urdu) {
            (Some(summary_english), Some(summary_urdu)) => Some(AiAnalysis {
                summary_english,
                summary_urdu,
                abnormal_values: data_report.ai_abnormal_values.unwrap_or_default(),
                doctor_questions: data_report.ai_doctor_questions.unwrap_or_default(),
                food_to_avoid: data_report.ai_food_to_avoid.unwrap_or_default(),
                better_foods: data_report.ai_better_foods.unwrap_or_default(),
                home_remedies: data_report.ai_home_remedies.unwrap_or_default(),
                risk_level: data_report
                    .ai_risk_level
                    .as_deref()
                    .and_then(RiskLevel::parse)
                    .unwrap_or(RiskLevel::Low),
            }),
            _ => None,
        }
    } else {
        None
    };

    MedicalReport {
        id: data_report.id,
        subject_id: data_report.subject_id,
        report_file_url: data_report.report_file_url,
        report_file_name: data_report.report_file_name,
        report_file_type: data_report.report_file_type,
        report_type: data_report.report_type.as_deref().map(ReportType::parse),
        report_notes: data_report.report_notes,
        uploaded_at: data_report.uploaded_at,
        ai_analyzed: analysis.is_some(),
        analysis,
        ai_analyzed_at: data_report.ai_analyzed_at,
        created_at: data_report.created_at,
        updated_at: data_report.updated_at,
    }
}

/// Convert from domain request to data model for report creation
pub fn convert_to_data_create_report(
    subject_id: &str,
    domain_request: &CreateReportRequest,
) -> healthmate_data::models::report::CreateReportData {
    healthmate_data::models::report::CreateReportData {
        subject_id: subject_id.to_string(),
        report_file_url: domain_request.report_file_url.clone(),
        report_file_name: domain_request.report_file_name.clone(),
        report_file_type: domain_request.report_file_type.clone(),
        report_type: domain_request.report_type.map(|t| t.as_str().to_string()),
        report_notes: domain_request.report_notes.clone(),
    }
}

/// Convert from domain analysis to the data-layer write payload
pub fn convert_to_data_analysis(
    analysis: &AiAnalysis,
) -> healthmate_data::models::report::AnalysisData {
    healthmate_data::models::report::AnalysisData {
        summary_english: analysis.summary_english.clone(),
        summary_urdu: analysis.summary_urdu.clone(),
        abnormal_values: analysis.abnormal_values.clone(),
        doctor_questions: analysis.doctor_questions.clone(),
        food_to_avoid: analysis.food_to_avoid.clone(),
        better_foods: analysis.better_foods.clone(),
        home_remedies: analysis.home_remedies.clone(),
        risk_level: analysis.risk_level.as_str().to_string(),
    }
}

/// Convert from data model to domain entity for chat message
pub fn convert_to_domain_chat_message(
    data_message: healthmate_data::models::chat::ChatMessage,
) -> ChatMessage {
    ChatMessage {
        id: data_message.id,
        subject_id: data_message.subject_id,
        user_message: data_message.user_message,
        ai_response: data_message.ai_response,
        topic: data_message
            .topic
            .as_deref()
            .map(Topic::parse)
            .unwrap_or(Topic::General),
        created_at: data_message.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyzed_row_without_urdu_summary_converts_to_unanalyzed() {
        let mut row = healthmate_data::models::report::MedicalReport {
            id: "r-1".to_string(),
            subject_id: "subj-1".to_string(),
            report_file_url: "https://files.example/r.jpg".to_string(),
            report_file_name: "r.jpg".to_string(),
            report_file_type: Some("image/jpeg".to_string()),
            report_type: Some("blood-test".to_string()),
            report_notes: None,
            uploaded_at: "2026-08-01T00:00:00Z".to_string(),
            ai_analyzed: true,
            ai_summary_english: Some("Summary".to_string()),
            ai_summary_urdu: None,
            ai_abnormal_values: None,
            ai_doctor_questions: None,
            ai_food_to_avoid: None,
            ai_better_foods: None,
            ai_home_remedies: None,
            ai_risk_level: Some("low".to_string()),
            ai_analyzed_at: Some("2026-08-02T00:00:00Z".to_string()),
            created_at: "2026-08-01T00:00:00Z".to_string(),
            updated_at: "2026-08-02T00:00:00Z".to_string(),
        };

        let report = convert_to_domain_report(row.clone());
        assert!(!report.ai_analyzed);
        assert!(report.analysis.is_none());

        row.ai_summary_urdu = Some("Khulasa".to_string());
        let report = convert_to_domain_report(row);
        assert!(report.ai_analyzed);
        let analysis = report.analysis.unwrap();
        assert_eq!(analysis.risk_level, RiskLevel::Low);
        assert!(analysis.abnormal_values.is_empty());
    }

    #[test]
    fn unknown_report_type_parses_as_other() {
        assert_eq!(ReportType::parse("mri"), ReportType::Other);
        assert_eq!(ReportType::parse("blood-test"), ReportType::BloodTest);
    }

    #[test]
    fn invalid_uuid_is_rejected_with_message() {
        assert!(parse_string_to_uuid("not-a-uuid").is_err());
        assert!(parse_string_to_uuid("8c0f64e9-2a7a-4a40-9a6c-4f8b6f9d2f11").is_ok());
    }
}
