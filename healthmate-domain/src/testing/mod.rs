// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use healthmate_data::gemini::mock::{MockAnalysisModel, MockChatModel};
pub use healthmate_data::repository::{
    MockChatRepository, MockProfileRepository, MockReportRepository,
};

// Re-export mock service factories
pub use crate::services::chat::create_mock_chat_service;
pub use crate::services::profile::create_mock_profile_service;
pub use crate::services::report::create_mock_report_service;

/// A well-formed model response for analysis tests
pub fn sample_analysis_response() -> String {
    r#"{
        "ai_summary_english": "Hemoglobin slightly low, otherwise normal.",
        "ai_summary_urdu": "Hemoglobin thora kam hai, baqi sab normal hai.",
        "ai_abnormal_values": ["Hemoglobin 11.0 g/dL"],
        "ai_doctor_questions": ["Do I need iron supplements?"],
        "ai_food_to_avoid": ["Tea with meals"],
        "ai_better_foods": ["Spinach"],
        "ai_home_remedies": ["Sleep well"],
        "ai_risk_level": "low"
    }"#
    .to_string()
}
