// Domain entities and value objects
pub mod chat;
pub mod conversions;
pub mod metrics;
pub mod profile;
pub mod report;

// Re-export common types for easier imports
pub use chat::{ChatMessage, Topic};
pub use metrics::{
    BloodPressureCategory, BloodSugarCategory, BmiCategory, CholesterolCategory, HealthMetrics,
};
pub use profile::{HealthProfile, HealthSummary, UpsertProfileRequest};
pub use report::{AiAnalysis, CreateReportRequest, MedicalReport, ReportType, RiskLevel};
