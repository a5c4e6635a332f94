use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Fixed vocabulary of chat topics, in classification priority order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum Topic {
    Diabetes,
    BloodPressure,
    Heart,
    Weight,
    Medication,
    Symptoms,
    Nutrition,
    Sleep,
    MentalHealth,
    General,
}

impl Topic {
    /// Stored token for the topic
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Diabetes => "diabetes",
            Topic::BloodPressure => "blood-pressure",
            Topic::Heart => "heart",
            Topic::Weight => "weight",
            Topic::Medication => "medication",
            Topic::Symptoms => "symptoms",
            Topic::Nutrition => "nutrition",
            Topic::Sleep => "sleep",
            Topic::MentalHealth => "mental-health",
            Topic::General => "general",
        }
    }

    /// Parse a stored token; anything unrecognized is `General`
    pub fn parse(token: &str) -> Self {
        match token {
            "diabetes" => Topic::Diabetes,
            "blood-pressure" => Topic::BloodPressure,
            "heart" => Topic::Heart,
            "weight" => Topic::Weight,
            "medication" => Topic::Medication,
            "symptoms" => Topic::Symptoms,
            "nutrition" => Topic::Nutrition,
            "sleep" => Topic::Sleep,
            "mental-health" => Topic::MentalHealth,
            _ => Topic::General,
        }
    }
}

/// Domain model for one stored chat exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ChatMessage {
    /// Unique identifier for the exchange
    pub id: String,

    /// Opaque subject id of the owning user
    pub subject_id: String,

    /// What the user asked
    pub user_message: String,

    /// What the assistant replied
    pub ai_response: String,

    /// Topic inferred from the user message
    pub topic: Topic,

    /// When the exchange was stored (RFC 3339)
    pub created_at: String,
}
