use serde::{Deserialize, Serialize};

/// Storage model for a user health profile
///
/// One row per user, keyed by the opaque subject id assigned by the
/// external identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthProfile {
    /// Unique identifier for the profile row
    pub id: String,

    /// Opaque subject id from the external identity provider
    pub subject_id: String,

    /// Full name of the user
    pub full_name: Option<String>,

    /// Age in years
    pub age: Option<u16>,

    /// Gender
    pub gender: Option<String>,

    /// Blood group (e.g. "A+", "O-")
    pub blood_group: Option<String>,

    /// Height in centimeters
    pub height_cm: Option<f64>,

    /// Weight in kilograms
    pub weight_kg: Option<f64>,

    /// Body mass index, derived from height and weight
    pub bmi: Option<f64>,

    /// Known chronic diseases, free text
    pub chronic_diseases: Option<String>,

    /// Known allergies, free text
    pub allergies: Option<String>,

    /// Current medications, free text
    pub current_medications: Option<String>,

    /// Past surgeries, free text
    pub past_surgeries: Option<String>,

    /// Family medical history, free text
    pub family_history: Option<String>,

    /// Systolic blood pressure (the higher number)
    pub blood_pressure_systolic: Option<u16>,

    /// Diastolic blood pressure (the lower number)
    pub blood_pressure_diastolic: Option<u16>,

    /// Resting heart rate in beats per minute
    pub heart_rate: Option<u16>,

    /// Fasting blood sugar in mg/dL
    pub blood_sugar: Option<f64>,

    /// Total cholesterol in mg/dL
    pub cholesterol: Option<f64>,

    /// Blood oxygen saturation in percent
    pub oxygen_level: Option<f64>,

    /// Primary health goal
    pub primary_goal: Option<String>,

    /// Target weight in kilograms
    pub target_weight: Option<f64>,

    /// Activity level (e.g. sedentary, moderate, active)
    pub activity_level: Option<String>,

    /// Dietary preferences
    pub dietary_preferences: Option<String>,

    /// Average sleep per night in hours
    pub sleep_hours: Option<f64>,

    /// When the profile was created (RFC 3339)
    pub created_at: String,

    /// When the profile was last updated (RFC 3339)
    pub updated_at: String,
}

/// Payload for creating or updating a profile row
///
/// `bmi` is intentionally absent: the domain layer derives it from height
/// and weight before the row is written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertProfileData {
    pub full_name: Option<String>,
    pub age: Option<u16>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    /// Derived by the domain layer; never user input
    pub bmi: Option<f64>,
    pub chronic_diseases: Option<String>,
    pub allergies: Option<String>,
    pub current_medications: Option<String>,
    pub past_surgeries: Option<String>,
    pub family_history: Option<String>,
    pub blood_pressure_systolic: Option<u16>,
    pub blood_pressure_diastolic: Option<u16>,
    pub heart_rate: Option<u16>,
    pub blood_sugar: Option<f64>,
    pub cholesterol: Option<f64>,
    pub oxygen_level: Option<f64>,
    pub primary_goal: Option<String>,
    pub target_weight: Option<f64>,
    pub activity_level: Option<String>,
    pub dietary_preferences: Option<String>,
    pub sleep_hours: Option<f64>,
}
