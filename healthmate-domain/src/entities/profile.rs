use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Domain model for a user health profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HealthProfile {
    /// Unique identifier for the profile
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

    /// Body mass index, always derived from height and weight
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

/// Request payload for creating or editing a health profile
///
/// There is deliberately no `bmi` field: the service derives it from height
/// and weight before storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct UpsertProfileRequest {
    /// Full name of the user
    #[validate(length(max = 200, message = "Name cannot exceed 200 characters"))]
    pub full_name: Option<String>,

    /// Age in years
    #[validate(range(min = 1, max = 130, message = "Age must be between 1 and 130"))]
    pub age: Option<u16>,

    /// Gender
    pub gender: Option<String>,

    /// Blood group
    pub blood_group: Option<String>,

    /// Height in centimeters
    #[validate(range(min = 30.0, max = 300.0, message = "Height must be between 30 and 300 cm"))]
    pub height_cm: Option<f64>,

    /// Weight in kilograms
    #[validate(range(min = 1.0, max = 500.0, message = "Weight must be between 1 and 500 kg"))]
    pub weight_kg: Option<f64>,

    /// Known chronic diseases, free text
    #[validate(length(max = 2000, message = "Chronic diseases cannot exceed 2000 characters"))]
    pub chronic_diseases: Option<String>,

    /// Known allergies, free text
    #[validate(length(max = 2000, message = "Allergies cannot exceed 2000 characters"))]
    pub allergies: Option<String>,

    /// Current medications, free text
    #[validate(length(max = 2000, message = "Medications cannot exceed 2000 characters"))]
    pub current_medications: Option<String>,

    /// Past surgeries, free text
    #[validate(length(max = 2000, message = "Surgeries cannot exceed 2000 characters"))]
    pub past_surgeries: Option<String>,

    /// Family medical history, free text
    #[validate(length(max = 2000, message = "Family history cannot exceed 2000 characters"))]
    pub family_history: Option<String>,

    /// Systolic blood pressure
    #[validate(range(min = 40, max = 300, message = "Systolic must be between 40 and 300"))]
    pub blood_pressure_systolic: Option<u16>,

    /// Diastolic blood pressure
    #[validate(range(min = 20, max = 200, message = "Diastolic must be between 20 and 200"))]
    pub blood_pressure_diastolic: Option<u16>,

    /// Resting heart rate in beats per minute
    #[validate(range(min = 20, max = 250, message = "Heart rate must be between 20 and 250"))]
    pub heart_rate: Option<u16>,

    /// Fasting blood sugar in mg/dL
    #[validate(range(min = 10.0, max = 1000.0, message = "Blood sugar must be between 10 and 1000"))]
    pub blood_sugar: Option<f64>,

    /// Total cholesterol in mg/dL
    #[validate(range(min = 50.0, max = 1000.0, message = "Cholesterol must be between 50 and 1000"))]
    pub cholesterol: Option<f64>,

    /// Blood oxygen saturation in percent
    #[validate(range(min = 50.0, max = 100.0, message = "Oxygen level must be between 50 and 100"))]
    pub oxygen_level: Option<f64>,

    /// Primary health goal
    pub primary_goal: Option<String>,

    /// Target weight in kilograms
    #[validate(range(min = 1.0, max = 500.0, message = "Target weight must be between 1 and 500 kg"))]
    pub target_weight: Option<f64>,

    /// Activity level
    pub activity_level: Option<String>,

    /// Dietary preferences
    pub dietary_preferences: Option<String>,

    /// Average sleep per night in hours
    #[validate(range(min = 0.0, max = 24.0, message = "Sleep hours must be between 0 and 24"))]
    pub sleep_hours: Option<f64>,
}

/// Basic identity section of the health summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct BasicInfo {
    pub full_name: Option<String>,
    pub age: Option<u16>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
}

/// Vitals section of the health summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalsInfo {
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub bmi: Option<f64>,
    /// Formatted "systolic/diastolic" when both readings are present
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<u16>,
    pub blood_sugar: Option<f64>,
    pub cholesterol: Option<f64>,
    pub oxygen_level: Option<f64>,
}

/// Medical history section of the health summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MedicalInfo {
    pub chronic_diseases: Option<String>,
    pub allergies: Option<String>,
    pub current_medications: Option<String>,
    pub past_surgeries: Option<String>,
    pub family_history: Option<String>,
}

/// Lifestyle and goals section of the health summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct LifestyleInfo {
    pub primary_goal: Option<String>,
    pub target_weight: Option<f64>,
    pub activity_level: Option<String>,
    pub dietary_preferences: Option<String>,
    pub sleep_hours: Option<f64>,
}

/// Grouped view of a profile for dashboard display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HealthSummary {
    pub basic_info: BasicInfo,
    pub vitals: VitalsInfo,
    pub medical: MedicalInfo,
    pub lifestyle: LifestyleInfo,
}

impl From<&HealthProfile> for HealthSummary {
    fn from(profile: &HealthProfile) -> Self {
        let blood_pressure = match (
            profile.blood_pressure_systolic,
            profile.blood_pressure_diastolic,
        ) {
            (Some(systolic), Some(diastolic)) => Some(format!("{}/{}", systolic, diastolic)),
            _ => None,
        };

        HealthSummary {
            basic_info: BasicInfo {
                full_name: profile.full_name.clone(),
                age: profile.age,
                gender: profile.gender.clone(),
                blood_group: profile.blood_group.clone(),
            },
            vitals: VitalsInfo {
                height_cm: profile.height_cm,
                weight_kg: profile.weight_kg,
                bmi: profile.bmi,
                blood_pressure,
                heart_rate: profile.heart_rate,
                blood_sugar: profile.blood_sugar,
                cholesterol: profile.cholesterol,
                oxygen_level: profile.oxygen_level,
            },
            medical: MedicalInfo {
                chronic_diseases: profile.chronic_diseases.clone(),
                allergies: profile.allergies.clone(),
                current_medications: profile.current_medications.clone(),
                past_surgeries: profile.past_surgeries.clone(),
                family_history: profile.family_history.clone(),
            },
            lifestyle: LifestyleInfo {
                primary_goal: profile.primary_goal.clone(),
                target_weight: profile.target_weight,
                activity_level: profile.activity_level.clone(),
                dietary_preferences: profile.dietary_preferences.clone(),
                sleep_hours: profile.sleep_hours,
            },
        }
    }
}
