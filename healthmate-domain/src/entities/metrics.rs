use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// BMI category based on the derived body mass index
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum BmiCategory {
    /// BMI below 18.5
    Underweight,

    /// BMI 18.5 to 24.9
    Normal,

    /// BMI 25.0 to 29.9
    Overweight,

    /// BMI 30.0 and above
    Obese,
}

impl ToString for BmiCategory {
    fn to_string(&self) -> String {
        match self {
            BmiCategory::Underweight => "Underweight".to_string(),
            BmiCategory::Normal => "Normal".to_string(),
            BmiCategory::Overweight => "Overweight".to_string(),
            BmiCategory::Obese => "Obese".to_string(),
        }
    }
}

/// Blood pressure category based on systolic and diastolic readings
///
/// Stage 1 is an OR test over the two readings, inherited from the source
/// rule set and preserved literally.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum BloodPressureCategory {
    /// Systolic < 120 and diastolic < 80
    Normal,

    /// Systolic 120-129 and diastolic < 80
    Elevated,

    /// Systolic < 140 or diastolic < 90
    #[serde(rename = "High Stage 1")]
    HighStage1,

    /// Everything above Stage 1
    #[serde(rename = "High Stage 2")]
    HighStage2,
}

impl ToString for BloodPressureCategory {
    fn to_string(&self) -> String {
        match self {
            BloodPressureCategory::Normal => "Normal".to_string(),
            BloodPressureCategory::Elevated => "Elevated".to_string(),
            BloodPressureCategory::HighStage1 => "High Stage 1".to_string(),
            BloodPressureCategory::HighStage2 => "High Stage 2".to_string(),
        }
    }
}

/// Fasting blood sugar category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum BloodSugarCategory {
    /// Below 100 mg/dL
    Normal,

    /// 100-125 mg/dL
    Prediabetes,

    /// 126 mg/dL and above
    Diabetes,
}

impl ToString for BloodSugarCategory {
    fn to_string(&self) -> String {
        match self {
            BloodSugarCategory::Normal => "Normal".to_string(),
            BloodSugarCategory::Prediabetes => "Prediabetes".to_string(),
            BloodSugarCategory::Diabetes => "Diabetes".to_string(),
        }
    }
}

/// Total cholesterol category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum CholesterolCategory {
    /// Below 200 mg/dL
    Desirable,

    /// 200-239 mg/dL
    #[serde(rename = "Borderline High")]
    BorderlineHigh,

    /// 240 mg/dL and above
    High,
}

impl ToString for CholesterolCategory {
    fn to_string(&self) -> String {
        match self {
            CholesterolCategory::Desirable => "Desirable".to_string(),
            CholesterolCategory::BorderlineHigh => "Borderline High".to_string(),
            CholesterolCategory::High => "High".to_string(),
        }
    }
}

/// Read-only categorizations derived from a profile's vitals
///
/// Absent inputs yield absent categories; deriving metrics never fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HealthMetrics {
    /// Derived body mass index
    pub bmi: Option<f64>,

    /// Category for the derived BMI
    pub bmi_category: Option<BmiCategory>,

    /// Category for the stored blood pressure reading
    pub blood_pressure: Option<BloodPressureCategory>,

    /// Category for the stored fasting blood sugar
    pub blood_sugar: Option<BloodSugarCategory>,

    /// Category for the stored total cholesterol
    pub cholesterol: Option<CholesterolCategory>,
}
