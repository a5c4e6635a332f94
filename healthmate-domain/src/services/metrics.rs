//! Metrics engine: read-only health categorizations derived from raw vitals
//!
//! Every function is pure and total — absent or invalid inputs yield an
//! absent result, never an error.

use crate::entities::metrics::{
    BloodPressureCategory, BloodSugarCategory, BmiCategory, CholesterolCategory, HealthMetrics,
};
use crate::entities::profile::HealthProfile;

/// Compute body mass index from height and weight
///
/// `weight_kg / (height_cm / 100)^2`, rounded to one decimal place. Absent
/// when either input is missing, zero or negative.
pub fn compute_bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<f64> {
    let height_cm = height_cm?;
    let weight_kg = weight_kg?;

    if height_cm <= 0.0 || weight_kg <= 0.0 {
        return None;
    }

    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);

    Some((bmi * 10.0).round() / 10.0)
}

/// Categorize a BMI value
///
/// Boundaries are inclusive-low: exactly 18.5 is Normal, exactly 25 is
/// Overweight, exactly 30 is Obese.
pub fn bmi_category(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Categorize a blood pressure reading
///
/// The Stage 1 arm tests `systolic < 140 OR diastolic < 90`, inherited
/// literally from the source rule set (so e.g. 200/70 is Stage 1, not
/// Stage 2).
pub fn blood_pressure_category(systolic: u16, diastolic: u16) -> BloodPressureCategory {
    if systolic < 120 && diastolic < 80 {
        BloodPressureCategory::Normal
    } else if systolic < 130 && diastolic < 80 {
        BloodPressureCategory::Elevated
    } else if systolic < 140 || diastolic < 90 {
        BloodPressureCategory::HighStage1
    } else {
        BloodPressureCategory::HighStage2
    }
}

/// Categorize a fasting blood sugar reading in mg/dL
pub fn blood_sugar_category(mg_dl: f64) -> BloodSugarCategory {
    if mg_dl < 100.0 {
        BloodSugarCategory::Normal
    } else if mg_dl < 126.0 {
        BloodSugarCategory::Prediabetes
    } else {
        BloodSugarCategory::Diabetes
    }
}

/// Categorize a total cholesterol reading in mg/dL
pub fn cholesterol_category(mg_dl: f64) -> CholesterolCategory {
    if mg_dl < 200.0 {
        CholesterolCategory::Desirable
    } else if mg_dl < 240.0 {
        CholesterolCategory::BorderlineHigh
    } else {
        CholesterolCategory::High
    }
}

/// Derive the full set of metrics for a profile
///
/// The stored BMI is preferred; when it is absent the value is derived from
/// height and weight.
pub fn health_metrics(profile: &HealthProfile) -> HealthMetrics {
    let bmi = profile
        .bmi
        .or_else(|| compute_bmi(profile.height_cm, profile.weight_kg));

    let blood_pressure = match (
        profile.blood_pressure_systolic,
        profile.blood_pressure_diastolic,
    ) {
        (Some(systolic), Some(diastolic)) => Some(blood_pressure_category(systolic, diastolic)),
        _ => None,
    };

    HealthMetrics {
        bmi,
        bmi_category: bmi.map(bmi_category),
        blood_pressure,
        blood_sugar: profile.blood_sugar.map(blood_sugar_category),
        cholesterol: profile.cholesterol.map(cholesterol_category),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_formula_and_rounding() {
        // 70 kg at 175 cm -> 22.857... -> 22.9
        assert_eq!(compute_bmi(Some(175.0), Some(70.0)), Some(22.9));
        // 80 kg at 160 cm -> 31.25, half rounds away from zero -> 31.3
        assert_eq!(compute_bmi(Some(160.0), Some(80.0)), Some(31.3));
    }

    #[test]
    fn test_bmi_absent_for_invalid_inputs() {
        assert_eq!(compute_bmi(None, Some(70.0)), None);
        assert_eq!(compute_bmi(Some(175.0), None), None);
        assert_eq!(compute_bmi(Some(0.0), Some(70.0)), None);
        assert_eq!(compute_bmi(Some(-175.0), Some(70.0)), None);
        assert_eq!(compute_bmi(Some(175.0), Some(0.0)), None);
    }

    #[test]
    fn test_bmi_category_boundaries() {
        assert_eq!(bmi_category(18.4), BmiCategory::Underweight);
        assert_eq!(bmi_category(18.5), BmiCategory::Normal);
        assert_eq!(bmi_category(24.9), BmiCategory::Normal);
        assert_eq!(bmi_category(25.0), BmiCategory::Overweight);
        assert_eq!(bmi_category(29.9), BmiCategory::Overweight);
        assert_eq!(bmi_category(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_bp_category_normal() {
        assert_eq!(
            blood_pressure_category(119, 79),
            BloodPressureCategory::Normal
        );
    }

    #[test]
    fn test_bp_category_elevated() {
        assert_eq!(
            blood_pressure_category(125, 79),
            BloodPressureCategory::Elevated
        );
    }

    #[test]
    fn test_bp_category_stage1() {
        assert_eq!(
            blood_pressure_category(135, 85),
            BloodPressureCategory::HighStage1
        );
    }

    /// Pins the literal OR rule in the Stage 1 arm: a very high systolic
    /// with a low diastolic still classifies as Stage 1. Changing this is a
    /// deliberate product decision, not a refactor.
    #[test]
    fn test_bp_category_stage1_or_rule() {
        assert_eq!(
            blood_pressure_category(200, 70),
            BloodPressureCategory::HighStage1
        );
    }

    #[test]
    fn test_bp_category_stage2() {
        assert_eq!(
            blood_pressure_category(145, 95),
            BloodPressureCategory::HighStage2
        );
    }

    #[test]
    fn test_sugar_category_boundaries() {
        assert_eq!(blood_sugar_category(99.9), BloodSugarCategory::Normal);
        assert_eq!(blood_sugar_category(100.0), BloodSugarCategory::Prediabetes);
        assert_eq!(blood_sugar_category(125.9), BloodSugarCategory::Prediabetes);
        assert_eq!(blood_sugar_category(126.0), BloodSugarCategory::Diabetes);
    }

    #[test]
    fn test_cholesterol_category_boundaries() {
        assert_eq!(cholesterol_category(199.9), CholesterolCategory::Desirable);
        assert_eq!(
            cholesterol_category(200.0),
            CholesterolCategory::BorderlineHigh
        );
        assert_eq!(cholesterol_category(240.0), CholesterolCategory::High);
    }

    #[test]
    fn test_health_metrics_absent_inputs_yield_absent_categories() {
        let profile = HealthProfile {
            id: "p-1".to_string(),
            subject_id: "subj-1".to_string(),
            full_name: None,
            age: None,
            gender: None,
            blood_group: None,
            height_cm: Some(170.0),
            weight_kg: Some(65.0),
            bmi: None,
            chronic_diseases: None,
            allergies: None,
            current_medications: None,
            past_surgeries: None,
            family_history: None,
            blood_pressure_systolic: Some(118),
            blood_pressure_diastolic: None,
            heart_rate: None,
            blood_sugar: Some(110.0),
            cholesterol: None,
            oxygen_level: None,
            primary_goal: None,
            target_weight: None,
            activity_level: None,
            dietary_preferences: None,
            sleep_hours: None,
            created_at: "2026-08-01T00:00:00Z".to_string(),
            updated_at: "2026-08-01T00:00:00Z".to_string(),
        };

        let metrics = health_metrics(&profile);

        assert_eq!(metrics.bmi, Some(22.5));
        assert_eq!(metrics.bmi_category, Some(BmiCategory::Normal));
        // One missing reading means no blood pressure category
        assert_eq!(metrics.blood_pressure, None);
        assert_eq!(metrics.blood_sugar, Some(BloodSugarCategory::Prediabetes));
        assert_eq!(metrics.cholesterol, None);
    }
}
