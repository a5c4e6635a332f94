//! AI analysis normalizer
//!
//! Converts the model's raw text response into a guaranteed-valid
//! `AiAnalysis`. The parse step produces a tagged result before any field is
//! trusted; every failure path lands on the fixed fallback analysis, so the
//! caller never sees a null or partially-filled analysis.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::entities::report::{AiAnalysis, MedicalReport, RiskLevel};

/// Why a model response could not be accepted as an analysis
#[derive(Error, Debug)]
pub enum AnalysisParseError {
    /// The response text contains no JSON object at all
    #[error("response contains no JSON object")]
    NoJsonObject,

    /// The extracted payload is not valid JSON
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field is missing or empty after parsing
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Instruction template sent to the model together with the file bytes
///
/// The response contract is the exact `AiAnalysis` JSON shape with the
/// four-token risk enumeration.
pub fn analysis_prompt(report_type: &str) -> String {
    format!(
        r#"
You are a medical AI assistant. Analyze this medical report image and provide analysis in the following JSON format:

{{
  "ai_summary_english": "Detailed summary in English",
  "ai_summary_urdu": "Detailed summary in Roman Urdu",
  "ai_abnormal_values": ["List abnormal findings"],
  "ai_doctor_questions": ["5 questions for doctor"],
  "ai_food_to_avoid": ["Foods to avoid"],
  "ai_better_foods": ["Recommended foods"],
  "ai_home_remedies": ["Lifestyle tips"],
  "ai_risk_level": "low"
}}

CRITICAL: ai_risk_level MUST be exactly one of these values: "low", "medium", "high", "critical"
Do not use any other variations like "moderate", "severe", "minimal", etc.

Guidelines:
- Provide clear, accurate medical analysis
- Include Roman Urdu summary for Pakistani/Indian patients
- List any abnormal values with normal ranges
- Be conservative with risk assessment (use "low" when uncertain)
- Focus on actionable insights
- ai_risk_level must be exactly: "low", "medium", "high", or "critical"

Report Type: {report_type}

Return only valid JSON without additional text or formatting.
"#
    )
}

/// Locate the JSON object inside a possibly fenced or chatty response
///
/// Takes the substring between the first opening and the last closing brace,
/// which also strips markdown code fences.
pub fn extract_json_payload(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Normalize a raw risk token to one of the four stored levels
///
/// Lowercases and trims, maps known synonyms, and defaults anything
/// unrecognized to `low` with a logged warning — a bad token never fails the
/// whole analysis.
pub fn normalize_risk_level(raw: &str) -> RiskLevel {
    match raw.to_lowercase().trim() {
        "low" | "minimal" | "safe" => RiskLevel::Low,
        "medium" | "moderate" | "mild" => RiskLevel::Medium,
        "high" | "severe" | "elevated" => RiskLevel::High,
        "critical" | "urgent" | "emergency" | "serious" => RiskLevel::Critical,
        other => {
            warn!("Unknown risk level \"{}\", defaulting to \"low\"", other);
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    ai_summary_english: Option<String>,
    ai_summary_urdu: Option<String>,
    ai_abnormal_values: Option<Value>,
    ai_doctor_questions: Option<Value>,
    ai_food_to_avoid: Option<Value>,
    ai_better_foods: Option<Value>,
    ai_home_remedies: Option<Value>,
    ai_risk_level: Option<Value>,
}

/// Read a list field leniently: missing or non-array values become an empty
/// list, non-string items are skipped
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Read the raw risk token, stringifying non-string values
fn risk_token(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(token)) => token.clone(),
        Some(other) => other.to_string(),
        None => "low".to_string(),
    }
}

/// Parse a model response into a validated analysis
///
/// Both summaries are required and must be non-empty; everything else
/// degrades to safe defaults. The returned error is the signal to fall back,
/// never something to surface to the user.
pub fn parse_analysis(text: &str) -> Result<AiAnalysis, AnalysisParseError> {
    let payload = extract_json_payload(text).ok_or(AnalysisParseError::NoJsonObject)?;
    let raw: RawAnalysis = serde_json::from_str(payload)?;

    let summary_english = raw
        .ai_summary_english
        .filter(|s| !s.trim().is_empty())
        .ok_or(AnalysisParseError::MissingField("ai_summary_english"))?;

    let summary_urdu = raw
        .ai_summary_urdu
        .filter(|s| !s.trim().is_empty())
        .ok_or(AnalysisParseError::MissingField("ai_summary_urdu"))?;

    Ok(AiAnalysis {
        summary_english,
        summary_urdu,
        abnormal_values: string_list(raw.ai_abnormal_values.as_ref()),
        doctor_questions: string_list(raw.ai_doctor_questions.as_ref()),
        food_to_avoid: string_list(raw.ai_food_to_avoid.as_ref()),
        better_foods: string_list(raw.ai_better_foods.as_ref()),
        home_remedies: string_list(raw.ai_home_remedies.as_ref()),
        risk_level: normalize_risk_level(&risk_token(raw.ai_risk_level.as_ref())),
    })
}

/// Parse a model response, substituting the fallback analysis on any failure
pub fn analysis_or_fallback(text: &str) -> AiAnalysis {
    match parse_analysis(text) {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!("AI response could not be normalized ({}), using fallback analysis", e);
            fallback_analysis()
        }
    }
}

/// The fixed placeholder analysis
///
/// Returned whenever the model call fails or its response cannot be trusted.
/// Deterministic — tests assert on it verbatim.
pub fn fallback_analysis() -> AiAnalysis {
    AiAnalysis {
        summary_english: "Your medical report has been uploaded successfully. The AI analysis \
            encountered an issue, but your report is safely stored. Please consult your \
            healthcare provider for professional interpretation of your results."
            .to_string(),
        summary_urdu: "Aapki medical report successfully upload ho gayi hai. AI analysis mein \
            kuch issue aya, lekin aapki report safely store hai. Professional interpretation ke \
            liye apne doctor se zaroor consult karein."
            .to_string(),
        abnormal_values: vec!["AI analysis incomplete - manual review recommended".to_string()],
        doctor_questions: vec![
            "Could you review my uploaded report and explain the key findings?".to_string(),
            "Are there any values in my report that need attention?".to_string(),
            "What follow-up tests or actions do you recommend?".to_string(),
            "How do these results compare to my previous reports?".to_string(),
            "What lifestyle changes should I consider based on these results?".to_string(),
        ],
        food_to_avoid: vec![
            "Processed and packaged foods".to_string(),
            "Excessive sugar and sweets".to_string(),
            "High sodium foods".to_string(),
        ],
        better_foods: vec![
            "Fresh fruits and vegetables".to_string(),
            "Lean proteins like chicken and fish".to_string(),
            "Whole grains and nuts".to_string(),
        ],
        home_remedies: vec![
            "🌅 Maintain 7-8 hours of quality sleep daily".to_string(),
            "💧 Stay hydrated with 8-10 glasses of water".to_string(),
            "🚶 Engage in 30 minutes of light exercise daily".to_string(),
            "🧘 Practice stress reduction through meditation or deep breathing".to_string(),
            "📋 Follow a balanced, nutritious diet".to_string(),
        ],
        risk_level: RiskLevel::Low,
    }
}

/// Build the trend-insights prompt over a user's analyzed reports
pub fn health_insights_prompt(reports: &[MedicalReport]) -> String {
    let timeline: Vec<Value> = reports
        .iter()
        .filter_map(|report| {
            report.analysis.as_ref().map(|analysis| {
                serde_json::json!({
                    "date": report.created_at,
                    "summary": analysis.summary_english,
                    "abnormalValues": analysis.abnormal_values,
                    "riskLevel": analysis.risk_level.as_str(),
                })
            })
        })
        .collect();

    let reports_json = serde_json::to_string_pretty(&timeline).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"
Based on the following medical reports timeline, generate a comprehensive health insight for the patient:

{reports_json}

Please provide:
1. Overall health trend analysis
2. Improvements or concerning patterns
3. Key recommendations for maintaining/improving health
4. Important areas to monitor

Keep the response concise but informative, suitable for a patient dashboard. Write in a friendly, encouraging tone while being medically accurate.

Respond in both English and Roman Urdu format like this:
"English insight here. Roman Urdu insight yahan likhein."
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well_formed_response(risk: &str) -> String {
        format!(
            r#"```json
{{
  "ai_summary_english": "Mild anemia indicated by low hemoglobin.",
  "ai_summary_urdu": "Hemoglobin kam hai, halki anemia ho sakti hai.",
  "ai_abnormal_values": ["Hemoglobin 10.2 g/dL (normal 12-16)"],
  "ai_doctor_questions": ["Should I take iron supplements?"],
  "ai_food_to_avoid": ["Tea with meals"],
  "ai_better_foods": ["Spinach", "Red meat"],
  "ai_home_remedies": ["Iron-rich diet"],
  "ai_risk_level": "{risk}"
}}
```"#
        )
    }

    #[test]
    fn parses_fenced_json_and_normalizes_synonym_risk() {
        let analysis = parse_analysis(&well_formed_response("Moderate")).unwrap();

        assert_eq!(analysis.risk_level, RiskLevel::Medium);
        assert_eq!(
            analysis.abnormal_values,
            vec!["Hemoglobin 10.2 g/dL (normal 12-16)".to_string()]
        );
    }

    #[test]
    fn unknown_risk_token_defaults_to_low() {
        let analysis = parse_analysis(&well_formed_response("banana")).unwrap();
        assert_eq!(analysis.risk_level, RiskLevel::Low);
    }

    #[test]
    fn risk_synonyms_map_to_the_four_tokens() {
        assert_eq!(normalize_risk_level("Minimal"), RiskLevel::Low);
        assert_eq!(normalize_risk_level("safe"), RiskLevel::Low);
        assert_eq!(normalize_risk_level(" mild "), RiskLevel::Medium);
        assert_eq!(normalize_risk_level("SEVERE"), RiskLevel::High);
        assert_eq!(normalize_risk_level("elevated"), RiskLevel::High);
        assert_eq!(normalize_risk_level("urgent"), RiskLevel::Critical);
        assert_eq!(normalize_risk_level("serious"), RiskLevel::Critical);
    }

    #[test]
    fn missing_urdu_summary_falls_back_completely() {
        let response = r#"{"ai_summary_english": "Summary only in English", "ai_risk_level": "high"}"#;

        assert!(matches!(
            parse_analysis(response),
            Err(AnalysisParseError::MissingField("ai_summary_urdu"))
        ));

        // The recovery path yields the full fallback, never a partial record
        let analysis = analysis_or_fallback(response);
        assert_eq!(analysis, fallback_analysis());
        assert_eq!(analysis.risk_level, RiskLevel::Low);
    }

    #[test]
    fn non_json_response_falls_back() {
        assert!(matches!(
            parse_analysis("I could not analyze this report."),
            Err(AnalysisParseError::NoJsonObject)
        ));
        assert_eq!(
            analysis_or_fallback("I could not analyze this report."),
            fallback_analysis()
        );
    }

    #[test]
    fn list_fields_default_to_empty_when_missing_or_malformed() {
        let response = r#"{
            "ai_summary_english": "Summary",
            "ai_summary_urdu": "Khulasa",
            "ai_abnormal_values": "not a list",
            "ai_risk_level": "low"
        }"#;

        let analysis = parse_analysis(response).unwrap();
        assert!(analysis.abnormal_values.is_empty());
        assert!(analysis.doctor_questions.is_empty());
        assert!(analysis.home_remedies.is_empty());
    }

    /// The fallback is a fixed point of the normalizer: serializing it back
    /// into the model's response shape and re-parsing yields the identical
    /// record.
    #[test]
    fn fallback_analysis_is_a_fixed_point() {
        let fallback = fallback_analysis();

        let as_response = serde_json::json!({
            "ai_summary_english": fallback.summary_english,
            "ai_summary_urdu": fallback.summary_urdu,
            "ai_abnormal_values": fallback.abnormal_values,
            "ai_doctor_questions": fallback.doctor_questions,
            "ai_food_to_avoid": fallback.food_to_avoid,
            "ai_better_foods": fallback.better_foods,
            "ai_home_remedies": fallback.home_remedies,
            "ai_risk_level": fallback.risk_level.as_str(),
        })
        .to_string();

        assert_eq!(parse_analysis(&as_response).unwrap(), fallback);
    }

    #[test]
    fn prompt_pins_the_risk_token_contract() {
        let prompt = analysis_prompt("blood-test");

        assert!(prompt.contains("\"ai_summary_urdu\""));
        assert!(prompt.contains("exactly one of these values"));
        assert!(prompt.contains("Report Type: blood-test"));
    }
}
