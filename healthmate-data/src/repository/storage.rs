use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use crate::database::DatabasePool;
use crate::models::chat::ChatMessage;
use crate::models::profile::HealthProfile;
use crate::models::report::{AnalysisData, MedicalReport};

use super::errors::RepositoryError;

/// Parse a JSON-array column into a string list
fn json_list_column(idx: usize, value: Option<String>) -> rusqlite::Result<Option<Vec<String>>> {
    match value {
        None => Ok(None),
        Some(text) => serde_json::from_str(&text).map(Some).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        }),
    }
}

/// Database storage operations for health profiles
pub struct ProfileStorage;

const PROFILE_COLUMNS: &str = "id, subject_id, full_name, age, gender, blood_group, height_cm, \
     weight_kg, bmi, chronic_diseases, allergies, current_medications, past_surgeries, \
     family_history, blood_pressure_systolic, blood_pressure_diastolic, heart_rate, blood_sugar, \
     cholesterol, oxygen_level, primary_goal, target_weight, activity_level, dietary_preferences, \
     sleep_hours, created_at, updated_at";

fn row_to_profile(row: &Row) -> rusqlite::Result<HealthProfile> {
    Ok(HealthProfile {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        full_name: row.get(2)?,
        age: row.get(3)?,
        gender: row.get(4)?,
        blood_group: row.get(5)?,
        height_cm: row.get(6)?,
        weight_kg: row.get(7)?,
        bmi: row.get(8)?,
        chronic_diseases: row.get(9)?,
        allergies: row.get(10)?,
        current_medications: row.get(11)?,
        past_surgeries: row.get(12)?,
        family_history: row.get(13)?,
        blood_pressure_systolic: row.get(14)?,
        blood_pressure_diastolic: row.get(15)?,
        heart_rate: row.get(16)?,
        blood_sugar: row.get(17)?,
        cholesterol: row.get(18)?,
        oxygen_level: row.get(19)?,
        primary_goal: row.get(20)?,
        target_weight: row.get(21)?,
        activity_level: row.get(22)?,
        dietary_preferences: row.get(23)?,
        sleep_hours: row.get(24)?,
        created_at: row.get(25)?,
        updated_at: row.get(26)?,
    })
}

impl ProfileStorage {
    /// Write a full profile row, replacing any existing row for the subject
    pub async fn upsert(pool: &DatabasePool, profile: &HealthProfile) -> Result<(), RepositoryError> {
        debug!("Upserting health profile for subject: {}", profile.subject_id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                conn.execute(
                    "INSERT OR REPLACE INTO health_profiles (
                        id, subject_id, full_name, age, gender, blood_group, height_cm,
                        weight_kg, bmi, chronic_diseases, allergies, current_medications,
                        past_surgeries, family_history, blood_pressure_systolic,
                        blood_pressure_diastolic, heart_rate, blood_sugar, cholesterol,
                        oxygen_level, primary_goal, target_weight, activity_level,
                        dietary_preferences, sleep_hours, created_at, updated_at
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                               ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27)",
                    params![
                        profile.id,
                        profile.subject_id,
                        profile.full_name,
                        profile.age,
                        profile.gender,
                        profile.blood_group,
                        profile.height_cm,
                        profile.weight_kg,
                        profile.bmi,
                        profile.chronic_diseases,
                        profile.allergies,
                        profile.current_medications,
                        profile.past_surgeries,
                        profile.family_history,
                        profile.blood_pressure_systolic,
                        profile.blood_pressure_diastolic,
                        profile.heart_rate,
                        profile.blood_sugar,
                        profile.cholesterol,
                        profile.oxygen_level,
                        profile.primary_goal,
                        profile.target_weight,
                        profile.activity_level,
                        profile.dietary_preferences,
                        profile.sleep_hours,
                        profile.created_at,
                        profile.updated_at,
                    ],
                )?;

                Ok(())
            }
        }
    }

    /// Get a profile by subject id
    pub async fn get(
        pool: &DatabasePool,
        subject_id: &str,
    ) -> Result<Option<HealthProfile>, RepositoryError> {
        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let profile = conn
                    .query_row(
                        &format!(
                            "SELECT {} FROM health_profiles WHERE subject_id = ?1",
                            PROFILE_COLUMNS
                        ),
                        params![subject_id],
                        row_to_profile,
                    )
                    .optional()?;

                Ok(profile)
            }
        }
    }

    /// Delete a profile by subject id, returning whether a row was removed
    pub async fn delete(pool: &DatabasePool, subject_id: &str) -> Result<bool, RepositoryError> {
        debug!("Deleting health profile for subject: {}", subject_id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let rows = conn.execute(
                    "DELETE FROM health_profiles WHERE subject_id = ?1",
                    params![subject_id],
                )?;

                Ok(rows > 0)
            }
        }
    }
}

/// Database storage operations for medical reports
pub struct ReportStorage;

const REPORT_COLUMNS: &str = "id, subject_id, report_file_url, report_file_name, \
     report_file_type, report_type, report_notes, uploaded_at, ai_analyzed, \
     ai_summary_english, ai_summary_urdu, ai_abnormal_values, ai_doctor_questions, \
     ai_food_to_avoid, ai_better_foods, ai_home_remedies, ai_risk_level, ai_analyzed_at, \
     created_at, updated_at";

fn row_to_report(row: &Row) -> rusqlite::Result<MedicalReport> {
    Ok(MedicalReport {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        report_file_url: row.get(2)?,
        report_file_name: row.get(3)?,
        report_file_type: row.get(4)?,
        report_type: row.get(5)?,
        report_notes: row.get(6)?,
        uploaded_at: row.get(7)?,
        ai_analyzed: row.get(8)?,
        ai_summary_english: row.get(9)?,
        ai_summary_urdu: row.get(10)?,
        ai_abnormal_values: json_list_column(11, row.get(11)?)?,
        ai_doctor_questions: json_list_column(12, row.get(12)?)?,
        ai_food_to_avoid: json_list_column(13, row.get(13)?)?,
        ai_better_foods: json_list_column(14, row.get(14)?)?,
        ai_home_remedies: json_list_column(15, row.get(15)?)?,
        ai_risk_level: row.get(16)?,
        ai_analyzed_at: row.get(17)?,
        created_at: row.get(18)?,
        updated_at: row.get(19)?,
    })
}

impl ReportStorage {
    /// Insert a freshly registered report row
    pub async fn store(pool: &DatabasePool, report: &MedicalReport) -> Result<(), RepositoryError> {
        debug!("Storing medical report in database: id={}", report.id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                conn.execute(
                    "INSERT INTO medical_reports (
                        id, subject_id, report_file_url, report_file_name, report_file_type,
                        report_type, report_notes, uploaded_at, ai_analyzed, created_at, updated_at
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                    params![
                        report.id,
                        report.subject_id,
                        report.report_file_url,
                        report.report_file_name,
                        report.report_file_type,
                        report.report_type,
                        report.report_notes,
                        report.uploaded_at,
                        report.ai_analyzed,
                        report.created_at,
                        report.updated_at,
                    ],
                )?;

                Ok(())
            }
        }
    }

    /// Get a report by id
    pub async fn get(
        pool: &DatabasePool,
        id: &str,
    ) -> Result<Option<MedicalReport>, RepositoryError> {
        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let report = conn
                    .query_row(
                        &format!("SELECT {} FROM medical_reports WHERE id = ?1", REPORT_COLUMNS),
                        params![id],
                        row_to_report,
                    )
                    .optional()?;

                Ok(report)
            }
        }
    }

    /// All reports for a subject, newest first
    pub async fn list_for_subject(
        pool: &DatabasePool,
        subject_id: &str,
    ) -> Result<Vec<MedicalReport>, RepositoryError> {
        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM medical_reports WHERE subject_id = ?1
                     ORDER BY created_at DESC",
                    REPORT_COLUMNS
                ))?;

                let rows = stmt.query_map(params![subject_id], row_to_report)?;

                let mut reports = Vec::new();
                for report in rows {
                    reports.push(report?);
                }

                Ok(reports)
            }
        }
    }

    /// Delete a report by id, returning whether a row was removed
    pub async fn delete(pool: &DatabasePool, id: &str) -> Result<bool, RepositoryError> {
        debug!("Deleting medical report: id={}", id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let rows =
                    conn.execute("DELETE FROM medical_reports WHERE id = ?1", params![id])?;

                Ok(rows > 0)
            }
        }
    }

    /// Conditionally apply an analysis to an unanalyzed report
    ///
    /// The `ai_analyzed = 0` guard makes the unanalyzed→analyzed transition
    /// at-most-once under concurrent attempts. Returns the number of rows
    /// updated (0 when the report is missing or already analyzed).
    pub async fn apply_analysis(
        pool: &DatabasePool,
        id: &str,
        analysis: &AnalysisData,
        analyzed_at: &str,
    ) -> Result<usize, RepositoryError> {
        debug!("Applying analysis to medical report: id={}", id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let rows = conn.execute(
                    "UPDATE medical_reports SET
                        ai_summary_english = ?1,
                        ai_summary_urdu = ?2,
                        ai_abnormal_values = ?3,
                        ai_doctor_questions = ?4,
                        ai_food_to_avoid = ?5,
                        ai_better_foods = ?6,
                        ai_home_remedies = ?7,
                        ai_risk_level = ?8,
                        ai_analyzed = 1,
                        ai_analyzed_at = ?9,
                        updated_at = ?9
                     WHERE id = ?10 AND ai_analyzed = 0",
                    params![
                        analysis.summary_english,
                        analysis.summary_urdu,
                        serde_json::to_string(&analysis.abnormal_values)?,
                        serde_json::to_string(&analysis.doctor_questions)?,
                        serde_json::to_string(&analysis.food_to_avoid)?,
                        serde_json::to_string(&analysis.better_foods)?,
                        serde_json::to_string(&analysis.home_remedies)?,
                        analysis.risk_level,
                        analyzed_at,
                        id,
                    ],
                )?;

                Ok(rows)
            }
        }
    }
}

/// Database storage operations for chat history
pub struct ChatStorage;

impl ChatStorage {
    /// Insert one chat exchange
    pub async fn store(pool: &DatabasePool, message: &ChatMessage) -> Result<(), RepositoryError> {
        debug!("Storing chat message in database: id={}", message.id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                conn.execute(
                    "INSERT INTO ai_chat_history
                        (id, subject_id, user_message, ai_response, topic, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        message.id,
                        message.subject_id,
                        message.user_message,
                        message.ai_response,
                        message.topic,
                        message.created_at,
                    ],
                )?;

                Ok(())
            }
        }
    }

    /// Chat history for a subject in chronological order
    pub async fn history(
        pool: &DatabasePool,
        subject_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut stmt = conn.prepare(
                    "SELECT id, subject_id, user_message, ai_response, topic, created_at
                     FROM ai_chat_history WHERE subject_id = ?1
                     ORDER BY created_at ASC LIMIT ?2",
                )?;

                // SQLite treats LIMIT -1 as unlimited
                let limit = limit.map(|l| l as i64).unwrap_or(-1);

                let rows = stmt.query_map(params![subject_id, limit], |row| {
                    Ok(ChatMessage {
                        id: row.get(0)?,
                        subject_id: row.get(1)?,
                        user_message: row.get(2)?,
                        ai_response: row.get(3)?,
                        topic: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })?;

                let mut messages = Vec::new();
                for message in rows {
                    messages.push(message?);
                }

                Ok(messages)
            }
        }
    }

    /// Remove all history for a subject, returning the number of rows removed
    pub async fn clear(pool: &DatabasePool, subject_id: &str) -> Result<usize, RepositoryError> {
        debug!("Clearing chat history for subject: {}", subject_id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let rows = conn.execute(
                    "DELETE FROM ai_chat_history WHERE subject_id = ?1",
                    params![subject_id],
                )?;

                Ok(rows)
            }
        }
    }
}
