use rusqlite::Connection;
use tracing::info;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    info!("Running SQLite migrations");

    create_health_profiles_table(conn)?;
    create_medical_reports_table(conn)?;
    create_chat_history_table(conn)?;
    create_indexes(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the health profiles table
fn create_health_profiles_table(conn: &Connection) -> Result<(), String> {
    info!("Creating health_profiles table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS health_profiles (
            id TEXT PRIMARY KEY,
            subject_id TEXT NOT NULL UNIQUE,
            full_name TEXT,
            age INTEGER,
            gender TEXT,
            blood_group TEXT,
            height_cm REAL,
            weight_kg REAL,
            bmi REAL,
            chronic_diseases TEXT,
            allergies TEXT,
            current_medications TEXT,
            past_surgeries TEXT,
            family_history TEXT,
            blood_pressure_systolic INTEGER,
            blood_pressure_diastolic INTEGER,
            heart_rate INTEGER,
            blood_sugar REAL,
            cholesterol REAL,
            oxygen_level REAL,
            primary_goal TEXT,
            target_weight REAL,
            activity_level TEXT,
            dietary_preferences TEXT,
            sleep_hours REAL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

/// Create the medical reports table
///
/// The list-valued analysis columns hold JSON arrays; ai_risk_level mirrors
/// the original store's CHECK constraint.
fn create_medical_reports_table(conn: &Connection) -> Result<(), String> {
    info!("Creating medical_reports table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS medical_reports (
            id TEXT PRIMARY KEY,
            subject_id TEXT NOT NULL,
            report_file_url TEXT NOT NULL,
            report_file_name TEXT NOT NULL,
            report_file_type TEXT,
            report_type TEXT,
            report_notes TEXT,
            uploaded_at TEXT NOT NULL,
            ai_analyzed INTEGER NOT NULL DEFAULT 0,
            ai_summary_english TEXT,
            ai_summary_urdu TEXT,
            ai_abnormal_values TEXT,
            ai_doctor_questions TEXT,
            ai_food_to_avoid TEXT,
            ai_better_foods TEXT,
            ai_home_remedies TEXT,
            ai_risk_level TEXT CHECK (ai_risk_level IN ('low', 'medium', 'high', 'critical')),
            ai_analyzed_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

/// Create the chat history table
fn create_chat_history_table(conn: &Connection) -> Result<(), String> {
    info!("Creating ai_chat_history table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS ai_chat_history (
            id TEXT PRIMARY KEY,
            subject_id TEXT NOT NULL,
            user_message TEXT NOT NULL,
            ai_response TEXT NOT NULL,
            topic TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

/// Create indexes for per-user lookups
fn create_indexes(conn: &Connection) -> Result<(), String> {
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_medical_reports_subject
         ON medical_reports (subject_id, created_at DESC)",
        [],
    )
    .map_err(|e| format!("Failed to create index: {}", e))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_chat_history_subject
         ON ai_chat_history (subject_id, created_at)",
        [],
    )
    .map_err(|e| format!("Failed to create index: {}", e))?;

    Ok(())
}
