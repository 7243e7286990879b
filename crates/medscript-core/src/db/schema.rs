//! SQLite schema definition.

/// Complete database schema for medscript.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Medications
-- ============================================================================

CREATE TABLE IF NOT EXISTS medications (
    id TEXT PRIMARY KEY,
    owner_id TEXT,
    device_id TEXT,
    medicine_name TEXT,
    display_name TEXT,
    form TEXT NOT NULL,
    dosage TEXT NOT NULL,
    frequency INTEGER NOT NULL CHECK (frequency > 0),
    times TEXT NOT NULL DEFAULT '[]',             -- JSON array of HH:MM strings
    course_duration_days INTEGER NOT NULL CHECK (course_duration_days > 0),
    administration_instruction TEXT NOT NULL,
    start_date TEXT NOT NULL,                     -- YYYY-MM-DD
    quantity REAL NOT NULL,
    icon_colors TEXT NOT NULL,                    -- JSON object {background, ascent1, ascent2, cap}
    medication_color TEXT NOT NULL,
    background_color TEXT NOT NULL,
    icon_svg TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_medications_created_at ON medications(created_at);
CREATE INDEX IF NOT EXISTS idx_medications_owner_id ON medications(owner_id);
"#;

/// Stored in `PRAGMA user_version` once the schema is applied.
pub const SCHEMA_VERSION: i64 = 1;
