//! Medication database operations.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{DrugForm, MedicationRecord};

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str = r#"
    SELECT id, owner_id, device_id, medicine_name, display_name, form, dosage,
           frequency, times, course_duration_days, administration_instruction,
           start_date, quantity, icon_colors, medication_color, background_color,
           icon_svg, created_at
    FROM medications
"#;

impl Database {
    /// Insert a medication record.
    pub fn insert_medication(&self, record: &MedicationRecord) -> DbResult<()> {
        insert_record(&self.conn, record)
    }

    /// Insert several records in one transaction.
    pub fn insert_medications(&mut self, records: &[MedicationRecord]) -> DbResult<()> {
        let tx = self.conn.transaction()?;
        for record in records {
            insert_record(&tx, record)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Get a medication by ID.
    pub fn get_medication(&self, id: &str) -> DbResult<Option<MedicationRecord>> {
        let result = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?", SELECT_COLUMNS),
                [id],
                MedicationRow::from_row,
            )
            .optional()?;

        result.map(|row| row.try_into()).transpose()
    }

    /// List all medications, newest first.
    pub fn list_medications(&self) -> DbResult<Vec<MedicationRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} ORDER BY created_at DESC, rowid DESC",
            SELECT_COLUMNS
        ))?;

        let rows = stmt
            .query_map([], MedicationRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(|row| row.try_into()).collect()
    }

    /// Delete a medication. Returns whether a row was removed.
    pub fn delete_medication(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM medications WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Count stored medications.
    pub fn count_medications(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM medications", [], |row| row.get(0))?;
        usize::try_from(count).map_err(|_| DbError::InvalidValue(format!("row count {}", count)))
    }
}

fn insert_record(conn: &Connection, record: &MedicationRecord) -> DbResult<()> {
    let times_json = serde_json::to_string(&record.times)?;
    let colors_json = serde_json::to_string(&record.icon_colors)?;

    conn.execute(
        r#"
        INSERT INTO medications (
            id, owner_id, device_id, medicine_name, display_name, form, dosage,
            frequency, times, course_duration_days, administration_instruction,
            start_date, quantity, icon_colors, medication_color, background_color,
            icon_svg, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
        "#,
        params![
            record.id,
            record.owner_id,
            record.device_id,
            record.medicine_name,
            record.display_name,
            record.form.as_str(),
            record.dosage,
            record.frequency,
            times_json,
            record.course_duration_days,
            record.administration_instruction,
            record.start_date.format(DATE_FORMAT).to_string(),
            record.quantity,
            colors_json,
            record.medication_color,
            record.background_color,
            record.icon_svg,
            record.created_at,
        ],
    )?;
    Ok(())
}

/// Intermediate row struct for database mapping.
struct MedicationRow {
    id: String,
    owner_id: Option<String>,
    device_id: Option<String>,
    medicine_name: Option<String>,
    display_name: Option<String>,
    form: String,
    dosage: String,
    frequency: u32,
    times: String,
    course_duration_days: u32,
    administration_instruction: String,
    start_date: String,
    quantity: f64,
    icon_colors: String,
    medication_color: String,
    background_color: String,
    icon_svg: String,
    created_at: String,
}

impl MedicationRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            device_id: row.get(2)?,
            medicine_name: row.get(3)?,
            display_name: row.get(4)?,
            form: row.get(5)?,
            dosage: row.get(6)?,
            frequency: row.get(7)?,
            times: row.get(8)?,
            course_duration_days: row.get(9)?,
            administration_instruction: row.get(10)?,
            start_date: row.get(11)?,
            quantity: row.get(12)?,
            icon_colors: row.get(13)?,
            medication_color: row.get(14)?,
            background_color: row.get(15)?,
            icon_svg: row.get(16)?,
            created_at: row.get(17)?,
        })
    }
}

impl TryFrom<MedicationRow> for MedicationRecord {
    type Error = DbError;

    fn try_from(row: MedicationRow) -> Result<Self, Self::Error> {
        let start_date = NaiveDate::parse_from_str(&row.start_date, DATE_FORMAT)
            .map_err(|e| DbError::InvalidValue(format!("start_date '{}': {}", row.start_date, e)))?;

        Ok(MedicationRecord {
            id: row.id,
            owner_id: row.owner_id,
            device_id: row.device_id,
            medicine_name: row.medicine_name,
            display_name: row.display_name,
            form: DrugForm::from_label(&row.form),
            dosage: row.dosage,
            frequency: row.frequency,
            times: serde_json::from_str(&row.times)?,
            course_duration_days: row.course_duration_days,
            administration_instruction: row.administration_instruction,
            start_date,
            quantity: row.quantity,
            icon_colors: serde_json::from_str(&row.icon_colors)?,
            medication_color: row.medication_color,
            background_color: row.background_color,
            icon_svg: row.icon_svg,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MedicationCandidate;
    use crate::pipeline::Pipeline;

    fn record(name: &str, form: DrugForm) -> MedicationRecord {
        let candidate = MedicationCandidate {
            form: Some(form),
            frequency: Some(2),
            ..MedicationCandidate::named(name)
        };
        Pipeline::new()
            .resolve_on(&candidate, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
            .unwrap()
    }

    #[test]
    fn test_insert_and_get_medication() {
        let db = Database::open_in_memory().unwrap();
        let stored = record("Amoxil", DrugForm::Capsule).with_tags(Some("u1".into()), None);

        db.insert_medication(&stored).unwrap();

        let loaded = db.get_medication(&stored.id).unwrap().unwrap();
        assert_eq!(loaded, stored);
    }

    #[test]
    fn test_get_missing_medication() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_medication("nope").unwrap().is_none());
    }

    #[test]
    fn test_list_newest_first() {
        let db = Database::open_in_memory().unwrap();

        let mut first = record("Dolo", DrugForm::Tablet);
        first.created_at = "2024-02-29T08:00:00+00:00".into();
        let mut second = record("Amoxil", DrugForm::Capsule);
        second.created_at = "2024-02-29T09:00:00+00:00".into();

        db.insert_medication(&first).unwrap();
        db.insert_medication(&second).unwrap();

        let names: Vec<_> = db
            .list_medications()
            .unwrap()
            .into_iter()
            .map(|m| m.medicine_name.unwrap())
            .collect();
        assert_eq!(names, vec!["Amoxil", "Dolo"]);
    }

    #[test]
    fn test_delete_medication() {
        let db = Database::open_in_memory().unwrap();
        let stored = record("Dolo", DrugForm::Tablet);
        db.insert_medication(&stored).unwrap();

        assert!(db.delete_medication(&stored.id).unwrap());
        assert!(!db.delete_medication(&stored.id).unwrap());
        assert_eq!(db.count_medications().unwrap(), 0);
    }

    #[test]
    fn test_insert_medications_batch() {
        let mut db = Database::open_in_memory().unwrap();
        let records = vec![record("Dolo", DrugForm::Tablet), record("Benadryl", DrugForm::Syrup)];

        db.insert_medications(&records).unwrap();
        assert_eq!(db.count_medications().unwrap(), 2);
    }

    #[test]
    fn test_count_tracks_inserts() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.count_medications().unwrap(), 0);

        db.insert_medication(&record("Dolo", DrugForm::Tablet)).unwrap();
        db.insert_medication(&record("Zincovit", DrugForm::Tablet)).unwrap();
        db.insert_medication(&record("Amoxil", DrugForm::Capsule)).unwrap();
        assert_eq!(db.count_medications().unwrap(), 3);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let db = Database::open_in_memory().unwrap();
        let stored = record("Dolo", DrugForm::Tablet);
        db.insert_medication(&stored).unwrap();

        assert!(matches!(
            db.insert_medication(&stored),
            Err(DbError::Sqlite(_))
        ));
    }

    #[test]
    fn test_persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meds.db");
        let stored = record("Cetirizine", DrugForm::Other);

        {
            let db = Database::open(&path).unwrap();
            db.insert_medication(&stored).unwrap();
        }

        let db = Database::open(&path).unwrap();
        let loaded = db.get_medication(&stored.id).unwrap().unwrap();
        assert_eq!(loaded.form, DrugForm::Other);
        assert_eq!(loaded.times, vec!["08:00", "20:00"]);
    }
}
