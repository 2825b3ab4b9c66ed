// ABOUTME: Patient and assessment persistence, scoped to the owning doctor
// ABOUTME: Upserts demographics, appends assessment snapshots, reads latest-per-patient

use super::Database;
use crate::models::{Gender, PatientRecord};
use anyhow::Result;
use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

/// Selects each patient with its most recent assessment snapshot. SQLite has
/// no LATERAL join; the correlated subquery on rowid picks the latest row
/// deterministically even when two snapshots share a timestamp.
const SELECT_WITH_LATEST: &str = r"
    SELECT p.id AS patient_id, p.user_id, p.first_name, p.last_name,
           p.birth_date, p.gender, p.created_at,
           a.weight, a.height, a.ideal_weight, a.bmi,
           a.glucose, a.insulin, a.hdl, a.triglycerides,
           a.homa_ir, a.tg_hdl_ratio, a.ai_analysis
    FROM patients p
    LEFT JOIN assessments a ON a.rowid = (
        SELECT rowid FROM assessments
        WHERE patient_id = p.id
        ORDER BY created_at DESC, rowid DESC
        LIMIT 1
    )
";

impl Database {
    /// Create patients and assessments tables
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub(super) async fn migrate_patients(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS patients (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id),
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                birth_date DATE NOT NULL,
                gender TEXT NOT NULL CHECK (gender IN ('M', 'F')),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS assessments (
                id TEXT PRIMARY KEY,
                patient_id TEXT NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
                weight REAL NOT NULL,
                height REAL NOT NULL,
                ideal_weight REAL,
                bmi REAL NOT NULL,
                glucose REAL NOT NULL,
                insulin REAL NOT NULL,
                hdl REAL NOT NULL,
                triglycerides REAL NOT NULL,
                homa_ir REAL NOT NULL,
                tg_hdl_ratio REAL NOT NULL,
                ai_analysis TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_patients_user_id ON patients(user_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_assessments_patient_id ON assessments(patient_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All patients of one doctor with their latest assessment, ordered by
    /// last name then first name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_patients(&self, user_id: Uuid) -> Result<Vec<PatientRecord>> {
        let query =
            format!("{SELECT_WITH_LATEST} WHERE p.user_id = $1 ORDER BY p.last_name ASC, p.first_name ASC");

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_record).collect()
    }

    /// One patient of one doctor with its latest assessment
    ///
    /// Cross-owner lookups resolve to `None`, indistinguishable from a
    /// missing patient.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_patient(
        &self,
        user_id: Uuid,
        patient_id: Uuid,
    ) -> Result<Option<PatientRecord>> {
        let query = format!("{SELECT_WITH_LATEST} WHERE p.id = $1 AND p.user_id = $2");

        let row = sqlx::query(&query)
            .bind(patient_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| Self::row_to_record(&row)).transpose()
    }

    /// Upsert patient demographics and append a new assessment snapshot
    ///
    /// Demographics of an existing patient are overwritten; the measurement
    /// set is always stored as a fresh snapshot so history is retained. The
    /// record's derived metric fields are persisted as given; callers must
    /// have recomputed them from the raw values first.
    ///
    /// Returns `None` when the id belongs to another doctor's patient
    /// (not-found semantics at the API surface).
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub async fn save_patient(&self, user_id: Uuid, record: &PatientRecord) -> Result<Option<Uuid>> {
        let mut tx = self.pool.begin().await?;

        // Ownership check before the upsert so a snapshot can never be
        // attached to another doctor's patient
        let existing_owner: Option<String> =
            sqlx::query_scalar("SELECT user_id FROM patients WHERE id = $1")
                .bind(record.id.to_string())
                .fetch_optional(&mut *tx)
                .await?;
        if let Some(owner) = existing_owner {
            if owner != user_id.to_string() {
                return Ok(None);
            }
        }

        sqlx::query(
            r"
            INSERT INTO patients (id, user_id, first_name, last_name, birth_date, gender, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                birth_date = excluded.birth_date,
                gender = excluded.gender
            ",
        )
        .bind(record.id.to_string())
        .bind(user_id.to_string())
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(record.birth_date)
        .bind(record.gender.as_str())
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO assessments (
                id, patient_id, weight, height, ideal_weight, bmi,
                glucose, insulin, hdl, triglycerides,
                homa_ir, tg_hdl_ratio, ai_analysis, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(record.id.to_string())
        .bind(record.weight)
        .bind(record.height)
        .bind(record.ideal_weight)
        .bind(record.bmi)
        .bind(record.glucose)
        .bind(record.insulin)
        .bind(record.hdl)
        .bind(record.triglycerides)
        .bind(record.homa_ir)
        .bind(record.tg_hdl_ratio)
        .bind(&record.ai_analysis)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(record.id))
    }

    /// Delete a patient and (via cascade) its assessments, owner-scoped
    ///
    /// Returns whether a row was actually removed; deleting another
    /// doctor's patient is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_patient(&self, user_id: Uuid, patient_id: Uuid) -> Result<bool> {
        // sqlite foreign_keys pragma is off by default in sqlx pools, so
        // remove snapshots explicitly instead of relying on the cascade
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            DELETE FROM assessments WHERE patient_id IN (
                SELECT id FROM patients WHERE id = $1 AND user_id = $2
            )
            ",
        )
        .bind(patient_id.to_string())
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM patients WHERE id = $1 AND user_id = $2")
            .bind(patient_id.to_string())
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Convert a joined row to a flattened patient record
    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<PatientRecord> {
        let id: String = row.get("patient_id");
        let user_id: String = row.get("user_id");
        let gender: String = row.get("gender");

        Ok(PatientRecord {
            id: Uuid::parse_str(&id)?,
            user_id: Some(Uuid::parse_str(&user_id)?),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            birth_date: row.get("birth_date"),
            gender: gender.parse::<Gender>()?,
            created_at: row.get("created_at"),
            weight: row.get::<Option<f64>, _>("weight").unwrap_or(0.0),
            height: row.get::<Option<f64>, _>("height").unwrap_or(0.0),
            ideal_weight: row.get("ideal_weight"),
            bmi: row.get::<Option<f64>, _>("bmi").unwrap_or(0.0),
            glucose: row.get::<Option<f64>, _>("glucose").unwrap_or(0.0),
            insulin: row.get::<Option<f64>, _>("insulin").unwrap_or(0.0),
            hdl: row.get::<Option<f64>, _>("hdl").unwrap_or(0.0),
            triglycerides: row.get::<Option<f64>, _>("triglycerides").unwrap_or(0.0),
            homa_ir: row.get::<Option<f64>, _>("homa_ir").unwrap_or(0.0),
            tg_hdl_ratio: row.get::<Option<f64>, _>("tg_hdl_ratio").unwrap_or(0.0),
            ai_analysis: row.get("ai_analysis"),
        })
    }
}
