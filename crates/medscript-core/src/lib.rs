//! Medscript Core Library
//!
//! Deterministic prescription-to-schedule pipeline: unstructured prescription
//! text in, complete medication records with dose times and a recolored icon out.
//!
//! # Architecture
//!
//! ```text
//! text / OCR transcript / speech transcript
//!                 │
//!          Input Normalizer
//!                 │
//!      ┌──────────┴──────────┐
//!      ▼                     ▼
//!  AI extractor        Heuristic engine
//!  (optional)       (lines the AI missed)
//!      └──────────┬──────────┘
//!                 ▼
//!      Schedule & Defaults Resolver
//!                 │
//!      Icon & Color Resolution
//!                 │
//!          MedicationRecord ──► SQLite store
//! ```
//!
//! # Core Principle
//!
//! **Every emitted record is complete.** Missing fields get documented
//! defaults; explicit values that make no sense are rejected, never coerced.
//!
//! # Modules
//!
//! - [`intake`]: merge input modalities into canonical text
//! - [`extraction`]: abbreviation-aware heuristic extraction
//! - [`schedule`]: defaulting and dose-time generation
//! - [`icon`]: template lookup, color validation, SVG slot substitution
//! - [`pipeline`]: orchestration and extractor merge
//! - [`db`]: SQLite persistence of finished records
//! - [`models`]: domain types

pub mod db;
pub mod extraction;
pub mod icon;
pub mod intake;
pub mod models;
pub mod pipeline;
pub mod schedule;

// Re-export commonly used types
pub use db::Database;
pub use extraction::HeuristicExtractor;
pub use icon::{ColorManifest, IconResolver, TemplateStore};
pub use models::{
    DrugForm, IconColorInput, IconColors, MedicationCandidate, MedicationRecord, NormalizedInput,
};
pub use pipeline::{CandidateExtractor, Pipeline, ProcessRequest, ProcessedPrescription};
pub use schedule::{ScheduleDefaults, ScheduleResolver};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MedscriptError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<db::DbError> for MedscriptError {
    fn from(e: db::DbError) -> Self {
        MedscriptError::DatabaseError(e.to_string())
    }
}

impl From<pipeline::PipelineError> for MedscriptError {
    fn from(e: pipeline::PipelineError) -> Self {
        match e {
            pipeline::PipelineError::Icon(_) => MedscriptError::ConfigurationError(e.to_string()),
            _ => MedscriptError::InvalidInput(e.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for MedscriptError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MedscriptError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<MedscriptCore>, MedscriptError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(MedscriptCore::new(db)))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<MedscriptCore>, MedscriptError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(MedscriptCore::new(db)))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe pipeline + store wrapper for FFI.
#[derive(uniffi::Object)]
pub struct MedscriptCore {
    db: Arc<Mutex<Database>>,
    pipeline: Pipeline,
}

impl MedscriptCore {
    fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            pipeline: Pipeline::new(),
        }
    }
}

#[uniffi::export]
impl MedscriptCore {
    // =========================================================================
    // Processing
    // =========================================================================

    /// Turn raw prescription input into stored medication records.
    pub fn process_prescription(
        &self,
        request: FfiProcessRequest,
    ) -> Result<FfiProcessedPrescription, MedscriptError> {
        let processed = self.pipeline.process_prescription(&request.into())?;

        let mut db = self.db.lock()?;
        db.insert_medications(&processed.medications)?;

        Ok(processed.into())
    }

    /// Store a manually entered medication after defaulting.
    pub fn create_medication(
        &self,
        input: FfiMedicationInput,
    ) -> Result<FfiMedicationRecord, MedscriptError> {
        let owner_id = input.owner_id.clone();
        let device_id = input.device_id.clone();
        let record = self
            .pipeline
            .resolve(&input.into())?
            .with_tags(owner_id, device_id);

        let db = self.db.lock()?;
        db.insert_medication(&record)?;
        Ok(record.into())
    }

    /// Resolve an icon without storing anything.
    pub fn resolve_icon(
        &self,
        form: String,
        colors: Option<FfiIconColorInput>,
    ) -> Result<FfiResolvedIcon, MedscriptError> {
        let colors = colors.map(IconColorInput::from);
        let icon = self
            .pipeline
            .resolve_icon(DrugForm::from_label(&form), colors.as_ref())?;
        Ok(icon.into())
    }

    // =========================================================================
    // Medication Store
    // =========================================================================

    /// All stored medications, newest first.
    pub fn list_medications(&self) -> Result<Vec<FfiMedicationRecord>, MedscriptError> {
        let db = self.db.lock()?;
        let records = db.list_medications()?;
        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    /// Get a medication by ID.
    pub fn get_medication(&self, id: String) -> Result<Option<FfiMedicationRecord>, MedscriptError> {
        let db = self.db.lock()?;
        let record = db.get_medication(&id)?;
        Ok(record.map(|r| r.into()))
    }

    /// Delete a medication. Returns whether it existed.
    pub fn delete_medication(&self, id: String) -> Result<bool, MedscriptError> {
        let db = self.db.lock()?;
        Ok(db.delete_medication(&id)?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe processing request.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiProcessRequest {
    pub text: Option<String>,
    pub ocr_text: Option<String>,
    pub speech_text: Option<String>,
    pub owner_id: Option<String>,
    pub device_id: Option<String>,
}

impl From<FfiProcessRequest> for ProcessRequest {
    fn from(req: FfiProcessRequest) -> Self {
        ProcessRequest {
            text: req.text,
            ocr_text: req.ocr_text,
            speech_text: req.speech_text,
            owner_id: req.owner_id,
            device_id: req.device_id,
        }
    }
}

/// FFI-safe manual medication entry. Omitted fields are defaulted.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiMedicationInput {
    pub medicine_name: Option<String>,
    pub form: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<i64>,
    pub times: Option<Vec<String>>,
    pub course_duration_days: Option<i64>,
    pub administration_instruction: Option<String>,
    pub quantity: Option<f64>,
    pub icon_colors: Option<FfiIconColorInput>,
    pub owner_id: Option<String>,
    pub device_id: Option<String>,
}

impl From<FfiMedicationInput> for MedicationCandidate {
    fn from(input: FfiMedicationInput) -> Self {
        MedicationCandidate {
            medicine_name: input.medicine_name,
            form: input.form.as_deref().map(DrugForm::from_label),
            dosage: input.dosage,
            frequency: input.frequency,
            times: input.times,
            course_duration_days: input.course_duration_days,
            administration_instruction: input.administration_instruction,
            quantity: input.quantity,
            icon_colors: input.icon_colors.map(Into::into),
            ..Default::default()
        }
    }
}

/// FFI-safe icon colors, every slot optional.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiIconColorInput {
    pub background: Option<String>,
    pub ascent1: Option<String>,
    pub ascent2: Option<String>,
    pub cap: Option<String>,
}

impl From<FfiIconColorInput> for IconColorInput {
    fn from(colors: FfiIconColorInput) -> Self {
        IconColorInput {
            background: colors.background,
            ascent1: colors.ascent1,
            ascent2: colors.ascent2,
            cap: colors.cap,
        }
    }
}

/// FFI-safe resolved icon colors.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiIconColors {
    pub background: String,
    pub ascent1: String,
    pub ascent2: String,
    pub cap: String,
}

impl From<IconColors> for FfiIconColors {
    fn from(colors: IconColors) -> Self {
        Self {
            background: colors.background,
            ascent1: colors.ascent1,
            ascent2: colors.ascent2,
            cap: colors.cap,
        }
    }
}

/// FFI-safe resolved icon.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiResolvedIcon {
    pub icon_colors: FfiIconColors,
    pub medication_color: String,
    pub background_color: String,
    pub icon_svg: String,
}

impl From<models::ResolvedIcon> for FfiResolvedIcon {
    fn from(icon: models::ResolvedIcon) -> Self {
        Self {
            icon_colors: icon.icon_colors.into(),
            medication_color: icon.medication_color,
            background_color: icon.background_color,
            icon_svg: icon.icon_svg,
        }
    }
}

/// FFI-safe medication record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicationRecord {
    pub id: String,
    pub owner_id: Option<String>,
    pub device_id: Option<String>,
    pub medicine_name: Option<String>,
    pub display_name: Option<String>,
    pub form: String,
    pub dosage: String,
    pub frequency: u32,
    pub times: Vec<String>,
    pub course_duration_days: u32,
    pub administration_instruction: String,
    /// YYYY-MM-DD
    pub start_date: String,
    pub quantity: f64,
    pub icon_colors: FfiIconColors,
    pub medication_color: String,
    pub background_color: String,
    pub icon_svg: String,
    pub created_at: String,
}

impl From<MedicationRecord> for FfiMedicationRecord {
    fn from(record: MedicationRecord) -> Self {
        Self {
            id: record.id,
            owner_id: record.owner_id,
            device_id: record.device_id,
            medicine_name: record.medicine_name,
            display_name: record.display_name,
            form: record.form.to_string(),
            dosage: record.dosage,
            frequency: record.frequency,
            times: record.times,
            course_duration_days: record.course_duration_days,
            administration_instruction: record.administration_instruction,
            start_date: record.start_date.format("%Y-%m-%d").to_string(),
            quantity: record.quantity,
            icon_colors: record.icon_colors.into(),
            medication_color: record.medication_color,
            background_color: record.background_color,
            icon_svg: record.icon_svg,
            created_at: record.created_at,
        }
    }
}

/// FFI-safe rejected line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRejectedLine {
    pub line: Option<String>,
    pub medicine_name: Option<String>,
    pub reason: String,
}

impl From<pipeline::RejectedLine> for FfiRejectedLine {
    fn from(rejected: pipeline::RejectedLine) -> Self {
        Self {
            line: rejected.line,
            medicine_name: rejected.medicine_name,
            reason: rejected.reason,
        }
    }
}

/// FFI-safe processing result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProcessedPrescription {
    pub medications: Vec<FfiMedicationRecord>,
    pub raw_text: String,
    pub notes: Vec<String>,
    pub rejected: Vec<FfiRejectedLine>,
}

impl From<ProcessedPrescription> for FfiProcessedPrescription {
    fn from(processed: ProcessedPrescription) -> Self {
        Self {
            medications: processed.medications.into_iter().map(|m| m.into()).collect(),
            raw_text: processed.raw_text,
            notes: processed.notes,
            rejected: processed.rejected.into_iter().map(|r| r.into()).collect(),
        }
    }
}
