//! Prescription processing pipeline.
//!
//! Normalize → (optional extractor) → heuristic extraction for unclaimed
//! lines → schedule defaults → icon.

mod extractor;
mod merge;

pub use extractor::*;
pub use merge::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extraction::HeuristicExtractor;
use crate::icon::palette::colors_from_names;
use crate::icon::{IconError, IconResolver};
use crate::intake::{self, InputError};
use crate::models::{
    DrugForm, IconColorInput, MedicationCandidate, MedicationRecord, NormalizedInput, ResolvedIcon,
};
use crate::schedule::{ScheduleError, ScheduleResolver};

/// Note attached when nothing was recognized.
pub const NO_MEDICATIONS_NOTE: &str =
    "No medications recognized. Please include the medicine name, dose, frequency and duration.";

/// Pipeline errors.
#[derive(Error, Debug, PartialEq)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Icon(#[from] IconError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Raw inputs for one processing request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProcessRequest {
    pub text: Option<String>,
    pub ocr_text: Option<String>,
    pub speech_text: Option<String>,
    /// Passed through to every record
    pub owner_id: Option<String>,
    /// Passed through to every record
    pub device_id: Option<String>,
}

impl ProcessRequest {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

/// A candidate that could not become a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RejectedLine {
    /// Source line, when known
    pub line: Option<String>,
    pub medicine_name: Option<String>,
    pub reason: String,
}

/// Result of processing one request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessedPrescription {
    pub medications: Vec<MedicationRecord>,
    /// Canonical text the records were extracted from
    pub raw_text: String,
    pub notes: Vec<String>,
    pub rejected: Vec<RejectedLine>,
}

/// The assembled pipeline. Read-only once built; share it across threads.
pub struct Pipeline {
    heuristic: HeuristicExtractor,
    schedule: ScheduleResolver,
    icons: IconResolver,
    extractor: Option<Box<dyn CandidateExtractor>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Heuristic-only pipeline with built-in lexicon, defaults and icons.
    pub fn new() -> Self {
        Self {
            heuristic: HeuristicExtractor::new(),
            schedule: ScheduleResolver::new(),
            icons: IconResolver::new(),
            extractor: None,
        }
    }

    /// Pipeline from custom parts.
    ///
    /// Fails with [`IconError::UnknownForm`] when the template store has no
    /// generic fallback.
    pub fn with_parts(
        heuristic: HeuristicExtractor,
        schedule: ScheduleResolver,
        icons: IconResolver,
    ) -> PipelineResult<Self> {
        if icons.templates().generic().is_none() {
            return Err(IconError::UnknownForm("generic".into()).into());
        }
        Ok(Self {
            heuristic,
            schedule,
            icons,
            extractor: None,
        })
    }

    /// Attach a best-effort extractor.
    pub fn with_extractor(mut self, extractor: Box<dyn CandidateExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn has_extractor(&self) -> bool {
        self.extractor.is_some()
    }

    pub fn heuristic(&self) -> &HeuristicExtractor {
        &self.heuristic
    }

    pub fn schedule(&self) -> &ScheduleResolver {
        &self.schedule
    }

    pub fn icons(&self) -> &IconResolver {
        &self.icons
    }

    /// Merge input modalities into canonical text.
    pub fn normalize(
        &self,
        text: Option<&str>,
        ocr_text: Option<&str>,
        speech_text: Option<&str>,
    ) -> PipelineResult<NormalizedInput> {
        Ok(intake::normalize(text, ocr_text, speech_text)?)
    }

    /// Heuristic candidates for canonical text. Never fails.
    pub fn extract_heuristic(&self, text: &str) -> Vec<MedicationCandidate> {
        self.heuristic.extract(text)
    }

    /// Complete a candidate into a record dated today (UTC).
    pub fn resolve(&self, candidate: &MedicationCandidate) -> PipelineResult<MedicationRecord> {
        self.resolve_on(candidate, chrono::Utc::now().date_naive())
    }

    /// Complete a candidate into a record with an explicit processing date.
    pub fn resolve_on(
        &self,
        candidate: &MedicationCandidate,
        processing_date: NaiveDate,
    ) -> PipelineResult<MedicationRecord> {
        let schedule = self.schedule.resolve_on(candidate, processing_date)?;
        let icon = self
            .icons
            .resolve_icon(schedule.form, icon_input(candidate).as_ref())?;
        Ok(MedicationRecord::assemble(schedule, icon))
    }

    /// Icon for a form and optional colors.
    pub fn resolve_icon(
        &self,
        form: DrugForm,
        colors: Option<&IconColorInput>,
    ) -> PipelineResult<ResolvedIcon> {
        Ok(self.icons.resolve_icon(form, colors)?)
    }

    /// Run the full pipeline, dated today (UTC).
    pub fn process_prescription(
        &self,
        request: &ProcessRequest,
    ) -> PipelineResult<ProcessedPrescription> {
        self.process_prescription_on(request, chrono::Utc::now().date_naive())
    }

    /// Run the full pipeline with an explicit processing date.
    ///
    /// A candidate the schedule resolver rejects is reported in `rejected`
    /// and does not affect the others. Template errors abort the request.
    pub fn process_prescription_on(
        &self,
        request: &ProcessRequest,
        processing_date: NaiveDate,
    ) -> PipelineResult<ProcessedPrescription> {
        let mut notes = Vec::new();

        // Step 1: Normalize
        let input = self.normalize(
            request.text.as_deref(),
            request.ocr_text.as_deref(),
            request.speech_text.as_deref(),
        )?;

        // Step 2: Best-effort extractor
        let extracted = self.run_extractor(&input, &mut notes);

        // Step 3: Heuristics for whatever the extractor did not claim
        let merged = merge_candidates(&input, extracted, &self.heuristic);

        // Step 4: Defaults and icon per candidate
        let mut medications = Vec::with_capacity(merged.candidates.len());
        let mut rejected = Vec::new();
        for candidate in &merged.candidates {
            match self.resolve_on(candidate, processing_date) {
                Ok(record) => medications.push(
                    record.with_tags(request.owner_id.clone(), request.device_id.clone()),
                ),
                Err(PipelineError::Schedule(e)) => {
                    tracing::warn!(
                        line = ?candidate.raw_line,
                        error = %e,
                        "candidate rejected"
                    );
                    rejected.push(RejectedLine {
                        line: candidate.raw_line.clone(),
                        medicine_name: candidate.medicine_name.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        if medications.is_empty() {
            notes.push(NO_MEDICATIONS_NOTE.to_string());
        }

        tracing::info!(
            lines = input.lines.len(),
            medications = medications.len(),
            rejected = rejected.len(),
            from_extractor = merged.from_extractor,
            from_heuristic = merged.from_heuristic,
            "prescription processed"
        );

        Ok(ProcessedPrescription {
            medications,
            raw_text: input.text,
            notes,
            rejected,
        })
    }

    fn run_extractor(
        &self,
        input: &NormalizedInput,
        notes: &mut Vec<String>,
    ) -> Vec<MedicationCandidate> {
        let Some(extractor) = &self.extractor else {
            return Vec::new();
        };

        match extractor.extract(input) {
            Ok(candidates) if !candidates.is_empty() => candidates,
            Ok(_) => {
                notes.push(format!(
                    "{} returned no medications; used heuristic extraction",
                    extractor.name()
                ));
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(extractor = extractor.name(), error = %e, "extractor failed");
                notes.push(format!(
                    "{} unavailable ({}); used heuristic extraction",
                    extractor.name(),
                    e
                ));
                Vec::new()
            }
        }
    }
}

/// Icon colors for a candidate: supplied slots win, otherwise colors derived
/// from recognized color words.
fn icon_input(candidate: &MedicationCandidate) -> Option<IconColorInput> {
    match &candidate.icon_colors {
        Some(colors) if !colors.is_empty() => Some(colors.clone()),
        _ => {
            let derived = colors_from_names(&candidate.color_names);
            (!derived.is_empty()).then_some(derived)
        }
    }
}
