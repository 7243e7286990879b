//! Partial extraction results, before defaulting.

use serde::{Deserialize, Serialize};

use super::form::DrugForm;

/// Colors supplied for an icon, any slot may be missing or malformed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IconColorInput {
    pub background: Option<String>,
    pub ascent1: Option<String>,
    pub ascent2: Option<String>,
    pub cap: Option<String>,
}

impl IconColorInput {
    /// True when no slot carries a value.
    pub fn is_empty(&self) -> bool {
        self.background.is_none()
            && self.ascent1.is_none()
            && self.ascent2.is_none()
            && self.cap.is_none()
    }
}

/// A medication as extracted by the heuristic engine or an AI service.
///
/// No field is guaranteed; the schedule resolver fills the gaps.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MedicationCandidate {
    /// Medicine name as written
    pub medicine_name: Option<String>,
    /// User-facing label; always discarded on resolution
    pub display_name: Option<String>,
    /// Dose form
    pub form: Option<DrugForm>,
    /// Free-form dosage text (e.g., "1 tablet (650)")
    pub dosage: Option<String>,
    /// Daily dose count; signed so invalid upstream values survive to validation
    pub frequency: Option<i64>,
    /// Explicit HH:MM dose times
    pub times: Option<Vec<String>>,
    /// Course length in days
    pub course_duration_days: Option<i64>,
    /// Administration instruction (e.g., "As needed")
    pub administration_instruction: Option<String>,
    /// Quantity per dose
    pub quantity: Option<f64>,
    /// Start date; always replaced by the processing date
    pub start_date: Option<String>,
    /// Raw color words matched on the line (e.g., ["white"])
    pub color_names: Vec<String>,
    /// Icon colors, usually supplied by an AI service
    pub icon_colors: Option<IconColorInput>,
    /// Source line this candidate was read from
    pub raw_line: Option<String>,
}

impl MedicationCandidate {
    /// Create a candidate for a named medicine.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            medicine_name: Some(name.into()),
            ..Default::default()
        }
    }
}
