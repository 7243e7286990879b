//! Fully resolved medication records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::form::DrugForm;

/// Validated colors for the four icon slots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IconColors {
    pub background: String,
    pub ascent1: String,
    pub ascent2: String,
    pub cap: String,
}

impl IconColors {
    /// Color for a named slot.
    pub fn get(&self, slot: &str) -> Option<&str> {
        match slot {
            "background" => Some(&self.background),
            "ascent1" => Some(&self.ascent1),
            "ascent2" => Some(&self.ascent2),
            "cap" => Some(&self.cap),
            _ => None,
        }
    }

    /// (slot, color) pairs in slot order.
    pub fn slots(&self) -> [(&'static str, &str); 4] {
        [
            ("background", &self.background),
            ("ascent1", &self.ascent1),
            ("ascent2", &self.ascent2),
            ("cap", &self.cap),
        ]
    }
}

/// Clinical half of a record, produced by the schedule resolver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedSchedule {
    pub medicine_name: Option<String>,
    pub form: DrugForm,
    pub dosage: String,
    pub frequency: u32,
    /// HH:MM times, one per daily dose
    pub times: Vec<String>,
    pub course_duration_days: u32,
    pub administration_instruction: String,
    /// Always the processing date
    pub start_date: NaiveDate,
    pub quantity: f64,
}

/// Visual half of a record, produced by the icon pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedIcon {
    pub icon_colors: IconColors,
    /// Mirrors `icon_colors.ascent1`
    pub medication_color: String,
    /// Mirrors `icon_colors.background`
    pub background_color: String,
    /// `data:image/svg+xml;base64,...`
    pub icon_svg: String,
}

/// A complete medication entry handed back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationRecord {
    /// Unique record ID
    pub id: String,
    /// Opaque owner tag
    pub owner_id: Option<String>,
    /// Opaque device tag
    pub device_id: Option<String>,
    pub medicine_name: Option<String>,
    /// User-assignable downstream; never filled at creation
    pub display_name: Option<String>,
    pub form: DrugForm,
    pub dosage: String,
    pub frequency: u32,
    pub times: Vec<String>,
    pub course_duration_days: u32,
    pub administration_instruction: String,
    pub start_date: NaiveDate,
    pub quantity: f64,
    pub icon_colors: IconColors,
    pub medication_color: String,
    pub background_color: String,
    pub icon_svg: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl MedicationRecord {
    /// Combine a resolved schedule and icon into a new record.
    pub fn assemble(schedule: ResolvedSchedule, icon: ResolvedIcon) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: None,
            device_id: None,
            medicine_name: schedule.medicine_name,
            display_name: None,
            form: schedule.form,
            dosage: schedule.dosage,
            frequency: schedule.frequency,
            times: schedule.times,
            course_duration_days: schedule.course_duration_days,
            administration_instruction: schedule.administration_instruction,
            start_date: schedule.start_date,
            quantity: schedule.quantity,
            icon_colors: icon.icon_colors,
            medication_color: icon.medication_color,
            background_color: icon.background_color,
            icon_svg: icon.icon_svg,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Attach owner/device tags.
    pub fn with_tags(mut self, owner_id: Option<String>, device_id: Option<String>) -> Self {
        self.owner_id = owner_id;
        self.device_id = device_id;
        self
    }
}
