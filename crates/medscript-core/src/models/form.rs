//! Dose form of a medication.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical dose form, used for dosage wording and icon selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DrugForm {
    Tablet,
    Capsule,
    /// Syrups and other oral liquids
    #[serde(alias = "liquid")]
    Syrup,
    Injection,
    Drop,
    Inhaler,
    Other,
}

/// Known labels for each form (lowercase, trailing dots stripped before lookup).
const FORM_LABELS: &[(&str, DrugForm)] = &[
    ("tab", DrugForm::Tablet),
    ("tabs", DrugForm::Tablet),
    ("tablet", DrugForm::Tablet),
    ("tablets", DrugForm::Tablet),
    ("cap", DrugForm::Capsule),
    ("caps", DrugForm::Capsule),
    ("capsule", DrugForm::Capsule),
    ("capsules", DrugForm::Capsule),
    ("syr", DrugForm::Syrup),
    ("syp", DrugForm::Syrup),
    ("syrup", DrugForm::Syrup),
    ("liquid", DrugForm::Syrup),
    ("solution", DrugForm::Syrup),
    ("suspension", DrugForm::Syrup),
    ("inj", DrugForm::Injection),
    ("injection", DrugForm::Injection),
    ("injections", DrugForm::Injection),
    ("drop", DrugForm::Drop),
    ("drops", DrugForm::Drop),
    ("gtt", DrugForm::Drop),
    ("inh", DrugForm::Inhaler),
    ("inhaler", DrugForm::Inhaler),
    ("inhalers", DrugForm::Inhaler),
    ("puff", DrugForm::Inhaler),
    ("puffs", DrugForm::Inhaler),
];

impl DrugForm {
    /// All forms, in declaration order.
    pub const ALL: [DrugForm; 7] = [
        DrugForm::Tablet,
        DrugForm::Capsule,
        DrugForm::Syrup,
        DrugForm::Injection,
        DrugForm::Drop,
        DrugForm::Inhaler,
        DrugForm::Other,
    ];

    /// Look up a form label such as "Tab.", "capsules" or "syp".
    pub fn parse_label(label: &str) -> Option<DrugForm> {
        let key = label.trim().trim_end_matches('.').to_lowercase();
        FORM_LABELS
            .iter()
            .find(|(l, _)| *l == key)
            .map(|(_, form)| *form)
    }

    /// Like [`DrugForm::parse_label`], but unknown labels become `Other`.
    pub fn from_label(label: &str) -> DrugForm {
        Self::parse_label(label).unwrap_or(DrugForm::Other)
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DrugForm::Tablet => "tablet",
            DrugForm::Capsule => "capsule",
            DrugForm::Syrup => "syrup",
            DrugForm::Injection => "injection",
            DrugForm::Drop => "drop",
            DrugForm::Inhaler => "inhaler",
            DrugForm::Other => "other",
        }
    }

    /// Noun for a single administered dose ("1 tablet", "2 puffs").
    pub fn dose_unit(&self) -> &'static str {
        match self {
            DrugForm::Tablet => "tablet",
            DrugForm::Capsule => "capsule",
            DrugForm::Syrup => "measure",
            DrugForm::Injection => "injection",
            DrugForm::Drop => "drop",
            DrugForm::Inhaler => "puff",
            DrugForm::Other => "dose",
        }
    }

    /// Dose wording with count, e.g. `"1 tablet"` or `"2 drops"`.
    pub fn dose_phrase(&self, count: u32) -> String {
        let unit = self.dose_unit();
        if count == 1 {
            format!("1 {}", unit)
        } else {
            format!("{} {}s", count, unit)
        }
    }
}

impl fmt::Display for DrugForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label() {
        assert_eq!(DrugForm::parse_label("Tab"), Some(DrugForm::Tablet));
        assert_eq!(DrugForm::parse_label("TAB."), Some(DrugForm::Tablet));
        assert_eq!(DrugForm::parse_label("caps"), Some(DrugForm::Capsule));
        assert_eq!(DrugForm::parse_label("Syp"), Some(DrugForm::Syrup));
        assert_eq!(DrugForm::parse_label("liquid"), Some(DrugForm::Syrup));
        assert_eq!(DrugForm::parse_label("inj"), Some(DrugForm::Injection));
        assert_eq!(DrugForm::parse_label("gtt"), Some(DrugForm::Drop));
        assert_eq!(DrugForm::parse_label("inh"), Some(DrugForm::Inhaler));
        assert_eq!(DrugForm::parse_label("ointment"), None);
    }

    #[test]
    fn test_from_label_unknown_is_other() {
        assert_eq!(DrugForm::from_label("ointment"), DrugForm::Other);
        assert_eq!(DrugForm::from_label(""), DrugForm::Other);
    }

    #[test]
    fn test_dose_phrase() {
        assert_eq!(DrugForm::Tablet.dose_phrase(1), "1 tablet");
        assert_eq!(DrugForm::Drop.dose_phrase(2), "2 drops");
        assert_eq!(DrugForm::Inhaler.dose_phrase(2), "2 puffs");
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&DrugForm::Syrup).unwrap(), "\"syrup\"");
        let parsed: DrugForm = serde_json::from_str("\"liquid\"").unwrap();
        assert_eq!(parsed, DrugForm::Syrup);
    }
}
