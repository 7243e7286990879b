//! Schedule and defaults resolver.
//!
//! Turns a partial [`MedicationCandidate`] into a total [`ResolvedSchedule`].
//! Each field is defaulted independently and only when absent; explicit
//! values that break an invariant are rejected, never coerced.

mod times;

pub use times::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DrugForm, MedicationCandidate, ResolvedSchedule};

/// Upper bound on daily doses accepted from any source.
pub const MAX_DAILY_DOSES: u32 = 24;

/// Schedule errors.
#[derive(Error, Debug, PartialEq)]
pub enum ScheduleError {
    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),

    #[error("Invalid schedule defaults: {0}")]
    InvalidDefaults(String),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Values used for omitted fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScheduleDefaults {
    pub frequency: u32,
    pub course_duration_days: u32,
    pub quantity: f64,
    pub administration_instruction: String,
    pub dosage: String,
    /// First dose of the evenly spaced window, minutes after midnight
    pub window_start_minute: u32,
    /// Last dose of the evenly spaced window, minutes after midnight
    pub window_end_minute: u32,
    pub rounding_minutes: u32,
}

impl Default for ScheduleDefaults {
    fn default() -> Self {
        let window = DoseWindow::default();
        Self {
            frequency: 1,
            course_duration_days: 5,
            quantity: 1.0,
            administration_instruction: "After meals".into(),
            dosage: "1 dose".into(),
            window_start_minute: window.start_minute,
            window_end_minute: window.end_minute,
            rounding_minutes: window.rounding_minutes,
        }
    }
}

impl ScheduleDefaults {
    /// Load defaults from JSON; missing keys keep their built-in value.
    pub fn from_json(json: &str) -> ScheduleResult<Self> {
        let defaults: Self = serde_json::from_str(json)
            .map_err(|e| ScheduleError::InvalidDefaults(e.to_string()))?;
        defaults.validate()?;
        Ok(defaults)
    }

    /// Check that defaulted records would satisfy the record invariants.
    pub fn validate(&self) -> ScheduleResult<()> {
        let invalid = |msg: String| Err(ScheduleError::InvalidDefaults(msg));

        if self.frequency == 0 || self.frequency > MAX_DAILY_DOSES {
            return invalid(format!(
                "frequency must be 1..={}, got {}",
                MAX_DAILY_DOSES, self.frequency
            ));
        }
        if self.course_duration_days == 0 {
            return invalid("course_duration_days must be positive".into());
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return invalid(format!("quantity must be positive, got {}", self.quantity));
        }
        if self.window_start_minute > self.window_end_minute
            || self.window_end_minute > LAST_MINUTE_OF_DAY
        {
            return invalid(format!(
                "dose window {}..{} must lie within 0..={}",
                self.window_start_minute, self.window_end_minute, LAST_MINUTE_OF_DAY
            ));
        }
        if self.rounding_minutes == 0 {
            return invalid("rounding_minutes must be at least 1".into());
        }
        Ok(())
    }

    fn window(&self) -> DoseWindow {
        DoseWindow {
            start_minute: self.window_start_minute,
            end_minute: self.window_end_minute,
            rounding_minutes: self.rounding_minutes,
        }
    }
}

/// Completes candidates into schedules.
#[derive(Debug, Clone, Default)]
pub struct ScheduleResolver {
    defaults: ScheduleDefaults,
}

impl ScheduleResolver {
    /// Create a resolver with built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver with custom defaults.
    ///
    /// Fails with [`ScheduleError::InvalidDefaults`] when the defaults could
    /// produce an invalid record.
    pub fn with_defaults(defaults: ScheduleDefaults) -> ScheduleResult<Self> {
        defaults.validate()?;
        Ok(Self { defaults })
    }

    /// Current defaults.
    pub fn defaults(&self) -> &ScheduleDefaults {
        &self.defaults
    }

    /// Resolve using today's date (UTC) as the start date.
    pub fn resolve(&self, candidate: &MedicationCandidate) -> ScheduleResult<ResolvedSchedule> {
        self.resolve_on(candidate, chrono::Utc::now().date_naive())
    }

    /// Resolve with an explicit processing date.
    pub fn resolve_on(
        &self,
        candidate: &MedicationCandidate,
        processing_date: NaiveDate,
    ) -> ScheduleResult<ResolvedSchedule> {
        let supplied_times = candidate
            .times
            .as_ref()
            .filter(|t| !t.is_empty() && t.iter().all(|s| is_valid_time(s)));

        let frequency = match candidate.frequency {
            Some(f) => positive_count("frequency", f)?,
            None => match supplied_times {
                Some(t) => u32::try_from(t.len()).unwrap_or(u32::MAX),
                None => self.defaults.frequency,
            },
        };
        if frequency > MAX_DAILY_DOSES {
            return Err(ScheduleError::InvalidCandidate(format!(
                "frequency {} exceeds {} doses per day",
                frequency, MAX_DAILY_DOSES
            )));
        }

        let times = match supplied_times {
            Some(t) if t.len() == frequency as usize => t.clone(),
            _ => {
                if candidate.times.as_ref().is_some_and(|t| !t.is_empty()) {
                    tracing::warn!(
                        frequency,
                        supplied = ?candidate.times,
                        "supplied dose times unusable, regenerating"
                    );
                }
                generate_times(frequency, &self.defaults.window())
            }
        };

        let course_duration_days = match candidate.course_duration_days {
            Some(d) => positive_count("course_duration_days", d)?,
            None => self.defaults.course_duration_days,
        };

        let quantity = match candidate.quantity {
            Some(q) if !q.is_finite() || q <= 0.0 => {
                return Err(ScheduleError::InvalidCandidate(format!(
                    "quantity must be positive, got {}",
                    q
                )));
            }
            Some(q) => q,
            None => self.defaults.quantity,
        };

        Ok(ResolvedSchedule {
            medicine_name: non_blank(&candidate.medicine_name),
            form: candidate.form.unwrap_or(DrugForm::Other),
            dosage: non_blank(&candidate.dosage).unwrap_or_else(|| self.defaults.dosage.clone()),
            frequency,
            times,
            course_duration_days,
            administration_instruction: non_blank(&candidate.administration_instruction)
                .unwrap_or_else(|| self.defaults.administration_instruction.clone()),
            start_date: processing_date,
            quantity,
        })
    }
}

fn positive_count(field: &str, value: i64) -> ScheduleResult<u32> {
    if value <= 0 {
        return Err(ScheduleError::InvalidCandidate(format!(
            "{} must be positive, got {}",
            field, value
        )));
    }
    u32::try_from(value).map_err(|_| {
        ScheduleError::InvalidCandidate(format!("{} out of range: {}", field, value))
    })
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_all_defaults() {
        let resolver = ScheduleResolver::new();
        let schedule = resolver
            .resolve_on(&MedicationCandidate::default(), day())
            .unwrap();

        assert_eq!(schedule.medicine_name, None);
        assert_eq!(schedule.form, DrugForm::Other);
        assert_eq!(schedule.dosage, "1 dose");
        assert_eq!(schedule.frequency, 1);
        assert_eq!(schedule.times, vec!["08:00"]);
        assert_eq!(schedule.course_duration_days, 5);
        assert_eq!(schedule.administration_instruction, "After meals");
        assert_eq!(schedule.quantity, 1.0);
        assert_eq!(schedule.start_date, day());
    }

    #[test]
    fn test_times_follow_frequency() {
        let resolver = ScheduleResolver::new();
        let candidate = MedicationCandidate {
            frequency: Some(3),
            ..MedicationCandidate::named("Cetirizine")
        };

        let schedule = resolver.resolve_on(&candidate, day()).unwrap();
        assert_eq!(schedule.times, vec!["08:00", "14:00", "20:00"]);
    }

    #[test]
    fn test_supplied_times_trusted() {
        let resolver = ScheduleResolver::new();
        let candidate = MedicationCandidate {
            frequency: Some(2),
            times: Some(vec!["07:30".into(), "19:30".into()]),
            ..Default::default()
        };

        let schedule = resolver.resolve_on(&candidate, day()).unwrap();
        assert_eq!(schedule.times, vec!["07:30", "19:30"]);
    }

    #[test]
    fn test_frequency_inferred_from_times() {
        let resolver = ScheduleResolver::new();
        let candidate = MedicationCandidate {
            times: Some(vec!["09:00".into(), "13:00".into(), "21:00".into()]),
            ..Default::default()
        };

        let schedule = resolver.resolve_on(&candidate, day()).unwrap();
        assert_eq!(schedule.frequency, 3);
        assert_eq!(schedule.times, vec!["09:00", "13:00", "21:00"]);
    }

    #[test]
    fn test_mismatched_or_malformed_times_regenerated() {
        let resolver = ScheduleResolver::new();

        let mismatched = MedicationCandidate {
            frequency: Some(2),
            times: Some(vec!["09:00".into()]),
            ..Default::default()
        };
        let schedule = resolver.resolve_on(&mismatched, day()).unwrap();
        assert_eq!(schedule.times, vec!["08:00", "20:00"]);

        let malformed = MedicationCandidate {
            frequency: Some(1),
            times: Some(vec!["9am".into()]),
            ..Default::default()
        };
        let schedule = resolver.resolve_on(&malformed, day()).unwrap();
        assert_eq!(schedule.times, vec!["08:00"]);
    }

    #[test]
    fn test_non_positive_values_rejected() {
        let resolver = ScheduleResolver::new();

        for candidate in [
            MedicationCandidate {
                frequency: Some(0),
                ..Default::default()
            },
            MedicationCandidate {
                frequency: Some(-2),
                ..Default::default()
            },
            MedicationCandidate {
                course_duration_days: Some(0),
                ..Default::default()
            },
            MedicationCandidate {
                quantity: Some(0.0),
                ..Default::default()
            },
            MedicationCandidate {
                quantity: Some(f64::NAN),
                ..Default::default()
            },
            MedicationCandidate {
                frequency: Some(25),
                ..Default::default()
            },
        ] {
            let result = resolver.resolve_on(&candidate, day());
            assert!(
                matches!(result, Err(ScheduleError::InvalidCandidate(_))),
                "{:?} -> {:?}",
                candidate,
                result
            );
        }
    }

    #[test]
    fn test_policy_fields_ignore_candidate() {
        let resolver = ScheduleResolver::new();
        let candidate = MedicationCandidate {
            display_name: Some("White Tablet".into()),
            start_date: Some("1999-01-01".into()),
            ..MedicationCandidate::named("Dolo")
        };

        let schedule = resolver.resolve_on(&candidate, day()).unwrap();
        assert_eq!(schedule.start_date, day());
    }

    #[test]
    fn test_blank_strings_count_as_absent() {
        let resolver = ScheduleResolver::new();
        let candidate = MedicationCandidate {
            medicine_name: Some("  ".into()),
            dosage: Some("".into()),
            administration_instruction: Some(" ".into()),
            ..Default::default()
        };

        let schedule = resolver.resolve_on(&candidate, day()).unwrap();
        assert_eq!(schedule.medicine_name, None);
        assert_eq!(schedule.dosage, "1 dose");
        assert_eq!(schedule.administration_instruction, "After meals");
    }

    #[test]
    fn test_explicit_instruction_kept() {
        let resolver = ScheduleResolver::new();
        let candidate = MedicationCandidate {
            administration_instruction: Some("As needed".into()),
            ..Default::default()
        };

        let schedule = resolver.resolve_on(&candidate, day()).unwrap();
        assert_eq!(schedule.administration_instruction, "As needed");
    }

    #[test]
    fn test_resolving_twice_is_identical() {
        let resolver = ScheduleResolver::new();
        let candidate = MedicationCandidate {
            form: Some(DrugForm::Capsule),
            dosage: Some("1 capsule (500)".into()),
            frequency: Some(2),
            course_duration_days: Some(7),
            ..MedicationCandidate::named("Amoxil")
        };

        let first = resolver.resolve_on(&candidate, day()).unwrap();
        let second = resolver.resolve_on(&candidate, day()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_defaults_from_json() {
        let defaults =
            ScheduleDefaults::from_json(r#"{"course_duration_days": 7, "dosage": "1 unit"}"#)
                .unwrap();
        assert_eq!(defaults.course_duration_days, 7);
        assert_eq!(defaults.administration_instruction, "After meals");

        let resolver = ScheduleResolver::with_defaults(defaults).unwrap();
        let schedule = resolver
            .resolve_on(&MedicationCandidate::default(), day())
            .unwrap();
        assert_eq!(schedule.course_duration_days, 7);
        assert_eq!(schedule.dosage, "1 unit");
    }

    #[test]
    fn test_invalid_defaults_rejected() {
        let err = ScheduleDefaults::from_json(
            r#"{"frequency": 0, "course_duration_days": 0, "quantity": -1.0}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidDefaults(_)));

        for json in [
            r#"{"frequency": 25}"#,
            r#"{"course_duration_days": 0}"#,
            r#"{"quantity": 0.0}"#,
            r#"{"window_start_minute": 600, "window_end_minute": 500}"#,
            r#"{"window_end_minute": 1440}"#,
            r#"{"rounding_minutes": 0}"#,
            r#"{"frequency": "daily"}"#,
        ] {
            assert!(
                matches!(
                    ScheduleDefaults::from_json(json),
                    Err(ScheduleError::InvalidDefaults(_))
                ),
                "{} should be rejected",
                json
            );
        }

        let defaults = ScheduleDefaults {
            quantity: f64::NAN,
            ..Default::default()
        };
        assert!(ScheduleResolver::with_defaults(defaults).is_err());
    }

    #[test]
    fn test_late_window_keeps_rounding() {
        let defaults = ScheduleDefaults::from_json(
            r#"{"window_start_minute": 1200, "window_end_minute": 1439}"#,
        )
        .unwrap();
        let resolver = ScheduleResolver::with_defaults(defaults).unwrap();
        let candidate = MedicationCandidate {
            frequency: Some(6),
            ..Default::default()
        };

        let schedule = resolver.resolve_on(&candidate, day()).unwrap();
        assert_eq!(schedule.times.len(), 6);
        assert_eq!(schedule.times.last().map(String::as_str), Some("23:55"));
        assert!(schedule
            .times
            .iter()
            .all(|t| is_valid_time(t) && (t.ends_with('0') || t.ends_with('5'))));
    }
}
