//! Dose time generation.

use std::sync::LazyLock;

use regex::Regex;

/// 24-hour `HH:MM`.
static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[01]\d|2[0-3]):[0-5]\d$").expect("valid regex"));

/// Fixed schedules for one to four daily doses.
pub const CANONICAL_TIMES: [&[&str]; 4] = [
    &["08:00"],
    &["08:00", "20:00"],
    &["08:00", "14:00", "20:00"],
    &["08:00", "12:00", "16:00", "20:00"],
];

/// 23:59 as minutes after midnight.
pub const LAST_MINUTE_OF_DAY: u32 = 23 * 60 + 59;

/// Window used when a frequency exceeds the canonical table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseWindow {
    /// First dose, minutes after midnight
    pub start_minute: u32,
    /// Last dose, minutes after midnight
    pub end_minute: u32,
    /// Times are rounded to this many minutes
    pub rounding_minutes: u32,
}

impl Default for DoseWindow {
    fn default() -> Self {
        Self {
            start_minute: 8 * 60,
            end_minute: 22 * 60,
            rounding_minutes: 5,
        }
    }
}

/// Check a string against `HH:MM` 24-hour format.
pub fn is_valid_time(time: &str) -> bool {
    CLOCK_TIME.is_match(time)
}

/// Dose times for a daily frequency.
///
/// 1–4 doses use [`CANONICAL_TIMES`]; more doses are spread evenly over the
/// window, first and last dose on the window edges. Returns exactly
/// `frequency` entries.
pub fn generate_times(frequency: u32, window: &DoseWindow) -> Vec<String> {
    if let Some(table) = frequency
        .checked_sub(1)
        .and_then(|i| CANONICAL_TIMES.get(i as usize))
    {
        return table.iter().map(|t| t.to_string()).collect();
    }
    if frequency == 0 {
        return Vec::new();
    }

    let start = f64::from(window.start_minute);
    let end = f64::from(window.end_minute.max(window.start_minute));
    let step = (end - start) / f64::from(frequency - 1);
    let rounding = window.rounding_minutes.max(1);
    // Latest time that is still on the rounding grid
    let last_slot = LAST_MINUTE_OF_DAY / rounding * rounding;

    (0..frequency)
        .map(|i| {
            let minute = start + step * f64::from(i);
            let rounded = (minute / f64::from(rounding)).round() as u32 * rounding;
            format_minute(rounded.min(last_slot))
        })
        .collect()
}

fn format_minute(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}
