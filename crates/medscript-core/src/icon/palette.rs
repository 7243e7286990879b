//! Color vocabulary: hex validation, color names and shade derivation.

use std::sync::LazyLock;

use regex::Regex;
use strsim::jaro_winkler;

use crate::models::IconColorInput;

/// Strict `#RRGGBB` / `#RRGGBBAA`.
static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$").expect("valid regex"));

/// Minimum Jaro-Winkler similarity for an OCR-garbled color word.
const FUZZY_NAME_THRESHOLD: f64 = 0.9;

/// Shade used for ascent2 when ascent1 is white.
const WHITE_SHADE: &str = "#D6D6D6";

/// How much ascent2 is darkened relative to ascent1.
const SHADE_DARKEN: f64 = 0.15;

/// Common medication and packaging color names.
pub const COLOR_NAMES: &[(&str, &str)] = &[
    ("white", "#FFFFFF"),
    ("blue", "#3B82F6"),
    ("red", "#EF4444"),
    ("green", "#10B981"),
    ("yellow", "#F59E0B"),
    ("pink", "#EC4899"),
    ("orange", "#F97316"),
    ("purple", "#8B5CF6"),
    ("brown", "#A57C5A"),
    ("clear", "#F8FAFC"),
    ("transparent", "#F8FAFC"),
    ("silver", "#D1D5DB"),
    ("gold", "#FCD34D"),
    ("cream", "#FEF3C7"),
    ("beige", "#F5F5DC"),
    ("maroon", "#991B1B"),
    ("grey", "#9CA3AF"),
    ("gray", "#9CA3AF"),
    ("light blue", "#93C5FD"),
    ("dark blue", "#1E40AF"),
    ("light green", "#86EFAC"),
    ("dark green", "#065F46"),
];

/// Check a color against the strict hex pattern.
pub fn is_valid_hex(color: &str) -> bool {
    HEX_COLOR.is_match(color)
}

/// Exact (case-insensitive) color name match.
pub fn exact_color_name(name: &str) -> Option<&'static str> {
    let key = name.trim().to_lowercase();
    COLOR_NAMES
        .iter()
        .find(|(n, _)| *n == key)
        .map(|(_, hex)| *hex)
}

/// Color name to hex, tolerating small OCR misspellings ("yelow").
pub fn lookup_color_name(name: &str) -> Option<&'static str> {
    if let Some(hex) = exact_color_name(name) {
        return Some(hex);
    }

    let key = name.trim().to_lowercase();
    if key.len() < 4 {
        return None;
    }

    COLOR_NAMES
        .iter()
        .map(|(n, hex)| (jaro_winkler(&key, n), *hex))
        .filter(|(score, _)| *score >= FUZZY_NAME_THRESHOLD)
        .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, hex)| hex)
}

/// Secondary shade for a body color: white maps to light grey, anything
/// else is darkened by 15%. Alpha is kept. Returns `None` for invalid input.
pub fn derive_shade(color: &str) -> Option<String> {
    if !is_valid_hex(color) {
        return None;
    }

    let digits = &color[1..];
    if digits[..6].eq_ignore_ascii_case("ffffff") {
        return Some(WHITE_SHADE.to_string());
    }

    let mut out = String::from("#");
    for i in 0..3 {
        let channel = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).ok()?;
        let darkened = (f64::from(channel) * (1.0 - SHADE_DARKEN)) as u8;
        out.push_str(&format!("{:02X}", darkened));
    }
    if digits.len() == 8 {
        out.push_str(&digits[6..].to_uppercase());
    }
    Some(out)
}

/// Build icon color input from raw color words.
///
/// The first recognized name becomes ascent1; ascent2 is the second
/// recognized name, or a shade of ascent1.
pub fn colors_from_names(names: &[String]) -> IconColorInput {
    let mut resolved = names.iter().filter_map(|n| lookup_color_name(n));

    let Some(ascent1) = resolved.next() else {
        return IconColorInput::default();
    };
    let ascent2 = resolved
        .next()
        .map(str::to_string)
        .or_else(|| derive_shade(ascent1));

    IconColorInput {
        background: None,
        ascent1: Some(ascent1.to_string()),
        ascent2,
        cap: None,
    }
}
