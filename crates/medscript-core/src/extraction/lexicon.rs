//! Lookup tables for prescription shorthand.
//!
//! Every table maps lowercase tokens (or token sequences) to a canonical
//! value. The engine only walks these tables; extending the vocabulary means
//! adding rows here or calling the engine's `add_*` methods.

/// Frequency phrases → doses per day. Longer phrases are tried first.
pub const FREQUENCY_CODES: &[(&[&str], u32)] = &[
    // Latin/clinical abbreviations
    (&["od"], 1),
    (&["bd"], 2),
    (&["bid"], 2),
    (&["tds"], 3),
    (&["tid"], 3),
    (&["qds"], 4),
    (&["qid"], 4),
    // Natural language
    (&["once", "daily"], 1),
    (&["once", "a", "day"], 1),
    (&["twice", "daily"], 2),
    (&["twice", "a", "day"], 2),
    (&["thrice", "daily"], 3),
    (&["thrice", "a", "day"], 3),
    (&["three", "times", "daily"], 3),
    (&["three", "times", "a", "day"], 3),
    (&["four", "times", "daily"], 4),
    (&["four", "times", "a", "day"], 4),
    // Spelled numerals on their own
    (&["once"], 1),
    (&["twice"], 2),
    (&["thrice"], 3),
];

/// Markers meaning "take as needed".
pub const PRN_MARKERS: &[&[&str]] = &[&["prn"], &["sos"], &["as", "needed"]];

/// Instruction text set by a PRN marker.
pub const AS_NEEDED: &str = "As needed";

/// Timing abbreviations → administration instruction.
pub const INSTRUCTION_CODES: &[(&str, &str)] = &[
    ("ac", "Before meals"),
    ("pc", "After meals"),
    ("hs", "At bedtime"),
];

/// Words that open non-medication lines (prescription headers).
pub const HEADER_LABELS: &[&str] = &[
    "patient",
    "name",
    "age",
    "date",
    "dr",
    "doctor",
    "diagnosis",
    "sex",
    "address",
    "signature",
];

/// Tokens that can never be part of a medicine name.
pub const NAME_STOP_WORDS: &[&str] = &[
    "x", "for", "daily", "times", "a", "day", "days", "per", "and", "then", "after", "before",
    "with", "at", "bedtime", "meals", "food", "mg", "ml", "mcg", "u", "iu", "units", "needed",
    "as", "three", "four",
];

/// Filler words dropped from the start of a line ("Take tab ...").
pub const LEADING_FILLERS: &[&str] = &["rx", "take", "give", "use", "start"];

/// Units accepted after a strength number.
pub const STRENGTH_UNITS: &[&str] = &["mg", "ml", "mcg", "g", "u", "iu", "unit", "units"];
