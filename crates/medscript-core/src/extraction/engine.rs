//! Line-by-line heuristic medication extraction.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::lexicon::*;
use crate::icon::palette::exact_color_name;
use crate::models::{DrugForm, MedicationCandidate};

/// `<n>d`, `<n> days`, `<n> wk`, `<n> weeks`.
static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*(days?|d|weeks?|wks?|w)\b").expect("valid regex")
});

/// Strength with an optional attached unit: `650`, `500mg`, `5ml`, `10u`.
static STRENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d+)?)(mg|ml|mcg|g|u|iu|units?)?$").expect("valid regex")
});

/// List numbering such as `1.` or `2)`.
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]$").expect("valid regex"));

/// A whitespace-separated token with its lookup key.
#[derive(Debug, Clone)]
struct Token<'a> {
    /// Token as it appears in the line
    raw: &'a str,
    /// Token with surrounding punctuation removed, original case
    text: &'a str,
    /// Lowercased `text`, trailing dots removed
    key: String,
}

impl<'a> Token<'a> {
    fn new(raw: &'a str) -> Self {
        let text = raw.trim_matches(|c: char| {
            matches!(c, ',' | ';' | ':' | '(' | ')' | '[' | ']' | '"' | '-' | '/' | '*')
        });
        let key = text.trim_end_matches('.').to_lowercase();
        Self { raw, text, key }
    }

    fn is_alphabetic_word(&self) -> bool {
        let word = self.text.trim_end_matches('.');
        !word.is_empty()
            && word.chars().next().is_some_and(char::is_alphabetic)
            && word
                .chars()
                .all(|c| c.is_alphabetic() || c == '-' || c == '\'')
    }

    fn as_integer(&self) -> Option<i64> {
        if self.key.is_empty() || !self.key.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        self.key.parse().ok()
    }
}

/// Heuristic extraction engine.
///
/// Pure and order preserving: one candidate per recognized line, in source
/// order. Never fails; unparseable lines are skipped.
pub struct HeuristicExtractor {
    /// Frequency phrases, longest first
    frequency_codes: Vec<(Vec<String>, u32)>,
    /// Extra form tokens on top of [`DrugForm::parse_label`]
    form_tokens: HashMap<String, DrugForm>,
    /// Timing abbreviation → instruction
    instruction_codes: HashMap<String, String>,
}

impl Default for HeuristicExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicExtractor {
    /// Create an engine with the default lexicon.
    pub fn new() -> Self {
        let mut engine = Self {
            frequency_codes: Vec::new(),
            form_tokens: HashMap::new(),
            instruction_codes: INSTRUCTION_CODES
                .iter()
                .map(|(code, text)| (code.to_string(), text.to_string()))
                .collect(),
        };
        for (phrase, per_day) in FREQUENCY_CODES {
            engine.add_frequency_code(&phrase.join(" "), *per_day);
        }
        engine
    }

    /// Add a frequency phrase (e.g., "q8h" → 3). Matching is case-insensitive.
    pub fn add_frequency_code(&mut self, phrase: &str, per_day: u32) {
        let words: Vec<String> = phrase.split_whitespace().map(str::to_lowercase).collect();
        if words.is_empty() {
            return;
        }
        self.frequency_codes.retain(|(w, _)| *w != words);
        self.frequency_codes.push((words, per_day));
        self.frequency_codes
            .sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Add a dose-form token (e.g., "sachet" → Other).
    pub fn add_form_token(&mut self, token: &str, form: DrugForm) {
        self.form_tokens.insert(token.to_lowercase(), form);
    }

    /// Add a timing abbreviation (e.g., "stat" → "Immediately").
    pub fn add_instruction_code(&mut self, code: &str, instruction: &str) {
        self.instruction_codes
            .insert(code.to_lowercase(), instruction.to_string());
    }

    /// Extract candidates from canonical text, one per recognized line.
    pub fn extract(&self, text: &str) -> Vec<MedicationCandidate> {
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| self.extract_line(line))
            .collect()
    }

    /// Parse a single line. `None` when no medicine name can be found.
    pub fn extract_line(&self, line: &str) -> Option<MedicationCandidate> {
        let tokens: Vec<Token> = line
            .split_whitespace()
            .map(Token::new)
            .filter(|t| !t.text.is_empty())
            .collect();

        let mut pos = 0;
        while pos < tokens.len() {
            if LEADING_FILLERS.contains(&tokens[pos].key.as_str())
                || LIST_MARKER.is_match(tokens[pos].raw)
            {
                pos += 1;
            } else if let Some(len) = Self::prn_marker_at(&tokens[pos..]) {
                // "PRN Tab Dolo 650"
                pos += len;
            } else {
                break;
            }
        }

        if tokens
            .get(pos)
            .is_some_and(|t| HEADER_LABELS.contains(&t.key.as_str()))
        {
            tracing::debug!(line, "skipping header line");
            return None;
        }

        // 1. Leading form token
        let leading_form = tokens.get(pos).and_then(|t| self.form_for(&t.key));
        if leading_form.is_some() {
            pos += 1;
        }

        // 2. Name: longest run of alphabetic, non-lexicon tokens
        let name_start = pos;
        while pos < tokens.len() && self.is_name_token(&tokens[pos], pos > name_start) {
            pos += 1;
        }
        if pos == name_start {
            tracing::debug!(line, "no medicine name found");
            return None;
        }
        let medicine_name = tokens[name_start..pos]
            .iter()
            .map(|t| t.text.trim_end_matches('.'))
            .collect::<Vec<_>>()
            .join(" ");
        let rest = &tokens[pos..];

        // Strength directly after the name
        let (strength, after_strength) = Self::strength(rest);

        // Dose count: "<n> <form word>" anywhere, else a bare integer after the strength
        let counted = self.counted_form(rest);
        let count = counted.map(|(n, _)| n).or_else(|| {
            if strength.is_none() {
                return None;
            }
            let next = rest.get(after_strength)?;
            let follower = rest.get(after_strength + 1).map(|t| t.key.as_str());
            let n = u32::try_from(next.as_integer()?).ok().filter(|n| *n > 0)?;
            let is_count = !matches!(
                follower,
                Some("times" | "d" | "day" | "days" | "w" | "wk" | "wks" | "week" | "weeks")
            );
            is_count.then_some(n)
        });
        let form = leading_form
            .or(counted.map(|(_, f)| f))
            .unwrap_or(DrugForm::Tablet);

        let mut dosage = form.dose_phrase(count.unwrap_or(1));
        if let Some(strength) = &strength {
            dosage.push_str(&format!(" ({})", strength));
        }

        // 3. Frequency, first match wins
        let frequency = self.frequency(rest).unwrap_or(1);

        // 4. Duration
        let course_duration_days = Self::duration(line);

        // 5. PRN / timing instructions
        let administration_instruction = if Self::has_prn_marker(&tokens) {
            Some(AS_NEEDED.to_string())
        } else {
            rest.iter()
                .find_map(|t| self.instruction_codes.get(&t.key).cloned())
        };

        let color_names = Self::color_words(rest);

        let candidate = MedicationCandidate {
            medicine_name: Some(medicine_name),
            form: Some(form),
            dosage: Some(dosage),
            frequency: Some(i64::from(frequency)),
            course_duration_days,
            administration_instruction,
            color_names,
            raw_line: Some(line.trim().to_string()),
            ..Default::default()
        };
        tracing::debug!(?candidate, "heuristic candidate");
        Some(candidate)
    }

    fn form_for(&self, key: &str) -> Option<DrugForm> {
        self.form_tokens
            .get(key)
            .copied()
            .or_else(|| DrugForm::parse_label(key))
    }

    fn is_name_token(&self, token: &Token, has_name: bool) -> bool {
        if !token.is_alphabetic_word() {
            return false;
        }
        let key = token.key.as_str();
        if NAME_STOP_WORDS.contains(&key)
            || self.instruction_codes.contains_key(key)
            || PRN_MARKERS.iter().any(|m| m[0] == key)
            || self.frequency_codes.iter().any(|(w, _)| w[0] == key)
        {
            return false;
        }
        // Form and color words end a name but may start one ("Drop" alone is a form)
        !(has_name && (self.form_for(key).is_some() || exact_color_name(key).is_some()))
    }

    /// Strength token after the name: returns the strength text and the
    /// index of the first token after it.
    fn strength(rest: &[Token]) -> (Option<String>, usize) {
        let Some(first) = rest.first() else {
            return (None, 0);
        };
        let Some(caps) = STRENGTH.captures(&first.key) else {
            return (None, 0);
        };
        if caps.get(2).is_some() {
            return (Some(first.text.to_string()), 1);
        }
        // Separate unit token: "500 mg"
        if let Some(unit) = rest.get(1).filter(|t| STRENGTH_UNITS.contains(&t.key.as_str())) {
            return (Some(format!("{}{}", first.text, unit.text)), 2);
        }
        (Some(first.text.to_string()), 1)
    }

    fn counted_form(&self, rest: &[Token]) -> Option<(u32, DrugForm)> {
        rest.windows(2).find_map(|pair| {
            let n = pair[0].as_integer().filter(|n| *n > 0)?;
            let form = self.form_for(&pair[1].key)?;
            Some((u32::try_from(n).ok()?, form))
        })
    }

    fn frequency(&self, rest: &[Token]) -> Option<u32> {
        for i in 0..rest.len() {
            // "<n> times"
            if let Some(n) = rest[i].as_integer() {
                if n > 0 && rest.get(i + 1).is_some_and(|t| t.key == "times") {
                    if let Ok(n) = u32::try_from(n) {
                        return Some(n);
                    }
                }
            }
            for (phrase, per_day) in &self.frequency_codes {
                let matched = rest.len() - i >= phrase.len()
                    && phrase
                        .iter()
                        .zip(&rest[i..])
                        .all(|(word, token)| *word == token.key);
                if matched {
                    return Some(*per_day);
                }
            }
        }
        None
    }

    fn duration(line: &str) -> Option<i64> {
        let caps = DURATION.captures(line)?;
        let n: i64 = caps.get(1)?.as_str().parse().ok()?;
        let unit = caps.get(2)?.as_str().to_lowercase();
        if unit.starts_with('w') {
            n.checked_mul(7)
        } else {
            Some(n)
        }
    }

    /// Length of the PRN marker starting at the first token, if any.
    fn prn_marker_at(tokens: &[Token]) -> Option<usize> {
        PRN_MARKERS
            .iter()
            .find(|marker| {
                tokens.len() >= marker.len()
                    && marker
                        .iter()
                        .zip(tokens)
                        .all(|(word, token)| token.key == *word)
            })
            .map(|marker| marker.len())
    }

    fn has_prn_marker(tokens: &[Token]) -> bool {
        (0..tokens.len()).any(|i| Self::prn_marker_at(&tokens[i..]).is_some())
    }

    fn color_words(rest: &[Token]) -> Vec<String> {
        let mut colors = Vec::new();
        let mut i = 0;
        while i < rest.len() {
            if let Some(next) = rest.get(i + 1) {
                let pair = format!("{} {}", rest[i].key, next.key);
                if exact_color_name(&pair).is_some() {
                    colors.push(pair);
                    i += 2;
                    continue;
                }
            }
            if exact_color_name(&rest[i].key).is_some() {
                colors.push(rest[i].key.clone());
            }
            i += 1;
        }
        colors
    }
}
