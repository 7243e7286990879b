//! Canonical input text with per-line provenance.

use serde::{Deserialize, Serialize};

/// Input modality a line came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceModality {
    /// Typed or pasted text
    Text,
    /// OCR transcript of a prescription image
    Ocr,
    /// Speech-to-text transcript
    Speech,
}

/// A single line of the canonical text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourcedLine {
    pub text: String,
    pub source: SourceModality,
}

/// Merged input: one text blob plus the modality of each of its lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedInput {
    /// Canonical text, lines joined by `\n`
    pub text: String,
    /// One entry per line of `text`, in order
    pub lines: Vec<SourcedLine>,
}

impl NormalizedInput {
    /// Modality of the line at `index`.
    pub fn source_of(&self, index: usize) -> Option<SourceModality> {
        self.lines.get(index).map(|l| l.source)
    }

    /// Lines with content, paired with their index.
    pub fn non_empty_lines(&self) -> impl Iterator<Item = (usize, &SourcedLine)> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.text.trim().is_empty())
    }
}
