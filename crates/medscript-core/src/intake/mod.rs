//! Input normalizer.
//!
//! Merges direct text, an OCR transcript and a speech transcript into one
//! canonical blob, in that fixed priority order, tagging every line with the
//! modality it came from. No interpretation happens here.

use thiserror::Error;

use crate::models::{NormalizedInput, SourceModality, SourcedLine};

/// Input errors.
#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("No usable input: text, OCR transcript and speech transcript are all empty")]
    EmptyInput,
}

pub type InputResult<T> = Result<T, InputError>;

/// Merge the available input modalities into canonical text.
pub fn normalize(
    text: Option<&str>,
    ocr_text: Option<&str>,
    speech_text: Option<&str>,
) -> InputResult<NormalizedInput> {
    let sources = [
        (text, SourceModality::Text),
        (ocr_text, SourceModality::Ocr),
        (speech_text, SourceModality::Speech),
    ];

    let mut lines = Vec::new();
    for (content, source) in sources {
        let Some(content) = content else { continue };
        let content = content.trim();
        if content.is_empty() {
            continue;
        }
        // lines() drops the trailing '\r' of CRLF endings
        lines.extend(content.lines().map(|line| SourcedLine {
            text: line.to_string(),
            source,
        }));
    }

    if lines.is_empty() {
        return Err(InputError::EmptyInput);
    }

    let text = lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    tracing::debug!(line_count = lines.len(), "normalized prescription input");

    Ok(NormalizedInput { text, lines })
}
