//! Medication extraction from AI service output.

use medscript_core::models::{DrugForm, IconColorInput, MedicationCandidate, NormalizedInput};
use medscript_core::pipeline::{CandidateExtractor, ExtractorError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prompts::{build_full_prompt, input_label};

/// Extraction errors.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("LLM inference error: {0}")]
    Inference(String),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

impl From<ExtractionError> for ExtractorError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::Inference(msg) => ExtractorError::Unavailable(msg),
            other => ExtractorError::Malformed(other.to_string()),
        }
    }
}

/// Parsed answer of the AI service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiOutput {
    pub medications: Vec<RawMedication>,
    /// Text the service read (OCR result for images)
    pub raw_text: Option<String>,
    pub processing_notes: Option<String>,
}

/// A medication as the AI service reports it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawMedication {
    pub medicine_name: Option<String>,
    pub display_name: Option<String>,
    /// Free-form label ("tablet", "Tab", "ointment")
    pub form: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<i64>,
    pub times: Option<Vec<String>>,
    pub course_duration_days: Option<i64>,
    pub administration_instruction: Option<String>,
    pub quantity: Option<f64>,
    pub start_date: Option<String>,
    /// Color word (e.g., "white")
    pub color: Option<String>,
    pub source_line: Option<String>,
    pub icon_colors: Option<IconColorInput>,
}

impl From<RawMedication> for MedicationCandidate {
    fn from(raw: RawMedication) -> Self {
        let color_names = raw
            .color
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .into_iter()
            .collect();

        MedicationCandidate {
            medicine_name: non_blank(raw.medicine_name),
            display_name: non_blank(raw.display_name),
            form: non_blank(raw.form).map(|f| DrugForm::from_label(&f)),
            dosage: non_blank(raw.dosage),
            frequency: raw.frequency,
            times: raw.times,
            course_duration_days: raw.course_duration_days,
            administration_instruction: non_blank(raw.administration_instruction),
            quantity: raw.quantity,
            start_date: raw.start_date,
            color_names,
            icon_colors: raw.icon_colors,
            raw_line: non_blank(raw.source_line),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AiOutput {
    /// Candidates for every medication that carries a name.
    pub fn into_candidates(self) -> Vec<MedicationCandidate> {
        self.medications
            .into_iter()
            .map(MedicationCandidate::from)
            .filter(|c| {
                if c.medicine_name.is_none() {
                    tracing::debug!(line = ?c.raw_line, "dropping unnamed AI medication");
                }
                c.medicine_name.is_some()
            })
            .collect()
    }
}

/// Parse AI output JSON into structured medications.
pub fn parse_ai_output(response: &str) -> ExtractionResult<AiOutput> {
    // The service may wrap the object in prose or a code fence
    let json_start = response.find('{').ok_or_else(|| {
        ExtractionError::InvalidFormat("No JSON object found in response".into())
    })?;
    let json_end = response.rfind('}').ok_or_else(|| {
        ExtractionError::InvalidFormat("No closing brace found in response".into())
    })?;
    if json_end < json_start {
        return Err(ExtractionError::InvalidFormat(
            "Closing brace precedes opening brace".into(),
        ));
    }

    let output: AiOutput = serde_json::from_str(&response[json_start..=json_end])?;
    Ok(output)
}

/// Something that completes a prompt. Network clients live outside this crate.
pub trait CompletionBackend: Send + Sync {
    fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

impl<F> CompletionBackend for F
where
    F: Fn(&str) -> anyhow::Result<String> + Send + Sync,
{
    fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        self(prompt)
    }
}

/// Candidate extractor backed by an AI completion service.
pub struct LlmExtractor<B> {
    backend: B,
    include_examples: bool,
}

impl<B: CompletionBackend> LlmExtractor<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            include_examples: true,
        }
    }

    /// Toggle few-shot examples in the prompt.
    pub fn with_examples(mut self, include_examples: bool) -> Self {
        self.include_examples = include_examples;
        self
    }

    /// Prompt sent for the given input.
    pub fn prompt_for(&self, input: &NormalizedInput) -> String {
        build_full_prompt(&input.text, input_label(input), self.include_examples)
    }

    /// Query the backend and parse its answer.
    pub fn extract_output(&self, input: &NormalizedInput) -> ExtractionResult<AiOutput> {
        let prompt = self.prompt_for(input);
        let response = self
            .backend
            .complete(&prompt)
            .map_err(|e| ExtractionError::Inference(format!("{:#}", e)))?;

        let output = parse_ai_output(&response)?;
        if let Some(notes) = output.processing_notes.as_deref().filter(|n| !n.is_empty()) {
            tracing::debug!(notes, "AI processing notes");
        }
        Ok(output)
    }
}

impl<B: CompletionBackend> CandidateExtractor for LlmExtractor<B> {
    fn name(&self) -> &str {
        "AI extractor"
    }

    fn extract(&self, input: &NormalizedInput) -> Result<Vec<MedicationCandidate>, ExtractorError> {
        let output = self.extract_output(input).map_err(|e| {
            tracing::warn!(error = %e, "AI extraction failed");
            ExtractorError::from(e)
        })?;
        let candidates = output.into_candidates();
        tracing::debug!(count = candidates.len(), "AI candidates");
        Ok(candidates)
    }
}

/// Mock extractor for testing without an AI service.
///
/// Answers every request with the same canned response.
pub struct MockExtractor {
    response: Result<String, String>,
}

impl MockExtractor {
    /// Answer with canned JSON (prose around it is fine).
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Ok(response.into()),
        }
    }

    /// Fail every request as if the service were unreachable.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            response: Err(reason.into()),
        }
    }
}

impl CandidateExtractor for MockExtractor {
    fn name(&self) -> &str {
        "mock extractor"
    }

    fn extract(&self, _input: &NormalizedInput) -> Result<Vec<MedicationCandidate>, ExtractorError> {
        let response = self
            .response
            .as_ref()
            .map_err(|reason| ExtractorError::Unavailable(reason.clone()))?;
        Ok(parse_ai_output(response)?.into_candidates())
    }
}
