//! AI collaborator for medscript.
//!
//! Builds the extraction prompt and parses the service's JSON answer into
//! [`medscript_core::models::MedicationCandidate`]s. No network I/O happens
//! here; callers plug a [`CompletionBackend`] into an [`LlmExtractor`] and
//! attach it to a [`medscript_core::Pipeline`].

pub mod extraction;
pub mod prompts;

pub use extraction::{
    parse_ai_output, AiOutput, CompletionBackend, ExtractionError, ExtractionResult,
    LlmExtractor, MockExtractor, RawMedication,
};
pub use prompts::{build_full_prompt, make_extraction_prompt, SYSTEM_PROMPT};
