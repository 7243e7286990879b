//! Best-effort extraction capability (an AI service, usually).

use thiserror::Error;

use crate::models::{MedicationCandidate, NormalizedInput};

/// Extractor errors. The pipeline never fails because of these.
#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("Extractor unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed extractor output: {0}")]
    Malformed(String),
}

/// Something that can turn normalized input into candidates.
///
/// Results are advisory. Candidates should carry `raw_line` so the pipeline
/// can tell which input line they cover.
pub trait CandidateExtractor: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str {
        "extractor"
    }

    fn extract(&self, input: &NormalizedInput) -> Result<Vec<MedicationCandidate>, ExtractorError>;
}
