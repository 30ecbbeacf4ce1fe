pub mod config;
pub mod orchestrator;
pub mod session;

use thiserror::Error;

use crate::cache::CacheError;
use crate::collaborator::CollaboratorError;
use crate::slides::SlideError;
pub use config::{ConfigError, PipelineConfig, SlideWindows};
pub use orchestrator::{AnalysisRun, Pipeline, RegenerateOutcome, EXAMPLE_ANSWER_UNAVAILABLE};
pub use session::Session;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A rate-limit or authorization failure. No further calls were made.
    #[error("Analysis stopped: {source}")]
    Halted {
        slide: Option<u32>,
        source: CollaboratorError,
    },
    /// A non-fatal collaborator failure on an operation that has no
    /// per-slide fallback (regeneration).
    #[error("Collaborator error: {0}")]
    Collaborator(CollaboratorError),
    #[error("No question types requested")]
    NoKindsRequested,
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("Slide error: {0}")]
    Slide(#[from] SlideError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl PipelineError {
    pub(crate) fn from_call(slide: u32, error: CollaboratorError) -> Self {
        if error.is_fatal() {
            PipelineError::Halted {
                slide: Some(slide),
                source: error,
            }
        } else {
            PipelineError::Collaborator(error)
        }
    }
}

/// What one analysis run did, for the caller to surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub slides_total: usize,
    pub content_slides: usize,
    /// Whole session restored from the document tier.
    pub replayed: bool,
    pub cache_hits: usize,
    pub generated: usize,
    /// Slides whose response could not be parsed and got a placeholder.
    pub degraded: Vec<u32>,
    /// Slides left without questions after a non-fatal call failure.
    pub skipped: Vec<u32>,
    pub cache_write_failures: usize,
    pub default_selection_used: bool,
}
