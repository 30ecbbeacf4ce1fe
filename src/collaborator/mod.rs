//! The external generative collaborator, as an injected capability.
//!
//! The core never talks to a model service directly. Everything it needs
//! goes through [`Collaborator`], which keeps parsing, validation and
//! fallback logic testable against canned responses.

pub mod prompts;
pub mod request;

use thiserror::Error;

use crate::curation::RankingRequest;
pub use request::{ModelTier, SlidePurpose, SlideRequest};

/// Transport-level failure of a collaborator call, already classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("Rate limit reached. Wait a moment before analyzing more slides.")]
    RateLimited,
    #[error("Authorization failed. Check the collaborator credentials.")]
    Unauthorized,
    #[error("Collaborator call timed out")]
    Timeout,
    #[error("Collaborator call failed: {0}")]
    Other(String),
}

impl CollaboratorError {
    /// Fatal errors stop all further calls in a run; anything else only
    /// costs the current slide.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CollaboratorError::RateLimited | CollaboratorError::Unauthorized)
    }
}

/// Two operations: look at one slide, or rank a set of candidates.
/// Both return the collaborator's raw text, unparsed.
pub trait Collaborator {
    fn analyze(&self, request: &SlideRequest<'_>) -> Result<String, CollaboratorError>;

    fn rank(&self, request: &RankingRequest) -> Result<String, CollaboratorError>;
}

impl<C: Collaborator + ?Sized> Collaborator for &C {
    fn analyze(&self, request: &SlideRequest<'_>) -> Result<String, CollaboratorError> {
        (**self).analyze(request)
    }

    fn rank(&self, request: &RankingRequest) -> Result<String, CollaboratorError> {
        (**self).rank(request)
    }
}
