pub mod request;
pub mod validate;

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, warn};

use crate::collaborator::{Collaborator, CollaboratorError};
use crate::parser::decode_selection;
use crate::types::{CandidateRef, QuestionMap};
pub use request::{flatten, FlatCandidate, InclusionPolicy, RankingPayload, RankingRequest};
pub use validate::{fallback_selection, validate_selection, ValidatedSelection};

/// Why the deterministic default selection was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    NoCandidates,
    RequestUnavailable(String),
    CallFailed(CollaboratorError),
    Unparseable,
    NoValidPairs,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NoCandidates => f.write_str("no candidates"),
            FallbackReason::RequestUnavailable(e) => write!(f, "ranking request could not be built: {e}"),
            FallbackReason::CallFailed(e) => write!(f, "ranking call failed: {e}"),
            FallbackReason::Unparseable => f.write_str("ranking response was not valid JSON"),
            FallbackReason::NoValidPairs => f.write_str("ranking response selected no valid questions"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionSource {
    Ranked,
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurationOutcome {
    pub selected: BTreeSet<CandidateRef>,
    pub source: SelectionSource,
}

impl CurationOutcome {
    /// Informational: the caller may tell the user a default selection was used.
    pub fn default_selection_used(&self) -> bool {
        matches!(self.source, SelectionSource::Fallback(_))
    }

    fn fallback(candidates: &QuestionMap, reason: FallbackReason) -> Self {
        if reason != FallbackReason::NoCandidates {
            warn!(%reason, "using default selection");
        }
        Self {
            selected: fallback_selection(candidates),
            source: SelectionSource::Fallback(reason),
        }
    }
}

/// Picks a bounded, category-balanced subset of candidates.
///
/// The ranking judgment belongs to the collaborator; this type owns the
/// request, the validation of the answer, and the fallback.
#[derive(Debug, Clone, Default)]
pub struct Curator {
    policy: InclusionPolicy,
}

impl Curator {
    pub fn new(policy: InclusionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &InclusionPolicy {
        &self.policy
    }

    pub fn curate<C>(
        &self,
        collaborator: &C,
        candidates: &QuestionMap,
        total_slide_count: usize,
    ) -> CurationOutcome
    where
        C: Collaborator + ?Sized,
    {
        if candidates.values().all(Vec::is_empty) {
            return CurationOutcome::fallback(candidates, FallbackReason::NoCandidates);
        }

        let request = match RankingRequest::build(candidates, total_slide_count, &self.policy) {
            Ok(request) => request,
            Err(e) => {
                return CurationOutcome::fallback(
                    candidates,
                    FallbackReason::RequestUnavailable(e.to_string()),
                )
            }
        };

        let raw = match collaborator.rank(&request) {
            Ok(raw) => raw,
            Err(e) => return CurationOutcome::fallback(candidates, FallbackReason::CallFailed(e)),
        };

        let picks = match decode_selection(&raw) {
            Ok(picks) => picks,
            Err(_) => return CurationOutcome::fallback(candidates, FallbackReason::Unparseable),
        };

        let validated = validate_selection(&picks, candidates);
        debug!(
            returned = picks.len(),
            kept = validated.selected.len(),
            out_of_range = validated.out_of_range,
            duplicates = validated.duplicates,
            "ranking validated"
        );

        if validated.selected.is_empty() {
            return CurationOutcome::fallback(candidates, FallbackReason::NoValidPairs);
        }

        CurationOutcome {
            selected: validated.selected,
            source: SelectionSource::Ranked,
        }
    }
}

/// Curate with the default inclusion policy.
pub fn curate<C>(collaborator: &C, candidates: &QuestionMap, total_slide_count: usize) -> CurationOutcome
where
    C: Collaborator + ?Sized,
{
    Curator::default().curate(collaborator, candidates, total_slide_count)
}
