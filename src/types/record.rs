use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::identifiers::CandidateRef;
use super::question::QuestionItem;

/// Questions keyed by slide ordinal (1-based), each list in generation order.
pub type QuestionMap = BTreeMap<u32, Vec<QuestionItem>>;

/// Full analysis of one deck.
///
/// Produced once per deck, then amended in place when a slide's questions
/// are edited or regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisRecord {
    #[serde(default)]
    pub intro_summary: Option<String>,
    #[serde(default)]
    pub outro_summary: Option<String>,
    #[serde(default)]
    pub questions: QuestionMap,
}

impl AnalysisRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, candidate: CandidateRef) -> Option<&QuestionItem> {
        self.questions
            .get(&candidate.slide)
            .and_then(|qs| qs.get(candidate.index))
    }

    pub fn question_count(&self) -> usize {
        self.questions.values().map(Vec::len).sum()
    }

    /// Every addressable candidate, in slide then index order.
    pub fn all_refs(&self) -> impl Iterator<Item = CandidateRef> + '_ {
        self.questions.iter().flat_map(|(&slide, qs)| {
            (0..qs.len()).map(move |index| CandidateRef::new(slide, index))
        })
    }
}
