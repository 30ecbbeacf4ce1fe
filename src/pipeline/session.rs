use std::collections::BTreeSet;

use crate::types::{AnalysisRecord, CandidateRef, Digest, QuestionItem};

/// Working state of one deck while a user reviews it.
///
/// Passed explicitly between pipeline stages; the cache is the only
/// durable copy, written at checkpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub source: Digest,
    pub source_name: String,
    pub total_slides: usize,
    pub record: AnalysisRecord,
    pub selected: BTreeSet<CandidateRef>,
    /// Set when the last curation fell back to the default selection.
    pub default_selection_used: bool,
    /// Slides whose questions are the placeholder for an unusable response.
    /// These never reach the slide tier.
    pub degraded: BTreeSet<u32>,
}

impl Session {
    pub fn new(source: Digest, source_name: impl Into<String>, total_slides: usize) -> Self {
        Self {
            source,
            source_name: source_name.into(),
            total_slides,
            record: AnalysisRecord::new(),
            selected: BTreeSet::new(),
            default_selection_used: false,
            degraded: BTreeSet::new(),
        }
    }

    pub fn is_degraded(&self, slide: u32) -> bool {
        self.degraded.contains(&slide)
    }

    pub fn is_selected(&self, candidate: CandidateRef) -> bool {
        self.selected.contains(&candidate)
    }

    /// Returns false if `candidate` does not address a question.
    pub fn set_selected(&mut self, candidate: CandidateRef, selected: bool) -> bool {
        if self.record.get(candidate).is_none() {
            return false;
        }
        if selected {
            self.selected.insert(candidate);
        } else {
            self.selected.remove(&candidate);
        }
        true
    }

    /// Select or clear every question on one slide.
    pub fn select_slide(&mut self, slide: u32, selected: bool) {
        let count = self.record.questions.get(&slide).map_or(0, Vec::len);
        for index in 0..count {
            self.set_selected(CandidateRef::new(slide, index), selected);
        }
    }

    /// Replace one question in place. Selection is kept.
    pub fn replace_item(&mut self, candidate: CandidateRef, item: QuestionItem) -> bool {
        match self
            .record
            .questions
            .get_mut(&candidate.slide)
            .and_then(|qs| qs.get_mut(candidate.index))
        {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Replace a slide's whole list and select every new question.
    pub(crate) fn replace_slide(&mut self, slide: u32, questions: Vec<QuestionItem>) {
        self.selected.retain(|c| c.slide != slide);
        self.selected
            .extend((0..questions.len()).map(|index| CandidateRef::new(slide, index)));
        self.record.questions.insert(slide, questions);
    }

    /// Drop refs that no longer address a question.
    pub(crate) fn prune_selection(&mut self) {
        let record = &self.record;
        self.selected.retain(|c| record.get(*c).is_some());
    }

    /// The record an exporter should render: selected questions only, in
    /// slide and index order, with summaries included on request.
    pub fn selected_record(&self, include_intro: bool, include_outro: bool) -> AnalysisRecord {
        let mut out = AnalysisRecord {
            intro_summary: self.record.intro_summary.clone().filter(|_| include_intro),
            outro_summary: self.record.outro_summary.clone().filter(|_| include_outro),
            ..AnalysisRecord::default()
        };

        for candidate in &self.selected {
            if let Some(q) = self.record.get(*candidate) {
                out.questions.entry(candidate.slide).or_default().push(q.clone());
            }
        }
        out
    }
}
