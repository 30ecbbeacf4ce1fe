use std::collections::BTreeSet;

use crate::types::{CandidateRef, QuestionMap};

pub struct ValidatedSelection {
    pub selected: BTreeSet<CandidateRef>,
    pub out_of_range: usize,
    pub duplicates: usize,
}

/// Keep picks that address an existing candidate, once each.
pub fn validate_selection(picks: &[CandidateRef], candidates: &QuestionMap) -> ValidatedSelection {
    let mut selected = BTreeSet::new();
    let mut out_of_range = 0;
    let mut duplicates = 0;

    for pick in picks {
        let exists = candidates
            .get(&pick.slide)
            .is_some_and(|questions| pick.index < questions.len());

        if !exists {
            out_of_range += 1;
        } else if !selected.insert(*pick) {
            duplicates += 1;
        }
    }

    ValidatedSelection {
        selected,
        out_of_range,
        duplicates,
    }
}

/// The first question of every slide that has one.
pub fn fallback_selection(candidates: &QuestionMap) -> BTreeSet<CandidateRef> {
    candidates
        .iter()
        .filter(|(_, questions)| !questions.is_empty())
        .map(|(&slide, _)| CandidateRef::new(slide, 0))
        .collect()
}
