use serde_json::Value;
use tracing::warn;

use super::{parse, parse_with, Unparseable};
use crate::types::{CandidateRef, QuestionItem};

/// Outcome of decoding an analysis response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedQuestions {
    pub questions: Vec<QuestionItem>,
    /// True when the response was unusable and a placeholder stands in.
    pub degraded: bool,
}

/// Decode an analysis response, substituting the single placeholder item
/// when nothing usable can be recovered. Always yields at least one item.
pub fn decode_questions(raw: &str) -> DecodedQuestions {
    match try_decode_questions(raw) {
        Some(questions) => DecodedQuestions {
            questions,
            degraded: false,
        },
        None => {
            warn!(response_len = raw.len(), "analysis response unusable, substituting placeholder question");
            DecodedQuestions {
                questions: vec![QuestionItem::placeholder(raw)],
                degraded: true,
            }
        }
    }
}

/// Valid questions in a response, or `None` if there are none.
///
/// Accepts `{"questions": [...]}`, a bare list, or a single tagged item.
/// Items that fail to deserialize or validate are dropped individually.
///
/// Parsed JSON that yields no valid question (a stray `[2]` in prose, say)
/// does not end the search; later candidates in the text are tried.
pub fn try_decode_questions(raw: &str) -> Option<Vec<QuestionItem>> {
    parse_with(raw, |value| {
        let questions: Vec<QuestionItem> = question_values(&value)
            .into_iter()
            .enumerate()
            .filter_map(|(position, item)| decode_item(position, item))
            .collect();

        (!questions.is_empty()).then_some(questions)
    })
    .ok()
}

fn question_values(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => match map.get("questions") {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(_) => Vec::new(),
            None if map.contains_key("type") => vec![value],
            None => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn decode_item(position: usize, item: &Value) -> Option<QuestionItem> {
    let question: QuestionItem = match serde_json::from_value(item.clone()) {
        Ok(q) => q,
        Err(e) => {
            warn!(position, error = %e, "dropping malformed question");
            return None;
        }
    };

    if let Err(e) = question.validate() {
        warn!(position, error = %e, "dropping invalid question");
        return None;
    }

    Some(question)
}

/// `{slide, index}` pairs from a ranking response.
///
/// Accepts `{"selected": [...]}` or a bare list. Entries without
/// non-negative integer `slide` and `index` fields are skipped; range
/// checks against actual candidates happen during curation. The first
/// candidate in the text with at least one usable pair wins; text that
/// parses but never yields a pair decodes to an empty list.
pub fn decode_selection(raw: &str) -> Result<Vec<CandidateRef>, Unparseable> {
    let usable = parse_with(raw, |value| {
        let picks = selection_pairs(&value);
        (!picks.is_empty()).then_some(picks)
    });

    match usable {
        Ok(picks) => Ok(picks),
        Err(Unparseable) => parse(raw).map(|value| selection_pairs(&value)),
    }
}

fn selection_pairs(value: &Value) -> Vec<CandidateRef> {
    let entries: &[Value] = match value {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("selected")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    };

    entries.iter().filter_map(selection_entry).collect()
}

fn selection_entry(entry: &Value) -> Option<CandidateRef> {
    let slide = entry.get("slide")?.as_u64()?;
    let index = entry.get("index")?.as_u64()?;
    Some(CandidateRef::new(
        u32::try_from(slide).ok()?,
        usize::try_from(index).ok()?,
    ))
}
