use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_NOTES_PROMPT: &str = "[Your notes:]";
pub const DEFAULT_ORDER_INSTRUCTION: &str = "Arrange in order:";

/// Minimum run of underscores that counts as a blank in a fill-in sentence.
const BLANK_MARKER: &str = "___";

fn default_notes_prompt() -> String {
    DEFAULT_NOTES_PROMPT.to_string()
}

fn default_order_instruction() -> String {
    DEFAULT_ORDER_INSTRUCTION.to_string()
}

/// One generated study question.
///
/// Serialized with an internal `type` tag, which is the shape the
/// collaborator is asked to produce and the shape the cache persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionItem {
    OpenEnded {
        question: String,
        #[serde(default = "default_notes_prompt")]
        notes_prompt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        example_answer: Option<String>,
    },
    ShortAnswer {
        prompt: String,
        answer: String,
    },
    FillInBlank {
        sentence: String,
        answer: String,
    },
    TrueFalse {
        statement: String,
        answer: bool,
    },
    MultipleChoice {
        question: String,
        options: Vec<String>,
        answer: String,
    },
    PutInOrder {
        #[serde(default = "default_order_instruction")]
        instruction: String,
        items: Vec<String>,
        correct_order: Vec<usize>,
    },
}

/// Variant tag of a [`QuestionItem`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    OpenEnded,
    ShortAnswer,
    FillInBlank,
    TrueFalse,
    MultipleChoice,
    PutInOrder,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 6] = [
        QuestionKind::OpenEnded,
        QuestionKind::ShortAnswer,
        QuestionKind::FillInBlank,
        QuestionKind::TrueFalse,
        QuestionKind::MultipleChoice,
        QuestionKind::PutInOrder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::OpenEnded => "open_ended",
            QuestionKind::ShortAnswer => "short_answer",
            QuestionKind::FillInBlank => "fill_in_blank",
            QuestionKind::TrueFalse => "true_false",
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::PutInOrder => "put_in_order",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::OpenEnded => "Open-ended",
            QuestionKind::ShortAnswer => "Short Answer",
            QuestionKind::FillInBlank => "Fill in blank",
            QuestionKind::TrueFalse => "True/False",
            QuestionKind::MultipleChoice => "Multiple Choice",
            QuestionKind::PutInOrder => "Put in order",
        }
    }

    /// Open-ended and short-answer questions form the core of a guide; the
    /// curation policy sets a floor on their share.
    pub fn is_core(&self) -> bool {
        matches!(self, QuestionKind::OpenEnded | QuestionKind::ShortAnswer)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidQuestion {
    #[error("{0} question has empty display text")]
    EmptyText(QuestionKind),
    #[error("fill-in-blank sentence has no blank marker")]
    MissingBlank,
    #[error("multiple-choice answer {0:?} does not match exactly one option label")]
    AnswerNotAnOption(String),
    #[error("put-in-order correct_order is not a permutation of item indices")]
    NotAPermutation,
}

impl QuestionItem {
    /// Degraded item used when collaborator output could not be parsed:
    /// the raw response becomes the question text verbatim.
    pub fn placeholder(raw: &str) -> Self {
        QuestionItem::OpenEnded {
            question: raw.trim().to_string(),
            notes_prompt: default_notes_prompt(),
            example_answer: None,
        }
    }

    pub fn kind(&self) -> QuestionKind {
        match self {
            QuestionItem::OpenEnded { .. } => QuestionKind::OpenEnded,
            QuestionItem::ShortAnswer { .. } => QuestionKind::ShortAnswer,
            QuestionItem::FillInBlank { .. } => QuestionKind::FillInBlank,
            QuestionItem::TrueFalse { .. } => QuestionKind::TrueFalse,
            QuestionItem::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            QuestionItem::PutInOrder { .. } => QuestionKind::PutInOrder,
        }
    }

    /// The main text a reader sees for this question, whatever the variant.
    pub fn display_text(&self) -> &str {
        match self {
            QuestionItem::OpenEnded { question, .. } => question,
            QuestionItem::ShortAnswer { prompt, .. } => prompt,
            QuestionItem::FillInBlank { sentence, .. } => sentence,
            QuestionItem::TrueFalse { statement, .. } => statement,
            QuestionItem::MultipleChoice { question, .. } => question,
            QuestionItem::PutInOrder { instruction, .. } => instruction,
        }
    }

    /// Answer rendered as text. Empty for variants without a single answer.
    pub fn answer_text(&self) -> String {
        match self {
            QuestionItem::ShortAnswer { answer, .. }
            | QuestionItem::FillInBlank { answer, .. }
            | QuestionItem::MultipleChoice { answer, .. } => answer.clone(),
            QuestionItem::TrueFalse { answer, .. } => {
                let label = if *answer { "True" } else { "False" };
                label.to_string()
            }
            QuestionItem::OpenEnded { .. } | QuestionItem::PutInOrder { .. } => String::new(),
        }
    }

    pub fn example_answer(&self) -> Option<&str> {
        match self {
            QuestionItem::OpenEnded { example_answer, .. } => example_answer.as_deref(),
            _ => None,
        }
    }

    /// True for an open-ended question with no usable model answer yet.
    pub fn needs_example_answer(&self) -> bool {
        matches!(self, QuestionItem::OpenEnded { .. })
            && self.example_answer().map_or(true, |a| a.trim().is_empty())
    }

    pub fn set_example_answer(&mut self, answer: impl Into<String>) {
        if let QuestionItem::OpenEnded { example_answer, .. } = self {
            *example_answer = Some(answer.into());
        }
    }

    pub fn options(&self) -> &[String] {
        match self {
            QuestionItem::MultipleChoice { options, .. } => options,
            _ => &[],
        }
    }

    pub fn items(&self) -> &[String] {
        match self {
            QuestionItem::PutInOrder { items, .. } => items,
            _ => &[],
        }
    }

    pub fn correct_order(&self) -> &[usize] {
        match self {
            QuestionItem::PutInOrder { correct_order, .. } => correct_order,
            _ => &[],
        }
    }

    /// Structural checks beyond what deserialization enforces.
    pub fn validate(&self) -> Result<(), InvalidQuestion> {
        if self.display_text().trim().is_empty() {
            return Err(InvalidQuestion::EmptyText(self.kind()));
        }

        match self {
            QuestionItem::FillInBlank { sentence, .. } => {
                if !sentence.contains(BLANK_MARKER) {
                    return Err(InvalidQuestion::MissingBlank);
                }
            }
            QuestionItem::MultipleChoice { options, answer, .. } => {
                let wanted = option_label(answer);
                let matches = options
                    .iter()
                    .filter(|opt| !wanted.is_empty() && option_label(opt) == wanted)
                    .count();
                if matches != 1 {
                    return Err(InvalidQuestion::AnswerNotAnOption(answer.clone()));
                }
            }
            QuestionItem::PutInOrder {
                items,
                correct_order,
                ..
            } => {
                let mut seen = vec![false; items.len()];
                if correct_order.len() != items.len() {
                    return Err(InvalidQuestion::NotAPermutation);
                }
                for &i in correct_order {
                    match seen.get_mut(i) {
                        Some(slot) if !*slot => *slot = true,
                        _ => return Err(InvalidQuestion::NotAPermutation),
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }
}

/// Leading alphanumeric label of an option or answer, uppercased:
/// `"B) Mitosis"` and `"b"` both yield `"B"`.
fn option_label(text: &str) -> String {
    text.trim()
        .chars()
        .take_while(|c| c.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect()
}
