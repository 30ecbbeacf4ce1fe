use super::request::SlidePurpose;
use crate::types::{QuestionItem, QuestionKind};

const SYSTEM_SUMMARY: &str =
    "You analyze lecture slides and extract their key information concisely.";
const SYSTEM_QUESTIONS: &str = "You are an educator writing study-guide questions from lecture slides. \
     Favor questions that make students engage actively with the material.";
const SYSTEM_VERIFY: &str = "You check study-guide answers against the slide they were written from.";
const SYSTEM_EXAMPLE: &str = "You write model answers for study-guide questions.";

pub const SYSTEM_RANKING: &str = "You are choosing questions for a student note-taking guide of about two pages \
     (three at most). Pick the mix of questions that best supports learning.";

const QUESTION_FORMATS: &str = r#"Question formats (use the "type" tag exactly):
- {"type": "open_ended", "question": "...", "example_answer": "2-3 sentence model answer", "notes_prompt": "[Your notes:]"}
- {"type": "short_answer", "prompt": "What does XYZ stand for?", "answer": "..."}
- {"type": "fill_in_blank", "sentence": "The _____ is ...", "answer": "..."}
- {"type": "true_false", "statement": "...", "answer": true}
- {"type": "multiple_choice", "question": "...", "options": ["A) ...", "B) ...", "C) ...", "D) ..."], "answer": "B"}
- {"type": "put_in_order", "instruction": "Arrange in order:", "items": ["...", "..."], "correct_order": [1, 0]}"#;

pub(crate) fn system_prompt(purpose: SlidePurpose) -> &'static str {
    match purpose {
        SlidePurpose::IntroSummary | SlidePurpose::OutroSummary => SYSTEM_SUMMARY,
        SlidePurpose::Questions | SlidePurpose::Regenerate => SYSTEM_QUESTIONS,
        SlidePurpose::VerifyAnswers => SYSTEM_VERIFY,
        SlidePurpose::ExampleAnswer => SYSTEM_EXAMPLE,
    }
}

pub(crate) fn max_tokens(purpose: SlidePurpose) -> u32 {
    match purpose {
        SlidePurpose::IntroSummary | SlidePurpose::OutroSummary => 1000,
        SlidePurpose::Questions | SlidePurpose::Regenerate => 2500,
        SlidePurpose::VerifyAnswers => 2000,
        SlidePurpose::ExampleAnswer => 500,
    }
}

fn with_instructor_context(mut prompt: String, custom: Option<&str>) -> String {
    if let Some(extra) = custom.map(str::trim).filter(|s| !s.is_empty()) {
        prompt.push_str("\n\nAdditional context from instructor: ");
        prompt.push_str(extra);
    }
    prompt
}

/// Three questions per content slide, one of them open-ended.
pub fn questions_instruction(custom: Option<&str>) -> String {
    let prompt = format!(
        r#"Study this lecture slide, including any charts, graphs or diagrams.

Write exactly 3 questions for a student note-taking guide:
1. One open_ended question (required) that asks for critical thinking about the content.
2. Two more questions of whichever types below fit the content best.

Preferred types, highest first: open_ended, short_answer (acronyms, definitions, key terms),
fill_in_blank, true_false, multiple_choice (only for genuinely different conceptual
alternatives, never for acronyms or simple definitions), put_in_order (processes, sequences).

{QUESTION_FORMATS}

Every open_ended question must carry an "example_answer" drawn from the slide.
Reply with ONLY a JSON object of the form {{"questions": [...]}} and no other text."#
    );
    with_instructor_context(prompt, custom)
}

/// Exactly one question per requested kind.
pub fn regenerate_instruction(kinds: &[QuestionKind], custom: Option<&str>) -> String {
    let wanted: Vec<String> = kinds
        .iter()
        .map(|kind| format!("- {}: {}", kind.as_str(), kind_hint(*kind)))
        .collect();

    let prompt = format!(
        r#"Study this lecture slide and write exactly {count} question(s), using ONLY these types:
{wanted}

{QUESTION_FORMATS}

Every open_ended question must carry an "example_answer".
Reply with ONLY a JSON object of the form {{"questions": [...]}}."#,
        count = kinds.len(),
        wanted = wanted.join("\n"),
    );
    with_instructor_context(prompt, custom)
}

fn kind_hint(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::OpenEnded => "a thought-provoking question that calls for critical thinking",
        QuestionKind::ShortAnswer => "an acronym, definition or term the student answers briefly",
        QuestionKind::FillInBlank => "a sentence with one key term replaced by _____",
        QuestionKind::TrueFalse => "a statement that is clearly true or clearly false",
        QuestionKind::MultipleChoice => "a question with four options A-D and one correct answer",
        QuestionKind::PutInOrder => "3-5 items to arrange in their correct sequence",
    }
}

pub fn intro_instruction() -> String {
    "Write a 1-2 sentence overview of this introductory slide: its topic or title and the main \
     learning objectives. Plain text only, no markdown, bullets or other formatting."
        .to_string()
}

pub fn outro_instruction() -> String {
    "Write a 1-2 sentence summary of the key takeaways on this concluding slide. \
     Plain text only, no markdown, bullets or other formatting."
        .to_string()
}

pub fn verification_instruction(questions: &[QuestionItem]) -> Result<String, serde_json::Error> {
    let current = serde_json::to_string_pretty(questions)?;
    Ok(format!(
        r#"Check each answer below against this slide. Correct any answer the slide contradicts.

Current questions and answers:
{current}

Keep every field, including "example_answer" on open_ended questions; add or improve an
example answer where it is missing or weak. If everything is correct, return the questions
unchanged. Reply with ONLY JSON of the form {{"questions": [...]}}."#
    ))
}

pub fn example_answer_instruction(question: &str) -> String {
    format!(
        "Using this slide, write a 2-3 sentence model answer a student might give to this \
         open-ended question:\n\nQuestion: {question}\n\nReply with the answer text only."
    )
}
