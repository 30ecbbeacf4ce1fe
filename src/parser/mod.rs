//! Tolerant parsing of collaborator output.
//!
//! The collaborator is a text generator, not a grammar producer: its JSON
//! arrives wrapped in fences, embedded in prose, or with small syntax
//! defects. [`parse`] tries a fixed sequence of recoveries and reports
//! [`Unparseable`] only when all of them fail. It never panics.

pub mod decode;
pub mod fence;
pub mod repair;
pub mod scan;

use serde_json::Value;
use thiserror::Error;

pub use decode::{decode_questions, decode_selection, try_decode_questions, DecodedQuestions};
pub use fence::strip_fence;
pub use repair::repair;
pub use scan::balanced_blocks;

/// Collaborator text that yielded no JSON value even after repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("collaborator output is not valid JSON")]
pub struct Unparseable;

/// Parse collaborator text into a JSON value.
///
/// Order of attempts:
/// 1. the trimmed text, with a fenced block's interior taken if present;
/// 2. each balanced brace/bracket block of the trimmed text;
/// 3. the repaired form of (1);
/// 4. each balanced block of that repaired form.
pub fn parse(raw: &str) -> Result<Value, Unparseable> {
    parse_with(raw, Some)
}

/// Like [`parse`], but a candidate only counts once `accept` maps it to a
/// value. Lets callers skip JSON that parses but has the wrong shape, such
/// as a `[2]` in prose ahead of the real object.
pub fn parse_with<T, F>(raw: &str, mut accept: F) -> Result<T, Unparseable>
where
    F: FnMut(Value) -> Option<T>,
{
    let mut attempt = |text: &str| try_json(text).and_then(&mut accept);

    let trimmed = raw.trim();
    let candidate = strip_fence(trimmed);

    if let Some(value) = attempt(candidate) {
        return Ok(value);
    }

    if let Some(value) = balanced_blocks(trimmed).find_map(&mut attempt) {
        return Ok(value);
    }

    let repaired = repair(candidate);
    if let Some(value) = attempt(&repaired) {
        return Ok(value);
    }

    let recovered = balanced_blocks(&repaired).find_map(&mut attempt);
    recovered.ok_or(Unparseable)
}

fn try_json(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}
