pub mod identifiers;
pub mod question;
pub mod record;

pub use identifiers::{CandidateRef, Digest, DIGEST_LENGTH};
pub use question::{InvalidQuestion, QuestionItem, QuestionKind, DEFAULT_NOTES_PROMPT};
pub use record::{AnalysisRecord, QuestionMap};
