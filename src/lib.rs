//! Data-integrity core for turning slide decks into curated study guides.
//!
//! `studyguide-core` provides a two-tier content-addressable cache (whole
//! deck, per rendered slide), a tolerant parser for generative-model
//! output, and a curation engine that validates a ranked selection and
//! falls back deterministically when ranking is unavailable. The model
//! service itself is an injected [`collaborator::Collaborator`].
//!
//! Everything is synchronous and single-threaded; one pipeline writes a
//! given cache directory at a time.

pub mod cache;
pub mod collaborator;
pub mod curation;
pub mod parser;
pub mod pipeline;
pub mod slides;
pub mod types;
