use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::tier::JsonTier;
use super::versioning::CacheConfig;
use crate::types::{AnalysisRecord, CandidateRef, Digest, QuestionItem};

pub const DOCUMENT_TIER_FILE: &str = "documents.json";
pub const SLIDE_TIER_FILE: &str = "slides.json";
pub const CONFIG_FILE: &str = "cache_config.json";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Value stored in the whole-document tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub record: AnalysisRecord,
    /// Curated selection at the last checkpoint; `None` if never curated.
    #[serde(default)]
    pub selected: Option<Vec<CandidateRef>>,
    /// Slides holding a placeholder instead of parsed questions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<u32>,
    pub stored_at: DateTime<Utc>, // informational only
}

/// Two-tier content-addressable cache.
///
/// The document tier replays a whole session for an unmodified re-upload.
/// The slide tier is keyed by rendered pixel content and shared by every
/// deck, so an edited deck only misses on the slides that changed.
#[derive(Debug)]
pub struct ContentCache {
    root: PathBuf,
    documents: JsonTier<DocumentEntry>,
    slides: JsonTier<Vec<QuestionItem>>,
}

impl ContentCache {
    /// Open (or create) a cache rooted at `root`.
    ///
    /// If the persisted config differs from `config`, both tiers are
    /// cleared before use.
    pub fn open(root: impl Into<PathBuf>, config: CacheConfig) -> Result<Self, CacheError> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        let cache = Self {
            documents: JsonTier::new(root.join(DOCUMENT_TIER_FILE)),
            slides: JsonTier::new(root.join(SLIDE_TIER_FILE)),
            root,
        };

        // Only written when missing or stale.
        let config_path = cache.root.join(CONFIG_FILE);
        let fresh = !config_path.exists();
        if !config.matches_persisted(&config_path) {
            info!(root = %cache.root.display(), "dropping cache written under a different config");
            cache.documents.clear()?;
            cache.slides.clear()?;
            config.persist(&config_path)?;
        } else if fresh {
            config.persist(&config_path)?;
        }

        Ok(cache)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document_digest(bytes: &[u8]) -> Digest {
        Digest::of_bytes(bytes)
    }

    pub fn slide_digest(pixels: &[u8]) -> Digest {
        Digest::of_pixels(pixels)
    }

    pub fn lookup_document(&self, digest: &Digest) -> Option<AnalysisRecord> {
        self.lookup_document_entry(digest).map(|entry| entry.record)
    }

    pub fn lookup_document_entry(&self, digest: &Digest) -> Option<DocumentEntry> {
        let hit = self.documents.get(digest);
        debug!(digest = %digest, hit = hit.is_some(), "document tier lookup");
        hit
    }

    /// Store a record with no selection attached.
    pub fn store_document(&self, digest: &Digest, record: &AnalysisRecord) -> Result<(), CacheError> {
        self.put_document(digest, record, None, Vec::new())
    }

    pub fn store_document_with_selection(
        &self,
        digest: &Digest,
        record: &AnalysisRecord,
        selected: &BTreeSet<CandidateRef>,
    ) -> Result<(), CacheError> {
        self.put_document(digest, record, Some(selected.iter().copied().collect()), Vec::new())
    }

    /// Store a session checkpoint: record, selection and degraded slides.
    pub fn store_checkpoint(
        &self,
        digest: &Digest,
        record: &AnalysisRecord,
        selected: &BTreeSet<CandidateRef>,
        degraded: &BTreeSet<u32>,
    ) -> Result<(), CacheError> {
        self.put_document(
            digest,
            record,
            Some(selected.iter().copied().collect()),
            degraded.iter().copied().collect(),
        )
    }

    fn put_document(
        &self,
        digest: &Digest,
        record: &AnalysisRecord,
        selected: Option<Vec<CandidateRef>>,
        degraded: Vec<u32>,
    ) -> Result<(), CacheError> {
        let entry = DocumentEntry {
            record: record.clone(),
            selected,
            degraded,
            stored_at: Utc::now(),
        };
        self.documents.put(digest.clone(), entry)
    }

    /// An empty stored list counts as a miss.
    pub fn lookup_slide(&self, digest: &Digest) -> Option<Vec<QuestionItem>> {
        let hit = self.slides.get(digest).filter(|qs| !qs.is_empty());
        debug!(digest = %digest, hit = hit.is_some(), "slide tier lookup");
        hit
    }

    pub fn store_slide(&self, digest: &Digest, questions: &[QuestionItem]) -> Result<(), CacheError> {
        self.slides.put(digest.clone(), questions.to_vec())
    }

    /// Clear both tiers.
    pub fn invalidate_all(&self) -> Result<(), CacheError> {
        self.documents.clear()?;
        self.slides.clear()?;
        info!(root = %self.root.display(), "cache invalidated");
        Ok(())
    }

    pub fn document_count(&self) -> usize {
        self.documents.load().len()
    }

    pub fn slide_count(&self) -> usize {
        self.slides.load().len()
    }
}
