use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::CacheConfig;
use crate::curation::InclusionPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid pipeline config in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Orchestrator settings. Fields missing from a config file take their
/// `v0()` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub cache_dir: PathBuf,
    pub cache: CacheConfig,
    pub generate_intro: bool,
    pub generate_outro: bool,
    pub intro_slide_count: usize,
    pub outro_slide_count: usize,
    pub verify_answers: bool,
    pub fill_example_answers: bool,
    pub custom_instructions: Option<String>,
    pub inclusion: InclusionPolicy,
}

impl PipelineConfig {
    pub fn v0() -> Self {
        Self {
            cache_dir: PathBuf::from("analysis_cache"),
            cache: CacheConfig::v0(),
            generate_intro: true,
            generate_outro: true,
            intro_slide_count: 3,
            outro_slide_count: 3,
            verify_answers: true,
            fill_example_answers: true,
            custom_instructions: None,
            inclusion: InclusionPolicy::default(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Slide windows for a deck of `total` slides, as 0-based index ranges.
    ///
    /// A summary window only exists while that summary is enabled. Content
    /// slides sit between the windows; in short decks the windows may
    /// overlap and leave no content slides.
    pub fn windows(&self, total: usize) -> SlideWindows {
        let intro_len = if self.generate_intro {
            self.intro_slide_count.min(total)
        } else {
            0
        };
        let outro_start = if self.generate_outro {
            total.saturating_sub(self.outro_slide_count)
        } else {
            total
        };

        SlideWindows {
            intro: 0..intro_len,
            content: intro_len..outro_start.max(intro_len),
            outro: outro_start..total,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::v0()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideWindows {
    pub intro: std::ops::Range<usize>,
    pub content: std::ops::Range<usize>,
    pub outro: std::ops::Range<usize>,
}
