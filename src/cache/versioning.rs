use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use super::store::CacheError;

// Persisted next to the tiers. A mismatch on open means the tiers were
// written under different keying rules and are dropped.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CacheConfig {
    pub version: String,
    pub hash_algorithm: String,
}

impl CacheConfig {
    pub fn v0() -> Self {
        Self {
            version: "1".into(),
            hash_algorithm: "sha256-64".into(),
        }
    }

    /// Whether the config persisted at `path` matches `self`.
    ///
    /// A missing file matches (fresh cache). An unreadable or corrupt file
    /// does not.
    pub(crate) fn matches_persisted(&self, path: &Path) -> bool {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cache config unreadable");
                return false;
            }
        };

        match serde_json::from_slice::<CacheConfig>(&bytes) {
            Ok(persisted) if &persisted == self => true,
            Ok(persisted) => {
                info!(
                    persisted = %persisted.version,
                    current = %self.version,
                    "cache config changed"
                );
                false
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cache config corrupted");
                false
            }
        }
    }
}

impl CacheConfig {
    /// Write the config next to the tiers: temp sibling, `sync_all`, rename.
    /// An interrupted write leaves the previous file in place.
    pub(crate) fn persist(&self, path: &Path) -> Result<(), CacheError> {
        let temp_path = path.with_extension("json.tmp");
        let f = fs::File::create(&temp_path)?;
        serde_json::to_writer_pretty(&f, self)?;
        f.sync_all()?;

        fs::rename(&temp_path, path)?;
        debug!(path = %path.display(), version = %self.version, "cache config written");
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::v0()
    }
}
