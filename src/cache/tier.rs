use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::store::CacheError;
use crate::types::Digest;

/// One cache tier: a single JSON object mapping digest to value, rewritten
/// in full on every update.
///
/// Reads are fail-open. A missing, unreadable or undeserializable file
/// loads as an empty mapping. Writers are not coordinated; one process
/// writes a given tier at a time.
#[derive(Debug, Clone)]
pub struct JsonTier<V> {
    path: PathBuf,
    _value: PhantomData<fn() -> V>,
}

impl<V> JsonTier<V>
where
    V: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _value: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> BTreeMap<Digest, V> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cache tier unreadable, treating as empty");
                return BTreeMap::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cache tier corrupted, treating as empty");
                BTreeMap::new()
            }
        }
    }

    pub fn get(&self, key: &Digest) -> Option<V> {
        self.load().remove(key)
    }

    /// Read-modify-write of the whole mapping.
    pub fn put(&self, key: Digest, value: V) -> Result<(), CacheError> {
        let mut entries = self.load();
        entries.insert(key, value);
        self.save(&entries)
    }

    /// Write the mapping to a sibling temp file, then rename over the tier.
    pub fn save(&self, entries: &BTreeMap<Digest, V>) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        let f = fs::File::create(&temp_path)?;
        // BTreeMap keeps keys sorted, so identical content writes identical bytes
        serde_json::to_writer_pretty(&f, entries)?;
        f.sync_all()?;

        fs::rename(&temp_path, &self.path)?;
        debug!(path = %self.path.display(), entries = entries.len(), "cache tier written");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), CacheError> {
        for path in [self.path.clone(), self.temp_path()] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}
