use crate::types::Digest;

/// An uploaded deck, keyed by the digest of its raw encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub name: String,
    pub digest: Digest,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    /// The digest is computed here, once per upload.
    pub fn ingest(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let digest = Digest::of_bytes(&bytes);
        Self {
            name: name.into(),
            digest,
            bytes,
        }
    }
}
