pub mod store;
pub mod tier;
pub mod versioning;

pub use store::{CacheError, ContentCache, DocumentEntry};
pub use tier::JsonTier;
pub use versioning::CacheConfig;
