//! Result caching
//!
//! Per-file results are stored as JSON under the cache directory, keyed by a
//! hash of everything that affects scoring:
//! - `key`: pure cache-key derivation
//! - `store`: read/write/clear of entries
//! - `eviction`: oldest-first trimming to the size cap

pub mod eviction;
pub mod key;
pub mod store;

pub use key::{cache_key, content_hash, key_for, KeyMaterial, ScoringFingerprint};
pub use store::{CacheStore, TRACE_CACHE_HIT};
