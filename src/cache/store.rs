//! On-disk result cache

use crate::cache::eviction;
use crate::error::{ResonanceError, ResonanceResult};
use crate::models::FileResult;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Trace stamped on results served from the cache
pub const TRACE_CACHE_HIT: &str = "Cache hit.";

/// Content-addressed store of per-file results, one JSON file per key.
///
/// Readers tolerate missing or corrupt entries (treated as misses). Writes
/// trigger a size-cap eviction pass.
#[derive(Debug, Clone)]
pub struct CacheStore {
    cache_dir: PathBuf,
    cap_bytes: u64,
}

impl CacheStore {
    pub fn new(cache_dir: impl Into<PathBuf>, cap_bytes: u64) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            cap_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Look up a cached result. Any read or parse failure is a miss.
    pub async fn get(&self, key: &str) -> Option<FileResult> {
        let path = self.entry_path(key);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Ignoring unreadable cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<FileResult>(&content) {
            Ok(result) => {
                debug!("Cache hit {}", key);
                Some(result)
            }
            Err(e) => {
                warn!("Ignoring corrupt cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Look up a cached result and restamp it for the requesting path
    pub async fn get_for(&self, key: &str, path: &str) -> Option<FileResult> {
        self.get(key).await.map(|mut hit| {
            hit.path = path.to_string();
            hit.trace = TRACE_CACHE_HIT.to_string();
            hit
        })
    }

    /// Store a result, then evict down to the size cap
    pub async fn put(&self, key: &str, result: &FileResult) -> ResonanceResult<()> {
        fs::create_dir_all(&self.cache_dir).await.map_err(|e| {
            ResonanceError::io(
                format!("creating cache directory {}", self.cache_dir.display()),
                e,
            )
        })?;

        let path = self.entry_path(key);
        let content = serde_json::to_string_pretty(result)?;
        fs::write(&path, content)
            .await
            .map_err(|e| ResonanceError::io(format!("writing cache file {}", path.display()), e))?;

        debug!("Cached result for {} as {}", result.path, key);
        eviction::evict(&self.cache_dir, self.cap_bytes).await?;
        Ok(())
    }

    /// Delete every entry; returns the number removed
    pub async fn clear(&self) -> ResonanceResult<usize> {
        let clear_err = |source: std::io::Error| ResonanceError::CacheClear {
            path: self.cache_dir.clone(),
            source,
        };

        let mut entries = match fs::read_dir(&self.cache_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(clear_err(e)),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await.map_err(clear_err)? {
            let path = entry.path();
            let is_dir = entry.file_type().await.map_err(clear_err)?.is_dir();
            let result = if is_dir {
                fs::remove_dir_all(&path).await
            } else {
                fs::remove_file(&path).await
            };
            match result {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(clear_err(e)),
            }
        }

        debug!("Cleared {} entries from {}", removed, self.cache_dir.display());
        Ok(removed)
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }
}
