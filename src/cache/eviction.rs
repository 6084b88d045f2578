//! Size-based cache eviction
//!
//! `plan_eviction` is a pure function over a directory listing; `evict`
//! lists the directory and deletes what the plan selects.

use crate::error::{ResonanceError, ResonanceResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tracing::debug;

/// One file in the cache directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheFile {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

/// Pick files to delete, oldest-modified first, until the total fits the
/// cap. Nothing is selected when the listing already fits.
pub fn plan_eviction(listing: &[CacheFile], cap_bytes: u64) -> Vec<PathBuf> {
    let mut total: u64 = listing.iter().map(|f| f.size).sum();
    if total <= cap_bytes {
        return Vec::new();
    }

    let mut by_age: Vec<&CacheFile> = listing.iter().collect();
    by_age.sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path)));

    let mut doomed = Vec::new();
    for file in by_age {
        if total <= cap_bytes {
            break;
        }
        total -= file.size;
        doomed.push(file.path.clone());
    }
    doomed
}

/// List regular files in the cache directory. A missing directory is empty.
pub async fn list_entries(dir: &Path) -> ResonanceResult<Vec<CacheFile>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(ResonanceError::io(
                format!("reading cache directory {}", dir.display()),
                e,
            ))
        }
    };

    let mut listing = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ResonanceError::io("reading cache entry", e))?
    {
        // entries can vanish under a concurrent eviction
        let Ok(meta) = entry.metadata().await else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        listing.push(CacheFile {
            path: entry.path(),
            size: meta.len(),
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        });
    }
    Ok(listing)
}

/// Evict until the directory fits `cap_bytes`; returns files removed
pub async fn evict(dir: &Path, cap_bytes: u64) -> ResonanceResult<usize> {
    let listing = list_entries(dir).await?;
    let doomed = plan_eviction(&listing, cap_bytes);

    let mut removed = 0;
    for path in doomed {
        match fs::remove_file(&path).await {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ResonanceError::io(
                    format!("evicting cache entry {}", path.display()),
                    e,
                ))
            }
        }
    }

    if removed > 0 {
        debug!("Evicted {} cache entries from {}", removed, dir.display());
    }
    Ok(removed)
}
