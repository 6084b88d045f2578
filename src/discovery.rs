//! Input discovery
//!
//! Turns `--input` arguments into the ordered list of files to score.
//! Explicit files are kept as given; directories are walked recursively and
//! filtered through the include/exclude globs. Only metadata is read here.
//! The walk is blocking; async callers go through `discover_files`.

use crate::error::{ResonanceError, ResonanceResult};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A file selected for scoring, with its size from metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub size: u64,
}

impl DiscoveredFile {
    /// Path as written into reports
    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// Include/exclude filter applied to walked files.
///
/// Patterns match the path relative to the walked directory; `*` also
/// matches `/`.
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl PathFilter {
    pub fn new(include: &[String], exclude: &[String]) -> ResonanceResult<Self> {
        Ok(Self {
            include: build_set(include)?,
            exclude: build_set(exclude)?,
        })
    }

    pub fn accepts(&self, relative: &Path) -> bool {
        let included = self
            .include
            .as_ref()
            .is_none_or(|set| set.is_match(relative));
        let excluded = self
            .exclude
            .as_ref()
            .is_some_and(|set| set.is_match(relative));
        included && !excluded
    }
}

fn build_set(patterns: &[String]) -> ResonanceResult<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ResonanceError::GlobInvalid {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        builder.add(glob);
    }
    let set = builder.build().map_err(|e| ResonanceError::GlobInvalid {
        pattern: patterns.join(", "),
        reason: e.to_string(),
    })?;
    Ok(Some(set))
}

/// Run `discover` on the blocking thread pool
pub async fn discover_files(
    inputs: Vec<PathBuf>,
    include: Vec<String>,
    exclude: Vec<String>,
) -> ResonanceResult<Vec<DiscoveredFile>> {
    tokio::task::spawn_blocking(move || discover(&inputs, &include, &exclude))
        .await
        .map_err(|e| ResonanceError::TaskFailed(format!("discovery: {}", e)))?
}

/// Expand inputs into files, in argument order then walk order.
///
/// Missing or unreadable inputs are logged and skipped. A file reached
/// twice is kept once.
pub fn discover(
    inputs: &[PathBuf],
    include: &[String],
    exclude: &[String],
) -> ResonanceResult<Vec<DiscoveredFile>> {
    let filter = PathFilter::new(include, exclude)?;
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for input in inputs {
        let meta = match std::fs::metadata(input) {
            Ok(meta) => meta,
            Err(e) => {
                warn!("Skipping input {}: {}", input.display(), e);
                continue;
            }
        };

        if meta.is_file() {
            if seen.insert(input.clone()) {
                files.push(DiscoveredFile {
                    path: input.clone(),
                    size: meta.len(),
                });
            }
            continue;
        }

        if meta.is_dir() {
            walk_dir(input, &filter, &mut seen, &mut files);
        }
    }

    debug!("Discovered {} input files", files.len());
    Ok(files)
}

fn walk_dir(
    root: &Path,
    filter: &PathFilter,
    seen: &mut HashSet<PathBuf>,
    files: &mut Vec<DiscoveredFile>,
) {
    let walker = WalkDir::new(root).sort_by_file_name().into_iter();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if !filter.accepts(relative) {
            continue;
        }

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };

        let path = entry.into_path();
        if seen.insert(path.clone()) {
            files.push(DiscoveredFile { path, size });
        }
    }
}

/// Sum of discovered file sizes
pub fn total_bytes(files: &[DiscoveredFile]) -> u64 {
    files.iter().map(|f| f.size).sum()
}
