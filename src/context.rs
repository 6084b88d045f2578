//! Per-run context shared read-only by every worker

use crate::config::ResolvedConfig;
use crate::error::{ResonanceError, ResonanceResult};
use crate::scoring::ScoringEngine;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use tracing::debug;

/// Everything a run needs after configuration is resolved.
///
/// Built once before discovery and never mutated; workers receive it behind
/// an `Arc`.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: ResolvedConfig,
    /// Configured seed, or the Unix time at startup
    pub global_seed: i64,
    pub engine: ScoringEngine,
    /// SHA-256 of the reference text, if one is configured
    pub reference_hash: Option<String>,
    /// SHA-256 of the active report schema document
    pub schema_fingerprint: String,
}

impl RunContext {
    /// Resolve the global seed and load the reference text
    pub async fn prepare(config: ResolvedConfig) -> ResonanceResult<Self> {
        let global_seed = config.seed.unwrap_or_else(unix_seconds);
        debug!("Global seed: {}", global_seed);

        let reference_text = match &config.reference {
            Some(path) => fs::read_to_string(path)
                .await
                .map_err(|source| ResonanceError::ReferenceRead {
                    path: path.clone(),
                    source,
                })?,
            None => String::new(),
        };

        Ok(Self::new(config, global_seed, &reference_text))
    }

    pub fn new(config: ResolvedConfig, global_seed: i64, reference_text: &str) -> Self {
        let reference_hash =
            (!reference_text.is_empty()).then(|| hex::encode(Sha256::digest(reference_text)));
        let schema_fingerprint = config.schema_version.fingerprint();

        Self {
            engine: ScoringEngine::new(reference_text),
            config,
            global_seed,
            reference_hash,
            schema_fingerprint,
        }
    }

    /// Companion seed for one file, derived from the global seed and path
    pub fn file_seed(&self, path: &str) -> u64 {
        let digest = Sha256::digest(path.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(prefix) ^ (self.global_seed as u64)
    }
}

fn unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn explicit_seed_is_kept() {
        let config = ResolvedConfig {
            seed: Some(42),
            ..Default::default()
        };
        let ctx = RunContext::prepare(config).await.unwrap();
        assert_eq!(ctx.global_seed, 42);
        assert!(!ctx.engine.has_reference());
        assert!(ctx.reference_hash.is_none());
    }

    #[tokio::test]
    async fn loads_reference_text() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ref.txt");
        std::fs::write(&path, "the slow fox").unwrap();

        let config = ResolvedConfig {
            reference: Some(path),
            ..Default::default()
        };
        let ctx = RunContext::prepare(config).await.unwrap();
        assert!(ctx.engine.has_reference());
        assert_eq!(ctx.reference_hash.as_ref().map(String::len), Some(64));
    }

    #[tokio::test]
    async fn missing_reference_is_error() {
        let config = ResolvedConfig {
            reference: Some(PathBuf::from("/nonexistent/reference.txt")),
            ..Default::default()
        };
        let err = RunContext::prepare(config).await.unwrap_err();
        assert!(matches!(err, ResonanceError::ReferenceRead { .. }));
    }

    #[test]
    fn file_seed_is_stable_per_path() {
        let ctx = RunContext::new(ResolvedConfig::default(), 7, "");
        assert_eq!(ctx.file_seed("a.txt"), ctx.file_seed("a.txt"));
        assert_ne!(ctx.file_seed("a.txt"), ctx.file_seed("b.txt"));

        let other = RunContext::new(ResolvedConfig::default(), 8, "");
        assert_ne!(ctx.file_seed("a.txt"), other.file_seed("a.txt"));
    }
}
