//! Cache key construction
//!
//! Pure functions only. A key binds everything that can change a file's
//! scored output: schema version and fingerprint, file content, global seed
//! and the scoring-relevant configuration. Same key means same output.

use crate::context::RunContext;
use crate::error::ResonanceResult;
use crate::report::SchemaVersion;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Configuration fields that affect scoring output.
///
/// Cache location, verbosity, the cache cap, budget limits and output
/// destination are left out on purpose; changing them must keep cache hits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringFingerprint<'a> {
    pub threshold: f64,
    pub seed: Option<i64>,
    pub jobs: usize,
    pub no_cache: bool,
    pub include_globs: &'a [String],
    pub exclude_globs: &'a [String],
    pub schema_version: SchemaVersion,
    pub reference_sha256: Option<&'a str>,
}

impl<'a> ScoringFingerprint<'a> {
    pub fn from_context(ctx: &'a RunContext) -> Self {
        let config = &ctx.config;
        Self {
            threshold: config.threshold,
            seed: config.seed,
            jobs: config.jobs,
            no_cache: config.no_cache,
            include_globs: &config.include_globs,
            exclude_globs: &config.exclude_globs,
            schema_version: config.schema_version,
            reference_sha256: ctx.reference_hash.as_deref(),
        }
    }

    /// Stable JSON serialization (fixed field order)
    pub fn to_json(&self) -> ResonanceResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Inputs to one cache key
#[derive(Debug, Clone)]
pub struct KeyMaterial<'a> {
    pub schema_version: SchemaVersion,
    pub schema_fingerprint: &'a str,
    pub content_hash: &'a str,
    pub global_seed: i64,
    pub config: ScoringFingerprint<'a>,
}

/// SHA-256 of file content, hex encoded
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Derive the cache key (64 hex chars)
pub fn cache_key(material: &KeyMaterial<'_>) -> ResonanceResult<String> {
    let joined = format!(
        "{}-{}-{}-{}-{}",
        material.schema_version,
        material.schema_fingerprint,
        material.content_hash,
        material.global_seed,
        material.config.to_json()?
    );
    Ok(hex::encode(Sha256::digest(joined.as_bytes())))
}

/// Cache key for a file's content within a run
pub fn key_for(ctx: &RunContext, content: &[u8]) -> ResonanceResult<String> {
    let hash = content_hash(content);
    cache_key(&KeyMaterial {
        schema_version: ctx.config.schema_version,
        schema_fingerprint: &ctx.schema_fingerprint,
        content_hash: &hash,
        global_seed: ctx.global_seed,
        config: ScoringFingerprint::from_context(ctx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolvedConfig;
    use std::path::PathBuf;

    fn ctx_with(config: ResolvedConfig) -> RunContext {
        RunContext::new(config, 123, "")
    }

    fn key(ctx: &RunContext) -> String {
        key_for(ctx, b"the quick fox").unwrap()
    }

    #[test]
    fn key_is_deterministic() {
        let ctx = ctx_with(ResolvedConfig::default());
        let k = key(&ctx);
        assert_eq!(k.len(), 64);
        assert_eq!(k, key(&ctx_with(ResolvedConfig::default())));
    }

    #[test]
    fn content_changes_key() {
        let ctx = ctx_with(ResolvedConfig::default());
        assert_ne!(
            key_for(&ctx, b"one").unwrap(),
            key_for(&ctx, b"two").unwrap()
        );
    }

    #[test]
    fn schema_version_changes_key() {
        let base = key(&ctx_with(ResolvedConfig::default()));
        let v11 = key(&ctx_with(ResolvedConfig {
            schema_version: SchemaVersion::V1_1,
            ..Default::default()
        }));
        assert_ne!(base, v11);
    }

    #[test]
    fn scoring_fields_change_key() {
        let base = key(&ctx_with(ResolvedConfig::default()));
        let variants = [
            ResolvedConfig {
                threshold: 0.9,
                ..Default::default()
            },
            ResolvedConfig {
                jobs: 4,
                ..Default::default()
            },
            ResolvedConfig {
                include_globs: vec!["*.rs".to_string()],
                ..Default::default()
            },
        ];
        for config in variants {
            assert_ne!(base, key(&ctx_with(config)));
        }
    }

    #[test]
    fn non_scoring_fields_keep_key() {
        let base = key(&ctx_with(ResolvedConfig::default()));
        let variants = [
            ResolvedConfig {
                verbose: true,
                ..Default::default()
            },
            ResolvedConfig {
                cache_dir: PathBuf::from("/elsewhere"),
                ..Default::default()
            },
            ResolvedConfig {
                max_cache_size_mb: 1,
                max_file_count: 3,
                max_total_bytes: 9,
                max_file_size_bytes: 9,
                clear_cache: true,
                ..Default::default()
            },
        ];
        for config in variants {
            assert_eq!(base, key(&ctx_with(config)));
        }
    }

    #[test]
    fn seed_and_reference_change_key() {
        let config = ResolvedConfig::default();
        let a = key_for(&RunContext::new(config.clone(), 1, ""), b"x").unwrap();
        let b = key_for(&RunContext::new(config.clone(), 2, ""), b"x").unwrap();
        let c = key_for(&RunContext::new(config, 1, "reference words"), b"x").unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
