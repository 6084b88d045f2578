//! Configuration schema for resonance-guard
//!
//! A run is configured by one `ResolvedConfig`. Every override source
//! (config file, environment, command line) produces a `ConfigPatch`, and
//! patches are applied to the defaults in a fixed order.

use crate::budget::BudgetLimits;
use crate::error::{ResonanceError, ResonanceResult};
use crate::report::SchemaVersion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_THRESHOLD: f64 = 0.6;
pub const DEFAULT_JOBS: usize = 1;
pub const DEFAULT_CACHE_DIR: &str = ".rescache";
pub const DEFAULT_MAX_CACHE_SIZE_MB: u64 = 200;
pub const DEFAULT_MAX_FILE_COUNT: usize = 500;
pub const DEFAULT_MAX_TOTAL_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 1024 * 1024;

/// Where a configuration value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Built-in default
    #[serde(rename = "Default")]
    Default,
    /// `.resonance.toml` in the working directory
    #[serde(rename = "Config_File")]
    File,
    /// `RESONANCE_*` environment variables
    #[serde(rename = "Environment")]
    Environment,
    /// Explicit command-line flag
    #[serde(rename = "CLI")]
    CommandLine,
}

impl ConfigSource {
    /// Label written to `overall.threshold_source`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::File => "Config_File",
            Self::Environment => "Environment",
            Self::CommandLine => "CLI",
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved configuration, immutable for the rest of the run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    /// Minimum overall score for a successful run
    pub threshold: f64,

    /// Global seed; the current time is used when unset
    pub seed: Option<i64>,

    /// Number of files scored concurrently
    pub jobs: usize,

    /// Result cache directory
    pub cache_dir: PathBuf,

    /// Disable the result cache
    pub no_cache: bool,

    /// Remove all cache entries before scoring
    pub clear_cache: bool,

    /// Cache size cap in megabytes
    pub max_cache_size_mb: u64,

    /// Maximum number of discovered files
    pub max_file_count: usize,

    /// Maximum sum of discovered file sizes
    pub max_total_bytes: u64,

    /// Maximum size of a single file
    pub max_file_size_bytes: u64,

    /// Globs a walked file must match (any)
    pub include_globs: Vec<String>,

    /// Globs that drop a walked file
    pub exclude_globs: Vec<String>,

    /// Output schema version
    pub schema_version: SchemaVersion,

    /// Human-readable progress on stderr
    pub verbose: bool,

    /// Reference text file; self-resonance when unset
    pub reference: Option<PathBuf>,

    /// Layer that last set `threshold`
    pub threshold_source: ConfigSource,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            seed: None,
            jobs: DEFAULT_JOBS,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            no_cache: false,
            clear_cache: false,
            max_cache_size_mb: DEFAULT_MAX_CACHE_SIZE_MB,
            max_file_count: DEFAULT_MAX_FILE_COUNT,
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            include_globs: Vec::new(),
            exclude_globs: Vec::new(),
            schema_version: SchemaVersion::default(),
            verbose: false,
            reference: None,
            threshold_source: ConfigSource::Default,
        }
    }
}

impl ResolvedConfig {
    /// Apply one override layer. Every field present in the patch replaces
    /// the current value outright.
    pub fn apply(&mut self, patch: ConfigPatch, source: ConfigSource) -> ResonanceResult<()> {
        if let Some(threshold) = patch.threshold {
            self.threshold = threshold;
            self.threshold_source = source;
        }
        if let Some(seed) = patch.seed {
            self.seed = Some(seed);
        }
        if let Some(jobs) = patch.jobs {
            self.jobs = jobs;
        }
        if let Some(dir) = patch.cache_dir {
            self.cache_dir = dir;
        }
        if let Some(v) = patch.no_cache {
            self.no_cache = v;
        }
        if let Some(v) = patch.clear_cache {
            self.clear_cache = v;
        }
        if let Some(v) = patch.max_cache_size_mb {
            self.max_cache_size_mb = v;
        }
        if let Some(v) = patch.max_file_count {
            self.max_file_count = v;
        }
        if let Some(v) = patch.max_total_bytes {
            self.max_total_bytes = v;
        }
        if let Some(v) = patch.max_file_size_bytes {
            self.max_file_size_bytes = v;
        }
        if let Some(globs) = patch.include_globs {
            self.include_globs = globs;
        }
        if let Some(globs) = patch.exclude_globs {
            self.exclude_globs = globs;
        }
        if let Some(version) = patch.schema_version {
            self.schema_version = version.parse()?;
        }
        if let Some(v) = patch.verbose {
            self.verbose = v;
        }
        if let Some(path) = patch.reference {
            self.reference = Some(path);
        }
        Ok(())
    }

    /// Check cross-field constraints after all layers are merged
    pub fn validate(&self) -> ResonanceResult<()> {
        if self.jobs == 0 {
            return Err(ResonanceError::config_value("jobs", "must be at least 1"));
        }
        if !self.threshold.is_finite() {
            return Err(ResonanceError::config_value(
                "threshold",
                "must be a finite number",
            ));
        }
        Ok(())
    }

    /// Cache size cap in bytes
    pub fn cache_cap_bytes(&self) -> u64 {
        self.max_cache_size_mb.saturating_mul(1024 * 1024)
    }

    /// Resource limits enforced by the budget guard
    pub fn budget_limits(&self) -> BudgetLimits {
        BudgetLimits {
            max_file_count: self.max_file_count,
            max_total_bytes: self.max_total_bytes,
            max_file_size_bytes: self.max_file_size_bytes,
        }
    }

    /// Whether results are read from and written to the cache
    pub fn cache_enabled(&self) -> bool {
        !self.no_cache
    }
}

/// Partial configuration produced by one override source.
///
/// Also the on-disk shape of `.resonance.toml`; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    pub threshold: Option<f64>,
    pub seed: Option<i64>,
    pub jobs: Option<usize>,
    pub cache_dir: Option<PathBuf>,
    pub no_cache: Option<bool>,
    pub clear_cache: Option<bool>,
    pub max_cache_size_mb: Option<u64>,
    pub max_file_count: Option<usize>,
    pub max_total_bytes: Option<u64>,
    pub max_file_size_bytes: Option<u64>,
    pub include_globs: Option<Vec<String>>,
    pub exclude_globs: Option<Vec<String>>,
    pub schema_version: Option<String>,
    pub verbose: Option<bool>,
    pub reference: Option<PathBuf>,
}
