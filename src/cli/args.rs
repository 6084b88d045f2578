//! CLI argument definitions using clap derive

use crate::config::ConfigPatch;
use clap::Parser;
use std::path::PathBuf;

/// Resonance Guard - batch resonance scoring
///
/// Scores input files against a reference text, aggregates a verdict and
/// exits 0 (pass), 1 (no input or budget exceeded), 2 (below threshold) or
/// 3 (configuration or schema error).
#[derive(Parser, Debug, Default)]
#[command(name = "resonance")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Files or directories to score (directories are walked recursively)
    #[arg(short, long, num_args = 1.., value_name = "PATH")]
    pub input: Vec<PathBuf>,

    /// Write the JSON report to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output_json: Option<PathBuf>,

    /// Minimum overall score to pass
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Seed for echo selection and per-file companion seeds
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i64>,

    /// Number of files scored concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Result cache directory
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Neither read nor write the result cache
    #[arg(long)]
    pub no_cache: bool,

    /// Empty the cache directory before scoring
    #[arg(long)]
    pub clear_cache: bool,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,

    /// Report schema version (1.1 or 1.2)
    #[arg(long, value_name = "VERSION")]
    pub schema_version: Option<String>,

    /// Glob patterns a walked file must match (any)
    #[arg(long, num_args = 1.., value_name = "GLOB")]
    pub include: Vec<String>,

    /// Glob patterns that drop a walked file
    #[arg(long, num_args = 1.., value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Abort the run when more files are discovered
    #[arg(long)]
    pub max_file_count: Option<usize>,

    /// Abort the run when discovered files exceed this many bytes in total
    #[arg(long)]
    pub max_total_bytes: Option<u64>,

    /// Skip individual files larger than this many bytes
    #[arg(long)]
    pub max_file_size_bytes: Option<u64>,

    /// Evict old cache entries beyond this size
    #[arg(long, value_name = "MB")]
    pub max_cache_size_mb: Option<u64>,

    /// Print progress, verdict and debug logs to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Validate a sample report against the schema and exit
    #[arg(long)]
    pub validate_schema_only: bool,

    /// Reference text file to score against
    #[arg(short, long, value_name = "PATH")]
    pub reference: Option<PathBuf>,
}

impl Cli {
    /// Command-line override layer. Switches and glob lists only override
    /// when given.
    pub fn config_patch(&self) -> ConfigPatch {
        ConfigPatch {
            threshold: self.threshold,
            seed: self.seed,
            jobs: self.jobs,
            cache_dir: self.cache_dir.clone(),
            no_cache: self.no_cache.then_some(true),
            clear_cache: self.clear_cache.then_some(true),
            max_cache_size_mb: self.max_cache_size_mb,
            max_file_count: self.max_file_count,
            max_total_bytes: self.max_total_bytes,
            max_file_size_bytes: self.max_file_size_bytes,
            include_globs: (!self.include.is_empty()).then(|| self.include.clone()),
            exclude_globs: (!self.exclude.is_empty()).then(|| self.exclude.clone()),
            schema_version: self.schema_version.clone(),
            verbose: self.verbose.then_some(true),
            reference: self.reference.clone(),
        }
    }
}
