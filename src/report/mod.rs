//! Report assembly and exit status
//!
//! A `Report` is built once per run from the collected `FileResult`s and
//! serialized according to its schema version: version 1.1 carries the core
//! fields only, 1.2 adds timing, sizes and the overall status block.

pub mod echo;
pub mod schema;

pub use schema::SchemaVersion;

use crate::config::{ConfigSource, ResolvedConfig};
use crate::error::ResonanceResult;
use crate::models::{FileResult, FileStatus};
use serde::{Serialize, Serializer};
use std::fmt;
use std::process::ExitCode;
use std::time::Duration;

pub const TRACE_ALL_OK: &str = "All files processed successfully.";
pub const TRACE_NO_INPUT: &str = "No valid input files found.";

/// Run-level status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Ok,
    NoInput,
    BudgetExceeded,
}

/// Aggregate block of a report
#[derive(Debug, Clone, PartialEq)]
pub struct Overall {
    pub score: f64,
    pub threshold_used: f64,
    pub threshold_source: ConfigSource,
    pub resonance_echo: &'static str,
    pub processing_time_ms: f64,
    pub status: OverallStatus,
    pub trace: String,
}

/// One report per invocation; never mutated after assembly
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub version: SchemaVersion,
    pub overall: Overall,
    pub files: Vec<FileResult>,
}

impl Report {
    /// Minimal report for a run that stopped before scoring
    pub fn aborted(
        config: &ResolvedConfig,
        global_seed: i64,
        status: OverallStatus,
        trace: impl Into<String>,
    ) -> Self {
        Self {
            version: config.schema_version,
            overall: Overall {
                score: 0.0,
                threshold_used: config.threshold,
                threshold_source: config.threshold_source,
                resonance_echo: echo::select(global_seed),
                processing_time_ms: 0.0,
                status,
                trace: trace.into(),
            },
            files: Vec::new(),
        }
    }

    /// Serialize to a JSON value in this report's schema version
    pub fn to_value(&self) -> ResonanceResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Pretty JSON in this report's schema version
    pub fn to_json_pretty(&self) -> ResonanceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate against the declared schema version
    pub fn validate(&self) -> ResonanceResult<()> {
        schema::validate(&self.to_value()?, self.version)
    }

    fn view(&self) -> ReportView<'_> {
        let extended = self.version.has_extended_fields();
        let overall = &self.overall;

        ReportView {
            metrics_version: self.version,
            overall: OverallView {
                score: overall.score,
                threshold_used: overall.threshold_used,
                threshold_source: overall.threshold_source.as_str(),
                resonance_echo: overall.resonance_echo,
                processing_time_ms: extended.then_some(overall.processing_time_ms),
                status: extended.then_some(overall.status),
                spectral_trace: extended.then_some(overall.trace.as_str()),
            },
            files: self
                .files
                .iter()
                .map(|f| FileView {
                    path: &f.path,
                    score: f.score,
                    status: f.status,
                    spectral_trace: &f.trace,
                    size_bytes: extended.then_some(f.size_bytes),
                    parse_time_ms: extended.then_some(f.elapsed_ms),
                })
                .collect(),
        }
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.view().serialize(serializer)
    }
}

#[derive(Serialize)]
struct ReportView<'a> {
    metrics_version: SchemaVersion,
    overall: OverallView<'a>,
    files: Vec<FileView<'a>>,
}

#[derive(Serialize)]
struct OverallView<'a> {
    score: f64,
    threshold_used: f64,
    threshold_source: &'a str,
    resonance_echo: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    processing_time_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<OverallStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    spectral_trace: Option<&'a str>,
}

#[derive(Serialize)]
struct FileView<'a> {
    path: &'a str,
    score: f64,
    status: FileStatus,
    spectral_trace: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_time_ms: Option<f64>,
}

/// Aggregate per-file results into a report.
///
/// `results` may arrive in any order; the overall score does not depend on
/// it.
pub fn assemble(
    results: Vec<FileResult>,
    config: &ResolvedConfig,
    global_seed: i64,
    elapsed: Duration,
) -> Report {
    let not_clean = results.iter().filter(|r| !r.status.is_ok()).count();
    let trace = if not_clean == 0 {
        TRACE_ALL_OK.to_string()
    } else {
        format!("{} of {} files did not score cleanly.", not_clean, results.len())
    };

    Report {
        version: config.schema_version,
        overall: Overall {
            score: round_to(mean_score(&results), 4),
            threshold_used: config.threshold,
            threshold_source: config.threshold_source,
            resonance_echo: echo::select(global_seed),
            processing_time_ms: round_to(elapsed.as_secs_f64() * 1000.0, 2),
            status: OverallStatus::Ok,
            trace,
        },
        files: results,
    }
}

/// Arithmetic mean, summed in path order; 0.0 for no results
fn mean_score(results: &[FileResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let mut ordered: Vec<&FileResult> = results.iter().collect();
    ordered.sort_by(|a, b| a.path.cmp(&b.path).then(a.score.total_cmp(&b.score)));
    ordered.iter().map(|r| r.score).sum::<f64>() / results.len() as f64
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Overall score met the threshold
    Success,
    /// No input, or a whole-run budget stopped the run
    Warning,
    /// Overall score below threshold
    Failure,
    /// Configuration or schema failure
    Error,
}

impl RunOutcome {
    pub fn code(&self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Warning => 1,
            Self::Failure => 2,
            Self::Error => 3,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Failure => "failure",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

impl From<RunOutcome> for ExitCode {
    fn from(outcome: RunOutcome) -> Self {
        ExitCode::from(outcome.code())
    }
}

/// Decide the exit status of a report
pub fn decide(report: &Report) -> RunOutcome {
    match report.overall.status {
        OverallStatus::NoInput | OverallStatus::BudgetExceeded => RunOutcome::Warning,
        OverallStatus::Ok if report.overall.score >= report.overall.threshold_used => {
            RunOutcome::Success
        }
        OverallStatus::Ok => RunOutcome::Failure,
    }
}
