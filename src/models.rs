//! Per-file result types shared by scoring, caching and reporting

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome class of one processed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Ok,
    /// Reserved for structured-input analyzers; plain-text scoring never emits it
    SyntaxError,
    IoError,
    CalcError,
    BudgetExceeded,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::SyntaxError => "syntax_error",
            Self::IoError => "io_error",
            Self::CalcError => "calc_error",
            Self::BudgetExceeded => "budget_exceeded",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of processing one input file.
///
/// This is also the cache entry format, so field names follow the newest
/// report schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileResult {
    pub path: String,
    pub score: f64,
    pub status: FileStatus,
    #[serde(rename = "spectral_trace")]
    pub trace: String,
    pub size_bytes: u64,
    #[serde(rename = "parse_time_ms")]
    pub elapsed_ms: f64,
}

impl FileResult {
    /// A zero-score result for a file that failed before scoring
    pub fn failed(path: impl Into<String>, status: FileStatus, trace: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            score: 0.0,
            status,
            trace: trace.into(),
            size_bytes: 0,
            elapsed_ms: 0.0,
        }
    }
}
