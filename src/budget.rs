//! Resource budgets
//!
//! Aggregate limits (file count, total bytes) are checked once over the
//! whole discovered set before any scoring starts. The per-file size limit
//! is checked by each worker, so an oversized file fails on its own without
//! aborting the run.

use std::fmt;

/// Hard limits for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetLimits {
    pub max_file_count: usize,
    pub max_total_bytes: u64,
    pub max_file_size_bytes: u64,
}

/// Which limit was breached, with the observed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetBreach {
    FileCount { count: usize, limit: usize },
    TotalBytes { bytes: u64, limit: u64 },
    FileSize { bytes: u64, limit: u64 },
}

impl BudgetBreach {
    /// Trace written into the report for this breach
    pub fn trace(&self) -> String {
        match self {
            Self::FileCount { limit, .. } => {
                format!("Processing skipped due to file count budget ({limit}) exceeded.")
            }
            Self::TotalBytes { limit, .. } => {
                format!("Processing skipped due to total byte budget ({limit}) exceeded.")
            }
            Self::FileSize { bytes, limit } => {
                format!("File size ({bytes} bytes) exceeds budget ({limit} bytes).")
            }
        }
    }
}

impl fmt::Display for BudgetBreach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileCount { count, limit } => {
                write!(f, "number of files ({count}) exceeds limit ({limit})")
            }
            Self::TotalBytes { bytes, limit } => {
                write!(f, "total bytes ({bytes}) exceeds limit ({limit})")
            }
            Self::FileSize { bytes, limit } => {
                write!(f, "file size ({bytes}) exceeds limit ({limit})")
            }
        }
    }
}

/// Outcome of a budget check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ok,
    Exceeded(BudgetBreach),
}

impl Verdict {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Check the whole discovered set. File count is checked before total bytes.
pub fn check_run(file_count: usize, total_bytes: u64, limits: &BudgetLimits) -> Verdict {
    if file_count > limits.max_file_count {
        return Verdict::Exceeded(BudgetBreach::FileCount {
            count: file_count,
            limit: limits.max_file_count,
        });
    }
    if total_bytes > limits.max_total_bytes {
        return Verdict::Exceeded(BudgetBreach::TotalBytes {
            bytes: total_bytes,
            limit: limits.max_total_bytes,
        });
    }
    Verdict::Ok
}

/// Check a single file before it is opened for scoring
pub fn check_file(size_bytes: u64, limits: &BudgetLimits) -> Verdict {
    if size_bytes > limits.max_file_size_bytes {
        Verdict::Exceeded(BudgetBreach::FileSize {
            bytes: size_bytes,
            limit: limits.max_file_size_bytes,
        })
    } else {
        Verdict::Ok
    }
}
