//! Resonance Guard - batch resonance scoring
//!
//! Scores text files against a reference text, caches per-file results by
//! content, enforces resource budgets before work starts and emits a
//! schema-versioned JSON report with a pass/fail exit status.

pub mod budget;
pub mod cache;
pub mod cli;
pub mod config;
pub mod context;
pub mod discovery;
pub mod error;
pub mod models;
pub mod pool;
pub mod report;
pub mod scoring;
pub mod ui;

pub use error::{ResonanceError, ResonanceResult};
