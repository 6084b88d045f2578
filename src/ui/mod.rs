//! Human-readable terminal output
//!
//! Status lines and the progress bar go to stderr and are shown only in
//! verbose mode; stdout is reserved for the JSON report. Styling falls back
//! to plain bracketed prefixes in CI and non-interactive environments.
//!
//! # Example
//!
//! ```rust,ignore
//! use resonance_guard::ui::{self, UiContext, ScoreProgress};
//!
//! let ctx = UiContext::detect(config.verbose);
//! ui::step_info(&ctx, "Scoring 12 files");
//!
//! let progress = ScoreProgress::new(&ctx, 12);
//! // ... progress.on_result(&result) per file ...
//! progress.finish();
//!
//! ui::step_ok(&ctx, "Score 0.8123 meets threshold 0.6");
//! ```

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{fatal, key_value, remark, step_error, step_info, step_ok, step_warn};
pub use progress::ScoreProgress;
