//! Schema self-check: build a representative report and validate it

use crate::context::RunContext;
use crate::error::ResonanceResult;
use crate::models::{FileResult, FileStatus};
use crate::report::{self, Report, RunOutcome};
use crate::scoring::TRACE_WITH_REFERENCE;
use crate::ui::{self, UiContext};
use std::time::Duration;
use tracing::debug;

pub const VALIDATION_OK: &str = "Schema validation successful.";

/// Sample report for the configured schema version, covering a clean file
/// and a budget-skipped one
pub fn sample_report(ctx: &RunContext) -> Report {
    let results = vec![
        FileResult {
            path: "sample/clean.txt".to_string(),
            score: 0.75,
            status: FileStatus::Ok,
            trace: TRACE_WITH_REFERENCE.to_string(),
            size_bytes: 128,
            elapsed_ms: 0.42,
        },
        FileResult {
            size_bytes: 4096,
            ..FileResult::failed(
                "sample/oversized.txt",
                FileStatus::BudgetExceeded,
                "File size (4096 bytes) exceeds budget (1024 bytes).",
            )
        },
    ];
    report::assemble(results, &ctx.config, ctx.global_seed, Duration::from_millis(3))
}

/// Validate the sample report; a schema mismatch is returned as an error
pub fn execute(ctx: &RunContext, ui: &UiContext) -> ResonanceResult<RunOutcome> {
    let report = sample_report(ctx);
    debug!("Validating sample report against schema {}", report.version);
    report.validate()?;

    println!("{}", VALIDATION_OK);
    ui::step_ok(ui, &format!("Schema {} accepts its sample report", report.version));
    Ok(RunOutcome::Success)
}
