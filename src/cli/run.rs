//! Scoring run: discovery, budgets, pool, report

use crate::budget::{self, Verdict};
use crate::cache::CacheStore;
use crate::cli::args::Cli;
use crate::cli::validate;
use crate::config::ResolvedConfig;
use crate::context::RunContext;
use crate::discovery;
use crate::error::{ResonanceError, ResonanceResult};
use crate::pool::{FileScorer, WorkerPool};
use crate::report::{self, OverallStatus, Report, RunOutcome, TRACE_NO_INPUT};
use crate::ui::{self, ScoreProgress, UiContext};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;
use tracing::debug;

/// Execute one invocation with an already resolved configuration
pub async fn execute(cli: &Cli, config: ResolvedConfig) -> ResonanceResult<RunOutcome> {
    let ui = UiContext::detect(config.verbose);

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(RunOutcome::Success);
    }

    if config.clear_cache {
        let store = CacheStore::new(config.cache_dir.clone(), config.cache_cap_bytes());
        let removed = store.clear().await?;
        ui::step_info(
            &ui,
            &format!("Cleared {} cache entries from {}", removed, store.dir().display()),
        );
    }

    let ctx = Arc::new(RunContext::prepare(config).await?);

    if cli.validate_schema_only {
        return validate::execute(&ctx, &ui);
    }

    let started = Instant::now();
    let output = cli.output_json.as_deref();

    let files = discovery::discover_files(
        cli.input.clone(),
        ctx.config.include_globs.clone(),
        ctx.config.exclude_globs.clone(),
    )
    .await?;

    if files.is_empty() {
        ui::step_warn(&ui, TRACE_NO_INPUT);
        let report = Report::aborted(
            &ctx.config,
            ctx.global_seed,
            OverallStatus::NoInput,
            TRACE_NO_INPUT,
        );
        return emit(&report, output, &ui).await;
    }

    let total_bytes = discovery::total_bytes(&files);
    let limits = ctx.config.budget_limits();
    if let Verdict::Exceeded(breach) = budget::check_run(files.len(), total_bytes, &limits) {
        ui::step_warn(&ui, &format!("Run aborted: {}", breach));
        let report = Report::aborted(
            &ctx.config,
            ctx.global_seed,
            OverallStatus::BudgetExceeded,
            breach.trace(),
        );
        return emit(&report, output, &ui).await;
    }

    let pool = WorkerPool::new(ctx.config.jobs);
    ui::step_info(
        &ui,
        &format!(
            "Scoring {} files ({} bytes) with {} job(s)",
            files.len(),
            total_bytes,
            pool.jobs()
        ),
    );

    let progress = ScoreProgress::new(&ui, files.len());
    let scorer = FileScorer::new(Arc::clone(&ctx));
    let results = pool
        .run(
            files,
            move |file| {
                let scorer = scorer.clone();
                async move { scorer.process(file).await }
            },
            |result| progress.on_result(result),
        )
        .await;
    progress.finish();

    let report = report::assemble(results, &ctx.config, ctx.global_seed, started.elapsed());
    emit(&report, output, &ui).await
}

/// Validate, write and judge a report
async fn emit(report: &Report, output: Option<&Path>, ui: &UiContext) -> ResonanceResult<RunOutcome> {
    report.validate()?;
    let json = report.to_json_pretty()?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).await.map_err(|e| {
                    ResonanceError::io(format!("creating {}", parent.display()), e)
                })?;
            }
            fs::write(path, format!("{}\n", json))
                .await
                .map_err(|e| ResonanceError::io(format!("writing report {}", path.display()), e))?;
            debug!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }

    let outcome = report::decide(report);
    print_verdict(report, outcome, ui);
    Ok(outcome)
}

fn print_verdict(report: &Report, outcome: RunOutcome, ui: &UiContext) {
    let overall = &report.overall;
    let summary = format!(
        "Overall score {:.4} against threshold {} ({})",
        overall.score, overall.threshold_used, overall.threshold_source
    );

    match outcome {
        RunOutcome::Success => ui::step_ok(ui, &format!("{summary}: pass")),
        RunOutcome::Failure => ui::step_error(ui, &format!("{summary}: below threshold")),
        RunOutcome::Warning | RunOutcome::Error => ui::step_warn(ui, &overall.trace),
    }

    if !report.files.is_empty() {
        ui::key_value(ui, "Files", &report.files.len().to_string());
        ui::key_value(ui, "Summary", &overall.trace);
    }
    ui::key_value(ui, "Echo", "");
    ui::remark(ui, overall.resonance_echo);
}
