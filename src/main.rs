//! Resonance Guard CLI entry point

use clap::Parser;
use resonance_guard::cli::{self, Cli};
use resonance_guard::config;
use resonance_guard::error::{ResonanceError, ResonanceResult};
use resonance_guard::report::RunOutcome;
use resonance_guard::ui;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Overrides the log filter directive when set
const LOG_ENV: &str = "RESONANCE_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // usage errors are configuration errors, not score failures
            return if e.use_stderr() {
                RunOutcome::Error.into()
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli).await {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            ui::fatal(&e.to_string(), e.hint());
            e.exit_status().into()
        }
    }
}

async fn run(cli: Cli) -> ResonanceResult<RunOutcome> {
    // Logging starts before config resolution so its layer messages are
    // visible; a file-level `verbose = true` raises the filter afterwards.
    let early_verbose = cli.verbose
        || std::env::var("RESONANCE_VERBOSE")
            .is_ok_and(|v| v.trim().eq_ignore_ascii_case("true"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(log_filter(early_verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter_reloading();
    let reload = builder.reload_handle();
    builder.init();

    let cwd = std::env::current_dir()
        .map_err(|e| ResonanceError::io("getting current directory", e))?;
    let config = config::resolve(cli.config_patch(), &cwd).await?;

    if config.verbose != early_verbose {
        if let Err(e) = reload.reload(log_filter(config.verbose)) {
            debug!("Cannot update log filter: {}", e);
        }
    }

    cli::execute(&cli, config).await
}

/// `RESONANCE_LOG` wins; otherwise warn by default, debug when verbose
fn log_filter(verbose: bool) -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(directive) => EnvFilter::new(directive),
        Err(_) if verbose => EnvFilter::new("resonance_guard=debug"),
        Err(_) => EnvFilter::new("resonance_guard=warn"),
    }
}
