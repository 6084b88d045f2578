//! Progress bar for scoring runs

use super::context::UiContext;
use crate::models::FileResult;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress over the files of one run.
///
/// Shows an indicatif bar on stderr only when verbose on an interactive
/// terminal; otherwise every call is a no-op.
pub struct ScoreProgress {
    bar: Option<ProgressBar>,
}

impl ScoreProgress {
    pub fn new(ctx: &UiContext, total: usize) -> Self {
        let bar = (ctx.is_verbose() && ctx.use_fancy_output()).then(|| {
            let bar = ProgressBar::new(total as u64);
            if let Ok(style) = ProgressStyle::default_bar().template(
                "  {spinner:.cyan} Scoring  {bar:20.cyan/dim} {pos}/{len} {msg:.dim}  {elapsed:.dim}",
            ) {
                bar.set_style(
                    style
                        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                        .progress_chars("━╸─"),
                );
            }
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        });
        Self { bar }
    }

    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }

    /// Advance by one finished file
    pub fn on_result(&self, result: &FileResult) {
        if let Some(ref bar) = self.bar {
            bar.set_message(shorten(&result.path, 40));
            bar.inc(1);
        }
    }

    /// Finish and clear the progress bar.
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

/// Keep the tail of long paths, which carries the file name
fn shorten(path: &str, max: usize) -> String {
    let count = path.chars().count();
    if count <= max {
        return path.to_string();
    }
    let tail: String = path.chars().skip(count - (max - 3)).collect();
    format!("...{}", tail)
}
