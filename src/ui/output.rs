//! Status lines on stderr
//!
//! Everything here is silent unless the context is verbose, except
//! `fatal`, which always prints.

use super::context::UiContext;
use console::style;

/// Display a success step
pub fn step_ok(ctx: &UiContext, message: &str) {
    if !ctx.is_verbose() {
        return;
    }
    if ctx.use_fancy_output() {
        eprintln!("{} {}", style("✓").green(), message);
    } else {
        eprintln!("  {} {}", style("[OK]").green(), message);
    }
}

/// Display a warning step
pub fn step_warn(ctx: &UiContext, message: &str) {
    if !ctx.is_verbose() {
        return;
    }
    if ctx.use_fancy_output() {
        eprintln!("{} {}", style("!").yellow(), message);
    } else {
        eprintln!("  {} {}", style("[WARN]").yellow(), message);
    }
}

/// Display an error step
pub fn step_error(ctx: &UiContext, message: &str) {
    if !ctx.is_verbose() {
        return;
    }
    if ctx.use_fancy_output() {
        eprintln!("{} {}", style("✗").red(), message);
    } else {
        eprintln!("  {} {}", style("[FAIL]").red(), message);
    }
}

/// Display an info step
pub fn step_info(ctx: &UiContext, message: &str) {
    if !ctx.is_verbose() {
        return;
    }
    if ctx.use_fancy_output() {
        eprintln!("{} {}", style("●").cyan(), message);
    } else {
        eprintln!("  {} {}", style("[INFO]").cyan(), message);
    }
}

/// Print styled key-value pair
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if !ctx.is_verbose() {
        return;
    }
    if ctx.use_fancy_output() {
        eprintln!("  {}: {}", style(key).dim(), value);
    } else {
        eprintln!("  {}: {}", key, value);
    }
}

/// Print a multi-line block indented and dimmed
pub fn remark(ctx: &UiContext, text: &str) {
    if !ctx.is_verbose() {
        return;
    }
    for line in text.lines() {
        eprintln!("    {}", style(line).dim());
    }
}

/// Print an unrecoverable error with an optional hint. Never gated.
pub fn fatal(message: &str, hint: Option<&str>) {
    eprintln!("{} {}", style("Error:").red().bold(), message);
    if let Some(hint) = hint {
        eprintln!("  {} {}", style("Hint:").yellow(), hint);
    }
}
