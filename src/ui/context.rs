//! UI context for detecting interactive vs CI environments

use std::io::IsTerminal;

/// Decides whether human-readable output is shown and how it looks.
///
/// All of it goes to stderr; stdout carries only the JSON report.
#[derive(Debug, Clone)]
pub struct UiContext {
    /// Whether stderr is an interactive terminal outside CI
    interactive: bool,
    /// Whether status lines are printed at all
    verbose: bool,
}

impl UiContext {
    /// Detect the current environment
    pub fn detect(verbose: bool) -> Self {
        Self {
            interactive: Self::detect_interactive(),
            verbose,
        }
    }

    /// Create a non-interactive context (for testing or explicit CI mode)
    pub fn non_interactive(verbose: bool) -> Self {
        Self {
            interactive: false,
            verbose,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if we should use fancy output (progress bars, symbols)
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }

    fn detect_interactive() -> bool {
        if !std::io::stderr().is_terminal() {
            return false;
        }

        if std::env::var("CI").is_ok() {
            return false;
        }

        let ci_vars = [
            "GITHUB_ACTIONS",
            "GITLAB_CI",
            "CIRCLECI",
            "TRAVIS",
            "JENKINS_URL",
            "BUILDKITE",
            "TEAMCITY_VERSION",
            "TF_BUILD",
        ];

        !ci_vars.iter().any(|var| std::env::var(var).is_ok())
    }
}
