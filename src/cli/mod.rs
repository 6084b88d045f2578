//! Command-line interface
//!
//! A single flat command: flags map onto configuration fields, plus the
//! one-shot modes `--print-config` and `--validate-schema-only`.

pub mod args;
pub mod run;
pub mod validate;

pub use args::Cli;
pub use run::execute;
