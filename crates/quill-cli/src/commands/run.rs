//! `quill run` — Run a script file.

use crate::output::Reporter;
use crate::Outcome;
use anyhow::Context;
use quill_engine::InterpreterOptions;
use std::path::Path;

pub fn execute(file: &Path, options: InterpreterOptions, reporter: &Reporter) -> anyhow::Result<Outcome> {
    let source = std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    tracing::debug!(file = %file.display(), bytes = source.len(), "running script");

    super::evaluate_and_report(&file.display().to_string(), &source, options, false, reporter)
}
