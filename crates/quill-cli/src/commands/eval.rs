//! `quill eval` — Evaluate inline code.

use crate::output::Reporter;
use crate::Outcome;
use quill_engine::InterpreterOptions;

pub fn execute(code: &str, print: bool, options: InterpreterOptions, reporter: &Reporter) -> anyhow::Result<Outcome> {
    super::evaluate_and_report("<eval>", code, options, print, reporter)
}
