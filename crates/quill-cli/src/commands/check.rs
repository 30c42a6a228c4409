//! `quill check` — Parse files without running them.

use crate::output::Reporter;
use crate::Outcome;
use anyhow::Context;
use quill_engine::{create_files, Diagnostic, Interpreter, InterpreterOptions};
use std::path::PathBuf;

/// Checks every file; the outcome is `Syntax` if any of them failed.
pub fn execute(files: &[PathBuf], options: InterpreterOptions, reporter: &Reporter) -> anyhow::Result<Outcome> {
    let mut interp = Interpreter::new(options);
    let mut outcome = Outcome::Success;

    for path in files {
        let source =
            std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let name = path.display().to_string();

        match interp.check_syntax(&source) {
            Ok(()) => reporter.ok(&name),
            Err(err) => {
                tracing::debug!(file = %name, kind = ?err.kind, "syntax check failed");
                let files = create_files(name, source);
                reporter.diagnostic(&Diagnostic::from_parse_error(&err, 0), &files)?;
                outcome = Outcome::Syntax;
            }
        }
    }

    Ok(outcome)
}
