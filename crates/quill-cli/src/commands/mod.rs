//! Subcommand implementations.

pub mod check;
pub mod eval;
pub mod run;

use crate::output::Reporter;
use crate::Outcome;
use quill_engine::{create_files, run_with_large_stack, Diagnostic, Interpreter, InterpreterOptions};

/// Result of evaluating one script on the interpreter thread.
enum Evaluated {
    Value(String),
    Failed { diagnostic: Diagnostic, syntax: bool },
}

/// Evaluate `source` on a large-stack thread and report the outcome.
///
/// `name` labels the source in diagnostics. The completion value is
/// printed only when `print_value` is set.
pub(crate) fn evaluate_and_report(
    name: &str,
    source: &str,
    options: InterpreterOptions,
    print_value: bool,
    reporter: &Reporter,
) -> anyhow::Result<Outcome> {
    let evaluated = run_with_large_stack(|| {
        let mut interp = Interpreter::new(options);
        match interp.evaluate_program(source) {
            Ok(value) => Evaluated::Value(interp.render(&value)),
            Err(err) => Evaluated::Failed {
                diagnostic: Diagnostic::from_runtime_error(&err, 0),
                syntax: err.is_syntax_error(),
            },
        }
    })?;

    match evaluated {
        Evaluated::Value(rendered) => {
            if print_value {
                reporter.value(&rendered);
            }
            Ok(Outcome::Success)
        }
        Evaluated::Failed { diagnostic, syntax } => {
            let files = create_files(name, source);
            reporter.diagnostic(&diagnostic, &files)?;
            Ok(if syntax { Outcome::Syntax } else { Outcome::Uncaught })
        }
    }
}
