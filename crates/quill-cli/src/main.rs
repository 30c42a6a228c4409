//! Quill command-line runner
//!
//! Runs scripts, evaluates inline code, and checks syntax with the
//! Quill interpreter.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use output::Format;
use quill_engine::InterpreterOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Once;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Interpreter for a JavaScript subset built around arrow closures", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Treat top-level code as strict-mode code
    #[arg(long, global = true)]
    strict: bool,

    /// Deepest allowed call nesting before a RangeError
    #[arg(long, global = true, default_value_t = 512)]
    max_call_depth: usize,

    /// Log a debug event for every closure call
    #[arg(long, global = true)]
    trace_calls: bool,

    /// Tracing filter (overrides RUST_LOG), e.g. `quill_engine=trace`
    #[arg(long, global = true)]
    log: Option<String>,

    /// How to report errors
    #[arg(long, global = true, value_enum, default_value_t = Format::Human)]
    format: Format,

    /// When to color output: auto, always, never
    #[arg(long, global = true)]
    color: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script file
    Run {
        /// Input file
        file: PathBuf,
    },

    /// Evaluate inline code and print its completion value
    Eval {
        /// Source text
        code: String,
        /// Don't print the completion value
        #[arg(long)]
        no_print: bool,
    },

    /// Parse files without running them
    Check {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// How a command ended, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// An error escaped the script
    Uncaught,
    /// The source was rejected by the parser
    Syntax,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Uncaught => ExitCode::from(1),
            Outcome::Syntax => ExitCode::from(2),
        }
    }
}

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber once.
///
/// Without `--log` or `RUST_LOG` nothing is installed and events are dropped.
fn init_tracing(filter: Option<&str>) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = match filter {
            Some(directives) => EnvFilter::new(directives),
            None if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
            None => return,
        };
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
            .with(filter)
            .init();
    });
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());

    let options = InterpreterOptions {
        max_call_depth: cli.max_call_depth,
        strict: cli.strict,
        trace_calls: cli.trace_calls,
    };
    let reporter = output::Reporter::new(cli.format, output::resolve_color_choice(cli.color.as_deref()));

    let result = match cli.command {
        Commands::Run { file } => commands::run::execute(&file, options, &reporter),
        Commands::Eval { code, no_print } => commands::eval::execute(&code, !no_print, options, &reporter),
        Commands::Check { files } => commands::check::execute(&files, options, &reporter),
    };

    match result {
        Ok(outcome) => outcome.into(),
        Err(err) => {
            reporter.fatal(&err);
            ExitCode::from(1)
        }
    }
}
