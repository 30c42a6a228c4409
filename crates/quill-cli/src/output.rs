//! Colored and JSON output for CLI commands.
//!
//! Uses `termcolor` for terminal output and respects `NO_COLOR`.

use clap::ValueEnum;
use quill_engine::{Diagnostic, SourceFiles};
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Error report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Source snippets with labels
    Human,
    /// One JSON document per diagnostic on stdout
    Json,
}

/// Resolve `ColorChoice` from CLI flag and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > auto-detect TTY.
pub fn resolve_color_choice(flag: Option<&str>) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match flag {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Writes results and diagnostics in the selected format.
pub struct Reporter {
    format: Format,
    color: ColorChoice,
}

impl Reporter {
    pub fn new(format: Format, color: ColorChoice) -> Self {
        Self { format, color }
    }

    /// Report a diagnostic against its source file.
    pub fn diagnostic(&self, diagnostic: &Diagnostic, files: &SourceFiles) -> anyhow::Result<()> {
        match self.format {
            Format::Human => {
                let mut stderr = StandardStream::stderr(self.color);
                diagnostic.emit_to(&mut stderr, files)?;
            }
            Format::Json => println!("{}", diagnostic.to_json(files)?),
        }
        Ok(())
    }

    /// Print a completion value on stdout.
    pub fn value(&self, rendered: &str) {
        match self.format {
            Format::Human => println!("{}", rendered),
            Format::Json => println!("{}", serde_json::json!({ "value": rendered })),
        }
    }

    /// Green status line for a file that passed a check.
    pub fn ok(&self, name: &str) {
        if self.format == Format::Json {
            println!("{}", serde_json::json!({ "file": name, "ok": true }));
            return;
        }
        let mut stdout = StandardStream::stdout(self.color);
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
        let _ = write!(stdout, "ok");
        let _ = stdout.reset();
        let _ = writeln!(stdout, " {}", name);
    }

    /// Failure outside the script itself (unreadable file and the like).
    pub fn fatal(&self, err: &anyhow::Error) {
        let mut stderr = StandardStream::stderr(self.color);
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
        let _ = write!(stderr, "error");
        let _ = stderr.reset();
        let _ = writeln!(stderr, ": {:#}", err);
    }
}
