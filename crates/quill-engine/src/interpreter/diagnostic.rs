//! Diagnostic rendering for parse and runtime errors
//!
//! Wraps `codespan-reporting` so hosts can show errors against the script
//! text, either on a terminal or as JSON for tooling.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, LabelStyle, Severity};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use termcolor::{ColorChoice, StandardStream, WriteColor};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::interpreter::error::RuntimeError;
use crate::parser::{ParseError, ParseErrorKind, Span};

/// The file table diagnostics are rendered against
pub type SourceFiles = SimpleFiles<String, String>;

/// Error code for a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        self.0
    }
}

/// A diagnostic message with source code context
pub struct Diagnostic {
    inner: CsDiagnostic<usize>,
    code: Option<ErrorCode>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.inner = self.inner.with_code(code.0);
        self.code = Some(code);
        self
    }

    /// Add the main error location
    pub fn with_primary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        let label = Label::primary(file_id, span.start..span.end).with_message(message);
        self.inner.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.notes.push(format!("help: {}", help.into()));
        self
    }

    pub fn code(&self) -> Option<&ErrorCode> {
        self.code.as_ref()
    }

    /// Create a diagnostic from a parse error
    pub fn from_parse_error(error: &ParseError, file_id: usize) -> Self {
        let label = match &error.kind {
            ParseErrorKind::UnexpectedToken { .. } => "unexpected token",
            ParseErrorKind::UnexpectedEof { .. } => "input ends here",
            ParseErrorKind::InvalidSyntax { .. } => "invalid syntax",
            ParseErrorKind::InvalidArrowParameters { .. } => "not a parameter list",
            ParseErrorKind::DuplicateParameter { .. } => "duplicate parameter",
            ParseErrorKind::StrictModeViolation { .. } => "not allowed in strict mode",
            ParseErrorKind::IllegalJump { .. } => "no legal target",
            ParseErrorKind::InvalidNumber { .. } => "invalid number",
            ParseErrorKind::InvalidString { .. } => "invalid string",
            ParseErrorKind::ParserLimitExceeded { .. } => "limit exceeded here",
        };

        let mut diag = Diagnostic::error(format!("SyntaxError: {}", error.message))
            .with_code(parse_error_code(&error.kind))
            .with_primary_label(file_id, error.span, label);
        if let Some(suggestion) = &error.suggestion {
            diag = diag.with_help(suggestion.clone());
        }
        diag
    }

    /// Create a diagnostic from an error that escaped the script.
    ///
    /// Only syntax errors in the script itself carry a location.
    pub fn from_runtime_error(error: &RuntimeError, file_id: usize) -> Self {
        let diag = Diagnostic::error(error.report()).with_code(runtime_error_code(error));
        match error {
            RuntimeError::Syntax { span: Some(span), .. } => diag.with_primary_label(file_id, *span, "invalid syntax"),
            RuntimeError::Syntax { span: None, .. } => diag.with_note("raised while parsing code passed to eval or Function"),
            RuntimeError::Range { .. } => diag.with_help("raise the limit with --max-call-depth"),
            RuntimeError::Thrown { .. } => diag.with_note("thrown value was not caught"),
            _ => diag,
        }
    }

    /// Emit the diagnostic to stderr with colors
    pub fn emit(&self, files: &SourceFiles) -> Result<(), codespan_reporting::files::Error> {
        let mut writer = StandardStream::stderr(ColorChoice::Auto);
        self.emit_to(&mut writer, files)
    }

    /// Emit the diagnostic to any terminal writer
    pub fn emit_to(
        &self,
        writer: &mut dyn WriteColor,
        files: &SourceFiles,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, files, &self.inner)
    }

    /// Get the underlying codespan diagnostic
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    /// Convert to JSON for tooling
    pub fn to_json(&self, files: &SourceFiles) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&JsonDiagnostic::from_diagnostic(self, files))
    }
}

/// JSON representation of a diagnostic
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub code: Option<String>,
    pub severity: String,
    pub message: String,
    pub labels: Vec<JsonLabel>,
    pub notes: Vec<String>,
}

/// JSON representation of a diagnostic label (lines and columns 1-indexed)
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLabel {
    pub file: String,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub message: Option<String>,
    pub style: String,
}

impl JsonDiagnostic {
    pub fn from_diagnostic(diag: &Diagnostic, files: &SourceFiles) -> Self {
        let severity = match diag.inner.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
            Severity::Bug => "bug",
        };

        let labels = diag
            .inner
            .labels
            .iter()
            .filter_map(|label| {
                let file = files.get(label.file_id).ok()?;
                let start = file.location((), label.range.start).ok()?;
                let end = file.location((), label.range.end).ok()?;

                Some(JsonLabel {
                    file: file.name().to_string(),
                    start_line: start.line_number,
                    start_column: start.column_number,
                    end_line: end.line_number,
                    end_column: end.column_number,
                    message: Some(label.message.clone()),
                    style: match label.style {
                        LabelStyle::Primary => "primary",
                        LabelStyle::Secondary => "secondary",
                    }
                    .to_string(),
                })
            })
            .collect();

        JsonDiagnostic {
            code: diag.code.as_ref().map(|code| code.0.to_string()),
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            labels,
            notes: diag.inner.notes.clone(),
        }
    }
}

pub fn parse_error_code(kind: &ParseErrorKind) -> ErrorCode {
    match kind {
        ParseErrorKind::UnexpectedToken { .. } => ErrorCode("E1001"),
        ParseErrorKind::UnexpectedEof { .. } => ErrorCode("E1002"),
        ParseErrorKind::InvalidSyntax { .. } => ErrorCode("E1003"),
        ParseErrorKind::InvalidArrowParameters { .. } => ErrorCode("E1004"),
        ParseErrorKind::DuplicateParameter { .. } => ErrorCode("E1005"),
        ParseErrorKind::StrictModeViolation { .. } => ErrorCode("E1006"),
        ParseErrorKind::IllegalJump { .. } => ErrorCode("E1007"),
        ParseErrorKind::InvalidNumber { .. } => ErrorCode("E1008"),
        ParseErrorKind::InvalidString { .. } => ErrorCode("E1009"),
        ParseErrorKind::ParserLimitExceeded { .. } => ErrorCode("E1010"),
    }
}

pub fn runtime_error_code(error: &RuntimeError) -> ErrorCode {
    match error {
        RuntimeError::Syntax { .. } => ErrorCode("E2001"),
        RuntimeError::UnresolvedReference { .. } => ErrorCode("E2002"),
        RuntimeError::Uninitialized { .. } => ErrorCode("E2003"),
        RuntimeError::Type { .. } => ErrorCode("E2004"),
        RuntimeError::NotConstructible { .. } => ErrorCode("E2005"),
        RuntimeError::ImmutableBinding { .. } => ErrorCode("E2006"),
        RuntimeError::DuplicateDeclaration { .. } => ErrorCode("E2007"),
        RuntimeError::Range { .. } => ErrorCode("E2008"),
        RuntimeError::Error { .. } => ErrorCode("E2009"),
        RuntimeError::Thrown { .. } => ErrorCode("E2010"),
    }
}

/// Helper to create a SimpleFiles instance from source code
pub fn create_files(path: impl Into<PathBuf>, source: impl Into<String>) -> SourceFiles {
    let mut files = SimpleFiles::new();
    files.add(path.into().display().to_string(), source.into());
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_program, Interner};

    fn parse_error(source: &str) -> ParseError {
        let mut interner = Interner::new();
        parse_program(source, &mut interner, false).unwrap_err()
    }

    #[test]
    fn test_diagnostic_with_code() {
        let diag = Diagnostic::error("Test error").with_code(ErrorCode("E2001"));
        assert_eq!(diag.code(), Some(&ErrorCode("E2001")));
        assert_eq!(diag.inner().severity, Severity::Error);
    }

    #[test]
    fn test_from_parse_error_has_label() {
        let diag = Diagnostic::from_parse_error(&parse_error("var f = (a, b)\n=> a;"), 0);
        assert!(diag.inner().message.starts_with("SyntaxError"));
        assert_eq!(diag.inner().labels.len(), 1);
    }

    #[test]
    fn test_from_runtime_error_codes() {
        let err = RuntimeError::UnresolvedReference { name: "x".to_string() };
        let diag = Diagnostic::from_runtime_error(&err, 0);
        assert_eq!(diag.code(), Some(&ErrorCode("E2002")));
        assert_eq!(diag.inner().message, "ReferenceError: x is not defined");
        assert!(diag.inner().labels.is_empty());
    }

    #[test]
    fn test_json_labels() {
        let source = "var ok = 1;\nvar f = yield => 1;";
        let mut interner = Interner::new();
        let err = parse_program(source, &mut interner, true).unwrap_err();
        let diag = Diagnostic::from_parse_error(&err, 0);
        let files = create_files("test.js", source);

        let json = diag.to_json(&files).unwrap();
        let parsed: JsonDiagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.severity, "error");
        assert_eq!(parsed.labels.len(), 1);
        assert_eq!(parsed.labels[0].start_line, 2);
        assert_eq!(parsed.labels[0].style, "primary");
    }
}
