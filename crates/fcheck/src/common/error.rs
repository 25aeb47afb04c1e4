//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use thiserror::Error;
use super::Span;

/// Checker error with source location
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexer error at {}: {message}", span.position)]
    Lexer { message: String, span: Span },

    #[error("Syntax error at {}: {message}", span.position)]
    Parser { message: String, span: Span },

    #[error("Type error at {}: {message}", span.position)]
    Semantic { message: String, span: Span },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn semantic(message: impl Into<String>, span: Span) -> Self {
        Self::Semantic {
            message: message.into(),
            span,
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::with_color(ColorChoice::Auto)
    }

    pub fn with_color(color: ColorChoice) -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(color),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// Build the codespan diagnostic for an error without emitting it
    pub fn diagnostic(file_id: usize, error: &CompileError) -> Diagnostic<usize> {
        let labelled = |title: &str, message: &str, span: &Span| {
            Diagnostic::error()
                .with_message(format!("{} at {}", title, span.position))
                .with_labels(vec![
                    Label::primary(file_id, span.range()).with_message(message)
                ])
        };

        match error {
            CompileError::Lexer { message, span } => labelled("Lexer error", message, span),
            CompileError::Parser { message, span } => labelled("Syntax error", message, span),
            CompileError::Semantic { message, span } => labelled("Type error", message, span),
            CompileError::Io(err) => {
                Diagnostic::error().with_message(format!("IO error: {}", err))
            }
        }
    }

    pub fn report_error(&self, file_id: usize, error: &CompileError) {
        let diagnostic = Self::diagnostic(file_id, error);
        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic);
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
