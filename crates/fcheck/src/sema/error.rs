//! Semantic error collection

use crate::common::{CompileError, Position, Span};
use std::fmt;

/// A type error found while validating a program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticError {
    pub message: String,
    pub span: Span,
}

impl SemanticError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// 1-based line and column of the offending construct
    pub fn position(&self) -> Position {
        self.span.position
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position(), self.message)
    }
}

impl From<SemanticError> for CompileError {
    fn from(error: SemanticError) -> Self {
        CompileError::semantic(error.message, error.span)
    }
}

/// Marker for an expression whose type could not be determined.
///
/// The diagnostic explaining why has already been recorded, or the failure
/// is deliberately silent to avoid cascading reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undetermined;
