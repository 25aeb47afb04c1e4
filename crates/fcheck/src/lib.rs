//! F Checker - semantic validator for the F expression language
//!
//! This library parses F programs and checks them against F's structural
//! type system: implicit numeric promotion, scoped symbol resolution,
//! function and tuple typing, and per-operator compatibility matrices.
//!
//! ## Architecture
//!
//! The checker is organized into:
//! - **Syntax** (`syntax/`): logos lexer, AST and recursive descent parser
//! - **Sema** (`sema/`): type model, compatibility matrices, scopes and the validator
//! - **Driver** (`driver/`): pipeline tying parsing, validation and reporting together
//! - **Common** (`common/`): Shared infrastructure (errors, spans)

pub mod common;
pub mod syntax;
pub mod sema;
pub mod driver;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, DiagnosticReporter, Span};
pub use driver::{check_source, CheckConfig, CheckContext, CheckOutcome};
pub use sema::{validate, SemanticError, Type, Validator};
pub use syntax::parse;
