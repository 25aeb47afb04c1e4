//! F semantic analysis module

mod error;
mod infer;
mod matrix;
mod scope;
mod types;
mod validator;

#[cfg(test)]
mod tests;

pub use error::{SemanticError, Undetermined};
pub use infer::Inferred;
pub use matrix::{matrix_for, CompatibilityMatrix, ADDITIVE, DIVISION, LOGICAL, RELATIONAL};
pub use scope::{ScopeId, ScopeStack, Symbol, SymbolKind, SymbolTable, TupleField, TupleTable};
pub use types::{name_list, Type};
pub use validator::Validator;

use crate::syntax::ast::Program;

/// Validate a program with a fresh validator; an empty list means well-typed
pub fn validate(program: &Program) -> Vec<SemanticError> {
    Validator::new().validate(program)
}
