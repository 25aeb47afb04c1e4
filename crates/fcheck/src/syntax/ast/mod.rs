//! F AST definitions

mod types;
mod expr;
mod stmt;

pub use types::*;
pub use expr::*;
pub use stmt::*;

use crate::common::Span;

/// A complete F program: an ordered sequence of top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub declarations: Vec<Declaration>,
    pub span: Span,
}

impl Program {
    pub fn new(declarations: Vec<Declaration>, span: Span) -> Self {
        Self { declarations, span }
    }
}

/// Variable declaration: `name [: Type] is Expr`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub value: Expr,
    pub span: Span,
}

impl Declaration {
    pub fn new(name: String, ty: Option<TypeExpr>, value: Expr, span: Span) -> Self {
        Self { name, ty, value, span }
    }
}
