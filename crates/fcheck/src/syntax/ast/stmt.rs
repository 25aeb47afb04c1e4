//! F statement AST nodes

use super::{Declaration, Expr};
use crate::common::Span;

/// A statement inside a function body
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Nested declaration: x is 5
    Declaration(Declaration),

    /// Assignment: target := value
    Assign {
        target: Expr,
        value: Expr,
    },

    /// Call whose result is discarded: f(x)
    Call {
        callee: Expr,
        args: Vec<Expr>,
    },

    /// If statement: if cond then ... [else ...] end
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },

    /// Loop: for/while header followed by `loop ... end`
    Loop {
        header: LoopHeader,
        body: Vec<Stmt>,
    },

    /// Return: return [value]
    Return(Option<Expr>),

    /// Break: break
    Break,

    /// Print: print(a, b)
    Print(Vec<Expr>),
}

/// Loop header
#[derive(Debug, Clone, PartialEq)]
pub struct LoopHeader {
    pub kind: LoopHeaderKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoopHeaderKind {
    /// for [var in] start [.. end]
    For {
        var: Option<String>,
        start: Expr,
        end: Option<Expr>,
    },
    /// while condition
    While(Expr),
}
