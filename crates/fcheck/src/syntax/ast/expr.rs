//! F expression AST nodes

use super::{Stmt, TypeExpr};
use crate::common::Span;

/// An F expression
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Expression kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Boolean literal: true, false
    BoolLiteral(bool),
    /// Integer literal: 42
    IntLiteral(i64),
    /// Real literal: 3.14
    RealLiteral(f64),
    /// Rational literal: 3\4
    RationalLiteral { numerator: i64, denominator: i64 },
    /// Complex literal: 1i2
    ComplexLiteral { re: f64, im: f64 },
    /// String literal: "hello"
    StringLiteral(String),

    /// Variable reference: x
    Variable(String),

    /// Binary operation: a + b
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Conditional expression: if p then a else b end
    Conditional {
        predicate: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },

    /// Function literal: func(x: integer) => x + 1
    Function(FunctionLiteral),

    /// Array literal: [a, b, c]
    Array(Vec<Expr>),
    /// Map literal: {k1: v1, k2: v2}
    Map(Vec<MapEntry>),
    /// Tuple literal: (x is 1, 2)
    Tuple(Vec<TupleElement>),

    /// Call: f(x, y)
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// Element access: xs[i]
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    /// Named tuple field: t.name
    NamedField {
        target: Box<Expr>,
        field: String,
    },
    /// Unnamed tuple field: t.1
    UnnamedField {
        target: Box<Expr>,
        index: usize,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    // Arithmetic
    Add,    // +
    Sub,    // -
    Mul,    // *
    Div,    // /

    // Comparison
    Lt,     // <
    Le,     // <=
    Gt,     // >
    Ge,     // >=
    Eq,     // ==
    Ne,     // !=

    // Logical
    And,    // and
    Or,     // or
    Xor,    // xor
}

/// Groups of operators that share an operand compatibility table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorFamily {
    Additive,
    Division,
    Relational,
    Logical,
}

impl BinOp {
    pub fn family(&self) -> OperatorFamily {
        match self {
            BinOp::Add | BinOp::Sub | BinOp::Mul => OperatorFamily::Additive,
            BinOp::Div => OperatorFamily::Division,
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge | BinOp::Eq | BinOp::Ne => {
                OperatorFamily::Relational
            }
            BinOp::And | BinOp::Or | BinOp::Xor => OperatorFamily::Logical,
        }
    }

    pub fn is_comparison(&self) -> bool {
        self.family() == OperatorFamily::Relational
    }

    pub fn precedence(&self) -> u8 {
        match self {
            BinOp::And | BinOp::Or | BinOp::Xor => 1,
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge | BinOp::Eq | BinOp::Ne => 2,
            BinOp::Add | BinOp::Sub => 3,
            BinOp::Mul | BinOp::Div => 4,
        }
    }

    /// Name of the expression node in diagnostics
    pub fn node_name(&self) -> &'static str {
        match self {
            BinOp::Add => "SumExpression",
            BinOp::Sub => "SubExpression",
            BinOp::Mul => "MultExpression",
            BinOp::Div => "DivExpression",
            BinOp::Lt => "LessExpression",
            BinOp::Le => "LessEqExpression",
            BinOp::Gt => "GreaterExpression",
            BinOp::Ge => "GreaterEqExpression",
            BinOp::Eq => "EqualExpression",
            BinOp::Ne => "NotEqExpression",
            BinOp::And => "AndExpression",
            BinOp::Or => "OrExpression",
            BinOp::Xor => "XorExpression",
        }
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Mul => write!(f, "*"),
            BinOp::Div => write!(f, "/"),
            BinOp::Lt => write!(f, "<"),
            BinOp::Le => write!(f, "<="),
            BinOp::Gt => write!(f, ">"),
            BinOp::Ge => write!(f, ">="),
            BinOp::Eq => write!(f, "=="),
            BinOp::Ne => write!(f, "!="),
            BinOp::And => write!(f, "and"),
            BinOp::Or => write!(f, "or"),
            BinOp::Xor => write!(f, "xor"),
        }
    }
}

/// Function literal: `func(params) [: ret] => expr` or `func(params) [: ret] do stmts end`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub params: Vec<Param>,
    pub return_type: Option<TypeExpr>,
    pub body: FunctionBody,
}

/// Function parameter with optional annotation
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub span: Span,
}

/// Function body
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBody {
    pub kind: BodyKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodyKind {
    /// `=> expr`
    Expr(Box<Expr>),
    /// `do stmts end`
    Block(Vec<Stmt>),
}

/// Map literal entry: `key: value`
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub key: Expr,
    pub value: Expr,
    pub span: Span,
}

/// Tuple literal element: `name is value` or just `value`
#[derive(Debug, Clone, PartialEq)]
pub struct TupleElement {
    pub name: Option<String>,
    pub value: Expr,
    pub span: Span,
}

impl TupleElement {
    /// Field name used for lookups; unnamed elements are named by their 1-based ordinal
    pub fn field_name(&self, index: usize) -> String {
        self.name.clone().unwrap_or_else(|| (index + 1).to_string())
    }
}
