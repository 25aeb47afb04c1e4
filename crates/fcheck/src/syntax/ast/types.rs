//! Type annotations as written in source

use crate::common::Span;
use std::fmt;

/// A type annotation, e.g. `integer`, `[real]`, `func(integer): boolean`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

impl TypeExpr {
    pub fn new(kind: TypeExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of a type annotation
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExprKind {
    Boolean,
    Integer,
    Real,
    Rational,
    Complex,
    String,
    /// `func(P1, P2): R`
    Function {
        params: Vec<TypeExpr>,
        ret: Box<TypeExpr>,
    },
    /// `[T]`
    Array(Box<TypeExpr>),
    /// `{K: V}`
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// `(T1, T2, ...)`
    Tuple(Vec<TypeExpr>),
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[TypeExpr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeExprKind::Boolean => write!(f, "boolean"),
            TypeExprKind::Integer => write!(f, "integer"),
            TypeExprKind::Real => write!(f, "real"),
            TypeExprKind::Rational => write!(f, "rational"),
            TypeExprKind::Complex => write!(f, "complex"),
            TypeExprKind::String => write!(f, "string"),
            TypeExprKind::Function { params, ret } => {
                write!(f, "func(")?;
                write_list(f, params)?;
                write!(f, "): {}", ret)
            }
            TypeExprKind::Array(element) => write!(f, "[{}]", element),
            TypeExprKind::Map { key, value } => write!(f, "{{{}: {}}}", key, value),
            TypeExprKind::Tuple(fields) => {
                write!(f, "(")?;
                write_list(f, fields)?;
                write!(f, ")")
            }
        }
    }
}
