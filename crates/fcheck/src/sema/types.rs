//! F type model

use crate::syntax::ast::{TypeExpr, TypeExprKind};
use std::fmt;

/// A checked F type.
///
/// Equality and hashing are structural: two `Array(Integer)` values built
/// independently compare equal and land in the same hash bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Boolean,
    Integer,
    Real,
    Rational,
    Complex,
    String,
    /// Parameter types followed by the return type
    Function(Vec<Type>),
    Array(Box<Type>),
    Map(Box<Type>, Box<Type>),
    Tuple(Vec<Type>),
    /// Produced by the language itself: unannotated parameters and
    /// statement bodies without a `return`
    Undefined,
}

impl Type {
    pub fn function(params: Vec<Type>, ret: Type) -> Self {
        let mut types = params;
        types.push(ret);
        Type::Function(types)
    }

    pub fn array(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map(Box::new(key), Box::new(value))
    }

    /// Class-style name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Type::Boolean => "BooleanType",
            Type::Integer => "IntegerType",
            Type::Real => "RealType",
            Type::Rational => "RationalType",
            Type::Complex => "ComplexType",
            Type::String => "StringType",
            Type::Function(_) => "FunctionType",
            Type::Array(_) => "ArrayType",
            Type::Map(..) => "MapType",
            Type::Tuple(_) => "TupleType",
            Type::Undefined => "UndefinedType",
        }
    }

    /// Split a function type into its parameters and return type
    pub fn as_function(&self) -> Option<(&[Type], &Type)> {
        match self {
            Type::Function(types) => types.split_last().map(|(ret, params)| (params, ret)),
            _ => None,
        }
    }

    /// Normalize a source annotation into a type
    pub fn from_annotation(annotation: &TypeExpr) -> Self {
        match &annotation.kind {
            TypeExprKind::Boolean => Type::Boolean,
            TypeExprKind::Integer => Type::Integer,
            TypeExprKind::Real => Type::Real,
            TypeExprKind::Rational => Type::Rational,
            TypeExprKind::Complex => Type::Complex,
            TypeExprKind::String => Type::String,
            TypeExprKind::Function { params, ret } => Type::function(
                params.iter().map(Type::from_annotation).collect(),
                Type::from_annotation(ret),
            ),
            TypeExprKind::Array(element) => Type::array(Type::from_annotation(element)),
            TypeExprKind::Map { key, value } => {
                Type::map(Type::from_annotation(key), Type::from_annotation(value))
            }
            TypeExprKind::Tuple(fields) => {
                Type::Tuple(fields.iter().map(Type::from_annotation).collect())
            }
        }
    }
}

/// `[IntegerType, RealType]`
pub fn name_list<'a>(types: impl IntoIterator<Item = &'a Type>) -> String {
    let names: Vec<_> = types.into_iter().map(Type::name).collect();
    format!("[{}]", names.join(", "))
}

fn write_joined(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", ty)?;
    }
    Ok(())
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Function(types) => {
                let (ret, params) = match types.split_last() {
                    Some(split) => split,
                    None => return write!(f, "FunctionType()"),
                };
                write!(f, "FunctionType(")?;
                write_joined(f, params)?;
                if params.is_empty() {
                    write!(f, "-> {})", ret)
                } else {
                    write!(f, " -> {})", ret)
                }
            }
            Type::Array(element) => write!(f, "ArrayType({})", element),
            Type::Map(key, value) => write!(f, "MapType({}, {})", key, value),
            Type::Tuple(fields) => {
                write!(f, "TupleType(")?;
                write_joined(f, fields)?;
                write!(f, ")")
            }
            other => write!(f, "{}", other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse;
    use std::collections::HashSet;

    fn annotation(source: &str) -> Type {
        let program = parse(&format!("x: {} is 0", source)).unwrap();
        Type::from_annotation(program.declarations[0].ty.as_ref().unwrap())
    }

    #[test]
    fn test_structural_equality_and_hash() {
        let a = Type::array(Type::Integer);
        let b = Type::array(Type::Integer);
        assert_eq!(a, b);
        assert_ne!(a, Type::array(Type::Real));

        let set: HashSet<_> = [a, b, Type::Undefined, Type::Undefined].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_function_parts() {
        let f = Type::function(vec![Type::Integer, Type::Real], Type::Boolean);
        let (params, ret) = f.as_function().unwrap();
        assert_eq!(params, &[Type::Integer, Type::Real]);
        assert_eq!(ret, &Type::Boolean);
        assert!(Type::Integer.as_function().is_none());
    }

    #[test]
    fn test_names_and_display() {
        assert_eq!(Type::map(Type::String, Type::Real).name(), "MapType");
        assert_eq!(Type::array(Type::Integer).to_string(), "ArrayType(IntegerType)");
        assert_eq!(
            Type::function(vec![Type::Integer], Type::Integer).to_string(),
            "FunctionType(IntegerType -> IntegerType)"
        );
        assert_eq!(
            Type::function(vec![], Type::Real).to_string(),
            "FunctionType(-> RealType)"
        );
        assert_eq!(
            Type::Tuple(vec![Type::Integer, Type::String]).to_string(),
            "TupleType(IntegerType, StringType)"
        );
        assert_eq!(name_list(&[Type::Integer, Type::Real]), "[IntegerType, RealType]");
    }

    #[test]
    fn test_annotation_normalization() {
        assert_eq!(annotation("integer"), Type::Integer);
        assert_eq!(
            annotation("func(integer, [real]): {string: boolean}"),
            Type::function(
                vec![Type::Integer, Type::array(Type::Real)],
                Type::map(Type::String, Type::Boolean)
            )
        );
        assert_eq!(
            annotation("(rational, complex)"),
            Type::Tuple(vec![Type::Rational, Type::Complex])
        );
    }
}
