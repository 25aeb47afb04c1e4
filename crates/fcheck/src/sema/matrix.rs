//! Operand compatibility matrices for binary operators

use super::types::Type;
use crate::syntax::ast::OperatorFamily;
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Legal `(left, right)` operand pairs of one operator family and the
/// result type each pair produces
#[derive(Debug)]
pub struct CompatibilityMatrix {
    entries: HashMap<(Type, Type), Type>,
}

impl CompatibilityMatrix {
    fn from_entries(entries: &[(Type, Type, Type)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(left, right, result)| ((left.clone(), right.clone()), result.clone()))
                .collect(),
        }
    }

    /// Result type of `left op right`, or `None` when the pair is illegal
    pub fn result(&self, left: &Type, right: &Type) -> Option<&Type> {
        self.entries.get(&(left.clone(), right.clone()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use Type::{Boolean as Bool, Complex as Cx, Integer as Int, Rational as Rat, Real};

lazy_static! {
    /// `+`, `-`, `*`
    pub static ref ADDITIVE: CompatibilityMatrix = CompatibilityMatrix::from_entries(&[
        (Int, Int, Int),
        (Int, Real, Real),
        (Real, Int, Real),
        (Real, Real, Real),
        (Int, Rat, Rat),
        (Rat, Int, Rat),
        (Rat, Rat, Rat),
        (Int, Cx, Cx),
        (Real, Cx, Cx),
        (Cx, Int, Cx),
        (Cx, Real, Cx),
        (Cx, Cx, Cx),
    ]);

    /// `/`; integer division yields a real
    pub static ref DIVISION: CompatibilityMatrix = CompatibilityMatrix::from_entries(&[
        (Int, Int, Real),
        (Int, Real, Real),
        (Real, Int, Real),
        (Real, Real, Real),
        (Int, Rat, Rat),
        (Rat, Int, Rat),
        (Rat, Rat, Rat),
        (Cx, Int, Cx),
        (Cx, Real, Cx),
        (Cx, Cx, Cx),
    ]);

    /// `<`, `<=`, `>`, `>=`, `==`, `!=`
    pub static ref RELATIONAL: CompatibilityMatrix = CompatibilityMatrix::from_entries(&[
        (Int, Int, Bool),
        (Int, Real, Bool),
        (Real, Int, Bool),
        (Real, Real, Bool),
        (Int, Rat, Bool),
        (Rat, Int, Bool),
        (Rat, Rat, Bool),
        (Cx, Cx, Bool),
    ]);

    /// `and`, `or`, `xor`
    pub static ref LOGICAL: CompatibilityMatrix =
        CompatibilityMatrix::from_entries(&[(Bool, Bool, Bool)]);
}

/// The matrix governing an operator family
pub fn matrix_for(family: OperatorFamily) -> &'static CompatibilityMatrix {
    match family {
        OperatorFamily::Additive => &ADDITIVE,
        OperatorFamily::Division => &DIVISION,
        OperatorFamily::Relational => &RELATIONAL,
        OperatorFamily::Logical => &LOGICAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Type; 6] = [Int, Real, Rat, Cx, Type::String, Bool];

    #[test]
    fn test_table_sizes() {
        assert_eq!(ADDITIVE.len(), 12);
        assert_eq!(DIVISION.len(), 10);
        assert_eq!(RELATIONAL.len(), 8);
        assert_eq!(LOGICAL.len(), 1);
    }

    #[test]
    fn test_numeric_promotion() {
        assert_eq!(ADDITIVE.result(&Int, &Int), Some(&Int));
        assert_eq!(ADDITIVE.result(&Int, &Real), Some(&Real));
        assert_eq!(ADDITIVE.result(&Rat, &Int), Some(&Rat));
        assert_eq!(ADDITIVE.result(&Real, &Cx), Some(&Cx));
        assert_eq!(DIVISION.result(&Int, &Int), Some(&Real));
        assert_eq!(DIVISION.result(&Cx, &Real), Some(&Cx));
        assert_eq!(RELATIONAL.result(&Int, &Rat), Some(&Bool));
        assert_eq!(LOGICAL.result(&Bool, &Bool), Some(&Bool));
    }

    #[test]
    fn test_asymmetric_gaps() {
        assert_eq!(ADDITIVE.result(&Rat, &Real), None);
        assert_eq!(ADDITIVE.result(&Rat, &Cx), None);
        assert_eq!(DIVISION.result(&Int, &Cx), None);
        assert_eq!(DIVISION.result(&Real, &Cx), None);
        assert_eq!(RELATIONAL.result(&Rat, &Real), None);
        assert_eq!(RELATIONAL.result(&Int, &Cx), None);
    }

    #[test]
    fn test_string_and_boolean_never_arithmetic() {
        for matrix in [&*ADDITIVE, &*DIVISION, &*RELATIONAL] {
            for other in &ALL {
                assert_eq!(matrix.result(&Type::String, other), None);
                assert_eq!(matrix.result(other, &Type::String), None);
                assert_eq!(matrix.result(&Bool, other), None);
                assert_eq!(matrix.result(other, &Bool), None);
            }
        }
    }

    #[test]
    fn test_logical_only_booleans() {
        for left in &ALL {
            for right in &ALL {
                let expected = (*left == Bool && *right == Bool).then_some(&Bool);
                assert_eq!(LOGICAL.result(left, right), expected);
            }
        }
    }

    #[test]
    fn test_results_are_numeric_or_boolean() {
        for matrix in [&*ADDITIVE, &*DIVISION] {
            for left in &ALL {
                for right in &ALL {
                    if let Some(result) = matrix.result(left, right) {
                        assert!(matches!(
                            result,
                            Type::Integer | Type::Real | Type::Rational | Type::Complex
                        ));
                    }
                }
            }
        }
    }

    #[test]
    fn test_matrix_for_family() {
        assert!(std::ptr::eq(matrix_for(OperatorFamily::Division), &*DIVISION));
        assert!(std::ptr::eq(matrix_for(OperatorFamily::Logical), &*LOGICAL));
    }
}
