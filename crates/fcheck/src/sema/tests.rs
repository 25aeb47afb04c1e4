//! End-to-end validation tests over real F source

use super::*;
use crate::common::Position;
use crate::syntax::parse;
use pretty_assertions::assert_eq;

fn check(source: &str) -> Validator {
    let program = parse(source).unwrap();
    let mut validator = Validator::new();
    validator.check(&program);
    validator
}

fn messages(source: &str) -> Vec<String> {
    let program = parse(source).unwrap();
    validate(&program).into_iter().map(|e| e.message).collect()
}

fn assert_clean(validator: &Validator) {
    assert!(validator.errors().is_empty(), "unexpected errors: {:?}", validator.errors());
}

fn main_type(validator: &Validator, name: &str) -> Type {
    validator.symbol(name, ScopeId::Main).unwrap().ty.clone()
}

#[test]
fn test_accepts_well_typed_program() {
    let source = r#"
        size: integer is 10
        ratio is size / 4
        half: rational is 1\2
        z is 1i2 * 2
        names is ["a", "b"]
        ages is {"ann": 31, "bob": 42}
        point is (x is 1.5, y is 2.5)
        inc is func(v: integer) => v + 1
        eleven is inc(size)
        first is names["a"]
        px is point.x
        big is if size > 5 then "big" else "small" end
    "#;
    let validator = check(source);
    assert_clean(&validator);

    assert_eq!(main_type(&validator, "ratio"), Type::Real);
    assert_eq!(main_type(&validator, "half"), Type::Rational);
    assert_eq!(main_type(&validator, "z"), Type::Complex);
    assert_eq!(main_type(&validator, "ages"), Type::map(Type::String, Type::Integer));
    assert_eq!(main_type(&validator, "point"), Type::Tuple(vec![Type::Real, Type::Real]));
    assert_eq!(main_type(&validator, "eleven"), Type::Integer);
    assert_eq!(main_type(&validator, "first"), Type::String);
    assert_eq!(main_type(&validator, "px"), Type::Real);
    assert_eq!(main_type(&validator, "big"), Type::String);
}

#[test]
fn test_redeclaration_keeps_first_binding() {
    let validator = check("a is 1\na is \"text\"");
    assert_eq!(validator.errors().len(), 1);
    assert_eq!(validator.errors()[0].message, "Variable a is already declared.");
    assert_eq!(validator.errors()[0].position(), Position::new(2, 1));
    assert_eq!(main_type(&validator, "a"), Type::Integer);
}

#[test]
fn test_redeclared_value_is_not_inferred() {
    assert_eq!(
        messages("a is 1\na is missing"),
        vec!["Variable a is already declared."]
    );
}

#[test]
fn test_homogeneous_array() {
    let validator = check("xs is [1, 2, 3]");
    assert_clean(&validator);
    assert_eq!(main_type(&validator, "xs"), Type::array(Type::Integer));
}

#[test]
fn test_mixed_array_is_one_error() {
    let validator = check("xs is [1, 2.0]");
    assert_eq!(validator.errors().len(), 1);
    assert_eq!(
        validator.errors()[0].message,
        "Array elements have different types [IntegerType, RealType]"
    );
    assert!(validator.symbol("xs", ScopeId::Main).unwrap().poisoned);
}

#[test]
fn test_empty_collections() {
    assert_eq!(
        messages("xs is []\nm is {}"),
        vec![
            "Cannot infer element type of an empty array",
            "Cannot infer key and value types of an empty map",
        ]
    );
}

#[test]
fn test_mixed_map() {
    assert_eq!(
        messages("m is {1: \"a\", 2: 3}"),
        vec![
            "Map elements have different types \
             [(IntegerType, StringType), (IntegerType, IntegerType)]"
        ]
    );
}

#[test]
fn test_function_and_call() {
    let validator = check("inc is func(v: integer) => v + 1");
    assert_clean(&validator);
    assert_eq!(
        main_type(&validator, "inc"),
        Type::function(vec![Type::Integer], Type::Integer)
    );

    assert_eq!(
        messages("inc is func(v: integer) => v + 1\nbad is inc(1.5)"),
        vec!["Incompatible parameter types: expected [IntegerType], but received [RealType]"]
    );
}

#[test]
fn test_call_errors() {
    assert_eq!(
        messages("n is 1\nx is n(2)"),
        vec!["Value of type IntegerType can't be called"]
    );
    assert_eq!(
        messages("f is func(a: integer, b: integer) => a\nx is f(1)"),
        vec!["Wrong number of parameters, expected 2, received 1"]
    );
}

#[test]
fn test_conditional_with_missing_variable() {
    let ok = check("a is 1\nb is 2\nisOk: boolean is if a > b then true else false end");
    assert_clean(&ok);
    assert_eq!(main_type(&ok, "isOk"), Type::Boolean);

    let missing = check("b is 2\nisOk: boolean is if a > b then true else false end");
    assert_eq!(missing.errors().len(), 1);
    assert_eq!(
        missing.errors()[0].message,
        "Variable a is referenced before assignment"
    );
    assert_eq!(missing.errors()[0].position(), Position::new(2, 21));
    assert!(missing.symbol("isOk", ScopeId::Main).unwrap().poisoned);
}

#[test]
fn test_poisoned_symbol_suppresses_cascade() {
    assert_eq!(
        messages("a is missing + 1\nb is a * 2\nc is [a, a]"),
        vec!["Variable missing is referenced before assignment"]
    );
}

#[test]
fn test_conditional_branch_mismatch() {
    let validator = check("x is if true then 1 else \"one\" end");
    assert_eq!(validator.errors().len(), 1);
    assert_eq!(
        validator.errors()[0].message,
        "If expression returns different values of IntegerType and StringType"
    );
    assert_eq!(validator.errors()[0].position(), Position::new(1, 19));
}

#[test]
fn test_binary_mismatch_at_left_operand() {
    let validator = check("s is \"a\"\nx is 1 + s\ny is 1\\2 + 0.5\nz is true and 1");
    let errors: Vec<_> = validator
        .errors()
        .iter()
        .map(|e| (e.position(), e.message.as_str()))
        .collect();
    assert_eq!(
        errors,
        vec![
            (
                Position::new(2, 6),
                "SumExpression can't be applied to values of IntegerType and StringType"
            ),
            (
                Position::new(3, 6),
                "SumExpression can't be applied to values of RationalType and RealType"
            ),
            (
                Position::new(4, 6),
                "AndExpression can't be applied to values of BooleanType and IntegerType"
            ),
        ]
    );
}

#[test]
fn test_division_promotes_to_real() {
    let validator = check("q is 7 / 2\nc is 1 / 1i1");
    assert_eq!(main_type(&validator, "q"), Type::Real);
    assert_eq!(
        validator.errors()[0].message,
        "DivExpression can't be applied to values of IntegerType and ComplexType"
    );
}

#[test]
fn test_declared_type_mismatch() {
    let validator = check("r: real is 1");
    assert_eq!(
        validator.errors()[0].message,
        "Variable type IntegerType doesn't correspond to actual declaration type RealType"
    );
    assert_eq!(main_type(&validator, "r"), Type::Integer);

    assert_eq!(
        messages("xs: [real] is [1]"),
        vec![
            "Variable type ArrayType(IntegerType) doesn't correspond \
             to actual declaration type ArrayType(RealType)"
        ]
    );
}

#[test]
fn test_shadowing_across_function_scopes() {
    let source = r#"
        x is "outer"
        f is func(x: integer) => x + 1
        g is func() do
            x is 2.5
            return x
        end
        y is x
    "#;
    let validator = check(source);
    assert_clean(&validator);
    assert_eq!(main_type(&validator, "f"), Type::function(vec![Type::Integer], Type::Integer));
    assert_eq!(main_type(&validator, "g"), Type::function(vec![], Type::Real));
    assert_eq!(main_type(&validator, "y"), Type::String);
    assert_eq!(validator.symbol("x", ScopeId::Function(0)).unwrap().kind, SymbolKind::Parameter);
    assert_eq!(validator.symbol("x", ScopeId::Function(1)).unwrap().ty, Type::Real);
}

#[test]
fn test_duplicate_parameter() {
    assert_eq!(
        messages("f is func(a: integer, a: real) => a"),
        vec!["Variable a is already declared."]
    );
}

#[test]
fn test_unannotated_parameter_is_undefined() {
    let validator = check("id is func(v) => v");
    assert_clean(&validator);
    assert_eq!(
        main_type(&validator, "id"),
        Type::function(vec![Type::Undefined], Type::Undefined)
    );
}

#[test]
fn test_last_return_wins() {
    let source = r#"
        f is func(flag: boolean) do
            if flag then
                return 1
            else
                return "one"
            end
        end
        g is func() do
            h is func() do return 1 end
            print(h())
        end
    "#;
    let validator = check(source);
    assert_clean(&validator);
    assert_eq!(
        main_type(&validator, "f"),
        Type::function(vec![Type::Boolean], Type::Undefined)
    );
    assert_eq!(main_type(&validator, "g"), Type::function(vec![], Type::Undefined));
}

#[test]
fn test_loop_return_after_top_level_return() {
    let source = r#"
        g is func() do
            return 1
            for i in 1 .. 2 loop
                return 2.5
            end
        end
    "#;
    let validator = check(source);
    assert_clean(&validator);
    assert_eq!(main_type(&validator, "g"), Type::function(vec![], Type::Integer));
}

#[test]
fn test_declared_return_type_mismatch() {
    let validator = check("f is func(): real do\n    return 1\nend");
    assert_eq!(validator.errors().len(), 1);
    assert_eq!(
        validator.errors()[0].message,
        "Function defined return type RealType doesn't correspond to actual return type IntegerType"
    );
    assert_eq!(validator.errors()[0].position(), Position::new(1, 19));
    assert!(validator.symbol("f", ScopeId::Main).unwrap().poisoned);
}

#[test]
fn test_element_access() {
    let validator = check("xs is [1, 2]\nm is {\"k\": 1.5}\na is xs[0]\nb is m[\"k\"]");
    assert_clean(&validator);
    assert_eq!(main_type(&validator, "a"), Type::Integer);
    // Map access yields the key type
    assert_eq!(main_type(&validator, "b"), Type::String);

    assert_eq!(
        messages("xs is [\"a\"]\nm is {1: 2}\nn is 3\na is xs[0]\nb is m[true]\nc is n[0]"),
        vec![
            "Array index should be of StringType, but received IntegerType",
            "Map index should be of IntegerType, but received BooleanType",
            "Variable of type IntegerType is not subscriptable, \
             should be one of [MapType, ArrayType]",
        ]
    );
}

#[test]
fn test_tuple_fields() {
    let validator = check("t is (name is \"x\", 42)\na is t.name\nb is t.2");
    assert_clean(&validator);
    assert_eq!(main_type(&validator, "a"), Type::String);
    assert_eq!(main_type(&validator, "b"), Type::Integer);

    assert_eq!(
        messages("t is (a is 1)\nx is t.b\nn is 5\ny is n.a"),
        vec!["IntegerType is not a TupleType"]
    );
}

#[test]
fn test_missing_tuple_field_is_silent() {
    let validator = check("t is (a is 1)\nx is t.b\ny is x + 1");
    assert_clean(&validator);
    assert!(validator.symbol("x", ScopeId::Main).unwrap().poisoned);
    assert!(validator.symbol("y", ScopeId::Main).unwrap().poisoned);
}

#[test]
fn test_tuple_fields_not_visible_in_inner_scope() {
    let validator = check("t is (a is 1)\nf is func() => t.a\ng is t.a");
    assert_clean(&validator);
    assert!(validator.symbol("f", ScopeId::Main).unwrap().poisoned);
    assert_eq!(main_type(&validator, "g"), Type::Integer);
}

#[test]
fn test_tuple_field_through_call_is_silent() {
    let validator = check("mk is func() => (a is 1)\nx is mk().a");
    assert_clean(&validator);
    assert!(validator.symbol("x", ScopeId::Main).unwrap().poisoned);
}

#[test]
fn test_statements() {
    let source = r#"
        f is func(n: integer) do
            total is 0
            total := total + n
            total := "many"
            for i in 1 .. 2.5 loop print(i) end
            for [1, 2] loop break end
            while total < 10 loop total := total + 1 end
            print(total, unknown)
            return total
        end
    "#;
    assert_eq!(
        messages(source),
        vec![
            "Value of StringType can't be assigned to variable of IntegerType",
            "Loop range borders must have same type, but received IntegerType..RealType",
            "Variable unknown is referenced before assignment",
        ]
    );
}

#[test]
fn test_call_statement() {
    assert_eq!(
        messages("g is func(s: string) => s\nf is func() do g(1) end"),
        vec!["Incompatible parameter types: expected [StringType], but received [IntegerType]"]
    );
}

#[test]
fn test_errors_in_discovery_order() {
    let errors = validate(&parse("a is x\nb is [1, true]\nc is y").unwrap());
    let lines: Vec<_> = errors.iter().map(|e| e.position().line).collect();
    assert_eq!(lines, vec![1, 2, 3]);
}

#[test]
fn test_fresh_validator_per_run() {
    let program = parse("f is func() => 1\ng is func() => 2").unwrap();
    let first = check("f is func() => 1\ng is func() => 2");
    let second = check("f is func() => 1\ng is func() => 2");
    assert!(first.symbols().entries().iter().any(|(_, scope, _)| *scope == ScopeId::Main));
    assert_eq!(first.symbols().len(), second.symbols().len());
    assert!(validate(&program).is_empty());
}

#[test]
fn test_demo_programs() {
    let sample = check(include_str!("../../demos/sample.f"));
    assert_clean(&sample);
    assert_eq!(main_type(&sample, "six"), Type::Integer);

    let rejected = messages(include_str!("../../demos/type_errors.f"));
    assert_eq!(rejected.len(), 7);
    assert_eq!(rejected[0], "Variable dup is already declared.");
    assert_eq!(rejected[6], "Variable missing is referenced before assignment");
}
