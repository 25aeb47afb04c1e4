//! Expression type inference

use super::error::Undetermined;
use super::matrix::matrix_for;
use super::scope::{Symbol, SymbolKind, TupleField};
use super::types::{name_list, Type};
use super::validator::Validator;
use crate::common::Span;
use crate::syntax::ast::*;
use tracing::trace;

/// Outcome of inferring an expression's type
pub type Inferred = Result<Type, Undetermined>;

impl Validator {
    /// Infer the type of an expression.
    ///
    /// Every subexpression is inferred, and its diagnostics recorded, before
    /// the node decides its own type. A child that is already undetermined
    /// makes the node undetermined without a further report.
    pub fn infer(&mut self, expr: &Expr) -> Inferred {
        match &expr.kind {
            ExprKind::BoolLiteral(_) => Ok(Type::Boolean),
            ExprKind::IntLiteral(_) => Ok(Type::Integer),
            ExprKind::RealLiteral(_) => Ok(Type::Real),
            ExprKind::RationalLiteral { .. } => Ok(Type::Rational),
            ExprKind::ComplexLiteral { .. } => Ok(Type::Complex),
            ExprKind::StringLiteral(_) => Ok(Type::String),
            ExprKind::Variable(name) => self.infer_variable(name, expr.span),
            ExprKind::Binary { op, left, right } => self.infer_binary(*op, left, right),
            ExprKind::Conditional {
                predicate,
                then_branch,
                else_branch,
            } => self.infer_conditional(predicate, then_branch, else_branch),
            ExprKind::Function(func) => self.infer_function(func),
            ExprKind::Array(elements) => self.infer_array(elements, expr.span),
            ExprKind::Map(entries) => self.infer_map(entries, expr.span),
            ExprKind::Tuple(elements) => self.infer_tuple(elements),
            ExprKind::Call { callee, args } => self.infer_call(callee, args, expr.span),
            ExprKind::Index { target, index } => self.infer_index(target, index, expr.span),
            ExprKind::NamedField { target, field } => self.infer_field(target, field, expr.span),
            ExprKind::UnnamedField { target, index } => {
                self.infer_field(target, &index.to_string(), expr.span)
            }
        }
    }

    fn infer_variable(&mut self, name: &str, span: Span) -> Inferred {
        match self.symbols.lookup(name, &self.scopes) {
            Some((_, symbol)) if symbol.poisoned => Err(Undetermined),
            Some((_, symbol)) => Ok(symbol.ty.clone()),
            None => Err(self.error(
                format!("Variable {} is referenced before assignment", name),
                span,
            )),
        }
    }

    fn infer_binary(&mut self, op: BinOp, left: &Expr, right: &Expr) -> Inferred {
        let lhs = self.infer(left);
        let rhs = self.infer(right);
        let (lhs, rhs) = (lhs?, rhs?);

        match matrix_for(op.family()).result(&lhs, &rhs) {
            Some(result) => Ok(result.clone()),
            None => Err(self.error(
                format!(
                    "{} can't be applied to values of {} and {}",
                    op.node_name(),
                    lhs.name(),
                    rhs.name()
                ),
                left.span,
            )),
        }
    }

    fn infer_conditional(
        &mut self,
        predicate: &Expr,
        then_branch: &Expr,
        else_branch: &Expr,
    ) -> Inferred {
        let predicate = self.infer(predicate);
        let then_ty = self.infer(then_branch);
        let else_ty = self.infer(else_branch);
        predicate?;
        let (then_ty, else_ty) = (then_ty?, else_ty?);

        if then_ty == else_ty {
            Ok(then_ty)
        } else {
            Err(self.error(
                format!(
                    "If expression returns different values of {} and {}",
                    then_ty.name(),
                    else_ty.name()
                ),
                then_branch.span,
            ))
        }
    }

    fn infer_function(&mut self, func: &FunctionLiteral) -> Inferred {
        let scope = self.scopes.push_function();
        trace!(%scope, params = func.params.len(), "enter function scope");

        let mut params = Vec::with_capacity(func.params.len());
        for param in &func.params {
            let ty = param.ty.as_ref().map_or(Type::Undefined, Type::from_annotation);
            self.define(&param.name, Symbol::new(SymbolKind::Parameter, ty.clone()), param.span);
            params.push(ty);
        }

        self.function_depth += 1;
        let body = match &func.body.kind {
            BodyKind::Expr(expr) => self.infer(expr),
            BodyKind::Block(stmts) => {
                // Last top-level `return` wins; returns nested in if or loop
                // statements are checked but do not type the function
                let mut body = Ok(Type::Undefined);
                for stmt in stmts {
                    match &stmt.kind {
                        StmtKind::Return(value) => body = self.infer_return(value.as_ref()),
                        _ => self.validate_stmt(stmt),
                    }
                }
                body
            }
        };
        self.function_depth -= 1;

        self.scopes.pop();
        trace!(%scope, "leave function scope");

        let body = body?;
        if let Some(annotation) = &func.return_type {
            let declared = Type::from_annotation(annotation);
            if declared != body {
                return Err(self.error(
                    format!(
                        "Function defined return type {} doesn't correspond \
                         to actual return type {}",
                        declared.name(),
                        body.name()
                    ),
                    func.body.span,
                ));
            }
        }

        Ok(Type::function(params, body))
    }

    fn infer_array(&mut self, elements: &[Expr], span: Span) -> Inferred {
        let types: Vec<Inferred> = elements.iter().map(|element| self.infer(element)).collect();
        let types: Vec<Type> = types.into_iter().collect::<Result<_, _>>()?;

        let Some((first, rest)) = types.split_first() else {
            return Err(self.error("Cannot infer element type of an empty array", span));
        };
        if rest.iter().all(|ty| ty == first) {
            Ok(Type::array(first.clone()))
        } else {
            Err(self.error(
                format!("Array elements have different types {}", name_list(&types)),
                span,
            ))
        }
    }

    fn infer_map(&mut self, entries: &[MapEntry], span: Span) -> Inferred {
        let mut pairs = Vec::with_capacity(entries.len());
        let mut undetermined = false;
        for entry in entries {
            let key = self.infer(&entry.key);
            let value = self.infer(&entry.value);
            match (key, value) {
                (Ok(key), Ok(value)) => pairs.push((key, value)),
                _ => undetermined = true,
            }
        }
        if undetermined {
            return Err(Undetermined);
        }

        let Some((first, rest)) = pairs.split_first() else {
            return Err(self.error("Cannot infer key and value types of an empty map", span));
        };
        if rest.iter().all(|pair| pair == first) {
            Ok(Type::map(first.0.clone(), first.1.clone()))
        } else {
            let listed: Vec<_> = pairs
                .iter()
                .map(|(key, value)| format!("({}, {})", key.name(), value.name()))
                .collect();
            Err(self.error(
                format!("Map elements have different types [{}]", listed.join(", ")),
                span,
            ))
        }
    }

    fn infer_tuple(&mut self, elements: &[TupleElement]) -> Inferred {
        let mut fields: Vec<TupleField> = Vec::with_capacity(elements.len());
        let mut undetermined = false;
        for (i, element) in elements.iter().enumerate() {
            match self.infer(&element.value) {
                Ok(ty) => fields.push((element.field_name(i), ty)),
                Err(Undetermined) => undetermined = true,
            }
        }
        if undetermined {
            return Err(Undetermined);
        }

        let types = fields.iter().map(|(_, ty)| ty.clone()).collect();
        if let Some(owner) = &self.current_decl {
            let scope = self.scopes.current();
            trace!(owner = owner.as_str(), %scope, fields = fields.len(), "record tuple");
            self.tuples.record(owner, scope, fields);
        }

        Ok(Type::Tuple(types))
    }

    pub(super) fn infer_call(&mut self, callee: &Expr, args: &[Expr], span: Span) -> Inferred {
        let callee_ty = self.infer(callee);
        let arg_types: Vec<Inferred> = args.iter().map(|arg| self.infer(arg)).collect();
        let callee_ty = callee_ty?;

        let Some((params, ret)) = callee_ty.as_function() else {
            return Err(self.error(
                format!("Value of type {} can't be called", callee_ty.name()),
                span,
            ));
        };

        if params.len() != args.len() {
            return Err(self.error(
                format!(
                    "Wrong number of parameters, expected {}, received {}",
                    params.len(),
                    args.len()
                ),
                span,
            ));
        }

        let arg_types: Vec<Type> = arg_types.into_iter().collect::<Result<_, _>>()?;
        if params != arg_types.as_slice() {
            return Err(self.error(
                format!(
                    "Incompatible parameter types: expected {}, but received {}",
                    name_list(params),
                    name_list(&arg_types)
                ),
                span,
            ));
        }

        Ok(ret.clone())
    }

    fn infer_index(&mut self, target: &Expr, index: &Expr, span: Span) -> Inferred {
        let target_ty = self.infer(target);
        let index_ty = self.infer(index);
        let (target_ty, index_ty) = (target_ty?, index_ty?);

        let (expected, label) = match &target_ty {
            Type::Array(element) => (&**element, "Array"),
            Type::Map(key, _) => (&**key, "Map"),
            other => {
                return Err(self.error(
                    format!(
                        "Variable of type {} is not subscriptable, \
                         should be one of [MapType, ArrayType]",
                        other.name()
                    ),
                    span,
                ));
            }
        };

        if index_ty == *expected {
            Ok(index_ty)
        } else {
            Err(self.error(
                format!(
                    "{} index should be of {}, but received {}",
                    label,
                    expected.name(),
                    index_ty.name()
                ),
                span,
            ))
        }
    }

    fn infer_field(&mut self, target: &Expr, field: &str, span: Span) -> Inferred {
        let target_ty = self.infer(target)?;
        if !matches!(target_ty, Type::Tuple(_)) {
            return Err(self.error(format!("{} is not a TupleType", target_ty.name()), span));
        }

        // Field names are only known for tuples bound directly to a variable
        // in the current scope; an unknown owner or field is undetermined
        let ExprKind::Variable(owner) = &target.kind else {
            return Err(Undetermined);
        };
        self.tuples
            .lookup(owner, self.scopes.current())
            .and_then(|fields| fields.iter().find(|(name, _)| name == field))
            .map(|(_, ty)| ty.clone())
            .ok_or(Undetermined)
    }
}
