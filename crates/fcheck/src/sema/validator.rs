//! Declaration and statement validation

use super::error::{SemanticError, Undetermined};
use super::infer::Inferred;
use super::scope::{ScopeId, ScopeStack, Symbol, SymbolKind, SymbolTable, TupleTable};
use super::types::Type;
use crate::common::Span;
use crate::syntax::ast::*;
use tracing::{debug, instrument, trace};

/// Per-run semantic validator.
///
/// Owns every piece of mutable state of one validation run: the scope
/// stack and its counters, the symbol and tuple tables, the declaration
/// currently being validated, the function nesting depth and the collected
/// errors.
pub struct Validator {
    pub(super) scopes: ScopeStack,
    pub(super) symbols: SymbolTable,
    pub(super) tuples: TupleTable,
    pub(super) errors: Vec<SemanticError>,
    /// Name of the declaration whose value is being inferred
    pub(super) current_decl: Option<String>,
    /// Number of function literals enclosing the current statement
    pub(super) function_depth: usize,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            scopes: ScopeStack::new(),
            symbols: SymbolTable::new(),
            tuples: TupleTable::new(),
            errors: Vec::new(),
            current_decl: None,
            function_depth: 0,
        }
    }

    /// Validate a program and return every error found, in discovery order
    pub fn validate(mut self, program: &Program) -> Vec<SemanticError> {
        self.check(program);
        self.errors
    }

    /// Validate a program, keeping the tables around for inspection
    #[instrument(level = "debug", skip_all, fields(declarations = program.declarations.len()))]
    pub fn check(&mut self, program: &Program) {
        for decl in &program.declarations {
            self.validate_declaration(decl);
        }
        debug!(errors = self.errors.len(), symbols = self.symbols.len(), "validation finished");
    }

    pub fn errors(&self) -> &[SemanticError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<SemanticError> {
        self.errors
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbol(&self, name: &str, scope: ScopeId) -> Option<&Symbol> {
        self.symbols.get(name, scope)
    }

    /// Record an error and produce the marker for an undetermined type
    pub(super) fn error(&mut self, message: impl Into<String>, span: Span) -> Undetermined {
        let error = SemanticError::new(message, span);
        debug!(position = %error.position(), message = %error.message, "semantic error");
        self.errors.push(error);
        Undetermined
    }

    /// Bind `name` in the current scope, reporting a redeclaration
    pub(super) fn define(&mut self, name: &str, symbol: Symbol, span: Span) {
        let scope = self.scopes.current();
        trace!(ident = name, %scope, ty = %symbol.ty, kind = %symbol.kind, "define");
        if let Err(message) = self.symbols.define(name, scope, symbol) {
            self.error(message, span);
        }
    }

    // ==================== Declarations ====================

    fn validate_declaration(&mut self, decl: &Declaration) {
        let scope = self.scopes.current();
        if self.symbols.contains(&decl.name, scope) {
            self.error(format!("Variable {} is already declared.", decl.name), decl.span);
            return;
        }

        let saved = self.current_decl.replace(decl.name.clone());
        let inferred = self.infer(&decl.value);
        self.current_decl = saved;

        let symbol = match inferred {
            Ok(ty) => {
                if let Some(annotation) = &decl.ty {
                    let declared = Type::from_annotation(annotation);
                    if declared != ty {
                        self.error(
                            format!(
                                "Variable type {} doesn't correspond to actual declaration type {}",
                                ty, declared
                            ),
                            decl.span,
                        );
                    }
                }
                Symbol::new(SymbolKind::Variable, ty)
            }
            Err(Undetermined) => Symbol::poisoned(SymbolKind::Variable),
        };

        self.define(&decl.name, symbol, decl.span);
    }

    // ==================== Statements ====================

    pub(super) fn validate_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Declaration(decl) => self.validate_declaration(decl),
            StmtKind::Assign { target, value } => {
                let lhs = self.infer(target);
                let rhs = self.infer(value);
                if let (Ok(lhs), Ok(rhs)) = (lhs, rhs) {
                    if lhs != rhs {
                        self.error(
                            format!(
                                "Value of {} can't be assigned to variable of {}",
                                rhs.name(),
                                lhs.name()
                            ),
                            stmt.span,
                        );
                    }
                }
            }
            StmtKind::Call { callee, args } => {
                let _ = self.infer_call(callee, args, stmt.span);
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let _ = self.infer(condition);
                for stmt in then_branch {
                    self.validate_stmt(stmt);
                }
                for stmt in else_branch.iter().flatten() {
                    self.validate_stmt(stmt);
                }
            }
            StmtKind::Loop { header, body } => self.validate_loop(header, body),
            // Only top-level returns of a block body decide the function type
            StmtKind::Return(value) => {
                let _ = self.infer_return(value.as_ref());
                if self.function_depth == 0 {
                    self.error("Return statement outside of a function body", stmt.span);
                }
            }
            StmtKind::Break => {}
            StmtKind::Print(args) => {
                for arg in args {
                    let _ = self.infer(arg);
                }
            }
        }
    }

    /// Type of `return [value]`; a bare `return` is `Undefined`
    pub(super) fn infer_return(&mut self, value: Option<&Expr>) -> Inferred {
        match value {
            Some(expr) => self.infer(expr),
            None => Ok(Type::Undefined),
        }
    }

    fn validate_loop(&mut self, header: &LoopHeader, body: &[Stmt]) {
        let scope = self.scopes.push_loop();
        trace!(%scope, "enter loop scope");

        match &header.kind {
            LoopHeaderKind::For { var, start, end } => {
                let start_ty = self.infer(start);
                if let Some(name) = var {
                    let symbol = match &start_ty {
                        Ok(ty) => Symbol::new(SymbolKind::LoopVariable, ty.clone()),
                        Err(Undetermined) => Symbol::poisoned(SymbolKind::LoopVariable),
                    };
                    self.define(name, symbol, header.span);
                }

                if let Some(end) = end {
                    let end_ty = self.infer(end);
                    if let (Ok(start_ty), Ok(end_ty)) = (&start_ty, &end_ty) {
                        if start_ty != end_ty {
                            self.error(
                                format!(
                                    "Loop range borders must have same type, but received {}..{}",
                                    start_ty.name(),
                                    end_ty.name()
                                ),
                                header.span,
                            );
                        }
                    }
                }
            }
            LoopHeaderKind::While(condition) => {
                let _ = self.infer(condition);
            }
        }

        for stmt in body {
            self.validate_stmt(stmt);
        }

        self.scopes.pop();
        trace!(%scope, "leave loop scope");
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Position;
    use crate::syntax::parse;

    #[test]
    fn test_return_outside_function() {
        let stmt = Stmt::new(StmtKind::Return(None), Span::new(0, 6, Position::new(4, 2)));
        let mut validator = Validator::new();
        validator.validate_stmt(&stmt);

        let errors = validator.into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Return statement outside of a function body");
        assert_eq!(errors[0].position(), Position::new(4, 2));
    }

    #[test]
    fn test_nested_return_is_checked_inside_function() {
        let program = parse(
            "f is func() do
                if true then
                    return missing
                end
            end",
        )
        .unwrap();
        let mut validator = Validator::new();
        validator.check(&program);

        let errors = validator.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Variable missing is referenced before assignment");
        assert_eq!(validator.function_depth, 0);
        assert_eq!(
            validator.symbol("f", ScopeId::Main).unwrap().ty,
            Type::function(vec![], Type::Undefined)
        );
    }

    #[test]
    fn test_check_keeps_tables() {
        let program = parse("a is 1\nb is a + 2.5").unwrap();
        let mut validator = Validator::new();
        validator.check(&program);

        assert!(validator.errors().is_empty());
        assert_eq!(validator.symbol("b", ScopeId::Main).unwrap().ty, Type::Real);
        assert_eq!(validator.symbols().len(), 2);
    }

    #[test]
    fn test_loop_variable_scoped_to_loop() {
        let program = parse(
            "f is func() do
                for i in 1 .. 3 loop print(i) end
                print(i)
            end",
        )
        .unwrap();
        let mut validator = Validator::new();
        validator.check(&program);

        let symbol = validator.symbol("i", ScopeId::Loop(0)).unwrap();
        assert_eq!(symbol.kind, SymbolKind::LoopVariable);
        assert_eq!(symbol.ty, Type::Integer);
        assert_eq!(validator.errors().len(), 1);
        assert_eq!(
            validator.errors()[0].message,
            "Variable i is referenced before assignment"
        );
    }

    #[test]
    fn test_nested_declaration_restores_owner() {
        let program = parse(
            "outer is func() do
                inner is (x is 1)
                return inner.x
            end",
        )
        .unwrap();
        let mut validator = Validator::new();
        validator.check(&program);

        assert!(validator.errors().is_empty());
        assert!(validator.current_decl.is_none());
        assert_eq!(
            validator.symbol("outer", ScopeId::Main).unwrap().ty,
            Type::function(vec![], Type::Integer)
        );
    }
}
