//! Checking pipeline: source -> tokens -> AST -> semantic errors

use crate::common::{CompileError, CompileResult, DiagnosticReporter};
use crate::sema::{SemanticError, SymbolTable, Validator};
use crate::syntax::ast::Program;
use crate::syntax::lexer::Lexer;
use crate::syntax::parser::Parser;
use std::fmt::Write as _;
use tracing::info;

/// Checker configuration options
#[derive(Debug, Clone, Default)]
pub struct CheckConfig {
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub dump_symbols: bool,
    pub verbose: bool,
}

/// Checking context providing access to diagnostics and file info
pub struct CheckContext<'a> {
    pub filename: String,
    pub file_id: usize,
    pub reporter: &'a DiagnosticReporter,
}

impl<'a> CheckContext<'a> {
    pub fn new(filename: String, file_id: usize, reporter: &'a DiagnosticReporter) -> Self {
        Self { filename, file_id, reporter }
    }
}

/// Result of checking a syntactically valid program
#[derive(Debug)]
pub struct CheckOutcome {
    pub program: Program,
    pub errors: Vec<SemanticError>,
}

impl CheckOutcome {
    /// True when the program is well-typed
    pub fn is_accepted(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check F source text.
///
/// Lexer and syntax errors abort the run and are returned as `Err`; type
/// errors are collected into the outcome. Every diagnostic is rendered
/// through the context's reporter.
pub fn check_source(
    source: &str,
    ctx: &CheckContext,
    config: &CheckConfig,
) -> CompileResult<CheckOutcome> {
    // Phase 1: Lexing (optional token dump)
    if config.dump_tokens {
        match Lexer::new(source).tokenize_all() {
            Ok(tokens) => {
                eprintln!("=== F Tokens ===");
                for token in &tokens {
                    eprintln!("{:?}", token);
                }
                eprintln!("=== End Tokens ===\n");
            }
            Err(e) => {
                ctx.reporter.report_error(ctx.file_id, &e);
                return Err(e);
            }
        }
    }

    // Phase 2: Parsing
    info!(file = %ctx.filename, "parsing");
    if config.verbose {
        eprintln!("Parsing F...");
    }
    let program = match Parser::new(source).parse_program() {
        Ok(program) => program,
        Err(e) => {
            ctx.reporter.report_error(ctx.file_id, &e);
            return Err(e);
        }
    };

    if config.dump_ast {
        eprintln!("=== F AST ===");
        eprintln!("{:#?}", program);
        eprintln!("=== End AST ===\n");
    }

    // Phase 3: Semantic validation
    info!(declarations = program.declarations.len(), "validating");
    if config.verbose {
        eprintln!("Validating {} declarations...", program.declarations.len());
    }
    let mut validator = Validator::new();
    validator.check(&program);

    if config.dump_symbols {
        eprintln!("=== Symbols ===");
        eprint!("{}", dump_symbols(validator.symbols()));
        eprintln!("=== End Symbols ===\n");
    }

    let errors = validator.into_errors();
    for error in &errors {
        ctx.reporter.report_error(ctx.file_id, &CompileError::from(error.clone()));
    }
    info!(errors = errors.len(), "validation complete");

    Ok(CheckOutcome { program, errors })
}

/// Render the symbol table, one `scope::name: type (kind)` line per entry
pub fn dump_symbols(symbols: &SymbolTable) -> String {
    let mut out = String::new();
    for (name, scope, symbol) in symbols.entries() {
        let _ = write!(out, "{}::{}: {} ({})", scope, name, symbol.ty, symbol.kind);
        if symbol.poisoned {
            out.push_str(" [undetermined]");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use codespan_reporting::term::termcolor::ColorChoice;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> CompileResult<CheckOutcome> {
        let mut reporter = DiagnosticReporter::with_color(ColorChoice::Never);
        let file_id = reporter.add_file("test.f", source);
        let ctx = CheckContext::new("test.f".to_string(), file_id, &reporter);
        check_source(source, &ctx, &CheckConfig::default())
    }

    #[test]
    fn test_accepts_program() {
        let outcome = run("a is 1\nb is a + 2").unwrap();
        assert!(outcome.is_accepted());
        assert_eq!(outcome.program.declarations.len(), 2);
    }

    #[test]
    fn test_collects_type_errors() {
        let outcome = run("a is 1 + \"x\"\nb is c").unwrap();
        assert!(!outcome.is_accepted());
        assert_eq!(outcome.errors.len(), 2);
    }

    #[test]
    fn test_syntax_error_aborts() {
        let err = run("a is (1 + ").unwrap_err();
        assert!(matches!(err, CompileError::Parser { .. }));
    }

    #[test]
    fn test_lexer_error_aborts() {
        let err = run("a is 1 # 2").unwrap_err();
        assert!(matches!(err, CompileError::Lexer { .. }));
    }

    #[test]
    fn test_symbol_dump() {
        let program = crate::syntax::parse("f is func(n: integer) => n\nbad is missing").unwrap();
        let mut validator = Validator::new();
        validator.check(&program);

        assert_eq!(
            dump_symbols(validator.symbols()),
            "main::bad: UndefinedType (variable) [undetermined]\n\
             main::f: FunctionType(IntegerType -> IntegerType) (variable)\n\
             function0::n: IntegerType (parameter)\n"
        );
    }
}
