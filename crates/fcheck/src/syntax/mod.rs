//! F front end: lexer, AST and parser

pub mod ast;
pub mod lexer;
pub mod parser;

use crate::common::CompileResult;
use ast::Program;

/// Parse F source text into a program
pub fn parse(source: &str) -> CompileResult<Program> {
    parser::Parser::new(source).parse_program()
}
