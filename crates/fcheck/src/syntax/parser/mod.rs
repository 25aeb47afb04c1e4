//! F recursive descent parser

mod parser;

pub use parser::Parser;
