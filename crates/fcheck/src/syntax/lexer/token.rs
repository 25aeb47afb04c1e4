//! F token definitions using logos

use crate::common::Span;
use logos::Logos;
use std::fmt;

/// A token with its kind and source location
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Token kinds
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum TokenKind {
    // Keywords - declarations and functions
    #[token("is")]
    Is,
    #[token("func")]
    Func,
    #[token("do")]
    Do,
    #[token("end")]
    End,
    #[token("return")]
    Return,
    #[token("print")]
    Print,

    // Keywords - control flow
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("while")]
    While,
    #[token("loop")]
    Loop,
    #[token("break")]
    Break,

    // Logical operators
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("xor")]
    Xor,

    // Boolean literals
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Type names
    #[token("integer")]
    IntegerKw,
    #[token("real")]
    RealKw,
    #[token("rational")]
    RationalKw,
    #[token("complex")]
    ComplexKw,
    #[token("string")]
    StringKw,
    #[token("boolean")]
    BooleanKw,

    // Numeric literals
    #[regex(r"[0-9]+", priority = 2, callback = |lex| lex.slice().to_string())]
    IntLiteral(String),
    #[regex(r"[0-9]+\.[0-9]+", callback = |lex| lex.slice().to_string())]
    RealLiteral(String),
    /// `3\4`
    #[regex(r"[0-9]+\\[0-9]+", callback = |lex| lex.slice().to_string())]
    RationalLiteral(String),
    /// `1i2`, `0.5i1.5`
    #[regex(r"[0-9]+(\.[0-9]+)?i[0-9]+(\.[0-9]+)?", callback = |lex| lex.slice().to_string())]
    ComplexLiteral(String),

    // String literal
    #[regex(r#""([^"\\]|\\.)*""#, callback = |lex| lex.slice().to_string())]
    StringLiteral(String),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", priority = 1, callback = |lex| lex.slice().to_string())]
    Identifier(String),

    // Multi-character operators (longer first)
    #[token(":=")]
    ColonEq,
    #[token("=>")]
    FatArrow,
    #[token("..")]
    DotDot,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,

    // Single-character operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // Punctuation
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,

    // Special
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Keywords
            TokenKind::Is => write!(f, "is"),
            TokenKind::Func => write!(f, "func"),
            TokenKind::Do => write!(f, "do"),
            TokenKind::End => write!(f, "end"),
            TokenKind::Return => write!(f, "return"),
            TokenKind::Print => write!(f, "print"),
            TokenKind::If => write!(f, "if"),
            TokenKind::Then => write!(f, "then"),
            TokenKind::Else => write!(f, "else"),
            TokenKind::For => write!(f, "for"),
            TokenKind::In => write!(f, "in"),
            TokenKind::While => write!(f, "while"),
            TokenKind::Loop => write!(f, "loop"),
            TokenKind::Break => write!(f, "break"),
            TokenKind::And => write!(f, "and"),
            TokenKind::Or => write!(f, "or"),
            TokenKind::Xor => write!(f, "xor"),
            TokenKind::True => write!(f, "true"),
            TokenKind::False => write!(f, "false"),

            // Types
            TokenKind::IntegerKw => write!(f, "integer"),
            TokenKind::RealKw => write!(f, "real"),
            TokenKind::RationalKw => write!(f, "rational"),
            TokenKind::ComplexKw => write!(f, "complex"),
            TokenKind::StringKw => write!(f, "string"),
            TokenKind::BooleanKw => write!(f, "boolean"),

            // Literals
            TokenKind::IntLiteral(s)
            | TokenKind::RealLiteral(s)
            | TokenKind::RationalLiteral(s)
            | TokenKind::ComplexLiteral(s)
            | TokenKind::StringLiteral(s)
            | TokenKind::Identifier(s) => write!(f, "{}", s),

            // Operators
            TokenKind::ColonEq => write!(f, ":="),
            TokenKind::FatArrow => write!(f, "=>"),
            TokenKind::DotDot => write!(f, ".."),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::EqEq => write!(f, "=="),
            TokenKind::NotEq => write!(f, "!="),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),

            // Delimiters
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),

            // Punctuation
            TokenKind::Semi => write!(f, ";"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Dot => write!(f, "."),

            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}
