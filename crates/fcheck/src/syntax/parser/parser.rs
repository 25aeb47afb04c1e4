//! F recursive descent parser

use crate::common::{CompileError, CompileResult, Span};
use crate::syntax::ast::*;
use crate::syntax::lexer::{Lexer, Token, TokenKind};

/// F parser
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Span of the most recently consumed token
    last_span: Span,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            last_span: Span::default(),
        }
    }

    /// Parse a complete program
    pub fn parse_program(&mut self) -> CompileResult<Program> {
        let start = self.lexer.peek()?.span;
        let mut declarations = Vec::new();

        while !self.check(&TokenKind::Eof)? {
            declarations.push(self.parse_declaration()?);
            self.match_token(&TokenKind::Semi)?;
        }

        let end = self.lexer.peek()?.span;
        Ok(Program::new(declarations, start.merge(end)))
    }

    // ==================== Declarations ====================

    fn parse_declaration(&mut self) -> CompileResult<Declaration> {
        let start = self.lexer.peek()?.span;
        let name = self.expect_identifier()?;

        let ty = if self.match_token(&TokenKind::Colon)? {
            Some(self.parse_type()?)
        } else {
            None
        };

        self.expect(TokenKind::Is)?;
        let value = self.parse_expr()?;

        Ok(Declaration::new(name, ty, value, self.span_from(start)))
    }

    fn at_declaration(&mut self) -> CompileResult<bool> {
        Ok(self.check(&TokenKind::Identifier(String::new()))?
            && (self.lexer.check_lookahead(&TokenKind::Is)?
                || self.lexer.check_lookahead(&TokenKind::Colon)?))
    }

    // ==================== Types ====================

    fn parse_type(&mut self) -> CompileResult<TypeExpr> {
        let token = self.bump()?;
        let start = token.span;

        let kind = match token.kind {
            TokenKind::IntegerKw => TypeExprKind::Integer,
            TokenKind::RealKw => TypeExprKind::Real,
            TokenKind::RationalKw => TypeExprKind::Rational,
            TokenKind::ComplexKw => TypeExprKind::Complex,
            TokenKind::StringKw => TypeExprKind::String,
            TokenKind::BooleanKw => TypeExprKind::Boolean,
            TokenKind::Func => {
                self.expect(TokenKind::LParen)?;
                let params = self.parse_type_list(&TokenKind::RParen)?;
                self.expect(TokenKind::RParen)?;
                self.expect(TokenKind::Colon)?;
                let ret = self.parse_type()?;
                TypeExprKind::Function {
                    params,
                    ret: Box::new(ret),
                }
            }
            TokenKind::LBracket => {
                let element = self.parse_type()?;
                self.expect(TokenKind::RBracket)?;
                TypeExprKind::Array(Box::new(element))
            }
            TokenKind::LBrace => {
                let key = self.parse_type()?;
                self.expect(TokenKind::Colon)?;
                let value = self.parse_type()?;
                self.expect(TokenKind::RBrace)?;
                TypeExprKind::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                }
            }
            TokenKind::LParen => {
                let fields = self.parse_type_list(&TokenKind::RParen)?;
                self.expect(TokenKind::RParen)?;
                TypeExprKind::Tuple(fields)
            }
            other => {
                return Err(CompileError::parser(
                    format!("expected type, found `{}`", other),
                    token.span,
                ));
            }
        };

        Ok(TypeExpr::new(kind, self.span_from(start)))
    }

    fn parse_type_list(&mut self, close: &TokenKind) -> CompileResult<Vec<TypeExpr>> {
        let mut types = Vec::new();
        while !self.check(close)? {
            types.push(self.parse_type()?);
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        Ok(types)
    }

    // ==================== Statements ====================

    /// Parse statements up to (not including) `end`, `else` or end of file
    fn parse_stmts(&mut self) -> CompileResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::End)?
            && !self.check(&TokenKind::Else)?
            && !self.check(&TokenKind::Eof)?
        {
            stmts.push(self.parse_stmt()?);
            self.match_token(&TokenKind::Semi)?;
        }
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> CompileResult<Stmt> {
        let start = self.lexer.peek()?.span;

        let kind = if self.at_declaration()? {
            StmtKind::Declaration(self.parse_declaration()?)
        } else if self.match_token(&TokenKind::Return)? {
            let value = if self.check(&TokenKind::Semi)?
                || self.check(&TokenKind::End)?
                || self.check(&TokenKind::Else)?
            {
                None
            } else {
                Some(self.parse_expr()?)
            };
            StmtKind::Return(value)
        } else if self.match_token(&TokenKind::Break)? {
            StmtKind::Break
        } else if self.match_token(&TokenKind::Print)? {
            self.expect(TokenKind::LParen)?;
            let args = self.parse_call_args()?;
            self.expect(TokenKind::RParen)?;
            StmtKind::Print(args)
        } else if self.match_token(&TokenKind::If)? {
            let condition = self.parse_expr()?;
            self.expect(TokenKind::Then)?;
            let then_branch = self.parse_stmts()?;
            let else_branch = if self.match_token(&TokenKind::Else)? {
                Some(self.parse_stmts()?)
            } else {
                None
            };
            self.expect(TokenKind::End)?;
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            }
        } else if self.check(&TokenKind::For)? || self.check(&TokenKind::While)? {
            let header = self.parse_loop_header()?;
            self.expect(TokenKind::Loop)?;
            let body = self.parse_stmts()?;
            self.expect(TokenKind::End)?;
            StmtKind::Loop { header, body }
        } else {
            let target = self.parse_secondary()?;
            if self.match_token(&TokenKind::ColonEq)? {
                let value = self.parse_expr()?;
                StmtKind::Assign { target, value }
            } else if let ExprKind::Call { callee, args } = target.kind {
                StmtKind::Call {
                    callee: *callee,
                    args,
                }
            } else {
                return Err(CompileError::parser(
                    "expected statement: declaration, assignment or call",
                    target.span,
                ));
            }
        };

        Ok(Stmt::new(kind, self.span_from(start)))
    }

    fn parse_loop_header(&mut self) -> CompileResult<LoopHeader> {
        let start = self.lexer.peek()?.span;

        let kind = if self.match_token(&TokenKind::For)? {
            let var = if self.check(&TokenKind::Identifier(String::new()))?
                && self.lexer.check_lookahead(&TokenKind::In)?
            {
                let name = self.expect_identifier()?;
                self.expect(TokenKind::In)?;
                Some(name)
            } else {
                None
            };

            let start_expr = self.parse_expr()?;
            let end_expr = if self.match_token(&TokenKind::DotDot)? {
                Some(self.parse_expr()?)
            } else {
                None
            };

            LoopHeaderKind::For {
                var,
                start: start_expr,
                end: end_expr,
            }
        } else {
            self.expect(TokenKind::While)?;
            LoopHeaderKind::While(self.parse_expr()?)
        };

        Ok(LoopHeader {
            kind,
            span: self.span_from(start),
        })
    }

    // ==================== Expressions ====================

    pub fn parse_expr(&mut self) -> CompileResult<Expr> {
        self.parse_expr_with_precedence(0)
    }

    fn parse_expr_with_precedence(&mut self, min_prec: u8) -> CompileResult<Expr> {
        let mut left = self.parse_secondary()?;
        let mut compared = false;

        while let Some(op) = self.peek_binary_op()? {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }

            let op_token = self.bump()?;
            if op.is_comparison() {
                if compared {
                    return Err(CompileError::parser(
                        format!("comparison operators cannot be chained, found `{}`", op),
                        op_token.span,
                    ));
                }
                compared = true;
            }

            let right = self.parse_expr_with_precedence(prec + 1)?;

            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn peek_binary_op(&mut self) -> CompileResult<Option<BinOp>> {
        Ok(match &self.lexer.peek()?.kind {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            TokenKind::Star => Some(BinOp::Mul),
            TokenKind::Slash => Some(BinOp::Div),
            TokenKind::Lt => Some(BinOp::Lt),
            TokenKind::LtEq => Some(BinOp::Le),
            TokenKind::Gt => Some(BinOp::Gt),
            TokenKind::GtEq => Some(BinOp::Ge),
            TokenKind::EqEq => Some(BinOp::Eq),
            TokenKind::NotEq => Some(BinOp::Ne),
            TokenKind::And => Some(BinOp::And),
            TokenKind::Or => Some(BinOp::Or),
            TokenKind::Xor => Some(BinOp::Xor),
            _ => None,
        })
    }

    fn parse_secondary(&mut self) -> CompileResult<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.match_token(&TokenKind::LParen)? {
                let args = self.parse_call_args()?;
                self.expect(TokenKind::RParen)?;
                let span = self.span_from(expr.span);
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    span,
                );
            } else if self.match_token(&TokenKind::LBracket)? {
                let index = self.parse_expr()?;
                self.expect(TokenKind::RBracket)?;
                let span = self.span_from(expr.span);
                expr = Expr::new(
                    ExprKind::Index {
                        target: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else if self.match_token(&TokenKind::Dot)? {
                let target_span = expr.span;
                let token = self.bump()?;
                let kind = match token.kind {
                    TokenKind::Identifier(field) => ExprKind::NamedField {
                        target: Box::new(expr),
                        field,
                    },
                    TokenKind::IntLiteral(digits) => {
                        let index = digits.parse::<usize>().map_err(|_| {
                            CompileError::parser(
                                format!("tuple field index `{}` is too large", digits),
                                token.span,
                            )
                        })?;
                        ExprKind::UnnamedField {
                            target: Box::new(expr),
                            index,
                        }
                    }
                    other => {
                        return Err(CompileError::parser(
                            format!("expected field name or index, found `{}`", other),
                            token.span,
                        ));
                    }
                };
                let span = self.span_from(target_span);
                expr = Expr::new(kind, span);
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_call_args(&mut self) -> CompileResult<Vec<Expr>> {
        let mut args = Vec::new();

        if !self.check(&TokenKind::RParen)? {
            args.push(self.parse_expr()?);
            while self.match_token(&TokenKind::Comma)? {
                if self.check(&TokenKind::RParen)? {
                    break;
                }
                args.push(self.parse_expr()?);
            }
        }

        Ok(args)
    }

    fn parse_primary(&mut self) -> CompileResult<Expr> {
        let start = self.lexer.peek()?.span;

        if self.check(&TokenKind::If)? {
            return self.parse_conditional();
        }
        if self.check(&TokenKind::Func)? {
            return self.parse_function();
        }
        if self.match_token(&TokenKind::LBracket)? {
            let mut elements = Vec::new();
            while !self.check(&TokenKind::RBracket)? {
                elements.push(self.parse_expr()?);
                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::RBracket)?;
            return Ok(Expr::new(ExprKind::Array(elements), self.span_from(start)));
        }
        if self.match_token(&TokenKind::LBrace)? {
            let mut entries = Vec::new();
            while !self.check(&TokenKind::RBrace)? {
                let key = self.parse_expr()?;
                self.expect(TokenKind::Colon)?;
                let value = self.parse_expr()?;
                let span = key.span.merge(value.span);
                entries.push(MapEntry { key, value, span });
                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::RBrace)?;
            return Ok(Expr::new(ExprKind::Map(entries), self.span_from(start)));
        }
        if self.check(&TokenKind::LParen)? {
            return self.parse_paren_or_tuple();
        }

        let token = self.bump()?;
        let kind = match token.kind {
            TokenKind::True => ExprKind::BoolLiteral(true),
            TokenKind::False => ExprKind::BoolLiteral(false),
            TokenKind::IntLiteral(text) => ExprKind::IntLiteral(parse_int(&text, token.span)?),
            TokenKind::RealLiteral(text) => ExprKind::RealLiteral(parse_real(&text, token.span)?),
            TokenKind::RationalLiteral(text) => {
                let (numerator, denominator) = text.split_once('\\').ok_or_else(|| {
                    CompileError::parser(
                        format!("malformed rational literal `{}`", text),
                        token.span,
                    )
                })?;
                let numerator = parse_int(numerator, token.span)?;
                let denominator = parse_int(denominator, token.span)?;
                if denominator == 0 {
                    return Err(CompileError::parser(
                        format!("rational literal `{}` has a zero denominator", text),
                        token.span,
                    ));
                }
                ExprKind::RationalLiteral { numerator, denominator }
            }
            TokenKind::ComplexLiteral(text) => {
                let (re, im) = text.split_once('i').ok_or_else(|| {
                    CompileError::parser(
                        format!("malformed complex literal `{}`", text),
                        token.span,
                    )
                })?;
                ExprKind::ComplexLiteral {
                    re: parse_real(re, token.span)?,
                    im: parse_real(im, token.span)?,
                }
            }
            TokenKind::StringLiteral(text) => ExprKind::StringLiteral(unescape(&text)),
            TokenKind::Identifier(name) => ExprKind::Variable(name),
            other => {
                return Err(CompileError::parser(
                    format!("expected expression, found `{}`", other),
                    token.span,
                ));
            }
        };

        Ok(Expr::new(kind, token.span))
    }

    fn parse_conditional(&mut self) -> CompileResult<Expr> {
        let start = self.expect(TokenKind::If)?.span;
        let predicate = self.parse_expr()?;
        self.expect(TokenKind::Then)?;
        let then_branch = self.parse_expr()?;
        self.expect(TokenKind::Else)?;
        let else_branch = self.parse_expr()?;
        self.expect(TokenKind::End)?;

        Ok(Expr::new(
            ExprKind::Conditional {
                predicate: Box::new(predicate),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            self.span_from(start),
        ))
    }

    fn parse_function(&mut self) -> CompileResult<Expr> {
        let start = self.expect(TokenKind::Func)?.span;
        self.expect(TokenKind::LParen)?;

        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen)? {
            let param_start = self.lexer.peek()?.span;
            let name = self.expect_identifier()?;
            let ty = if self.match_token(&TokenKind::Colon)? {
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(Param {
                name,
                ty,
                span: self.span_from(param_start),
            });
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;

        let return_type = if self.match_token(&TokenKind::Colon)? {
            Some(self.parse_type()?)
        } else {
            None
        };

        let body_start = self.lexer.peek()?.span;
        let kind = if self.match_token(&TokenKind::FatArrow)? {
            BodyKind::Expr(Box::new(self.parse_expr()?))
        } else if self.match_token(&TokenKind::Do)? {
            let stmts = self.parse_stmts()?;
            self.expect(TokenKind::End)?;
            BodyKind::Block(stmts)
        } else {
            let token = self.bump()?;
            return Err(CompileError::parser(
                format!("expected `=>` or `do`, found `{}`", token.kind),
                token.span,
            ));
        };
        let body = FunctionBody {
            kind,
            span: self.span_from(body_start),
        };

        Ok(Expr::new(
            ExprKind::Function(FunctionLiteral {
                params,
                return_type,
                body,
            }),
            self.span_from(start),
        ))
    }

    fn parse_paren_or_tuple(&mut self) -> CompileResult<Expr> {
        let start = self.expect(TokenKind::LParen)?.span;

        let first = self.parse_tuple_element()?;
        if first.name.is_none() && self.match_token(&TokenKind::RParen)? {
            // Parenthesized expression
            let mut inner = first.value;
            inner.span = self.span_from(start);
            return Ok(inner);
        }

        let mut elements = vec![first];
        while self.match_token(&TokenKind::Comma)? {
            if self.check(&TokenKind::RParen)? {
                break;
            }
            elements.push(self.parse_tuple_element()?);
        }
        self.expect(TokenKind::RParen)?;

        Ok(Expr::new(ExprKind::Tuple(elements), self.span_from(start)))
    }

    fn parse_tuple_element(&mut self) -> CompileResult<TupleElement> {
        let start = self.lexer.peek()?.span;
        let name = if self.check(&TokenKind::Identifier(String::new()))?
            && self.lexer.check_lookahead(&TokenKind::Is)?
        {
            let name = self.expect_identifier()?;
            self.expect(TokenKind::Is)?;
            Some(name)
        } else {
            None
        };
        let value = self.parse_expr()?;

        Ok(TupleElement {
            name,
            value,
            span: self.span_from(start),
        })
    }

    // ==================== Helpers ====================

    /// Consume the next token, remembering its span
    fn bump(&mut self) -> CompileResult<Token> {
        let token = self.lexer.next_token()?;
        self.last_span = token.span;
        Ok(token)
    }

    /// Span from `start` up to the end of the last consumed token
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.last_span)
    }

    fn check(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        self.lexer.check(expected)
    }

    fn match_token(&mut self, expected: &TokenKind) -> CompileResult<bool> {
        if self.check(expected)? {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, expected: TokenKind) -> CompileResult<Token> {
        let token = self.bump()?;
        if std::mem::discriminant(&token.kind) == std::mem::discriminant(&expected) {
            Ok(token)
        } else {
            Err(CompileError::parser(
                format!("expected `{}`, found `{}`", expected, token.kind),
                token.span,
            ))
        }
    }

    fn expect_identifier(&mut self) -> CompileResult<String> {
        let token = self.bump()?;
        match token.kind {
            TokenKind::Identifier(name) => Ok(name),
            _ => Err(CompileError::parser(
                format!("expected identifier, found `{}`", token.kind),
                token.span,
            )),
        }
    }
}

fn parse_int(text: &str, span: Span) -> CompileResult<i64> {
    text.parse::<i64>().map_err(|_| {
        CompileError::parser(format!("integer literal `{}` is out of range", text), span)
    })
}

fn parse_real(text: &str, span: Span) -> CompileResult<f64> {
    text.parse::<f64>()
        .map_err(|_| CompileError::parser(format!("malformed real literal `{}`", text), span))
}

/// Strip the surrounding quotes and resolve escape sequences
fn unescape(literal: &str) -> String {
    let inner = &literal[1..literal.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}
