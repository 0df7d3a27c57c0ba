/// Recursive descent parser with Pratt expression parsing for Shark.
///
/// Builds the diagnostic AST. The grammar and its error cases match the
/// single-pass emitter in the `compiler` crate, which walks the same token
/// stream with the same [`TokenCursor`].
use crate::ast::*;
use crate::cursor::TokenCursor;
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::token::{Keyword, Op, Punct, Token, TokenKind, PREFIX_BP};

/// Parse a complete source string into an AST Program.
///
/// ```
/// use shark_parser::parse_program;
///
/// let prog = parse_program("x = 1 + 2; print(x)").unwrap();
/// assert_eq!(prog.stmts.len(), 2);
/// ```
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    let stream = Lexer::tokenize(source)?;
    parse_tokens(stream.tokens)
}

/// Parse an already lexed token sequence.
pub fn parse_tokens(tokens: Vec<Token>) -> Result<Program, ParseError> {
    let mut parser = Parser {
        cursor: TokenCursor::new(tokens),
        loop_depth: 0,
    };
    parser.parse_program()
}

struct Parser {
    cursor: TokenCursor,
    loop_depth: usize,
}

impl Parser {
    // ========================================================================
    // Program / Block
    // ========================================================================

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut stmts = Vec::new();
        while !self.cursor.at_eof() {
            stmts.push(self.parse_stmt()?);
            self.cursor.eat_punct(Punct::Semicolon);
        }
        Ok(Program { stmts })
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.cursor.expect_punct(Punct::LBrace)?;
        let mut stmts = Vec::new();
        while !self.cursor.at_punct(Punct::RBrace) {
            if self.cursor.at_eof() {
                return Err(self.cursor.error("expected `}`"));
            }
            stmts.push(self.parse_stmt()?);
            self.cursor.eat_punct(Punct::Semicolon);
        }
        self.cursor.expect_punct(Punct::RBrace)?;
        Ok(stmts)
    }

    fn parse_loop_body(&mut self) -> Result<Block, ParseError> {
        self.loop_depth += 1;
        let body = self.parse_block();
        self.loop_depth -= 1;
        body
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cursor.line();
        match self.cursor.peek().kind {
            TokenKind::Keyword(Keyword::If) => self.parse_if(),
            TokenKind::Keyword(Keyword::While) => self.parse_while(),
            TokenKind::Keyword(Keyword::For) => self.parse_for(),
            TokenKind::Keyword(Keyword::Function)
                if self.cursor.lookahead(1).kind == TokenKind::Ident =>
            {
                self.parse_function_decl()
            }
            TokenKind::Keyword(Keyword::Return) => {
                self.cursor.advance();
                let value = if self.cursor.can_start_expr() {
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                Ok(Stmt::Return { value, line })
            }
            TokenKind::Keyword(kw @ (Keyword::Break | Keyword::Continue)) => {
                if self.loop_depth == 0 {
                    return Err(ParseError::new(
                        format!("`{}` outside of a loop", kw.as_str()),
                        line,
                    ));
                }
                self.cursor.advance();
                Ok(if kw == Keyword::Break {
                    Stmt::Break { line }
                } else {
                    Stmt::Continue { line }
                })
            }
            TokenKind::Keyword(Keyword::Import) => {
                Err(ParseError::new("`import` is not supported", line))
            }
            _ => self.parse_simple_stmt(),
        }
    }

    /// Assignment or bare call. Errors carry the leading identifier.
    fn parse_simple_stmt(&mut self) -> Result<Stmt, ParseError> {
        let lead = self.cursor.peek().clone();
        let result = self.parse_assign_or_call(lead.line);
        match lead.kind {
            TokenKind::Ident => result.map_err(|e| e.with_context(lead.lexeme)),
            _ => result,
        }
    }

    fn parse_assign_or_call(&mut self, line: u32) -> Result<Stmt, ParseError> {
        let target = self.parse_postfix()?;
        match self.cursor.peek().kind {
            TokenKind::Op(op) if op.is_assignment() => {
                if !target.is_assignable() {
                    return Err(self.cursor.error("invalid assignment target"));
                }
                self.cursor.advance();
                let value = self.parse_expr()?;
                Ok(Stmt::Assign {
                    target,
                    op,
                    value,
                    line,
                })
            }
            _ if matches!(target, Expr::Call { .. }) => Ok(Stmt::Call { call: target, line }),
            _ => Err(self.cursor.error("expected assignment or call")),
        }
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cursor.advance().line;
        let cond = self.parse_condition()?;
        let then_branch = self.parse_block()?;
        let else_branch = if self.cursor.eat_keyword(Keyword::Else) {
            if self.cursor.at_keyword(Keyword::If) {
                Some(vec![self.parse_if()?])
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
            line,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cursor.advance().line;
        let cond = self.parse_condition()?;
        let body = self.parse_loop_body()?;
        Ok(Stmt::While { cond, body, line })
    }

    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cursor.advance().line;
        self.cursor.expect_punct(Punct::LParen)?;
        let init = if self.cursor.at_punct(Punct::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_simple_stmt()?))
        };
        self.cursor.expect_punct(Punct::Semicolon)?;
        let cond = if self.cursor.at_punct(Punct::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.cursor.expect_punct(Punct::Semicolon)?;
        let step = if self.cursor.at_punct(Punct::RParen) {
            None
        } else {
            Some(Box::new(self.parse_simple_stmt()?))
        };
        self.cursor.expect_punct(Punct::RParen)?;
        let body = self.parse_loop_body()?;
        Ok(Stmt::For {
            init,
            cond,
            step,
            body,
            line,
        })
    }

    fn parse_condition(&mut self) -> Result<Expr, ParseError> {
        self.cursor.expect_punct(Punct::LParen)?;
        let cond = self.parse_expr()?;
        self.cursor.expect_punct(Punct::RParen)?;
        Ok(cond)
    }

    fn parse_function_decl(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cursor.advance().line;
        let name = self.cursor.expect_ident()?.lexeme;
        let (params, body) = self.parse_function_rest()?;
        Ok(Stmt::Function {
            name,
            params,
            body,
            line,
        })
    }

    fn parse_function_rest(&mut self) -> Result<(Vec<String>, Block), ParseError> {
        let params = self
            .cursor
            .param_list()?
            .into_iter()
            .map(|t| t.lexeme)
            .collect();
        let outer_depth = std::mem::replace(&mut self.loop_depth, 0);
        let body = self.parse_block();
        self.loop_depth = outer_depth;
        Ok((params, body?))
    }

    // ========================================================================
    // Expressions (Pratt)
    // ========================================================================

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let TokenKind::Op(op) = self.cursor.peek().kind else {
                break;
            };
            let Some((l_bp, r_bp)) = op.infix_bp() else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            let line = self.cursor.advance().line;
            let rhs = self.parse_expr_bp(r_bp)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line,
            };
            if op.is_comparison() {
                if let TokenKind::Op(next) = self.cursor.peek().kind {
                    if next.is_comparison() {
                        return Err(self.cursor.error("comparison operators cannot be chained"));
                    }
                }
            }
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        match self.cursor.peek().kind {
            TokenKind::Op(op @ (Op::Minus | Op::Not)) => {
                let line = self.cursor.advance().line;
                let operand = self.parse_expr_bp(PREFIX_BP)?;
                Ok(Expr::Unary {
                    op,
                    operand: Box::new(operand),
                    line,
                })
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_atom()?;
        loop {
            let line = self.cursor.line();
            if self.cursor.eat_punct(Punct::LParen) {
                let args = self.parse_args()?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                    line,
                };
            } else if self.cursor.eat_punct(Punct::Dot) {
                let name = self.cursor.expect_ident()?.lexeme;
                expr = Expr::Field {
                    object: Box::new(expr),
                    name,
                    line,
                };
            } else if self.cursor.eat_punct(Punct::LBracket) {
                let index = self.parse_expr()?;
                self.cursor.expect_punct(Punct::RBracket)?;
                expr = Expr::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                    line,
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if !self.cursor.at_punct(Punct::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.cursor.eat_punct(Punct::Comma) {
                    break;
                }
            }
        }
        self.cursor.expect_punct(Punct::RParen)?;
        Ok(args)
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let tok = self.cursor.peek().clone();
        let line = tok.line;
        match tok.kind {
            TokenKind::Literal => {
                self.cursor.advance();
                let value = tok
                    .value
                    .ok_or_else(|| ParseError::new("literal token without value", line))?;
                Ok(Expr::Literal { value, line })
            }
            TokenKind::Ident => {
                self.cursor.advance();
                Ok(Expr::Var {
                    name: tok.lexeme,
                    line,
                })
            }
            TokenKind::Keyword(Keyword::This) => {
                self.cursor.advance();
                Ok(Expr::This { line })
            }
            TokenKind::Keyword(Keyword::Function) => {
                self.cursor.advance();
                let (params, body) = self.parse_function_rest()?;
                Ok(Expr::Function { params, body, line })
            }
            TokenKind::Punct(Punct::LParen) => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                self.cursor.expect_punct(Punct::RParen)?;
                Ok(inner)
            }
            TokenKind::Punct(Punct::LBracket) => {
                self.cursor.advance();
                let mut items = Vec::new();
                if !self.cursor.at_punct(Punct::RBracket) {
                    loop {
                        items.push(self.parse_expr()?);
                        if !self.cursor.eat_punct(Punct::Comma) {
                            break;
                        }
                    }
                }
                self.cursor.expect_punct(Punct::RBracket)?;
                Ok(Expr::List { items, line })
            }
            TokenKind::Punct(Punct::LBrace) => self.parse_table(),
            _ => Err(self.cursor.error("expected expression")),
        }
    }

    fn parse_table(&mut self) -> Result<Expr, ParseError> {
        let line = self.cursor.advance().line;
        let mut entries = Vec::new();
        if !self.cursor.at_punct(Punct::RBrace) {
            loop {
                let key = self.parse_table_key()?;
                self.cursor.expect_punct(Punct::Colon)?;
                let value = self.parse_expr()?;
                entries.push(TableEntry { key, value });
                if !self.cursor.eat_punct(Punct::Comma) {
                    break;
                }
            }
        }
        self.cursor.expect_punct(Punct::RBrace)?;
        Ok(Expr::Table { entries, line })
    }

    fn parse_table_key(&mut self) -> Result<TableKey, ParseError> {
        let tok = self.cursor.peek().clone();
        let key = match (&tok.kind, &tok.value) {
            (TokenKind::Ident, _) => TableKey::Name(tok.lexeme.clone()),
            (TokenKind::Literal, Some(memory::Constant::Str(s))) => TableKey::Str(s.to_string()),
            (TokenKind::Literal, Some(memory::Constant::Int(i))) => TableKey::Int(*i),
            _ => return Err(self.cursor.error("expected table key")),
        };
        self.cursor.advance();
        Ok(key)
    }
}
