/// Token cursor shared by the diagnostic parser and the bytecode emitter.
use crate::error::ParseError;
use crate::token::{Keyword, Op, Punct, Token, TokenKind};

pub struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenCursor {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let line = tokens.last().map_or(1, |t| t.line);
            tokens.push(Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                line,
                value: None,
                id: None,
            });
        }
        Self { tokens, pos: 0 }
    }

    pub fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Peek at the token N positions ahead (0 = current). Clamped to `Eof`.
    pub fn lookahead(&self, n: usize) -> &Token {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if !tok.is_eof() {
            self.pos += 1;
        }
        tok
    }

    pub fn line(&self) -> u32 {
        self.peek().line
    }

    pub fn at_eof(&self) -> bool {
        self.peek().is_eof()
    }

    pub fn at_op(&self, op: Op) -> bool {
        self.peek().is_op(op)
    }

    pub fn at_punct(&self, punct: Punct) -> bool {
        self.peek().is_punct(punct)
    }

    pub fn at_keyword(&self, kw: Keyword) -> bool {
        self.peek().is_keyword(kw)
    }

    pub fn eat_op(&mut self, op: Op) -> bool {
        let hit = self.at_op(op);
        if hit {
            self.advance();
        }
        hit
    }

    pub fn eat_punct(&mut self, punct: Punct) -> bool {
        let hit = self.at_punct(punct);
        if hit {
            self.advance();
        }
        hit
    }

    pub fn eat_keyword(&mut self, kw: Keyword) -> bool {
        let hit = self.at_keyword(kw);
        if hit {
            self.advance();
        }
        hit
    }

    pub fn expect_punct(&mut self, punct: Punct) -> Result<Token, ParseError> {
        if self.at_punct(punct) {
            Ok(self.advance())
        } else {
            Err(self.error(format!("expected `{}`", punct.as_str())))
        }
    }

    pub fn expect_ident(&mut self) -> Result<Token, ParseError> {
        if self.peek().kind == TokenKind::Ident {
            Ok(self.advance())
        } else {
            Err(self.error("expected identifier"))
        }
    }

    /// `message, found <current token>` at the current line.
    pub fn error(&self, message: impl Into<String>) -> ParseError {
        let tok = self.peek();
        ParseError::new(format!("{}, found {}", message.into(), tok.describe()), tok.line)
    }

    /// Whether the current token can begin an expression.
    pub fn can_start_expr(&self) -> bool {
        match self.peek().kind {
            TokenKind::Literal | TokenKind::Ident => true,
            TokenKind::Keyword(kw) => matches!(kw, Keyword::This | Keyword::Function),
            TokenKind::Punct(p) => matches!(p, Punct::LParen | Punct::LBracket | Punct::LBrace),
            TokenKind::Op(op) => matches!(op, Op::Minus | Op::Not),
            TokenKind::Eof => false,
        }
    }

    /// Parameter list after `function [name]`: `(a, b, c)`.
    pub fn param_list(&mut self) -> Result<Vec<Token>, ParseError> {
        self.expect_punct(Punct::LParen)?;
        let mut params = Vec::new();
        if !self.at_punct(Punct::RParen) {
            loop {
                let param = self.expect_ident()?;
                if params.iter().any(|p: &Token| p.id == param.id) {
                    return Err(ParseError::new(
                        format!("duplicate parameter `{}`", param.lexeme),
                        param.line,
                    ));
                }
                params.push(param);
                if !self.eat_punct(Punct::Comma) {
                    break;
                }
            }
        }
        self.expect_punct(Punct::RParen)?;
        Ok(params)
    }
}
