/// Single-pass O(n) lexer for Shark source code.
///
/// Besides producing tokens, the lexer owns the unit's symbol table and
/// constant pool: identifiers are interned and literals pooled as they are
/// scanned, so every token already carries the ID the emitter will use.
use log::debug;
use memory::{Constant, ConstantPool, SymbolTable};

use crate::error::ParseError;
use crate::token::{Keyword, Op, Punct, Token, TokenKind, TokenStream};

pub struct Lexer<'a> {
    text: &'a str,
    source: &'a [u8],
    pos: usize,
    line: u32,
    symbols: SymbolTable,
    constants: ConstantPool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            text: source,
            source: source.as_bytes(),
            pos: 0,
            line: 1,
            symbols: SymbolTable::new(),
            constants: ConstantPool::new(),
        }
    }

    /// Lex `source` to completion. The stream ends with exactly one `Eof`.
    pub fn tokenize(source: &str) -> Result<TokenStream, ParseError> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token()?;
            let is_eof = tok.is_eof();
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        let (symbols, constants) = lexer.into_tables();
        debug!(
            "lexed {} tokens ({} symbols, {} constants)",
            tokens.len(),
            symbols.len(),
            constants.len()
        );
        Ok(TokenStream {
            tokens,
            symbols,
            constants,
        })
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn constants(&self) -> &ConstantPool {
        &self.constants
    }

    pub fn into_tables(self) -> (SymbolTable, ConstantPool) {
        (self.symbols, self.constants)
    }

    // A NUL byte ends the input just like the end of the buffer.
    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied().filter(|&b| b != 0)
    }

    fn peek2(&self) -> Option<u8> {
        if self.peek().is_none() {
            return None;
        }
        self.source.get(self.pos + 1).copied().filter(|&b| b != 0)
    }

    fn advance(&mut self) -> u8 {
        let ch = self.source[self.pos];
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
        }
        ch
    }

    fn current_char(&self) -> char {
        self.text
            .get(self.pos..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or('?')
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => {
                    self.advance();
                }
                Some(b'/') if self.peek2() == Some(b'/') => {
                    while let Some(ch) = self.peek() {
                        if ch == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some(b'/') if self.peek2() == Some(b'*') => {
                    let comment_line = self.line;
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek() {
                            None => {
                                return Err(ParseError::new(
                                    "unterminated block comment",
                                    comment_line,
                                ))
                            }
                            Some(b'*') if self.peek2() == Some(b'/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            _ => {
                                self.advance();
                            }
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Produce the next token. Once the input is exhausted this keeps
    /// returning `Eof`.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace_and_comments()?;

        let line = self.line;
        let Some(ch) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                line,
                value: None,
                id: None,
            });
        };

        if ch.is_ascii_digit() {
            return self.lex_number(line);
        }
        if ch.is_ascii_alphabetic() || ch == b'_' {
            return Ok(self.lex_ident(line));
        }
        if ch == b'"' {
            return self.lex_string(line);
        }

        if let Some(punct) = punct_for(ch) {
            self.advance();
            return Ok(Token {
                kind: TokenKind::Punct(punct),
                lexeme: punct.as_str().into(),
                line,
                value: None,
                id: None,
            });
        }

        let op = self.lex_operator(ch, line)?;
        Ok(Token {
            kind: TokenKind::Op(op),
            lexeme: op.as_str().into(),
            line,
            value: None,
            id: None,
        })
    }

    fn lex_operator(&mut self, ch: u8, line: u32) -> Result<Op, ParseError> {
        let unexpected = self.current_char();
        self.advance();
        let next = self.peek();
        let (op, consumed) = match (ch, next) {
            (b'+', Some(b'=')) => (Op::PlusAssign, true),
            (b'+', _) => (Op::Plus, false),
            (b'-', Some(b'=')) => (Op::MinusAssign, true),
            (b'-', _) => (Op::Minus, false),
            (b'*', Some(b'=')) => (Op::StarAssign, true),
            (b'*', _) => (Op::Star, false),
            (b'/', Some(b'=')) => (Op::SlashAssign, true),
            (b'/', _) => (Op::Slash, false),
            (b'%', Some(b'=')) => (Op::PercentAssign, true),
            (b'%', _) => (Op::Percent, false),
            (b'^', _) => (Op::Caret, false),
            (b'=', Some(b'=')) => (Op::Eq, true),
            (b'=', _) => (Op::Assign, false),
            (b'!', Some(b'=')) => (Op::Ne, true),
            (b'!', _) => (Op::Not, false),
            (b'<', Some(b'=')) => (Op::Le, true),
            (b'<', Some(b'<')) => (Op::Shl, true),
            (b'<', _) => (Op::Lt, false),
            (b'>', Some(b'=')) => (Op::Ge, true),
            (b'>', Some(b'>')) => (Op::Shr, true),
            (b'>', _) => (Op::Gt, false),
            (b'&', Some(b'&')) => (Op::And, true),
            (b'|', Some(b'|')) => (Op::Or, true),
            (b'&' | b'|', _) => {
                return Err(ParseError::new(
                    format!("unexpected character `{}`", ch as char),
                    line,
                ))
            }
            _ => {
                return Err(ParseError::new(
                    format!("unexpected character `{unexpected}`"),
                    line,
                ))
            }
        };
        if consumed {
            self.advance();
        }
        Ok(op)
    }

    fn eat_digits(&mut self, radix: u32) -> usize {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if (ch as char).is_digit(radix) {
                self.advance();
            } else {
                break;
            }
        }
        self.pos - start
    }

    fn lex_number(&mut self, line: u32) -> Result<Token, ParseError> {
        let start = self.pos;
        if self.peek() == Some(b'0') {
            let radix = match self.peek2() {
                Some(b'x' | b'X') => Some(16),
                Some(b'o' | b'O') => Some(8),
                Some(b'b' | b'B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                return self.lex_radix_int(start, radix, line);
            }
        }

        self.eat_digits(10);
        let mut is_float = false;
        if self.peek() == Some(b'.') && self.peek2().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            self.eat_digits(10);
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            is_float = true;
            self.advance();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.advance();
            }
            if self.eat_digits(10) == 0 {
                return Err(ParseError::new("expected digits in exponent", line));
            }
        }

        let text = self.text;
        let lexeme = &text[start..self.pos];
        let value = if is_float {
            lexeme
                .parse::<f32>()
                .map(Constant::Float)
                .map_err(|_| ParseError::new(format!("invalid float literal `{lexeme}`"), line))?
        } else {
            lexeme.parse::<i64>().map(Constant::Int).map_err(|_| {
                ParseError::new(format!("integer literal `{lexeme}` out of range"), line)
            })?
        };
        Ok(self.literal(value, lexeme.to_string(), line))
    }

    fn lex_radix_int(&mut self, start: usize, radix: u32, line: u32) -> Result<Token, ParseError> {
        self.advance(); // '0'
        self.advance(); // radix letter
        let digit_start = self.pos;
        if self.eat_digits(radix) == 0 {
            return Err(ParseError::new(
                format!("expected digits after `{}`", &self.text[start..digit_start]),
                line,
            ));
        }
        let text = self.text;
        let lexeme = &text[start..self.pos];
        let value = i64::from_str_radix(&text[digit_start..self.pos], radix)
            .map_err(|_| ParseError::new(format!("integer literal `{lexeme}` out of range"), line))?;
        Ok(self.literal(Constant::Int(value), lexeme.to_string(), line))
    }

    fn literal(&mut self, value: Constant, lexeme: String, line: u32) -> Token {
        let id = self.constants.add(value.clone());
        Token {
            kind: TokenKind::Literal,
            lexeme,
            line,
            value: Some(value),
            id: Some(id),
        }
    }

    fn lex_ident(&mut self, line: u32) -> Token {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        let text = self.text;
        let word = &text[start..self.pos];

        if let Some(kw) = Keyword::from_ident(word) {
            return Token {
                kind: TokenKind::Keyword(kw),
                lexeme: word.to_string(),
                line,
                value: None,
                id: None,
            };
        }

        let literal = match word {
            "null" => Some(Constant::Null),
            "true" => Some(Constant::Bool(true)),
            "false" => Some(Constant::Bool(false)),
            _ => None,
        };
        if let Some(value) = literal {
            return self.literal(value, word.to_string(), line);
        }

        let id = self.symbols.intern(word);
        Token {
            kind: TokenKind::Ident,
            lexeme: word.to_string(),
            line,
            value: None,
            id: Some(id),
        }
    }

    fn lex_string(&mut self, line: u32) -> Result<Token, ParseError> {
        self.advance(); // opening quote
        let start = self.pos;
        let mut has_escape = false;
        loop {
            match self.peek() {
                None => return Err(ParseError::new("unterminated string literal", line)),
                Some(b'"') => break,
                Some(b'\\') => {
                    has_escape = true;
                    self.advance();
                    match self.peek() {
                        Some(b'0' | b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'u' | b'"' | b'\\') => {
                            self.advance();
                        }
                        Some(_) => {
                            return Err(ParseError::new(
                                format!("invalid escape sequence `\\{}`", self.current_char()),
                                self.line,
                            ))
                        }
                        None => return Err(ParseError::new("unterminated string literal", line)),
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        let text = self.text;
        let raw = &text[start..self.pos];
        self.advance(); // closing quote

        let content = if has_escape {
            unescape(raw).map_err(|msg| ParseError::new(msg, line))?
        } else {
            raw.to_string()
        };
        let lexeme = text[start - 1..self.pos].to_string();
        Ok(self.literal(Constant::Str(content.into()), lexeme, line))
    }
}

fn punct_for(ch: u8) -> Option<Punct> {
    Some(match ch {
        b'(' => Punct::LParen,
        b')' => Punct::RParen,
        b'[' => Punct::LBracket,
        b']' => Punct::RBracket,
        b'{' => Punct::LBrace,
        b'}' => Punct::RBrace,
        b',' => Punct::Comma,
        b';' => Punct::Semicolon,
        b':' => Punct::Colon,
        b'.' => Punct::Dot,
        _ => return None,
    })
}

/// Resolve the escape sequences of a string literal body.
pub fn unescape(raw: &str) -> Result<String, String> {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => result.push('\0'),
            Some('a') => result.push('\u{07}'),
            Some('b') => result.push('\u{08}'),
            Some('f') => result.push('\u{0C}'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = (hex.len() == 4 && hex.chars().all(|h| h.is_ascii_hexdigit()))
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(ch) => result.push(ch),
                    None => return Err(format!("invalid unicode escape `\\u{hex}`")),
                }
            }
            Some(other) => return Err(format!("invalid escape sequence `\\{other}`")),
            None => return Err("dangling `\\` at end of string".to_string()),
        }
    }
    Ok(result)
}
