/// Token types for the Shark lexer.
use std::fmt;

use memory::{Constant, ConstantPool, SymbolTable};
use serde::Serialize;

/// A single token produced by the lexer.
///
/// Literal tokens carry their value and constant-pool ID in `value`/`id`;
/// identifier tokens carry their symbol ID in `id`.
#[derive(Clone, Debug, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Constant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
}

impl Token {
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn is_op(&self, op: Op) -> bool {
        self.kind == TokenKind::Op(op)
    }

    pub fn is_punct(&self, punct: Punct) -> bool {
        self.kind == TokenKind::Punct(punct)
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.kind == TokenKind::Keyword(kw)
    }

    /// Human-readable form for error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("`{}`", self.lexeme),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    Literal,
    Ident,
    Keyword(Keyword),
    Punct(Punct),
    Op(Op),
    Eof,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    If,
    Else,
    While,
    For,
    Function,
    Return,
    Break,
    Continue,
    This,
    Import,
}

impl Keyword {
    pub fn from_ident(word: &str) -> Option<Self> {
        Some(match word {
            "if" => Keyword::If,
            "else" => Keyword::Else,
            "while" => Keyword::While,
            "for" => Keyword::For,
            "function" => Keyword::Function,
            "return" => Keyword::Return,
            "break" => Keyword::Break,
            "continue" => Keyword::Continue,
            "this" => Keyword::This,
            "import" => Keyword::Import,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::For => "for",
            Keyword::Function => "function",
            Keyword::Return => "return",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
            Keyword::This => "this",
            Keyword::Import => "import",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Punct {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Colon,
    Dot,
}

impl Punct {
    pub fn as_str(self) -> &'static str {
        match self {
            Punct::LParen => "(",
            Punct::RParen => ")",
            Punct::LBracket => "[",
            Punct::RBracket => "]",
            Punct::LBrace => "{",
            Punct::RBrace => "}",
            Punct::Comma => ",",
            Punct::Semicolon => ";",
            Punct::Colon => ":",
            Punct::Dot => ".",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Op {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Assign,
    Not,
    Lt,
    Gt,
    Eq,
    Ne,
    Le,
    Ge,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    And,
    Or,
    Shl,
    Shr,
}

impl Op {
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Plus => "+",
            Op::Minus => "-",
            Op::Star => "*",
            Op::Slash => "/",
            Op::Percent => "%",
            Op::Caret => "^",
            Op::Assign => "=",
            Op::Not => "!",
            Op::Lt => "<",
            Op::Gt => ">",
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::Le => "<=",
            Op::Ge => ">=",
            Op::PlusAssign => "+=",
            Op::MinusAssign => "-=",
            Op::StarAssign => "*=",
            Op::SlashAssign => "/=",
            Op::PercentAssign => "%=",
            Op::And => "&&",
            Op::Or => "||",
            Op::Shl => "<<",
            Op::Shr => ">>",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(self, Op::Eq | Op::Ne | Op::Lt | Op::Le | Op::Gt | Op::Ge)
    }

    /// `=` and the compound forms.
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            Op::Assign
                | Op::PlusAssign
                | Op::MinusAssign
                | Op::StarAssign
                | Op::SlashAssign
                | Op::PercentAssign
        )
    }

    /// The arithmetic operator a compound assignment applies, if any.
    pub fn compound_base(self) -> Option<Op> {
        match self {
            Op::PlusAssign => Some(Op::Plus),
            Op::MinusAssign => Some(Op::Minus),
            Op::StarAssign => Some(Op::Star),
            Op::SlashAssign => Some(Op::Slash),
            Op::PercentAssign => Some(Op::Percent),
            _ => None,
        }
    }

    /// Returns (left_bp, right_bp) for infix operators. None if not infix.
    pub fn infix_bp(self) -> Option<(u8, u8)> {
        Some(match self {
            Op::Or => (1, 2),
            Op::And => (3, 4),
            Op::Eq | Op::Ne | Op::Lt | Op::Le | Op::Gt | Op::Ge => (5, 6),
            Op::Shl | Op::Shr => (7, 8),
            Op::Plus | Op::Minus => (9, 10),
            Op::Star | Op::Slash | Op::Percent => (11, 12),
            Op::Caret => (16, 15), // right-associative
            _ => return None,
        })
    }
}

/// Binding power of prefix `-` and `!`. Sits below `^`, so `-2^2` is
/// `-(2^2)`.
pub const PREFIX_BP: u8 = 13;

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Literal => f.write_str("literal"),
            TokenKind::Ident => f.write_str("identifier"),
            TokenKind::Keyword(kw) => write!(f, "`{}`", kw.as_str()),
            TokenKind::Punct(p) => write!(f, "`{}`", p.as_str()),
            TokenKind::Op(op) => write!(f, "`{}`", op.as_str()),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}

/// Lexer output: the tokens plus the tables they reference by ID.
#[derive(Debug, Clone)]
pub struct TokenStream {
    pub tokens: Vec<Token>,
    pub symbols: SymbolTable,
    pub constants: ConstantPool,
}
