pub mod ast;
pub mod cursor;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use cursor::TokenCursor;
pub use error::ParseError;
pub use lexer::{unescape, Lexer};
pub use parser::{parse_program, parse_tokens};
pub use token::{Keyword, Op, Punct, Token, TokenKind, TokenStream, PREFIX_BP};
