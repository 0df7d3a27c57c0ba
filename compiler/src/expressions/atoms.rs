use memory::Constant;
use shark_parser::{Keyword, Punct, TokenKind};
use vm::opcode::OpCode;

use super::ExpressionCompiler;
use crate::codegen::Compiler;
use crate::error::CompilerError;
use crate::functions::FunctionDefinitionCompiler;

pub trait AtomCompiler {
    fn compile_atom(&mut self) -> Result<(), CompilerError>;
    fn compile_list(&mut self) -> Result<(), CompilerError>;
    fn compile_table(&mut self) -> Result<(), CompilerError>;
    /// Push a table literal key as a constant. Names and strings become
    /// string constants, so `{x: 1}` and `{"x": 1}` fill the same slot.
    fn compile_table_key(&mut self) -> Result<(), CompilerError>;
}

impl AtomCompiler for Compiler {
    fn compile_atom(&mut self) -> Result<(), CompilerError> {
        let tok = self.cursor.peek().clone();
        let line = tok.line;
        match tok.kind {
            TokenKind::Literal => {
                self.cursor.advance();
                let id = tok
                    .id
                    .ok_or_else(|| CompilerError::syntax("literal token without constant", line))?;
                self.emit_word(OpCode::LoadConst, id, line);
            }
            TokenKind::Ident => {
                self.cursor.advance();
                let id = tok
                    .id
                    .ok_or_else(|| CompilerError::syntax("identifier without symbol ID", line))?;
                self.emit_word(OpCode::LoadVar, id, line);
            }
            TokenKind::Keyword(Keyword::This) => {
                self.cursor.advance();
                self.emit(OpCode::LoadThis, line);
            }
            TokenKind::Keyword(Keyword::Function) => {
                self.cursor.advance();
                let proto = self.compile_function(None, line)?;
                self.emit_word(OpCode::MakeFunction, proto, line);
            }
            TokenKind::Punct(Punct::LParen) => {
                self.cursor.advance();
                self.compile_expr()?;
                self.cursor.expect_punct(Punct::RParen)?;
            }
            TokenKind::Punct(Punct::LBracket) => self.compile_list()?,
            TokenKind::Punct(Punct::LBrace) => self.compile_table()?,
            _ => return Err(self.cursor.error("expected expression").into()),
        }
        Ok(())
    }

    fn compile_list(&mut self) -> Result<(), CompilerError> {
        let line = self.cursor.advance().line;
        let mut count: u32 = 0;
        if !self.cursor.at_punct(Punct::RBracket) {
            loop {
                self.compile_expr()?;
                count += 1;
                if !self.cursor.eat_punct(Punct::Comma) {
                    break;
                }
            }
        }
        self.cursor.expect_punct(Punct::RBracket)?;
        self.emit_word(OpCode::BuildList, count, line);
        Ok(())
    }

    fn compile_table(&mut self) -> Result<(), CompilerError> {
        let line = self.cursor.advance().line;
        let mut count: u32 = 0;
        if !self.cursor.at_punct(Punct::RBrace) {
            loop {
                self.compile_table_key()?;
                self.cursor.expect_punct(Punct::Colon)?;
                self.compile_expr()?;
                count += 1;
                if !self.cursor.eat_punct(Punct::Comma) {
                    break;
                }
            }
        }
        self.cursor.expect_punct(Punct::RBrace)?;
        self.emit_word(OpCode::BuildTable, count, line);
        Ok(())
    }

    fn compile_table_key(&mut self) -> Result<(), CompilerError> {
        let tok = self.cursor.peek().clone();
        let id = match (&tok.kind, &tok.value, tok.id) {
            (TokenKind::Ident, _, _) => self.string_constant(&tok.lexeme),
            (TokenKind::Literal, Some(Constant::Str(_) | Constant::Int(_)), Some(id)) => id,
            _ => return Err(self.cursor.error("expected table key").into()),
        };
        self.cursor.advance();
        self.emit_word(OpCode::LoadConst, id, tok.line);
        Ok(())
    }
}
