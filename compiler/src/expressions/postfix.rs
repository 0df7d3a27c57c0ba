use shark_parser::{Punct, TokenKind};
use vm::opcode::OpCode;

use super::{AtomCompiler, ExpressionCompiler};
use crate::codegen::Compiler;
use crate::error::CompilerError;
use crate::types::ChainEnd;

pub trait PostfixCompiler {
    /// Primary followed by any number of `(args)`, `.name` and `[expr]`.
    ///
    /// With `defer_var`, a chain that is just an identifier emits nothing
    /// and comes back as [`ChainEnd::Var`], so the caller can assign to it.
    fn compile_chain(&mut self, defer_var: bool) -> Result<ChainEnd, CompilerError>;

    /// Arguments after `(`, through the closing `)`. Returns the count.
    fn compile_args(&mut self) -> Result<u32, CompilerError>;
}

impl PostfixCompiler for Compiler {
    fn compile_chain(&mut self, defer_var: bool) -> Result<ChainEnd, CompilerError> {
        let tok = self.cursor.peek();
        let mut end = match (tok.kind, tok.id) {
            (TokenKind::Ident, Some(id)) if defer_var => {
                let line = self.cursor.advance().line;
                ChainEnd::Var { id, line }
            }
            _ => {
                self.compile_atom()?;
                ChainEnd::Value
            }
        };

        loop {
            let line = self.cursor.line();
            let postfix = [Punct::LParen, Punct::Dot, Punct::LBracket]
                .into_iter()
                .find(|p| self.cursor.at_punct(*p));
            let Some(postfix) = postfix else {
                break;
            };

            if let ChainEnd::Var { id, line } = end {
                self.emit_word(OpCode::LoadVar, id, line);
            }
            self.cursor.advance();

            end = match postfix {
                Punct::LParen => {
                    let argc = self.compile_args()?;
                    self.emit_word(OpCode::Call, argc, line);
                    ChainEnd::Call
                }
                Punct::Dot => {
                    let name = self.cursor.expect_ident()?;
                    let id = name.id.ok_or_else(|| {
                        CompilerError::syntax("identifier without symbol ID", name.line)
                    })?;
                    self.emit_word(OpCode::GetField, id, line);
                    ChainEnd::Field
                }
                _ => {
                    self.compile_expr()?;
                    self.cursor.expect_punct(Punct::RBracket)?;
                    self.emit(OpCode::GetIndex, line);
                    ChainEnd::Index
                }
            };
        }
        Ok(end)
    }

    fn compile_args(&mut self) -> Result<u32, CompilerError> {
        let mut argc: u32 = 0;
        if !self.cursor.at_punct(Punct::RParen) {
            loop {
                self.compile_expr()?;
                argc += 1;
                if !self.cursor.eat_punct(Punct::Comma) {
                    break;
                }
            }
        }
        self.cursor.expect_punct(Punct::RParen)?;
        Ok(argc)
    }
}
