use shark_parser::{Keyword, Punct, TokenKind};
use vm::opcode::OpCode;

use crate::codegen::Compiler;
use crate::control_flow::ControlFlowCompiler;
use crate::error::CompilerError;
use crate::expressions::{ExpressionCompiler, PostfixCompiler};
use crate::types::ChainEnd;

pub mod declarations;

pub use declarations::DeclarationCompiler;

pub trait StatementCompiler {
    /// One statement plus its optional trailing `;`.
    fn compile_stmt(&mut self) -> Result<(), CompilerError>;
    fn compile_block(&mut self) -> Result<(), CompilerError>;
    /// Assignment or bare call. Errors carry the leading identifier.
    fn compile_simple_stmt(&mut self) -> Result<(), CompilerError>;
    fn compile_return(&mut self) -> Result<(), CompilerError>;
}

impl StatementCompiler for Compiler {
    fn compile_stmt(&mut self) -> Result<(), CompilerError> {
        let line = self.cursor.line();
        match self.cursor.peek().kind {
            TokenKind::Keyword(Keyword::If) => self.compile_if()?,
            TokenKind::Keyword(Keyword::While) => self.compile_while()?,
            TokenKind::Keyword(Keyword::For) => self.compile_for()?,
            TokenKind::Keyword(Keyword::Function)
                if self.cursor.lookahead(1).kind == TokenKind::Ident =>
            {
                self.compile_function_decl()?
            }
            TokenKind::Keyword(Keyword::Return) => self.compile_return()?,
            TokenKind::Keyword(kw @ (Keyword::Break | Keyword::Continue)) => {
                self.compile_loop_exit(kw)?
            }
            TokenKind::Keyword(Keyword::Import) => {
                return Err(CompilerError::syntax("`import` is not supported", line));
            }
            _ => self.compile_simple_stmt()?,
        }
        self.cursor.eat_punct(Punct::Semicolon);
        Ok(())
    }

    fn compile_block(&mut self) -> Result<(), CompilerError> {
        self.cursor.expect_punct(Punct::LBrace)?;
        while !self.cursor.at_punct(Punct::RBrace) {
            if self.cursor.at_eof() {
                return Err(self.cursor.error("expected `}`").into());
            }
            self.compile_stmt()?;
        }
        self.cursor.expect_punct(Punct::RBrace)?;
        Ok(())
    }

    fn compile_simple_stmt(&mut self) -> Result<(), CompilerError> {
        let lead = self.cursor.peek().clone();
        let result = compile_assign_or_call(self, lead.line);
        match lead.kind {
            TokenKind::Ident => result.map_err(|e| e.with_context(&lead.lexeme)),
            _ => result,
        }
    }

    fn compile_return(&mut self) -> Result<(), CompilerError> {
        let line = self.cursor.advance().line;
        if self.cursor.can_start_expr() {
            self.compile_expr()?;
        } else {
            self.emit(OpCode::PushNull, line);
        }
        self.emit(OpCode::Return, line);
        Ok(())
    }
}

fn compile_assign_or_call(c: &mut Compiler, line: u32) -> Result<(), CompilerError> {
    let end = c.compile_chain(true)?;
    match c.cursor.peek().kind {
        TokenKind::Op(op) if op.is_assignment() => {
            if !matches!(end, ChainEnd::Var { .. }) && !end.is_slot() {
                return Err(c.cursor.error("invalid assignment target").into());
            }
            let op_line = c.cursor.advance().line;
            c.compile_assignment(end, op, op_line)
        }
        _ if end == ChainEnd::Call => {
            // call statements discard the result
            c.emit(OpCode::Pop, line);
            Ok(())
        }
        _ => Err(c.cursor.error("expected assignment or call").into()),
    }
}
