//! `if`, `while`, `for`, `break` and `continue`.
//!
//! Jumps are emitted after the code they skip: mark the position, emit
//! the guarded code, measure it, then insert the jump at the mark. Offsets
//! are relative, so later insertions in enclosing constructs never
//! invalidate them.

use shark_parser::{Keyword, Punct};
use vm::opcode::{Instruction, OpCode};

use crate::codegen::Compiler;
use crate::error::CompilerError;
use crate::expressions::ExpressionCompiler;
use crate::function_compiler::backward;
use crate::statements::StatementCompiler;
use crate::types::LoopContext;

pub trait ControlFlowCompiler {
    fn compile_if(&mut self) -> Result<(), CompilerError>;
    fn compile_while(&mut self) -> Result<(), CompilerError>;
    fn compile_for(&mut self) -> Result<(), CompilerError>;
    fn compile_condition(&mut self) -> Result<(), CompilerError>;

    /// `BREAK`/`CONTINUE` placeholder, rewritten when the loop closes.
    fn compile_loop_exit(&mut self, kw: Keyword) -> Result<(), CompilerError>;

    fn enter_loop(&mut self, line: u32) -> LoopContext;
    /// Emit the backward jump to the loop head and resolve the loop's
    /// `break`/`continue` placeholders.
    fn exit_loop(&mut self, ctx: LoopContext, continue_at: usize) -> Result<(), CompilerError>;
}

fn offset(len: usize, line: u32) -> Result<u32, CompilerError> {
    u32::try_from(len).map_err(|_| CompilerError::limitation("jump distance exceeds 32 bits", line))
}

impl ControlFlowCompiler for Compiler {
    fn compile_if(&mut self) -> Result<(), CompilerError> {
        let line = self.cursor.advance().line;
        self.compile_condition()?;

        let then_mark = self.mark();
        self.compile_block()?;
        let then_len = self.mark() - then_mark;

        let has_else = self.cursor.eat_keyword(Keyword::Else);
        if has_else {
            let else_line = self.cursor.line();
            let else_mark = self.mark();
            if self.cursor.at_keyword(Keyword::If) {
                self.compile_if()?;
            } else {
                self.compile_block()?;
            }
            let else_len = self.mark() - else_mark;
            let skip_else = Instruction::word(OpCode::Jump, offset(else_len, else_line)?, else_line);
            self.current().insert(else_mark, skip_else);
        }

        let skip_then = offset(then_len + usize::from(has_else), line)?;
        self.current()
            .insert(then_mark, Instruction::word(OpCode::JumpIfFalse, skip_then, line));
        Ok(())
    }

    fn compile_while(&mut self) -> Result<(), CompilerError> {
        let line = self.cursor.advance().line;
        let ctx = self.enter_loop(line);
        self.compile_condition()?;

        let body_mark = self.mark();
        self.compile_block()?;
        let body_len = self.mark() - body_mark;
        // +1 skips the closing LOOP as well
        self.current().insert(
            body_mark,
            Instruction::word(OpCode::JumpIfFalse, offset(body_len + 1, line)?, line),
        );

        self.exit_loop(ctx, ctx.head)
    }

    fn compile_for(&mut self) -> Result<(), CompilerError> {
        let line = self.cursor.advance().line;
        self.cursor.expect_punct(Punct::LParen)?;
        if !self.cursor.at_punct(Punct::Semicolon) {
            self.compile_simple_stmt()?;
        }
        self.cursor.expect_punct(Punct::Semicolon)?;

        let ctx = self.enter_loop(line);
        let has_cond = !self.cursor.at_punct(Punct::Semicolon);
        if has_cond {
            self.compile_expr()?;
        }
        self.cursor.expect_punct(Punct::Semicolon)?;

        // the step runs after the body: emit it, then move it aside
        let step_mark = self.mark();
        if !self.cursor.at_punct(Punct::RParen) {
            self.compile_simple_stmt()?;
        }
        let step = self.current().code.split_off(step_mark);
        self.cursor.expect_punct(Punct::RParen)?;

        let body_mark = self.mark();
        self.compile_block()?;
        let continue_at = self.mark();
        self.current().code.extend(step);

        if has_cond {
            let guarded = self.mark() - body_mark;
            self.current().insert(
                body_mark,
                Instruction::word(OpCode::JumpIfFalse, offset(guarded + 1, line)?, line),
            );
            self.exit_loop(ctx, continue_at + 1)
        } else {
            self.exit_loop(ctx, continue_at)
        }
    }

    fn compile_condition(&mut self) -> Result<(), CompilerError> {
        self.cursor.expect_punct(Punct::LParen)?;
        self.compile_expr()?;
        self.cursor.expect_punct(Punct::RParen)?;
        Ok(())
    }

    fn compile_loop_exit(&mut self, kw: Keyword) -> Result<(), CompilerError> {
        let line = self.cursor.line();
        if self.current().loop_stack.is_empty() {
            return Err(CompilerError::syntax(
                format!("`{}` outside of a loop", kw.as_str()),
                line,
            ));
        }
        self.cursor.advance();
        let op = match kw {
            Keyword::Break => OpCode::Break,
            _ => OpCode::Continue,
        };
        self.emit(op, line);
        Ok(())
    }

    fn enter_loop(&mut self, line: u32) -> LoopContext {
        let ctx = LoopContext {
            head: self.mark(),
            line,
        };
        self.current().loop_stack.push(ctx);
        ctx
    }

    fn exit_loop(&mut self, ctx: LoopContext, continue_at: usize) -> Result<(), CompilerError> {
        let at = self.mark();
        let back = backward(at, ctx.head, ctx.line)?;
        let function = self.current();
        function.emit(back);
        function.loop_stack.pop();
        let end = function.mark();
        function.patch_loop_exits(ctx.head, continue_at, end)
    }
}
