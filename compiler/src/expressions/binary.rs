use memory::Constant;
use shark_parser::{Op, Punct, TokenKind, PREFIX_BP};
use vm::opcode::OpCode;

use super::{binary_opcode, ExpressionCompiler, PostfixCompiler};
use crate::codegen::Compiler;
use crate::error::CompilerError;

pub trait BinaryCompiler {
    /// Unary `-`/`!`, or a postfix chain.
    fn compile_prefix(&mut self) -> Result<(), CompilerError>;
    fn compile_infix(&mut self, op: Op, line: u32) -> Result<(), CompilerError>;
    /// `-` directly applied to a numeric literal becomes one immediate.
    fn try_fold_negative(&mut self) -> Result<bool, CompilerError>;
}

impl BinaryCompiler for Compiler {
    fn compile_prefix(&mut self) -> Result<(), CompilerError> {
        let kind = self.cursor.peek().kind;
        match kind {
            TokenKind::Op(Op::Minus) if self.try_fold_negative()? => Ok(()),
            TokenKind::Op(op @ (Op::Minus | Op::Not)) => {
                let line = self.cursor.advance().line;
                self.compile_expr_bp(PREFIX_BP)?;
                let opcode = if op == Op::Minus {
                    OpCode::Neg
                } else {
                    OpCode::Not
                };
                self.emit(opcode, line);
                Ok(())
            }
            _ => self.compile_chain(false).map(drop),
        }
    }

    fn compile_infix(&mut self, op: Op, line: u32) -> Result<(), CompilerError> {
        let opcode = binary_opcode(op).ok_or_else(|| {
            CompilerError::syntax(format!("`{}` is not a binary operator", op.as_str()), line)
        })?;
        self.emit(opcode, line);
        Ok(())
    }

    fn try_fold_negative(&mut self) -> Result<bool, CompilerError> {
        let literal = self.cursor.lookahead(1);
        if literal.kind != TokenKind::Literal {
            return Ok(false);
        }
        let value = match literal.value {
            Some(Constant::Int(i)) => Constant::Int(i.wrapping_neg()),
            Some(Constant::Float(f)) => Constant::Float(-f),
            _ => return Ok(false),
        };
        // `-2^2` is `-(2^2)`, and `-2[0]` negates the whole chain
        let follower = self.cursor.lookahead(2);
        if follower.is_op(Op::Caret)
            || follower.is_punct(Punct::LParen)
            || follower.is_punct(Punct::LBracket)
            || follower.is_punct(Punct::Dot)
        {
            return Ok(false);
        }

        let line = self.cursor.advance().line;
        self.cursor.advance();
        match value {
            Constant::Int(i) => self.emit_int(i, line),
            Constant::Float(f) => self.emit_float(f, line),
            _ => {}
        }
        Ok(true)
    }
}
