use shark_parser::{Op, TokenKind};
use vm::opcode::OpCode;

use crate::codegen::Compiler;
use crate::error::CompilerError;

pub mod atoms;
pub mod binary;
pub mod postfix;

pub use atoms::AtomCompiler;
pub use binary::BinaryCompiler;
pub use postfix::PostfixCompiler;

pub trait ExpressionCompiler {
    fn compile_expr(&mut self) -> Result<(), CompilerError>;
    /// Pratt loop: operators binding at least `min_bp`.
    fn compile_expr_bp(&mut self, min_bp: u8) -> Result<(), CompilerError>;
}

impl ExpressionCompiler for Compiler {
    fn compile_expr(&mut self) -> Result<(), CompilerError> {
        self.compile_expr_bp(0)
    }

    fn compile_expr_bp(&mut self, min_bp: u8) -> Result<(), CompilerError> {
        self.compile_prefix()?;
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
            self.compile_expr_bp(r_bp)?;
            self.compile_infix(op, line)?;

            if op.is_comparison() {
                if let TokenKind::Op(next) = self.cursor.peek().kind {
                    if next.is_comparison() {
                        return Err(self
                            .cursor
                            .error("comparison operators cannot be chained")
                            .into());
                    }
                }
            }
        }
        Ok(())
    }
}

/// Opcode of a binary (or compound-assignment base) operator.
pub fn binary_opcode(op: Op) -> Option<OpCode> {
    Some(match op {
        Op::Plus => OpCode::Add,
        Op::Minus => OpCode::Sub,
        Op::Star => OpCode::Mul,
        Op::Slash => OpCode::Div,
        Op::Percent => OpCode::Mod,
        Op::Caret => OpCode::Pow,
        Op::Shl => OpCode::Shl,
        Op::Shr => OpCode::Shr,
        Op::Eq => OpCode::Eq,
        Op::Ne => OpCode::Ne,
        Op::Lt => OpCode::Lt,
        Op::Le => OpCode::Le,
        Op::Gt => OpCode::Gt,
        Op::Ge => OpCode::Ge,
        Op::And => OpCode::And,
        Op::Or => OpCode::Or,
        _ => return None,
    })
}
