use crate::error::RuntimeError;
use crate::opcode::OpCode;

use super::promotion::TypePromotion;
use super::stack::StackOps;

/// Trait for arithmetic instruction handlers
pub trait ArithmeticOps {
    /// `ADD SUB MUL DIV MOD POW SHL SHR`: pop right, pop left, push result.
    fn handle_binary(&mut self, op: OpCode) -> Result<(), RuntimeError>;

    /// `EQ NE LT LE GT GE AND OR`.
    fn handle_compare(&mut self, op: OpCode) -> Result<(), RuntimeError>;

    /// `NEG NOT`.
    fn handle_unary(&mut self, op: OpCode) -> Result<(), RuntimeError>;
}

impl ArithmeticOps for super::vm::VM {
    fn handle_binary(&mut self, op: OpCode) -> Result<(), RuntimeError> {
        let right = self.pop_value()?;
        let left = self.pop_value()?;
        let result = self.binary_op(op, &left, &right)?;
        self.push_value(result)
    }

    fn handle_compare(&mut self, op: OpCode) -> Result<(), RuntimeError> {
        let right = self.pop_value()?;
        let left = self.pop_value()?;
        let result = self.compare_op(op, &left, &right)?;
        self.push_value(result)
    }

    fn handle_unary(&mut self, op: OpCode) -> Result<(), RuntimeError> {
        let operand = self.pop_value()?;
        let result = self.unary_op(op, &operand)?;
        self.push_value(result)
    }
}
