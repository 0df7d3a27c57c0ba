use memory::{BackRef, Object};

use crate::error::RuntimeError;
use crate::opcode::OpCode;

/// Operand stack entry: a value plus the container slot it was read from,
/// when it came out of a list or table.
#[derive(Debug, Clone, Default)]
pub struct Slot {
    pub value: Object,
    pub origin: Option<BackRef>,
}

impl Slot {
    pub fn plain(value: Object) -> Self {
        Self {
            value,
            origin: None,
        }
    }

    pub fn with_origin(value: Object, origin: BackRef) -> Self {
        Self {
            value,
            origin: Some(origin),
        }
    }
}

/// Trait for operand stack operations
pub trait StackOps {
    fn push(&mut self, slot: Slot) -> Result<(), RuntimeError>;
    fn push_value(&mut self, value: Object) -> Result<(), RuntimeError>;
    fn pop(&mut self) -> Result<Slot, RuntimeError>;
    fn pop_value(&mut self) -> Result<Object, RuntimeError>;
    /// Pop `n` values, returned in push order.
    fn pop_n(&mut self, n: usize) -> Result<Vec<Object>, RuntimeError>;
    fn peek(&self) -> Option<&Slot>;
    /// `POP DUP PUSH_NULL PUSH_TRUE PUSH_FALSE`.
    fn handle_stack(&mut self, op: OpCode) -> Result<(), RuntimeError>;
}

impl StackOps for super::vm::VM {
    fn push(&mut self, slot: Slot) -> Result<(), RuntimeError> {
        if self.stack.len() >= self.config.max_stack {
            return Err(RuntimeError::StackOverflow {
                limit: self.config.max_stack,
                line: self.line,
            });
        }
        self.stack.push(slot);
        Ok(())
    }

    #[inline]
    fn push_value(&mut self, value: Object) -> Result<(), RuntimeError> {
        self.push(Slot::plain(value))
    }

    fn pop(&mut self) -> Result<Slot, RuntimeError> {
        if self.stack.len() <= self.frame_base() {
            return Err(RuntimeError::invalid("operand stack underflow", self.line));
        }
        self.stack
            .pop()
            .ok_or_else(|| RuntimeError::invalid("operand stack underflow", self.line))
    }

    #[inline]
    fn pop_value(&mut self) -> Result<Object, RuntimeError> {
        self.pop().map(|slot| slot.value)
    }

    fn pop_n(&mut self, n: usize) -> Result<Vec<Object>, RuntimeError> {
        if self.stack.len() < self.frame_base() + n {
            return Err(RuntimeError::invalid("operand stack underflow", self.line));
        }
        let start = self.stack.len() - n;
        Ok(self.stack.drain(start..).map(|slot| slot.value).collect())
    }

    fn peek(&self) -> Option<&Slot> {
        self.stack.last()
    }

    fn handle_stack(&mut self, op: OpCode) -> Result<(), RuntimeError> {
        match op {
            OpCode::Pop => self.pop().map(drop),
            OpCode::Dup => {
                // the copy keeps its origin so compound assignment can store back
                let top = match self.peek() {
                    Some(slot) if self.stack.len() > self.frame_base() => slot.clone(),
                    _ => return Err(RuntimeError::invalid("operand stack underflow", self.line)),
                };
                self.push(top)
            }
            OpCode::PushNull => self.push_value(Object::Null),
            OpCode::PushTrue => self.push_value(Object::Bool(true)),
            OpCode::PushFalse => self.push_value(Object::Bool(false)),
            other => Err(RuntimeError::invalid(
                format!("{other} is not a stack opcode"),
                self.line,
            )),
        }
    }
}
