use std::rc::Rc;

use memory::{Callable, Object, ScriptFunction};

use crate::error::RuntimeError;
use crate::opcode::OpCode;

use super::stack::StackOps;

/// Trait for name resolution, literals and function creation
pub trait VariableOps {
    fn load_var(&mut self, id: u32) -> Result<(), RuntimeError>;
    fn store_var(&mut self, id: u32) -> Result<(), RuntimeError>;
    fn load_this(&mut self) -> Result<(), RuntimeError>;
    fn make_function(&mut self, proto: u32) -> Result<(), RuntimeError>;
    /// `PUSH_INT`, `PUSH_FLOAT`, `LOAD_CONST`.
    fn push_immediate(&mut self, op: OpCode, word: u32) -> Result<(), RuntimeError>;
    fn push_immediate_wide(&mut self, value: i64) -> Result<(), RuntimeError>;
}

impl VariableOps for super::vm::VM {
    fn load_var(&mut self, id: u32) -> Result<(), RuntimeError> {
        match self.frame()?.scope.lookup(id) {
            Some(value) => self.push_value(value),
            None => {
                let name = self.program.symbols.name_of(id).unwrap_or("?");
                Err(RuntimeError::name(
                    format!("name '{name}' is not defined"),
                    self.line,
                ))
            }
        }
    }

    fn store_var(&mut self, id: u32) -> Result<(), RuntimeError> {
        let value = self.pop_value()?;
        self.frame()?.scope.define(id, value);
        Ok(())
    }

    fn load_this(&mut self) -> Result<(), RuntimeError> {
        let mut found = None;
        let mut scope = Some(&self.frame()?.scope);
        while let Some(current) = scope {
            if let Some(this) = current.this() {
                found = Some(this.clone());
                break;
            }
            scope = current.parent();
        }
        match found {
            Some(this) => self.push_value(Object::Table(this)),
            None => Err(RuntimeError::name("'this' is not bound", self.line)),
        }
    }

    fn make_function(&mut self, proto: u32) -> Result<(), RuntimeError> {
        let name = match self.program.function(proto) {
            Some(f) => f.name,
            None => {
                return Err(RuntimeError::invalid(
                    format!("unknown function #{proto}"),
                    self.line,
                ))
            }
        };
        let function = ScriptFunction {
            proto,
            name,
            scope: self.frame()?.scope.clone(),
        };
        self.push_value(Object::Callable(Callable::Script(Rc::new(function))))
    }

    fn push_immediate(&mut self, op: OpCode, word: u32) -> Result<(), RuntimeError> {
        let value = match op {
            OpCode::PushInt => Object::Int(word as i32 as i64),
            OpCode::PushFloat => Object::Float(f32::from_bits(word)),
            _ => self
                .program
                .constants
                .get(word)
                .map(|c| c.to_object())
                .ok_or_else(|| {
                    RuntimeError::invalid(format!("unknown constant #{word}"), self.line)
                })?,
        };
        self.push_value(value)
    }

    fn push_immediate_wide(&mut self, value: i64) -> Result<(), RuntimeError> {
        self.push_value(Object::Int(value))
    }
}
