use std::rc::Rc;

use memory::{new_table, Callable, Container, Object, Scope, ScriptFunction, Tuple};

use crate::error::RuntimeError;
use crate::native::NativeContext;
use crate::opcode::OpCode;
use crate::specs::NATIVE_TABLE;

use super::dispatch::Flow;
use super::frame::Runnable;
use super::stack::{Slot, StackOps};

/// Trait for control flow instruction handlers
pub trait ControlFlowOps {
    /// `JUMP`, `JUMP_IF_FALSE` (forward, relative to the next instruction)
    /// and `LOOP` (backward, relative to itself).
    fn jump(&mut self, op: OpCode, offset: u32) -> Result<Flow, RuntimeError>;

    fn call(&mut self, argc: usize) -> Result<Flow, RuntimeError>;

    fn call_native(&mut self, id: u32, args: Tuple) -> Result<Object, RuntimeError>;

    fn call_script(
        &mut self,
        function: Rc<ScriptFunction>,
        callee: Slot,
        args: Tuple,
    ) -> Result<(), RuntimeError>;

    /// Pop the return value, drop the activation and hand the value to
    /// the caller. A top-level `return` halts the program.
    fn return_from(&mut self) -> Result<Flow, RuntimeError>;
}

impl ControlFlowOps for super::vm::VM {
    fn jump(&mut self, op: OpCode, offset: u32) -> Result<Flow, RuntimeError> {
        let line = self.line;
        let taken = match op {
            OpCode::JumpIfFalse => !self.pop_value()?.is_truthy(),
            _ => true,
        };
        let frame = self.frame_mut()?;
        if !taken {
            frame.ip += 1;
            return Ok(Flow::Jumped);
        }

        let target = match op {
            OpCode::Loop => frame.ip.checked_sub(offset as usize),
            _ => frame.ip.checked_add(1 + offset as usize),
        };
        match target {
            Some(target) if target <= frame.code.len() => {
                frame.ip = target;
                Ok(Flow::Jumped)
            }
            _ => Err(RuntimeError::invalid(
                format!("{op} {offset} leaves the instruction stream"),
                line,
            )),
        }
    }

    fn call(&mut self, argc: usize) -> Result<Flow, RuntimeError> {
        let args: Tuple = Rc::from(self.pop_n(argc)?);
        let callee = self.pop()?;

        match callee.value.clone() {
            Object::Callable(Callable::Native { id }) => {
                let result = self.call_native(id, args)?;
                self.push_value(result)?;
                Ok(Flow::Next)
            }
            Object::Callable(Callable::Script(function)) => {
                self.frame_mut()?.ip += 1;
                self.call_script(function, callee, args)?;
                Ok(Flow::Jumped)
            }
            other => Err(RuntimeError::type_error(
                format!("{} is not callable", other.type_name()),
                self.line,
            )),
        }
    }

    fn call_native(&mut self, id: u32, args: Tuple) -> Result<Object, RuntimeError> {
        let meta = NATIVE_TABLE.get(id as usize).ok_or_else(|| {
            RuntimeError::invalid(format!("unknown native function #{id}"), self.line)
        })?;

        if meta.arity >= 0 && meta.arity as usize != args.len() {
            return Err(RuntimeError::argument(
                format!(
                    "{}() takes {} argument{} but {} were given",
                    meta.name,
                    meta.arity,
                    if meta.arity == 1 { "" } else { "s" },
                    args.len()
                ),
                self.line,
            ));
        }

        let mut ctx = NativeContext {
            line: self.line,
            out: &mut *self.out,
            rng: &mut self.rng,
            symbols: &self.program.symbols,
        };
        (meta.func)(&mut ctx, &args)
    }

    fn call_script(
        &mut self,
        function: Rc<ScriptFunction>,
        callee: Slot,
        args: Tuple,
    ) -> Result<(), RuntimeError> {
        let proto = self.program.function(function.proto).ok_or_else(|| {
            RuntimeError::invalid(format!("unknown function #{}", function.proto), self.line)
        })?;

        if proto.arity() != args.len() {
            return Err(RuntimeError::argument(
                format!(
                    "{}() takes {} argument{} but {} were given",
                    self.program.function_name(function.proto),
                    proto.arity(),
                    if proto.arity() == 1 { "" } else { "s" },
                    args.len()
                ),
                self.line,
            ));
        }

        // the script runnable does not count toward the depth
        if self.frames.len() > self.config.max_call_depth {
            return Err(RuntimeError::StackOverflow {
                limit: self.config.max_call_depth,
                line: self.line,
            });
        }

        // a function read out of a table field is a method of that table
        let this = match callee.origin {
            Some(origin) => match origin.container {
                Container::Table(table) => table,
                Container::List(_) => new_table(),
            },
            None => new_table(),
        };

        let scope = Scope::child(function.scope.clone(), Some(this));
        for (param, arg) in proto.params.iter().zip(args.iter()) {
            scope.define(*param, arg.clone());
        }

        let runnable = Runnable::function(
            function.proto,
            proto.code.clone(),
            scope,
            self.stack.len(),
        );
        self.frames.push(runnable);
        Ok(())
    }

    fn return_from(&mut self) -> Result<Flow, RuntimeError> {
        let value = self.pop_value()?;
        let frame = self
            .frames
            .pop()
            .ok_or_else(|| RuntimeError::invalid("return without a runnable", self.line))?;

        if frame.is_script() {
            return Ok(Flow::Halt);
        }

        self.stack.truncate(frame.stack_base);
        self.push_value(value)?;
        Ok(Flow::Jumped)
    }
}
