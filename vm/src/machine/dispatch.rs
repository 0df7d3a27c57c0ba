//! Opcode dispatch tables.
//!
//! One table per operand shape, indexed by the opcode byte. Tables are
//! built once when the VM is created; a missing entry means the opcode
//! cannot be executed with that shape.

use crate::error::RuntimeError;
use crate::opcode::{OpCode, OPCODE_SLOTS};

use super::arithmetic::ArithmeticOps;
use super::control::ControlFlowOps;
use super::data::DataOps;
use super::stack::StackOps;
use super::variables::VariableOps;
use super::vm::VM;

/// What the run loop does after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Advance the cursor of the current runnable by one.
    Next,
    /// The handler moved a cursor or switched runnables itself.
    Jumped,
    /// Stop the program.
    Halt,
}

pub type SimpleHandler = fn(&mut VM, OpCode) -> Result<Flow, RuntimeError>;
pub type WordHandler = fn(&mut VM, OpCode, u32) -> Result<Flow, RuntimeError>;
pub type WideHandler = fn(&mut VM, u64) -> Result<Flow, RuntimeError>;

pub struct DispatchTables {
    pub simple: [Option<SimpleHandler>; OPCODE_SLOTS],
    pub word: [Option<WordHandler>; OPCODE_SLOTS],
    pub wide: [Option<WideHandler>; OPCODE_SLOTS],
}

impl Default for DispatchTables {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchTables {
    pub fn new() -> Self {
        let mut tables = Self {
            simple: [None; OPCODE_SLOTS],
            word: [None; OPCODE_SLOTS],
            wide: [None; OPCODE_SLOTS],
        };

        use OpCode::*;
        for op in [Pop, Dup, PushNull, PushTrue, PushFalse] {
            tables.on_simple(op, stack_op);
        }
        tables.on_simple(LoadThis, load_this);
        tables.on_simple(GetIndex, get_index);
        tables.on_simple(StoreRef, store_ref);
        for op in [Add, Sub, Mul, Div, Mod, Pow, Shl, Shr] {
            tables.on_simple(op, binary);
        }
        for op in [Eq, Ne, Lt, Le, Gt, Ge, And, Or] {
            tables.on_simple(op, compare);
        }
        for op in [Neg, Not] {
            tables.on_simple(op, unary);
        }
        tables.on_simple(Return, return_op);

        for op in [PushInt, PushFloat, LoadConst] {
            tables.on_word(op, push_word);
        }
        tables.on_word(LoadVar, load_var);
        tables.on_word(StoreVar, store_var);
        tables.on_word(GetField, get_field);
        tables.on_word(BuildList, build_list);
        tables.on_word(BuildTable, build_table);
        tables.on_word(MakeFunction, make_function);
        tables.on_word(Call, call);
        for op in [Jump, JumpIfFalse, Loop] {
            tables.on_word(op, jump);
        }

        tables.on_wide(PushWide, push_wide);
        tables
    }

    fn on_simple(&mut self, op: OpCode, handler: SimpleHandler) {
        self.simple[op as usize] = Some(handler);
    }

    fn on_word(&mut self, op: OpCode, handler: WordHandler) {
        self.word[op as usize] = Some(handler);
    }

    fn on_wide(&mut self, op: OpCode, handler: WideHandler) {
        self.wide[op as usize] = Some(handler);
    }
}

fn stack_op(vm: &mut VM, op: OpCode) -> Result<Flow, RuntimeError> {
    vm.handle_stack(op)?;
    Ok(Flow::Next)
}

fn load_this(vm: &mut VM, _op: OpCode) -> Result<Flow, RuntimeError> {
    vm.load_this()?;
    Ok(Flow::Next)
}

fn get_index(vm: &mut VM, _op: OpCode) -> Result<Flow, RuntimeError> {
    vm.get_index()?;
    Ok(Flow::Next)
}

fn store_ref(vm: &mut VM, _op: OpCode) -> Result<Flow, RuntimeError> {
    vm.store_ref()?;
    Ok(Flow::Next)
}

fn binary(vm: &mut VM, op: OpCode) -> Result<Flow, RuntimeError> {
    vm.handle_binary(op)?;
    Ok(Flow::Next)
}

fn compare(vm: &mut VM, op: OpCode) -> Result<Flow, RuntimeError> {
    vm.handle_compare(op)?;
    Ok(Flow::Next)
}

fn unary(vm: &mut VM, op: OpCode) -> Result<Flow, RuntimeError> {
    vm.handle_unary(op)?;
    Ok(Flow::Next)
}

fn return_op(vm: &mut VM, _op: OpCode) -> Result<Flow, RuntimeError> {
    vm.return_from()
}

fn push_word(vm: &mut VM, op: OpCode, word: u32) -> Result<Flow, RuntimeError> {
    vm.push_immediate(op, word)?;
    Ok(Flow::Next)
}

fn load_var(vm: &mut VM, _op: OpCode, id: u32) -> Result<Flow, RuntimeError> {
    vm.load_var(id)?;
    Ok(Flow::Next)
}

fn store_var(vm: &mut VM, _op: OpCode, id: u32) -> Result<Flow, RuntimeError> {
    vm.store_var(id)?;
    Ok(Flow::Next)
}

fn get_field(vm: &mut VM, _op: OpCode, id: u32) -> Result<Flow, RuntimeError> {
    vm.get_field(id)?;
    Ok(Flow::Next)
}

fn build_list(vm: &mut VM, _op: OpCode, count: u32) -> Result<Flow, RuntimeError> {
    vm.build_list(count as usize)?;
    Ok(Flow::Next)
}

fn build_table(vm: &mut VM, _op: OpCode, count: u32) -> Result<Flow, RuntimeError> {
    vm.build_table(count as usize)?;
    Ok(Flow::Next)
}

fn make_function(vm: &mut VM, _op: OpCode, proto: u32) -> Result<Flow, RuntimeError> {
    vm.make_function(proto)?;
    Ok(Flow::Next)
}

fn call(vm: &mut VM, _op: OpCode, argc: u32) -> Result<Flow, RuntimeError> {
    vm.call(argc as usize)
}

fn jump(vm: &mut VM, op: OpCode, offset: u32) -> Result<Flow, RuntimeError> {
    vm.jump(op, offset)
}

fn push_wide(vm: &mut VM, value: u64) -> Result<Flow, RuntimeError> {
    vm.push_immediate_wide(value as i64)?;
    Ok(Flow::Next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::OperandShape;

    #[test]
    fn every_executable_opcode_has_exactly_one_handler() {
        let tables = DispatchTables::new();
        for op in OpCode::ALL {
            let idx = op as usize;
            let registered = [
                tables.simple[idx].is_some(),
                tables.word[idx].is_some(),
                tables.wide[idx].is_some(),
            ];
            if matches!(op, OpCode::Break | OpCode::Continue) {
                assert_eq!(registered, [false, false, false], "{op}");
                continue;
            }
            let expected = match op.shape() {
                OperandShape::None => [true, false, false],
                OperandShape::Word => [false, true, false],
                OperandShape::Wide => [false, false, true],
            };
            assert_eq!(registered, expected, "{op}");
        }
    }
}
