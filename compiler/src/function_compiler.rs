use std::rc::Rc;

use vm::opcode::{Instruction, OpCode};
use vm::program::FunctionProto;

use crate::error::CompilerError;
use crate::types::LoopContext;

/// State specific to ONE instruction stream being compiled: the script
/// itself or a function body.
pub struct FunctionCompiler {
    pub name: Option<u32>,
    pub params: Vec<u32>,
    pub code: Vec<Instruction>,
    pub loop_stack: Vec<LoopContext>,
    pub line: u32,
}

impl FunctionCompiler {
    pub fn new(name: Option<u32>, params: Vec<u32>, line: u32) -> Self {
        Self {
            name,
            params,
            code: Vec::new(),
            loop_stack: Vec::new(),
            line,
        }
    }

    pub fn emit(&mut self, instruction: Instruction) {
        self.code.push(instruction);
    }

    /// Current end of the stream; the position the next instruction gets.
    #[inline]
    pub fn mark(&self) -> usize {
        self.code.len()
    }

    /// Insert before `at`, shifting everything after it by one.
    pub fn insert(&mut self, at: usize, instruction: Instruction) {
        self.code.insert(at, instruction);
    }

    /// Rewrite the `BREAK`/`CONTINUE` placeholders left in `head..end` into
    /// relative jumps. Placeholders of inner loops are already gone by the
    /// time their enclosing loop completes, so everything found belongs to
    /// this loop.
    pub fn patch_loop_exits(
        &mut self,
        head: usize,
        continue_at: usize,
        end: usize,
    ) -> Result<(), CompilerError> {
        for i in head..end {
            let Instruction { op, line, .. } = self.code[i];
            let patched = match op {
                OpCode::Break => forward(i, end, line)?,
                OpCode::Continue if continue_at <= i => backward(i, continue_at, line)?,
                OpCode::Continue => forward(i, continue_at, line)?,
                _ => continue,
            };
            self.code[i] = patched;
        }
        Ok(())
    }

    pub fn into_proto(self) -> FunctionProto {
        FunctionProto {
            name: self.name,
            params: self.params,
            code: Rc::from(self.code),
            line: self.line,
        }
    }
}

/// `JUMP` at `from` landing on `to`.
pub fn forward(from: usize, to: usize, line: u32) -> Result<Instruction, CompilerError> {
    let offset = to - (from + 1);
    let offset = u32::try_from(offset)
        .map_err(|_| CompilerError::limitation("jump distance exceeds 32 bits", line))?;
    Ok(Instruction::word(OpCode::Jump, offset, line))
}

/// `LOOP` at `from` landing on `to`.
pub fn backward(from: usize, to: usize, line: u32) -> Result<Instruction, CompilerError> {
    let offset = u32::try_from(from - to)
        .map_err(|_| CompilerError::limitation("loop body exceeds 32 bits", line))?;
    Ok(Instruction::word(OpCode::Loop, offset, line))
}
