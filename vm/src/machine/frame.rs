use std::rc::Rc;

use memory::Scope;

use crate::opcode::Chunk;

/// One unit of execution: the top-level script or a function activation.
///
/// Each runnable tracks:
/// - `code`: the instruction stream it executes
/// - `ip`: its own instruction cursor
/// - `scope`: its variable table (with `this` and the parent link)
/// - `stack_base`: operand stack height when it started
#[derive(Debug, Clone)]
pub struct Runnable {
    pub code: Chunk,
    pub ip: usize,
    pub scope: Rc<Scope>,
    pub stack_base: usize,
    /// Prototype index; `None` for the script itself.
    pub function: Option<u32>,
}

impl Runnable {
    pub fn script(code: Chunk, scope: Rc<Scope>) -> Self {
        Self {
            code,
            ip: 0,
            scope,
            stack_base: 0,
            function: None,
        }
    }

    pub fn function(proto: u32, code: Chunk, scope: Rc<Scope>, stack_base: usize) -> Self {
        Self {
            code,
            ip: 0,
            scope,
            stack_base,
            function: Some(proto),
        }
    }

    pub fn is_script(&self) -> bool {
        self.function.is_none()
    }
}
