use memory::{ConstantPool, SymbolTable};

use crate::opcode::Chunk;

/// A compiled function body.
#[derive(Debug, Clone)]
pub struct FunctionProto {
    /// Symbol ID of the declared name; `None` for function expressions.
    pub name: Option<u32>,
    /// Parameter symbol IDs, in declaration order.
    pub params: Vec<u32>,
    pub code: Chunk,
    pub line: u32,
}

impl FunctionProto {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Everything the VM needs to run a script.
#[derive(Debug, Clone)]
pub struct Program {
    pub code: Chunk,
    pub functions: Vec<FunctionProto>,
    pub symbols: SymbolTable,
    pub constants: ConstantPool,
}

impl Program {
    pub fn function(&self, index: u32) -> Option<&FunctionProto> {
        self.functions.get(index as usize)
    }

    /// Display name of a function prototype.
    pub fn function_name(&self, index: u32) -> &str {
        self.function(index)
            .and_then(|f| f.name)
            .and_then(|id| self.symbols.name_of(id))
            .unwrap_or("<anonymous>")
    }
}
