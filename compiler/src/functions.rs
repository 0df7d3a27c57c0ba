use shark_parser::Token;
use vm::opcode::OpCode;

use crate::codegen::Compiler;
use crate::error::CompilerError;
use crate::statements::StatementCompiler;

pub trait FunctionDefinitionCompiler {
    /// Parameter list and body, after `function [name]`. The body goes into
    /// its own instruction stream; returns the new prototype's index.
    fn compile_function(&mut self, name: Option<u32>, line: u32) -> Result<u32, CompilerError>;
}

impl FunctionDefinitionCompiler for Compiler {
    fn compile_function(&mut self, name: Option<u32>, line: u32) -> Result<u32, CompilerError> {
        let params = self
            .cursor
            .param_list()?
            .iter()
            .map(|param: &Token| {
                param.id.ok_or_else(|| {
                    CompilerError::syntax("identifier without symbol ID", param.line)
                })
            })
            .collect::<Result<Vec<u32>, _>>()?;

        self.begin_function(name, params, line);
        self.compile_block()?;

        // falling off the end returns null
        let end_line = self.current().code.last().map_or(line, |i| i.line);
        self.emit(OpCode::PushNull, end_line);
        self.emit(OpCode::Return, end_line);
        self.end_function()
    }
}
