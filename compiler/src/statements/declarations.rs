use shark_parser::Op;
use vm::opcode::OpCode;

use crate::codegen::Compiler;
use crate::error::CompilerError;
use crate::expressions::{binary_opcode, ExpressionCompiler};
use crate::functions::FunctionDefinitionCompiler;
use crate::types::ChainEnd;

pub trait DeclarationCompiler {
    /// `function name(params) { ... }`: bind a new function value in the
    /// current scope.
    fn compile_function_decl(&mut self) -> Result<(), CompilerError>;

    /// Everything after the assignment operator. `target` was produced by
    /// the statement's postfix chain.
    fn compile_assignment(&mut self, target: ChainEnd, op: Op, line: u32)
        -> Result<(), CompilerError>;
}

impl DeclarationCompiler for Compiler {
    fn compile_function_decl(&mut self) -> Result<(), CompilerError> {
        let line = self.cursor.advance().line;
        let name = self.cursor.expect_ident()?;
        let id = name
            .id
            .ok_or_else(|| CompilerError::syntax("identifier without symbol ID", name.line))?;
        let proto = self.compile_function(Some(id), line)?;
        self.emit_word(OpCode::MakeFunction, proto, line);
        self.emit_word(OpCode::StoreVar, id, line);
        Ok(())
    }

    fn compile_assignment(
        &mut self,
        target: ChainEnd,
        op: Op,
        line: u32,
    ) -> Result<(), CompilerError> {
        let compound = op.compound_base().and_then(binary_opcode);

        match target {
            ChainEnd::Var { id, line: var_line } => {
                if compound.is_some() {
                    self.emit_word(OpCode::LoadVar, id, var_line);
                }
                self.compile_expr()?;
                if let Some(opcode) = compound {
                    self.emit(opcode, line);
                }
                self.emit_word(OpCode::StoreVar, id, line);
            }
            _ => {
                // target slot stays below; the copy feeds the operator
                if compound.is_some() {
                    self.emit(OpCode::Dup, line);
                }
                self.compile_expr()?;
                if let Some(opcode) = compound {
                    self.emit(opcode, line);
                }
                self.emit(OpCode::StoreRef, line);
            }
        }
        Ok(())
    }
}
