use std::rc::Rc;

use log::debug;
use memory::{ConstantPool, SymbolTable};
use shark_parser::{Lexer, TokenCursor, TokenStream};
use vm::opcode::{Instruction, OpCode};
use vm::program::{FunctionProto, Program};

use crate::error::CompilerError;
use crate::function_compiler::FunctionCompiler;
use crate::statements::StatementCompiler;

/// Single-pass emitter: walks the token stream once and writes bytecode
/// as it goes. There is no intermediate tree.
pub struct Compiler {
    pub cursor: TokenCursor,
    pub symbols: SymbolTable,
    pub constants: ConstantPool,
    /// Finished function bodies; `MAKE_FUNCTION` operands index this.
    pub functions: Vec<FunctionProto>,
    script: FunctionCompiler,
    /// Function bodies being compiled, innermost last.
    nested: Vec<FunctionCompiler>,
}

/// Lex and compile a complete source string.
///
/// ```
/// let program = compiler::compile_source("x = 1 + 2").unwrap();
/// assert!(!program.code.is_empty());
/// ```
pub fn compile_source(source: &str) -> Result<Program, CompilerError> {
    let stream = Lexer::tokenize(source)?;
    Compiler::compile(stream)
}

impl Compiler {
    pub fn new(stream: TokenStream) -> Self {
        Self {
            cursor: TokenCursor::new(stream.tokens),
            symbols: stream.symbols,
            constants: stream.constants,
            functions: Vec::new(),
            script: FunctionCompiler::new(None, Vec::new(), 1),
            nested: Vec::new(),
        }
    }

    /// Compile a lexed unit into a runnable [`Program`].
    pub fn compile(stream: TokenStream) -> Result<Program, CompilerError> {
        let mut compiler = Compiler::new(stream);
        while !compiler.cursor.at_eof() {
            compiler.compile_stmt()?;
        }
        Ok(compiler.finish())
    }

    fn finish(self) -> Program {
        let script = self.script.into_proto();
        debug!(
            "compiled {} script instructions, {} functions, {} constants",
            script.code.len(),
            self.functions.len(),
            self.constants.len()
        );
        Program {
            code: script.code,
            functions: self.functions,
            symbols: self.symbols,
            constants: self.constants,
        }
    }

    /// The instruction stream currently being written.
    pub fn current(&mut self) -> &mut FunctionCompiler {
        match self.nested.last_mut() {
            Some(function) => function,
            None => &mut self.script,
        }
    }

    pub fn begin_function(&mut self, name: Option<u32>, params: Vec<u32>, line: u32) {
        self.nested.push(FunctionCompiler::new(name, params, line));
    }

    /// Close the innermost function body and register its prototype.
    pub fn end_function(&mut self) -> Result<u32, CompilerError> {
        let line = self.cursor.line();
        let function = self
            .nested
            .pop()
            .ok_or_else(|| CompilerError::limitation("no function body is open", line))?;
        let index = u32::try_from(self.functions.len())
            .map_err(|_| CompilerError::limitation("too many functions", line))?;
        self.functions.push(function.into_proto());
        Ok(index)
    }

    // ========================================================================
    // Emission helpers
    // ========================================================================

    pub fn emit(&mut self, op: OpCode, line: u32) {
        self.current().emit(Instruction::simple(op, line));
    }

    pub fn emit_word(&mut self, op: OpCode, word: u32, line: u32) {
        self.current().emit(Instruction::word(op, word, line));
    }

    /// Integer immediate: `PUSH_INT` when it fits 32 bits, else `PUSH_WIDE`.
    pub fn emit_int(&mut self, value: i64, line: u32) {
        let instruction = match i32::try_from(value) {
            Ok(small) => Instruction::int(small, line),
            Err(_) => Instruction::wide(value, line),
        };
        self.current().emit(instruction);
    }

    pub fn emit_float(&mut self, value: f32, line: u32) {
        self.current().emit(Instruction::float(value, line));
    }

    pub fn mark(&mut self) -> usize {
        self.current().mark()
    }

    /// Intern a string constant the lexer did not see as a literal.
    pub fn string_constant(&mut self, text: &str) -> u32 {
        self.constants.add(memory::Constant::Str(Rc::from(text)))
    }
}
