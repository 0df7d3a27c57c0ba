pub mod ast;
pub mod disassemble;
pub mod run;
pub mod tokens;
