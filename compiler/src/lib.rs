pub mod codegen;
pub mod control_flow;
pub mod error;
pub mod expressions;
pub mod function_compiler;
pub mod functions;
pub mod statements;
pub mod types;

pub use codegen::{compile_source, Compiler};
pub use error::CompilerError;
