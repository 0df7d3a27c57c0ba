pub mod config;
pub mod error;
pub mod machine;
pub mod native;
pub mod opcode;
pub mod program;
pub mod specs;
pub mod stdlib;

pub use config::VmConfig;
pub use error::RuntimeError;
pub use machine::{Runnable, Slot, VM};
pub use native::{NativeContext, NativeFn, OutputBuffer};
pub use opcode::{Chunk, Instruction, OpCode, Operand, OperandShape};
pub use program::{FunctionProto, Program};
