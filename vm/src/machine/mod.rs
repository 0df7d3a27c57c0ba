//! Machine module - VM implementation
//!
//! The interpreter is split by concern: the run loop and dispatch tables,
//! the operand stack, and one handler trait per instruction family.

mod arithmetic;
mod control;
mod data;
mod dispatch;
mod frame;
mod promotion;
mod stack;
mod variables;
mod vm;

// Public API
pub use dispatch::Flow;
pub use frame::Runnable;
pub use promotion::{binary, compare, equals, unary};
pub use stack::{Slot, StackOps};
pub use vm::VM;
