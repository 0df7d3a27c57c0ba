use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use memory::{Object, SymbolTable, Tuple};
use rand::rngs::StdRng;

use crate::error::RuntimeError;

/// What a native function may touch: no VM handle, only the pieces it
/// needs.
pub struct NativeContext<'a> {
    pub line: u32,
    pub out: &'a mut dyn Write,
    pub rng: &'a mut StdRng,
    pub symbols: &'a SymbolTable,
}

// The unified signature for ALL natives.
// args: the call's arguments in source order.
pub type NativeFn = fn(ctx: &mut NativeContext<'_>, args: &Tuple) -> Result<Object, RuntimeError>;

impl NativeContext<'_> {
    pub fn argument_error(&self, message: impl Into<String>) -> RuntimeError {
        RuntimeError::argument(message, self.line)
    }

    pub fn type_error(&self, message: impl Into<String>) -> RuntimeError {
        RuntimeError::type_error(message, self.line)
    }

    /// Rejects a call whose argument count differs from `expected`.
    pub fn arity(&self, name: &str, args: &Tuple, expected: usize) -> Result<(), RuntimeError> {
        if args.len() == expected {
            return Ok(());
        }
        Err(self.argument_error(format!(
            "{name}() takes {expected} argument{} but {} were given",
            if expected == 1 { "" } else { "s" },
            args.len()
        )))
    }

    /// Numeric argument as `f32` (Int, Float or Bool).
    pub fn number(&self, name: &str, arg: &Object) -> Result<f32, RuntimeError> {
        arg.as_float().ok_or_else(|| {
            self.type_error(format!(
                "{name}() expects a number, got {}",
                arg.type_name()
            ))
        })
    }

    /// Integral argument; floats are truncated toward zero.
    pub fn integer(&self, name: &str, arg: &Object) -> Result<i64, RuntimeError> {
        match arg {
            Object::Float(f) => Ok(f.trunc() as i64),
            other => other.as_int().ok_or_else(|| {
                self.type_error(format!(
                    "{name}() expects a number, got {}",
                    other.type_name()
                ))
            }),
        }
    }
}

/// Cloneable in-memory output sink, for embedding and tests.
#[derive(Clone, Default)]
pub struct OutputBuffer(Rc<RefCell<Vec<u8>>>);

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
