use memory::SlotError;
use thiserror::Error;

/// Errors raised while executing a program. Every variant carries the
/// source line of the instruction that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("{message}")]
    Name { message: String, line: u32 },
    #[error("{message}")]
    Operation { message: String, line: u32 },
    #[error("{message}")]
    Type { message: String, line: u32 },
    #[error("{message}")]
    Argument { message: String, line: u32 },
    #[error("{message}")]
    IndexOutOfRange { message: String, line: u32 },
    #[error("maximum call depth of {limit} exceeded")]
    StackOverflow { limit: usize, line: u32 },
    /// Malformed bytecode: a placeholder or shape mismatch reached the VM.
    #[error("invalid instruction: {message}")]
    InvalidInstruction { message: String, line: u32 },
}

impl RuntimeError {
    pub fn name(message: impl Into<String>, line: u32) -> Self {
        RuntimeError::Name {
            message: message.into(),
            line,
        }
    }

    pub fn operation(message: impl Into<String>, line: u32) -> Self {
        RuntimeError::Operation {
            message: message.into(),
            line,
        }
    }

    pub fn type_error(message: impl Into<String>, line: u32) -> Self {
        RuntimeError::Type {
            message: message.into(),
            line,
        }
    }

    pub fn argument(message: impl Into<String>, line: u32) -> Self {
        RuntimeError::Argument {
            message: message.into(),
            line,
        }
    }

    pub fn index(message: impl Into<String>, line: u32) -> Self {
        RuntimeError::IndexOutOfRange {
            message: message.into(),
            line,
        }
    }

    pub fn invalid(message: impl Into<String>, line: u32) -> Self {
        RuntimeError::InvalidInstruction {
            message: message.into(),
            line,
        }
    }

    /// Container slot failures map onto the user-facing kinds.
    pub fn from_slot(err: SlotError, line: u32) -> Self {
        match err {
            SlotError::OutOfRange { .. } => RuntimeError::index(err.to_string(), line),
            SlotError::BadListKey => RuntimeError::type_error(err.to_string(), line),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::Name { .. } => "NameError",
            RuntimeError::Operation { .. } => "OperationError",
            RuntimeError::Type { .. } => "TypeError",
            RuntimeError::Argument { .. } => "ArgumentError",
            RuntimeError::IndexOutOfRange { .. } => "IndexOutOfRangeError",
            RuntimeError::StackOverflow { .. } => "StackOverflow",
            RuntimeError::InvalidInstruction { .. } => "InvalidInstruction",
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            RuntimeError::Name { line, .. }
            | RuntimeError::Operation { line, .. }
            | RuntimeError::Type { line, .. }
            | RuntimeError::Argument { line, .. }
            | RuntimeError::IndexOutOfRange { line, .. }
            | RuntimeError::StackOverflow { line, .. }
            | RuntimeError::InvalidInstruction { line, .. } => *line,
        }
    }
}
