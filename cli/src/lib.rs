pub mod commands;
pub mod config;
pub mod source;

use compiler::CompilerError;
use thiserror::Error;
use vm::RuntimeError;

/// A script failed to compile or to run.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Compile(#[from] CompilerError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl ScriptError {
    pub fn kind(&self) -> &'static str {
        match self {
            ScriptError::Compile(err) => err.kind(),
            ScriptError::Runtime(err) => err.kind(),
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            ScriptError::Compile(err) => err.line(),
            ScriptError::Runtime(err) => err.line(),
        }
    }

    /// `<Kind>: <message> (line N)`
    pub fn report(&self) -> String {
        format!("{}: {} (line {})", self.kind(), self, self.line())
    }
}

/// Render a command failure for the terminal. Script errors use their
/// one-line report; host failures print the full context chain.
pub fn report(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ScriptError>() {
        Some(script) => script.report(),
        None => format!("error: {err:#}"),
    }
}
