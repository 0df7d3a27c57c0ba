use shark_parser::ParseError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilerError {
    /// Lexical or grammatical error, from the lexer or the emitter.
    #[error(transparent)]
    Syntax(#[from] ParseError),
    /// The program is valid but exceeds what the bytecode can encode.
    #[error("{message}")]
    CompilerLimitation { message: String, line: u32 },
}

impl CompilerError {
    pub fn syntax(message: impl Into<String>, line: u32) -> Self {
        CompilerError::Syntax(ParseError::new(message, line))
    }

    pub fn limitation(message: impl Into<String>, line: u32) -> Self {
        CompilerError::CompilerLimitation {
            message: message.into(),
            line,
        }
    }

    /// Attach the statement's leading identifier to a syntax error.
    pub fn with_context(self, context: &str) -> Self {
        match self {
            CompilerError::Syntax(err) => CompilerError::Syntax(err.with_context(context)),
            other => other,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CompilerError::Syntax(err) => err.kind(),
            CompilerError::CompilerLimitation { .. } => "CompilerLimitation",
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            CompilerError::Syntax(err) => err.line,
            CompilerError::CompilerLimitation { line, .. } => *line,
        }
    }
}
