use thiserror::Error;

/// Syntax error with source location.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}{}", .context.as_ref().map(|c| format!(" (after `{c}`)")).unwrap_or_default())]
pub struct ParseError {
    pub message: String,
    pub line: u32,
    /// Leading identifier of the statement being parsed, when known.
    pub context: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: u32) -> Self {
        Self {
            message: message.into(),
            line,
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        if self.context.is_none() {
            self.context = Some(context.into());
        }
        self
    }

    pub fn kind(&self) -> &'static str {
        "SyntaxError"
    }
}
