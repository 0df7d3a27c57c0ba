use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use shark_parser::Lexer;

use crate::source::require_source;
use crate::ScriptError;

pub fn tokens_file(path: &Path) -> Result<()> {
    let source = require_source(path)?;
    let listing = dump_tokens(&source)?;
    io::stdout()
        .write_all(listing.as_bytes())
        .context("failed to write tokens")
}

/// One JSON object per token, end-of-input included.
pub fn dump_tokens(source: &str) -> Result<String> {
    let stream = Lexer::tokenize(source).map_err(|e| ScriptError::Compile(e.into()))?;
    let mut out = String::new();
    for token in &stream.tokens {
        out.push_str(&serde_json::to_string(token)?);
        out.push('\n');
    }
    Ok(out)
}
