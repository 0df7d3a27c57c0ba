use std::path::Path;

use anyhow::Result;
use shark_parser::parse_program;

use crate::source::require_source;
use crate::ScriptError;

pub fn ast_file(path: &Path) -> Result<()> {
    let source = require_source(path)?;
    println!("{}", dump_ast(&source)?);
    Ok(())
}

pub fn dump_ast(source: &str) -> Result<String> {
    let program = parse_program(source).map_err(|e| ScriptError::Compile(e.into()))?;
    Ok(serde_json::to_string_pretty(&program)?)
}
