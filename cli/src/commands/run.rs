use std::io::Write;
use std::path::Path;

use anyhow::Result;
use compiler::compile_source;
use log::info;
use vm::{VmConfig, VM};

use crate::source::require_source;
use crate::ScriptError;

pub fn run_file(path: &Path, config: VmConfig) -> Result<()> {
    let source = require_source(path)?;
    info!("running {}", path.display());
    run_source(&source, config, std::io::stdout())?;
    Ok(())
}

/// Compile and execute `source`, sending `print` output to `out`.
pub fn run_source(
    source: &str,
    config: VmConfig,
    out: impl Write + 'static,
) -> Result<(), ScriptError> {
    let program = compile_source(source)?;
    let mut vm = VM::new(program, config).with_output(out);
    vm.run()?;
    Ok(())
}
