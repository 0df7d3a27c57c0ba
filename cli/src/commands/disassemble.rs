use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use compiler::compile_source;
use vm::opcode::{Instruction, OpCode, Operand};
use vm::Program;

use crate::source::require_source;
use crate::ScriptError;

pub fn disassemble_file(path: &Path) -> Result<()> {
    let source = require_source(path)?;
    let program = compile_source(&source).map_err(ScriptError::from)?;
    println!("== Disassembly of {} ==", path.display());
    print!("{}", disassemble(&program));
    Ok(())
}

/// Listing of the script body followed by every function prototype.
pub fn disassemble(program: &Program) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<script>");
    write_chunk(&mut out, program, &program.code);
    for (index, proto) in program.functions.iter().enumerate() {
        let params: Vec<&str> = proto
            .params
            .iter()
            .map(|id| program.symbols.name_of(*id).unwrap_or("?"))
            .collect();
        let _ = writeln!(
            out,
            "\n<function #{index} {}({})> line {}",
            program.function_name(index as u32),
            params.join(", "),
            proto.line
        );
        write_chunk(&mut out, program, &proto.code);
    }
    out
}

fn write_chunk(out: &mut String, program: &Program, code: &[Instruction]) {
    let mut last_line = None;
    for (i, ins) in code.iter().enumerate() {
        let line = if last_line == Some(ins.line) {
            "   |".to_string()
        } else {
            format!("{:4}", ins.line)
        };
        last_line = Some(ins.line);

        let operand = match ins.operand {
            Operand::None => String::new(),
            Operand::Word(_) => ins.arg().to_string(),
            Operand::Wide(_) => ins.as_wide().to_string(),
        };
        let _ = write!(out, "{i:04} {line} {:<14} {operand:<6}", ins.op.name());
        if let Some(note) = annotate(program, i, ins) {
            let _ = write!(out, " ; {note}");
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
}

fn annotate(program: &Program, at: usize, ins: &Instruction) -> Option<String> {
    let name = |id: u32| program.symbols.name_of(id).unwrap_or("?").to_string();
    match ins.op {
        OpCode::PushInt => Some(ins.as_int().to_string()),
        OpCode::PushFloat => Some(format!("{:?}", ins.as_float())),
        OpCode::LoadConst => program.constants.get(ins.arg()).map(|c| c.to_string()),
        OpCode::LoadVar | OpCode::StoreVar | OpCode::GetField => Some(name(ins.arg())),
        OpCode::MakeFunction => Some(program.function_name(ins.arg()).to_string()),
        OpCode::Jump | OpCode::JumpIfFalse => Some(format!("-> {:04}", at + 1 + ins.arg() as usize)),
        OpCode::Loop => Some(format!("-> {:04}", at.saturating_sub(ins.arg() as usize))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_names_operands() {
        let program = compile_source("x = 1\nwhile (x > 0) { x -= 1 }").unwrap();
        let listing = disassemble(&program);
        assert!(listing.starts_with("<script>\n0000    1 LOAD_CONST"));
        assert!(listing.contains("STORE_VAR      "));
        assert!(listing.contains("; x"));
        assert!(listing.contains("JUMP_IF_FALSE  5      ; -> 0011"));
        assert!(listing.contains("LOOP           8      ; -> 0002"));
    }

    #[test]
    fn functions_are_listed_after_the_script() {
        let program = compile_source("function add(a, b) { return a + b }").unwrap();
        let listing = disassemble(&program);
        assert!(listing.contains("<function #0 add(a, b)> line 1"));
        assert!(listing.contains("MAKE_FUNCTION  0      ; add"));
    }
}
