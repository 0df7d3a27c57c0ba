use std::io::Write;
use std::path::PathBuf;

use cli::commands::{ast, disassemble, run, tokens};
use cli::{report, ScriptError};
use tempfile::NamedTempFile;
use vm::{OutputBuffer, VmConfig};

fn write_temp_source(content: &str) -> NamedTempFile {
    let mut f = NamedTempFile::with_suffix(".shark").unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

fn demo(name: &str) -> String {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "..", "demos", name]
        .iter()
        .collect();
    std::fs::read_to_string(path).unwrap()
}

fn run_captured(source: &str, seed: u64) -> Result<String, ScriptError> {
    let out = OutputBuffer::new();
    run::run_source(source, VmConfig::default().with_seed(seed), out.clone())?;
    Ok(out.contents())
}

// ======================================================================
// run
// ======================================================================

#[test]
fn run_valid_file() {
    let src = write_temp_source("x = 2 + 3\nprint(x)");
    let result = run::run_file(src.path(), VmConfig::default());
    assert!(result.is_ok(), "run_file failed: {:?}", result.err());
}

#[test]
fn run_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = run::run_file(&dir.path().join("nope.shark"), VmConfig::default()).unwrap_err();
    assert!(report(&err).starts_with("error: file not found"));
}

#[test]
fn runtime_error_report_names_kind_and_line() {
    let src = write_temp_source("x = 1\ny = x / 0");
    let err = run::run_file(src.path(), VmConfig::default()).unwrap_err();
    assert_eq!(report(&err), "OperationError: division by zero (line 2)");
}

#[test]
fn syntax_error_report() {
    let src = write_temp_source("x = 1\nimport os");
    let err = run::run_file(src.path(), VmConfig::default()).unwrap_err();
    assert_eq!(report(&err), "SyntaxError: `import` is not supported (line 2)");
}

#[test]
fn captured_output() {
    let out = run_captured("for (i = 0; i < 3; i += 1) { print(\"i =\", i) }", 1).unwrap();
    assert_eq!(out, "i = 0\ni = 1\ni = 2\n");
}

#[test]
fn perceptron_demo_learns_the_target() {
    let out = run_captured(&demo("perceptron.shark"), 42).unwrap();
    // weights [w0, w1] bias b
    let numbers: Vec<f32> = out
        .split(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == 'e'))
        .filter_map(|s| s.parse().ok())
        .collect();
    assert_eq!(numbers.len(), 3, "{out}");
    assert!((numbers[0] - 3.0).abs() < 0.5, "{out}");
    assert!((numbers[1] - 4.0).abs() < 0.5, "{out}");
    assert!((numbers[2] - 5.0).abs() < 0.5, "{out}");
}

#[test]
fn rabbit_demo_is_reproducible() {
    let first = run_captured(&demo("rabbit.shark"), 7).unwrap();
    let second = run_captured(&demo("rabbit.shark"), 7).unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with("-- day 1 energy 2\nthe rabbit ate 10 food\n"));
}

// ======================================================================
// tokens / ast / disassemble
// ======================================================================

#[test]
fn tokens_are_json_lines() {
    let listing = tokens::dump_tokens("x = 1").unwrap();
    let lines: Vec<serde_json::Value> = listing
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0]["lexeme"], "x");
    assert_eq!(lines[0]["line"], 1);
    assert_eq!(lines[2]["value"]["value"], 1);
}

#[test]
fn tokens_report_lexical_errors() {
    let err = tokens::dump_tokens("s = \"open").unwrap_err();
    assert!(report(&err).starts_with("SyntaxError: unterminated string literal"));
}

#[test]
fn ast_is_json() {
    let text = ast::dump_ast("if (x) { y = 1 }").unwrap();
    let tree: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(tree.is_object() || tree.is_array());
    assert!(ast::dump_ast("a.b").is_err());
}

#[test]
fn disassemble_command() {
    let src = write_temp_source("function f(a) { return a }\nprint(f(1))");
    assert!(disassemble::disassemble_file(src.path()).is_ok());

    let bad = write_temp_source("while (");
    let err = disassemble::disassemble_file(bad.path()).unwrap_err();
    assert!(report(&err).starts_with("SyntaxError:"));
}
