use compiler::compile_source;
use vm::{OutputBuffer, RuntimeError, VmConfig, VM};

fn fail_with(source: &str, config: VmConfig) -> (RuntimeError, String) {
    let program = compile_source(source).expect("compile");
    let out = OutputBuffer::new();
    let mut vm = VM::new(program, config).with_output(out.clone());
    let err = vm.run().expect_err("expected a runtime error");
    (err, out.contents())
}

fn fail(source: &str) -> RuntimeError {
    fail_with(source, VmConfig::default()).0
}

#[test]
fn division_by_zero_reports_its_line() {
    let err = fail("x = 1\ny = x / 0\nz = 3");
    assert_eq!(err.kind(), "OperationError");
    assert_eq!(err.line(), 2);
    assert_eq!(err.to_string(), "division by zero");
}

#[test]
fn modulo_by_zero() {
    assert_eq!(fail("x = 5 % 0").kind(), "OperationError");
}

#[test]
fn float_division_by_zero_is_not_an_error() {
    let program = compile_source("x = 1.0 / 0").expect("compile");
    let mut vm = VM::new(program, VmConfig::default());
    vm.run().expect("float division");
    assert!(vm.global("x").and_then(|x| x.as_float()).is_some_and(f32::is_infinite));
}

#[test]
fn undefined_name() {
    let err = fail("a = 1\nb = a + c");
    assert_eq!(err.kind(), "NameError");
    assert_eq!(err.to_string(), "name 'c' is not defined");
    assert_eq!(err.line(), 2);
}

#[test]
fn index_out_of_range() {
    let err = fail("xs = [1, 2]\nv = xs[5]");
    assert_eq!(err.kind(), "IndexOutOfRangeError");
    assert_eq!(err.line(), 2);
    assert_eq!(fail("xs = [1]\nv = xs[-1]").kind(), "IndexOutOfRangeError");
    assert_eq!(fail("s = \"ab\"\nc = s[2]").kind(), "IndexOutOfRangeError");
}

#[test]
fn store_out_of_range() {
    let err = fail("xs = [1, 2]\nxs[2] = 3");
    assert_eq!(err.kind(), "IndexOutOfRangeError");
}

#[test]
fn type_errors() {
    assert_eq!(fail("x = 1\ny = x.field").kind(), "TypeError");
    assert_eq!(fail("xs = [1]\ny = xs[\"a\"]").kind(), "TypeError");
    assert_eq!(fail("x = 3\nx()").kind(), "TypeError");
    assert_eq!(fail("t = {}\nt[1.5] = 0").kind(), "TypeError");
    assert_eq!(fail("n = 4\nn[0] = 1").kind(), "TypeError");
}

#[test]
fn unsupported_operands() {
    let err = fail("x = \"a\" - 1");
    assert_eq!(err.kind(), "OperationError");
    assert!(err.to_string().contains("string and int"), "{err}");
    assert_eq!(fail("x = [1] < [2]").kind(), "OperationError");
    assert_eq!(fail("x = -\"s\"").kind(), "OperationError");
}

#[test]
fn arity_is_checked() {
    let err = fail("function f(a, b) { return a }\nf(1)");
    assert_eq!(err.kind(), "ArgumentError");
    assert_eq!(err.to_string(), "f() takes 2 arguments but 1 were given");
    assert_eq!(err.line(), 2);

    let err = fail("n = len(1, 2)");
    assert_eq!(err.kind(), "ArgumentError");
    assert_eq!(err.to_string(), "len() takes 1 argument but 2 were given");
}

#[test]
fn native_argument_types() {
    assert_eq!(fail("x = pow(\"2\", 2)").kind(), "TypeError");
    assert_eq!(fail("x = randint(5, 1)").kind(), "ArgumentError");
    assert_eq!(fail("x = push(1, 2)").kind(), "TypeError");
}

#[test]
fn unbounded_recursion_overflows() {
    let config = VmConfig {
        max_call_depth: 50,
        ..VmConfig::default()
    };
    let (err, _) = fail_with("function f(n) { return f(n + 1) }\nf(0)", config);
    assert_eq!(err.kind(), "StackOverflow");
    assert_eq!(err, RuntimeError::StackOverflow { limit: 50, line: 1 });
}

#[test]
fn recursion_within_the_limit_succeeds() {
    let config = VmConfig {
        max_call_depth: 50,
        ..VmConfig::default()
    };
    let program = compile_source(
        "function down(n) { if (n == 0) { return 0 } return down(n - 1) }\nr = down(49)",
    )
    .expect("compile");
    let mut vm = VM::new(program, config);
    vm.run().expect("recursion within the depth limit");
}

#[test]
fn error_inside_a_function_reports_the_function_line() {
    let err = fail("function g(t) {\n  return t.x.y\n}\ng({})");
    assert_eq!(err.kind(), "TypeError");
    assert_eq!(err.line(), 2);
}

#[test]
fn output_before_the_error_is_kept() {
    let (err, out) = fail_with("print(\"one\")\nprint(1 / 0)", VmConfig::default());
    assert_eq!(err.line(), 2);
    assert_eq!(out, "one\n");
}
