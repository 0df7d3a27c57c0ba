use compiler::compile_source;
use memory::Object;
use proptest::prelude::*;
use vm::{VmConfig, VM};

fn eval(expr: &str) -> Object {
    let program = compile_source(&format!("r = {expr}")).expect("compile");
    let mut vm = VM::new(program, VmConfig::default());
    vm.run().expect("runtime error");
    vm.global("r").expect("r")
}

#[test]
fn int_arithmetic_stays_int() {
    assert!(matches!(eval("7 / 2"), Object::Int(3)));
    assert!(matches!(eval("-7 / 2"), Object::Int(-3)));
    assert!(matches!(eval("7 % 3"), Object::Int(1)));
    assert!(matches!(eval("2 ^ 3 ^ 2"), Object::Int(512)));
    assert!(matches!(eval("1 << 4 >> 2"), Object::Int(4)));
}

#[test]
fn float_promotes() {
    assert!(matches!(eval("3 + 1.5"), Object::Float(f) if f == 4.5));
    assert!(matches!(eval("7.0 / 2"), Object::Float(f) if f == 3.5));
    assert!(matches!(eval("2 ^ -1"), Object::Float(f) if f == 0.5));
    assert!(matches!(eval("1e2"), Object::Float(f) if f == 100.0));
}

#[test]
fn bools_behave_as_integers_with_numbers() {
    assert!(matches!(eval("true + 2"), Object::Int(3)));
    assert!(matches!(eval("false * 1.5"), Object::Float(f) if f == 0.0));
    assert!(matches!(eval("-true"), Object::Int(-1)));
}

#[test]
fn bool_with_bool_is_logical() {
    assert!(matches!(eval("true + false"), Object::Bool(true)));
    assert!(matches!(eval("true * false"), Object::Bool(false)));
    assert!(matches!(eval("true - true"), Object::Bool(false)));
}

#[test]
fn negative_literal_binds_tighter_than_minus_power() {
    assert!(matches!(eval("-2 ^ 2"), Object::Int(-4)));
    assert!(matches!(eval("3 - -2"), Object::Int(5)));
    assert!(matches!(eval("-3000000000"), Object::Int(-3_000_000_000)));
}

#[test]
fn comparisons_mix_int_and_float() {
    assert!(matches!(eval("1 == 1.0"), Object::Bool(true)));
    assert!(matches!(eval("2 > 1.5"), Object::Bool(true)));
    assert!(matches!(eval("\"a\" == 1"), Object::Bool(false)));
    assert!(matches!(eval("null == null"), Object::Bool(true)));
    assert!(matches!(eval("!0"), Object::Bool(true)));
}

#[test]
fn containers_compare_by_identity() {
    let program = compile_source("a = [1]; b = a; same = a == b; other = a == [1]").expect("compile");
    let mut vm = VM::new(program, VmConfig::default());
    vm.run().expect("run");
    assert!(matches!(vm.global("same"), Some(Object::Bool(true))));
    assert!(matches!(vm.global("other"), Some(Object::Bool(false))));
}

proptest! {
    #[test]
    fn int_ops_match_host_arithmetic(a in -10_000i64..10_000, b in 1i64..10_000) {
        let r = eval(&format!("{a} * {b} + {a} / {b} - {a} % {b}"));
        prop_assert_eq!(r.as_int(), Some(a * b + a / b - a % b));
    }

    #[test]
    fn comparisons_agree_with_host(a in any::<i32>(), b in any::<i32>()) {
        let r = eval(&format!("({a}) < ({b})"));
        prop_assert!(matches!(r, Object::Bool(x) if x == (a < b)));
    }
}
