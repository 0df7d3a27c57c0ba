use compiler::compile_source;
use memory::{Constant, SymbolTable};
use proptest::prelude::*;
use vm::opcode::{Instruction, OpCode, Operand};
use vm::Program;

fn compile(src: &str) -> Program {
    compile_source(src).unwrap_or_else(|e| panic!("compile failed for {src:?}: {e}"))
}

fn ops(code: &[Instruction]) -> Vec<OpCode> {
    code.iter().map(|i| i.op).collect()
}

fn id(program: &Program, name: &str) -> u32 {
    program.symbols.id_of(name).expect("symbol")
}

#[test]
fn repeated_literal_shares_one_constant() {
    let program = compile("x = 1 + 1");
    assert_eq!(program.constants.len(), 1);
    assert_eq!(program.constants.get(0), Some(&Constant::Int(1)));
    assert_eq!(
        program.code.to_vec(),
        vec![
            Instruction::word(OpCode::LoadConst, 0, 1),
            Instruction::word(OpCode::LoadConst, 0, 1),
            Instruction::simple(OpCode::Add, 1),
            Instruction::word(OpCode::StoreVar, id(&program, "x"), 1),
        ]
    );
}

#[test]
fn user_symbols_start_after_builtins() {
    let program = compile("foo = 1; foo = foo; bar = foo");
    assert_eq!(id(&program, "foo"), SymbolTable::reserved());
    assert_eq!(id(&program, "bar"), SymbolTable::reserved() + 1);
}

#[test]
fn precedence_orders_the_stack_code() {
    let program = compile("x = 1 + 2 * 3");
    assert_eq!(
        ops(&program.code),
        vec![
            OpCode::LoadConst,
            OpCode::LoadConst,
            OpCode::LoadConst,
            OpCode::Mul,
            OpCode::Add,
            OpCode::StoreVar,
        ]
    );
}

#[test]
fn negative_literals_fold_into_immediates() {
    let program = compile("a = -5; b = -2.5; c = -3000000000");
    let code = &program.code;
    assert_eq!(code[0].op, OpCode::PushInt);
    assert_eq!(code[0].as_int(), -5);
    assert_eq!(code[2].op, OpCode::PushFloat);
    assert_eq!(code[2].as_float(), -2.5);
    assert_eq!(code[4].op, OpCode::PushWide);
    assert_eq!(code[4].as_wide(), -3_000_000_000);
}

#[test]
fn minus_before_power_negates_the_result() {
    let program = compile("x = -2 ^ 2");
    assert_eq!(
        ops(&program.code),
        vec![
            OpCode::LoadConst,
            OpCode::LoadConst,
            OpCode::Pow,
            OpCode::Neg,
            OpCode::StoreVar,
        ]
    );
}

#[test]
fn call_statement_discards_its_result() {
    let program = compile("print(1, 2)");
    assert_eq!(
        ops(&program.code),
        vec![
            OpCode::LoadVar,
            OpCode::LoadConst,
            OpCode::LoadConst,
            OpCode::Call,
            OpCode::Pop,
        ]
    );
    assert_eq!(program.code[0].arg(), 0, "print is builtin #0");
    assert_eq!(program.code[3].arg(), 2);
}

#[test]
fn compound_field_assignment_duplicates_the_slot() {
    let program = compile("t.x += 1");
    assert_eq!(
        ops(&program.code),
        vec![
            OpCode::LoadVar,
            OpCode::GetField,
            OpCode::Dup,
            OpCode::LoadConst,
            OpCode::Add,
            OpCode::StoreRef,
        ]
    );
    assert_eq!(program.code[1].arg(), id(&program, "x"));
}

#[test]
fn compound_variable_assignment_loads_first() {
    let program = compile("n -= 2");
    assert_eq!(
        ops(&program.code),
        vec![OpCode::LoadVar, OpCode::LoadConst, OpCode::Sub, OpCode::StoreVar]
    );
}

#[test]
fn index_assignment_stores_through_the_slot() {
    let program = compile("xs[0] = 7");
    assert_eq!(
        ops(&program.code),
        vec![
            OpCode::LoadVar,
            OpCode::LoadConst,
            OpCode::GetIndex,
            OpCode::LoadConst,
            OpCode::StoreRef,
        ]
    );
}

#[test]
fn table_literal_keys_are_string_constants() {
    let program = compile("t = {a: 1, \"b c\": 2, 3: 4}");
    let code = &program.code;
    assert_eq!(code.last().map(|i| i.op), Some(OpCode::StoreVar));
    assert_eq!(code[code.len() - 2], Instruction::word(OpCode::BuildTable, 3, 1));

    let key = |i: usize| program.constants.get(code[i].arg()).cloned();
    assert_eq!(key(0), Some(Constant::Str("a".into())));
    assert_eq!(key(2), Some(Constant::Str("b c".into())));
    assert_eq!(key(4), Some(Constant::Int(3)));
}

#[test]
fn list_literal_counts_items() {
    let program = compile("xs = [1, 2, [3]]");
    let builds: Vec<u32> = program
        .code
        .iter()
        .filter(|i| i.op == OpCode::BuildList)
        .map(|i| i.arg())
        .collect();
    assert_eq!(builds, vec![1, 3]);
}

#[test]
fn function_declaration_gets_its_own_stream() {
    let program = compile("function add(a, b) {\n  return a + b\n}");
    assert_eq!(
        program.code.to_vec(),
        vec![
            Instruction::word(OpCode::MakeFunction, 0, 1),
            Instruction::word(OpCode::StoreVar, id(&program, "add"), 1),
        ]
    );

    let proto = &program.functions[0];
    assert_eq!(proto.name, Some(id(&program, "add")));
    assert_eq!(proto.params, vec![id(&program, "a"), id(&program, "b")]);
    assert_eq!(
        ops(&proto.code),
        vec![
            OpCode::LoadVar,
            OpCode::LoadVar,
            OpCode::Add,
            OpCode::Return,
            OpCode::PushNull,
            OpCode::Return,
        ]
    );
    assert_eq!(proto.code[2].line, 2);
    assert_eq!(program.function_name(0), "add");
}

#[test]
fn nested_functions_finish_first() {
    let program = compile("outer = function() { inner = function() { return 1 } }");
    assert_eq!(program.functions.len(), 2);
    assert_eq!(program.functions[0].code[0].op, OpCode::LoadConst);
    assert_eq!(program.functions[1].code[0], Instruction::word(OpCode::MakeFunction, 0, 1));
    assert_eq!(program.function_name(1), "<anonymous>");
}

#[test]
fn bare_return_pushes_null() {
    let program = compile("f = function() { return }");
    assert_eq!(
        ops(&program.functions[0].code)[..2],
        [OpCode::PushNull, OpCode::Return]
    );
}

#[test]
fn this_field_method_call() {
    let program = compile("this.count = 0; this.bump()");
    assert_eq!(
        ops(&program.code),
        vec![
            OpCode::LoadThis,
            OpCode::GetField,
            OpCode::LoadConst,
            OpCode::StoreRef,
            OpCode::LoadThis,
            OpCode::GetField,
            OpCode::Call,
            OpCode::Pop,
        ]
    );
}

#[test]
fn instructions_carry_their_operator_line() {
    let program = compile("x = 1\ny = x /\n 0");
    let div = program.code.iter().find(|i| i.op == OpCode::Div).expect("div");
    assert_eq!(div.line, 2);
    assert!(matches!(div.operand, Operand::None));
}

#[test]
fn semicolons_are_optional() {
    let a = compile("x = 1; y = 2;");
    let b = compile("x = 1 y = 2");
    assert_eq!(a.code.to_vec(), b.code.to_vec());
}

proptest! {
    #[test]
    fn integer_literals_round_trip_through_the_pool(v in 0i64..=i64::MAX) {
        let program = compile(&format!("x = {v}"));
        prop_assert_eq!(program.code[0].op, OpCode::LoadConst);
        prop_assert_eq!(program.constants.get(program.code[0].arg()), Some(&Constant::Int(v)));
    }

    #[test]
    fn negative_literals_become_immediates(v in -i64::MAX..0i64) {
        let program = compile(&format!("x = {v}"));
        let ins = program.code[0];
        match i32::try_from(v) {
            Ok(small) => {
                prop_assert_eq!(ins.op, OpCode::PushInt);
                prop_assert_eq!(ins.as_int(), small);
            }
            Err(_) => {
                prop_assert_eq!(ins.op, OpCode::PushWide);
                prop_assert_eq!(ins.as_wide(), v);
            }
        }
    }
}
