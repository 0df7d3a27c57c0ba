use compiler::compile_source;
use memory::Object;
use vm::{OutputBuffer, VmConfig, VM};

fn run(source: &str) -> (VM, String) {
    let program = compile_source(source).expect("compile");
    let out = OutputBuffer::new();
    let mut vm = VM::new(program, VmConfig::default().with_seed(1)).with_output(out.clone());
    vm.run().expect("runtime error");
    (vm, out.contents())
}

fn global(vm: &VM, name: &str) -> Object {
    vm.global(name)
        .unwrap_or_else(|| panic!("`{name}` is not defined"))
}

fn int(vm: &VM, name: &str) -> i64 {
    global(vm, name)
        .as_int()
        .unwrap_or_else(|| panic!("`{name}` is not an int"))
}

fn text(vm: &VM, name: &str) -> String {
    vm.render(&global(vm, name))
}

#[test]
fn assignment_and_arithmetic() {
    let (vm, _) = run("x = 1 + 2 * 3; y = (1 + 2) * 3; z = 2 ^ 10 % 1000");
    assert_eq!(int(&vm, "x"), 7);
    assert_eq!(int(&vm, "y"), 9);
    assert_eq!(int(&vm, "z"), 24);
}

#[test]
fn if_else_takes_one_branch() {
    for (x, expected) in [(5, 1), (-5, 2)] {
        let (vm, _) = run(&format!(
            "x = {x}\nif (x > 0) {{ r = 1 }} else {{ r = 2 }}"
        ));
        assert_eq!(int(&vm, "r"), expected, "x = {x}");
    }
}

#[test]
fn else_if_chain() {
    let src = |n: i64| {
        format!(
            "n = {n}
             if (n < 0) {{ s = \"neg\" }} else if (n == 0) {{ s = \"zero\" }} else {{ s = \"pos\" }}"
        )
    };
    assert_eq!(text(&run(&src(-3)).0, "s"), "neg");
    assert_eq!(text(&run(&src(0)).0, "s"), "zero");
    assert_eq!(text(&run(&src(9)).0, "s"), "pos");
}

#[test]
fn while_counts_down() {
    let (vm, out) = run("x = 3\nwhile (x > 0) { print(x); x -= 1 }");
    assert_eq!(out, "3\n2\n1\n");
    assert_eq!(int(&vm, "x"), 0);
}

#[test]
fn for_loop_sums() {
    let (vm, _) = run("s = 0\nfor (i = 0; i < 5; i += 1) { s += i }");
    assert_eq!(int(&vm, "s"), 10);
    assert_eq!(int(&vm, "i"), 5);
}

#[test]
fn break_and_continue() {
    let (vm, _) = run(
        "s = 0
         for (i = 0; i < 100; i += 1) {
           if (i % 2 == 0) { continue }
           if (i > 9) { break }
           s += i
         }",
    );
    assert_eq!(int(&vm, "s"), 1 + 3 + 5 + 7 + 9);
    assert_eq!(int(&vm, "i"), 11);
}

#[test]
fn nested_loops_break_the_inner_one() {
    let (vm, _) = run(
        "pairs = 0
         for (a = 0; a < 3; a += 1) {
           b = 0
           while (true) {
             if (b == a) { break }
             pairs += 1
             b += 1
           }
         }",
    );
    assert_eq!(int(&vm, "pairs"), 0 + 1 + 2);
}

#[test]
fn continue_in_while_rechecks_the_condition() {
    let (vm, _) = run(
        "n = 0; odd = 0
         while (n < 10) {
           n += 1
           if (n % 2 == 0) { continue }
           odd += 1
         }",
    );
    assert_eq!(int(&vm, "odd"), 5);
}

#[test]
fn functions_and_recursion() {
    let (vm, _) = run(
        "function fact(n) {
           if (n <= 1) { return 1 }
           return n * fact(n - 1)
         }
         function fib(n) {
           if (n < 2) { return n }
           return fib(n - 1) + fib(n - 2)
         }
         a = fact(10)
         b = fib(15)",
    );
    assert_eq!(int(&vm, "a"), 3_628_800);
    assert_eq!(int(&vm, "b"), 610);
}

#[test]
fn function_without_return_yields_null() {
    let (vm, _) = run("function f() { x = 1 }\nr = f()");
    assert!(global(&vm, "r").is_null());
}

#[test]
fn parameters_and_locals_stay_local() {
    let (vm, _) = run(
        "x = 1
         function f(x) { y = x * 2; return y }
         r = f(21)",
    );
    assert_eq!(int(&vm, "r"), 42);
    assert_eq!(int(&vm, "x"), 1);
    assert!(vm.global("y").is_none());
}

#[test]
fn functions_see_their_defining_scope() {
    let (vm, _) = run(
        "function counter(start) {
           return function() { return start + 1 }
         }
         next = counter(41)
         r = next()",
    );
    assert_eq!(int(&vm, "r"), 42);
}

#[test]
fn functions_are_first_class() {
    let (vm, _) = run(
        "function twice(f, x) { return f(f(x)) }
         inc = function(n) { return n + 1 }
         r = twice(inc, 5)
         ops = [inc]
         s = ops[0](1)",
    );
    assert_eq!(int(&vm, "r"), 7);
    assert_eq!(int(&vm, "s"), 2);
}

#[test]
fn methods_bind_this_to_their_table() {
    let (vm, _) = run(
        "counter = {count: 0}
         counter.bump = function(by) { this.count += by; return this.count }
         counter.bump(2)
         last = counter.bump(3)
         total = counter.count",
    );
    assert_eq!(int(&vm, "last"), 5);
    assert_eq!(int(&vm, "total"), 5);
}

#[test]
fn constructor_style_functions() {
    let (vm, _) = run(
        "function Rabbit(name) {
           this.name = name
           this.hops = 0
           this.hop = function() { this.hops += 1 }
           return this
         }
         r = Rabbit(\"bugs\")
         r.hop(); r.hop()
         hops = r.hops
         name = r.name",
    );
    assert_eq!(int(&vm, "hops"), 2);
    assert_eq!(text(&vm, "name"), "bugs");
}

#[test]
fn script_has_its_own_this() {
    let (vm, _) = run("this.total = 4\nthis.total *= 2\nt = this.total");
    assert_eq!(int(&vm, "t"), 8);
}

#[test]
fn list_elements_alias_the_list() {
    let (vm, _) = run(
        "a = [1, 2, 3]
         b = a
         b[0] = 99
         a[2] += 10
         first = a[0]
         last = b[2]",
    );
    assert_eq!(int(&vm, "first"), 99);
    assert_eq!(int(&vm, "last"), 13);
}

#[test]
fn nested_containers_write_through() {
    let (vm, _) = run(
        "grid = [[0, 0], [0, 0]]
         grid[1][0] = 7
         t = {inner: {v: 1}}
         t.inner.v += 1
         g = grid[1][0]
         v = t.inner.v",
    );
    assert_eq!(int(&vm, "g"), 7);
    assert_eq!(int(&vm, "v"), 2);
}

#[test]
fn field_and_string_key_are_the_same_entry() {
    let (vm, _) = run(
        "t = {}
         t.x = 1
         a = t[\"x\"]
         t[\"x\"] = 2
         b = t.x
         t[\"not a name\"] = 3
         t[7] = 4
         c = t[\"not a name\"] + t[7]
         missing = t.nothing",
    );
    assert_eq!(int(&vm, "a"), 1);
    assert_eq!(int(&vm, "b"), 2);
    assert_eq!(int(&vm, "c"), 7);
    assert!(global(&vm, "missing").is_null());
}

#[test]
fn string_operations() {
    let (vm, _) = run(
        "s = \"sh\" + \"ark\"
         c = s[1]
         n = len(s)
         same = s == \"shark\"",
    );
    assert_eq!(text(&vm, "s"), "shark");
    assert_eq!(text(&vm, "c"), "h");
    assert_eq!(int(&vm, "n"), 5);
    assert!(matches!(global(&vm, "same"), Object::Bool(true)));
}

#[test]
fn top_level_return_halts() {
    let (vm, out) = run("x = 1\nprint(\"before\")\nreturn;\nx = 2\nprint(\"after\")");
    assert_eq!(int(&vm, "x"), 1);
    assert_eq!(out, "before\n");
}

#[test]
fn print_renders_values() {
    let (_, out) = run(
        "print(1, 2.5, true, null, \"s\")
         print([1, \"a\", [2]])
         print({a: 1})
         print()",
    );
    assert_eq!(out, "1 2.5 true null s\n[1, \"a\", [2]]\n{a: 1}\n\n");
}

#[test]
fn builtins_can_be_shadowed() {
    let (vm, _) = run("len = function(x) { return 0 }\nn = len([1, 2, 3])");
    assert_eq!(int(&vm, "n"), 0);
}

#[test]
fn list_natives() {
    let (vm, _) = run(
        "xs = []
         for (i = 0; i < 4; i += 1) { push(xs, i * i) }
         top = pop(xs)
         n = len(xs)
         kind = typeof(xs)",
    );
    assert_eq!(int(&vm, "top"), 9);
    assert_eq!(int(&vm, "n"), 3);
    assert_eq!(text(&vm, "kind"), "list");
}

#[test]
fn seeded_random_is_reproducible() {
    let src = "a = randint(0, 1000); b = random(); c = dice(0.5)";
    let (first, _) = run(src);
    let (second, _) = run(src);
    for name in ["a", "b", "c"] {
        assert_eq!(text(&first, name), text(&second, name), "{name}");
    }
    let a = int(&first, "a");
    assert!((0..1000).contains(&a));
}

#[test]
fn logical_operators_are_not_short_circuit() {
    let (vm, out) = run(
        "function side(v) { print(\"called\"); return v }
         r = false && side(true)
         q = 0 || 3",
    );
    assert_eq!(out, "called\n");
    assert!(matches!(global(&vm, "r"), Object::Bool(false)));
    assert!(matches!(global(&vm, "q"), Object::Bool(true)));
}
