use crate::native::NativeFn;
use crate::stdlib::core;

pub struct NativeMeta {
    pub name: &'static str,
    pub arity: isize,
    pub func: NativeFn,
}

// THE SINGLE SOURCE OF TRUTH
// The index in this array IS the symbol ID of the built-in.
// Lexer reserves memory::BUILTINS in the same order.
pub const NATIVE_TABLE: &[NativeMeta] = &[
    NativeMeta {
        name: "print",
        arity: -1,
        func: core::native_print,
    }, // Index 0
    NativeMeta {
        name: "sleep",
        arity: 1,
        func: core::native_sleep,
    }, // Index 1
    NativeMeta {
        name: "dice",
        arity: 1,
        func: core::native_dice,
    }, // Index 2
    NativeMeta {
        name: "randint",
        arity: 2,
        func: core::native_randint,
    }, // Index 3
    NativeMeta {
        name: "random",
        arity: 0,
        func: core::native_random,
    }, // Index 4
    NativeMeta {
        name: "pow",
        arity: 2,
        func: core::native_pow,
    }, // Index 5
    // Collections
    NativeMeta {
        name: "len",
        arity: 1,
        func: core::native_len,
    }, // Index 6
    NativeMeta {
        name: "push",
        arity: 2,
        func: core::native_push,
    }, // Index 7
    NativeMeta {
        name: "pop",
        arity: 1,
        func: core::native_pop,
    }, // Index 8
    NativeMeta {
        name: "typeof",
        arity: 1,
        func: core::native_typeof,
    }, // Index 9
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_reserved_symbols() {
        let names: Vec<&str> = NATIVE_TABLE.iter().map(|m| m.name).collect();
        assert_eq!(names, memory::BUILTINS);
    }
}
