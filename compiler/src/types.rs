/// An enclosing loop of the function being compiled.
#[derive(Debug, Clone, Copy)]
pub struct LoopContext {
    /// Index of the first instruction of the condition.
    pub head: usize,
    pub line: u32,
}

/// How a statement-level postfix chain ended. Decides whether it can be
/// assigned to and how the store is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainEnd {
    /// A bare identifier. Nothing was emitted for it yet.
    Var { id: u32, line: u32 },
    /// `.name`; the slot is on the stack with its back-reference.
    Field,
    /// `[expr]`; the slot is on the stack with its back-reference.
    Index,
    Call,
    /// Anything else (literal, `this`, parenthesized expression...).
    Value,
}

impl ChainEnd {
    pub fn is_slot(self) -> bool {
        matches!(self, ChainEnd::Field | ChainEnd::Index)
    }
}
