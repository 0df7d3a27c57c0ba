//! OpCode definitions for the Shark VM
//!
//! The instruction set is stack based. Each opcode fixes the shape of its
//! operand:
//!
//! Shape none: the opcode alone.
//! Shape word: one 32-bit operand, read as `i32`, `f32` bits or an ID.
//! Shape wide: one 64-bit operand (`PUSH_WIDE` only).
//!
//! Relative jumps: `JUMP n` / `JUMP_IF_FALSE n` at index `i` continue at
//! `i + 1 + n`; `LOOP n` at index `i` continues at `i - n`.

use std::fmt;
use std::rc::Rc;

/// Virtual machine instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    // ===== Stack =====
    Pop = 0,
    Dup = 1,
    PushNull = 2,
    PushTrue = 3,
    PushFalse = 4,
    /// Push Int immediate: word as i32
    PushInt = 5,
    /// Push Float immediate: word as f32 bits
    PushFloat = 6,
    /// Push Int immediate that does not fit 32 bits
    PushWide = 7,
    /// Push constant: K[word]
    LoadConst = 8,

    // ===== Variables =====
    /// Push variable by symbol ID (locals, `this` fields, parent chain)
    LoadVar = 10,
    /// Pop into variable of the current scope
    StoreVar = 11,
    LoadThis = 12,

    // ===== Containers =====
    /// Pop table, push field `word` with back-reference
    GetField = 20,
    /// Pop index and container, push element with back-reference
    GetIndex = 21,
    /// Pop value and target slot, write value through the target's back-reference
    StoreRef = 22,
    /// Pop `word` values into a new list
    BuildList = 23,
    /// Pop `word` key/value pairs into a new table
    BuildTable = 24,

    // ===== Arithmetic =====
    Add = 30,
    Sub = 31,
    Mul = 32,
    Div = 33,
    Mod = 34,
    Pow = 35,
    Neg = 36,
    Shl = 37,
    Shr = 38,

    // ===== Comparison & Logic =====
    Eq = 40,
    Ne = 41,
    Lt = 42,
    Le = 43,
    Gt = 44,
    Ge = 45,
    And = 46,
    Or = 47,
    Not = 48,

    // ===== Functions =====
    /// Push a function value for prototype `word`, closing over the current scope
    MakeFunction = 50,
    /// Call with `word` arguments
    Call = 51,
    Return = 52,

    // ===== Control Flow =====
    Jump = 60,
    JumpIfFalse = 61,
    /// Backward jump to the loop head
    Loop = 62,
    /// Emitter placeholders, rewritten before the chunk is frozen
    Break = 63,
    Continue = 64,
}

/// Operand shape fixed by the opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    None,
    Word,
    Wide,
}

/// Upper bound (exclusive) of opcode byte values; sizes the dispatch tables.
pub const OPCODE_SLOTS: usize = 65;

impl OpCode {
    pub const ALL: [OpCode; 43] = [
        OpCode::Pop,
        OpCode::Dup,
        OpCode::PushNull,
        OpCode::PushTrue,
        OpCode::PushFalse,
        OpCode::PushInt,
        OpCode::PushFloat,
        OpCode::PushWide,
        OpCode::LoadConst,
        OpCode::LoadVar,
        OpCode::StoreVar,
        OpCode::LoadThis,
        OpCode::GetField,
        OpCode::GetIndex,
        OpCode::StoreRef,
        OpCode::BuildList,
        OpCode::BuildTable,
        OpCode::Add,
        OpCode::Sub,
        OpCode::Mul,
        OpCode::Div,
        OpCode::Mod,
        OpCode::Pow,
        OpCode::Neg,
        OpCode::Shl,
        OpCode::Shr,
        OpCode::Eq,
        OpCode::Ne,
        OpCode::Lt,
        OpCode::Le,
        OpCode::Gt,
        OpCode::Ge,
        OpCode::And,
        OpCode::Or,
        OpCode::Not,
        OpCode::MakeFunction,
        OpCode::Call,
        OpCode::Return,
        OpCode::Jump,
        OpCode::JumpIfFalse,
        OpCode::Loop,
        OpCode::Break,
        OpCode::Continue,
    ];

    pub fn from_u8(byte: u8) -> Option<Self> {
        OpCode::ALL.iter().copied().find(|op| op.as_u8() == byte)
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn shape(self) -> OperandShape {
        match self {
            OpCode::PushInt
            | OpCode::PushFloat
            | OpCode::LoadConst
            | OpCode::LoadVar
            | OpCode::StoreVar
            | OpCode::GetField
            | OpCode::BuildList
            | OpCode::BuildTable
            | OpCode::MakeFunction
            | OpCode::Call
            | OpCode::Jump
            | OpCode::JumpIfFalse
            | OpCode::Loop => OperandShape::Word,
            OpCode::PushWide => OperandShape::Wide,
            _ => OperandShape::None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OpCode::Pop => "POP",
            OpCode::Dup => "DUP",
            OpCode::PushNull => "PUSH_NULL",
            OpCode::PushTrue => "PUSH_TRUE",
            OpCode::PushFalse => "PUSH_FALSE",
            OpCode::PushInt => "PUSH_INT",
            OpCode::PushFloat => "PUSH_FLOAT",
            OpCode::PushWide => "PUSH_WIDE",
            OpCode::LoadConst => "LOAD_CONST",
            OpCode::LoadVar => "LOAD_VAR",
            OpCode::StoreVar => "STORE_VAR",
            OpCode::LoadThis => "LOAD_THIS",
            OpCode::GetField => "GET_FIELD",
            OpCode::GetIndex => "GET_INDEX",
            OpCode::StoreRef => "STORE_REF",
            OpCode::BuildList => "BUILD_LIST",
            OpCode::BuildTable => "BUILD_TABLE",
            OpCode::Add => "ADD",
            OpCode::Sub => "SUB",
            OpCode::Mul => "MUL",
            OpCode::Div => "DIV",
            OpCode::Mod => "MOD",
            OpCode::Pow => "POW",
            OpCode::Neg => "NEG",
            OpCode::Shl => "SHL",
            OpCode::Shr => "SHR",
            OpCode::Eq => "EQ",
            OpCode::Ne => "NE",
            OpCode::Lt => "LT",
            OpCode::Le => "LE",
            OpCode::Gt => "GT",
            OpCode::Ge => "GE",
            OpCode::And => "AND",
            OpCode::Or => "OR",
            OpCode::Not => "NOT",
            OpCode::MakeFunction => "MAKE_FUNCTION",
            OpCode::Call => "CALL",
            OpCode::Return => "RETURN",
            OpCode::Jump => "JUMP",
            OpCode::JumpIfFalse => "JUMP_IF_FALSE",
            OpCode::Loop => "LOOP",
            OpCode::Break => "BREAK",
            OpCode::Continue => "CONTINUE",
        }
    }

    /// Operator symbol for binary/unary opcodes, used in error messages.
    pub fn symbol(self) -> &'static str {
        match self {
            OpCode::Add => "+",
            OpCode::Sub => "-",
            OpCode::Mul => "*",
            OpCode::Div => "/",
            OpCode::Mod => "%",
            OpCode::Pow => "^",
            OpCode::Neg => "-",
            OpCode::Shl => "<<",
            OpCode::Shr => ">>",
            OpCode::Eq => "==",
            OpCode::Ne => "!=",
            OpCode::Lt => "<",
            OpCode::Le => "<=",
            OpCode::Gt => ">",
            OpCode::Ge => ">=",
            OpCode::And => "&&",
            OpCode::Or => "||",
            OpCode::Not => "!",
            other => other.name(),
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Word(u32),
    Wide(u64),
}

/// One decoded instruction with the source line it was emitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op: OpCode,
    pub operand: Operand,
    pub line: u32,
}

impl Instruction {
    pub fn simple(op: OpCode, line: u32) -> Self {
        Self {
            op,
            operand: Operand::None,
            line,
        }
    }

    pub fn word(op: OpCode, word: u32, line: u32) -> Self {
        Self {
            op,
            operand: Operand::Word(word),
            line,
        }
    }

    pub fn int(value: i32, line: u32) -> Self {
        Self::word(OpCode::PushInt, value as u32, line)
    }

    pub fn float(value: f32, line: u32) -> Self {
        Self::word(OpCode::PushFloat, value.to_bits(), line)
    }

    pub fn wide(value: i64, line: u32) -> Self {
        Self {
            op: OpCode::PushWide,
            operand: Operand::Wide(value as u64),
            line,
        }
    }

    /// The word operand, or 0 for other shapes.
    pub fn arg(&self) -> u32 {
        match self.operand {
            Operand::Word(w) => w,
            _ => 0,
        }
    }

    pub fn as_int(&self) -> i32 {
        self.arg() as i32
    }

    pub fn as_float(&self) -> f32 {
        f32::from_bits(self.arg())
    }

    pub fn as_wide(&self) -> i64 {
        match self.operand {
            Operand::Wide(w) => w as i64,
            _ => 0,
        }
    }

    /// Whether the operand matches the shape the opcode requires.
    pub fn is_well_formed(&self) -> bool {
        matches!(
            (self.op.shape(), self.operand),
            (OperandShape::None, Operand::None)
                | (OperandShape::Word, Operand::Word(_))
                | (OperandShape::Wide, Operand::Wide(_))
        )
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.op, self.operand) {
            (_, Operand::None) => write!(f, "{}", self.op),
            (OpCode::PushInt, _) => write!(f, "{:<14} {}", self.op.name(), self.as_int()),
            (OpCode::PushFloat, _) => write!(f, "{:<14} {:?}", self.op.name(), self.as_float()),
            (_, Operand::Word(w)) => write!(f, "{:<14} {}", self.op.name(), w),
            (_, Operand::Wide(_)) => write!(f, "{:<14} {}", self.op.name(), self.as_wide()),
        }
    }
}

/// Frozen instruction stream.
pub type Chunk = Rc<[Instruction]>;
