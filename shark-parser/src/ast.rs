/// Owned AST types for Shark.
///
/// The bytecode emitter is single-pass and never builds this tree; it exists
/// for diagnostics (`shark ast`) and for tests that want to look at the
/// parsed shape of a script. All types serialize to JSON.
use memory::Constant;
use serde::Serialize;

use crate::token::Op;

/// A complete program: a sequence of statements.
#[derive(Clone, Debug, Serialize)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

impl Program {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub type Block = Vec<Stmt>;

/// Statement variants.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "stmt", rename_all = "snake_case")]
pub enum Stmt {
    /// `target = value` and the compound forms (`op` is the operator token).
    Assign {
        target: Expr,
        op: Op,
        value: Expr,
        line: u32,
    },
    /// A bare call, evaluated for its effect.
    Call { call: Expr, line: u32 },
    If {
        cond: Expr,
        then_branch: Block,
        #[serde(skip_serializing_if = "Option::is_none")]
        else_branch: Option<Block>,
        line: u32,
    },
    While { cond: Expr, body: Block, line: u32 },
    For {
        #[serde(skip_serializing_if = "Option::is_none")]
        init: Option<Box<Stmt>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        cond: Option<Expr>,
        #[serde(skip_serializing_if = "Option::is_none")]
        step: Option<Box<Stmt>>,
        body: Block,
        line: u32,
    },
    Function {
        name: String,
        params: Vec<String>,
        body: Block,
        line: u32,
    },
    Return {
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<Expr>,
        line: u32,
    },
    Break { line: u32 },
    Continue { line: u32 },
}

/// Expression variants.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum Expr {
    Literal { value: Constant, line: u32 },
    Var { name: String, line: u32 },
    This { line: u32 },
    Unary {
        op: Op,
        operand: Box<Expr>,
        line: u32,
    },
    Binary {
        op: Op,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        line: u32,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        line: u32,
    },
    Field {
        object: Box<Expr>,
        name: String,
        line: u32,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        line: u32,
    },
    List { items: Vec<Expr>, line: u32 },
    Table { entries: Vec<TableEntry>, line: u32 },
    Function {
        params: Vec<String>,
        body: Block,
        line: u32,
    },
}

impl Expr {
    pub fn line(&self) -> u32 {
        match self {
            Expr::Literal { line, .. }
            | Expr::Var { line, .. }
            | Expr::This { line }
            | Expr::Unary { line, .. }
            | Expr::Binary { line, .. }
            | Expr::Call { line, .. }
            | Expr::Field { line, .. }
            | Expr::Index { line, .. }
            | Expr::List { line, .. }
            | Expr::Table { line, .. }
            | Expr::Function { line, .. } => *line,
        }
    }

    /// Whether the expression can appear left of `=`.
    pub fn is_assignable(&self) -> bool {
        matches!(self, Expr::Var { .. } | Expr::Field { .. } | Expr::Index { .. })
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TableEntry {
    pub key: TableKey,
    pub value: Expr,
}

/// Key of a table literal entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKey {
    Name(String),
    Str(String),
    Int(i64),
}
