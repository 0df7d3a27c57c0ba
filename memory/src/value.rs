use std::fmt;
use std::fmt::Write as _;
use std::rc::Rc;

use crate::heap::{Key, ListRef, TableRef, Tuple};
use crate::scope::Scope;
use crate::symbols::SymbolTable;

/// Runtime type tag, used for dispatch and for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Null,
    Bool,
    Int,
    Float,
    Str,
    List,
    Tuple,
    Table,
    Callable,
}

impl TypeTag {
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Str => "string",
            TypeTag::List => "list",
            TypeTag::Tuple => "tuple",
            TypeTag::Table => "table",
            TypeTag::Callable => "function",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A script-defined function value.
///
/// `scope` is the scope the function expression was evaluated in; calls
/// resolve free names against its live state.
pub struct ScriptFunction {
    pub proto: u32,
    pub name: Option<u32>,
    pub scope: Rc<Scope>,
}

impl fmt::Debug for ScriptFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptFunction")
            .field("proto", &self.proto)
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum Callable {
    /// Index into the VM's native table (equal to the built-in's symbol ID).
    Native { id: u32 },
    Script(Rc<ScriptFunction>),
}

impl Callable {
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Native { id: a }, Callable::Native { id: b }) => a == b,
            (Callable::Script(a), Callable::Script(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A runtime value.
#[derive(Debug, Clone, Default)]
pub enum Object {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f32),
    Str(Rc<str>),
    List(ListRef),
    Tuple(Tuple),
    Table(TableRef),
    Callable(Callable),
}

impl Object {
    pub fn str(s: &str) -> Self {
        Object::Str(Rc::from(s))
    }

    pub fn tag(&self) -> TypeTag {
        match self {
            Object::Null => TypeTag::Null,
            Object::Bool(_) => TypeTag::Bool,
            Object::Int(_) => TypeTag::Int,
            Object::Float(_) => TypeTag::Float,
            Object::Str(_) => TypeTag::Str,
            Object::List(_) => TypeTag::List,
            Object::Tuple(_) => TypeTag::Tuple,
            Object::Table(_) => TypeTag::Table,
            Object::Callable(_) => TypeTag::Callable,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.tag().name()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Object::Null => false,
            Object::Bool(b) => *b,
            Object::Int(i) => *i != 0,
            Object::Float(f) => *f != 0.0,
            Object::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Integer view; Bool counts as 0/1.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Object::Int(i) => Some(*i),
            Object::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    /// Numeric view in single precision; Bool counts as 0/1.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Object::Int(i) => Some(*i as f32),
            Object::Float(f) => Some(*f),
            Object::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Identity for containers and callables, value for everything else.
    pub fn same(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Null, Object::Null) => true,
            (Object::Bool(a), Object::Bool(b)) => a == b,
            (Object::Int(a), Object::Int(b)) => a == b,
            (Object::Float(a), Object::Float(b)) => a == b,
            (Object::Str(a), Object::Str(b)) => a == b,
            (Object::List(a), Object::List(b)) => Rc::ptr_eq(a, b),
            (Object::Tuple(a), Object::Tuple(b)) => Rc::ptr_eq(a, b),
            (Object::Table(a), Object::Table(b)) => Rc::ptr_eq(a, b),
            (Object::Callable(a), Object::Callable(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Textual form used by `print`. Field names are resolved through
    /// `symbols`; strings nested in containers are quoted.
    pub fn render(&self, symbols: &SymbolTable) -> String {
        let mut out = String::new();
        let mut renderer = Renderer {
            symbols,
            open: Vec::new(),
        };
        renderer.top(self, &mut out);
        out
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Object::Bool(b)
    }
}

impl From<i64> for Object {
    fn from(i: i64) -> Self {
        Object::Int(i)
    }
}

impl From<f32> for Object {
    fn from(f: f32) -> Self {
        Object::Float(f)
    }
}

impl From<&str> for Object {
    fn from(s: &str) -> Self {
        Object::str(s)
    }
}

struct Renderer<'a> {
    symbols: &'a SymbolTable,
    // containers currently being printed, for cycle detection
    open: Vec<*const ()>,
}

impl Renderer<'_> {
    fn top(&mut self, obj: &Object, out: &mut String) {
        match obj {
            Object::Str(s) => out.push_str(s),
            other => self.nested(other, out),
        }
    }

    fn nested(&mut self, obj: &Object, out: &mut String) {
        match obj {
            Object::Null => out.push_str("null"),
            Object::Bool(b) => {
                let _ = write!(out, "{}", b);
            }
            Object::Int(i) => {
                let _ = write!(out, "{}", i);
            }
            Object::Float(f) => {
                let _ = write!(out, "{}", f);
            }
            Object::Str(s) => {
                let _ = write!(out, "{:?}", s);
            }
            Object::List(list) => {
                let ptr = Rc::as_ptr(list) as *const ();
                if self.open.contains(&ptr) {
                    out.push_str("[...]");
                    return;
                }
                self.open.push(ptr);
                out.push('[');
                for (i, item) in list.borrow().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.nested(item, out);
                }
                out.push(']');
                self.open.pop();
            }
            Object::Tuple(items) => {
                out.push('(');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.nested(item, out);
                }
                out.push(')');
            }
            Object::Table(table) => {
                let ptr = Rc::as_ptr(table) as *const ();
                if self.open.contains(&ptr) {
                    out.push_str("{...}");
                    return;
                }
                self.open.push(ptr);
                out.push('{');
                for (i, (key, value)) in table.borrow().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    match key {
                        Key::Field(id) => match self.symbols.name_of(*id) {
                            Some(name) => out.push_str(name),
                            None => {
                                let _ = write!(out, "#{}", id);
                            }
                        },
                        Key::Int(n) => {
                            let _ = write!(out, "{}", n);
                        }
                        Key::Str(s) => {
                            let _ = write!(out, "{:?}", s);
                        }
                    }
                    out.push_str(": ");
                    self.nested(value, out);
                }
                out.push('}');
                self.open.pop();
            }
            Object::Callable(Callable::Native { id }) => {
                let name = self.symbols.name_of(*id).unwrap_or("?");
                let _ = write!(out, "<native {}>", name);
            }
            Object::Callable(Callable::Script(func)) => match func.name.and_then(|id| self.symbols.name_of(id)) {
                Some(name) => {
                    let _ = write!(out, "<function {}>", name);
                }
                None => out.push_str("<function>"),
            },
        }
    }
}
