use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use serde::Serialize;

use crate::value::Object;

/// A literal value as it appears in source.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Constant {
    Null,
    Bool(bool),
    Int(i64),
    Float(f32),
    Str(Rc<str>),
}

// Structural equality; floats compare by bit pattern so that every literal
// spelling of the same f32 shares one pool slot and NaN is still hashable.
impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Constant::Null, Constant::Null) => true,
            (Constant::Bool(a), Constant::Bool(b)) => a == b,
            (Constant::Int(a), Constant::Int(b)) => a == b,
            (Constant::Float(a), Constant::Float(b)) => a.to_bits() == b.to_bits(),
            (Constant::Str(a), Constant::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Constant {}

impl Hash for Constant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Constant::Null => {}
            Constant::Bool(b) => b.hash(state),
            Constant::Int(i) => i.hash(state),
            Constant::Float(f) => f.to_bits().hash(state),
            Constant::Str(s) => s.hash(state),
        }
    }
}

impl Constant {
    pub fn to_object(&self) -> Object {
        match self {
            Constant::Null => Object::Null,
            Constant::Bool(b) => Object::Bool(*b),
            Constant::Int(i) => Object::Int(*i),
            Constant::Float(f) => Object::Float(*f),
            Constant::Str(s) => Object::Str(s.clone()),
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Null => write!(f, "null"),
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::Int(i) => write!(f, "{}", i),
            Constant::Float(x) => write!(f, "{:?}", x),
            Constant::Str(s) => write!(f, "{:?}", s),
        }
    }
}

/// Deduplicated literal table referenced by ID from bytecode.
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    values: Vec<Constant>,
    index: HashMap<Constant, u32>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` unless an equal constant exists; return its ID.
    pub fn add(&mut self, value: Constant) -> u32 {
        if let Some(&id) = self.index.get(&value) {
            return id;
        }
        let id = self.values.len() as u32;
        self.values.push(value.clone());
        self.index.insert(value, id);
        id
    }

    pub fn get(&self, id: u32) -> Option<&Constant> {
        self.values.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Constant)> {
        self.values.iter().enumerate().map(|(id, c)| (id as u32, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_literals_share_an_id() {
        let mut pool = ConstantPool::new();
        let a = pool.add(Constant::Int(1));
        let b = pool.add(Constant::Int(1));
        assert_eq!(a, b);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn int_and_float_stay_distinct() {
        let mut pool = ConstantPool::new();
        let i = pool.add(Constant::Int(1));
        let f = pool.add(Constant::Float(1.0));
        assert_ne!(i, f);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn strings_dedupe_by_content() {
        let mut pool = ConstantPool::new();
        let a = pool.add(Constant::Str(Rc::from("hi")));
        let b = pool.add(Constant::Str(Rc::from(String::from("hi").as_str())));
        assert_eq!(a, b);
    }

    #[test]
    fn nan_is_poolable() {
        let mut pool = ConstantPool::new();
        let a = pool.add(Constant::Float(f32::NAN));
        let b = pool.add(Constant::Float(f32::NAN));
        assert_eq!(a, b);
    }
}
