//! Shared containers.
//!
//! Lists and tables are reference counted and interiorly mutable: assigning
//! a container to a second name aliases it, it never copies.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use thiserror::Error;

use crate::value::Object;

pub type ListRef = Rc<RefCell<Vec<Object>>>;
pub type TableRef = Rc<RefCell<Table>>;
/// Fixed-size argument pack.
pub type Tuple = Rc<[Object]>;

pub fn new_list(items: Vec<Object>) -> ListRef {
    Rc::new(RefCell::new(items))
}

pub fn new_table() -> TableRef {
    Rc::new(RefCell::new(Table::default()))
}

/// Table slot key.
///
/// `Field` keys come from `a.name` (the symbol ID of `name`). String keys
/// that name a known symbol are normalized to `Field` by the VM, so
/// `t.x` and `t["x"]` address the same slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Field(u32),
    Int(i64),
    Str(Rc<str>),
}

#[derive(Debug, Default)]
pub struct Table {
    slots: BTreeMap<Key, Object>,
}

impl Table {
    pub fn get(&self, key: &Key) -> Option<&Object> {
        self.slots.get(key)
    }

    pub fn set(&mut self, key: Key, value: Object) {
        self.slots.insert(key, value);
    }

    pub fn remove(&mut self, key: &Key) -> Option<Object> {
        self.slots.remove(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Object)> {
        self.slots.iter()
    }
}

#[derive(Debug, Clone)]
pub enum Container {
    List(ListRef),
    Table(TableRef),
}

impl Container {
    pub fn ptr_eq(&self, other: &Container) -> bool {
        match (self, other) {
            (Container::List(a), Container::List(b)) => Rc::ptr_eq(a, b),
            (Container::Table(a), Container::Table(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("index {index} out of range for list of size {len}")]
    OutOfRange { index: i64, len: usize },
    #[error("lists are indexed by integers")]
    BadListKey,
}

/// The slot a value was read from: owning container plus key.
///
/// Writing through a back-reference mutates the container in place, so
/// every alias of the container observes the update.
#[derive(Debug, Clone)]
pub struct BackRef {
    pub container: Container,
    pub key: Key,
}

impl BackRef {
    pub fn field(table: TableRef, id: u32) -> Self {
        Self {
            container: Container::Table(table),
            key: Key::Field(id),
        }
    }

    pub fn entry(table: TableRef, key: Key) -> Self {
        Self {
            container: Container::Table(table),
            key,
        }
    }

    pub fn element(list: ListRef, index: usize) -> Self {
        Self {
            container: Container::List(list),
            key: Key::Int(index as i64),
        }
    }

    /// Current content of the slot. Missing table entries read as null.
    pub fn read(&self) -> Result<Object, SlotError> {
        match &self.container {
            Container::Table(t) => Ok(t.borrow().get(&self.key).cloned().unwrap_or(Object::Null)),
            Container::List(l) => {
                let list = l.borrow();
                let index = self.list_index(list.len())?;
                Ok(list[index].clone())
            }
        }
    }

    pub fn write(&self, value: Object) -> Result<(), SlotError> {
        match &self.container {
            Container::Table(t) => {
                t.borrow_mut().set(self.key.clone(), value);
                Ok(())
            }
            Container::List(l) => {
                let mut list = l.borrow_mut();
                let index = self.list_index(list.len())?;
                list[index] = value;
                Ok(())
            }
        }
    }

    fn list_index(&self, len: usize) -> Result<usize, SlotError> {
        match self.key {
            Key::Int(i) if i >= 0 && (i as usize) < len => Ok(i as usize),
            Key::Int(i) => Err(SlotError::OutOfRange { index: i, len }),
            _ => Err(SlotError::BadListKey),
        }
    }
}
