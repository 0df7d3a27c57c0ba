use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::heap::{Key, TableRef};
use crate::value::Object;

/// Variable table of one runnable (the script or a function activation).
///
/// Name resolution walks the chain: own locals, then the `this` table's
/// fields, then the parent scope. Writes only ever land in the scope they
/// are issued against.
#[derive(Default)]
pub struct Scope {
    vars: RefCell<HashMap<u32, Object>>,
    this: Option<TableRef>,
    parent: Option<Rc<Scope>>,
}

impl Scope {
    /// Top-level scope of a script.
    pub fn root() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn child(parent: Rc<Scope>, this: Option<TableRef>) -> Rc<Self> {
        Rc::new(Self {
            vars: RefCell::new(HashMap::new()),
            this,
            parent: Some(parent),
        })
    }

    pub fn define(&self, id: u32, value: Object) {
        self.vars.borrow_mut().insert(id, value);
    }

    pub fn get_local(&self, id: u32) -> Option<Object> {
        self.vars.borrow().get(&id).cloned()
    }

    pub fn lookup(&self, id: u32) -> Option<Object> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(value) = current.get_local(id) {
                return Some(value);
            }
            if let Some(this) = &current.this {
                if let Some(value) = this.borrow().get(&Key::Field(id)) {
                    return Some(value.clone());
                }
            }
            scope = current.parent.as_deref();
        }
        None
    }

    pub fn this(&self) -> Option<&TableRef> {
        self.this.as_ref()
    }

    pub fn parent(&self) -> Option<&Rc<Scope>> {
        self.parent.as_ref()
    }

    pub fn local_count(&self) -> usize {
        self.vars.borrow().len()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("locals", &self.local_count())
            .field("has_this", &self.this.is_some())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
