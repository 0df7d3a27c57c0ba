use memory::{new_list, new_table, BackRef, Key, Object};

use crate::error::RuntimeError;

use super::stack::{Slot, StackOps};

/// Container access: every element read keeps a back-reference to the
/// slot it came from, so a later `STORE_REF` can write through it.
pub trait DataOps {
    /// `GET_FIELD id`: pop a table, push `table.<id>` (null when absent).
    fn get_field(&mut self, id: u32) -> Result<(), RuntimeError>;

    /// `GET_INDEX`: pop index, pop container, push the element.
    fn get_index(&mut self) -> Result<(), RuntimeError>;

    /// `STORE_REF`: pop value, pop target, write through the target's origin.
    fn store_ref(&mut self) -> Result<(), RuntimeError>;

    fn build_list(&mut self, count: usize) -> Result<(), RuntimeError>;

    /// `BUILD_TABLE n`: pop `n` key/value pairs.
    fn build_table(&mut self, count: usize) -> Result<(), RuntimeError>;

    /// Table key for a runtime value. Strings naming a known symbol map to
    /// the same slot as the field of that name.
    fn table_key(&self, key: &Object) -> Result<Key, RuntimeError>;
}

impl DataOps for super::vm::VM {
    fn get_field(&mut self, id: u32) -> Result<(), RuntimeError> {
        let table = match self.pop_value()? {
            Object::Table(table) => table,
            other => {
                let name = self.program.symbols.name_of(id).unwrap_or("?");
                return Err(RuntimeError::type_error(
                    format!("cannot read field '{name}' of {}", other.type_name()),
                    self.line,
                ));
            }
        };

        let value = table
            .borrow()
            .get(&Key::Field(id))
            .cloned()
            .unwrap_or(Object::Null);
        self.push(Slot::with_origin(value, BackRef::field(table, id)))
    }

    fn get_index(&mut self) -> Result<(), RuntimeError> {
        let index = self.pop_value()?;
        let target = self.pop_value()?;
        let line = self.line;

        match target {
            Object::List(list) => {
                let Object::Int(i) = index else {
                    return Err(RuntimeError::type_error(
                        format!("list index must be int, not {}", index.type_name()),
                        line,
                    ));
                };
                let len = list.borrow().len();
                if i < 0 || i as usize >= len {
                    return Err(RuntimeError::index(
                        format!("index {i} out of range for list of size {len}"),
                        line,
                    ));
                }
                let value = list.borrow()[i as usize].clone();
                self.push(Slot::with_origin(value, BackRef::element(list, i as usize)))
            }
            Object::Table(table) => {
                let key = self.table_key(&index)?;
                let value = table.borrow().get(&key).cloned().unwrap_or(Object::Null);
                self.push(Slot::with_origin(value, BackRef::entry(table, key)))
            }
            Object::Str(s) => {
                let Object::Int(i) = index else {
                    return Err(RuntimeError::type_error(
                        format!("string index must be int, not {}", index.type_name()),
                        line,
                    ));
                };
                let ch = usize::try_from(i).ok().and_then(|i| s.chars().nth(i));
                match ch {
                    Some(ch) => self.push_value(Object::str(ch.encode_utf8(&mut [0; 4]))),
                    None => Err(RuntimeError::index(
                        format!(
                            "index {i} out of range for string of length {}",
                            s.chars().count()
                        ),
                        line,
                    )),
                }
            }
            Object::Tuple(items) => {
                let Object::Int(i) = index else {
                    return Err(RuntimeError::type_error(
                        format!("tuple index must be int, not {}", index.type_name()),
                        line,
                    ));
                };
                match usize::try_from(i).ok().and_then(|i| items.get(i)) {
                    Some(value) => self.push_value(value.clone()),
                    None => Err(RuntimeError::index(
                        format!("index {i} out of range for tuple of size {}", items.len()),
                        line,
                    )),
                }
            }
            other => Err(RuntimeError::type_error(
                format!("{} is not indexable", other.type_name()),
                line,
            )),
        }
    }

    fn store_ref(&mut self) -> Result<(), RuntimeError> {
        let value = self.pop_value()?;
        let target = self.pop()?;
        let Some(origin) = target.origin else {
            return Err(RuntimeError::type_error(
                format!(
                    "cannot assign to an element of {}",
                    target.value.type_name()
                ),
                self.line,
            ));
        };
        origin
            .write(value)
            .map_err(|e| RuntimeError::from_slot(e, self.line))
    }

    fn build_list(&mut self, count: usize) -> Result<(), RuntimeError> {
        let items = self.pop_n(count)?;
        self.push_value(Object::List(new_list(items)))
    }

    fn build_table(&mut self, count: usize) -> Result<(), RuntimeError> {
        let items = self.pop_n(count * 2)?;
        let table = new_table();
        {
            let mut entries = table.borrow_mut();
            for pair in items.chunks_exact(2) {
                let key = self.table_key(&pair[0])?;
                entries.set(key, pair[1].clone());
            }
        }
        self.push_value(Object::Table(table))
    }

    fn table_key(&self, key: &Object) -> Result<Key, RuntimeError> {
        match key {
            Object::Int(i) => Ok(Key::Int(*i)),
            Object::Str(s) => Ok(match self.program.symbols.id_of(s) {
                Some(id) => Key::Field(id),
                None => Key::Str(s.clone()),
            }),
            other => Err(RuntimeError::type_error(
                format!("{} cannot be used as a table key", other.type_name()),
                self.line,
            )),
        }
    }
}
