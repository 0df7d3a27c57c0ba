pub mod constants;
pub mod heap;
pub mod scope;
pub mod symbols;
pub mod value;


pub use constants::{Constant, ConstantPool};
pub use heap::{new_list, new_table, BackRef, Container, Key, ListRef, SlotError, Table, TableRef, Tuple};
pub use scope::Scope;
pub use symbols::{SymbolTable, BUILTINS};
pub use value::{Callable, Object, ScriptFunction, TypeTag};
