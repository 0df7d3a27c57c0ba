use std::collections::HashMap;
use std::rc::Rc;

/// Names bound by the standard library.
///
/// The position of a name in this list IS its symbol ID, in every compiled
/// unit. The VM binds its native table against the same order.
pub const BUILTINS: &[&str] = &[
    "print",   // 0
    "sleep",   // 1
    "dice",    // 2
    "randint", // 3
    "random",  // 4
    "pow",     // 5
    "len",     // 6
    "push",    // 7
    "pop",     // 8
    "typeof",  // 9
];

/// Bidirectional name <-> ID mapping for one compilation unit.
///
/// IDs are handed out in first-occurrence order, starting right after the
/// reserved built-in range. An ID is never reassigned.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    names: Vec<Rc<str>>,
    ids: HashMap<Rc<str>, u32>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// A table with the built-in names already reserved.
    pub fn new() -> Self {
        let mut table = Self {
            names: Vec::with_capacity(BUILTINS.len() + 32),
            ids: HashMap::new(),
        };
        for name in BUILTINS {
            table.intern(name);
        }
        table
    }

    /// Number of IDs reserved for built-ins.
    #[inline]
    pub fn reserved() -> u32 {
        BUILTINS.len() as u32
    }

    #[inline]
    pub fn is_builtin(id: u32) -> bool {
        id < Self::reserved()
    }

    /// Return the ID for `name`, assigning the next free one on first sight.
    pub fn intern(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as u32;
        let shared: Rc<str> = Rc::from(name);
        self.names.push(shared.clone());
        self.ids.insert(shared, id);
        id
    }

    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    pub fn name_of(&self, id: u32) -> Option<&str> {
        self.names.get(id as usize).map(|n| n.as_ref())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All symbols in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(id, name)| (id as u32, name.as_ref()))
    }
}
