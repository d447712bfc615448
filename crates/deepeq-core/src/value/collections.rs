//! Map and list nodes.
//!
//! Both keep insertion order. Reads hand out snapshots so that a comparison
//! never holds a `RefCell` borrow across a recursive call.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::Value;

pub const MAP_TYPE: &str = "map";
pub const LIST_TYPE: &str = "list";

/// Entry storage behind a [`MapRef`]
pub struct Map {
    type_name: String,
    entries: Vec<(Value, Value)>,
}

/// Shared handle to a key/value container
#[derive(Clone)]
pub struct MapRef(Rc<RefCell<Map>>);

impl MapRef {
    pub fn new() -> Self {
        Self::with_type(MAP_TYPE)
    }

    /// Empty map reporting the given runtime type name.
    pub fn with_type(type_name: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(Map {
            type_name: type_name.into(),
            entries: Vec::new(),
        })))
    }

    /// Insert or replace. Keys are matched with [`Value::native_eq`].
    pub fn insert(&self, key: impl Into<Value>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let mut map = self.0.borrow_mut();
        match map.entries.iter_mut().find(|(k, _)| k.native_eq(&key)) {
            Some(entry) => entry.1 = value,
            None => map.entries.push((key, value)),
        }
    }

    /// Builder-style [`insert`](MapRef::insert).
    pub fn with(self, key: impl Into<Value>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.0
            .borrow()
            .entries
            .iter()
            .find(|(k, _)| k.native_eq(key))
            .map(|(_, v)| v.clone())
    }

    pub fn remove(&self, key: &Value) -> Option<Value> {
        let mut map = self.0.borrow_mut();
        let pos = map.entries.iter().position(|(k, _)| k.native_eq(key))?;
        Some(map.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.0.borrow().entries.clone()
    }

    pub fn type_name(&self) -> String {
        self.0.borrow().type_name.clone()
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn downgrade(&self) -> Weak<RefCell<Map>> {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn from_rc(rc: Rc<RefCell<Map>>) -> Self {
        Self(rc)
    }
}

impl Default for MapRef {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MapRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Map({}, len={}@{:#x})",
            self.type_name(),
            self.len(),
            self.identity()
        )
    }
}

/// Item storage behind a [`ListRef`]
pub struct List {
    type_name: String,
    items: Vec<Value>,
}

/// Shared handle to a sequential container
#[derive(Clone)]
pub struct ListRef(Rc<RefCell<List>>);

impl ListRef {
    pub fn new() -> Self {
        Self::with_type(LIST_TYPE)
    }

    pub fn with_type(type_name: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(List {
            type_name: type_name.into(),
            items: Vec::new(),
        })))
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.0.borrow_mut().items.push(value.into());
    }

    /// Builder-style [`push`](ListRef::push).
    pub fn with(self, value: impl Into<Value>) -> Self {
        self.push(value);
        self
    }

    /// Overwrite an existing slot. Returns `false` when out of range.
    pub fn set(&self, index: usize, value: impl Into<Value>) -> bool {
        match self.0.borrow_mut().items.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().items.get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn items(&self) -> Vec<Value> {
        self.0.borrow().items.clone()
    }

    pub fn type_name(&self) -> String {
        self.0.borrow().type_name.clone()
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn downgrade(&self) -> Weak<RefCell<List>> {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn from_rc(rc: Rc<RefCell<List>>) -> Self {
        Self(rc)
    }
}

impl Default for ListRef {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ListRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "List({}, len={}@{:#x})",
            self.type_name(),
            self.len(),
            self.identity()
        )
    }
}
