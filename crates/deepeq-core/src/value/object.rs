//! Composite object nodes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use super::descriptor::TypeDescriptor;
use super::Value;
use crate::errors::{DeepEqError, Result};

/// Member storage behind an [`ObjectRef`]
pub struct Object {
    descriptor: Arc<TypeDescriptor>,
    values: HashMap<String, Value>,
    indexed: HashMap<String, Vec<Value>>,
    disposed: bool,
}

/// Shared handle to an object node.
///
/// Cloning the handle shares the node; two handles are the same node when
/// their [`identity`](ObjectRef::identity) matches.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<Object>>);

impl ObjectRef {
    /// New object of the given type with every member unset (`Null`).
    pub fn new(descriptor: Arc<TypeDescriptor>) -> Self {
        Self(Rc::new(RefCell::new(Object {
            descriptor,
            values: HashMap::new(),
            indexed: HashMap::new(),
            disposed: false,
        })))
    }

    /// Set a member and return the handle, for building graphs inline.
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.borrow_mut().values.insert(name.into(), value.into());
    }

    /// Replace the backing values of an indexed member.
    pub fn set_indexed(&self, name: impl Into<String>, items: Vec<Value>) {
        self.0.borrow_mut().indexed.insert(name.into(), items);
    }

    /// Read a member value. Unset members read as `Null`.
    ///
    /// # Errors
    ///
    /// Returns `ObjectDisposed` once the object has been disposed.
    pub fn read(&self, name: &str) -> Result<Value> {
        let object = self.0.borrow();
        if object.disposed {
            return Err(DeepEqError::ObjectDisposed {
                type_name: object.descriptor.name().to_string(),
                member: name.to_string(),
                path: String::new(),
            });
        }
        Ok(object.values.get(name).cloned().unwrap_or_default())
    }

    /// Read one element of an indexed member. Out-of-range reads are `Null`.
    ///
    /// # Errors
    ///
    /// Returns `ObjectDisposed` once the object has been disposed.
    pub fn read_indexed(&self, name: &str, index: usize) -> Result<Value> {
        let object = self.0.borrow();
        if object.disposed {
            return Err(DeepEqError::ObjectDisposed {
                type_name: object.descriptor.name().to_string(),
                member: format!("{name}[{index}]"),
                path: String::new(),
            });
        }
        Ok(object
            .indexed
            .get(name)
            .and_then(|items| items.get(index))
            .cloned()
            .unwrap_or_default())
    }

    /// Mark the object as released by its host.
    pub fn dispose(&self) {
        self.0.borrow_mut().disposed = true;
    }

    pub fn descriptor(&self) -> Arc<TypeDescriptor> {
        Arc::clone(&self.0.borrow().descriptor)
    }

    pub fn type_name(&self) -> String {
        self.0.borrow().descriptor.name().to_string()
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn downgrade(&self) -> Weak<RefCell<Object>> {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn from_rc(rc: Rc<RefCell<Object>>) -> Self {
        Self(rc)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({}@{:#x})", self.type_name(), self.identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Shape;

    fn person_type() -> Arc<TypeDescriptor> {
        TypeDescriptor::builder("Person")
            .field("Name", Shape::Text)
            .member(
                crate::value::MemberDescriptor::new("Item", Shape::Text)
                    .indexed_by(vec![Shape::Int]),
            )
            .build()
    }

    #[test]
    fn test_unset_member_reads_null() {
        let p = ObjectRef::new(person_type());
        assert!(p.read("Name").unwrap().is_null());
    }

    #[test]
    fn test_set_and_read() {
        let p = ObjectRef::new(person_type()).with("Name", "Ada");
        assert_eq!(p.read("Name").unwrap().display_text(), "Ada");
        assert_eq!(p.type_name(), "Person");
    }

    #[test]
    fn test_indexed_read() {
        let p = ObjectRef::new(person_type());
        p.set_indexed("Item", vec![Value::from("a"), Value::from("b")]);
        assert_eq!(p.read_indexed("Item", 1).unwrap().display_text(), "b");
        assert!(p.read_indexed("Item", 5).unwrap().is_null());
    }

    #[test]
    fn test_disposed_object_refuses_reads() {
        let p = ObjectRef::new(person_type()).with("Name", "Ada");
        p.dispose();
        let err = p.read("Name").unwrap_err();
        assert!(matches!(err, DeepEqError::ObjectDisposed { ref member, .. } if member == "Name"));
        assert!(p.read_indexed("Item", 0).is_err());
    }

    #[test]
    fn test_clones_share_identity() {
        let p = ObjectRef::new(person_type());
        let q = p.clone();
        q.set("Name", "Grace");
        assert_eq!(p.identity(), q.identity());
        assert_eq!(p.read("Name").unwrap().display_text(), "Grace");
        assert_ne!(p.identity(), ObjectRef::new(person_type()).identity());
    }
}
