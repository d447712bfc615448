//! Type and member descriptors.
//!
//! A [`TypeDescriptor`] is the static shape of an object type: its ordered
//! members and the interfaces it implements. Descriptors are immutable and
//! shared through `Arc`, so one descriptor serves every object of the type.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shape of a value or of a member's declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Bool,
    Int,
    Float,
    Text,
    DateTime,
    Object,
    Map,
    List,
    Opaque,
    /// Declared type unknown until runtime
    Dynamic,
}

impl Shape {
    /// Leaf shapes are compared by value.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Shape::Bool | Shape::Int | Shape::Float | Shape::Text | Shape::DateTime
        )
    }

    /// Whether a value of this declared shape may own nested values.
    pub fn can_have_children(&self) -> bool {
        matches!(
            self,
            Shape::Object | Shape::Map | Shape::List | Shape::Dynamic
        )
    }
}

/// One comparable member of a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
    name: String,
    shape: Shape,
    can_read: bool,
    can_write: bool,
    index_params: Vec<Shape>,
    attributes: Vec<String>,
}

impl MemberDescriptor {
    /// A readable, writable member.
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            can_read: true,
            can_write: true,
            index_params: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.can_write = false;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.can_read = false;
        self
    }

    /// Turn the member into an indexed accessor taking the given parameters.
    pub fn indexed_by(mut self, params: Vec<Shape>) -> Self {
        self.index_params = params;
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn can_read(&self) -> bool {
        self.can_read
    }

    pub fn can_write(&self) -> bool {
        self.can_write
    }

    pub fn index_params(&self) -> &[Shape] {
        &self.index_params
    }

    pub fn is_indexer(&self) -> bool {
        !self.index_params.is_empty()
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }
}

/// Static description of an object type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    name: String,
    members: Vec<MemberDescriptor>,
    interfaces: Vec<Arc<TypeDescriptor>>,
}

impl TypeDescriptor {
    pub fn builder(name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder {
            descriptor: TypeDescriptor {
                name: name.into(),
                members: Vec::new(),
                interfaces: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn interfaces(&self) -> &[Arc<TypeDescriptor>] {
        &self.interfaces
    }

    /// The implemented interface with the given name, searched transitively.
    pub fn implemented_interface(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.interfaces.iter().find_map(|iface| {
            if iface.name == name {
                Some(iface)
            } else {
                iface.implemented_interface(name)
            }
        })
    }
}

/// Builder for [`TypeDescriptor`]
#[derive(Debug, Clone)]
pub struct TypeDescriptorBuilder {
    descriptor: TypeDescriptor,
}

impl TypeDescriptorBuilder {
    /// Add a readable, writable member.
    pub fn field(self, name: impl Into<String>, shape: Shape) -> Self {
        self.member(MemberDescriptor::new(name, shape))
    }

    /// Add a readable member without a setter.
    pub fn read_only(self, name: impl Into<String>, shape: Shape) -> Self {
        self.member(MemberDescriptor::new(name, shape).read_only())
    }

    pub fn member(mut self, member: MemberDescriptor) -> Self {
        self.descriptor.members.push(member);
        self
    }

    pub fn implements(mut self, interface: Arc<TypeDescriptor>) -> Self {
        self.descriptor.interfaces.push(interface);
        self
    }

    pub fn build(self) -> Arc<TypeDescriptor> {
        Arc::new(self.descriptor)
    }
}
