//! Dynamically-typed value graph walked by the comparison engine.
//!
//! Leaves (`Bool`, `Int`, `Float`, `Text`, `DateTime`) are plain values with
//! no identity. Composite nodes (`Object`, `Map`, `List`, `Opaque`) are shared
//! through `Rc` handles; the pointer of the shared node is the node's identity,
//! which is what the visited-pair cache keys on.

pub mod collections;
pub mod descriptor;
pub mod object;

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::rc::{Rc, Weak};

pub use collections::{ListRef, MapRef};
pub use descriptor::{MemberDescriptor, Shape, TypeDescriptor, TypeDescriptorBuilder};
pub use object::ObjectRef;

/// Type names reported for leaf values.
pub const BOOL_TYPE: &str = "bool";
pub const INT_TYPE: &str = "i64";
pub const FLOAT_TYPE: &str = "f64";
pub const TEXT_TYPE: &str = "string";
pub const DATETIME_TYPE: &str = "datetime";

/// A node of a compared object graph
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(DateTime<Utc>),
    /// Composite value with members described by a [`TypeDescriptor`]
    Object(ObjectRef),
    /// Key/value container
    Map(MapRef),
    /// Sequential container
    List(ListRef),
    /// Host handle with no comparable structure
    Opaque(OpaqueRef),
}

/// Runtime type of a present value: its reported name and its shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuntimeType {
    name: String,
    shape: Shape,
}

impl RuntimeType {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Shape of the value, `None` when absent.
    pub fn shape(&self) -> Option<Shape> {
        let shape = match self {
            Value::Null => return None,
            Value::Bool(_) => Shape::Bool,
            Value::Int(_) => Shape::Int,
            Value::Float(_) => Shape::Float,
            Value::Text(_) => Shape::Text,
            Value::DateTime(_) => Shape::DateTime,
            Value::Object(_) => Shape::Object,
            Value::Map(_) => Shape::Map,
            Value::List(_) => Shape::List,
            Value::Opaque(_) => Shape::Opaque,
        };
        Some(shape)
    }

    /// Runtime type of the value, `None` when absent.
    pub fn runtime_type(&self) -> Option<RuntimeType> {
        let shape = self.shape()?;
        let name = match self {
            Value::Null => return None,
            Value::Bool(_) => BOOL_TYPE.to_string(),
            Value::Int(_) => INT_TYPE.to_string(),
            Value::Float(_) => FLOAT_TYPE.to_string(),
            Value::Text(_) => TEXT_TYPE.to_string(),
            Value::DateTime(_) => DATETIME_TYPE.to_string(),
            Value::Object(object) => object.type_name(),
            Value::Map(map) => map.type_name(),
            Value::List(list) => list.type_name(),
            Value::Opaque(opaque) => opaque.type_name().to_string(),
        };
        Some(RuntimeType::new(name, shape))
    }

    /// Reference identity of a shared node. Leaves have none.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Object(object) => Some(object.identity()),
            Value::Map(map) => Some(map.identity()),
            Value::List(list) => Some(list.identity()),
            Value::Opaque(opaque) => Some(opaque.identity()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListRef> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Text used in difference reports and bracketed path segments.
    pub fn display_text(&self) -> String {
        match self {
            Value::Null => "(null)".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Value::Object(object) => object.type_name(),
            Value::Map(map) => map.type_name(),
            Value::List(list) => list.type_name(),
            Value::Opaque(opaque) => opaque.label().to_string(),
        }
    }

    /// The host's own notion of equality: leaves by value, nodes by reference.
    ///
    /// This is what a native dictionary lookup would use. The engine never
    /// relies on it for judging equality.
    pub fn native_eq(&self, other: &Value) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => leaf_eq(self, other),
            _ => false,
        }
    }

    /// Non-owning handle to this value for reporting.
    pub fn downgrade(&self) -> WeakValue {
        match self {
            Value::Object(object) => WeakValue::Object(object.downgrade()),
            Value::Map(map) => WeakValue::Map(map.downgrade()),
            Value::List(list) => WeakValue::List(list.downgrade()),
            Value::Opaque(opaque) => WeakValue::Opaque(Rc::downgrade(&opaque.0)),
            _ => WeakValue::Detached,
        }
    }
}

/// Leaf equality. `NaN` equals `NaN` so that every value equals itself;
/// integers and floats compare numerically and exactly.
pub(crate) fn leaf_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => int_float_eq(*a, *b),
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::DateTime(a), Value::DateTime(b)) => a == b,
        _ => false,
    }
}

/// `true` only when `float` is integral, within `i64` range and equal to
/// `int`. Casting `int` to `f64` instead would round large integers.
fn int_float_eq(int: i64, float: f64) -> bool {
    // 2^63; `i64::MAX as f64` rounds up to this and is out of range.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    float.fract() == 0.0 && (-LIMIT..LIMIT).contains(&float) && float as i64 == int
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(i) => write!(f, "Int({i})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Text(s) => write!(f, "Text({s:?})"),
            Value::DateTime(dt) => write!(f, "DateTime({dt})"),
            Value::Object(object) => fmt::Debug::fmt(object, f),
            Value::Map(map) => fmt::Debug::fmt(map, f),
            Value::List(list) => fmt::Debug::fmt(list, f),
            Value::Opaque(opaque) => fmt::Debug::fmt(opaque, f),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Value::Object(object)
    }
}

impl From<MapRef> for Value {
    fn from(map: MapRef) -> Self {
        Value::Map(map)
    }
}

impl From<ListRef> for Value {
    fn from(list: ListRef) -> Self {
        Value::List(list)
    }
}

impl From<OpaqueRef> for Value {
    fn from(opaque: OpaqueRef) -> Self {
        Value::Opaque(opaque)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Host handle without comparable structure (a socket, a callback, ...).
///
/// No built-in comparer accepts opaque values; comparing two of them needs a
/// custom comparer.
#[derive(Clone)]
pub struct OpaqueRef(Rc<Opaque>);

pub struct Opaque {
    type_name: String,
    label: String,
}

impl OpaqueRef {
    pub fn new(type_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self(Rc::new(Opaque {
            type_name: type_name.into(),
            label: label.into(),
        }))
    }

    pub fn type_name(&self) -> &str {
        &self.0.type_name
    }

    pub fn label(&self) -> &str {
        &self.0.label
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for OpaqueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({}: {})", self.0.type_name, self.0.label)
    }
}

/// Non-owning observation handle kept by differences for reporting.
///
/// Holding one never extends the life of the observed node.
#[derive(Debug, Clone, Default)]
pub enum WeakValue {
    /// Leaf, absent value, or nothing recorded
    #[default]
    Detached,
    Object(Weak<std::cell::RefCell<object::Object>>),
    Map(Weak<std::cell::RefCell<collections::Map>>),
    List(Weak<std::cell::RefCell<collections::List>>),
    Opaque(Weak<Opaque>),
}

impl WeakValue {
    /// Whether the observed node is still alive.
    pub fn is_alive(&self) -> bool {
        self.upgrade().is_some()
    }

    /// Recover the node if the host still holds it.
    pub fn upgrade(&self) -> Option<Value> {
        match self {
            WeakValue::Detached => None,
            WeakValue::Object(weak) => weak.upgrade().map(|rc| Value::Object(ObjectRef::from_rc(rc))),
            WeakValue::Map(weak) => weak.upgrade().map(|rc| Value::Map(MapRef::from_rc(rc))),
            WeakValue::List(weak) => weak.upgrade().map(|rc| Value::List(ListRef::from_rc(rc))),
            WeakValue::Opaque(weak) => weak.upgrade().map(|rc| Value::Opaque(OpaqueRef(rc))),
        }
    }

    /// Type name of the observed node, if still alive.
    pub fn type_name(&self) -> Option<String> {
        self.upgrade()
            .and_then(|value| value.runtime_type())
            .map(|ty| ty.name)
    }
}
