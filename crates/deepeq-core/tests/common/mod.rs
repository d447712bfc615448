use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use deepeq_core::{ListRef, MapRef, MemberDescriptor, ObjectRef, Shape, TypeDescriptor, Value};

/// `Person { Name: string, DateCreated: datetime }`
#[allow(dead_code)]
pub fn person_type() -> Arc<TypeDescriptor> {
    TypeDescriptor::builder("Person")
        .field("Name", Shape::Text)
        .field("DateCreated", Shape::DateTime)
        .build()
}

#[allow(dead_code)]
pub fn date(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
}

#[allow(dead_code)]
pub fn person(name: &str, day: u32) -> ObjectRef {
    ObjectRef::new(person_type())
        .with("Name", name)
        .with("DateCreated", date(day))
}

/// `Node { Name: string, Next: Node }`, for linked structures and cycles
#[allow(dead_code)]
pub fn node_type() -> Arc<TypeDescriptor> {
    TypeDescriptor::builder("Node")
        .field("Name", Shape::Text)
        .field("Next", Shape::Object)
        .build()
}

#[allow(dead_code)]
pub fn node(name: &str) -> ObjectRef {
    ObjectRef::new(node_type()).with("Name", name)
}

/// Two-node ring `a -> b -> a`.
#[allow(dead_code)]
pub fn ring(a: &str, b: &str) -> ObjectRef {
    let first = node(a);
    let second = node(b);
    first.set("Next", second.clone());
    second.set("Next", first.clone());
    first
}

/// `Bag { Count: i64, Item: this[i64] }`
#[allow(dead_code)]
pub fn bag_type() -> Arc<TypeDescriptor> {
    TypeDescriptor::builder("Bag")
        .read_only("Count", Shape::Int)
        .member(MemberDescriptor::new("Item", Shape::Dynamic).indexed_by(vec![Shape::Int]))
        .build()
}

#[allow(dead_code)]
pub fn bag(items: Vec<Value>) -> ObjectRef {
    let bag = ObjectRef::new(bag_type()).with("Count", items.len() as i64);
    bag.set_indexed("Item", items);
    bag
}

/// Structural copy of a value graph. Shared nodes and cycles are not
/// preserved; use only on trees.
#[allow(dead_code)]
pub fn deep_clone(value: &Value) -> Value {
    match value {
        Value::Object(object) => {
            let copy = ObjectRef::new(object.descriptor());
            for member in object.descriptor().members() {
                if member.is_indexer() {
                    continue;
                }
                let v = object.read(member.name()).unwrap();
                copy.set(member.name(), deep_clone(&v));
            }
            Value::Object(copy)
        }
        Value::Map(map) => {
            let copy = MapRef::with_type(map.type_name());
            for (k, v) in map.entries() {
                copy.insert(deep_clone(&k), deep_clone(&v));
            }
            Value::Map(copy)
        }
        Value::List(list) => {
            let copy = ListRef::with_type(list.type_name());
            for item in list.items() {
                copy.push(deep_clone(&item));
            }
            Value::List(copy)
        }
        other => other.clone(),
    }
}
