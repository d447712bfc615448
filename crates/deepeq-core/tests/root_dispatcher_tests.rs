#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{deep_clone, node, person, ring};
use deepeq_core::errors::{DeepEqError, ExError, ExErrorKind, Result};
use deepeq_core::{
    compare, CompareLogic, CompareParms, ComparisonConfig, ComparisonSession, Difference,
    ListRef, MapRef, ObjectRef, OpaqueRef, RootComparer, RuntimeType, Shape, TypeComparer,
    TypeDescriptor, Value,
};

/// Floats within an absolute tolerance are equal
struct ToleranceComparer {
    epsilon: f64,
}

impl TypeComparer for ToleranceComparer {
    fn name(&self) -> &str {
        "tolerance"
    }

    fn is_type_match(&self, left: Option<&RuntimeType>, right: Option<&RuntimeType>) -> bool {
        matches!((left, right), (Some(l), Some(r)) if l.shape() == Shape::Float && r.shape() == Shape::Float)
    }

    fn compare_type(
        &self,
        _root: &RootComparer,
        parms: &CompareParms<'_>,
        session: &mut ComparisonSession,
    ) -> Result<bool> {
        let (Value::Float(l), Value::Float(r)) = (parms.left(), parms.right()) else {
            return Ok(false);
        };
        if (l - r).abs() <= self.epsilon {
            return Ok(true);
        }
        session.add_difference(Difference::from_parms(parms).with_prefix("Outside tolerance"));
        Ok(false)
    }
}

/// Sockets are equal when their labels are
struct SocketComparer;

impl TypeComparer for SocketComparer {
    fn name(&self) -> &str {
        "socket"
    }

    fn is_type_match(&self, left: Option<&RuntimeType>, right: Option<&RuntimeType>) -> bool {
        matches!((left, right), (Some(l), Some(r)) if l.name() == "Socket" && r.name() == "Socket")
    }

    fn compare_type(
        &self,
        _root: &RootComparer,
        parms: &CompareParms<'_>,
        session: &mut ComparisonSession,
    ) -> Result<bool> {
        if parms.left().display_text() == parms.right().display_text() {
            return Ok(true);
        }
        session.add_difference(Difference::from_parms(parms));
        Ok(false)
    }
}

/// Discards differences it did not record
struct GreedyComparer;

impl TypeComparer for GreedyComparer {
    fn name(&self) -> &str {
        "greedy"
    }

    fn is_type_match(&self, left: Option<&RuntimeType>, _right: Option<&RuntimeType>) -> bool {
        left.map(|t| t.name() == "Greedy").unwrap_or(false)
    }

    fn compare_type(
        &self,
        _root: &RootComparer,
        _parms: &CompareParms<'_>,
        session: &mut ComparisonSession,
    ) -> Result<bool> {
        session.discard_since(0)?;
        Ok(true)
    }
}

#[test]
fn test_identical_leaves_equal() {
    let config = ComparisonConfig::default();
    for value in [
        Value::from(true),
        Value::from(42),
        Value::from(1.5),
        Value::from("text"),
        Value::from(common::date(3)),
        Value::Float(f64::NAN),
    ] {
        let result = compare(&value, &value.clone(), &config).unwrap();
        assert!(result.are_equal(), "{value:?}");
    }
}

#[test]
fn test_leaf_type_mismatch_is_different_types() {
    let result = compare(&Value::from(1), &Value::from("1"), &ComparisonConfig::default()).unwrap();

    assert!(!result.are_equal());
    let difference = &result.differences()[0];
    assert_eq!(difference.message_prefix(), "Different Types");
    assert_eq!(difference.child_name(), "GetType()");
    assert_eq!(difference.left_value(), "i64");
    assert_eq!(difference.right_value(), "string");
}

#[test]
fn test_numeric_cross_type_only_when_types_ignored() {
    let strict = compare(&Value::from(2), &Value::from(2.0), &ComparisonConfig::default()).unwrap();
    assert!(!strict.are_equal());

    let loose = compare(
        &Value::from(2),
        &Value::from(2.0),
        &ComparisonConfig::default().with_ignore_object_types(true),
    )
    .unwrap();
    assert!(loose.are_equal());
}

#[test]
fn test_large_int_not_equal_to_rounded_float() {
    let config = ComparisonConfig::default().with_ignore_object_types(true);

    let result = compare(&Value::from(i64::MAX), &Value::from(i64::MAX as f64), &config).unwrap();
    assert!(!result.are_equal());

    let result = compare(
        &Value::from(9_007_199_254_740_993_i64),
        &Value::from(9_007_199_254_740_992.0),
        &config,
    )
    .unwrap();
    assert!(!result.are_equal());
}

#[test]
fn test_null_member_against_value() {
    let left = person("Ada", 1);
    let right = person("Ada", 1);
    right.set("Name", Value::Null);

    let result = compare(&Value::from(left), &Value::from(right), &ComparisonConfig::default()).unwrap();

    assert_eq!(result.differences().len(), 1);
    assert_eq!(result.differences()[0].path(), "Name");
    assert_eq!(result.differences()[0].right_value(), "(null)");
}

#[test]
fn test_object_type_mismatch() {
    let other = TypeDescriptor::builder("Employee")
        .field("Name", Shape::Text)
        .build();
    let result = compare(
        &Value::from(person("Ada", 1)),
        &Value::from(ObjectRef::new(other).with("Name", "Ada")),
        &ComparisonConfig::default(),
    )
    .unwrap();

    assert_eq!(result.differences()[0].short_item(), "Different Types: GetType()");
    assert_eq!(result.differences()[0].left_value(), "Person");
    assert_eq!(result.differences()[0].right_value(), "Employee");
}

#[test]
fn test_ignore_object_types_compares_by_member_name() {
    let employee = TypeDescriptor::builder("Employee")
        .field("Name", Shape::Text)
        .field("Salary", Shape::Int)
        .build();
    let config = ComparisonConfig::default().with_ignore_object_types(true);

    let same = compare(
        &Value::from(node("Ada")),
        &Value::from(ObjectRef::new(employee.clone()).with("Name", "Ada").with("Salary", 5)),
        &config,
    )
    .unwrap();
    assert!(same.are_equal(), "{}", same.differences_string());

    let different = compare(
        &Value::from(node("Ada")),
        &Value::from(ObjectRef::new(employee).with("Name", "Grace")),
        &config,
    )
    .unwrap();
    assert_eq!(different.differences()[0].path(), "Name");
}

#[test]
fn test_unsupported_type_is_fatal() {
    let holder = TypeDescriptor::builder("Conn")
        .field("Socket", Shape::Opaque)
        .build();
    let left = ObjectRef::new(holder.clone()).with("Socket", OpaqueRef::new("Socket", "a"));
    let right = ObjectRef::new(holder).with("Socket", OpaqueRef::new("Socket", "a"));

    let err = compare(&Value::from(left), &Value::from(right), &ComparisonConfig::default()).unwrap_err();

    match err {
        DeepEqError::UnsupportedType { type_name, path } => {
            assert_eq!(type_name, "Socket");
            assert_eq!(path, "Socket");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_custom_comparer_handles_unsupported_type() {
    let config = ComparisonConfig::default().with_custom_comparer(Arc::new(SocketComparer));

    let equal = compare(
        &Value::from(OpaqueRef::new("Socket", "a")),
        &Value::from(OpaqueRef::new("Socket", "a")),
        &config,
    )
    .unwrap();
    assert!(equal.are_equal());

    let different = compare(
        &Value::from(OpaqueRef::new("Socket", "a")),
        &Value::from(OpaqueRef::new("Socket", "b")),
        &config,
    )
    .unwrap();
    assert!(!different.are_equal());
}

#[test]
fn test_custom_comparer_takes_precedence_over_built_in() {
    let left = ListRef::new().with(1.0).with(2.0);
    let right = ListRef::new().with(1.0000001).with(2.0);

    let strict = compare(&Value::from(left.clone()), &Value::from(right.clone()), &ComparisonConfig::default()).unwrap();
    assert!(!strict.are_equal());

    let config = ComparisonConfig::default().with_custom_comparer(Arc::new(ToleranceComparer { epsilon: 1e-3 }));
    let tolerant = compare(&Value::from(left), &Value::from(right), &config).unwrap();
    assert!(tolerant.are_equal());

    let far = compare(&Value::from(1.0), &Value::from(2.0), &config).unwrap();
    assert_eq!(far.differences()[0].message_prefix(), "Outside tolerance");
}

#[test]
fn test_self_referential_graph_is_reflexive() {
    let a = ring("a", "b");
    let result = compare(&Value::from(a.clone()), &Value::from(a), &ComparisonConfig::default()).unwrap();
    assert!(result.are_equal());
}

#[test]
fn test_isomorphic_cycles_terminate_and_are_equal() {
    let result = compare(
        &Value::from(ring("a", "b")),
        &Value::from(ring("a", "b")),
        &ComparisonConfig::default(),
    )
    .unwrap();
    assert!(result.are_equal());
}

#[test]
fn test_cycle_with_difference_reports_it() {
    let result = compare(
        &Value::from(ring("a", "b")),
        &Value::from(ring("a", "c")),
        &ComparisonConfig::default().with_max_differences(10),
    )
    .unwrap();
    assert!(!result.are_equal());
    assert_eq!(result.differences().len(), 1);
    assert_eq!(result.differences()[0].path(), "Next.Name");
}

#[test]
fn test_shared_substructure_reported_once() {
    let owner = TypeDescriptor::builder("Owner")
        .field("First", Shape::Object)
        .field("Second", Shape::Object)
        .build();
    let shared_left = person("Ada", 1);
    let shared_right = person("Ada", 2);
    let left = ObjectRef::new(owner.clone())
        .with("First", shared_left.clone())
        .with("Second", shared_left);
    let right = ObjectRef::new(owner)
        .with("First", shared_right.clone())
        .with("Second", shared_right);

    let result = compare(
        &Value::from(left),
        &Value::from(right),
        &ComparisonConfig::default().with_max_differences(10),
    )
    .unwrap();

    assert!(!result.are_equal());
    assert_eq!(result.differences().len(), 1);
    assert_eq!(result.differences()[0].path(), "First.DateCreated");
}

#[test]
fn test_aggregator_misuse_aborts() {
    let greedy = TypeDescriptor::builder("Greedy").build();
    let holder = TypeDescriptor::builder("Holder")
        .field("Name", Shape::Text)
        .field("Items", Shape::Map)
        .build();
    let left = ObjectRef::new(holder.clone())
        .with("Name", "a")
        .with("Items", MapRef::new().with("k", ObjectRef::new(greedy.clone())));
    let right = ObjectRef::new(holder)
        .with("Name", "b")
        .with("Items", MapRef::new().with("k", ObjectRef::new(greedy)));
    let config = ComparisonConfig::default()
        .with_max_differences(5)
        .with_custom_comparer(Arc::new(GreedyComparer));

    // `Name` is recorded first; the greedy comparer then runs inside the map
    // value capture and removes it, dropping the list below the capture's mark.
    let err = compare(&Value::from(left), &Value::from(right), &config).unwrap_err();
    assert!(matches!(err, DeepEqError::AggregatorMisuse { .. }));
}

#[test]
fn test_compare_logic_wrapper() {
    let logic = CompareLogic::with_config(ComparisonConfig::default().with_names("Before", "After"));
    let expected = Value::from(person("Ada", 1));
    let actual = deep_clone(&expected);
    assert!(logic.compare(&expected, &actual).unwrap().are_equal());

    actual.as_object().unwrap().set("Name", "Grace");
    let result = logic.compare(&expected, &actual).unwrap();
    assert_eq!(result.differences()[0].expected_name(), "Before");
    assert_eq!(result.differences()[0].actual_name(), "After");
}

#[test]
fn test_assert_equal_fails_with_first_difference() {
    let logic = CompareLogic::with_config(ComparisonConfig::default().with_max_differences(5));
    let expected = Value::from(person("Ada", 1));
    let actual = deep_clone(&expected);
    assert_eq!(logic.assert_equal(&expected, &actual), Ok(()));

    actual.as_object().unwrap().set("Name", "Grace");
    actual.as_object().unwrap().set("DateCreated", common::date(2));
    let first = logic.compare(&expected, &actual).unwrap().differences()[0].clone();

    let err = logic.assert_equal(&expected, &actual).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Difference);
    assert_eq!(err.to_string(), format!("Difference found: {}", first.short_item()));
    let DeepEqError::Difference(difference) = &err else {
        panic!("expected a difference, got {err:?}");
    };
    assert_eq!(**difference, first);
    assert_eq!(difference.left_value(), "Ada");

    let ex: ExError = err.into();
    assert_eq!(ex.code(), "ERR_DIFFERENCE");
    assert_eq!(ex.op(), Some("assert_equal"));
    assert_eq!(ex.message(), "Name");
}

#[test]
fn test_root_comparer_shared_across_threads() {
    let root = Arc::new(RootComparer::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let root = Arc::clone(&root);
            std::thread::spawn(move || {
                let left = Value::from(ListRef::new().with(i).with(i + 1));
                let right = Value::from(ListRef::new().with(i).with(i + 1));
                root.compare_values(&left, &right, &ComparisonConfig::default())
                    .unwrap()
                    .are_equal()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
