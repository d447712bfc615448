//! deepeq Core - generic deep-equality engine
//!
//! Compares two dynamically-typed object graphs and reports every place they
//! differ, with a breadcrumb path to each mismatch. Equality is judged
//! structurally by the engine, never by trusting the compared values' own
//! notion of equality. This crate provides:
//! - The host value model ([`Value`], type and member descriptors)
//! - The root dispatcher with its visited-pair cache and cycle handling
//! - Built-in comparers for leaves, maps, lists and objects, plus custom
//!   comparer registration through [`ComparisonConfig`]
//! - Difference records, results, and Markdown/JSON reporting
//! - The error facility and the structured logging facility
//!
//! ```
//! use deepeq_core::{compare, ComparisonConfig, MapRef, Value};
//!
//! let a = Value::from(MapRef::new().with("x", 1).with("y", 2));
//! let b = Value::from(MapRef::new().with("y", 2).with("x", 1));
//! let result = compare(&a, &b, &ComparisonConfig::default()).unwrap();
//! assert!(result.are_equal());
//! ```

pub mod breadcrumb;
pub mod comparers;
pub mod config;
pub mod difference;
pub mod errors;
pub mod logging_facility;
pub mod members;
pub mod parms;
pub mod report;
pub mod result;
pub mod root;
pub mod session;
pub mod value;

// Re-export commonly used types
pub use breadcrumb::BreadCrumb;
pub use comparers::TypeComparer;
pub use config::ComparisonConfig;
pub use difference::Difference;
pub use errors::{DeepEqError, ExError, ExErrorKind, Result};
pub use members::{DeclaredMemberLister, MemberLister};
pub use parms::CompareParms;
pub use result::ComparisonResult;
pub use root::{compare, CompareLogic, RootComparer};
pub use session::{CaptureScope, ComparisonSession};
pub use value::{
    ListRef, MapRef, MemberDescriptor, ObjectRef, OpaqueRef, RuntimeType, Shape, TypeDescriptor,
    Value, WeakValue,
};
