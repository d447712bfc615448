//! One recorded mismatch.

use serde::Serialize;
use std::fmt;

use crate::parms::CompareParms;
use crate::value::{Value, WeakValue};

/// Prefix of differences raised by the runtime type check
pub const DIFFERENT_TYPES: &str = "Different Types";

/// Child name of differences raised by the runtime type check
pub const TYPE_CHILD: &str = "GetType()";

/// A mismatch with its path and the values on both sides
///
/// The observation handles (`left`, `right` and the parents) are weak: a
/// difference never keeps compared values alive, and they are skipped when
/// serializing.
#[derive(Debug, Clone, Serialize)]
pub struct Difference {
    expected_name: String,
    actual_name: String,
    path: String,
    child_name: String,
    left_value: String,
    right_value: String,
    left_type_name: String,
    right_type_name: String,
    message_prefix: String,
    #[serde(skip)]
    left_parent: WeakValue,
    #[serde(skip)]
    right_parent: WeakValue,
    #[serde(skip)]
    left: WeakValue,
    #[serde(skip)]
    right: WeakValue,
}

fn type_name_of(value: &Value) -> String {
    value
        .runtime_type()
        .map(|ty| ty.name().to_string())
        .unwrap_or_else(|| "(null)".to_string())
}

impl Difference {
    /// Difference describing the two values of `parms` as they are.
    pub fn from_parms(parms: &CompareParms<'_>) -> Self {
        let config = parms.config();
        Self {
            expected_name: config.expected_name.clone(),
            actual_name: config.actual_name.clone(),
            path: parms.path().to_string(),
            child_name: String::new(),
            left_value: parms.left().display_text(),
            right_value: parms.right().display_text(),
            left_type_name: type_name_of(parms.left()),
            right_type_name: type_name_of(parms.right()),
            message_prefix: String::new(),
            left_parent: parms.left_parent().downgrade(),
            right_parent: parms.right_parent().downgrade(),
            left: parms.left().downgrade(),
            right: parms.right().downgrade(),
        }
    }

    /// Difference raised when the runtime types of `parms` differ.
    pub fn different_types(parms: &CompareParms<'_>) -> Self {
        let left = type_name_of(parms.left());
        let right = type_name_of(parms.right());
        Self::from_parms(parms)
            .with_child(TYPE_CHILD)
            .with_values(left, right)
            .with_prefix(DIFFERENT_TYPES)
    }

    pub fn with_child(mut self, child: impl Into<String>) -> Self {
        self.child_name = child.into();
        self
    }

    pub fn with_values(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_value = left.into();
        self.right_value = right.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.message_prefix = prefix.into();
        self
    }

    /// Replace the observed values, e.g. with a count owner's collection.
    pub fn with_objects(mut self, left: &Value, right: &Value) -> Self {
        self.left = left.downgrade();
        self.right = right.downgrade();
        self
    }

    pub fn expected_name(&self) -> &str {
        &self.expected_name
    }

    pub fn actual_name(&self) -> &str {
        &self.actual_name
    }

    /// Breadcrumb of the node the difference was found at.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn child_name(&self) -> &str {
        &self.child_name
    }

    pub fn left_value(&self) -> &str {
        &self.left_value
    }

    pub fn right_value(&self) -> &str {
        &self.right_value
    }

    pub fn left_type_name(&self) -> &str {
        &self.left_type_name
    }

    pub fn right_type_name(&self) -> &str {
        &self.right_type_name
    }

    pub fn message_prefix(&self) -> &str {
        &self.message_prefix
    }

    pub fn left_parent(&self) -> &WeakValue {
        &self.left_parent
    }

    pub fn right_parent(&self) -> &WeakValue {
        &self.right_parent
    }

    pub fn left(&self) -> &WeakValue {
        &self.left
    }

    pub fn right(&self) -> &WeakValue {
        &self.right
    }

    /// Path of the enclosing node: `A.B[2]` for `A.B[2][3]`, `A` for `A.B`,
    /// empty at the root.
    pub fn parent_path(&self) -> &str {
        let path = self.path.as_str();
        if path.ends_with(']') {
            if let Some(pos) = path.rfind('[') {
                return &path[..pos];
            }
        }
        match path.rfind('.') {
            Some(pos) if pos > 0 => &path[..pos],
            _ => "",
        }
    }

    /// One-line summary: `Person.Name`, `Different Types: Items.GetType()`,
    /// or `Expected != Actual` for a mismatch at the root.
    pub fn short_item(&self) -> String {
        let mut message = if !self.path.is_empty() {
            if self.child_name.is_empty() {
                self.path.clone()
            } else {
                format!("{}.{}", self.path, self.child_name)
            }
        } else if !self.child_name.is_empty() {
            self.child_name.clone()
        } else {
            format!("{} != {}", self.expected_name, self.actual_name)
        };

        if !self.message_prefix.is_empty() {
            message = format!("{}: {}", self.message_prefix, message);
        }

        message.replace("..", ".").replace(".[", "[")
    }

    fn side_path(&self, name: &str) -> String {
        let mut path = name.to_string();
        for part in [&self.path, &self.child_name] {
            if part.is_empty() {
                continue;
            }
            if !part.starts_with('[') {
                path.push('.');
            }
            path.push_str(part);
        }
        path.replace("..", ".")
    }
}

/// Differences are equal when they report the same thing; the observation
/// handles are not compared.
impl PartialEq for Difference {
    fn eq(&self, other: &Self) -> bool {
        self.expected_name == other.expected_name
            && self.actual_name == other.actual_name
            && self.path == other.path
            && self.child_name == other.child_name
            && self.left_value == other.left_value
            && self.right_value == other.right_value
            && self.left_type_name == other.left_type_name
            && self.right_type_name == other.right_type_name
            && self.message_prefix == other.message_prefix
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let left_parent = self.left_parent.type_name().unwrap_or_default();
        let right_parent = self.right_parent.type_name().unwrap_or_default();

        if !self.message_prefix.is_empty() {
            write!(f, "{}: ", self.message_prefix)?;
        }
        writeln!(f)?;
        writeln!(f, "Types:")?;
        writeln!(f, "    {}:   {}", self.expected_name, left_parent)?;
        writeln!(f, "    {}:     {}", self.actual_name, right_parent)?;
        writeln!(f, "Paths:")?;
        writeln!(f, "    {}:   {}", self.expected_name, self.side_path(&self.expected_name))?;
        writeln!(f, "    {}:     {}", self.actual_name, self.side_path(&self.actual_name))?;
        writeln!(f, "Values:")?;
        writeln!(
            f,
            "    {}:   {} <{}>",
            self.expected_name, self.left_type_name, self.left_value
        )?;
        writeln!(
            f,
            "    {}:     {} <{}>",
            self.actual_name, self.right_type_name, self.right_value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComparisonConfig;

    fn at(path: &str) -> Difference {
        let config = ComparisonConfig::default();
        let parms = CompareParms::root(Value::from(1), Value::from(2), &config);
        let mut d = Difference::from_parms(&parms);
        d.path = path.to_string();
        d
    }

    #[test]
    fn test_short_item_forms() {
        assert_eq!(at("Person.Name").short_item(), "Person.Name");
        assert_eq!(at("").short_item(), "Expected != Actual");
        assert_eq!(at("Items").with_child("Count").short_item(), "Items.Count");
        assert_eq!(
            at("Items")
                .with_child(TYPE_CHILD)
                .with_prefix(DIFFERENT_TYPES)
                .short_item(),
            "Different Types: Items.GetType()"
        );
        assert_eq!(at("[1002]").with_child("DateCreated").short_item(), "[1002].DateCreated");
    }

    #[test]
    fn test_parent_path() {
        assert_eq!(at("A.B[2][3]").parent_path(), "A.B[2]");
        assert_eq!(at("A.B").parent_path(), "A");
        assert_eq!(at("Name").parent_path(), "");
        assert_eq!(at("[1002].DateCreated").parent_path(), "[1002]");
    }

    #[test]
    fn test_display_report_sections() {
        let report = at("Person.Age").to_string();
        assert!(report.contains("Types:"));
        assert!(report.contains("Expected:   Expected.Person.Age"));
        assert!(report.contains("Actual:     Actual.Person.Age"));
        assert!(report.contains("i64 <1>"));
        assert!(report.contains("i64 <2>"));
    }

    #[test]
    fn test_values_of_leaves_and_nulls() {
        let config = ComparisonConfig::default();
        let parms = CompareParms::root(Value::Null, Value::from("x"), &config);
        let d = Difference::from_parms(&parms);
        assert_eq!(d.left_value(), "(null)");
        assert_eq!(d.left_type_name(), "(null)");
        assert_eq!(d.right_type_name(), "string");
        assert!(!d.left().is_alive());
    }

    #[test]
    fn test_serializes_without_weak_handles() {
        let json = serde_json::to_value(at("A.B")).unwrap();
        assert_eq!(json["path"], "A.B");
        assert!(json.get("left_parent").is_none());
    }
}
