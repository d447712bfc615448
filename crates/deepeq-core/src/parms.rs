//! Per-node comparison context.

use crate::breadcrumb::BreadCrumb;
use crate::config::ComparisonConfig;
use crate::value::{RuntimeType, Value};

/// The pair being compared at one node of the traversal
///
/// Built fresh for every node and never mutated. Cloning a `Value` only
/// bumps a reference count, so contexts are cheap to create.
#[derive(Debug, Clone)]
pub struct CompareParms<'a> {
    left: Value,
    right: Value,
    left_type: Option<RuntimeType>,
    right_type: Option<RuntimeType>,
    left_parent: Value,
    right_parent: Value,
    path: BreadCrumb,
    config: &'a ComparisonConfig,
}

impl<'a> CompareParms<'a> {
    /// Context for the two compared roots.
    pub fn root(left: Value, right: Value, config: &'a ComparisonConfig) -> Self {
        Self::build(left, right, Value::Null, Value::Null, BreadCrumb::root(), config)
    }

    /// Context for a child pair whose parents are this node's values.
    pub fn child(&self, left: Value, right: Value, path: BreadCrumb) -> CompareParms<'a> {
        Self::build(
            left,
            right,
            self.left.clone(),
            self.right.clone(),
            path,
            self.config,
        )
    }

    fn build(
        left: Value,
        right: Value,
        left_parent: Value,
        right_parent: Value,
        path: BreadCrumb,
        config: &'a ComparisonConfig,
    ) -> Self {
        Self {
            left_type: left.runtime_type(),
            right_type: right.runtime_type(),
            left,
            right,
            left_parent,
            right_parent,
            path,
            config,
        }
    }

    pub fn left(&self) -> &Value {
        &self.left
    }

    pub fn right(&self) -> &Value {
        &self.right
    }

    pub fn left_type(&self) -> Option<&RuntimeType> {
        self.left_type.as_ref()
    }

    pub fn right_type(&self) -> Option<&RuntimeType> {
        self.right_type.as_ref()
    }

    pub fn left_parent(&self) -> &Value {
        &self.left_parent
    }

    pub fn right_parent(&self) -> &Value {
        &self.right_parent
    }

    pub fn path(&self) -> &BreadCrumb {
        &self.path
    }

    pub fn config(&self) -> &'a ComparisonConfig {
        self.config
    }

    /// Both sides absent.
    pub fn both_null(&self) -> bool {
        self.left.is_null() && self.right.is_null()
    }

    /// Exactly one side absent.
    pub fn either_null(&self) -> bool {
        self.left.is_null() != self.right.is_null()
    }

    /// Runtime type names differ. Absent sides never count as a difference.
    pub fn types_differ(&self) -> bool {
        match (&self.left_type, &self.right_type) {
            (Some(l), Some(r)) => l.name() != r.name(),
            _ => false,
        }
    }
}
