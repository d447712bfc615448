//! Indexed members (`this[int]` style accessors).
//!
//! An indexer is walked element by element from 0 to the owner's `Count`.
//! It is only walkable when it takes exactly one integer parameter and its
//! owner has an integer `Count` member.

use super::dictionary::COUNT_CHILD;
use crate::breadcrumb::BreadCrumb;
use crate::difference::Difference;
use crate::errors::{DeepEqError, Result};
use crate::parms::CompareParms;
use crate::root::RootComparer;
use crate::session::ComparisonSession;
use crate::value::{MemberDescriptor, ObjectRef, Shape, TypeDescriptor, Value};

/// Outcome of checking an indexed member before walking it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexerCheck {
    Valid,
    /// Invalid, and the configuration says to skip it
    Skip,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IndexerComparer;

impl IndexerComparer {
    /// # Errors
    ///
    /// `InvalidIndexer` when the member cannot be walked and invalid
    /// indexers are not skipped.
    pub fn validate(
        &self,
        parms: &CompareParms<'_>,
        owner: &TypeDescriptor,
        member: &MemberDescriptor,
    ) -> Result<IndexerCheck> {
        let reason = match member.index_params() {
            [Shape::Int] => match owner.member(COUNT_CHILD) {
                Some(count) if count.shape() == Shape::Int => return Ok(IndexerCheck::Valid),
                _ => "indexer must have a corresponding Count member that is an integer",
            },
            [_] => "cannot compare a non integer indexer",
            _ => "cannot compare an indexer with more than one parameter",
        };

        if parms.config().skip_invalid_indexers {
            return Ok(IndexerCheck::Skip);
        }
        Err(DeepEqError::InvalidIndexer {
            path: parms.path().to_string(),
            member: member.name().to_string(),
            reason: reason.to_string(),
        })
    }

    /// Compare `member` of the two objects in `parms` element by element.
    ///
    /// # Errors
    ///
    /// Propagates read failures (disposed objects) and nested errors.
    pub fn compare_indexer(
        &self,
        root: &RootComparer,
        parms: &CompareParms<'_>,
        member: &str,
        session: &mut ComparisonSession,
    ) -> Result<bool> {
        let (Some(left), Some(right)) = (parms.left().as_object(), parms.right().as_object()) else {
            return Ok(false);
        };
        let member_path = parms.path().member(member);

        let left_count = read_count(left, parms.path())?;
        let right_count = read_count(right, parms.path())?;
        if left_count != right_count {
            let counts = parms.child(
                Value::Int(left_count as i64),
                Value::Int(right_count as i64),
                member_path,
            );
            session.add_difference(
                Difference::from_parms(&counts)
                    .with_child(COUNT_CHILD)
                    .with_objects(parms.left(), parms.right()),
            );
            return Ok(false);
        }

        let mut equal = true;
        for i in 0..left_count {
            if session.exceeded_differences() {
                return Ok(false);
            }
            let path = parms.path().to_string();
            let l = left
                .read_indexed(member, i)
                .map_err(|e| e.at_path(&path))?;
            let r = right
                .read_indexed(member, i)
                .map_err(|e| e.at_path(&path))?;
            let child = parms.child(l, r, member_path.index(i));
            equal &= root.compare(&child, session)?;
        }
        Ok(equal)
    }
}

fn read_count(object: &ObjectRef, path: &BreadCrumb) -> Result<usize> {
    let count = object
        .read(COUNT_CHILD)
        .map_err(|e| e.at_path(&path.to_string()))?;
    Ok(count.as_int().map(|n| n.max(0) as usize).unwrap_or(0))
}
