//! Member-by-member comparison of two objects.

use std::sync::Arc;

use tracing::trace;

use super::exclude::should_exclude_member;
use super::indexer::{IndexerCheck, IndexerComparer};
use crate::errors::Result;
use crate::members::member_source;
use crate::parms::CompareParms;
use crate::root::RootComparer;
use crate::session::ComparisonSession;
use crate::value::{MemberDescriptor, ObjectRef, TypeDescriptor};

#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyComparer {
    indexer: IndexerComparer,
}

enum MemberOutcome {
    Compared(bool),
    Skipped(SkipReason),
}

/// Why a member took no part in the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    Unreadable,
    Shallow,
    Excluded,
    ReadOnly,
    MissingOnRight,
    InvalidIndexer,
}

impl PropertyComparer {
    /// Compare every comparable member of the two objects in `parms`.
    ///
    /// Members come from the left runtime type, narrowed to the first
    /// configured interface it implements. Stops once the difference cap is
    /// reached.
    ///
    /// # Errors
    ///
    /// `InvalidIndexer`, `ObjectDisposed` and nested errors.
    pub fn perform_compare_properties(
        &self,
        root: &RootComparer,
        parms: &CompareParms<'_>,
        session: &mut ComparisonSession,
    ) -> Result<bool> {
        let (Some(left), Some(right)) = (parms.left().as_object(), parms.right().as_object()) else {
            return Ok(false);
        };

        let owner = left.descriptor();
        let source = member_source(&owner, parms.config());
        let members = session.comparable_members(root.member_lister(), &source);
        let right_members = if parms.config().ignore_object_types {
            Some(session.comparable_members(root.member_lister(), &right.descriptor()))
        } else {
            None
        };

        let mut equal = true;
        for member in members.iter() {
            match self.compare_member(root, parms, &owner, member, right_members.as_ref(), session)? {
                MemberOutcome::Compared(verdict) => equal &= verdict,
                MemberOutcome::Skipped(reason) => {
                    trace!(path = %parms.path(), member = member.name(), ?reason, "member skipped");
                }
            }
            if session.exceeded_differences() {
                return Ok(false);
            }
        }
        Ok(equal)
    }

    fn compare_member(
        &self,
        root: &RootComparer,
        parms: &CompareParms<'_>,
        owner: &TypeDescriptor,
        member: &MemberDescriptor,
        right_members: Option<&Arc<[MemberDescriptor]>>,
        session: &mut ComparisonSession,
    ) -> Result<MemberOutcome> {
        let config = parms.config();

        if !member.can_read() {
            return Ok(MemberOutcome::Skipped(SkipReason::Unreadable));
        }
        if !config.compare_children && member.shape().can_have_children() {
            return Ok(MemberOutcome::Skipped(SkipReason::Shallow));
        }
        if should_exclude_member(config, owner.name(), member) {
            return Ok(MemberOutcome::Skipped(SkipReason::Excluded));
        }
        if !config.compare_read_only && !member.can_write() {
            return Ok(MemberOutcome::Skipped(SkipReason::ReadOnly));
        }

        let right_name = match right_members {
            Some(list) => match list.iter().find(|m| m.name() == member.name()) {
                Some(found) => found.name(),
                None => return Ok(MemberOutcome::Skipped(SkipReason::MissingOnRight)),
            },
            None => member.name(),
        };

        if member.is_indexer() {
            return match self.indexer.validate(parms, owner, member)? {
                IndexerCheck::Valid => self
                    .indexer
                    .compare_indexer(root, parms, member.name(), session)
                    .map(MemberOutcome::Compared),
                IndexerCheck::Skip => Ok(MemberOutcome::Skipped(SkipReason::InvalidIndexer)),
            };
        }

        let (Some(left), Some(right)) = (parms.left().as_object(), parms.right().as_object()) else {
            return Ok(MemberOutcome::Compared(false));
        };
        let left_value = read_member(left, member.name(), parms)?;
        let right_value = read_member(right, right_name, parms)?;

        let child = parms.child(left_value, right_value, parms.path().member(member.name()));
        root.compare(&child, session).map(MemberOutcome::Compared)
    }
}

fn read_member(
    object: &ObjectRef,
    name: &str,
    parms: &CompareParms<'_>,
) -> Result<crate::value::Value> {
    object
        .read(name)
        .map_err(|e| e.at_path(&parms.path().to_string()))
}
