//! Member enumeration.
//!
//! The engine asks a [`MemberLister`] which members of a type take part in
//! a comparison. Results are cached per type name for one invocation, see
//! [`ComparisonSession::comparable_members`](crate::session::ComparisonSession::comparable_members).

use std::sync::Arc;

use crate::config::ComparisonConfig;
use crate::value::{MemberDescriptor, TypeDescriptor};

/// Lists the comparable members of a type
pub trait MemberLister: Send + Sync {
    fn comparable_members(&self, descriptor: &TypeDescriptor) -> Vec<MemberDescriptor>;
}

/// Every declared member, in declaration order
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredMemberLister;

impl MemberLister for DeclaredMemberLister {
    fn comparable_members(&self, descriptor: &TypeDescriptor) -> Vec<MemberDescriptor> {
        descriptor.members().to_vec()
    }
}

/// The descriptor whose members are compared for an object of type
/// `descriptor`: the first configured interface it implements, else itself.
pub fn member_source(
    descriptor: &Arc<TypeDescriptor>,
    config: &ComparisonConfig,
) -> Arc<TypeDescriptor> {
    config
        .interface_members
        .iter()
        .find_map(|name| descriptor.implemented_interface(name))
        .map(Arc::clone)
        .unwrap_or_else(|| Arc::clone(descriptor))
}
