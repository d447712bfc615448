//! Type comparers.
//!
//! A [`TypeComparer`] is one comparison strategy: a predicate over the two
//! runtime types plus a handler. The dispatcher consults custom comparers
//! from the configuration first, then the built-ins from [`built_in`] in
//! order, and calls the first one whose predicate accepts.
//!
//! Handlers return the local verdict for their node and record differences
//! on the session. They recurse by building child contexts and calling
//! [`RootComparer::compare`].

mod class;
mod dictionary;
mod exclude;
mod indexer;
mod list;
mod property;
mod simple;

use std::sync::Arc;

pub use class::ClassComparer;
pub use dictionary::DictionaryComparer;
pub use exclude::should_exclude_member;
pub use indexer::IndexerComparer;
pub use list::ListComparer;
pub use property::PropertyComparer;
pub use simple::SimpleTypeComparer;

use crate::errors::Result;
use crate::parms::CompareParms;
use crate::root::RootComparer;
use crate::session::ComparisonSession;
use crate::value::RuntimeType;

/// One comparison strategy
pub trait TypeComparer: Send + Sync {
    /// Name used in logs and debug output.
    fn name(&self) -> &str;

    /// Whether this comparer handles the pair. `None` is an absent value.
    fn is_type_match(&self, left: Option<&RuntimeType>, right: Option<&RuntimeType>) -> bool;

    /// Compare the pair in `parms`, recording differences on `session`.
    ///
    /// # Errors
    ///
    /// Any error aborts the whole top-level comparison.
    fn compare_type(
        &self,
        root: &RootComparer,
        parms: &CompareParms<'_>,
        session: &mut ComparisonSession,
    ) -> Result<bool>;
}

/// Built-in comparers in dispatch order.
pub fn built_in() -> Vec<Arc<dyn TypeComparer>> {
    vec![
        Arc::new(SimpleTypeComparer),
        Arc::new(DictionaryComparer),
        Arc::new(ListComparer),
        Arc::new(ClassComparer::default()),
    ]
}

/// Both sides present and satisfying `pred`.
pub(crate) fn both(
    left: Option<&RuntimeType>,
    right: Option<&RuntimeType>,
    pred: impl Fn(&RuntimeType) -> bool,
) -> bool {
    matches!((left, right), (Some(l), Some(r)) if pred(l) && pred(r))
}
