use super::{both, TypeComparer};
use crate::difference::Difference;
use crate::errors::Result;
use crate::parms::CompareParms;
use crate::root::RootComparer;
use crate::session::ComparisonSession;
use crate::value::{leaf_eq, RuntimeType};

/// Leaves: booleans, numbers, text and timestamps, compared by value
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTypeComparer;

impl TypeComparer for SimpleTypeComparer {
    fn name(&self) -> &str {
        "simple"
    }

    fn is_type_match(&self, left: Option<&RuntimeType>, right: Option<&RuntimeType>) -> bool {
        both(left, right, |t| t.shape().is_leaf())
    }

    fn compare_type(
        &self,
        _root: &RootComparer,
        parms: &CompareParms<'_>,
        session: &mut ComparisonSession,
    ) -> Result<bool> {
        if leaf_eq(parms.left(), parms.right()) {
            return Ok(true);
        }
        session.add_difference(Difference::from_parms(parms));
        Ok(false)
    }
}
