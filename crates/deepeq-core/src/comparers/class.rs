use super::property::PropertyComparer;
use super::{both, TypeComparer};
use crate::errors::Result;
use crate::parms::CompareParms;
use crate::root::RootComparer;
use crate::session::ComparisonSession;
use crate::value::{RuntimeType, Shape};

/// Composite objects, compared member by member
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassComparer {
    property: PropertyComparer,
}

impl TypeComparer for ClassComparer {
    fn name(&self) -> &str {
        "class"
    }

    fn is_type_match(&self, left: Option<&RuntimeType>, right: Option<&RuntimeType>) -> bool {
        both(left, right, |t| t.shape() == Shape::Object)
    }

    fn compare_type(
        &self,
        root: &RootComparer,
        parms: &CompareParms<'_>,
        session: &mut ComparisonSession,
    ) -> Result<bool> {
        self.property.perform_compare_properties(root, parms, session)
    }
}
