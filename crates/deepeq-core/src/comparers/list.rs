use super::dictionary::COUNT_CHILD;
use super::{both, TypeComparer};
use crate::difference::Difference;
use crate::errors::Result;
use crate::parms::CompareParms;
use crate::root::RootComparer;
use crate::session::ComparisonSession;
use crate::value::{RuntimeType, Shape};

/// Sequential collections, compared position by position
#[derive(Debug, Clone, Copy, Default)]
pub struct ListComparer;

impl TypeComparer for ListComparer {
    fn name(&self) -> &str {
        "list"
    }

    fn is_type_match(&self, left: Option<&RuntimeType>, right: Option<&RuntimeType>) -> bool {
        both(left, right, |t| t.shape() == Shape::List)
    }

    fn compare_type(
        &self,
        root: &RootComparer,
        parms: &CompareParms<'_>,
        session: &mut ComparisonSession,
    ) -> Result<bool> {
        let (Some(left), Some(right)) = (parms.left().as_list(), parms.right().as_list()) else {
            return Ok(false);
        };

        let left_items = left.items();
        let right_items = right.items();
        if left_items.len() != right_items.len() {
            session.add_difference(
                Difference::from_parms(parms)
                    .with_child(COUNT_CHILD)
                    .with_values(left_items.len().to_string(), right_items.len().to_string()),
            );
            return Ok(false);
        }

        let mut equal = true;
        for (i, (l, r)) in left_items.into_iter().zip(right_items).enumerate() {
            if session.exceeded_differences() {
                return Ok(false);
            }
            let child = parms.child(l, r, parms.path().index(i));
            equal &= root.compare(&child, session)?;
        }
        Ok(equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComparisonConfig;
    use crate::value::{ListRef, Value};
    use deepeq_core_types::InvocationId;

    #[test]
    fn test_elementwise_paths() {
        let config = ComparisonConfig::default().with_max_differences(5);
        let mut session = ComparisonSession::new(InvocationId::new(), 5);
        let parms = CompareParms::root(
            Value::from(ListRef::new().with(1).with(2).with(3)),
            Value::from(ListRef::new().with(1).with(9).with(8)),
            &config,
        );
        let eq = RootComparer::new().compare(&parms, &mut session).unwrap();
        assert!(!eq);
        let paths: Vec<&str> = session.differences().iter().map(|d| d.path()).collect();
        assert_eq!(paths, vec!["[1]", "[2]"]);
    }

    #[test]
    fn test_length_mismatch_stops_early() {
        let config = ComparisonConfig::default().with_max_differences(5);
        let mut session = ComparisonSession::new(InvocationId::new(), 5);
        let parms = CompareParms::root(
            Value::from(ListRef::new().with(1)),
            Value::from(ListRef::new().with(2).with(3)),
            &config,
        );
        assert!(!RootComparer::new().compare(&parms, &mut session).unwrap());
        assert_eq!(session.difference_count(), 1);
        assert_eq!(session.differences()[0].short_item(), "Count");
    }
}
