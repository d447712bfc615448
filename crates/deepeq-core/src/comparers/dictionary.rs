//! Order-independent map comparison.
//!
//! Keys are matched with the engine itself, never with the host's own key
//! equality, so keys that are objects compare structurally. Matching tries
//! the same position first and falls back to a scan of the unclaimed right
//! entries, which is linear for maps enumerated in the same order and
//! quadratic in the worst case.
//!
//! A map contributes at most one difference.

use tracing::trace;

use super::{both, TypeComparer};
use crate::difference::Difference;
use crate::errors::Result;
use crate::parms::CompareParms;
use crate::root::RootComparer;
use crate::session::{CaptureScope, ComparisonSession};
use crate::value::{RuntimeType, Shape, Value};

/// Child name of the difference raised for an unmatched key
pub const KEY_CHILD: &str = "Key";

/// Child name of the difference raised for mismatched entry counts
pub const COUNT_CHILD: &str = "Count";

#[derive(Debug, Clone, Copy, Default)]
pub struct DictionaryComparer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryMatch {
    /// Keys and values equal; the right entry is claimed
    Matched,
    /// Right entry already claimed or keys differ
    NoMatch,
    /// Keys equal but values differ; one difference was recorded
    ValueMismatch,
}

struct EntryMatcher<'p, 'a> {
    root: &'p RootComparer,
    parms: &'p CompareParms<'a>,
    left: Vec<(Value, Value)>,
    right: Vec<(Value, Value)>,
    claimed: Vec<bool>,
}

impl EntryMatcher<'_, '_> {
    fn try_match(&mut self, i: usize, j: usize, session: &mut ComparisonSession) -> Result<EntryMatch> {
        if self.claimed[j] {
            return Ok(EntryMatch::NoMatch);
        }

        let (left_key, left_value) = &self.left[i];
        let (right_key, right_value) = &self.right[j];

        let key_parms = self.parms.child(
            left_key.clone(),
            right_key.clone(),
            self.parms.path().member(KEY_CHILD),
        );
        let (keys_equal, key_diffs) =
            session.capture(CaptureScope::Discard, |s| self.root.compare(&key_parms, s))?;
        if !keys_equal || !key_diffs.is_empty() {
            return Ok(EntryMatch::NoMatch);
        }
        self.claimed[j] = true;

        let value_parms = self.parms.child(
            left_value.clone(),
            right_value.clone(),
            self.parms.path().index(left_key.display_text()),
        );
        let (values_equal, mut value_diffs) =
            session.capture(CaptureScope::Keep, |s| self.root.compare(&value_parms, s))?;
        if values_equal && value_diffs.is_empty() {
            return Ok(EntryMatch::Matched);
        }

        let difference = if value_diffs.is_empty() {
            Difference::from_parms(&value_parms)
        } else {
            value_diffs.swap_remove(0)
        };
        session.add_difference(difference);
        Ok(EntryMatch::ValueMismatch)
    }
}

impl TypeComparer for DictionaryComparer {
    fn name(&self) -> &str {
        "dictionary"
    }

    fn is_type_match(&self, left: Option<&RuntimeType>, right: Option<&RuntimeType>) -> bool {
        both(left, right, |t| t.shape() == Shape::Map)
    }

    fn compare_type(
        &self,
        root: &RootComparer,
        parms: &CompareParms<'_>,
        session: &mut ComparisonSession,
    ) -> Result<bool> {
        let (Some(left), Some(right)) = (parms.left().as_map(), parms.right().as_map()) else {
            return Ok(false);
        };
        if session.exceeded_differences() {
            return Ok(false);
        }

        if left.len() != right.len() {
            session.add_difference(
                Difference::from_parms(parms)
                    .with_child(COUNT_CHILD)
                    .with_values(left.len().to_string(), right.len().to_string()),
            );
            return Ok(false);
        }

        let right_entries = right.entries();
        let mut matcher = EntryMatcher {
            root,
            parms,
            left: left.entries(),
            claimed: vec![false; right_entries.len()],
            right: right_entries,
        };

        for i in 0..matcher.left.len() {
            match matcher.try_match(i, i, session)? {
                EntryMatch::Matched => continue,
                EntryMatch::ValueMismatch => return Ok(false),
                EntryMatch::NoMatch => {}
            }

            let mut found = false;
            for j in (0..matcher.right.len()).filter(|&j| j != i) {
                match matcher.try_match(i, j, session)? {
                    EntryMatch::Matched => {
                        trace!(path = %parms.path(), left = i, right = j, "map entry matched out of order");
                        found = true;
                        break;
                    }
                    EntryMatch::ValueMismatch => return Ok(false),
                    EntryMatch::NoMatch => {}
                }
            }

            if !found {
                let key = &matcher.left[i].0;
                session.add_difference(
                    Difference::from_parms(parms)
                        .with_child(KEY_CHILD)
                        .with_values(key.display_text(), "")
                        .with_objects(key, &Value::Null),
                );
                return Ok(false);
            }
        }

        Ok(true)
    }
}
