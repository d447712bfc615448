//! Per-invocation comparison state.
//!
//! A [`ComparisonSession`] is created by the top-level entry point and
//! dropped when it returns. It owns the result being built, the visited-pair
//! cache, the capture-scope depth and the member-list cache. None of this ever
//! lives on the `RootComparer`, which stays immutable and shareable.

use std::collections::HashMap;
use std::sync::Arc;

use deepeq_core_types::InvocationId;

use crate::difference::Difference;
use crate::errors::{DeepEqError, Result};
use crate::members::MemberLister;
use crate::result::ComparisonResult;
use crate::value::{MemberDescriptor, TypeDescriptor};

/// Identity pair of two reference nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub left: usize,
    pub right: usize,
}

/// What happens to the differences recorded inside a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureScope {
    /// Matching attempt; the caller drops what the capture recorded, so
    /// mismatches judged inside are only cached for other discarding captures.
    Discard,
    /// The caller re-records the outcome; verdicts are cached normally.
    Keep,
}

/// Traversal state of a visited pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    /// On the active recursion stack
    InProgress,
    /// Judged; `scoped` when judged inside a discarding capture
    Done { equal: bool, scoped: bool },
}

/// State shared by every node of one top-level comparison
#[derive(Debug)]
pub struct ComparisonSession {
    result: ComparisonResult,
    visited: HashMap<PairKey, VisitState>,
    capture_depth: usize,
    discard_depth: usize,
    member_cache: HashMap<String, Arc<[MemberDescriptor]>>,
}

impl ComparisonSession {
    pub fn new(invocation_id: InvocationId, max_differences: usize) -> Self {
        Self {
            result: ComparisonResult::new(invocation_id, max_differences),
            visited: HashMap::new(),
            capture_depth: 0,
            discard_depth: 0,
            member_cache: HashMap::new(),
        }
    }

    pub fn invocation_id(&self) -> &InvocationId {
        self.result.invocation_id()
    }

    /// Record a difference. Returns `false` once the cap is reached.
    pub fn add_difference(&mut self, difference: Difference) -> bool {
        if self.result.exceeded_differences() {
            return false;
        }
        self.result.differences_mut().push(difference);
        true
    }

    pub fn exceeded_differences(&self) -> bool {
        self.result.exceeded_differences()
    }

    pub fn difference_count(&self) -> usize {
        self.result.differences().len()
    }

    pub fn differences(&self) -> &[Difference] {
        self.result.differences()
    }

    /// Current position in the difference list, for [`discard_since`].
    ///
    /// [`discard_since`]: ComparisonSession::discard_since
    pub fn mark(&self) -> usize {
        self.difference_count()
    }

    /// Remove and return every difference recorded after `mark`.
    ///
    /// # Errors
    ///
    /// `AggregatorMisuse` when the list already holds fewer than `mark`
    /// entries, i.e. someone else removed differences out from under the
    /// caller.
    pub fn discard_since(&mut self, mark: usize) -> Result<Vec<Difference>> {
        let len = self.difference_count();
        if len < mark {
            return Err(DeepEqError::AggregatorMisuse {
                message: format!("difference list shrank to {len} below scope mark {mark}"),
            });
        }
        Ok(self.result.differences_mut().split_off(mark))
    }

    /// Run `f` inside a capture scope and hand back the differences it
    /// recorded instead of keeping them. `scope` says whether the caller
    /// throws them away or records (part of) them again.
    ///
    /// # Errors
    ///
    /// Whatever `f` returns, or `AggregatorMisuse` if the list shrank below
    /// the scope's mark while it ran.
    pub fn capture<T>(
        &mut self,
        scope: CaptureScope,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<(T, Vec<Difference>)> {
        let mark = self.mark();
        let discarding = scope == CaptureScope::Discard;
        self.capture_depth += 1;
        self.discard_depth += usize::from(discarding);
        let outcome = f(self);
        self.discard_depth -= usize::from(discarding);
        self.capture_depth -= 1;
        let value = outcome?;
        let captured = self.discard_since(mark)?;
        Ok((value, captured))
    }

    pub fn in_capture(&self) -> bool {
        self.capture_depth > 0
    }

    fn in_discarding_capture(&self) -> bool {
        self.discard_depth > 0
    }

    /// Cached state of a pair. A mismatch judged inside a discarding capture
    /// is invisible outside of one, so it gets judged and recorded again.
    pub fn visit_state(&self, key: PairKey) -> Option<VisitState> {
        match self.visited.get(&key).copied() {
            Some(VisitState::Done {
                equal: false,
                scoped: true,
            }) if !self.in_discarding_capture() => None,
            other => other,
        }
    }

    pub fn begin_visit(&mut self, key: PairKey) {
        self.visited.insert(key, VisitState::InProgress);
    }

    pub fn finish_visit(&mut self, key: PairKey, equal: bool) {
        let scoped = self.in_discarding_capture();
        self.visited.insert(key, VisitState::Done { equal, scoped });
    }

    /// Drop a pair without caching a verdict.
    pub fn abandon_visit(&mut self, key: PairKey) {
        self.visited.remove(&key);
    }

    /// Members of `descriptor` as listed by `lister`, cached per type name
    /// for the rest of this invocation.
    pub fn comparable_members(
        &mut self,
        lister: &dyn MemberLister,
        descriptor: &TypeDescriptor,
    ) -> Arc<[MemberDescriptor]> {
        if let Some(members) = self.member_cache.get(descriptor.name()) {
            return Arc::clone(members);
        }
        let members: Arc<[MemberDescriptor]> = lister.comparable_members(descriptor).into();
        self.member_cache
            .insert(descriptor.name().to_string(), Arc::clone(&members));
        members
    }

    pub fn into_result(self) -> ComparisonResult {
        self.result
    }

    pub(crate) fn finish(&mut self, verdict: bool, duration_ms: u64) {
        self.result.finish(verdict, duration_ms);
    }
}
