//! Root dispatcher.
//!
//! [`RootComparer`] routes every pair of values to a type comparer, applies
//! the runtime type policy, and keeps recursion finite through the session's
//! visited-pair cache. It holds only immutable strategy tables, so a single
//! instance can serve any number of comparisons on any number of threads;
//! all per-comparison state lives in a [`ComparisonSession`].
//!
//! ## Logging Ownership
//!
//! [`RootComparer::compare_values`] owns lifecycle logging for a comparison
//! (`log_op_start!`, `log_op_end!`, `log_op_error!`). Traversal below it only
//! emits `debug!`/`trace!` events.

use std::sync::{Arc, OnceLock};

use deepeq_core_types::schema::OP_COMPARE;
use deepeq_core_types::InvocationId;
use tracing::{debug, trace};

use crate::comparers::{built_in, TypeComparer};
use crate::config::ComparisonConfig;
use crate::difference::Difference;
use crate::errors::{DeepEqError, Result};
use crate::members::{DeclaredMemberLister, MemberLister};
use crate::parms::CompareParms;
use crate::result::ComparisonResult;
use crate::session::{ComparisonSession, PairKey, VisitState};
use crate::value::{RuntimeType, Value};
use crate::{log_op_end, log_op_error, log_op_start};

/// Strategy registry and dispatch policy
pub struct RootComparer {
    type_comparers: Vec<Arc<dyn TypeComparer>>,
    member_lister: Arc<dyn MemberLister>,
}

impl Default for RootComparer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RootComparer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.type_comparers.iter().map(|c| c.name()).collect();
        f.debug_struct("RootComparer")
            .field("type_comparers", &names)
            .finish_non_exhaustive()
    }
}

enum Dispatch {
    Custom(Arc<dyn TypeComparer>),
    BuiltIn(Arc<dyn TypeComparer>),
    None,
}

impl RootComparer {
    /// Built-in comparers and the declared-member lister.
    pub fn new() -> Self {
        Self {
            type_comparers: built_in(),
            member_lister: Arc::new(DeclaredMemberLister),
        }
    }

    /// Replace the member lister.
    pub fn with_member_lister(mut self, lister: Arc<dyn MemberLister>) -> Self {
        self.member_lister = lister;
        self
    }

    pub fn member_lister(&self) -> &dyn MemberLister {
        self.member_lister.as_ref()
    }

    pub fn type_comparers(&self) -> &[Arc<dyn TypeComparer>] {
        &self.type_comparers
    }

    /// Compare two graphs from the top.
    ///
    /// Builds a fresh session, compares, and returns the finished result.
    /// Logs `start` and then `end` or `end_error` for op `compare`.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for an invalid configuration; `UnsupportedType`,
    /// `InvalidIndexer`, `ObjectDisposed` and `AggregatorMisuse` raised during
    /// traversal. No partial result is returned on error.
    pub fn compare_values(
        &self,
        left: &Value,
        right: &Value,
        config: &ComparisonConfig,
    ) -> Result<ComparisonResult> {
        let invocation_id = InvocationId::new();
        log_op_start!(OP_COMPARE, invocation_id = invocation_id.as_str());
        let start = std::time::Instant::now();

        let result = self
            .compare_values_impl(left, right, config, invocation_id.clone(), start)
            .map_err(|e| {
                log_op_error!(
                    OP_COMPARE,
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    invocation_id = invocation_id.as_str()
                );
                e
            })?;

        log_op_end!(
            OP_COMPARE,
            duration_ms = result.duration_ms(),
            invocation_id = invocation_id.as_str(),
            diff_count = result.differences().len() as u64,
            are_equal = result.are_equal(),
            exceeded = result.exceeded_differences()
        );

        Ok(result)
    }

    fn compare_values_impl(
        &self,
        left: &Value,
        right: &Value,
        config: &ComparisonConfig,
        invocation_id: InvocationId,
        start: std::time::Instant,
    ) -> Result<ComparisonResult> {
        config.validate()?;
        let mut session = ComparisonSession::new(invocation_id, config.max_differences);
        let parms = CompareParms::root(left.clone(), right.clone(), config);
        let verdict = self.compare(&parms, &mut session)?;
        session.finish(verdict, start.elapsed().as_millis() as u64);
        Ok(session.into_result())
    }

    /// Compare the pair in `parms`, recording differences on `session`.
    ///
    /// This is the recursion entry point for type comparers.
    ///
    /// # Errors
    ///
    /// See [`compare_values`](RootComparer::compare_values).
    pub fn compare(&self, parms: &CompareParms<'_>, session: &mut ComparisonSession) -> Result<bool> {
        if parms.both_null() {
            return Ok(true);
        }

        let key = match (parms.left().identity(), parms.right().identity()) {
            (Some(left), Some(right)) => Some(PairKey { left, right }),
            _ => None,
        };

        if let Some(key) = key {
            match session.visit_state(key) {
                Some(VisitState::Done { equal, .. }) => {
                    trace!(path = %parms.path(), equal, "visited pair cache hit");
                    return Ok(equal);
                }
                Some(VisitState::InProgress) => {
                    debug!(path = %parms.path(), "cycle detected, pair assumed equal");
                    return Ok(true);
                }
                None => session.begin_visit(key),
            }
        }

        let before = session.difference_count();
        let outcome = self.dispatch(parms, session);

        let verdict = match outcome {
            Ok(verdict) => verdict,
            Err(DeepEqError::ObjectDisposed { .. }) if parms.config().ignore_object_disposed => {
                debug!(path = %parms.path(), "disposed object judged equal");
                true
            }
            Err(err) => {
                if let Some(key) = key {
                    session.abandon_visit(key);
                }
                return Err(err);
            }
        };

        if let Some(key) = key {
            let truncated = !verdict
                && session.exceeded_differences()
                && session.difference_count() == before;
            if truncated {
                session.abandon_visit(key);
            } else {
                session.finish_visit(key, verdict);
            }
        }
        Ok(verdict)
    }

    fn select(&self, parms: &CompareParms<'_>) -> Dispatch {
        let (left, right) = (parms.left_type(), parms.right_type());
        if let Some(custom) = parms
            .config()
            .custom_comparers
            .iter()
            .find(|c| c.is_type_match(left, right))
        {
            return Dispatch::Custom(Arc::clone(custom));
        }
        match self
            .type_comparers
            .iter()
            .find(|c| c.is_type_match(left, right))
        {
            Some(comparer) => Dispatch::BuiltIn(Arc::clone(comparer)),
            None => Dispatch::None,
        }
    }

    fn dispatch(&self, parms: &CompareParms<'_>, session: &mut ComparisonSession) -> Result<bool> {
        let config = parms.config();
        match self.select(parms) {
            Dispatch::Custom(comparer) => {
                trace!(path = %parms.path(), comparer = comparer.name(), "custom comparer selected");
                comparer.compare_type(self, parms, session)
            }
            Dispatch::BuiltIn(comparer) => {
                if !config.ignore_object_types && parms.types_differ() {
                    session.add_difference(Difference::different_types(parms));
                    return Ok(false);
                }
                trace!(path = %parms.path(), comparer = comparer.name(), "built-in comparer selected");
                comparer.compare_type(self, parms, session)
            }
            Dispatch::None => self.unmatched(parms, session),
        }
    }

    /// No comparer accepts the pair.
    fn unmatched(&self, parms: &CompareParms<'_>, session: &mut ComparisonSession) -> Result<bool> {
        if parms.either_null() {
            session.add_difference(Difference::from_parms(parms));
            return Ok(false);
        }

        if parms.config().ignore_object_types {
            if parms.left().native_eq(parms.right()) {
                return Ok(true);
            }
            session.add_difference(Difference::from_parms(parms));
            return Ok(false);
        }

        for ty in [parms.left_type(), parms.right_type()].into_iter().flatten() {
            if !self.recognises(ty, parms.config()) {
                return Err(DeepEqError::UnsupportedType {
                    type_name: ty.name().to_string(),
                    path: parms.path().to_string(),
                });
            }
        }

        session.add_difference(Difference::different_types(parms));
        Ok(false)
    }

    /// Whether any comparer would handle two values of type `ty`.
    fn recognises(&self, ty: &RuntimeType, config: &ComparisonConfig) -> bool {
        config
            .custom_comparers
            .iter()
            .chain(self.type_comparers.iter())
            .any(|c| c.is_type_match(Some(ty), Some(ty)))
    }
}

fn shared_root() -> &'static RootComparer {
    static ROOT: OnceLock<RootComparer> = OnceLock::new();
    ROOT.get_or_init(RootComparer::new)
}

/// Compare two graphs with the built-in comparers.
///
/// # Errors
///
/// See [`RootComparer::compare_values`].
pub fn compare(left: &Value, right: &Value, config: &ComparisonConfig) -> Result<ComparisonResult> {
    shared_root().compare_values(left, right, config)
}

/// A configuration bundled with the comparison entry point
///
/// ```
/// use deepeq_core::{CompareLogic, Value};
///
/// let logic = CompareLogic::new();
/// let result = logic.compare(&Value::from(1), &Value::from(1)).unwrap();
/// assert!(result.are_equal());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CompareLogic {
    pub config: ComparisonConfig,
}

impl CompareLogic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ComparisonConfig) -> Self {
        Self { config }
    }

    /// # Errors
    ///
    /// See [`RootComparer::compare_values`].
    pub fn compare(&self, expected: &Value, actual: &Value) -> Result<ComparisonResult> {
        compare(expected, actual, &self.config)
    }

    /// Compare and fail on the first mismatch.
    ///
    /// # Errors
    ///
    /// [`DeepEqError::Difference`] carrying the first recorded difference
    /// when the graphs are not equal, otherwise as [`CompareLogic::compare`].
    pub fn assert_equal(&self, expected: &Value, actual: &Value) -> Result<()> {
        let result = self.compare(expected, actual)?;
        if result.are_equal() {
            return Ok(());
        }
        let difference = match result.differences().first() {
            Some(first) => first.clone(),
            None => Difference::from_parms(&CompareParms::root(
                expected.clone(),
                actual.clone(),
                &self.config,
            )),
        };
        Err(DeepEqError::Difference(Box::new(difference)))
    }
}
