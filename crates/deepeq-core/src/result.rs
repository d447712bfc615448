//! Outcome of one top-level comparison.

use deepeq_core_types::InvocationId;
use serde::Serialize;

use crate::difference::Difference;
use crate::errors::Result;

/// Verdict and recorded differences of one comparison
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    invocation_id: InvocationId,
    max_differences: usize,
    are_equal: bool,
    duration_ms: u64,
    differences: Vec<Difference>,
}

impl ComparisonResult {
    pub(crate) fn new(invocation_id: InvocationId, max_differences: usize) -> Self {
        Self {
            invocation_id,
            max_differences,
            are_equal: true,
            duration_ms: 0,
            differences: Vec::new(),
        }
    }

    pub(crate) fn differences_mut(&mut self) -> &mut Vec<Difference> {
        &mut self.differences
    }

    pub(crate) fn finish(&mut self, verdict: bool, duration_ms: u64) {
        self.are_equal = verdict && self.differences.is_empty();
        self.duration_ms = duration_ms;
    }

    pub fn invocation_id(&self) -> &InvocationId {
        &self.invocation_id
    }

    pub fn max_differences(&self) -> usize {
        self.max_differences
    }

    /// True when no difference was found.
    pub fn are_equal(&self) -> bool {
        self.are_equal
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Recorded differences in discovery order.
    pub fn differences(&self) -> &[Difference] {
        &self.differences
    }

    /// True once the cap is reached; no further differences are recorded.
    pub fn exceeded_differences(&self) -> bool {
        self.differences.len() >= self.max_differences
    }

    /// Every difference's long report, in order.
    pub fn differences_string(&self) -> String {
        self.differences
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// # Errors
    ///
    /// `Serialization` if the result cannot be encoded.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
