//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_INVOCATION_ID: &str = "invocation_id";

// Traversal context
pub const FIELD_PATH: &str = "path";
pub const FIELD_COMPARER: &str = "comparer";
pub const FIELD_LEFT_TYPE: &str = "left_type";
pub const FIELD_RIGHT_TYPE: &str = "right_type";

// Result summary
pub const FIELD_DIFF_COUNT: &str = "diff_count";
pub const FIELD_ARE_EQUAL: &str = "are_equal";
pub const FIELD_EXCEEDED: &str = "exceeded";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Canonical operation names
pub const OP_COMPARE: &str = "compare";
