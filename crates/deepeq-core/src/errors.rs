use thiserror::Error;

use crate::difference::Difference;

/// Result type alias using DeepEqError
pub type Result<T> = std::result::Result<T, DeepEqError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// testing and log correlation. Structural mismatches between compared values
/// are never errors; they are recorded as differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Traversal
    UnsupportedType,
    InvalidIndexer,
    ObjectDisposed,

    // Aggregation
    AggregatorMisuse,

    // Assertion
    Difference,

    // Configuration
    InvalidConfig,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::UnsupportedType => "ERR_UNSUPPORTED_TYPE",
            ExErrorKind::InvalidIndexer => "ERR_INVALID_INDEXER",
            ExErrorKind::ObjectDisposed => "ERR_OBJECT_DISPOSED",
            ExErrorKind::AggregatorMisuse => "ERR_AGGREGATOR_MISUSE",
            ExErrorKind::Difference => "ERR_DIFFERENCE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the traversal context (operation, path,
/// runtime type) the failure was raised in.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    type_name: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            type_name: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add breadcrumb path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add runtime type context
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the type name context, if any
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            if !path.is_empty() {
                write!(f, " (path: {})", path)?;
            }
        }
        if let Some(type_name) = &self.type_name {
            write!(f, " (type: {})", type_name)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

// ========== End Error Facility ==========

/// Errors that abort a top-level comparison
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeepEqError {
    /// A present value whose shape no registered comparer recognises
    #[error("Cannot compare object of type {type_name} at '{path}'")]
    UnsupportedType { type_name: String, path: String },

    /// Indexed member that cannot be walked element by element
    #[error("Invalid indexer {member} at '{path}': {reason}")]
    InvalidIndexer {
        path: String,
        member: String,
        reason: String,
    },

    /// A member was read from an object its host already released
    #[error("Cannot read {member} of disposed {type_name} at '{path}'")]
    ObjectDisposed {
        type_name: String,
        member: String,
        path: String,
    },

    /// Difference bookkeeping was violated (interleaved capture scopes)
    #[error("Comparison result misuse: {message}")]
    AggregatorMisuse { message: String },

    /// Two graphs asserted equal are not; carries the first mismatch
    #[error("Difference found: {}", .0.short_item())]
    Difference(Box<Difference>),

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DeepEqError {
    /// Attach the breadcrumb path of the node being compared, if the error
    /// does not carry one yet.
    pub fn at_path(self, at: &str) -> Self {
        match self {
            DeepEqError::ObjectDisposed {
                type_name,
                member,
                path,
            } if path.is_empty() => DeepEqError::ObjectDisposed {
                type_name,
                member,
                path: at.to_string(),
            },
            other => other,
        }
    }

    /// Stable error kind
    pub fn kind(&self) -> ExErrorKind {
        match self {
            DeepEqError::UnsupportedType { .. } => ExErrorKind::UnsupportedType,
            DeepEqError::InvalidIndexer { .. } => ExErrorKind::InvalidIndexer,
            DeepEqError::ObjectDisposed { .. } => ExErrorKind::ObjectDisposed,
            DeepEqError::AggregatorMisuse { .. } => ExErrorKind::AggregatorMisuse,
            DeepEqError::Difference(_) => ExErrorKind::Difference,
            DeepEqError::InvalidConfig { .. } => ExErrorKind::InvalidConfig,
            DeepEqError::Serialization { .. } => ExErrorKind::Serialization,
            DeepEqError::Internal { .. } => ExErrorKind::Internal,
        }
    }
}

/// Conversion from DeepEqError to ExError
impl From<DeepEqError> for ExError {
    fn from(err: DeepEqError) -> Self {
        match err {
            DeepEqError::UnsupportedType { type_name, path } => {
                ExError::new(ExErrorKind::UnsupportedType)
                    .with_path(path)
                    .with_message(format!("Cannot compare object of type {}", type_name))
                    .with_type_name(type_name)
            }

            DeepEqError::InvalidIndexer {
                path,
                member,
                reason,
            } => ExError::new(ExErrorKind::InvalidIndexer)
                .with_path(path)
                .with_message(format!("Indexer {}: {}", member, reason)),

            DeepEqError::ObjectDisposed {
                type_name,
                member,
                path,
            } => ExError::new(ExErrorKind::ObjectDisposed)
                .with_path(path)
                .with_type_name(type_name)
                .with_message(format!("Member {} read after dispose", member)),

            DeepEqError::AggregatorMisuse { message } => {
                ExError::new(ExErrorKind::AggregatorMisuse).with_message(message)
            }

            DeepEqError::Difference(difference) => ExError::new(ExErrorKind::Difference)
                .with_op("assert_equal")
                .with_path(difference.path())
                .with_type_name(difference.left_type_name())
                .with_message(difference.short_item()),

            DeepEqError::InvalidConfig { reason } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op("validate_config")
                .with_message(reason),

            DeepEqError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            DeepEqError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to DeepEqError
impl From<serde_json::Error> for DeepEqError {
    fn from(err: serde_json::Error) -> Self {
        DeepEqError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::UnsupportedType, "ERR_UNSUPPORTED_TYPE"),
            (ExErrorKind::InvalidIndexer, "ERR_INVALID_INDEXER"),
            (ExErrorKind::ObjectDisposed, "ERR_OBJECT_DISPOSED"),
            (ExErrorKind::AggregatorMisuse, "ERR_AGGREGATOR_MISUSE"),
            (ExErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
            (ExErrorKind::Difference, "ERR_DIFFERENCE"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_at_path_fills_only_empty_paths() {
        let err = DeepEqError::ObjectDisposed {
            type_name: "Conn".into(),
            member: "Port".into(),
            path: String::new(),
        }
        .at_path("Server.Conn");
        assert!(matches!(err, DeepEqError::ObjectDisposed { ref path, .. } if path == "Server.Conn"));

        let again = err.at_path("Other");
        assert!(matches!(again, DeepEqError::ObjectDisposed { ref path, .. } if path == "Server.Conn"));
    }

    #[test]
    fn test_kind_matches_conversion() {
        let err = DeepEqError::InvalidConfig {
            reason: "max_differences must be at least 1".into(),
        };
        let kind = err.kind();
        let ex: ExError = err.into();
        assert_eq!(ex.kind(), kind);
        assert_eq!(ex.op(), Some("validate_config"));
    }
}
