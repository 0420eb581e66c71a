//! Error types and exit codes for marq
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (IO, serialization, store transport)
//! - 2: Usage error (bad flags/args, non-interactive terminal)
//! - 3: Data/store error (invalid record index, unconfigured store)

use thiserror::Error;

/// Exit codes for the marq CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error - invalid index, unconfigured store (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during marq operations
#[derive(Error, Debug)]
pub enum MarqError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("--format may only be specified once")]
    DuplicateFormat,

    #[error("{0}")]
    UsageError(String),

    #[error("interactive terminal required: {reason}")]
    NotInteractive { reason: String },

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data/store errors (exit code 3)
    #[error("no store URL configured (set MARQ_STORE_URL, pass --store-url, or add store_url to the config file)")]
    StoreNotConfigured,

    #[error("invalid record index: {index}")]
    InvalidIndex { index: usize },

    #[error("unknown pillar: {id}")]
    UnknownPillar { id: String },

    #[error("unknown checklist item: {id}")]
    UnknownItem { id: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("store request failed: {0}")]
    StoreTransport(String),

    #[error("store returned HTTP {status}: {body}")]
    StoreStatus { status: u16, body: String },

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl MarqError {
    /// Create an error for a failed operation with a displayable cause
    pub fn operation(operation: &str, error: impl std::fmt::Display) -> Self {
        MarqError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        MarqError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            MarqError::UnknownFormat(_)
            | MarqError::DuplicateFormat
            | MarqError::UsageError(_)
            | MarqError::NotInteractive { .. }
            | MarqError::InvalidValue { .. } => ExitCode::Usage,

            MarqError::StoreNotConfigured
            | MarqError::InvalidIndex { .. }
            | MarqError::UnknownPillar { .. }
            | MarqError::UnknownItem { .. } => ExitCode::Data,

            MarqError::Io(_)
            | MarqError::Json(_)
            | MarqError::Toml(_)
            | MarqError::StoreTransport(_)
            | MarqError::StoreStatus { .. }
            | MarqError::FailedOperation { .. }
            | MarqError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            MarqError::UnknownFormat(_) => "unknown_format",
            MarqError::DuplicateFormat => "duplicate_format",
            MarqError::UsageError(_) => "usage_error",
            MarqError::NotInteractive { .. } => "not_interactive",
            MarqError::InvalidValue { .. } => "invalid_value",
            MarqError::StoreNotConfigured => "store_not_configured",
            MarqError::InvalidIndex { .. } => "invalid_index",
            MarqError::UnknownPillar { .. } => "unknown_pillar",
            MarqError::UnknownItem { .. } => "unknown_item",
            MarqError::Io(_) => "io_error",
            MarqError::Json(_) => "json_error",
            MarqError::Toml(_) => "toml_error",
            MarqError::StoreTransport(_) => "store_transport",
            MarqError::StoreStatus { .. } => "store_status",
            MarqError::FailedOperation { .. } => "failed_operation",
            MarqError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for marq operations
pub type Result<T> = std::result::Result<T, MarqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(
            MarqError::UnknownFormat("xml".into()).exit_code(),
            ExitCode::Usage
        );
        assert_eq!(
            MarqError::InvalidIndex { index: 5 }.exit_code(),
            ExitCode::Data
        );
        assert_eq!(MarqError::StoreNotConfigured.exit_code(), ExitCode::Data);
        assert_eq!(
            MarqError::StoreTransport("connection refused".into()).exit_code(),
            ExitCode::Failure
        );
    }

    #[test]
    fn test_to_json_envelope() {
        let err = MarqError::InvalidIndex { index: 3 };
        let json = err.to_json();
        assert_eq!(json["error"]["code"], 3);
        assert_eq!(json["error"]["type"], "invalid_index");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("invalid record index: 3"));
    }
}
