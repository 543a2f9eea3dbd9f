//! Result and error types for the core library

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core library error type
///
/// Every variant is a synchronous, caller-facing failure. Nothing here is
/// transient, so nothing is ever retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed field values (currency fields, epoch window, layouts, overflow)
    #[error("{0}")]
    Validation(String),

    #[error("unsupported currency code: {0}")]
    UnsupportedCurrency(String),

    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },

    #[error("decode error: {0}")]
    Decode(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a currency mismatch error
    pub fn mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::CurrencyMismatch {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Error taxonomy bucket for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::UnsupportedCurrency(_) | Error::UnknownTimezone(_) => ErrorKind::Lookup,
            Error::CurrencyMismatch { .. } => ErrorKind::Mismatch,
            Error::Decode(_) => ErrorKind::Decode,
        }
    }
}

/// Coarse classification used by delivery layers to pick a response class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Lookup,
    Mismatch,
    Decode,
}

impl ErrorKind {
    /// All kinds are caused by caller input; none maps to an internal failure.
    pub fn is_client_error(&self) -> bool {
        match self {
            ErrorKind::Validation | ErrorKind::Lookup | ErrorKind::Mismatch | ErrorKind::Decode => {
                true
            }
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result with optional context (for FFI serialization)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            kind: None,
            context: None,
        }
    }

    /// Create a successful result with context
    pub fn ok_with_context(data: T, context: HashMap<String, serde_json::Value>) -> Self {
        Self {
            context: Some(context),
            ..Self::ok(data)
        }
    }

    /// Create a failed result from a core error
    pub fn fail(error: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            kind: Some(error.kind()),
            context: None,
        }
    }

    /// Create a failed result with context
    pub fn fail_with_context(error: &Error, context: HashMap<String, serde_json::Value>) -> Self {
        Self {
            context: Some(context),
            ..Self::fail(error)
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::fail(&e),
        }
    }
}
