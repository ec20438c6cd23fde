//! Error types for stack auditing.
//!
//! Provider calls fail with a [`ProviderError`] carrying the provider's error
//! code. The auditor recovers exactly one of those codes locally (access
//! denial on a template fetch) and wraps everything else into [`AuditError`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Error code the provider uses for an authorization denial.
pub const ACCESS_DENIED_CODE: &str = "AccessDenied";

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AuditError>;

/// The provider call an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// A page of the stack listing.
    ListStacks,
    /// A single template fetch.
    GetTemplate,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListStacks => write!(f, "ListStacks"),
            Self::GetTemplate => write!(f, "GetTemplate"),
        }
    }
}

/// A failed provider call, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ProviderError {
    /// Provider error code (e.g. "AccessDenied", "Throttling").
    pub code: String,
    /// Human readable message.
    pub message: String,
}

impl ProviderError {
    /// Creates a new provider error.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates an access-denied error.
    #[must_use]
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(ACCESS_DENIED_CODE, message)
    }

    /// Whether this error is an authorization denial.
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        self.code == ACCESS_DENIED_CODE
    }
}

/// Error returned by a user supplied template filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FilterError {
    /// The error message.
    pub message: String,
}

impl FilterError {
    /// Creates a new filter error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The main error type for audit operations.
#[derive(Debug, Error)]
pub enum AuditError {
    /// A provider call failed with anything other than a recoverable denial.
    #[error("{operation} failed in {region}: {source}")]
    Transport {
        /// Region the call was made against.
        region: String,
        /// The failing call.
        operation: Operation,
        /// The provider's error.
        #[source]
        source: ProviderError,
    },

    /// The template filter returned an error.
    #[error("Template filter failed for stack '{stack_name}' in {region}: {source}")]
    FilterPredicate {
        /// Region of the stack.
        region: String,
        /// Stack whose template was being filtered.
        stack_name: String,
        /// The filter's error.
        #[source]
        source: FilterError,
    },

    /// A provider call exceeded the configured request timeout.
    #[error("{operation} timed out in {region} after {timeout_seconds}s")]
    Timeout {
        /// Region the call was made against.
        region: String,
        /// The call that timed out.
        operation: Operation,
        /// The configured timeout.
        timeout_seconds: f64,
    },

    /// The auditor configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AuditError {
    /// Creates a transport error.
    #[must_use]
    pub fn transport(region: impl Into<String>, operation: Operation, source: ProviderError) -> Self {
        Self::Transport {
            region: region.into(),
            operation,
            source,
        }
    }

    /// Creates a filter predicate error.
    #[must_use]
    pub fn filter(
        region: impl Into<String>,
        stack_name: impl Into<String>,
        source: FilterError,
    ) -> Self {
        Self::FilterPredicate {
            region: region.into(),
            stack_name: stack_name.into(),
            source,
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(region: impl Into<String>, operation: Operation, timeout_seconds: f64) -> Self {
        Self::Timeout {
            region: region.into(),
            operation,
            timeout_seconds,
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Returns the underlying provider error, if this is a transport failure.
    #[must_use]
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Transport { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Returns the region the error occurred in, if any.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        match self {
            Self::Transport { region, .. }
            | Self::FilterPredicate { region, .. }
            | Self::Timeout { region, .. } => Some(region),
            Self::InvalidConfig(_) => None,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        match self {
            Self::Transport { region, operation, source } => {
                map.insert("type".to_string(), serde_json::json!("Transport"));
                map.insert("region".to_string(), serde_json::json!(region));
                map.insert("operation".to_string(), serde_json::json!(operation.to_string()));
                map.insert("code".to_string(), serde_json::json!(source.code));
            }
            Self::FilterPredicate { region, stack_name, .. } => {
                map.insert("type".to_string(), serde_json::json!("FilterPredicate"));
                map.insert("region".to_string(), serde_json::json!(region));
                map.insert("stack_name".to_string(), serde_json::json!(stack_name));
            }
            Self::Timeout { region, operation, timeout_seconds } => {
                map.insert("type".to_string(), serde_json::json!("Timeout"));
                map.insert("region".to_string(), serde_json::json!(region));
                map.insert("operation".to_string(), serde_json::json!(operation.to_string()));
                map.insert("timeout_seconds".to_string(), serde_json::json!(timeout_seconds));
            }
            Self::InvalidConfig(_) => {
                map.insert("type".to_string(), serde_json::json!("InvalidConfig"));
            }
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}
