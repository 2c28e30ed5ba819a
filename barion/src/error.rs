//! Error types for the Barion client.
//!
//! Every fallible operation in this crate returns [`Result<T>`], whose error
//! type is [`BarionError`]. Errors are terminal: the client never retries and
//! never wraps an error a second time on its way to the caller.
//!
//! # Error Categories
//!
//! - **Local rejections** ([`BarionError::ConfigurationError`],
//!   [`BarionError::ValidationError`]): raised before any network call is made
//! - **Remote rejections** ([`BarionError::RemoteError`]): the gateway answered but reported
//!   errors
//! - **Transport failures** ([`BarionError::HttpError`], [`BarionError::TransportError`]): the
//!   request could not be sent or the answer could not be read
//!
//! # Examples
//!
//! ```
//! use barion::error::{BarionError, ValidationErrors};
//!
//! let err = BarionError::ValidationError(ValidationErrors::new(vec![
//!     "\"PaymentId\" is required".to_owned(),
//! ]));
//! assert_eq!(err.to_string(), "validation failed: \"PaymentId\" is required");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, BarionError>;

/// Errors that can occur while building or sending a Barion request.
///
/// # Error Recovery
///
/// - **Configuration errors** ([`ConfigurationError`](Self::ConfigurationError)): fix the client
///   construction options or stop overriding merchant-level fields per call
/// - **Validation errors** ([`ValidationError`](Self::ValidationError)): fix the listed fields
/// - **Remote errors** ([`RemoteError`](Self::RemoteError)): inspect the gateway's error codes
/// - **Transport errors** ([`HttpError`](Self::HttpError),
///   [`TransportError`](Self::TransportError)): check connectivity; the client does not retry
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum BarionError {
    /// Invalid client options, or a per-call attempt to override an immutable field.
    ///
    /// # Examples
    ///
    /// ```
    /// use barion::error::BarionError;
    ///
    /// let err = BarionError::ConfigurationError("cannot override field(s): POSKey".to_owned());
    /// assert!(err.to_string().contains("POSKey"));
    /// ```
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    /// The request candidate failed schema validation.
    ///
    /// Carries one human-readable message per violated constraint, in the order the
    /// schema declares its fields.
    #[error("validation failed: {0}")]
    ValidationError(ValidationErrors),

    /// The gateway rejected the request.
    #[error("{0}")]
    RemoteError(RemoteError),

    /// HTTP request could not be sent or its response could not be received.
    ///
    /// Wraps [`reqwest::Error`]: connection refused, DNS failure, TLS failure, timeout.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The gateway's response could not be interpreted.
    #[error("transport error: {0}")]
    TransportError(String),
}

impl BarionError {
    /// Returns the validation messages if this is a validation error.
    #[must_use]
    pub fn validation_messages(&self) -> Option<&[String]> {
        match self {
            Self::ValidationError(errors) => Some(errors.messages()),
            _ => None,
        }
    }

    /// Returns true if the error was raised locally, before any request was sent.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::ConfigurationError(_) | Self::ValidationError(_))
    }
}

/// Ordered list of schema violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    /// Wraps a list of messages.
    #[must_use]
    pub fn new(messages: Vec<String>) -> Self {
        Self(messages)
    }

    /// Returns the messages in the order they were recorded.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// Returns the number of recorded violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the list and returns the messages.
    #[must_use]
    pub fn into_messages(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

/// Rejection reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// HTTP status of the response.
    pub status: u16,
    /// Error entries exactly as the gateway returned them.
    pub errors: Vec<ApiError>,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gateway returned status {}", self.status)?;
        let mut entries = self.errors.iter();
        if let Some(first) = entries.next() {
            write!(f, ": {first}")?;
            for entry in entries {
                write!(f, "; {entry}")?;
            }
        }
        Ok(())
    }
}

/// One entry of the gateway's `Errors` array.
///
/// Keys the client does not know about are kept in [`extra`](Self::extra), so the
/// entry can be serialized back without loss.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiError {
    /// Short error title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Machine-readable error code, e.g. `ModelValidationError`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Timestamp of the failure as reported by the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub happened_at: Option<String>,
    /// Authentication data echoed by the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_data: Option<String>,
    /// Endpoint that produced the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_point: Option<String>,
    /// Payment the error relates to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    /// Any other keys of the entry.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.error_code.as_deref().unwrap_or("UnknownError");
        match (&self.title, &self.description) {
            (Some(title), Some(description)) => write!(f, "[{code}] {title}: {description}"),
            (Some(text), None) | (None, Some(text)) => write!(f, "[{code}] {text}"),
            (None, None) => write!(f, "[{code}]"),
        }
    }
}
