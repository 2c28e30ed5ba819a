//! Immutable field guard.
//!
//! Credentials and the environment selector come from the client configuration
//! only. The guard runs on raw caller options, before defaults are merged or any
//! schema is consulted, so an override is reported even for operations whose schema
//! does not declare the field.

use serde_json::{Map, Value};

use crate::{
    error::{BarionError, Result},
    merchant::field_map,
};

/// Fields that may never be supplied per call.
pub const IMMUTABLE_FIELDS: &[&str] = &["POSKey", "Environment"];

/// Rejects caller options that name an immutable field under any casing.
///
/// The value is irrelevant: even `null` is an override attempt.
///
/// # Errors
///
/// Returns `BarionError::ConfigurationError` naming every offending field in canonical
/// casing.
///
/// # Examples
///
/// ```
/// use barion::merchant::guard::{IMMUTABLE_FIELDS, check};
/// use serde_json::json;
///
/// let options = json!({ "poskey": "other", "PaymentId": "p-1" });
/// let err = check(options.as_object().unwrap(), IMMUTABLE_FIELDS).unwrap_err();
/// assert_eq!(err.to_string(), "configuration error: cannot override field(s): POSKey");
/// ```
pub fn check(options: &Map<String, Value>, immutable: &[&'static str]) -> Result<()> {
    let offending = field_map::intersection(immutable, options.keys());
    if offending.is_empty() {
        return Ok(());
    }
    Err(BarionError::ConfigurationError(format!(
        "cannot override field(s): {}",
        offending.join(", ")
    )))
}
