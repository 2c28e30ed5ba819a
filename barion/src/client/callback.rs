//! Callback-style delivery on top of the future-based core.

#[allow(
    redundant_imports,
    reason = "Future needed for generic bounds despite being in Edition 2024 prelude"
)]
use std::future::Future;

use serde_json::Value;

use crate::error::{BarionError, Result};

/// Awaits `future` and hands its outcome to `callback` exactly once.
///
/// On success the callback receives `(None, Some(value))`, on failure
/// `(Some(error), None)`. The error is moved through unchanged.
///
/// # Examples
///
/// ```
/// use barion::client::with_callback;
/// use serde_json::json;
///
/// # async fn example() {
/// with_callback(async { Ok(json!({ "Status": "Prepared" })) }, |err, data| {
///     assert!(err.is_none());
///     assert_eq!(data.unwrap()["Status"], "Prepared");
/// })
/// .await;
/// # }
/// ```
pub async fn with_callback<F, C>(future: F, callback: C)
where
    F: Future<Output = Result<Value>>,
    C: FnOnce(Option<BarionError>, Option<Value>),
{
    match future.await {
        Ok(value) => callback(None, Some(value)),
        Err(error) => callback(Some(error), None),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::RemoteError;

    #[tokio::test]
    async fn test_success_delivers_data() {
        let mut calls = 0;
        with_callback(async { Ok(json!({ "PaymentId": "p-1" })) }, |err, data| {
            calls += 1;
            assert!(err.is_none());
            assert_eq!(data, Some(json!({ "PaymentId": "p-1" })));
        })
        .await;
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_failure_delivers_error_unchanged() {
        let remote = RemoteError { status: 400, errors: Vec::new() };
        let expected = remote.clone();
        let mut calls = 0;
        with_callback(async move { Err(BarionError::RemoteError(remote)) }, |err, data| {
            calls += 1;
            assert!(data.is_none());
            let Some(BarionError::RemoteError(received)) = err else {
                panic!("expected remote error");
            };
            assert_eq!(received, expected);
        })
        .await;
        assert_eq!(calls, 1);
    }
}
