//! Transport collaborator.
//!
//! The request pipeline hands finished request objects to a [`Transport`], which
//! owns everything on the wire: query string and JSON body encoding, the HTTP
//! exchange, and turning the gateway's answer into a parsed body or an error.
//!
//! # Response handling
//!
//! Implementations must resolve with the parsed JSON body on success and fail with:
//! - `BarionError::RemoteError` when the status is not 2xx, or a 2xx body carries a
//!   non-empty `Errors` array
//! - `BarionError::TransportError` when the body is not valid JSON
//! - `BarionError::HttpError` when the request could not be sent or received
//!
//! # Examples
//!
//! ```rust,no_run
//! use barion::transport::{HttpTransport, Transport};
//! use serde_json::json;
//!
//! # async fn example() -> barion::error::Result<()> {
//! let transport = HttpTransport::new()?;
//! let query = json!({ "POSKey": "a1b2c3", "PaymentId": "64157032d3dc4296aeda9cc0ba4fa1a2" });
//!
//! let state = transport
//!     .get("https://api.test.barion.com/v2/Payment/GetPaymentState", query.as_object().unwrap())
//!     .await?;
//! println!("Status: {}", state["Status"]);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use serde_json::{Map, Value};

use crate::error::Result;

pub mod config;
pub mod http;

pub use config::HttpConfig;
pub use http::HttpTransport;

/// Sends finished requests to the gateway.
///
/// The trait is open so tests and embedders can substitute their own transport.
pub trait Transport: Send + Sync {
    /// Issues a GET with `query` encoded as the query string.
    ///
    /// # Errors
    ///
    /// See the [module documentation](self) for the error contract.
    fn get<'a>(
        &'a self,
        url: &'a str,
        query: &'a Map<String, Value>,
    ) -> impl Future<Output = Result<Value>> + Send + 'a;

    /// Issues a POST with `body` encoded as JSON.
    ///
    /// # Errors
    ///
    /// See the [module documentation](self) for the error contract.
    fn post<'a>(
        &'a self,
        url: &'a str,
        body: &'a Map<String, Value>,
    ) -> impl Future<Output = Result<Value>> + Send + 'a;
}
