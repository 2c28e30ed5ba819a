//! Barion: a client for the Barion payment gateway.
//!
//! Every operation takes a loosely-typed JSON options object, merges it with the
//! merchant defaults given at construction, validates the result against the
//! operation's schema and sends it to the gateway.
//!
//! # Request Pipeline
//!
//! ```text
//! caller options
//!      │
//!      ▼
//! ┌──────────────────┐   POSKey / Environment supplied per call
//! │ immutable guard  │──────────────────────────────► ConfigurationError
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐   ValidateModels = false
//! │ lenient check    │──────────┐
//! └────────┬─────────┘          │
//!          ▼                    ▼
//! ┌──────────────────┐   ┌──────────────────┐
//! │ merge defaults   │   │ merge defaults   │
//! └────────┬─────────┘   └────────┬─────────┘
//!          ▼                      │
//! ┌──────────────────┐            │
//! │ strict validate  │──► ValidationError
//! └────────┬─────────┘            │
//!          ▼                      ▼
//! ┌─────────────────────────────────────────┐
//! │ transport (GET query / POST JSON body)  │──► RemoteError / HttpError / TransportError
//! └─────────────────────────────────────────┘
//! ```
//!
//! Field names are matched case-insensitively throughout: `poskey`, `POSKEY` and
//! `POSKey` are the same field.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use barion::BarionClient;
//! use serde_json::json;
//!
//! # async fn example() -> barion::Result<()> {
//! let client = BarionClient::new(&json!({ "POSKey": "a1b2c3" }))?;
//!
//! let state = client
//!     .get_payment_state(&json!({ "PaymentId": "64157032d3dc4296aeda9cc0ba4fa1a2" }))
//!     .await?;
//! println!("Status: {}", state["Status"]);
//! # Ok(())
//! # }
//! ```
//!
//! Clients can also be configured from TOML:
//!
//! ```rust,no_run
//! use barion::BarionClient;
//!
//! # fn example() -> barion::Result<()> {
//! let client = BarionClient::from_toml(r#"
//!     pos_key = "a1b2c3"
//!     environment = "production"
//!     currency = "EUR"
//!
//!     [http]
//!     timeout_secs = 20
//! "#)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`client`]: operations, endpoint binding, callback delivery
//! - [`merchant`]: client configuration, merchant defaults, immutable field guard,
//!   case-insensitive field matching
//! - [`schema`]: schema model and validator
//! - [`schemas`]: request schemas of the Barion v2 API
//! - [`transport`]: transport trait and the reqwest implementation
//! - [`error`]: error types
//!
//! # Error Handling
//!
//! All operations return [`Result<T, BarionError>`](error::Result):
//!
//! ```rust
//! use barion::{BarionClient, BarionError};
//! use serde_json::json;
//!
//! # async fn example(client: BarionClient) {
//! match client.refund_payment(&json!({ "PaymentId": "64157032d3dc4296aeda9cc0ba4fa1a2" })).await {
//!     Ok(refund) => println!("Refunded: {refund}"),
//!     Err(BarionError::ValidationError(errors)) => {
//!         for message in errors.messages() {
//!             eprintln!("invalid request: {message}");
//!         }
//!     }
//!     Err(BarionError::RemoteError(remote)) => eprintln!("gateway rejected: {remote}"),
//!     Err(e) => eprintln!("other error: {e}"),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and wiremock"
)]

pub mod client;
pub mod error;
pub mod merchant;
pub mod schema;
pub mod schemas;
pub mod transport;

pub use client::{BarionClient, Operation};
pub use error::{BarionError, Result};
pub use merchant::{ClientConfig, Environment, PipelineConfig};
