//! Request orchestration.
//!
//! [`BarionClient`] ties the pipeline together for every operation:
//!
//! 1. the immutable field guard runs on the raw caller options
//! 2. the request is built in the mode selected by `ValidateModels`: strict
//!    (lenient pre-merge check, merge, strict validation) or sanitize-only
//! 3. the finished request goes to the [`Transport`] with the operation's method and
//!    the environment's URL
//!
//! A rejected call never reaches the transport. Errors are delivered unchanged,
//! whether the caller awaits the future or passes a callback.

mod callback;
mod operation;

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

pub use self::{
    callback::with_callback,
    operation::{HttpMethod, Operation},
};
use crate::{
    error::{BarionError, Result, ValidationErrors},
    merchant::{ClientConfig, Environment, MerchantDefaults, PipelineConfig, defaults},
    transport::{HttpTransport, Transport},
};

/// Client for the Barion payment gateway.
///
/// Merchant defaults are computed once, at construction, and never change.
/// A client holds no other state, so concurrent calls are independent.
///
/// # Examples
///
/// ```rust,no_run
/// use barion::BarionClient;
/// use serde_json::json;
///
/// # async fn example() -> barion::Result<()> {
/// let client = BarionClient::new(&json!({ "POSKey": "a1b2c3", "Locale": "en-US" }))?;
///
/// let payment = client
///     .start_payment(&json!({
///         "PaymentType": "Immediate",
///         "PaymentRequestId": "order-1001",
///         "Transactions": [{
///             "POSTransactionId": "order-1001-1",
///             "Payee": "shop@example.com",
///             "Total": 2500,
///             "Items": [{
///                 "Name": "Coffee beans",
///                 "Description": "1 kg arabica",
///                 "Quantity": 1,
///                 "Unit": "bag",
///                 "UnitPrice": 2500,
///                 "ItemTotal": 2500
///             }]
///         }]
///     }))
///     .await?;
///
/// println!("Redirect to: {}", payment["GatewayUrl"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BarionClient<T = HttpTransport> {
    transport: T,
    defaults: MerchantDefaults,
    pipeline: PipelineConfig,
}

impl BarionClient<HttpTransport> {
    /// Creates a client with the default HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns `BarionError::ConfigurationError` if `POSKey` is missing, the environment
    /// is not `"test"` or `"production"`, or any other option is invalid.
    pub fn new(options: &Value) -> Result<Self> {
        Self::with_transport(options, HttpTransport::new()?)
    }

    /// Creates a client from a typed configuration, honoring its `[http]` settings.
    ///
    /// # Errors
    ///
    /// Returns `BarionError::ConfigurationError` if the configuration is invalid.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::with_config(&config.http)?;
        Self::with_transport(&config.to_options(), transport)
    }

    /// Creates a client from TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns error if TOML parsing fails or configuration validation fails.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Self::from_config(&ClientConfig::from_toml(toml_str)?)
    }

    /// Creates a client from a configuration file path.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or its contents are invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            BarionError::ConfigurationError(format!("cannot read config file: {e}"))
        })?;
        Self::from_toml(&content)
    }
}

impl<T: Transport> BarionClient<T> {
    /// Creates a client that sends requests through `transport`.
    ///
    /// # Errors
    ///
    /// Same as [`BarionClient::new`].
    pub fn with_transport(options: &Value, transport: T) -> Result<Self> {
        Self::with_pipeline(options, transport, PipelineConfig::default())
    }

    /// Creates a client with explicit pipeline settings.
    ///
    /// # Errors
    ///
    /// Same as [`BarionClient::new`], checked against the pipeline's client option
    /// schema.
    pub fn with_pipeline(options: &Value, transport: T, pipeline: PipelineConfig) -> Result<Self> {
        let defaults = MerchantDefaults::from_options(options, pipeline.client_options())?;
        Ok(Self { transport, defaults, pipeline })
    }

    /// Merchant defaults frozen at construction.
    #[must_use]
    pub fn defaults(&self) -> &MerchantDefaults {
        &self.defaults
    }

    /// Gateway environment.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.defaults.environment()
    }

    /// Underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Full URL of an operation's endpoint.
    #[must_use]
    pub fn endpoint(&self, operation: Operation) -> String {
        let base = self.pipeline.base_url().unwrap_or_else(|| self.environment().base_url());
        format!("{base}{}", operation.path())
    }

    /// Runs the request pipeline without sending anything.
    ///
    /// # Errors
    ///
    /// Returns `BarionError::ConfigurationError` if an immutable field is supplied, or
    /// `BarionError::ValidationError` if the request is invalid.
    pub fn build_request(&self, operation: Operation, options: &Value) -> Result<Map<String, Value>> {
        let empty = Map::new();
        let options = match options {
            Value::Object(options) => options,
            Value::Null => &empty,
            _ => {
                return Err(BarionError::ValidationError(ValidationErrors::new(vec![
                    "\"options\" must be of type object".to_owned(),
                ])));
            }
        };
        defaults::build(
            operation.schema(),
            &self.defaults,
            options,
            self.pipeline.immutable_fields(),
            self.defaults.merge_mode(),
        )
    }

    /// Builds, validates and sends one request.
    ///
    /// `null` options are treated as an empty object.
    ///
    /// # Errors
    ///
    /// Returns the first error of the pipeline: `ConfigurationError` or
    /// `ValidationError` before anything is sent, `RemoteError`, `HttpError` or
    /// `TransportError` from the transport.
    #[instrument(skip(self, options), fields(environment = %self.environment()))]
    pub async fn call(&self, operation: Operation, options: &Value) -> Result<Value> {
        let request = self.build_request(operation, options).inspect_err(|error| {
            warn!(%error, "request rejected before sending");
        })?;

        let url = self.endpoint(operation);
        let response = match operation.method() {
            HttpMethod::Get => self.transport.get(&url, &request).await,
            HttpMethod::Post => self.transport.post(&url, &request).await,
        };

        match &response {
            Ok(_) => info!("call completed"),
            Err(error) => warn!(%error, "call failed"),
        }
        response
    }

    /// Like [`call`](Self::call), delivering the outcome to `callback` instead.
    ///
    /// The callback runs exactly once, with `(None, Some(data))` or
    /// `(Some(error), None)`.
    pub async fn call_with_callback<C>(&self, operation: Operation, options: &Value, callback: C)
    where
        C: FnOnce(Option<BarionError>, Option<Value>),
    {
        with_callback(self.call(operation, options), callback).await;
    }

    /// `POST /v2/Payment/Start`.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn start_payment(&self, options: &Value) -> Result<Value> {
        self.call(Operation::StartPayment, options).await
    }

    /// `GET /v2/Payment/GetPaymentState`.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn get_payment_state(&self, options: &Value) -> Result<Value> {
        self.call(Operation::GetPaymentState, options).await
    }

    /// `POST /v2/Payment/FinishReservation`.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn finish_reservation(&self, options: &Value) -> Result<Value> {
        self.call(Operation::FinishReservation, options).await
    }

    /// `POST /v2/Payment/Capture`.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn capture_authorized_payment(&self, options: &Value) -> Result<Value> {
        self.call(Operation::CaptureAuthorizedPayment, options).await
    }

    /// `POST /v2/Payment/CancelAuthorization`.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn cancel_authorized_payment(&self, options: &Value) -> Result<Value> {
        self.call(Operation::CancelAuthorizedPayment, options).await
    }

    /// `POST /v2/Payment/Complete`.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn complete_payment(&self, options: &Value) -> Result<Value> {
        self.call(Operation::CompletePayment, options).await
    }

    /// `POST /v2/Payment/Refund`.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn refund_payment(&self, options: &Value) -> Result<Value> {
        self.call(Operation::RefundPayment, options).await
    }

    /// `POST /v2/Withdraw/BankTransfer`.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn bank_transfer(&self, options: &Value) -> Result<Value> {
        self.call(Operation::BankTransfer, options).await
    }

    /// `POST /v2/Transfer/Send`.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn barion_transfer(&self, options: &Value) -> Result<Value> {
        self.call(Operation::BarionTransfer, options).await
    }

    /// `GET /v2/Accounts/Get`.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn get_accounts(&self, options: &Value) -> Result<Value> {
        self.call(Operation::GetAccounts, options).await
    }
}
