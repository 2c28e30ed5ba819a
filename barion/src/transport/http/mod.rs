//! HTTP transport implementation using reqwest.

use std::{sync::LazyLock, time::Duration};

use reqwest::{Client, RequestBuilder};
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use url::Url;

use super::config::HttpConfig;
use crate::{
    error::{ApiError, BarionError, RemoteError, Result},
    transport::Transport,
};

/// Default HTTP client with connection pooling enabled.
///
/// Shared by every [`HttpTransport::new`] so default transports reuse connections.
static DEFAULT_HTTP_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    let config = HttpConfig::default();
    Client::builder()
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .user_agent(config.user_agent)
        .build()
        .expect("Failed to create default HTTP client")
});

/// Parses `url`, accepting only `http` and `https`.
fn parse_url(url: &str) -> Result<Url> {
    let parsed =
        Url::parse(url).map_err(|e| BarionError::TransportError(format!("invalid URL '{url}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(BarionError::TransportError(format!(
            "unsupported URL scheme: {}",
            parsed.scheme()
        )));
    }
    Ok(parsed)
}

/// Appends `query` to `url` as a query string.
///
/// Scalars are written as their plain text, arrays repeat the key once per element,
/// nested objects are written as JSON, and `null` values are skipped.
fn append_query(url: &mut Url, query: &Map<String, Value>) {
    let mut pairs = url.query_pairs_mut();
    for (key, value) in query {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items.iter().filter(|item| !item.is_null()) {
                    pairs.append_pair(key, &query_text(item));
                }
            }
            _ => {
                pairs.append_pair(key, &query_text(value));
            }
        }
    }
    drop(pairs);
    if url.query() == Some("") {
        url.set_query(None);
    }
}

fn query_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Interprets a gateway response.
///
/// The gateway reports business failures in an `Errors` array, sometimes with a 2xx
/// status, so both the status and the body are checked.
fn interpret_response(status: u16, body: &[u8]) -> Result<Value> {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let success = (200..300).contains(&status);

    let Some(parsed) = parsed else {
        if success {
            return Err(BarionError::TransportError(format!(
                "response body is not valid JSON (status {status})"
            )));
        }
        return Err(BarionError::RemoteError(RemoteError { status, errors: Vec::new() }));
    };

    let errors = parsed
        .get("Errors")
        .or_else(|| parsed.get("errors"))
        .and_then(Value::as_array)
        .map(|entries| entries.iter().map(api_error).collect::<Vec<_>>())
        .unwrap_or_default();

    if !success || !errors.is_empty() {
        return Err(BarionError::RemoteError(RemoteError { status, errors }));
    }
    Ok(parsed)
}

fn api_error(entry: &Value) -> ApiError {
    serde_json::from_value(entry.clone()).unwrap_or_else(|_| ApiError {
        description: Some(entry.to_string()),
        ..ApiError::default()
    })
}

/// HTTP transport using reqwest.
///
/// Supports connection pooling and keep-alive. Requests are sent once; failures are
/// never retried.
///
/// # Examples
///
/// ```
/// use barion::transport::{HttpConfig, HttpTransport};
///
/// let config = HttpConfig { timeout_secs: 60, ..HttpConfig::default() };
/// let transport = HttpTransport::with_config(&config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a new HTTP transport with default settings.
    ///
    /// Uses a shared singleton client for connection pooling efficiency.
    ///
    /// # Errors
    ///
    /// This method is infallible but returns `Result` for API consistency.
    pub fn new() -> Result<Self> {
        Ok(Self { client: DEFAULT_HTTP_CLIENT.clone() })
    }

    /// Creates HTTP transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `BarionError::ConfigurationError` if the configuration is out of bounds,
    /// or `BarionError::HttpError` if the HTTP client cannot be built.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(BarionError::HttpError)?;
        Ok(Self { client })
    }

    #[instrument(skip(self, url, request), fields(path = %url.path()))]
    async fn execute(&self, method: &'static str, url: &Url, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(BarionError::HttpError)?;
        debug!(status, bytes = body.len(), "gateway responded");
        interpret_response(status, &body)
    }
}

impl Transport for HttpTransport {
    async fn get<'a>(&'a self, url: &'a str, query: &'a Map<String, Value>) -> Result<Value> {
        let mut url = parse_url(url)?;
        append_query(&mut url, query);
        let request = self.client.get(url.clone());
        self.execute("GET", &url, request).await
    }

    async fn post<'a>(&'a self, url: &'a str, body: &'a Map<String, Value>) -> Result<Value> {
        let url = parse_url(url)?;
        let request = self.client.post(url.clone()).json(body);
        self.execute("POST", &url, request).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path, query_param},
    };

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_http_transport_new() {
        assert!(HttpTransport::new().is_ok());
    }

    #[test]
    fn test_http_transport_with_config() {
        let config = HttpConfig { pool_max_idle_per_host: 0, timeout_secs: 5, ..Default::default() };
        assert!(HttpTransport::with_config(&config).is_ok());

        let invalid = HttpConfig { timeout_secs: 0, ..Default::default() };
        assert!(matches!(HttpTransport::with_config(&invalid), Err(BarionError::ConfigurationError(_))));
    }

    #[test]
    fn test_parse_url_schemes() {
        assert!(parse_url("https://api.test.barion.com/v2/Payment/Start").is_ok());
        assert!(parse_url("http://127.0.0.1:8080/v2").is_ok());
        assert!(matches!(parse_url("file:///etc/passwd"), Err(BarionError::TransportError(_))));
        assert!(matches!(parse_url("not a url"), Err(BarionError::TransportError(_))));
    }

    #[test]
    fn test_append_query() {
        let mut url = Url::parse("https://api.test.barion.com/v2/Accounts/Get").unwrap();
        append_query(&mut url, &object(json!({
            "UserName": "merchant@example.com",
            "Amount": 12.5,
            "Flag": true,
            "Sources": ["All", null, "BankCard"],
            "Skipped": null
        })));
        assert_eq!(
            url.query(),
            Some("UserName=merchant%40example.com&Amount=12.5&Flag=true&Sources=All&Sources=BankCard")
        );
    }

    #[test]
    fn test_append_empty_query() {
        let mut url = Url::parse("https://api.test.barion.com/v2/Accounts/Get").unwrap();
        append_query(&mut url, &Map::new());
        assert_eq!(url.as_str(), "https://api.test.barion.com/v2/Accounts/Get");
    }

    #[test]
    fn test_interpret_success() {
        let body = br#"{"PaymentId":"p-1","Status":"Prepared","Errors":[]}"#;
        let value = interpret_response(200, body).unwrap();
        assert_eq!(value["Status"], json!("Prepared"));
    }

    #[test]
    fn test_interpret_errors_in_success_body() {
        let body = br#"{"Errors":[{"ErrorCode":"InvalidPosKey","Title":"Invalid POSKey"}]}"#;
        let Err(BarionError::RemoteError(remote)) = interpret_response(200, body) else {
            panic!("expected remote error");
        };
        assert_eq!(remote.status, 200);
        assert_eq!(remote.errors[0].error_code.as_deref(), Some("InvalidPosKey"));
    }

    #[test]
    fn test_interpret_error_status_without_body() {
        let Err(BarionError::RemoteError(remote)) = interpret_response(502, b"Bad Gateway") else {
            panic!("expected remote error");
        };
        assert_eq!(remote.status, 502);
        assert!(remote.errors.is_empty());
    }

    #[test]
    fn test_interpret_malformed_success_body() {
        assert!(matches!(interpret_response(200, b"<html>"), Err(BarionError::TransportError(_))));
    }

    #[test]
    fn test_interpret_keeps_odd_error_entries() {
        let body = br#"{"Errors":["plain text"]}"#;
        let Err(BarionError::RemoteError(remote)) = interpret_response(200, body) else {
            panic!("expected remote error");
        };
        assert_eq!(remote.errors[0].description.as_deref(), Some("\"plain text\""));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        let body = json!({ "POSKey": "k", "PaymentType": "Immediate" });
        Mock::given(method("POST"))
            .and(path("/v2/Payment/Start"))
            .and(header("content-type", "application/json"))
            .and(body_json(body.clone()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "PaymentId": "p-1", "Status": "Prepared", "Errors": [] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let url = format!("{}/v2/Payment/Start", server.uri());
        let response = transport.post(&url, body.as_object().unwrap()).await.unwrap();
        assert_eq!(response["PaymentId"], json!("p-1"));
    }

    #[tokio::test]
    async fn test_get_sends_query_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/Payment/GetPaymentState"))
            .and(query_param("POSKey", "k"))
            .and(query_param("PaymentId", "p-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Status": "Succeeded" })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let url = format!("{}/v2/Payment/GetPaymentState", server.uri());
        let query = object(json!({ "POSKey": "k", "PaymentId": "p-1" }));
        let response = transport.get(&url, &query).await.unwrap();
        assert_eq!(response["Status"], json!("Succeeded"));
    }

    #[tokio::test]
    async fn test_error_status_becomes_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "Errors": [{ "ErrorCode": "ModelValidationError", "Title": "Invalid request" }]
            })))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let err = transport.post(&format!("{}/v2/Payment/Refund", server.uri()), &Map::new()).await.unwrap_err();
        let BarionError::RemoteError(remote) = err else {
            panic!("expected remote error, got {err:?}");
        };
        assert_eq!(remote.status, 400);
        assert_eq!(remote.errors.len(), 1);
        assert_eq!(remote.errors[0].title.as_deref(), Some("Invalid request"));
    }

    #[tokio::test]
    async fn test_malformed_body_becomes_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let err = transport.get(&format!("{}/v2/Accounts/Get", server.uri()), &Map::new()).await.unwrap_err();
        assert!(matches!(err, BarionError::TransportError(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_becomes_http_error() {
        let config = HttpConfig { connect_timeout_secs: 1, timeout_secs: 2, ..Default::default() };
        let transport = HttpTransport::with_config(&config).unwrap();
        let err = transport.get("http://127.0.0.1:9/v2/Accounts/Get", &Map::new()).await.unwrap_err();
        assert!(matches!(err, BarionError::HttpError(_)));
    }
}
