//! Client configuration types.
//!
//! A client is configured either from a loosely-typed JSON object (the same shape the
//! gateway uses, PascalCase keys in any casing) or from a TOML file deserialized into
//! [`ClientConfig`]. Both routes end up validated by the same init schema.

use std::{fmt, str::FromStr, sync::Arc};

use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use crate::{
    error::{BarionError, Result},
    merchant::guard::IMMUTABLE_FIELDS,
    schema::Schema,
    schemas::init::CLIENT_OPTIONS,
    transport::HttpConfig,
};

/// Gateway environment a client talks to.
///
/// Selected once at construction. Parsing is case-sensitive: only `"test"` and
/// `"production"` are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Sandbox at `api.test.barion.com`.
    #[default]
    Test,
    /// Live gateway at `api.barion.com`.
    Production,
}

impl Environment {
    /// Base URL every operation path is appended to.
    #[must_use]
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Test => "https://api.test.barion.com",
            Self::Production => "https://api.barion.com",
        }
    }

    /// Literal used in client options.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = BarionError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "test" => Ok(Self::Test),
            "production" => Ok(Self::Production),
            other => Err(BarionError::ConfigurationError(format!(
                "unknown environment \"{other}\", expected \"test\" or \"production\""
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client configuration loaded from TOML.
///
/// Unset optional keys fall back to the init schema defaults.
///
/// # Examples
///
/// ```
/// use barion::merchant::{ClientConfig, Environment};
///
/// let config: ClientConfig = toml::from_str(r#"
///     pos_key = "a1b2c3"
///     environment = "production"
///     locale = "en-US"
///
///     [http]
///     timeout_secs = 20
/// "#).unwrap();
///
/// assert_eq!(config.environment, Some(Environment::Production));
/// assert_eq!(config.http.timeout_secs, 20);
/// ```
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    /// Merchant shop key.
    pub pos_key: String,

    /// Gateway environment (default: test).
    #[serde(default)]
    pub environment: Option<Environment>,

    /// Default funding sources (default: `["All"]`).
    #[serde(default)]
    pub funding_sources: Option<Vec<String>>,

    /// Whether payers may pay without a Barion wallet (default: true).
    #[serde(default)]
    pub guest_checkout: Option<bool>,

    /// Default payment UI locale (default: `hu-HU`).
    #[serde(default)]
    pub locale: Option<String>,

    /// Default currency (default: `HUF`).
    #[serde(default)]
    pub currency: Option<String>,

    /// Whether requests are validated before sending (default: true).
    #[serde(default)]
    pub validate_models: Option<bool>,

    /// Wallet user name, used by wallet operations.
    #[serde(default)]
    pub user_name: Option<String>,

    /// Wallet password, used by wallet operations.
    #[serde(default)]
    pub password: Option<String>,

    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("pos_key", &"<redacted>")
            .field("environment", &self.environment)
            .field("funding_sources", &self.funding_sources)
            .field("guest_checkout", &self.guest_checkout)
            .field("locale", &self.locale)
            .field("currency", &self.currency)
            .field("validate_models", &self.validate_models)
            .field("user_name", &self.user_name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("http", &self.http)
            .finish()
    }
}

impl ClientConfig {
    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `BarionError::ConfigurationError` if the TOML is malformed or the HTTP
    /// settings are out of bounds.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| BarionError::ConfigurationError(format!("invalid TOML config: {e}")))?;
        config.http.validate()?;
        Ok(config)
    }

    /// Converts the configuration into client options with canonical keys.
    ///
    /// Unset keys are omitted so the init schema can apply its defaults.
    #[must_use]
    pub fn to_options(&self) -> Value {
        let mut options = Map::new();
        options.insert("POSKey".to_owned(), Value::from(self.pos_key.clone()));
        if let Some(environment) = self.environment {
            options.insert("Environment".to_owned(), Value::from(environment.as_str()));
        }
        if let Some(sources) = &self.funding_sources {
            options.insert("FundingSources".to_owned(), Value::from(sources.clone()));
        }
        if let Some(guest_checkout) = self.guest_checkout {
            options.insert("GuestCheckOut".to_owned(), Value::Bool(guest_checkout));
        }
        if let Some(locale) = &self.locale {
            options.insert("Locale".to_owned(), Value::from(locale.clone()));
        }
        if let Some(currency) = &self.currency {
            options.insert("Currency".to_owned(), Value::from(currency.clone()));
        }
        if let Some(validate_models) = self.validate_models {
            options.insert("ValidateModels".to_owned(), Value::Bool(validate_models));
        }
        if let Some(user_name) = &self.user_name {
            options.insert("UserName".to_owned(), Value::from(user_name.clone()));
        }
        if let Some(password) = &self.password {
            options.insert("Password".to_owned(), Value::from(password.clone()));
        }
        Value::Object(options)
    }
}

/// Request pipeline settings injected into a client.
///
/// [`Default`] gives the Barion settings: `POSKey` and `Environment` are immutable
/// and client options are checked against the built-in init schema. Tests and
/// alternative gateways can swap either.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    immutable_fields: Vec<&'static str>,
    client_options: Arc<Schema>,
    base_url: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            immutable_fields: IMMUTABLE_FIELDS.to_vec(),
            client_options: Arc::new(CLIENT_OPTIONS.clone()),
            base_url: None,
        }
    }
}

impl PipelineConfig {
    /// Replaces the set of fields callers may never supply per call.
    #[must_use]
    pub fn with_immutable_fields(mut self, fields: &[&'static str]) -> Self {
        self.immutable_fields = fields.to_vec();
        self
    }

    /// Replaces the schema client options are validated against.
    #[must_use]
    pub fn with_client_options(mut self, schema: Schema) -> Self {
        self.client_options = Arc::new(schema);
        self
    }

    /// Sends requests to `base_url` instead of the environment's gateway.
    ///
    /// # Errors
    ///
    /// Returns `BarionError::ConfigurationError` if the URL does not parse or is not
    /// `http`/`https`.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url).map_err(|e| {
            BarionError::ConfigurationError(format!("invalid base_url '{base_url}': {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(BarionError::ConfigurationError(format!(
                "base_url must use http or https, got: {}",
                url.scheme()
            )));
        }
        self.base_url = Some(base_url.trim_end_matches('/').to_owned());
        Ok(self)
    }

    /// Fields callers may never supply per call.
    #[must_use]
    pub fn immutable_fields(&self) -> &[&'static str] {
        &self.immutable_fields
    }

    /// Schema client options are validated against.
    #[must_use]
    pub fn client_options(&self) -> &Schema {
        &self.client_options
    }

    /// Base URL override, if any.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_environment_base_urls() {
        assert_eq!(Environment::Test.base_url(), "https://api.test.barion.com");
        assert_eq!(Environment::Production.base_url(), "https://api.barion.com");
        assert_eq!(Environment::default(), Environment::Test);
    }

    #[test]
    fn test_environment_from_str_is_case_sensitive() {
        assert_eq!("test".parse::<Environment>().unwrap(), Environment::Test);
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
        assert!("Production".parse::<Environment>().is_err());
        assert!("live".parse::<Environment>().is_err());
    }

    #[test]
    fn test_environment_display() {
        assert_eq!(Environment::Production.to_string(), "production");
    }

    #[test]
    fn test_client_config_minimal_toml() {
        let config = ClientConfig::from_toml("pos_key = \"abc\"").unwrap();
        assert_eq!(config.pos_key, "abc");
        assert!(config.environment.is_none());
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.to_options(), json!({ "POSKey": "abc" }));
    }

    #[test]
    fn test_client_config_full_toml() {
        let toml = r#"
            pos_key = "abc"
            environment = "production"
            funding_sources = ["BankCard"]
            guest_checkout = false
            locale = "en-US"
            currency = "EUR"
            validate_models = false
            user_name = "merchant@example.com"
            password = "secret"

            [http]
            pool_max_idle_per_host = 4
            timeout_secs = 20
        "#;

        let config = ClientConfig::from_toml(toml).unwrap();
        assert_eq!(config.http.pool_max_idle_per_host, 4);
        assert_eq!(config.to_options(), json!({
            "POSKey": "abc",
            "Environment": "production",
            "FundingSources": ["BankCard"],
            "GuestCheckOut": false,
            "Locale": "en-US",
            "Currency": "EUR",
            "ValidateModels": false,
            "UserName": "merchant@example.com",
            "Password": "secret"
        }));
    }

    #[test]
    fn test_client_config_rejects_unknown_environment() {
        let result = ClientConfig::from_toml("pos_key = \"abc\"\nenvironment = \"Production\"");
        assert!(matches!(result, Err(BarionError::ConfigurationError(_))));
    }

    #[test]
    fn test_client_config_missing_pos_key() {
        let result = ClientConfig::from_toml("locale = \"en-US\"");
        assert!(matches!(result, Err(BarionError::ConfigurationError(_))));
    }

    #[test]
    fn test_client_config_rejects_bad_http_bounds() {
        let result = ClientConfig::from_toml("pos_key = \"abc\"\n[http]\ntimeout_secs = 0");
        assert!(matches!(result, Err(BarionError::ConfigurationError(_))));
    }

    #[test]
    fn test_client_config_debug_redacts_secrets() {
        let config =
            ClientConfig::from_toml("pos_key = \"very-secret\"\npassword = \"hunter2\"").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_pipeline_config_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.immutable_fields(), ["POSKey", "Environment"]);
        assert_eq!(config.client_options().name(), "ClientOptions");
        assert!(config.base_url().is_none());
    }

    #[test]
    fn test_pipeline_config_base_url() {
        let config = PipelineConfig::default().with_base_url("http://127.0.0.1:8080/").unwrap();
        assert_eq!(config.base_url(), Some("http://127.0.0.1:8080"));

        assert!(PipelineConfig::default().with_base_url("ftp://example.com").is_err());
        assert!(PipelineConfig::default().with_base_url("not a url").is_err());
    }
}
