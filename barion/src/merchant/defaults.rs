//! Merchant defaults and the merge engine.
//!
//! Defaults are computed once, when a client is constructed, from the validated
//! client options. Every call merges the caller's options over them:
//!
//! 1. caller value, found under any casing
//! 2. merchant default for the same canonical name
//! 3. absent, which strict validation reports if the field is required
//!
//! Caller keys that the operation schema does not declare are passed through the
//! merge untouched. Strict validation strips them afterwards; sanitize-only mode
//! sends them as they are.

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    error::{BarionError, Result},
    merchant::{Environment, field_map, guard},
    schema::Schema,
};

/// How a request is built from caller options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeMode {
    /// Validate caller input leniently, merge, then validate the result strictly.
    #[default]
    Strict,
    /// Only guard immutable fields and normalize key casing. Values are not checked.
    SanitizeOnly,
}

/// Frozen merchant-level configuration of one client.
#[derive(Clone, PartialEq)]
pub struct MerchantDefaults {
    values: Map<String, Value>,
    environment: Environment,
}

impl std::fmt::Debug for MerchantDefaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<&String> = self.values.keys().collect();
        f.debug_struct("MerchantDefaults")
            .field("environment", &self.environment)
            .field("keys", &keys)
            .finish()
    }
}

impl MerchantDefaults {
    /// Validates client options against `schema` and freezes the result.
    ///
    /// # Errors
    ///
    /// Returns `BarionError::ConfigurationError` if `options` is not an object, if any
    /// option is missing or invalid, or if the environment is not recognized.
    pub fn from_options(options: &Value, schema: &Schema) -> Result<Self> {
        let Value::Object(options) = options else {
            return Err(BarionError::ConfigurationError(
                "client options must be a JSON object".to_owned(),
            ));
        };
        let values = schema.validate(options).map_err(|errors| {
            BarionError::ConfigurationError(format!("invalid client options: {errors}"))
        })?;
        let environment = match values.get("Environment") {
            Some(Value::String(name)) => name.parse()?,
            _ => Environment::default(),
        };
        Ok(Self { values, environment })
    }

    /// Returns the default for a canonical field name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Selected gateway environment.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Merge mode selected by the `ValidateModels` option.
    #[must_use]
    pub fn merge_mode(&self) -> MergeMode {
        match self.values.get("ValidateModels") {
            Some(Value::Bool(false)) => MergeMode::SanitizeOnly,
            _ => MergeMode::Strict,
        }
    }

    /// All defaults, keyed by canonical name.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }
}

/// Combines caller options with merchant defaults for one operation.
///
/// Declared fields come out under their canonical name; undeclared caller keys are
/// kept as supplied. A caller `null` still wins over the default, so a caller can
/// clear an optional default for one call.
#[must_use]
pub fn merge(schema: &Schema, defaults: &MerchantDefaults, options: &Map<String, Value>) -> Map<String, Value> {
    let index = schema.index();
    let supplied = index.normalize(options);
    let mut candidate = Map::with_capacity(schema.fields().len() + supplied.len());

    for field in schema.fields() {
        let name = field.name();
        if let Some(value) = supplied.get(name).or_else(|| defaults.get(name)) {
            candidate.insert(name.to_owned(), value.clone());
        }
    }

    for (key, value) in supplied {
        if index.canonical(&key).is_none() {
            candidate.insert(key, value);
        }
    }

    candidate
}

/// Builds a request in the given mode.
///
/// # Errors
///
/// Returns `BarionError::ConfigurationError` if `options` names an immutable field, or
/// `BarionError::ValidationError` if strict validation fails.
pub fn build(
    schema: &Schema,
    defaults: &MerchantDefaults,
    options: &Map<String, Value>,
    immutable: &[&'static str],
    mode: MergeMode,
) -> Result<Map<String, Value>> {
    guard::check(options, immutable)?;
    match mode {
        MergeMode::Strict => build_strict(schema, defaults, options, immutable),
        MergeMode::SanitizeOnly => {
            debug!(schema = schema.name(), "sanitize-only build, skipping validation");
            Ok(merge(schema, defaults, options))
        }
    }
}

fn build_strict(
    schema: &Schema,
    defaults: &MerchantDefaults,
    options: &Map<String, Value>,
    immutable: &[&'static str],
) -> Result<Map<String, Value>> {
    let declared = schema.field_names();
    let protected = field_map::intersection(&declared, immutable);
    let relaxed: Vec<&str> = declared.iter().filter(|name| !protected.contains(name)).copied().collect();

    schema
        .with_optional(&relaxed)
        .with_immutable(&protected)
        .validate(options)
        .map_err(BarionError::ValidationError)?;
    debug!(schema = schema.name(), "caller options passed lenient validation");

    let candidate = merge(schema, defaults, options);
    let request = schema.validate(&candidate).map_err(BarionError::ValidationError)?;
    debug!(schema = schema.name(), fields = request.len(), "merged request passed strict validation");
    Ok(request)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        merchant::guard::IMMUTABLE_FIELDS,
        schema::{ConditionalRule, FieldSchema},
        schemas::init::CLIENT_OPTIONS,
    };

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn defaults() -> MerchantDefaults {
        MerchantDefaults::from_options(&json!({ "POSKey": "merchant-key" }), &CLIENT_OPTIONS).unwrap()
    }

    fn schema() -> Schema {
        Schema::new("Op")
            .field(FieldSchema::string("POSKey").required())
            .field(FieldSchema::string("PaymentType").required().one_of(&["Immediate", "Reservation"]))
            .field(FieldSchema::string("ReservationPeriod"))
            .field(FieldSchema::string("Locale").required())
            .field(FieldSchema::string("Currency").required())
            .field(FieldSchema::number("Total").required().greater_than(0.0))
            .rule(ConditionalRule::when("PaymentType", [json!("Reservation")]).then_required("ReservationPeriod"))
    }

    #[test]
    fn test_defaults_from_minimal_options() {
        let defaults = defaults();
        assert_eq!(defaults.environment(), Environment::Test);
        assert_eq!(defaults.get("FundingSources"), Some(&json!(["All"])));
        assert_eq!(defaults.get("GuestCheckOut"), Some(&json!(true)));
        assert_eq!(defaults.get("Locale"), Some(&json!("hu-HU")));
        assert_eq!(defaults.get("Currency"), Some(&json!("HUF")));
        assert_eq!(defaults.merge_mode(), MergeMode::Strict);
    }

    #[test]
    fn test_defaults_reject_bad_options() {
        let err = MerchantDefaults::from_options(&json!({ "Environment": "live" }), &CLIENT_OPTIONS).unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: invalid client options: \"POSKey\" is required; \"Environment\" must be one of [test, production]"
        );

        let err = MerchantDefaults::from_options(&json!("pos-key"), &CLIENT_OPTIONS).unwrap_err();
        assert!(matches!(err, BarionError::ConfigurationError(_)));
    }

    #[test]
    fn test_defaults_debug_hides_values() {
        let debug = format!("{:?}", defaults());
        assert!(debug.contains("POSKey"));
        assert!(!debug.contains("merchant-key"));
    }

    #[test]
    fn test_validate_models_false_selects_sanitize_only() {
        let defaults =
            MerchantDefaults::from_options(&json!({ "POSKey": "k", "validatemodels": false }), &CLIENT_OPTIONS).unwrap();
        assert_eq!(defaults.merge_mode(), MergeMode::SanitizeOnly);
    }

    #[test]
    fn test_merge_precedence() {
        let options = object(json!({ "locale": "en-US", "PaymentType": "Immediate", "Extra": 1 }));
        let candidate = merge(&schema(), &defaults(), &options);

        assert_eq!(candidate, object(json!({
            "POSKey": "merchant-key",
            "PaymentType": "Immediate",
            "Locale": "en-US",
            "Currency": "HUF",
            "Extra": 1
        })));
    }

    #[test]
    fn test_merge_keeps_caller_null() {
        let options = object(json!({ "Currency": null }));
        let candidate = merge(&schema(), &defaults(), &options);
        assert_eq!(candidate.get("Currency"), Some(&Value::Null));
    }

    #[test]
    fn test_merge_collapses_case_variants() {
        let options = object(json!({ "total": "1", "TOTAL": "2", "Total": "3", "extra": true }));
        let candidate = merge(&schema(), &defaults(), &options);

        assert_eq!(candidate.get("Total"), Some(&json!("3")));
        assert!(!candidate.contains_key("total"));
        assert!(!candidate.contains_key("TOTAL"));
        assert_eq!(candidate.get("extra"), Some(&json!(true)));

        let request = build(&schema(), &defaults(), &options, IMMUTABLE_FIELDS, MergeMode::SanitizeOnly).unwrap();
        assert_eq!(request, candidate);
    }

    #[test]
    fn test_strict_build_fills_defaults_and_strips_unknown() {
        let options = object(json!({ "paymenttype": "Immediate", "total": "1500", "Unknown": true }));
        let request = build(&schema(), &defaults(), &options, IMMUTABLE_FIELDS, MergeMode::Strict).unwrap();

        assert_eq!(request, object(json!({
            "POSKey": "merchant-key",
            "PaymentType": "Immediate",
            "Locale": "hu-HU",
            "Currency": "HUF",
            "Total": 1500
        })));
    }

    #[test]
    fn test_strict_build_reports_missing_fields() {
        let err = build(&schema(), &defaults(), &Map::new(), IMMUTABLE_FIELDS, MergeMode::Strict).unwrap_err();
        assert_eq!(err.validation_messages().unwrap(), ["\"PaymentType\" is required", "\"Total\" is required"]);
    }

    #[test]
    fn test_strict_build_rejects_bad_caller_values_before_merge() {
        let options = object(json!({ "PaymentType": "Reservation", "Total": -5 }));
        let err = build(&schema(), &defaults(), &options, IMMUTABLE_FIELDS, MergeMode::Strict).unwrap_err();
        assert_eq!(err.validation_messages().unwrap(), ["\"Total\" must be greater than 0"]);
    }

    #[test]
    fn test_strict_build_applies_conditional_rules_after_merge() {
        let options = object(json!({ "PaymentType": "Reservation", "Total": 5 }));
        let err = build(&schema(), &defaults(), &options, IMMUTABLE_FIELDS, MergeMode::Strict).unwrap_err();
        assert_eq!(err.validation_messages().unwrap(), ["\"ReservationPeriod\" is required"]);
    }

    #[test]
    fn test_immutable_fields_rejected_in_both_modes() {
        let options = object(json!({ "POSKEY": "stolen", "PaymentType": "Immediate", "Total": 1 }));
        for mode in [MergeMode::Strict, MergeMode::SanitizeOnly] {
            let err = build(&schema(), &defaults(), &options, IMMUTABLE_FIELDS, mode).unwrap_err();
            assert!(matches!(err, BarionError::ConfigurationError(_)), "{mode:?}");
        }
    }

    #[test]
    fn test_lenient_pass_marks_immutable_fields() {
        let options = object(json!({ "PosKey": "x", "PaymentType": "Immediate", "Total": 1 }));
        let err = build_strict(&schema(), &defaults(), &options, IMMUTABLE_FIELDS).unwrap_err();
        assert_eq!(err.validation_messages().unwrap(), [
            "\"POSKey\" cannot be set per call, it comes from the client configuration"
        ]);
    }

    #[test]
    fn test_custom_immutable_set_is_honored() {
        let options = object(json!({ "POSKey": "x", "PaymentType": "Immediate", "Total": 1 }));
        let request = build(&schema(), &defaults(), &options, &["Locale"], MergeMode::Strict).unwrap();
        assert_eq!(request.get("POSKey"), Some(&json!("x")));

        let options = object(json!({ "locale": "en-US" }));
        let err = build(&schema(), &defaults(), &options, &["Locale"], MergeMode::Strict).unwrap_err();
        assert_eq!(err.to_string(), "configuration error: cannot override field(s): Locale");
    }

    #[test]
    fn test_sanitize_only_forwards_values_unchanged() {
        let options = object(json!({ "paymenttype": "Whatever", "Total": -5, "Extra": [1, 2] }));
        let request = build(&schema(), &defaults(), &options, IMMUTABLE_FIELDS, MergeMode::SanitizeOnly).unwrap();

        assert_eq!(request.get("PaymentType"), Some(&json!("Whatever")));
        assert_eq!(request.get("Total"), Some(&json!(-5)));
        assert_eq!(request.get("Extra"), Some(&json!([1, 2])));
        assert_eq!(request.get("POSKey"), Some(&json!("merchant-key")));
        assert!(!request.contains_key("paymenttype"));
    }
}
