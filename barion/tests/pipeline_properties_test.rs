//! Property tests for the request pipeline.
//!
//! Exercises case-insensitive matching, the immutable field guard, defaults
//! precedence and idempotence through the public client API without sending
//! anything.

use barion::{
    BarionClient, BarionError, Operation,
    merchant::IMMUTABLE_FIELDS,
    schemas,
};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

fn client() -> BarionClient {
    BarionClient::new(&json!({ "POSKey": "merchant-key", "Currency": "EUR" })).unwrap()
}

fn start_payment_options() -> Map<String, Value> {
    json!({
        "PaymentType": "Immediate",
        "PaymentRequestId": "order-1001",
        "PaymentWindow": "00:30:00",
        "Transactions": [{
            "POSTransactionId": "order-1001-1",
            "Payee": "shop@example.com",
            "Total": 2500,
            "Items": [{
                "Name": "Coffee beans",
                "Description": "1 kg arabica",
                "Quantity": 1,
                "Unit": "bag",
                "UnitPrice": 2500,
                "ItemTotal": 2500
            }]
        }]
    })
    .as_object()
    .cloned()
    .unwrap()
}

fn recase(name: &str, flips: &[bool]) -> String {
    name.chars()
        .zip(flips.iter().cycle())
        .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
        .collect()
}

proptest! {
    #[test]
    fn prop_top_level_casing_is_irrelevant(flips in proptest::collection::vec(any::<bool>(), 1..24)) {
        let client = client();
        let canonical = client.build_request(Operation::StartPayment, &Value::Object(start_payment_options())).unwrap();

        let recased: Map<String, Value> = start_payment_options()
            .into_iter()
            .map(|(key, value)| (recase(&key, &flips), value))
            .collect();
        let built = client.build_request(Operation::StartPayment, &Value::Object(recased)).unwrap();

        prop_assert_eq!(built, canonical);
    }

    #[test]
    fn prop_immutable_fields_rejected_for_every_operation(
        op_index in 0..Operation::ALL.len(),
        field_index in 0..IMMUTABLE_FIELDS.len(),
        flips in proptest::collection::vec(any::<bool>(), 1..12),
        value in prop_oneof![Just(json!(null)), Just(json!("x")), Just(json!(0)), Just(json!(false))],
    ) {
        let operation = Operation::ALL[op_index];
        let field = IMMUTABLE_FIELDS[field_index];
        let mut options = Map::new();
        options.insert(recase(field, &flips), value);

        let err = client().build_request(operation, &Value::Object(options)).unwrap_err();
        let BarionError::ConfigurationError(message) = err else {
            return Err(TestCaseError::fail("expected configuration error"));
        };
        prop_assert_eq!(message, format!("cannot override field(s): {field}"));
    }

    #[test]
    fn prop_caller_locale_wins_over_default(index in 0..schemas::LOCALES.len()) {
        let locale = schemas::LOCALES[index];
        let mut options = start_payment_options();
        options.insert("locale".to_owned(), json!(locale));

        let request = client().build_request(Operation::StartPayment, &Value::Object(options)).unwrap();
        prop_assert_eq!(&request["Locale"], &json!(locale));
        prop_assert_eq!(&request["Currency"], &json!("EUR"));
    }
}

#[test]
fn test_built_request_validates_again_unchanged() {
    let request = client().build_request(Operation::StartPayment, &Value::Object(start_payment_options())).unwrap();
    let again = Operation::StartPayment.schema().validate(&request).unwrap();
    assert_eq!(again, request);
}

#[test]
fn test_missing_everywhere_is_reported() {
    let err = client().build_request(Operation::StartPayment, &json!({})).unwrap_err();
    assert_eq!(err.validation_messages().unwrap(), [
        "\"PaymentType\" is required",
        "\"PaymentRequestId\" is required",
        "\"Transactions\" is required",
    ]);
}

#[test]
fn test_nested_path_in_messages() {
    let mut options = start_payment_options();
    options["Transactions"][0]["Items"][0].as_object_mut().unwrap().remove("Name");

    let err = client().build_request(Operation::StartPayment, &Value::Object(options)).unwrap_err();
    assert_eq!(err.validation_messages().unwrap(), ["\"Transactions[0].Items[0].Name\" is required"]);
}

#[test]
fn test_every_registered_schema_is_well_formed() {
    for schema in schemas::all() {
        assert!(schema.lint().is_empty(), "{}: {:?}", schema.name(), schema.lint());
    }
}
