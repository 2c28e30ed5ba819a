//! Options accepted when constructing a client.

use std::sync::LazyLock;

use serde_json::json;

use super::{CURRENCIES, FUNDING_SOURCES, LOCALES};
use crate::schema::{FieldKind, FieldSchema, Schema};

/// Environments a client can talk to.
pub const ENVIRONMENTS: &[&str] = &["test", "production"];

/// Client construction options.
///
/// Everything except `POSKey` has a default, so `{ "POSKey": "..." }` is a complete
/// configuration for the test environment.
pub static CLIENT_OPTIONS: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("ClientOptions")
        .field(FieldSchema::string("POSKey").required())
        .field(
            FieldSchema::string("Environment")
                .required()
                .one_of(ENVIRONMENTS)
                .default_value(json!("test")),
        )
        .field(
            FieldSchema::array("FundingSources", FieldKind::enumeration(FUNDING_SOURCES))
                .required()
                .min_items(1)
                .default_value(json!(["All"])),
        )
        .field(FieldSchema::boolean("GuestCheckOut").required().default_value(json!(true)))
        .field(FieldSchema::string("Locale").required().one_of(LOCALES).default_value(json!("hu-HU")))
        .field(FieldSchema::string("Currency").required().one_of(CURRENCIES).default_value(json!("HUF")))
        .field(FieldSchema::boolean("ValidateModels").required().default_value(json!(true)))
        .field(FieldSchema::string("UserName"))
        .field(FieldSchema::string("Password"))
});
