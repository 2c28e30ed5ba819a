//! Wallet operations, authenticated with the merchant's user name and password.

use std::sync::LazyLock;

use super::{COUNTRY_ALPHA3, CURRENCIES};
use crate::schema::{FieldSchema, Schema};

/// `POST /v2/Withdraw/BankTransfer`.
pub static BANK_TRANSFER: LazyLock<Schema> = LazyLock::new(|| {
    credentials(Schema::new("BankTransfer"))
        .field(FieldSchema::string("Currency").required().one_of(CURRENCIES))
        .field(FieldSchema::number("Amount").required().greater_than(0.0))
        .field(FieldSchema::string("RecipientName").required().max_len(45))
        .field(FieldSchema::string("Comment").max_len(1000))
        .field(FieldSchema::object("BankAccount", bank_account()).required())
});

/// `POST /v2/Transfer/Send`.
pub static BARION_TRANSFER: LazyLock<Schema> = LazyLock::new(|| {
    credentials(Schema::new("BarionTransfer"))
        .field(FieldSchema::string("Currency").required().one_of(CURRENCIES))
        .field(FieldSchema::number("Amount").required().greater_than(0.0))
        .field(FieldSchema::string("Recipient").required().email().max_len(256))
        .field(FieldSchema::string("Comment").max_len(1000))
});

/// `GET /v2/Accounts/Get`.
pub static GET_ACCOUNTS: LazyLock<Schema> = LazyLock::new(|| credentials(Schema::new("GetAccounts")));

/// Destination account of a bank transfer.
#[must_use]
pub fn bank_account() -> Schema {
    Schema::new("BankAccount")
        .field(FieldSchema::string("Country").required().pattern(&COUNTRY_ALPHA3, "a three letter country code"))
        .field(FieldSchema::string("Format").required().one_of(&["Giro", "IBAN"]))
        .field(FieldSchema::string("AccountNumber").required().min_len(2).max_len(100))
        .field(FieldSchema::string("Address").max_len(1000))
        .field(FieldSchema::string("BankName").max_len(200))
        .field(FieldSchema::string("BankAddress").max_len(1000))
        .field(FieldSchema::string("SwiftCode").min_len(8).max_len(11))
}

fn credentials(schema: Schema) -> Schema {
    schema
        .field(FieldSchema::string("UserName").required())
        .field(FieldSchema::string("Password").required())
}
