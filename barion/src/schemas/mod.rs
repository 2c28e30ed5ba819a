//! Schema registry for the Barion v2 API.
//!
//! One schema per operation plus the sub-objects they nest. All schemas are built once,
//! on first use, and shared for the lifetime of the process.

pub mod init;
pub mod payment;
pub mod refund;
pub mod reservation;
pub mod wallet;

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::Schema;

/// Locales accepted by the payment UI.
pub const LOCALES: &[&str] =
    &["cs-CZ", "de-DE", "el-GR", "en-US", "es-ES", "fr-FR", "hu-HU", "sk-SK", "sl-SI"];

/// Currencies accepted by the gateway.
pub const CURRENCIES: &[&str] = &["CZK", "EUR", "HUF", "USD"];

/// Funding sources a payer may use.
pub const FUNDING_SOURCES: &[&str] = &["All", "Balance", "BankCard", "GooglePay", "ApplePay"];

/// Payment flows.
pub const PAYMENT_TYPES: &[&str] = &["Immediate", "Reservation", "DelayedCapture"];

/// .NET-style time span: `hh:mm:ss` or `d.hh:mm:ss`.
pub(crate) static TIME_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+\.)?([01]?\d|2[0-3]):[0-5]\d:[0-5]\d$").expect("time span pattern is valid")
});

/// Gateway-issued identifier, a GUID with or without dashes.
pub(crate) static GUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{12}$")
        .expect("guid pattern is valid")
});

/// Phone number: digits only, country code included, no leading `+`.
pub(crate) static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,30}$").expect("phone pattern is valid"));

/// ISO 3166-1 alpha-2 country code.
pub(crate) static COUNTRY_ALPHA2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").expect("alpha-2 pattern is valid"));

/// ISO 3166-1 alpha-3 country code.
pub(crate) static COUNTRY_ALPHA3: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("alpha-3 pattern is valid"));

pub(crate) const TIME_SPAN_DESCRIPTION: &str = "a time span in [d.]hh:mm:ss format";
pub(crate) const GUID_DESCRIPTION: &str = "a 32 digit hexadecimal identifier";

/// Every registered schema, for invariant checks.
#[must_use]
pub fn all() -> Vec<&'static Schema> {
    vec![
        &*init::CLIENT_OPTIONS,
        &*payment::START_PAYMENT,
        &*reservation::GET_PAYMENT_STATE,
        &*reservation::FINISH_RESERVATION,
        &*reservation::CAPTURE_AUTHORIZED_PAYMENT,
        &*reservation::CANCEL_AUTHORIZED_PAYMENT,
        &*reservation::COMPLETE_PAYMENT,
        &*refund::REFUND_PAYMENT,
        &*wallet::BANK_TRANSFER,
        &*wallet::BARION_TRANSFER,
        &*wallet::GET_ACCOUNTS,
    ]
}
