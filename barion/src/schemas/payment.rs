//! Payment start request and the objects it nests.

use std::sync::LazyLock;

use serde_json::json;

use super::{
    COUNTRY_ALPHA2, CURRENCIES, FUNDING_SOURCES, LOCALES, PAYMENT_TYPES, PHONE, TIME_SPAN,
    TIME_SPAN_DESCRIPTION,
};
use crate::schema::{ConditionalRule, FieldKind, FieldSchema, Schema};

/// `POST /v2/Payment/Start`.
pub static START_PAYMENT: LazyLock<Schema> = LazyLock::new(start_payment);

/// One purchased item.
#[must_use]
pub fn item() -> Schema {
    Schema::new("Item")
        .field(FieldSchema::string("Name").required().max_len(250))
        .field(FieldSchema::string("Description").required().max_len(500))
        .field(FieldSchema::string("ImageUrl").max_len(2000))
        .field(FieldSchema::number("Quantity").required().greater_than(0.0))
        .field(FieldSchema::string("Unit").required().max_len(50))
        .field(FieldSchema::number("UnitPrice").required())
        .field(FieldSchema::number("ItemTotal").required())
        .field(FieldSchema::string("SKU").max_len(100))
}

/// Commission or split paid to a third party out of a transaction.
#[must_use]
pub fn payee_transaction() -> Schema {
    Schema::new("PayeeTransaction")
        .field(FieldSchema::string("POSTransactionId").required().max_len(100))
        .field(FieldSchema::string("Payee").required().email().max_len(256))
        .field(FieldSchema::number("Total").required().greater_than(0.0))
        .field(FieldSchema::string("Comment").max_len(640))
}

/// One merchant-side transaction of a payment.
#[must_use]
pub fn payment_transaction() -> Schema {
    Schema::new("PaymentTransaction")
        .field(FieldSchema::string("POSTransactionId").required().max_len(100))
        .field(FieldSchema::string("Payee").required().email().max_len(256))
        .field(FieldSchema::number("Total").required().greater_than(0.0))
        .field(FieldSchema::string("Comment").max_len(640))
        .field(FieldSchema::array("PayeeTransactions", FieldKind::object(payee_transaction())))
        .field(FieldSchema::array("Items", FieldKind::object(item())).required().min_items(1))
}

/// Where the goods are delivered.
#[must_use]
pub fn shipping_address() -> Schema {
    Schema::new("ShippingAddress")
        .field(FieldSchema::string("Country").pattern(&COUNTRY_ALPHA2, "a two letter country code"))
        .field(FieldSchema::string("Zip").max_len(16))
        .field(FieldSchema::string("Region").max_len(50))
        .field(FieldSchema::string("City").max_len(50))
        .field(FieldSchema::string("Street").max_len(50))
        .field(FieldSchema::string("Street2").max_len(50))
        .field(FieldSchema::string("Street3").max_len(50))
        .field(FieldSchema::string("FullName").max_len(45))
}

/// Payer's billing address.
#[must_use]
pub fn billing_address() -> Schema {
    Schema::new("BillingAddress")
        .field(FieldSchema::string("Country").pattern(&COUNTRY_ALPHA2, "a two letter country code"))
        .field(FieldSchema::string("Zip").max_len(16))
        .field(FieldSchema::string("Region").max_len(50))
        .field(FieldSchema::string("City").max_len(50))
        .field(FieldSchema::string("Street").max_len(50))
        .field(FieldSchema::string("Street2").max_len(50))
        .field(FieldSchema::string("Street3").max_len(50))
}

/// Payer's account history at the merchant, used for 3-D Secure risk scoring.
#[must_use]
pub fn payer_account_information() -> Schema {
    const AGE: &[&str] = &["LessThan30Days", "Between30And60Days", "MoreThan60Days"];

    Schema::new("PayerAccountInformation")
        .field(FieldSchema::string("AccountId").max_len(64))
        .field(FieldSchema::date("AccountCreated"))
        .field(FieldSchema::string("AccountCreationIndicator").one_of(&[
            "NoAccount",
            "CreatedDuringThisTransaction",
            AGE[0],
            AGE[1],
            AGE[2],
        ]))
        .field(FieldSchema::date("AccountLastChanged"))
        .field(FieldSchema::string("AccountChangeIndicator").one_of(&[
            "ChangedDuringThisTransaction",
            AGE[0],
            AGE[1],
            AGE[2],
        ]))
        .field(FieldSchema::date("PasswordLastChanged"))
        .field(FieldSchema::string("PasswordChangeIndicator").one_of(&[
            "NoChange",
            "ChangedDuringThisTransaction",
            AGE[0],
            AGE[1],
            AGE[2],
        ]))
        .field(FieldSchema::number("PurchasesInTheLast6Months").integer().min(0.0))
        .field(FieldSchema::date("ShippingAddressAdded"))
        .field(FieldSchema::string("ShippingAddressUsageIndicator").one_of(&[
            "ThisTransaction",
            AGE[0],
            AGE[1],
            AGE[2],
        ]))
        .field(FieldSchema::number("ProvisionAttempts").integer().min(0.0))
        .field(FieldSchema::number("TransactionalActivityPerDay").integer().min(0.0))
        .field(FieldSchema::number("TransactionalActivityPerYear").integer().min(0.0))
        .field(
            FieldSchema::string("SuspiciousActivityIndicator")
                .one_of(&["NoSuspiciousActivityObserved", "SuspiciousActivityObserved"]),
        )
}

/// Gift card part of a purchase.
#[must_use]
pub fn gift_card_purchase() -> Schema {
    Schema::new("GiftCardPurchase")
        .field(FieldSchema::number("Amount").required().min(0.0))
        .field(FieldSchema::number("Count").required().integer().min(0.0).max(99.0))
}

/// Details of the purchase, used for 3-D Secure risk scoring.
#[must_use]
pub fn purchase_information() -> Schema {
    Schema::new("PurchaseInformation")
        .field(FieldSchema::string("DeliveryTimeframe").one_of(&[
            "ElectronicDelivery",
            "SameDayShipping",
            "OvernightShipping",
            "TwoDayOrMoreShipping",
        ]))
        .field(FieldSchema::string("DeliveryEmailAddress").email().max_len(256))
        .field(FieldSchema::date("PreOrderDate"))
        .field(
            FieldSchema::string("AvailabilityIndicator")
                .one_of(&["MerchandiseAvailable", "FutureAvailability"]),
        )
        .field(FieldSchema::string("ReOrderIndicator").one_of(&["FirstTimeOrdered", "Reordered"]))
        .field(FieldSchema::string("ShippingAddressIndicator").one_of(&[
            "ShipToCardholdersBillingAddress",
            "ShipToAnotherVerifiedAddress",
            "ShipToDifferentAddress",
            "ShipToStore",
            "DigitalGoods",
            "TravelAndEventTickets",
            "Other",
        ]))
        .field(FieldSchema::date("RecurringExpiry"))
        .field(FieldSchema::number("RecurringFrequency").integer().min(0.0).max(9999.0))
        .field(FieldSchema::string("PurchaseType").one_of(&[
            "GoodsAndServicePurchase",
            "CheckAcceptance",
            "AccountFunding",
            "QuasiCashTransaction",
            "PrePaidVacationAndLoad",
        ]))
        .field(FieldSchema::object("GiftCardPurchase", gift_card_purchase()))
        .field(FieldSchema::date("PurchaseDate"))
}

fn start_payment() -> Schema {
    Schema::new("StartPayment")
        .field(FieldSchema::string("POSKey").required())
        .field(FieldSchema::string("PaymentType").required().one_of(PAYMENT_TYPES))
        .field(FieldSchema::string("ReservationPeriod").pattern(&TIME_SPAN, TIME_SPAN_DESCRIPTION))
        .field(FieldSchema::string("DelayedCapturePeriod").pattern(&TIME_SPAN, TIME_SPAN_DESCRIPTION))
        .field(FieldSchema::string("PaymentWindow").pattern(&TIME_SPAN, TIME_SPAN_DESCRIPTION))
        .field(FieldSchema::boolean("GuestCheckOut").required())
        .field(FieldSchema::boolean("InitiateRecurrence"))
        .field(FieldSchema::string("RecurrenceId").max_len(100))
        .field(
            FieldSchema::array("FundingSources", FieldKind::enumeration(FUNDING_SOURCES))
                .required()
                .min_items(1),
        )
        .field(FieldSchema::string("PaymentRequestId").required().max_len(100))
        .field(FieldSchema::string("PayerHint").email().max_len(256))
        .field(FieldSchema::string("CardHolderNameHint").min_len(2).max_len(45))
        .field(FieldSchema::string("RecurrenceType").one_of(&[
            "MerchantInitiatedPayment",
            "OneClickPayment",
            "RecurringPayment",
        ]))
        .field(FieldSchema::string("RedirectUrl").max_len(2000))
        .field(FieldSchema::string("CallbackUrl").max_len(2000))
        .field(
            FieldSchema::array("Transactions", FieldKind::object(payment_transaction()))
                .required()
                .min_items(1),
        )
        .field(FieldSchema::string("OrderNumber").max_len(100))
        .field(FieldSchema::object("ShippingAddress", shipping_address()))
        .field(FieldSchema::string("Locale").required().one_of(LOCALES))
        .field(FieldSchema::string("Currency").required().one_of(CURRENCIES))
        .field(FieldSchema::string("PayerPhoneNumber").pattern(&PHONE, "a phone number of digits only"))
        .field(FieldSchema::string("PayerWorkPhoneNumber").pattern(&PHONE, "a phone number of digits only"))
        .field(FieldSchema::string("PayerHomePhoneNumber").pattern(&PHONE, "a phone number of digits only"))
        .field(FieldSchema::object("BillingAddress", billing_address()))
        .field(FieldSchema::object("PayerAccount", payer_account_information()))
        .field(FieldSchema::object("PurchaseInformation", purchase_information()))
        .field(FieldSchema::string("ChallengePreference").one_of(&[
            "NoPreference",
            "ChallengeRequired",
            "NoChallengeNeeded",
        ]))
        .rule(ConditionalRule::when("PaymentType", [json!("Reservation")]).then_required("ReservationPeriod"))
        .rule(
            ConditionalRule::when("PaymentType", [json!("Immediate"), json!("DelayedCapture")])
                .then_forbidden("ReservationPeriod"),
        )
        .rule(
            ConditionalRule::when("PaymentType", [json!("DelayedCapture")])
                .then_required("DelayedCapturePeriod"),
        )
        .rule(
            ConditionalRule::when("PaymentType", [json!("Immediate"), json!("Reservation")])
                .then_forbidden("DelayedCapturePeriod"),
        )
        .rule(ConditionalRule::when("InitiateRecurrence", [json!(true)]).then_required("RecurrenceId"))
}
