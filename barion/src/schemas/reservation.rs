//! Follow-up operations on an existing payment.

use std::sync::LazyLock;

use super::{GUID, GUID_DESCRIPTION, payment};
use crate::schema::{FieldKind, FieldSchema, Schema};

/// `GET /v2/Payment/GetPaymentState`.
pub static GET_PAYMENT_STATE: LazyLock<Schema> =
    LazyLock::new(|| Schema::new("GetPaymentState").field(pos_key()).field(payment_id()));

/// `POST /v2/Payment/FinishReservation`.
pub static FINISH_RESERVATION: LazyLock<Schema> =
    LazyLock::new(|| settlement("FinishReservation"));

/// `POST /v2/Payment/Capture`.
pub static CAPTURE_AUTHORIZED_PAYMENT: LazyLock<Schema> =
    LazyLock::new(|| settlement("CaptureAuthorizedPayment"));

/// `POST /v2/Payment/CancelAuthorization`.
pub static CANCEL_AUTHORIZED_PAYMENT: LazyLock<Schema> =
    LazyLock::new(|| Schema::new("CancelAuthorizedPayment").field(pos_key()).field(payment_id()));

/// `POST /v2/Payment/Complete`.
pub static COMPLETE_PAYMENT: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("CompletePayment")
        .field(pos_key())
        .field(payment_id())
        .field(FieldSchema::string("PaymentRequestId").max_len(100))
});

/// Final amount of one transaction of a reserved or authorized payment.
///
/// A `Total` of zero releases the whole reservation of that transaction.
#[must_use]
pub fn transaction_to_finish() -> Schema {
    Schema::new("TransactionToFinish")
        .field(guid("TransactionId").required())
        .field(FieldSchema::number("Total").required().min(0.0))
        .field(FieldSchema::array(
            "PayeeTransactions",
            FieldKind::object(payment::payee_transaction()),
        ))
        .field(FieldSchema::array("Items", FieldKind::object(payment::item())))
        .field(FieldSchema::string("Comment").max_len(640))
}

pub(crate) fn pos_key() -> FieldSchema {
    FieldSchema::string("POSKey").required()
}

pub(crate) fn payment_id() -> FieldSchema {
    guid("PaymentId").required()
}

pub(crate) fn guid(name: &'static str) -> FieldSchema {
    FieldSchema::string(name).pattern(&GUID, GUID_DESCRIPTION)
}

fn settlement(name: &'static str) -> Schema {
    Schema::new(name)
        .field(pos_key())
        .field(payment_id())
        .field(
            FieldSchema::array("Transactions", FieldKind::object(transaction_to_finish()))
                .required()
                .min_items(1),
        )
}
