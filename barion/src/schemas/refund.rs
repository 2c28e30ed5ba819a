//! Refunds of completed payments.

use std::sync::LazyLock;

use super::{payment, reservation};
use crate::schema::{FieldKind, FieldSchema, Schema};

/// `POST /v2/Payment/Refund`.
pub static REFUND_PAYMENT: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("RefundPayment")
        .field(reservation::pos_key())
        .field(reservation::payment_id())
        .field(
            FieldSchema::array("TransactionsToRefund", FieldKind::object(transaction_to_refund()))
                .required()
                .min_items(1),
        )
});

/// Amount to give back from one transaction.
#[must_use]
pub fn transaction_to_refund() -> Schema {
    Schema::new("TransactionToRefund")
        .field(reservation::guid("TransactionId").required())
        .field(FieldSchema::string("POSTransactionId").required().max_len(100))
        .field(FieldSchema::number("AmountToRefund").required().greater_than(0.0))
        .field(FieldSchema::array("Items", FieldKind::object(payment::item())))
        .field(FieldSchema::string("Comment").max_len(640))
}
