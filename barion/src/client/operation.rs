//! Operation to endpoint and schema binding.

use std::fmt;

use crate::{
    schema::Schema,
    schemas::{payment, refund, reservation, wallet},
};

/// HTTP method an operation is sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Request fields go into the query string.
    Get,
    /// Request fields go into a JSON body.
    Post,
}

/// One remote capability of the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Prepare a new payment.
    StartPayment,
    /// Query the state of a payment.
    GetPaymentState,
    /// Settle a reservation payment.
    FinishReservation,
    /// Capture a delayed-capture payment.
    CaptureAuthorizedPayment,
    /// Release a delayed-capture payment.
    CancelAuthorizedPayment,
    /// Complete a payment started with a payment-completion flow.
    CompletePayment,
    /// Refund a completed payment.
    RefundPayment,
    /// Withdraw wallet balance to a bank account.
    BankTransfer,
    /// Send money to another Barion wallet.
    BarionTransfer,
    /// List the wallet's accounts.
    GetAccounts,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::StartPayment,
        Self::GetPaymentState,
        Self::FinishReservation,
        Self::CaptureAuthorizedPayment,
        Self::CancelAuthorizedPayment,
        Self::CompletePayment,
        Self::RefundPayment,
        Self::BankTransfer,
        Self::BarionTransfer,
        Self::GetAccounts,
    ];

    /// HTTP method of the endpoint.
    #[must_use]
    pub fn method(self) -> HttpMethod {
        match self {
            Self::GetPaymentState | Self::GetAccounts => HttpMethod::Get,
            _ => HttpMethod::Post,
        }
    }

    /// Path relative to the environment's base URL.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::StartPayment => "/v2/Payment/Start",
            Self::GetPaymentState => "/v2/Payment/GetPaymentState",
            Self::FinishReservation => "/v2/Payment/FinishReservation",
            Self::CaptureAuthorizedPayment => "/v2/Payment/Capture",
            Self::CancelAuthorizedPayment => "/v2/Payment/CancelAuthorization",
            Self::CompletePayment => "/v2/Payment/Complete",
            Self::RefundPayment => "/v2/Payment/Refund",
            Self::BankTransfer => "/v2/Withdraw/BankTransfer",
            Self::BarionTransfer => "/v2/Transfer/Send",
            Self::GetAccounts => "/v2/Accounts/Get",
        }
    }

    /// Request schema.
    #[must_use]
    pub fn schema(self) -> &'static Schema {
        match self {
            Self::StartPayment => &payment::START_PAYMENT,
            Self::GetPaymentState => &reservation::GET_PAYMENT_STATE,
            Self::FinishReservation => &reservation::FINISH_RESERVATION,
            Self::CaptureAuthorizedPayment => &reservation::CAPTURE_AUTHORIZED_PAYMENT,
            Self::CancelAuthorizedPayment => &reservation::CANCEL_AUTHORIZED_PAYMENT,
            Self::CompletePayment => &reservation::COMPLETE_PAYMENT,
            Self::RefundPayment => &refund::REFUND_PAYMENT,
            Self::BankTransfer => &wallet::BANK_TRANSFER,
            Self::BarionTransfer => &wallet::BARION_TRANSFER,
            Self::GetAccounts => &wallet::GET_ACCOUNTS,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
