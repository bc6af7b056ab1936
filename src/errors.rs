use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("minimum payment must be positive: {provided}")]
    InvalidMinimumPayment {
        provided: Money,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("payment insufficient to cover interest: interest due {interest_due}, provided {payment}")]
    InsufficientPayment {
        payment: Money,
        interest_due: Money,
    },

    #[error("minimum payment {min_payment} does not exceed monthly interest {interest_due}: balance will never amortize")]
    PaymentNeverAmortizes {
        min_payment: Money,
        interest_due: Money,
    },

    #[error("debt not found: {creditor}")]
    DebtNotFound {
        creditor: String,
    },

    #[error("debt already recorded for creditor: {creditor}")]
    DuplicateCreditor {
        creditor: String,
    },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
