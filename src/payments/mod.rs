pub mod payoff;

use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{Result, TrackerError};
use crate::types::OverpaymentPolicy;

pub use payoff::{simulate_minimum_payoff, PayoffProjection};

/// interest/principal split of a single additional payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSplit {
    /// full payment amount, as recorded in the payment log
    pub gross: Money,
    /// portion covering the current period's interest
    pub interest: Money,
    /// portion retiring principal
    pub principal: Money,
    /// balance after applying the principal portion
    pub new_balance: Money,
    /// amount paid beyond the remaining balance, zero when none
    pub overpayment: Money,
}

/// split an additional payment into interest and principal for the period
///
/// The period's interest is `amount_owed * annual_rate / 12`; whatever the
/// payment covers beyond that retires principal. A payment that does not
/// even cover the interest is rejected with `InsufficientPayment` so the
/// caller mutates nothing. When the principal portion exceeds the balance,
/// the excess lands in `overpayment` and the policy decides whether the
/// new balance floors at zero or carries the credit.
pub fn split_additional_payment(
    amount_owed: Money,
    interest_rate: Rate,
    payment: Money,
    policy: OverpaymentPolicy,
) -> Result<PaymentSplit> {
    if payment <= Money::ZERO {
        return Err(TrackerError::InvalidPaymentAmount { amount: payment });
    }

    let interest = amount_owed.monthly_interest(interest_rate);
    let principal = payment - interest;

    if principal < Money::ZERO {
        return Err(TrackerError::InsufficientPayment {
            payment,
            interest_due: interest,
        });
    }

    let unclamped = amount_owed - principal;
    let overpayment = if unclamped < Money::ZERO {
        unclamped.abs()
    } else {
        Money::ZERO
    };
    let new_balance = match policy {
        OverpaymentPolicy::ClampToZero => unclamped.max(Money::ZERO),
        OverpaymentPolicy::AllowCredit => unclamped,
    };

    Ok(PaymentSplit {
        gross: payment,
        interest,
        principal,
        new_balance,
        overpayment,
    })
}
