use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{Result, TrackerError};

/// outcome of a minimum-payment payoff simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoffProjection {
    /// whole periods until the balance reaches zero
    pub months: u32,
    /// cumulative interest paid over the payoff
    pub total_interest: Money,
}

impl PayoffProjection {
    /// payoff horizon in fractional years
    pub fn years(&self) -> Decimal {
        Decimal::from(self.months) / dec!(12)
    }
}

/// simulate paying a debt down to zero under a fixed recurring payment
///
/// Pure computation over the supplied inputs; one iteration per period.
/// Each period accrues `balance * annual_rate / 12` of interest, and the
/// remainder of the payment retires principal. A payment that never covers
/// a period's interest would loop forever, so non-progress is rejected
/// with `PaymentNeverAmortizes` instead.
pub fn simulate_minimum_payoff(
    amount_owed: Money,
    interest_rate: Rate,
    min_payment: Money,
) -> Result<PayoffProjection> {
    if min_payment <= Money::ZERO {
        return Err(TrackerError::InvalidMinimumPayment {
            provided: min_payment,
        });
    }

    let mut balance = amount_owed;
    let mut total_interest = Money::ZERO;
    let mut months = 0u32;

    while balance > Money::ZERO {
        let interest = balance.monthly_interest(interest_rate);
        let principal = min_payment - interest;

        if principal <= Money::ZERO {
            return Err(TrackerError::PaymentNeverAmortizes {
                min_payment,
                interest_due: interest,
            });
        }

        balance -= principal;
        total_interest += interest;
        months += 1;
    }

    Ok(PayoffProjection {
        months,
        total_interest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(percent: i64) -> Rate {
        Rate::from_percentage(Decimal::from(percent))
    }

    #[test]
    fn test_payoff_1200_at_12_percent() {
        // period 1: interest 12.00, principal 188.00, balance 1012.00;
        // runs dry in period 7 with 43.85 total interest
        let projection =
            simulate_minimum_payoff(Money::from_major(1_200), rate(12), Money::from_major(200))
                .unwrap();

        assert_eq!(projection.months, 7);
        assert_eq!(projection.total_interest, Money::from_str_exact("43.85").unwrap());
    }

    #[test]
    fn test_years_accessor() {
        let projection = PayoffProjection {
            months: 18,
            total_interest: Money::ZERO,
        };
        assert_eq!(projection.years(), dec!(1.5));
    }

    #[test]
    fn test_zero_balance_pays_off_immediately() {
        let projection =
            simulate_minimum_payoff(Money::ZERO, rate(12), Money::from_major(50)).unwrap();

        assert_eq!(projection.months, 0);
        assert_eq!(projection.total_interest, Money::ZERO);
    }

    #[test]
    fn test_zero_rate_divides_evenly() {
        let projection =
            simulate_minimum_payoff(Money::from_major(1_000), Rate::ZERO, Money::from_major(100))
                .unwrap();

        assert_eq!(projection.months, 10);
        assert_eq!(projection.total_interest, Money::ZERO);
    }

    #[test]
    fn test_non_positive_minimum_payment_rejected() {
        let err = simulate_minimum_payoff(Money::from_major(1_000), rate(12), Money::ZERO)
            .unwrap_err();

        assert!(matches!(
            err,
            TrackerError::InvalidMinimumPayment { .. }
        ));
    }

    #[test]
    fn test_payment_swallowed_by_interest_fails_fast() {
        // 1000 * 24% / 12 = 20.00 of interest per period; a 20.00 payment
        // retires no principal at all
        let err = simulate_minimum_payoff(Money::from_major(1_000), rate(24), Money::from_major(20))
            .unwrap_err();

        match err {
            TrackerError::PaymentNeverAmortizes {
                min_payment,
                interest_due,
            } => {
                assert_eq!(min_payment, Money::from_major(20));
                assert_eq!(interest_due, Money::from_major(20));
            }
            other => panic!("expected PaymentNeverAmortizes, got {other:?}"),
        }
    }

    #[test]
    fn test_interest_is_nonnegative_and_months_positive() {
        let projection =
            simulate_minimum_payoff(Money::from_major(500), rate(24), Money::from_major(50))
                .unwrap();

        assert!(projection.months >= 1);
        assert!(projection.total_interest >= Money::ZERO);
    }
}
