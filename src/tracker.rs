use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::payments::{simulate_minimum_payoff, split_additional_payment, PaymentSplit, PayoffProjection};
use crate::store::LedgerStore;
use crate::types::{DebtId, OverpaymentPolicy, PaymentId};

/// record of one applied additional payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentApplication {
    pub payment_id: PaymentId,
    pub debt_id: DebtId,
    pub creditor: String,
    pub split: PaymentSplit,
    pub date: NaiveDate,
}

/// debt engine bound to a ledger store
///
/// Every operation names its debt explicitly; there is no selected-debt
/// session state.
pub struct DebtTracker<S: LedgerStore> {
    store: S,
    overpayment_policy: OverpaymentPolicy,
}

impl<S: LedgerStore> DebtTracker<S> {
    pub fn new(store: S) -> Self {
        Self::with_policy(store, OverpaymentPolicy::default())
    }

    pub fn with_policy(store: S, overpayment_policy: OverpaymentPolicy) -> Self {
        Self {
            store,
            overpayment_policy,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// project a debt's payoff under its recorded minimum payment
    ///
    /// Read-only: the stored debt is untouched.
    pub fn payoff_projection(&self, creditor: &str) -> Result<PayoffProjection> {
        let debt = self.store.get_debt(creditor)?;
        simulate_minimum_payoff(debt.amount_owed, debt.interest_rate, debt.min_payment)
    }

    /// apply a one-off payment to a debt
    ///
    /// Splits the payment for the current period, then updates the debt
    /// balance, appends the gross amount to the payment log, and deducts it
    /// from savings in a single transaction. A split that fails validation
    /// reaches the store not at all; a store step that fails rolls back the
    /// other writes.
    pub fn apply_additional_payment(
        &mut self,
        creditor: &str,
        payment: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentApplication> {
        let debt = self.store.get_debt(creditor)?;
        let split = split_additional_payment(
            debt.amount_owed,
            debt.interest_rate,
            payment,
            self.overpayment_policy,
        )?;
        let date = time_provider.now().date_naive();

        let payment_id = self.store.in_transaction(|store| {
            store.update_debt_balance(&debt.creditor, split.new_balance)?;
            let id = store.append_debt_payment(debt.id, split.gross, date)?;
            store.adjust_savings(Money::ZERO - split.gross)?;
            Ok(id)
        })?;

        Ok(PaymentApplication {
            payment_id,
            debt_id: debt.id,
            creditor: debt.creditor,
            split,
            date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use hourglass_rs::TimeSource;

    use crate::decimal::Rate;
    use crate::errors::TrackerError;
    use crate::store::MemoryStore;
    use crate::types::SavingsAccount;

    fn test_clock() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap(),
        ))
    }

    fn tracker_with_debt(balance: i64, rate_percent: i64, min_payment: i64) -> DebtTracker<MemoryStore> {
        let mut store = MemoryStore::new();
        store
            .add_debt(
                "Visa",
                Money::from_major(balance),
                Rate::from_percentage(rust_decimal::Decimal::from(rate_percent)),
                Money::from_major(min_payment),
            )
            .unwrap();
        store.set_savings(SavingsAccount {
            saved_amount: Money::from_major(1_000),
            goal_amount: Money::ZERO,
            monthly_savings: Money::ZERO,
        });
        DebtTracker::new(store)
    }

    #[test]
    fn test_payoff_projection_reads_stored_debt() {
        let tracker = tracker_with_debt(1_200, 12, 200);
        let projection = tracker.payoff_projection("Visa").unwrap();

        assert_eq!(projection.months, 7);
        assert_eq!(
            projection.total_interest,
            Money::from_str_exact("43.85").unwrap()
        );
    }

    #[test]
    fn test_payoff_projection_unknown_creditor() {
        let tracker = tracker_with_debt(1_200, 12, 200);
        assert!(matches!(
            tracker.payoff_projection("Mastercard").unwrap_err(),
            TrackerError::DebtNotFound { .. }
        ));
    }

    #[test]
    fn test_apply_payment_updates_all_three_records() {
        let mut tracker = tracker_with_debt(500, 24, 25);
        let clock = test_clock();

        let application = tracker
            .apply_additional_payment("Visa", Money::from_major(50), &clock)
            .unwrap();

        assert_eq!(application.split.interest, Money::from_major(10));
        assert_eq!(application.split.principal, Money::from_major(40));
        assert_eq!(application.split.new_balance, Money::from_major(460));
        assert_eq!(application.date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());

        let store = tracker.store();
        assert_eq!(store.get_debt("Visa").unwrap().amount_owed, Money::from_major(460));

        // log keeps the gross amount, not the principal portion
        let log = store.payments_for(application.debt_id);
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].amount, Money::from_major(50));
        assert_eq!(log[0].id, application.payment_id);

        assert_eq!(store.savings().saved_amount, Money::from_major(950));
    }

    #[test]
    fn test_insufficient_payment_leaves_everything_unchanged() {
        let mut tracker = tracker_with_debt(1_000, 24, 25);
        let clock = test_clock();

        let err = tracker
            .apply_additional_payment("Visa", Money::from_major(15), &clock)
            .unwrap_err();
        match err {
            TrackerError::InsufficientPayment {
                payment,
                interest_due,
            } => {
                assert_eq!(payment, Money::from_major(15));
                assert_eq!(interest_due, Money::from_major(20));
            }
            other => panic!("expected InsufficientPayment, got {other:?}"),
        }

        let store = tracker.store();
        let debt = store.get_debt("Visa").unwrap();
        assert_eq!(debt.amount_owed, Money::from_major(1_000));
        assert!(store.payments_for(debt.id).is_empty());
        assert_eq!(store.savings().saved_amount, Money::from_major(1_000));
    }

    #[test]
    fn test_overpayment_clamps_and_reports() {
        let mut tracker = tracker_with_debt(100, 12, 10);
        let clock = test_clock();

        let application = tracker
            .apply_additional_payment("Visa", Money::from_major(200), &clock)
            .unwrap();

        assert_eq!(application.split.new_balance, Money::ZERO);
        assert_eq!(application.split.overpayment, Money::from_major(99));

        // the retired debt stays on file at zero
        let store = tracker.store();
        assert_eq!(store.get_debt("Visa").unwrap().amount_owed, Money::ZERO);
        // savings still drops by the gross payment
        assert_eq!(store.savings().saved_amount, Money::from_major(800));
    }

    #[test]
    fn test_payment_history_sums_to_gross_payments() {
        let mut tracker = tracker_with_debt(500, 24, 25);
        let clock = test_clock();

        tracker
            .apply_additional_payment("Visa", Money::from_major(50), &clock)
            .unwrap();
        tracker
            .apply_additional_payment("Visa", Money::from_major(60), &clock)
            .unwrap();

        let store = tracker.store();
        let debt = store.get_debt("Visa").unwrap();
        let total: Money = store
            .payments_for(debt.id)
            .iter()
            .map(|p| p.amount)
            .fold(Money::ZERO, |acc, x| acc + x);
        assert_eq!(total, Money::from_major(110));
    }
}
