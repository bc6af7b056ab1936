use chrono::NaiveDate;
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{Result, TrackerError};
use crate::store::LedgerStore;
use crate::types::{Debt, DebtId, DebtPayment, PaymentId, SavingsAccount};

/// in-memory ledger, used as the zero-setup backend and test double
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    debts: Vec<Debt>,
    payments: Vec<DebtPayment>,
    savings: SavingsAccount,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// record a new debt; creditor names are unique
    pub fn add_debt(
        &mut self,
        creditor: &str,
        amount_owed: Money,
        interest_rate: Rate,
        min_payment: Money,
    ) -> Result<Debt> {
        if self.debts.iter().any(|d| d.creditor == creditor) {
            return Err(TrackerError::DuplicateCreditor {
                creditor: creditor.to_string(),
            });
        }

        let debt = Debt {
            id: Uuid::new_v4(),
            creditor: creditor.to_string(),
            amount_owed,
            interest_rate,
            min_payment,
        };
        self.debts.push(debt.clone());
        Ok(debt)
    }

    pub fn list_debts(&self) -> Vec<Debt> {
        self.debts.clone()
    }

    /// payment log entries for one debt, oldest first
    pub fn payments_for(&self, debt_id: DebtId) -> Vec<DebtPayment> {
        self.payments
            .iter()
            .filter(|p| p.debt_id == debt_id)
            .cloned()
            .collect()
    }

    pub fn savings(&self) -> SavingsAccount {
        self.savings.clone()
    }

    pub fn set_savings(&mut self, savings: SavingsAccount) {
        self.savings = savings;
    }
}

impl LedgerStore for MemoryStore {
    fn get_debt(&self, creditor: &str) -> Result<Debt> {
        self.debts
            .iter()
            .find(|d| d.creditor == creditor)
            .cloned()
            .ok_or_else(|| TrackerError::DebtNotFound {
                creditor: creditor.to_string(),
            })
    }

    fn update_debt_balance(&mut self, creditor: &str, new_amount_owed: Money) -> Result<()> {
        let debt = self
            .debts
            .iter_mut()
            .find(|d| d.creditor == creditor)
            .ok_or_else(|| TrackerError::DebtNotFound {
                creditor: creditor.to_string(),
            })?;
        debt.amount_owed = new_amount_owed;
        Ok(())
    }

    fn append_debt_payment(
        &mut self,
        debt_id: DebtId,
        amount: Money,
        date: NaiveDate,
    ) -> Result<PaymentId> {
        let id = Uuid::new_v4();
        self.payments.push(DebtPayment {
            id,
            debt_id,
            amount,
            date,
        });
        Ok(id)
    }

    fn adjust_savings(&mut self, delta: Money) -> Result<()> {
        self.savings.saved_amount += delta;
        Ok(())
    }

    fn in_transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        // rollback by snapshot: the whole ledger is small enough to clone
        let snapshot = self.clone();
        match f(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                *self = snapshot;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn store_with_debt() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .add_debt(
                "Visa",
                Money::from_major(500),
                Rate::from_percentage(dec!(24)),
                Money::from_major(25),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_get_debt_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get_debt("Visa").unwrap_err(),
            TrackerError::DebtNotFound { .. }
        ));
    }

    #[test]
    fn test_duplicate_creditor_rejected() {
        let mut store = store_with_debt();
        let err = store
            .add_debt("Visa", Money::ZERO, Rate::ZERO, Money::ZERO)
            .unwrap_err();
        assert!(matches!(err, TrackerError::DuplicateCreditor { .. }));
    }

    #[test]
    fn test_update_balance_and_log_payment() {
        let mut store = store_with_debt();
        let debt = store.get_debt("Visa").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();

        store
            .update_debt_balance("Visa", Money::from_major(460))
            .unwrap();
        store
            .append_debt_payment(debt.id, Money::from_major(50), date)
            .unwrap();

        assert_eq!(store.get_debt("Visa").unwrap().amount_owed, Money::from_major(460));

        let log = store.payments_for(debt.id);
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].amount, Money::from_major(50));
        assert_eq!(log[0].date, date);
    }

    #[test]
    fn test_adjust_savings_signed() {
        let mut store = MemoryStore::new();
        store.adjust_savings(Money::from_major(100)).unwrap();
        store.adjust_savings(Money::ZERO - Money::from_major(30)).unwrap();
        assert_eq!(store.savings().saved_amount, Money::from_major(70));
    }

    #[test]
    fn test_failed_transaction_rolls_back_every_write() {
        let mut store = store_with_debt();
        let debt = store.get_debt("Visa").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();

        let result: Result<()> = store.in_transaction(|s| {
            s.update_debt_balance("Visa", Money::from_major(460))?;
            s.append_debt_payment(debt.id, Money::from_major(50), date)?;
            s.adjust_savings(Money::ZERO - Money::from_major(50))?;
            // a late step failing must undo all of the above
            s.get_debt("missing")?;
            Ok(())
        });
        assert!(result.is_err());

        assert_eq!(store.get_debt("Visa").unwrap().amount_owed, Money::from_major(500));
        assert!(store.payments_for(debt.id).is_empty());
        assert_eq!(store.savings().saved_amount, Money::ZERO);
    }
}
