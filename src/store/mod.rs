pub mod memory;
pub mod sqlite;

use chrono::NaiveDate;

use crate::decimal::Money;
use crate::errors::Result;
use crate::types::{Debt, DebtId, PaymentId};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// persistence collaborator for the debt engine
///
/// The four data operations are the engine's entire storage surface;
/// `in_transaction` lets them compose into one atomic unit so a failed
/// step cannot leave the debt balance, payment log, and savings balance
/// disagreeing with each other.
pub trait LedgerStore {
    /// look up a debt by creditor name
    fn get_debt(&self, creditor: &str) -> Result<Debt>;

    /// overwrite a debt's outstanding balance
    fn update_debt_balance(&mut self, creditor: &str, new_amount_owed: Money) -> Result<()>;

    /// append an immutable entry to the payment log
    fn append_debt_payment(
        &mut self,
        debt_id: DebtId,
        amount: Money,
        date: NaiveDate,
    ) -> Result<PaymentId>;

    /// apply a signed delta to the savings balance
    fn adjust_savings(&mut self, delta: Money) -> Result<()>;

    /// run `f` atomically: every write commits on `Ok` and rolls back on `Err`
    fn in_transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
        Self: Sized;
}
