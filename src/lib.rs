pub mod decimal;
pub mod errors;
pub mod overview;
pub mod payments;
pub mod store;
pub mod tracker;
pub mod types;

// re-export key types
pub use decimal::{Money, Rate};
pub use errors::{Result, TrackerError};
pub use overview::{FinancialOverview, LedgerTotals};
pub use payments::{
    simulate_minimum_payoff, split_additional_payment, PaymentSplit, PayoffProjection,
};
pub use store::{LedgerStore, MemoryStore, SqliteStore};
pub use tracker::{DebtTracker, PaymentApplication};
pub use types::{
    Debt, DebtId, DebtPayment, ExpenseCategory, ExpenseRecord, IncomeCategory, IncomeRecord,
    OverpaymentPolicy, PaymentId, PaymentMethod, SavingsAccount,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
