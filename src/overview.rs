use serde::{Deserialize, Serialize};

use crate::decimal::Money;

/// ledger-wide sums backing the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LedgerTotals {
    pub total_income: Money,
    pub total_expenses: Money,
    pub total_savings: Money,
    pub monthly_savings: Money,
    pub total_debt: Money,
    pub total_debt_payments: Money,
}

/// aggregate dashboard view
///
/// Both remaining balances subtract committed monthly savings from net
/// income; the first then subtracts debt still owed, the second the gross
/// payments already made against it. Either may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialOverview {
    pub totals: LedgerTotals,
    pub remaining_balance: Money,
    pub remaining_balance_without_debt: Money,
}

impl FinancialOverview {
    pub fn from_totals(totals: LedgerTotals) -> Self {
        let net = totals.total_income - totals.total_expenses - totals.monthly_savings;
        Self {
            totals,
            remaining_balance: net - totals.total_debt,
            remaining_balance_without_debt: net - totals.total_debt_payments,
        }
    }
}
