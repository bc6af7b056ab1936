use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};

/// unique identifier for a debt
pub type DebtId = Uuid;

/// unique identifier for a recorded debt payment
pub type PaymentId = Uuid;

/// income categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeCategory {
    Salary,
    Freelance,
    Business,
    Investments,
    Other,
}

impl IncomeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeCategory::Salary => "salary",
            IncomeCategory::Freelance => "freelance",
            IncomeCategory::Business => "business",
            IncomeCategory::Investments => "investments",
            IncomeCategory::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "salary" => Some(IncomeCategory::Salary),
            "freelance" => Some(IncomeCategory::Freelance),
            "business" => Some(IncomeCategory::Business),
            "investments" => Some(IncomeCategory::Investments),
            "other" => Some(IncomeCategory::Other),
            _ => None,
        }
    }
}

/// expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Food,
    Rent,
    Utilities,
    Entertainment,
    Other,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "food",
            ExpenseCategory::Rent => "rent",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Entertainment => "entertainment",
            ExpenseCategory::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "food" => Some(ExpenseCategory::Food),
            "rent" => Some(ExpenseCategory::Rent),
            "utilities" => Some(ExpenseCategory::Utilities),
            "entertainment" => Some(ExpenseCategory::Entertainment),
            "other" => Some(ExpenseCategory::Other),
            _ => None,
        }
    }
}

/// how an expense was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(PaymentMethod::Cash),
            "credit_card" => Some(PaymentMethod::CreditCard),
            "debit_card" => Some(PaymentMethod::DebitCard),
            "other" => Some(PaymentMethod::Other),
            _ => None,
        }
    }
}

/// how a payment larger than the remaining balance is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OverpaymentPolicy {
    /// floor the balance at zero and report the excess
    #[default]
    ClampToZero,
    /// keep the negative balance as a credit
    AllowCredit,
}

/// tracked debt
///
/// A debt is never deleted by payment application; a fully repaid debt
/// remains on file with a zero balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: DebtId,
    /// creditor name, unique across the ledger
    pub creditor: String,
    pub amount_owed: Money,
    /// annual interest rate
    pub interest_rate: Rate,
    pub min_payment: Money,
}

/// append-only debt payment log entry
///
/// `amount` is the gross payment, not just the principal portion, so the
/// log reconciles with balance deltas independently of the split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtPayment {
    pub id: PaymentId,
    pub debt_id: DebtId,
    pub amount: Money,
    pub date: NaiveDate,
}

/// singleton savings account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SavingsAccount {
    pub saved_amount: Money,
    pub goal_amount: Money,
    pub monthly_savings: Money,
}

impl SavingsAccount {
    /// amount still needed to reach the goal, floored at zero
    pub fn remaining_to_goal(&self) -> Money {
        (self.goal_amount - self.saved_amount).max(Money::ZERO)
    }

    /// fractional months until the goal is reached at the current monthly
    /// savings rate, or `None` when no goal or no monthly savings is set
    pub fn months_to_goal(&self) -> Option<Decimal> {
        if self.goal_amount <= Money::ZERO || self.monthly_savings <= Money::ZERO {
            return None;
        }
        Some(self.remaining_to_goal().as_decimal() / self.monthly_savings.as_decimal())
    }
}

/// recorded income entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub id: i64,
    pub source: String,
    pub amount: Money,
    pub category: IncomeCategory,
    pub date: NaiveDate,
}

/// recorded expense entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    pub amount: Money,
    pub category: ExpenseCategory,
    pub method: PaymentMethod,
    pub date: NaiveDate,
}
