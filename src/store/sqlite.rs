use std::path::Path;

use chrono::NaiveDate;
use log::debug;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{Result, TrackerError};
use crate::overview::LedgerTotals;
use crate::store::LedgerStore;
use crate::types::{
    Debt, DebtId, DebtPayment, ExpenseCategory, ExpenseRecord, IncomeCategory, IncomeRecord,
    PaymentId, PaymentMethod, SavingsAccount,
};

const DB_SCHEMA_VERSION: i64 = 1;
const TXN_SAVEPOINT: &str = "ledger_txn";

/// sqlite-backed ledger
///
/// Single-connection, synchronous: the ledger is a single-user store and
/// every operation runs to completion before the next begins.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// open (or create) a ledger database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// open a throwaway in-memory ledger
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// record a new debt; creditor names are unique
    pub fn add_debt(
        &mut self,
        creditor: &str,
        amount_owed: Money,
        interest_rate: Rate,
        min_payment: Money,
    ) -> Result<Debt> {
        let exists: Option<String> = self
            .conn
            .query_row(
                "SELECT creditor FROM debts WHERE creditor = ?1",
                params![creditor],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
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
        self.conn.execute(
            "INSERT INTO debts (id, creditor, amount_owed, interest_rate, min_payment)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                debt.id.to_string(),
                debt.creditor,
                debt.amount_owed.to_string(),
                debt.interest_rate.as_percentage().to_string(),
                debt.min_payment.to_string(),
            ],
        )?;
        Ok(debt)
    }

    pub fn list_debts(&self) -> Result<Vec<Debt>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, creditor, amount_owed, interest_rate, min_payment
             FROM debts ORDER BY creditor ASC",
        )?;
        let debts = stmt
            .query_map([], map_debt_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(debts)
    }

    /// payment log entries for one debt, oldest first
    pub fn payments_for(&self, debt_id: DebtId) -> Result<Vec<DebtPayment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, debt_id, payment_amount, payment_date
             FROM debt_payments WHERE debt_id = ?1
             ORDER BY payment_date ASC, rowid ASC",
        )?;
        let payments = stmt
            .query_map(params![debt_id.to_string()], map_payment_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(payments)
    }

    /// sum of gross payments recorded against one debt
    pub fn total_paid(&self, debt_id: DebtId) -> Result<Money> {
        let total = self
            .payments_for(debt_id)?
            .iter()
            .map(|p| p.amount)
            .fold(Money::ZERO, |acc, x| acc + x);
        Ok(total)
    }

    pub fn savings(&self) -> Result<SavingsAccount> {
        let account = self.conn.query_row(
            "SELECT saved_amount, goal_amount, monthly_savings FROM savings
             WHERE id = (SELECT MIN(id) FROM savings)",
            [],
            |row| {
                Ok(SavingsAccount {
                    saved_amount: parse_money(0, row.get(0)?)?,
                    goal_amount: parse_money(1, row.get(1)?)?,
                    monthly_savings: parse_money(2, row.get(2)?)?,
                })
            },
        )?;
        Ok(account)
    }

    /// add a one-off amount to the savings balance
    pub fn add_to_savings(&mut self, amount: Money) -> Result<()> {
        self.adjust_savings(amount)
    }

    pub fn set_savings_goal(&mut self, goal: Money) -> Result<()> {
        let mut account = self.savings()?;
        account.goal_amount = goal;
        self.write_savings(&account)
    }

    /// raise the committed monthly rate; the increment also lands in the
    /// savings balance, matching how a new commitment starts this month
    pub fn add_monthly_savings(&mut self, amount: Money) -> Result<()> {
        let mut account = self.savings()?;
        account.monthly_savings += amount;
        account.saved_amount += amount;
        self.write_savings(&account)
    }

    fn write_savings(&mut self, account: &SavingsAccount) -> Result<()> {
        self.conn.execute(
            "UPDATE savings SET saved_amount = ?1, goal_amount = ?2, monthly_savings = ?3
             WHERE id = (SELECT MIN(id) FROM savings)",
            params![
                account.saved_amount.to_string(),
                account.goal_amount.to_string(),
                account.monthly_savings.to_string(),
            ],
        )?;
        Ok(())
    }

    pub fn add_income(
        &mut self,
        source: &str,
        amount: Money,
        category: IncomeCategory,
        date: NaiveDate,
    ) -> Result<IncomeRecord> {
        self.conn.execute(
            "INSERT INTO incomes (source, amount, category, date) VALUES (?1, ?2, ?3, ?4)",
            params![
                source,
                amount.to_string(),
                category.as_str(),
                date.to_string()
            ],
        )?;
        Ok(IncomeRecord {
            id: self.conn.last_insert_rowid(),
            source: source.to_string(),
            amount,
            category,
            date,
        })
    }

    pub fn list_incomes(&self) -> Result<Vec<IncomeRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, source, amount, category, date FROM incomes ORDER BY date ASC, id ASC",
        )?;
        let incomes = stmt
            .query_map([], map_income_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(incomes)
    }

    pub fn add_expense(
        &mut self,
        amount: Money,
        category: ExpenseCategory,
        method: PaymentMethod,
        date: NaiveDate,
    ) -> Result<ExpenseRecord> {
        self.conn.execute(
            "INSERT INTO expenses (amount, category, payment_method, date) VALUES (?1, ?2, ?3, ?4)",
            params![
                amount.to_string(),
                category.as_str(),
                method.as_str(),
                date.to_string()
            ],
        )?;
        Ok(ExpenseRecord {
            id: self.conn.last_insert_rowid(),
            amount,
            category,
            method,
            date,
        })
    }

    pub fn list_expenses(&self) -> Result<Vec<ExpenseRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, category, payment_method, date FROM expenses ORDER BY date ASC, id ASC",
        )?;
        let expenses = stmt
            .query_map([], map_expense_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(expenses)
    }

    /// ledger-wide sums for the dashboard overview
    pub fn totals(&self) -> Result<LedgerTotals> {
        let savings = self.savings()?;
        Ok(LedgerTotals {
            total_income: self.sum_column("SELECT amount FROM incomes")?,
            total_expenses: self.sum_column("SELECT amount FROM expenses")?,
            total_savings: savings.saved_amount,
            monthly_savings: savings.monthly_savings,
            total_debt: self.sum_column("SELECT amount_owed FROM debts")?,
            total_debt_payments: self.sum_column("SELECT payment_amount FROM debt_payments")?,
        })
    }

    // amounts are stored as decimal text, so summing happens here rather
    // than in SQL
    fn sum_column(&self, query: &str) -> Result<Money> {
        let mut stmt = self.conn.prepare(query)?;
        let amounts = stmt
            .query_map([], |row| parse_money(0, row.get(0)?))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(amounts.into_iter().fold(Money::ZERO, |acc, x| acc + x))
    }
}

impl LedgerStore for SqliteStore {
    fn get_debt(&self, creditor: &str) -> Result<Debt> {
        self.conn
            .query_row(
                "SELECT id, creditor, amount_owed, interest_rate, min_payment
                 FROM debts WHERE creditor = ?1",
                params![creditor],
                map_debt_row,
            )
            .optional()?
            .ok_or_else(|| TrackerError::DebtNotFound {
                creditor: creditor.to_string(),
            })
    }

    fn update_debt_balance(&mut self, creditor: &str, new_amount_owed: Money) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE debts SET amount_owed = ?1 WHERE creditor = ?2",
            params![new_amount_owed.to_string(), creditor],
        )?;
        if changed == 0 {
            return Err(TrackerError::DebtNotFound {
                creditor: creditor.to_string(),
            });
        }
        Ok(())
    }

    fn append_debt_payment(
        &mut self,
        debt_id: DebtId,
        amount: Money,
        date: NaiveDate,
    ) -> Result<PaymentId> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO debt_payments (id, debt_id, payment_amount, payment_date)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                id.to_string(),
                debt_id.to_string(),
                amount.to_string(),
                date.to_string()
            ],
        )?;
        Ok(id)
    }

    fn adjust_savings(&mut self, delta: Money) -> Result<()> {
        let mut account = self.savings()?;
        account.saved_amount += delta;
        self.write_savings(&account)
    }

    fn in_transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        self.conn
            .execute_batch(&format!("SAVEPOINT {TXN_SAVEPOINT}"))?;
        match f(self) {
            Ok(value) => {
                self.conn
                    .execute_batch(&format!("RELEASE {TXN_SAVEPOINT}"))?;
                Ok(value)
            }
            Err(err) => {
                debug!("rolling back ledger transaction: {err}");
                let _ = self.conn.execute_batch(&format!(
                    "ROLLBACK TO {TXN_SAVEPOINT}; RELEASE {TXN_SAVEPOINT}"
                ));
                Err(err)
            }
        }
    }
}

fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    let mut version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        apply_migration_1(conn)?;
        version = 1;
        conn.pragma_update(None, "user_version", version)?;
        debug!("initialized ledger schema at version {version}");
    }

    if version > DB_SCHEMA_VERSION {
        // future schema; do not fail reads/writes for forward-compatible changes
        conn.pragma_update(None, "user_version", version)?;
    }

    // the savings table is a logical singleton; seed its row on first open
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM savings", [], |row| row.get(0))?;
    if count == 0 {
        conn.execute(
            "INSERT INTO savings (saved_amount, goal_amount, monthly_savings) VALUES ('0', '0', '0')",
            [],
        )?;
    }

    Ok(())
}

fn apply_migration_1(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS debts (
            id TEXT PRIMARY KEY,
            creditor TEXT NOT NULL UNIQUE,
            amount_owed TEXT NOT NULL,
            interest_rate TEXT NOT NULL,
            min_payment TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS debt_payments (
            id TEXT PRIMARY KEY,
            debt_id TEXT NOT NULL REFERENCES debts (id),
            payment_amount TEXT NOT NULL,
            payment_date TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS savings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            saved_amount TEXT NOT NULL DEFAULT '0',
            goal_amount TEXT NOT NULL DEFAULT '0',
            monthly_savings TEXT NOT NULL DEFAULT '0'
        );

        CREATE TABLE IF NOT EXISTS incomes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source TEXT NOT NULL,
            amount TEXT NOT NULL,
            category TEXT NOT NULL CHECK(category IN ('salary', 'freelance', 'business', 'investments', 'other')),
            date TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            amount TEXT NOT NULL,
            category TEXT NOT NULL CHECK(category IN ('food', 'rent', 'utilities', 'entertainment', 'other')),
            payment_method TEXT NOT NULL CHECK(payment_method IN ('cash', 'credit_card', 'debit_card', 'other')),
            date TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_debt_payments_debt_id ON debt_payments (debt_id);
        ",
    )
}

fn map_debt_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Debt> {
    Ok(Debt {
        id: parse_uuid(0, row.get(0)?)?,
        creditor: row.get(1)?,
        amount_owed: parse_money(2, row.get(2)?)?,
        interest_rate: parse_rate(3, row.get(3)?)?,
        min_payment: parse_money(4, row.get(4)?)?,
    })
}

fn map_payment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DebtPayment> {
    Ok(DebtPayment {
        id: parse_uuid(0, row.get(0)?)?,
        debt_id: parse_uuid(1, row.get(1)?)?,
        amount: parse_money(2, row.get(2)?)?,
        date: parse_date(3, row.get(3)?)?,
    })
}

fn map_income_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<IncomeRecord> {
    let category: String = row.get(3)?;
    Ok(IncomeRecord {
        id: row.get(0)?,
        source: row.get(1)?,
        amount: parse_money(2, row.get(2)?)?,
        category: IncomeCategory::parse(&category)
            .ok_or_else(|| conversion_error(3, format!("unknown income category: {category}")))?,
        date: parse_date(4, row.get(4)?)?,
    })
}

fn map_expense_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ExpenseRecord> {
    let category: String = row.get(2)?;
    let method: String = row.get(3)?;
    Ok(ExpenseRecord {
        id: row.get(0)?,
        amount: parse_money(1, row.get(1)?)?,
        category: ExpenseCategory::parse(&category)
            .ok_or_else(|| conversion_error(2, format!("unknown expense category: {category}")))?,
        method: PaymentMethod::parse(&method)
            .ok_or_else(|| conversion_error(3, format!("unknown payment method: {method}")))?,
        date: parse_date(4, row.get(4)?)?,
    })
}

fn parse_money(idx: usize, text: String) -> rusqlite::Result<Money> {
    Money::from_str_exact(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// rates are stored as their annual percentage, the way users enter them
fn parse_rate(idx: usize, text: String) -> rusqlite::Result<Rate> {
    use std::str::FromStr;

    rust_decimal::Decimal::from_str(&text)
        .map(Rate::from_percentage)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_uuid(idx: usize, text: String) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_date(idx: usize, text: String) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}
