//! Monthly budget and the running transaction log.
//!
//! Two JSON documents back the book: `{"monthly": <amount>}` for the budget and
//! an array of transactions for the log. Both may be absent on first run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::store::{self, Result, StoreError};
use crate::transaction::Transaction;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct BudgetDoc {
    monthly: f64,
}

/// Where spending stands against the monthly budget
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetStatus {
    NoBudget,
    Under { remaining: f64 },
    Over { by: f64 },
}

#[derive(Debug)]
pub struct BudgetBook {
    budget_path: PathBuf,
    transactions_path: PathBuf,
    monthly: f64,
    transactions: Vec<Transaction>,
}

impl BudgetBook {
    pub fn open(
        budget_path: impl AsRef<Path>,
        transactions_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let budget_path = budget_path.as_ref().to_path_buf();
        let transactions_path = transactions_path.as_ref().to_path_buf();

        let doc: BudgetDoc = store::read_json(&budget_path)?.unwrap_or_default();
        let transactions: Vec<Transaction> =
            store::read_json(&transactions_path)?.unwrap_or_default();
        tracing::debug!(
            monthly = doc.monthly,
            transactions = transactions.len(),
            "opened budget book"
        );

        Ok(Self {
            budget_path,
            transactions_path,
            monthly: doc.monthly,
            transactions,
        })
    }

    pub fn monthly(&self) -> f64 {
        self.monthly
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Set a new monthly budget. Starts a fresh tally: the transaction log is cleared.
    pub fn set_monthly(&mut self, amount: f64) -> Result<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(StoreError::InvalidBudget(amount));
        }
        store::write_json(&self.budget_path, &BudgetDoc { monthly: amount })?;
        self.monthly = amount;
        self.transactions.clear();
        store::write_json(&self.transactions_path, &self.transactions)?;
        tracing::info!(monthly = amount, "monthly budget updated, transaction log cleared");
        Ok(())
    }

    /// Append a transaction to the log and persist it.
    pub fn record(&mut self, tx: Transaction) -> Result<()> {
        self.transactions.push(tx);
        store::write_json(&self.transactions_path, &self.transactions)
    }

    /// Total debits dated in the same calendar month as `today`
    pub fn monthly_spending(&self, today: NaiveDate) -> f64 {
        self.transactions
            .iter()
            .filter(|t| t.is_debit() && t.in_month_of(today))
            .map(|t| t.amount)
            .sum()
    }

    pub fn is_breached(&self, today: NaiveDate) -> bool {
        self.monthly_spending(today) > self.monthly
    }

    pub fn status(&self, today: NaiveDate) -> BudgetStatus {
        let spent = self.monthly_spending(today);
        if self.monthly == 0.0 {
            BudgetStatus::NoBudget
        } else if spent > self.monthly {
            BudgetStatus::Over {
                by: spent - self.monthly,
            }
        } else {
            BudgetStatus::Under {
                remaining: self.monthly - spent,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionKind;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book(dir: &Path) -> BudgetBook {
        BudgetBook::open(dir.join("budget.json"), dir.join("transactions.json")).unwrap()
    }

    #[test]
    fn test_fresh_book_has_no_budget() {
        let dir = tempfile::tempdir().unwrap();
        let b = book(dir.path());
        assert_eq!(b.monthly(), 0.0);
        assert!(b.transactions().is_empty());
        assert_eq!(b.status(day(2025, 7, 10)), BudgetStatus::NoBudget);
    }

    #[test]
    fn test_spending_counts_only_debits_in_month() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = book(dir.path());
        b.record(Transaction::debit(1200.0, day(2025, 7, 1), "GTBank")).unwrap();
        b.record(Transaction::debit(300.0, day(2025, 7, 20), "Access")).unwrap();
        b.record(Transaction::debit(999.0, day(2025, 6, 30), "Access")).unwrap();
        b.record(Transaction {
            amount: 5000.0,
            kind: TransactionKind::Credit,
            date: day(2025, 7, 2),
            source: "Salary".into(),
        })
        .unwrap();

        assert_eq!(b.monthly_spending(day(2025, 7, 15)), 1500.0);
        assert_eq!(b.monthly_spending(day(2025, 6, 1)), 999.0);
    }

    #[test]
    fn test_breach_is_strictly_greater() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = book(dir.path());
        b.set_monthly(1000.0).unwrap();
        b.record(Transaction::debit(1000.0, day(2025, 7, 1), "x")).unwrap();
        assert!(!b.is_breached(day(2025, 7, 9)));
        assert_eq!(b.status(day(2025, 7, 9)), BudgetStatus::Under { remaining: 0.0 });

        b.record(Transaction::debit(0.5, day(2025, 7, 2), "x")).unwrap();
        assert!(b.is_breached(day(2025, 7, 9)));
        assert_eq!(b.status(day(2025, 7, 9)), BudgetStatus::Over { by: 0.5 });
    }

    #[test]
    fn test_set_monthly_clears_log_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = book(dir.path());
        b.record(Transaction::debit(10.0, day(2025, 7, 1), "x")).unwrap();
        b.set_monthly(250.0).unwrap();
        assert!(b.transactions().is_empty());

        let reopened = book(dir.path());
        assert_eq!(reopened.monthly(), 250.0);
        assert!(reopened.transactions().is_empty());
    }

    #[test]
    fn test_set_monthly_rejects_negative() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = book(dir.path());
        assert!(matches!(b.set_monthly(-1.0), Err(StoreError::InvalidBudget(_))));
        assert!(matches!(b.set_monthly(f64::NAN), Err(StoreError::InvalidBudget(_))));
        assert_eq!(b.monthly(), 0.0);
    }

    #[test]
    fn test_log_accumulates_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        book(dir.path())
            .record(Transaction::debit(1.0, day(2025, 7, 1), "a"))
            .unwrap();
        book(dir.path())
            .record(Transaction::debit(2.0, day(2025, 7, 2), "b"))
            .unwrap();
        assert_eq!(book(dir.path()).transactions().len(), 2);
    }
}
