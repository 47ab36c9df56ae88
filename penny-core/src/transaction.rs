//! Transaction record types produced by ingestion and tallied by the budget book

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Direction of money movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    #[serde(rename = "debit")]
    Debit,
    #[serde(rename = "credit")]
    Credit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Debit => "debit",
            TransactionKind::Credit => "credit",
        }
    }
}

/// A single structured transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Positive currency value
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Date of the transaction (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Bank name or card label
    pub source: String,
}

impl Transaction {
    pub fn debit(amount: f64, date: NaiveDate, source: impl Into<String>) -> Self {
        Self {
            amount,
            kind: TransactionKind::Debit,
            date,
            source: source.into(),
        }
    }

    pub fn is_debit(&self) -> bool {
        self.kind == TransactionKind::Debit
    }

    /// True when the transaction falls in the same calendar month and year as `day`
    pub fn in_month_of(&self, day: NaiveDate) -> bool {
        self.date.year() == day.year() && self.date.month() == day.month()
    }
}
