use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether money left (debit) or entered (credit) the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    /// Past-tense verb used in user-facing messages ("Debited", "Credited").
    pub fn verb(&self) -> &'static str {
        match self {
            Direction::Debit => "Debited",
            Direction::Credit => "Credited",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Debit => f.write_str("debit"),
            Direction::Credit => f.write_str("credit"),
        }
    }
}

/// Unconfirmed transaction extracted from a free-text bank notification.
///
/// Only `direction` is guaranteed; every other field degrades to `None`
/// independently when its rules find nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCandidate {
    /// Input text exactly as supplied
    pub raw: String,
    pub direction: Direction,
    /// Non-negative, scale 2
    pub amount: Option<Decimal>,
    /// Trimmed vendor label, capped with an ellipsis
    pub counterparty: Option<String>,
    /// Serialized as YYYY-MM-DD
    pub occurred_on: Option<NaiveDate>,
}
