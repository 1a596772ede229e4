//! Turning a confirmed candidate into an expense/income record draft.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendwise_ingest::{Direction, TransactionCandidate};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DraftError {
    #[error("amount not detected; enter it manually")]
    MissingAmount,

    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("amount must not be negative: {0}")]
    NegativeAmount(Decimal),
}

/// How the user chose to book the candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    #[serde(rename = "expense")]
    Expense,
    #[serde(rename = "income")]
    Income,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordCategory {
    Income,
    Other,
}

/// A record ready to hand to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub title: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category: RecordCategory,
}

/// Title used when no counterparty was extracted
pub fn default_title(direction: Direction) -> &'static str {
    match direction {
        Direction::Debit => "Bank debit",
        Direction::Credit => "Bank credit",
    }
}

/// Build a record from a candidate.
///
/// The candidate's amount wins; `manual_amount` is only consulted when the
/// parser found none. A missing date falls back to `today`.
pub fn draft_record(
    candidate: &TransactionCandidate,
    kind: RecordKind,
    manual_amount: Option<Decimal>,
    today: NaiveDate,
) -> Result<RecordDraft, DraftError> {
    let amount = candidate
        .amount
        .or(manual_amount)
        .ok_or(DraftError::MissingAmount)?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(DraftError::NegativeAmount(amount));
    }

    let title = candidate
        .counterparty
        .clone()
        .unwrap_or_else(|| default_title(candidate.direction).to_string());

    let category = match kind {
        RecordKind::Income => RecordCategory::Income,
        RecordKind::Expense => RecordCategory::Other,
    };

    Ok(RecordDraft {
        title,
        amount,
        date: candidate.occurred_on.unwrap_or(today),
        category,
    })
}

/// Parse an amount typed by the user, e.g. `"1,250.5"` or `"₹ 300"`.
pub fn parse_manual_amount(input: &str) -> Result<Decimal, DraftError> {
    let trimmed = input.trim();
    let without_marker = ["₹", "Rs.", "Rs", "INR"]
        .iter()
        .find_map(|m| trimmed.strip_prefix(m))
        .unwrap_or(trimmed);
    let digits: String = without_marker
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if digits.is_empty() {
        return Err(DraftError::InvalidAmount(input.to_string()));
    }
    let mut value =
        Decimal::from_str(&digits).map_err(|_| DraftError::InvalidAmount(input.to_string()))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DraftError::NegativeAmount(value));
    }
    value.rescale(2);
    if value.scale() != 2 {
        return Err(DraftError::InvalidAmount(input.to_string()));
    }
    Ok(value)
}
