use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Issuer written on every record the reconciler synthesizes.
pub const SYSTEM_ISSUER: &str = "System";

/// Opaque grouping key. Dates are compared by exact string equality and are
/// never interpreted as calendar values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    pub fn new(key: impl Into<String>) -> Self {
        DateKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DateKey {
    fn from(value: &str) -> Self {
        DateKey(value.to_string())
    }
}

impl From<String> for DateKey {
    fn from(value: String) -> Self {
        DateKey(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerSide {
    Bookkeeping,
    Bank,
}

impl fmt::Display for LedgerSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerSide::Bookkeeping => write!(f, "Bookkeeping"),
            LedgerSide::Bank => write!(f, "Bank"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: DateKey,
    pub amount: Money,
    pub issuer: String,
    /// Set only on records the reconciler creates. A ledger row whose issuer
    /// happens to read `System` stays a ledger row.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
}

impl TransactionRecord {
    pub fn new(date: impl Into<DateKey>, amount: impl Into<Money>, issuer: impl Into<String>) -> Self {
        TransactionRecord {
            date: date.into(),
            amount: amount.into(),
            issuer: issuer.into(),
            synthetic: false,
        }
    }

    /// A record produced by the reconciler rather than read from a ledger.
    pub fn synthetic(date: DateKey, amount: Money) -> Self {
        TransactionRecord {
            date,
            amount,
            issuer: SYSTEM_ISSUER.to_string(),
            synthetic: true,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.amount, self.issuer)
    }
}
