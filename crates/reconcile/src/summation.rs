use serde::Serialize;
use tally_core::{DateKey, Money, TransactionRecord};
use tracing::debug;

use crate::date_index::total;
use crate::matcher::MatchOutcome;

/// Per-date balance check between what the bank reported and what the
/// bookkeeping still has to account for once matched pairs are set aside.
#[derive(Debug, Clone, PartialEq)]
pub struct DateReconciliation {
    pub date: DateKey,
    pub bank_total: Money,
    pub matched_total: Money,
    pub bookkeeping_total: Money,
    /// Unmatched bookkeeping records, carried forward unchanged.
    pub carried: Vec<TransactionRecord>,
    pub adjustment: Option<TransactionRecord>,
}

impl DateReconciliation {
    /// Bank total not covered by matched pairs.
    pub fn unexplained_bank_total(&self) -> Money {
        self.bank_total - self.matched_total
    }

    pub fn is_balanced(&self) -> bool {
        self.adjustment.is_none()
    }

    /// Carried records followed by the adjustment, if any.
    pub fn into_remaining(self) -> Vec<TransactionRecord> {
        let mut remaining = self.carried;
        remaining.extend(self.adjustment);
        remaining
    }

    pub fn report(&self) -> DateReport {
        DateReport {
            date: self.date.clone(),
            bank_total: self.bank_total,
            matched_total: self.matched_total,
            bookkeeping_total: self.bookkeeping_total,
            adjustment: self.adjustment.as_ref().map(|r| r.amount),
            placeholder: false,
        }
    }
}

/// Serializable per-date breakdown kept on the run result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateReport {
    pub date: DateKey,
    pub bank_total: Money,
    pub matched_total: Money,
    pub bookkeeping_total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<Money>,
    /// The date had no bookkeeping records at all.
    pub placeholder: bool,
}

pub struct SummationReconciler;

impl SummationReconciler {
    /// Compares the date's bank total, net of matched bank records, with the
    /// total of the bookkeeping records matching left over. A difference is
    /// booked as one `System` record carrying `bank - bookkeeping`.
    pub fn reconcile(date: &DateKey, bank_group: &[TransactionRecord], outcome: MatchOutcome) -> DateReconciliation {
        let bank_total = total(bank_group);
        let matched_total = outcome.matched_total();
        let bookkeeping_total = total(&outcome.unmatched_bookkeeping);
        let difference = bank_total - matched_total - bookkeeping_total;

        let adjustment = if difference.is_zero() {
            None
        } else {
            Some(TransactionRecord::synthetic(date.clone(), difference))
        };

        debug!(
            date = %date,
            bank = %bank_total,
            matched = %matched_total,
            bookkeeping = %bookkeeping_total,
            difference = %difference,
            "summed date"
        );

        DateReconciliation {
            date: date.clone(),
            bank_total,
            matched_total,
            bookkeeping_total,
            carried: outcome.unmatched_bookkeeping,
            adjustment,
        }
    }
}
