use serde::Serialize;
use tally_core::{DateKey, Money, TransactionRecord};

use crate::engine::ReconcileMode;
use crate::matcher::MatchedPair;
use crate::summation::DateReport;

/// Everything a single reconciliation run produces. A fresh value is built
/// on every run; nothing is shared between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconciliationResult {
    pub mode: ReconcileMode,
    /// Bookkeeping records left after matching, plus the synthetic
    /// adjustment and placeholder records.
    pub remaining_bookkeeping: Vec<TransactionRecord>,
    /// One aggregated `System` record per bank date (individual unmatched
    /// records in direct mode).
    pub remaining_bank: Vec<TransactionRecord>,
    /// Bank-side records that found an equal-amount counterpart.
    pub matches: Vec<TransactionRecord>,
    pub pairs: Vec<MatchedPair>,
    /// Bookkeeping dates that never appear on the bank side.
    pub unvisited_dates: Vec<DateKey>,
    pub dates: Vec<DateReport>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub dates_processed: usize,
    pub matches: usize,
    pub grouped_matches: usize,
    pub adjustments: usize,
    pub placeholders: usize,
    pub unvisited_dates: usize,
    pub remaining_bookkeeping: usize,
    pub remaining_bank: usize,
    pub adjustment_total: Money,
}

impl ReconciliationResult {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            dates_processed: self.dates.len(),
            matches: self.matches.len(),
            grouped_matches: self.pairs.iter().filter(|p| p.is_grouped()).count(),
            adjustments: self.dates.iter().filter(|d| d.adjustment.is_some()).count(),
            placeholders: self.dates.iter().filter(|d| d.placeholder).count(),
            unvisited_dates: self.unvisited_dates.len(),
            remaining_bookkeeping: self.remaining_bookkeeping.len(),
            remaining_bank: self.remaining_bank.len(),
            adjustment_total: self.dates.iter().filter_map(|d| d.adjustment).sum(),
        }
    }

    /// True when both ledgers fully explain each other. In summation mode
    /// that means no adjustment, no placeholder and no bookkeeping date
    /// missing from the bank; in direct mode, nothing left unmatched.
    pub fn is_clean(&self) -> bool {
        match self.mode {
            ReconcileMode::Summation => {
                let summary = self.summary();
                summary.adjustments == 0 && summary.placeholders == 0 && summary.unvisited_dates == 0
            }
            ReconcileMode::Direct => self.remaining_bookkeeping.is_empty() && self.remaining_bank.is_empty(),
        }
    }

    pub fn remaining_bookkeeping_on<'a>(
        &'a self,
        date: &'a DateKey,
    ) -> impl Iterator<Item = &'a TransactionRecord> + 'a {
        self.remaining_bookkeeping.iter().filter(move |r| &r.date == date)
    }
}
