use serde::{Deserialize, Serialize};
use tally_core::{Money, TransactionRecord};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::date_index::{total, DateIndex};
use crate::matcher::{
    first_available, MatchStrategy, MatchedPair, MatchingEngine, CANDIDATE_LIMIT, GROUP_SIZE_LIMIT,
};
use crate::result::ReconciliationResult;
use crate::summation::{DateReport, SummationReconciler};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileMode {
    /// Match per bank date, then book the per-date difference.
    #[default]
    Summation,
    /// Match on date and amount across the whole ledger; no synthetic records.
    Direct,
}

/// What happens to bookkeeping records whose date never occurs on the bank side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookkeepingOnlyDates {
    /// Append them unchanged after the bank dates.
    #[default]
    Carry,
    /// Leave them out of the remaining bookkeeping.
    Drop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileSettings {
    pub mode: ReconcileMode,
    pub strategy: MatchStrategy,
    pub max_group_size: usize,
    pub max_candidates: usize,
    pub unmatched_bookkeeping_dates: BookkeepingOnlyDates,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            mode: ReconcileMode::Summation,
            strategy: MatchStrategy::Exact,
            max_group_size: 3,
            max_candidates: 20,
            unmatched_bookkeeping_dates: BookkeepingOnlyDates::Carry,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("max_group_size {0} exceeds the limit of {limit}", limit = GROUP_SIZE_LIMIT)]
    GroupSizeTooLarge(usize),
    #[error("max_candidates {0} exceeds the limit of {limit}", limit = CANDIDATE_LIMIT)]
    TooManyCandidates(usize),
}

impl ReconcileSettings {
    /// Rejects grouped-search bounds the matcher would otherwise clamp.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_group_size > GROUP_SIZE_LIMIT {
            return Err(SettingsError::GroupSizeTooLarge(self.max_group_size));
        }
        if self.max_candidates > CANDIDATE_LIMIT {
            return Err(SettingsError::TooManyCandidates(self.max_candidates));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct Reconciler {
    settings: ReconcileSettings,
}

impl Reconciler {
    pub fn new(settings: ReconcileSettings) -> Self {
        Self { settings }
    }

    fn matching_engine(&self) -> MatchingEngine {
        MatchingEngine::new(
            self.settings.strategy,
            self.settings.max_group_size,
            self.settings.max_candidates,
        )
    }

    /// Reconciles a bookkeeping ledger against a bank statement. Pure in its
    /// inputs: the same ledgers and settings always give the same result.
    #[instrument(
        skip_all,
        fields(
            mode = ?self.settings.mode,
            bookkeeping = bookkeeping.len(),
            bank = bank.len()
        )
    )]
    pub fn run(&self, bookkeeping: &[TransactionRecord], bank: &[TransactionRecord]) -> ReconciliationResult {
        let result = match self.settings.mode {
            ReconcileMode::Summation => self.run_summation(bookkeeping, bank),
            ReconcileMode::Direct => self.run_direct(bookkeeping, bank),
        };

        let summary = result.summary();
        info!(
            dates = summary.dates_processed,
            matches = summary.matches,
            adjustments = summary.adjustments,
            placeholders = summary.placeholders,
            unvisited = summary.unvisited_dates,
            "reconciliation finished"
        );
        result
    }

    fn run_summation(&self, bookkeeping: &[TransactionRecord], bank: &[TransactionRecord]) -> ReconciliationResult {
        let bookkeeping_index = DateIndex::build(bookkeeping);
        let bank_index = DateIndex::build(bank);
        let engine = self.matching_engine();
        let mut result = ReconciliationResult::default();

        for (date, bank_group) in bank_index.iter() {
            let aggregated = TransactionRecord::synthetic(date.clone(), total(bank_group));
            result.remaining_bank.push(aggregated.clone());

            let Some(bookkeeping_group) = bookkeeping_index.get(date) else {
                debug!(date = %date, amount = %aggregated.amount, "bank date without bookkeeping; placeholder");
                result.dates.push(DateReport {
                    date: date.clone(),
                    bank_total: aggregated.amount,
                    matched_total: Money::zero(),
                    bookkeeping_total: Money::zero(),
                    adjustment: None,
                    placeholder: true,
                });
                result.remaining_bookkeeping.push(aggregated);
                continue;
            };

            let mut outcome = engine.match_group(bookkeeping_group, bank_group);
            result.matches.extend(outcome.matches.iter().cloned());
            result.pairs.append(&mut outcome.pairs);

            let reconciliation = SummationReconciler::reconcile(date, bank_group, outcome);
            result.dates.push(reconciliation.report());
            result.remaining_bookkeeping.extend(reconciliation.into_remaining());
        }

        for (date, group) in bookkeeping_index.iter() {
            if bank_index.contains(date) {
                continue;
            }
            result.unvisited_dates.push(date.clone());
            match self.settings.unmatched_bookkeeping_dates {
                BookkeepingOnlyDates::Carry => {
                    warn!(date = %date, records = group.len(), "bookkeeping date absent from bank; carrying records");
                    result.remaining_bookkeeping.extend_from_slice(group);
                }
                BookkeepingOnlyDates::Drop => {
                    warn!(date = %date, records = group.len(), "bookkeeping date absent from bank; dropping records");
                }
            }
        }

        result
    }

    fn run_direct(&self, bookkeeping: &[TransactionRecord], bank: &[TransactionRecord]) -> ReconciliationResult {
        let mut consumed = vec![false; bookkeeping.len()];
        let mut result = ReconciliationResult {
            mode: ReconcileMode::Direct,
            ..Default::default()
        };

        for bank_record in bank {
            let hit = first_available(bookkeeping, &mut consumed, |k| {
                k.amount == bank_record.amount && k.date == bank_record.date
            });
            match hit {
                Some(idx) => {
                    result.matches.push(bank_record.clone());
                    result.pairs.push(MatchedPair {
                        bank: bank_record.clone(),
                        bookkeeping: vec![bookkeeping[idx].clone()],
                    });
                }
                None => result.remaining_bank.push(bank_record.clone()),
            }
        }

        result.remaining_bookkeeping = bookkeeping
            .iter()
            .zip(&consumed)
            .filter(|(_, used)| !**used)
            .map(|(r, _)| r.clone())
            .collect();

        let bank_index = DateIndex::build(bank);
        result.unvisited_dates = DateIndex::build(bookkeeping)
            .dates()
            .iter()
            .filter(|d| !bank_index.contains(d))
            .cloned()
            .collect();

        result
    }
}

/// Runs the default summation reconciliation with exact matching.
pub fn reconcile(bookkeeping: &[TransactionRecord], bank: &[TransactionRecord]) -> ReconciliationResult {
    Reconciler::default().run(bookkeeping, bank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::DateKey;

    fn rec(date: &str, amount: i64, issuer: &str) -> TransactionRecord {
        TransactionRecord::new(date, Money::from(amount), issuer)
    }

    fn system(date: &str, amount: i64) -> TransactionRecord {
        TransactionRecord::synthetic(DateKey::from(date), Money::from(amount))
    }

    #[test]
    fn matched_records_are_not_also_remaining() {
        let bookkeeping = vec![rec("d1", 100, "A"), rec("d1", 7, "B")];
        let bank = vec![rec("d1", 100, "Bank"), rec("d1", 7, "Bank")];

        let result = reconcile(&bookkeeping, &bank);

        assert_eq!(result.matches.len(), 2);
        assert!(result.remaining_bookkeeping.is_empty());
        assert_eq!(result.pairs[1].bookkeeping, vec![rec("d1", 7, "B")]);
    }

    #[test]
    fn bank_dates_visited_in_first_seen_order() {
        let bank = vec![rec("d3", 1, "Bank"), rec("d1", 2, "Bank"), rec("d3", 4, "Bank")];
        let result = reconcile(&[], &bank);
        assert_eq!(result.remaining_bank, vec![system("d3", 5), system("d1", 2)]);
        assert_eq!(result.remaining_bookkeeping, result.remaining_bank);
    }

    #[test]
    fn bookkeeping_only_dates_are_carried_by_default() {
        let bookkeeping = vec![rec("d1", 10, "A"), rec("d9", 99, "Orphan")];
        let bank = vec![rec("d1", 10, "Bank")];

        let result = reconcile(&bookkeeping, &bank);

        assert_eq!(result.remaining_bookkeeping, vec![rec("d9", 99, "Orphan")]);
        assert_eq!(result.unvisited_dates, vec![DateKey::from("d9")]);
    }

    #[test]
    fn bookkeeping_only_dates_can_be_dropped() {
        let settings = ReconcileSettings {
            unmatched_bookkeeping_dates: BookkeepingOnlyDates::Drop,
            ..Default::default()
        };
        let bookkeeping = vec![rec("d9", 99, "Orphan")];
        let bank = vec![rec("d1", 10, "Bank")];

        let result = Reconciler::new(settings).run(&bookkeeping, &bank);

        assert_eq!(result.remaining_bookkeeping, vec![system("d1", 10)]);
        assert_eq!(result.unvisited_dates, vec![DateKey::from("d9")]);
    }

    #[test]
    fn runs_are_repeatable() {
        let bookkeeping = vec![rec("d1", 100, "A"), rec("d2", 5, "B")];
        let bank = vec![rec("d2", 5, "Bank"), rec("d1", 90, "Bank")];
        let reconciler = Reconciler::default();
        assert_eq!(reconciler.run(&bookkeeping, &bank), reconciler.run(&bookkeeping, &bank));
    }

    #[test]
    fn direct_mode_matches_on_date_and_amount() {
        let settings = ReconcileSettings {
            mode: ReconcileMode::Direct,
            ..Default::default()
        };
        let bookkeeping = vec![rec("d1", 100, "A"), rec("d2", 50, "B"), rec("d3", 1, "C")];
        let bank = vec![rec("d2", 100, "Bank"), rec("d2", 50, "Bank"), rec("d1", 100, "Bank")];

        let result = Reconciler::new(settings).run(&bookkeeping, &bank);

        assert_eq!(result.matches, vec![rec("d2", 50, "Bank"), rec("d1", 100, "Bank")]);
        assert_eq!(result.remaining_bank, vec![rec("d2", 100, "Bank")]);
        assert_eq!(result.remaining_bookkeeping, vec![rec("d3", 1, "C")]);
        assert!(result.remaining_bookkeeping.iter().all(|r| !r.is_synthetic()));
        assert_eq!(result.unvisited_dates, vec![DateKey::from("d3")]);
    }

    #[test]
    fn settings_parse_from_toml() {
        let settings: ReconcileSettings = toml::from_str(
            r#"
            mode = "direct"
            strategy = "grouped"
            max_group_size = 4
            unmatched_bookkeeping_dates = "drop"
            "#,
        )
        .unwrap();
        assert_eq!(settings.mode, ReconcileMode::Direct);
        assert_eq!(settings.strategy, MatchStrategy::Grouped);
        assert_eq!(settings.max_group_size, 4);
        assert_eq!(settings.max_candidates, 20);
        assert_eq!(settings.unmatched_bookkeeping_dates, BookkeepingOnlyDates::Drop);

        assert!(toml::from_str::<ReconcileSettings>("tolerance = 1").is_err());
    }

    #[test]
    fn oversized_search_bounds_are_rejected() {
        assert_eq!(ReconcileSettings::default().validate(), Ok(()));

        let settings: ReconcileSettings = toml::from_str("max_candidates = 60
max_group_size = 10").unwrap();
        assert_eq!(settings.validate(), Err(SettingsError::GroupSizeTooLarge(10)));

        let settings = ReconcileSettings {
            max_candidates: 60,
            ..Default::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::TooManyCandidates(60)));
    }

    #[test]
    fn direct_mode_is_clean_only_when_everything_matches() {
        let direct = Reconciler::new(ReconcileSettings {
            mode: ReconcileMode::Direct,
            ..Default::default()
        });

        let result = direct.run(&[rec("d1", 100, "A")], &[rec("d1", 130, "Bank")]);
        assert_eq!(result.mode, ReconcileMode::Direct);
        assert!(!result.is_clean());

        let result = direct.run(&[rec("d1", 100, "A")], &[rec("d1", 100, "Bank")]);
        assert!(result.is_clean());
    }

    #[test]
    fn bookkeeping_only_dates_make_a_run_unclean() {
        let bookkeeping = vec![rec("d1", 10, "A"), rec("d9", 999, "Orphan")];
        let bank = vec![rec("d1", 10, "Bank")];

        let result = reconcile(&bookkeeping, &bank);
        assert_eq!(result.summary().adjustments, 0);
        assert_eq!(result.summary().placeholders, 0);
        assert!(!result.is_clean());

        let dropped = Reconciler::new(ReconcileSettings {
            unmatched_bookkeeping_dates: BookkeepingOnlyDates::Drop,
            ..Default::default()
        })
        .run(&bookkeeping, &bank);
        assert!(!dropped.is_clean());
    }
}
