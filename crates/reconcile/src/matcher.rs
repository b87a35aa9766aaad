use serde::{Deserialize, Serialize};
use tally_core::{Money, TransactionRecord};
use tracing::debug;

/// Largest bookkeeping subset a single bank record may absorb.
pub const GROUP_SIZE_LIMIT: usize = 5;
/// Most unmatched bookkeeping records a grouped search will consider.
pub const CANDIDATE_LIMIT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// One bank record pairs with one bookkeeping record of equal amount.
    #[default]
    Exact,
    /// Exact pairing first, then a bank record may absorb a combination of
    /// bookkeeping records whose amounts add up to it exactly.
    Grouped,
}

/// A bank record and the bookkeeping record(s) it was matched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub bank: TransactionRecord,
    pub bookkeeping: Vec<TransactionRecord>,
}

impl MatchedPair {
    pub fn is_grouped(&self) -> bool {
        self.bookkeeping.len() > 1
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    /// Bank-side records that found a counterpart, in bank order.
    pub matches: Vec<TransactionRecord>,
    pub pairs: Vec<MatchedPair>,
    /// Bookkeeping records left over, in their original relative order.
    pub unmatched_bookkeeping: Vec<TransactionRecord>,
    pub unmatched_bank: Vec<TransactionRecord>,
}

impl MatchOutcome {
    pub fn matched_total(&self) -> Money {
        self.matches.iter().map(|r| r.amount).sum()
    }
}

pub struct MatchingEngine {
    pub strategy: MatchStrategy,
    pub max_group_size: usize,
    pub max_candidates: usize,
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::Exact,
            max_group_size: 3,
            max_candidates: 20,
        }
    }
}

impl MatchingEngine {
    /// Search bounds above [`GROUP_SIZE_LIMIT`] and [`CANDIDATE_LIMIT`] are clamped.
    pub fn new(strategy: MatchStrategy, max_group_size: usize, max_candidates: usize) -> Self {
        Self {
            strategy,
            max_group_size: max_group_size.min(GROUP_SIZE_LIMIT),
            max_candidates: max_candidates.min(CANDIDATE_LIMIT),
        }
    }

    /// Pairs the records of one date bucket. Neither input is modified; the
    /// consumed bookkeeping records are tracked by index and the leftovers are
    /// returned as fresh collections.
    pub fn match_group(
        &self,
        bookkeeping: &[TransactionRecord],
        bank: &[TransactionRecord],
    ) -> MatchOutcome {
        let mut consumed = vec![false; bookkeeping.len()];
        let mut bank_hits: Vec<Option<Vec<usize>>> = bank
            .iter()
            .map(|b| first_available(bookkeeping, &mut consumed, |k| k.amount == b.amount))
            .map(|hit| hit.map(|idx| vec![idx]))
            .collect();

        if self.strategy == MatchStrategy::Grouped {
            self.match_combinations(bookkeeping, bank, &mut consumed, &mut bank_hits);
        }

        let mut outcome = MatchOutcome::default();
        for (bank_record, hit) in bank.iter().zip(bank_hits) {
            match hit {
                Some(indices) => {
                    outcome.matches.push(bank_record.clone());
                    outcome.pairs.push(MatchedPair {
                        bank: bank_record.clone(),
                        bookkeeping: indices.iter().map(|&i| bookkeeping[i].clone()).collect(),
                    });
                }
                None => outcome.unmatched_bank.push(bank_record.clone()),
            }
        }
        outcome.unmatched_bookkeeping = bookkeeping
            .iter()
            .zip(&consumed)
            .filter(|(_, used)| !**used)
            .map(|(r, _)| r.clone())
            .collect();
        outcome
    }

    fn match_combinations(
        &self,
        bookkeeping: &[TransactionRecord],
        bank: &[TransactionRecord],
        consumed: &mut [bool],
        bank_hits: &mut [Option<Vec<usize>>],
    ) {
        let max_group_size = self.max_group_size.min(GROUP_SIZE_LIMIT);
        let max_candidates = self.max_candidates.min(CANDIDATE_LIMIT);
        if max_group_size < 2 {
            return;
        }

        for (bank_record, hit) in bank.iter().zip(bank_hits.iter_mut()) {
            if hit.is_some() {
                continue;
            }

            let candidates: Vec<usize> = (0..bookkeeping.len()).filter(|&i| !consumed[i]).collect();
            if candidates.len() < 2 {
                return;
            }
            if candidates.len() > max_candidates {
                debug!(
                    candidates = candidates.len(),
                    limit = max_candidates,
                    "too many bookkeeping records for grouped matching; skipping"
                );
                return;
            }

            let amounts: Vec<Money> = candidates.iter().map(|&i| bookkeeping[i].amount).collect();
            let max_size = max_group_size.min(candidates.len());
            let found = (2..=max_size)
                .find_map(|size| find_combination(&amounts, size, bank_record.amount));

            if let Some(positions) = found {
                let indices: Vec<usize> = positions.iter().map(|&p| candidates[p]).collect();
                for &i in &indices {
                    consumed[i] = true;
                }
                debug!(
                    date = %bank_record.date,
                    amount = %bank_record.amount,
                    parts = indices.len(),
                    "grouped match"
                );
                *hit = Some(indices);
            }
        }
    }
}

/// Index of the first unconsumed record satisfying `pred`, marking it consumed.
pub(crate) fn first_available<F>(
    records: &[TransactionRecord],
    consumed: &mut [bool],
    pred: F,
) -> Option<usize>
where
    F: Fn(&TransactionRecord) -> bool,
{
    let idx = (0..records.len()).find(|&i| !consumed[i] && pred(&records[i]))?;
    consumed[idx] = true;
    Some(idx)
}

/// First combination of `size` positions, in lexicographic order, whose
/// amounts sum exactly to `target`.
fn find_combination(amounts: &[Money], size: usize, target: Money) -> Option<Vec<usize>> {
    let n = amounts.len();
    if size == 0 || size > n {
        return None;
    }

    let mut combo: Vec<usize> = (0..size).collect();
    loop {
        let sum: Money = combo.iter().map(|&i| amounts[i]).sum();
        if sum == target {
            return Some(combo);
        }

        // Advance to the next combination.
        let mut i = size;
        loop {
            if i == 0 {
                return None;
            }
            i -= 1;
            if combo[i] < n - size + i {
                break;
            }
        }
        combo[i] += 1;
        for j in (i + 1)..size {
            combo[j] = combo[j - 1] + 1;
        }
    }
}
