//! Bookkeeping vs. bank statement reconciliation.
//!
//! Both ledgers are bucketed by date key. For every date the bank reports,
//! equal-amount records are paired off, and whatever the remaining
//! bookkeeping does not explain is booked as a `System` adjustment. The
//! engine does no I/O; callers hand in parsed records and receive a fresh
//! [`ReconciliationResult`].

pub mod date_index;
pub mod engine;
pub mod matcher;
pub mod result;
pub mod summation;

pub use date_index::DateIndex;
pub use engine::{reconcile, BookkeepingOnlyDates, ReconcileMode, ReconcileSettings, Reconciler, SettingsError};
pub use matcher::{MatchOutcome, MatchStrategy, MatchedPair, MatchingEngine, CANDIDATE_LIMIT, GROUP_SIZE_LIMIT};
pub use result::{ReconciliationResult, RunSummary};
pub use summation::{DateReconciliation, DateReport, SummationReconciler};
