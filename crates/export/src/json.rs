use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tally_core::{DateKey, TransactionRecord};
use tally_reconcile::{MatchedPair, ReconciliationResult, RunSummary};
use tracing::debug;

use crate::error::ExportError;

/// JSON view of a run. Amounts serialize as decimal strings.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub matches: &'a [TransactionRecord],
    pub bookkeeping: &'a [TransactionRecord],
    pub bank: &'a [TransactionRecord],
    pub pairs: &'a [MatchedPair],
    pub unvisited_dates: &'a [DateKey],
    pub summary: RunSummary,
}

impl<'a> From<&'a ReconciliationResult> for JsonReport<'a> {
    fn from(result: &'a ReconciliationResult) -> Self {
        JsonReport {
            matches: &result.matches,
            bookkeeping: &result.remaining_bookkeeping,
            bank: &result.remaining_bank,
            pairs: &result.pairs,
            unvisited_dates: &result.unvisited_dates,
            summary: result.summary(),
        }
    }
}

pub fn write_json(result: &ReconciliationResult, path: &Path) -> Result<(), ExportError> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, &JsonReport::from(result))?;
    out.write_all(b"\n")?;
    out.flush()?;
    debug!(path = %path.display(), "wrote JSON result");
    Ok(())
}
