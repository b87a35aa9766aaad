use tally_core::LedgerSide;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Sheet '{0}' not found in workbook")]
    MissingSheet(String),
    #[error("{side} ledger has no header row")]
    MissingHeader { side: LedgerSide },
    #[error("{side} ledger is missing required column '{column}'")]
    MissingColumn { side: LedgerSide, column: String },
    #[error("{side} row {row}: invalid amount '{value}'")]
    InvalidAmount {
        side: LedgerSide,
        row: usize,
        value: String,
    },
    #[error("{side} row {row}: missing date")]
    MissingDate { side: LedgerSide, row: usize },
}
