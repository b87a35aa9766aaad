//! Writers for a reconciliation result: an xlsx workbook, a directory of CSV
//! files, or one JSON document.

pub mod csv;
pub mod error;
pub mod json;
pub mod xlsx;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tally_core::TransactionRecord;
use tally_reconcile::ReconciliationResult;

pub use crate::csv::write_csv_dir;
pub use error::ExportError;
pub use json::{write_json, JsonReport};
pub use xlsx::write_xlsx;

/// Column headers shared by every tabular output.
pub const HEADERS: [&str; 3] = ["date", "amount", "issuer"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
    Json,
}

impl OutputFormat {
    /// File extension for single-file formats; CSV output is a directory.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            OutputFormat::Xlsx => Some("xlsx"),
            OutputFormat::Csv => None,
            OutputFormat::Json => Some("json"),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// The three labeled collections every tabular output carries, in sheet order.
pub fn sections(result: &ReconciliationResult) -> [(&'static str, &[TransactionRecord]); 3] {
    [
        ("Matches", result.matches.as_slice()),
        ("Bookkeeping", result.remaining_bookkeeping.as_slice()),
        ("Bank", result.remaining_bank.as_slice()),
    ]
}

/// Writes `result` to `path` in the given format. For CSV, `path` is a directory.
pub fn write_result(
    result: &ReconciliationResult,
    format: OutputFormat,
    path: &Path,
) -> Result<(), ExportError> {
    match format {
        OutputFormat::Xlsx => write_xlsx(result, path),
        OutputFormat::Csv => write_csv_dir(result, path),
        OutputFormat::Json => write_json(result, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing() {
        assert_eq!("xlsx".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
        assert_eq!(" JSON ".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!(matches!(
            "pdf".parse::<OutputFormat>(),
            Err(ExportError::UnknownFormat(ref f)) if f == "pdf"
        ));
    }

    #[test]
    fn format_names_round_trip_through_display() {
        for format in [OutputFormat::Xlsx, OutputFormat::Csv, OutputFormat::Json] {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
        assert_eq!(OutputFormat::Csv.extension(), None);
    }

    #[test]
    fn sections_are_in_sheet_order() {
        let names: Vec<&str> = sections(&ReconciliationResult::default()).iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["Matches", "Bookkeeping", "Bank"]);
    }
}
