//! Reads both ledgers from one spreadsheet (xlsx, xls, xlsb, ods), one sheet per ledger.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{Duration, NaiveDate};
use tally_core::{LedgerSide, TransactionRecord};
use tracing::debug;

use crate::error::ImportError;
use crate::ledger::{ColumnMap, LedgerRows};
use crate::profile::ImportProfile;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledgers {
    pub bookkeeping: Vec<TransactionRecord>,
    pub bank: Vec<TransactionRecord>,
}

pub fn import_workbook(path: &Path, profile: &ImportProfile) -> Result<Ledgers, ImportError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names().to_vec();

    let mut read_sheet = |side: LedgerSide, wanted: &str| -> Result<Vec<TransactionRecord>, ImportError> {
        let name = find_sheet(&sheet_names, wanted).ok_or_else(|| ImportError::MissingSheet(wanted.to_string()))?;
        let range = workbook.worksheet_range(name)?;
        parse_range(&range, side, profile)
    };

    let bookkeeping = read_sheet(LedgerSide::Bookkeeping, profile.bookkeeping_sheet.as_str())?;
    let bank = read_sheet(LedgerSide::Bank, profile.bank_sheet.as_str())?;
    Ok(Ledgers { bookkeeping, bank })
}

/// Sheet lookup is exact first, then case-insensitive.
fn find_sheet<'a>(names: &'a [String], wanted: &str) -> Option<&'a str> {
    names
        .iter()
        .find(|n| n.as_str() == wanted)
        .or_else(|| names.iter().find(|n| n.trim().eq_ignore_ascii_case(wanted.trim())))
        .map(String::as_str)
}

pub fn parse_range(
    range: &Range<Data>,
    side: LedgerSide,
    profile: &ImportProfile,
) -> Result<Vec<TransactionRecord>, ImportError> {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(ImportError::MissingHeader { side })?
        .iter()
        .map(|c| cell_text(c, &profile.date_format))
        .collect();
    let columns = ColumnMap::resolve(side, &headers, profile)?;
    let parser = LedgerRows::new(side, columns, profile);

    // Row numbers follow the sheet, which may not start at A1.
    let first_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);

    let mut records = Vec::new();
    for (idx, row) in rows.enumerate() {
        let cells: Vec<String> = row.iter().map(|c| cell_text(c, &profile.date_format)).collect();
        if let Some(record) = parser.parse(first_row + idx + 1, &cells)? {
            records.push(record);
        }
    }

    debug!(side = %side, records = records.len(), "read worksheet ledger");
    Ok(records)
}

/// Renders a cell the way a spreadsheet displays it, so every ledger column
/// reaches the row parser as text.
fn cell_text(cell: &Data, date_format: &str) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => serial_to_date(dt.as_f64())
            .map(|d| d.format(date_format).to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Converts an Excel serial day number (1900 date system) to a calendar date.
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    // Day 60 is the phantom 1900-02-29; the 1899-12-30 epoch is exact after it.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let days = serial.floor() as i64;
    let days = if days < 60 { days + 1 } else { days };
    epoch.checked_add_signed(Duration::days(days))
}
