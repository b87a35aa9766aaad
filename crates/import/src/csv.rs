use std::fs::File;
use std::io::Read;
use std::path::Path;

use tally_core::{LedgerSide, TransactionRecord};
use tracing::debug;

use crate::error::ImportError;
use crate::ledger::{ColumnMap, LedgerRows};
use crate::profile::ImportProfile;

pub struct CsvImporter;

impl CsvImporter {
    pub fn parse_ledger<R: Read>(
        reader: &mut csv::Reader<R>,
        side: LedgerSide,
        profile: &ImportProfile,
    ) -> Result<Vec<TransactionRecord>, ImportError> {
        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(ImportError::MissingHeader { side });
        }
        let headers: Vec<&str> = headers.iter().collect();
        let columns = ColumnMap::resolve(side, &headers, profile)?;
        let rows = LedgerRows::new(side, columns, profile);

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let cells: Vec<&str> = record.iter().collect();
            if let Some(parsed) = rows.parse(idx + 2, &cells)? {
                records.push(parsed);
            }
        }

        debug!(side = %side, records = records.len(), "read CSV ledger");
        Ok(records)
    }

    pub fn detect_columns<R: Read>(reader: &mut csv::Reader<R>) -> Result<Vec<String>, ImportError> {
        Ok(reader.headers()?.iter().map(|s| s.to_string()).collect())
    }
}

pub fn import_csv<R: Read>(
    data: R,
    side: LedgerSide,
    profile: &ImportProfile,
) -> Result<Vec<TransactionRecord>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(profile.delimiter_byte())
        .from_reader(data);

    CsvImporter::parse_ledger(&mut reader, side, profile)
}

pub fn import_csv_file(
    path: &Path,
    side: LedgerSide,
    profile: &ImportProfile,
) -> Result<Vec<TransactionRecord>, ImportError> {
    let file = File::open(path)?;
    import_csv(file, side, profile)
}
