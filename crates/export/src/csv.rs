use std::fs;
use std::io::Write;
use std::path::Path;

use tally_core::TransactionRecord;
use tally_reconcile::ReconciliationResult;
use tracing::debug;

use crate::error::ExportError;
use crate::{sections, HEADERS};

/// Writes `matches.csv`, `bookkeeping.csv` and `bank.csv` into `dir`,
/// creating it if needed.
pub fn write_csv_dir(result: &ReconciliationResult, dir: &Path) -> Result<(), ExportError> {
    fs::create_dir_all(dir)?;
    for (name, records) in sections(result) {
        let path = dir.join(format!("{}.csv", name.to_lowercase()));
        let file = fs::File::create(&path)?;
        write_records(file, records)?;
        debug!(path = %path.display(), records = records.len(), "wrote CSV section");
    }
    Ok(())
}

/// Header row is always written, even for an empty collection.
pub fn write_records<W: Write>(out: W, records: &[TransactionRecord]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADERS)?;
    for record in records {
        let amount = record.amount.to_string();
        writer.write_record([record.date.as_str(), amount.as_str(), record.issuer.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::Money;

    fn render(records: &[TransactionRecord]) -> String {
        let mut buf = Vec::new();
        write_records(&mut buf, records).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_collection_keeps_header() {
        assert_eq!(render(&[]), "date,amount,issuer\n");
    }

    #[test]
    fn amounts_keep_exact_decimal_text() {
        let out = render(&[
            TransactionRecord::new("2024-01-15", Money::from_cents(-1050), "ACME, Inc."),
            TransactionRecord::new("2024-01-16", Money::from_cents(10), "System"),
        ]);
        assert_eq!(
            out,
            "date,amount,issuer\n2024-01-15,-10.5,\"ACME, Inc.\"\n2024-01-16,0.1,System\n"
        );
    }
}
