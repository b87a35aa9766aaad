use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tally_core::TransactionRecord;
use tally_reconcile::ReconciliationResult;
use tracing::debug;

use crate::error::ExportError;
use crate::{sections, HEADERS};

/// One sheet per collection: `Matches`, `Bookkeeping`, `Bank`. Amounts are
/// written as numbers so the workbook can be summed directly.
pub fn write_xlsx(result: &ReconciliationResult, path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    for (name, records) in sections(result) {
        let worksheet = workbook.add_worksheet().set_name(name)?;
        write_sheet(worksheet, records, &header)?;
    }

    workbook.save(path)?;
    debug!(path = %path.display(), "wrote xlsx result");
    Ok(())
}

fn write_sheet(
    worksheet: &mut Worksheet,
    records: &[TransactionRecord],
    header: &Format,
) -> Result<(), ExportError> {
    for (col, title) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, header)?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        worksheet.write_string(row, 0, record.date.as_str())?;
        worksheet.write_number(row, 1, record.amount.to_f64())?;
        worksheet.write_string(row, 2, record.issuer.as_str())?;
    }
    Ok(())
}
