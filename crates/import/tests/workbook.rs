use rust_xlsxwriter::Workbook;
use tally_core::{Money, TransactionRecord};
use tally_import::{import_csv_file, import_workbook, ImportError, ImportProfile};

type Row = (&'static str, f64, &'static str);

fn write_fixture(path: &std::path::Path, sheets: &[(&str, &[Row])]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        sheet.write_string(0, 0, "Date").unwrap();
        sheet.write_string(0, 1, "Amount").unwrap();
        sheet.write_string(0, 2, "Issuer").unwrap();
        for (i, (date, amount, issuer)) in rows.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, *date).unwrap();
            sheet.write_number(row, 1, *amount).unwrap();
            sheet.write_string(row, 2, *issuer).unwrap();
        }
    }
    workbook.save(path).unwrap();
}

#[test]
fn reads_both_ledgers_from_one_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledgers.xlsx");
    let books: &[Row] = &[("2024-01-15", 100.0, "A"), ("2024-01-15", 50.25, "B")];
    let bank: &[Row] = &[("2024-01-15", 150.25, "Bank")];
    write_fixture(&path, &[("Bookkeeping", books), ("Bank", bank)]);

    let ledgers = import_workbook(&path, &ImportProfile::default()).unwrap();

    assert_eq!(
        ledgers.bookkeeping,
        vec![
            TransactionRecord::new("2024-01-15", Money::from(100), "A"),
            TransactionRecord::new("2024-01-15", Money::from_cents(5025), "B"),
        ]
    );
    assert_eq!(ledgers.bank, vec![TransactionRecord::new("2024-01-15", Money::from_cents(15025), "Bank")]);
}

#[test]
fn missing_sheet_is_reported_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("only-books.xlsx");
    let books: &[Row] = &[("2024-01-15", 1.0, "A")];
    write_fixture(&path, &[("Bookkeeping", books)]);

    let err = import_workbook(&path, &ImportProfile::default()).unwrap_err();
    assert!(matches!(err, ImportError::MissingSheet(ref name) if name == "Bank"));
}

#[test]
fn custom_sheet_names_from_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("renamed.xlsx");
    let books: &[Row] = &[("d1", 1.0, "A")];
    let bank: &[Row] = &[("d1", 2.0, "Bank")];
    write_fixture(&path, &[("Books", books), ("Statement", bank)]);
    let profile = ImportProfile::from_toml("bookkeeping_sheet = \"Books\"\nbank_sheet = \"Statement\"").unwrap();

    let ledgers = import_workbook(&path, &profile).unwrap();
    assert_eq!(ledgers.bank[0].amount, Money::from(2));
}

#[test]
fn csv_file_import() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bank.csv");
    std::fs::write(&path, "DATE , AMOUNT,issuer\n2024-02-01,\"2,500.00\",Rent\n").unwrap();

    let records = import_csv_file(&path, tally_core::LedgerSide::Bank, &ImportProfile::default()).unwrap();
    assert_eq!(records, vec![TransactionRecord::new("2024-02-01", Money::from(2500), "Rent")]);
}

#[test]
fn missing_file_is_io_error() {
    let err = import_csv_file(
        std::path::Path::new("/nonexistent/tally/bank.csv"),
        tally_core::LedgerSide::Bank,
        &ImportProfile::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ImportError::Io(_)));
}
