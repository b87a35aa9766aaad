pub mod csv;
pub mod error;
pub mod ledger;
pub mod normalize;
pub mod profile;
pub mod workbook;

pub use csv::{import_csv, import_csv_file, CsvImporter};
pub use error::ImportError;
pub use ledger::{ColumnMap, LedgerRows};
pub use normalize::{normalize_header, parse_amount};
pub use profile::ImportProfile;
pub use workbook::{import_workbook, Ledgers};
