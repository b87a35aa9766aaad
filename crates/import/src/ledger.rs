use tally_core::{LedgerSide, TransactionRecord};

use crate::error::ImportError;
use crate::normalize::{normalize_header, parse_amount};
use crate::profile::ImportProfile;

/// Positions of the profile's columns within one ledger's header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub amount: usize,
    pub issuer: Option<usize>,
}

impl ColumnMap {
    pub fn resolve<S: AsRef<str>>(
        side: LedgerSide,
        headers: &[S],
        profile: &ImportProfile,
    ) -> Result<Self, ImportError> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();
        let find = |name: &str| {
            let wanted = normalize_header(name);
            normalized.iter().position(|h| *h == wanted)
        };
        let required = |name: &str| {
            find(name).ok_or_else(|| ImportError::MissingColumn {
                side,
                column: name.to_string(),
            })
        };

        Ok(ColumnMap {
            date: required(&profile.date_column)?,
            amount: required(&profile.amount_column)?,
            issuer: find(&profile.issuer_column),
        })
    }
}

/// Turns text rows of one ledger into records. Rows are numbered the way a
/// spreadsheet shows them: the header is row 1.
pub struct LedgerRows<'a> {
    side: LedgerSide,
    columns: ColumnMap,
    profile: &'a ImportProfile,
}

impl<'a> LedgerRows<'a> {
    pub fn new(side: LedgerSide, columns: ColumnMap, profile: &'a ImportProfile) -> Self {
        Self {
            side,
            columns,
            profile,
        }
    }

    /// `Ok(None)` for a row whose cells are all blank.
    pub fn parse<S: AsRef<str>>(
        &self,
        row: usize,
        cells: &[S],
    ) -> Result<Option<TransactionRecord>, ImportError> {
        if cells.iter().all(|c| c.as_ref().trim().is_empty()) {
            return Ok(None);
        }

        let cell = |idx: usize| cells.get(idx).map(|c| c.as_ref().trim()).unwrap_or_default();

        let date = cell(self.columns.date);
        if date.is_empty() {
            return Err(ImportError::MissingDate {
                side: self.side,
                row,
            });
        }

        let raw_amount = cell(self.columns.amount);
        let amount = parse_amount(
            raw_amount,
            &self.profile.thousands_separator,
            &self.profile.decimal_separator,
        )
        .map_err(|_| ImportError::InvalidAmount {
            side: self.side,
            row,
            value: raw_amount.to_string(),
        })?;

        let issuer = self.columns.issuer.map(cell).unwrap_or_default();

        Ok(Some(TransactionRecord::new(date, amount, issuer)))
    }
}
