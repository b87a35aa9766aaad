use serde::{Deserialize, Serialize};

/// Where the two ledgers live and how their columns are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportProfile {
    pub bookkeeping_sheet: String,
    pub bank_sheet: String,
    /// Column headers, matched case-insensitively after trimming.
    pub date_column: String,
    pub amount_column: String,
    pub issuer_column: String,
    /// Stripped from amounts before parsing; empty disables stripping.
    pub thousands_separator: String,
    pub decimal_separator: String,
    /// Used to render workbook date cells as text keys.
    pub date_format: String,
    pub delimiter: String,
}

impl Default for ImportProfile {
    fn default() -> Self {
        Self {
            bookkeeping_sheet: "Bookkeeping".to_string(),
            bank_sheet: "Bank".to_string(),
            date_column: "date".to_string(),
            amount_column: "amount".to_string(),
            issuer_column: "issuer".to_string(),
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            delimiter: ",".to_string(),
        }
    }
}

impl ImportProfile {
    pub fn from_toml(toml_content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_content)
    }

    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }
}
