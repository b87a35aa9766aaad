pub mod money;
pub mod record;

pub use money::{Money, MoneyParseError};
pub use record::{DateKey, LedgerSide, TransactionRecord, SYSTEM_ISSUER};
