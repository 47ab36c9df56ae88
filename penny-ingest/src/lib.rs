//! penny-ingest: turns bank SMS notifications into debit transactions, one new message per call.

pub mod amount;
pub mod error;
pub mod extractor;
pub mod ledger;
pub mod source;
pub mod types;

pub use amount::{AmountMatch, AmountRule, extract_amount, match_amount};
pub use error::IngestError;
pub use extractor::{ExtractOptions, Extractor, UnparsablePolicy, extract_next};
pub use ledger::{JsonLedgerStore, LedgerStore, ProcessedLedger};
pub use source::{JsonFileSource, MessageSource};
pub use types::RawMessage;
